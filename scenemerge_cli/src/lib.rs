use std::path::PathBuf;

use clap::Parser;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Merge reusable XML source fragments into concrete output files.",
	long_about = "scenemerge resolves `inject` directives across a set of XML source \
	              fragments.\n\nFragments live under `<sourceset>/res/xml/` and are named with a \
	              marker prefix (`_` by default). A fragment references another with a line like \
	              `<inject src=\"_constraints\"/>` or the legacy `__merge__(_constraints)` form. \
	              Each top-level document is written beside its source with the prefix stripped, \
	              every directive replaced by the referenced fragment's resolved content between \
	              start/end marker comments.\n\nQuick start:\n  scenemerge .            Merge the \
	              `main` sourceset under the current directory\n  scenemerge . --dry-run  Report \
	              what would be written without touching files"
)]
pub struct SceneMergeCli {
	/// Root directory to scan for source fragments.
	#[arg(default_value = ".")]
	pub root: PathBuf,

	/// Sourceset whose resource directory is scanned.
	#[arg(long, short, default_value = "main")]
	pub sourceset: String,

	/// Compute and report merged outputs without writing any files.
	#[arg(long, default_value_t = false)]
	pub dry_run: bool,

	/// Output format for merge results.
	#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
	pub format: OutputFormat,

	/// Enable verbose output.
	#[arg(long, short, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption. Lists each written (or
	/// planned) output with its source path.
	Json,
}
