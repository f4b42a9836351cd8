use std::path::Path;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use scenemerge_cli::OutputFormat;
use scenemerge_cli::SceneMergeCli;
use scenemerge_core::AnyEmptyResult;
use scenemerge_core::MergeConfig;
use scenemerge_core::MergeOutcome;
use scenemerge_core::merge_sources_for_directory;
use scenemerge_core::write_outputs;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = SceneMergeCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let _ = tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::from_default_env())
		.with_writer(std::io::stderr)
		.try_init();

	if let Err(e) = run(&args) {
		// Render through miette for rich diagnostics with help text and
		// error codes.
		match e.downcast::<scenemerge_core::MergeError>() {
			Ok(merge_err) => {
				let report: miette::Report = (*merge_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(1);
	}
}

fn run(args: &SceneMergeCli) -> AnyEmptyResult {
	let config = MergeConfig::load(&args.root)?;
	let outcome = merge_sources_for_directory(&args.root, &args.sourceset, &config)?;

	if args.verbose {
		println!(
			"Scanned sourceset `{}`: {} fragment(s)",
			args.sourceset,
			outcome.fragment_count()
		);
		for name in &outcome.fragment_names {
			println!("  {name}");
		}
	}

	if !args.dry_run {
		write_outputs(&outcome)?;
	}

	match args.format {
		OutputFormat::Json => print_json(args, &outcome),
		OutputFormat::Text => print_text(args, &outcome),
	}

	Ok(())
}

fn print_json(args: &SceneMergeCli, outcome: &MergeOutcome) {
	let outputs: Vec<serde_json::Value> = outcome
		.outputs
		.iter()
		.map(|output| {
			serde_json::json!({
				"source": make_relative(&output.source_path, &args.root),
				"output": make_relative(&output.output_path, &args.root),
			})
		})
		.collect();
	let value = serde_json::json!({
		"dry_run": args.dry_run,
		"fragments": outcome.fragment_count(),
		"outputs": outputs,
	});
	println!("{value}");
}

fn print_text(args: &SceneMergeCli, outcome: &MergeOutcome) {
	if outcome.outputs.is_empty() {
		println!(
			"No top-level documents found ({} fragment(s) scanned).",
			outcome.fragment_count()
		);
		return;
	}

	let summary = if args.dry_run {
		format!(
			"Dry run: would write {} document(s) from {} fragment(s):",
			outcome.outputs.len(),
			outcome.fragment_count()
		)
	} else {
		format!(
			"Merged {} document(s) from {} fragment(s):",
			outcome.outputs.len(),
			outcome.fragment_count()
		)
	};
	println!("{}", colored!(summary, bold));

	for output in &outcome.outputs {
		let source = make_relative(&output.source_path, &args.root);
		let target = make_relative(&output.output_path, &args.root);
		println!("  {source} -> {target}");
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
