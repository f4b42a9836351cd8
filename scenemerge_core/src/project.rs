use std::path::Path;
use std::path::PathBuf;

use globset::Glob;
use globset::GlobMatcher;
use tracing::debug;
use tracing::info;

use crate::MergeError;
use crate::MergeResult;
use crate::config::MergeConfig;
use crate::source::SourceFile;
use crate::source::SourceMap;

/// Sourceset scanned when none is selected on the command line.
pub const DEFAULT_SOURCESET: &str = "main";

/// One fully resolved top-level document, ready to be written.
#[derive(Debug, Clone)]
pub struct MergeOutput {
	pub source_path: PathBuf,
	pub output_path: PathBuf,
	pub content: String,
}

/// Result of merging all fragments under one root directory.
#[derive(Debug)]
pub struct MergeOutcome {
	/// Resolved top-level documents in discovery order.
	pub outputs: Vec<MergeOutput>,
	/// Names of all discovered fragments, sorted.
	pub fragment_names: Vec<String>,
}

impl MergeOutcome {
	pub fn fragment_count(&self) -> usize {
		self.fragment_names.len()
	}
}

/// Discover all source fragment files for a sourceset under `root`.
///
/// Fragments live at `**/<sourceset>/<res_dir>/<prefix>*.<extension>`.
/// Non-fragment files and directories are silently skipped. The result is
/// sorted for deterministic ordering.
pub fn find_source_files(
	root: &Path,
	sourceset: &str,
	config: &MergeConfig,
) -> MergeResult<Vec<PathBuf>> {
	let pattern = format!(
		"**/{sourceset}/{}/{}*.{}",
		config.res_dir, config.prefix, config.extension
	);
	let matcher = Glob::new(&pattern)
		.map_err(|e| MergeError::ConfigParse(format!("invalid source pattern `{pattern}`: {e}")))?
		.compile_matcher();

	let mut files = Vec::new();
	walk_dir(root, root, &matcher, &mut files)?;
	files.sort();

	debug!(pattern = %pattern, count = files.len(), "discovered source fragments");
	Ok(files)
}

fn is_ignored_directory_name(name: &str) -> bool {
	name.starts_with('.') || name == "node_modules" || name == "target"
}

fn walk_dir(
	root: &Path,
	dir: &Path,
	matcher: &GlobMatcher,
	files: &mut Vec<PathBuf>,
) -> MergeResult<()> {
	let entries = std::fs::read_dir(dir)?;

	for entry in entries {
		let entry = entry?;
		let path = entry.path();
		let is_dir = path.is_dir();

		if is_dir {
			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				if is_ignored_directory_name(name) {
					continue;
				}
			}
			walk_dir(root, &path, matcher, files)?;
		} else if let Ok(rel) = path.strip_prefix(root) {
			if matcher.is_match(rel) {
				files.push(path);
			}
		}
	}

	Ok(())
}

/// Build the name-keyed source map from discovered fragments.
pub fn build_source_map(fragments: Vec<SourceFile>) -> MergeResult<SourceMap> {
	SourceMap::build(fragments)
}

/// Discover, resolve, and collect merged output for every top-level
/// document fragment under `root`.
///
/// Writing is a separate step ([`write_outputs`]) so callers can inspect or
/// report the outcome without touching the tree.
pub fn merge_sources_for_directory(
	root: &Path,
	sourceset: &str,
	config: &MergeConfig,
) -> MergeResult<MergeOutcome> {
	let files = find_source_files(root, sourceset, config)?;

	let mut fragments = Vec::with_capacity(files.len());
	for file in &files {
		fragments.push(SourceFile::load(file)?);
	}
	let mut sources = build_source_map(fragments)?;

	let mut fragment_names: Vec<String> = sources
		.fragments()
		.iter()
		.map(|fragment| fragment.name.clone())
		.collect();
	fragment_names.sort();

	let top_level: Vec<String> = sources
		.fragments()
		.iter()
		.filter(|fragment| fragment.is_top_level(config))
		.map(|fragment| fragment.name.clone())
		.collect();

	let mut outputs = Vec::new();
	for name in &top_level {
		sources.resolve_injections(name, config)?;

		let Some(fragment) = sources.get(name) else {
			continue;
		};
		let output_path = fragment.output_path(config)?;
		let content = dedupe_header(&fragment.resolved_text, config);

		info!(
			source = %fragment.path.display(),
			output = %output_path.display(),
			"merged document"
		);
		outputs.push(MergeOutput {
			source_path: fragment.path.clone(),
			output_path,
			content,
		});
	}

	Ok(MergeOutcome {
		outputs,
		fragment_names,
	})
}

/// Write each resolved document to its derived output path.
pub fn write_outputs(outcome: &MergeOutcome) -> MergeResult<()> {
	for output in &outcome.outputs {
		std::fs::write(&output.output_path, &output.content)?;
		debug!(path = %output.output_path.display(), "wrote merged document");
	}
	Ok(())
}

/// Drop duplicate document header lines, keeping only the first. Headers
/// are stripped from injected content at injection time, so this only fires
/// when a header slipped in through fragment text itself.
pub fn dedupe_header(text: &str, config: &MergeConfig) -> String {
	let mut seen = false;
	let mut lines = Vec::new();

	for line in text.lines() {
		if line.contains(&config.header) {
			if seen {
				continue;
			}
			seen = true;
		}
		lines.push(line);
	}

	let mut result = lines.join("\n");
	if text.ends_with('\n') {
		result.push('\n');
	}
	result
}
