use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::MergeError;
use crate::MergeResult;
use crate::config::MergeConfig;
use crate::parser::InjectionDirective;
use crate::parser::comment_spans;
use crate::parser::find_directives;

/// Resolution state of a single fragment.
///
/// The in-progress state is what makes cycle detection possible: when
/// resolution re-enters a fragment that has started but not finished, the
/// dependency chain is cyclic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveState {
	#[default]
	Unresolved,
	InProgress,
	Resolved,
}

/// One discovered source fragment.
///
/// `raw_text` is immutable after load; `resolved_text` starts equal to it
/// and is rewritten in place as injections resolve. Once `state` is
/// [`ResolveState::Resolved`], `resolved_text` contains no unresolved
/// directive occurrences.
#[derive(Debug, Clone)]
pub struct SourceFile {
	pub path: PathBuf,
	/// Base filename; the source-map key and the literal reference token
	/// used by directives.
	pub name: String,
	pub raw_text: String,
	pub resolved_text: String,
	pub state: ResolveState,
}

impl SourceFile {
	/// Read a fragment from disk.
	pub fn load(path: &Path) -> MergeResult<Self> {
		let raw_text = std::fs::read_to_string(path)?;
		Ok(Self::from_content(path, raw_text))
	}

	pub fn from_content(path: impl Into<PathBuf>, raw_text: impl Into<String>) -> Self {
		let path = path.into();
		let raw_text = raw_text.into();
		let name = path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_default();

		Self {
			path,
			name,
			resolved_text: raw_text.clone(),
			raw_text,
			state: ResolveState::default(),
		}
	}

	pub fn is_resolved(&self) -> bool {
		self.state == ResolveState::Resolved
	}

	/// Whether this fragment is a top-level document eligible for direct
	/// output, i.e. it carries the configured root element rather than being
	/// purely injectable content.
	pub fn is_top_level(&self, config: &MergeConfig) -> bool {
		let closing = format!("</{}>", config.root_element);
		self.raw_text.contains(&closing) && has_opening_tag(&self.raw_text, &config.root_element)
	}

	/// Derive the output path by stripping the source-marker prefix from the
	/// filename, within the same directory. Fails when stripping produces no
	/// change, which would otherwise overwrite the source.
	pub fn output_path(&self, config: &MergeConfig) -> MergeResult<PathBuf> {
		let stripped = self
			.name
			.strip_prefix(&config.prefix)
			.filter(|stripped| *stripped != self.name)
			.ok_or_else(|| {
				MergeError::InvalidTarget {
					path: self.path.display().to_string(),
				}
			})?;

		Ok(self.path.with_file_name(stripped))
	}
}

/// Name-keyed lookup table over all discovered fragments for one run.
///
/// The mapping itself is immutable after construction; only each fragment's
/// `state` and `resolved_text` mutate during resolution.
#[derive(Debug)]
pub struct SourceMap {
	fragments: Vec<SourceFile>,
	index: HashMap<String, usize>,
}

impl SourceMap {
	/// Build the name-keyed mapping, failing when two fragments share a key.
	pub fn build(fragments: Vec<SourceFile>) -> MergeResult<Self> {
		let mut index = HashMap::with_capacity(fragments.len());

		for (i, fragment) in fragments.iter().enumerate() {
			if let Some(&first) = index.get(&fragment.name) {
				let first: &SourceFile = &fragments[first];
				return Err(MergeError::DuplicateName {
					name: fragment.name.clone(),
					first_file: first.path.display().to_string(),
					second_file: fragment.path.display().to_string(),
				});
			}
			index.insert(fragment.name.clone(), i);
		}

		Ok(Self { fragments, index })
	}

	pub fn len(&self) -> usize {
		self.fragments.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fragments.is_empty()
	}

	pub fn get(&self, name: &str) -> Option<&SourceFile> {
		self.index.get(name).map(|&i| &self.fragments[i])
	}

	/// All fragments in discovery order.
	pub fn fragments(&self) -> &[SourceFile] {
		&self.fragments
	}

	/// Resolve every injection directive in the named fragment, recursively
	/// resolving dependency fragments first so transitive chains resolve
	/// bottom-up. Calling this on an already-resolved fragment is a no-op.
	pub fn resolve_injections(&mut self, name: &str, config: &MergeConfig) -> MergeResult<()> {
		let Some(&idx) = self.index.get(name) else {
			return Err(MergeError::MissingSource {
				name: name.to_string(),
				referenced_by: "(top-level)".to_string(),
			});
		};

		let mut chain = Vec::new();
		self.resolve_fragment(idx, &mut chain, config)
	}

	fn resolve_fragment(
		&mut self,
		idx: usize,
		chain: &mut Vec<String>,
		config: &MergeConfig,
	) -> MergeResult<()> {
		match self.fragments[idx].state {
			ResolveState::Resolved => return Ok(()),
			ResolveState::InProgress => {
				let mut names = chain.clone();
				names.push(self.fragments[idx].name.clone());
				return Err(MergeError::CyclicInjection {
					chain: names.join(" -> "),
				});
			}
			ResolveState::Unresolved => {}
		}

		self.fragments[idx].state = ResolveState::InProgress;
		chain.push(self.fragments[idx].name.clone());

		let directives = find_directives(&self.fragments[idx].resolved_text, config);
		for directive in &directives {
			let Some(target_idx) = self.lookup(&directive.name, config) else {
				return Err(MergeError::MissingSource {
					name: directive.target.clone(),
					referenced_by: self.fragments[idx].name.clone(),
				});
			};

			self.resolve_fragment(target_idx, chain, config)?;

			let block =
				build_injected_block(&self.fragments[target_idx].resolved_text, directive, config);
			let fragment = &mut self.fragments[idx];
			fragment.resolved_text =
				replace_outside_comments(&fragment.resolved_text, &directive.raw, &block);
			debug!(
				target = %directive.target,
				into = %fragment.name,
				indent = directive.indent,
				"injected fragment"
			);
		}

		chain.pop();
		self.fragments[idx].state = ResolveState::Resolved;
		Ok(())
	}

	/// Find the fragment a directive refers to. Targets may be written with
	/// or without the extension and with or without the marker prefix.
	fn lookup(&self, directive_name: &str, config: &MergeConfig) -> Option<usize> {
		config
			.lookup_candidates(directive_name)
			.iter()
			.find_map(|candidate| self.index.get(candidate).copied())
	}
}

/// Whether `text` contains an opening tag for `element` proper, not merely
/// a longer element name sharing the same prefix. The name must be followed
/// by whitespace, `>`, or `/`.
fn has_opening_tag(text: &str, element: &str) -> bool {
	let needle = format!("<{element}");
	let mut search_from = 0;

	while let Some(found) = text[search_from..].find(&needle) {
		let after = search_from + found + needle.len();
		match text[after..].chars().next() {
			Some(c) if c == '>' || c == '/' || c.is_whitespace() => return true,
			Some(_) => search_from = after,
			None => break,
		}
	}

	false
}

/// Wrap resolved target content between start and end markers, dropping any
/// document header line and indenting every non-empty line to the
/// directive's column.
fn build_injected_block(
	content: &str,
	directive: &InjectionDirective,
	config: &MergeConfig,
) -> String {
	let indent = " ".repeat(directive.indent);
	let mut lines = Vec::new();

	lines.push(format!("{indent}{}", config.start_marker(&directive.name)));
	for line in content.lines() {
		if line.contains(&config.header) {
			continue;
		}
		if line.is_empty() {
			lines.push(String::new());
		} else {
			lines.push(format!("{indent}{line}"));
		}
	}
	lines.push(format!("{indent}{}", config.end_marker(&directive.name)));

	lines.join("\n")
}

/// Replace every occurrence of `needle` that starts outside a comment span.
/// Occurrences inside comments are kept verbatim.
fn replace_outside_comments(text: &str, needle: &str, replacement: &str) -> String {
	let spans = comment_spans(text);
	let mut result = String::with_capacity(text.len());
	let mut cursor = 0;

	while let Some(found) = text[cursor..].find(needle) {
		let abs = cursor + found;
		result.push_str(&text[cursor..abs]);
		if spans.iter().any(|span| span.contains(&abs)) {
			result.push_str(needle);
		} else {
			result.push_str(replacement);
		}
		cursor = abs + needle.len();
	}
	result.push_str(&text[cursor..]);

	result
}
