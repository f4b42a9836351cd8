use std::ops::Range;

use crate::config::MergeConfig;

/// The legacy parenthesized marker, e.g. `__merge__(some_fragment)`.
pub const LEGACY_MARKER: &str = "__merge__";

/// The tag-form marker, e.g. `<inject src="some_fragment"/>`.
pub const TAG_MARKER: &str = "<inject";

/// One injection reference found in fragment text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectionDirective {
	/// Target name exactly as written in the directive. Used in the output
	/// markers.
	pub name: String,
	/// Canonical source-map key (extension appended when absent).
	pub target: String,
	/// Number of leading space characters before the marker on its line.
	pub indent: usize,
	/// The exact matched text, leading indent included. Substitution works
	/// on this literal occurrence, so the order in which directives are
	/// processed never shifts the position of another. Every non-comment
	/// occurrence of this text is replaced, even a mid-line occurrence that
	/// would not itself parse as a directive.
	pub raw: String,
}

/// Scan fragment text for injection directives, in document order.
///
/// A directive must appear at the start of a line, after optional leading
/// spaces; the marker as a substring of a larger token does not match.
/// Occurrences inside comment spans are excluded.
pub fn find_directives(text: &str, config: &MergeConfig) -> Vec<InjectionDirective> {
	let spans = comment_spans(text);
	let mut directives = Vec::new();
	let mut offset = 0;

	for line in text.split('\n') {
		let line_start = offset;
		offset += line.len() + 1;

		let indent = line.len() - line.trim_start_matches(' ').len();
		let rest = &line[indent..];
		let Some(matched) = match_tag_directive(rest).or_else(|| match_legacy_directive(rest))
		else {
			continue;
		};

		let marker_offset = line_start + indent;
		if spans.iter().any(|span| span.contains(&marker_offset)) {
			continue;
		}

		directives.push(InjectionDirective {
			name: matched.name.to_string(),
			target: config.normalize_name(matched.name),
			indent,
			raw: line[..indent + matched.len].to_string(),
		});
	}

	directives
}

/// Byte ranges of comment spans (`<!--` to `-->`), scanned top to bottom
/// over the raw text, not nested. An unterminated comment swallows the rest
/// of the document.
pub(crate) fn comment_spans(text: &str) -> Vec<Range<usize>> {
	let mut spans = Vec::new();
	let mut search_from = 0;

	while let Some(open) = text[search_from..].find("<!--") {
		let abs_open = search_from + open;
		let after_open = abs_open + "<!--".len();
		let Some(close) = text[after_open..].find("-->") else {
			spans.push(abs_open..text.len());
			break;
		};
		let abs_close = after_open + close + "-->".len();
		spans.push(abs_open..abs_close);
		search_from = abs_close;
	}

	spans
}

struct DirectiveMatch<'a> {
	name: &'a str,
	/// Byte length of the matched text, starting at the marker.
	len: usize,
}

/// Match `<inject src="name"/>` at the start of `text`, tolerating
/// whitespace before the self-closing bracket.
fn match_tag_directive(text: &str) -> Option<DirectiveMatch<'_>> {
	let rest = text.strip_prefix(TAG_MARKER)?.strip_prefix(" src=\"")?;
	let open_len = TAG_MARKER.len() + " src=\"".len();
	let name_end = rest.find('"')?;
	let name = &rest[..name_end];
	if name.is_empty() {
		return None;
	}

	let after_name = &rest[name_end + 1..];
	let trimmed = after_name.trim_start();
	trimmed.strip_prefix("/>")?;
	let whitespace = after_name.len() - trimmed.len();

	Some(DirectiveMatch {
		name,
		len: open_len + name_end + 1 + whitespace + "/>".len(),
	})
}

/// Match `__merge__(name)` at the start of `text`.
fn match_legacy_directive(text: &str) -> Option<DirectiveMatch<'_>> {
	let rest = text.strip_prefix(LEGACY_MARKER)?.strip_prefix('(')?;
	let name_end = rest.find(')')?;
	let name = &rest[..name_end];
	if name.is_empty() || name.contains('(') {
		return None;
	}

	Some(DirectiveMatch {
		name,
		len: LEGACY_MARKER.len() + 1 + name_end + 1,
	})
}
