use std::path::Path;

use serde::Deserialize;

use crate::MergeError;
use crate::MergeResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["scenemerge.toml", ".scenemerge.toml"];

/// Filename prefix marking a file as a mergeable source fragment.
pub const DEFAULT_SOURCE_PREFIX: &str = "_";

/// Resource directory searched under each sourceset, e.g. `main/res/xml/`.
pub const DEFAULT_SOURCE_RES_DIR: &str = "res/xml";

/// File extension of source fragments, without the leading dot.
pub const DEFAULT_EXTENSION: &str = "xml";

/// Root element marking a fragment as a top-level output document.
pub const DEFAULT_ROOT_ELEMENT: &str = "MotionScene";

/// Document header line that may appear at most once in a merged output.
pub const DEFAULT_XML_HEADER: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Configuration for one merge run, optionally loaded from a
/// `scenemerge.toml` file at the scan root.
///
/// ```toml
/// prefix = "_merge_src_"
/// res_dir = "resources/xml"
/// root_element = "MotionScene"
/// ```
///
/// Constructed once at startup and passed by reference into the parser and
/// resolver; never mutated at runtime.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
	/// Filename prefix identifying source fragments. Stripped when deriving
	/// the output path.
	pub prefix: String,
	/// Resource directory scanned under each sourceset.
	pub res_dir: String,
	/// Fragment file extension, without the leading dot.
	pub extension: String,
	/// Root element whose presence marks a fragment as a top-level document.
	pub root_element: String,
	/// Document header line de-duplicated in merged output.
	pub header: String,
}

impl Default for MergeConfig {
	fn default() -> Self {
		Self {
			prefix: DEFAULT_SOURCE_PREFIX.to_string(),
			res_dir: DEFAULT_SOURCE_RES_DIR.to_string(),
			extension: DEFAULT_EXTENSION.to_string(),
			root_element: DEFAULT_ROOT_ELEMENT.to_string(),
			header: DEFAULT_XML_HEADER.to_string(),
		}
	}
}

impl MergeConfig {
	/// Load configuration from the first config file candidate found under
	/// `root`, falling back to defaults when none exists.
	pub fn load(root: &Path) -> MergeResult<Self> {
		for candidate in CONFIG_FILE_CANDIDATES {
			let path = root.join(candidate);
			if !path.is_file() {
				continue;
			}
			let content = std::fs::read_to_string(&path)?;
			return toml::from_str(&content).map_err(|e| MergeError::ConfigParse(e.to_string()));
		}

		Ok(Self::default())
	}

	/// Normalize a directive target to its canonical source-map key by
	/// appending the extension when absent. Idempotent.
	pub fn normalize_name(&self, name: &str) -> String {
		let suffix = format!(".{}", self.extension);
		if name.ends_with(&suffix) {
			name.to_string()
		} else {
			format!("{name}{suffix}")
		}
	}

	/// Candidate source-map keys for a directive target, in lookup order.
	/// A target may be written with or without the extension, and with or
	/// without the source-marker prefix.
	pub fn lookup_candidates(&self, name: &str) -> [String; 2] {
		let normalized = self.normalize_name(name);
		let prefixed = format!("{}{normalized}", self.prefix);
		[normalized, prefixed]
	}

	/// Comment line opening an injected region in merged output.
	pub fn start_marker(&self, name: &str) -> String {
		format!("<!-- Start injected content from '{name}' -->")
	}

	/// Comment line closing an injected region in merged output.
	pub fn end_marker(&self, name: &str) -> String {
		format!("<!-- End injected content from '{name}' -->")
	}
}
