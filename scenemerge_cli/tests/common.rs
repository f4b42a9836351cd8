use std::path::Path;
use std::path::PathBuf;

use assert_cmd::Command;

pub fn scenemerge_cmd() -> Command {
	let mut cmd = Command::cargo_bin("scenemerge").expect("scenemerge binary");
	cmd.env("NO_COLOR", "1");
	cmd
}

/// Create a `<sourceset>/res/xml/` tree under `root` with the given
/// `(filename, content)` pairs. Returns the xml directory.
pub fn write_source_tree(
	root: &Path,
	sourceset: &str,
	files: &[(&str, &str)],
) -> std::io::Result<PathBuf> {
	let xml_dir = root.join(sourceset).join("res").join("xml");
	std::fs::create_dir_all(&xml_dir)?;
	for (name, content) in files {
		std::fs::write(xml_dir.join(name), content)?;
	}
	Ok(xml_dir)
}
