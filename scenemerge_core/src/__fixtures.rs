use std::path::Path;
use std::path::PathBuf;

/// A top-level MotionScene fragment with one tag-form directive at column 4.
pub const MOTION_SCENE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MotionScene xmlns:android="http://schemas.android.com/apk/res/android"
    xmlns:motion="http://schemas.android.com/apk/res-auto">
    <Transition
        motion:constraintSetStart="@+id/collapsed"
        motion:constraintSetEnd="@+id/expanded">
        <OnClick motion:clickAction="toggle"/>
    </Transition>

    <inject src="_collapsed"/>

</MotionScene>
"#;

/// Injectable-only fragment; carries no document header of its own.
pub const CONSTRAINT_SET: &str = r#"<ConstraintSet
    android:id="@+id/collapsed"
    motion:deriveConstraintsFrom="@+id/expanded"/>
"#;

/// Top-level fragment whose only directive sits inside a comment span.
pub const COMMENTED_SCENE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MotionScene xmlns:motion="http://schemas.android.com/apk/res-auto">
<!--    <inject src="_collapsed"/>-->
</MotionScene>
"#;

/// Create a `<sourceset>/res/xml/` tree under `root` and populate it with
/// the given `(filename, content)` pairs. Returns the xml directory.
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
