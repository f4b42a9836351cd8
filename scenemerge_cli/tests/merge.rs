mod common;

use common::scenemerge_cmd;
use common::write_source_tree;
use predicates::prelude::PredicateBooleanExt;
use scenemerge_core::AnyEmptyResult;
use serde_json::Value;

const SCENE: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<MotionScene xmlns:motion="http://schemas.android.com/apk/res-auto">
    <Transition motion:constraintSetStart="@+id/collapsed"/>

    <inject src="_collapsed"/>

</MotionScene>
"#;

const CONSTRAINT_SET: &str = r#"<ConstraintSet
    android:id="@+id/collapsed"/>
"#;

#[test]
fn merge_writes_top_level_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[("_scene.xml", SCENE), ("_collapsed.xml", CONSTRAINT_SET)],
	)?;

	scenemerge_cmd()
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Merged 1 document(s)"))
		.stdout(predicates::str::contains("scene.xml"));

	let written = std::fs::read_to_string(xml_dir.join("scene.xml"))?;
	assert!(written.contains("<!-- Start injected content from '_collapsed' -->"));
	assert!(written.contains("    <ConstraintSet"));
	assert!(written.contains("<!-- End injected content from '_collapsed' -->"));
	assert_eq!(written.matches("<?xml").count(), 1);

	Ok(())
}

#[test]
fn injected_block_matches_directive_column() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[
			(
				"_scene.xml",
				"<MotionScene>\n        <inject src=\"_leaf\"/>\n</MotionScene>\n",
			),
			("_leaf.xml", "<Leaf/>\n"),
		],
	)?;

	scenemerge_cmd().arg(tmp.path()).assert().success();

	let written = std::fs::read_to_string(xml_dir.join("scene.xml"))?;
	let expected = "<MotionScene>\n        <!-- Start injected content from '_leaf' -->\n        \
	                <Leaf/>\n        <!-- End injected content from '_leaf' \
	                -->\n</MotionScene>\n";
	assert_eq!(written, expected);

	Ok(())
}

#[test]
fn transitive_injections_resolve_bottom_up() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[
			(
				"_scene.xml",
				"<MotionScene>\n    <inject src=\"_mid\"/>\n</MotionScene>\n",
			),
			("_mid.xml", "<Wrapper>\n    <inject src=\"_leaf\"/>\n</Wrapper>\n"),
			("_leaf.xml", "<Leaf id=\"deep\"/>\n"),
		],
	)?;

	scenemerge_cmd().arg(tmp.path()).assert().success();

	let written = std::fs::read_to_string(xml_dir.join("scene.xml"))?;
	assert!(written.contains("<Leaf id=\"deep\"/>"));

	// Marker pairs are present and correctly nested in document order.
	let mid_start = written.find("Start injected content from '_mid'").unwrap();
	let leaf_start = written.find("Start injected content from '_leaf'").unwrap();
	let leaf_end = written.find("End injected content from '_leaf'").unwrap();
	let mid_end = written.find("End injected content from '_mid'").unwrap();
	assert!(mid_start < leaf_start);
	assert!(leaf_start < leaf_end);
	assert!(leaf_end < mid_end);

	Ok(())
}

#[test]
fn cyclic_injection_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_source_tree(
		tmp.path(),
		"main",
		&[
			(
				"_a.xml",
				"<MotionScene>\n    <inject src=\"_b\"/>\n</MotionScene>\n",
			),
			("_b.xml", "<Wrapper>\n    <inject src=\"_a\"/>\n</Wrapper>\n"),
		],
	)?;

	scenemerge_cmd()
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("cyclic injection detected"))
		.stderr(predicates::str::contains("_a.xml"))
		.stderr(predicates::str::contains("_b.xml"));

	Ok(())
}

#[test]
fn missing_source_fails_and_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[(
			"_scene.xml",
			"<MotionScene>\n    <inject src=\"_nope\"/>\n</MotionScene>\n",
		)],
	)?;

	scenemerge_cmd()
		.arg(tmp.path())
		.assert()
		.failure()
		.stderr(predicates::str::contains("no source fragment found"))
		.stderr(predicates::str::contains("_nope.xml"));

	assert!(!xml_dir.join("scene.xml").exists());

	Ok(())
}

#[test]
fn commented_directive_is_left_verbatim() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[
			(
				"_commented.xml",
				"<MotionScene>\n<!--    <inject src=\"_collapsed\"/>-->\n</MotionScene>\n",
			),
			("_collapsed.xml", CONSTRAINT_SET),
		],
	)?;

	scenemerge_cmd().arg(tmp.path()).assert().success();

	let written = std::fs::read_to_string(xml_dir.join("commented.xml"))?;
	assert!(written.contains("<!--    <inject src=\"_collapsed\"/>-->"));
	assert!(!written.contains("Start injected content"));

	Ok(())
}

#[test]
fn dry_run_writes_nothing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[("_scene.xml", SCENE), ("_collapsed.xml", CONSTRAINT_SET)],
	)?;

	scenemerge_cmd()
		.arg(tmp.path())
		.arg("--dry-run")
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would write 1 document(s)"));

	assert!(!xml_dir.join("scene.xml").exists());

	Ok(())
}

#[test]
fn second_run_produces_byte_identical_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[("_scene.xml", SCENE), ("_collapsed.xml", CONSTRAINT_SET)],
	)?;

	scenemerge_cmd().arg(tmp.path()).assert().success();
	let first = std::fs::read_to_string(xml_dir.join("scene.xml"))?;

	scenemerge_cmd().arg(tmp.path()).assert().success();
	let second = std::fs::read_to_string(xml_dir.join("scene.xml"))?;
	assert_eq!(first, second);

	Ok(())
}

#[test]
fn json_format_lists_outputs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_source_tree(
		tmp.path(),
		"main",
		&[("_scene.xml", SCENE), ("_collapsed.xml", CONSTRAINT_SET)],
	)?;

	let output = scenemerge_cmd()
		.arg(tmp.path())
		.arg("--format")
		.arg("json")
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	let value: Value = serde_json::from_slice(&output)?;
	assert_eq!(value["dry_run"], Value::Bool(false));
	assert_eq!(value["fragments"], Value::from(2));
	assert_eq!(value["outputs"].as_array().map(Vec::len), Some(1));

	Ok(())
}

#[test]
fn sourceset_selector_limits_discovery() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_source_tree(
		tmp.path(),
		"main",
		&[("_scene.xml", SCENE), ("_collapsed.xml", CONSTRAINT_SET)],
	)?;
	let debug_dir = write_source_tree(
		tmp.path(),
		"debug",
		&[("_scene.xml", SCENE), ("_collapsed.xml", CONSTRAINT_SET)],
	)?;

	scenemerge_cmd()
		.arg(tmp.path())
		.arg("--sourceset")
		.arg("debug")
		.assert()
		.success();

	assert!(debug_dir.join("scene.xml").exists());
	assert!(
		!tmp.path()
			.join("main")
			.join("res")
			.join("xml")
			.join("scene.xml")
			.exists()
	);

	Ok(())
}

#[test]
fn config_file_overrides_the_marker_prefix() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let xml_dir = write_source_tree(
		tmp.path(),
		"main",
		&[
			("_merge_src_scene.xml", SCENE.replace("_collapsed", "_merge_src_collapsed").as_str()),
			("_merge_src_collapsed.xml", CONSTRAINT_SET),
		],
	)?;
	std::fs::write(tmp.path().join("scenemerge.toml"), "prefix = \"_merge_src_\"\n")?;

	scenemerge_cmd().arg(tmp.path()).assert().success();

	let written = std::fs::read_to_string(xml_dir.join("scene.xml"))?;
	assert!(written.contains("Start injected content from '_merge_src_collapsed'"));

	Ok(())
}

#[test]
fn empty_tree_reports_no_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	scenemerge_cmd()
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("No top-level documents found")
				.and(predicates::str::contains("0 fragment(s)")),
		);

	Ok(())
}

#[test]
fn verbose_lists_discovered_fragments() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	write_source_tree(
		tmp.path(),
		"main",
		&[("_scene.xml", SCENE), ("_collapsed.xml", CONSTRAINT_SET)],
	)?;

	scenemerge_cmd()
		.arg(tmp.path())
		.arg("--verbose")
		.assert()
		.success()
		.stdout(predicates::str::contains("2 fragment(s)"))
		.stdout(predicates::str::contains("_collapsed.xml"))
		.stdout(predicates::str::contains("_scene.xml"));

	Ok(())
}
