mod common;

use serde_json::Value;
use similar_asserts::assert_eq;
use termlink_core::AnyEmptyResult;

#[test]
fn terms_lists_sources_and_aliases() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	common::termlink_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("terms")
		.assert()
		.success()
		.stdout(predicates::str::contains("global"))
		.stdout(predicates::str::contains("libs (autolink-libs)"))
		.stdout(predicates::str::contains("https://discord.com"))
		.stdout(predicates::str::contains("https://serde.rs"));

	Ok(())
}

#[test]
fn terms_json_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_config(tmp.path())?;

	let output = common::termlink_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("terms")
		.arg("--format")
		.arg("json")
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(
		json,
		serde_json::json!({
			"sources": [
				{
					"name": "global",
					"classes": [],
					"terms": [
						{ "term": "discord", "key": "discord", "url": "https://discord.com" },
					],
				},
				{
					"name": "libs",
					"classes": ["autolink-libs"],
					"terms": [
						{ "term": "serde", "key": "serde", "url": "https://serde.rs" },
					],
				},
			],
		})
	);

	Ok(())
}

#[test]
fn terms_marks_entries_without_url() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::write(
		tmp.path().join("termlink.toml"),
		"[sources.global.entries.draft]\nterms = [\"Draft\"]\n",
	)?;

	common::termlink_cmd()
		.arg("--path")
		.arg(tmp.path())
		.arg("terms")
		.assert()
		.success()
		.stdout(predicates::str::contains("(no url)"))
		.stderr(predicates::str::contains("entry has no url"));

	Ok(())
}

#[test]
fn no_subcommand_exits_with_usage_hint() {
	common::termlink_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("termlink --help"));
}
