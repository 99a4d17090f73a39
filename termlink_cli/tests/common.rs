use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub const CONFIG: &str = r#"[sources.global.entries.discord]
terms = ["Discord"]
url = "https://discord.com"

[sources.libs]
classes = ["autolink-libs"]

[sources.libs.entries.serde]
terms = ["Serde"]
url = "https://serde.rs"
"#;

pub fn termlink_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("termlink"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("TERMLINK_LOG");
	cmd
}

pub fn write_config(root: &Path) -> std::io::Result<()> {
	std::fs::write(root.join("termlink.toml"), CONFIG)
}
