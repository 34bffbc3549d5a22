use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn jig_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("jig"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Write a JSON template with a `title` gap and a repeated `name` gap.
pub fn write_greeting(root: &Path) -> std::io::Result<()> {
	std::fs::write(
		root.join("greeting.json"),
		r##"["# ", { "gap": "title" }, "\nHello, ", { "gap": "name" }, "! Bye, ", { "gap": "name" }, ".\n"]"##,
	)
}
