use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Render string templates described in JSON, TOML or YAML documents.",
	long_about = "jig renders templates made of content interleaved with named gaps.\n\nA \
	              template document lists items: strings are text, `{ gap = \"name\" }` marks \
	              a gap and `{ items = [...] }` nests another template. Gaps are filled from \
	              `jig.toml`, a data file and `--set` flags, in that order.\n\nQuick start:\n  \
	              jig render page.json --set title=Hello\n  jig gaps page.json    List the gaps \
	              left open\n  jig check page.json   Compare the output with an expected file"
)]
pub struct JigCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. `jig.toml` is looked up here and
	/// relative paths are resolved against it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Log how gaps are filled to stderr. `RUST_LOG` takes precedence.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Fill the template and print the rendered output.
	///
	/// Values from `jig.toml`, then `--data`, then `--set` are collected into
	/// one table and every open gap is filled in a single pass. Gaps without
	/// a value render as nothing.
	Render {
		#[command(flatten)]
		fill: FillArgs,
	},
	/// List the gaps that are still open after filling.
	///
	/// Names are printed in order, once per gap, so a name used twice is
	/// listed twice.
	Gaps {
		#[command(flatten)]
		fill: FillArgs,

		/// Output format. Use `text` for one name per line or `json` for
		/// programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Render the template and compare it with an expected file.
	///
	/// Exits with status 1 when the output differs. Ideal for CI pipelines
	/// that keep generated files committed.
	Check {
		#[command(flatten)]
		fill: FillArgs,

		/// File holding the expected output. Defaults to `expected` from
		/// `jig.toml`.
		#[arg(long)]
		expected: Option<PathBuf>,

		/// Show a line diff between the expected and the rendered output.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}

/// Where the template and its fill values come from.
#[derive(Args, Debug, Default)]
pub struct FillArgs {
	/// Template document (`.json`, `.toml`, `.yaml` or `.yml`). Defaults to
	/// `template` from `jig.toml`.
	pub template: Option<PathBuf>,

	/// Fill a gap with text, as `name=value`. Can be repeated.
	#[arg(long = "set", short = 's', value_parser = parse_key_value)]
	pub set: Vec<(String, String)>,

	/// Document of fill values keyed by gap name.
	#[arg(long)]
	pub data: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

/// Parse a `name=value` pair. The value may itself contain `=`.
pub fn parse_key_value(input: &str) -> Result<(String, String), String> {
	let Some((name, value)) = input.split_once('=') else {
		return Err(format!("expected `name=value`, got `{input}`"));
	};

	let name = name.trim();
	if name.is_empty() {
		return Err(format!("missing gap name in `{input}`"));
	}

	Ok((name.to_string(), value.to_string()))
}
