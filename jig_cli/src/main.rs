use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use jig_cli::Commands;
use jig_cli::FillArgs;
use jig_cli::JigCli;
use jig_cli::OutputFormat;
use jig_core::Item;
use jig_core::Jig;
use jig_core::JigConfig;
use jig_core::document::load_jig;
use jig_core::document::load_values;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing::debug;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = JigCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Render { fill }) => run_render(&args, fill),
		Some(Commands::Gaps { fill, format }) => run_gaps(&args, fill, *format),
		Some(Commands::Check {
			fill,
			expected,
			diff,
		}) => run_check(&args, fill, expected.as_deref(), *diff),
		None => {
			eprintln!("No subcommand specified. Run `jig --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<jig_core::JigError>() {
			Ok(jig_err) => {
				let report: miette::Report = (*jig_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr when `--verbose` is set or `RUST_LOG` is present.
fn init_tracing(verbose: bool, use_color: bool) {
	let filter = match std::env::var("RUST_LOG") {
		Ok(directives) if !directives.is_empty() => EnvFilter::new(directives),
		_ if verbose => EnvFilter::new("jig=debug,jig_core=debug"),
		_ => return,
	};

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.try_init();
}

fn resolve_root(args: &JigCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// A template with every configured value plugged in.
struct Filled {
	root: PathBuf,
	config: Option<JigConfig>,
	jig: Jig,
}

fn fill_template(args: &JigCli, fill: &FillArgs) -> Result<Filled, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config = JigConfig::load(&root)?;
	debug!(
		root = %root.display(),
		config = ?JigConfig::resolve_path(&root),
		"resolved project"
	);

	let template_path = fill
		.template
		.clone()
		.or_else(|| config.as_ref().and_then(|config| config.template.clone()))
		.ok_or("no template given: pass a template document or set `template` in jig.toml")?;
	let template = load_jig(&root.join(template_path))?;

	let mut values: BTreeMap<String, Item> = match &config {
		Some(config) => config.load_values(&root)?,
		None => BTreeMap::new(),
	};
	if let Some(data) = &fill.data {
		values.extend(load_values(&root.join(data))?);
	}
	for (name, value) in &fill.set {
		values.insert(name.clone(), Item::from(value));
	}
	debug!(values = values.len(), gaps = template.gaps().len(), "filling template");

	let jig = template.fill(&values);

	Ok(Filled { root, config, jig })
}

fn run_render(args: &JigCli, fill: &FillArgs) -> Result<(), Box<dyn std::error::Error>> {
	let filled = fill_template(args, fill)?;
	print!("{}", filled.jig.render()?);

	Ok(())
}

fn run_gaps(
	args: &JigCli,
	fill: &FillArgs,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let filled = fill_template(args, fill)?;
	let gaps: Vec<String> = filled
		.jig
		.gaps()
		.iter()
		.map(ToString::to_string)
		.collect();

	match format {
		OutputFormat::Json => {
			println!("{}", serde_json::json!({ "gaps": gaps }));
		}
		OutputFormat::Text => {
			if gaps.is_empty() {
				println!("No open gaps.");
			}
			for gap in gaps {
				println!("{gap}");
			}
		}
	}

	Ok(())
}

fn run_check(
	args: &JigCli,
	fill: &FillArgs,
	expected: Option<&Path>,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let filled = fill_template(args, fill)?;
	let expected_path = expected
		.map(Path::to_path_buf)
		.or_else(|| {
			filled
				.config
				.as_ref()
				.and_then(|config| config.expected.clone())
		})
		.ok_or("no expected file given: pass `--expected` or set `expected` in jig.toml")?;
	let expected_path = filled.root.join(expected_path);

	let expected_content = std::fs::read_to_string(&expected_path)?;
	let rendered = filled.jig.render()?;

	if rendered == expected_content {
		println!(
			"Check passed: output matches {}.",
			make_relative(&expected_path, &filled.root)
		);
		return Ok(());
	}

	eprintln!(
		"{} output differs from {}.",
		colored!("Check failed:", red),
		make_relative(&expected_path, &filled.root)
	);
	if show_diff {
		print_diff(&expected_content, &rendered);
	} else {
		eprintln!("Run with `--diff` to see the changes.");
	}

	process::exit(1);
}

fn print_diff(expected: &str, rendered: &str) {
	let diff = TextDiff::from_lines(expected, rendered);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
	if !expected.ends_with('\n') || !rendered.ends_with('\n') {
		eprintln!();
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
