use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use owo_colors::OwoColorize;
use termlink_cli::Commands;
use termlink_cli::OutputFormat;
use termlink_cli::TermlinkCli;
use termlink_core::Dictionary;
use termlink_core::config::TermlinkConfig;
use termlink_core::markdown::UnresolvedTerm;
use termlink_core::markdown::annotate_markdown;

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
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
	let args = TermlinkCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
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

	init_tracing(args.verbose);

	let result = match &args.command {
		Some(Commands::Render { file, output }) => run_render(&args, file, output.as_deref()),
		Some(Commands::Check { files, format }) => run_check(&args, files, *format),
		Some(Commands::Terms { format }) => run_terms(&args, *format),
		None => {
			eprintln!("No subcommand specified. Run `termlink --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<termlink_core::TermlinkError>() {
			Ok(termlink_err) => {
				let report: miette::Report = (*termlink_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Logs go to stderr so rendered output on stdout stays clean. `TERMLINK_LOG`
/// takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter = tracing_subscriber::EnvFilter::try_from_env("TERMLINK_LOG")
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.without_time()
		.init();
}

fn resolve_root(args: &TermlinkCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

/// Build the dictionary from the discovered config. `None` when the root has
/// no config file.
fn load_dictionary(root: &Path) -> Result<Option<Dictionary>, Box<dyn std::error::Error>> {
	let Some(config) = TermlinkConfig::load(root)? else {
		tracing::warn!(root = %root.display(), "no termlink.toml found");
		return Ok(None);
	};

	Ok(Some(Dictionary::from_config(&config, root)?))
}

fn run_render(args: &TermlinkCli, file: &Path, output: Option<&Path>) -> CliResult {
	let root = resolve_root(args);
	let source = std::fs::read_to_string(file)?;

	let rendered = match load_dictionary(&root)? {
		Some(dictionary) => {
			let annotated = annotate_markdown(&source, &dictionary)?;
			if args.verbose {
				eprintln!(
					"{} {} link(s), {} unresolved span(s)",
					colored!("annotated", green),
					annotated.links,
					annotated.unresolved.len()
				);
				if annotated.unrendered > 0 {
					eprintln!(
						"{} {} resolved span(s) could not be located in the source and were \
						 left as written",
						colored!("warning:", yellow),
						annotated.unrendered
					);
				}
			}
			annotated.output
		}
		None => source,
	};

	match output {
		Some(path) => {
			std::fs::write(path, rendered)?;
			if args.verbose {
				eprintln!("{} {}", colored!("wrote", green), path.display());
			}
		}
		None => print!("{rendered}"),
	}

	Ok(())
}

fn run_check(args: &TermlinkCli, files: &[PathBuf], format: OutputFormat) -> CliResult {
	let root = resolve_root(args);
	let Some(dictionary) = load_dictionary(&root)? else {
		match format {
			OutputFormat::Text => println!("Nothing to check."),
			OutputFormat::Json => {
				println!("{}", serde_json::json!({ "ok": true, "unresolved": [] }));
			}
		}
		return Ok(());
	};

	let mut found: Vec<(&Path, UnresolvedTerm)> = Vec::new();
	for file in files {
		let source = std::fs::read_to_string(file)?;
		let annotated = annotate_markdown(&source, &dictionary)?;
		found.extend(
			annotated
				.unresolved
				.into_iter()
				.map(|unresolved| (file.as_path(), unresolved)),
		);
	}

	match format {
		OutputFormat::Text => {
			if found.is_empty() {
				println!("{}", colored!("All terms resolved.", green));
			} else {
				for (file, unresolved) in &found {
					println!(
						"{}:{}:{} {} {}",
						file.display(),
						unresolved.line,
						unresolved.column,
						colored!("unresolved term", yellow),
						colored!(unresolved.literal, bold)
					);
				}
				eprintln!(
					"\n{} {} unresolved term(s).",
					colored!("error:", red),
					found.len()
				);
			}
		}
		OutputFormat::Json => {
			let entries: Vec<serde_json::Value> = found
				.iter()
				.map(|(file, unresolved)| {
					serde_json::json!({
						"file": file.display().to_string(),
						"line": unresolved.line,
						"column": unresolved.column,
						"literal": unresolved.literal,
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": found.is_empty(),
				"unresolved": entries,
			});
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
	}

	if !found.is_empty() {
		process::exit(1);
	}

	Ok(())
}

fn run_terms(args: &TermlinkCli, format: OutputFormat) -> CliResult {
	let root = resolve_root(args);
	let Some(dictionary) = load_dictionary(&root)? else {
		match format {
			OutputFormat::Text => println!("No terms configured."),
			OutputFormat::Json => println!("{}", serde_json::json!({ "sources": [] })),
		}
		return Ok(());
	};

	match format {
		OutputFormat::Text => {
			for source in dictionary.sources() {
				println!();
				let classes = source.classes().join(" ");
				if classes.is_empty() {
					println!("{}", colored!(source.name(), bold));
				} else {
					println!("{} ({classes})", colored!(source.name(), bold));
				}
				for (alias, entry) in source.aliases() {
					let target = entry
						.target()
						.map_or_else(|| colored!("(no url)", yellow), ToString::to_string);
					println!("  {alias:<24} {:<20} {target}", entry.key);
				}
			}
		}
		OutputFormat::Json => {
			let sources: Vec<serde_json::Value> = dictionary
				.sources()
				.map(|source| {
					let terms: Vec<serde_json::Value> = source
						.aliases()
						.into_iter()
						.map(|(alias, entry)| {
							serde_json::json!({
								"term": alias,
								"key": entry.key,
								"url": entry.target(),
							})
						})
						.collect();
					serde_json::json!({
						"name": source.name(),
						"classes": source.classes(),
						"terms": terms,
					})
				})
				.collect();
			let output = serde_json::json!({ "sources": sources });
			println!("{}", serde_json::to_string_pretty(&output)?);
		}
	}

	Ok(())
}
