use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Turn `{term}` and `{source:term}` spans in markdown into glossary links.",
	long_about = "termlink scans markdown prose for delimiter-bounded spans such as `{Discord}` or \
	              `{libs:Serde}` and replaces every span that names a known term with a link. \
	              Terms are declared in termlink.toml, grouped into sources with their own \
	              presentation classes.\n\nQuick start:\n  termlink terms          List the \
	              configured terms\n  termlink render FILE    Print FILE with links inserted\n  \
	              termlink check FILE...  Report spans that name no known term"
)]
pub struct TermlinkCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Directory holding `termlink.toml` and the term files it references.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output and debug logging.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Print a markdown file with every resolvable span replaced by a link.
	///
	/// Links are written as inline `<a>` elements carrying the `autolink`
	/// class, the source classes and the entry classes. Unresolved spans,
	/// code and text already inside links are left exactly as written.
	Render {
		/// The markdown file to annotate.
		file: PathBuf,

		/// Write the result to this file instead of stdout.
		#[arg(long, short)]
		output: Option<PathBuf>,
	},
	/// Report delimited spans that do not name a known term.
	///
	/// Exits with a non-zero status code when any unresolved span is found,
	/// which makes it suitable for CI.
	Check {
		/// The markdown files to check.
		#[arg(required = true)]
		files: Vec<PathBuf>,

		/// Output format for check results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// List every configured term, grouped by source.
	Terms {
		/// Output format for the term listing.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}
