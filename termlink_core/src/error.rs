use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum TermlinkError {
	#[error(transparent)]
	#[diagnostic(code(termlink::io_error))]
	Io(#[from] std::io::Error),

	#[error("failure to load markdown: {0}")]
	#[diagnostic(code(termlink::markdown))]
	Markdown(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(termlink::config_parse),
		help("check that termlink.toml is valid TOML with `delimiters` and `[sources.<name>]` tables")
	)]
	ConfigParse(String),

	#[error("failed to load term file `{path}`: {reason}")]
	#[diagnostic(code(termlink::term_file))]
	TermFile { path: String, reason: String },

	#[error("unsupported term file format: `{0}`")]
	#[diagnostic(
		code(termlink::unsupported_format),
		help("supported formats: json, toml, yaml, yml")
	)]
	UnsupportedTermFormat(String),

	#[error("invalid delimiter pair at index {index}: {reason}")]
	#[diagnostic(
		code(termlink::invalid_delimiter),
		help("each delimiter is a pair of non-empty strings, e.g. [\"{{\", \"}}\"]")
	)]
	InvalidDelimiter { index: usize, reason: String },

	#[error("no delimiters configured")]
	#[diagnostic(
		code(termlink::no_delimiters),
		help("remove the `delimiters` key to use the default `{{` / `}}` pair")
	)]
	NoDelimiters,
}

pub type TermlinkResult<T> = Result<T, TermlinkError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
