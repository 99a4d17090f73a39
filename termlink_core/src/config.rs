use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::TermlinkError;
use crate::TermlinkResult;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"termlink.toml",
	".termlink.toml",
	".config/termlink.toml",
];

/// Configuration loaded from a `termlink.toml` file.
///
/// ```toml
/// delimiters = [["{", "}"], ["[[", "]]"]]
///
/// [sources.global.entries.discord]
/// terms = ["Discord"]
/// url = "https://discord.com"
///
/// [sources.libs]
/// classes = ["autolink-libs"]
/// file = "terms/libs.yaml"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermlinkConfig {
	/// Ordered `(open, close)` pairs marking annotatable spans. When absent
	/// the `{` / `}` pair is used.
	#[serde(default)]
	pub delimiters: Option<Vec<DelimiterPair>>,
	/// Named term namespaces. The `global` source is the one reachable
	/// without a prefix.
	#[serde(default)]
	pub sources: BTreeMap<String, SourceConfig>,
}

/// A delimiter pair written as a two element array, e.g. `["{", "}"]`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DelimiterPair(pub String, pub String);

/// A `[sources.<name>]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
	/// Classes added to every link produced from this source.
	#[serde(default, alias = "class")]
	pub classes: ClassList,
	/// Optional file holding additional entries, relative to the config root.
	/// The format is taken from the extension.
	#[serde(default)]
	pub file: Option<PathBuf>,
	/// Inline entries keyed by their canonical key.
	#[serde(default)]
	pub entries: BTreeMap<String, EntryConfig>,
}

/// A single linkable term.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct EntryConfig {
	/// Case-insensitive aliases matched inside the delimiters.
	#[serde(default)]
	pub terms: Vec<String>,
	/// Link target. Entries without a url never resolve.
	#[serde(default)]
	pub url: Option<String>,
	/// Classes appended after the source classes.
	#[serde(default, alias = "class")]
	pub classes: ClassList,
	/// Inline style attribute for the produced link.
	#[serde(default)]
	pub style: Option<String>,
}

/// Class names given either as a list or as a whitespace separated string.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum ClassList {
	List(Vec<String>),
	Words(String),
}

impl Default for ClassList {
	fn default() -> Self {
		Self::List(Vec::new())
	}
}

impl ClassList {
	/// Flatten into individual class names, dropping empty ones.
	pub fn to_vec(&self) -> Vec<String> {
		match self {
			Self::List(list) => {
				list.iter()
					.map(|class| class.trim())
					.filter(|class| !class.is_empty())
					.map(ToString::to_string)
					.collect()
			}
			Self::Words(words) => words.split_whitespace().map(ToString::to_string).collect(),
		}
	}
}

impl From<Vec<String>> for ClassList {
	fn from(list: Vec<String>) -> Self {
		Self::List(list)
	}
}

impl TermlinkConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> TermlinkResult<Option<TermlinkConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), sources = config.sources.len(), "loaded config");

		Ok(Some(config))
	}

	/// Parse config from TOML text.
	pub fn parse(content: &str) -> TermlinkResult<TermlinkConfig> {
		toml::from_str(content).map_err(|e| TermlinkError::ConfigParse(e.to_string()))
	}
}

impl SourceConfig {
	/// Collect the entries of this source. Entries from `file` are read first
	/// and inline entries replace file entries sharing the same key.
	pub fn load_entries(&self, root: &Path) -> TermlinkResult<BTreeMap<String, EntryConfig>> {
		let mut entries = match &self.file {
			Some(rel_path) => {
				let abs_path = root.join(rel_path);
				let path_display = rel_path.display().to_string();
				let content =
					std::fs::read_to_string(&abs_path).map_err(|e| TermlinkError::TermFile {
						path: path_display.clone(),
						reason: e.to_string(),
					})?;
				let format = abs_path
					.extension()
					.and_then(|e| e.to_str())
					.unwrap_or("")
					.to_ascii_lowercase();
				parse_term_file(&content, &format, &path_display)?
			}
			None => BTreeMap::new(),
		};

		for (key, entry) in &self.entries {
			entries.insert(key.clone(), entry.clone());
		}

		Ok(entries)
	}
}

/// Parse a term file into entries keyed by canonical key.
fn parse_term_file(
	content: &str,
	format: &str,
	path_display: &str,
) -> TermlinkResult<BTreeMap<String, EntryConfig>> {
	let to_error = |reason: String| {
		TermlinkError::TermFile {
			path: path_display.to_string(),
			reason,
		}
	};

	match format {
		"json" => serde_json::from_str(content).map_err(|e| to_error(e.to_string())),
		"toml" => toml::from_str(content).map_err(|e| to_error(e.to_string())),
		"yaml" | "yml" => serde_yaml_ng::from_str(content).map_err(|e| to_error(e.to_string())),
		other => Err(TermlinkError::UnsupportedTermFormat(other.to_string())),
	}
}
