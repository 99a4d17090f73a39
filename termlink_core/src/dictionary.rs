use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;

use crate::Link;
use crate::Span;
use crate::TermlinkError;
use crate::TermlinkResult;
use crate::config::EntryConfig;
use crate::config::TermlinkConfig;

/// Name of the namespace used for spans without a `source:` prefix.
pub const GLOBAL_SOURCE: &str = "global";

/// Class carried by every produced link, ahead of source and entry classes.
pub const AUTOLINK_CLASS: &str = "autolink";

/// An `(open, close)` pair of literal markers around an annotatable span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiter {
	open: String,
	close: String,
}

impl Delimiter {
	pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
		Self {
			open: open.into(),
			close: close.into(),
		}
	}

	pub fn open(&self) -> &str {
		&self.open
	}

	pub fn close(&self) -> &str {
		&self.close
	}
}

impl Default for Delimiter {
	fn default() -> Self {
		Self::new("{", "}")
	}
}

/// One linkable concept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermEntry {
	/// Canonical key. Never matched against input.
	pub key: String,
	/// Surface forms matched case-insensitively.
	pub terms: Vec<String>,
	pub url: Option<String>,
	pub style: Option<String>,
	pub classes: Vec<String>,
}

impl TermEntry {
	pub fn new<T: Into<String>>(
		key: impl Into<String>,
		terms: impl IntoIterator<Item = T>,
		url: impl Into<String>,
	) -> Self {
		Self {
			key: key.into(),
			terms: terms.into_iter().map(Into::into).collect(),
			url: Some(url.into()),
			style: None,
			classes: Vec::new(),
		}
	}

	#[must_use]
	pub fn with_classes<T: Into<String>>(mut self, classes: impl IntoIterator<Item = T>) -> Self {
		self.classes = classes.into_iter().map(Into::into).collect();
		self
	}

	#[must_use]
	pub fn with_style(mut self, style: impl Into<String>) -> Self {
		self.style = Some(style.into());
		self
	}

	pub fn from_config(key: impl Into<String>, config: &EntryConfig) -> Self {
		Self {
			key: key.into(),
			terms: config.terms.clone(),
			url: config.url.clone(),
			style: config.style.clone(),
			classes: config.classes.to_vec(),
		}
	}

	/// The usable link target, if any. Blank urls count as missing.
	pub fn target(&self) -> Option<&str> {
		self.url.as_deref().filter(|url| !url.trim().is_empty())
	}
}

/// A named namespace of term entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
	name: String,
	classes: Vec<String>,
	entries: Vec<TermEntry>,
	/// Lowercase alias to index into `entries`.
	aliases: HashMap<String, usize>,
}

impl Source {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn classes(&self) -> &[String] {
		&self.classes
	}

	pub fn entries(&self) -> &[TermEntry] {
		&self.entries
	}

	/// Look up an alias case-insensitively.
	pub fn lookup(&self, term: &str) -> Option<&TermEntry> {
		self.aliases
			.get(&term.to_lowercase())
			.map(|index| &self.entries[*index])
	}

	/// Alias/entry pairs sorted by alias.
	pub fn aliases(&self) -> Vec<(&str, &TermEntry)> {
		let mut aliases: Vec<_> = self
			.aliases
			.iter()
			.map(|(alias, index)| (alias.as_str(), &self.entries[*index]))
			.collect();
		aliases.sort_by(|a, b| a.0.cmp(b.0));
		aliases
	}
}

/// A successful lookup of a span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<'d> {
	pub source: &'d Source,
	pub entry: &'d TermEntry,
	/// Display text with the casing found in the input, trimmed.
	pub text: String,
	/// `autolink`, then the source classes, then the entry classes.
	pub classes: Vec<String>,
}

impl Resolution<'_> {
	pub fn into_link(self) -> Link {
		Link {
			text: self.text,
			url: self.entry.target().unwrap_or_default().to_string(),
			classes: self.classes,
			style: self
				.entry
				.style
				.clone()
				.filter(|style| !style.trim().is_empty()),
		}
	}
}

/// Delimiters plus every source, built once before any text is annotated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
	delimiters: Vec<Delimiter>,
	sources: BTreeMap<String, Source>,
}

impl Default for Dictionary {
	fn default() -> Self {
		Self {
			delimiters: vec![Delimiter::default()],
			sources: BTreeMap::new(),
		}
	}
}

impl Dictionary {
	pub fn builder() -> DictionaryBuilder {
		DictionaryBuilder::default()
	}

	/// Build the dictionary described by `config`, reading term files
	/// relative to `root`.
	pub fn from_config(config: &TermlinkConfig, root: &Path) -> TermlinkResult<Self> {
		let mut builder = Self::builder();

		if let Some(pairs) = &config.delimiters {
			builder = builder.delimiters(
				pairs
					.iter()
					.map(|pair| Delimiter::new(pair.0.as_str(), pair.1.as_str())),
			);
		}

		for (name, source) in &config.sources {
			builder = builder.source(name, source.classes.to_vec());
			for (key, entry) in source.load_entries(root)? {
				builder = builder.entry(name, TermEntry::from_config(key, &entry));
			}
		}

		builder.build()
	}

	pub fn delimiters(&self) -> &[Delimiter] {
		&self.delimiters
	}

	pub fn source(&self, name: &str) -> Option<&Source> {
		self.sources.get(name)
	}

	pub fn sources(&self) -> impl Iterator<Item = &Source> {
		self.sources.values()
	}

	/// Decide whether `span` names a known term. Unknown sources, unknown
	/// aliases, blank bodies, entries without a url and an explicit
	/// `global:` prefix all yield `None`.
	pub fn resolve(&self, span: &Span<'_>) -> Option<Resolution<'_>> {
		let text = span.body.trim();
		if text.is_empty() {
			return None;
		}

		let source = match span.prefix {
			// The global source is only reachable through bare spans.
			Some(GLOBAL_SOURCE) => return None,
			Some(name) => self.sources.get(name)?,
			None => self.sources.get(GLOBAL_SOURCE)?,
		};
		let entry = source.lookup(text)?;
		entry.target()?;

		let classes = std::iter::once(AUTOLINK_CLASS)
			.chain(source.classes.iter().map(String::as_str))
			.chain(entry.classes.iter().map(String::as_str))
			.filter(|class| !class.is_empty())
			.map(ToString::to_string)
			.collect();

		Some(Resolution {
			source,
			entry,
			text: text.to_string(),
			classes,
		})
	}
}

/// Programmatic construction of a [`Dictionary`].
#[derive(Debug, Default)]
pub struct DictionaryBuilder {
	delimiters: Option<Vec<Delimiter>>,
	sources: BTreeMap<String, (Vec<String>, Vec<TermEntry>)>,
}

impl DictionaryBuilder {
	/// Add a delimiter pair. The first call replaces the default `{` / `}`.
	#[must_use]
	pub fn delimiter(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
		self.delimiters
			.get_or_insert_with(Vec::new)
			.push(Delimiter::new(open, close));
		self
	}

	/// Replace the delimiter list.
	#[must_use]
	pub fn delimiters(mut self, delimiters: impl IntoIterator<Item = Delimiter>) -> Self {
		self.delimiters = Some(delimiters.into_iter().collect());
		self
	}

	/// Declare a source and its default classes.
	#[must_use]
	pub fn source<T: Into<String>>(
		mut self,
		name: impl Into<String>,
		classes: impl IntoIterator<Item = T>,
	) -> Self {
		let classes = classes.into_iter().map(Into::into).collect();
		self.sources.entry(name.into()).or_default().0 = classes;
		self
	}

	/// Add an entry, declaring the source without classes if needed.
	#[must_use]
	pub fn entry(mut self, source: impl Into<String>, entry: TermEntry) -> Self {
		self.sources.entry(source.into()).or_default().1.push(entry);
		self
	}

	pub fn build(self) -> TermlinkResult<Dictionary> {
		let delimiters = match self.delimiters {
			None => vec![Delimiter::default()],
			Some(delimiters) if delimiters.is_empty() => return Err(TermlinkError::NoDelimiters),
			Some(delimiters) => delimiters,
		};

		for (index, delimiter) in delimiters.iter().enumerate() {
			let reason = if delimiter.open.is_empty() {
				"opening delimiter is empty"
			} else if delimiter.close.is_empty() {
				"closing delimiter is empty"
			} else {
				continue;
			};

			return Err(TermlinkError::InvalidDelimiter {
				index,
				reason: reason.to_string(),
			});
		}

		let sources = self
			.sources
			.into_iter()
			.map(|(name, (classes, entries))| {
				let source = build_source(&name, classes, entries);
				(name, source)
			})
			.collect();

		let dictionary = Dictionary {
			delimiters,
			sources,
		};
		tracing::debug!(
			sources = dictionary.sources.len(),
			delimiters = dictionary.delimiters.len(),
			"built term dictionary"
		);

		Ok(dictionary)
	}
}

fn build_source(name: &str, classes: Vec<String>, entries: Vec<TermEntry>) -> Source {
	let classes = classes
		.into_iter()
		.filter(|class| !class.trim().is_empty())
		.collect();
	let mut aliases = HashMap::new();

	for (index, entry) in entries.iter().enumerate() {
		if entry.target().is_none() {
			tracing::warn!(
				source = name,
				entry = %entry.key,
				"entry has no url; its terms are left as plain text"
			);
		}

		for term in &entry.terms {
			let alias = term.trim().to_lowercase();
			if alias.is_empty() {
				continue;
			}

			if let Some(previous) = aliases.insert(alias, index) {
				let previous: &TermEntry = &entries[previous];
				if previous.key != entry.key {
					tracing::warn!(
						source = name,
						term = term.as_str(),
						replaced = %previous.key,
						entry = %entry.key,
						"duplicate term alias"
					);
				}
			}
		}
	}

	Source {
		name: name.to_string(),
		classes,
		entries,
		aliases,
	}
}
