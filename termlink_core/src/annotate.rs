use std::fmt::Display;

use html_escape::encode_double_quoted_attribute;
use html_escape::encode_text;

use crate::Dictionary;
use crate::scanner::scan;

/// A piece of a rewritten text run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
	/// Literal text, kept verbatim.
	Text(String),
	/// A resolved term.
	Link(Link),
}

impl Fragment {
	pub fn text(value: impl Into<String>) -> Self {
		Self::Text(value.into())
	}

	pub fn is_link(&self) -> bool {
		matches!(self, Self::Link(_))
	}
}

/// Link produced from a resolved span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
	/// Display text, with the casing typed in the input.
	pub text: String,
	pub url: String,
	pub classes: Vec<String>,
	pub style: Option<String>,
}

impl Link {
	/// Render as an inline `<a>` element.
	pub fn to_html(&self) -> String {
		self.to_string()
	}
}

impl Display for Link {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "<a")?;
		if !self.classes.is_empty() {
			let classes = self.classes.join(" ");
			write!(f, " class=\"{}\"", encode_double_quoted_attribute(&classes))?;
		}
		write!(f, " href=\"{}\"", encode_double_quoted_attribute(&self.url))?;
		if let Some(style) = &self.style {
			write!(f, " style=\"{}\"", encode_double_quoted_attribute(style))?;
		}
		write!(f, ">{}</a>", encode_text(&self.text))
	}
}

/// A span that became a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
	/// Byte offset of the span inside the annotated run.
	pub start: usize,
	/// The span including its delimiters.
	pub literal: String,
	pub link: Link,
}

/// A span that did not resolve and was kept as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
	/// Byte offset of the span inside the annotated run.
	pub start: usize,
	/// The span including its delimiters.
	pub literal: String,
}

/// Fragments for one text run, plus what happened to each span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
	pub fragments: Vec<Fragment>,
	pub resolved: Vec<Resolved>,
	pub unresolved: Vec<Unresolved>,
}

impl Annotation {
	/// Number of spans that became links.
	pub fn links(&self) -> usize {
		self.resolved.len()
	}

	/// Total number of delimited spans found in the run.
	pub fn span_count(&self) -> usize {
		self.resolved.len() + self.unresolved.len()
	}
}

/// Rewrite `text` into fragments. Text without any delimited span comes back
/// as a single text fragment equal to the input.
pub fn annotate(text: &str, dictionary: &Dictionary) -> Vec<Fragment> {
	annotate_run(text, dictionary).fragments
}

/// Like [`annotate`] but also reports which spans resolved.
pub fn annotate_run(text: &str, dictionary: &Dictionary) -> Annotation {
	let spans = scan(text, dictionary.delimiters());
	if spans.is_empty() {
		return Annotation {
			fragments: vec![Fragment::text(text)],
			..Annotation::default()
		};
	}

	let mut annotation = Annotation::default();
	let mut last = 0;

	for span in spans {
		if span.start > last {
			annotation
				.fragments
				.push(Fragment::text(&text[last..span.start]));
		}

		if let Some(resolution) = dictionary.resolve(&span) {
			let link = resolution.into_link();
			annotation.fragments.push(Fragment::Link(link.clone()));
			annotation.resolved.push(Resolved {
				start: span.start,
				literal: span.literal.to_string(),
				link,
			});
		} else {
			tracing::trace!(literal = span.literal, "unresolved span");
			annotation.fragments.push(Fragment::text(span.literal));
			annotation.unresolved.push(Unresolved {
				start: span.start,
				literal: span.literal.to_string(),
			});
		}

		last = span.end;
	}

	if last < text.len() {
		annotation.fragments.push(Fragment::text(&text[last..]));
	}

	annotation
}
