use std::ops::Range;

use ::markdown::ParseOptions;
use ::markdown::mdast::Node as MdNode;
use ::markdown::to_mdast;

use crate::Dictionary;
use crate::Fragment;
use crate::Link;
use crate::TermlinkError;
use crate::TermlinkResult;
use crate::document::Document;
use crate::document::NodeId;
use crate::document::Payload;
use crate::transform::Rewrite;
use crate::transform::annotate_document;

/// A span left as text, with its 1-indexed location in the markdown source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedTerm {
	pub literal: String,
	pub line: usize,
	pub column: usize,
}

/// Result of annotating a markdown file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedMarkdown {
	/// The source with resolved spans replaced by inline `<a>` elements.
	pub output: String,
	/// Links written into `output`.
	pub links: usize,
	/// Resolved spans that could not be found in the source (for example a
	/// term spelled with an entity) and were left as written.
	pub unrendered: usize,
	pub unresolved: Vec<UnresolvedTerm>,
}

impl AnnotatedMarkdown {
	pub fn is_changed(&self, source: &str) -> bool {
		self.output != source
	}
}

/// Parse markdown (GFM) into a [`Document`]. Text nodes keep their source
/// byte range. Code, inline code and raw HTML carry no text children.
pub fn parse_document(source: &str) -> TermlinkResult<Document> {
	let options = ParseOptions::gfm();
	let mdast = to_mdast(source, &options).map_err(|e| TermlinkError::Markdown(e.to_string()))?;
	let mut document = Document::new();
	let root = document.root();

	if let Some(children) = mdast.children() {
		for child in children {
			build_node(&mut document, root, child);
		}
	}

	Ok(document)
}

fn build_node(document: &mut Document, parent: NodeId, node: &MdNode) {
	let payload = match node {
		MdNode::Text(text) => {
			let span = text
				.position
				.as_ref()
				.map(|position| position.start.offset..position.end.offset);
			document.append_with_span(parent, Payload::Text(text.value.clone()), span);
			return;
		}
		MdNode::Link(link) => {
			Payload::Link {
				url: link.url.clone(),
				classes: Vec::new(),
				style: None,
			}
		}
		MdNode::Image(image) => {
			Payload::Link {
				url: image.url.clone(),
				classes: Vec::new(),
				style: None,
			}
		}
		MdNode::LinkReference(reference) => {
			Payload::Link {
				url: reference.identifier.clone(),
				classes: Vec::new(),
				style: None,
			}
		}
		MdNode::ImageReference(reference) => {
			Payload::Link {
				url: reference.identifier.clone(),
				classes: Vec::new(),
				style: None,
			}
		}
		MdNode::Code(_) => Payload::Code("code".into()),
		MdNode::InlineCode(_) => Payload::Code("inlineCode".into()),
		MdNode::Html(_) => Payload::Code("html".into()),
		MdNode::Math(_) | MdNode::InlineMath(_) => Payload::Code("math".into()),
		MdNode::Yaml(_) | MdNode::Toml(_) => Payload::Code("frontmatter".into()),
		MdNode::Emphasis(_) => Payload::Inline("emphasis".into()),
		MdNode::Strong(_) => Payload::Inline("strong".into()),
		MdNode::Delete(_) => Payload::Inline("delete".into()),
		MdNode::Heading(_) => Payload::Block("heading".into()),
		MdNode::Paragraph(_) => Payload::Block("paragraph".into()),
		MdNode::TableCell(_) => Payload::Block("tableCell".into()),
		MdNode::ListItem(_) => Payload::Block("listItem".into()),
		_ => Payload::Block("block".into()),
	};

	let id = document.append(parent, payload);
	if let Some(children) = node.children() {
		for child in children {
			build_node(document, id, child);
		}
	}
}

/// Annotate a markdown file. Resolved spans are spliced back into the source
/// as inline HTML anchors, leaving everything else byte-for-byte intact.
///
/// A text node whose value is its source verbatim is replaced whole. When
/// the value was decoded (entities, backslash escapes) each span is found in
/// the node's source slice by its literal and replaced on its own.
pub fn annotate_markdown(
	source: &str,
	dictionary: &Dictionary,
) -> TermlinkResult<AnnotatedMarkdown> {
	let mut document = parse_document(source)?;
	let report = annotate_document(&mut document, Some(dictionary));

	let mut splices: Vec<(Range<usize>, String)> = Vec::new();
	let mut unresolved = Vec::new();
	let mut links = 0;
	let mut unrendered = 0;

	for rewrite in &report.rewrites {
		let Some(span) = rewrite.span.clone() else {
			unrendered += rewrite.resolved.len();
			continue;
		};
		let slice = source.get(span.clone()).unwrap_or_default();

		if slice == rewrite.original {
			if rewrite.has_links() {
				splices.push((span.clone(), render_fragments(&rewrite.fragments)));
				links += rewrite.resolved.len();
			}
			unresolved.extend(
				rewrite
					.unresolved
					.iter()
					.map(|term| (span.start + term.start, term.literal.clone())),
			);
			continue;
		}

		for located in locate_spans(slice, rewrite) {
			match located {
				Located::Link { range, link } => {
					let range = span.start + range.start..span.start + range.end;
					splices.push((range, link.to_html()));
					links += 1;
				}
				Located::Unresolved { offset, literal } => {
					unresolved.push((span.start + offset, literal.to_string()));
				}
				Located::Missing { literal } => {
					tracing::debug!(
						start = span.start,
						literal,
						"span not found in its source slice, leaving it untouched"
					);
					unrendered += 1;
				}
				Located::MissingUnresolved { literal } => {
					unresolved.push((span.start, literal.to_string()));
				}
			}
		}
	}

	// Splice from the end so earlier offsets stay valid.
	splices.sort_by(|a, b| b.0.start.cmp(&a.0.start));

	let mut output = source.to_string();
	for (range, replacement) in splices {
		output.replace_range(range, &replacement);
	}

	unresolved.sort_by_key(|(offset, _)| *offset);
	let unresolved = unresolved
		.into_iter()
		.map(|(offset, literal)| {
			let (line, column) = line_column(source, offset);
			UnresolvedTerm {
				literal,
				line,
				column,
			}
		})
		.collect();

	Ok(AnnotatedMarkdown {
		output,
		links,
		unrendered,
		unresolved,
	})
}

/// Where a span of a decoded text node sits in its source slice.
enum Located<'r> {
	Link { range: Range<usize>, link: &'r Link },
	Unresolved { offset: usize, literal: &'r str },
	Missing { literal: &'r str },
	MissingUnresolved { literal: &'r str },
}

/// Find each span of `rewrite` in `slice` by its literal, in order. Spans
/// never overlap, so the search resumes after the previous hit.
fn locate_spans<'r>(slice: &str, rewrite: &'r Rewrite) -> Vec<Located<'r>> {
	let mut spans: Vec<(usize, &'r str, Option<&'r Link>)> = rewrite
		.resolved
		.iter()
		.map(|resolved| (resolved.start, resolved.literal.as_str(), Some(&resolved.link)))
		.chain(
			rewrite
				.unresolved
				.iter()
				.map(|unresolved| (unresolved.start, unresolved.literal.as_str(), None)),
		)
		.collect();
	spans.sort_by_key(|(start, ..)| *start);

	let mut cursor = 0;
	spans
		.into_iter()
		.map(|(_, literal, link)| {
			let found = slice
				.get(cursor..)
				.and_then(|rest| rest.find(literal))
				.map(|idx| cursor + idx);

			match (found, link) {
				(Some(offset), Some(link)) => {
					cursor = offset + literal.len();
					Located::Link {
						range: offset..cursor,
						link,
					}
				}
				(Some(offset), None) => {
					cursor = offset + literal.len();
					Located::Unresolved { offset, literal }
				}
				(None, Some(_)) => Located::Missing { literal },
				(None, None) => Located::MissingUnresolved { literal },
			}
		})
		.collect()
}

/// Render fragments back to markdown: text verbatim, links as inline HTML.
pub fn render_fragments(fragments: &[Fragment]) -> String {
	fragments
		.iter()
		.map(|fragment| {
			match fragment {
				Fragment::Text(value) => value.clone(),
				Fragment::Link(link) => link.to_html(),
			}
		})
		.collect()
}

/// 1-indexed line and column (in characters) of a byte offset.
fn line_column(source: &str, offset: usize) -> (usize, usize) {
	let offset = offset.min(source.len());
	let before = source.get(..offset).unwrap_or(source);
	let line = before.matches('\n').count() + 1;
	let line_start = before.rfind('\n').map_or(0, |idx| idx + 1);
	let column = before[line_start..].chars().count() + 1;
	(line, column)
}
