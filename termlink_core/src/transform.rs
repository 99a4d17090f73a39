use std::ops::Range;

use crate::Dictionary;
use crate::Fragment;
use crate::Resolved;
use crate::Unresolved;
use crate::annotate_run;
use crate::document::Document;
use crate::tree::is_already_linked;

/// A text node that was replaced by fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
	/// Source range of the replaced text node, when the tree carries one.
	pub span: Option<Range<usize>>,
	/// The replaced text.
	pub original: String,
	pub fragments: Vec<Fragment>,
	/// Spans that became links, with offsets into `original`.
	pub resolved: Vec<Resolved>,
	/// Spans kept as text, with offsets into `original`.
	pub unresolved: Vec<Unresolved>,
}

impl Rewrite {
	/// Whether any fragment is a link.
	pub fn has_links(&self) -> bool {
		self.fragments.iter().any(Fragment::is_link)
	}
}

/// A span left as text, located in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedSpan {
	/// Source offset of the span, when the tree carries spans. Computed from
	/// the text node's start, so it is exact only when the node's value is
	/// its source verbatim.
	pub offset: Option<usize>,
	pub literal: String,
}

/// Summary of one pass over a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformReport {
	/// Number of links inserted.
	pub links: usize,
	/// Text nodes skipped because they already sit inside a link.
	pub skipped_linked: usize,
	pub unresolved: Vec<UnresolvedSpan>,
	pub rewrites: Vec<Rewrite>,
}

/// Annotate every text node of `document` that is not already inside a
/// link. With no dictionary the pass is skipped and the document left as
/// is.
pub fn annotate_document(
	document: &mut Document,
	dictionary: Option<&Dictionary>,
) -> TransformReport {
	let Some(dictionary) = dictionary else {
		tracing::warn!("no term dictionary configured, skipping annotation");
		return TransformReport::default();
	};

	let mut report = TransformReport::default();

	for id in document.text_nodes() {
		if is_already_linked(&document.node(id)) {
			report.skipped_linked += 1;
			continue;
		}

		let Some(text) = document.text(id).map(ToString::to_string) else {
			continue;
		};

		let annotation = annotate_run(&text, dictionary);
		if annotation.span_count() == 0 {
			continue;
		}

		let span = document.span(id);
		report
			.unresolved
			.extend(annotation.unresolved.iter().map(|unresolved| {
				UnresolvedSpan {
					offset: span.as_ref().map(|span| span.start + unresolved.start),
					literal: unresolved.literal.clone(),
				}
			}));
		report.links += annotation.links();
		report.rewrites.push(Rewrite {
			span,
			original: text,
			fragments: annotation.fragments.clone(),
			resolved: annotation.resolved,
			unresolved: annotation.unresolved,
		});

		document.replace_with_fragments(id, annotation.fragments);
	}

	tracing::debug!(
		links = report.links,
		unresolved = report.unresolved.len(),
		skipped = report.skipped_linked,
		"annotated document"
	);

	report
}
