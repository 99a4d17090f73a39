/// What a host tree node is, as far as annotation cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Root,
	Block,
	Inline,
	/// A hyperlink or reference. Text below it is never annotated.
	Link,
	/// Code or raw markup whose content is not prose.
	Code,
	Text,
}

/// The capability the annotator needs from a host tree: climbing to the
/// parent and classifying a node.
pub trait Node: Sized {
	fn parent(&self) -> Option<Self>;

	fn kind(&self) -> NodeKind;

	/// Iterate over the ancestors of this node, nearest first.
	fn ancestors(&self) -> Ancestors<Self> {
		Ancestors {
			next: self.parent(),
		}
	}
}

/// Iterator returned by [`Node::ancestors`].
pub struct Ancestors<N> {
	next: Option<N>,
}

impl<N: Node> Iterator for Ancestors<N> {
	type Item = N;

	fn next(&mut self) -> Option<N> {
		let current = self.next.take()?;
		self.next = current.parent();
		Some(current)
	}
}

/// Returns `true` when any ancestor of `node` is a link, in which case the
/// node must not be annotated.
pub fn is_already_linked<N: Node>(node: &N) -> bool {
	node.ancestors()
		.any(|ancestor| ancestor.kind() == NodeKind::Link)
}
