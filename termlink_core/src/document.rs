use std::ops::Range;

use crate::Fragment;
use crate::tree::Node;
use crate::tree::NodeKind;

/// Index of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Payload {
	Root,
	/// A block container such as a paragraph, heading or list item.
	Block(String),
	/// An inline container such as emphasis.
	Inline(String),
	/// Code or raw markup. Never has text children.
	Code(String),
	Link {
		url: String,
		classes: Vec<String>,
		style: Option<String>,
	},
	Text(String),
}

impl Payload {
	pub fn kind(&self) -> NodeKind {
		match self {
			Self::Root => NodeKind::Root,
			Self::Block(_) => NodeKind::Block,
			Self::Inline(_) => NodeKind::Inline,
			Self::Code(_) => NodeKind::Code,
			Self::Link { .. } => NodeKind::Link,
			Self::Text(_) => NodeKind::Text,
		}
	}
}

#[derive(Debug, Clone)]
struct NodeData {
	payload: Payload,
	parent: Option<NodeId>,
	children: Vec<NodeId>,
	/// Byte range in the source the node was parsed from, if known.
	span: Option<Range<usize>>,
}

/// An arena-backed document tree.
///
/// Nodes are never freed. A node replaced through
/// [`Document::replace_with_fragments`] is detached from its parent and no
/// longer reachable from the root.
#[derive(Debug, Clone)]
pub struct Document {
	nodes: Vec<NodeData>,
}

impl Default for Document {
	fn default() -> Self {
		Self::new()
	}
}

impl Document {
	pub fn new() -> Self {
		Self {
			nodes: vec![NodeData {
				payload: Payload::Root,
				parent: None,
				children: Vec::new(),
				span: None,
			}],
		}
	}

	pub fn root(&self) -> NodeId {
		NodeId(0)
	}

	pub fn append(&mut self, parent: NodeId, payload: Payload) -> NodeId {
		self.append_with_span(parent, payload, None)
	}

	pub fn append_with_span(
		&mut self,
		parent: NodeId,
		payload: Payload,
		span: Option<Range<usize>>,
	) -> NodeId {
		let id = self.push_detached(payload, span);
		self.nodes[id.0].parent = Some(parent);
		self.nodes[parent.0].children.push(id);
		id
	}

	pub fn node(&self, id: NodeId) -> NodeRef<'_> {
		NodeRef { document: self, id }
	}

	pub fn payload(&self, id: NodeId) -> &Payload {
		&self.nodes[id.0].payload
	}

	pub fn children(&self, id: NodeId) -> &[NodeId] {
		&self.nodes[id.0].children
	}

	pub fn span(&self, id: NodeId) -> Option<Range<usize>> {
		self.nodes[id.0].span.clone()
	}

	/// The value of a text node.
	pub fn text(&self, id: NodeId) -> Option<&str> {
		match self.payload(id) {
			Payload::Text(value) => Some(value),
			_ => None,
		}
	}

	/// Every node reachable from the root, in document order.
	pub fn descendants(&self) -> Vec<NodeId> {
		let mut ordered = Vec::with_capacity(self.nodes.len());
		let mut stack = vec![self.root()];

		while let Some(id) = stack.pop() {
			ordered.push(id);
			stack.extend(self.children(id).iter().rev().copied());
		}

		ordered
	}

	/// Text nodes reachable from the root, in document order.
	pub fn text_nodes(&self) -> Vec<NodeId> {
		self.descendants()
			.into_iter()
			.filter(|id| matches!(self.payload(*id), Payload::Text(_)))
			.collect()
	}

	/// Link nodes reachable from the root, in document order.
	pub fn links(&self) -> Vec<NodeId> {
		self.descendants()
			.into_iter()
			.filter(|id| matches!(self.payload(*id), Payload::Link { .. }))
			.collect()
	}

	/// Concatenated value of every reachable text node.
	pub fn plain_text(&self) -> String {
		self.text_nodes()
			.into_iter()
			.filter_map(|id| self.text(id))
			.collect()
	}

	/// Replace `id` in its parent's children with nodes built from
	/// `fragments`, keeping sibling order. Link fragments become a link node
	/// with a single text child. Returns the ids of the inserted nodes; a node
	/// without a parent is left alone.
	pub fn replace_with_fragments(&mut self, id: NodeId, fragments: Vec<Fragment>) -> Vec<NodeId> {
		let Some(parent) = self.nodes[id.0].parent else {
			return Vec::new();
		};
		let Some(index) = self.children(parent).iter().position(|child| *child == id) else {
			return Vec::new();
		};

		let mut inserted = Vec::with_capacity(fragments.len());
		for fragment in fragments {
			let new_id = match fragment {
				Fragment::Text(value) => self.push_detached(Payload::Text(value), None),
				Fragment::Link(link) => {
					let link_id = self.push_detached(
						Payload::Link {
							url: link.url,
							classes: link.classes,
							style: link.style,
						},
						None,
					);
					let text_id = self.push_detached(Payload::Text(link.text), None);
					self.nodes[text_id.0].parent = Some(link_id);
					self.nodes[link_id.0].children.push(text_id);
					link_id
				}
			};
			self.nodes[new_id.0].parent = Some(parent);
			inserted.push(new_id);
		}

		let children = &mut self.nodes[parent.0].children;
		children.remove(index);
		for (offset, new_id) in inserted.iter().enumerate() {
			children.insert(index + offset, *new_id);
		}
		self.nodes[id.0].parent = None;

		inserted
	}

	fn push_detached(&mut self, payload: Payload, span: Option<Range<usize>>) -> NodeId {
		let id = NodeId(self.nodes.len());
		self.nodes.push(NodeData {
			payload,
			parent: None,
			children: Vec::new(),
			span,
		});
		id
	}
}

/// A borrowed handle to one node, implementing [`Node`].
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'d> {
	document: &'d Document,
	id: NodeId,
}

impl NodeRef<'_> {
	pub fn id(&self) -> NodeId {
		self.id
	}
}

impl Node for NodeRef<'_> {
	fn parent(&self) -> Option<Self> {
		self.document.nodes[self.id.0]
			.parent
			.map(|id| self.document.node(id))
	}

	fn kind(&self) -> NodeKind {
		self.document.payload(self.id).kind()
	}
}
