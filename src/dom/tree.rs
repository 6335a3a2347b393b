//! DocumentTree - arena-backed element tree with insertion tracking
//!
//! An in-memory model of the slice of the host page the filter cares
//! about. Nodes are either elements (tag + attributes + a hidden flag,
//! the `display:none` analog) or text. The tree is an explicit value
//! threaded through every traversal call; there is no ambient global
//! document.
//!
//! Structural mutations queue a `MutationRecord` per insertion, so a
//! driver can replay "what was added since I last looked" the way a
//! host mutation-observer callback would deliver it.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dom::mutation::MutationRecord;

// =============================================================================
// Types
// =============================================================================

/// Copyable handle into the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

/// Node flavor. Only elements carry tags, attributes and visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Element,
    Text,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    /// Lowercase tag name; empty for text nodes
    tag: String,
    /// Text payload; empty for elements
    text: String,
    attrs: HashMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    hidden: bool,
}

impl Node {
    fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element,
            tag: tag.to_ascii_lowercase(),
            text: String::new(),
            attrs: HashMap::new(),
            parent: None,
            children: Vec::new(),
            hidden: false,
        }
    }

    fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text,
            tag: String::new(),
            text: text.to_string(),
            attrs: HashMap::new(),
            parent: None,
            children: Vec::new(),
            hidden: false,
        }
    }
}

// =============================================================================
// DocumentTree
// =============================================================================

/// Arena-backed document tree
pub struct DocumentTree {
    nodes: Vec<Node>,
    root: NodeId,
    pending: Vec<MutationRecord>,
}

impl DocumentTree {
    /// Create a tree holding a single root element (`html`)
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::element("html")],
            root: NodeId(0),
            pending: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    /// Create a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.nodes.push(Node::element(tag));
        NodeId((self.nodes.len() - 1) as u32)
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.nodes.push(Node::text(text));
        NodeId((self.nodes.len() - 1) as u32)
    }

    /// Attach a detached node under an element.
    ///
    /// Rejects dangling ids, text parents, re-attachment and attachment
    /// cycles. A `MutationRecord` is queued only when the parent is
    /// connected to the root: assembling a detached subtree is silent,
    /// and attaching it reports one record, the way a host
    /// mutation-observer on the document would.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), String> {
        let parent_node = self
            .node(parent)
            .ok_or_else(|| format!("append_child: no such parent node {:?}", parent))?;
        if parent_node.kind != NodeKind::Element {
            return Err("append_child: parent is a text node".to_string());
        }
        let child_node = self
            .node(child)
            .ok_or_else(|| format!("append_child: no such child node {:?}", child))?;
        if child_node.parent.is_some() || child == self.root {
            return Err("append_child: child is already attached".to_string());
        }
        if parent == child || self.ancestors(parent).contains(&child) {
            return Err("append_child: attachment would create a cycle".to_string());
        }

        let observed = self.is_connected(parent);
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        if observed {
            self.pending.push(MutationRecord {
                target: parent,
                added: vec![child],
            });
        }
        Ok(())
    }

    /// True when the node sits under the tree root
    pub fn is_connected(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).contains(&self.root)
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.kind(id) == Some(NodeKind::Element)
    }

    /// Lowercase tag name; `None` for text nodes and dangling ids
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .filter(|n| n.kind == NodeKind::Element)
            .map(|n| n.tag.as_str())
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)?.attrs.get(name).map(|v| v.as_str())
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), String> {
        let node = self
            .node_mut(id)
            .ok_or_else(|| format!("set_attr: no such node {:?}", id))?;
        if node.kind != NodeKind::Element {
            return Err("set_attr: text nodes carry no attributes".to_string());
        }
        node.attrs.insert(name.to_string(), value.to_string());
        Ok(())
    }

    /// Concatenated text of the node and its descendants, in document order
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node_id in self.descendants(id) {
            if let Some(node) = self.node(node_id) {
                if node.kind == NodeKind::Text {
                    out.push_str(&node.text);
                }
            }
        }
        out
    }

    // -------------------------------------------------------------------------
    // Traversal
    // -------------------------------------------------------------------------

    /// Preorder walk of the subtree rooted at `id`, `id` included.
    /// Dangling ids yield an empty walk.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.node(current) {
                // reversed so children pop in document order
                for &child in node.children.iter().rev() {
                    stack.push(child);
                }
            }
        }
        out
    }

    /// Parent chain from nearest to farthest, `id` excluded
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.node(id).and_then(|n| n.parent);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.node(ancestor).and_then(|n| n.parent);
        }
        out
    }

    /// Nearest element (self included) whose tag is one of `tags`
    pub fn closest(&self, id: NodeId, tags: &[&str]) -> Option<NodeId> {
        if let Some(tag) = self.tag(id) {
            if tags.contains(&tag) {
                return Some(id);
            }
        }
        self.ancestors(id)
            .into_iter()
            .find(|&a| self.tag(a).map(|t| tags.contains(&t)).unwrap_or(false))
    }

    /// Nearest ancestor that is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id).into_iter().find(|&a| self.is_element(a))
    }

    // -------------------------------------------------------------------------
    // Visibility
    // -------------------------------------------------------------------------

    /// Hide an element (`display:none` analog). Returns true only when the
    /// node was visible before; hiding again is a no-op.
    pub fn hide(&mut self, id: NodeId) -> bool {
        match self.node_mut(id) {
            Some(node) if node.kind == NodeKind::Element && !node.hidden => {
                node.hidden = true;
                true
            }
            _ => false,
        }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.node(id).map(|n| n.hidden).unwrap_or(false)
    }

    // -------------------------------------------------------------------------
    // Insertion queue
    // -------------------------------------------------------------------------

    /// Drain all queued insertion records as one batch, arrival order
    pub fn take_mutations(&mut self) -> Vec<MutationRecord> {
        std::mem::take(&mut self.pending)
    }

    pub fn has_pending_mutations(&self) -> bool {
        !self.pending.is_empty()
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
