//! Labeled tree arena
//!
//! An [`ExprTree`] owns every node of one parsed expression in a flat arena. Nodes refer to
//! each other through [`NodeId`] handles: children are an ordered list of handles, and the
//! parent link is an optional handle set when a node is attached. Ownership always flows
//! from the tree to its nodes, so a node never outlives the tree that holds it.
//!
//! Equality and hashing are structural. Two nodes are equal when their names match and
//! their children are pairwise equal in order; where they live in their arenas, what their
//! parents are and whether they were written with parentheses play no part.

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::serializer;

/// Order-sensitive mixing factor for [`NodeRef::structural_hash`].
const HASH_MIX: u64 = 37;

/// Handle of a node inside an [`ExprTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A single labeled node stored in the arena; read through [`NodeRef`]
#[derive(Debug, Clone)]
pub(crate) struct ExprNode {
    name: String,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    bracketed: bool,
}

impl ExprNode {
    pub(crate) fn new(name: impl Into<String>, bracketed: bool) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
            parent: None,
            bracketed,
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Attach `child` under `parent`, preserving insertion order.
pub(crate) fn attach(nodes: &mut [ExprNode], parent: NodeId, child: NodeId) {
    nodes[child.0].parent = Some(parent);
    let parent = &mut nodes[parent.0];
    parent.bracketed = true;
    parent.children.push(child);
}

/// Push a detached node into an arena and return its handle.
pub(crate) fn alloc(nodes: &mut Vec<ExprNode>, node: ExprNode) -> NodeId {
    nodes.push(node);
    NodeId(nodes.len() - 1)
}

/// A labeled tree: the untyped shadow of an AST
#[derive(Debug, Clone)]
pub struct ExprTree {
    nodes: Vec<ExprNode>,
    root: NodeId,
}

impl ExprTree {
    /// Create a tree holding a single leaf
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![ExprNode::new(name, false)],
            root: NodeId(0),
        }
    }

    /// Create a tree whose root is written as a parenthesized list, even while empty
    pub fn list(name: impl Into<String>) -> Self {
        Self {
            nodes: vec![ExprNode::new(name, true)],
            root: NodeId(0),
        }
    }

    pub(crate) fn from_arena(nodes: Vec<ExprNode>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn root(&self) -> NodeRef<'_> {
        NodeRef {
            tree: self,
            id: self.root,
        }
    }

    /// Look up a node by handle
    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Append a leaf child named `name` under `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.push(parent, ExprNode::new(name, false))
    }

    /// Append an (initially empty) parenthesized child named `name` under `parent`
    ///
    /// # Panics
    ///
    /// Panics if `parent` does not belong to this tree.
    pub fn add_list_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        self.push(parent, ExprNode::new(name, true))
    }

    fn push(&mut self, parent: NodeId, node: ExprNode) -> NodeId {
        assert!(parent.0 < self.nodes.len(), "parent {parent:?} not in tree");
        let id = alloc(&mut self.nodes, node);
        attach(&mut self.nodes, parent, id);
        id
    }

    /// Total number of nodes in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of nodes on the longest root-to-leaf path
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 1usize)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for child in &self.nodes[id.0].children {
                stack.push((*child, depth + 1));
            }
        }
        deepest
    }

    /// Canonical text of the whole tree
    pub fn to_text(&self) -> String {
        serializer::to_text(self.root())
    }
}

impl PartialEq for ExprTree {
    fn eq(&self, other: &Self) -> bool {
        self.root() == other.root()
    }
}

impl Eq for ExprTree {}

impl Hash for ExprTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root().hash(state);
    }
}

impl fmt::Display for ExprTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Borrowed view of one node together with the tree it lives in
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a ExprTree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    fn node(&self) -> &'a ExprNode {
        &self.tree.nodes[self.id.0]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &'a str {
        self.node().name()
    }

    pub fn is_leaf(&self) -> bool {
        self.node().children.is_empty()
    }

    pub fn is_bracketed(&self) -> bool {
        self.node().bracketed
    }

    pub fn child_count(&self) -> usize {
        self.node().children.len()
    }

    pub fn children(&self) -> impl DoubleEndedIterator<Item = NodeRef<'a>> + ExactSizeIterator + 'a {
        let tree = self.tree;
        self.node()
            .children
            .iter()
            .map(move |id| NodeRef { tree, id: *id })
    }

    pub fn child(&self, index: usize) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.node()
            .children
            .get(index)
            .map(|id| NodeRef { tree, id: *id })
    }

    pub fn parent(&self) -> Option<NodeRef<'a>> {
        let tree = self.tree;
        self.node().parent.map(|id| NodeRef { tree, id })
    }

    /// Hash of the subtree: the name hash, then each child's hash mixed in order
    ///
    /// Walks the subtree with an explicit stack, so hand-built trees of any depth are fine.
    pub fn structural_hash(&self) -> u64 {
        let mut pending = vec![(*self, false)];
        let mut finished: Vec<u64> = Vec::new();
        while let Some((node, expanded)) = pending.pop() {
            if !expanded {
                pending.push((node, true));
                pending.extend(node.children().rev().map(|child| (child, false)));
                continue;
            }
            let mut hasher = DefaultHasher::new();
            node.name().hash(&mut hasher);
            let first_child = finished.len() - node.child_count();
            let hash = finished
                .drain(first_child..)
                .fold(hasher.finish(), |hash, child| {
                    hash.wrapping_mul(HASH_MIX).wrapping_add(child)
                });
            finished.push(hash);
        }
        finished.pop().unwrap_or_default()
    }

    pub fn to_text(&self) -> String {
        serializer::to_text(*self)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(*self, *other)];
        while let Some((a, b)) = pending.pop() {
            if a.name() != b.name() || a.child_count() != b.child_count() {
                return false;
            }
            pending.extend(a.children().zip(b.children()));
        }
        true
    }
}

impl Eq for NodeRef<'_> {}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.structural_hash());
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("name", &self.name())
            .field("children", &self.child_count())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn type_int(value: &str) -> ExprTree {
        let mut tree = ExprTree::list("obj1");
        let header = tree.add_list_child(tree.root_id(), "Type");
        tree.add_child(header, value);
        tree
    }

    #[test]
    fn test_leaf_has_no_children() {
        let tree = ExprTree::new("R5");
        assert!(tree.root().is_leaf());
        assert_eq!(tree.root().name(), "R5");
        assert!(tree.root().parent().is_none());
    }

    #[test]
    fn test_attachment_sets_parent_and_order() {
        let mut tree = ExprTree::list("obj1");
        let first = tree.add_child(tree.root_id(), "R2");
        let second = tree.add_child(tree.root_id(), "R3");

        let names: Vec<_> = tree.root().children().map(|c| c.name()).collect();
        assert_eq!(names, vec!["R2", "R3"]);
        assert_eq!(tree.get(first).unwrap().parent().unwrap().name(), "obj1");
        assert_eq!(tree.get(second).unwrap().parent().unwrap().id(), tree.root_id());
    }

    #[test]
    fn test_structural_equality_ignores_arena_layout() {
        let a = type_int("I3");
        let mut b = ExprTree::list("obj1");
        let header = b.add_list_child(b.root_id(), "Type");
        b.add_child(header, "I3");
        assert_eq!(a, b);
        assert_eq!(a.root().structural_hash(), b.root().structural_hash());
    }

    #[test]
    fn test_structural_inequality() {
        assert_ne!(type_int("I3"), type_int("I4"));
        assert_ne!(ExprTree::new("obj1"), type_int("I3"));
    }

    #[test]
    fn test_hash_is_order_sensitive() {
        let mut a = ExprTree::list("obj1");
        a.add_child(a.root_id(), "R2");
        a.add_child(a.root_id(), "R3");
        let mut b = ExprTree::list("obj1");
        b.add_child(b.root_id(), "R3");
        b.add_child(b.root_id(), "R2");

        assert_ne!(a, b);
        assert_ne!(a.root().structural_hash(), b.root().structural_hash());
    }

    #[test]
    fn test_trees_deduplicate_in_hash_set() {
        let mut set = HashSet::new();
        set.insert(type_int("I3"));
        set.insert(type_int("I3"));
        set.insert(type_int("I9"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_depth_and_count() {
        let tree = type_int("I3");
        assert_eq!(tree.node_count(), 3);
        assert_eq!(tree.depth(), 3);
        assert_eq!(ExprTree::new("R1").depth(), 1);
    }

    fn chain(depth: usize, leaf: &str) -> ExprTree {
        let mut tree = ExprTree::list("obj0");
        let mut parent = tree.root_id();
        for i in 1..depth - 1 {
            parent = tree.add_list_child(parent, format!("obj{i}"));
        }
        tree.add_child(parent, leaf);
        tree
    }

    #[test]
    fn test_hand_built_deep_tree_walks_without_recursion() {
        let depth = 200_000;
        let a = chain(depth, "R1");
        let b = chain(depth, "R1");
        assert_eq!(a.depth(), depth);
        assert_eq!(a, b);
        assert_ne!(a, chain(depth, "R2"));
        assert_eq!(a.root().structural_hash(), b.root().structural_hash());

        let text = a.to_text();
        assert!(text.starts_with("( obj0 ( obj1 ( obj2 "));
        assert!(text.ends_with("R1 ) ) )"));
    }

    #[test]
    fn test_subtree_views_compare_across_trees() {
        let a = type_int("I3");
        let b = type_int("I3");
        assert_eq!(a.root().child(0), b.root().child(0));
        assert!(a.root().child(1).is_none());
    }
}
