use crate::node::{Fragment, Node};

/// Visitor pattern for traversing content trees immutably
///
/// Default implementations walk the entire tree. Override specific
/// visit_* methods to act on particular nodes.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_fragment(&mut self, fragment: &Fragment) {
        walk_nodes(self, &fragment.children);
    }
}

/// Mutable visitor pattern for transforming content trees
pub trait VisitorMut: Sized {
    fn visit_node_mut(&mut self, node: &mut Node) {
        walk_node_mut(self, node);
    }

    fn visit_fragment_mut(&mut self, fragment: &mut Fragment) {
        walk_nodes_mut(self, &mut fragment.children);
    }
}

pub fn walk_nodes<V: Visitor>(visitor: &mut V, nodes: &[Node]) {
    for node in nodes {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Paragraph { children }
        | Node::Heading { children, .. }
        | Node::Link { children, .. } => walk_nodes(visitor, children),
        Node::Clause(fragment) => visitor.visit_fragment(fragment),
        Node::Text { .. } | Node::Variable { .. } | Node::Formula { .. } => {
            // Leaf nodes
        }
    }
}

pub fn walk_nodes_mut<V: VisitorMut>(visitor: &mut V, nodes: &mut [Node]) {
    for node in nodes {
        visitor.visit_node_mut(node);
    }
}

pub fn walk_node_mut<V: VisitorMut>(visitor: &mut V, node: &mut Node) {
    match node {
        Node::Paragraph { children }
        | Node::Heading { children, .. }
        | Node::Link { children, .. } => walk_nodes_mut(visitor, children),
        Node::Clause(fragment) => visitor.visit_fragment_mut(fragment),
        Node::Text { .. } | Node::Variable { .. } | Node::Formula { .. } => {
            // Leaf nodes
        }
    }
}

/// Collect every node matching `predicate`, depth first
pub fn find_nodes<'a, F>(nodes: &'a [Node], predicate: F) -> Vec<&'a Node>
where
    F: Fn(&Node) -> bool,
{
    let mut found = Vec::new();
    collect(nodes, &predicate, &mut found);
    found
}

fn collect<'a, F>(nodes: &'a [Node], predicate: &F, found: &mut Vec<&'a Node>)
where
    F: Fn(&Node) -> bool,
{
    for node in nodes {
        if predicate(node) {
            found.push(node);
        }
        if let Some(children) = node.children() {
            collect(children, predicate, found);
        }
    }
}
