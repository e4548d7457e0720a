use std::fmt;

/// Caller-assigned node identifier.
pub type NodeKey = u32;

/// A table in the relationship graph.
///
/// Nodes are shared between the graph and its edges as `Rc<Node>`. Two
/// handles are the *same node* only when they point at the same allocation
/// (`Rc::ptr_eq`); [`Node::same_key`] is the weaker comparison used by path
/// search, where a different instance carrying the same key must match.
/// `Node` has no `PartialEq`; compare with `Rc::ptr_eq` or `same_key`.
#[derive(Debug, Clone)]
pub struct Node {
    pub key: NodeKey,
    /// Display payload, usually the table's column names.
    pub columns: Vec<String>,
}

impl Node {
    pub fn new(key: NodeKey, columns: Vec<String>) -> Self {
        Self { key, columns }
    }

    pub fn same_key(&self, other: &Node) -> bool {
        self.key == other.key
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn test_same_key_ignores_identity() {
        let a = Rc::new(Node::new(1, vec!["id".to_string()]));
        let b = Rc::new(Node::new(1, vec![]));

        assert!(a.same_key(&b));
        assert!(!Rc::ptr_eq(&a, &b));
        assert!(!a.same_key(&Node::new(2, vec![])));
    }

    #[test]
    fn test_display_is_key() {
        assert_eq!(Node::new(7, vec![]).to_string(), "7");
    }
}
