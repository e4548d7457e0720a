use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

use super::node::Node;

/// An undirected, multi-labeled connection between two nodes.
///
/// The endpoints are stored canonically: `left.key <= right.key`.
#[derive(Debug, Clone)]
pub struct Edge {
    left: Rc<Node>,
    right: Rc<Node>,
    labels: Vec<String>,
}

impl Edge {
    /// Create an edge, swapping the endpoints into canonical orientation.
    /// Repeated labels are kept once, in first-seen order.
    pub fn new<I, S>(a: Rc<Node>, b: Rc<Node>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for label in labels {
            let label = label.into();
            if !unique.contains(&label) {
                unique.push(label);
            }
        }

        let (left, right) = if a.key > b.key { (b, a) } else { (a, b) };
        Self {
            left,
            right,
            labels: unique,
        }
    }

    pub fn left(&self) -> &Rc<Node> {
        &self.left
    }

    pub fn right(&self) -> &Rc<Node> {
        &self.right
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Representative label, used by renderers that show one label per edge.
    pub fn label(&self) -> Option<&str> {
        self.labels.first().map(String::as_str)
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// True when `node` is one of the endpoints (by identity).
    pub fn touches(&self, node: &Rc<Node>) -> bool {
        Rc::ptr_eq(&self.left, node) || Rc::ptr_eq(&self.right, node)
    }

    /// The endpoint opposite `node`, by identity.
    pub fn other(&self, node: &Rc<Node>) -> Option<&Rc<Node>> {
        if Rc::ptr_eq(&self.left, node) {
            Some(&self.right)
        } else if Rc::ptr_eq(&self.right, node) {
            Some(&self.left)
        } else {
            None
        }
    }

    /// True when both edges join the same pair of node instances, in either
    /// orientation.
    pub fn joins(&self, a: &Rc<Node>, b: &Rc<Node>) -> bool {
        (Rc::ptr_eq(&self.left, a) && Rc::ptr_eq(&self.right, b))
            || (Rc::ptr_eq(&self.left, b) && Rc::ptr_eq(&self.right, a))
    }

    /// Duplicate check used on insertion: same endpoint instances and the
    /// same label set, ignoring label order.
    pub fn is_duplicate_of(&self, other: &Edge) -> bool {
        Rc::ptr_eq(&self.left, &other.left)
            && Rc::ptr_eq(&self.right, &other.right)
            && self.labels.len() == other.labels.len()
            && self.labels.iter().collect::<HashSet<_>>()
                == other.labels.iter().collect::<HashSet<_>>()
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "([{}]: {} <--> {})",
            self.labels.join(", "),
            self.left.key,
            self.right.key
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(key: u32) -> Rc<Node> {
        Rc::new(Node::new(key, vec![]))
    }

    #[test]
    fn test_canonical_orientation() {
        let a = node(1);
        let b = node(2);
        let edge = Edge::new(b.clone(), a.clone(), ["l"]);

        assert!(Rc::ptr_eq(edge.left(), &a));
        assert!(Rc::ptr_eq(edge.right(), &b));
    }

    #[test]
    fn test_labels_deduplicated_in_order() {
        let edge = Edge::new(node(1), node(2), ["b", "a", "b"]);
        assert_eq!(edge.labels(), ["b", "a"]);
        assert_eq!(edge.label(), Some("b"));
        assert!(edge.has_label("a"));
        assert!(!edge.has_label("c"));
    }

    #[test]
    fn test_other_endpoint() {
        let a = node(1);
        let b = node(2);
        let stranger = node(1);
        let edge = Edge::new(a.clone(), b.clone(), ["l"]);

        assert!(Rc::ptr_eq(edge.other(&a).unwrap(), &b));
        assert!(Rc::ptr_eq(edge.other(&b).unwrap(), &a));
        assert!(edge.other(&stranger).is_none());
        assert!(edge.touches(&a));
        assert!(!edge.touches(&stranger));
    }

    #[test]
    fn test_duplicate_ignores_label_order() {
        let a = node(1);
        let b = node(2);
        let e1 = Edge::new(a.clone(), b.clone(), ["x", "y"]);
        let e2 = Edge::new(b.clone(), a.clone(), ["y", "x"]);
        let e3 = Edge::new(a.clone(), b.clone(), ["x"]);

        assert!(e1.is_duplicate_of(&e2));
        assert!(!e1.is_duplicate_of(&e3));
        assert!(!e1.is_duplicate_of(&Edge::new(node(1), b.clone(), ["x", "y"])));
    }

    #[test]
    fn test_display() {
        let edge = Edge::new(node(3), node(1), ["customer_id"]);
        assert_eq!(edge.to_string(), "([customer_id]: 1 <--> 3)");
    }
}
