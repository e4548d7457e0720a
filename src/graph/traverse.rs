//! Label-restricted reachability, per-label transitive closure and
//! shortest-path search.

use std::collections::{HashMap, HashSet, VecDeque};
use std::rc::Rc;

use super::{Edge, Graph, Node, NodeKey};

impl Graph {
    /// Nodes reachable from `start` through edges carrying `label`, in
    /// depth-first pre-order, starting with `start` itself.
    ///
    /// Edges are followed from either endpoint. Nodes are matched by
    /// identity, so a different instance with the same key is a different
    /// node here.
    pub fn reachable(&self, start: &Rc<Node>, label: &str) -> Vec<Rc<Node>> {
        let mut visited: HashSet<*const Node> = HashSet::new();
        let mut order = vec![start.clone()];
        visited.insert(Rc::as_ptr(start));

        // Each frame remembers where its edge scan stopped, which keeps the
        // visiting order identical to a recursive walk.
        let mut stack: Vec<(Rc<Node>, usize)> = vec![(start.clone(), 0)];

        while let Some((current, next_edge)) = stack.last_mut() {
            let mut descend = None;
            while *next_edge < self.edges.len() {
                let edge = &self.edges[*next_edge];
                *next_edge += 1;

                if !edge.has_label(label) {
                    continue;
                }
                if let Some(neighbor) = edge.other(current) {
                    if visited.insert(Rc::as_ptr(neighbor)) {
                        descend = Some(neighbor.clone());
                        break;
                    }
                }
            }

            match descend {
                Some(next) => {
                    order.push(next.clone());
                    stack.push((next, 0));
                }
                None => {
                    stack.pop();
                }
            }
        }

        order
    }

    /// Add a direct single-label edge between every pair of nodes connected
    /// by a path of edges sharing that label. Existing edges are kept.
    ///
    /// Every label is closed over the edges present before the call. Returns
    /// the number of edges added.
    pub fn compress(&mut self) -> usize {
        let mut added: Vec<Edge> = Vec::new();

        for label in self.labels() {
            let mut pending: Vec<Edge> = Vec::new();

            for node in &self.nodes {
                for target in self.reachable(node, &label) {
                    if Rc::ptr_eq(node, &target) {
                        continue;
                    }
                    let connected = self
                        .edges
                        .iter()
                        .chain(pending.iter())
                        .any(|e| e.joins(node, &target) && e.has_label(&label));
                    if !connected {
                        pending.push(Edge::new(node.clone(), target, [label.clone()]));
                    }
                }
            }

            log::debug!("label {}: {} closure edges", label, pending.len());
            added.extend(pending);
        }

        let count = added.len();
        self.edges.extend(added);
        count
    }

    /// Shortest path from `src` to `dest` over edges of any label.
    ///
    /// Nodes are matched by key, not identity. Ties go to the edge inserted
    /// first. Returns `None` when `dest` cannot be reached.
    pub fn find_path(&self, src: &Rc<Node>, dest: &Node) -> Option<Vec<Rc<Node>>> {
        let mut parents: HashMap<NodeKey, (Rc<Node>, Option<NodeKey>)> = HashMap::new();
        let mut queue: VecDeque<Rc<Node>> = VecDeque::new();

        parents.insert(src.key, (src.clone(), None));
        queue.push_back(src.clone());

        while let Some(current) = queue.pop_front() {
            if current.same_key(dest) {
                return Some(unwind(&parents, current.key));
            }

            for edge in &self.edges {
                let next = if edge.left().same_key(&current) {
                    edge.right()
                } else if edge.right().same_key(&current) {
                    edge.left()
                } else {
                    continue;
                };
                if !parents.contains_key(&next.key) {
                    parents.insert(next.key, (next.clone(), Some(current.key)));
                    queue.push_back(next.clone());
                }
            }
        }

        None
    }
}

fn unwind(parents: &HashMap<NodeKey, (Rc<Node>, Option<NodeKey>)>, end: NodeKey) -> Vec<Rc<Node>> {
    let mut path = Vec::new();
    let mut cursor = Some(end);
    while let Some(key) = cursor {
        let Some((node, parent)) = parents.get(&key) else {
            break;
        };
        path.push(node.clone());
        cursor = *parent;
    }
    path.reverse();
    path
}
