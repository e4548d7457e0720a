//! Build a relationship graph from extracted schema facts.

use std::collections::{BTreeMap, HashMap};
use std::rc::Rc;

use crate::graph::{Edge, Graph, Node, NodeKey};
use crate::sql::ParsedSchema;

/// How much of each table ends up in its node payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    Tables,
    Pk,
    #[default]
    All,
}

impl DetailLevel {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "tables" => Some(Self::Tables),
            "pk" => Some(Self::Pk),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

/// A graph together with the table each node stands for.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    pub graph: Graph,
    /// Lower-cased table name -> node.
    nodes: HashMap<String, Rc<Node>>,
    /// Node key -> table name as declared.
    names: BTreeMap<NodeKey, String>,
}

impl SchemaGraph {
    pub fn node_for(&self, table: &str) -> Option<&Rc<Node>> {
        self.nodes.get(&table.to_lowercase())
    }

    pub fn table_name(&self, key: NodeKey) -> Option<&str> {
        self.names.get(&key).map(String::as_str)
    }

    /// Shortest path between two tables, as table names.
    pub fn find_path_between(&self, from: &str, to: &str) -> Option<Vec<String>> {
        let src = self.node_for(from)?;
        let dest = self.node_for(to)?;
        let path = self.graph.find_path(src, dest)?;
        Some(
            path.iter()
                .map(|n| {
                    self.table_name(n.key)
                        .map_or_else(|| n.key.to_string(), str::to_string)
                })
                .collect(),
        )
    }
}

/// Turn the tables named in `tables` into nodes and their foreign keys into
/// edges.
///
/// The table at position `i` of the allow-list gets key `i + 1`; entries that
/// were never defined are skipped, leaving a gap in the keys. An empty
/// allow-list takes every defined table. Foreign keys are kept only when both
/// the owning and the referenced table became nodes, and are labeled with
/// their local columns.
pub fn build_graph(schema: &ParsedSchema, tables: &[String], detail: DetailLevel) -> SchemaGraph {
    let wanted: Vec<&str> = if tables.is_empty() {
        schema.tables.keys().map(String::as_str).collect()
    } else {
        tables.iter().map(String::as_str).collect()
    };

    let mut result = SchemaGraph::default();

    for (index, wanted_name) in wanted.iter().enumerate() {
        let Some((name, columns)) = schema.table(wanted_name) else {
            log::warn!("table {} is not defined in the input, skipping", wanted_name);
            continue;
        };
        let lower = name.to_lowercase();
        if result.nodes.contains_key(&lower) {
            log::warn!("table {} listed more than once, keeping the first", name);
            continue;
        }

        let payload = match detail {
            DetailLevel::Tables => Vec::new(),
            DetailLevel::Pk => schema.primary_key(name).to_vec(),
            DetailLevel::All => columns.to_vec(),
        };
        let key = NodeKey::try_from(index + 1).unwrap_or(NodeKey::MAX);
        let node = Rc::new(Node::new(key, payload));

        result.graph.add_node(node.clone());
        result.nodes.insert(lower, node);
        result.names.insert(key, name.to_string());
    }

    for (owner, fks) in &schema.foreign_keys {
        let Some(left) = result.nodes.get(&owner.to_lowercase()) else {
            continue;
        };
        for fk in fks {
            let Some(right) = result.nodes.get(&fk.ref_table) else {
                log::debug!("{} -> {}: target not in graph", owner, fk.ref_table);
                continue;
            };
            result
                .graph
                .add_edge(Edge::new(left.clone(), right.clone(), fk.columns.iter().cloned()));
        }
    }

    log::info!(
        "built graph with {} nodes and {} edges",
        result.graph.nodes().len(),
        result.graph.edges().len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parse;

    const SHOP: &str = r#"
        CREATE TABLE customers (
            customer_id INT PRIMARY KEY,
            name TEXT
        );
        CREATE TABLE Orders (
            order_id INT,
            customer_id INT,
            PRIMARY KEY (order_id)
        );
        CREATE TABLE audit (
            id INT
        );
        ALTER TABLE ONLY public.Orders
            ADD CONSTRAINT orders_customer_fk FOREIGN KEY (customer_id) REFERENCES public.customers(customer_id);
        ALTER TABLE ONLY public.audit
            ADD CONSTRAINT audit_fk FOREIGN KEY (id) REFERENCES ghosts(id);
    "#;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_keys_follow_allow_list_positions() {
        let schema = parse(SHOP);
        let built = build_graph(&schema, &names(&["missing", "orders", "customers"]), DetailLevel::All);

        assert_eq!(built.graph.nodes().len(), 2);
        assert_eq!(built.node_for("orders").unwrap().key, 2);
        assert_eq!(built.node_for("CUSTOMERS").unwrap().key, 3);
        assert_eq!(built.table_name(2), Some("Orders"));
        assert!(built.node_for("missing").is_none());
    }

    #[test]
    fn test_foreign_keys_become_edges() {
        let schema = parse(SHOP);
        let built = build_graph(&schema, &names(&["orders", "customers", "audit"]), DetailLevel::All);

        let edges = built.graph.edges();
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].left().key, 1);
        assert_eq!(edges[0].right().key, 2);
        assert_eq!(edges[0].labels(), ["customer_id"]);
    }

    #[test]
    fn test_edges_need_both_endpoints() {
        let schema = parse(SHOP);
        let built = build_graph(&schema, &names(&["orders", "audit"]), DetailLevel::All);
        assert!(built.graph.edges().is_empty());
    }

    #[test]
    fn test_empty_allow_list_takes_all_tables() {
        let schema = parse(SHOP);
        let built = build_graph(&schema, &[], DetailLevel::Tables);

        assert_eq!(built.graph.nodes().len(), 3);
        assert!(built.graph.nodes().iter().all(|n| n.columns.is_empty()));
        assert_eq!(built.graph.edges().len(), 1);
    }

    #[test]
    fn test_detail_levels() {
        let schema = parse(SHOP);
        let tables = names(&["orders"]);

        let all = build_graph(&schema, &tables, DetailLevel::All);
        assert_eq!(all.graph.nodes()[0].columns, ["order_id", "customer_id", "PRIMARY"]);

        let pk = build_graph(&schema, &tables, DetailLevel::Pk);
        assert_eq!(pk.graph.nodes()[0].columns, ["order_id"]);

        assert_eq!(DetailLevel::from_str("pk"), Some(DetailLevel::Pk));
        assert_eq!(DetailLevel::from_str("nope"), None);
    }

    #[test]
    fn test_pk_payload_from_differently_cased_alter() {
        let sql = r#"
            CREATE TABLE Orders (order_id INT, customer_id INT);
            ALTER TABLE ONLY public.orders ADD CONSTRAINT orders_pkey PRIMARY KEY (order_id);
        "#;
        let schema = parse(sql);
        assert_eq!(schema.primary_key("Orders"), ["order_id"]);

        let built = build_graph(&schema, &names(&["orders"]), DetailLevel::Pk);
        assert_eq!(built.graph.nodes()[0].columns, ["order_id"]);
    }

    #[test]
    fn test_duplicate_allow_list_entry_ignored() {
        let schema = parse(SHOP);
        let built = build_graph(&schema, &names(&["orders", "Orders"]), DetailLevel::All);
        assert_eq!(built.graph.nodes().len(), 1);
    }

    #[test]
    fn test_find_path_between_tables() {
        let schema = parse(SHOP);
        let built = build_graph(&schema, &[], DetailLevel::All);

        assert_eq!(
            built.find_path_between("orders", "customers"),
            Some(names(&["Orders", "customers"]))
        );
        assert_eq!(built.find_path_between("orders", "audit"), None);
        assert_eq!(built.find_path_between("orders", "nowhere"), None);
    }
}
