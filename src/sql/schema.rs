//! Extractor output types.

use std::collections::BTreeMap;

/// A cross-table reference discovered in the DDL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    /// Local columns, lower-cased.
    pub columns: Vec<String>,
    /// Referenced table, lower-cased with any schema prefix stripped.
    pub ref_table: String,
    /// Referenced columns, lower-cased.
    pub ref_columns: Vec<String>,
}

/// Structural facts recovered from a block of DDL text.
///
/// Table names keep the case they were declared with. Callers that need to
/// match a table against a foreign key target should compare lower-cased
/// names, see [`ParsedSchema::table`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSchema {
    /// Table name -> first token of each definition fragment.
    pub tables: BTreeMap<String, Vec<String>>,
    /// Table name -> primary key columns, accumulated from every source.
    pub primary_keys: BTreeMap<String, Vec<String>>,
    /// Table name -> foreign keys in order of discovery.
    pub foreign_keys: BTreeMap<String, Vec<ForeignKey>>,
}

/// Exact match first, then the first key equal ignoring case.
fn lookup<'a, V>(map: &'a BTreeMap<String, V>, name: &str) -> Option<(&'a String, &'a V)> {
    if let Some(entry) = map.get_key_value(name) {
        return Some(entry);
    }
    let lower = name.to_lowercase();
    map.iter().find(|(key, _)| key.to_lowercase() == lower)
}

impl ParsedSchema {
    /// Look up a table's column tokens ignoring case.
    pub fn table(&self, name: &str) -> Option<(&str, &[String])> {
        lookup(&self.tables, name).map(|(key, cols)| (key.as_str(), cols.as_slice()))
    }

    /// Primary key columns for a table, empty when none were declared.
    /// Case is ignored when no exact match exists.
    pub fn primary_key(&self, name: &str) -> &[String] {
        lookup(&self.primary_keys, name)
            .map(|(_, cols)| cols.as_slice())
            .unwrap_or_default()
    }

    /// Foreign keys owned by a table, empty when none were declared.
    /// Case is ignored when no exact match exists.
    pub fn foreign_keys_of(&self, name: &str) -> &[ForeignKey] {
        lookup(&self.foreign_keys, name)
            .map(|(_, fks)| fks.as_slice())
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.primary_keys.is_empty() && self.foreign_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup_ignores_case() {
        let mut schema = ParsedSchema::default();
        schema
            .tables
            .insert("Orders".to_string(), vec!["id".to_string()]);

        let (name, cols) = schema.table("orders").unwrap();
        assert_eq!(name, "Orders");
        assert_eq!(cols, ["id".to_string()]);
        assert!(schema.table("customers").is_none());
    }

    #[test]
    fn test_key_lookups_ignore_case() {
        let mut schema = ParsedSchema::default();
        schema
            .primary_keys
            .insert("orders".to_string(), vec!["order_id".to_string()]);
        schema.foreign_keys.insert(
            "ORDERS".to_string(),
            vec![ForeignKey {
                columns: vec!["customer_id".to_string()],
                ref_table: "customers".to_string(),
                ref_columns: vec!["id".to_string()],
            }],
        );

        assert_eq!(schema.primary_key("Orders"), ["order_id"]);
        assert_eq!(schema.foreign_keys_of("Orders")[0].ref_table, "customers");
        assert!(schema.primary_key("Customers").is_empty());
    }

    #[test]
    fn test_missing_entries_are_empty() {
        let schema = ParsedSchema::default();
        assert!(schema.primary_key("x").is_empty());
        assert!(schema.foreign_keys_of("x").is_empty());
        assert!(schema.is_empty());
    }
}
