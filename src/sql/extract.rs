//! Pattern-driven extraction of tables, primary keys and foreign keys.
//!
//! The extractor does not attempt to understand full SQL. It recognises a
//! handful of statement shapes common in DDL dumps and skips everything else:
//!
//! - `CREATE TABLE [IF NOT EXISTS] [schema.]name ( body );`
//! - `PRIMARY KEY ( cols )` inside a table body, or `col TYPE PRIMARY KEY`
//! - `[CONSTRAINT x] FOREIGN KEY ( cols ) REFERENCES [schema.]t ( cols )` and
//!   `col TYPE REFERENCES [schema.]t ( cols )` inside a table body
//! - `ALTER TABLE [ONLY] [schema.]name ADD CONSTRAINT x PRIMARY KEY ( cols ), ...;`
//! - `ALTER TABLE [ONLY] [schema.]name ADD CONSTRAINT x FOREIGN KEY ( cols )
//!   REFERENCES [schema.]t ( cols ), ...;`
//!
//! Keywords are matched in upper case only. Table bodies are split on commas
//! without looking at parentheses, so a type such as `NUMERIC(10, 2)` yields
//! an extra fragment.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};

use super::schema::{ForeignKey, ParsedSchema};

/// A `--` comment, or a string literal / quoted identifier that may contain `--`.
static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"('(?:[^']|'')*'|"[^"]*")|--[^\n]*"#).unwrap());

static CREATE_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)CREATE TABLE\s+(?:IF NOT EXISTS\s+)?(?:(?:"[^"]+"|\w+)\.)?(?:"([^"]+)"|(\w+))\s*\((.*?)\);"#,
    )
    .unwrap()
});

static TABLE_PRIMARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"PRIMARY KEY\s*\(([^)]*)\)").unwrap());

static COLUMN_PRIMARY_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bPRIMARY KEY\b").unwrap());

static TABLE_FOREIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"FOREIGN KEY\s*\(([^)]+)\)\s*REFERENCES\s+(?:(?:"[^"]+"|\w+)\.)?(?:"([^"]+)"|(\w+))\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

static COLUMN_REFERENCES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\bREFERENCES\s+(?:(?:"[^"]+"|\w+)\.)?(?:"([^"]+)"|(\w+))\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

static ALTER_TABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)ALTER TABLE\s+(?:IF EXISTS\s+)?(?:ONLY\s+)?(?:(?:"[^"]+"|\w+)\.)?(?:"([^"]+)"|(\w+))\s+(ADD\b[^;]*);"#,
    )
    .unwrap()
});

static ADD_PRIMARY_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ADD CONSTRAINT\s+\S+\s+PRIMARY KEY\s*\(([^)]*)\)").unwrap()
});

static ADD_FOREIGN_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"ADD CONSTRAINT\s+\S+\s+FOREIGN KEY\s*\(([^)]+)\)\s*REFERENCES\s+(?:(?:"[^"]+"|\w+)\.)?(?:"([^"]+)"|(\w+))\s*\(([^)]+)\)"#,
    )
    .unwrap()
});

/// Keywords that can open a table-level clause instead of a column.
const CLAUSE_KEYWORDS: &[&str] = &[
    "CONSTRAINT",
    "PRIMARY",
    "FOREIGN",
    "UNIQUE",
    "CHECK",
    "KEY",
    "INDEX",
    "EXCLUDE",
];

/// Extract tables, primary keys and foreign keys from DDL text.
///
/// Never fails: statements that match no known shape are skipped, so
/// unsupported input degrades to an empty or partial result.
pub fn parse(input: &str) -> ParsedSchema {
    let mut extractor = Extractor::new(input);
    extractor.parse_create_tables();
    extractor.parse_inline_primary_keys();
    extractor.parse_altered_primary_keys();
    extractor.parse_foreign_keys();
    extractor.schema
}

struct Extractor {
    source: String,
    /// Table name -> raw body of its latest definition.
    bodies: BTreeMap<String, String>,
    schema: ParsedSchema,
}

impl Extractor {
    fn new(input: &str) -> Self {
        Self {
            source: strip_comments(input),
            bodies: BTreeMap::new(),
            schema: ParsedSchema::default(),
        }
    }

    fn parse_create_tables(&mut self) {
        for cap in CREATE_TABLE.captures_iter(&self.source) {
            let name = quoted_or_bare(&cap, 1, 2);
            let body = cap.get(3).map_or("", |m| m.as_str());

            let columns: Vec<String> = body
                .split(',')
                .filter_map(|fragment| fragment.split_whitespace().next())
                .map(str::to_string)
                .collect();

            if self.schema.tables.contains_key(&name) {
                log::debug!("table {} redefined, keeping the later definition", name);
            }
            self.schema.tables.insert(name.clone(), columns);
            self.bodies.insert(name, body.to_string());
        }
        log::debug!("found {} table definitions", self.schema.tables.len());
    }

    fn parse_inline_primary_keys(&mut self) {
        for (table, body) in &self.bodies {
            let mut pk_columns = Vec::new();

            if let Some(cap) = TABLE_PRIMARY_KEY.captures(body) {
                pk_columns.extend(ident_list(&cap[1]));
            }

            for fragment in body.split(',') {
                let Some(first) = fragment.split_whitespace().next() else {
                    continue;
                };
                if is_clause_keyword(first) || TABLE_PRIMARY_KEY.is_match(fragment) {
                    continue;
                }
                if COLUMN_PRIMARY_KEY.is_match(fragment) {
                    pk_columns.push(normalize_ident(first));
                }
            }

            if !pk_columns.is_empty() {
                self.schema
                    .primary_keys
                    .entry(table.clone())
                    .or_default()
                    .extend(pk_columns);
            }
        }
    }

    fn parse_altered_primary_keys(&mut self) {
        let mut found = 0;
        for cap in ALTER_TABLE.captures_iter(&self.source) {
            let table = declared_name(&self.schema.tables, quoted_or_bare(&cap, 1, 2));
            for action in ADD_PRIMARY_KEY.captures_iter(&cap[3]) {
                self.schema
                    .primary_keys
                    .entry(table.clone())
                    .or_default()
                    .extend(ident_list(&action[1]));
                found += 1;
            }
        }
        log::debug!("found {} ALTER TABLE primary keys", found);
    }

    fn parse_foreign_keys(&mut self) {
        for (table, body) in &self.bodies {
            let fks = inline_foreign_keys(body);
            if !fks.is_empty() {
                self.schema
                    .foreign_keys
                    .entry(table.clone())
                    .or_default()
                    .extend(fks);
            }
        }

        let mut found = 0;
        for cap in ALTER_TABLE.captures_iter(&self.source) {
            let table = declared_name(&self.schema.tables, quoted_or_bare(&cap, 1, 2));
            for action in ADD_FOREIGN_KEY.captures_iter(&cap[3]) {
                self.schema
                    .foreign_keys
                    .entry(table.clone())
                    .or_default()
                    .push(foreign_key_from(&action, 1, (2, 3), 4));
                found += 1;
            }
        }
        log::debug!("found {} ALTER TABLE foreign keys", found);
    }
}

fn strip_comments(input: &str) -> String {
    LINE_COMMENT
        .replace_all(input, |cap: &Captures| {
            cap.get(1).map_or_else(String::new, |m| m.as_str().to_string())
        })
        .into_owned()
}

/// Spelling of `name` used by its `CREATE TABLE`, so that `ALTER TABLE`
/// facts land under the same key whatever case the dump uses.
fn declared_name(tables: &BTreeMap<String, Vec<String>>, name: String) -> String {
    if tables.contains_key(&name) {
        return name;
    }
    let lower = name.to_lowercase();
    tables
        .keys()
        .find(|key| key.to_lowercase() == lower)
        .cloned()
        .unwrap_or(name)
}

/// Foreign keys declared inside a table body, in textual order.
fn inline_foreign_keys(body: &str) -> Vec<ForeignKey> {
    let mut spans = Vec::new();
    let mut found: Vec<(usize, ForeignKey)> = Vec::new();
    for cap in TABLE_FOREIGN_KEY.captures_iter(body) {
        let Some(whole) = cap.get(0) else {
            continue;
        };
        spans.push(whole.range());
        found.push((whole.start(), foreign_key_from(&cap, 1, (2, 3), 4)));
    }

    let mut offset = 0;
    for fragment in body.split(',') {
        let start = offset;
        let end = start + fragment.len();
        offset = end + 1;

        // Fragments of a split `FOREIGN KEY (a, b) REFERENCES t (x, y)` clause.
        if spans.iter().any(|span| start < span.end && span.start < end) {
            continue;
        }
        let Some(first) = fragment.split_whitespace().next() else {
            continue;
        };
        if is_clause_keyword(first) {
            continue;
        }
        if let Some(cap) = COLUMN_REFERENCES.captures(fragment) {
            found.push((
                start,
                ForeignKey {
                    columns: vec![normalize_ident(first)],
                    ref_table: quoted_or_bare(&cap, 1, 2).to_lowercase(),
                    ref_columns: ident_list(&cap[3]),
                },
            ));
        }
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, fk)| fk).collect()
}

fn foreign_key_from(cap: &Captures, columns: usize, table: (usize, usize), refs: usize) -> ForeignKey {
    ForeignKey {
        columns: ident_list(&cap[columns]),
        ref_table: quoted_or_bare(cap, table.0, table.1).to_lowercase(),
        ref_columns: ident_list(&cap[refs]),
    }
}

/// Pick whichever of two alternative groups matched: a quoted name or a bare one.
fn quoted_or_bare(cap: &Captures, quoted: usize, bare: usize) -> String {
    cap.get(quoted)
        .or_else(|| cap.get(bare))
        .map_or_else(String::new, |m| m.as_str().to_string())
}

fn ident_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_ident)
        .filter(|s| !s.is_empty())
        .collect()
}

fn normalize_ident(raw: &str) -> String {
    raw.trim().trim_matches(|c| c == '"' || c == '`').to_lowercase()
}

fn is_clause_keyword(token: &str) -> bool {
    CLAUSE_KEYWORDS.contains(&token)
}
