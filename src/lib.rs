pub mod builder;
pub mod config;
pub mod error;
pub mod graph;
pub mod render;
pub mod sql;

use wasm_bindgen::prelude::*;

use builder::{build_graph, DetailLevel};
use render::render_dot;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render the relationship graph of a DDL dump as Graphviz DOT.
///
/// `tables` is a comma-separated allow-list; when absent every table is used.
#[wasm_bindgen(js_name = "ddlToDot")]
pub fn ddl_to_dot(
    source: &str,
    tables: Option<String>,
    detail: Option<String>,
    compress: bool,
) -> Result<String, String> {
    let detail_level = match detail.as_deref() {
        Some(s) => DetailLevel::from_str(s).ok_or_else(|| format!("Invalid detail level: {}", s))?,
        None => DetailLevel::All,
    };
    let tables: Vec<String> = tables
        .as_deref()
        .map(split_table_list)
        .unwrap_or_default();

    let schema = sql::parse(source);
    let mut built = build_graph(&schema, &tables, detail_level);
    if compress {
        built.graph.compress();
    }

    Ok(render_dot(&built))
}

/// Split a comma-separated table list, dropping blanks.
pub fn split_table_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
