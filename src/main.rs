use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;

use schemagraph::builder::{build_graph, SchemaGraph};
use schemagraph::config::Config;
use schemagraph::render::{render, Format};
use schemagraph::{split_table_list, sql};

#[derive(Parser, Debug)]
#[command(name = "schemagraph")]
#[command(about = "Build a foreign-key relationship graph from a SQL DDL dump")]
struct Args {
    /// SQL file containing CREATE TABLE / ALTER TABLE statements
    input: PathBuf,

    /// TOML config with the table allow-list and options
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Comma-separated tables to include (overrides the config)
    #[arg(short, long)]
    tables: Option<String>,

    /// Add direct edges for every pair connected through the same column
    #[arg(long)]
    compress: bool,

    /// Node detail: tables, pk, all
    #[arg(short, long)]
    detail: Option<String>,

    /// Output format: text, dot
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Print the shortest path between two tables instead of the graph
    #[arg(long, num_args = 2, value_names = ["FROM", "TO"])]
    path: Option<Vec<String>>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", "info")).init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(tables) = &args.tables {
        config.tables = split_table_list(tables);
    }
    if let Some(detail) = &args.detail {
        config.detail = detail.clone();
    }
    config.compress |= args.compress;
    config.validate()?;

    let detail = config.detail_level();
    let format = Format::from_str(&args.format)
        .with_context(|| format!("Invalid output format: {}", args.format))?;

    let input = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let schema = sql::parse(&input);
    log::info!(
        "parsed {} tables, {} with foreign keys",
        schema.tables.len(),
        schema.foreign_keys.len()
    );

    let mut built = build_graph(&schema, &config.tables, detail);
    if config.compress {
        let added = built.graph.compress();
        log::info!("compression added {} edges", added);
    }

    let output = match &args.path {
        Some(ends) => path_output(&built, &ends[0], &ends[1])?,
        None => render(&built, format),
    };

    match &args.output {
        Some(path) => fs::write(path, &output)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}

fn path_output(built: &SchemaGraph, from: &str, to: &str) -> Result<String> {
    match built.find_path_between(from, to) {
        Some(path) => Ok(format!("{}\n", path.join(" -> "))),
        None => bail!("No path between {} and {}", from, to),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagraph::builder::DetailLevel;

    const SQL: &str = r#"
        CREATE TABLE users (id INT);
        CREATE TABLE posts (id INT, user_id INT REFERENCES users(id));
        CREATE TABLE tags (id INT);
    "#;

    #[test]
    fn test_path_output_joins_tables() {
        let built = build_graph(&sql::parse(SQL), &[], DetailLevel::Tables);
        assert_eq!(path_output(&built, "posts", "users").unwrap(), "posts -> users\n");
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let built = build_graph(&sql::parse(SQL), &[], DetailLevel::Tables);
        let err = path_output(&built, "posts", "tags").unwrap_err();
        assert_eq!(err.to_string(), "No path between posts and tags");
        assert!(path_output(&built, "posts", "nowhere").is_err());
    }
}
