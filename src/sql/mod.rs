//! SQL dump to schema facts: tables, primary keys and foreign keys.

mod extract;
mod schema;

pub use extract::parse;
pub use schema::{ForeignKey, ParsedSchema};
