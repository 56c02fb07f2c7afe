//! Viewer table construction and decoding.

pub mod build;
pub mod model;
pub mod parse;
pub mod shared;

pub use build::{CallSite, CallSiteSink, SourceScanner, TableBuilder};
pub use model::{DecodedTable, TableEntry};
pub use parse::{parse_table, ParseError};
pub use shared::SharedSink;
