//! SQLite backend: SQL translation, row decoding and statement runners.

pub mod decode;
pub mod exec;
pub mod translator;

pub use decode::decode_row;
pub use translator::SqliteQuery;
