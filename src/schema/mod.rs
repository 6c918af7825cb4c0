pub mod check;
pub mod types;

pub use check::check_columns;
pub use types::{ColumnMismatch, MismatchReport, SchemaCheck};
