pub mod config;
pub mod error;
pub mod report;
pub mod table;

pub use config::{
    ACCENTED_LETTERS, CharWhitelist, CleaningConfig, ColumnRole, ColumnSelection, ColumnSelector,
    MergeSpec, QuotePolicy, RaggedRows,
};
pub use error::{CleanError, Result};
pub use report::{CleaningReport, ColumnReport, RepairWarning};
pub use table::Table;
