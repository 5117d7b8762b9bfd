//! Data model for the student dashboard
//!
//! The student table is loaded once per session into a [`BaseTable`] and never mutated.
//! Every aggregation derives a new [`SummaryTable`] from it.

pub mod field;
pub mod record;
pub mod summary;
pub mod table;

pub use field::{Field, KeyValue, OTHER_LABEL};
pub use record::StudentRecord;
pub use summary::{SummaryRow, SummaryTable};
pub use table::{BaseTable, Dataset, DatedRecord, RejectReason, RejectedRow, YearTable};
