//! Aggregation pipeline over the student table
//!
//! Every transform is a pure function from table to table. None of them mutates its
//! input, so any number of views can read the same [`BaseTable`](crate::model::BaseTable).

pub mod completeness;
pub mod grouping;
pub mod preview;
pub mod ranking;
pub mod share;
pub mod temporal;

pub use completeness::find_missing;
pub use grouping::{group_count, order_by_keys};
pub use preview::preview;
pub use ranking::rank_desc;
pub use share::{add_percentage, collapse_minor};
pub use temporal::{parse_year, year_from_timestamp};
