// Admin-only dividend operations. The router wraps all of these in the
// access gate, so handlers here can assume an admin session.
pub mod collection;
pub mod record;
pub mod year;

pub use collection::create;
pub use record::{delete, patch};
pub use year::{append_year, YearWriter};
