pub mod dividend;
pub mod user;

pub use dividend::{replace_year, DividendPatch, DividendRecord, Frequency, NewDividend, YearAmount, YearAmountParseError};
pub use user::{NewUser, User};
