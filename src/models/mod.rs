//! Database-backed models and ledger result types.

pub mod balance;
pub mod user;

pub use balance::{exact_sum, format_amount, AdjustOutcome, SumError};
pub use user::User;
