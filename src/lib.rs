//! Shared expenses for a trip: who paid what, who owes what, and who should
//! pay whom to settle up.

pub mod cli;
pub mod error_handler;
pub mod input;
pub mod ledger;
pub mod output;
pub mod provider;
pub mod run;
pub mod store;

pub use cli::Cli;
