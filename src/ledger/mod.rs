//! Computes who owes what within a trip.
//!
//! The pipeline is made of three pure steps:
//! - `share::allocate`: splits an expense evenly between its participants.
//! - `summary::summarize`: aggregates paid and consumed amounts per participant.
//! - `settle::settle`: turns balances into a list of direct payments.

pub mod error;
pub mod expense;
pub mod participant;
pub mod settle;
pub mod share;
pub mod summary;

pub use error::LedgerError;
pub use expense::ExpenseRecord;
pub use participant::Participant;
pub use settle::{settle, TransferInstruction};
pub use share::{allocate, Share};
pub use summary::{summarize, BalanceRow};

use rust_decimal::RoundingStrategy;

// Using named types doesn't provide any compiler help, but it helps a lot with
// readability.
// Consider the following, when building the lookup tables:
// (1) participants: BTreeMap<u64, Participant>
// (2) participants: BTreeMap<ParticipantId, Participant>
// Implementation (1) would most likely need comments, and could be confusing.
// Implementation (2) is self-explanatory.
pub type TripId = u64;
pub type ParticipantId = u64;
pub type ExpenseId = u64;

// Money is handled with a decimal library instead of floats, so cents never
// drift because of binary representation.
pub type Amount = rust_decimal::Decimal;
pub const DECIMAL_PRECISION: u32 = 2;

/// Round an amount to cents, half away from zero, and force exactly two
/// fractional digits (so `90` is presented as `90.00`).
pub fn round_money(amount: Amount) -> Amount {
    let mut rounded =
        amount.round_dp_with_strategy(DECIMAL_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PRECISION);
    // -0.004 rounds to zero, which must not be presented as "-0.00".
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

#[test]
// Half-cents are rounded up (away from zero), and the scale is always 2.
fn test_round_money() {
    use rust_decimal_macros::dec;

    for (raw_amount, want) in vec![
        (dec!(90), "90.00"),
        (dec!(1.5), "1.50"),
        (dec!(0.005), "0.01"),
        (dec!(0.0049), "0.00"),
        (dec!(33.3333333), "33.33"),
        (dec!(66.665), "66.67"),
        (dec!(-0.005), "-0.01"),
        (dec!(-30.004), "-30.00"),
        (dec!(-0.004), "0.00"),
    ] {
        assert_eq!(want, round_money(raw_amount).to_string());
    }
}
