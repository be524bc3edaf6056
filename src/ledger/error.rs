use super::{Amount, ParticipantId, TripId};

use thiserror::Error;

/// Reasons an expense can be rejected.
///
/// These are all caller input problems: nothing is retried, and nothing is
/// partially applied when one of them is returned.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum LedgerError {
    /// No participant was selected to share the expense.
    #[error("an expense must be shared by at least one participant")]
    EmptyParticipantSet,

    /// Expenses must cost something.
    #[error("expense amount must be greater than zero, got {0}")]
    NonPositiveAmount(Amount),

    /// A selected participant doesn't exist, or belongs to another trip.
    #[error("participant {participant} is not part of trip {trip}")]
    InvalidParticipant {
        trip: TripId,
        participant: ParticipantId,
    },

    /// The payer doesn't exist, or belongs to another trip.
    #[error("payer {payer} is not part of trip {trip}")]
    PayerNotInTrip { trip: TripId, payer: ParticipantId },
}
