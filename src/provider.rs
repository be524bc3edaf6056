//! Interfaces the ledger uses to reach data it doesn't own.
//!
//! The ledger itself never stores anything. Whatever keeps trips, participants
//! and expenses around implements these traits, and `report` runs the whole
//! computation over one snapshot fetched from them.

use crate::ledger::{
    settle, summarize, Amount, BalanceRow, ExpenseId, ExpenseRecord, LedgerError, Participant,
    ParticipantId, TransferInstruction, TripId,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum StoreError {
    #[error("trip {0} not found")]
    UnknownTrip(TripId),

    #[error("participant {participant} not found in trip {trip}")]
    NotFound {
        trip: TripId,
        participant: ParticipantId,
    },

    #[error("expense {expense} not found in trip {trip}")]
    UnknownExpense { trip: TripId, expense: ExpenseId },

    #[error("expense amount is too large for the totals of trip {trip}")]
    Overflow { trip: TripId },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

pub trait ParticipantProvider {
    /// All participants of a trip, in presentation order.
    fn participants(&self, trip: TripId) -> Result<Vec<Participant>, StoreError>;

    /// A single participant, only if they belong to `trip`.
    fn participant(&self, trip: TripId, id: ParticipantId) -> Result<Participant, StoreError>;
}

pub trait ExpenseProvider {
    /// All expenses of a trip, with their shares.
    fn expenses(&self, trip: TripId) -> Result<Vec<ExpenseRecord>, StoreError>;

    /// Split a new expense between `participants` and store it.
    /// Nothing is stored when an error is returned.
    fn create_expense(
        &mut self,
        trip: TripId,
        description: &str,
        amount: Amount,
        payer: ParticipantId,
        participants: &[ParticipantId],
    ) -> Result<ExpenseRecord, StoreError>;
}

/// Balances and suggested payments for one trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub balances: Vec<BalanceRow>,
    pub transfers: Vec<TransferInstruction>,
}

pub fn report<P>(provider: &P, trip: TripId) -> Result<Report, StoreError>
where
    P: ParticipantProvider + ExpenseProvider,
{
    let participants = provider.participants(trip)?;
    let expenses = provider.expenses(trip)?;

    let balances = summarize(&participants, &expenses);
    let transfers = settle(&balances);

    Ok(Report {
        balances,
        transfers,
    })
}
