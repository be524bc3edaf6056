use super::{
    allocate, round_money, Amount, ExpenseId, LedgerError, Participant, ParticipantId, Share,
    TripId,
};

/// An expense paid by one participant and shared evenly between several.
///
/// Records only reference other entities by id. Once built, an expense and its
/// shares never change: editing means deleting and recreating the expense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub id: ExpenseId,
    pub trip: TripId,
    pub description: String,
    pub amount: Amount,
    pub payer: ParticipantId,
    pub shares: Vec<Share>,
}

impl ExpenseRecord {
    /// Build an expense and its shares, after checking that the payer and
    /// every participant belong to `trip`. The amount is kept rounded to cents.
    ///
    /// Either the whole expense is built, or an error is returned.
    pub fn new(
        id: ExpenseId,
        trip: TripId,
        description: &str,
        amount: Amount,
        payer: &Participant,
        participants: &[Participant],
    ) -> Result<Self, LedgerError> {
        let shares = allocate(amount, participants)?;

        if payer.trip != trip {
            return Err(LedgerError::PayerNotInTrip {
                trip,
                payer: payer.id,
            });
        }

        if let Some(outsider) = participants.iter().find(|p| p.trip != trip) {
            return Err(LedgerError::InvalidParticipant {
                trip,
                participant: outsider.id,
            });
        }

        Ok(Self {
            id,
            trip,
            description: description.trim().to_string(),
            amount: round_money(amount),
            payer: payer.id,
            shares,
        })
    }

    /// Sum of the shares. It can differ from `amount` by a few cents, because
    /// shares are rounded independently.
    pub fn allocated(&self) -> Amount {
        self.shares.iter().map(|share| share.amount).sum()
    }

    /// Difference between what was paid and what was allocated to participants.
    pub fn rounding_drift(&self) -> Amount {
        self.amount - self.allocated()
    }

    pub fn is_shared_by(&self, participant: ParticipantId) -> bool {
        self.shares.iter().any(|share| share.participant == participant)
    }
}
