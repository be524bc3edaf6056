use super::{round_money, Amount, LedgerError, Participant, ParticipantId};

/// The portion of one expense attributed to one participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub participant: ParticipantId,
    pub amount: Amount,
}

/// Split `amount` evenly between `participants`, one share each, in the same
/// order as the participants.
///
/// `amount` is rounded to cents first, so `0.004` is not a positive amount.
/// Then every share is rounded to cents on its own: nothing redistributes the
/// remainder. The shares of 100.00 split in 3 are 33.33 each, so they add up to
/// 99.99. The sum can drift from the rounded amount by up to
/// `(count - 1) * 0.01`.
pub fn allocate(amount: Amount, participants: &[Participant]) -> Result<Vec<Share>, LedgerError> {
    if participants.is_empty() {
        return Err(LedgerError::EmptyParticipantSet);
    }

    let amount = round_money(amount);
    if amount <= Amount::ZERO {
        return Err(LedgerError::NonPositiveAmount(amount));
    }

    let share_amount = round_money(amount / Amount::from(participants.len()));

    Ok(participants
        .iter()
        .map(|participant| Share {
            participant: participant.id,
            amount: share_amount,
        })
        .collect())
}
