use super::{round_money, Amount, ExpenseRecord, Participant, ParticipantId};

use std::collections::HashMap;

/// What one participant paid and consumed over a whole trip.
///
/// Rows are derived on demand and never stored.
/// A positive balance means the participant is owed money, a negative one
/// means they owe money.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub participant: ParticipantId,
    pub name: String,
    pub total_paid: Amount,
    pub total_consumed: Amount,
    pub balance: Amount,
}

// Paid amounts are credits, consumed shares are debits.
#[derive(Default)]
struct Tally {
    paid: Amount,
    consumed: Amount,
}

impl Tally {
    fn balance(&self) -> Amount {
        self.paid - self.consumed
    }
}

/// Build one row per participant, in roster order.
///
/// Sums are exact: only the presented values are rounded to cents. Expenses
/// referencing participants that aren't in the roster are still counted, they
/// just don't get a row.
pub fn summarize(participants: &[Participant], expenses: &[ExpenseRecord]) -> Vec<BalanceRow> {
    let mut tallies: HashMap<ParticipantId, Tally> = HashMap::new();

    for expense in expenses {
        tallies.entry(expense.payer).or_default().paid += expense.amount;

        for share in &expense.shares {
            tallies.entry(share.participant).or_default().consumed += share.amount;
        }
    }

    let rows: Vec<BalanceRow> = participants
        .iter()
        .map(|participant| {
            let empty = Tally::default();
            let tally = tallies.get(&participant.id).unwrap_or(&empty);

            BalanceRow {
                participant: participant.id,
                name: participant.name.clone(),
                total_paid: round_money(tally.paid),
                total_consumed: round_money(tally.consumed),
                balance: round_money(tally.balance()),
            }
        })
        .collect();

    tracing::debug!(
        participants = rows.len(),
        expenses = expenses.len(),
        "summarized trip balances"
    );

    rows
}
