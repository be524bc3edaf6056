use super::{round_money, Amount, BalanceRow};

/// A suggested direct payment: `from` pays `amount` to `to`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferInstruction {
    pub from: String,
    pub to: String,
    pub amount: Amount,
}

// What a debtor still has to pay, or a creditor still has to receive.
// Only lives for the duration of one `settle` call.
struct Outstanding<'a> {
    name: &'a str,
    remaining: Amount,
}

/// Turn balances into a list of payments that brings every balance to zero.
///
/// This is greedy: the largest debtor pays the largest creditor first, and so
/// on. It keeps the list short, but doesn't guarantee the smallest possible
/// number of payments.
///
/// Participants with equal amounts keep their relative order from `rows`, so
/// the same rows always give the same payments.
pub fn settle(rows: &[BalanceRow]) -> Vec<TransferInstruction> {
    let mut debtors: Vec<Outstanding> = Vec::new();
    let mut creditors: Vec<Outstanding> = Vec::new();

    for row in rows {
        let balance = round_money(row.balance);
        if balance < Amount::ZERO {
            debtors.push(Outstanding {
                name: &row.name,
                remaining: -balance,
            });
        } else if balance > Amount::ZERO {
            creditors.push(Outstanding {
                name: &row.name,
                remaining: balance,
            });
        }
    }

    // `sort_by` is stable: ties keep their input order.
    debtors.sort_by(|a, b| b.remaining.cmp(&a.remaining));
    creditors.sort_by(|a, b| b.remaining.cmp(&a.remaining));

    let mut transfers = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < debtors.len() && j < creditors.len() {
        if debtors[i].remaining <= Amount::ZERO {
            i += 1;
            continue;
        }
        if creditors[j].remaining <= Amount::ZERO {
            j += 1;
            continue;
        }

        let amount = round_money(debtors[i].remaining.min(creditors[j].remaining));
        transfers.push(TransferInstruction {
            from: debtors[i].name.to_string(),
            to: creditors[j].name.to_string(),
            amount,
        });
        debtors[i].remaining -= amount;
        creditors[j].remaining -= amount;
    }

    tracing::debug!(
        debtors = debtors.len(),
        creditors = creditors.len(),
        transfers = transfers.len(),
        "settled balances"
    );

    transfers
}
