use crate::ledger::{Amount, BalanceRow, ParticipantId, TransferInstruction};
use crate::provider::Report;

use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRecord<'a> {
    participant: &'a str,
    name: &'a str,

    #[serde(rename = "paid")]
    total_paid: Amount,

    #[serde(rename = "consumed")]
    total_consumed: Amount,

    balance: Amount,
}

#[derive(Serialize)]
struct TransferRecord<'a> {
    from: &'a str,
    to: &'a str,
    amount: Amount,
}

const BALANCE_HEADER: [&str; 5] = ["participant", "name", "paid", "consumed", "balance"];
const TRANSFER_HEADER: [&str; 3] = ["from", "to", "amount"];

/// Writes the report to the given stream: balances first, then a blank line,
/// then the transfers.
///
/// `labels` maps participants back to the labels used in the input. Anyone
/// missing from it is written with their id.
pub fn write(
    mut output_stream: impl Write,
    report: &Report,
    labels: &HashMap<ParticipantId, String>,
) -> Result<(), std::io::Error> {
    write_balances(&mut output_stream, &report.balances, labels)?;
    writeln!(output_stream)?;
    write_transfers(&mut output_stream, &report.transfers)?;

    Ok(())
}

// Headers are written by hand, so they are there even when there are no rows.
fn write_balances(
    output_stream: impl Write,
    rows: &[BalanceRow],
    labels: &HashMap<ParticipantId, String>,
) -> Result<(), std::io::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output_stream);
    writer.write_record(BALANCE_HEADER)?;

    for row in rows {
        let id = row.participant.to_string();
        let label = labels.get(&row.participant).unwrap_or(&id);
        writer.serialize(BalanceRecord {
            participant: label,
            name: &row.name,
            total_paid: row.total_paid,
            total_consumed: row.total_consumed,
            balance: row.balance,
        })?;
    }

    writer.flush()
}

fn write_transfers(
    output_stream: impl Write,
    transfers: &[TransferInstruction],
) -> Result<(), std::io::Error> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(output_stream);
    writer.write_record(TRANSFER_HEADER)?;

    for transfer in transfers {
        writer.serialize(TransferRecord {
            from: &transfer.from,
            to: &transfer.to,
            amount: transfer.amount,
        })?;
    }

    writer.flush()
}
