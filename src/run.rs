use crate::error_handler;
use crate::input::{self, ExpenseEntry, ParticipantEntry};
use crate::ledger::{ParticipantId, TripId};
use crate::output;
use crate::provider::{report, ExpenseProvider, Report, StoreError};
use crate::store::TripStore;

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// Input labels are only meaningful within the files: the store hands out its
// own ids, and this keeps the correspondence both ways.
#[derive(Default)]
struct Labels {
    ids: HashMap<String, ParticipantId>,
    labels: HashMap<ParticipantId, String>,
}

/// Load a trip from CSV participants and expenses, and write its balances and
/// suggested transfers to `output_stream`.
///
/// Invalid records are logged and skipped, the same way expenses the ledger
/// rejects are.
pub fn run(
    trip_name: &str,
    participants_stream: (impl std::io::Read + Send + 'static),
    expenses_stream: (impl std::io::Read + Send + 'static),
    output_stream: impl std::io::Write,
) -> Result<Report, Error> {
    let mut store = TripStore::new();
    let trip = store.create_trip(trip_name).id;

    let (participants, participant_errors) = input::participants(participants_stream);
    let (expenses, expense_errors) = input::expenses(expenses_stream);
    let error_sinks = vec![
        error_handler::sink(participant_errors, "participants"),
        error_handler::sink(expense_errors, "expenses"),
    ];

    let mut labels = Labels::default();
    for entry in participants {
        load_participant(&mut store, trip, &mut labels, entry)?;
    }
    for entry in expenses {
        load_expense(&mut store, trip, &labels, entry);
    }

    let rejected: usize = error_sinks
        .into_iter()
        .map(|sink| sink.join().unwrap_or_default())
        .sum();

    let report = report(&store, trip)?;
    output::write(output_stream, &report, &labels.labels)?;

    tracing::info!(
        participants = report.balances.len(),
        transfers = report.transfers.len(),
        rejected,
        "trip settled"
    );
    Ok(report)
}

fn load_participant(
    store: &mut TripStore,
    trip: TripId,
    labels: &mut Labels,
    entry: ParticipantEntry,
) -> Result<(), StoreError> {
    if labels.ids.contains_key(&entry.label) {
        tracing::warn!(label = %entry.label, "skipping duplicate participant");
        return Ok(());
    }

    let participant = store.add_participant(trip, &entry.name)?;
    labels.ids.insert(entry.label.clone(), participant.id);
    labels.labels.insert(participant.id, entry.label);
    Ok(())
}

// Unknown labels are handed to the store with an id nobody has, so it rejects
// them with the same error as any participant outside of the trip.
fn load_expense(store: &mut TripStore, trip: TripId, labels: &Labels, entry: ExpenseEntry) {
    const UNKNOWN: ParticipantId = 0;
    let resolve = |label: &String| labels.ids.get(label).copied().unwrap_or(UNKNOWN);

    let payer = resolve(&entry.payer);
    let participants: Vec<ParticipantId> = entry.participants.iter().map(resolve).collect();

    if let Err(err) = store.create_expense(
        trip,
        &entry.description,
        entry.amount,
        payer,
        &participants,
    ) {
        tracing::warn!(
            description = %entry.description,
            error = %err,
            "skipping expense"
        );
    }
}

#[cfg(test)]
mod run_tests {
    use super::run;

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn run_to_string(participants: &'static str, expenses: &'static str) -> String {
        let mut output_stream = Vec::new();
        run(
            "Test trip",
            std::io::Cursor::new(participants),
            std::io::Cursor::new(expenses),
            &mut output_stream,
        )
        .expect("run should succeed");
        String::from_utf8(output_stream).unwrap()
    }

    #[test]
    fn test_run_settles_trip() {
        let participants = r#"id,name
a,Ana
b,Bob
c,Cleo"#;
        let expenses = r#"description,amount,payer,participants
Dinner,90.00,a,a;b;c"#;

        let want = r#"participant,name,paid,consumed,balance
a,Ana,90.00,30.00,60.00
b,Bob,0.00,30.00,-30.00
c,Cleo,0.00,30.00,-30.00

from,to,amount
Bob,Ana,30.00
Cleo,Ana,30.00
"#;
        assert_eq!(want, run_to_string(participants, expenses));
    }

    #[test]
    // Malformed records and expenses the ledger refuses are skipped, the rest
    // is still settled.
    fn test_run_skips_invalid_records() {
        let participants = r#"id,name
a,Ana
b,Bob
a,Ana again
,Nobody"#;
        let expenses = r#"description,amount,payer,participants
Dinner,40,a,a;b
Broken line
Ghost,10,z,a;b
Stranger,10,a,a;z
Free,0,a,a;b
Nobody,10,a,
Taxi,12,b,b"#;

        let mut output_stream = Vec::new();
        let report = run(
            "Test trip",
            std::io::Cursor::new(participants),
            std::io::Cursor::new(expenses),
            &mut output_stream,
        )
        .unwrap();

        assert_eq!(2, report.balances.len());
        assert_eq!(dec!(20), report.balances[0].balance);
        assert_eq!(dec!(-20), report.balances[1].balance);
        assert_eq!(1, report.transfers.len());
        assert_eq!("Bob", report.transfers[0].from);
        assert_eq!("Ana", report.transfers[0].to);
        assert_eq!(dec!(20), report.transfers[0].amount);
    }

    #[test]
    fn test_run_single_participant_without_expenses() {
        let got = run_to_string(
            "id,name\nsolo,Solo",
            "description,amount,payer,participants",
        );
        let want = r#"participant,name,paid,consumed,balance
solo,Solo,0.00,0.00,0.00

from,to,amount
"#;
        assert_eq!(want, got);
    }

    #[test]
    // The second yacht would overflow the trip's totals: it is skipped like
    // any other rejected expense, and the first one is still settled.
    fn test_run_skips_overflowing_expense() {
        let participants = r#"id,name
a,Ana
b,Bob"#;
        let expenses = r#"description,amount,payer,participants
Yacht,40000000000000000000000000000.0,a,b
Another yacht,40000000000000000000000000000.0,a,b
Taxi,12,b,a"#;

        let mut output_stream = Vec::new();
        let report = run(
            "Test trip",
            std::io::Cursor::new(participants),
            std::io::Cursor::new(expenses),
            &mut output_stream,
        )
        .unwrap();

        let yacht = Decimal::from_str("40000000000000000000000000000").unwrap();
        assert_eq!(yacht, report.balances[0].total_paid);
        assert_eq!(yacht - dec!(12), report.balances[0].balance);
        assert_eq!(1, report.transfers.len());
        assert_eq!(yacht - dec!(12), report.transfers[0].amount);
    }
}
