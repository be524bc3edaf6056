use crate::input::Error;

use std::sync::mpsc::Receiver;
use std::thread::JoinHandle;

// Bad records are skipped, and the rest of the file is still processed: one
// typo in a shared spreadsheet shouldn't prevent computing everybody's balance.
// Each rejected record is logged, so it can be fixed and the file reloaded.
//
// The handle resolves to the number of rejected records once the parser is
// done with the file.
pub fn sink(errors: Receiver<Error>, source: &'static str) -> JoinHandle<usize> {
    std::thread::spawn(move || {
        let mut rejected = 0;
        for err in errors {
            rejected += 1;
            tracing::warn!(source, error = %err, "skipping record");
        }
        rejected
    })
}

#[test]
fn test_sink_counts_errors() {
    let (tx, rx) = std::sync::mpsc::channel();
    tx.send(Error::Format("missing participant id".to_string()))
        .unwrap();
    tx.send(Error::Csv("found record with 3 fields".to_string()))
        .unwrap();
    drop(tx);

    assert_eq!(2, sink(rx, "participants").join().unwrap());
}
