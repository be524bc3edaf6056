use crate::ledger::Amount;

use serde::{de::DeserializeOwned, Deserialize};
use std::sync::mpsc::{self, Receiver, Sender};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    /// CSV is malformed.
    #[error("malformed CSV: {0}")]
    Csv(String),

    /// Data format is incorrect.
    #[error("invalid record: {0}")]
    Format(String),
}

impl From<csv::Error> for Error {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

impl From<&'static str> for Error {
    fn from(err: &'static str) -> Self {
        Self::Format(err.to_string())
    }
}

/// A participant as listed in the input. `label` is whatever the file uses to
/// refer to them from the expenses file.
#[derive(Debug, PartialEq)]
pub struct ParticipantEntry {
    pub label: String,
    pub name: String,
}

/// An expense as listed in the input, still referring to participants by label.
#[derive(Debug, PartialEq)]
pub struct ExpenseEntry {
    pub description: String,
    pub amount: Amount,
    pub payer: String,
    pub participants: Vec<String>,
}

/// Stream participants from a CSV with an `id,name` header.
pub fn participants(
    input_stream: (impl std::io::Read + Send + 'static),
) -> (Receiver<ParticipantEntry>, Receiver<Error>) {
    parse::<ParticipantRecord, ParticipantEntry>(input_stream)
}

/// Stream expenses from a CSV with a `description,amount,payer,participants`
/// header. Participants are separated by `;`.
pub fn expenses(
    input_stream: (impl std::io::Read + Send + 'static),
) -> (Receiver<ExpenseEntry>, Receiver<Error>) {
    parse::<ExpenseRecord, ExpenseEntry>(input_stream)
}

// Bad records don't abort the parsing: they are sent to the errors channel,
// and the following records are still read.
fn parse<Record, Entry>(
    input_stream: (impl std::io::Read + Send + 'static),
) -> (Receiver<Entry>, Receiver<Error>)
where
    Record: DeserializeOwned + TryInto<Entry, Error = &'static str> + 'static,
    Entry: Send + 'static,
{
    let (entry_tx, entry_rx): (Sender<Entry>, Receiver<Entry>) = mpsc::channel();
    let (error_tx, error_rx): (Sender<Error>, Receiver<Error>) = mpsc::channel();

    let buffered = std::io::BufReader::new(input_stream);
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(buffered);

    // Moving to a new thread so the records can be used as soon as they're read.
    std::thread::spawn(move || {
        for record in reader.deserialize::<Record>() {
            // Sending only fails once the receiver is gone: nobody is
            // listening anymore, so there's no point reading further.
            let sent = match convert(record) {
                Ok(entry) => entry_tx.send(entry).is_ok(),
                Err(err) => error_tx.send(err).is_ok(),
            };
            if !sent {
                break;
            }
        }
    });

    (entry_rx, error_rx)
}

// Convert from a csv deserialise result into an entry result.
fn convert<Record, Entry>(record: Result<Record, csv::Error>) -> Result<Entry, Error>
where
    Record: TryInto<Entry, Error = &'static str>,
{
    Ok(record?.try_into()?)
}

// Records mirror the files' columns. They are converted into entries, so the
// rest of the code doesn't depend on how the files are laid out.
#[derive(Debug, Deserialize)]
struct ParticipantRecord {
    id: String,
    name: String,
}

impl TryFrom<ParticipantRecord> for ParticipantEntry {
    type Error = &'static str;
    fn try_from(record: ParticipantRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err("missing participant id");
        }
        if record.name.is_empty() {
            return Err("missing participant name");
        }

        Ok(Self {
            label: record.id,
            name: record.name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ExpenseRecord {
    description: String,
    amount: Amount,
    payer: String,
    participants: String,
}

impl TryFrom<ExpenseRecord> for ExpenseEntry {
    type Error = &'static str;
    fn try_from(record: ExpenseRecord) -> Result<Self, Self::Error> {
        if record.description.is_empty() {
            return Err("missing expense description");
        }
        if record.payer.is_empty() {
            return Err("missing expense payer");
        }

        let participants: Vec<String> = record
            .participants
            .split(';')
            .map(str::trim)
            .filter(|label| !label.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            description: record.description,
            amount: record.amount,
            payer: record.payer,
            participants,
        })
    }
}
