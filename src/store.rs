//! In-memory trips, participants and expenses.
//!
//! Every entity lives in its own table keyed by id, and only references other
//! entities by id: an expense knows its trip and payer, a share knows its
//! participant. Nothing points back, so deleting is a matter of filtering the
//! tables.

use crate::ledger::{
    Amount, ExpenseId, ExpenseRecord, LedgerError, Participant, ParticipantId, TripId,
};
use crate::provider::{ExpenseProvider, ParticipantProvider, StoreError};

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trip {
    pub id: TripId,
    pub name: String,
}

// Running sums of everything paid and consumed in a trip. Balances are summed
// without checks, so every per-participant total must stay below these.
#[derive(Debug, Default, Clone, Copy)]
struct Totals {
    paid: Amount,
    consumed: Amount,
}

impl Totals {
    fn with(&self, expense: &ExpenseRecord) -> Option<Totals> {
        let paid = self.paid.checked_add(expense.amount)?;
        let consumed = expense
            .shares
            .iter()
            .try_fold(self.consumed, |total, share| total.checked_add(share.amount))?;
        Some(Totals { paid, consumed })
    }

    fn without(&mut self, expense: &ExpenseRecord) {
        self.paid = self.paid.saturating_sub(expense.amount);
        for share in &expense.shares {
            self.consumed = self.consumed.saturating_sub(share.amount);
        }
    }
}

#[derive(Default)]
pub struct TripStore {
    trips: BTreeMap<TripId, Trip>,
    participants: BTreeMap<ParticipantId, Participant>,
    expenses: BTreeMap<ExpenseId, ExpenseRecord>,
    totals: BTreeMap<TripId, Totals>,

    // Ids are never reused, even after a deletion.
    last_trip_id: TripId,
    last_participant_id: ParticipantId,
    last_expense_id: ExpenseId,
}

impl TripStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_trip(&mut self, name: &str) -> Trip {
        self.last_trip_id += 1;
        let trip = Trip {
            id: self.last_trip_id,
            name: name.trim().to_string(),
        };
        self.trips.insert(trip.id, trip.clone());

        tracing::info!(trip = trip.id, name = %trip.name, "created trip");
        trip
    }

    pub fn trip(&self, id: TripId) -> Result<&Trip, StoreError> {
        self.trips.get(&id).ok_or(StoreError::UnknownTrip(id))
    }

    /// All trips, newest first.
    pub fn trips(&self) -> Vec<&Trip> {
        self.trips.values().rev().collect()
    }

    pub fn rename_trip(&mut self, id: TripId, name: &str) -> Result<(), StoreError> {
        let trip = self.trips.get_mut(&id).ok_or(StoreError::UnknownTrip(id))?;
        trip.name = name.trim().to_string();
        Ok(())
    }

    /// Delete a trip, along with its participants and expenses.
    pub fn delete_trip(&mut self, id: TripId) -> Result<Trip, StoreError> {
        let trip = self.trips.remove(&id).ok_or(StoreError::UnknownTrip(id))?;
        self.participants.retain(|_, p| p.trip != id);
        self.expenses.retain(|_, e| e.trip != id);
        self.totals.remove(&id);

        tracing::info!(trip = id, "deleted trip");
        Ok(trip)
    }

    pub fn add_participant(&mut self, trip: TripId, name: &str) -> Result<Participant, StoreError> {
        self.trip(trip)?;

        self.last_participant_id += 1;
        let participant = Participant::new(self.last_participant_id, name, trip);
        self.participants
            .insert(participant.id, participant.clone());

        tracing::info!(trip, participant = participant.id, "added participant");
        Ok(participant)
    }

    pub fn rename_participant(
        &mut self,
        trip: TripId,
        id: ParticipantId,
        name: &str,
    ) -> Result<(), StoreError> {
        let participant = self
            .participants
            .get_mut(&id)
            .filter(|p| p.trip == trip)
            .ok_or(StoreError::NotFound {
                trip,
                participant: id,
            })?;
        participant.name = name.trim().to_string();
        Ok(())
    }

    /// Remove a participant from a trip.
    ///
    /// Shares are never edited on their own, so every expense the participant
    /// paid for or took part in is deleted with them. The deleted expense ids
    /// are returned.
    pub fn remove_participant(
        &mut self,
        trip: TripId,
        id: ParticipantId,
    ) -> Result<Vec<ExpenseId>, StoreError> {
        self.participant(trip, id)?;
        self.participants.remove(&id);

        let removed: Vec<ExpenseId> = self
            .expenses
            .values()
            .filter(|e| e.payer == id || e.is_shared_by(id))
            .map(|e| e.id)
            .collect();
        for expense in &removed {
            self.forget(expense);
        }

        tracing::info!(
            trip,
            participant = id,
            expenses = removed.len(),
            "removed participant"
        );
        Ok(removed)
    }

    pub fn delete_expense(
        &mut self,
        trip: TripId,
        id: ExpenseId,
    ) -> Result<ExpenseRecord, StoreError> {
        match self.expenses.get(&id) {
            Some(expense) if expense.trip == trip => {}
            _ => return Err(StoreError::UnknownExpense { trip, expense: id }),
        }

        tracing::info!(trip, expense = id, "deleted expense");
        self.forget(&id).ok_or(StoreError::UnknownExpense { trip, expense: id })
    }

    // Drop an expense and take it out of its trip's totals.
    fn forget(&mut self, id: &ExpenseId) -> Option<ExpenseRecord> {
        let expense = self.expenses.remove(id)?;
        if let Some(totals) = self.totals.get_mut(&expense.trip) {
            totals.without(&expense);
        }
        Some(expense)
    }

    // Resolve an id to a participant of `trip`, if there is one.
    fn member(&self, trip: TripId, id: ParticipantId) -> Option<&Participant> {
        self.participants.get(&id).filter(|p| p.trip == trip)
    }
}

impl ParticipantProvider for TripStore {
    /// Participants are listed by name, then by id for homonyms.
    fn participants(&self, trip: TripId) -> Result<Vec<Participant>, StoreError> {
        self.trip(trip)?;

        let mut participants: Vec<Participant> = self
            .participants
            .values()
            .filter(|p| p.trip == trip)
            .cloned()
            .collect();
        participants.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));

        Ok(participants)
    }

    fn participant(&self, trip: TripId, id: ParticipantId) -> Result<Participant, StoreError> {
        self.member(trip, id).cloned().ok_or(StoreError::NotFound {
            trip,
            participant: id,
        })
    }
}

impl ExpenseProvider for TripStore {
    /// Expenses are listed newest first.
    fn expenses(&self, trip: TripId) -> Result<Vec<ExpenseRecord>, StoreError> {
        self.trip(trip)?;

        Ok(self
            .expenses
            .values()
            .rev()
            .filter(|e| e.trip == trip)
            .cloned()
            .collect())
    }

    // Selecting the same participant twice only gives them one share. An
    // expense that would push the trip's totals past what an `Amount` can hold
    // is refused.
    fn create_expense(
        &mut self,
        trip: TripId,
        description: &str,
        amount: Amount,
        payer: ParticipantId,
        participants: &[ParticipantId],
    ) -> Result<ExpenseRecord, StoreError> {
        self.trip(trip)?;

        if participants.is_empty() {
            return Err(LedgerError::EmptyParticipantSet.into());
        }

        let payer = self
            .member(trip, payer)
            .ok_or(LedgerError::PayerNotInTrip { trip, payer })?;

        let mut selected: Vec<Participant> = Vec::with_capacity(participants.len());
        for &id in participants {
            if selected.iter().any(|p| p.id == id) {
                continue;
            }
            let participant = self
                .member(trip, id)
                .ok_or(LedgerError::InvalidParticipant {
                    trip,
                    participant: id,
                })?;
            selected.push(participant.clone());
        }

        let expense = ExpenseRecord::new(
            self.last_expense_id + 1,
            trip,
            description,
            amount,
            payer,
            &selected,
        )?;

        let totals = self
            .totals
            .get(&trip)
            .copied()
            .unwrap_or_default()
            .with(&expense)
            .ok_or(StoreError::Overflow { trip })?;

        self.last_expense_id = expense.id;
        self.totals.insert(trip, totals);
        self.expenses.insert(expense.id, expense.clone());

        tracing::info!(
            trip,
            expense = expense.id,
            amount = %expense.amount,
            shares = expense.shares.len(),
            "created expense"
        );
        Ok(expense)
    }
}



#[cfg(test)]
mod expense_tests {
    use super::TripStore;
    use crate::ledger::LedgerError;
    use crate::provider::{ExpenseProvider, StoreError};

    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn lisbon() -> (TripStore, u64, Vec<u64>) {
        let mut store = TripStore::new();
        let trip = store.create_trip("Lisbon").id;
        let ids = ["Ana", "Bob", "Cleo"]
            .iter()
            .map(|name| store.add_participant(trip, name).unwrap().id)
            .collect();
        (store, trip, ids)
    }

    #[test]
    fn test_create_expense_ok() {
        let (mut store, trip, ids) = lisbon();

        let expense = store
            .create_expense(trip, " Groceries ", dec!(45.005), ids[0], &ids)
            .unwrap();

        assert_eq!("Groceries", expense.description);
        assert_eq!("45.01", expense.amount.to_string());
        assert_eq!(ids[0], expense.payer);
        assert_eq!(dec!(45.00), expense.allocated());
        assert_eq!(vec![expense], store.expenses(trip).unwrap());
    }

    #[test]
    fn test_create_expense_dedupes_participants() {
        let (mut store, trip, ids) = lisbon();

        let expense = store
            .create_expense(trip, "Taxi", dec!(20), ids[1], &[ids[2], ids[1], ids[2]])
            .unwrap();

        let got: Vec<(u64, _)> = expense
            .shares
            .iter()
            .map(|s| (s.participant, s.amount))
            .collect();
        assert_eq!(vec![(ids[2], dec!(10)), (ids[1], dec!(10))], got);
    }

    #[test]
    // Invalid expenses are rejected, and nothing gets stored.
    fn test_create_expense_invalid() {
        let (mut store, trip, ids) = lisbon();
        let other_trip = store.create_trip("Porto").id;
        let outsider = store.add_participant(other_trip, "Dan").unwrap().id;

        for (amount, payer, participants, want_err) in vec![
            (
                dec!(10),
                ids[0],
                vec![],
                StoreError::Ledger(LedgerError::EmptyParticipantSet),
            ),
            (
                dec!(0.004),
                ids[0],
                ids.clone(),
                StoreError::Ledger(LedgerError::NonPositiveAmount(dec!(0.00))),
            ),
            (
                dec!(10),
                outsider,
                ids.clone(),
                StoreError::Ledger(LedgerError::PayerNotInTrip {
                    trip,
                    payer: outsider,
                }),
            ),
            (
                dec!(10),
                999,
                ids.clone(),
                StoreError::Ledger(LedgerError::PayerNotInTrip { trip, payer: 999 }),
            ),
            (
                dec!(10),
                ids[0],
                vec![ids[0], outsider],
                StoreError::Ledger(LedgerError::InvalidParticipant {
                    trip,
                    participant: outsider,
                }),
            ),
            (
                dec!(10),
                ids[0],
                vec![ids[1], 999],
                StoreError::Ledger(LedgerError::InvalidParticipant {
                    trip,
                    participant: 999,
                }),
            ),
        ] {
            let got = store.create_expense(trip, "Lunch", amount, payer, &participants);
            assert_eq!(Err(want_err), got);
        }

        assert!(store.expenses(trip).unwrap().is_empty());
        assert_eq!(
            Err(StoreError::UnknownTrip(77)),
            store.create_expense(77, "Lunch", dec!(1), ids[0], &ids)
        );
    }

    #[test]
    fn test_expenses_newest_first() {
        let (mut store, trip, ids) = lisbon();
        for description in ["Breakfast", "Lunch", "Dinner"] {
            store
                .create_expense(trip, description, dec!(9), ids[0], &ids)
                .unwrap();
        }

        let got: Vec<String> = store
            .expenses(trip)
            .unwrap()
            .into_iter()
            .map(|e| e.description)
            .collect();
        assert_eq!(vec!["Dinner", "Lunch", "Breakfast"], got);
    }

    #[test]
    // An expense that the trip's totals can't absorb is refused as a whole,
    // and deleting expenses makes room again.
    fn test_create_expense_overflow() {
        let (mut store, trip, ids) = lisbon();
        let huge = Decimal::from_str("40000000000000000000000000000").unwrap();

        let first = store
            .create_expense(trip, "Yacht", huge, ids[0], &[ids[1]])
            .unwrap();
        assert_eq!(
            Err(StoreError::Overflow { trip }),
            store.create_expense(trip, "Another yacht", huge, ids[0], &[ids[1]])
        );
        assert_eq!(vec![first.clone()], store.expenses(trip).unwrap());

        let balances: Vec<Decimal> = crate::provider::report(&store, trip)
            .unwrap()
            .balances
            .iter()
            .map(|r| r.balance)
            .collect();
        assert_eq!(vec![huge, -huge, dec!(0)], balances);

        store.delete_expense(trip, first.id).unwrap();
        assert!(store
            .create_expense(trip, "Another yacht", huge, ids[0], &[ids[1]])
            .is_ok());
    }

    #[test]
    fn test_delete_expense() {
        let (mut store, trip, ids) = lisbon();
        let other_trip = store.create_trip("Porto").id;
        let expense = store
            .create_expense(trip, "Tram", dec!(6), ids[0], &ids)
            .unwrap();

        assert_eq!(
            Err(StoreError::UnknownExpense {
                trip: other_trip,
                expense: expense.id
            }),
            store.delete_expense(other_trip, expense.id)
        );
        assert_eq!(Ok(expense.clone()), store.delete_expense(trip, expense.id));
        assert!(store.expenses(trip).unwrap().is_empty());

        // Ids are not reused.
        let next = store
            .create_expense(trip, "Tram", dec!(6), ids[0], &ids)
            .unwrap();
        assert_eq!(expense.id + 1, next.id);
    }
}
