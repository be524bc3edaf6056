use super::{ParticipantId, TripId};

/// Someone who can pay for, or benefit from, expenses within one trip.
///
/// A participant only knows the id of its trip: the trip doesn't hold
/// participants, lookups go through the store's tables instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub trip: TripId,
}

impl Participant {
    // Names are always stored trimmed.
    pub fn new(id: ParticipantId, name: &str, trip: TripId) -> Self {
        Self {
            id,
            name: name.trim().to_string(),
            trip,
        }
    }
}

#[test]
fn test_participant_name_is_trimmed() {
    let participant = Participant::new(4, "  Ana ", 1);
    assert_eq!("Ana", participant.name);
    assert_eq!(4, participant.id);
    assert_eq!(1, participant.trip);
}
