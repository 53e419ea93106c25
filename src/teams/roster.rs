use std::fmt;

/// The amount of members a team can hold
pub const TEAM_CAPACITY: usize = 3;

/// One of the member positions of a team, in the order they get filled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
    Third,
}

impl Slot {
    pub const ALL: [Slot; TEAM_CAPACITY] = [Slot::First, Slot::Second, Slot::Third];

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
            Slot::Third => 2,
        }
    }

    /// The key this slot goes by in request and response bodies
    pub fn field_name(self) -> &'static str {
        match self {
            Slot::First => "team_member1ID",
            Slot::Second => "team_member2ID",
            Slot::Third => "team_member3ID",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// The members of a team, kept in fixed positions.
///
/// New members take the first free slot, a member leaving frees
/// their own slot without moving anyone else around.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Roster {
    slots: [Option<String>; TEAM_CAPACITY],
}

impl Roster {
    pub fn new(slots: [Option<String>; TEAM_CAPACITY]) -> Roster {
        Roster { slots }
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.slots[slot.index()].as_deref()
    }

    pub fn first_free(&self) -> Option<Slot> {
        Slot::ALL
            .iter()
            .copied()
            .find(|slot| self.slots[slot.index()].is_none())
    }

    pub fn slot_of(&self, member_id: &str) -> Option<Slot> {
        Slot::ALL
            .iter()
            .copied()
            .find(|slot| self.get(*slot) == Some(member_id))
    }

    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Puts the member in the first free slot and returns it,
    /// `None` when the team is full
    pub fn join(&mut self, member_id: &str) -> Option<Slot> {
        let slot = self.first_free()?;
        self.slots[slot.index()] = Some(member_id.to_string());
        Some(slot)
    }

    /// Frees the slot the member occupies and returns it,
    /// `None` when they aren't on this team
    pub fn leave(&mut self, member_id: &str) -> Option<Slot> {
        let slot = self.slot_of(member_id)?;
        self.slots[slot.index()] = None;
        Some(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_slots_in_order() {
        let mut roster = Roster::default();

        assert_eq!(roster.join("ana"), Some(Slot::First));
        assert_eq!(roster.join("bea"), Some(Slot::Second));
        assert_eq!(roster.join("carl"), Some(Slot::Third));
        assert_eq!(roster.first_free(), None);
        assert_eq!(roster.join("dani"), None);
        assert_eq!(roster.len(), 3);
        assert_eq!(roster.get(Slot::Third), Some("carl"));
    }

    #[test]
    fn leaving_frees_the_exact_slot() {
        let mut roster = Roster::default();
        roster.join("ana");
        roster.join("bea");
        roster.join("carl");

        assert_eq!(roster.leave("bea"), Some(Slot::Second));
        assert_eq!(roster.get(Slot::First), Some("ana"));
        assert_eq!(roster.get(Slot::Second), None);
        assert_eq!(roster.get(Slot::Third), Some("carl"));
        assert_eq!(roster.len(), 2);

        // the hole gets filled before anything else
        assert_eq!(roster.join("dani"), Some(Slot::Second));
    }

    #[test]
    fn leaving_without_being_a_member() {
        let mut roster = Roster::new([Some("ana".to_string()), None, None]);

        assert_eq!(roster.leave("bea"), None);
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn first_free_skips_taken_slots() {
        let roster = Roster::new([Some("ana".to_string()), None, Some("carl".to_string())]);

        assert_eq!(roster.first_free(), Some(Slot::Second));
        assert_eq!(roster.slot_of("carl"), Some(Slot::Third));
        assert_eq!(roster.slot_of("bea"), None);
    }

    #[test]
    fn slot_field_names() {
        let names: Vec<String> = Slot::ALL.iter().map(|slot| slot.to_string()).collect();

        assert_eq!(names, vec!["team_member1ID", "team_member2ID", "team_member3ID"]);
    }
}
