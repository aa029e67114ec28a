use std::collections::HashMap;

/// Fields of the state that one kind of response writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    AllFires,
    PublicSearch,
    UserLocations,
    Selection,
}

/// Proof of which request a response belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub group: FieldGroup,
    pub sequence: u64,
}

/// Hands out increasing sequence numbers per field group so only the
/// newest outstanding request may write its group.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: HashMap<FieldGroup, u64>,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self, group: FieldGroup) -> Ticket {
        let sequence = self.latest.entry(group).or_insert(0);
        *sequence += 1;
        Ticket {
            group,
            sequence: *sequence,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.get(&ticket.group).copied() == Some(ticket.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newer_ticket_supersedes_older() {
        let mut sequencer = RequestSequencer::new();
        let first = sequencer.issue(FieldGroup::PublicSearch);
        let second = sequencer.issue(FieldGroup::PublicSearch);
        assert!(!sequencer.is_current(first));
        assert!(sequencer.is_current(second));
    }

    #[test]
    fn groups_are_independent() {
        let mut sequencer = RequestSequencer::new();
        let fires = sequencer.issue(FieldGroup::AllFires);
        sequencer.issue(FieldGroup::PublicSearch);
        assert!(sequencer.is_current(fires));
    }
}
