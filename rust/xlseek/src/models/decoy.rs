use serde::Serialize;

/// Whether a candidate was drawn from the target database or is a shuffled
/// null counterpart.
///
/// Decoys remember which decoy set produced them; set 0 is reserved for
/// targets.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, std::hash::Hash, PartialOrd, Ord)]
pub enum DecoyMarking {
    Target,
    ShuffledDecoy { set: u16 },
}

impl DecoyMarking {
    pub fn for_set(set: u16) -> Self {
        match set {
            0 => DecoyMarking::Target,
            set => DecoyMarking::ShuffledDecoy { set },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DecoyMarking::Target => "Target",
            DecoyMarking::ShuffledDecoy { .. } => "Decoy",
        }
    }

    pub fn set_index(&self) -> u16 {
        match self {
            DecoyMarking::Target => 0,
            DecoyMarking::ShuffledDecoy { set } => *set,
        }
    }

    pub fn is_decoy(&self) -> bool {
        match self {
            DecoyMarking::Target => false,
            DecoyMarking::ShuffledDecoy { .. } => true,
        }
    }

    pub fn is_target(&self) -> bool {
        !self.is_decoy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marking_for_set() {
        assert_eq!(DecoyMarking::for_set(0), DecoyMarking::Target);
        assert!(DecoyMarking::for_set(2).is_decoy());
        assert_eq!(DecoyMarking::for_set(2).set_index(), 2);
        assert_eq!(DecoyMarking::for_set(1).as_str(), "Decoy");
    }
}
