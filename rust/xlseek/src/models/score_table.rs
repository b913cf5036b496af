use super::score_kind::ScoreKind;
use crate::errors::ScoreAccessError;

/// Per-candidate storage of one optional value and one optional rank for
/// every [`ScoreKind`].
///
/// Ranks are only meaningful relative to the candidate set that was last
/// ranked for that kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreTable {
    scores: [Option<f32>; ScoreKind::COUNT],
    ranks: [Option<u32>; ScoreKind::COUNT],
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a value, silently replacing any previous one.
    pub fn set(&mut self, kind: ScoreKind, value: f32) {
        self.scores[kind.index()] = Some(value);
    }

    pub fn get(&self, kind: ScoreKind) -> Result<f32, ScoreAccessError> {
        self.scores[kind.index()].ok_or(ScoreAccessError::NotScored { kind })
    }

    pub fn try_get(&self, kind: ScoreKind) -> Option<f32> {
        self.scores[kind.index()]
    }

    pub fn is_set(&self, kind: ScoreKind) -> bool {
        self.scores[kind.index()].is_some()
    }

    pub fn set_rank(&mut self, kind: ScoreKind, rank: u32) {
        self.ranks[kind.index()] = Some(rank);
    }

    pub fn rank(&self, kind: ScoreKind) -> Option<u32> {
        self.ranks[kind.index()]
    }

    pub fn clear_rank(&mut self, kind: ScoreKind) {
        self.ranks[kind.index()] = None;
    }
}

/// Which score kinds were computed for a whole collection.
///
/// Writers use this to decide whether a column is emitted or left empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoredKinds([bool; ScoreKind::COUNT]);

impl ScoredKinds {
    pub fn mark(&mut self, kind: ScoreKind) {
        self.0[kind.index()] = true;
    }

    pub fn contains(&self, kind: ScoreKind) -> bool {
        self.0[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = ScoreKind> + '_ {
        ScoreKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}
