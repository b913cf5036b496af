use super::RankedCandidate;
use super::comparators::by_score;
use crate::models::ScoreKind;
use tracing::debug;

/// Sorts `items` by `kind` (stable, ties keep their order) and assigns ranks
/// `1..=m` to the `m` candidates that carry a value for `kind`. Candidates
/// without a value lose any previous rank for `kind`.
///
/// Returns `m`.
pub fn rank_by<T: RankedCandidate>(items: &mut [T], kind: ScoreKind) -> usize {
    items.sort_by(by_score::<T>(kind));
    let mut scored = 0u32;
    for item in items.iter_mut() {
        let has_value = item
            .scores()
            .try_get(kind)
            .is_some_and(|x| !x.is_nan());
        if has_value {
            scored += 1;
            item.scores_mut().set_rank(kind, scored);
        } else {
            item.scores_mut().clear_rank(kind);
        }
    }
    scored as usize
}

/// Keeps only candidates ranked within `max_rank` for `kind`; everything
/// unranked for `kind` is dropped. Other scores are left untouched.
pub fn truncate<T: RankedCandidate>(items: &mut Vec<T>, kind: ScoreKind, max_rank: u32) {
    let before = items.len();
    items.retain(|x| x.scores().rank(kind).is_some_and(|r| r <= max_rank));
    debug!(
        "Truncated {} candidates to {} at {} rank {}",
        before,
        items.len(),
        kind,
        max_rank
    );
}
