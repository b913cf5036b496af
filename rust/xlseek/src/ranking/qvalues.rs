use super::RankedCandidate;
use super::comparators::by_score;
use crate::models::ScoreKind;
use tracing::info;

/// Target-decoy competition q-values over the best match of every spectrum.
///
/// Only candidates ranked first for `score` take part; each receives the
/// estimated q-value in `qvalue_kind`. Walking the participants from best to
/// worst score, the FDR at each point is `(decoys + 1) / targets`, and the
/// q-value is its running minimum from the worst end, capped at 1.
///
/// Implementation derived from the Sage implementation of qval
/// (github.com/lazear/sage).
pub fn assign_decoy_qvalues<T: RankedCandidate>(
    items: &mut [T],
    score: ScoreKind,
    qvalue_kind: ScoreKind,
) {
    let mut order: Vec<usize> = (0..items.len())
        .filter(|&i| {
            items[i].scores().rank(score) == Some(1) && items[i].scores().try_get(score).is_some()
        })
        .collect();
    if order.is_empty() {
        return;
    }
    let cmp = by_score::<T>(score);
    order.sort_by(|&a, &b| cmp(&items[a], &items[b]));

    let mut decoy = 1;
    let mut target = 0;
    let mut fdr = Vec::with_capacity(order.len());
    for &i in &order {
        if items[i].is_decoy() {
            decoy += 1;
        } else {
            target += 1;
        }
        fdr.push(decoy as f32 / target.max(1) as f32);
    }

    let mut q_min = 1.0f32;
    for (&i, f) in order.iter().zip(fdr.iter()).rev() {
        q_min = q_min.min(*f);
        items[i].scores_mut().set(qvalue_kind, q_min);
    }
    info!(
        "Assigned {} q-values over {} targets and {} decoys",
        qvalue_kind,
        target,
        decoy - 1
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::rank_by;
    use crate::ranking::test_support::Mock;

    #[test]
    fn test_qvalues_monotonic() {
        // One candidate per spectrum, already the best of its spectrum.
        let labels = [false, false, true, false, false, true, false, true, true, true];
        let mut items: Vec<Mock> = labels
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let mut m = Mock::new(i, i as u32, 2).scored(ScoreKind::XCorr, 10.0 - i as f32);
                m.decoy = *d;
                m
            })
            .collect();
        for item in items.iter_mut() {
            rank_by(std::slice::from_mut(item), ScoreKind::XCorr);
        }
        assign_decoy_qvalues(&mut items, ScoreKind::XCorr, ScoreKind::DecoyXcorrQvalue);

        let q: Vec<f32> = items
            .iter()
            .map(|x| x.scores.get(ScoreKind::DecoyXcorrQvalue).unwrap())
            .collect();
        assert!(q.windows(2).all(|w| w[0] <= w[1]));
        assert!(q.iter().all(|x| *x <= 1.0));
        // First two targets: (0 + 1) / 2
        assert!((q[0] - 0.5).abs() < 1e-6);
        assert!((q[1] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_lower_ranked_are_skipped() {
        let mut items = vec![
            Mock::new(0, 1, 2).scored(ScoreKind::XCorr, 2.0),
            Mock::new(1, 1, 2).scored(ScoreKind::XCorr, 1.0),
        ];
        rank_by(&mut items, ScoreKind::XCorr);
        assign_decoy_qvalues(&mut items, ScoreKind::XCorr, ScoreKind::DecoyXcorrQvalue);
        assert!(items[0].scores.try_get(ScoreKind::DecoyXcorrQvalue).is_some());
        assert!(items[1].scores.try_get(ScoreKind::DecoyXcorrQvalue).is_none());
    }
}
