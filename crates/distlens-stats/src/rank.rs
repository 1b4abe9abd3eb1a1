//! Tie-aware ranking.

/// Ranks `values` in ascending order, giving tied values their mid-rank.
///
/// Ranks are 1-based and returned in the order of the input, so `ranks[i]`
/// is the rank of `values[i]`. The ranks always sum to `n * (n + 1) / 2`.
///
/// # Examples
///
/// ```
/// use distlens_stats::rank::rank_with_ties;
///
/// let ranks = rank_with_ties(&[10.0, 20.0, 10.0, 30.0]);
/// assert_eq!(ranks, vec![1.5, 3.0, 1.5, 4.0]);
/// ```
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn rank_with_ties(values: &[f64]) -> Vec<f64> {
    let mut order = (0..values.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]].total_cmp(&values[order[start]]).is_eq() {
            end += 1;
        }
        // positions start..end hold 1-based ranks start+1..=end
        let mid_rank = (start + 1 + end) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = mid_rank;
        }
        start = end;
    }
    ranks
}
