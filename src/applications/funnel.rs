use crate::users::repo::StageCounts;

/// Stage sizes as whole percentages of the applied count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Funnel {
    pub applied: i64,
    pub shortlisted: i64,
    pub interview: i64,
}

impl Funnel {
    /// Applied is always 100; the other stages are floored percentages of it.
    /// With nothing applied yet the divisor is 1, so those stages read 0.
    pub fn from_counts(counts: StageCounts) -> Self {
        let applied = counts.applied.max(1);
        Self {
            applied: 100,
            shortlisted: percent(counts.shortlisted, applied),
            interview: percent(counts.interview, applied),
        }
    }
}

fn percent(count: i64, of: i64) -> i64 {
    count.saturating_mul(100).div_euclid(of)
}
