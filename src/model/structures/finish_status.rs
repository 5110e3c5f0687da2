use std::cmp::Ordering;

/// Where an athlete ended up in a race heat.
///
/// Finishers are ordered by position. A did-not-finish ranks strictly below every
/// finisher, and two did-not-finish entries rank equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishStatus {
    Finished(i32),
    DidNotFinish
}

impl FinishStatus {
    /// Builds a status from the raw result fields. A `DNF` status wins over any
    /// position. Returns `None` when the result has neither a position nor a DNF marker.
    pub fn from_result(position: Option<i32>, status: Option<&str>) -> Option<FinishStatus> {
        let dnf = status.is_some_and(|s| s.trim().eq_ignore_ascii_case("DNF"));

        match (dnf, position) {
            (true, _) => Some(FinishStatus::DidNotFinish),
            (false, Some(p)) => Some(FinishStatus::Finished(p)),
            (false, None) => None
        }
    }

    pub fn is_dnf(&self) -> bool {
        matches!(self, FinishStatus::DidNotFinish)
    }

    /// Score of `self` against `other` where `self` was ranked ahead of (or level with) `other`.
    ///
    /// Mutual DNF is a draw. Two finishers are decided strictly by position: an equal
    /// position does not count as a win for the athlete listed first.
    pub fn score_against(&self, other: &FinishStatus) -> f64 {
        match (self, other) {
            (FinishStatus::DidNotFinish, FinishStatus::DidNotFinish) => 0.5,
            (FinishStatus::DidNotFinish, _) => 0.0,
            (_, FinishStatus::DidNotFinish) => 1.0,
            (FinishStatus::Finished(a), FinishStatus::Finished(b)) => {
                if a < b {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

impl PartialOrd for FinishStatus {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FinishStatus {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FinishStatus::Finished(a), FinishStatus::Finished(b)) => a.cmp(b),
            (FinishStatus::Finished(_), FinishStatus::DidNotFinish) => Ordering::Less,
            (FinishStatus::DidNotFinish, FinishStatus::Finished(_)) => Ordering::Greater,
            (FinishStatus::DidNotFinish, FinishStatus::DidNotFinish) => Ordering::Equal
        }
    }
}
