use crate::model::period::HeatEntry;

/// One derived head-to-head result inside a heat. `ahead` was ranked at or above `behind`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pairing {
    pub ahead: i32,
    pub behind: i32,
    /// Score of `ahead` against `behind`; `behind` scores `1.0 - score`
    pub score: f64
}

impl Pairing {
    pub fn behind_score(&self) -> f64 {
        1.0 - self.score
    }
}

/// Orders a heat by finishing status: finishers by position, then every DNF.
/// The sort is stable so equal statuses keep their listing order.
pub fn rank_heat(entries: &[HeatEntry]) -> Vec<HeatEntry> {
    let mut ranked = entries.to_vec();
    ranked.sort_by_key(|e| e.status);

    ranked
}

/// Every pair `(i, j)` with `i` ranked ahead of `j` in an already ranked heat.
pub fn pairings(ranked: &[HeatEntry]) -> Vec<Pairing> {
    let mut pairs = Vec::with_capacity(ranked.len() * ranked.len().saturating_sub(1) / 2);

    for (i, ahead) in ranked.iter().enumerate() {
        for behind in &ranked[i + 1..] {
            pairs.push(Pairing {
                ahead: ahead.athlete_id,
                behind: behind.athlete_id,
                score: ahead.status.score_against(&behind.status)
            });
        }
    }

    pairs
}

/// Ranks the ratable part of a heat and derives its pairings. Heats with fewer than
/// two ratable athletes produce nothing.
pub fn heat_pairings<F>(entries: &[HeatEntry], is_ratable: F) -> Vec<Pairing>
where
    F: Fn(i32) -> bool
{
    let ratable: Vec<HeatEntry> = entries.iter().filter(|e| is_ratable(e.athlete_id)).copied().collect();
    if ratable.len() < 2 {
        return Vec::new();
    }

    pairings(&rank_heat(&ratable))
}
