use std::{cmp::Ordering, collections::HashMap};

use indexmap::IndexMap;

use crate::{
    database::db_structs::{AthleteRating, RatingAdjustment},
    model::{glicko2::RatingState, structures::rating_period::RatingPeriod}
};

/// A leaderboard row: the athlete's record with its rank among everyone tracked.
#[derive(Debug, Clone, PartialEq)]
pub struct Standing<'a> {
    pub rank: usize,
    pub percentile: f64,
    pub rating: &'a AthleteRating
}

/// Owns the rating record of every athlete in the population.
///
/// Records are keyed by athlete id and kept in population order. Period updates are
/// applied through [`RatingTracker::commit`] only, one whole period at a time.
pub struct RatingTracker {
    ratings: IndexMap<i32, AthleteRating>,
    // The most recent period committed. Periods must be committed in increasing order.
    last_period: Option<RatingPeriod>
}

impl Default for RatingTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTracker {
    pub fn new() -> RatingTracker {
        RatingTracker {
            ratings: IndexMap::new(),
            last_period: None
        }
    }

    /// A tracker holding a default record for every id. Duplicate ids are ignored.
    pub fn with_population(athlete_ids: &[i32]) -> RatingTracker {
        let mut tracker = RatingTracker::new();
        for id in athlete_ids {
            tracker.ratings.entry(*id).or_insert_with(|| AthleteRating::new(*id));
        }

        tracker
    }

    /// Inserts or replaces a record.
    pub fn insert(&mut self, rating: AthleteRating) {
        self.ratings.insert(rating.athlete_id, rating);
    }

    pub fn contains(&self, athlete_id: i32) -> bool {
        self.ratings.contains_key(&athlete_id)
    }

    /// Returns the current rating record for the athlete.
    pub fn get_rating(&self, athlete_id: i32) -> Option<&AthleteRating> {
        self.ratings.get(&athlete_id)
    }

    pub fn get_history(&self, athlete_id: i32) -> Option<&[RatingAdjustment]> {
        self.ratings.get(&athlete_id).map(|r| r.history.as_slice())
    }

    pub fn last_period(&self) -> Option<RatingPeriod> {
        self.last_period
    }

    /// Freezes the current state of the given athletes. Unknown ids are left out.
    pub fn snapshot<'a, I>(&self, athlete_ids: I) -> HashMap<i32, RatingState>
    where
        I: IntoIterator<Item = &'a i32>
    {
        athlete_ids
            .into_iter()
            .filter_map(|id| {
                self.ratings.get(id).map(|r| {
                    (
                        *id,
                        RatingState {
                            rating: r.rating,
                            rating_deviation: r.rating_deviation,
                            volatility: r.volatility
                        }
                    )
                })
            })
            .collect()
    }

    /// Applies one period's adjustments in a single batch: each record takes the
    /// adjustment's post-period values, gains the matches it played and logs the entry.
    pub fn commit(&mut self, period: RatingPeriod, adjustments: Vec<(i32, RatingAdjustment)>) {
        for (athlete_id, adjustment) in adjustments {
            if let Some(rating) = self.ratings.get_mut(&athlete_id) {
                rating.rating = adjustment.rating_after;
                rating.rating_deviation = adjustment.rd_after;
                rating.volatility = adjustment.volatility_after;
                rating.races_completed += adjustment.opponents_faced;
                rating.history.push(adjustment);
            }
        }

        self.last_period = Some(period);
    }

    pub(crate) fn ratings_mut(&mut self) -> impl Iterator<Item = &mut AthleteRating> {
        self.ratings.values_mut()
    }

    pub fn ratings(&self) -> impl Iterator<Item = &AthleteRating> {
        self.ratings.values()
    }

    /// Every record ranked by current rating, highest first. Equal ratings keep
    /// population order.
    pub fn leaderboard(&self) -> Vec<Standing<'_>> {
        let mut sorted: Vec<&AthleteRating> = self.ratings.values().collect();
        sorted.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));

        let total = sorted.len();
        sorted
            .into_iter()
            .enumerate()
            .map(|(i, rating)| Standing {
                rank: i + 1,
                percentile: RatingTracker::percentile(i + 1, total).unwrap_or(0.0),
                rating
            })
            .collect()
    }

    /// Fetches the data necessary for writing results
    pub fn get_post_data(&self) -> Vec<AthleteRating> {
        self.ratings.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// `P = (n/N) * 100`
    fn percentile(rank: usize, total: usize) -> Option<f64> {
        match rank.cmp(&1) {
            Ordering::Less => None,
            _ => {
                let n = total.saturating_sub(rank); // The number of athletes below
                Some(n as f64 / total as f64 * 100.0)
            }
        }
    }
}
