use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::{
    database::db_structs::{AthleteRating, AthleteTimeline, AthletesData, MonthlyLeader, TimelinePoint},
    model::structures::rating_period::RatingPeriod
};

/// The rating progression of one athlete: the initial rating at the first history date,
/// then the last rating recorded on each distinct date. `None` without history.
pub fn athlete_timeline(rating: &AthleteRating, name: String) -> Option<AthleteTimeline> {
    let mut by_date: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for entry in &rating.history {
        by_date.insert(entry.date, entry.rating_after);
    }

    let (&first_date, _) = by_date.first_key_value()?;
    let mut timeline = vec![TimelinePoint {
        date: first_date,
        rating: rating.initial
    }];
    timeline.extend(by_date.into_iter().map(|(date, rating)| TimelinePoint { date, rating }));

    Some(AthleteTimeline {
        name,
        initial_rating: rating.initial,
        final_rating: rating.rating,
        timeline
    })
}

pub fn generate_timeline<'a, I>(ratings: I, athletes: &AthletesData) -> BTreeMap<i32, AthleteTimeline>
where
    I: IntoIterator<Item = &'a AthleteRating>
{
    ratings
        .into_iter()
        .filter_map(|r| athlete_timeline(r, athletes.name_of(r.athlete_id)).map(|t| (r.athlete_id, t)))
        .collect()
}

/// For every month appearing in any timeline, the `limit` highest ratings standing at the
/// end of that month. Each athlete contributes their latest point dated on or before the
/// month's last day. Equal ratings keep athlete id order.
pub fn monthly_top(timelines: &BTreeMap<i32, AthleteTimeline>, limit: usize) -> BTreeMap<RatingPeriod, Vec<MonthlyLeader>> {
    let months: BTreeSet<RatingPeriod> = timelines
        .values()
        .flat_map(|t| t.timeline.iter().map(|p| RatingPeriod::from_date(p.date)))
        .collect();

    months
        .into_iter()
        .map(|month| {
            let end = month.last_day();
            let mut leaders: Vec<MonthlyLeader> = timelines
                .iter()
                .filter_map(|(athlete_id, t)| {
                    t.timeline
                        .iter()
                        .take_while(|p| p.date <= end)
                        .last()
                        .map(|p| MonthlyLeader {
                            athlete_id: *athlete_id,
                            full_name: t.name.clone(),
                            rating: p.rating,
                            date: p.date
                        })
                })
                .collect();

            leaders.sort_by(|a, b| b.rating.total_cmp(&a.rating));
            leaders.truncate(limit);

            (month, leaders)
        })
        .collect()
}
