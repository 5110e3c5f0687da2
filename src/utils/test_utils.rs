use crate::{
    database::db_structs::{
        Athlete, AthleteDetails, AthleteRating, AthletesData, Event, RaceResult, RatingAdjustment, ResultsData
    },
    model::{
        constants::{DEFAULT_RD, DEFAULT_VOLATILITY},
        period::DatedResult,
        structures::{
            finish_status::FinishStatus, rating_adjustment_type::RatingAdjustmentType, rating_period::RatingPeriod
        }
    }
};
use chrono::{Datelike, Months, NaiveDate};
use rand::{seq::SliceRandom, Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_else(|| panic!("Invalid date {year}-{month}-{day}"))
}

pub fn generate_event(title: &str, date: Option<&str>) -> Event {
    Event {
        title: Some(title.to_string()),
        date: date.map(str::to_string)
    }
}

pub fn generate_result(athlete_id: i32, event_id: i32, prog_id: i32, position: Option<i32>) -> RaceResult {
    RaceResult {
        athlete_id: Some(athlete_id),
        event_id: Some(event_id),
        prog_id: Some(prog_id),
        position,
        status: None
    }
}

pub fn generate_dnf(athlete_id: i32, event_id: i32, prog_id: i32) -> RaceResult {
    RaceResult {
        status: Some("DNF".to_string()),
        ..generate_result(athlete_id, event_id, prog_id, None)
    }
}

pub fn results_data(events: Vec<(i32, Event)>, results: Vec<RaceResult>) -> ResultsData {
    ResultsData {
        events: events.into_iter().map(|(id, e)| (id.to_string(), e)).collect(),
        results
    }
}

pub fn generate_athlete(full_name: &str, gender: &str) -> Athlete {
    Athlete {
        details: Some(AthleteDetails {
            full_name: Some(full_name.to_string()),
            gender: Some(gender.to_string()),
            ..AthleteDetails::default()
        })
    }
}

pub fn athletes_data(athletes: Vec<(i32, Athlete)>) -> AthletesData {
    AthletesData {
        athletes: athletes.into_iter().map(|(id, a)| (id.to_string(), a)).collect()
    }
}

pub fn generate_athlete_rating(athlete_id: i32, rating: f64, rating_deviation: f64) -> AthleteRating {
    AthleteRating {
        rating,
        rating_deviation,
        volatility: DEFAULT_VOLATILITY,
        ..AthleteRating::new(athlete_id)
    }
}

/// A period update dated on the last day of `period`.
pub fn generate_adjustment(
    period: RatingPeriod,
    rating_before: f64,
    rating_after: f64,
    opponents_faced: u32
) -> RatingAdjustment {
    RatingAdjustment {
        period,
        date: period.last_day(),
        label: period.label(),
        rating_before,
        rating_after,
        rd_before: DEFAULT_RD,
        rd_after: DEFAULT_RD - 50.0,
        volatility_before: DEFAULT_VOLATILITY,
        volatility_after: DEFAULT_VOLATILITY,
        rating_delta: rating_after - rating_before,
        opponents_faced,
        adjustment_type: RatingAdjustmentType::PeriodUpdate
    }
}

pub fn dated_result(athlete_id: i32, event_id: i32, prog_id: i32, status: FinishStatus, date: NaiveDate) -> DatedResult {
    DatedResult {
        athlete_id,
        event_id,
        prog_id,
        status,
        date
    }
}

/// A synthetic season: `n_months` months starting January 2020, each with `heats_per_month`
/// single-program events of `heat_size` athletes drawn from ids `1..=n_athletes`.
/// Roughly one entry in twenty is a DNF. Seeded, so the output is reproducible.
pub fn generate_season(
    n_athletes: i32,
    n_months: u32,
    heats_per_month: u32,
    heat_size: usize,
    seed: u64
) -> ResultsData {
    if heat_size as i32 > n_athletes {
        panic!("Heat size must not exceed the number of athletes");
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let athlete_ids: Vec<i32> = (1..=n_athletes).collect();
    let start = ymd(2020, 1, 1);

    let mut events = Vec::new();
    let mut results = Vec::new();
    let mut event_id = 1;

    for month in 0..n_months {
        let month_start = start + Months::new(month);
        let month_days = RatingPeriod::from_date(month_start).last_day().day();

        for _ in 0..heats_per_month {
            let day = rng.random_range(1..=month_days);
            let date = month_start.with_day(day).unwrap_or(month_start);
            events.push((event_id, generate_event(&format!("Synthetic Cup {event_id}"), Some(&date.to_string()))));

            let mut field = athlete_ids.clone();
            field.shuffle(&mut rng);

            for (position, athlete_id) in field.into_iter().take(heat_size).enumerate() {
                if rng.random_range(0..20) == 0 {
                    results.push(generate_dnf(athlete_id, event_id, 1));
                } else {
                    results.push(generate_result(athlete_id, event_id, 1, Some(position as i32 + 1)));
                }
            }

            event_id += 1;
        }
    }

    results_data(events, results)
}
