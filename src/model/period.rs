use crate::{
    database::db_structs::ResultsData,
    model::structures::{finish_status::FinishStatus, rating_period::RatingPeriod}
};
use chrono::NaiveDate;
use indexmap::IndexMap;
use itertools::Itertools;

/// A ratable result: every field resolved, the event date attached.
#[derive(Debug, Clone, PartialEq)]
pub struct DatedResult {
    pub athlete_id: i32,
    pub event_id: i32,
    pub prog_id: i32,
    pub status: FinishStatus,
    pub date: NaiveDate
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatEntry {
    pub athlete_id: i32,
    pub status: FinishStatus
}

/// The results of one program of one event: the only scope in which athletes are compared.
#[derive(Debug, Clone, PartialEq)]
pub struct Heat {
    pub event_id: i32,
    pub prog_id: i32,
    pub entries: Vec<HeatEntry>
}

/// Every heat raced during one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodBatch {
    pub period: RatingPeriod,
    /// Last event date seen in the month
    pub as_of: NaiveDate,
    pub heats: Vec<Heat>
}

impl PeriodBatch {
    pub fn result_count(&self) -> usize {
        self.heats.iter().map(|h| h.entries.len()).sum()
    }
}

/// Resolves the event date and finishing status of every result.
///
/// Returns the ratable results in source order, along with the number of results dropped
/// for a missing id, an unresolvable event or date, or a missing position and status.
pub fn attach_dates(data: &ResultsData) -> (Vec<DatedResult>, usize) {
    let events = data.event_lookup();

    let dated: Vec<DatedResult> = data
        .results
        .iter()
        .filter_map(|r| {
            let event_id = r.event_id?;
            let date = events.get(&event_id)?.parsed_date()?;

            Some(DatedResult {
                athlete_id: r.athlete_id?,
                event_id,
                prog_id: r.prog_id?,
                status: FinishStatus::from_result(r.position, r.status.as_deref())?,
                date
            })
        })
        .collect();

    let dropped = data.results.len() - dated.len();
    (dated, dropped)
}

/// Sorts results by date and splits them into chronological monthly batches.
///
/// The sort is stable, so results sharing a date keep their source order. Within a
/// month, heats appear in the order their first result was seen.
pub fn bucket_by_period(mut results: Vec<DatedResult>) -> Vec<PeriodBatch> {
    results.sort_by_key(|r| r.date);

    results
        .into_iter()
        .chunk_by(|r| RatingPeriod::from_date(r.date))
        .into_iter()
        .map(|(period, chunk)| {
            let chunk: Vec<DatedResult> = chunk.collect();
            let as_of = chunk.iter().map(|r| r.date).max().unwrap_or_else(|| period.last_day());

            PeriodBatch {
                period,
                as_of,
                heats: group_heats(chunk)
            }
        })
        .collect()
}

fn group_heats(results: Vec<DatedResult>) -> Vec<Heat> {
    let mut heats: IndexMap<(i32, i32), Vec<HeatEntry>> = IndexMap::new();

    for r in results {
        heats.entry((r.event_id, r.prog_id)).or_default().push(HeatEntry {
            athlete_id: r.athlete_id,
            status: r.status
        });
    }

    heats
        .into_iter()
        .map(|((event_id, prog_id), entries)| Heat {
            event_id,
            prog_id,
            entries
        })
        .collect()
}
