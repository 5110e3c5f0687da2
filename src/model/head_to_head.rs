use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::database::db_structs::{AthletesData, HeadToHead, Meeting, RaceResult, ResultsData};

/// Builds head-to-head records for every pair of athletes who finished in the same heat.
///
/// Every heat in the results counts, dated or not. Only athletes with a finishing position
/// take part; for each pair the better position wins, and the earlier listed athlete wins
/// a tie. Records are keyed `"{smaller id}-{larger id}"`.
pub fn generate_head_to_head(results: &ResultsData, athletes: &AthletesData) -> BTreeMap<String, HeadToHead> {
    let events = results.event_lookup();
    let mut head_to_head: BTreeMap<String, HeadToHead> = BTreeMap::new();

    for ((event_id, prog_id), finishers) in finishers_by_heat(&results.results) {
        let event = events.get(&event_id);
        let event_title = event.map_or("Unknown Event", |e| e.title_or_default());
        let event_date = event.and_then(|e| e.date.clone());

        for (i, &(winner_id, winner_position)) in finishers.iter().enumerate() {
            for &(loser_id, loser_position) in &finishers[i + 1..] {
                if winner_id == loser_id {
                    continue;
                }

                let (smaller, larger) = (winner_id.min(loser_id), winner_id.max(loser_id));
                let record = head_to_head
                    .entry(format!("{}-{}", smaller, larger))
                    .or_insert_with(|| HeadToHead {
                        athlete1_id: smaller,
                        athlete1_name: athletes.name_of(smaller),
                        athlete2_id: larger,
                        athlete2_name: athletes.name_of(larger),
                        encounters: 0,
                        athlete1_wins: 0,
                        athlete2_wins: 0,
                        meetings: Vec::new()
                    });

                record.encounters += 1;
                if winner_id == smaller {
                    record.athlete1_wins += 1;
                } else {
                    record.athlete2_wins += 1;
                }

                record.meetings.push(Meeting {
                    event_id,
                    prog_id,
                    event_title: event_title.to_string(),
                    event_date: event_date.clone(),
                    winner_id,
                    winner_position,
                    loser_id,
                    loser_position
                });
            }
        }
    }

    head_to_head
}

/// `(athlete id, position)` of every positioned result, grouped by `(event, program)` in
/// first-seen order and sorted by position. A missing program id groups as program 0.
fn finishers_by_heat(results: &[RaceResult]) -> IndexMap<(i32, i32), Vec<(i32, i32)>> {
    let mut heats: IndexMap<(i32, i32), Vec<(i32, i32)>> = IndexMap::new();

    for result in results {
        let Some(event_id) = result.event_id else {
            continue;
        };
        let heat = heats.entry((event_id, result.prog_id.unwrap_or(0))).or_default();

        if let (Some(athlete_id), Some(position)) = (result.athlete_id, result.position) {
            heat.push((athlete_id, position));
        }
    }

    for finishers in heats.values_mut() {
        finishers.sort_by_key(|&(_, position)| position);
    }

    heats
}
