use std::{
    env,
    path::{Path, PathBuf},
    process::Command
};

use approx::assert_relative_eq;
use tri_rating::{
    database::{
        db_structs::{AnalysisOutput, AthletesData, ResultsData},
        json_store::{load_json, save_json}
    },
    model::analysis::{analyze, AnalysisOptions},
    utils::test_utils::{athletes_data, generate_athlete, generate_season}
};

use crate::common::init_test_env;

fn temp_dir(name: &str) -> PathBuf {
    env::temp_dir().join(format!("tri-rating-it-{}-{}", std::process::id(), name))
}

fn write_inputs(dir: &Path) -> (PathBuf, PathBuf) {
    let results = generate_season(16, 4, 3, 8, 42);
    let athletes = athletes_data(
        (1..=16)
            .map(|id| {
                let gender = if id % 4 == 0 { "female" } else { "male" };
                (id, generate_athlete(&format!("Athlete {id}"), gender))
            })
            .collect()
    );

    let results_path = dir.join("results_data.json");
    let athletes_path = dir.join("athletes_data.json");
    save_json(&results, &results_path).unwrap();
    save_json(&athletes, &athletes_path).unwrap();

    (results_path, athletes_path)
}

#[test]
fn test_analysis_output_survives_json_round_trip() {
    init_test_env();
    let dir = temp_dir("round-trip");
    let (results_path, athletes_path) = write_inputs(&dir);

    let results: ResultsData = load_json(&results_path).unwrap();
    let athletes: AthletesData = load_json(&athletes_path).unwrap();
    let output = analyze(&results, &athletes, &AnalysisOptions::default());

    let output_path = dir.join("analyzed_data.json");
    save_json(&output, &output_path).unwrap();
    let loaded: AnalysisOutput = load_json(&output_path).unwrap();

    assert_eq!(
        loaded.athlete_ratings.keys().collect::<Vec<_>>(),
        output.athlete_ratings.keys().collect::<Vec<_>>()
    );
    for (id, rating) in &output.athlete_ratings {
        let reloaded = &loaded.athlete_ratings[id];
        assert_relative_eq!(reloaded.rating, rating.rating);
        assert_relative_eq!(reloaded.rating_deviation, rating.rating_deviation);
        assert_eq!(reloaded.history.len(), rating.history.len());
    }
    assert_eq!(
        loaded.monthly_top.keys().collect::<Vec<_>>(),
        output.monthly_top.keys().collect::<Vec<_>>()
    );
    assert_eq!(loaded.timeline.len(), output.timeline.len());
    assert_eq!(loaded.metadata.period_count, 4);
    assert_eq!(loaded.metadata.athlete_count, 16);
    assert!(loaded.monthly_top.values().all(|leaders| leaders.len() <= 10));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_gender_filter_limits_rated_population() {
    init_test_env();
    let dir = temp_dir("gender");
    let (results_path, athletes_path) = write_inputs(&dir);
    let results: ResultsData = load_json(&results_path).unwrap();
    let athletes: AthletesData = load_json(&athletes_path).unwrap();

    let options = AnalysisOptions {
        gender: Some("female".to_string()),
        ..AnalysisOptions::default()
    };
    let output = analyze(&results, &athletes, &options);

    assert_eq!(output.metadata.athlete_count, 4);
    assert!(output.athlete_ratings.keys().all(|id| id % 4 == 0));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_binary_writes_output_file() {
    init_test_env();
    let dir = temp_dir("binary");
    let (results_path, athletes_path) = write_inputs(&dir);
    let output_path = dir.join("out").join("analyzed_data.json");

    let status = Command::new(env!("CARGO_BIN_EXE_tri-rating"))
        .env_remove("CONNECTION_STRING")
        .env_remove("RUST_LOG")
        .arg("--results-file")
        .arg(&results_path)
        .arg("--athletes-file")
        .arg(&athletes_path)
        .arg("--output-file")
        .arg(&output_path)
        .args(["--gender", "any", "--log-level", "warn"])
        .status()
        .unwrap();

    assert!(status.success());
    let output: AnalysisOutput = load_json(&output_path).unwrap();
    assert_eq!(output.metadata.athlete_count, 16);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_binary_fails_on_missing_input() {
    init_test_env();
    let dir = temp_dir("missing");

    let status = Command::new(env!("CARGO_BIN_EXE_tri-rating"))
        .env_remove("CONNECTION_STRING")
        .env_remove("RUST_LOG")
        .arg("--results-file")
        .arg(dir.join("nowhere.json"))
        .arg("--output-file")
        .arg(dir.join("analyzed_data.json"))
        .args(["--log-level", "error"])
        .status()
        .unwrap();

    assert!(!status.success());
    assert!(!dir.join("analyzed_data.json").exists());
}
