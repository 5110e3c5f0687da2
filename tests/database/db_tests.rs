use serial_test::serial;
use tri_rating::{
    database::{
        db::{DbClient, DbError},
        db_structs::AthleteRating
    },
    model::{glicko_model::GlickoModel, period::attach_dates},
    utils::test_utils::generate_season
};

use super::test_helpers::TestDatabase;
use crate::common::init_test_env;

fn rated_ratings() -> Vec<AthleteRating> {
    let data = generate_season(12, 3, 2, 6, 3);
    let (dated, _) = attach_dates(&data);
    let population: Vec<i32> = (1..=12).collect();

    let mut model = GlickoModel::new(&population);
    model.process(dated);
    model.rating_tracker.ratings().cloned().collect()
}

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_save_results_writes_both_tables() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");
    let ratings = rated_ratings();
    let history_len: usize = ratings.iter().map(|r| r.history.len()).sum();

    db.save_results(&ratings).await.expect("Failed to save results");

    assert_eq!(test_db.count("athlete_ratings").await.unwrap(), ratings.len() as i64);
    assert_eq!(test_db.count("rating_history").await.unwrap(), history_len as i64);

    let client = test_db.get_client().await.unwrap();
    let first = &ratings[0];
    let row = client
        .query_one(
            "SELECT rating, rating_deviation, races_completed FROM athlete_ratings WHERE athlete_id = $1",
            &[&first.athlete_id]
        )
        .await
        .unwrap();
    assert_eq!(row.get::<_, f64>("rating"), first.rating);
    assert_eq!(row.get::<_, f64>("rating_deviation"), first.rating_deviation);
    assert_eq!(row.get::<_, i32>("races_completed"), first.races_completed as i32);
}

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_save_results_replaces_previous_run() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");
    let ratings = rated_ratings();

    db.save_results(&ratings).await.unwrap();
    db.save_results(&ratings[..4]).await.unwrap();

    assert_eq!(test_db.count("athlete_ratings").await.unwrap(), 4);
    let history_len: usize = ratings[..4].iter().map(|r| r.history.len()).sum();
    assert_eq!(test_db.count("rating_history").await.unwrap(), history_len as i64);
}

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_failed_save_keeps_previous_contents() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");
    let ratings = rated_ratings();
    db.save_results(&ratings).await.unwrap();

    // A duplicate athlete id violates the unique constraint mid-transaction
    let mut duplicated = ratings.clone();
    duplicated.push(ratings[0].clone());

    assert!(matches!(db.save_results(&duplicated).await, Err(DbError::QueryError(_))));
    assert_eq!(test_db.count("athlete_ratings").await.unwrap(), ratings.len() as i64);
}

#[tokio::test]
#[serial]
#[ignore = "requires docker"]
async fn test_empty_save_is_rejected() {
    init_test_env();
    let test_db = TestDatabase::new().await.expect("Failed to create test database");
    let db = DbClient::connect(&test_db.connection_string)
        .await
        .expect("Failed to connect");

    assert!(matches!(db.save_results(&[]).await, Err(DbError::NothingToSave)));
}
