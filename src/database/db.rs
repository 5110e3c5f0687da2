use super::db_structs::{AthleteRating, RatingAdjustment};
use itertools::Itertools;
use std::{collections::HashMap, sync::Arc};
use thiserror::Error;
use tokio_postgres::{Client, NoTls};
use tracing::{error, info, warn};

/// Rows per INSERT statement
const INSERT_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database error: {0}")]
    QueryError(#[from] tokio_postgres::Error),

    #[error("No athlete ratings to save")]
    NothingToSave
}

#[derive(Clone)]
pub struct DbClient {
    client: Arc<Client>
}

impl DbClient {
    // Connect to the database and return a DbClient instance
    pub async fn connect(connection_str: &str) -> Result<Self, DbError> {
        let (client, connection) = tokio_postgres::connect(connection_str, NoTls).await?;

        // Spawn the connection object to run in the background
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("connection error: {}", e);
            }
        });

        Ok(DbClient {
            client: Arc::new(client)
        })
    }

    /// Replaces the stored ratings and history with `ratings`.
    ///
    /// Both tables are truncated and refilled inside one transaction; on failure the
    /// previous contents are kept.
    pub async fn save_results(&self, ratings: &[AthleteRating]) -> Result<(), DbError> {
        if ratings.is_empty() {
            return Err(DbError::NothingToSave);
        }

        self.client.batch_execute("BEGIN").await?;

        match self.replace_all(ratings).await {
            Ok(()) => {
                self.client.batch_execute("COMMIT").await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = self.client.batch_execute("ROLLBACK").await {
                    warn!("Rollback failed: {}", rollback);
                }
                Err(e)
            }
        }
    }

    async fn replace_all(&self, ratings: &[AthleteRating]) -> Result<(), DbError> {
        self.truncate_tables(&["rating_history", "athlete_ratings"]).await?;

        let parent_ids = self.save_athlete_ratings(ratings).await?;
        info!("Athlete ratings saved");

        self.save_rating_history(ratings, &parent_ids).await?;
        info!("Rating history saved");

        Ok(())
    }

    /// Saves the rating records, returning the row id of each by athlete id
    async fn save_athlete_ratings(&self, ratings: &[AthleteRating]) -> Result<HashMap<i32, i32>, DbError> {
        let mut parent_ids = HashMap::with_capacity(ratings.len());

        for chunk in ratings.chunks(INSERT_CHUNK_SIZE) {
            let query = format!(
                "INSERT INTO athlete_ratings (athlete_id, initial_rating, rating, rating_deviation, \
                volatility, races_completed) VALUES {} RETURNING id, athlete_id",
                chunk.iter().map(rating_values).join(", ")
            );

            for row in self.client.query(query.as_str(), &[]).await? {
                parent_ids.insert(row.get::<_, i32>("athlete_id"), row.get::<_, i32>("id"));
            }
        }

        Ok(parent_ids)
    }

    /// Save every history entry in batched queries
    async fn save_rating_history(
        &self,
        ratings: &[AthleteRating],
        parent_ids: &HashMap<i32, i32>
    ) -> Result<(), DbError> {
        let values: Vec<String> = ratings
            .iter()
            .filter_map(|rating| parent_ids.get(&rating.athlete_id).map(|id| (*id, rating)))
            .flat_map(|(parent_id, rating)| {
                rating
                    .history
                    .iter()
                    .map(move |adjustment| history_values(parent_id, rating.athlete_id, adjustment))
            })
            .collect();

        info!("Saving {} rating history entries", values.len());

        for chunk in values.chunks(INSERT_CHUNK_SIZE) {
            let query = format!(
                "INSERT INTO rating_history (athlete_rating_id, athlete_id, period, date, label, \
                rating_before, rating_after, rd_before, rd_after, volatility_before, volatility_after, \
                rating_delta, opponents_faced, adjustment_type) VALUES {}",
                chunk.join(", ")
            );
            self.client.batch_execute(query.as_str()).await?;
        }

        Ok(())
    }

    async fn truncate_tables(&self, tables: &[&str]) -> Result<(), DbError> {
        self.client
            .batch_execute(format!("TRUNCATE TABLE {} RESTART IDENTITY CASCADE", tables.join(", ")).as_str())
            .await?;

        info!("Truncated the {} tables!", tables.join(", "));
        Ok(())
    }

    // Access the underlying Client
    pub fn client(&self) -> Arc<Client> {
        Arc::clone(&self.client)
    }
}

fn rating_values(rating: &AthleteRating) -> String {
    format!(
        "({}, {}, {}, {}, {}, {})",
        rating.athlete_id,
        rating.initial,
        rating.rating,
        rating.rating_deviation,
        rating.volatility,
        rating.races_completed
    )
}

fn history_values(parent_id: i32, athlete_id: i32, adjustment: &RatingAdjustment) -> String {
    format!(
        "({}, {}, {}, '{}', {}, {}, {}, {}, {}, {}, {}, {}, {}, {})",
        parent_id,
        athlete_id,
        sql_text(&adjustment.period.to_string()),
        adjustment.date.format("%Y-%m-%d"),
        sql_text(&adjustment.label),
        adjustment.rating_before,
        adjustment.rating_after,
        adjustment.rd_before,
        adjustment.rd_after,
        adjustment.volatility_before,
        adjustment.volatility_after,
        adjustment.rating_delta,
        adjustment.opponents_faced,
        adjustment.adjustment_type as i32
    )
}

/// Quotes a string literal for direct embedding in a query
fn sql_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
