use clap::Parser;
use thiserror::Error;
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tri_rating::{
    args::Args,
    database::{
        db::{DbClient, DbError},
        json_store::{load_athletes, load_results, save_output, DataError}
    },
    model::analysis::{analyze, AnalysisOptions}
};

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Db(#[from] DbError)
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    let indicatif_layer = IndicatifLayer::new();
    tracing_subscriber::registry()
        .with(EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();

    if let Err(e) = run(&args).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(args: &Args) -> Result<(), AppError> {
    let results = load_results(&args.results_file)?;
    let athletes = load_athletes(&args.athletes_file)?;

    let options = AnalysisOptions {
        gender: args.gender_filter(),
        limit_athletes: args.limit_athletes,
        top: args.top
    };
    let output = analyze(&results, &athletes, &options);

    save_output(&output, &args.output_file)?;

    if let Some(connection_string) = &args.connection_string {
        let client = DbClient::connect(connection_string).await?;
        let ratings: Vec<_> = output.athlete_ratings.values().cloned().collect();
        client.save_results(&ratings).await?;
    }

    let metadata = &output.metadata;
    info!(
        athletes = metadata.athlete_count,
        rated = metadata.rated_athlete_count,
        events = metadata.event_count,
        results = metadata.result_count,
        dropped = metadata.dropped_result_count,
        periods = metadata.period_count,
        head_to_head = metadata.head_to_head_count,
        "Analysis completed in {}",
        metadata.processing_time
    );

    Ok(())
}
