use std::path::PathBuf;

use admin::{SuperuserInput, create_superuser, import_locations, parse_locations, record_result};
use clap::{Parser, Subcommand};
use storage::{
    Database,
    repository::{account::AccountRepository, location::LocationRepository},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "manage")]
#[command(about = "Competition platform administration", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a verified account with staff and superuser rights
    CreateSuperuser {
        #[arg(long)]
        phone_number: String,

        #[arg(long, env = "SUPERUSER_PASSWORD")]
        password: String,

        #[arg(long)]
        first_name: Option<String>,

        #[arg(long)]
        last_name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
    /// Upsert countries and cities from a JSON file
    ImportLocations { file: PathBuf },
    /// Store a participant's finishing time
    RecordResult {
        #[arg(long)]
        participant_id: i32,

        /// Finishing time as HH:MM:SS
        #[arg(long)]
        duration: String,

        #[arg(long)]
        position: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("manage={},admin={}", log_level, log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;

    match cli.command {
        Commands::CreateSuperuser {
            phone_number,
            password,
            first_name,
            last_name,
            email,
        } => {
            let input = SuperuserInput {
                phone_number,
                password,
                first_name,
                last_name,
                email,
            };

            let account = create_superuser(&AccountRepository::new(db.pool()), &input).await?;
            println!(
                "Superuser {} created with id {}",
                account.phone_number, account.account_id
            );
        }
        Commands::ImportLocations { file } => {
            let content = std::fs::read_to_string(&file)?;
            let countries = parse_locations(&content)?;

            tracing::info!("Importing {} countries from {}", countries.len(), file.display());

            let summary = import_locations(&LocationRepository::new(db.pool()), &countries).await?;
            println!(
                "Imported {} countries and {} cities",
                summary.countries, summary.cities
            );
        }
        Commands::RecordResult {
            participant_id,
            duration,
            position,
        } => {
            let participant = record_result(db.pool(), participant_id, &duration, position).await?;
            println!(
                "Participant {} finished in {}",
                participant.participant_id,
                participant.duration.as_deref().unwrap_or("-")
            );
        }
    }

    Ok(())
}
