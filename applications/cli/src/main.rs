/// Reprise CLI - inspect and manage resume data outside the browser
use anyhow::Context;
use clap::{Parser, Subcommand};
use reprise_core::{RepriseConfig, ResourceKey, SharedStore, VisibilityUpdate};
use reprise_playback::{
    clamp_speed, library, PreferenceStore, ProgressTracker, RetainedPreferences, SaveOutcome,
};
use reprise_storage::{create_pool, run_migrations, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "reprise")]
#[command(about = "Resume positions and playback preferences", long_about = None)]
struct Cli {
    /// SQLite database holding the store
    #[arg(long, env = "REPRISE_DATABASE", default_value = "sqlite://reprise.db")]
    database: String,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List resumable items
    List,
    /// Forget one item
    Remove {
        /// Resource address
        key: String,
    },
    /// Clear everything, keeping current preferences
    Clear,
    /// Show or change control visibility
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Set the preferred playback speed
    Speed {
        /// Requested rate, clamped to the configured range
        value: f64,
    },
    /// Record a position as the player would
    Save {
        /// Resource address
        key: String,
        /// Elapsed seconds
        position: f64,
        /// Total seconds
        duration: f64,
        /// Simulate an incognito session
        #[arg(long)]
        incognito: bool,
    },
    /// Print the saved position of an item
    Restore {
        /// Resource address
        key: String,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print current preferences
    Show,
    /// Change visibility flags; omitted flags are left as they are
    Set {
        /// Show seek buttons
        #[arg(long)]
        rewind: Option<bool>,
        /// Show speed control
        #[arg(long)]
        speed_control: Option<bool>,
        /// Show incognito toggle
        #[arg(long)]
        incognito: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reprise=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = RepriseConfig::load(cli.config.as_deref()).context("loading configuration")?;

    let pool = create_pool(&cli.database)
        .await
        .with_context(|| format!("opening {}", cli.database))?;
    run_migrations(&pool).await.context("running migrations")?;
    info!(database = %cli.database, "store opened");
    let store: SharedStore = Arc::new(SqliteStore::new(pool));

    match cli.command {
        Commands::List => list(&store, &config).await?,
        Commands::Remove { key } => {
            let key = ResourceKey::new(key);
            library::remove_item(&*store, &key).await?;
            info!(%key, "removed resume record");
        }
        Commands::Clear => clear(&store).await?,
        Commands::Prefs { action } => prefs(&store, action).await?,
        Commands::Speed { value } => {
            let speed = clamp_speed(value, &config.video);
            PreferenceStore::new(store).set_speed(speed).await?;
            info!(requested = value, speed, "preferred speed updated");
            println!("speed set to {speed}x");
        }
        Commands::Save {
            key,
            position,
            duration,
            incognito,
        } => {
            let tracker = ProgressTracker::from_settings(store, &config.video);
            let key = ResourceKey::new(key);
            let outcome = tracker.save(&key, position, duration, incognito).await;
            debug!(%key, position, duration, ?outcome, "save finished");
            report_save(outcome);
        }
        Commands::Restore { key } => {
            let tracker = ProgressTracker::from_settings(store, &config.video);
            match tracker.restore(&ResourceKey::new(key)).await {
                Some(position) => println!("{position}"),
                None => println!("no saved position"),
            }
        }
    }

    Ok(())
}

async fn list(store: &SharedStore, config: &RepriseConfig) -> anyhow::Result<()> {
    let items = library::list_resumable(&**store, &config.library.resumable_prefix).await?;

    if items.is_empty() {
        println!("No active playback history found.");
        return Ok(());
    }

    for item in items {
        println!("{}  {}  {}", item.timestamp(), item.title, item.key);
    }
    Ok(())
}

async fn clear(store: &SharedStore) -> anyhow::Result<()> {
    let current = PreferenceStore::new(Arc::clone(store)).snapshot().await;
    let retained = RetainedPreferences {
        visibility: current.visibility,
        speed: Some(current.speed),
    };

    info!(?retained, "clearing all resume data");
    library::clear_all(store, &retained).await?;
    println!("All playback history cleared.");
    Ok(())
}

async fn prefs(store: &SharedStore, action: PrefsAction) -> anyhow::Result<()> {
    let prefs = PreferenceStore::new(Arc::clone(store));

    if let PrefsAction::Set {
        rewind,
        speed_control,
        incognito,
    } = action
    {
        prefs
            .set_visibility(VisibilityUpdate {
                show_rewind: rewind,
                show_speed: speed_control,
                show_incognito: incognito,
            })
            .await?;
    }

    let snapshot = prefs.snapshot().await;
    println!("show rewind:    {}", snapshot.visibility.show_rewind);
    println!("show speed:     {}", snapshot.visibility.show_speed);
    println!("show incognito: {}", snapshot.visibility.show_incognito);
    println!("speed:          {}x", snapshot.speed);
    Ok(())
}

fn report_save(outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Saved(position) => println!("saved {position}"),
        SaveOutcome::Cleared => println!("finished, position cleared"),
        SaveOutcome::Skipped(reason) => println!("skipped: {reason:?}"),
        SaveOutcome::Dropped => println!("storage unavailable, position not saved"),
    }
}
