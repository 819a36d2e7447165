//! tlk-fl - Featured Listings Microservice
//!
//! **Module Identity:**
//! - Name: tlk-fl (Featured Listings)
//! - Port: 5731 (default)
//!
//! **[FLS-OV-010]** Serves the ranked featured tutor and student-case
//! listings that power the marketplace homepage carousels. Reads the shared
//! TutorLink database; its only write path is the auto-promotion fallback.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tlk_fl::AppState;

#[derive(Debug, Parser)]
#[command(name = "tlk-fl", about = "TutorLink featured listings service")]
struct Args {
    /// Root data folder (falls back to TLK_ROOT_FOLDER, then config file)
    #[arg(long)]
    root_folder: Option<String>,

    /// Listen port
    #[arg(long, env = "TLK_FL_PORT", default_value_t = 5731)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    info!("Starting tlk-fl (Featured Listings) microservice");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    // Resolve root folder: CLI -> ENV -> TOML -> OS default
    let root_folder =
        tlk_common::config::resolve_root_folder(args.root_folder.as_deref(), "TLK_ROOT_FOLDER");
    let db_path = tlk_common::config::ensure_root_folder(&root_folder)?;
    info!("Database: {}", db_path.display());

    let db_pool = tlk_common::db::init_database_pool(&db_path).await?;
    tlk_fl::db::init_tables(&db_pool).await?;
    info!("Database connection established");

    // Startup sanity check on persisted parameters
    let params = tlk_fl::db::parameters::load_ranking_params(&db_pool).await?;
    if let Err(e) = params.validate() {
        tracing::warn!(error = %e, "persisted ranking parameters invalid; requests use them as-is");
    }

    let state = AppState::new(db_pool);
    let app = tlk_fl::build_router(state);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", args.port)).await?;
    info!("Listening on http://127.0.0.1:{}", args.port);
    info!("Health check: http://127.0.0.1:{}/health", args.port);

    axum::serve(listener, app).await?;

    Ok(())
}
