use std::{fs, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use log::info;

use catalog_api::{
    db::establish_pool,
    logging::init_logging,
    server::{self, ServerConfig},
};

#[derive(Parser, Debug, Clone)]
struct Args {
    /// Content directory for uploaded files
    #[arg(long, default_value = "./uploads")]
    content_dir: PathBuf,
    /// SQLite db file path
    #[arg(long, default_value = "./catalog.db")]
    db_path: PathBuf,
    /// Bind address
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: String,
    /// Maximum accepted upload size in bytes
    #[arg(long, default_value_t = 16 * 1024 * 1024)]
    max_upload_bytes: usize,
    /// Run migrations and exit (for testing/deployment)
    #[arg(long, default_value_t = false)]
    migrate_only: bool,
}

#[actix_web::main]
async fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();
    fs::create_dir_all(&args.content_dir)?;
    if let Some(parent) = args.db_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let pool = establish_pool(&args.db_path)?;
    if args.migrate_only {
        info!("migrations applied, exiting due to --migrate-only flag");
        return Ok(());
    }

    let config = ServerConfig {
        content_dir: args.content_dir.clone(),
        addr: args.addr.clone(),
        max_upload_bytes: args.max_upload_bytes,
    };
    server::run(config, pool).await
}
