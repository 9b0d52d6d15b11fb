//! check_database: verify that an import finished and the database can be served.
//! Usage:
//!   check_database [--project-dir DIR] [--db-url DSN] [--tiger-data]
//! Exit code 0 when every check passes, 1 at the first failure.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use geocode_db_check::check::{CheckOptions, ConsoleReporter, PgProber, Pipeline};
use geocode_db_check::env_boot;
use geocode_db_check::settings::{Settings, SettingsOverrides};
use geocode_db_check::util::env as env_util;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "check_database",
    version,
    about = "Check that the import finished and the database is ready to serve"
)]
struct Cli {
    /// Directory holding the project's .env (default: current directory)
    #[arg(long)]
    project_dir: Option<PathBuf>,
    /// Override NOMINATIM_DATABASE_DSN (pgsql:dbname=... or postgres://...)
    #[arg(long)]
    db_url: Option<String>,
    /// Expect the US TIGER table regardless of NOMINATIM_USE_US_TIGER_DATA
    #[arg(long, default_value_t = false)]
    tiger_data: bool,
    /// Disable colored status tokens
    #[arg(long, default_value_t = false)]
    no_color: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_dir = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("cannot determine working directory")?,
    };
    // .env first so RUST_LOG from the project applies to the subscriber
    env_boot::ensure_dotenv(&project_dir);
    geocode_db_check::tracing::init_tracing("warn,sqlx=error")?;

    let settings = Settings::resolve(
        &project_dir,
        SettingsOverrides {
            database_dsn: cli.db_url,
            use_us_tiger_data: cli.tiger_data,
        },
    );
    info!(
        project_dir = %settings.project_dir.display(),
        dsn = %env_util::redact_dsn(&settings.database_dsn),
        tiger = settings.use_us_tiger_data,
        "starting database check"
    );

    let mut prober = PgProber::new(settings.database_dsn.clone());
    let mut reporter = ConsoleReporter::new(!cli.no_color);
    let options = CheckOptions {
        use_tiger_data: settings.use_us_tiger_data,
    };

    let verdict = Pipeline::new(&mut prober, &mut reporter, options)
        .run()
        .await;

    std::process::exit(verdict.exit_code());
}
