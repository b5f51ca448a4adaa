//! worksync - Employee attendance tracker
//!
//! This is the main entry point. It wires together:
//! - Configuration loading
//! - Store initialization (SQLite slots under the data directory)
//! - The attendance session and aggregator
//! - The insight client

mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use worksync_api::Granularity;
use worksync_config::{load_config_or_default, Settings};
use worksync_core::{Aggregator, AttendanceSession, CoreEvent};
use worksync_insight::{
    GeminiClient, InsightPanel, InsightProvider, MockInsightProvider, RefreshOutcome,
};
use worksync_store::{IdentityStore, KeyValueStore, RecordStore, SqliteKvStore};
use worksync_util::{
    default_config_path, EmployeeId, WorksyncError, DATABASE_FILENAME, WORKSYNC_CONFIG_ENV,
    WORKSYNC_DATA_DIR_ENV,
};

use crate::output::Output;

/// worksync - Employee attendance tracker
#[derive(Parser, Debug)]
#[command(name = "worksync")]
#[command(about = "Check in, check out, and compare your hours with the team", long_about = None)]
struct Args {
    /// Configuration file path (default: ~/.config/worksync/config.toml)
    #[arg(short, long, env = WORKSYNC_CONFIG_ENV, default_value_os_t = default_config_path())]
    config: PathBuf,

    /// Data directory override (or set WORKSYNC_DATA_DIR env var)
    #[arg(short, long, env = WORKSYNC_DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    /// Print JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in with an employee code
    Login { code: String },

    /// Forget the logged-in employee
    Logout,

    /// Show who is logged in and today's records
    Status,

    /// Start a work period
    CheckIn,

    /// End the current work period
    CheckOut,

    /// Personal vs. team hours per day, month, or year
    Series {
        /// day, month, or year
        #[arg(default_value = "day")]
        granularity: Granularity,

        /// Number of windows (default: 7 days, 6 months, 3 years)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Employee code (default: the logged-in employee)
        #[arg(short, long)]
        employee: Option<String>,
    },

    /// Ask the insight service to analyze recent records
    Insight {
        /// Use a canned insight instead of calling the service
        #[arg(long)]
        offline: bool,
    },

    /// Delete all attendance records (they are reseeded on next use)
    Reset {
        #[arg(long)]
        yes: bool,
    },

    /// List the configured employees
    Roster,
}

/// Everything one command invocation needs
struct App {
    settings: Settings,
    records: Arc<RecordStore>,
    session: AttendanceSession,
    out: Output,
}

impl App {
    fn open(args: &Args) -> Result<Self> {
        let settings = load_config_or_default(&args.config)
            .with_context(|| format!("Failed to load config from {:?}", args.config))?;

        debug!(
            config_path = %args.config.display(),
            employees = settings.roster.len(),
            seeding = settings.seed.enabled,
            "Configuration loaded"
        );

        let data_dir = args
            .data_dir
            .clone()
            .unwrap_or_else(|| settings.storage.data_dir.clone());

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;

        let db_path = data_dir.join(DATABASE_FILENAME);
        let kv: Arc<dyn KeyValueStore> = Arc::new(
            SqliteKvStore::open(&db_path)
                .with_context(|| format!("Failed to open database {:?}", db_path))?,
        );

        debug!(db_path = %db_path.display(), "Store initialized");

        let records = Arc::new(RecordStore::new(
            kv.clone(),
            settings.roster.clone(),
            settings.seed.clone(),
        ));
        let mut session = AttendanceSession::new(records.clone(), IdentityStore::new(kv));
        session.restore(worksync_util::now())?;

        Ok(Self {
            settings,
            records,
            session,
            out: Output::new(args.json),
        })
    }

    async fn run(mut self, command: Command) -> Result<()> {
        let now = worksync_util::now();

        match command {
            Command::Login { code } => {
                let event = self.session.login(&code, now).map_err(user_error)?;
                if let CoreEvent::LoggedIn { employee, state } = event {
                    self.out.logged_in(&employee, &state)?;
                }
            }

            Command::Logout => {
                let event = self.session.logout().map_err(user_error)?;
                if let CoreEvent::LoggedOut { employee_id } = event {
                    self.out.message(&format!("Logged out {}", employee_id))?;
                }
            }

            Command::Status => {
                let today = match self.session.current_employee() {
                    Some(_) => self.session.today_records(now)?,
                    None => Vec::new(),
                };
                self.out
                    .status(self.session.current_employee(), self.session.state(), &today)?;
            }

            Command::CheckIn => {
                let event = self.session.check_in(now).map_err(user_error)?;
                if let CoreEvent::CheckedIn { record } = event {
                    self.out.checked_in(&record)?;
                }
            }

            Command::CheckOut => {
                let event = self.session.check_out(now).map_err(user_error)?;
                if let CoreEvent::CheckedOut {
                    record,
                    duration_minutes,
                } = event
                {
                    self.out.checked_out(&record, duration_minutes)?;
                }
            }

            Command::Series {
                granularity,
                count,
                employee,
            } => {
                let employee_id = self.series_employee(employee)?;
                let count = count.unwrap_or_else(|| granularity.default_count());
                let rows = Aggregator::new(self.records.clone())
                    .series(granularity, &employee_id, count, now)?;
                self.out.series(granularity, &employee_id, &rows)?;
            }

            Command::Insight { offline } => {
                let records = self.records.load()?;
                let provider: Arc<dyn InsightProvider> = if offline {
                    Arc::new(MockInsightProvider::canned())
                } else {
                    match GeminiClient::from_settings(&self.settings.insight) {
                        Ok(client) => Arc::new(client),
                        Err(e) => {
                            warn!(error = %e, "Insight client unavailable");
                            return self.out.insight(&RefreshOutcome::Unavailable);
                        }
                    }
                };

                let panel = InsightPanel::new(provider, self.settings.insight.max_records);
                let outcome = panel.refresh(&records).await;
                self.out.insight(&outcome)?;
            }

            Command::Reset { yes } => {
                if !yes {
                    bail!("Refusing to delete all attendance records without --yes");
                }
                self.records.reset()?;
                self.out.message("Attendance records cleared")?;
            }

            Command::Roster => {
                self.out.roster(&self.settings.roster)?;
            }
        }

        Ok(())
    }

    fn series_employee(&self, requested: Option<String>) -> Result<EmployeeId> {
        match requested {
            Some(code) => {
                let id = EmployeeId::new(code.trim());
                if self.settings.roster.find(&id).is_none() {
                    return Err(user_error(WorksyncError::UnknownEmployee(code)));
                }
                Ok(id)
            }
            None => self
                .session
                .current_employee()
                .map(|e| e.id.clone())
                .ok_or_else(|| user_error(WorksyncError::NotLoggedIn)),
        }
    }
}

/// Session errors are shown with their short, human wording
fn user_error(e: WorksyncError) -> anyhow::Error {
    anyhow::anyhow!(e.user_message())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries command output
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        mock_time = worksync_util::is_mock_time_active(),
        "worksync starting"
    );

    let app = App::open(&args)?;
    app.run(args.command).await
}
