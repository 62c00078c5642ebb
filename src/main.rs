//! CLI entry point for the entity log viewer.
//!
//! Provides subcommands for viewing entity log CSVs, adding files to the saved
//! session, merging files into one export, and restoring or clearing the
//! saved session.

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use entitylog_viewer::{
    charts::{render_heatmaps, render_timeline_charts},
    fetch::BasicClient,
    filter::{CoordBounds, EntityFilter},
    heatmap::zone_heatmaps,
    infra::session::{FileSessionStore, Session, SessionStore},
    loader::load_files,
    output::export_rows,
    report::{View, to_json, write_text},
    state::{AppState, MERGED_FILE_NAME},
};
use std::ffi::OsStr;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "entitylog_viewer")]
#[command(about = "Browse and aggregate entity logger CSV files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load CSV files (paths or URLs) and show their entities
    View {
        /// CSV files or URLs to load
        #[arg(value_name = "FILE_OR_URL", required = true)]
        sources: Vec<String>,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Add CSV files to the saved session and show the result
    Add {
        /// CSV files or URLs to add
        #[arg(value_name = "FILE_OR_URL", required = true)]
        sources: Vec<String>,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Merge CSV files into a single file with an averaged TPS line
    Merge {
        /// CSV files or URLs to merge
        #[arg(value_name = "FILE_OR_URL", required = true)]
        sources: Vec<String>,

        /// File to write the merged rows to
        #[arg(short, long, default_value = MERGED_FILE_NAME)]
        output: PathBuf,

        /// Gzip compress the merged file
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Restore or clear the saved session
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show the files from the last view again
    Restore {
        #[command(flatten)]
        view: ViewArgs,
    },
    /// Delete the saved session
    Clear,
}

#[derive(Args)]
struct ViewArgs {
    /// Merge all loaded files into one before showing them
    #[arg(short, long, default_value_t = false)]
    merge: bool,

    /// Only show entities whose name contains this text
    #[arg(short, long)]
    search: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    x_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    x_max: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    y_max: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    z_min: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    z_max: Option<f64>,

    /// List every location under its entity
    #[arg(short, long, default_value_t = false)]
    details: bool,

    /// Print JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Directory to write timeline and heatmap SVG charts to
    #[arg(long, value_name = "DIR")]
    charts: Option<PathBuf>,

    /// Do not save this view as the session
    #[arg(long, default_value_t = false)]
    no_save: bool,
}

impl ViewArgs {
    fn filter(&self) -> EntityFilter {
        let bounds = CoordBounds {
            x_min: self.x_min,
            x_max: self.x_max,
            y_min: self.y_min,
            y_max: self.y_max,
            z_min: self.z_min,
            z_max: self.z_max,
        };
        EntityFilter::new(self.search.as_deref(), bounds)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/entitylog_viewer.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("entitylog_viewer.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let session_path = std::env::var("SESSION_PATH")
        .unwrap_or_else(|_| ".entitylog/session.json".to_string());
    let store = FileSessionStore::new(session_path);

    match cli.command {
        Commands::View { sources, view } => {
            let state = load_state(&sources).await?;
            render(state, &view, &store).await?;
        }
        Commands::Add { sources, view } => {
            let saved = store
                .load()
                .await?
                .map(Session::into_state)
                .unwrap_or_default();
            let added = load_state(&sources).await?;
            info!(
                saved = saved.files.len(),
                added = added.files.len(),
                "Adding files to session"
            );
            render(saved.with_added(added.files), &view, &store).await?;
        }
        Commands::Merge {
            sources,
            output,
            gzip,
        } => {
            let state = load_state(&sources).await?.merged();
            let written = export_rows(&output, &state.files[0].rows, gzip)?;
            info!(path = %written.display(), "Merged file written");
        }
        Commands::Session { action } => match action {
            SessionAction::Restore { view } => match store.load().await? {
                Some(session) => {
                    info!(saved_at = %session.saved_at, "Restoring session");
                    render(session.into_state(), &view, &store).await?;
                }
                None => bail!("no saved session at {}", store.path().display()),
            },
            SessionAction::Clear => {
                store.clear().await?;
                info!("Session cleared");
            }
        },
    }

    Ok(())
}

/// Loads `sources` into a fresh state; fails only when nothing could be loaded.
async fn load_state(sources: &[String]) -> Result<AppState> {
    let outcome = load_files(&BasicClient::new(), sources).await;
    if outcome.files.is_empty() {
        bail!("none of the {} sources could be loaded", sources.len());
    }
    Ok(AppState::new(outcome.files))
}

/// Shows `state` on stdout, writes charts if asked, then saves the session.
#[tracing::instrument(skip_all, fields(files = state.files.len()))]
async fn render(state: AppState, args: &ViewArgs, store: &impl SessionStore) -> Result<()> {
    let state = if args.merge && state.files.len() > 1 {
        state.merged()
    } else {
        state
    };

    let view = View::build(&state);
    let filter = args.filter();

    {
        let mut stdout = std::io::stdout().lock();
        if args.json {
            writeln!(stdout, "{}", to_json(&view, &filter)?)?;
        } else {
            write_text(&mut stdout, &view, &filter, args.details)?;
        }
        stdout.flush()?;
    }

    if let Some(dir) = &args.charts {
        if let Some(timeline) = &view.timeline {
            render_timeline_charts(timeline, dir)?;
        } else {
            warn!("Timeline needs several timestamped files, skipping timeline charts");
        }
        for file in &view.files {
            render_heatmaps(&file.name, &zone_heatmaps(&file.groups), dir)?;
        }
        info!(dir = %dir.display(), "Charts written");
    }

    if !args.no_save {
        store.save(&Session::from_state(&state)).await?;
    }
    Ok(())
}
