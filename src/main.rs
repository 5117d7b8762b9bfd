use campus_insights::analytics::find_missing;
use campus_insights::config::{load_config, DashboardConfig, SourceKind};
use campus_insights::error::Result;
use campus_insights::model::Field;
use campus_insights::render::{export_page, ExportFormat};
use campus_insights::server::DashboardServer;
use campus_insights::session::Session;
use campus_insights::storage::StoreFactory;
use campus_insights::views::View;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Student enrollment dashboard
#[derive(Parser)]
#[command(name = "campus-insights")]
#[command(about = "Campus Insights - browse aggregate views of the student table", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Read the student table from a CSV export instead of the database
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load the student table once and serve the dashboard
    Serve {
        /// Address to listen on (default: from configuration)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (default: from configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// List the navigation entries
    Views,
    /// Compute one view and print it
    View {
        /// View slug, name or title (e.g. "province-summary")
        view: View,

        /// Output format: markdown, json or csv
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,
    },
    /// Print identifiers of students with no value for a field
    Missing {
        /// Field to check
        #[arg(long, default_value = "school")]
        field: Field,
    },
    /// Print the effective configuration (password redacted)
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let log_level = match cli.verbose {
        0 => config
            .as_ref()
            .map(|c| c.log_level.clone())
            .unwrap_or_else(|_| "info".to_string()),
        1 => "debug".to_string(),
        2 => "trace".to_string(),
        // -vvv shows everything including dependencies
        _ => "trace,hyper=debug,tower=debug,sqlx=debug".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .with_thread_ids(cli.verbose >= 3)
        .with_line_number(cli.verbose >= 3)
        .with_writer(std::io::stderr)
        .init();

    debug!("Campus Insights started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match config {
        Ok(mut config) => {
            if let Some(path) = cli.csv {
                config.source.kind = SourceKind::Csv;
                config.source.csv_path = Some(path);
            }
            run(cli.command, config).await
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Fatal error: {}", e);
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(command: Commands, config: DashboardConfig) -> Result<()> {
    match command {
        Commands::Serve { host, port } => {
            let session = open_session(&config).await?;
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);
            DashboardServer::new(host, port, Arc::new(session))
                .start()
                .await
        }
        Commands::Views => {
            for view in View::ALL {
                println!("{:<42} {}", view.slug(), view.title());
            }
            Ok(())
        }
        Commands::View { view, format } => {
            let session = open_session(&config).await?;
            let page = session.page(view).await?;
            print!("{}", export_page(&page, format)?);
            Ok(())
        }
        Commands::Missing { field } => {
            let session = open_session(&config).await?;
            let ids = find_missing(session.table(), field)?;
            info!("{} students have no {}", ids.len(), field);
            for id in ids {
                println!("{}", id);
            }
            Ok(())
        }
        Commands::Config => {
            print!("{}", config.redacted().to_toml()?);
            Ok(())
        }
    }
}

async fn open_session(config: &DashboardConfig) -> Result<Session> {
    let store = StoreFactory::from_config(config).await?;
    Session::open(store.as_ref(), config.views.clone()).await
}
