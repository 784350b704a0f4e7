mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use prizedraw_core::PrizeDrawError;
use prizedraw_engine::DrawError;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prizedraw")]
#[command(about = "Prize draw - pick unique winners from a participant list")]
#[command(version)]
struct Cli {
    /// Data directory for config and exports
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw winners from a participant CSV in one go
    Draw(commands::DrawArgs),
    /// Start an interactive drawing session
    Session {
        /// Participant CSV to import at start
        #[arg(short, long)]
        participants: Option<PathBuf>,
    },
    /// Write an example participant CSV
    Sample {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Write the default config file to the data directory
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a thank-you message from an exported winners history
    Thanks {
        /// Winners history CSV
        history: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cli_config = CliConfig::new(cli.data_dir, cli.verbose);

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config::log_filter(
            cli_config.verbose,
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("Using data directory {}", cli_config.data_dir.display());
    let draw_config = cli_config.load_draw_config().await?;

    let result = match cli.command {
        Commands::Draw(args) => commands::run_draw(args, &draw_config).await,
        Commands::Session { participants } => {
            commands::run_session(participants, &draw_config, &cli_config.data_dir).await
        }
        Commands::Sample { output } => commands::write_sample(output.as_deref()).await,
        Commands::Init { force } => cli_config.init_draw_config(force).await.map(|path| {
            println!("Config written to {}", path.display());
        }),
        Commands::Thanks { history } => {
            commands::thanks_from_history(&history, &draw_config.thanks).await
        }
    };

    if let Err(e) = result {
        report_error(&e);
        std::process::exit(1);
    }

    Ok(())
}

fn report_error(error: &anyhow::Error) {
    let core_error = error
        .downcast_ref::<PrizeDrawError>()
        .or_else(|| match error.downcast_ref::<DrawError>() {
            Some(DrawError::Core(inner)) => Some(inner),
            _ => None,
        });

    if let Some(draw_error) = error.downcast_ref::<DrawError>() {
        if draw_error.is_precondition() {
            eprintln!("Error: Cannot start the draw: {}", draw_error);
            eprintln!("Import more participants, add prizes or lower the winner count");
            return;
        }
    }

    match core_error {
        Some(e) if matches!(e, PrizeDrawError::MissingHeaders(_)) => {
            eprintln!("Error: {}", e);
            eprintln!("The first line must be a header like: name,note,code");
            eprintln!("Use 'prizedraw sample' to get an example file");
        }
        Some(e) if e.is_import_error() => {
            eprintln!("Error: Could not import participants: {}", e);
        }
        Some(e) if e.is_external_error() => {
            eprintln!("Error: Thank-you message failed: {}", e);
        }
        _ => {
            eprintln!("Error: {:#}", error);
        }
    }
}
