//! Point d'entrée CLI pour landwatch-dash

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

// Charger .env au démarrage
fn load_env() {
    // Chercher .env dans le répertoire courant ou parent
    if dotenvy::dotenv().is_err() {
        // Essayer depuis le répertoire du binaire
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let _ = dotenvy::from_path(dir.join(".env"));
            }
        }
    }
}

mod cli;

use cli::{Commands, SourceArgs};

/// Tableau de bord de suivi des aires protégées
#[derive(Parser)]
#[command(name = "landwatch-dash")]
#[command(author, version)]
#[command(about = "Carte, indicateurs et graphiques de suivi des unités de conservation")]
#[command(long_about = "Charge les unités de conservation, les emprises SIGEF et les ocorrências CPT, puis produit la scène cartographique, les cartes de synthèse ou une page HTML.\n\nChemins : fichier --config, puis variables LANDWATCH_*, puis options de la ligne de commande.")]
struct Cli {
    /// Augmenter la verbosité (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Mode silencieux
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

fn main() -> Result<()> {
    // Charger .env avant tout
    load_env();

    let cli = Cli::parse();

    // Configurer le logging
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scene {
            output,
            select,
            filter,
        } => {
            info!(output = %output.display(), select = ?select, filter = ?filter, "Scene export");
            cli::cmd_scene(&cli.sources, &output, select.as_deref(), filter.as_deref())?;
        }
        Commands::Summary { select, json } => {
            cli::cmd_summary(&cli.sources, select.as_deref(), json)?;
        }
        Commands::Dashboard {
            output,
            select,
            filter,
        } => {
            info!(output = %output.display(), select = ?select, filter = ?filter, "Dashboard export");
            cli::cmd_dashboard(&cli.sources, &output, select.as_deref(), filter.as_deref())?;
        }
        Commands::Report { save } => {
            cli::cmd_report(&cli.sources, save.as_deref())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => Level::WARN,
        (_, 0) => Level::INFO,
        (_, 1) => Level::DEBUG,
        (_, _) => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .init();
}
