mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use megasena_db::db::{count_draws, db_path, fetch_all_draws, fetch_last_draws, migrate, open_db};
use megasena_db::rusqlite::Connection;
use megasena_engine::config::{load_config, save_config};
use megasena_engine::{EngineConfig, EngineContext};
use crate::display::{
    display_breakdown, display_cards, display_draws, display_import_summary, display_stats,
    display_status,
};

#[derive(Parser)]
#[command(name = "megasena", about = "Analyse et génération de grilles Mega-Sena")]
struct Cli {
    /// Fichier de configuration du moteur (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les résultats depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/mega_sena.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher les statistiques de l'historique
    Stats {
        /// Nombre de paires et triplets à afficher
        #[arg(short, long, default_value = "10")]
        top: usize,
    },

    /// Générer des grilles
    Generate {
        /// Nombre de numéros par grille (6-12)
        #[arg(short, long, default_value = "6")]
        numbers: usize,

        /// Nombre de grilles (1-10)
        #[arg(short, long, default_value = "1")]
        cards: usize,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Calculer le score d'une grille
    Score {
        /// Numéros de la grille (6 à 12, entre 1 et 60)
        numbers: Vec<u8>,
    },

    /// État du moteur
    Status,

    /// Écrire la configuration par défaut
    InitConfig {
        /// Fichier de sortie
        #[arg(short, long, default_value = "megasena.json")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("Impossible de charger la configuration {:?}", path))?,
        None => EngineConfig::default(),
    };

    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { top } => cmd_stats(&conn, config, top),
        Command::Generate { numbers, cards, seed } => cmd_generate(&conn, config, numbers, cards, seed),
        Command::Score { numbers } => cmd_score(&conn, config, &numbers),
        Command::Status => cmd_status(&conn, config),
        Command::InitConfig { output } => cmd_init_config(&config, &output),
    }
}

/// Charge l'historique complet et construit les statistiques.
fn load_context(conn: &Connection, config: EngineConfig) -> Result<EngineContext> {
    let n = count_draws(conn)?;
    if n == 0 {
        bail!("Base vide. Lancez d'abord : megasena import");
    }
    let draws = fetch_all_draws(conn)?;
    let ctx = EngineContext::new(&draws, config)
        .context("Impossible d'initialiser le moteur")?;
    Ok(ctx)
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : megasena import");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, config: EngineConfig, top: usize) -> Result<()> {
    let ctx = load_context(conn, config)?;
    display_stats(&ctx.state().snapshot, top);
    Ok(())
}

fn cmd_generate(
    conn: &Connection,
    config: EngineConfig,
    numbers: usize,
    cards: usize,
    seed: Option<u64>,
) -> Result<()> {
    let ctx = load_context(conn, config)?;
    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };
    let batch = ctx.generate_cards(numbers, cards, &mut rng)?;
    display_cards(&batch);
    Ok(())
}

fn cmd_score(conn: &Connection, config: EngineConfig, numbers: &[u8]) -> Result<()> {
    let ctx = load_context(conn, config)?;
    let breakdown = ctx.score_breakdown(numbers)?;
    display_breakdown(numbers, &breakdown);
    Ok(())
}

fn cmd_status(conn: &Connection, config: EngineConfig) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("Statut :");
        println!("  Données chargées : non");
        return Ok(());
    }
    let ctx = load_context(conn, config)?;
    display_status(&ctx.status());
    Ok(())
}

fn cmd_init_config(config: &EngineConfig, output: &Path) -> Result<()> {
    save_config(config, output)
        .with_context(|| format!("Impossible d'écrire {:?}", output))?;
    println!("Configuration écrite dans {}", output.display());
    Ok(())
}
