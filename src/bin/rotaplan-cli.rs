#![forbid(unsafe_code)]
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rotaplan::{
    inputs::{load_bundle_from_file, save_bundle_to_file, InputBundle},
    io,
    storage::JsonStorage,
    JsonInputProvider, PlanStatus, PlanningInputs, VersionStore,
};
use std::path::Path;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de génération et versionnement de plannings (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du magasin de versions
    #[arg(long, global = true, default_value = "plan.json")]
    store: String,

    /// Fichier JSON des données d'entrée (effectif, couverture, ...)
    #[arg(long, global = true, default_value = "inputs.json")]
    inputs: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Générer une nouvelle version de planning pour une période
    Generate {
        /// Date AAAA-MM-JJ
        #[arg(long)]
        start: String,
        /// Date AAAA-MM-JJ
        #[arg(long)]
        end: String,
    },

    /// Lister les versions, numéro décroissant
    Versions,

    /// Afficher (et optionnellement exporter) les entrées d'une version
    Entries {
        #[arg(long)]
        version: u32,
        /// Export CSV des entrées (optionnel)
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Créer une version, vide ou copiée-décalée d'une version de base
    CreateVersion {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        base: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Passer une version au statut publié
    Publish {
        #[arg(long)]
        version: u32,
    },

    /// Passer une version au statut archivé
    Archive {
        #[arg(long)]
        version: u32,
    },

    /// Importer des employés depuis un CSV dans le fichier d'entrées
    ImportEmployees {
        #[arg(long)]
        csv: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.store)?;
    let mut store = VersionStore::open(storage)?;

    match cli.cmd {
        Commands::Generate { start, end } => {
            let start: NaiveDate = start.parse()?;
            let end: NaiveDate = end.parse()?;
            let provider = JsonInputProvider::open(&cli.inputs)?;
            let inputs = PlanningInputs::gather(&provider, start, end)?;
            let outcome = store.generate(&inputs, start, end)?;
            println!(
                "Schedule generated: version {} ({}), {} entries",
                outcome.new_version,
                outcome.status.as_str(),
                outcome.entry_count
            );
        }
        Commands::Versions => {
            for meta in store.versions() {
                let base = meta
                    .base_version
                    .map(|b| format!("base v{b}"))
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "v{} | {} | {} → {} | {} | {} entries",
                    meta.version,
                    meta.status.as_str(),
                    meta.date_range.start,
                    meta.date_range.end,
                    base,
                    store.entry_count(meta.version)
                );
            }
        }
        Commands::Entries { version, out_csv } => {
            let bundle = load_inputs(&cli.inputs)?;
            let views = store.entry_views(version, &bundle.employees, &bundle.shift_templates)?;
            if let Some(path) = out_csv {
                io::export_entries_csv(path, &views)?;
            }
            for view in &views {
                let window = match (view.shift_start, view.shift_end) {
                    (Some(s), Some(e)) => format!("{} → {}", s.format("%H:%M"), e.format("%H:%M")),
                    _ => "no shift".to_string(),
                };
                println!(
                    "{} | {} | {} | {} | {}",
                    view.entry.id.as_str(),
                    view.entry.date,
                    view.employee_name,
                    window,
                    view.entry.status.as_str()
                );
            }
        }
        Commands::CreateVersion {
            start,
            end,
            base,
            notes,
        } => {
            let start: NaiveDate = start.parse()?;
            let end: NaiveDate = end.parse()?;
            let meta = store.create_version(start, end, base, notes)?;
            println!(
                "Version {} created ({}), {} entries",
                meta.version,
                meta.status.as_str(),
                store.entry_count(meta.version)
            );
        }
        Commands::Publish { version } => {
            store.set_status(version, PlanStatus::Published)?;
            println!("Version {version} published");
        }
        Commands::Archive { version } => {
            store.set_status(version, PlanStatus::Archived)?;
            println!("Version {version} archived");
        }
        Commands::ImportEmployees { csv } => {
            let mut bundle = load_inputs(&cli.inputs)?;
            let employees = io::import_employees_csv(csv)?;
            let count = employees.len();
            bundle.employees.extend(employees);
            save_bundle_to_file(&cli.inputs, &bundle)?;
            println!("Imported {count} employee(s)");
        }
    }

    Ok(())
}

fn load_inputs(path: &str) -> Result<InputBundle> {
    if Path::new(path).exists() {
        load_bundle_from_file(path)
    } else {
        Ok(InputBundle::default())
    }
}
