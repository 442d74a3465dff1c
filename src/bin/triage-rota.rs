#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use triage_rota::{
    io,
    report::{JsonReport, ReportRenderer, RunReport, TextReport},
    scheduler::{headers_agree, PlanOptions, Scheduler},
    storage::{DirectorySink, SnapshotSink},
    Duration, Ledger, RequestQueue, Roster,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Affecte le personnel soignant aux demandes en attente pour la période suivante
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`, filtre via RUST_LOG)
    #[arg(long, global = true)]
    log: bool,

    #[command(subcommand)]
    cmd: Commands,
}

/// Les trois instantanés d'entrée, dans l'ordre attendu
#[derive(Args, Debug)]
struct Inputs {
    /// Effectif (en-tête `Doctors`)
    staff: PathBuf,
    /// Planning courant (en-tête `Schedule`)
    schedule: PathBuf,
    /// Demandes en attente (en-tête `Mothers`)
    requests: PathBuf,
}

#[derive(Args, Debug)]
struct OptionArgs {
    /// Fichier JSON d'options (champs partiels acceptés)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Heure d'ouverture, ex. 04h00
    #[arg(long)]
    opening: Option<Duration>,
    /// Heure de fermeture, ex. 20h00
    #[arg(long)]
    closing: Option<Duration>,
    /// Catégorie minimale pour l'urgence haute
    #[arg(long)]
    min_category: Option<u8>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Planifier la période suivante et écrire les deux instantanés
    Plan {
        #[command(flatten)]
        inputs: Inputs,
        #[command(flatten)]
        options: OptionArgs,
        /// Répertoire de sortie
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Export JSON du bilan (optionnel)
        #[arg(long)]
        report: Option<PathBuf>,
        /// Affiche les instantanés sans rien écrire
        #[arg(long)]
        dry_run: bool,
    },

    /// Vérifier les en-têtes des trois instantanés
    Check {
        #[command(flatten)]
        inputs: Inputs,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let code = match cli.cmd {
        Commands::Plan {
            inputs,
            options,
            out_dir,
            report,
            dry_run,
        } => {
            let opts = build_options(&options)?;
            let scheduler = Scheduler::new(opts)?;
            let (ledger, roster, queue) = load_inputs(&inputs)?;

            let plan = scheduler.plan_next(&ledger, &roster, &queue);
            let summary = RunReport::from_plan(&plan);
            print!("{}", TextReport.render(&summary)?);

            let snapshots = io::plan_snapshots(&plan);
            if dry_run {
                for snap in &snapshots {
                    println!("--- {}", snap.file_name);
                    print!("{}", snap.contents);
                }
            } else if plan.is_end_of_day(scheduler.options()) {
                tracing::warn!(next = %plan.next_start, "end of day, no snapshot written");
                println!("End of day: no snapshot written");
            } else {
                let sink = DirectorySink::open(&out_dir)?;
                for path in sink.publish(&snapshots)? {
                    println!("wrote {}", path.display());
                }
                // bilan JSON seulement si les instantanés sont publiés
                if let Some(path) = report {
                    fs::write(&path, JsonReport.render(&summary)?)
                        .with_context(|| format!("writing {}", path.display()))?;
                }
            }
            0
        }
        Commands::Check { inputs } => {
            let (ledger, roster, queue) = load_inputs(&inputs)?;
            if headers_agree([ledger.header(), roster.header(), queue.header()]) {
                println!("OK: headers consistent");
                0
            } else {
                eprintln!("WARNING: snapshots describe different periods");
                // Code 2 = WARNING
                2
            }
        }
    };

    std::process::exit(code);
}

/// Valide les trois portées avant toute affectation.
fn load_inputs(inputs: &Inputs) -> Result<(Ledger, Roster, RequestQueue)> {
    let roster = io::load_roster(&inputs.staff)?;
    let ledger = io::load_ledger(&inputs.schedule)?;
    let queue = io::load_queue(&inputs.requests)?;
    Ok((ledger, roster, queue))
}

fn build_options(args: &OptionArgs) -> Result<PlanOptions> {
    let mut opts = match &args.config {
        Some(path) => read_config(path)?,
        None => PlanOptions::default(),
    };
    if let Some(opening) = args.opening {
        opts.hours.opening = opening;
    }
    if let Some(closing) = args.closing {
        opts.hours.closing = closing;
    }
    if let Some(min) = args.min_category {
        opts.min_category = min;
    }
    Ok(opts)
}

fn read_config(path: &Path) -> Result<PlanOptions> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}
