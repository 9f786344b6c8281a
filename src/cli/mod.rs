// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses command line arguments with clap and routes each
// subcommand to its use case in Layer 2. Printing happens here
// and nowhere else.

pub mod commands;

use anyhow::{bail, Result};
use clap::Parser;
use commands::{Commands, FormatArgs, InitConfigArgs, InspectArgs};

use crate::application::run_config::RunConfig;
use crate::infra::config_store::ConfigStore;

#[derive(Parser, Debug)]
#[command(
    name = "sft-prep",
    version,
    about = "Prepare JSONL datasets for supervised fine-tuning."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Dispatch to the matching use case. The CLI layer only routes.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Format(args)     => run_format(args),
            Commands::Inspect(args)    => run_inspect(args),
            Commands::InitConfig(args) => run_init_config(args),
        }
    }
}

fn run_format(args: FormatArgs) -> Result<()> {
    use crate::application::format_use_case::FormatUseCase;

    let cfg = args.resolve()?;
    tracing::info!(
        "Formatting '{}' → '{}'",
        cfg.dataset.train_file.display(),
        args.output.display()
    );

    let report = FormatUseCase::new(cfg, &args.output)
        .with_dataset_name(args.dataset_info.clone())
        .with_report_csv(args.report_csv.clone())
        .execute()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Formatted {} records ({} appended, {} already terminated) → {}",
            report.records, report.appended, report.already_terminated, report.output
        );
    }
    Ok(())
}

fn run_inspect(args: InspectArgs) -> Result<()> {
    use crate::application::inspect_use_case::InspectUseCase;

    let cfg     = args.dataset.resolve()?;
    let summary = InspectUseCase::new(cfg.dataset).execute()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("records: {}", summary.records);
    println!("columns: {:?}", summary.columns);
    if let Some(first) = &summary.first {
        println!("first:   {first}");
    }
    if let Some(formatted) = &summary.first_formatted {
        println!("after:   {formatted}");
    }
    if let (Some(t), Some(n)) = (&summary.terminator, summary.already_terminated) {
        println!("already ending with {t:?}: {n}");
    }
    Ok(())
}

fn run_init_config(args: InitConfigArgs) -> Result<()> {
    if args.output.exists() && !args.force {
        bail!(
            "'{}' already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let cfg = RunConfig::from(&args);
    ConfigStore::new(&args.output).save(&cfg)?;
    println!("Wrote run config to {}", args.output.display());
    Ok(())
}
