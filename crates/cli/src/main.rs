use anyhow::{bail, Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use skill_auditor::{AuditConfig, Auditor, Corpus};
use std::fs;
use std::path::{Path, PathBuf};

mod report;

#[derive(Parser)]
#[command(name = "skill-audit")]
#[command(about = "Duplicity, token cost and subagent suitability audits for skill corpora", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML config file (overrides SKILL_AUDIT_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Pairwise duplicity matrix and merge candidates
    Duplicity(ReportArgs),

    /// Token cost estimates and optimization targets
    Tokens(ReportArgs),

    /// Which subagent profiles can load which skills
    Suitability(ReportArgs),

    /// All three reports
    All(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// Directory holding one subdirectory per skill
    #[arg(long, default_value = "skills")]
    skills_dir: PathBuf,

    /// Output JSON format (implies --quiet)
    #[arg(long)]
    json: bool,

    /// Write the report to this path instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

impl Commands {
    fn args(&self) -> &ReportArgs {
        match self {
            Commands::Duplicity(args)
            | Commands::Tokens(args)
            | Commands::Suitability(args)
            | Commands::All(args) => args,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let args = cli.command.args();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet || args.json {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config =
        AuditConfig::resolve(cli.config.as_deref()).context("Failed to load configuration")?;
    let auditor = Auditor::new(config).context("Invalid configuration")?;
    let corpus = load(&auditor, &args.skills_dir)?;

    let rendered = match &cli.command {
        Commands::Duplicity(args) => {
            let out = auditor.duplicity(&corpus)?;
            render(args, &out, || {
                report::render_duplicity_report(&out, auditor.thresholds())
            })?
        }
        Commands::Tokens(args) => {
            let out = auditor.costs(&corpus)?;
            render(args, &out, || report::render_token_report(&out))?
        }
        Commands::Suitability(args) => {
            let out = auditor.compatibility(&corpus)?;
            render(args, &out, || report::render_suitability_report(&out))?
        }
        Commands::All(args) => {
            let out = auditor.audit(&corpus)?;
            render(args, &out, || {
                report::render_audit_report(&out, auditor.thresholds())
            })?
        }
    };

    match &args.output {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            log::info!("Report saved to {}", path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}

fn load(auditor: &Auditor, dir: &Path) -> Result<Corpus> {
    let corpus = auditor
        .load(dir)
        .with_context(|| format!("Failed to load skills from {}", dir.display()))?;
    if corpus.is_empty() {
        bail!("No skill documents found in {}", dir.display());
    }
    Ok(corpus)
}

fn render<T: Serialize>(
    args: &ReportArgs,
    out: &T,
    markdown: impl FnOnce() -> String,
) -> Result<String> {
    if args.json {
        Ok(serde_json::to_string_pretty(out)?)
    } else {
        Ok(markdown())
    }
}
