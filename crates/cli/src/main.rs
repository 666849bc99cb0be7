use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use numerosity::pair::{DotSetPair, PairBuilder};
use numerosity::GeneratorCfg;
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::EnvFilter;

mod provenance;

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "Seeded numerosity stimulus sessions")]
struct Cmd {
    /// JSON generator configuration; defaults to the reference layout
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Anti-streak threshold used when no config file is given
    #[arg(long, global = true, default_value_t = 3)]
    max_run: u32,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Generate a session of pairs and write it as JSON under `out`
    Generate {
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long, default_value_t = 30)]
        rounds: u32,
        #[arg(long, value_enum, default_value_t = Mode::Difficulty)]
        mode: Mode,
        #[arg(long)]
        out: PathBuf,
    },
    /// Validate and print the effective configuration
    Config,
    /// Print a small provenance JSON block
    Report,
}

#[derive(Clone, Copy, Debug, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
enum Mode {
    /// Distances drawn from the difficulty bag
    Difficulty,
    /// Two distinct counts, uniform over the count range
    Random,
}

/// Everything needed to regenerate a session bit for bit.
#[derive(Serialize)]
struct SessionParams<'a> {
    seed: u64,
    rounds: u32,
    mode: Mode,
    config: &'a GeneratorCfg,
}

#[derive(Serialize)]
struct Round<'a> {
    round: u32,
    #[serde(flatten)]
    pair: &'a DotSetPair,
}

fn main() -> Result<()> {
    SubscriberBuilder::default()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();
    let cmd = Cmd::parse();
    let cfg = load_cfg(cmd.config.as_deref(), cmd.max_run)?;
    match cmd.action {
        Action::Generate {
            seed,
            rounds,
            mode,
            out,
        } => generate(cfg, seed, rounds, mode, &out).map(|_| ()),
        Action::Config => {
            println!("{}", serde_json::to_string_pretty(&cfg)?);
            Ok(())
        }
        Action::Report => report(),
    }
}

fn load_cfg(path: Option<&Path>, max_run: u32) -> Result<GeneratorCfg> {
    let cfg = match path {
        Some(p) => {
            let bytes =
                std::fs::read(p).with_context(|| format!("reading config {}", p.display()))?;
            serde_json::from_slice(&bytes)
                .with_context(|| format!("parsing config {}", p.display()))?
        }
        None => GeneratorCfg::reference(max_run),
    };
    cfg.validate().context("validating generator config")?;
    Ok(cfg)
}

fn generate(cfg: GeneratorCfg, seed: u64, rounds: u32, mode: Mode, out: &Path) -> Result<PathBuf> {
    tracing::info!(seed, rounds, ?mode, out = %out.display(), "generate");
    let mut builder = PairBuilder::new(cfg.clone(), seed)?;
    let mut pairs = Vec::with_capacity(rounds as usize);
    for round in 0..rounds {
        let pair = match mode {
            Mode::Difficulty => builder.next_pair(),
            Mode::Random => builder.build_random_pair(),
        }
        .with_context(|| format!("round {round}"))?;
        pairs.push(pair);
    }
    let swaps = pairs.iter().filter(|p| p.swapped()).count();
    tracing::info!(rounds, swaps, "session_done");

    let doc: Vec<Round> = pairs
        .iter()
        .enumerate()
        .map(|(i, pair)| Round {
            round: i as u32,
            pair,
        })
        .collect();
    if let Some(parent) = out.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating output dir {}", parent.display()))?;
        }
    }
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;

    let params = SessionParams {
        seed,
        rounds,
        mode,
        config: &cfg,
    };
    provenance::write_sidecar(out, &params)
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::code_rev(),
        "numerosity": numerosity::VERSION,
        "params": {},
        "outputs": []
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}
