//! phishguard entrypoint.
//!
//! `phishguard evaluate <url>...` trains from the configured corpus and prints one
//! verdict per line; `phishguard history` prints the decision log; with no
//! subcommand, URLs are read from stdin one per line until EOF.

use anyhow::{bail, Context};
use phishguard::{
    config::AppConfig,
    logging::StructuredLogger,
    risk::RiskEngine,
    storage::{DecisionLog, SqliteDecisionLog},
    training::TrainingPipeline,
    HistoryEntry, ServiceError, VerdictService,
};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{info, warn};

fn open_log(config: &AppConfig) -> anyhow::Result<Arc<SqliteDecisionLog>> {
    std::fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("creating {}", config.data_dir.display()))?;
    let path = config.store_path();
    let log = SqliteDecisionLog::open(&path, &config.storage)
        .with_context(|| format!("opening decision log {}", path.display()))?;
    Ok(Arc::new(log))
}

fn build_service(config: &AppConfig) -> anyhow::Result<VerdictService> {
    let (model, _report) = TrainingPipeline::new(config.training.clone())
        .run_csv(&config.corpus_path)
        .with_context(|| format!("training from {}", config.corpus_path.display()))?;
    let log = open_log(config)?;
    Ok(VerdictService::new(
        Arc::new(model),
        RiskEngine::new(config.risk.clone()).context("invalid risk thresholds")?,
        log,
    ))
}

/// Prints the verdict; persistence failures still print it and are reported.
fn evaluate_one(service: &VerdictService, url: &str, out: &mut impl Write) -> anyhow::Result<bool> {
    match service.evaluate(url) {
        Ok(verdict) => {
            StructuredLogger::emit_json(&verdict, out)?;
            Ok(true)
        }
        Err(ServiceError::Input(e)) => {
            warn!(error = %e, "rejected input");
            Ok(false)
        }
        Err(e @ ServiceError::Persistence { .. }) => {
            if let Some(verdict) = e.verdict() {
                StructuredLogger::emit_json(verdict, out)?;
            }
            warn!(url, error = %e, "verdict not recorded");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

fn main() -> anyhow::Result<()> {
    let config_path = std::env::var("PHISHGUARD_CONFIG_PATH")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| std::path::PathBuf::from("config.json"));
    let loaded = AppConfig::try_load(&config_path);
    let config = loaded.as_ref().ok().cloned().flatten().unwrap_or_default();

    StructuredLogger::init(config.log.json, &config.log.level);
    if let Err(e) = &loaded {
        warn!(path = %config_path.display(), error = %e, "config ignored; using defaults");
    }

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match args.first().map(String::as_str) {
        Some("history") => {
            let log = open_log(&config)?;
            for record in log.list_all()? {
                StructuredLogger::emit_json(&HistoryEntry::from(record), &mut out)?;
            }
        }
        Some("evaluate") => {
            if args.len() < 2 {
                bail!("usage: phishguard evaluate <url>...");
            }
            let service = build_service(&config)?;
            let mut failed = 0usize;
            for url in &args[1..] {
                if !evaluate_one(&service, url, &mut out)? {
                    failed += 1;
                }
            }
            if failed > 0 {
                bail!("{failed} url(s) not recorded");
            }
        }
        Some(other) => bail!("unknown command {other:?}; expected `evaluate` or `history`"),
        None => {
            let service = build_service(&config)?;
            info!(data_dir = ?config.data_dir, "reading urls from stdin");
            for line in std::io::stdin().lock().lines() {
                let line = line?;
                let url = line.trim();
                if url.is_empty() {
                    continue;
                }
                evaluate_one(&service, url, &mut out)?;
                out.flush()?;
            }
        }
    }

    Ok(())
}
