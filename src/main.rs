use anyhow::{Context, Result};
use monthjoin::{pipeline, Config};
use std::{env, path::Path};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) configure ────────────────────────────────────────────────
    // usage: monthjoin [CONFIG_YAML]
    let config = match env::args().nth(1) {
        Some(path) => Config::from_yaml_file(Path::new(&path))?,
        None => Config::default(),
    };
    info!(
        input = %config.input_dir.display(),
        output = %config.output_path().display(),
        reference = %config.reference_month,
        "configured"
    );

    // ─── 3) merge ────────────────────────────────────────────────────
    let summary = pipeline::run(&config)
        .with_context(|| format!("merging monthly data from {}", config.input_dir.display()))?;

    info!(
        months = ?summary.months,
        rows = summary.rows,
        "all done"
    );
    Ok(())
}
