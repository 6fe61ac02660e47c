use anyhow::{Context, Result};
use clap::Parser;
use coldpage::{analyzer, cli::Cli, config::AnalyzerConfig};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; warnings are always shown, --debug enables everything
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into())
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let base = match &args.config {
        Some(path) => AnalyzerConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalyzerConfig::default(),
    };
    let config = args.apply_to(base);

    let summary = analyzer::run(&args.root, &config)
        .with_context(|| format!("Analysis of {} failed", args.root.display()))?;

    summary.print_summary();

    if let Some(path) = &args.report_json {
        summary.write_json(path)?;
    }

    Ok(())
}
