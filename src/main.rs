/*!
 * Command-line interface for srcdump
 */

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, warn};

use srcdump::config::{Args, ExportConfig};
use srcdump::logging::setup_logger;
use srcdump::report::{ReportFormat, Reporter};
use srcdump::Exporter;

fn main() -> io::Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    if let Some(shell) = args.generate {
        let mut cmd = Args::command();
        clap_complete::generate(shell, &mut cmd, "srcdump", &mut io::stdout());
        return Ok(());
    }

    if let Err(e) = setup_logger(args.verbose) {
        eprintln!("Warning: Failed to initialize logger: {}", e);
    }

    // Create and validate configuration
    let config = ExportConfig::from_args(args);
    config.validate()?;

    if config.skip_dirs.is_empty() {
        warn!("No directories are skipped, the dump may be very large");
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {wide_msg:.dim.white} ⏱️  {elapsed_precise}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_prefix("📦 Export");

    let sink = {
        let progress = progress.clone();
        move |msg: &str| progress.set_message(msg.to_string())
    };

    let exporter = Exporter::new(config, Arc::new(sink));
    let result = exporter.run();
    progress.finish_and_clear();

    match result {
        Ok(report) => {
            Reporter::new(ReportFormat::ConsoleTable).print_report(&report);
            Ok(())
        }
        Err(e) => {
            error!("Export failed: {}", e);
            Err(e.into())
        }
    }
}
