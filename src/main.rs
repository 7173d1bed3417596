//! Command-line entry point: load settings, run one check cycle, exit.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing::{info, warn};

use permit_watch::check;
use permit_watch::config::{self, Cli, Config};
use permit_watch::logging;
use permit_watch::notify::{LogNotifier, Notifier, SmtpNotifier};
use permit_watch::source::{self, ApiSource, PageSource, PermitSource, SourceKind};

fn main() -> Result<()> {
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    logging::init(cli.verbose, cli.log_format).context("failed to initialize logging")?;

    if let Some(e) = config::dotenv_problem(&dotenv) {
        warn!(error = %e, "ignoring unreadable .env file");
    }

    let config = Config::from_cli(&cli, Local::now().date_naive())?;
    info!(
        permit = %config.permit_id,
        source = ?config.source,
        window = %config.window,
        "checking availability"
    );

    // -- configure source ----------------------------------------------------
    let client = source::http_client(config.timeout).context("failed to build HTTP client")?;
    let source: Box<dyn PermitSource> = match config.source {
        SourceKind::Api => Box::new(ApiSource::new(client, &config.endpoint, config.window)),
        SourceKind::Page => Box::new(PageSource::new(client, &config.endpoint)),
    };

    // -- configure notifier --------------------------------------------------
    let notifier: Box<dyn Notifier> = match (&config.smtp, config.dry_run) {
        (Some(smtp), false) => Box::new(SmtpNotifier::new(smtp.clone())),
        (None, false) => {
            warn!("email credentials incomplete; alerts will only be logged");
            Box::new(LogNotifier)
        }
        (_, true) => Box::new(LogNotifier),
    };

    // -- run one cycle -------------------------------------------------------
    let report = check::check_and_notify(
        source.as_ref(),
        &config.window,
        notifier.as_ref(),
        &config.booking_url,
    );

    info!(
        dates = report.dates.len(),
        skipped_records = report.skipped_records,
        notification = ?report.notification,
        "check complete"
    );
    Ok(())
}
