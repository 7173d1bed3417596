//! Command-line and environment configuration.
//!
//! Every option can come from a flag or from the environment (including a
//! `.env` file loaded by `main`).  [`Config::from_cli`] resolves defaults and
//! validates everything once; the resulting [`Config`] is never mutated.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Parser, ValueEnum};

use crate::error::ConfigError;
use crate::notify::SmtpSettings;
use crate::source::SourceKind;
use crate::window::DateWindow;

pub const DEFAULT_PERMIT_ID: &str = "234623";

/// Log output style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Single-line human-readable output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Check a permit source once and send an alert if any dates are open.
#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Permit identifier used to build the default URLs.
    #[arg(long, env = "PERMIT_ID", default_value = DEFAULT_PERMIT_ID)]
    pub permit_id: String,

    /// Which upstream representation to read.
    #[arg(long, env = "PERMIT_SOURCE", value_enum, default_value_t = SourceKind::Api)]
    pub source: SourceKind,

    /// Override the URL that is fetched.
    #[arg(long, env = "PERMIT_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Override the booking link included in alerts.
    #[arg(long, env = "PERMIT_BOOKING_URL", value_name = "URL")]
    pub booking_url: Option<String>,

    /// First date of interest (YYYY-MM-DD). Defaults to today.
    #[arg(long, env = "START_DATE", value_name = "DATE")]
    pub start_date: Option<NaiveDate>,

    /// Last date of interest (YYYY-MM-DD). Defaults to October 8.
    #[arg(long, env = "END_DATE", value_name = "DATE")]
    pub end_date: Option<NaiveDate>,

    /// Upstream request timeout in seconds.
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Sender address and SMTP login.
    #[arg(long, env = "EMAIL_ADDRESS")]
    pub email_address: Option<String>,

    /// SMTP password (for Gmail, an app password).
    #[arg(long, env = "EMAIL_PASSWORD", hide_env_values = true)]
    pub email_password: Option<String>,

    /// Address the alert is sent to.
    #[arg(long, env = "RECIPIENT_EMAIL")]
    pub recipient_email: Option<String>,

    /// Optional email-to-SMS gateway address, added as a second recipient.
    #[arg(long, env = "SMS_GATEWAY")]
    pub sms_gateway: Option<String>,

    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// Log the alert instead of sending it.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Enable debug logging.
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,

    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Fully resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Config {
    pub permit_id: String,
    pub source: SourceKind,
    /// URL the source fetches.
    pub endpoint: String,
    /// Link recipients follow to book.
    pub booking_url: String,
    pub window: DateWindow,
    pub timeout: Duration,
    /// `None` when credentials are incomplete; alerts are then only logged.
    pub smtp: Option<SmtpSettings>,
    pub dry_run: bool,
}

impl Config {
    /// Resolve defaults relative to `today` and validate.
    pub fn from_cli(cli: &Cli, today: NaiveDate) -> Result<Self> {
        let season = DateWindow::season_from(today);
        let start = cli.start_date.unwrap_or(season.start());
        let end = cli.end_date.unwrap_or(season.end());
        let window = DateWindow::new(start, end).context("invalid date window")?;

        let booking_url = cli
            .booking_url
            .clone()
            .unwrap_or_else(|| booking_url_for(&cli.permit_id));
        let endpoint = cli.endpoint.clone().unwrap_or_else(|| match cli.source {
            SourceKind::Api => api_url_for(&cli.permit_id),
            SourceKind::Page => booking_url.clone(),
        });

        check_url("endpoint", &endpoint)?;
        check_url("booking", &booking_url)?;

        Ok(Self {
            permit_id: cli.permit_id.clone(),
            source: cli.source,
            endpoint,
            booking_url,
            window,
            timeout: Duration::from_secs(cli.timeout_secs),
            smtp: smtp_settings(cli),
            dry_run: cli.dry_run,
        })
    }
}

pub fn booking_url_for(permit_id: &str) -> String {
    format!("https://www.recreation.gov/permits/{permit_id}")
}

pub fn api_url_for(permit_id: &str) -> String {
    format!("https://www.recreation.gov/api/permititinerary/availability/product/{permit_id}")
}

fn check_url(what: &'static str, value: &str) -> Result<(), ConfigError> {
    reqwest::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::InvalidUrl {
            what,
            value: value.to_string(),
            reason: e.to_string(),
        })
}

/// The `.env` load error worth reporting, if any.
///
/// A missing file is normal (cron exports the variables itself); a file that
/// exists but does not parse is not.
pub fn dotenv_problem<T>(loaded: &Result<T, dotenvy::Error>) -> Option<&dotenvy::Error> {
    match loaded {
        Err(e) if !e.not_found() => Some(e),
        _ => None,
    }
}

/// Sender, password and recipient must all be present; the SMS gateway is
/// appended when set.
fn smtp_settings(cli: &Cli) -> Option<SmtpSettings> {
    let username = cli.email_address.clone()?;
    let password = cli.email_password.clone()?;
    let mut recipients = vec![cli.recipient_email.clone()?];
    recipients.extend(cli.sms_gateway.clone().filter(|s| !s.trim().is_empty()));

    Some(SmtpSettings {
        host: cli.smtp_host.clone(),
        port: cli.smtp_port,
        username,
        password,
        recipients,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Flag defaults, built by hand so exported env vars cannot leak in.
    fn base_cli() -> Cli {
        Cli {
            permit_id: DEFAULT_PERMIT_ID.to_string(),
            source: SourceKind::Api,
            endpoint: None,
            booking_url: None,
            start_date: None,
            end_date: None,
            timeout_secs: 10,
            email_address: None,
            email_password: None,
            recipient_email: None,
            sms_gateway: None,
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            dry_run: false,
            verbose: false,
            log_format: LogFormat::Compact,
        }
    }

    fn with_mail() -> Cli {
        Cli {
            email_address: Some("watcher@example.com".into()),
            email_password: Some("pw".into()),
            recipient_email: Some("me@example.com".into()),
            ..base_cli()
        }
    }

    #[test]
    fn defaults_target_the_salmon_permit() {
        let config = Config::from_cli(&base_cli(), d(2026, 5, 1)).unwrap();
        assert_eq!(config.permit_id, "234623");
        assert_eq!(config.source, SourceKind::Api);
        assert_eq!(
            config.endpoint,
            "https://www.recreation.gov/api/permititinerary/availability/product/234623"
        );
        assert_eq!(config.booking_url, "https://www.recreation.gov/permits/234623");
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(config.window, DateWindow::new(d(2026, 5, 1), d(2026, 10, 8)).unwrap());
        assert!(config.smtp.is_none());
    }

    #[test]
    fn page_source_fetches_booking_page_by_default() {
        let cli = Cli {
            source: SourceKind::Page,
            ..base_cli()
        };
        let config = Config::from_cli(&cli, d(2026, 5, 1)).unwrap();
        assert_eq!(config.endpoint, config.booking_url);
    }

    #[test]
    fn explicit_dates_override_season() {
        let cli = Cli {
            start_date: Some(d(2026, 7, 1)),
            end_date: Some(d(2026, 7, 15)),
            ..base_cli()
        };
        let config = Config::from_cli(&cli, d(2026, 5, 1)).unwrap();
        assert_eq!(config.window.start(), d(2026, 7, 1));
        assert_eq!(config.window.end(), d(2026, 7, 15));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let cli = Cli {
            start_date: Some(d(2026, 8, 1)),
            end_date: Some(d(2026, 7, 1)),
            ..base_cli()
        };
        assert!(Config::from_cli(&cli, d(2026, 5, 1)).is_err());
    }

    #[test]
    fn date_flags_parse_iso_dates() {
        let argv = ["permit-watch", "--start-date", "2026-07-01", "--end-date", "2026-07-15"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert_eq!(cli.start_date, Some(d(2026, 7, 1)));
        assert_eq!(cli.end_date, Some(d(2026, 7, 15)));
    }

    #[test]
    fn malformed_date_fails_to_parse() {
        let argv = ["permit-watch", "--start-date", "July 1st"];
        assert!(Cli::try_parse_from(argv).is_err());
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        let cli = Cli {
            endpoint: Some("not a url".into()),
            ..base_cli()
        };
        assert!(Config::from_cli(&cli, d(2026, 5, 1)).is_err());
    }

    // -- .env loading --------------------------------------------------------

    #[test]
    fn missing_dotenv_is_not_a_problem() {
        let path = std::env::temp_dir().join(format!("permit-watch-absent-{}.env", std::process::id()));
        let loaded = dotenvy::from_path(&path);
        assert!(loaded.is_err());
        assert!(dotenv_problem(&loaded).is_none());
    }

    #[test]
    fn malformed_dotenv_is_a_problem() {
        let path = std::env::temp_dir().join(format!("permit-watch-bad-{}.env", std::process::id()));
        std::fs::write(&path, "this is not an assignment\n").unwrap();
        let loaded = dotenvy::from_path(&path);
        let _ = std::fs::remove_file(&path);

        assert!(dotenv_problem(&loaded).is_some());
    }

    #[test]
    fn loaded_dotenv_is_not_a_problem() {
        let loaded: Result<(), dotenvy::Error> = Ok(());
        assert!(dotenv_problem(&loaded).is_none());
    }

    // -- smtp settings -------------------------------------------------------

    #[test]
    fn smtp_present_with_all_credentials() {
        let smtp = smtp_settings(&with_mail()).expect("complete credentials");
        assert_eq!(smtp.recipients, vec!["me@example.com"]);
        assert_eq!(smtp.username, "watcher@example.com");
        assert_eq!(smtp.password, "pw");
    }

    #[test]
    fn smtp_absent_without_recipient() {
        let cli = Cli {
            recipient_email: None,
            ..with_mail()
        };
        assert!(smtp_settings(&cli).is_none());
        assert!(Config::from_cli(&cli, d(2026, 5, 1)).unwrap().smtp.is_none());
    }

    #[test]
    fn smtp_absent_without_password() {
        let cli = Cli {
            email_password: None,
            ..with_mail()
        };
        assert!(smtp_settings(&cli).is_none());
    }

    #[test]
    fn smtp_absent_without_sender() {
        let cli = Cli {
            email_address: None,
            ..with_mail()
        };
        assert!(smtp_settings(&cli).is_none());
    }

    #[test]
    fn sms_gateway_is_appended_as_recipient() {
        let cli = Cli {
            sms_gateway: Some("5551234567@txt.example.net".into()),
            ..with_mail()
        };
        let smtp = Config::from_cli(&cli, d(2026, 5, 1)).unwrap().smtp.unwrap();
        assert_eq!(smtp.recipients, vec!["me@example.com", "5551234567@txt.example.net"]);
        assert_eq!(smtp.host, "smtp.gmail.com");
        assert_eq!(smtp.port, 587);
    }

    #[test]
    fn blank_sms_gateway_is_ignored() {
        let cli = Cli {
            sms_gateway: Some("  ".into()),
            ..with_mail()
        };
        assert_eq!(smtp_settings(&cli).unwrap().recipients, vec!["me@example.com"]);
    }
}
