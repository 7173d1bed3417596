//! permit-watch: one-shot permit availability check with email/SMS alerts.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌──────────┐ raw records ┌─────────────┐ (date, open) ┌───────────┐ dates ┌───────────┐
//! │ source/  │ ──────────► │ normalize   │ ───────────► │ window    │ ────► │ notify    │
//! │ api|page │             │ (per-record)│              │ (filter,  │       │ (at most  │
//! └──────────┘             └─────────────┘              │  dedup)   │       │  once)    │
//!                                                       └───────────┘       └───────────┘
//! ```
//!
//! * **`source/`**: the `PermitSource` trait and its two implementations:
//!   the structured JSON feed and the scraped booking page.
//! * **`normalize`**: turns raw records into `(date, available)` pairs,
//!   dropping records it cannot parse.
//! * **`window`**: the configured date window and the pure filter/dedup step.
//! * **`notify`**: the `Notifier` trait, SMTP delivery and a log-only stand-in.
//! * **`check`**: runs the pipeline once and decides whether to notify.
//! * **`config`** / **`logging`**: CLI/env settings and tracing setup.
//! * **`main`**: wires everything together.
//!
//! There is no loop: schedule the binary with cron (or similar).  Each run is
//! independent and remembers nothing from earlier runs.

pub mod check;
pub mod config;
pub mod error;
pub mod logging;
pub mod normalize;
pub mod notify;
pub mod source;
pub mod window;
