#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Process configuration for the Gringotts service and its test harness.
//!
//! Settings are derived from `GRINGOTTS_*` environment variables with
//! documented defaults and cached process-wide after the first read.

pub mod error;
pub mod loader;
pub mod model;

pub use error::{ConfigError, ConfigResult};
pub use loader::{Settings, settings};
pub use model::{AmqpSettings, HttpSettings, SCHEMA_NAME};
