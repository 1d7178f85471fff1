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

//! Application wiring: settings, telemetry, schema bootstrap, and the HTTP
//! listener.

mod bootstrap;
mod error;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
