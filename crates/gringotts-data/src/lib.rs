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

//! Data access layer for Gringotts: connection pooling, schema lifecycle,
//! vault repositories, and seed data.

pub mod error;
pub mod pool;
pub mod schema;
pub mod seed;
pub mod vaults;

pub use error::{DataError, Result as DataResult};
pub use pool::{connect_pool, dispose};
pub use schema::{ensure_schema, reset_schema};
