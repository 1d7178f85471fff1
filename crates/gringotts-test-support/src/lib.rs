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

//! Shared test fixtures used across integration suites.
//! Layout: postgres.rs (disposable databases), client.rs (in-process HTTP
//! client), queue.rs (broker channel fixture), fixtures.rs (seed hook and
//! environment helpers).

pub mod client;
pub mod fixtures;
pub mod postgres;
pub mod queue;

pub use client::{TestApp, TestResponse};
pub use fixtures::seed_requested;
pub use postgres::TestDatabase;
