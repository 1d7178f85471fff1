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

//! HTTP surface for the Gringotts service.
//!
//! The handlers are deliberately thin wrappers over the data layer; the
//! interesting consumers are the integration fixtures that drive this router
//! in-process.
//! Layout: `router.rs` (route table), `state.rs` (shared handler state),
//! `health.rs` and `vaults.rs` (handlers), `errors.rs` (problem bodies).

pub mod errors;
pub mod health;
pub mod router;
pub mod state;
pub mod vaults;

pub use errors::ApiError;
pub use router::router;
pub use state::ApiState;
pub use vaults::{CreateVaultRequest, VaultResponse};
