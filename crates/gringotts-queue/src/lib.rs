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

//! Message broker plumbing for the goblin workers.

pub mod channel;
pub mod error;

pub use channel::{connect, create_queue_channel, publish};
pub use error::{QueueError, QueueResult};
