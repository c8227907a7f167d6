//! Match sessions and action replication.
//!
//! Two clients keep identical match states by exchanging the actions each
//! applies, never the state itself. Every message carries the sender's
//! snapshot hash so the receiver can detect divergence.
//!
//! - `protocol`: message encoding and the snapshot hash
//! - `transport`: the outbound message seam
//! - `client`: permission checks, broadcast, remote apply, AI scheduling

pub mod client;
pub mod protocol;
pub mod transport;

pub use client::{Divergence, GameClient, RemoteOutcome};
pub use protocol::{decode_message, encode_message, snapshot_hash, state_hash, RemoteAction};
pub use transport::{QueueTransport, Transport};
