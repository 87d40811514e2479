//! Server side of the SRP-6a password-authenticated key exchange.
//!
//! The engine is pure protocol math: no storage, no I/O. Callers keep the
//! serialized server state between the two steps of the handshake and feed it
//! back into [`SrpEngine::step2`]. All wire values are hexadecimal-encoded
//! big-endian big integers; both sides must agree on this encoding or proofs
//! never match.

mod engine;
mod params;

pub use engine::{ServerChallenge, ServerState, SrpEngine, SrpError, STATE_VERSION};
pub use params::SrpParams;

#[cfg(test)]
pub(crate) use engine::testing;
