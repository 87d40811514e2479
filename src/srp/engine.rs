//! SRP-6a server computations: step1 (challenge) and step2 (proof check).

use super::params::SrpParams;
use num_bigint::BigUint;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Version tag carried inside serialized handshake state. A parameter-set
/// change must bump this so stale state is rejected instead of producing
/// proofs that silently never match.
pub const STATE_VERSION: u8 = 1;

const PRIVATE_EPHEMERAL_BYTES: usize = 32;

#[derive(Debug, Error)]
pub enum SrpError {
    #[error("invalid hex value")]
    InvalidHex,
    #[error("unsupported handshake state version: {0}")]
    StateVersion(u8),
    #[error("client public ephemeral is zero modulo N")]
    ZeroClientEphemeral,
    #[error("client proof mismatch")]
    InvalidProof,
    #[error("failed to generate private ephemeral")]
    Rng,
}

/// Server-side handshake state between step1 and step2.
///
/// Serialized into the ephemeral session store; holds the private ephemeral,
/// so it must never be returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerState {
    pub version: u8,
    pub username: String,
    pub salt: String,
    pub verifier: String,
    pub private_b: String,
    pub public_b: String,
}

/// Outcome of step1: the public ephemeral for the client plus the state the
/// server keeps for step2.
#[derive(Debug)]
pub struct ServerChallenge {
    pub server_public: String,
    pub state: ServerState,
}

/// SRP-6a server engine over one fixed parameter set.
#[derive(Debug, Clone)]
pub struct SrpEngine {
    params: SrpParams,
}

impl SrpEngine {
    #[must_use]
    pub fn new(params: SrpParams) -> Self {
        Self { params }
    }

    /// Compute `B = k·v + g^b (mod N)` with a fresh random private ephemeral.
    ///
    /// A new `b` is drawn on every call; reuse would allow precomputation and
    /// replay against recorded handshakes.
    ///
    /// # Errors
    ///
    /// Fails on malformed hex input or if the system RNG fails.
    pub fn step1(&self, username: &str, salt: &str, verifier: &str) -> Result<ServerChallenge, SrpError> {
        let v = parse_hex(verifier)?;
        parse_hex(salt)?;

        let mut bytes = [0u8; PRIVATE_EPHEMERAL_BYTES];
        OsRng.try_fill_bytes(&mut bytes).map_err(|_| SrpError::Rng)?;
        let b = BigUint::from_bytes_be(&bytes);

        let n = self.params.n();
        let public_b = (self.params.k() * &v + self.params.g().modpow(&b, n)) % n;

        let state = ServerState {
            version: STATE_VERSION,
            username: username.to_string(),
            salt: salt.to_string(),
            verifier: verifier.to_string(),
            private_b: to_hex(&b),
            public_b: to_hex(&public_b),
        };

        Ok(ServerChallenge {
            server_public: state.public_b.clone(),
            state,
        })
    }

    /// Verify the client's proof `M1` and answer with the server proof `M2`.
    ///
    /// Rejects `A ≡ 0 (mod N)` before any key derivation; a zero ephemeral
    /// forces the shared key to zero regardless of the password.
    ///
    /// # Errors
    ///
    /// Fails with [`SrpError::InvalidProof`] when `M1` does not match; callers
    /// surface all step2 failures generically to avoid an oracle.
    pub fn step2(
        &self,
        state: &ServerState,
        client_public: &str,
        client_proof: &str,
    ) -> Result<String, SrpError> {
        if state.version != STATE_VERSION {
            return Err(SrpError::StateVersion(state.version));
        }

        let n = self.params.n();
        let a_pub = parse_hex(client_public)?;
        if &a_pub % n == BigUint::from(0u32) {
            return Err(SrpError::ZeroClientEphemeral);
        }

        let b = parse_hex(&state.private_b)?;
        let b_pub = parse_hex(&state.public_b)?;
        let v = parse_hex(&state.verifier)?;
        let salt_bytes = hex::decode(&state.salt).map_err(|_| SrpError::InvalidHex)?;

        let u = hash_to_int(&[&self.params.pad(&a_pub), &self.params.pad(&b_pub)]);
        if u == BigUint::from(0u32) {
            return Err(SrpError::InvalidProof);
        }

        // S = (A · v^u)^b mod N, K = H(S)
        let s = (&a_pub * v.modpow(&u, n)).modpow(&b, n);
        let key = Sha256::digest(s.to_bytes_be());

        let expected_m1 = Sha256::new()
            .chain_update(self.params.hash_n_xor_hash_g())
            .chain_update(Sha256::digest(state.username.as_bytes()))
            .chain_update(&salt_bytes)
            .chain_update(a_pub.to_bytes_be())
            .chain_update(b_pub.to_bytes_be())
            .chain_update(key)
            .finalize();

        let m1 = hex::decode(client_proof).map_err(|_| SrpError::InvalidHex)?;
        if m1 != expected_m1.as_slice() {
            return Err(SrpError::InvalidProof);
        }

        let m2 = Sha256::new()
            .chain_update(a_pub.to_bytes_be())
            .chain_update(expected_m1)
            .chain_update(key)
            .finalize();

        Ok(hex::encode(m2))
    }

    /// Synthesize constant-shape challenge material for an unknown username.
    ///
    /// The salt is derived deterministically from a per-process seed so the
    /// same unknown username always sees the same salt, and the verifier is
    /// derived from a seed-keyed secret the client cannot know. The resulting
    /// handshake is indistinguishable from a real one and can never be
    /// completed.
    #[must_use]
    pub fn decoy_credentials(&self, seed: &[u8], username: &str) -> (String, String) {
        let salt = Sha256::new()
            .chain_update(seed)
            .chain_update(b"salt")
            .chain_update(username.as_bytes())
            .finalize();

        let x = Sha256::new()
            .chain_update(seed)
            .chain_update(b"verifier")
            .chain_update(username.as_bytes())
            .finalize();
        let x = BigUint::from_bytes_be(&x);
        let verifier = self.params.g().modpow(&x, self.params.n());

        (hex::encode(&salt[..16]), to_hex(&verifier))
    }
}

fn parse_hex(value: &str) -> Result<BigUint, SrpError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SrpError::InvalidHex);
    }
    BigUint::parse_bytes(value.as_bytes(), 16).ok_or(SrpError::InvalidHex)
}

fn to_hex(value: &BigUint) -> String {
    format!("{value:x}")
}

fn hash_to_int(parts: &[&[u8]]) -> BigUint {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    BigUint::from_bytes_be(&hasher.finalize())
}
