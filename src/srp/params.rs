//! Fixed SRP group parameters.

use num_bigint::BigUint;
use sha2::{Digest, Sha256};

/// 2048-bit MODP group from RFC 3526 (group 14), a safe prime with g = 2.
/// Clients must use the same group or the handshake cannot succeed.
const MODP_2048_HEX: &str = "FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD129024E088A67CC74\
020BBEA63B139B22514A08798E3404DDEF9519B3CD3A431B302B0A6DF25F1437\
4FE1356D6D51C245E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3DC2007CB8A163BF05\
98DA48361C55D39A69163FA8FD24CF5F83655D23DCA3AD961C62F356208552BB\
9ED529077096966D670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9DE2BCBF695581718\
3995497CEA956AE515D2261898FA051015728E5A8AACAA68FFFFFFFFFFFFFFFF";

/// One SRP parameter set: the safe-prime group and the derived multiplier
/// `k = H(N | PAD(g))`. Process-wide configuration, injected into the engine.
#[derive(Debug, Clone)]
pub struct SrpParams {
    n: BigUint,
    g: BigUint,
    k: BigUint,
}

impl SrpParams {
    /// SHA-256 over the RFC 3526 2048-bit group.
    #[must_use]
    pub fn modp_2048() -> Self {
        let n = BigUint::parse_bytes(MODP_2048_HEX.as_bytes(), 16)
            .unwrap_or_else(|| unreachable!("group constant is valid hex"));
        let g = BigUint::from(2u32);

        let mut hasher = Sha256::new();
        hasher.update(n.to_bytes_be());
        hasher.update(left_pad(&g.to_bytes_be(), byte_len(&n)));
        let k = BigUint::from_bytes_be(&hasher.finalize());

        Self { n, g, k }
    }

    pub(crate) fn n(&self) -> &BigUint {
        &self.n
    }

    pub(crate) fn g(&self) -> &BigUint {
        &self.g
    }

    pub(crate) fn k(&self) -> &BigUint {
        &self.k
    }

    /// Byte length of N; hashed values A, B, and g are left-padded to it
    /// where the protocol requires (`k` and `u`).
    pub(crate) fn len_bytes(&self) -> usize {
        byte_len(&self.n)
    }

    /// Serialize a group element left-padded to the length of N.
    pub(crate) fn pad(&self, value: &BigUint) -> Vec<u8> {
        left_pad(&value.to_bytes_be(), self.len_bytes())
    }

    /// `H(N) XOR H(g)`, the fixed prefix of the M1 proof.
    pub(crate) fn hash_n_xor_hash_g(&self) -> Vec<u8> {
        let hn = Sha256::digest(self.n.to_bytes_be());
        let hg = Sha256::digest(self.g.to_bytes_be());
        hn.iter().zip(hg.iter()).map(|(a, b)| a ^ b).collect()
    }
}

impl Default for SrpParams {
    fn default() -> Self {
        Self::modp_2048()
    }
}

fn byte_len(value: &BigUint) -> usize {
    ((value.bits() as usize) + 7) / 8
}

fn left_pad(bytes: &[u8], width: usize) -> Vec<u8> {
    if bytes.len() >= width {
        return bytes.to_vec();
    }
    let mut padded = vec![0u8; width - bytes.len()];
    padded.extend_from_slice(bytes);
    padded
}
