//! Digest computation and comparison for the hot loop.

use super::types::DigestAlgorithm;
use crate::error::SearchError;
use sha2::Digest as _;

/// Largest digest any supported algorithm produces.
pub const MAX_DIGEST_LEN: usize = 32;

/// Decodes and validates a hex target digest for `algorithm`.
///
/// The input must be exactly `algorithm.hex_len()` hex characters; surrounding
/// whitespace is rejected like any other non-hex character.
pub fn parse_target_hex(algorithm: DigestAlgorithm, hex_digest: &str) -> Result<Vec<u8>, SearchError> {
    if hex_digest.len() != algorithm.hex_len() {
        return Err(SearchError::invalid(format!(
            "{} digest must be {} hex characters, got {}",
            algorithm,
            algorithm.hex_len(),
            hex_digest.len()
        )));
    }

    hex::decode(hex_digest).map_err(|e| {
        SearchError::invalid(format!("digest is not valid hexadecimal: {}", e))
    })
}

/// Lowercase hex digest of `plaintext`.
pub fn hex_digest(algorithm: DigestAlgorithm, plaintext: &[u8]) -> String {
    match algorithm {
        DigestAlgorithm::Md5 => hex::encode(md5::compute(plaintext).0),
        DigestAlgorithm::Sha256 => hex::encode(sha2::Sha256::digest(plaintext)),
    }
}

/// Byte-for-byte digest equality.
#[inline]
pub fn digests_match(candidate: &[u8], target: &[u8]) -> bool {
    candidate == target
}

/// Hashes candidates and compares them with one target digest.
///
/// Owned by a single worker. Every digest is written into the same inline
/// scratch buffer, so checking a candidate never touches the heap.
#[derive(Debug, Clone)]
pub struct DigestMatcher {
    algorithm: DigestAlgorithm,
    target: [u8; MAX_DIGEST_LEN],
    scratch: [u8; MAX_DIGEST_LEN],
    len: usize,
}

impl DigestMatcher {
    pub fn new(algorithm: DigestAlgorithm, target: &[u8]) -> Result<Self, SearchError> {
        let len = algorithm.output_len();
        if target.len() != len {
            return Err(SearchError::invalid(format!(
                "{} target must be {} bytes, got {}",
                algorithm,
                len,
                target.len()
            )));
        }

        let mut stored = [0u8; MAX_DIGEST_LEN];
        stored[..len].copy_from_slice(target);

        Ok(Self {
            algorithm,
            target: stored,
            scratch: [0u8; MAX_DIGEST_LEN],
            len,
        })
    }

    pub fn from_hex(algorithm: DigestAlgorithm, hex_digest: &str) -> Result<Self, SearchError> {
        let target = parse_target_hex(algorithm, hex_digest)?;
        Self::new(algorithm, &target)
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn target(&self) -> &[u8] {
        &self.target[..self.len]
    }

    /// Digest of `input`, valid until the next call.
    #[inline]
    pub fn digest(&mut self, input: &[u8]) -> &[u8] {
        match self.algorithm {
            DigestAlgorithm::Md5 => {
                let out = md5::compute(input);
                self.scratch[..16].copy_from_slice(&out.0);
            }
            DigestAlgorithm::Sha256 => {
                let out = sha2::Sha256::digest(input);
                self.scratch[..32].copy_from_slice(&out);
            }
        }
        &self.scratch[..self.len]
    }

    #[inline]
    pub fn matches(&mut self, input: &[u8]) -> bool {
        self.digest(input);
        digests_match(&self.scratch[..self.len], &self.target[..self.len])
    }
}
