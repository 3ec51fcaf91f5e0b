//! The digest worker.
//!
//! A worker is a one-shot task per accepted submission: it waits out the
//! configured delay, hashes the payload with SHA-512, and hands back a
//! [`JobEntry`] whose duration covers only the hashing itself.

use crate::types::{JobEntry, JobId};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use core::time::Duration;
use sha2::{Digest, Sha512};
use std::time::Instant;

/// Hashes `payload` and returns the hex digest along with how long it took.
///
/// The duration includes hex encoding, matching what a caller would observe
/// when producing the stored form of the digest.
pub fn compute(payload: &[u8]) -> (String, u64) {
    let start = Instant::now();
    let digest = hex::encode(Sha512::digest(payload));
    let elapsed = start.elapsed();
    (digest, u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX))
}

/// Runs a digest worker to completion for `id`.
///
/// Sleeps for `delay` first. There are no retries: hashing an in-memory slice
/// cannot fail.
#[cfg_attr(feature = "tracing", tracing::instrument(name = "digest_worker", skip(payload), fields(len = payload.len())))]
pub async fn run(id: JobId, payload: Vec<u8>, delay: Duration) -> JobEntry {
    #[cfg(feature = "tracing")]
    tracing::debug!("Waiting {:?} to hash job {}", delay, id);

    tokio::time::sleep(delay).await;

    let (digest, duration_micros) = compute(&payload);

    #[cfg(feature = "tracing")]
    tracing::debug!(duration_micros, "Job {} hashed", id);

    JobEntry {
        id,
        digest,
        duration_micros,
    }
}

/// Encodes a stored hex digest the way lookups return it: standard, padded
/// base64 over the hex text.
pub fn encode_for_wire(hex_digest: &str) -> String {
    STANDARD.encode(hex_digest.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_lowercase_hex_of_sha512() {
        let (digest, _) = compute(b"angryMonkey2");
        assert_eq!(digest.len(), 128);
        assert!(digest.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
        assert_eq!(digest, hex::encode(Sha512::digest(b"angryMonkey2")));
    }

    #[test]
    fn empty_payload_hashes_to_known_value() {
        let (digest, _) = compute(b"");
        assert!(digest.starts_with("cf83e1357eefb8bdf1542850d66d8007"));
        assert!(digest.ends_with("a538327af927da3e"));
    }

    #[test]
    fn wire_encoding_is_base64_of_hex_text() {
        assert_eq!(encode_for_wire("ab"), "YWI=");
        let (digest, _) = compute(b"angryMonkey");
        let decoded = STANDARD.decode(encode_for_wire(&digest)).unwrap();
        assert_eq!(decoded, digest.as_bytes());
    }

    #[tokio::test]
    async fn run_waits_for_the_delay() {
        let delay = Duration::from_millis(50);
        let start = Instant::now();
        let entry = run(7, b"secret".to_vec(), delay).await;
        assert!(start.elapsed() >= delay);
        assert_eq!(entry.id, 7);
        assert_eq!(entry.digest, compute(b"secret").0);
    }
}
