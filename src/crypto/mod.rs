//! Request signing for the streaming endpoint.
//!
//! The `music/mplay` endpoint only answers requests that carry a salt and
//! a signature derived from the track being streamed:
//!
//! - The signing key is the byte-wise XOR of two fixed constants
//! - The salt is the current Unix time in milliseconds
//! - The signature is `HMAC-SHA1(key, store_id || salt)`, URL-safe base64
//!   encoded with the trailing padding character dropped

use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use crate::error::SigningError;

type HmacSha1 = Hmac<Sha1>;

/// First half of the signing key material.
const KEY_PART_1: &str =
    "VzeC4H4h+T2f0VI180nVX8x+Mb5HiTtGnKgH52Otj8ZCGDz9jRWyHb6QXK0JskSiOgzQfwTY5xgLLSdUSreaLVMsVVWfxfa8Rw==";

/// Second half of the signing key material.
const KEY_PART_2: &str =
    "ZAPnhUkYwQ6y5DdQxWThbvhJHN8msQ1rqJw0ggKdufQjelrKuiGGJI30aswkgCWTDyHkTGK9ynlqTkJ5L4CiGGUabGeo8M6JTQ==";

/// Salt and signature sent alongside a stream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Millisecond timestamp used as salt.
    pub salt: String,
    /// URL-safe base64 HMAC.
    pub signature: String,
}

/// Derives stream signatures.
///
/// Holds no state besides the constant key, so a single signer can be
/// shared freely between tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSigner;

impl RequestSigner {
    pub fn new() -> Self {
        Self
    }

    /// Sign `seed` with the current time as salt.
    pub fn sign_now(&self, seed: Option<&str>) -> Result<Signature, SigningError> {
        self.sign(seed, &current_millis())
    }

    /// Sign `seed` with an explicit salt.
    pub fn sign(&self, seed: Option<&str>, salt: &str) -> Result<Signature, SigningError> {
        let seed = validate_seed(seed)?;

        let mut mac = HmacSha1::new_from_slice(signing_key())
            .expect("HMAC accepts keys of any length");
        mac.update(seed.as_bytes());
        mac.update(salt.as_bytes());
        let digest = mac.finalize().into_bytes();

        let mut signature = URL_SAFE.encode(digest);
        // 20 digest bytes always encode to 27 chars plus one '='.
        signature.pop();

        debug!("Signed stream request for {} with salt {}", seed, salt);

        Ok(Signature {
            salt: salt.to_string(),
            signature,
        })
    }
}

fn validate_seed(seed: Option<&str>) -> Result<&str, SigningError> {
    let seed = seed.map(str::trim).unwrap_or("");
    if seed.is_empty() {
        return Err(SigningError::MissingSeed);
    }
    if seed.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(SigningError::MalformedSeed(seed.to_string()));
    }
    Ok(seed)
}

/// The XOR of both key halves, computed once.
fn signing_key() -> &'static [u8] {
    static KEY: OnceLock<Vec<u8>> = OnceLock::new();
    KEY.get_or_init(|| {
        let first = STANDARD.decode(KEY_PART_1).unwrap_or_default();
        let second = STANDARD.decode(KEY_PART_2).unwrap_or_default();
        first.iter().zip(second.iter()).map(|(a, b)| a ^ b).collect()
    })
}

/// Current Unix time in milliseconds, as a string.
pub(crate) fn current_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
        .to_string()
}
