//! Access-token storage.
//!
//! The stored token is base64-obfuscated before hitting the local store.
//! This is reversible encoding, not encryption; the tool's threat model is
//! a low-stakes single-user setup and the token never leaves the local
//! machine except in request headers. A corrupt stored value reads as
//! absent. An environment token, when set, always wins over the stored one.

use crate::constants::{TOKEN_ENV_VAR, TOKEN_KEY};
use crate::store::KvStore;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tracing::{error, warn};

/// Token storage over the local key-value store.
#[derive(Clone)]
pub struct TokenStore {
    kv: KvStore,
}

impl TokenStore {
    pub fn new(kv: KvStore) -> Self {
        Self { kv }
    }

    /// Store a token (obfuscated). Returns `false` on storage failure.
    pub fn save(&self, token: &str) -> bool {
        let encoded = BASE64.encode(token);
        if let Err(err) = self.kv.set(TOKEN_KEY, &encoded) {
            error!("failed to store token: {err}");
            return false;
        }
        true
    }

    /// The locally stored token, decoded. `None` when absent or corrupt.
    pub fn stored(&self) -> Option<String> {
        let encoded = self.kv.get(TOKEN_KEY).ok()??;
        match BASE64.decode(&encoded) {
            Ok(bytes) => match String::from_utf8(bytes) {
                Ok(token) => Some(token),
                Err(_) => {
                    warn!("stored token is not valid UTF-8, treating as absent");
                    None
                }
            },
            Err(_) => {
                warn!("stored token failed to decode, treating as absent");
                None
            }
        }
    }

    /// Remove the stored token.
    pub fn clear(&self) {
        if let Err(err) = self.kv.delete(TOKEN_KEY) {
            error!("failed to clear token: {err}");
        }
    }

    /// Whether any token is resolvable.
    pub fn has_token(&self) -> bool {
        self.resolve().is_some()
    }

    /// Resolve the effective token.
    ///
    /// The environment token takes precedence over the stored one.
    pub fn resolve(&self) -> Option<String> {
        if let Ok(token) = std::env::var(TOKEN_ENV_VAR)
            && !token.is_empty()
        {
            return Some(token);
        }
        self.stored()
    }
}
