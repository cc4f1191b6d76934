//! Credential extraction and the immutable credential pool.
//!
//! Configuration strings arrive in messy shapes: several keys glued together
//! with commas, semicolons, pipes or newlines, surrounded by quotes, or with
//! a leftover `NAME=` prefix from a copy-pasted env assignment. Extraction
//! looks for the structural signature of a key (a fixed prefix plus a
//! minimum total length) rather than trusting the surrounding formatting.

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Placeholder key installed when no usable credential was configured.
/// It is shaped like a key but guaranteed to fail authentication, so a
/// misconfigured deployment surfaces as a classifiable backend error
/// instead of a crash at startup.
const SENTINEL_KEY: &str = "missing-studyforge-credential";

/// Structural signature of a valid credential.
///
/// The prefix and minimum length are configuration data, not logic: a
/// different backend only needs a different `KeyFormat` value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyFormat {
    /// Literal prefix every valid key starts with.
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Minimum total length of a valid key, prefix included.
    #[serde(default = "default_min_len")]
    pub min_len: usize,
}

fn default_prefix() -> String {
    "AIza".to_string()
}

fn default_min_len() -> usize {
    30
}

impl Default for KeyFormat {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            min_len: default_min_len(),
        }
    }
}

/// An opaque authorization token for one outbound generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// The sentinel credential used when configuration yielded no keys.
    pub fn sentinel() -> Self {
        Self(SENTINEL_KEY.to_string())
    }

    /// Whether this is the sentinel "missing" credential.
    pub fn is_sentinel(&self) -> bool {
        self.0 == SENTINEL_KEY
    }

    /// The raw key, for constructing the outbound request.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keys must never leak into logs or user-facing text.
impl std::fmt::Display for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_sentinel() {
            return write!(f, "<missing>");
        }
        // Char-aware prefix: extraction accepts any bytes after the
        // structural prefix, so a byte slice could split a multibyte char.
        let visible: String = self.0.chars().take(6).collect();
        write!(f, "{visible}…")
    }
}

/// Extracts every substring of `raw` that matches the key signature.
///
/// Splits on the accepted separator characters, strips surrounding quotes,
/// and takes the remainder of each token from the first occurrence of the
/// structural prefix, so `GEMINI_API_KEY="AIza…"` yields just the key.
fn extract(raw: &str, format: &KeyFormat) -> Vec<String> {
    let mut keys = Vec::new();
    let separators = |c: char| matches!(c, ',' | ';' | '|' | '\n' | '\r') || c.is_whitespace();
    for token in raw.split(separators) {
        let token = token.trim_matches(|c| matches!(c, '"' | '\'' | '`'));
        if let Some(pos) = token.find(format.prefix.as_str()) {
            let candidate = token[pos..].trim_matches(|c| matches!(c, '"' | '\'' | '`'));
            if candidate.len() >= format.min_len {
                keys.push(candidate.to_string());
            }
        }
    }
    keys
}

/// The immutable, deduplicated collection of credentials available to the
/// dispatcher.
///
/// Built once at startup and read-only afterwards; a credential that turns
/// out to be bad is statistically avoided by retrying, never removed.
#[derive(Debug)]
pub struct CredentialPool {
    entries: Vec<Credential>,
}

impl CredentialPool {
    /// Builds a pool from raw configuration strings.
    ///
    /// Duplicates collapse to one entry, first-seen order preserved. When
    /// extraction yields nothing the pool holds exactly one sentinel entry.
    pub fn from_sources<S: AsRef<str>>(sources: &[S], format: &KeyFormat) -> Self {
        let mut entries: Vec<Credential> = Vec::new();
        for source in sources {
            for key in extract(source.as_ref(), format) {
                let credential = Credential(key);
                if !entries.contains(&credential) {
                    entries.push(credential);
                }
            }
        }
        if entries.is_empty() {
            warn!("no usable credentials found in configuration, installing sentinel");
            entries.push(Credential::sentinel());
        }
        Self { entries }
    }

    /// Builds a pool directly from already-validated credentials (tests and
    /// embedded fallback lists).
    pub fn from_credentials(credentials: Vec<Credential>) -> Self {
        let mut entries: Vec<Credential> = Vec::new();
        for credential in credentials {
            if !entries.contains(&credential) {
                entries.push(credential);
            }
        }
        if entries.is_empty() {
            entries.push(Credential::sentinel());
        }
        Self { entries }
    }

    /// Number of credentials in the pool (always ≥ 1).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A pool is never empty; this exists to satisfy the usual pairing.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Whether the pool holds only the sentinel, i.e. no real credential
    /// was configured.
    pub fn is_missing(&self) -> bool {
        self.entries.len() == 1 && self.entries[0].is_sentinel()
    }

    /// Returns one credential chosen uniformly at random.
    ///
    /// A pure read over the immutable entries; approximates even load
    /// distribution across keys without any coordination state.
    pub fn pick(&self) -> Credential {
        self.entries
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_else(Credential::sentinel)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn fmt() -> KeyFormat {
        KeyFormat::default()
    }

    fn key(suffix: char) -> String {
        format!("AIza{}", String::from(suffix).repeat(35))
    }

    #[test]
    fn extracts_keys_across_mixed_separators() {
        let a = key('a');
        let b = key('b');
        let c = key('c');
        let raw = format!("{a}, {b};{c}");
        let pool = CredentialPool::from_sources(&[raw], &fmt());
        assert_eq!(pool.len(), 3);
        assert!(!pool.is_missing());
    }

    #[test]
    fn strips_quotes_and_env_assignment_artifacts() {
        let a = key('a');
        let b = key('b');
        let raw = format!("GEMINI_API_KEY=\"{a}\"\nAPI_KEY='{b}'");
        let pool = CredentialPool::from_sources(&[raw], &fmt());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn pipes_and_whitespace_separate_keys() {
        let a = key('a');
        let b = key('b');
        let raw = format!("{a}|{b}");
        let pool = CredentialPool::from_sources(&[raw], &fmt());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn duplicates_collapse_to_one() {
        let a = key('a');
        let raw = format!("{a},{a}\n{a}");
        let pool = CredentialPool::from_sources(&[raw], &fmt());
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn duplicates_across_sources_collapse() {
        let a = key('a');
        let b = key('b');
        let pool = CredentialPool::from_sources(&[a.clone(), format!("{a},{b}")], &fmt());
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn too_short_keys_are_rejected() {
        let pool = CredentialPool::from_sources(&["AIzaShort".to_string()], &fmt());
        assert!(pool.is_missing());
    }

    #[test]
    fn empty_configuration_yields_sentinel_pool() {
        let pool = CredentialPool::from_sources(&["", "not a key at all"], &fmt());
        assert_eq!(pool.len(), 1);
        assert!(pool.is_missing());
        assert!(pool.pick().is_sentinel());
    }

    #[test]
    fn pick_returns_a_pool_member() {
        let a = key('a');
        let b = key('b');
        let pool = CredentialPool::from_sources(&[format!("{a},{b}")], &fmt());
        for _ in 0..20 {
            let picked = pool.pick();
            assert!(picked.as_str() == a || picked.as_str() == b);
        }
    }

    #[test]
    fn display_handles_multibyte_keys() {
        let key = format!("AIzaa{}", "é".repeat(20));
        let pool = CredentialPool::from_sources(&[key.clone()], &fmt());
        assert!(!pool.is_missing());
        let shown = pool.pick().to_string();
        assert!(!shown.contains(&key));
        assert!(shown.ends_with('…'));
    }

    #[test]
    fn display_never_reveals_the_full_key() {
        let a = key('a');
        let pool = CredentialPool::from_sources(&[a.clone()], &fmt());
        let shown = pool.pick().to_string();
        assert!(!shown.contains(&a));
        assert!(shown.len() < a.len());
    }
}
