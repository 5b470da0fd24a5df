use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Rejected hash literal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {kind} hash: expected {len} lowercase hex chars, got '{input}'")]
pub struct HashError {
    kind: &'static str,
    len: usize,
    input: String,
}

fn is_lower_hex(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Newtype for a SHA-1 commit hash (40 lowercase hex characters).
///
/// Identifies the commit a tag points at; equality on it is how the
/// version resolver associates a partial tag with an exact one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha1Hash(String);

impl Sha1Hash {
    /// Create a validated SHA-1 hash (40 lowercase hex characters).
    pub fn new(s: impl Into<String>) -> Result<Self, HashError> {
        let s = s.into();
        if is_lower_hex(&s, 40) {
            Ok(Self(s))
        } else {
            Err(HashError {
                kind: "SHA1",
                len: 40,
                input: s,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Sha1Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha1Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha1Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Newtype for a SHA-256 digest (64 lowercase hex characters).
///
/// Validated at construction so invalid hex strings never propagate into
/// checksum comparisons.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sha256Hash(String);

impl Sha256Hash {
    /// Create a validated SHA-256 hash (64 lowercase hex characters).
    pub fn new(s: impl Into<String>) -> Result<Self, HashError> {
        let s = s.into();
        if is_lower_hex(&s, 64) {
            Ok(Self(s))
        } else {
            Err(HashError {
                kind: "SHA256",
                len: 64,
                input: s,
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Sha256Hash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::new(s).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Sha256Hash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Hash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_accepts_40_hex() {
        let h = Sha1Hash::new("a".repeat(40)).unwrap();
        assert_eq!(h.as_str().len(), 40);
    }

    #[test]
    fn sha1_rejects_wrong_length_and_case() {
        assert!(Sha1Hash::new("abc").is_err());
        assert!(Sha1Hash::new("A".repeat(40)).is_err());
    }

    #[test]
    fn sha256_accepts_64_hex() {
        let h = Sha256Hash::new("0123456789abcdef".repeat(4)).unwrap();
        assert_eq!(h.as_str().len(), 64);
    }

    #[test]
    fn sha256_rejects_uppercase_and_nonhex() {
        assert!(Sha256Hash::new("0123456789ABCDEF".repeat(4)).is_err());
        assert!(Sha256Hash::new("z".repeat(64)).is_err());
    }
}
