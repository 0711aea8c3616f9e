//! Core data types for secret retrieval.
//!
//! [`SecretString`] keeps secret values out of logs, debug output, and
//! serialized responses unless exposed explicitly, and zeroes its memory on
//! drop. [`SecretRecord`] is the per-key payload a backend returns: a mapping
//! of sub-key to value, since backends may decompose composite secrets (for
//! example a JSON blob) into fields.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A string wrapper that redacts its contents in Debug, Display, and
/// serialization.
///
/// Debug prints `SecretString([REDACTED])`, Display prints `[REDACTED]`, and
/// Serialize emits `"[REDACTED]"`. The underlying memory is overwritten with
/// zeros on drop. The actual value is only reachable through
/// [`SecretString::expose_secret`].
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Exposes the underlying secret value. Never log or print the result.
    pub fn expose_secret(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner value.
    pub fn into_inner(mut self) -> String {
        std::mem::take(&mut self.0)
    }
}

impl Serialize for SecretString {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // Never serialize the actual secret value; response assembly must go
        // through expose_secret explicitly.
        serializer.serialize_str("[REDACTED]")
    }
}

impl<'de> Deserialize<'de> for SecretString {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        // Accepts actual secret values, e.g. from test fixtures.
        Ok(SecretString(String::deserialize(deserializer)?))
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretString([REDACTED])")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl PartialEq for SecretString {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for SecretString {}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A single secret as returned by a backend: sub-key to value.
///
/// Transient, created per response and discarded after serialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    pub data: BTreeMap<String, SecretString>,
}

impl SecretRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record holding a single field, the common case for flat secrets.
    pub fn single(field: impl Into<String>, value: impl Into<SecretString>) -> Self {
        let mut data = BTreeMap::new();
        data.insert(field.into(), value.into());
        Self { data }
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<SecretString>) {
        self.data.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&SecretString> {
        self.data.get(field)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<K: Into<String>, V: Into<SecretString>> FromIterator<(K, V)> for SecretRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// Request to fetch one secret from a named store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetSecretRequest {
    pub store_name: String,
    pub key: String,
    /// Caller-supplied metadata passed through to the backend verbatim.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl GetSecretRequest {
    pub fn new(store_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self { store_name: store_name.into(), key: key.into(), metadata: HashMap::new() }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Request to fetch every secret a named store will return.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GetBulkSecretRequest {
    pub store_name: String,
    /// Caller-supplied metadata passed through to the backend verbatim.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl GetBulkSecretRequest {
    pub fn new(store_name: impl Into<String>) -> Self {
        Self { store_name: store_name.into(), metadata: HashMap::new() }
    }

    pub fn with_metadata(mut self, metadata: HashMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}
