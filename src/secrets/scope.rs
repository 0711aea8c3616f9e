//! Access scope evaluation for secret stores.
//!
//! A [`ScopeConfig`] describes the per-store access policy: a default access
//! mode plus explicit allow/deny key lists. [`evaluate`] is a pure function
//! over that configuration and a key; it never touches a backend and never
//! logs, so audit emission stays a separate, explicit pipeline step.
//!
//! # Decision precedence
//!
//! Evaluated in this fixed order, first match wins:
//!
//! 1. No configuration for the store: allow (`NoConfiguration`).
//! 2. Key in the deny list: deny (`DeniedListMatch`). Denial always wins.
//! 3. Allow list configured (non-empty): allow on membership
//!    (`AllowedListMatch`), otherwise deny (`NotInAllowedList`). A configured
//!    allow list is exhaustive, independent of default access.
//! 4. No allow list: fall back to the default access mode (`DefaultAllow` /
//!    `DefaultDeny`).

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Fallback decision applied when no allow list is configured for a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultAccess {
    /// Stores are open by default.
    #[default]
    Allow,
    /// Every key must be explicitly allowed.
    Deny,
}

impl DefaultAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
        }
    }
}

impl fmt::Display for DefaultAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-store secret scoping configuration.
///
/// Belongs to exactly one store and is read-only for the lifetime of a
/// request; the registry owns it. An empty `allowed_keys` set means "no
/// allow list configured", not "allow nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScopeConfig {
    /// Decision applied when neither list matches and no allow list exists.
    pub default_access: DefaultAccess,

    /// Exhaustive allow list; anything not listed is denied once non-empty.
    pub allowed_keys: BTreeSet<String>,

    /// Keys that are always denied, regardless of the allow list or default.
    pub denied_keys: BTreeSet<String>,
}

impl ScopeConfig {
    /// Create a scope with the given default access and empty key lists.
    pub fn new(default_access: DefaultAccess) -> Self {
        Self { default_access, ..Default::default() }
    }

    /// Add keys to the allow list.
    pub fn with_allowed<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Add keys to the deny list.
    pub fn with_denied<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denied_keys.extend(keys.into_iter().map(Into::into));
        self
    }
}

/// Why a key was allowed or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessReason {
    /// No scoping configuration exists for the store.
    NoConfiguration,
    /// The key matched the deny list.
    DeniedListMatch,
    /// An allow list is configured and the key is not on it.
    NotInAllowedList,
    /// The key matched the allow list.
    AllowedListMatch,
    /// No lists matched and the default access is deny.
    DefaultDeny,
    /// No lists matched and the default access is allow.
    DefaultAllow,
}

impl AccessReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NoConfiguration => "NoConfiguration",
            Self::DeniedListMatch => "DeniedListMatch",
            Self::NotInAllowedList => "NotInAllowedList",
            Self::AllowedListMatch => "AllowedListMatch",
            Self::DefaultDeny => "DefaultDeny",
            Self::DefaultAllow => "DefaultAllow",
        }
    }
}

impl fmt::Display for AccessReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Outcome of evaluating a (scope, key) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessDecision {
    pub allowed: bool,
    pub reason: AccessReason,
}

impl AccessDecision {
    fn allow(reason: AccessReason) -> Self {
        Self { allowed: true, reason }
    }

    fn deny(reason: AccessReason) -> Self {
        Self { allowed: false, reason }
    }
}

/// Decide whether `key` may be read from a store with the given scope.
///
/// Pure function; see the module docs for the exact precedence.
pub fn evaluate(scope: Option<&ScopeConfig>, key: &str) -> AccessDecision {
    let Some(config) = scope else {
        // Stores without explicit scoping are open by default.
        return AccessDecision::allow(AccessReason::NoConfiguration);
    };

    if config.denied_keys.contains(key) {
        return AccessDecision::deny(AccessReason::DeniedListMatch);
    }

    if !config.allowed_keys.is_empty() {
        return if config.allowed_keys.contains(key) {
            AccessDecision::allow(AccessReason::AllowedListMatch)
        } else {
            AccessDecision::deny(AccessReason::NotInAllowedList)
        };
    }

    match config.default_access {
        DefaultAccess::Deny => AccessDecision::deny(AccessReason::DefaultDeny),
        DefaultAccess::Allow => AccessDecision::allow(AccessReason::DefaultAllow),
    }
}
