//! Feature string parsing
//!
//! `window.open` takes a loosely specified, comma-separated feature string
//! such as `"width=400,height=300,resizable,nodeIntegration=no"`. This module
//! splits it into tokens and coerces the values into [`FeatureValue`]s,
//! separating capability flags from ordinary window options.
//!
//! Parsing is total: any input produces a result, with values that cannot be
//! coerced kept as text.

mod value;

pub use value::{is_numeric_key, FeatureValue, NUMERIC_KEYS};

use std::collections::BTreeMap;

use crate::options::Capability;

/// A single `key` or `key=value` token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureToken<'a> {
    /// Trimmed key
    pub key: &'a str,
    /// Trimmed value, `None` for a bare key
    pub raw_value: Option<&'a str>,
}

/// Result of parsing a feature string
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedFeatures {
    /// Window options, capability keys excluded
    pub options: BTreeMap<String, FeatureValue>,
    /// Values for keys in the capability flag set
    pub capability_flags: BTreeMap<Capability, FeatureValue>,
    /// Bare keys, in order, when legacy bare-key handling is on
    pub additional_features: Vec<String>,
}

impl ParsedFeatures {
    /// True if the feature string contributed nothing
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.capability_flags.is_empty() && self.additional_features.is_empty()
    }
}

/// Split a feature string into trimmed tokens
///
/// Tokens split on the first `=`, so `"a=b=c"` has the value `"b=c"`.
/// Tokens with an empty key are dropped.
pub fn tokenize(features: &str) -> impl Iterator<Item = FeatureToken<'_>> {
    features.split(',').filter_map(|pair| {
        let (key, raw_value) = match pair.split_once('=') {
            Some((key, value)) => (key.trim(), Some(value.trim())),
            None => (pair.trim(), None),
        };
        (!key.is_empty()).then_some(FeatureToken { key, raw_value })
    })
}

/// Parse a feature string
///
/// With `legacy_bare_keys` set, keys without a value are collected into
/// [`ParsedFeatures::additional_features`] instead of being coerced to
/// `true`.
pub fn parse_features(features: &str, legacy_bare_keys: bool) -> ParsedFeatures {
    let mut parsed = ParsedFeatures::default();

    for token in tokenize(features) {
        if legacy_bare_keys && token.raw_value.is_none() {
            parsed.additional_features.push(token.key.to_string());
            continue;
        }

        let value = FeatureValue::coerce(token.key, token.raw_value);
        match Capability::from_key(token.key) {
            Some(capability) => {
                parsed.capability_flags.insert(capability, value);
            }
            None => {
                parsed.options.insert(token.key.to_string(), value);
            }
        }
    }

    log::trace!(
        "Parsed features {:?}: {} options, {} capability flags, {} additional",
        features,
        parsed.options.len(),
        parsed.capability_flags.len(),
        parsed.additional_features.len()
    );

    parsed
}
