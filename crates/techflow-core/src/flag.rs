//! Feature flags.
//!
//! Flags arrive from configuration as booleans or strings. Only the string
//! `true` (case-insensitive) enables a flag; any other value disables it.

use std::sync::{
  Arc,
  atomic::{AtomicBool, Ordering},
};

use serde::{Deserialize, Deserializer};

/// Interpret a raw flag value.
pub fn parse_flag(raw: &str) -> bool { raw.trim().eq_ignore_ascii_case("true") }

/// `serde` adapter accepting either a boolean or a string flag value.
pub fn deserialize_flag<'de, D>(de: D) -> Result<bool, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Raw {
    Bool(bool),
    Text(String),
  }

  Ok(match Raw::deserialize(de)? {
    Raw::Bool(b) => b,
    Raw::Text(s) => parse_flag(&s),
  })
}

/// A flag that can be toggled while the process runs.
///
/// Cloning shares the underlying value. Readers should load it once per
/// request so the mode cannot change partway through.
#[derive(Debug, Clone, Default)]
pub struct LiveFlag(Arc<AtomicBool>);

impl LiveFlag {
  pub fn new(enabled: bool) -> Self { Self(Arc::new(AtomicBool::new(enabled))) }

  pub fn get(&self) -> bool { self.0.load(Ordering::Acquire) }

  pub fn set(&self, enabled: bool) { self.0.store(enabled, Ordering::Release); }
}

#[cfg(test)]
mod tests {
  use serde::Deserialize;

  use super::*;

  #[test]
  fn only_true_enables() {
    assert!(parse_flag("true"));
    assert!(parse_flag(" TRUE "));
    assert!(!parse_flag("false"));
    assert!(!parse_flag("yes"));
    assert!(!parse_flag("1"));
    assert!(!parse_flag(""));
  }

  #[derive(Deserialize)]
  struct Flags {
    #[serde(deserialize_with = "deserialize_flag")]
    on: bool,
  }

  #[test]
  fn deserialises_bools_and_strings() {
    let f: Flags = serde_json::from_str(r#"{"on": true}"#).unwrap();
    assert!(f.on);
    let f: Flags = serde_json::from_str(r#"{"on": "True"}"#).unwrap();
    assert!(f.on);
    let f: Flags = serde_json::from_str(r#"{"on": "enabled"}"#).unwrap();
    assert!(!f.on);
  }

  #[test]
  fn clones_share_state() {
    let a = LiveFlag::new(false);
    let b = a.clone();
    b.set(true);
    assert!(a.get());
  }
}
