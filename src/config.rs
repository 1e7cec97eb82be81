//! Runtime knobs of the bridge.
//!
//! Platform limits (immediate ranges, limb width) are compile-time constants
//! and live next to the code that uses them.

use std::env;
use std::str::FromStr;

use tracing::warn;

/// Enables or disables the immediate-integer fast path.
pub const FAST_PATH_ENV: &str = "SING_RS_FAST_PATH";
/// Overrides [`BridgeConfig::max_proxy_depth`].
pub const MAX_PROXY_DEPTH_ENV: &str = "SING_RS_MAX_PROXY_DEPTH";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
  /// Convert small interpreter integers straight to kernel immediates before
  /// looking at the coefficient domain. Results are identical either way.
  pub immediate_fast_path: bool,
  /// Longest proxy index path accepted.
  pub max_proxy_depth: usize,
}

impl Default for BridgeConfig {
  fn default() -> Self {
    BridgeConfig { immediate_fast_path: true, max_proxy_depth: 1024 }
  }
}

impl BridgeConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Defaults overridden by the environment. Unparsable values are ignored.
  pub fn from_env() -> Self {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let mut cfg = Self::default();
    if let Some(v) = parse_var(&lookup, FAST_PATH_ENV) {
      cfg.immediate_fast_path = v;
    }
    if let Some(v) = parse_var(&lookup, MAX_PROXY_DEPTH_ENV) {
      cfg.max_proxy_depth = v;
    }
    cfg
  }
}

fn parse_var<T: FromStr>(
  lookup: &impl Fn(&str) -> Option<String>,
  key: &str,
) -> Option<T> {
  let raw = lookup(key)?;
  match raw.trim().parse() {
    Ok(v) => Some(v),
    Err(_) => {
      warn!(key, value = %raw, "ignoring unparsable configuration value");
      None
    },
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn defaults_without_environment() {
    assert_eq!(BridgeConfig::from_lookup(|_| None), BridgeConfig::default());
  }

  #[test]
  fn overrides_and_bad_values() {
    let cfg = BridgeConfig::from_lookup(|key| match key {
      FAST_PATH_ENV => Some("false".into()),
      MAX_PROXY_DEPTH_ENV => Some(" 8 ".into()),
      _ => None,
    });
    assert!(!cfg.immediate_fast_path);
    assert_eq!(cfg.max_proxy_depth, 8);

    let cfg = BridgeConfig::from_lookup(|key| match key {
      MAX_PROXY_DEPTH_ENV => Some("deep".into()),
      _ => None,
    });
    assert_eq!(cfg.max_proxy_depth, BridgeConfig::default().max_proxy_depth);
  }
}
