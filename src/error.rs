//! Errors raised while translating values or resolving proxies.
//!
//! Every error is terminal for the current call: the bridge never recovers
//! internally and the message is what the interpreter user sees.

/// Errors of the bridge, one variant per failure class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
  /// Interpreter value of the wrong shape for the requested conversion
  Type(&'static str),
  /// Finite-field element whose characteristic or degree mismatches
  WrongField,
  /// Target coefficient domain has no conversion path
  UnsupportedField,
  /// Malformed or incomplete proxy index path
  Path(&'static str),
  /// Index outside the bounds of a composite kernel object
  Index(&'static str),
  /// Attempt to index a kind without subobjects
  NoSubobjects,
  /// Malformed proxy object
  Proxy(&'static str),
}

impl std::fmt::Display for BridgeError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Type(msg) | Self::Path(msg) | Self::Index(msg) | Self::Proxy(msg) => {
        write!(f, "{msg}")
      },
      Self::WrongField => write!(f, "Argument is in wrong field."),
      Self::UnsupportedField => {
        write!(f, "GAP numbers over this field not yet implemented.")
      },
      Self::NoSubobjects => write!(f, "Singular object has no subobjects"),
    }
  }
}

impl std::error::Error for BridgeError {}

pub type BridgeResult<T> = Result<T, BridgeError>;
