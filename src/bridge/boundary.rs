//! The interpreter-facing edge of a kernel call.
//!
//! Everything below this module reports failures as values. Here they are
//! turned into the interpreter's error-and-quit signal, so no kernel state is
//! left half-built when control returns to the interpreter.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};

use tracing::{error, trace};

use super::binding::Binding;
use crate::config::BridgeConfig;
use crate::error::BridgeResult;
use crate::gap::Obj;
use crate::singular::{RingScope, Sleftv, ValueRef};

/// An error raised back into the interpreter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorQuit(pub String);

impl fmt::Display for ErrorQuit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl std::error::Error for ErrorQuit {}

/// Runs `f`, mapping both its error and any panic to an [`ErrorQuit`].
pub fn guarded<R>(f: impl FnOnce() -> anyhow::Result<R>) -> Result<R, ErrorQuit> {
  match catch_unwind(AssertUnwindSafe(f)) {
    Ok(Ok(r)) => Ok(r),
    Ok(Err(e)) => {
      let msg = format!("{e:#}");
      error!(%msg, "kernel call failed");
      Err(ErrorQuit(msg))
    },
    Err(panic_info) => {
      let msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
        format!("kernel panic: {s}")
      } else if let Some(s) = panic_info.downcast_ref::<String>() {
        format!("kernel panic: {s}")
      } else {
        "kernel panic: unknown".to_string()
      };
      error!(%msg, "kernel call panicked");
      Err(ErrorQuit(msg))
    },
  }
}

/// The bound arguments of one kernel call.
///
/// The ring switches of all arguments belong to the call, not to the
/// individual values: taking an argument leaves the current ring alone. On
/// drop the bindings are released first, then the switches unwind in the
/// reverse of the order they were made, back to the ring that was current
/// before the call.
#[derive(Debug, Default)]
pub struct CallArgs<'a> {
  bindings: Vec<Binding<'a>>,
  scopes: Vec<RingScope>,
}

impl<'a> CallArgs<'a> {
  /// Binds every input in order. On failure the bindings made so far are
  /// released.
  pub fn bind(cfg: &BridgeConfig, inputs: &'a [Obj]) -> BridgeResult<Self> {
    let mut args = CallArgs {
      bindings: Vec::with_capacity(inputs.len()),
      scopes: Vec::new(),
    };
    for input in inputs {
      let mut binding = Binding::from_obj(cfg, input)?;
      args.scopes.extend(binding.detach_scope());
      args.bindings.push(binding);
    }
    trace!(n = args.len(), "bound call arguments");
    Ok(args)
  }

  #[inline]
  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }

  #[inline]
  pub fn get(&self, i: usize) -> Option<&Binding<'a>> {
    self.bindings.get(i)
  }

  /// Non-destructive view of argument `i`.
  pub fn value(&self, i: usize) -> Option<ValueRef<'_>> {
    self.bindings.get(i).and_then(Binding::value)
  }

  /// Hands argument `i` to the caller, leaving an empty binding behind. The
  /// current ring stays as it is until the call is over.
  pub fn take(&mut self, i: usize) -> Option<Sleftv> {
    let slot = self.bindings.get_mut(i)?;
    let taken = std::mem::take(slot).take_for_destructive_use()?;
    debug_assert!(taken.scope.is_none());
    Some(taken.leftv)
  }
}

impl Drop for CallArgs<'_> {
  fn drop(&mut self) {
    while let Some(binding) = self.bindings.pop() {
      binding.release();
    }
    while let Some(scope) = self.scopes.pop() {
      drop(scope);
    }
  }
}

/// Binds `inputs`, runs `f` on them and releases them again, reporting any
/// failure as an [`ErrorQuit`].
pub fn call_singular<R>(
  cfg: &BridgeConfig,
  inputs: &[Obj],
  f: impl FnOnce(&mut CallArgs<'_>) -> anyhow::Result<R>,
) -> Result<R, ErrorQuit> {
  guarded(|| {
    let mut args = CallArgs::bind(cfg, inputs)?;
    f(&mut args)
  })
}
