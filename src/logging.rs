use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Installs a `fmt` subscriber filtered by `RUST_LOG` (default `warn`).
/// Returns `false` if a global subscriber was already set.
pub fn init_tracing() -> bool {
  let filter =
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::registry()
    .with(fmt::layer())
    .with(filter)
    .try_init()
    .is_ok()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn init_is_idempotent() {
    init_tracing();
    assert!(!init_tracing());
  }
}
