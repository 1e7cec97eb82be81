//! Rings, their coefficient domains and the kernel's ambient current ring.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use super::{Number, nl_init};

/// The coefficient domain of a ring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coeffs {
  /// The rationals.
  Q,
  /// The prime field of the given characteristic.
  Zp(u32),
  /// Any other domain the kernel knows and the bridge cannot target.
  Unsupported(&'static str),
}

/// A polynomial ring, reduced to what the bridge needs: its coefficients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
  cf: Coeffs,
  vars: Vec<String>,
}

impl Ring {
  pub fn new(cf: Coeffs, vars: &[&str]) -> Rc<Ring> {
    if let Coeffs::Zp(p) = cf {
      assert!(p >= 2, "characteristic must be a prime, got {p}");
    }
    Rc::new(Ring { cf, vars: vars.iter().map(|v| v.to_string()).collect() })
  }

  #[inline]
  pub fn cf(&self) -> &Coeffs {
    &self.cf
  }

  #[inline]
  pub fn vars(&self) -> &[String] {
    &self.vars
  }

  /// `rField_is_Zp(r)`
  #[inline]
  pub fn field_is_zp(&self) -> bool {
    matches!(self.cf, Coeffs::Zp(_))
  }

  /// `rChar(r)`: zero for the rationals and unsupported domains.
  #[inline]
  pub fn r_char(&self) -> u32 {
    match self.cf {
      Coeffs::Zp(p) => p,
      _ => 0,
    }
  }

  /// ```c
  /// number n_Init(long i, const coeffs r);
  /// ```
  /// `None` when the domain has no constructor the bridge can call.
  pub fn n_init(&self, i: i64) -> Option<Number> {
    match self.cf {
      Coeffs::Q => Some(nl_init(i)),
      Coeffs::Zp(p) => Some(Number::Imm(i.rem_euclid(i64::from(p)) as usize)),
      Coeffs::Unsupported(_) => None,
    }
  }

  /// ```c
  /// long n_Int(number &n, const coeffs r);
  /// ```
  /// Integer value of `n` read in this ring; `None` when it has none that
  /// fits a machine word.
  pub fn n_int(&self, n: &Number) -> Option<i64> {
    match (&self.cf, n) {
      (Coeffs::Q, n) => n.to_i64(),
      (Coeffs::Zp(_), Number::Imm(word)) => i64::try_from(*word).ok(),
      _ => None,
    }
  }

}

thread_local! {
  static CURR_RING: RefCell<Option<Rc<Ring>>> = const { RefCell::new(None) };
}

/// `currRing`
pub fn curr_ring() -> Option<Rc<Ring>> {
  CURR_RING.with(|r| r.borrow().clone())
}

/// ```c
/// void rChangeCurrRing(ring r);
/// ```
pub fn r_change_curr_ring(r: &Rc<Ring>) {
  CURR_RING.with(|curr| *curr.borrow_mut() = Some(Rc::clone(r)));
}

fn is_curr_ring(r: &Rc<Ring>) -> bool {
  CURR_RING.with(|curr| curr.borrow().as_ref().is_some_and(|c| Rc::ptr_eq(c, r)))
}

/// Makes a ring current for as long as the scope lives, restoring the
/// previous ambient ring on drop. Scopes must be dropped in reverse order of
/// creation.
#[must_use]
#[derive(Debug)]
pub struct RingScope {
  prev: Option<Option<Rc<Ring>>>,
}

impl RingScope {
  pub fn enter(r: &Rc<Ring>) -> RingScope {
    if is_curr_ring(r) {
      return RingScope { prev: None };
    }
    debug!(cf = ?r.cf(), "switching current ring");
    let prev = curr_ring();
    r_change_curr_ring(r);
    RingScope { prev: Some(prev) }
  }
}

impl Drop for RingScope {
  fn drop(&mut self) {
    if let Some(prev) = self.prev.take() {
      CURR_RING.with(|curr| *curr.borrow_mut() = prev);
    }
  }
}
