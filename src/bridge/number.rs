//! Conversion of interpreter numbers into kernel coefficients and of kernel
//! integers back into interpreter integers.

use tracing::{debug, trace};

use super::fits_kernel_int;
use super::gmp::{gap_from_mpz, mpz_from_gap, mpz_from_limbs};
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::gap::int::modulo;
use crate::gap::{Limb, Obj, Tnum};
use crate::singular::{
  Coeffs, GType, Mpz, Number, Ring, SNumber, SingValue, nl_init, nl_r_init,
  sr_hdl_is_int,
};
use crate::sr_to_int;

const NOT_INT_OR_RAT: &str = "Argument must be an integer or rational.";
const NOT_ZP_ELEMENT: &str =
  "Argument must be an integer, rational or finite prime field element.";
const NOT_INT: &str = "Argument must be an integer.";

/// Converts an interpreter number into a coefficient of `r`.
///
/// Small immediates are converted first, whatever the domain. Over a prime
/// field, big integers and rationals are reduced with the interpreter's own
/// `MOD`; over the rationals they are copied limb by limb and rationals are
/// taken as already reduced.
pub fn number_from_gap(
  cfg: &BridgeConfig,
  r: &Ring,
  n: &Obj,
) -> BridgeResult<Number> {
  if let Coeffs::Unsupported(name) = r.cf() {
    debug!(domain = name, "no conversion into this coefficient domain");
    return Err(BridgeError::UnsupportedField);
  }

  if cfg.immediate_fast_path
    && let Some(i) = n.int_intobj()
    && fits_kernel_int(i)
  {
    trace!(i, "immediate fast path");
    return r.n_init(i).ok_or(BridgeError::UnsupportedField);
  }

  if r.field_is_zp() {
    zp_number_from_gap(r, r.r_char(), n)
  } else {
    q_number_from_gap(n)
  }
}

fn zp_number_from_gap(r: &Ring, p: u32, n: &Obj) -> BridgeResult<Number> {
  let p = i64::from(p);
  let residue = match n {
    Obj::Int(i) => Some(i % p),
    Obj::Ffe(ffe) => {
      if i64::from(ffe.char_ff()) != p || ffe.degr_ff() != 1 {
        return Err(BridgeError::WrongField);
      }
      Some(i64::from(ffe.val_ffe()))
    },
    Obj::IntPos(_) | Obj::IntNeg(_) | Obj::Rat(..) => {
      modulo(n, &Obj::Int(p)).int_intobj().map(|i| i % p)
    },
    _ => None,
  };
  residue
    .and_then(|i| r.n_init(i))
    .ok_or(BridgeError::Type(NOT_ZP_ELEMENT))
}

fn q_number_from_gap(n: &Obj) -> BridgeResult<Number> {
  if let Some(i) = n.int_intobj() {
    return Ok(nl_init(i));
  }
  if n.is_int() {
    return Ok(heap_integer(n.addr_int(), n.tnum() == Tnum::IntNeg));
  }
  if let (Some(num), Some(den)) = (n.num_rat(), n.den_rat()) {
    let z = mpz_from_int(num).ok_or(BridgeError::Type(NOT_INT_OR_RAT))?;
    let d = mpz_from_int(den).ok_or(BridgeError::Type(NOT_INT_OR_RAT))?;
    debug!(num_limbs = z.limbs().len(), den_limbs = d.limbs().len(), "heap rational");
    return Ok(Number::Heap(Box::new(SNumber::rational(z, d))));
  }
  Err(BridgeError::Type(NOT_INT_OR_RAT))
}

/// A heap integer record for the big integer with magnitude `limbs`.
fn heap_integer(limbs: &[Limb], negative: bool) -> Number {
  let z = mpz_from_limbs(limbs, negative);
  debug!(limbs = z.limbs().len(), "heap integer");
  Number::Heap(Box::new(SNumber::integer(z)))
}

/// Numerator or denominator of an interpreter rational as an `mpz`.
fn mpz_from_int(n: &Obj) -> Option<Mpz> {
  match n {
    Obj::Int(i) => Some(Mpz::init_set_si(*i)),
    _ => mpz_from_gap(n),
  }
}

/// Converts an interpreter integer into a kernel `bigint`: an `SR_INT`
/// immediate when it fits one, a heap integer otherwise.
pub fn bigint_from_gap(n: &Obj) -> BridgeResult<Number> {
  match n {
    Obj::Int(i) => Ok(nl_init(*i)),
    Obj::IntPos(limbs) => Ok(heap_integer(limbs, false)),
    Obj::IntNeg(limbs) => Ok(heap_integer(limbs, true)),
    _ => Err(BridgeError::Type(NOT_INT)),
  }
}

/// Converts an interpreter integer into a kernel machine `int` if it fits,
/// else into a heap `bigint`, and reports which one it became.
///
/// Only [`GType::IntImm`] results are free of heap storage.
pub fn bigint_or_int_from_gap(n: &Obj) -> BridgeResult<(SingValue, GType)> {
  match n {
    Obj::Int(i) if fits_kernel_int(*i) => Ok((SingValue::Int(*i), GType::IntImm)),
    Obj::Int(i) => Ok((SingValue::BigInt(nl_r_init(*i)), GType::BigIntImm)),
    Obj::IntPos(_) | Obj::IntNeg(_) => {
      Ok((SingValue::BigInt(bigint_from_gap(n)?), GType::BigIntImm))
    },
    _ => Err(BridgeError::Type(NOT_INT)),
  }
}

/// Converts a kernel integer (immediate or heap, never a rational) into an
/// interpreter integer. Cannot fail.
pub fn bigint_or_int_to_gap(n: &Number) -> Obj {
  match n {
    Number::Imm(word) => {
      debug_assert!(sr_hdl_is_int(*word), "immediate without SR_INT tag");
      crate::gap::int::obj_int_int(sr_to_int!(*word))
    },
    Number::Heap(heap) => {
      debug_assert!(heap.n().is_none(), "rational passed as an integer");
      gap_from_mpz(heap.z())
    },
  }
}
