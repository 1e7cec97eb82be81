//! Interpreter integer and rational helpers.
//!
//! These stand in for the parts of GAP's `integer.c` and `rational.c` the
//! bridge relies on: normalizing constructors, negation and `MOD`. All of them
//! return normalized objects, i.e. values in the immediate range are always
//! [`Obj::Int`] and big integers never carry a leading zero limb.

use num_bigint::{BigInt, BigUint, Sign};
use num_integer::Integer;
use num_traits::{One, ToPrimitive, Zero};

use super::{Limb, Obj, fits_intobj};

/// Reads limbs (least significant first) into a `BigUint`.
pub fn biguint_from_limbs(limbs: &[Limb]) -> BigUint {
  let bytes: Vec<u8> =
    limbs.iter().flat_map(|&limb| limb.to_le_bytes()).collect();
  BigUint::from_bytes_le(&bytes)
}

/// Splits a `BigUint` into limbs, least significant first, without a
/// leading zero limb.
pub fn limbs_from_biguint(n: &BigUint) -> Vec<Limb> {
  if n.is_zero() {
    return Vec::new();
  }
  let bytes = n.to_bytes_le();
  let mut limbs: Vec<Limb> =
    Vec::with_capacity(bytes.len().div_ceil(size_of::<Limb>()));
  for chunk in bytes.chunks(size_of::<Limb>()) {
    let mut arr = [0u8; size_of::<Limb>()];
    arr[..chunk.len()].copy_from_slice(chunk);
    limbs.push(Limb::from_le_bytes(arr));
  }
  limbs
}

/// ```c
/// Obj ObjInt_Int(Int i);
/// ```
pub fn obj_int_int(i: i64) -> Obj {
  if fits_intobj(i) {
    Obj::Int(i)
  } else {
    obj_from_bigint(&BigInt::from(i))
  }
}

/// ```c
/// Obj ObjInt_UInt(UInt i);
/// ```
pub fn obj_int_uint(u: Limb) -> Obj {
  match i64::try_from(u) {
    Ok(i) if fits_intobj(i) => Obj::Int(i),
    _ => Obj::IntPos(vec![u]),
  }
}

/// ```c
/// Obj AInvInt(Obj op);
/// ```
/// Returns `None` for non-integers.
pub fn ainv_int(op: &Obj) -> Option<Obj> {
  match op {
    Obj::Int(i) => Some(obj_int_int(-i)),
    Obj::IntPos(limbs) => Some(normalize(true, limbs.clone())),
    Obj::IntNeg(limbs) => Some(normalize(false, limbs.clone())),
    _ => None,
  }
}

/// Value of an immediate or big integer.
pub fn to_bigint(op: &Obj) -> Option<BigInt> {
  match op {
    Obj::Int(i) => Some(BigInt::from(*i)),
    Obj::IntPos(limbs) => {
      Some(BigInt::from_biguint(Sign::Plus, biguint_from_limbs(limbs)))
    },
    Obj::IntNeg(limbs) => {
      Some(BigInt::from_biguint(Sign::Minus, biguint_from_limbs(limbs)))
    },
    _ => None,
  }
}

/// Builds the normalized interpreter integer for `n`.
pub fn obj_from_bigint(n: &BigInt) -> Obj {
  if let Some(i) = n.to_i64()
    && fits_intobj(i)
  {
    return Obj::Int(i);
  }
  let limbs = limbs_from_biguint(n.magnitude());
  match n.sign() {
    Sign::Minus => Obj::IntNeg(limbs),
    _ => Obj::IntPos(limbs),
  }
}

/// Builds the interpreter rational `num/den` in lowest terms, collapsing to
/// an integer when the denominator becomes 1. Returns `None` for `den == 0`.
pub fn rat(num: &BigInt, den: &BigInt) -> Option<Obj> {
  if den.is_zero() {
    return None;
  }
  let g = num.gcd(den);
  let (mut num, mut den) = (num / &g, den / &g);
  if den.sign() == Sign::Minus {
    num = -num;
    den = -den;
  }
  if den.is_one() {
    return Some(obj_from_bigint(&num));
  }
  Some(Obj::Rat(
    Box::new(obj_from_bigint(&num)),
    Box::new(obj_from_bigint(&den)),
  ))
}

/// ```c
/// Obj MOD(Obj opL, Obj opR);
/// ```
/// Integer or rational `op` modulo a nonzero integer `m`, result in
/// `0..|m|`. A rational whose denominator is not invertible modulo `m` gives
/// [`Obj::Fail`], as does any operand the interpreter cannot reduce.
pub fn modulo(op: &Obj, m: &Obj) -> Obj {
  let Some(m) = to_bigint(m).filter(|m| !m.is_zero()) else {
    return Obj::Fail;
  };
  let m = BigInt::from_biguint(Sign::Plus, m.magnitude().clone());
  let reduced = match op {
    Obj::Rat(num, den) => {
      let (Some(num), Some(den)) = (to_bigint(num), to_bigint(den)) else {
        return Obj::Fail;
      };
      match den.mod_floor(&m).modinv(&m) {
        Some(inv) => (num * inv).mod_floor(&m),
        None => return Obj::Fail,
      }
    },
    _ => match to_bigint(op) {
      Some(n) => n.mod_floor(&m),
      None => return Obj::Fail,
    },
  };
  obj_from_bigint(&reduced)
}

fn normalize(negative: bool, limbs: Vec<Limb>) -> Obj {
  let sign = if negative { Sign::Minus } else { Sign::Plus };
  obj_from_bigint(&BigInt::from_biguint(sign, biguint_from_limbs(&limbs)))
}
