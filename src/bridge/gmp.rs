//! Limb-level transcoding of big integers.
//!
//! Both sides keep big integers as GMP limb arrays, least significant limb
//! first; the interpreter uses the low-level `mpn` layout with the sign in the
//! type tag, the kernel the `mpz` layout with the sign in `_mp_size`. The copy
//! is bitwise and sized in limbs; no normalization happens here.

use tracing::trace;

use crate::gap::int::{ainv_int, obj_int_uint};
use crate::gap::{self, Obj};
use crate::singular::{GMP_NUMB_BITS, MpLimb, Mpz};

const _: () = assert!(size_of::<gap::Limb>() == size_of::<MpLimb>());

/// Copies an interpreter magnitude into a fresh `mpz`. The magnitude must
/// fit the `int` limb count of an `mpz`, as for [`Mpz::init2`].
///
/// ```c
/// mpz_init2(out, size*GMP_NUMB_BITS);
/// memcpy(out->_mp_d, ADDR_INT(in), sizeof(mp_limb_t)*size);
/// out->_mp_size = (TNUM_OBJ(in) == T_INTPOS) ? (Int)size : - (Int)size;
/// ```
pub fn mpz_from_limbs(limbs: &[gap::Limb], negative: bool) -> Mpz {
  let size = limbs.len();
  let mut out = Mpz::init2(size * GMP_NUMB_BITS);
  out.d.extend_from_slice(limbs);
  debug_assert!(size <= i32::MAX as usize, "mpz of {size} limbs");
  let size = size as i32;
  out.size = if negative { -size } else { size };
  out
}

/// Copies an interpreter big integer (`T_INTPOS`/`T_INTNEG`) into a fresh
/// `mpz`. `None` for anything else, immediates included.
pub fn mpz_from_gap(obj: &Obj) -> Option<Mpz> {
  match obj {
    Obj::IntPos(limbs) => Some(mpz_from_limbs(limbs, false)),
    Obj::IntNeg(limbs) => Some(mpz_from_limbs(limbs, true)),
    _ => None,
  }
}

/// Copies an `mpz` back into a new interpreter integer.
///
/// Single-limb values on 64-bit platforms go through `ObjInt_UInt` so the
/// result is an immediate whenever it fits; longer magnitudes are copied
/// into a new bag as they are.
pub fn gap_from_mpz(z: &Mpz) -> Obj {
  let negative = z.size() < 0;
  let limbs = z.limbs();
  match limbs {
    [] => Obj::Int(0),
    [limb] if cfg!(target_pointer_width = "64") => {
      let pos = obj_int_uint(*limb);
      if negative { ainv_int(&pos).unwrap_or(Obj::Fail) } else { pos }
    },
    _ => {
      trace!(limbs = limbs.len(), "copying limbs into a new interpreter bag");
      if negative {
        normalized(Obj::IntNeg(limbs.to_vec()))
      } else {
        normalized(Obj::IntPos(limbs.to_vec()))
      }
    },
  }
}

/// Multi-limb magnitudes are never immediates on 64-bit platforms; on
/// narrower ones a short magnitude may still fit.
fn normalized(obj: Obj) -> Obj {
  if cfg!(target_pointer_width = "64") || obj.size_int() > 2 {
    return obj;
  }
  gap::int::to_bigint(&obj).map_or(obj, |n| gap::int::obj_from_bigint(&n))
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::gap::int::{obj_from_bigint, to_bigint};
  use num_bigint::BigInt;

  #[test]
  fn limbs_and_sign_are_copied_verbatim() {
    let limbs = vec![1, 2, 3];
    let z = mpz_from_limbs(&limbs, true);
    assert_eq!(z.size(), -3);
    assert_eq!(z.limbs(), &limbs[..]);
    assert_eq!(z.alloc(), 3);
  }

  #[test]
  fn no_normalization_on_the_way_in() {
    // A leading zero limb is not stripped.
    let z = mpz_from_limbs(&[5, 0], false);
    assert_eq!(z.size(), 2);
  }

  #[test]
  fn immediates_are_not_big_integers() {
    assert_eq!(mpz_from_gap(&Obj::Int(3)), None);
    assert_eq!(mpz_from_gap(&Obj::string("3")), None);
  }

  #[test]
  fn big_integers_survive_both_directions() {
    for n in [
      BigInt::from(1) << 200usize,
      -(BigInt::from(3) << 100usize),
      BigInt::from(u64::MAX),
      -BigInt::from(u64::MAX),
    ] {
      let obj = obj_from_bigint(&n);
      let z = mpz_from_gap(&obj).unwrap();
      assert_eq!(z.to_bigint(), n);
      let back = gap_from_mpz(&z);
      assert_eq!(back, obj);
      assert_eq!(to_bigint(&back), Some(n));
    }
  }

  #[test]
  fn single_limb_values_come_back_immediate() {
    assert_eq!(gap_from_mpz(&Mpz::init_set_si(7)), Obj::Int(7));
    assert_eq!(gap_from_mpz(&Mpz::init_set_si(-7)), Obj::Int(-7));
    assert_eq!(gap_from_mpz(&Mpz::init_set_si(0)), Obj::Int(0));
  }
}
