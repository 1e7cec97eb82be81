//! Kernel-side value model, mimicking the layout of Singular's coefficient
//! numbers (`coeffs/longrat.h`), rings and interpreter values (`sleftv`).
//!
//! Coefficients are either immediate words or heap `snumber` records. An
//! immediate word has no meaning without its ring: over the rationals it is
//! `SR_INT`-tagged, over a prime field it is the residue itself.

pub mod ring;
pub mod types;
pub mod value;

pub use ring::{Coeffs, Ring, RingScope, curr_ring, r_change_curr_ring};
pub use types::{CmdType, GType};
pub use value::{
  Attributes, BigIntMat, Ideal, IntVec, Lists, Matrix, Poly, SingValue,
  Sleftv, Term, ValueRef,
};

use num_bigint::{BigInt, Sign};
use num_traits::ToPrimitive;

use crate::gap::int::{biguint_from_limbs, limbs_from_biguint};

/// `mp_limb_t`
pub type MpLimb = usize;

/// `GMP_NUMB_BITS`
pub const GMP_NUMB_BITS: usize = MpLimb::BITS as usize;

/// ```c
/// #define SR_INT 1L
/// ```
pub const SR_INT: isize = 1;

/// Magnitude bits of the kernel's own `SR_INT` immediates. The kernel keeps
/// them 28 bits wide on every platform, so on 64-bit platforms most
/// interpreter immediates are too wide for it.
pub const SR_BITS: u32 = 28;

/// ```c
/// #define INT_TO_SR(INT) ((number) (((long)INT << 2) + SR_INT))
/// ```
#[macro_export]
macro_rules! int_to_sr {
  ($e:expr) => {
    ((($e as isize) << 2) + $crate::singular::SR_INT) as usize
  };
}

/// ```c
/// #define SR_TO_INT(SR) (((long)SR) >> 2)
/// ```
#[macro_export]
macro_rules! sr_to_int {
  ($e:expr) => {
    (($e as isize) >> 2) as i64
  };
}

/// ```c
/// #define SR_HDL(A) ((long)(A))
/// SR_HDL(n) & SR_INT
/// ```
#[inline]
pub fn sr_hdl_is_int(word: usize) -> bool {
  (word as isize) & SR_INT == SR_INT
}

/// `true` when `i` is representable as an `SR_INT` immediate.
#[inline]
pub fn fits_sr_int(i: i64) -> bool {
  let bound = 1i64 << SR_BITS;
  (-bound..bound).contains(&i)
}

/// ```c
/// typedef struct {
///     int        _mp_alloc;
///     int        _mp_size;
///     mp_limb_t *_mp_d;
/// } __mpz_struct;
/// ```
/// `size` carries the sign; `|size|` limbs of `d` are significant.
#[derive(Debug, Clone)]
pub struct Mpz {
  pub(crate) alloc: i32,
  pub(crate) size: i32,
  pub(crate) d: Vec<MpLimb>,
}

impl Mpz {
  /// `mpz_init2(x, bits)`: zero with room for `bits` bits.
  ///
  /// Like GMP, limb counts are `int`s: at most `i32::MAX` limbs.
  pub fn init2(bits: usize) -> Mpz {
    let limbs = bits.div_ceil(GMP_NUMB_BITS).max(1);
    debug_assert!(limbs <= i32::MAX as usize, "mpz of {limbs} limbs");
    Mpz {
      alloc: limbs as i32,
      size: 0,
      d: Vec::with_capacity(limbs),
    }
  }

  /// `mpz_init_set_si(x, i)`
  pub fn init_set_si(i: i64) -> Mpz {
    let d = limbs_from_biguint(&i.unsigned_abs().into());
    let len = d.len() as i32;
    Mpz {
      alloc: len.max(1),
      size: if i < 0 { -len } else { len },
      d,
    }
  }

  /// Signed limb count, `_mp_size`.
  #[inline]
  pub fn size(&self) -> i32 {
    self.size
  }

  /// Allocated limb count, `_mp_alloc`.
  #[inline]
  pub fn alloc(&self) -> i32 {
    self.alloc
  }

  /// Significant magnitude limbs, `_mp_d[0..|_mp_size|]`.
  #[inline]
  pub fn limbs(&self) -> &[MpLimb] {
    &self.d[..self.size.unsigned_abs() as usize]
  }

  pub fn to_bigint(&self) -> BigInt {
    let sign = if self.size < 0 { Sign::Minus } else { Sign::Plus };
    BigInt::from_biguint(sign, biguint_from_limbs(self.limbs()))
  }
}

impl PartialEq for Mpz {
  fn eq(&self, other: &Mpz) -> bool {
    self.size == other.size && self.limbs() == other.limbs()
  }
}

impl Eq for Mpz {}

/// The `s` field of an `snumber`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NumberShape {
  /// `n` present, not known to be in lowest terms.
  Rational = 0,
  /// `n` present and in lowest terms.
  NormalizedRational = 1,
  /// `n` absent.
  Integer = 3,
}

/// ```c
/// struct snumber {
///   mpz_t z;
///   mpz_t n;
///   BOOLEAN s;
/// };
/// ```
/// Integer records never carry a denominator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SNumber {
  z: Mpz,
  n: Option<Mpz>,
  s: NumberShape,
}

impl SNumber {
  pub fn integer(z: Mpz) -> Self {
    SNumber { z, n: None, s: NumberShape::Integer }
  }

  /// A rational record; `z/n` is stored exactly as given.
  pub fn rational(z: Mpz, n: Mpz) -> Self {
    SNumber { z, n: Some(n), s: NumberShape::Rational }
  }

  #[inline]
  pub fn z(&self) -> &Mpz {
    &self.z
  }

  #[inline]
  pub fn n(&self) -> Option<&Mpz> {
    self.n.as_ref()
  }

  #[inline]
  pub fn s(&self) -> NumberShape {
    self.s
  }
}

/// A kernel coefficient: an immediate word or an owned heap record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Number {
  Imm(usize),
  Heap(Box<SNumber>),
}

impl Number {
  #[inline]
  pub fn is_heap(&self) -> bool {
    matches!(self, Self::Heap(_))
  }

  #[inline]
  pub fn as_heap(&self) -> Option<&SNumber> {
    match self {
      Self::Heap(n) => Some(n),
      Self::Imm(_) => None,
    }
  }

  /// Integer value of a rational-domain number whose denominator is absent,
  /// immediate or heap. `None` for rationals and values beyond `i64`.
  pub fn to_i64(&self) -> Option<i64> {
    match self {
      Self::Imm(word) if sr_hdl_is_int(*word) => Some(sr_to_int!(*word)),
      Self::Imm(_) => None,
      Self::Heap(n) if n.n.is_none() => n.z.to_bigint().to_i64(),
      Self::Heap(_) => None,
    }
  }
}

/// ```c
/// number nlRInit(long i);
/// ```
/// Always allocates, whatever the size of `i`.
pub fn nl_r_init(i: i64) -> Number {
  Number::Heap(Box::new(SNumber::integer(Mpz::init_set_si(i))))
}

/// ```c
/// number nlInit(long i, const coeffs r);
/// ```
pub fn nl_init(i: i64) -> Number {
  if fits_sr_int(i) { Number::Imm(int_to_sr!(i)) } else { nl_r_init(i) }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn sr_int_encoding() {
    for i in [0i64, 1, -1, 12345, -(1 << 27), (1 << 27) - 1] {
      let word = int_to_sr!(i);
      assert!(sr_hdl_is_int(word));
      assert_eq!(sr_to_int!(word), i);
    }
  }

  #[test]
  fn sr_range_is_28_bits_everywhere() {
    assert!(fits_sr_int((1 << 28) - 1));
    assert!(fits_sr_int(-(1 << 28)));
    assert!(!fits_sr_int(1 << 28));
    assert!(!fits_sr_int(-(1 << 28) - 1));
    assert!(nl_init(1 << 40).is_heap());
  }

  #[test]
  fn nl_init_allocates_only_outside_sr_range() {
    assert!(!nl_init(42).is_heap());
    let bound = 1i64 << SR_BITS;
    assert!(!nl_init(-bound).is_heap());
    assert!(nl_init(bound).is_heap());
    assert_eq!(nl_init(bound).to_i64(), Some(bound));
    assert!(nl_r_init(42).is_heap());
    assert_eq!(nl_r_init(-42).to_i64(), Some(-42));
  }

  #[test]
  fn mpz_set_si() {
    let z = Mpz::init_set_si(-5);
    assert_eq!(z.size(), -1);
    assert_eq!(z.limbs(), &[5]);
    assert_eq!(Mpz::init_set_si(0).size(), 0);
    assert_eq!(Mpz::init_set_si(i64::MIN).to_bigint(), BigInt::from(i64::MIN));
  }

  #[test]
  fn mpz_init2_reserves_limbs() {
    let z = Mpz::init2(3 * GMP_NUMB_BITS);
    assert_eq!(z.alloc(), 3);
    assert_eq!(z.size(), 0);
    assert!(z.d.capacity() >= 3);
  }
}
