//! Interpreter-side object model, mimicking the accessors of GAP's kernel
//! (`objects.h`, `integer.h`, `rational.h`, `finfield.h`, `plist.h`).
//!
//! The bridge never mutates interpreter objects; it only reads them through
//! the accessors below and allocates fresh integers through the normalizing
//! constructors in [`int`]. Keep the immediate-integer ranges in sync with
//! `INTOBJ_INT` on the supported word sizes.

pub mod int;

use std::rc::Rc;

use crate::singular::{Attributes, GType, Ring, SingValue};

/// One big-integer limb, `mp_limb_t` in GAP's `integer.c`.
pub type Limb = usize;

/// Magnitude bits of a `T_INT` immediate on this word size.
pub const INTOBJ_BITS: u32 = if cfg!(target_pointer_width = "64") { 60 } else { 28 };

/// Smallest value representable as a `T_INT` immediate.
pub const INTOBJ_MIN: i64 = -(1 << INTOBJ_BITS);

/// Largest value representable as a `T_INT` immediate.
pub const INTOBJ_MAX: i64 = (1 << INTOBJ_BITS) - 1;

/// ```c
/// #define IS_INTOBJ(o) ((Int)(o) & 0x01)
/// ```
/// `true` when `i` can be stored as an immediate without a bag.
#[inline]
pub fn fits_intobj(i: i64) -> bool {
  (INTOBJ_MIN..=INTOBJ_MAX).contains(&i)
}

/// Type numbers of the interpreter objects the bridge distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tnum {
  Int,
  IntPos,
  IntNeg,
  Rat,
  Ffe,
  String,
  Singular,
  PosObj,
  Plist,
  Fail,
}

/// An element of a finite field `GF(char^degree)`.
///
/// `value` is the element's integer representative; only prime fields
/// (`degree == 1`) are ever converted by the bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ffe {
  value: u32,
  char: u32,
  degree: u32,
}

impl Ffe {
  pub fn new(value: u32, char: u32, degree: u32) -> Self {
    Ffe { value, char, degree }
  }

  /// ```c
  /// #define VAL_FFE(ffe) ...
  /// ```
  #[inline]
  pub fn val_ffe(&self) -> u32 {
    self.value
  }

  /// `CHAR_FF(FLD_FFE(ffe))`
  #[inline]
  pub fn char_ff(&self) -> u32 {
    self.char
  }

  /// `DEGR_FF(FLD_FFE(ffe))`
  #[inline]
  pub fn degr_ff(&self) -> u32 {
    self.degree
  }
}

/// A `T_SINGULAR` bag: an interpreter object wrapping a kernel object.
///
/// The bag owns the kernel value; anything handed to the kernel from here is
/// borrowed unless explicitly copied.
#[derive(Debug, Clone, PartialEq)]
pub struct SingObj {
  value: SingValue,
  immutable: bool,
  ring: Option<Rc<Ring>>,
  flags: u32,
  attributes: Attributes,
}

impl SingObj {
  pub fn new(value: SingValue, ring: Option<Rc<Ring>>) -> Self {
    SingObj {
      value,
      immutable: false,
      ring,
      flags: 0,
      attributes: Attributes::default(),
    }
  }

  pub fn immutable(mut self) -> Self {
    self.immutable = true;
    self
  }

  pub fn with_flags(mut self, flags: u32) -> Self {
    self.flags = flags;
    self
  }

  pub fn with_attribute(mut self, name: &str, value: SingValue) -> Self {
    self.attributes.insert(name, value);
    self
  }

  /// `TYPE_SINGOBJ(obj)`
  pub fn type_singobj(&self) -> GType {
    let gtype = GType::from_cmd(self.value.cmd_type());
    if self.immutable { gtype.to_imm() } else { gtype }
  }

  /// `CXX_SINGOBJ(obj)`
  #[inline]
  pub fn cxx_singobj(&self) -> &SingValue {
    &self.value
  }

  /// `CXXRING_SINGOBJ(obj)`; `None` for kinds without a ring.
  #[inline]
  pub fn ring_singobj(&self) -> Option<&Rc<Ring>> {
    self.ring.as_ref()
  }

  /// `FLAGS_SINGOBJ(obj)`
  #[inline]
  pub fn flags_singobj(&self) -> u32 {
    self.flags
  }

  /// `ATTRIB_SINGOBJ(obj)`
  #[inline]
  pub fn attrib_singobj(&self) -> &Attributes {
    &self.attributes
  }
}

/// An interpreter object as seen through GAP's object accessors.
#[derive(Debug, Clone, PartialEq)]
pub enum Obj {
  /// Immediate integer, always within [`INTOBJ_MIN`]`..=`[`INTOBJ_MAX`].
  Int(i64),
  /// Positive big integer; magnitude limbs, least significant first.
  IntPos(Vec<Limb>),
  /// Negative big integer; magnitude limbs, least significant first.
  IntNeg(Vec<Limb>),
  /// Reduced rational with positive denominator other than 1.
  Rat(Box<Obj>, Box<Obj>),
  Ffe(Ffe),
  String(Vec<u8>),
  Singular(Rc<SingObj>),
  /// Positional proxy object: element 1 is the anchor bag, elements 2.. the
  /// index path (or a variable name).
  Proxy(Vec<Obj>),
  Plist(Vec<Obj>),
  Fail,
}

impl Obj {
  /// Wraps a kernel object into a fresh `T_SINGULAR` bag.
  pub fn singular(obj: SingObj) -> Self {
    Obj::Singular(Rc::new(obj))
  }

  pub fn string(s: &str) -> Self {
    Obj::String(s.as_bytes().to_vec())
  }

  /// ```c
  /// #define TNUM_OBJ(obj) ...
  /// ```
  pub fn tnum(&self) -> Tnum {
    match self {
      Self::Int(_) => Tnum::Int,
      Self::IntPos(_) => Tnum::IntPos,
      Self::IntNeg(_) => Tnum::IntNeg,
      Self::Rat(..) => Tnum::Rat,
      Self::Ffe(_) => Tnum::Ffe,
      Self::String(_) => Tnum::String,
      Self::Singular(_) => Tnum::Singular,
      Self::Proxy(_) => Tnum::PosObj,
      Self::Plist(_) => Tnum::Plist,
      Self::Fail => Tnum::Fail,
    }
  }

  /// ```c
  /// #define INT_INTOBJ(o) ((Int)(o) >> 2)
  /// ```
  #[inline]
  pub fn int_intobj(&self) -> Option<i64> {
    match self {
      Self::Int(i) => Some(*i),
      _ => None,
    }
  }

  /// `true` for immediate and big integers alike.
  #[inline]
  pub fn is_int(&self) -> bool {
    matches!(self, Self::Int(_) | Self::IntPos(_) | Self::IntNeg(_))
  }

  /// ```c
  /// #define SIZE_INT(op) (SIZE_OBJ(op) / sizeof(mp_limb_t))
  /// ```
  /// Zero for anything that is not a big integer.
  #[inline]
  pub fn size_int(&self) -> usize {
    self.addr_int().len()
  }

  /// ```c
  /// #define ADDR_INT(op) ((mp_limb_t *)ADDR_OBJ(op))
  /// ```
  #[inline]
  pub fn addr_int(&self) -> &[Limb] {
    match self {
      Self::IntPos(limbs) | Self::IntNeg(limbs) => limbs,
      _ => &[],
    }
  }

  /// `NUM_RAT(rat)`
  #[inline]
  pub fn num_rat(&self) -> Option<&Obj> {
    match self {
      Self::Rat(num, _) => Some(num),
      _ => None,
    }
  }

  /// `DEN_RAT(rat)`
  #[inline]
  pub fn den_rat(&self) -> Option<&Obj> {
    match self {
      Self::Rat(_, den) => Some(den),
      _ => None,
    }
  }

  /// `CHARS_STRING(str)` limited to `GET_LEN_STRING(str)` bytes.
  #[inline]
  pub fn chars_string(&self) -> Option<&[u8]> {
    match self {
      Self::String(bytes) => Some(bytes),
      _ => None,
    }
  }

  /// Number of elements of a plain list or positional object.
  #[inline]
  pub fn len_plist(&self) -> usize {
    match self {
      Self::Proxy(elms) | Self::Plist(elms) => elms.len(),
      _ => 0,
    }
  }

  /// ```c
  /// #define ELM_PLIST(list,pos) (ADDR_OBJ(list)[pos])
  /// ```
  /// 1-based, like the interpreter.
  #[inline]
  pub fn elm_plist(&self, pos: usize) -> Option<&Obj> {
    match self {
      Self::Proxy(elms) | Self::Plist(elms) => {
        pos.checked_sub(1).and_then(|i| elms.get(i))
      },
      _ => None,
    }
  }
}
