//! Kernel values: scalars and the composite kinds proxies can index into.
//!
//! `Clone` is the kernel's deep copy (`sleftv::Copy`) and `Drop` its
//! destructor (`sleftv::CleanUp`).

use std::rc::Rc;

use indexmap::IndexMap;

use super::{CmdType, GType, Number, Ring};

/// One term of a polynomial: coefficient and exponent vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Term {
  pub coef: Number,
  pub exp: Vec<u32>,
}

/// A polynomial; the zero polynomial has no terms (a `NULL` `poly`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Poly {
  terms: Vec<Term>,
}

impl Poly {
  pub fn zero() -> Self {
    Poly::default()
  }

  pub fn constant(coef: Number, nvars: usize) -> Self {
    Poly { terms: vec![Term { coef, exp: vec![0; nvars] }] }
  }

  #[inline]
  pub fn terms(&self) -> &[Term] {
    &self.terms
  }

}

/// ```c
/// struct sip_sideal { poly* m; long rank; int nrows; int ncols; };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ideal {
  pub m: Vec<Poly>,
  pub rank: i64,
}

impl Ideal {
  pub fn new(m: Vec<Poly>) -> Self {
    Ideal { m, rank: 1 }
  }

  /// `IDELEMS(id)`
  #[inline]
  pub fn idelems(&self) -> i64 {
    self.m.len() as i64
  }
}

/// A polynomial matrix, stored row-major like `sip_sideal` viewed as `matrix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
  nrows: i32,
  ncols: i32,
  m: Vec<Poly>,
}

impl Matrix {
  /// `mpNew(r, c)`: an `nrows × ncols` zero matrix.
  pub fn new(nrows: i32, ncols: i32) -> Self {
    let len = (nrows.max(0) * ncols.max(0)) as usize;
    Matrix { nrows, ncols, m: vec![Poly::zero(); len] }
  }

  #[inline]
  pub fn nrows(&self) -> i32 {
    self.nrows
  }

  #[inline]
  pub fn ncols(&self) -> i32 {
    self.ncols
  }

  /// `MATELEM(mat, row, col)`; 1-based, the caller checks bounds.
  #[inline]
  pub fn matelem(&self, row: i32, col: i32) -> &Poly {
    &self.m[self.offset(row, col)]
  }

  #[inline]
  pub fn matelem_mut(&mut self, row: i32, col: i32) -> &mut Poly {
    let i = self.offset(row, col);
    &mut self.m[i]
  }

  fn offset(&self, row: i32, col: i32) -> usize {
    ((row - 1) * self.ncols + (col - 1)) as usize
  }
}

/// ```c
/// class intvec { int *v; int row; int col; ... };
/// ```
/// An intvec is an intmat with one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntVec {
  v: Vec<i32>,
  row: i32,
  col: i32,
}

impl IntVec {
  pub fn from_vec(v: Vec<i32>) -> Self {
    debug_assert!(v.len() <= i32::MAX as usize, "intvec of {} entries", v.len());
    let row = v.len() as i32;
    IntVec { v, row, col: 1 }
  }

  /// A `row × col` intmat from its row-major entries. `None` on a shape
  /// mismatch.
  pub fn matrix(row: i32, col: i32, v: Vec<i32>) -> Option<Self> {
    (row >= 0 && col >= 0 && (row * col) as usize == v.len())
      .then_some(IntVec { v, row, col })
  }

  #[inline]
  pub fn rows(&self) -> i32 {
    self.row
  }

  #[inline]
  pub fn cols(&self) -> i32 {
    self.col
  }

  #[inline]
  pub fn length(&self) -> i32 {
    self.row * self.col
  }

  /// `(*v)[i]`; 0-based, the caller checks bounds.
  #[inline]
  pub fn get(&self, i: usize) -> i32 {
    self.v[i]
  }

  /// `IMATELEM(mat, row, col)`; 1-based, the caller checks bounds.
  #[inline]
  pub fn imatelem(&self, row: i32, col: i32) -> i32 {
    self.v[((row - 1) * self.col + (col - 1)) as usize]
  }
}

/// ```c
/// class bigintmat { number *v; int row; int col; coeffs m_coeffs; ... };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BigIntMat {
  v: Vec<Number>,
  row: i32,
  col: i32,
}

impl BigIntMat {
  /// A `row × col` matrix from its row-major entries. `None` on a shape
  /// mismatch.
  pub fn new(row: i32, col: i32, v: Vec<Number>) -> Option<Self> {
    (row >= 0 && col >= 0 && (row * col) as usize == v.len())
      .then_some(BigIntMat { v, row, col })
  }

  #[inline]
  pub fn rows(&self) -> i32 {
    self.row
  }

  #[inline]
  pub fn cols(&self) -> i32 {
    self.col
  }

  /// `BIMATELEM(mat, row, col)`; 1-based, the caller checks bounds.
  #[inline]
  pub fn bimatelem(&self, row: i32, col: i32) -> &Number {
    &self.v[((row - 1) * self.col + (col - 1)) as usize]
  }
}

/// Attributes attached to a kernel value, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(IndexMap<String, SingValue>);

impl Attributes {
  pub fn insert(&mut self, name: &str, value: SingValue) {
    self.0.insert(name.to_string(), value);
  }

  pub fn get(&self, name: &str) -> Option<&SingValue> {
    self.0.get(name)
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }
}

/// An owned `sleftv`: a kernel value with its flags and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Sleftv {
  pub data: SingValue,
  pub flag: u32,
  pub attribute: Attributes,
}

impl Sleftv {
  pub fn new(data: SingValue) -> Self {
    Sleftv { data, flag: 0, attribute: Attributes::default() }
  }

  /// `sleftv::Typ()`
  #[inline]
  pub fn rtyp(&self) -> CmdType {
    self.data.cmd_type()
  }
}

/// ```c
/// struct slists { int nr; sleftv *m; ... };
/// ```
/// `nr` is the index of the last element, one less than the length.
#[derive(Debug, Clone, PartialEq)]
pub struct Lists {
  nr: i32,
  m: Vec<Sleftv>,
}

impl Lists {
  /// Lists are `int`-indexed: at most `i32::MAX` elements.
  pub fn from_vec(m: Vec<Sleftv>) -> Self {
    debug_assert!(m.len() <= i32::MAX as usize, "list of {} elements", m.len());
    Lists { nr: m.len() as i32 - 1, m }
  }

  /// `l->nr`
  #[inline]
  pub fn nr(&self) -> i32 {
    self.nr
  }

  /// `l->m[i]`; 0-based, the caller checks bounds.
  #[inline]
  pub fn elem(&self, i: usize) -> &Sleftv {
    &self.m[i]
  }

}

/// The closed set of kernel values the bridge can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum SingValue {
  Int(i64),
  BigInt(Number),
  Number(Number),
  String(Vec<u8>),
  Poly(Poly),
  Ideal(Ideal),
  Matrix(Matrix),
  IntVec(IntVec),
  IntMat(IntVec),
  BigIntMat(BigIntMat),
  List(Lists),
  Ring(Rc<Ring>),
}

impl SingValue {
  pub fn cmd_type(&self) -> CmdType {
    match self {
      Self::Int(_) => CmdType::Int,
      Self::BigInt(_) => CmdType::BigInt,
      Self::Number(_) => CmdType::Number,
      Self::String(_) => CmdType::String,
      Self::Poly(_) => CmdType::Poly,
      Self::Ideal(_) => CmdType::Ideal,
      Self::Matrix(_) => CmdType::Matrix,
      Self::IntVec(_) => CmdType::IntVec,
      Self::IntMat(_) => CmdType::IntMat,
      Self::BigIntMat(_) => CmdType::BigIntMat,
      Self::List(_) => CmdType::List,
      Self::Ring(_) => CmdType::Ring,
    }
  }
}

/// A non-owning view of a kernel value: the whole value held by someone
/// else, or an element living inside a composite. Machine integers are
/// carried by value since they have no storage of their own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
  Value(&'a SingValue),
  Poly(&'a Poly),
  Int(i64),
  BigInt(&'a Number),
}

impl ValueRef<'_> {
  pub fn cmd_type(&self) -> CmdType {
    match self {
      Self::Value(v) => v.cmd_type(),
      Self::Poly(_) => CmdType::Poly,
      Self::Int(_) => CmdType::Int,
      Self::BigInt(_) => CmdType::BigInt,
    }
  }

  /// Interpreter kind of the referenced value (never `_IMM`).
  #[inline]
  pub fn gtype(&self) -> GType {
    GType::from_cmd(self.cmd_type())
  }

  /// Deep copy into an independently owned value.
  pub fn to_value(self) -> SingValue {
    match self {
      Self::Value(v) => v.clone(),
      Self::Poly(p) => SingValue::Poly(p.clone()),
      Self::Int(i) => SingValue::Int(i),
      Self::BigInt(n) => SingValue::BigInt(n.clone()),
    }
  }
}
