//! Type tags on both sides of the bridge and the tables relating them.
//!
//! [`CmdType`] is the kernel's `rtyp` of an `sleftv`; [`GType`] is the
//! `SINGTYPE_*` kind stored in an interpreter `T_SINGULAR` bag, which also
//! records whether the wrapped object is immutable (`_IMM`). Mutability never
//! changes how a value is converted or traversed.

/// Kernel command types (`tok.h`), restricted to the kinds the bridge handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmdType {
  None,
  Int,
  BigInt,
  Number,
  String,
  Poly,
  Ideal,
  Matrix,
  IntVec,
  IntMat,
  BigIntMat,
  List,
  Ring,
}

/// Interpreter-side kinds of kernel objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GType {
  BigInt = 1,
  BigIntImm,
  BigIntMat,
  BigIntMatImm,
  Ideal,
  IdealImm,
  Int,
  IntImm,
  IntMat,
  IntMatImm,
  IntVec,
  IntVecImm,
  List,
  ListImm,
  Matrix,
  MatrixImm,
  Number,
  NumberImm,
  Poly,
  PolyImm,
  Ring,
  RingImm,
  String,
  StringImm,
}

impl GType {
  /// The mutable member of the kind's pair.
  pub fn base(self) -> GType {
    match self {
      Self::BigIntImm => Self::BigInt,
      Self::BigIntMatImm => Self::BigIntMat,
      Self::IdealImm => Self::Ideal,
      Self::IntImm => Self::Int,
      Self::IntMatImm => Self::IntMat,
      Self::IntVecImm => Self::IntVec,
      Self::ListImm => Self::List,
      Self::MatrixImm => Self::Matrix,
      Self::NumberImm => Self::Number,
      Self::PolyImm => Self::Poly,
      Self::RingImm => Self::Ring,
      Self::StringImm => Self::String,
      other => other,
    }
  }

  /// The immutable member of the kind's pair.
  pub fn to_imm(self) -> GType {
    match self.base() {
      Self::BigInt => Self::BigIntImm,
      Self::BigIntMat => Self::BigIntMatImm,
      Self::Ideal => Self::IdealImm,
      Self::Int => Self::IntImm,
      Self::IntMat => Self::IntMatImm,
      Self::IntVec => Self::IntVecImm,
      Self::List => Self::ListImm,
      Self::Matrix => Self::MatrixImm,
      Self::Number => Self::NumberImm,
      Self::Poly => Self::PolyImm,
      Self::Ring => Self::RingImm,
      Self::String => Self::StringImm,
      imm => imm,
    }
  }

  #[inline]
  pub fn is_imm(self) -> bool {
    self != self.base()
  }

  /// `GAPtoSingType[gtype]`
  pub fn to_cmd(self) -> CmdType {
    match self.base() {
      Self::BigInt => CmdType::BigInt,
      Self::BigIntMat => CmdType::BigIntMat,
      Self::Ideal => CmdType::Ideal,
      Self::Int => CmdType::Int,
      Self::IntMat => CmdType::IntMat,
      Self::IntVec => CmdType::IntVec,
      Self::List => CmdType::List,
      Self::Matrix => CmdType::Matrix,
      Self::Number => CmdType::Number,
      Self::Poly => CmdType::Poly,
      Self::Ring => CmdType::Ring,
      Self::String => CmdType::String,
      _ => CmdType::None,
    }
  }

  /// `SingtoGAPType[rtyp]`. `CmdType::None` has no interpreter kind and maps
  /// to `Int`, matching an uninitialized `sleftv` whose data is 0.
  pub fn from_cmd(cmd: CmdType) -> GType {
    match cmd {
      CmdType::BigInt => Self::BigInt,
      CmdType::BigIntMat => Self::BigIntMat,
      CmdType::Ideal => Self::Ideal,
      CmdType::None | CmdType::Int => Self::Int,
      CmdType::IntMat => Self::IntMat,
      CmdType::IntVec => Self::IntVec,
      CmdType::List => Self::List,
      CmdType::Matrix => Self::Matrix,
      CmdType::Number => Self::Number,
      CmdType::Poly => Self::Poly,
      CmdType::Ring => Self::Ring,
      CmdType::String => Self::String,
    }
  }

  /// `HasRingTable[gtype]`: whether objects of this kind live in a ring.
  pub fn has_ring(self) -> bool {
    matches!(
      self.base(),
      Self::Ideal | Self::List | Self::Matrix | Self::Number | Self::Poly
    )
  }
}
