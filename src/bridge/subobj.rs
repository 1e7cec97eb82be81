//! Resolution of proxy index paths into nested kernel objects.
//!
//! A proxy names an element of a kernel composite by a path of 1-based
//! indices. Ideals, intvecs and lists take one index per step, matrices of
//! every flavour take a (row, column) pair. Only list elements may be
//! composites themselves, so lists are the only kind resolution descends
//! through; every other step ends at a scalar.

use tracing::trace;

use crate::error::{BridgeError, BridgeResult};
use crate::gap::Obj;
use crate::singular::{GType, SingValue, ValueRef};

/// Follows the indices of `proxy` from 1-based position `pos` on, starting at
/// `current` whose interpreter kind is `gtype`, and returns the element
/// reached together with its kind.
///
/// With no index left, `current` and `gtype` are returned unchanged. The
/// returned reference borrows from the same structure as `current`.
pub fn follow_subobj<'a>(
  proxy: &'a Obj,
  pos: usize,
  current: ValueRef<'a>,
  gtype: GType,
) -> BridgeResult<(ValueRef<'a>, GType)> {
  if pos > proxy.len_plist() {
    return Ok((current, gtype));
  }
  let Some(index) = proxy.elm_plist(pos).and_then(Obj::int_intobj) else {
    return Err(BridgeError::Path("proxy index must be an immediate integer"));
  };
  debug_assert_eq!(gtype.base(), current.gtype(), "kind out of sync with value");

  let value = match current {
    ValueRef::Value(value) => value,
    ValueRef::Poly(_) | ValueRef::Int(_) | ValueRef::BigInt(_) => {
      return Err(BridgeError::NoSubobjects);
    },
  };

  match value {
    SingValue::Ideal(id) => {
      if index <= 0 || index > id.idelems() {
        return Err(BridgeError::Index("ideal index out of range"));
      }
      let elem = ValueRef::Poly(&id.m[(index - 1) as usize]);
      terminal(proxy, pos + 1, elem, GType::Poly)
    },
    SingValue::Matrix(mat) => {
      let (row, col) = index_pair(
        proxy,
        pos,
        "need two integer indices for matrix proxy element",
      )?;
      if !in_range(row, mat.nrows()) || !in_range(col, mat.ncols()) {
        return Err(BridgeError::Index("matrix indices out of range"));
      }
      let elem = ValueRef::Poly(mat.matelem(row as i32, col as i32));
      terminal(proxy, pos + 2, elem, GType::Poly)
    },
    SingValue::List(l) => {
      if index <= 0 || index > i64::from(l.nr()) + 1 {
        return Err(BridgeError::Index("list index out of range"));
      }
      let elem = l.elem((index - 1) as usize);
      let elem_gtype = GType::from_cmd(elem.rtyp());
      trace!(index, ?elem_gtype, "descending into list element");
      follow_subobj(proxy, pos + 1, ValueRef::Value(&elem.data), elem_gtype)
    },
    SingValue::IntMat(mat) => {
      let (row, col) = index_pair(
        proxy,
        pos,
        "need two integer indices for intmat proxy element",
      )?;
      if !in_range(row, mat.rows()) || !in_range(col, mat.cols()) {
        return Err(BridgeError::Index("intmat indices out of range"));
      }
      let elem = ValueRef::Int(i64::from(mat.imatelem(row as i32, col as i32)));
      terminal(proxy, pos + 2, elem, GType::IntImm)
    },
    SingValue::IntVec(v) => {
      if !in_range(index, v.length()) {
        return Err(BridgeError::Index("vector index out of range"));
      }
      let elem = ValueRef::Int(i64::from(v.get((index - 1) as usize)));
      terminal(proxy, pos + 1, elem, GType::IntImm)
    },
    SingValue::BigIntMat(mat) => {
      let (row, col) = index_pair(
        proxy,
        pos,
        "need two integer indices for bigintmat proxy element",
      )?;
      if !in_range(row, mat.rows()) || !in_range(col, mat.cols()) {
        return Err(BridgeError::Index("bigintmat indices out of range"));
      }
      let elem = ValueRef::BigInt(mat.bimatelem(row as i32, col as i32));
      terminal(proxy, pos + 2, elem, GType::BigIntImm)
    },
    SingValue::Int(_)
    | SingValue::BigInt(_)
    | SingValue::Number(_)
    | SingValue::String(_)
    | SingValue::Poly(_)
    | SingValue::Ring(_) => Err(BridgeError::NoSubobjects),
  }
}

/// Elements of ideals and matrices are scalars; a path continuing past one
/// names a subobject that does not exist.
fn terminal<'a>(
  proxy: &Obj,
  next: usize,
  elem: ValueRef<'a>,
  gtype: GType,
) -> BridgeResult<(ValueRef<'a>, GType)> {
  if next <= proxy.len_plist() {
    return Err(BridgeError::NoSubobjects);
  }
  Ok((elem, gtype))
}

/// Reads the (row, column) pair at positions `pos` and `pos + 1`.
fn index_pair(
  proxy: &Obj,
  pos: usize,
  msg: &'static str,
) -> BridgeResult<(i64, i64)> {
  match (
    proxy.elm_plist(pos).and_then(Obj::int_intobj),
    proxy.elm_plist(pos + 1).and_then(Obj::int_intobj),
  ) {
    (Some(row), Some(col)) => Ok((row, col)),
    _ => Err(BridgeError::Path(msg)),
  }
}

/// 1-based bounds check.
#[inline]
fn in_range(index: i64, len: i32) -> bool {
  index >= 1 && index <= i64::from(len)
}
