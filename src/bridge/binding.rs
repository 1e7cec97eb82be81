//! The ownership-tracking holder of one marshaled argument.
//!
//! A [`Binding`] knows whether the kernel value it holds was allocated for
//! this call (and must be freed exactly once) or lives inside some other
//! kernel structure (and must never be freed here). It is consumed either by
//! [`Binding::take_for_destructive_use`], which hands the caller an owned
//! value, or by [`Binding::release`]; dropping it releases as well, so error
//! paths cannot leak.
//!
//! The switch to an argument's ring outlives the value: a taken value comes
//! with the switch, and [`CallArgs`](super::CallArgs) keeps the switches of
//! all its arguments until the whole call is over.

use std::rc::Rc;

use tracing::{debug, trace};

use super::number::bigint_or_int_from_gap;
use super::subobj::follow_subobj;
use crate::config::BridgeConfig;
use crate::error::{BridgeError, BridgeResult};
use crate::gap::{Obj, SingObj, Tnum};
use crate::singular::{
  Attributes, CmdType, GType, Ring, RingScope, SingValue, Sleftv, ValueRef,
};

/// Who owns the kernel value held by a binding.
#[derive(Debug, PartialEq)]
pub enum Payload<'a> {
  /// Allocated for this binding; freed on release.
  Owned(SingValue),
  /// Owned elsewhere, or an immediate with no storage at all.
  Shared(ValueRef<'a>),
}

impl Payload<'_> {
  /// A view usable any number of times while the binding lives.
  pub fn as_ref(&self) -> ValueRef<'_> {
    match self {
      Self::Owned(v) => ValueRef::Value(v),
      Self::Shared(r) => *r,
    }
  }
}

/// The populated contents of a binding, `sleftv` style.
#[derive(Debug, PartialEq)]
pub struct Leftv<'a> {
  pub rtyp: CmdType,
  pub data: Payload<'a>,
  pub flag: u32,
  pub attribute: Option<&'a Attributes>,
}

/// A value handed over for destructive use.
///
/// `scope` keeps the value's ring current; hold it until the value has been
/// passed to the kernel, and drop scopes in reverse order of creation.
#[derive(Debug)]
pub struct Taken {
  pub leftv: Sleftv,
  pub scope: Option<RingScope>,
}

/// One marshaled kernel value and the knowledge of whether to free it.
#[derive(Debug, Default)]
pub struct Binding<'a> {
  obj: Option<Leftv<'a>>,
  ring: Option<Rc<Ring>>,
  scope: Option<RingScope>,
}

impl<'a> Binding<'a> {
  /// An empty binding.
  pub fn new() -> Self {
    Self::default()
  }

  /// Marshals `input` into a new binding.
  pub fn from_obj(cfg: &BridgeConfig, input: &'a Obj) -> BridgeResult<Self> {
    let mut binding = Binding::new();
    binding.populate(cfg, input)?;
    Ok(binding)
  }

  /// Releases whatever is held and returns to the empty state.
  pub fn init(&mut self) {
    if let Some(obj) = self.obj.take() {
      release_leftv(obj);
    }
    self.ring = None;
    self.scope = None;
  }

  /// Marshals `input`, releasing any previous contents first. On error the
  /// binding is left empty.
  ///
  /// Integers become kernel ints or bigints, strings an owned kernel copy,
  /// kernel bags and proxies a shared reference into the kernel object the
  /// interpreter holds. Ring-bearing objects make their ring current until
  /// the binding is released.
  pub fn populate(&mut self, cfg: &BridgeConfig, input: &'a Obj) -> BridgeResult<()> {
    self.init();
    let (obj, ring) = if input.is_int() {
      let (value, gtype) = bigint_or_int_from_gap(input)?;
      let data = match value {
        SingValue::Int(i) => Payload::Shared(ValueRef::Int(i)),
        heap => Payload::Owned(heap),
      };
      (leftv(gtype.to_cmd(), data), None)
    } else if let Some(bytes) = input.chars_string() {
      let data = Payload::Owned(SingValue::String(bytes.to_vec()));
      (leftv(CmdType::String, data), None)
    } else if let Obj::Singular(bag) = input {
      let gtype = bag.type_singobj();
      let obj = Leftv {
        rtyp: gtype.to_cmd(),
        data: Payload::Shared(ValueRef::Value(bag.cxx_singobj())),
        flag: bag.flags_singobj(),
        attribute: Some(bag.attrib_singobj()),
      };
      (obj, bag_ring(bag, gtype))
    } else if input.tnum() == Tnum::PosObj {
      proxy_leftv(cfg, input)?
    } else {
      return Err(BridgeError::Type(
        "Argument to Singular call is no valid Singular object",
      ));
    };
    self.scope = ring
      .as_ref()
      .filter(|_| obj.rtyp != CmdType::Ring)
      .map(RingScope::enter);
    self.ring = ring;
    self.obj = Some(obj);
    Ok(())
  }

  #[inline]
  pub fn is_empty(&self) -> bool {
    self.obj.is_none()
  }

  /// `true` when releasing the binding frees a kernel value.
  #[inline]
  pub fn owns(&self) -> bool {
    matches!(self.obj, Some(Leftv { data: Payload::Owned(_), .. }))
  }

  #[inline]
  pub fn leftv(&self) -> Option<&Leftv<'a>> {
    self.obj.as_ref()
  }

  #[inline]
  pub fn rtyp(&self) -> CmdType {
    self.obj.as_ref().map_or(CmdType::None, |obj| obj.rtyp)
  }

  /// The held value, for repeated non-destructive use.
  #[inline]
  pub fn value(&self) -> Option<ValueRef<'_>> {
    self.obj.as_ref().map(|obj| obj.data.as_ref())
  }

  /// The ring the argument lives in, if any.
  #[inline]
  pub fn ring(&self) -> Option<&Rc<Ring>> {
    self.ring.as_ref()
  }

  /// Moves the ring switch out, leaving the ambient ring as it is. The
  /// binding no longer restores it on release.
  pub(crate) fn detach_scope(&mut self) -> Option<RingScope> {
    self.scope.take()
  }

  /// Hands the value over to the caller, who now owns it, together with the
  /// switch to its ring.
  ///
  /// An owned value is moved out as is; a shared one is deep-copied first so
  /// the structure it lives in is never touched. `None` for an empty binding.
  pub fn take_for_destructive_use(mut self) -> Option<Taken> {
    let obj = self.obj.take()?;
    let data = match obj.data {
      Payload::Owned(value) => {
        trace!(rtyp = ?obj.rtyp, "handing over owned value");
        value
      },
      Payload::Shared(r) => {
        debug!(rtyp = ?obj.rtyp, "copying shared value for destructive use");
        r.to_value()
      },
    };
    let leftv = Sleftv {
      data,
      flag: obj.flag,
      attribute: obj.attribute.cloned().unwrap_or_default(),
    };
    Some(Taken { leftv, scope: self.scope.take() })
  }

  /// Frees the held value if this binding owns it; a no-op otherwise.
  pub fn release(mut self) {
    self.init();
  }
}

impl Drop for Binding<'_> {
  fn drop(&mut self) {
    self.init();
  }
}

fn leftv<'a>(rtyp: CmdType, data: Payload<'a>) -> Leftv<'a> {
  Leftv { rtyp, data, flag: 0, attribute: None }
}

fn release_leftv(obj: Leftv<'_>) {
  if let Payload::Owned(value) = obj.data {
    trace!(rtyp = ?obj.rtyp, "releasing owned value");
    drop(value);
  }
}

/// The ring a bag's object lives in: its stored ring for ring-bearing kinds,
/// the object itself for rings.
fn bag_ring(bag: &SingObj, gtype: GType) -> Option<Rc<Ring>> {
  if gtype.has_ring() {
    bag.ring_singobj().cloned()
  } else if let SingValue::Ring(r) = bag.cxx_singobj() {
    Some(Rc::clone(r))
  } else {
    None
  }
}

fn proxy_leftv<'a>(
  cfg: &BridgeConfig,
  proxy: &'a Obj,
) -> BridgeResult<(Leftv<'a>, Option<Rc<Ring>>)> {
  match proxy.elm_plist(2) {
    Some(Obj::Int(_)) => {},
    Some(Obj::String(_)) => {
      return Err(BridgeError::Proxy(
        "proxy objects to Singular interpreter variables are not yet implemented",
      ));
    },
    _ => return Err(BridgeError::Proxy("unknown Singular proxy object")),
  }
  let Some(Obj::Singular(bag)) = proxy.elm_plist(1) else {
    return Err(BridgeError::Proxy(
      "proxy object does not refer to Singular object",
    ));
  };
  let depth = proxy.len_plist() - 1;
  if depth > cfg.max_proxy_depth {
    return Err(BridgeError::Path("proxy path exceeds the maximal depth"));
  }
  let gtype = bag.type_singobj();
  let ring = if gtype.has_ring() { bag.ring_singobj().cloned() } else { None };
  let (elem, elem_gtype) =
    follow_subobj(proxy, 2, ValueRef::Value(bag.cxx_singobj()), gtype)?;
  debug!(depth, ?elem_gtype, "resolved proxy");
  Ok((leftv(elem_gtype.to_cmd(), Payload::Shared(elem)), ring))
}

#[cfg(test)]
mod tests {
  use num_bigint::BigInt;

  use super::*;
  use crate::gap::int::obj_from_bigint;
  use crate::singular::{
    Coeffs, Ideal, IntVec, Lists, Matrix, Number, Poly, curr_ring, nl_init,
  };

  fn cfg() -> BridgeConfig {
    BridgeConfig::default()
  }

  fn poly(c: i64) -> Poly {
    Poly::constant(nl_init(c), 2)
  }

  fn ideal_bag(r: &Rc<Ring>) -> Obj {
    let id = Ideal::new(vec![poly(1), poly(2), poly(3)]);
    Obj::singular(SingObj::new(SingValue::Ideal(id), Some(Rc::clone(r))))
  }

  fn heap_ptr(value: &SingValue) -> *const () {
    match value {
      SingValue::BigInt(Number::Heap(b)) => (&**b as *const crate::singular::SNumber).cast(),
      SingValue::String(s) => s.as_ptr().cast(),
      other => panic!("no heap storage in {other:?}"),
    }
  }

  #[test]
  fn empty_binding() {
    let b = Binding::new();
    assert!(b.is_empty());
    assert!(!b.owns());
    assert_eq!(b.rtyp(), CmdType::None);
    assert_eq!(b.value(), None);
    b.release();
    assert!(Binding::new().take_for_destructive_use().is_none());
  }

  #[test]
  fn small_integers_are_not_owned() {
    let input = Obj::Int(17);
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    assert!(!b.owns());
    assert_eq!(b.rtyp(), CmdType::Int);
    assert_eq!(b.value(), Some(ValueRef::Int(17)));
    let taken = b.take_for_destructive_use().unwrap();
    assert_eq!(taken.leftv.data, SingValue::Int(17));
    assert!(taken.scope.is_none());
  }

  #[test]
  fn big_integers_are_owned_and_moved_out() {
    let input = obj_from_bigint(&(BigInt::from(1) << 100usize));
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    assert!(b.owns());
    assert_eq!(b.rtyp(), CmdType::BigInt);
    let Some(Leftv { data: Payload::Owned(value), .. }) = b.leftv() else {
      panic!("expected an owned bigint");
    };
    let before = heap_ptr(value);
    let taken = b.take_for_destructive_use().unwrap();
    assert_eq!(heap_ptr(&taken.leftv.data), before);
  }

  #[test]
  fn strings_are_copied_and_owned() {
    let input = Obj::string("std");
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    assert!(b.owns());
    assert_eq!(b.rtyp(), CmdType::String);
    let Some(ValueRef::Value(SingValue::String(s))) = b.value() else {
      panic!("expected a string");
    };
    assert_eq!(s, b"std");
    assert_ne!(s.as_ptr(), input.chars_string().unwrap().as_ptr());
  }

  #[test]
  fn kernel_bags_are_shared_and_copied_on_take() {
    let r = Ring::new(Coeffs::Q, &["x", "y"]);
    let input = ideal_bag(&r);
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    assert!(!b.owns());
    assert_eq!(b.rtyp(), CmdType::Ideal);
    assert!(Rc::ptr_eq(b.ring().unwrap(), &r));

    let mut taken = b.take_for_destructive_use().unwrap();
    let SingValue::Ideal(id) = &mut taken.leftv.data else { panic!("expected an ideal") };
    id.m[0] = Poly::zero();
    id.m.pop();

    let Obj::Singular(bag) = &input else { unreachable!() };
    let SingValue::Ideal(source) = bag.cxx_singobj() else { unreachable!() };
    assert_eq!(source.m, vec![poly(1), poly(2), poly(3)]);
  }

  #[test]
  fn flags_and_attributes_are_carried() {
    let bag = SingObj::new(SingValue::IntVec(IntVec::from_vec(vec![1, 2])), None)
      .with_flags(0b101)
      .with_attribute("isSB", SingValue::Int(1));
    let input = Obj::singular(bag);
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    let obj = b.leftv().unwrap();
    assert_eq!(obj.flag, 0b101);
    assert_eq!(obj.attribute.unwrap().get("isSB"), Some(&SingValue::Int(1)));
    let taken = b.take_for_destructive_use().unwrap();
    assert_eq!(taken.leftv.flag, 0b101);
    assert_eq!(taken.leftv.attribute.get("isSB"), Some(&SingValue::Int(1)));
  }

  #[test]
  fn ring_is_current_while_bound() {
    let r = Ring::new(Coeffs::Zp(32003), &["x"]);
    let input = ideal_bag(&r);
    assert!(curr_ring().is_none());
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    assert!(Rc::ptr_eq(&curr_ring().unwrap(), &r));
    b.release();
    assert!(curr_ring().is_none());
  }

  #[test]
  fn taken_values_keep_their_ring_current() {
    let r = Ring::new(Coeffs::Zp(7), &["x"]);
    let input = ideal_bag(&r);
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    let taken = b.take_for_destructive_use().unwrap();
    assert!(curr_ring().is_some_and(|c| Rc::ptr_eq(&c, &r)));
    assert_eq!(taken.leftv.rtyp(), CmdType::Ideal);
    drop(taken);
    assert!(curr_ring().is_none());
  }

  #[test]
  fn detached_scopes_outlive_the_binding() {
    let r = Ring::new(Coeffs::Q, &["x"]);
    let input = ideal_bag(&r);
    let mut b = Binding::from_obj(&cfg(), &input).unwrap();
    let scope = b.detach_scope();
    assert!(scope.is_some());
    b.release();
    assert!(curr_ring().is_some_and(|c| Rc::ptr_eq(&c, &r)));
    drop(scope);
    assert!(curr_ring().is_none());
  }

  #[test]
  fn ring_objects_bind_their_own_ring() {
    let r = Ring::new(Coeffs::Q, &["t"]);
    let input = Obj::singular(SingObj::new(SingValue::Ring(Rc::clone(&r)), None));
    let b = Binding::from_obj(&cfg(), &input).unwrap();
    assert_eq!(b.rtyp(), CmdType::Ring);
    assert!(Rc::ptr_eq(b.ring().unwrap(), &r));
    // Rings are not ring-bearing objects; the ambient ring is left alone.
    assert!(curr_ring().is_none());
  }

  #[test]
  fn proxies_resolve_to_shared_elements() {
    let r = Ring::new(Coeffs::Q, &["x", "y"]);
    let mut mat = Matrix::new(2, 2);
    *mat.matelem_mut(2, 1) = poly(21);
    let anchor = SingValue::List(Lists::from_vec(vec![
      Sleftv::new(SingValue::Int(0)),
      Sleftv::new(SingValue::Matrix(mat)),
    ]));
    let bag = Obj::singular(SingObj::new(anchor, Some(Rc::clone(&r))).immutable());
    let input = Obj::Proxy(vec![bag, Obj::Int(2), Obj::Int(2), Obj::Int(1)]);

    let b = Binding::from_obj(&cfg(), &input).unwrap();
    assert!(!b.owns());
    assert_eq!(b.rtyp(), CmdType::Poly);
    assert_eq!(b.value(), Some(ValueRef::Poly(&poly(21))));
    assert!(Rc::ptr_eq(b.ring().unwrap(), &r));
    let taken = b.take_for_destructive_use().unwrap();
    assert_eq!(taken.leftv.data, SingValue::Poly(poly(21)));
    assert_eq!(taken.leftv.flag, 0);
    assert!(taken.leftv.attribute.is_empty());
  }

  #[test]
  fn proxy_errors() {
    let r = Ring::new(Coeffs::Q, &["x"]);
    let cases = [
      (
        Obj::Proxy(vec![Obj::Int(1), Obj::Int(1)]),
        BridgeError::Proxy("proxy object does not refer to Singular object"),
      ),
      (
        Obj::Proxy(vec![ideal_bag(&r), Obj::string("R")]),
        BridgeError::Proxy(
          "proxy objects to Singular interpreter variables are not yet implemented",
        ),
      ),
      (
        Obj::Proxy(vec![ideal_bag(&r), Obj::Fail]),
        BridgeError::Proxy("unknown Singular proxy object"),
      ),
      (
        Obj::Proxy(vec![ideal_bag(&r)]),
        BridgeError::Proxy("unknown Singular proxy object"),
      ),
      (
        Obj::Proxy(vec![ideal_bag(&r), Obj::Int(4)]),
        BridgeError::Index("ideal index out of range"),
      ),
    ];
    for (input, err) in &cases {
      assert_eq!(Binding::from_obj(&cfg(), input).unwrap_err(), *err);
    }
    // A failed resolution leaves the ambient ring untouched.
    assert!(curr_ring().is_none());
  }

  #[test]
  fn proxy_depth_is_limited() {
    let r = Ring::new(Coeffs::Q, &["x"]);
    let input = Obj::Proxy(vec![ideal_bag(&r), Obj::Int(1), Obj::Int(1)]);
    let shallow = BridgeConfig { max_proxy_depth: 1, ..cfg() };
    assert_eq!(
      Binding::from_obj(&shallow, &input).unwrap_err(),
      BridgeError::Path("proxy path exceeds the maximal depth")
    );
  }

  #[test]
  fn invalid_arguments() {
    for input in [Obj::Fail, Obj::Plist(vec![]), Obj::Ffe(crate::gap::Ffe::new(1, 2, 1))] {
      assert_eq!(
        Binding::from_obj(&cfg(), &input).unwrap_err(),
        BridgeError::Type("Argument to Singular call is no valid Singular object")
      );
    }
  }

  #[test]
  fn repopulating_releases_first() {
    let big = obj_from_bigint(&(BigInt::from(1) << 80usize));
    let small = Obj::Int(3);
    let mut b = Binding::new();
    b.populate(&cfg(), &big).unwrap();
    assert!(b.owns());
    b.populate(&cfg(), &small).unwrap();
    assert!(!b.owns());
    assert_eq!(b.value(), Some(ValueRef::Int(3)));
    assert!(b.populate(&cfg(), &Obj::Fail).is_err());
    assert!(b.is_empty());
  }
}
