//! Translation of values between the interpreter and the kernel.
//!
//! Arguments flow interpreter → [`Binding`] → kernel: numbers go through
//! [`number`] (and [`gmp`] for their limbs), proxies through [`subobj`], and
//! the binding records whether the kernel value must be freed afterwards.

pub mod binding;
pub mod boundary;
pub mod gmp;
pub mod number;
pub mod subobj;

pub use binding::{Binding, Leftv, Payload, Taken};
pub use boundary::{CallArgs, ErrorQuit, call_singular, guarded};
pub use number::{
  bigint_from_gap, bigint_or_int_from_gap, bigint_or_int_to_gap,
  number_from_gap,
};
pub use subobj::follow_subobj;

/// Smallest interpreter immediate the kernel takes as a machine `int`.
///
/// On 64-bit platforms the interpreter's immediates are 60 bits wide, far
/// wider than the kernel's `int`; on 32-bit platforms every interpreter
/// immediate fits.
pub const KERNEL_INT_MIN: i64 =
  if cfg!(target_pointer_width = "64") { i32::MIN as i64 } else { crate::gap::INTOBJ_MIN };

/// Largest interpreter immediate the kernel takes as a machine `int`.
pub const KERNEL_INT_MAX: i64 =
  if cfg!(target_pointer_width = "64") { i32::MAX as i64 } else { crate::gap::INTOBJ_MAX };

/// `true` when `i` fits the kernel's machine `int`. Whether a coefficient
/// built from it needs the heap is up to the ring; over the rationals only
/// [`fits_sr_int`](crate::singular::fits_sr_int) values stay immediate.
#[inline]
pub fn fits_kernel_int(i: i64) -> bool {
  (KERNEL_INT_MIN..=KERNEL_INT_MAX).contains(&i)
}
