//! Runtime object model.
//!
//! Everything the VM pushes, pops and stores is an [`Object`]. Integers,
//! booleans and strings are [`Hashable`] and can index a [`Hash`] through
//! their [`HashKey`]; every other variant is rejected with
//! [`ObjectError::UnusableAsHashKey`].
//!
//! Equality between objects is structural, with two exceptions: functions
//! compare by identity of their shared allocation and builtins by name.

mod environment;
mod error;
mod function;
mod hash;
mod hash_key;
#[allow(clippy::module_inception)]
mod object;


pub use environment::Environment;
pub use error::ObjectError;
pub use function::{Builtin, BuiltinFn, Function};
pub use hash::{Hash, HashPair};
pub use hash_key::{HashKey, Hashable, fnv1a_64};
pub use object::{FALSE, NULL, Object, ObjectType, TRUE};
