//! Object model errors.

use thiserror::Error;

use super::ObjectType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ObjectError {
    /// Only integers, booleans and strings can index a hash.
    #[error("unusable as hash key: {0}")]
    UnusableAsHashKey(ObjectType),
}
