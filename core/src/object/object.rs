use alloc::rc::Rc;
use core::fmt;

use super::{Builtin, Function, Hash, HashKey, Hashable, ObjectError};
use crate::{String, ToString, Vec};

/// Discriminant of an [`Object`], rendered as an upper-case tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    Integer,
    Boolean,
    String,
    Null,
    ReturnValue,
    Error,
    Function,
    Builtin,
    Array,
    Hash,
}

impl ObjectType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Null => "NULL",
            Self::ReturnValue => "RETURN_VALUE",
            Self::Error => "ERROR",
            Self::Function => "FUNCTION",
            Self::Builtin => "BUILTIN",
            Self::Array => "ARRAY",
            Self::Hash => "HASH",
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A runtime value.
///
/// Payloads that are not plain scalars live behind an `Rc`, so cloning an
/// object (e.g. when the VM pushes a constant) never copies its contents.
#[derive(Debug, Clone)]
pub enum Object {
    Integer(i64),
    Boolean(bool),
    String(Rc<str>),
    Null,
    ReturnValue(Rc<Object>),
    Error(Rc<str>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Array(Rc<Vec<Object>>),
    Hash(Rc<Hash>),
}

/// The canonical `true`.
pub const TRUE: Object = Object::Boolean(true);

/// The canonical `false`.
pub const FALSE: Object = Object::Boolean(false);

pub const NULL: Object = Object::Null;

impl Object {
    /// Map a native bool to one of the two canonical boolean objects.
    ///
    /// All boolean results go through here.
    #[inline]
    pub const fn from_bool(value: bool) -> Object {
        if value { TRUE } else { FALSE }
    }

    pub fn string(value: impl Into<Rc<str>>) -> Object {
        Object::String(value.into())
    }

    pub fn error(message: impl Into<Rc<str>>) -> Object {
        Object::Error(message.into())
    }

    pub fn array(elements: Vec<Object>) -> Object {
        Object::Array(Rc::new(elements))
    }

    pub fn hash(hash: Hash) -> Object {
        Object::Hash(Rc::new(hash))
    }

    pub fn function(function: Function) -> Object {
        Object::Function(Rc::new(function))
    }

    pub fn return_value(value: Object) -> Object {
        Object::ReturnValue(Rc::new(value))
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            Self::Integer(_) => ObjectType::Integer,
            Self::Boolean(_) => ObjectType::Boolean,
            Self::String(_) => ObjectType::String,
            Self::Null => ObjectType::Null,
            Self::ReturnValue(_) => ObjectType::ReturnValue,
            Self::Error(_) => ObjectType::Error,
            Self::Function(_) => ObjectType::Function,
            Self::Builtin(_) => ObjectType::Builtin,
            Self::Array(_) => ObjectType::Array,
            Self::Hash(_) => ObjectType::Hash,
        }
    }

    /// Human-readable rendering, same as `Display`.
    pub fn inspect(&self) -> String {
        self.to_string()
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Everything except `false` and `null` is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Boolean(false) | Self::Null)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    pub fn is_hashable(&self) -> bool {
        matches!(self, Self::Integer(_) | Self::Boolean(_) | Self::String(_))
    }

    /// Hash key of an integer, boolean or string.
    pub fn hash_key(&self) -> Result<HashKey, ObjectError> {
        match self {
            Self::Integer(value) => Ok(value.hash_key()),
            Self::Boolean(value) => Ok(value.hash_key()),
            Self::String(value) => Ok(value.hash_key()),
            other => Err(ObjectError::UnusableAsHashKey(other.object_type())),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::Boolean(a), Self::Boolean(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Null, Self::Null) => true,
            (Self::ReturnValue(a), Self::ReturnValue(b)) => a == b,
            (Self::Error(a), Self::Error(b)) => a == b,
            (Self::Function(a), Self::Function(b)) => Rc::ptr_eq(a, b),
            (Self::Builtin(a), Self::Builtin(b)) => a.name == b.name,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Hash(a), Self::Hash(b)) => a == b,
            _ => false,
        }
    }
}

impl From<i64> for Object {
    fn from(value: i64) -> Self {
        Object::Integer(value)
    }
}

impl From<bool> for Object {
    fn from(value: bool) -> Self {
        Object::from_bool(value)
    }
}

impl From<&str> for Object {
    fn from(value: &str) -> Self {
        Object::string(value)
    }
}

impl From<String> for Object {
    fn from(value: String) -> Self {
        Object::string(value)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Boolean(value) => write!(f, "{}", value),
            Self::String(value) => f.write_str(value),
            Self::Null => f.write_str("null"),
            Self::ReturnValue(value) => write!(f, "{}", value),
            Self::Error(message) => write!(f, "ERROR: {}", message),
            Self::Function(function) => write!(f, "{}", function),
            Self::Builtin(builtin) => write!(f, "{}", builtin),
            Self::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", element)?;
                }
                write!(f, "]")
            }
            Self::Hash(hash) => write!(f, "{}", hash),
        }
    }
}
