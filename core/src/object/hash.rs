//! Hash maps keyed by hashable objects.

use core::fmt;

use hashbrown::HashMap;

use super::{HashKey, Object, ObjectError};

/// The original key object together with its value.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Object,
    pub value: Object,
}

/// Iteration order is unspecified.
#[derive(Debug, Clone, Default)]
pub struct Hash {
    pairs: HashMap<HashKey, HashPair>,
}

impl Hash {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a hash from key/value pairs; later duplicates win.
    pub fn from_pairs<I>(pairs: I) -> Result<Self, ObjectError>
    where
        I: IntoIterator<Item = (Object, Object)>,
    {
        let mut hash = Self::new();
        for (key, value) in pairs {
            hash.insert(key, value)?;
        }
        Ok(hash)
    }

    /// Insert a pair, returning the one it replaced.
    pub fn insert(&mut self, key: Object, value: Object) -> Result<Option<HashPair>, ObjectError> {
        let hash_key = key.hash_key()?;
        Ok(self.pairs.insert(hash_key, HashPair { key, value }))
    }

    pub fn get(&self, key: &Object) -> Result<Option<&Object>, ObjectError> {
        let hash_key = key.hash_key()?;
        Ok(self.pairs.get(&hash_key).map(|pair| &pair.value))
    }

    pub fn contains_key(&self, key: &Object) -> Result<bool, ObjectError> {
        Ok(self.pairs.contains_key(&key.hash_key()?))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HashKey, &HashPair)> {
        self.pairs.iter()
    }
}

impl PartialEq for Hash {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .pairs
                .iter()
                .all(|(key, pair)| other.pairs.get(key) == Some(pair))
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, pair) in self.pairs.values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", pair.key, pair.value)?;
        }
        write!(f, "}}")
    }
}
