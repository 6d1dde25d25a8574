//! Hash keys for objects usable as `Hash` indices.
//!
//! A [`HashKey`] is a plain `(type, value)` pair and compares structurally.
//! With the `std` feature, construction goes through a process-wide memo
//! table so repeated keys for the same pair come from a single cached entry.
//! The table only saves work; dropping it changes no observable behavior.

use super::ObjectType;

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// 64-bit FNV-1a over `bytes`.
pub fn fnv1a_64(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ byte as u64).wrapping_mul(FNV_PRIME)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HashKey {
    pub object_type: ObjectType,
    pub value: u64,
}

impl HashKey {
    pub fn new(object_type: ObjectType, value: u64) -> Self {
        memoized(object_type, value)
    }

    /// Integers hash to their own two's complement bits.
    pub fn integer(value: i64) -> Self {
        Self::new(ObjectType::Integer, value as u64)
    }

    pub fn boolean(value: bool) -> Self {
        Self::new(ObjectType::Boolean, value as u64)
    }

    pub fn string(value: &str) -> Self {
        Self::new(ObjectType::String, fnv1a_64(value.as_bytes()))
    }

    /// Number of distinct keys constructed so far in this process.
    #[cfg(feature = "std")]
    pub fn cached_keys() -> usize {
        cache::len()
    }
}

/// Values that can be turned into a [`HashKey`].
pub trait Hashable {
    fn hash_key(&self) -> HashKey;
}

impl Hashable for i64 {
    fn hash_key(&self) -> HashKey {
        HashKey::integer(*self)
    }
}

impl Hashable for bool {
    fn hash_key(&self) -> HashKey {
        HashKey::boolean(*self)
    }
}

impl Hashable for str {
    fn hash_key(&self) -> HashKey {
        HashKey::string(self)
    }
}

#[cfg(feature = "std")]
fn memoized(object_type: ObjectType, value: u64) -> HashKey {
    cache::get_or_insert(object_type, value)
}

#[cfg(not(feature = "std"))]
fn memoized(object_type: ObjectType, value: u64) -> HashKey {
    HashKey { object_type, value }
}

#[cfg(feature = "std")]
mod cache {
    use std::sync::{Mutex, PoisonError};

    use hashbrown::HashMap;
    use once_cell::sync::Lazy;

    use super::{HashKey, ObjectType};

    // Grows monotonically; the key space is bounded by program data.
    static HASH_KEYS: Lazy<Mutex<HashMap<(ObjectType, u64), HashKey>>> =
        Lazy::new(|| Mutex::new(HashMap::new()));

    pub(super) fn get_or_insert(object_type: ObjectType, value: u64) -> HashKey {
        // A poisoned lock still holds valid keys.
        let mut keys = HASH_KEYS.lock().unwrap_or_else(PoisonError::into_inner);
        *keys
            .entry((object_type, value))
            .or_insert(HashKey { object_type, value })
    }

    pub(super) fn len() -> usize {
        HASH_KEYS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of cached entries holding `key`.
    #[cfg(test)]
    pub(super) fn occurrences(key: HashKey) -> usize {
        HASH_KEYS
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|&&cached| cached == key)
            .count()
    }
}
