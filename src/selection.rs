//! Ordered identity sets used for row selection and row expansion.
//!
//! Membership is all that matters for correctness, but insertion order is
//! kept: toggling a new key appends it, toggling an existing key removes it
//! and leaves the rest in place.

use std::fmt;

#[derive(Clone)]
pub struct IdentitySet<K> {
    keys: Vec<K>,
}

/// Equality is membership; insertion order is not compared.
impl<K: PartialEq> PartialEq for IdentitySet<K> {
    fn eq(&self, other: &Self) -> bool {
        self.keys.len() == other.keys.len() && self.keys.iter().all(|k| other.keys.contains(k))
    }
}

impl<K: Eq> Eq for IdentitySet<K> {}

impl<K> Default for IdentitySet<K> {
    fn default() -> Self {
        Self { keys: Vec::new() }
    }
}

impl<K: fmt::Debug> fmt::Debug for IdentitySet<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.keys.iter()).finish()
    }
}

impl<K: PartialEq + Clone> IdentitySet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select-all: exactly `keys`, in the given order, without repeats.
    pub fn from_keys<I: IntoIterator<Item = K>>(keys: I) -> Self {
        let mut set = Self::new();
        for key in keys {
            if !set.contains(&key) {
                set.keys.push(key);
            }
        }
        set
    }

    pub fn toggled(&self, key: K) -> Self {
        let mut keys = self.keys.clone();
        match keys.iter().position(|k| *k == key) {
            Some(index) => {
                keys.remove(index);
            }
            None => keys.push(key),
        }
        Self { keys }
    }

    pub fn cleared(&self) -> Self {
        Self::new()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, K> {
        self.keys.iter()
    }

    pub fn as_slice(&self) -> &[K] {
        &self.keys
    }

    /// How many of `keys` are members.
    pub fn count_in<'a, I>(&self, keys: I) -> usize
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        keys.into_iter().filter(|k| self.contains(k)).count()
    }
}

impl<'a, K> IntoIterator for &'a IdentitySet<K> {
    type Item = &'a K;
    type IntoIter = std::slice::Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

/// State of the header select-all checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    Unchecked,
    Indeterminate,
    Checked,
}

impl HeaderCheck {
    pub fn of(num_selected: usize, row_count: usize) -> Self {
        if row_count > 0 && num_selected == row_count {
            HeaderCheck::Checked
        } else if num_selected > 0 && num_selected < row_count {
            HeaderCheck::Indeterminate
        } else {
            HeaderCheck::Unchecked
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            HeaderCheck::Unchecked => "[ ]",
            HeaderCheck::Indeterminate => "[-]",
            HeaderCheck::Checked => "[x]",
        }
    }
}
