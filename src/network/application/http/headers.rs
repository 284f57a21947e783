//! An insertion-ordered header table.
//!
//! HTTP header names are case-insensitive, so every lookup here compares
//! names with [`str::eq_ignore_ascii_case`]. The spelling of the name is kept
//! as written, which is what ends up on the wire. Entries are stored in a
//! `Vec`, so iteration order (and therefore serialized output) is fully
//! determined by the order of writes.

use serde::{Deserialize, Serialize};

/// A single `Name: Value` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

/// Ordered header set with last-write-wins semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMap {
    entries: Vec<Header>,
}

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name` to `value`.
    ///
    /// If a header with the same name (ignoring case) already exists it is
    /// overwritten where it stands: it keeps its position but takes the new
    /// spelling and value. The previous value is returned.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(index) => {
                let entry = &mut self.entries[index];
                entry.name = name;
                Some(core::mem::replace(&mut entry.value, value))
            }
            None => {
                self.entries.push(Header { name, value });
                None
            }
        }
    }

    /// Removes `name`, returning its value if it was present.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name)
            .map(|index| self.entries.remove(index).value)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name)
            .map(|index| self.entries[index].value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Applies every entry of `other` on top of `self`, in `other`'s order.
    pub fn merge(&mut self, other: &HeaderMap) {
        for header in other {
            self.insert(header.name.as_str(), header.value.as_str());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Header> {
        self.entries.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|header| header.name.eq_ignore_ascii_case(name))
    }
}

impl<'a> IntoIterator for &'a HeaderMap {
    type Item = &'a Header;
    type IntoIter = core::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for HeaderMap {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.insert(name, value);
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = HeaderMap::new();
        map.extend(iter);
        map
    }
}
