//! Stable indexing for solver integration.
//!
//! Provides a bidirectional mapping between caller-facing names (zones,
//! surfaces) and contiguous solver indices (0..N). Built once per solve so
//! matrix assembly never looks up strings in its inner loops.

use std::collections::HashMap;

use crate::{HlError, HlResult};

/// Index map providing stable, contiguous indices for named entities.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    /// Contiguous list of names (index -> name).
    names: Vec<String>,

    /// Reverse lookup: name -> index.
    name_to_idx: HashMap<String, usize>,
}

impl NameIndex {
    /// Build an index from an ordered list of names.
    ///
    /// Fails on duplicates: two entities with the same name would share a
    /// matrix row.
    pub fn from_names<I, S>(names: I) -> HlResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = Self::default();
        for name in names {
            let name = name.into();
            if index.name_to_idx.contains_key(&name) {
                return Err(HlError::InvalidArg {
                    what: "duplicate name in index",
                });
            }
            index.name_to_idx.insert(name.clone(), index.names.len());
            index.names.push(name);
        }
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Get the contiguous index for a name.
    pub fn idx(&self, name: &str) -> Option<usize> {
        self.name_to_idx.get(name).copied()
    }

    /// Get the name for a contiguous index.
    pub fn name(&self, i: usize) -> HlResult<&str> {
        self.names
            .get(i)
            .map(String::as_str)
            .ok_or(HlError::IndexOob {
                what: "NameIndex",
                index: i,
                len: self.names.len(),
            })
    }

    /// All names in index order.
    pub fn names(&self) -> &[String] {
        &self.names
    }
}
