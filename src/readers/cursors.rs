// src/readers/cursors.rs

//! Implements [`Cursors`], the named read positions of a [`LogFile`].
//!
//! [`LogFile`]: crate::readers::logfile::LogFile

use crate::common::LogFileError;
use crate::data::entry::EntryIndex;

use std::collections::BTreeMap;

#[allow(unused_imports)]
use ::si_trace_print::{defn, defo, defx, defñ};

/// Name of the cursor every [`Cursors`] starts with.
pub const CURSOR_DEFAULT: &str = "default";

/// Position of a cursor: the index of the last `Entry` served, or `None` if
/// nothing has been served yet.
pub type CursorPos = Option<EntryIndex>;

/// The next cache index a cursor at `pos` would serve.
#[inline(always)]
pub const fn cursor_next_index(pos: CursorPos) -> EntryIndex {
    match pos {
        Some(index) => index + 1,
        None => 0,
    }
}

/// Mapping of cursor name to [`CursorPos`].
///
/// Always holds [`CURSOR_DEFAULT`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cursors {
    positions: BTreeMap<String, CursorPos>,
}

impl Default for Cursors {
    fn default() -> Self {
        Self::new()
    }
}

impl Cursors {
    pub fn new() -> Cursors {
        let mut positions = BTreeMap::<String, CursorPos>::new();
        positions.insert(CURSOR_DEFAULT.to_string(), None);

        Cursors { positions }
    }

    /// Add a new unset cursor.
    pub fn register(
        &mut self,
        name: &str,
    ) -> Result<(), LogFileError> {
        if self.positions.contains_key(name) {
            defñ!("{:?} already registered", name);
            return Err(LogFileError::DuplicateCursor(name.to_string()));
        }
        self.positions.insert(name.to_string(), None);
        defñ!("registered {:?}", name);

        Ok(())
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.positions.contains_key(name)
    }

    pub fn get(
        &self,
        name: &str,
    ) -> Result<CursorPos, LogFileError> {
        match self.positions.get(name) {
            Some(pos) => Ok(*pos),
            None => Err(LogFileError::UnknownCursor(name.to_string())),
        }
    }

    pub fn set(
        &mut self,
        name: &str,
        pos: CursorPos,
    ) -> Result<(), LogFileError> {
        match self.positions.get_mut(name) {
            Some(pos_) => {
                *pos_ = pos;
                Ok(())
            }
            None => Err(LogFileError::UnknownCursor(name.to_string())),
        }
    }

    /// Set the cursor to unset.
    pub fn reset(
        &mut self,
        name: &str,
    ) -> Result<(), LogFileError> {
        self.set(name, None)
    }

    /// Set every cursor to unset. Registered names are kept.
    pub fn reset_all(&mut self) {
        for pos in self.positions.values_mut() {
            *pos = None;
        }
    }

    /// Registered cursor names, in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.positions
            .keys()
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Always `false`; the default cursor cannot be removed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
