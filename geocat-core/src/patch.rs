// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// Partial update of a single field.
///
/// Distinguishes between "leave the field as it is" and "replace it with this value". For
/// nullable fields use `Patch<Option<T>>`, then `Set(None)` clears the value while `Keep` does not
/// touch it.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Patch<T> {
    #[default]
    Keep,
    Set(T),
}

impl<T> Patch<T> {
    pub fn is_set(&self) -> bool {
        matches!(self, Patch::Set(_))
    }

    /// Returns the new value if set, otherwise the given current one.
    pub fn or<'a>(&'a self, current: &'a T) -> &'a T {
        match self {
            Patch::Keep => current,
            Patch::Set(value) => value,
        }
    }

    /// Writes the new value into `target` if set. Returns `true` if a change was applied.
    pub fn apply(self, target: &mut T) -> bool {
        match self {
            Patch::Keep => false,
            Patch::Set(value) => {
                *target = value;
                true
            }
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Patch::Set(value),
            None => Patch::Keep,
        }
    }
}
