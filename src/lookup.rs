//! Two-state result for data that may legitimately be missing.
//!
//! Most history queries degrade to "no data" instead of failing: a file
//! that was never tracked, a blob that did not exist at a revision, an
//! image that is no longer on disk. `Lookup` keeps that outcome distinct
//! from "present but empty" so callers and tests can tell them apart,
//! even though both collapse to the same value once serialized.

/// The outcome of a query that may find nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<T> {
    /// The query ran and produced a value (which may itself be empty).
    Found(T),
    /// The query failed or its subject does not exist.
    Absent,
}

impl<T> Lookup<T> {
    /// Returns true if nothing was found.
    pub fn is_absent(&self) -> bool {
        matches!(self, Lookup::Absent)
    }

    /// Converts into an `Option`; `Absent` becomes `None`.
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            Lookup::Absent => None,
        }
    }

    /// Maps the found value, leaving `Absent` untouched.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::Absent => Lookup::Absent,
        }
    }
}

impl<T: Default> Lookup<T> {
    /// Returns the found value, or the type's empty value when absent.
    pub fn unwrap_or_default(self) -> T {
        self.found().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Lookup<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Lookup::Found(value),
            None => Lookup::Absent,
        }
    }
}
