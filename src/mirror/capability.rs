use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::input::{Category, ABS_MAX};

/// Why a code could not be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertError {
    /// The code exceeds the category's maximum.
    OutOfRange { category: Category, code: u16, max: u16 },
    /// The category has no code table (synchronization).
    NoCodeTable(Category),
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::OutOfRange { category, code, max } => {
                write!(f, "{} code {:#x} exceeds maximum {:#x}", category, code, max)
            }
            InsertError::NoCodeTable(category) => write!(f, "{} has no code table", category),
        }
    }
}

/// Supported categories and, per category, the supported codes.
///
/// A category can be present with no codes (synchronization always is).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilitySet {
    entries: BTreeMap<Category, BTreeSet<u16>>,
}

impl CapabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_category(&mut self, category: Category) {
        self.entries.entry(category).or_default();
    }

    /// Record `code` under `category`, rejecting codes past the kernel's
    /// maximum for that category.
    pub fn insert(&mut self, category: Category, code: u16) -> Result<(), InsertError> {
        let max = category.max_code().ok_or(InsertError::NoCodeTable(category))?;
        if code > max {
            return Err(InsertError::OutOfRange { category, code, max });
        }
        self.entries.entry(category).or_default().insert(code);
        Ok(())
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.entries.contains_key(&category)
    }

    pub fn contains(&self, category: Category, code: u16) -> bool {
        self.entries
            .get(&category)
            .is_some_and(|codes| codes.contains(&code))
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.entries.keys().copied()
    }

    /// Codes of `category` in ascending order; empty when absent.
    pub fn codes(&self, category: Category) -> impl Iterator<Item = u16> + '_ {
        self.entries
            .get(&category)
            .into_iter()
            .flat_map(|codes| codes.iter().copied())
    }
}

/// Range metadata of one absolute axis (`struct input_absinfo`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisRange {
    pub minimum: i32,
    pub maximum: i32,
    pub fuzz: i32,
    pub flat: i32,
    pub resolution: i32,
}

impl AxisRange {
    pub fn new(minimum: i32, maximum: i32) -> Self {
        Self {
            minimum,
            maximum,
            ..Self::default()
        }
    }

    /// A range the source did not really report. A maximum of zero is what
    /// the kernel hands back for axes that were never configured.
    pub fn is_unset(&self) -> bool {
        self.maximum == 0
    }
}

/// Axis ranges keyed by absolute-axis code, limited to `0..=ABS_MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisTable {
    ranges: BTreeMap<u16, AxisRange>,
}

impl AxisTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, code: u16, range: AxisRange) -> Result<(), InsertError> {
        if code > ABS_MAX {
            return Err(InsertError::OutOfRange {
                category: Category::Absolute,
                code,
                max: ABS_MAX,
            });
        }
        self.ranges.insert(code, range);
        Ok(())
    }

    pub fn get(&self, code: u16) -> Option<&AxisRange> {
        self.ranges.get(&code)
    }

    /// Range installed for `code`, treating a zero maximum as absent.
    pub fn reported(&self, code: u16) -> Option<&AxisRange> {
        self.get(code).filter(|r| !r.is_unset())
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }
}
