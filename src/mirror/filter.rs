use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::input::Category;

/// Which event categories are mirrored and relayed.
///
/// The default mirrors everything; a restricted set such as `key,abs`
/// gives a plain touchscreen passthrough. Synchronization is always kept,
/// since frames only reach readers once their SYN_REPORT does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryFilter {
    allowed: BTreeSet<Category>,
}

impl CategoryFilter {
    pub fn all() -> Self {
        Self {
            allowed: Category::ALL.into_iter().collect(),
        }
    }

    pub fn allows(&self, category: Category) -> bool {
        self.allowed.contains(&category)
    }

    pub fn is_all(&self) -> bool {
        self.allowed.len() == Category::ALL.len()
    }
}

impl Default for CategoryFilter {
    fn default() -> Self {
        Self::all()
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_all() {
            return f.write_str("all");
        }
        let names: Vec<&str> = self.allowed.iter().map(|c| c.name()).collect();
        f.write_str(&names.join(","))
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::all());
        }

        let mut allowed = BTreeSet::new();
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let category = Category::ALL
                .into_iter()
                .find(|c| c.name().eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    format!(
                        "Invalid category '{}'. Valid values: all, key, abs, rel, syn, sw, led, snd, ff, msc",
                        name
                    )
                })?;
            allowed.insert(category);
        }

        if allowed.is_empty() {
            return Err("Category list is empty".into());
        }
        allowed.insert(Category::Sync);
        Ok(Self { allowed })
    }
}
