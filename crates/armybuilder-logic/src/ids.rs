//! Item identifiers.
//!
//! Item ids are only unique inside their enclosing group. A top-level
//! item is identified by its position in the group (`2`), a conditional
//! child by its parent's position and its own (`"1-0"`). Selections
//! stored in a unit use the composite form `"<groupId>-<scopedId>"`,
//! e.g. `"arcane-items-2"` or `"arcane-items-1-0"`.
//!
//! ```
//! use armybuilder_logic::ids::{CompositeId, ScopedId};
//!
//! let child = ScopedId::Child(1, 0);
//! let id = CompositeId::new("arcane", &child);
//! assert_eq!(id.as_str(), "arcane-1-0");
//! assert_eq!(id.scoped_in("arcane"), Some(child));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position-derived id of an item within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawScopedId", into = "RawScopedId")]
pub enum ScopedId {
    /// A top-level item, by index in the group's item list.
    Top(usize),
    /// A conditional child: (parent index, child index).
    Child(usize, usize),
}

impl ScopedId {
    /// Index of the top-level item this id belongs to.
    pub fn parent_index(&self) -> usize {
        match *self {
            ScopedId::Top(index) => index,
            ScopedId::Child(parent, _) => parent,
        }
    }

    pub fn is_child(&self) -> bool {
        matches!(self, ScopedId::Child(..))
    }

    /// Parse the textual form (`"3"` or `"1-0"`).
    pub fn parse(s: &str) -> Option<Self> {
        match s.split_once('-') {
            None => s.parse().ok().map(ScopedId::Top),
            Some((parent, child)) => {
                Some(ScopedId::Child(parent.parse().ok()?, child.parse().ok()?))
            }
        }
    }
}

impl fmt::Display for ScopedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScopedId::Top(index) => write!(f, "{index}"),
            ScopedId::Child(parent, child) => write!(f, "{parent}-{child}"),
        }
    }
}

/// Wire shape: top-level ids are numbers, child ids are strings.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawScopedId {
    Index(usize),
    Composite(String),
}

impl TryFrom<RawScopedId> for ScopedId {
    type Error = String;

    fn try_from(raw: RawScopedId) -> Result<Self, Self::Error> {
        match raw {
            RawScopedId::Index(index) => Ok(ScopedId::Top(index)),
            RawScopedId::Composite(s) => {
                ScopedId::parse(&s).ok_or_else(|| format!("invalid item id {s:?}"))
            }
        }
    }
}

impl From<ScopedId> for RawScopedId {
    fn from(id: ScopedId) -> Self {
        match id {
            ScopedId::Top(index) => RawScopedId::Index(index),
            child => RawScopedId::Composite(child.to_string()),
        }
    }
}

/// `"<groupId>-<scopedId>"`, the key under which a selection is stored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompositeId(String);

impl CompositeId {
    pub fn new(group_id: &str, scoped: &ScopedId) -> Self {
        Self(format!("{group_id}-{scoped}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Recover the scoped id, given the group the id is expected to live in.
    ///
    /// Group ids may themselves contain `-`, so the group has to be known
    /// up front; splitting blindly is ambiguous.
    pub fn scoped_in(&self, group_id: &str) -> Option<ScopedId> {
        self.0
            .strip_prefix(group_id)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(ScopedId::parse)
    }
}

impl From<&str> for CompositeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CompositeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_level_id_formats_as_index() {
        assert_eq!(ScopedId::Top(7).to_string(), "7");
        assert_eq!(CompositeId::new("talismans", &ScopedId::Top(7)).as_str(), "talismans-7");
    }

    #[test]
    fn child_id_formats_with_parent() {
        assert_eq!(ScopedId::Child(1, 0).to_string(), "1-0");
        assert_eq!(ScopedId::Child(1, 0).parent_index(), 1);
        assert!(ScopedId::Child(1, 0).is_child());
        assert!(!ScopedId::Top(1).is_child());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(ScopedId::parse("x"), None);
        assert_eq!(ScopedId::parse("1-"), None);
        assert_eq!(ScopedId::parse("-1"), None);
        assert_eq!(ScopedId::parse("12"), Some(ScopedId::Top(12)));
    }

    #[test]
    fn scoped_in_handles_hyphenated_groups() {
        let id = CompositeId::new("magic-weapons", &ScopedId::Child(3, 2));
        assert_eq!(id.as_str(), "magic-weapons-3-2");
        assert_eq!(id.scoped_in("magic-weapons"), Some(ScopedId::Child(3, 2)));
        assert_eq!(id.scoped_in("magic"), None);
        assert_eq!(id.scoped_in("talismans"), None);
    }

    #[test]
    fn wire_format_matches_saved_lists() {
        let top = serde_json::to_string(&ScopedId::Top(2)).unwrap();
        let child = serde_json::to_string(&ScopedId::Child(1, 0)).unwrap();
        assert_eq!(top, "2");
        assert_eq!(child, "\"1-0\"");

        let parsed: ScopedId = serde_json::from_str("\"4-1\"").unwrap();
        assert_eq!(parsed, ScopedId::Child(4, 1));
        assert!(serde_json::from_str::<ScopedId>("\"nope\"").is_err());
    }
}
