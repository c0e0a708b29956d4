//! Patch set identifiers.
//!
//! Review servers exchange patch identifiers either as integers or as one of
//! the fixed tokens `"edit"` and `"PARENT"`. Merge commits additionally refer
//! to their parents with negative integers, where `-1` is the first parent.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token used for the edit pseudo-revision.
pub const EDIT: &str = "edit";
/// Token used for the parent of the first patch set.
pub const PARENT: &str = "PARENT";

/// Error parsing a [`PatchNum`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid patch number '{0}'")]
    Invalid(String),
    #[error("patch number cannot be zero")]
    Zero,
    #[error("patch number '{0}' is out of range")]
    OutOfRange(String),
}

/// Identifies a patch set, or one of the pseudo-revisions a patch set can be
/// compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchNum {
    /// An uploaded patch set, numbered from `1`.
    Patch(u32),
    /// A parent of a merge commit, by its 1-based index.
    MergeParent(u32),
    /// The edit pseudo-revision.
    Edit,
    /// The parent of the change, ie. what the first patch set is based on.
    Parent,
}

impl PatchNum {
    /// Create the identifier of the merge parent at the given 1-based index.
    pub fn merge_parent(index: u32) -> Self {
        Self::MergeParent(index)
    }

    /// Get the patch set number, if this identifies an uploaded patch set.
    pub fn as_patch(&self) -> Option<u32> {
        match self {
            Self::Patch(n) => Some(*n),
            _ => None,
        }
    }

    /// Whether this is the edit pseudo-revision.
    pub fn is_edit(&self) -> bool {
        matches!(self, Self::Edit)
    }

    /// Whether this identifies a merge parent.
    pub fn is_merge_parent(&self) -> bool {
        matches!(self, Self::MergeParent(_))
    }

    /// Get the merge parent index, if this identifies a merge parent.
    pub fn parent_index(&self) -> Option<u32> {
        match self {
            Self::MergeParent(i) => Some(*i),
            _ => None,
        }
    }

    /// Compare two identifiers by their string form.
    pub fn equals(&self, other: &PatchNum) -> bool {
        self.to_string() == other.to_string()
    }
}

impl fmt::Display for PatchNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patch(n) => write!(f, "{n}"),
            Self::MergeParent(i) => write!(f, "-{i}"),
            Self::Edit => f.write_str(EDIT),
            Self::Parent => f.write_str(PARENT),
        }
    }
}

impl FromStr for PatchNum {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            EDIT => return Ok(Self::Edit),
            PARENT => return Ok(Self::Parent),
            _ => {}
        }
        let n = s
            .parse::<i64>()
            .map_err(|_| ParseError::Invalid(s.to_owned()))?;

        Self::try_from(n).map_err(|e| match e {
            ParseError::OutOfRange(_) => ParseError::OutOfRange(s.to_owned()),
            other => other,
        })
    }
}

impl TryFrom<i64> for PatchNum {
    type Error = ParseError;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        let out_of_range = || ParseError::OutOfRange(n.to_string());

        match n {
            0 => Err(ParseError::Zero),
            n if n > 0 => u32::try_from(n).map(Self::Patch).map_err(|_| out_of_range()),
            n => n
                .checked_neg()
                .and_then(|i| u32::try_from(i).ok())
                .map(Self::MergeParent)
                .ok_or_else(out_of_range),
        }
    }
}

impl From<u32> for PatchNum {
    fn from(n: u32) -> Self {
        Self::Patch(n)
    }
}

impl Serialize for PatchNum {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Patch(n) => serializer.serialize_u32(*n),
            Self::MergeParent(i) => serializer.serialize_i64(-i64::from(*i)),
            Self::Edit => serializer.serialize_str(EDIT),
            Self::Parent => serializer.serialize_str(PARENT),
        }
    }
}

impl<'de> Deserialize<'de> for PatchNum {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct PatchNumVisitor;

        impl serde::de::Visitor<'_> for PatchNumVisitor {
            type Value = PatchNum;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a patch set number, '{EDIT}' or '{PARENT}'")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Self::Value, E> {
                PatchNum::try_from(v).map_err(E::custom)
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let v = i64::try_from(v).map_err(E::custom)?;
                PatchNum::try_from(v).map_err(E::custom)
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PatchNumVisitor)
    }
}

/// Compare two patch identifiers of unknown type by their string form.
///
/// `patch_num_equals(2, "2")` holds, as does `patch_num_equals("edit", "edit")`.
pub fn patch_num_equals(a: impl fmt::Display, b: impl fmt::Display) -> bool {
    a.to_string() == b.to_string()
}

/// Whether the given identifier refers to a merge parent, ie. is negative.
pub fn is_merge_parent(n: impl fmt::Display) -> bool {
    n.to_string().starts_with('-')
}

/// Get the 1-based merge parent index from a merge parent identifier, eg.
/// `-3` yields `3`. Returns `None` if the identifier is not numeric.
pub fn parent_index(n: impl fmt::Display) -> Option<i64> {
    n.to_string().parse::<i64>().ok().and_then(i64::checked_neg)
}

/// A pair of patch identifiers being compared, eg. in a diff view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchRange {
    /// The patch set being viewed.
    pub patch_num: PatchNum,
    /// What it is compared against.
    #[serde(default = "PatchRange::default_base")]
    pub base_patch_num: PatchNum,
}

impl PatchRange {
    /// A range viewing `patch_num` against the change parent.
    pub fn new(patch_num: PatchNum) -> Self {
        Self {
            patch_num,
            base_patch_num: PatchNum::Parent,
        }
    }

    /// Compare `patch_num` against the given base.
    pub fn against(self, base_patch_num: PatchNum) -> Self {
        Self {
            base_patch_num,
            ..self
        }
    }

    /// Whether either side of the range is the edit pseudo-revision.
    pub fn has_edit_loaded(&self) -> bool {
        self.patch_num.is_edit() || self.base_patch_num.is_edit()
    }

    /// Whether the base is the change parent or one of its merge parents.
    pub fn is_against_parent(&self) -> bool {
        matches!(
            self.base_patch_num,
            PatchNum::Parent | PatchNum::MergeParent(_)
        )
    }

    fn default_base() -> PatchNum {
        PatchNum::Parent
    }
}
