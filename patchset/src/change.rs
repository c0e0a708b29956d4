//! Change records, as returned by a review server's change detail endpoint.
use std::collections::BTreeMap;
use std::path::Path;
use std::{fmt, fs, io};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::patch::PatchNum;

/// Content hash of a revision, ie. its commit id.
pub type ContentHash = String;

/// Error loading a change record.
#[derive(Debug, Error)]
pub enum Error {
    #[error("change I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("change JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Numeric identifier of a change on the review server.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ChangeId(u64);

impl ChangeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

impl From<u64> for ChangeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    New,
    Merged,
    Abandoned,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::New => f.write_str("NEW"),
            Self::Merged => f.write_str("MERGED"),
            Self::Abandoned => f.write_str("ABANDONED"),
        }
    }
}

/// One uploaded patch set, or the edit pseudo-revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    /// Commit id. Filled in from the revision map key.
    #[serde(skip)]
    pub hash: ContentHash,
    /// Patch set number, or [`PatchNum::Edit`].
    #[serde(rename = "_number")]
    pub number: PatchNum,
    /// For the edit, the patch set it is based on.
    #[serde(
        rename = "basePatchNum",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent: Option<PatchNum>,
    /// Uploader supplied description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Revision {
    /// Create a new uploaded revision.
    pub fn new(hash: impl Into<ContentHash>, number: u32) -> Self {
        Self {
            hash: hash.into(),
            number: PatchNum::Patch(number),
            parent: None,
            description: None,
        }
    }

    /// Create an edit pseudo-revision based on the given patch set.
    pub fn edit(hash: impl Into<ContentHash>, parent: u32) -> Self {
        Self {
            hash: hash.into(),
            number: PatchNum::Edit,
            parent: Some(PatchNum::Patch(parent)),
            description: None,
        }
    }

    /// Set the revision this one is based on.
    pub fn with_parent(mut self, parent: PatchNum) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Whether this is the edit pseudo-revision.
    pub fn is_edit(&self) -> bool {
        self.number.is_edit()
    }
}

/// Entry of a change's message log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeMessage {
    /// Classifies automated messages, eg. state transitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Patch set that was current when the message was posted.
    #[serde(
        rename = "_revision_number",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub revision: Option<PatchNum>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ChangeMessage {
    pub fn new(revision: u32) -> Self {
        Self {
            tag: None,
            revision: Some(PatchNum::Patch(revision)),
            message: None,
        }
    }

    pub fn tagged(tag: impl Into<String>, revision: u32) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::new(revision)
        }
    }
}

/// A change and its patch sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    #[serde(rename = "_number")]
    pub id: ChangeId,
    pub status: Status,
    /// Whether the change is currently a work in progress.
    #[serde(default)]
    pub work_in_progress: bool,
    /// Revisions keyed by content hash.
    #[serde(default, deserialize_with = "de::revisions")]
    pub revisions: BTreeMap<ContentHash, Revision>,
    /// Message log, in chronological order.
    #[serde(default)]
    pub messages: Vec<ChangeMessage>,
}

impl Change {
    /// Create an empty change.
    pub fn new(id: u64, status: Status) -> Self {
        Self {
            id: ChangeId(id),
            status,
            work_in_progress: false,
            revisions: BTreeMap::new(),
            messages: Vec::new(),
        }
    }

    /// Load a change record from a JSON file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let change = serde_json::from_reader(io::BufReader::new(fs::File::open(path)?))?;

        Ok(change)
    }

    /// Parse a change record from a JSON string.
    pub fn from_json(s: &str) -> Result<Self, Error> {
        serde_json::from_str(s).map_err(Error::from)
    }

    /// Add a revision, keyed by its hash.
    pub fn revision(mut self, revision: Revision) -> Self {
        self.revisions.insert(revision.hash.clone(), revision);
        self
    }

    /// Append a message to the log.
    pub fn message(mut self, message: ChangeMessage) -> Self {
        self.messages.push(message);
        self
    }

    /// Set the work in progress flag.
    pub fn wip(mut self, wip: bool) -> Self {
        self.work_in_progress = wip;
        self
    }
}

mod de {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer};

    use super::{ContentHash, Revision};

    /// Deserialize the revision map, copying each key into its revision.
    pub fn revisions<'de, D>(deserializer: D) -> Result<BTreeMap<ContentHash, Revision>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut revisions = BTreeMap::<ContentHash, Revision>::deserialize(deserializer)?;
        for (hash, revision) in revisions.iter_mut() {
            revision.hash.clone_from(hash);
        }
        Ok(revisions)
    }
}
