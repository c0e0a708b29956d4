//! Checking a locally known change against the review server.
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::{fmt, io};

use serde::Serialize;
use thiserror::Error;

use crate::change::{Change, ChangeId, Status};
use crate::sequence;

/// Error checking for change updates.
#[derive(Debug, Error)]
pub enum Error {
    /// The change could not be fetched.
    #[error("failed to fetch change {id}: {err}")]
    Fetch {
        id: ChangeId,
        #[source]
        err: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
    /// The change was not returned, eg. it was deleted or is no longer
    /// visible.
    #[error("change {0} request failed")]
    NotFound(ChangeId),
    /// Either the local or the remote change has no uploaded patch set.
    #[error("unable to check for latest patch set of change {0}")]
    NoLatest(ChangeId),
}

impl Error {
    /// Whether the check may succeed if retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }
}

/// A source of change records, eg. a review server.
pub trait ChangeSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the latest detail of a change. Returns `None` if the change
    /// doesn't exist or can't be seen.
    fn fetch_change_detail(
        &self,
        id: ChangeId,
    ) -> impl Future<Output = Result<Option<Change>, Self::Error>> + Send;
}

/// What changed between a known change and its remote state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Updates {
    /// Whether the known latest patch set is still the latest.
    pub is_latest: bool,
    /// The remote status, if it differs from the known one.
    pub new_status: Option<Status>,
    /// Whether messages were posted since.
    pub new_messages: bool,
}

impl Updates {
    /// Compare a known change against its remote state.
    pub fn between(known: &Change, actual: &Change) -> Result<Self, Error> {
        let known_latest = latest(known)?;
        let actual_latest = latest(actual)?;

        Ok(Self {
            is_latest: actual_latest <= known_latest,
            new_status: (known.status != actual.status).then_some(actual.status),
            new_messages: known.messages.len() < actual.messages.len(),
        })
    }

    /// Whether anything changed.
    pub fn is_stale(&self) -> bool {
        !self.is_latest || self.new_status.is_some() || self.new_messages
    }
}

fn latest(change: &Change) -> Result<u32, Error> {
    sequence::latest_patch_num(&sequence::sequence(Some(change)))
        .and_then(|n| n.as_patch())
        .ok_or(Error::NoLatest(change.id))
}

/// Fetch a change from the source and compare it against the known state.
pub async fn check<S: ChangeSource>(change: &Change, source: &S) -> Result<Updates, Error> {
    let id = change.id;

    log::debug!(target: "patchset", "Checking change {id} for updates..");

    let actual = source
        .fetch_change_detail(id)
        .await
        .map_err(|err| Error::Fetch {
            id,
            err: Box::new(err),
        })?
        .ok_or(Error::NotFound(id))?;
    let updates = Updates::between(change, &actual)?;

    if updates.is_stale() {
        log::info!(target: "patchset", "Change {id} has updates: {updates}");
    }
    Ok(updates)
}

impl fmt::Display for Updates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.is_latest {
            parts.push("new patch set".to_owned());
        }
        if let Some(status) = self.new_status {
            parts.push(format!("status {status}"));
        }
        if self.new_messages {
            parts.push("new messages".to_owned());
        }
        if parts.is_empty() {
            f.write_str("up to date")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// In-memory change source.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    changes: HashMap<ChangeId, Change>,
}

impl MemorySource {
    pub fn insert(&mut self, change: Change) {
        self.changes.insert(change.id, change);
    }
}

impl FromIterator<Change> for MemorySource {
    fn from_iter<T: IntoIterator<Item = Change>>(iter: T) -> Self {
        Self {
            changes: iter.into_iter().map(|c| (c.id, c)).collect(),
        }
    }
}

impl ChangeSource for MemorySource {
    type Error = std::convert::Infallible;

    async fn fetch_change_detail(&self, id: ChangeId) -> Result<Option<Change>, Self::Error> {
        Ok(self.changes.get(&id).cloned())
    }
}

/// Error reading a change from a [`DirSource`].
#[derive(Debug, Error)]
pub enum DirSourceError {
    #[error("i/o error reading {path:?}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: io::Error,
    },
    #[error("invalid change record {path:?}: {err}")]
    Json {
        path: PathBuf,
        #[source]
        err: serde_json::Error,
    },
}

/// Change source backed by a directory of JSON change records, each named
/// after the change id, eg. `4711.json`.
#[derive(Debug, Clone)]
pub struct DirSource {
    path: PathBuf,
}

impl DirSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ChangeSource for DirSource {
    type Error = DirSourceError;

    async fn fetch_change_detail(&self, id: ChangeId) -> Result<Option<Change>, Self::Error> {
        let path = self.path.join(format!("{id}.json"));
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::debug!(target: "patchset", "No record for change {id} in {:?}", self.path);
                return Ok(None);
            }
            Err(err) => return Err(DirSourceError::Io { path, err }),
        };
        let change = serde_json::from_slice(&bytes).map_err(|err| DirSourceError::Json {
            path: path.clone(),
            err,
        })?;

        Ok(Some(change))
    }
}
