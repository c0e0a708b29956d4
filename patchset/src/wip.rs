//! Work in progress state of individual patch sets.
//!
//! A change's WIP state is toggled by tagged, automatically generated log
//! messages. The state of each patch set is derived from the messages posted
//! while it was current.
use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::change::Change;
use crate::patch::PatchNum;
use crate::sequence::PatchSet;

/// Tag of the message posted when a change is marked as work in progress.
pub const TAG_SET_WIP: &str = "autogenerated:gerrit:setWorkInProgress";
/// Tag of the message posted when a change is marked as ready for review.
pub const TAG_SET_READY: &str = "autogenerated:gerrit:setReadyForReview";
/// Tag of the message posted when a work in progress patch set is uploaded.
pub const TAG_NEW_WIP_PATCHSET: &str = "autogenerated:gerrit:newWipPatchSet";
/// Tag of the message posted when a patch set is uploaded for review.
pub const TAG_NEW_PATCHSET: &str = "autogenerated:gerrit:newPatchSet";

/// Message tags that move a change in and out of work in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Markers {
    /// Tags that mark a change as work in progress.
    #[serde(default = "Markers::default_to_wip")]
    pub to_wip: BTreeSet<String>,
    /// Tags that mark a change as ready for review.
    #[serde(default = "Markers::default_to_ready")]
    pub to_ready: BTreeSet<String>,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            to_wip: Self::default_to_wip(),
            to_ready: Self::default_to_ready(),
        }
    }
}

impl Markers {
    /// Markers matching exactly one tag in each direction.
    pub fn new(to_wip: impl Into<String>, to_ready: impl Into<String>) -> Self {
        Self {
            to_wip: BTreeSet::from([to_wip.into()]),
            to_ready: BTreeSet::from([to_ready.into()]),
        }
    }

    /// Apply a message tag to the running state.
    pub fn apply(&self, tag: Option<&str>, wip: bool) -> bool {
        match tag {
            Some(t) if self.to_wip.contains(t) => true,
            Some(t) if self.to_ready.contains(t) => false,
            _ => wip,
        }
    }

    fn default_to_wip() -> BTreeSet<String> {
        BTreeSet::from([TAG_SET_WIP.to_owned(), TAG_NEW_WIP_PATCHSET.to_owned()])
    }

    fn default_to_ready() -> BTreeSet<String> {
        BTreeSet::from([TAG_SET_READY.to_owned(), TAG_NEW_PATCHSET.to_owned()])
    }
}

/// Derive the WIP state of each patch set mentioned in the change's message
/// log.
///
/// The log is scanned once, front to back, with the running state seeded from
/// the change's current WIP flag. After each message the running state is
/// recorded for the message's patch set, unless `false` was already recorded
/// for it: once a patch set has been seen as ready, it stays ready.
pub fn derive(change: &Change, markers: &Markers) -> HashMap<String, bool> {
    let mut states = HashMap::new();
    let mut wip = change.work_in_progress;

    for msg in &change.messages {
        wip = markers.apply(msg.tag.as_deref(), wip);

        let Some(revision) = msg.revision else {
            continue;
        };
        let key = revision.to_string();

        if states.get(&key) != Some(&false) {
            log::trace!(target: "patchset", "Recording wip={wip} for patch set {key}");
            states.insert(key, wip);
        }
    }
    states
}

/// Annotate sequenced patch sets with their derived WIP state.
///
/// Patch sets not mentioned in the message log are left unannotated.
pub fn annotate(change: &Change, patch_sets: Vec<PatchSet>, markers: &Markers) -> Vec<PatchSet> {
    if change.messages.is_empty() {
        return patch_sets;
    }
    let states = derive(change, markers);

    patch_sets
        .into_iter()
        .map(|ps| PatchSet {
            wip: states.get(&ps.num.to_string()).copied(),
            ..ps
        })
        .collect()
}

/// Get the derived WIP state of one patch set.
pub fn state(change: &Change, num: PatchNum, markers: &Markers) -> Option<bool> {
    derive(change, markers).get(&num.to_string()).copied()
}
