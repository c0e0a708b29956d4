//! Chronological ordering of a change's patch sets.
//!
//! Patch sets are ordered newest first. The edit pseudo-revision, if any, is
//! placed right before the patch set it is based on, so that a change with
//! patch sets `1..=3` and an edit on `2` sequences as `3, edit, 2, 1`.
use serde::{Deserialize, Serialize};

use crate::change::{Change, ContentHash, Revision};
use crate::patch::PatchNum;
use crate::wip;

/// Parent number used for ordering when a change has no edit, or when the
/// edit's parent can't be found.
pub const NO_EDIT_PARENT: i64 = -1;

/// A patch set of a change, in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchSet {
    pub num: PatchNum,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    pub sha: ContentHash,
    /// Derived work in progress state. `None` if the message log never
    /// mentions this patch set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wip: Option<bool>,
}

impl From<&Revision> for PatchSet {
    fn from(r: &Revision) -> Self {
        Self {
            num: r.number,
            desc: r.description.clone(),
            sha: r.hash.clone(),
            wip: None,
        }
    }
}

/// Find the revision the edit is based on.
///
/// Returns `None` if there is no edit, and also if the edit's parent is not
/// among the revisions.
pub fn edit_parent<'a, I>(revisions: I) -> Option<&'a Revision>
where
    I: IntoIterator<Item = &'a Revision>,
    I::IntoIter: Clone,
{
    let revisions = revisions.into_iter();
    let edit = revisions.clone().find(|r| r.is_edit())?;
    let base = edit.parent?;
    let parent = revisions.clone().find(|r| r.number == base && !r.is_edit());

    if parent.is_none() {
        log::debug!(
            target: "patchset",
            "Edit {} is based on unknown patch set {base}", edit.hash
        );
    }
    parent
}

/// Get the number of the patch set the edit is based on, or
/// [`NO_EDIT_PARENT`].
pub fn edit_parent_num<'a, I>(revisions: I) -> i64
where
    I: IntoIterator<Item = &'a Revision>,
    I::IntoIter: Clone,
{
    edit_parent(revisions)
        .and_then(|r| r.number.as_patch())
        .map_or(NO_EDIT_PARENT, i64::from)
}

/// Ordering key of a revision. Patch sets map to odd keys (`1, 3, 5, ..`),
/// the edit to twice its parent's number, ie. between its parent and the
/// patch set after it.
fn order_key(num: &PatchNum, edit_parent: i64) -> i64 {
    match num {
        PatchNum::Patch(p) => 2 * (i64::from(*p) - 1) + 1,
        PatchNum::Edit => 2 * edit_parent,
        PatchNum::Parent | PatchNum::MergeParent(_) => 0,
    }
}

/// Sort revisions newest first.
pub fn sort_revisions(revisions: &mut [Revision]) {
    let parent = edit_parent_num(revisions.iter());

    revisions.sort_by_key(|r| std::cmp::Reverse(order_key(&r.number, parent)));
}

/// Sequence a change's revisions into patch sets, without WIP annotation.
/// An absent change has no patch sets.
pub fn sequence(change: Option<&Change>) -> Vec<PatchSet> {
    let Some(change) = change else {
        return Vec::new();
    };
    let parent = edit_parent_num(change.revisions.values());
    let mut revisions = change.revisions.values().collect::<Vec<_>>();

    revisions.sort_by_key(|r| std::cmp::Reverse(order_key(&r.number, parent)));
    revisions.into_iter().map(PatchSet::from).collect()
}

/// Sequence a change's revisions into patch sets, annotated with their
/// derived work in progress state.
pub fn patch_sets(change: Option<&Change>, markers: &wip::Markers) -> Vec<PatchSet> {
    let patch_sets = sequence(change);

    match change {
        Some(change) => wip::annotate(change, patch_sets, markers),
        None => patch_sets,
    }
}

/// Get the latest uploaded patch set number of sequenced patch sets.
///
/// This is the first patch set, unless the first is the edit, in which case
/// it's the second.
pub fn latest_patch_num(patch_sets: &[PatchSet]) -> Option<PatchNum> {
    match patch_sets {
        [] => None,
        [first, rest @ ..] if first.num.is_edit() => rest.first().map(|ps| ps.num),
        [first, ..] => Some(first.num),
    }
}

/// Whether the edit is based on the latest patch set.
pub fn has_edit_based_on_current(patch_sets: &[PatchSet]) -> bool {
    patch_sets.len() >= 2 && patch_sets[0].num.is_edit()
}

/// Get the position of a patch set in sequenced patch sets.
pub fn find_sorted_index(num: &PatchNum, patch_sets: &[PatchSet]) -> Option<usize> {
    patch_sets.iter().position(|ps| ps.num.equals(num))
}

/// Find the revision with the given number.
pub fn revision_by_patch_num<'a, I>(revisions: I, num: &PatchNum) -> Option<&'a Revision>
where
    I: IntoIterator<Item = &'a Revision>,
{
    revisions.into_iter().find(|r| r.number.equals(num))
}

impl Change {
    /// Sequence this change's patch sets. See [`patch_sets`].
    pub fn patch_sets(&self, markers: &wip::Markers) -> Vec<PatchSet> {
        patch_sets(Some(self), markers)
    }

    /// Get the latest uploaded patch set number.
    pub fn latest_patch_num(&self) -> Option<PatchNum> {
        latest_patch_num(&sequence(Some(self)))
    }

    /// Whether this change has an edit based on its latest patch set.
    pub fn has_edit_based_on_current(&self) -> bool {
        has_edit_based_on_current(&sequence(Some(self)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod test {
    use pretty_assertions::assert_eq;
    use qcheck_macros::quickcheck;

    use super::*;
    use crate::change::{ChangeMessage, Status};
    use crate::test::{arbitrary, fixtures};

    fn nums(patch_sets: &[PatchSet]) -> Vec<String> {
        patch_sets.iter().map(|ps| ps.num.to_string()).collect()
    }

    fn change(patches: u32, edit: Option<u32>) -> Change {
        let mut change = Change::new(1, Status::New);
        for n in 1..=patches {
            change = change.revision(Revision::new(format!("{n:040}"), n));
        }
        if let Some(base) = edit {
            change = change.revision(Revision::edit("e".repeat(40), base));
        }
        change
    }

    #[test]
    fn test_sequence_edit() {
        let change = change(3, Some(2));

        assert_eq!(nums(&sequence(Some(&change))), ["3", "edit", "2", "1"]);
    }

    #[test]
    fn test_sequence_edit_on_current() {
        let change = change(3, Some(3));

        assert_eq!(nums(&sequence(Some(&change))), ["edit", "3", "2", "1"]);
    }

    #[test]
    fn test_sequence_dangling_edit() {
        let change = change(3, Some(5));

        assert!(edit_parent(change.revisions.values()).is_none());
        assert_eq!(edit_parent_num(change.revisions.values()), NO_EDIT_PARENT);
        assert_eq!(nums(&sequence(Some(&change))), ["3", "2", "1", "edit"]);
    }

    #[test]
    fn test_sequence_absent() {
        assert!(sequence(None).is_empty());
        assert!(patch_sets(None, &wip::Markers::default()).is_empty());
        assert!(sequence(Some(&change(0, None))).is_empty());
    }

    #[test]
    fn test_sort_revisions() {
        let mut revisions = vec![
            Revision::new("a", 1),
            Revision::edit("e", 1),
            Revision::new("c", 3),
            Revision::new("b", 2),
        ];
        sort_revisions(&mut revisions);

        let hashes = revisions.iter().map(|r| r.hash.as_str()).collect::<Vec<_>>();
        assert_eq!(hashes, ["c", "b", "e", "a"]);
    }

    #[test]
    fn test_edit_parent() {
        let change = change(3, Some(2));
        let parent = edit_parent(change.revisions.values()).unwrap();

        assert_eq!(parent.number, PatchNum::Patch(2));
        assert_eq!(edit_parent_num(change.revisions.values()), 2);
        assert!(edit_parent(self::change(3, None).revisions.values()).is_none());
    }

    #[test]
    fn test_edit_on_merge_parent() {
        let change = change(2, None)
            .revision(Revision::edit("e", 1).with_parent(PatchNum::merge_parent(1)));

        assert!(edit_parent(change.revisions.values()).is_none());
        assert_eq!(nums(&sequence(Some(&change))), ["2", "1", "edit"]);
    }

    #[test]
    fn test_latest_patch_num() {
        let edit = sequence(Some(&change(2, Some(2))));
        assert_eq!(nums(&edit), ["edit", "2", "1"]);
        assert_eq!(latest_patch_num(&edit), Some(PatchNum::Patch(2)));

        let plain = sequence(Some(&change(3, None)));
        assert_eq!(latest_patch_num(&plain), Some(PatchNum::Patch(3)));
        assert_eq!(latest_patch_num(&[]), None);

        let only_edit = vec![PatchSet::from(&Revision::edit("e", 1))];
        assert_eq!(latest_patch_num(&only_edit), None);
    }

    #[test]
    fn test_has_edit_based_on_current() {
        assert!(change(3, Some(3)).has_edit_based_on_current());
        assert!(!change(3, Some(1)).has_edit_based_on_current());
        assert!(!change(3, None).has_edit_based_on_current());

        let only_edit = vec![PatchSet::from(&Revision::edit("e", 1))];
        assert!(!has_edit_based_on_current(&only_edit));
    }

    #[test]
    fn test_find_sorted_index() {
        let patch_sets = sequence(Some(&change(3, Some(2))));

        assert_eq!(find_sorted_index(&PatchNum::Patch(3), &patch_sets), Some(0));
        assert_eq!(find_sorted_index(&PatchNum::Edit, &patch_sets), Some(1));
        assert_eq!(find_sorted_index(&PatchNum::Patch(1), &patch_sets), Some(3));
        assert_eq!(find_sorted_index(&PatchNum::Patch(9), &patch_sets), None);
    }

    #[test]
    fn test_revision_by_patch_num() {
        let change = change(3, Some(2));
        let revs = || change.revisions.values();

        assert_eq!(
            revision_by_patch_num(revs(), &PatchNum::Patch(2)).unwrap().hash,
            format!("{:040}", 2)
        );
        assert!(revision_by_patch_num(revs(), &PatchNum::Edit).unwrap().is_edit());
        assert!(revision_by_patch_num(revs(), &PatchNum::Parent).is_none());
    }

    #[test]
    fn test_patch_sets_from_json() {
        let change = Change::from_json(fixtures::CHANGE_WITH_EDIT).unwrap();
        let patch_sets = change.patch_sets(&wip::Markers::default());

        assert_eq!(
            patch_sets,
            vec![
                PatchSet {
                    num: PatchNum::Patch(3),
                    desc: None,
                    sha: "c300000000000000000000000000000000000000".to_owned(),
                    wip: Some(true),
                },
                PatchSet {
                    num: PatchNum::Edit,
                    desc: None,
                    sha: "ed17000000000000000000000000000000000000".to_owned(),
                    wip: None,
                },
                PatchSet {
                    num: PatchNum::Patch(2),
                    desc: Some("Address comments".to_owned()),
                    sha: "b200000000000000000000000000000000000000".to_owned(),
                    wip: Some(false),
                },
                PatchSet {
                    num: PatchNum::Patch(1),
                    desc: Some("Initial upload".to_owned()),
                    sha: "a100000000000000000000000000000000000000".to_owned(),
                    wip: Some(true),
                },
            ]
        );
        assert_eq!(change.latest_patch_num(), Some(PatchNum::Patch(3)));
        assert!(!change.has_edit_based_on_current());
    }

    #[test]
    fn test_patch_sets_wip() {
        let change = change(2, None)
            .message(ChangeMessage::tagged(wip::TAG_SET_WIP, 1))
            .message(ChangeMessage::tagged(wip::TAG_SET_READY, 2));
        let patch_sets = change.patch_sets(&wip::Markers::default());

        assert_eq!(patch_sets[0].wip, Some(false));
        assert_eq!(patch_sets[1].wip, Some(true));
    }

    #[test]
    fn test_patch_sets_arbitrary() {
        let change = arbitrary::gen::<Change>(8);
        let annotated = change.patch_sets(&wip::Markers::default());
        let plain = sequence(Some(&change));

        assert_eq!(annotated.len(), change.revisions.len());
        assert_eq!(
            annotated.iter().map(|ps| &ps.sha).collect::<Vec<_>>(),
            plain.iter().map(|ps| &ps.sha).collect::<Vec<_>>()
        );
    }

    #[quickcheck]
    fn prop_sorted_descending(change: Change) {
        let patch_sets = sequence(Some(&change));
        let numbers = patch_sets
            .iter()
            .filter_map(|ps| ps.num.as_patch())
            .collect::<Vec<_>>();

        assert_eq!(patch_sets.len(), change.revisions.len());
        assert!(numbers.windows(2).all(|w| w[0] > w[1]), "{numbers:?}");
    }

    #[quickcheck]
    fn prop_edit_follows_parent(change: Change) {
        let patch_sets = sequence(Some(&change));
        let Some(ix) = find_sorted_index(&PatchNum::Edit, &patch_sets) else {
            return;
        };
        match edit_parent(change.revisions.values()) {
            Some(parent) => assert!(patch_sets[ix + 1].num.equals(&parent.number)),
            None => assert_eq!(ix, patch_sets.len() - 1),
        }
    }
}
