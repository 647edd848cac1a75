//! Three-way classification of a raw delta against the known baseline.

use mailmirror_imap::{MailboxDelta, SyncOptions, UidSet};

/// The classified, disjoint view of one delta.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    /// UIDs to fetch in full and insert.
    pub new: UidSet,
    /// UIDs whose flags need refreshing.
    pub changed: UidSet,
    /// UIDs to delete locally.
    pub vanished: UidSet,
}

/// Classifies a raw delta against the caller's known-UID baseline.
///
/// The remote's sets may overlap when the mailbox mutated during the
/// sync window; the output sets never do:
///
/// - vanished wins over changed: a message flagged and then expunged
///   between checkpoints is removed, not updated-then-kept;
/// - vanished is restricted to the baseline: only a UID we actually
///   hold can vanish;
/// - a "changed" UID the baseline never saw is reclassified as new:
///   the cache missed its birth, so a full fetch is the safe repair;
/// - a UID both new and expunged within the window is dropped
///   entirely: nothing locally observable happened.
#[must_use]
pub fn classify(delta: &MailboxDelta, known: &UidSet) -> Classified {
    let vanished = delta.vanished_uids.intersection(known);
    let unseen_changed = delta.changed_uids.difference(known);
    let new = delta
        .new_uids
        .union(&unseen_changed)
        .difference(known)
        .difference(&delta.vanished_uids);
    let changed = delta.changed_uids.intersection(known).difference(&vanished);

    Classified {
        new,
        changed,
        vanished,
    }
}

impl Classified {
    /// Drops the classes the caller did not ask for.
    #[must_use]
    pub fn restrict(mut self, options: &SyncOptions) -> Self {
        if !options.new_messages {
            self.new = UidSet::new();
        }
        if !options.flag_updates {
            self.changed = UidSet::new();
        }
        if !options.vanished {
            self.vanished = UidSet::new();
        }
        self
    }

    /// Returns true if no class carries any UID.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.new.is_empty() && self.changed.is_empty() && self.vanished.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mailmirror_imap::{ModSeq, SyncToken, Uid, UidValidity};
    use proptest::prelude::*;

    use super::*;

    fn uids(values: &[u32]) -> UidSet {
        values.iter().map(|n| Uid::new(*n).unwrap()).collect()
    }

    fn delta(new: &[u32], changed: &[u32], vanished: &[u32]) -> MailboxDelta {
        MailboxDelta {
            new_uids: uids(new),
            changed_uids: uids(changed),
            vanished_uids: uids(vanished),
            token: SyncToken::new(
                UidValidity::new(1).unwrap(),
                ModSeq::from_u64(1).unwrap(),
            ),
        }
    }

    #[test]
    fn empty_delta_classifies_empty() {
        let result = classify(&delta(&[], &[], &[]), &uids(&[1, 2]));
        assert!(result.is_empty());
    }

    #[test]
    fn plain_classes_pass_through() {
        let result = classify(&delta(&[10], &[2], &[1]), &uids(&[1, 2, 3]));
        assert_eq!(result.new, uids(&[10]));
        assert_eq!(result.changed, uids(&[2]));
        assert_eq!(result.vanished, uids(&[1]));
    }

    #[test]
    fn vanished_wins_over_changed() {
        let result = classify(&delta(&[], &[5], &[5]), &uids(&[5]));
        assert!(result.changed.is_empty());
        assert_eq!(result.vanished, uids(&[5]));
    }

    #[test]
    fn vanished_restricted_to_baseline() {
        let result = classify(&delta(&[], &[], &[5, 6]), &uids(&[5]));
        assert_eq!(result.vanished, uids(&[5]));
    }

    #[test]
    fn unseen_changed_reclassifies_as_new() {
        let result = classify(&delta(&[], &[9], &[]), &uids(&[1]));
        assert_eq!(result.new, uids(&[9]));
        assert!(result.changed.is_empty());
    }

    #[test]
    fn born_and_expunged_in_window_is_dropped() {
        let result = classify(&delta(&[9], &[], &[9]), &uids(&[1]));
        assert!(result.new.is_empty());
        assert!(result.vanished.is_empty());
    }

    #[test]
    fn known_uid_reported_new_is_not_duplicated() {
        let result = classify(&delta(&[2], &[], &[]), &uids(&[1, 2]));
        assert!(result.new.is_empty());
    }

    #[test]
    fn restrict_drops_disabled_classes() {
        let options = SyncOptions {
            new_messages: false,
            flag_updates: true,
            vanished: false,
            ..SyncOptions::default()
        };
        let result = classify(&delta(&[10], &[2], &[1]), &uids(&[1, 2])).restrict(&options);
        assert!(result.new.is_empty());
        assert_eq!(result.changed, uids(&[2]));
        assert!(result.vanished.is_empty());
    }

    fn arb_uid_set() -> impl Strategy<Value = UidSet> {
        prop::collection::btree_set(1u32..200, 0..40)
            .prop_map(|values| values.into_iter().filter_map(Uid::new).collect())
    }

    proptest! {
        #[test]
        fn classes_are_pairwise_disjoint(
            new in arb_uid_set(),
            changed in arb_uid_set(),
            vanished in arb_uid_set(),
            known in arb_uid_set(),
        ) {
            let raw = MailboxDelta {
                new_uids: new,
                changed_uids: changed,
                vanished_uids: vanished,
                token: SyncToken::new(
                    UidValidity::new(1).unwrap(),
                    ModSeq::from_u64(1).unwrap(),
                ),
            };
            let result = classify(&raw, &known);

            prop_assert!(result.new.intersection(&result.changed).is_empty());
            prop_assert!(result.new.intersection(&result.vanished).is_empty());
            prop_assert!(result.changed.intersection(&result.vanished).is_empty());
        }

        #[test]
        fn vanished_and_changed_stay_within_baseline(
            changed in arb_uid_set(),
            vanished in arb_uid_set(),
            known in arb_uid_set(),
        ) {
            let raw = MailboxDelta {
                new_uids: UidSet::new(),
                changed_uids: changed,
                vanished_uids: vanished,
                token: SyncToken::new(
                    UidValidity::new(1).unwrap(),
                    ModSeq::from_u64(1).unwrap(),
                ),
            };
            let result = classify(&raw, &known);

            prop_assert!(result.vanished.difference(&known).is_empty());
            prop_assert!(result.changed.difference(&known).is_empty());
            prop_assert!(result.new.intersection(&known).is_empty());
        }

        #[test]
        fn empty_baseline_never_vanishes(
            new in arb_uid_set(),
            changed in arb_uid_set(),
            vanished in arb_uid_set(),
        ) {
            let raw = MailboxDelta {
                new_uids: new,
                changed_uids: changed,
                vanished_uids: vanished,
                token: SyncToken::new(
                    UidValidity::new(1).unwrap(),
                    ModSeq::from_u64(1).unwrap(),
                ),
            };
            let result = classify(&raw, &UidSet::new());

            prop_assert!(result.vanished.is_empty());
            prop_assert!(result.changed.is_empty());
        }
    }
}
