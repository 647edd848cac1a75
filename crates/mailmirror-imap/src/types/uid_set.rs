//! UID sets with IMAP range compression.

use std::collections::BTreeSet;

use super::Uid;

/// An ordered set of message UIDs.
///
/// Used for the caller's known-UID baseline, for vanished-UID reporting,
/// and for building IMAP sequence-set strings. Consecutive runs are
/// compressed into `start:end` ranges when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UidSet(BTreeSet<Uid>);

impl UidSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a UID to the set.
    pub fn insert(&mut self, uid: Uid) {
        self.0.insert(uid);
    }

    /// Removes a UID from the set.
    pub fn remove(&mut self, uid: Uid) {
        self.0.remove(&uid);
    }

    /// Returns true if the UID is present.
    #[must_use]
    pub fn contains(&self, uid: Uid) -> bool {
        self.0.contains(&uid)
    }

    /// Returns the number of UIDs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the UIDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Uid> + '_ {
        self.0.iter().copied()
    }

    /// Returns the UIDs present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Self {
        Self(self.0.intersection(&other.0).copied().collect())
    }

    /// Returns the UIDs present in `self` but not in `other`.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        Self(self.0.difference(&other.0).copied().collect())
    }

    /// Returns the UIDs present in either set.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self(self.0.union(&other.0).copied().collect())
    }

    /// Splits the set into subsets of at most `limit` UIDs each.
    ///
    /// Existence probes over large known-UID baselines must be bounded;
    /// callers page through the returned subsets one probe at a time.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is 0.
    #[must_use]
    pub fn chunks(&self, limit: usize) -> Vec<Self> {
        assert!(limit > 0, "chunk limit must be non-zero");
        let mut out = Vec::new();
        let mut current = BTreeSet::new();
        for uid in &self.0 {
            current.insert(*uid);
            if current.len() == limit {
                out.push(Self(std::mem::take(&mut current)));
            }
        }
        if !current.is_empty() {
            out.push(Self(current));
        }
        out
    }

    /// Serializes the set as an IMAP sequence-set string.
    ///
    /// Consecutive UIDs collapse into ranges: `{1, 2, 3, 5}` becomes
    /// `"1:3,5"`. The empty set serializes to an empty string.
    #[must_use]
    pub fn to_imap_set(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        let mut run: Option<(u32, u32)> = None;

        for uid in &self.0 {
            let n = uid.get();
            match run {
                Some((start, end)) if n == end + 1 => run = Some((start, n)),
                Some((start, end)) => {
                    parts.push(format_run(start, end));
                    run = Some((n, n));
                }
                None => run = Some((n, n)),
            }
        }
        if let Some((start, end)) = run {
            parts.push(format_run(start, end));
        }

        parts.join(",")
    }
}

fn format_run(start: u32, end: u32) -> String {
    if start == end {
        format!("{start}")
    } else {
        format!("{start}:{end}")
    }
}

impl std::fmt::Display for UidSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_imap_set())
    }
}

impl FromIterator<Uid> for UidSet {
    fn from_iter<I: IntoIterator<Item = Uid>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Uid> for UidSet {
    fn extend<I: IntoIterator<Item = Uid>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for UidSet {
    type Item = Uid;
    type IntoIter = std::collections::btree_set::IntoIter<Uid>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
