//! The in-memory dictionary index: entry table plus lookup structures.
//!
//! A [`DictionaryIndex`] is built once per extraction or artifact load and
//! is read-only afterwards. It owns only immutable data, so it is `Send`
//! and `Sync` by construction and any number of reader threads may query it
//! concurrently without locking. Entries reference each other (synonym
//! groups) through [`EntryId`] handles into the arena-owned entry table
//! rather than structural references, so cyclic groups carry no ownership
//! cycles.

use std::cmp::Ordering;

use log::{debug, info};

use super::error::{MtuError, Result};
use super::normalize::{collate, normalize};
use super::schema::DictionaryKind;
use super::trie::Trie;

/// Stable integer handle of an entry within one index.
///
/// Ids are positions in the collation-sorted entry table, assigned at build
/// time. An id from one index is meaningless in another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(pub u32);

/// The canonical unit after text decoding: one headword with its senses
/// and cross-references. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display form of the headword, original casing preserved.
    pub headword: String,
    /// Turkish-folded form used for lookup and ordering.
    pub normalized: String,
    /// Definitions or translations, in source order.
    pub senses: Vec<String>,
    /// Other members of this entry's synonym group.
    pub cross_refs: Vec<EntryId>,
}

impl Entry {
    /// Construct an entry, deriving the normalized form from the headword.
    pub fn new(headword: impl Into<String>, senses: Vec<String>, cross_refs: Vec<EntryId>) -> Self {
        let headword = headword.into();
        let normalized = normalize(&headword);
        Self {
            headword,
            normalized,
            senses,
            cross_refs,
        }
    }
}

/// Sorted entry table and prefix trie for one dictionary kind.
#[derive(Debug)]
pub struct DictionaryIndex {
    kind: DictionaryKind,
    entries: Vec<Entry>,
    trie: Trie,
}

impl DictionaryIndex {
    /// Build an index from decoded entries.
    ///
    /// Entries are sorted into Turkish collation order (a stable sort, so
    /// duplicate headwords keep source order) and ids are reassigned to the
    /// sorted positions; cross-references are remapped along with them.
    ///
    /// # Errors
    /// [`MtuError::DanglingCrossReference`] if any cross-reference id does
    /// not resolve within the given entries. Dangling references are a
    /// decoding defect and are never dropped or clamped.
    pub fn build(kind: DictionaryKind, entries: Vec<Entry>) -> Result<Self> {
        let len = entries.len() as u32;
        for entry in &entries {
            for &EntryId(id) in &entry.cross_refs {
                if id >= len {
                    return Err(MtuError::DanglingCrossReference { id });
                }
            }
        }

        // Sort entries tagged with their source positions so the
        // cross-reference ids can be remapped to the new order.
        let mut tagged: Vec<(usize, Entry)> = entries.into_iter().enumerate().collect();
        tagged.sort_by(|a, b| collate(&a.1.normalized, &b.1.normalized));
        let mut new_id = vec![0u32; tagged.len()];
        for (pos, &(old, _)) in tagged.iter().enumerate() {
            new_id[old] = pos as u32;
        }

        let mut sorted = Vec::with_capacity(tagged.len());
        for (_, mut entry) in tagged {
            for r in &mut entry.cross_refs {
                *r = EntryId(new_id[r.0 as usize]);
            }
            entry.cross_refs.sort_unstable();
            sorted.push(entry);
        }

        let mut trie = Trie::new();
        for (id, entry) in sorted.iter().enumerate() {
            trie.insert(&entry.normalized, id as u32);
        }
        debug!(
            "Index trie built: {} nodes over {} entries",
            trie.len(),
            sorted.len()
        );
        info!("{} index built: {} entries", kind, sorted.len());

        Ok(Self {
            kind,
            entries: sorted,
            trie,
        })
    }

    pub fn kind(&self) -> DictionaryKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, in collation order. `EntryId(n)` is `entries()[n]`.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Exact lookup by headword, O(log n).
    ///
    /// The query is normalized before comparison, so `exact("KEDİ")` finds
    /// the entry for "kedi". When duplicate headwords exist the first in
    /// source order is returned.
    pub fn exact(&self, word: &str) -> Option<(EntryId, &Entry)> {
        let needle = normalize(word);
        let pos = self
            .entries
            .partition_point(|e| collate(&e.normalized, &needle) == Ordering::Less);
        let entry = self.entries.get(pos)?;
        if entry.normalized == needle {
            Some((EntryId(pos as u32), entry))
        } else {
            None
        }
    }

    /// Entries whose normalized headword starts with `stem`, in collation
    /// order, at most `limit`.
    ///
    /// The returned iterator is lazy: dropping it early does no further
    /// work, and a fresh call restarts the scan.
    pub fn prefix<'a>(&'a self, stem: &str, limit: usize) -> PrefixIter<'a> {
        let stem = normalize(stem);
        let pos = self
            .entries
            .partition_point(|e| collate(&e.normalized, &stem) == Ordering::Less);
        PrefixIter {
            index: self,
            stem,
            pos,
            remaining: limit,
        }
    }

    /// O(1) resolution of a cross-reference handle.
    pub fn by_id(&self, id: EntryId) -> Option<&Entry> {
        self.entries.get(id.0 as usize)
    }

    pub(crate) fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Whether the trie contains `word` (normalized); used by callers that
    /// only need membership, not the entry.
    pub fn contains(&self, word: &str) -> bool {
        self.trie
            .descend(&normalize(word))
            .map(|node| !self.trie.entries(node).is_empty())
            .unwrap_or(false)
    }
}

/// Lazy iterator over a prefix range of the sorted entry table.
#[derive(Debug)]
pub struct PrefixIter<'a> {
    index: &'a DictionaryIndex,
    stem: String,
    pos: usize,
    remaining: usize,
}

impl<'a> Iterator for PrefixIter<'a> {
    type Item = (EntryId, &'a Entry);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.index.entries.get(self.pos)?;
        if !entry.normalized.starts_with(self.stem.as_str()) {
            return None;
        }
        let id = EntryId(self.pos as u32);
        self.pos += 1;
        self.remaining -= 1;
        Some((id, entry))
    }
}

// The index owns only immutable data after build; assert the auto traits
// the concurrency contract depends on.
const _: fn() = || {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<DictionaryIndex>();
};
