//! "Did you mean" suggestions over a built index.
//!
//! Bounded Damerau-Levenshtein search pruned through the prefix trie: the
//! walk carries one dynamic-programming row per trie node and abandons any
//! branch whose row minimum already exceeds the edit budget. Substitutions
//! between Turkish confusable pairs (i/ı, s/ş, c/ç, o/ö, u/ü, g/ğ) cost
//! half an edit, biasing results toward the corrections a Turkish typist
//! actually intends.
//!
//! The engine holds no state between queries; any number of suggestion
//! queries may run concurrently against the same index.

use super::index::{DictionaryIndex, EntryId};
use super::normalize::{collate, normalize};
use super::trie;

/// Default maximum edit distance for a candidate to qualify.
pub const DEFAULT_EDIT_BUDGET: u32 = 2;
/// Default maximum number of returned suggestions.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 8;

/// Costs are scaled by this factor so confusable substitutions can cost
/// half an edit while staying in integer arithmetic.
const UNIT: u32 = 2;
const CONFUSABLE_COST: u32 = 1;

/// One ranked suggestion for a misspelled input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub candidate: String,
    /// Edit distance to the (normalized) input, in whole edits, rounded up.
    /// Never exceeds the query budget.
    pub distance: u32,
    pub entry_id: EntryId,
}

/// Compute ranked suggestions for `word` with the default budget and limit.
pub fn suggest_default(index: &DictionaryIndex, word: &str) -> Vec<Suggestion> {
    suggest(index, word, DEFAULT_EDIT_BUDGET, DEFAULT_SUGGESTION_LIMIT)
}

/// Compute up to `limit` suggestions within `budget` edits of `word`.
///
/// An empty result is a normal outcome (a correctly spelled but absent
/// word), not a failure. Ties are broken by lower edit distance, then
/// shorter headword, then collation order.
pub fn suggest(
    index: &DictionaryIndex,
    word: &str,
    budget: u32,
    limit: usize,
) -> Vec<Suggestion> {
    if limit == 0 {
        return Vec::new();
    }
    let query: Vec<char> = normalize(word).chars().collect();
    let scaled_budget = budget * UNIT;

    // Row j = scaled cost of turning the first j query chars into the
    // trie path walked so far. At the root the path is empty: j deletions.
    let root_row: Vec<u32> = (0..=query.len() as u32).map(|j| j * UNIT).collect();

    let mut walk = Walk {
        index,
        query: &query,
        scaled_budget,
        path: String::new(),
        found: Vec::new(),
    };
    walk.descend(trie::ROOT, &root_row, None, None);

    let mut found = walk.found;
    found.sort_by(|a, b| {
        a.scaled
            .cmp(&b.scaled)
            .then_with(|| a.candidate.chars().count().cmp(&b.candidate.chars().count()))
            .then_with(|| collate(&a.candidate, &b.candidate))
    });
    found.truncate(limit);

    found
        .into_iter()
        .map(|c| Suggestion {
            candidate: c.candidate,
            distance: (c.scaled + UNIT - 1) / UNIT,
            entry_id: c.entry_id,
        })
        .collect()
}

struct Candidate {
    candidate: String,
    scaled: u32,
    entry_id: EntryId,
}

struct Walk<'a> {
    index: &'a DictionaryIndex,
    query: &'a [char],
    scaled_budget: u32,
    path: String,
    found: Vec<Candidate>,
}

impl<'a> Walk<'a> {
    /// Depth-first descent. `row` is the DP row for the path ending at
    /// `node`; `parent_row` is the row one step up (needed for adjacent
    /// transpositions) and `node_char` the char that led here.
    fn descend(
        &mut self,
        node: usize,
        row: &[u32],
        parent_row: Option<&[u32]>,
        node_char: Option<char>,
    ) {
        let index = self.index;
        let tr = index.trie();

        let end_cost = row[self.query.len()];
        if end_cost <= self.scaled_budget {
            for &id in tr.entries(node) {
                self.found.push(Candidate {
                    candidate: self.path.clone(),
                    scaled: end_cost,
                    entry_id: EntryId(id),
                });
            }
        }

        for &(c, child) in tr.children(node) {
            let next_row = self.advance_row(row, parent_row, node_char, c);
            // Minimum achievable distance in this branch is the row minimum;
            // past the budget, no extension can recover.
            if next_row.iter().min().copied().unwrap_or(u32::MAX) > self.scaled_budget {
                continue;
            }
            self.path.push(c);
            self.descend(child, &next_row, Some(row), Some(c));
            self.path.pop();
        }
    }

    /// Extend a DP row by one path character `c`.
    fn advance_row(
        &self,
        row: &[u32],
        parent_row: Option<&[u32]>,
        prev_char: Option<char>,
        c: char,
    ) -> Vec<u32> {
        let n = self.query.len();
        let mut next = vec![0u32; n + 1];
        next[0] = row[0] + UNIT;
        for j in 1..=n {
            let q = self.query[j - 1];
            let substitute = row[j - 1] + substitution_cost(q, c);
            let insert = row[j] + UNIT;
            let delete = next[j - 1] + UNIT;
            let mut best = substitute.min(insert).min(delete);
            // Adjacent transposition: query ..q[j-2] q[j-1] matches the
            // path's ..c prev_char swapped.
            if j >= 2 {
                if let (Some(parent), Some(prev)) = (parent_row, prev_char) {
                    if self.query[j - 2] == c && q == prev {
                        best = best.min(parent[j - 2] + UNIT);
                    }
                }
            }
            next[j] = best;
        }
        next
    }
}

fn substitution_cost(a: char, b: char) -> u32 {
    if a == b {
        0
    } else if confusable(a, b) {
        CONFUSABLE_COST
    } else {
        UNIT
    }
}

/// Turkish visually/phonetically confusable letter pairs.
fn confusable(a: char, b: char) -> bool {
    const PAIRS: &[(char, char)] = &[
        ('i', 'ı'),
        ('s', 'ş'),
        ('c', 'ç'),
        ('o', 'ö'),
        ('u', 'ü'),
        ('g', 'ğ'),
    ];
    PAIRS
        .iter()
        .any(|&(x, y)| (a == x && b == y) || (a == y && b == x))
}
