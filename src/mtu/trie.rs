//! Prefix trie over normalized headwords.
//!
//! Nodes live in one arena vector and refer to each other by index, the
//! same handle discipline the entry table uses. Children are kept in
//! Turkish collation order so a depth-first walk visits words in the same
//! order as the sorted entry table.

use super::normalize::collation_rank;

/// Index of the root node in the arena.
pub(crate) const ROOT: usize = 0;

#[derive(Debug, Default)]
struct Node {
    /// Child links as `(char, node index)`, sorted by collation rank.
    children: Vec<(char, usize)>,
    /// Ids of entries whose normalized headword ends at this node.
    entries: Vec<u32>,
}

/// Arena-backed prefix trie. Built once, read-only afterwards.
#[derive(Debug)]
pub(crate) struct Trie {
    nodes: Vec<Node>,
}

impl Trie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
        }
    }

    /// Insert a normalized headword pointing at entry id `id`.
    pub fn insert(&mut self, word: &str, id: u32) {
        let mut node = ROOT;
        for c in word.chars() {
            node = self.child_or_insert(node, c);
        }
        self.nodes[node].entries.push(id);
    }

    fn child_or_insert(&mut self, node: usize, c: char) -> usize {
        let rank = collation_rank(c);
        let search = self.nodes[node]
            .children
            .binary_search_by_key(&rank, |&(ch, _)| collation_rank(ch));
        match search {
            Ok(pos) => self.nodes[node].children[pos].1,
            Err(pos) => {
                let next = self.nodes.len();
                self.nodes.push(Node::default());
                self.nodes[node].children.insert(pos, (c, next));
                next
            }
        }
    }

    /// Child links of a node, in collation order.
    pub fn children(&self, node: usize) -> &[(char, usize)] {
        &self.nodes[node].children
    }

    /// Entry ids terminating at a node.
    pub fn entries(&self, node: usize) -> &[u32] {
        &self.nodes[node].entries
    }

    /// Walk down from the root along `word`; `None` if the path leaves the
    /// trie.
    pub fn descend(&self, word: &str) -> Option<usize> {
        let mut node = ROOT;
        for c in word.chars() {
            let rank = collation_rank(c);
            let children = &self.nodes[node].children;
            node = children
                .binary_search_by_key(&rank, |&(ch, _)| collation_rank(ch))
                .ok()
                .map(|pos| children[pos].1)?;
        }
        Some(node)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}
