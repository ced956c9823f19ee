#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrieError {
    #[error("character {0:?} is outside 'A'..='Z'")]
    InvalidChar(char),
    #[error("inserting would exceed the capacity of {capacity} nodes")]
    Full { capacity: usize },
}

pub type Result<T> = std::result::Result<T, TrieError>;

const ALPHABET: usize = 26;
const FIRST: u8 = b'A';

fn letter(c: char) -> Result<usize> {
    if c.is_ascii_uppercase() {
        Ok((c as u8 - FIRST) as usize)
    } else {
        Err(TrieError::InvalidChar(c))
    }
}

/// Trie over uppercase ASCII words with a fixed node budget.
///
/// A trie over words of total length L needs at most L + 1 nodes.
#[derive(Debug, Clone)]
pub struct Trie {
    capacity: usize,
    /// Child of each node per letter; 0 means none, since the root is never a child.
    next: Vec<[u32; ALPHABET]>,
    /// Number of inserted words ending at each node.
    ends: Vec<u64>,
    /// Number of inserted words passing through or ending at each node.
    prefixes: Vec<u64>,
}

impl Trie {
    /// An empty trie that may grow to `capacity` nodes, the root included.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.clamp(1, u32::MAX as usize);
        let mut next = Vec::with_capacity(capacity);
        next.push([0; ALPHABET]);
        Self {
            capacity,
            next,
            ends: vec![0],
            prefixes: vec![0],
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Nodes in use, the root included.
    pub fn nodes(&self) -> usize {
        self.next.len()
    }

    /// Number of inserted words, counting duplicates.
    pub fn len(&self) -> u64 {
        self.prefixes[0]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Node reached by `word`, if any.
    fn find(&self, word: &str) -> Result<Option<usize>> {
        let mut node = 0;
        for c in word.chars() {
            match self.next[node][letter(c)?] {
                0 => return Ok(None),
                child => node = child as usize,
            }
        }
        Ok(Some(node))
    }

    /// Insert `word`. Fails without modifying the trie if a character is invalid or
    /// the new nodes would not fit.
    pub fn insert(&mut self, word: &str) -> Result<()> {
        let letters = word.chars().map(letter).collect::<Result<Vec<_>>>()?;

        // Letters already present along the path.
        let mut node = 0;
        let mut depth = 0;
        while let Some(&l) = letters.get(depth) {
            match self.next[node][l] {
                0 => break,
                child => node = child as usize,
            }
            depth += 1;
        }
        if self.next.len() + letters.len() - depth > self.capacity {
            return Err(TrieError::Full {
                capacity: self.capacity,
            });
        }

        let mut node = 0;
        self.prefixes[0] += 1;
        for l in letters {
            if self.next[node][l] == 0 {
                self.next[node][l] = self.next.len() as u32;
                self.next.push([0; ALPHABET]);
                self.ends.push(0);
                self.prefixes.push(0);
            }
            node = self.next[node][l] as usize;
            self.prefixes[node] += 1;
        }
        self.ends[node] += 1;
        Ok(())
    }

    /// Insert every word, stopping at the first failure.
    pub fn insert_all<'a>(&mut self, words: impl IntoIterator<Item = &'a str>) -> Result<()> {
        words.into_iter().try_for_each(|w| self.insert(w))
    }

    pub fn contains(&self, word: &str) -> Result<bool> {
        Ok(self.find(word)?.is_some_and(|node| self.ends[node] > 0))
    }

    /// Number of inserted words, with duplicates, that start with `prefix`.
    pub fn count_prefixes(&self, prefix: &str) -> Result<u64> {
        Ok(self.find(prefix)?.map_or(0, |node| self.prefixes[node]))
    }

    /// Remove every word, keeping the capacity.
    pub fn clear(&mut self) {
        self.next.truncate(1);
        self.next[0] = [0; ALPHABET];
        self.ends = vec![0];
        self.prefixes = vec![0];
    }
}
