use std::hash::Hash;

use fxhash::FxHashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HeapError {
    #[error("item is already in the heap")]
    Duplicate,
    #[error("item is not in the heap")]
    NotFound,
    #[error("new key is larger than the current one")]
    KeyIncrease,
}

pub type Result<T> = std::result::Result<T, HeapError>;

fn parent(i: usize) -> usize {
    (i - 1) / 2
}
fn left(i: usize) -> usize {
    2 * i + 1
}
fn right(i: usize) -> usize {
    2 * i + 2
}

/// Binary min-heap over distinct items.
///
/// Every item's slot is tracked, so `contains` is O(1) and `decrease_key` is O(lg n).
#[derive(Debug, Clone)]
pub struct Heap<T> {
    heap: Vec<T>,
    /// Slot of each item in `heap`.
    pos: FxHashMap<T, usize>,
}

impl<T: Ord + Clone + Hash + Eq> Default for Heap<T> {
    fn default() -> Self {
        Self {
            heap: vec![],
            pos: FxHashMap::default(),
        }
    }
}

impl<T: Ord + Clone + Hash + Eq> Heap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heapify `items` in O(n).
    pub fn from_vec(items: Vec<T>) -> Result<Self> {
        let mut pos = FxHashMap::default();
        for (i, item) in items.iter().enumerate() {
            if pos.insert(item.clone(), i).is_some() {
                return Err(HeapError::Duplicate);
            }
        }
        let mut heap = Self { heap: items, pos };
        for i in (0..heap.len() / 2).rev() {
            heap.sift_down(i);
        }
        Ok(heap)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn contains(&self, item: &T) -> bool {
        self.pos.contains_key(item)
    }

    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn push(&mut self, item: T) -> Result<()> {
        if self.pos.contains_key(&item) {
            return Err(HeapError::Duplicate);
        }
        let i = self.heap.len();
        self.pos.insert(item.clone(), i);
        self.heap.push(item);
        self.sift_up(i);
        Ok(())
    }

    /// Remove and return the smallest item.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.swap(0, last);
        let min = self.heap.pop()?;
        self.pos.remove(&min);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    /// Replace `item` by the smaller-or-equal `key`.
    pub fn decrease_key(&mut self, item: &T, key: T) -> Result<()> {
        let &i = self.pos.get(item).ok_or(HeapError::NotFound)?;
        if key > *item {
            return Err(HeapError::KeyIncrease);
        }
        if key == *item {
            return Ok(());
        }
        if self.pos.contains_key(&key) {
            return Err(HeapError::Duplicate);
        }
        self.pos.remove(item);
        self.pos.insert(key.clone(), i);
        self.heap[i] = key;
        self.sift_up(i);
        Ok(())
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.pos.insert(self.heap[i].clone(), i);
        self.pos.insert(self.heap[j].clone(), j);
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 0 && self.heap[parent(i)] > self.heap[i] {
            self.swap(i, parent(i));
            i = parent(i);
        }
    }

    /// Make the subtree rooted at `i` a min-heap, given that both child subtrees are.
    fn sift_down(&mut self, mut i: usize) {
        loop {
            let (l, r) = (left(i), right(i));
            let mut smallest = i;
            if l < self.heap.len() && self.heap[l] < self.heap[smallest] {
                smallest = l;
            }
            if r < self.heap.len() && self.heap[r] < self.heap[smallest] {
                smallest = r;
            }
            if smallest == i {
                return;
            }
            self.swap(i, smallest);
            i = smallest;
        }
    }
}
