use alloc::vec::Vec;

/// Prefix sums over per-item extents, with point updates.
///
/// Keeps a plain copy of the values so a point update can be expressed as "set" instead of
/// "add", and so the tree can be rebuilt in `O(n)` when the item count changes.
#[derive(Clone, Debug, Default)]
pub(crate) struct Fenwick {
    values: Vec<u64>,
    tree: Vec<u64>, // 1-indexed
    max_bit: usize,
}

impl Fenwick {
    pub(crate) fn from_values(values: Vec<u64>) -> Self {
        let mut this = Self {
            values,
            tree: Vec::new(),
            max_bit: 0,
        };
        this.rebuild();
        this
    }

    fn rebuild(&mut self) {
        let n = self.values.len();
        self.tree.clear();
        self.tree.resize(n + 1, 0);
        for i in 1..=n {
            self.tree[i] = self.tree[i].saturating_add(self.values[i - 1]);
            let j = i + lsb(i);
            if j <= n {
                self.tree[j] = self.tree[j].saturating_add(self.tree[i]);
            }
        }
        self.max_bit = if n == 0 {
            0
        } else {
            highest_power_of_two_leq(n)
        };
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    pub(crate) fn get(&self, index: usize) -> u64 {
        self.values.get(index).copied().unwrap_or(0)
    }

    /// Grows with `fill(i)` for new indexes, or truncates.
    pub(crate) fn resize_with(&mut self, len: usize, mut fill: impl FnMut(usize) -> u64) {
        let cur = self.values.len();
        if len == cur {
            return;
        }
        if len < cur {
            self.values.truncate(len);
        } else {
            self.values.extend((cur..len).map(&mut fill));
        }
        self.rebuild();
    }

    pub(crate) fn set(&mut self, index: usize, value: u64) {
        let n = self.len();
        if index >= n {
            return;
        }
        let old = self.values[index];
        if old == value {
            return;
        }
        self.values[index] = value;
        let grow = value > old;
        let delta = if grow { value - old } else { old - value };
        let mut i = index + 1;
        while i <= n {
            self.tree[i] = if grow {
                self.tree[i].saturating_add(delta)
            } else {
                debug_assert!(self.tree[i] >= delta, "Fenwick underflow (idx={i})");
                self.tree[i].saturating_sub(delta)
            };
            i += lsb(i);
        }
    }

    /// Sum of the first `count` values.
    pub(crate) fn prefix_sum(&self, count: usize) -> u64 {
        let mut i = count.min(self.len());
        let mut sum = 0u64;
        while i > 0 {
            sum = sum.saturating_add(self.tree[i]);
            i &= i - 1;
        }
        sum
    }

    pub(crate) fn total(&self) -> u64 {
        self.prefix_sum(self.len())
    }

    /// Returns the number of leading values whose running sum stays <= `target`.
    ///
    /// With extents as values, this is the index of the item covering offset `target`
    /// (equal to `len()` past the end).
    pub(crate) fn lower_bound(&self, mut target: u64) -> usize {
        let n = self.len();
        let mut idx = 0usize;
        let mut bit = self.max_bit;
        while bit != 0 {
            let next = idx + bit;
            if next <= n && self.tree[next] <= target {
                target -= self.tree[next];
                idx = next;
            }
            bit >>= 1;
        }
        idx
    }
}

fn lsb(i: usize) -> usize {
    i & i.wrapping_neg()
}

fn highest_power_of_two_leq(n: usize) -> usize {
    let mut p = 1usize;
    while p <= n / 2 {
        p <<= 1;
    }
    p
}
