//! Partial-ratio fuzzy matching
//!
//! `partial_ratio(a, b)` aligns the shorter string against every window of
//! the longer one and reports the best similarity, in `[0, 100]`:
//!
//! ```text
//! similarity(s, w) = 200 * LCS(s, w) / (len(s) + len(w))
//! ```
//!
//! Windows are every `len(s)`-character slice of the longer string plus the
//! shorter prefixes and suffixes that hang off either end. Comparison is
//! case-insensitive and character-level. A substring match scores 100; an
//! empty side scores 0.
//!
//! LCS uses the bit-parallel algorithm (Hyyrö 2004): the shorter string is
//! encoded once into per-character bitmasks, and each window costs
//! `O(len(w) * ceil(len(s) / 64))` word operations. A character-count bound
//! skips windows that cannot beat the best score found so far.

use rustc_hash::FxHashMap;

/// Bitmask encoding of the pattern (shorter) string.
#[derive(Debug)]
struct PatternMask {
    len: usize,
    words: usize,
    masks: FxHashMap<char, Vec<u64>>,
}

impl PatternMask {
    fn new(pattern: &[char]) -> Self {
        let words = pattern.len().div_ceil(64);
        let mut masks: FxHashMap<char, Vec<u64>> = FxHashMap::default();
        for (i, &c) in pattern.iter().enumerate() {
            masks.entry(c).or_insert_with(|| vec![0; words])[i / 64] |= 1u64 << (i % 64);
        }
        Self {
            len: pattern.len(),
            words,
            masks,
        }
    }

    /// Length of the longest common subsequence of the pattern and `text`.
    fn lcs(&self, text: &[char]) -> usize {
        let mut v = vec![u64::MAX; self.words];

        for c in text {
            let Some(pm) = self.masks.get(c) else {
                continue;
            };
            let mut carry = 0u64;
            for (vw, &mw) in v.iter_mut().zip(pm) {
                let u = *vw & mw;
                let (sum, c1) = vw.overflowing_add(u);
                let (sum, c2) = sum.overflowing_add(carry);
                carry = u64::from(c1 || c2);
                *vw = sum | (*vw & !u);
            }
        }

        let tail = self.len % 64;
        v.iter()
            .enumerate()
            .map(|(w, &vw)| {
                let mask = if w + 1 == self.words && tail != 0 {
                    (1u64 << tail) - 1
                } else {
                    u64::MAX
                };
                (!vw & mask).count_ones() as usize
            })
            .sum()
    }
}

/// Sliding character multiset of a window, tracking its overlap with the
/// pattern's multiset. `overlap` bounds the LCS from above.
struct WindowCounts<'p> {
    pattern: &'p FxHashMap<char, u32>,
    window: FxHashMap<char, u32>,
    overlap: usize,
}

impl<'p> WindowCounts<'p> {
    fn new(pattern: &'p FxHashMap<char, u32>) -> Self {
        Self {
            pattern,
            window: FxHashMap::default(),
            overlap: 0,
        }
    }

    fn push(&mut self, c: char) {
        let need = self.pattern.get(&c).copied().unwrap_or(0);
        let have = self.window.entry(c).or_insert(0);
        if *have < need {
            self.overlap += 1;
        }
        *have += 1;
    }

    fn pop(&mut self, c: char) {
        let need = self.pattern.get(&c).copied().unwrap_or(0);
        if let Some(have) = self.window.get_mut(&c) {
            *have = have.saturating_sub(1);
            if *have < need {
                self.overlap -= 1;
            }
        }
    }

    fn clear(&mut self) {
        self.window.clear();
        self.overlap = 0;
    }
}

fn similarity(lcs: usize, short_len: usize, window_len: usize) -> f64 {
    200.0 * lcs as f64 / (short_len + window_len) as f64
}

/// Best-window similarity of `a` and `b`, in `[0, 100]`.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let (short, long) = if a.chars().count() <= b.chars().count() {
        (a, b)
    } else {
        (b, a)
    };
    if long.contains(short.as_str()) {
        return 100.0;
    }

    let short: Vec<char> = short.chars().collect();
    let long: Vec<char> = long.chars().collect();
    let (m, n) = (short.len(), long.len());

    let pattern = PatternMask::new(&short);
    let mut need: FxHashMap<char, u32> = FxHashMap::default();
    for &c in &short {
        *need.entry(c).or_insert(0) += 1;
    }

    let mut best = 0.0f64;
    let mut consider = |start: usize, end: usize, overlap: usize| {
        let len = end - start;
        if similarity(overlap, m, len) <= best {
            return;
        }
        let score = similarity(pattern.lcs(&long[start..end]), m, len);
        if score > best {
            best = score;
        }
    };

    let mut counts = WindowCounts::new(&need);

    // Prefix windows long[0..k], k < m, then full windows long[i..i+m].
    for k in 1..m {
        counts.push(long[k - 1]);
        consider(0, k, counts.overlap);
    }
    counts.push(long[m - 1]);
    consider(0, m, counts.overlap);
    for i in 1..=n - m {
        counts.pop(long[i - 1]);
        counts.push(long[i + m - 1]);
        consider(i, i + m, counts.overlap);
    }

    // Suffix windows long[n-k..n], k < m.
    counts.clear();
    for k in 1..m {
        counts.push(long[n - k]);
        consider(n - k, n, counts.overlap);
    }

    best.min(100.0)
}
