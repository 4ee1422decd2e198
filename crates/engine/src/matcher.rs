//! Subject similarity.
//!
//! Two subjects are "the same" when their partial-ratio score is at least
//! [`SIMILARITY_THRESHOLD`]. Partial ratio aligns the shorter string
//! against every window of the longer one (including windows that hang
//! off either end) and keeps the best normalized indel similarity:
//!
//! ```text
//! ratio(a, b) = 100 * 2 * lcs(a, b) / (len(a) + len(b))
//! ```
//!
//! Comparison is case-insensitive and counts Unicode scalar values.
//! An empty input scores 0 and never matches.

use std::collections::HashMap;

/// Minimum partial-ratio score for two subjects to be considered equal.
pub const SIMILARITY_THRESHOLD: f64 = 80.0;

/// Is `a` similar enough to `b` to be treated as the same subject?
pub fn similar(a: &str, b: &str) -> bool {
    partial_ratio(a, b) >= SIMILARITY_THRESHOLD
}

/// Best-aligned substring similarity on a 0–100 scale.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();

    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    match a.len().cmp(&b.len()) {
        std::cmp::Ordering::Less => best_alignment(&a, &b),
        std::cmp::Ordering::Greater => best_alignment(&b, &a),
        // Equal lengths: alignment is not symmetric, take the better side
        std::cmp::Ordering::Equal => best_alignment(&a, &b).max(best_alignment(&b, &a)),
    }
}

/// Slide `needle` across `haystack` (`needle.len() <= haystack.len()`).
///
/// A window's LCS with the needle can never exceed the size of their
/// character-multiset overlap, so windows whose overlap bound cannot beat
/// the best score so far skip the quadratic LCS.
fn best_alignment(needle: &[char], haystack: &[char]) -> f64 {
    let n = needle.len();
    let m = haystack.len();
    let wanted = char_counts(needle);
    let mut best = 0.0_f64;

    // Full-length windows first; a perfect hit ends the search
    let mut window = Overlap::new(&wanted);
    for &c in &haystack[..n] {
        window.push(c);
    }
    for start in 0..=(m - n) {
        if start > 0 {
            window.pop(haystack[start - 1]);
            window.push(haystack[start + n - 1]);
        }
        if upper_bound(window.common, n, n) <= best {
            continue;
        }
        let score = ratio(needle, &haystack[start..start + n]);
        if score >= 100.0 {
            return 100.0;
        }
        best = best.max(score);
    }

    // Windows entering from the left edge
    let mut window = Overlap::new(&wanted);
    for end in 1..n {
        window.push(haystack[end - 1]);
        if upper_bound(window.common, n, end) > best {
            best = best.max(ratio(needle, &haystack[..end]));
        }
    }

    // Windows leaving past the right edge, grown leftwards from the end
    let mut window = Overlap::new(&wanted);
    for start in ((m - n + 1)..m).rev() {
        window.push(haystack[start]);
        if upper_bound(window.common, n, m - start) > best {
            best = best.max(ratio(needle, &haystack[start..]));
        }
    }

    best
}

/// Highest ratio a window of `len` chars sharing `common` chars could reach.
fn upper_bound(common: usize, needle_len: usize, len: usize) -> f64 {
    200.0 * common as f64 / (needle_len + len) as f64
}

fn char_counts(chars: &[char]) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for &c in chars {
        *counts.entry(c).or_default() += 1;
    }
    counts
}

/// Multiset intersection size between the needle and a sliding window.
struct Overlap<'a> {
    wanted: &'a HashMap<char, usize>,
    seen: HashMap<char, usize>,
    common: usize,
}

impl<'a> Overlap<'a> {
    fn new(wanted: &'a HashMap<char, usize>) -> Self {
        Self {
            wanted,
            seen: HashMap::new(),
            common: 0,
        }
    }

    fn wanted(&self, c: char) -> usize {
        self.wanted.get(&c).copied().unwrap_or(0)
    }

    fn push(&mut self, c: char) {
        let wanted = self.wanted(c);
        let seen = self.seen.entry(c).or_default();
        if *seen < wanted {
            self.common += 1;
        }
        *seen += 1;
    }

    fn pop(&mut self, c: char) {
        let wanted = self.wanted(c);
        if let Some(seen) = self.seen.get_mut(&c) {
            *seen -= 1;
            if *seen < wanted {
                self.common -= 1;
            }
        }
    }
}

/// Normalized indel similarity of two char slices, 0–100.
fn ratio(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 0.0;
    }
    200.0 * lcs_len(a, b) as f64 / total as f64
}

/// Length of the longest common subsequence (two-row DP).
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
