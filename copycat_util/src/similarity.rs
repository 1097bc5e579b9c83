//! Ratcliff/Obershelp string similarity.
//!
//! The matching blocks are found by taking the longest common substring of the
//! two inputs and recursing into the fragments on its left and right. The ratio
//! is `2 * M / T`, where `M` is the total size of the blocks and `T` the total
//! number of characters. No junk heuristic and no normalization is applied, so
//! the comparison is case-sensitive.

use std::collections::HashMap;

/// `size` equal characters starting at index `a` of the first input and `b` of the second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Similarity ratio in `[0, 1]`. Two empty strings are identical and score `1.0`.
///
/// The inputs are put in a canonical order before matching, so the score does
/// not depend on argument order.
pub fn similarity(a: &str, b: &str) -> f64 {
    let (a, b) = if a <= b { (a, b) } else { (b, a) };
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched: usize = find_matching_blocks(&a, &b).iter().map(|m| m.size).sum();
    2.0 * matched as f64 / total as f64
}

/// Matching blocks of `a` against `b`, sorted by position, adjacent blocks merged.
/// Indices are character offsets.
pub fn matching_blocks(a: &str, b: &str) -> Vec<MatchingBlock> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    find_matching_blocks(&a, &b)
}

fn find_matching_blocks(a: &[char], b: &[char]) -> Vec<MatchingBlock> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }

    let mut blocks = Vec::new();
    let mut queue = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let m = find_longest_match(a, &b2j, alo, ahi, blo, bhi);
        if m.size == 0 {
            continue;
        }
        if alo < m.a && blo < m.b {
            queue.push((alo, m.a, blo, m.b));
        }
        if m.a + m.size < ahi && m.b + m.size < bhi {
            queue.push((m.a + m.size, ahi, m.b + m.size, bhi));
        }
        blocks.push(m);
    }
    blocks.sort_by_key(|m| (m.a, m.b));

    let mut merged: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
    for m in blocks {
        match merged.last_mut() {
            Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => last.size += m.size,
            _ => merged.push(m),
        }
    }
    merged
}

/// Longest block of `a[alo..ahi]` that also occurs in `b[blo..bhi]`.
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn find_longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> MatchingBlock {
    let mut best = MatchingBlock { a: alo, b: blo, size: 0 };
    // j -> length of the match ending at a[i - 1] and b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();

    for (i, c) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut new_j2len = HashMap::new();
        if let Some(indices) = b2j.get(c) {
            for &j in indices {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let prev = if j > 0 { j2len.get(&(j - 1)).copied().unwrap_or(0) } else { 0 };
                let k = prev + 1;
                new_j2len.insert(j, k);
                if k > best.size {
                    best = MatchingBlock {
                        a: i + 1 - k,
                        b: j + 1 - k,
                        size: k,
                    };
                }
            }
        }
        j2len = new_j2len;
    }
    best
}
