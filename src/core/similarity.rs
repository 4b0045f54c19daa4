use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};

/// Normalize a free-text field for equality comparison: trim and case-fold.
///
/// Blank input normalizes to the empty string, and two blank fields therefore
/// compare equal. Reports are validated non-empty before they reach the
/// engine, so this only surfaces with synthetic data.
pub fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Absolute whole-day gap between two timestamps.
///
/// Returns `None` when either side is unknown; gap-based rules must then
/// evaluate as not satisfied rather than assume a gap of zero. Truncation is
/// symmetric: a 23-hour gap is 0 days regardless of which side is earlier.
pub fn time_gap_days(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Option<i64> {
    match (a, b) {
        (Some(a), Some(b)) => Some((a - b).num_days().abs()),
        _ => None,
    }
}

/// Ratcliff/Obershelp similarity ratio over case-folded characters.
///
/// `2 * matched / (len(a) + len(b))` where `matched` sums the lengths of the
/// recursively-found longest matching blocks. 1.0 for identical strings
/// (including two empty ones), 0.0 for fully disjoint ones.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.to_lowercase().chars().collect();
    let b: Vec<char> = b.to_lowercase().chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    2.0 * matching_chars(&a, &b) as f64 / total as f64
}

/// Total length of the longest matching blocks between `a` and `b`, found by
/// locating the longest common block and recursing on both sides of it.
fn matching_chars(a: &[char], b: &[char]) -> usize {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, &ch) in b.iter().enumerate() {
        b2j.entry(ch).or_default().push(j);
    }

    let mut matched = 0;
    let mut regions = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = regions.pop() {
        let (i, j, size) = longest_match(a, &b2j, alo, ahi, blo, bhi);
        if size > 0 {
            matched += size;
            regions.push((alo, i, blo, j));
            regions.push((i + size, ahi, j + size, bhi));
        }
    }
    matched
}

/// Longest block `a[i..i+size] == b[j..j+size]` within the given window,
/// preferring the earliest such block on ties.
fn longest_match(
    a: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    // j2len[j] = length of the longest block ending at a[i], b[j]
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for (i, ch) in a.iter().enumerate().take(ahi).skip(alo) {
        let mut next_j2len: HashMap<usize, usize> = HashMap::new();
        if let Some(indices) = b2j.get(ch) {
            for &j in indices {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let k = if j == 0 {
                    1
                } else {
                    j2len.get(&(j - 1)).copied().unwrap_or(0) + 1
                };
                next_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next_j2len;
    }
    (best_i, best_j, best_size)
}

/// Number of keyword tokens shared by two descriptions.
pub fn keyword_overlap(a: &str, b: &str) -> usize {
    tokenize(a).intersection(&tokenize(b)).count()
}

/// Split a description into a keyword set without a dictionary segmenter.
///
/// Maximal CJK runs and maximal ASCII alphanumeric runs each become one
/// token; every contiguous substring (length 2–6) of a CJK run is added as
/// well, so multi-character fragments like 电脑 inside a longer run still
/// count as shared keywords.
fn tokenize(text: &str) -> HashSet<String> {
    let text = text.to_lowercase();
    let mut tokens = HashSet::new();
    let mut cjk_run: Vec<char> = Vec::new();
    let mut alnum_run = String::new();

    let flush_cjk = |run: &mut Vec<char>, tokens: &mut HashSet<String>| {
        if run.is_empty() {
            return;
        }
        tokens.insert(run.iter().collect());
        let max_len = run.len().min(6);
        for start in 0..run.len() {
            for len in 2..=max_len {
                if start + len <= run.len() {
                    tokens.insert(run[start..start + len].iter().collect());
                }
            }
        }
        run.clear();
    };

    for ch in text.chars() {
        if is_cjk(ch) {
            if !alnum_run.is_empty() {
                tokens.insert(std::mem::take(&mut alnum_run));
            }
            cjk_run.push(ch);
        } else if ch.is_ascii_alphanumeric() {
            flush_cjk(&mut cjk_run, &mut tokens);
            alnum_run.push(ch);
        } else {
            flush_cjk(&mut cjk_run, &mut tokens);
            if !alnum_run.is_empty() {
                tokens.insert(std::mem::take(&mut alnum_run));
            }
        }
    }
    flush_cjk(&mut cjk_run, &mut tokens);
    if !alnum_run.is_empty() {
        tokens.insert(alnum_run);
    }
    tokens
}

#[inline]
fn is_cjk(ch: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&ch)
}
