//! Approximate equality between free-text person names.
//!
//! Two names are considered equal when every token of the shorter name is
//! contained in (or contains) a token of the longer one. Tokens are compared
//! after [`normalize`], so `max` and `MAX` both read `Max`, while containment
//! itself is case-sensitive: `Lena` is not part of `Magdalena`. The relation
//! tolerates abbreviations, prefixes and first/last name reordering. It is
//! not transitive.

use crate::normalize::normalize;

/// How tokens of the shorter name are paired with tokens of the longer one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Each short token needs its own long token (bipartite matching).
    #[default]
    Injective,
    /// Every containing pair is counted and the total must equal the number
    /// of short tokens. A long token may be counted against several short
    /// tokens, and a short token matching twice overshoots the count.
    Legacy,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NameComparator {
    policy: MatchPolicy,
}

impl NameComparator {
    pub fn new(policy: MatchPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MatchPolicy {
        self.policy
    }

    pub fn equal(&self, a: &str, b: &str) -> bool {
        let left = tokens(a);
        let right = tokens(b);
        let (short, long) = if left.len() <= right.len() {
            (&left, &right)
        } else {
            (&right, &left)
        };
        match self.policy {
            MatchPolicy::Injective => injective_match(short, long),
            MatchPolicy::Legacy => legacy_count(short, long) == short.len(),
        }
    }
}

// Normalized, never empty.
fn tokens(name: &str) -> Vec<String> {
    name.split_whitespace()
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

fn related(l: &str, r: &str) -> bool {
    !l.is_empty() && !r.is_empty() && (r.contains(l) || l.contains(r))
}

fn legacy_count(short: &[String], long: &[String]) -> usize {
    short
        .iter()
        .map(|l| long.iter().filter(|r| related(l, r)).count())
        .sum()
}

fn injective_match(short: &[String], long: &[String]) -> bool {
    let adjacency: Vec<Vec<usize>> = short
        .iter()
        .map(|l| {
            long.iter()
                .enumerate()
                .filter(|(_, r)| related(l, r))
                .map(|(j, _)| j)
                .collect()
        })
        .collect();

    let mut owner: Vec<Option<usize>> = vec![None; long.len()];
    for i in 0..short.len() {
        let mut visited = vec![false; long.len()];
        if !augment(i, &adjacency, &mut owner, &mut visited) {
            return false;
        }
    }
    true
}

// Kuhn's augmenting path step: give short token `i` a long token, moving
// earlier claims along if needed.
fn augment(
    i: usize,
    adjacency: &[Vec<usize>],
    owner: &mut [Option<usize>],
    visited: &mut [bool],
) -> bool {
    for &j in &adjacency[i] {
        if visited[j] {
            continue;
        }
        visited[j] = true;
        let free = match owner[j] {
            None => true,
            Some(other) => augment(other, adjacency, owner, visited),
        };
        if free {
            owner[j] = Some(i);
            return true;
        }
    }
    false
}
