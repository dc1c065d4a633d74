//! "Did you mean" suggestions for mistyped commands and template handles.

use std::collections::BTreeSet;

/// Fraction of the input length within which the closest match is used directly
const USE_FACTOR: (usize, usize) = (1, 3);

/// Fraction of the input length within which the closest match is only suggested
const SUGGEST_FACTOR: (usize, usize) = (2, 3);

/// What the caller should do with the candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestAction {
    /// Close enough to run with the candidate instead
    Use,
    /// Worth mentioning, but ask the user
    Suggest,
    /// Nothing similar
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Every vocabulary entry at the minimal distance. Ties are all kept;
    /// picking one is left to the caller.
    pub candidates: BTreeSet<String>,
    pub action: SuggestAction,
}

impl Suggestion {
    fn none() -> Self {
        Suggestion {
            candidates: BTreeSet::new(),
            action: SuggestAction::None,
        }
    }

    /// The single candidate, when there is exactly one
    pub fn unique(&self) -> Option<&str> {
        if self.candidates.len() == 1 {
            self.candidates.iter().next().map(String::as_str)
        } else {
            None
        }
    }
}

/// Levenshtein distance between `a` and `b`, counted in characters.
///
/// Full `(|b|+1) x (|a|+1)` table: `table[i][j]` is the distance between
/// the first `i` characters of `b` and the first `j` characters of `a`.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() || b.is_empty() {
        return a.len().max(b.len());
    }

    let mut table = vec![vec![0usize; a.len() + 1]; b.len() + 1];
    for (j, cell) in table[0].iter_mut().enumerate() {
        *cell = j;
    }
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }

    for i in 1..=b.len() {
        for j in 1..=a.len() {
            table[i][j] = if a[j - 1] == b[i - 1] {
                table[i - 1][j - 1]
            } else {
                1 + table[i][j - 1].min(table[i - 1][j]).min(table[i - 1][j - 1])
            };
        }
    }

    table[b.len()][a.len()]
}

/// Find the vocabulary entries closest to `input`.
///
/// With `n` the character length of `input`, a minimal distance of at most
/// `n / 3` yields [`SuggestAction::Use`], at most `2n / 3` yields
/// [`SuggestAction::Suggest`], anything larger yields no candidates.
pub fn suggest<I, S>(input: &str, vocabulary: I) -> Suggestion
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let len = input.chars().count();
    let limit_use = len * USE_FACTOR.0 / USE_FACTOR.1;
    let limit_suggest = len * SUGGEST_FACTOR.0 / SUGGEST_FACTOR.1;

    let mut min_distance = usize::MAX;
    let mut closest = BTreeSet::new();
    for entry in vocabulary {
        let entry = entry.as_ref();
        let distance = edit_distance(input, entry);
        if distance < min_distance {
            min_distance = distance;
            closest.clear();
        }
        if distance == min_distance {
            closest.insert(entry.to_string());
        }
    }

    let action = if closest.is_empty() {
        SuggestAction::None
    } else if min_distance <= limit_use {
        SuggestAction::Use
    } else if min_distance <= limit_suggest {
        SuggestAction::Suggest
    } else {
        SuggestAction::None
    };

    if action == SuggestAction::None {
        return Suggestion::none();
    }

    Suggestion {
        candidates: closest,
        action,
    }
}
