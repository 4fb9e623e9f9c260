//! Rebuilds a canonical filename from a loosely typed one by identifying the
//! students its fragments refer to.
//!
//! The stem is split on `_` (spaces and commas count as `_`, underscores
//! inside parentheses do not). Each fragment is then
//! - skipped if it contains a digit (sheet numbers, ids),
//! - skipped if it is all upper case (the tutor marker),
//! - kept as is if it already is a `First-Last(Alt-Alt)*` token,
//! - split at its capitals and looked up if it is CamelCase,
//! - otherwise looked up as a single name word.
//!
//! Lookups that hit exactly one student contribute that student's name.
//! Ambiguity and suspicious misses abort the whole correction so the file
//! goes to manual resolution instead of being renamed on a guess.

use log::debug;
use std::path::Path;
use thiserror::Error;

use crate::grammar::{basename, is_name_token, split_archive_extension, FilenameGrammar};
use crate::normalize::capitalize_first;
use crate::roster::StudentLookup;

/// CamelCase candidates longer than this must resolve to a student.
const SPECIFIC_FRAGMENT_LEN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CorrectionError {
    #[error("'{name}' is not a supported archive")]
    UnsupportedContainer { name: String },
    #[error("'{fragment}' matches several students: {}", candidates.join(", "))]
    AmbiguousIdentity {
        fragment: String,
        candidates: Vec<String>,
    },
    #[error("no student matches '{candidate}' (from '{fragment}')")]
    UnresolvedSpecificFragment { fragment: String, candidate: String },
    #[error("no student could be identified")]
    NoIdentifiableTokens,
    #[error("rebuilt name '{name}' is still not canonical")]
    NonCanonicalResult { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correction {
    /// The name was canonical already.
    Unchanged(String),
    Renamed { from: String, to: String },
    Failed { name: String, error: CorrectionError },
}

impl Correction {
    pub fn is_success(&self) -> bool {
        !matches!(self, Correction::Failed { .. })
    }

    /// The resulting name; the original name on failure.
    pub fn name(&self) -> &str {
        match self {
            Correction::Unchanged(name) => name,
            Correction::Renamed { to, .. } => to,
            Correction::Failed { name, .. } => name,
        }
    }

    pub fn error(&self) -> Option<&CorrectionError> {
        match self {
            Correction::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// How a single fragment of the filename is treated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Empty,
    Numbered,
    Marker,
    Token(String),
    /// Space-joined sub-words built at the capital letters.
    Camel(String),
    Word(String),
}

impl Fragment {
    pub fn classify(part: &str) -> Fragment {
        if part.is_empty() {
            Fragment::Empty
        } else if part.chars().any(char::is_numeric) {
            Fragment::Numbered
        } else if is_all_upper(part) {
            Fragment::Marker
        } else if is_name_token(part) {
            Fragment::Token(part.to_string())
        } else if let Some(candidate) = camel_candidate(part) {
            Fragment::Camel(candidate)
        } else {
            Fragment::Word(capitalize_first(part))
        }
    }
}

fn is_all_upper(part: &str) -> bool {
    part.chars().any(char::is_uppercase) && !part.chars().any(char::is_lowercase)
}

/// For every capital after the first, the text left and right of it; the
/// distinct pieces joined by spaces. `None` with fewer than two capitals.
///
/// `AnnaLenaSchmidt` gives `Anna LenaSchmidt AnnaLena Schmidt`.
pub fn camel_candidate(part: &str) -> Option<String> {
    let capitals: Vec<usize> = part
        .char_indices()
        .filter(|(_, c)| c.is_uppercase())
        .map(|(i, _)| i)
        .collect();
    if capitals.len() < 2 {
        return None;
    }
    let mut pieces: Vec<&str> = Vec::new();
    for &at in &capitals[1..] {
        for piece in [&part[..at], &part[at..]] {
            if !pieces.contains(&piece) {
                pieces.push(piece);
            }
        }
    }
    Some(pieces.join(" "))
}

/// Replaces `_` with `-` between a `(` and the next `)`. A `(` without a
/// closing `)` leaves the rest of the text untouched; nesting is not tracked.
pub fn mask_parentheses(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending: Option<String> = None;
    for ch in text.chars() {
        match (ch, pending.as_mut()) {
            ('(', None) => pending = Some(String::from("(")),
            ('(', Some(group)) => group.push('('),
            (')', Some(group)) => {
                out.push_str(&group.replace('_', "-"));
                out.push(')');
                pending = None;
            }
            (_, Some(group)) => group.push(ch),
            (_, None) => out.push(ch),
        }
    }
    if let Some(group) = pending {
        out.push_str(&group);
    }
    out
}

/// Separator normalisation, parenthesis masking and the `_` split of a stem.
pub fn fragments(stem: &str) -> Vec<String> {
    let separated: String = stem
        .chars()
        .map(|c| if c == ' ' || c == ',' { '_' } else { c })
        .collect();
    mask_parentheses(&separated)
        .split('_')
        .map(str::to_string)
        .collect()
}

pub struct Autocorrector<'g> {
    grammar: &'g FilenameGrammar,
}

impl<'g> Autocorrector<'g> {
    pub fn new(grammar: &'g FilenameGrammar) -> Self {
        Autocorrector { grammar }
    }

    pub fn correct<L>(&self, path: &Path, lookup: &L) -> Correction
    where
        L: StudentLookup + ?Sized,
    {
        let name = basename(path);
        if self.grammar.is_correct(&name) {
            return Correction::Unchanged(name);
        }
        match self.rebuild(&name, lookup) {
            Ok(to) => Correction::Renamed { from: name, to },
            Err(error) => Correction::Failed { name, error },
        }
    }

    fn rebuild<L>(&self, name: &str, lookup: &L) -> Result<String, CorrectionError>
    where
        L: StudentLookup + ?Sized,
    {
        let (stem, extension) =
            split_archive_extension(name).ok_or_else(|| CorrectionError::UnsupportedContainer {
                name: name.to_string(),
            })?;

        let mut tokens: Vec<String> = Vec::new();

        for part in fragments(stem) {
            let fragment = Fragment::classify(&part);
            debug!("fragment '{}' -> {:?}", part, fragment);
            match fragment {
                Fragment::Empty | Fragment::Numbered | Fragment::Marker => {}
                Fragment::Token(token) => tokens.push(token),
                Fragment::Camel(candidate) => {
                    let hits = lookup.find_by_name(&candidate);
                    match hits.as_slice() {
                        [student] => push_unique(&mut tokens, student.name.replace(' ', "-")),
                        [] if candidate.chars().count() > SPECIFIC_FRAGMENT_LEN => {
                            return Err(CorrectionError::UnresolvedSpecificFragment {
                                fragment: part,
                                candidate,
                            });
                        }
                        _ => debug!("inconclusive '{}' ({} hits)", candidate, hits.len()),
                    }
                }
                Fragment::Word(word) => {
                    let hits = lookup.find_by_name(&word);
                    match hits.as_slice() {
                        [] => {}
                        [student] => push_unique(&mut tokens, student.name.replace(' ', "-")),
                        _ => {
                            return Err(CorrectionError::AmbiguousIdentity {
                                fragment: part,
                                candidates: hits.iter().map(|s| s.name.clone()).collect(),
                            });
                        }
                    }
                }
            }
        }

        if tokens.is_empty() {
            return Err(CorrectionError::NoIdentifiableTokens);
        }
        tokens.sort_by(|a, b| first_component(a).cmp(first_component(b)));

        let rebuilt = self.grammar.compose(&tokens, extension);
        if !self.grammar.is_correct(&rebuilt) {
            return Err(CorrectionError::NonCanonicalResult { name: rebuilt });
        }
        Ok(rebuilt)
    }
}

fn push_unique(tokens: &mut Vec<String>, token: String) {
    if !tokens.contains(&token) {
        tokens.push(token);
    }
}

fn first_component(token: &str) -> &str {
    token.split('-').next().unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_underscores_inside_parentheses() {
        assert_eq!(mask_parentheses("A-B(C_D)_E"), "A-B(C-D)_E");
        assert_eq!(mask_parentheses("(a_b)_(c_d)"), "(a-b)_(c-d)");
    }

    #[test]
    fn stray_opening_parenthesis_disables_masking() {
        assert_eq!(mask_parentheses("A_B(C_D"), "A_B(C_D");
        assert_eq!(mask_parentheses("A_B)C_D"), "A_B)C_D");
    }

    #[test]
    fn nested_parentheses_close_at_first_closing() {
        assert_eq!(mask_parentheses("((a_b)c_d)"), "((a-b)c_d)");
    }

    #[test]
    fn fragments_split_on_space_comma_and_underscore() {
        assert_eq!(
            fragments("Max Mustermann,Anna_Schmidt(Anna_S)"),
            vec!["Max", "Mustermann", "Anna", "Schmidt(Anna-S)"]
        );
    }

    #[test]
    fn camel_candidates() {
        assert_eq!(camel_candidate("MaxMustermann").as_deref(), Some("Max Mustermann"));
        assert_eq!(
            camel_candidate("AnnaLenaSchmidt").as_deref(),
            Some("Anna LenaSchmidt AnnaLena Schmidt")
        );
        assert_eq!(camel_candidate("Mustermann"), None);
        assert_eq!(camel_candidate("JüRgen").as_deref(), Some("Jü Rgen"));
    }

    #[test]
    fn classification_order() {
        assert_eq!(Fragment::classify("blatt03"), Fragment::Numbered);
        assert_eq!(Fragment::classify("MUELLER"), Fragment::Marker);
        assert_eq!(Fragment::classify("MAX-MUSTER"), Fragment::Marker);
        assert_eq!(
            Fragment::classify("Max-Mustermann"),
            Fragment::Token("Max-Mustermann".into())
        );
        assert_eq!(
            Fragment::classify("MaxMustermann"),
            Fragment::Camel("Max Mustermann".into())
        );
        assert_eq!(Fragment::classify("anna"), Fragment::Word("Anna".into()));
        assert_eq!(Fragment::classify("ANNA2"), Fragment::Numbered);
        assert_eq!(Fragment::classify(""), Fragment::Empty);
    }
}
