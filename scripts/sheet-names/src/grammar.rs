//! Canonical archive filenames:
//! `<TUTOR>_Blatt<NN>_<First-Last>(_<First-Last>)*.<ext>`, where each name
//! token may carry parenthesised alternate spellings, e.g.
//! `MUELLER_Blatt03_Max-Mustermann(Maximilian-Mustermann)_Anna-Schmidt.zip`.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::student::LocalSubmission;

/// Closed set of archive formats, longest suffix first.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["tar.gz", "zip", "tar", "rar"];

// One name word: no separators, parentheses or path characters. Dots are
// allowed for initials such as `J.`.
const WORD: &str = r"[^_\s()/\\-]+";

fn token_pattern() -> String {
    format!(r"{w}(?:-{w})+(?:\({w}(?:-{w})+\))*", w = WORD)
}

static NAME_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{}$", token_pattern())).unwrap());

/// True for a single `first-last(alt-alt)*` token.
pub fn is_name_token(part: &str) -> bool {
    NAME_TOKEN_RE.is_match(part)
}

/// Last path component, or the whole input when there is none.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// Splits `name` into stem and supported archive extension (without the dot).
/// The extension is matched case-insensitively and returned as written.
pub fn split_archive_extension(name: &str) -> Option<(&str, &str)> {
    let lower = name.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.iter().find_map(|ext| {
        let suffix = format!(".{ext}");
        if lower.ends_with(&suffix) && lower.len() > suffix.len() {
            let cut = name.len() - suffix.len();
            Some((&name[..cut], &name[cut + 1..]))
        } else {
            None
        }
    })
}

#[derive(Debug, Clone)]
pub struct FilenameGrammar {
    prefix: String,
    pattern: Regex,
}

impl FilenameGrammar {
    pub fn new(tutor_lastname: &str, sheet_nr: u32) -> Result<Self, regex::Error> {
        let prefix = format!("{}_Blatt{:02}", tutor_lastname.trim().to_uppercase(), sheet_nr);
        let token = token_pattern();
        let pattern = Regex::new(&format!(
            r"^{}_{token}(?:_{token})*\.(?:zip|tar\.gz|tar|rar)$",
            regex::escape(&prefix),
        ))?;
        Ok(FilenameGrammar { prefix, pattern })
    }

    /// `<TUTOR>_Blatt<NN>`
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn is_correct(&self, path: impl AsRef<Path>) -> bool {
        self.pattern.is_match(&basename(path.as_ref()))
    }

    pub fn is_supported_archive(&self, path: impl AsRef<Path>) -> bool {
        split_archive_extension(&basename(path.as_ref())).is_some()
    }

    /// Splits into (correct, incorrect), keeping input order in both.
    pub fn filter_paths(
        &self,
        submissions: Vec<LocalSubmission>,
    ) -> (Vec<LocalSubmission>, Vec<LocalSubmission>) {
        submissions
            .into_iter()
            .partition(|s| self.is_correct(s.path()))
    }

    /// Builds the canonical name from already canonical tokens.
    pub fn compose(&self, tokens: &[String], extension: &str) -> String {
        let mut name = self.prefix.clone();
        for token in tokens {
            name.push('_');
            name.push_str(token);
        }
        name.push('.');
        name.push_str(&extension.to_ascii_lowercase());
        name
    }
}
