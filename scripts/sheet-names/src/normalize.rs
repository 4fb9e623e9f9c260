//! Fixed German diacritic folding used for name comparison.

use unicode_normalization::UnicodeNormalization;

// No entry is a prefix or substring of another, so replacement order does not matter.
const DIACRITICS: &[(char, &str)] = &[
    ('Ö', "Oe"),
    ('Ä', "Ae"),
    ('Ü', "Ue"),
    ('ö', "oe"),
    ('ä', "ae"),
    ('ü', "ue"),
    ('ß', "ss"),
];

/// Folds the umlauts and `ß` to ASCII digraphs, then capitalizes the token
/// (first letter upper case, rest lower case). Other characters pass through.
///
/// Input is NFC-composed first so `u` + combining diaeresis folds like `ü`.
pub fn normalize(token: &str) -> String {
    let mut folded = String::with_capacity(token.len() + 4);
    for ch in token.nfc() {
        match DIACRITICS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => folded.push_str(to),
            None => folded.push(ch),
        }
    }
    capitalize_first(&folded)
}

/// Upper-cases the first character and lower-cases the remainder.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_umlauts_and_sharp_s() {
        assert_eq!(normalize("Müller"), "Mueller");
        assert_eq!(normalize("ÖZTÜRK"), "Oeztuerk");
        assert_eq!(normalize("straße"), "Strasse");
        assert_eq!(normalize("Äpfel"), "Aepfel");
    }

    #[test]
    fn decomposed_umlaut_is_folded() {
        assert_eq!(normalize("Mu\u{308}ller"), "Mueller");
    }

    #[test]
    fn other_diacritics_pass_through() {
        assert_eq!(normalize("josé"), "José");
        assert_eq!(normalize("łukasz"), "Łukasz");
    }

    #[test]
    fn empty_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(capitalize_first(""), "");
    }
}
