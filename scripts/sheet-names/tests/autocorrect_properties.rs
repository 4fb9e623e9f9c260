use std::path::Path;

use sheet_names::{
    Autocorrector, Correction, CorrectionError, FilenameGrammar, NameComparator, Roster, Student,
    StudentLookup,
};

fn grammar() -> FilenameGrammar {
    FilenameGrammar::new("Mueller", 3).expect("grammar")
}

fn anna_roster() -> Roster {
    Roster::new(vec![
        Student::new("Anna Schmidt", "a@x"),
        Student::new("Anna Schneider", "b@x"),
    ])
}

fn correct(name: &str, roster: &Roster) -> Correction {
    let g = grammar();
    Autocorrector::new(&g).correct(Path::new(name), roster)
}

#[test]
fn canonical_names_are_returned_unchanged() {
    let g = grammar();
    let roster = anna_roster();
    for name in [
        "MUELLER_Blatt03_Max-Mustermann.zip",
        "MUELLER_Blatt03_Anna-Schmidt_Zoe-Zander.tar.gz",
        "MUELLER_Blatt03_Max-Mustermann(Maximilian-Mustermann).rar",
    ] {
        assert!(g.is_correct(name));
        let result = Autocorrector::new(&g).correct(Path::new(name), &roster);
        assert_eq!(result, Correction::Unchanged(name.to_string()));
    }
}

#[test]
fn substring_names_compare_equal() {
    let cmp = NameComparator::default();
    let pairs = [
        ("Max", "Max Mustermann"),
        ("muster", "Max Mustermann"),
        ("Max Mustermann", "Max Mustermann"),
        ("ma Must", "Max Mustermann"),
        ("Jürgen", "Juergen Klein"),
    ];
    for (a, b) in pairs {
        assert!(cmp.equal(a, b), "{a} vs {b}");
        assert!(cmp.equal(b, a), "{b} vs {a}");
    }
    assert!(cmp.equal("Max Müller", "Max Mueller"));
    assert!(cmp.equal("", "Anything"));
}

#[test]
fn fragments_do_not_match_inside_other_names() {
    let cmp = NameComparator::default();
    assert!(!cmp.equal("Lena", "Magdalena Weber"));
    assert!(!cmp.equal("ax", "Max"));

    let roster = Roster::new(vec![
        Student::new("Max Mustermann", "m@x"),
        Student::new("Magdalena Weber", "w@x"),
    ]);
    assert_eq!(
        correct("Max-Mustermann_lena.zip", &roster).name(),
        "MUELLER_Blatt03_Max-Mustermann.zip"
    );
    assert!(roster.find_by_name("lena").is_empty());

    let roster = Roster::new(vec![
        Student::new("Anna Schmidt", "a@x"),
        Student::new("Johanna Berg", "j@x"),
    ]);
    assert_eq!(
        correct("anna.zip", &roster).name(),
        "MUELLER_Blatt03_Anna-Schmidt.zip"
    );
}

#[test]
fn camel_case_fragment_with_single_hit_is_accepted() {
    let roster = anna_roster();
    assert_eq!(roster.find_by_name("Anna Schmidt").len(), 1);
    assert_eq!(
        correct("AnnaSchmidt.zip", &roster),
        Correction::Renamed {
            from: "AnnaSchmidt.zip".into(),
            to: "MUELLER_Blatt03_Anna-Schmidt.zip".into(),
        }
    );
}

#[test]
fn ambiguous_word_fails_without_accepting() {
    let roster = anna_roster();
    let result = correct("blatt3_anna.zip", &roster);
    assert!(!result.is_success());
    assert_eq!(result.name(), "blatt3_anna.zip");
    assert_eq!(
        result.error(),
        Some(&CorrectionError::AmbiguousIdentity {
            fragment: "anna".into(),
            candidates: vec!["Anna Schmidt".into(), "Anna Schneider".into()],
        })
    );
}

#[test]
fn ambiguous_camel_case_is_only_skipped() {
    let roster = Roster::new(vec![
        Student::new("Anna Schmidt", "a@x"),
        Student::new("Anna Schmidtke", "b@x"),
        Student::new("Max Mustermann", "c@x"),
    ]);
    assert_eq!(
        correct("AnnaSchmidt_MaxMustermann.zip", &roster).name(),
        "MUELLER_Blatt03_Max-Mustermann.zip"
    );
}

#[test]
fn end_to_end_mueller_sheet_three() {
    let roster = Roster::new(vec![
        Student::new("Max Mustermann", "m@x"),
        Student::new("Erika Musterfrau", "e@x"),
    ]);
    let result = correct("mueller_blatt03_MaxMustermann.zip", &roster);
    assert_eq!(result.name(), "MUELLER_Blatt03_Max-Mustermann.zip");
    assert!(result.is_success());
    assert!(grammar().is_correct(result.name()));
}

#[test]
fn tokens_are_sorted_by_first_name_and_deduplicated() {
    let roster = Roster::new(vec![
        Student::new("Zoe Zander", "z@x"),
        Student::new("Anna Schmidt", "a@x"),
    ]);
    let result = correct("Zander, Zoe und AnnaSchmidt.zip", &roster);
    assert_eq!(result.name(), "MUELLER_Blatt03_Anna-Schmidt_Zoe-Zander.zip");
}

#[test]
fn existing_tokens_and_parenthesised_alternates_are_kept() {
    let roster = Roster::new(vec![Student::new("Zoe Zander", "z@x")]);
    let result = correct("MUELLER Blatt 3 Zoe-Zander(Zoe_Z-Zander).tar.gz", &roster);
    assert_eq!(result.name(), "MUELLER_Blatt03_Zoe-Zander(Zoe-Z-Zander).tar.gz");
}

#[test]
fn unsupported_container_is_not_corrected() {
    let roster = anna_roster();
    let result = correct("Anna Schmidt.pdf", &roster);
    assert_eq!(
        result.error(),
        Some(&CorrectionError::UnsupportedContainer {
            name: "Anna Schmidt.pdf".into()
        })
    );
}

#[test]
fn specific_unknown_camel_fragment_fails() {
    let roster = anna_roster();
    let result = correct("MoritzKlein.zip", &roster);
    assert_eq!(
        result.error(),
        Some(&CorrectionError::UnresolvedSpecificFragment {
            fragment: "MoritzKlein".into(),
            candidate: "Moritz Klein".into(),
        })
    );
}

#[test]
fn short_unknown_camel_fragment_is_skipped() {
    let roster = anna_roster();
    // "Jo Ng" has five characters: inconclusive, not fatal.
    let result = correct("JoNg_AnnaSchmidt.zip", &roster);
    assert_eq!(result.name(), "MUELLER_Blatt03_Anna-Schmidt.zip");
}

#[test]
fn nothing_identifiable_fails() {
    let roster = anna_roster();
    let result = correct("MUELLER_blatt03_loesung.zip", &roster);
    assert_eq!(result.error(), Some(&CorrectionError::NoIdentifiableTokens));
}

#[test]
fn uppercase_extension_is_normalised() {
    let roster = anna_roster();
    let result = correct("AnnaSchmidt.ZIP", &roster);
    assert_eq!(result.name(), "MUELLER_Blatt03_Anna-Schmidt.zip");
}

#[test]
fn single_word_roster_name_cannot_form_a_token() {
    let roster = Roster::new(vec![Student::new("Cher", "c@x")]);
    let result = correct("cher.zip", &roster);
    assert!(matches!(
        result.error(),
        Some(CorrectionError::NonCanonicalResult { .. })
    ));
}

#[test]
fn initials_with_dots_form_a_canonical_token() {
    let roster = Roster::new(vec![Student::new("Max J. Mustermann", "m@x")]);
    let result = correct("MaxMustermann.zip", &roster);
    assert_eq!(result.name(), "MUELLER_Blatt03_Max-J.-Mustermann.zip");
    assert!(result.is_success());
}
