use markdown_outline::{
    add_numbers, generate_toc, insert_toc, remove_toc, toc_transform, update_toc, OutlineError,
    TocEntry, TocMode, TocNotice, TocOptions, DEFAULT_MARKER,
};
use pretty_assertions::assert_eq;

const EXAMPLE: &str = "Title\n===\n# Intro\n## Details\n# Summary\n";

fn entry(level: usize, text: &str, anchor: &str) -> TocEntry {
    TocEntry {
        level,
        text: text.into(),
        anchor: anchor.into(),
    }
}

fn with_markers(toc: &str) -> String {
    format!("{DEFAULT_MARKER}\n{toc}\n{DEFAULT_MARKER}")
}

#[test]
fn generates_entries_for_every_header() {
    let entries = generate_toc(EXAMPLE, &TocOptions::default()).unwrap();
    assert_eq!(
        entries,
        vec![
            entry(1, "Intro", "intro"),
            entry(2, "Details", "details"),
            entry(1, "Summary", "summary"),
        ]
    );
}

#[test]
fn skip_first_heading_drops_the_title_header() {
    let options = TocOptions {
        skip_first_heading: true,
        ..TocOptions::default()
    };
    let entries = generate_toc(EXAMPLE, &options).unwrap();
    assert_eq!(
        entries,
        vec![entry(2, "Details", "details"), entry(1, "Summary", "summary")]
    );
}

#[test]
fn max_level_limits_depth() {
    let options = TocOptions {
        max_level: 1,
        ..TocOptions::default()
    };
    let entries = generate_toc(EXAMPLE, &options).unwrap();
    assert_eq!(
        entries,
        vec![entry(1, "Intro", "intro"), entry(1, "Summary", "summary")]
    );
}

#[test]
fn fenced_headers_are_not_listed() {
    let entries =
        generate_toc("# Real\n```md\n# Fake\n```\n## Also real", &TocOptions::default()).unwrap();
    assert_eq!(
        entries,
        vec![entry(1, "Real", "real"), entry(2, "Also real", "also-real")]
    );
}

#[test]
fn duplicate_headers_share_an_anchor() {
    let entries = generate_toc("# Notes\n# Notes", &TocOptions::default()).unwrap();
    assert_eq!(entries[0].anchor, entries[1].anchor);
}

#[test]
fn inserts_after_setext_title() {
    let outcome = insert_toc(EXAMPLE, &TocOptions::default()).unwrap();
    assert_eq!(outcome.notice, None);
    let expected = format!(
        "Title\n===\n{}\n# Intro\n## Details\n# Summary\n",
        with_markers("- [Intro](#intro)\n    - [Details](#details)\n- [Summary](#summary)")
    );
    assert_eq!(outcome.text, expected);
}

#[test]
fn synthesises_title_when_missing() {
    let outcome = insert_toc("# Intro\nBody\n", &TocOptions::default()).unwrap();
    let expected = format!(
        "Title\n===\n{}\n# Intro\nBody\n",
        with_markers("- [Intro](#intro)")
    );
    assert_eq!(outcome.text, expected);
}

#[test]
fn custom_default_title_is_used() {
    let options = TocOptions {
        default_title: "Guide".into(),
        ..TocOptions::default()
    };
    let outcome = insert_toc("# Intro", &options).unwrap();
    assert!(outcome.text.starts_with("Guide\n===\n"));
}

#[test]
fn insert_refuses_to_duplicate() {
    let first = insert_toc(EXAMPLE, &TocOptions::default()).unwrap();
    let second = insert_toc(&first.text, &TocOptions::default()).unwrap();
    assert_eq!(second.notice, Some(TocNotice::MarkerAlreadyPresent));
    assert_eq!(second.text, first.text);
}

#[test]
fn remove_reverses_insert() {
    let inserted = insert_toc(EXAMPLE, &TocOptions::default()).unwrap();
    let removed = remove_toc(&inserted.text, DEFAULT_MARKER).unwrap();
    assert_eq!(removed.notice, None);
    assert_eq!(removed.text, EXAMPLE);
}

#[test]
fn remove_trims_whitespace_before_the_block() {
    let input = format!("Title\n===\n\n\n{}\n# Intro", with_markers("- [Old](#old)"));
    let removed = remove_toc(&input, DEFAULT_MARKER).unwrap();
    assert_eq!(removed.text, "Title\n===\n# Intro");
}

#[test]
fn remove_without_marker_is_a_no_op() {
    let removed = remove_toc(EXAMPLE, DEFAULT_MARKER).unwrap();
    assert_eq!(removed.notice, Some(TocNotice::MarkerAbsent));
    assert_eq!(removed.text, EXAMPLE);
}

#[test]
fn remove_with_single_marker_is_a_no_op() {
    let input = format!("Title\n===\n{DEFAULT_MARKER}\n- [Intro](#intro)\n# Intro\n");
    let removed = remove_toc(&input, DEFAULT_MARKER).unwrap();
    assert_eq!(removed.notice, Some(TocNotice::MarkerUnpaired));
    assert_eq!(removed.text, input);

    let updated = update_toc(&input, &TocOptions::default()).unwrap();
    assert_eq!(updated.notice, Some(TocNotice::MarkerUnpaired));
    assert_eq!(updated.text, input);
}

#[test]
fn update_regenerates_stale_block() {
    let stale = format!(
        "Title\n===\n{}\n# Intro\n## Added later\n",
        with_markers("- [Intro](#intro)")
    );
    let updated = update_toc(&stale, &TocOptions::default()).unwrap();
    let expected = format!(
        "Title\n===\n{}\n# Intro\n## Added later\n",
        with_markers("- [Intro](#intro)\n    - [Added later](#added-later)")
    );
    assert_eq!(updated.notice, None);
    assert_eq!(updated.text, expected);

    let again = update_toc(&updated.text, &TocOptions::default()).unwrap();
    assert_eq!(again.text, updated.text);
}

#[test]
fn update_inserts_when_marker_absent() {
    let updated = toc_transform(EXAMPLE, TocMode::Update, &TocOptions::default()).unwrap();
    let inserted = toc_transform(EXAMPLE, TocMode::Add, &TocOptions::default()).unwrap();
    assert_eq!(updated, inserted);
}

#[test]
fn anchors_follow_numbered_headers() {
    let numbered = add_numbers(EXAMPLE).unwrap();
    let entries = generate_toc(&numbered, &TocOptions::default()).unwrap();
    assert_eq!(
        entries,
        vec![
            entry(1, "1 Intro", "1-intro"),
            entry(2, "1.1 Details", "1.1-details"),
            entry(1, "2 Summary", "2-summary"),
        ]
    );
}

#[test]
fn level_beyond_six_fails_before_any_change() {
    let err = toc_transform("####### Deep", TocMode::Add, &TocOptions::default()).unwrap_err();
    assert!(matches!(err, OutlineError::HeaderLevelExceeded { line: 1, .. }));
}

#[test]
fn crlf_insert_keeps_line_endings() {
    let doc = "Title\r\n===\r\n# Intro\r\n## Details\r\n";
    let inserted = insert_toc(doc, &TocOptions::default()).unwrap();
    assert_eq!(
        inserted.text,
        format!(
            "Title\r\n===\r\n{DEFAULT_MARKER}\r\n- [Intro](#intro)\r\n    - [Details](#details)\r\n{DEFAULT_MARKER}\r\n# Intro\r\n## Details\r\n"
        )
    );
}

#[test]
fn crlf_remove_reverses_insert() {
    let doc = "Title\r\n===\r\n# Intro\r\n## Details\r\n";
    let inserted = insert_toc(doc, &TocOptions::default()).unwrap();
    let removed = remove_toc(&inserted.text, DEFAULT_MARKER).unwrap();
    assert_eq!(removed.text, doc);
    assert_eq!(removed.notice, None);
}

#[test]
fn crlf_synthesised_title_matches_document_endings() {
    let inserted = insert_toc("# Intro\r\n", &TocOptions::default()).unwrap();
    assert_eq!(
        inserted.text,
        format!("Title\r\n===\r\n{DEFAULT_MARKER}\r\n- [Intro](#intro)\r\n{DEFAULT_MARKER}\r\n# Intro\r\n")
    );
}
