//! Library-level tests for the compaction pipeline on realistic tables.

use std::collections::HashSet;

use hzk_compact::table::{self, Layout};
use hzk_compact::{compact, CompactError, CompactOptions, Fingerprint};

use crate::helpers::load_fixture;

fn compact_default(src: &str) -> hzk_compact::Compaction {
    compact(src, &CompactOptions::default()).expect("compaction should succeed")
}

// ============================================================================
// Generated table fixture
// ============================================================================

#[test]
fn fixture_drops_exact_duplicates_only() {
    let compaction = compact_default(&load_fixture("hzk16.c"));
    let report = &compaction.report;

    assert_eq!(report.table_name, "HZK_16");
    assert_eq!(report.original_entries, 11);
    assert_eq!(report.retained_entries, 8);
    assert_eq!(report.duplicates_removed(), 3);

    let dropped: Vec<_> = report
        .duplicates
        .iter()
        .map(|d| (d.key.as_str(), d.old_index))
        .collect();
    assert_eq!(dropped, vec![("京", 3), ("北", 6), ("海", 10)]);
}

#[test]
fn fixture_keeps_same_key_with_new_bitmap() {
    let compaction = compact_default(&load_fixture("hzk16.c"));
    let doc = table::parse(&compaction.output).unwrap();

    let keys: Vec<_> = doc.entries.iter().map(|e| e.key.as_str()).collect();
    assert_eq!(keys, vec!["北", "京", "南", "上", "海", "温", "南", "℃"]);
}

#[test]
fn fixture_output_matches_snapshot() {
    let compaction = compact_default(&load_fixture("hzk16.c"));
    insta::with_settings!({prepend_module_to_snapshot => false}, {
        insta::assert_snapshot!("compacted_hzk16", compaction.output);
    });
}

#[test]
fn fixture_output_invariants() {
    let src = load_fixture("hzk16.c");
    let compaction = compact_default(&src);
    let before = table::parse(&src).unwrap();
    let after = table::parse(&compaction.output).unwrap();

    // No two entries share (key, fingerprint)
    let identities: HashSet<_> = after
        .entries
        .iter()
        .map(|e| (e.key.clone(), Fingerprint::of(&e.payload)))
        .collect();
    assert_eq!(identities.len(), after.entries.len());

    // Indices are 0..n in order
    let indices: Vec<_> = after.entries.iter().map(|e| e.old_index).collect();
    assert_eq!(indices, (0..after.entries.len()).collect::<Vec<_>>());

    // Count bookkeeping
    assert_eq!(
        after.entries.len(),
        before.entries.len() - compaction.report.duplicates_removed()
    );

    // Header and footer pass through byte for byte
    assert_eq!(after.header, before.header);
    assert_eq!(after.footer, before.footer);
}

#[test]
fn fixture_compaction_is_idempotent() {
    let first = compact_default(&load_fixture("hzk16.c"));
    let second = compact_default(&first.output);

    assert_eq!(second.report.duplicates_removed(), 0);
    assert_eq!(second.report.reindexed, 0);
    assert_eq!(second.output, first.output);
}

#[test]
fn single_entry_is_reindexed_to_zero() {
    let src = load_fixture("single.c");
    let compaction = compact_default(&src);
    let doc = table::parse(&compaction.output).unwrap();

    assert_eq!(doc.entries.len(), 1);
    assert_eq!(doc.entries[0].key, "朱");
    assert_eq!(doc.entries[0].old_index, 0);
    assert!(compaction.output.starts_with("const HZK_16_t HZK_16[] = {\n"));
    assert!(compaction.output.ends_with("/*\"朱\",0*/\n     /* (16 X 16 , 宋体 )*/},\n\n};\n"));
}

// ============================================================================
// Edge cases
// ============================================================================

#[test]
fn sentinel_survives_deduplication() {
    let src = r#"const HZK_16_t HZK_16[] = {
    {"a", {0x01}, /*"a",0*/},
    {"a", {0x01}, /*"a",1*/},
    {"b", {0x02}, /*"b",2*/},
    {"", {0}}
};
"#;
    let compaction = compact_default(src);

    assert!(compaction.report.has_sentinel);
    assert_eq!(
        compaction.output,
        "const HZK_16_t HZK_16[] = {\n    {\"a\", {0x01}, /*\"a\",0*/},\n\n    {\"b\", {0x02}, /*\"b\",1*/},\n\n    {\"\", {0}},\n\n};\n"
    );
}

#[test]
fn mismatched_annotation_is_reported_not_fatal() {
    let src = r#"const HZK_16_t HZK_16[] = {
    {"a", {0x01}, /*"a",5*/},
    {"b", {0x02}, /*"x",6*/},
    {"c", {0x03}, /*"c",7*/},
};
"#;
    let compaction = compact_default(src);
    let doc = table::parse(&compaction.output).unwrap();

    let indices: Vec<_> = doc.entries.iter().map(|e| e.old_index).collect();
    assert_eq!(indices, vec![0, 6, 2]);
    assert_eq!(compaction.report.mismatches.len(), 1);
    assert_eq!(compaction.report.mismatches[0].key, "b");
    assert_eq!(compaction.report.mismatches[0].new_index, 1);
}

#[test]
fn anchor_lookalike_in_payload_is_untouched() {
    let src = r#"const T t[] = {
    {"7", {"7",1, 0x07}, /*"7",1*/},
};"#;
    let compaction = compact_default(src);
    assert!(compaction.output.contains(r#"{"7", {"7",1, 0x07}, /*"7",0*/}"#));
}

#[test]
fn empty_table_is_malformed() {
    let err = compact("const HZK_16_t HZK_16[] = {\n};\n", &CompactOptions::default())
        .unwrap_err();
    assert!(matches!(err, CompactError::MalformedTable { .. }));
}

#[test]
fn garbage_body_reports_line_and_column() {
    let src = "const HZK_16_t HZK_16[] = {\n    {\"a\", {0x01}, /*\"a\",0*/},\n    oops\n};\n";
    let err = compact(src, &CompactOptions::default()).unwrap_err();
    match err {
        CompactError::Parse(e) => {
            assert_eq!((e.position.line, e.position.column), (3, 5));
            assert!(e.to_string().contains("line 3, column 5"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn custom_indent_is_applied() {
    let options = CompactOptions {
        table_name: None,
        layout: Layout::with_indent(2),
    };
    let compaction = compact(
        "const T t[] = {\n{\"a\", {0x01}, /*\"a\",0*/}};",
        &options,
    )
    .unwrap();
    assert_eq!(
        compaction.output,
        "const T t[] = {\n  {\"a\", {0x01}, /*\"a\",0*/},\n\n};"
    );
}
