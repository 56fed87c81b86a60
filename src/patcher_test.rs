use super::*;

fn delta(old_start: usize, old_lines: &[&str], new_start: usize, new_lines: &[&str]) -> Delta {
    Delta {
        filename: "f.rs".to_string(),
        old_start,
        old_lines: old_lines.iter().map(|s| format!("{s}\n").into_bytes()).collect(),
        new_start,
        new_lines: new_lines.iter().map(|s| format!("{s}\n").into_bytes()).collect(),
    }
}

fn text(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[test]
fn replaces_a_single_line() {
    let mut p = Patcher::new(b"a\nb\nc\n");
    p.apply(&delta(2, &["b"], 2, &["B"])).unwrap();
    assert_eq!(text(&p.content()), "a\nB\nc\n");
}

#[test]
fn idempotent_reapplication_is_a_no_op() {
    let mut p = Patcher::new(b"a\nb\nc\n");
    let d = delta(2, &["b"], 2, &["B"]);
    p.apply(&d).unwrap();
    p.apply(&d).unwrap();
    assert_eq!(text(&p.content()), "a\nB\nc\n");
}

#[test]
fn insertion_shifts_start_forward_by_one() {
    // old_length == 0 at old_start=1 inserts after line 1, i.e. before line 2.
    let mut p = Patcher::new(b"a\nb\n");
    p.apply(&delta(1, &[], 2, &["x"])).unwrap();
    assert_eq!(text(&p.content()), "a\nx\nb\n");
}

#[test]
fn offset_correction_accounts_for_earlier_deltas_in_group() {
    // Shrinking delta at line 1 changes 2 old lines into 1; a later delta at
    // old_start=3 must land at the offset-corrected position regardless of
    // application order.
    let shrink = delta(1, &["a", "b"], 1, &["ab"]);
    let later = delta(3, &["c"], 2, &["C"]);

    let mut forward = Patcher::new(b"a\nb\nc\n");
    forward.apply(&shrink).unwrap();
    forward.apply(&later).unwrap();

    let mut backward = Patcher::new(b"a\nb\nc\n");
    backward.apply(&later).unwrap();
    backward.apply(&shrink).unwrap();

    assert_eq!(forward.content(), backward.content());
    assert_eq!(text(&forward.content()), "ab\nC\n");
}

#[test]
fn commutative_within_a_group_for_non_overlapping_deltas() {
    let d1 = delta(1, &["a"], 1, &["A"]);
    let d2 = delta(3, &["c"], 3, &["C"]);
    let d3 = delta(5, &["e"], 5, &["E"]);

    let mut forward = Patcher::new(b"a\nb\nc\nd\ne\n");
    forward.apply(&d1).unwrap();
    forward.apply(&d2).unwrap();
    forward.apply(&d3).unwrap();

    let mut reversed = Patcher::new(b"a\nb\nc\nd\ne\n");
    reversed.apply(&d3).unwrap();
    reversed.apply(&d2).unwrap();
    reversed.apply(&d1).unwrap();

    assert_eq!(forward.content(), reversed.content());
    assert_eq!(text(&forward.content()), "A\nb\nC\nd\nE\n");
}

#[test]
fn faithful_reconstruction_of_a_full_hunk() {
    // old content -> new content, applying the exact micro-deltas the line
    // mapper would derive from the whole-hunk change.
    let mut p = Patcher::new(b"one\ntwo\nthree\nfour\n");
    p.apply(&delta(2, &["two", "three"], 2, &["two-three"])).unwrap();
    assert_eq!(text(&p.content()), "one\ntwo-three\nfour\n");
}

#[test]
fn delta_beyond_head_content_is_a_diff_inconsistency_not_a_panic() {
    let mut p = Patcher::new(b"a\nb\n");
    let err = p.apply(&delta(5, &["x"], 5, &["y"])).unwrap_err();
    assert!(matches!(err, GitBlackError::DiffInconsistency { .. }));
}

#[test]
fn handles_content_with_no_trailing_newline() {
    let mut p = Patcher::new(b"a\nb");
    p.apply(&Delta {
        filename: "f.rs".to_string(),
        old_start: 2,
        old_lines: vec![b"b".to_vec()],
        new_start: 2,
        new_lines: vec![b"B".to_vec()],
    })
    .unwrap();
    assert_eq!(text(&p.content()), "a\nB");
}
