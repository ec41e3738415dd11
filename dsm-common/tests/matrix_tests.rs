//! Integration tests for reciprocal comparison matrices
//!
//! Exercises the public API the way the draft layer uses it: interactive
//! edits, restores from saved drafts and JSON round trips through FormData.

use dsm_common::{ComparisonMatrix, FormData, MatrixError};

const VALUES: [&str; 8] = ["1", "2", "3.5", "9", "1/2", "1/3.5", "1/9", "1.0"];

/// Deterministic pseudo-random edit stream (no rand dependency needed)
fn edit_stream(size: usize, count: usize) -> Vec<(usize, usize, &'static str)> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..count)
        .map(|_| {
            let i = (next() % size as u64) as usize;
            let j = (next() % size as u64) as usize;
            let v = VALUES[(next() % VALUES.len() as u64) as usize];
            (i, j, v)
        })
        .collect()
}

#[test]
fn test_diagonal_survives_any_edit_history() {
    let mut m = ComparisonMatrix::new(5);
    for (i, j, v) in edit_stream(5, 500) {
        let result = m.set_cell(i, j, v);
        if i == j {
            assert_eq!(result, Err(MatrixError::DiagonalCell { index: i }));
        } else {
            assert!(result.is_ok());
        }
    }

    for i in 0..5 {
        assert_eq!(m.get(i, i), Some("1"));
    }
}

#[test]
fn test_every_pair_reciprocal_after_edit_history() {
    let mut m = ComparisonMatrix::new(6);
    for (i, j, v) in edit_stream(6, 1000) {
        let _ = m.set_cell(i, j, v);
    }
    assert!(m.is_reciprocal_consistent());
}

#[test]
fn test_reconstruct_matches_replayed_edits() {
    let edits = edit_stream(4, 200);

    let mut interactive = ComparisonMatrix::new(4);
    for (i, j, v) in &edits {
        let _ = interactive.set_cell(*i, *j, v);
    }

    let restored =
        ComparisonMatrix::reconstruct(4, edits.iter().map(|(i, j, v)| ((*i, *j), *v)));
    assert_eq!(restored, interactive);

    let again = ComparisonMatrix::reconstruct(4, edits.iter().map(|(i, j, v)| ((*i, *j), *v)));
    assert_eq!(again, restored);
}

#[test]
fn test_saved_matrix_round_trips_through_form_data() {
    let mut criteria = ComparisonMatrix::new(3);
    criteria.set_cell(0, 1, "5").unwrap();
    criteria.set_cell(2, 0, "1/3").unwrap();

    let mut form = FormData::default();
    form.matrices.criteria = Some(criteria.clone());

    let json = serde_json::to_string(&form).unwrap();
    let back: FormData = serde_json::from_str(&json).unwrap();
    assert_eq!(back.matrices.criteria, Some(criteria));
}

#[test]
fn test_failed_edit_does_not_disturb_existing_pairs() {
    let mut m = ComparisonMatrix::new(3);
    m.set_cell(0, 2, "7").unwrap();
    let snapshot = m.to_rows();

    for bad in ["abc", "", "2/7", "1/x", "7 "] {
        assert!(matches!(
            m.set_cell(0, 2, bad),
            Err(MatrixError::InvalidCellFormat { .. })
        ));
    }
    assert_eq!(m.to_rows(), snapshot);
}
