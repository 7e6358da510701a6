/// Time-alignment of multiple series for overlay comparison.
///
/// Output files from different model runs rarely share a clock: a design
/// storm may start at hour 0 in one run and on a calendar date in another.
/// To compare hydrograph shapes, each series is shifted so the sample
/// nearest a user-chosen anchor timestamp sits at relative index 0, and the
/// shifted series are laid out side by side in an overlay table.
///
/// Ties in "nearest" resolve to the earlier sample. An empty series
/// contributes an all-empty column rather than failing the overlay.

use chrono::NaiveDateTime;

use crate::model::Series;

// ---------------------------------------------------------------------------
// Anchor lookup
// ---------------------------------------------------------------------------

/// Index of the sample whose timestamp is nearest to `anchor`.
/// Returns `None` for an empty series.
pub fn nearest_index(series: &Series, anchor: NaiveDateTime) -> Option<usize> {
    let mut best: Option<(usize, i64)> = None;

    for (i, point) in series.points.iter().enumerate() {
        let distance = (point.time - anchor).num_seconds().abs();
        match best {
            // Strict < keeps the earlier sample on a tie.
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((i, distance)),
        }
    }

    best.map(|(i, _)| i)
}

// ---------------------------------------------------------------------------
// Overlay construction
// ---------------------------------------------------------------------------

/// One aligned column of the overlay table.
#[derive(Debug, Clone)]
pub struct OverlayColumn {
    pub name: String,
    /// Values aligned to the overlay's offset axis; `None` where this
    /// series has no sample at that relative position.
    pub values: Vec<Option<f64>>,
}

/// A set of series shifted onto a shared relative-index axis.
#[derive(Debug, Clone)]
pub struct Overlay {
    /// Relative indices, ascending; 0 is the anchor position.
    pub offsets: Vec<i64>,
    pub columns: Vec<OverlayColumn>,
}

/// Aligns `series` (name, data) pairs so each one's nearest-to-anchor sample
/// lands at relative index 0.
///
/// The offset axis spans the union of all shifted index ranges, so no sample
/// of any input is dropped. If every series is empty, the overlay has no
/// rows but still one column per input.
pub fn align_to_anchor(series: &[(String, Series)], anchor: NaiveDateTime) -> Overlay {
    // Anchor index per series; None for empty inputs.
    let anchors: Vec<Option<usize>> = series
        .iter()
        .map(|(_, s)| nearest_index(s, anchor))
        .collect();

    // Union of shifted index ranges.
    let mut lo: Option<i64> = None;
    let mut hi: Option<i64> = None;
    for ((_, s), anchor_idx) in series.iter().zip(&anchors) {
        if let Some(a) = anchor_idx {
            let first = -(*a as i64);
            let last = (s.len() as i64 - 1) - *a as i64;
            lo = Some(lo.map_or(first, |v| v.min(first)));
            hi = Some(hi.map_or(last, |v| v.max(last)));
        }
    }

    let offsets: Vec<i64> = match (lo, hi) {
        (Some(lo), Some(hi)) => (lo..=hi).collect(),
        _ => Vec::new(),
    };

    let columns = series
        .iter()
        .zip(&anchors)
        .map(|((name, s), anchor_idx)| {
            let values = offsets
                .iter()
                .map(|offset| {
                    let a = (*anchor_idx)? as i64;
                    let idx = a + offset;
                    if idx < 0 || idx >= s.len() as i64 {
                        None
                    } else {
                        Some(s.points[idx as usize].value)
                    }
                })
                .collect();
            OverlayColumn { name: name.clone(), values }
        })
        .collect();

    Overlay { offsets, columns }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SamplePoint;
    use chrono::{Duration, NaiveDate};

    fn t(minutes: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2019, 5, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(minutes)
    }

    fn series(start_minute: i64, step: i64, values: &[f64]) -> Series {
        Series::new(
            values
                .iter()
                .enumerate()
                .map(|(i, v)| SamplePoint {
                    time: t(start_minute + step * i as i64),
                    value: *v,
                })
                .collect(),
        )
    }

    #[test]
    fn test_nearest_index_exact_match() {
        let s = series(0, 15, &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(nearest_index(&s, t(30)), Some(2));
    }

    #[test]
    fn test_nearest_index_tie_resolves_to_earlier_sample() {
        // t(7.5min) would be equidistant; use a 10-minute grid with anchor
        // exactly halfway between samples 0 and 1.
        let s = series(0, 10, &[1.0, 2.0, 3.0]);
        assert_eq!(nearest_index(&s, t(5)), Some(0));
    }

    #[test]
    fn test_nearest_index_empty_series() {
        assert_eq!(nearest_index(&Series::default(), t(0)), None);
    }

    #[test]
    fn test_align_two_offset_series() {
        // Series a peaks at minute 30 (index 2); series b records the same
        // storm but starts 15 minutes later, peaking at its index 1.
        let a = series(0, 15, &[0.0, 2.0, 9.0, 3.0]);
        let b = series(15, 15, &[1.5, 8.0, 2.5]);

        let overlay = align_to_anchor(
            &[("run_a".to_string(), a), ("run_b".to_string(), b)],
            t(30),
        );

        // a anchors at index 2, b at index 1; union range is -2..=1.
        assert_eq!(overlay.offsets, vec![-2, -1, 0, 1]);

        let col_a = &overlay.columns[0];
        assert_eq!(col_a.name, "run_a");
        assert_eq!(col_a.values, vec![Some(0.0), Some(2.0), Some(9.0), Some(3.0)]);

        let col_b = &overlay.columns[1];
        assert_eq!(col_b.values, vec![None, Some(1.5), Some(8.0), Some(2.5)]);

        // The anchored samples line up at offset 0.
        let zero_row = overlay.offsets.iter().position(|o| *o == 0).unwrap();
        assert_eq!(col_a.values[zero_row], Some(9.0));
        assert_eq!(col_b.values[zero_row], Some(8.0));
    }

    #[test]
    fn test_align_with_empty_series_keeps_empty_column() {
        let a = series(0, 15, &[1.0, 2.0]);
        let overlay = align_to_anchor(
            &[
                ("run_a".to_string(), a),
                ("missing".to_string(), Series::default()),
            ],
            t(0),
        );

        assert_eq!(overlay.offsets, vec![0, 1]);
        assert_eq!(overlay.columns.len(), 2);
        assert!(overlay.columns[1].values.iter().all(Option::is_none));
    }

    #[test]
    fn test_align_all_empty_produces_no_rows() {
        let overlay = align_to_anchor(
            &[("a".to_string(), Series::default())],
            t(0),
        );
        assert!(overlay.offsets.is_empty());
        assert_eq!(overlay.columns.len(), 1);
    }
}
