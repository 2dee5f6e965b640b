//! Column width redistribution.
//!
//! Widths are percentages that sum to exactly 100 within a group. Two-column
//! groups are driven by a single slider; three- and four-column groups
//! redistribute the remainder over the columns after the edited one.
//!
//! ```
//! use mailflow::editor::{ColumnGroup, columns};
//!
//! let mut group = ColumnGroup::with_columns(3);
//! columns::set_width(&mut group.columns, 0, 50.0).unwrap();
//! let widths: Vec<f64> = group.columns.iter().map(|c| c.width).collect();
//! assert_eq!(widths, vec![50.0, 25.0, 25.0]);
//! ```

use super::types::{Column, ColumnGroup};
use crate::error::EditorError;

/// Most columns a group can hold.
pub const MAX_COLUMNS: usize = 4;

/// Slider range for the first column of a two-column group.
pub const TWO_COLUMN_MIN: f64 = 10.0;
pub const TWO_COLUMN_MAX: f64 = 90.0;

const EPSILON: f64 = 1e-9;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Round to two decimals only when `v` is already two-decimal up to float
/// noise; anything else is kept exact.
fn tidy(v: f64) -> f64 {
    let r = round2(v);
    if (r - v).abs() < EPSILON { r } else { v }
}

/// Even split of 100 over `count` columns, rounding error in the last one.
pub fn even_widths(count: usize) -> Vec<f64> {
    if count == 0 {
        return Vec::new();
    }
    let each = round2(100.0 / count as f64);
    let mut widths = vec![each; count];
    widths[count - 1] = round2(100.0 - each * (count - 1) as f64);
    widths
}

/// Reject bounds that cannot be edited: inverted or non-finite ranges, or
/// ranges that together cannot hold a total of 100.
fn check_bounds(columns: &[Column]) -> Result<(), EditorError> {
    for (i, c) in columns.iter().enumerate() {
        if !c.width.is_finite() || !c.min_width.is_finite() || !c.max_width.is_finite() {
            return Err(EditorError::InvalidEdit(format!(
                "column {} has a non-numeric width or bound",
                i
            )));
        }
        if c.min_width > c.max_width {
            return Err(EditorError::InvalidEdit(format!(
                "column {} minimum width {} exceeds its maximum {}",
                i, c.min_width, c.max_width
            )));
        }
    }
    let min_sum: f64 = columns.iter().map(|c| c.min_width).sum();
    let max_sum: f64 = columns.iter().map(|c| c.max_width).sum();
    if min_sum > 100.0 + EPSILON || max_sum < 100.0 - EPSILON {
        return Err(EditorError::InvalidEdit(format!(
            "column bounds cannot add up to 100 (min {}, max {})",
            min_sum, max_sum
        )));
    }
    Ok(())
}

/// Set the width of column `index`, redistributing the others.
///
/// - 1 column: always 100.
/// - 2 columns: the edited column is clamped to `[10, 90]`, the other gets the rest.
/// - 3-4 columns: proportional redistribution over the later columns. Fails
///   on column bounds that cannot hold a total of 100.
pub fn set_width(columns: &mut [Column], index: usize, value: f64) -> Result<(), EditorError> {
    if index >= columns.len() {
        return Err(EditorError::InvalidEdit(format!(
            "column index {} out of range ({} columns)",
            index,
            columns.len()
        )));
    }
    if !value.is_finite() {
        return Err(EditorError::InvalidEdit("width must be a number".into()));
    }

    match columns.len() {
        1 => columns[0].width = 100.0,
        2 => {
            let v = round2(value.clamp(TWO_COLUMN_MIN, TWO_COLUMN_MAX));
            let other = 1 - index;
            columns[index].width = v;
            columns[other].width = round2(100.0 - v);
        }
        _ => {
            check_bounds(columns)?;
            redistribute(columns, index, value);
        }
    }
    Ok(())
}

/// Proportional redistribution for groups of three or more columns.
///
/// Column `index` is set to `value`, clamped to its own `[min, max]` and to
/// what the later columns can absorb. Earlier columns are never touched, and
/// need not be two-decimal (a loaded canvas may hold any widths). The remainder
/// `100 - value - sum(before)` is split over the later columns in
/// proportion to their current widths. A later column pushed outside its
/// bounds is clamped and the difference carried to the next column in index
/// order. Rounding error always lands in the last column.
///
/// Column bounds must be ordered (`min <= max`); [`set_width`] checks this.
fn redistribute(columns: &mut [Column], index: usize, value: f64) {
    let n = columns.len();
    let before: f64 = columns[..index].iter().map(|c| c.width).sum();
    let later = index + 1..n;

    let later_min: f64 = columns[later.clone()].iter().map(|c| c.min_width).sum();
    let later_max: f64 = columns[later.clone()].iter().map(|c| c.max_width).sum();

    let own = &columns[index];
    let v = if later.is_empty() {
        // The last column can only hold what the earlier ones leave over.
        tidy(100.0 - before)
    } else {
        let hi = 100.0 - before - later_min;
        let lo = (100.0 - before - later_max).min(hi);
        let v = value.clamp(own.min_width, own.max_width).min(hi).max(lo);
        // Rounding must not step past what the siblings can absorb.
        round2(v)
            .clamp(own.min_width, own.max_width)
            .min(hi)
            .max(lo)
    };
    columns[index].width = v;

    if later.is_empty() {
        return;
    }

    let remaining = 100.0 - before - v;
    let old_sum: f64 = columns[later.clone()].iter().map(|c| c.width).sum();
    let count = later.len() as f64;

    let mut targets: Vec<f64> = columns[later.clone()]
        .iter()
        .map(|c| {
            let share = if old_sum > EPSILON {
                c.width / old_sum
            } else {
                1.0 / count
            };
            remaining * share
        })
        .collect();

    // Forward cascade: clamp and carry the difference to the next sibling.
    let mut carry = 0.0;
    for (offset, target) in targets.iter_mut().enumerate() {
        let col = &columns[index + 1 + offset];
        let w = *target + carry;
        carry = 0.0;
        *target = if w < col.min_width {
            carry = w - col.min_width;
            col.min_width
        } else if w > col.max_width {
            carry = w - col.max_width;
            col.max_width
        } else {
            w
        };
    }

    // Whatever the last sibling could not absorb goes back through the later
    // columns in index order.
    if carry.abs() > EPSILON {
        for (offset, target) in targets.iter_mut().enumerate() {
            let col = &columns[index + 1 + offset];
            let w = *target + carry;
            let clamped = w.clamp(col.min_width, col.max_width);
            carry = w - clamped;
            *target = clamped;
            if carry.abs() <= EPSILON {
                break;
            }
        }
    }

    for (offset, target) in targets.iter().enumerate() {
        let col = &mut columns[index + 1 + offset];
        col.width = round2(*target).clamp(col.min_width, col.max_width);
    }
    fix_rounding(columns, index + 1);
}

/// Push rounding error into the last column so the total is exactly 100.
///
/// If that would take the last column out of its bounds, the overflow goes
/// to the columns from `start` onwards in index order instead.
fn fix_rounding(columns: &mut [Column], start: usize) {
    let Some((last, rest)) = columns.split_last_mut() else {
        return;
    };
    let others: f64 = rest.iter().map(|c| c.width).sum();
    let exact = tidy(100.0 - others);
    let clamped = exact.clamp(last.min_width, last.max_width);
    last.width = clamped;

    let mut diff = tidy(exact - clamped);
    for col in rest.iter_mut().skip(start) {
        if diff.abs() <= EPSILON {
            break;
        }
        let w = tidy(col.width + diff);
        let settled = w.clamp(col.min_width, col.max_width);
        diff = tidy(w - settled);
        col.width = settled;
    }
}

/// Change the number of columns, resetting widths to an even split.
///
/// Blocks in removed columns move to the end of the last remaining column.
pub fn set_column_count(group: &mut ColumnGroup, count: usize) -> Result<(), EditorError> {
    if count == 0 || count > MAX_COLUMNS {
        return Err(EditorError::InvalidEdit(format!(
            "column count must be between 1 and {}",
            MAX_COLUMNS
        )));
    }

    if count < group.columns.len() {
        let removed: Vec<Column> = group.columns.drain(count..).collect();
        if let Some(last) = group.columns.last_mut() {
            for col in removed {
                last.blocks.extend(col.blocks);
            }
        }
    }
    while group.columns.len() < count {
        group.columns.push(Column::new(0.0));
    }

    for (col, width) in group.columns.iter_mut().zip(even_widths(count)) {
        col.width = width;
    }
    Ok(())
}

/// Sum of widths in a group.
pub fn total_width(columns: &[Column]) -> f64 {
    columns.iter().map(|c| c.width).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::types::ColumnGroup;

    fn widths(columns: &[Column]) -> Vec<f64> {
        columns.iter().map(|c| c.width).collect()
    }

    fn assert_invariants(columns: &[Column]) {
        assert!((total_width(columns) - 100.0).abs() < 1e-6, "{:?}", widths(columns));
        if columns.len() >= 3 {
            for c in columns {
                assert!(
                    c.width >= c.min_width - 1e-6 && c.width <= c.max_width + 1e-6,
                    "{:?}",
                    widths(columns)
                );
            }
        }
    }

    #[test]
    fn test_even_widths() {
        assert_eq!(even_widths(2), vec![50.0, 50.0]);
        assert_eq!(even_widths(3), vec![33.33, 33.33, 33.34]);
        assert_eq!(even_widths(4), vec![25.0; 4]);
        assert!(even_widths(0).is_empty());
    }

    #[test]
    fn test_two_column_slider() {
        let mut group = ColumnGroup::with_columns(2);
        set_width(&mut group.columns, 0, 30.0).unwrap();
        assert_eq!(widths(&group.columns), vec![30.0, 70.0]);

        set_width(&mut group.columns, 0, 95.0).unwrap();
        assert_eq!(widths(&group.columns), vec![90.0, 10.0]);

        set_width(&mut group.columns, 0, 2.0).unwrap();
        assert_eq!(widths(&group.columns), vec![10.0, 90.0]);

        set_width(&mut group.columns, 1, 40.0).unwrap();
        assert_eq!(widths(&group.columns), vec![60.0, 40.0]);
    }

    #[test]
    fn test_three_columns_proportional() {
        let mut group = ColumnGroup::with_columns(3);
        set_width(&mut group.columns, 0, 40.0).unwrap();
        assert_eq!(widths(&group.columns), vec![40.0, 30.0, 30.0]);
        assert_invariants(&group.columns);
    }

    #[test]
    fn test_earlier_columns_untouched() {
        let mut group = ColumnGroup::with_columns(4);
        set_width(&mut group.columns, 0, 40.0).unwrap();
        assert_eq!(widths(&group.columns), vec![40.0, 20.0, 20.0, 20.0]);

        set_width(&mut group.columns, 1, 30.0).unwrap();
        assert_eq!(group.columns[0].width, 40.0);
        assert_eq!(widths(&group.columns), vec![40.0, 30.0, 15.0, 15.0]);
        assert_invariants(&group.columns);
    }

    #[test]
    fn test_keeps_ratio_of_later_columns() {
        let mut group = ColumnGroup::with_columns(4);
        for (c, w) in group.columns.iter_mut().zip([25.0, 15.0, 30.0, 30.0]) {
            c.width = w;
        }
        set_width(&mut group.columns, 0, 55.0).unwrap();
        // 45 over 15:30:30 is 9/18/18; the 9 is lifted to the minimum and
        // the next column gives up the difference.
        assert_eq!(widths(&group.columns), vec![55.0, 10.0, 17.0, 18.0]);
        assert_invariants(&group.columns);
    }

    #[test]
    fn test_cascading_clamp_takes_from_next_sibling() {
        let mut group = ColumnGroup::with_columns(3);
        for (c, w) in group.columns.iter_mut().zip([30.0, 10.0, 60.0]) {
            c.width = w;
        }
        set_width(&mut group.columns, 0, 50.0).unwrap();
        // 50 remaining over 10:60 gives 7.14 / 42.86; the first is clamped
        // to 10 and the deficit comes out of the next column.
        assert_eq!(widths(&group.columns), vec![50.0, 10.0, 40.0]);
        assert_invariants(&group.columns);
    }

    #[test]
    fn test_value_clamped_to_what_siblings_can_absorb() {
        let mut group = ColumnGroup::with_columns(3);
        set_width(&mut group.columns, 0, 85.0).unwrap();
        // Two later columns need at least 10 each.
        assert_eq!(widths(&group.columns), vec![80.0, 10.0, 10.0]);

        let mut group = ColumnGroup::with_columns(4);
        set_width(&mut group.columns, 0, 1.0).unwrap();
        assert_eq!(group.columns[0].width, 10.0);
        assert_invariants(&group.columns);
    }

    #[test]
    fn test_editing_last_column_keeps_total() {
        let mut group = ColumnGroup::with_columns(3);
        set_width(&mut group.columns, 2, 50.0).unwrap();
        assert_eq!(widths(&group.columns), vec![33.33, 33.33, 33.34]);
    }

    #[test]
    fn test_random_edit_sequences_keep_invariants() {
        // Deterministic pseudo-random walk over edits.
        let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
        let mut next = || {
            seed ^= seed << 13;
            seed ^= seed >> 7;
            seed ^= seed << 17;
            seed
        };
        for n in 2..=4 {
            let mut group = ColumnGroup::with_columns(n);
            for _ in 0..500 {
                let index = (next() % n as u64) as usize;
                let value = (next() % 10_000) as f64 / 100.0;
                set_width(&mut group.columns, index, value).unwrap();
                assert_invariants(&group.columns);
            }
        }
    }

    fn xorshift(seed: &mut u64) -> u64 {
        *seed ^= *seed << 13;
        *seed ^= *seed >> 7;
        *seed ^= *seed << 17;
        *seed
    }

    fn unit(seed: &mut u64) -> f64 {
        (xorshift(seed) % 1_000_000) as f64 / 1_000_000.0
    }

    #[test]
    fn test_loaded_thirds_keep_total() {
        let mut group = ColumnGroup::with_columns(3);
        for c in &mut group.columns {
            c.width = 100.0 / 3.0;
        }
        set_width(&mut group.columns, 1, 80.0).unwrap();
        assert_eq!(group.columns[0].width, 100.0 / 3.0);
        assert_eq!(group.columns[2].width, 10.0);
        assert!(group.columns[1].width <= 100.0 - 100.0 / 3.0 - 10.0 + 1e-9);
        assert_invariants(&group.columns);
    }

    #[test]
    fn test_loaded_bounds_and_widths_keep_invariants() {
        let mut seed: u64 = 0x9e37_79b9_7f4a_7c15;
        for trial in 0..300 {
            let n = 3 + trial % 2;
            let weights: Vec<f64> = (0..n).map(|_| 1.0 + 9.0 * unit(&mut seed)).collect();
            let total: f64 = weights.iter().sum();
            let mut group = ColumnGroup::with_columns(n);
            for (col, weight) in group.columns.iter_mut().zip(&weights) {
                let w = 100.0 * weight / total;
                col.width = w;
                col.min_width = round2(w * (0.3 + 0.5 * unit(&mut seed)));
                col.max_width = round2(w + (100.0 - w) * (0.2 + 0.8 * unit(&mut seed)));
            }
            assert_invariants(&group.columns);
            for _ in 0..50 {
                let index = (xorshift(&mut seed) % n as u64) as usize;
                let value = 100.0 * unit(&mut seed);
                set_width(&mut group.columns, index, value).unwrap();
                assert_invariants(&group.columns);
            }
        }
    }

    #[test]
    fn test_inverted_bounds_are_rejected() {
        let json = r#"{"id":"g","columns":[
            {"id":"a","width":50,"min_width":60,"max_width":40},
            {"id":"b","width":25},
            {"id":"c","width":25}
        ]}"#;
        let mut group: ColumnGroup = serde_json::from_str(json).unwrap();
        let err = set_width(&mut group.columns, 0, 50.0).unwrap_err();
        assert!(matches!(err, EditorError::InvalidEdit(_)), "{err:?}");
        assert_eq!(widths(&group.columns), vec![50.0, 25.0, 25.0]);
    }

    #[test]
    fn test_bounds_that_cannot_reach_100_are_rejected() {
        let mut group = ColumnGroup::with_columns(3);
        for c in &mut group.columns {
            c.min_width = 40.0;
        }
        assert!(matches!(
            set_width(&mut group.columns, 1, 30.0),
            Err(EditorError::InvalidEdit(_))
        ));

        let mut group = ColumnGroup::with_columns(4);
        for c in &mut group.columns {
            c.max_width = 20.0;
        }
        assert!(set_width(&mut group.columns, 0, 20.0).is_err());
        assert_eq!(widths(&group.columns), vec![25.0; 4]);
    }

    #[test]
    fn test_two_column_slider_ignores_column_bounds() {
        let mut group = ColumnGroup::with_columns(2);
        group.columns[0].min_width = 60.0;
        group.columns[0].max_width = 40.0;
        set_width(&mut group.columns, 0, 30.0).unwrap();
        assert_eq!(widths(&group.columns), vec![30.0, 70.0]);
    }

    #[test]
    fn test_out_of_range_index() {
        let mut group = ColumnGroup::with_columns(2);
        assert!(set_width(&mut group.columns, 2, 50.0).is_err());
        assert!(set_width(&mut group.columns, 0, f64::NAN).is_err());
    }

    #[test]
    fn test_set_column_count_moves_blocks() {
        let mut group = ColumnGroup::with_columns(3);
        group.columns[2]
            .blocks
            .push(crate::editor::default_primitive("text").unwrap());
        set_column_count(&mut group, 2).unwrap();
        assert_eq!(group.columns.len(), 2);
        assert_eq!(group.columns[1].blocks.len(), 1);
        assert_eq!(widths(&group.columns), vec![50.0, 50.0]);

        set_column_count(&mut group, 4).unwrap();
        assert_eq!(widths(&group.columns), vec![25.0; 4]);
        assert!(set_column_count(&mut group, 5).is_err());
        assert!(set_column_count(&mut group, 0).is_err());
    }
}
