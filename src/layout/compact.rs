//! Compact spacing: rows packed by measured label width.

/// Greedy left-to-right packing. A row wraps when the next item would push
/// it past `nominal_width`; an item wider than the row gets a row of its own.
pub fn pack_rows(widths: &[f64], nominal_width: f64, gap: f64) -> Vec<Vec<usize>> {
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut running = 0.0;
    for (idx, &width) in widths.iter().enumerate() {
        match rows.last_mut() {
            Some(row) if running + gap + width <= nominal_width => {
                row.push(idx);
                running += gap + width;
            }
            _ => {
                rows.push(vec![idx]);
                running = width;
            }
        }
    }
    rows
}

/// Centre offsets of one row, relative to the column centre line.
///
/// Items are first laid end to end and the row block centred. A two-pointer
/// sweep then pairs items from the outside in and moves each pair onto a
/// symmetric span, so the row's visual centroid sits on the centre line.
/// A final pass from the centre outwards widens spans where a pair would
/// overlap its inner neighbours.
pub fn center_row(widths: &[f64], gap: f64) -> Vec<f64> {
    let n = widths.len();
    if n == 0 {
        return Vec::new();
    }

    let total: f64 = widths.iter().sum::<f64>() + gap * (n - 1) as f64;
    let mut xs = Vec::with_capacity(n);
    let mut cursor = -total / 2.0;
    for &width in widths {
        xs.push(cursor + width / 2.0);
        cursor += width + gap;
    }

    // outside-in symmetric sweep
    let (mut i, mut j) = (0, n - 1);
    while i < j {
        let span = (-xs[i]).max(xs[j]);
        xs[i] = -span;
        xs[j] = span;
        i += 1;
        j -= 1;
    }
    if i == j {
        xs[i] = 0.0;
    }

    // centre-out spacing
    for i in (0..n / 2).rev() {
        let j = n - 1 - i;
        let needed = if j - i == 1 {
            (widths[i] / 2.0 + widths[j] / 2.0 + gap) / 2.0
        } else {
            let right = xs[j - 1] + widths[j - 1] / 2.0 + gap + widths[j] / 2.0;
            let left = -xs[i + 1] + widths[i + 1] / 2.0 + gap + widths[i] / 2.0;
            right.max(left)
        };
        let span = xs[j].max(needed);
        xs[i] = -span;
        xs[j] = span;
    }
    xs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_when_nominal_width_is_exceeded() {
        let rows = pack_rows(&[40.0, 40.0, 40.0, 200.0, 10.0], 100.0, 10.0);
        assert_eq!(rows, vec![vec![0, 1], vec![2], vec![3], vec![4]]);
    }

    #[test]
    fn rows_are_symmetric_and_do_not_overlap() {
        let widths = [100.0, 10.0, 10.0, 60.0];
        let gap = 5.0;
        let xs = center_row(&widths, gap);
        for (a, b) in xs.iter().zip(xs.iter().rev()) {
            assert!((a + b).abs() < 1e-9);
        }
        for k in 0..widths.len() - 1 {
            let right_edge = xs[k] + widths[k] / 2.0;
            let next_left = xs[k + 1] - widths[k + 1] / 2.0;
            assert!(next_left - right_edge >= gap - 1e-9, "overlap between {k} and {}", k + 1);
        }
    }

    #[test]
    fn odd_row_keeps_middle_on_centre() {
        let xs = center_row(&[10.0, 100.0, 10.0], 5.0);
        assert_eq!(xs[1], 0.0);
        assert_eq!(xs[0], -xs[2]);
        assert!(xs[2] - 5.0 >= 50.0 + 5.0);
    }

    #[test]
    fn single_item_sits_on_centre() {
        assert_eq!(center_row(&[42.0], 5.0), vec![0.0]);
    }
}
