//! Row vectors for centring a partial last row.
//!
//! A row vector lists, slot by slot, which item sits in the slot. Empty
//! slots are explicit `None` placeholders. Slots are one column wide and
//! the vector is centred on the region's origin, so a vector shorter than
//! the column count shifts the row by half a column.

/// Slot assignment of one row.
pub type RowVector = Vec<Option<usize>>;

/// Centre `items` (< `columns`) in a row of `columns`.
///
/// Same parity: pad with empty slots on both sides. Different parity:
/// the row cannot be centred on whole columns, so it is built over
/// `columns - 1` slots instead.
pub fn row_vector(items: usize, columns: usize) -> RowVector {
    if items >= columns {
        return (0..items).map(Some).collect();
    }
    if items % 2 == columns % 2 {
        generate_odd(items, columns)
    } else {
        generate_even(items, columns)
    }
}

/// `items` and `slots` share parity: equal padding on both sides.
pub fn generate_odd(items: usize, slots: usize) -> RowVector {
    let pad = (slots - items) / 2;
    let mut vector = vec![None; pad];
    vector.extend((0..items).map(Some));
    vector.extend(std::iter::repeat_n(None, pad));
    vector
}

/// Parities differ: split the items across two half-spans of
/// `(columns - 1) / 2` slots each side of the centre line, the first half
/// packed against the centre from the left, the rest from the right.
pub fn generate_even(items: usize, columns: usize) -> RowVector {
    let slots = columns - 1;
    let left_items = items / 2;
    let right_items = items - left_items;
    let left_span = slots / 2;
    let right_span = slots - left_span;

    let mut vector = vec![None; left_span.saturating_sub(left_items)];
    vector.extend((0..left_items).map(Some));
    let mut right: RowVector = (left_items..items).map(Some).collect();
    right.extend(std::iter::repeat_n(None, right_span.saturating_sub(right_items)));
    vector.extend(right);
    vector
}
