// Ordered column of rows, oldest (closest to the strike line) first.

use super::Row;

/// Rows stack strictly upward: each row sits directly on top of the previous
/// one with no gap or overlap, and rows are never reordered.
#[derive(Clone, Debug, Default)]
pub struct RowStack {
    rows: Vec<Row>,
    created: usize,
}

impl RowStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows pushed since the stack was built, including pruned ones.
    pub fn created(&self) -> usize {
        self.created
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Topmost (newest) row.
    pub fn last(&self) -> Option<&Row> {
        self.rows.last()
    }

    pub(crate) fn push(&mut self, row: Row) {
        if let Some(last) = self.rows.last() {
            let expected = last.vertical_position() - last.height();
            debug_assert!(
                (row.vertical_position() - expected).abs() < 1e-6,
                "new row must sit directly above the last row"
            );
        }
        self.rows.push(row);
        self.created += 1;
    }

    pub(crate) fn clear(&mut self) {
        self.rows.clear();
        self.created = 0;
    }

    /// Index of the oldest row that still has active tiles.
    pub fn frontier_index(&self) -> Option<usize> {
        self.rows.iter().position(|row| !row.is_complete())
    }

    pub fn frontier(&self) -> Option<&Row> {
        self.frontier_index().map(|i| &self.rows[i])
    }

    pub(crate) fn frontier_mut(&mut self) -> Option<&mut Row> {
        let idx = self.frontier_index()?;
        self.rows.get_mut(idx)
    }

    pub(crate) fn advance_all(&mut self, delta: f64) {
        for row in &mut self.rows {
            row.advance(delta);
        }
    }

    pub(crate) fn retreat_all(&mut self, delta: f64) {
        for row in &mut self.rows {
            row.retreat(delta);
        }
    }

    /// Drop completed rows that have scrolled entirely past `bottom`. Only the
    /// leading run of complete rows is eligible, so the frontier and every row
    /// above it stay in place. Returns how many rows were removed.
    pub(crate) fn prune_below(&mut self, bottom: f64) -> usize {
        let gone = self
            .rows
            .iter()
            .take_while(|row| row.is_complete() && row.is_below(bottom))
            .count();
        self.rows.drain(..gone);
        gone
    }

    /// Check the no-gap / no-overlap invariant with a float tolerance.
    pub fn is_contiguous(&self) -> bool {
        self.rows.windows(2).all(|pair| {
            let expected = pair[0].vertical_position() - pair[0].height();
            (pair[1].vertical_position() - expected).abs() < 1e-6
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn stacked(actives: &[&[usize]]) -> RowStack {
        let mut stack = RowStack::new();
        let mut y = 800.0;
        for (i, cols) in actives.iter().enumerate() {
            stack.push(Row::new(
                i as u64,
                y,
                400.0,
                200.0,
                cols.iter().copied().collect::<BTreeSet<_>>(),
            ));
            y -= 200.0;
        }
        stack
    }

    #[test]
    fn frontier_skips_complete_rows() {
        let stack = stacked(&[&[], &[1], &[2]]);
        assert_eq!(stack.frontier_index(), Some(1));
        assert_eq!(stack.frontier().map(Row::id), Some(1));
    }

    #[test]
    fn no_frontier_when_everything_is_resolved() {
        let stack = stacked(&[&[], &[]]);
        assert!(stack.frontier().is_none());
    }

    #[test]
    fn advance_keeps_rows_contiguous() {
        let mut stack = stacked(&[&[0], &[1], &[2]]);
        for _ in 0..250 {
            stack.advance_all(2.3);
        }
        stack.retreat_all(7.0);
        assert!(stack.is_contiguous());
    }

    #[test]
    fn prune_only_takes_leading_complete_rows() {
        // Row 0 and 1 are complete and below 800; row 2 is the frontier.
        let mut stack = stacked(&[&[], &[], &[3], &[]]);
        stack.advance_all(450.0);
        assert_eq!(stack.prune_below(800.0), 2);
        assert_eq!(stack.frontier().map(Row::id), Some(2));
        assert_eq!(stack.created(), 4);
        assert!(stack.is_contiguous());
    }

    #[test]
    fn prune_leaves_rows_still_on_screen() {
        let mut stack = stacked(&[&[], &[0]]);
        assert_eq!(stack.prune_below(800.0), 1);
        assert_eq!(stack.prune_below(800.0), 0);
        assert_eq!(stack.len(), 1);
    }
}
