//! Row-major grid of subplot slots.

/// One position of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub row: usize,
    pub col: usize,
    /// Index of the dataset drawn in this slot, `None` for trailing slots.
    pub dataset: Option<usize>,
    /// Hidden slots are not drawn at all, not even an empty frame.
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    n_rows: usize,
    n_cols: usize,
    slots: Vec<Slot>,
}

impl Grid {
    /// Lay out `n_datasets` subplots in at most `ncols` columns.
    ///
    /// The column count is clamped to `n_datasets` so no column is empty.
    /// Datasets fill the slots in order; the remaining slots are hidden.
    pub fn new(n_datasets: usize, ncols: usize) -> Self {
        let n_cols = ncols.min(n_datasets).max(1);
        let n_rows = n_datasets.div_ceil(n_cols).max(1);

        let slots = (0..n_rows * n_cols)
            .map(|idx| Slot {
                row: idx / n_cols,
                col: idx % n_cols,
                dataset: (idx < n_datasets).then_some(idx),
                visible: idx < n_datasets,
            })
            .collect();

        Self {
            n_rows,
            n_cols,
            slots,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn n_visible(&self) -> usize {
        self.slots.iter().filter(|slot| slot.visible).count()
    }

    pub fn n_hidden(&self) -> usize {
        self.slots.len() - self.n_visible()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_last_row_hides_trailing_slots() {
        let grid = Grid::new(4, 3);
        assert_eq!((grid.n_rows(), grid.n_cols()), (2, 3));
        assert_eq!(grid.n_visible(), 4);
        assert_eq!(grid.n_hidden(), 2);
        let hidden: Vec<_> = grid
            .slots()
            .iter()
            .filter(|slot| !slot.visible)
            .map(|slot| (slot.row, slot.col))
            .collect();
        assert_eq!(hidden, vec![(1, 1), (1, 2)]);
    }

    #[test]
    fn columns_are_clamped_to_dataset_count() {
        let grid = Grid::new(2, 3);
        assert_eq!((grid.n_rows(), grid.n_cols()), (1, 2));
        assert_eq!(grid.n_hidden(), 0);
    }

    #[test]
    fn slots_are_row_major() {
        let grid = Grid::new(5, 2);
        let order: Vec<_> = grid
            .slots()
            .iter()
            .map(|slot| (slot.row, slot.col, slot.dataset))
            .collect();
        assert_eq!(
            order,
            vec![
                (0, 0, Some(0)),
                (0, 1, Some(1)),
                (1, 0, Some(2)),
                (1, 1, Some(3)),
                (2, 0, Some(4)),
                (2, 1, None),
            ]
        );
    }

    #[test]
    fn visible_and_hidden_counts_match_grid_size() {
        for k in 1..=10 {
            for ncols in 1..=5 {
                let grid = Grid::new(k, ncols);
                let c = ncols.min(k);
                let r = k.div_ceil(c);
                assert_eq!(grid.n_visible(), k);
                assert_eq!(grid.n_hidden(), r * c - k);
            }
        }
    }
}
