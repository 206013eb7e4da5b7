// Row creation: placement above the stack plus active-column selection.

use std::collections::BTreeSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::{Row, RowStack};
use crate::config::GameConfig;

/// Chooses the active columns of a freshly created row.
pub trait ColumnPicker {
    fn pick(&mut self, config: &GameConfig) -> BTreeSet<usize>;
}

/// Default picker. A draw under `multi_tile_probability` gives an easy row with
/// one tile; otherwise `black_tile_count` columns are drawn independently with
/// replacement, so repeated draws collapse into a smaller set.
#[derive(Clone, Debug)]
pub struct RandomColumns {
    rng: ChaCha8Rng,
}

impl RandomColumns {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seed from the platform entropy source (`crypto.getRandomValues` in the
    /// browser).
    pub fn from_entropy() -> Result<Self, getrandom::Error> {
        let mut seed = [0u8; 8];
        getrandom::getrandom(&mut seed)?;
        Ok(Self::from_seed(u64::from_le_bytes(seed)))
    }
}

impl ColumnPicker for RandomColumns {
    fn pick(&mut self, config: &GameConfig) -> BTreeSet<usize> {
        let cols = config.col_count;
        if self.rng.gen_bool(config.multi_tile_probability) {
            return BTreeSet::from([self.rng.gen_range(0..cols)]);
        }
        (0..config.black_tile_count)
            .map(|_| self.rng.gen_range(0..cols))
            .collect()
    }
}

/// Builds rows on top of a [`RowStack`].
#[derive(Clone, Debug)]
pub struct RowFactory<P = RandomColumns> {
    picker: P,
}

impl<P: ColumnPicker> RowFactory<P> {
    pub fn new(picker: P) -> Self {
        Self { picker }
    }

    /// Create the next row. The first row starts at the bottom edge of the
    /// canvas; every later one sits directly above the current topmost row.
    pub fn create_row(&mut self, stack: &RowStack, config: &GameConfig) -> Row {
        let vertical_position = match stack.last() {
            Some(last) => last.vertical_position() - last.height(),
            None => config.canvas_height,
        };
        let active = self.picker.pick(config);
        Row::new(
            stack.created() as u64,
            vertical_position,
            config.canvas_width,
            config.row_height(),
            active,
        )
    }
}
