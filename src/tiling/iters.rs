use super::{Tile, Tiling};
use std::{iter::*, ops::Range};

impl<'a> IntoIterator for &'a Tiling {
    type Item = Tile;
    type IntoIter = Map<Range<usize>, Box<dyn Fn(usize) -> Tile + 'a>>;

    fn into_iter(self) -> Self::IntoIter {
        (0..self.len()).map(Box::new(move |idx| self.tile(idx)))
    }
}

impl Tiling {
    /// Create an [ `ExactSizeIterator` ] over the tiles in
    /// row-major order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Tile> + '_ {
        (0..self.len()).map(move |idx| self.tile(idx))
    }
}
