use rayon::iter::Map;
use rayon::prelude::*;
use rayon::range::Iter;

use super::*;

impl Tiling {
    /// Create an [ `IndexedParallelIterator` ] over the tiles.
    ///
    /// This function is only available with the "use-rayon" feature.
    pub fn par_iter(&self) -> impl IndexedParallelIterator<Item = Tile> + '_ {
        (0..self.len()).into_par_iter().map(move |idx| self.tile(idx))
    }
}

impl<'a> IntoParallelIterator for &'a Tiling {
    type Item = Tile;
    type Iter = Map<Iter<usize>, Box<dyn Fn(usize) -> Tile + Send + Sync + 'a>>;

    fn into_par_iter(self) -> Self::Iter {
        (0..self.len()).into_par_iter().map(Box::new(move |idx| self.tile(idx)))
    }
}
