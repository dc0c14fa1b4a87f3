/// A square grid of 8-bit coverage values, one glyph drawn by a
/// [`GlyphSource`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlphaGrid {
    size: usize,
    data: Vec<u8>,
}

impl AlphaGrid {
    /// Wraps row-major coverage data; `None` if `data` is not `size * size`
    /// long or `size` is zero.
    pub fn new(size: usize, data: Vec<u8>) -> Option<Self> {
        (size > 0 && data.len() == size * size).then_some(Self { size, data })
    }

    /// A grid with no coverage at all, used for glyphs that can't be drawn.
    pub fn blank(size: usize) -> Self {
        Self {
            size,
            data: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// The drawing parameters a [`GlyphSource`] is asked to honour.
///
/// The glyph origin sits `buffer` pixels from the left edge and the em box
/// is centred vertically on the tile, so that the baseline offset used for
/// [`MetricsRecord::y_offset`](crate::MetricsRecord::y_offset) lines up
/// with what was drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterParams {
    pub font_size: u32,
    pub buffer: u32,
}

impl RasterParams {
    /// Side length of the grid: `font_size + 2 * buffer`.
    pub fn size(&self) -> usize {
        self.font_size as usize + 2 * self.buffer as usize
    }
}

/// Turns characters into coverage grids.
pub trait GlyphSource {
    /// Draw `ch`, returning `None` if this source has no glyph for it.
    ///
    /// A returned grid must be `params.size()` on a side; anything else is
    /// treated the same as `None`.
    fn rasterize(&mut self, ch: char, params: &RasterParams) -> Option<AlphaGrid>;

    /// The horizontal advance of `ch` in pixels at `font_size`, if known.
    fn measure(&mut self, ch: char, font_size: u32) -> Option<f32>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_length_is_checked() {
        assert!(AlphaGrid::new(3, vec![0; 9]).is_some());
        assert!(AlphaGrid::new(3, vec![0; 8]).is_none());
        assert!(AlphaGrid::new(0, Vec::new()).is_none());
    }

    #[test]
    fn test_blank_grid() {
        let grid = AlphaGrid::blank(4);
        assert_eq!(grid.size(), 4);
        assert_eq!(grid.data().len(), 16);
        assert!(grid.data().iter().all(|&a| a == 0));
    }

    #[test]
    fn test_raster_params_size() {
        let params = RasterParams {
            font_size: 32,
            buffer: 4,
        };
        assert_eq!(params.size(), 40);
    }
}
