//! Coverage grid to signed distance field conversion.
//!
//! The coverage grid is split into two potentials, one seeded on the
//! glyph's outside and one on its inside, and each is run through a
//! separable squared Euclidean distance transform (Felzenszwalb &
//! Huttenlocher, "Distance Transforms of Sampled Functions"). The
//! difference of their square roots is the signed distance to the edge.

use crate::{source::AlphaGrid, Error};

/// Stands in for "infinitely far"; larger than any squared distance a
/// `u16`-sized grid can produce.
pub const INF: f64 = 1e20;

/// One glyph's distance field, the same size as the grid it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SdfTile {
    size: usize,
    data: Vec<u8>,
}

impl SdfTile {
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row-major encoded distances; 255 is deep inside, 0 far outside.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.size..(y + 1) * self.size]
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.size + x]
    }
}

/// Builds [`SdfTile`]s for grids of one fixed size, reusing its scratch
/// buffers between glyphs.
#[derive(Clone, Debug)]
pub struct DistanceFieldBuilder {
    size: usize,
    radius: f64,
    cutoff: f64,
    grid_outer: Vec<f64>,
    grid_inner: Vec<f64>,
    scratch: Scratch,
}

impl DistanceFieldBuilder {
    /// `radius` scales distances into the byte range, `cutoff` picks the
    /// byte value that marks the glyph edge (`255 * (1 - cutoff)`).
    pub fn new(size: usize, radius: f64, cutoff: f64) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::config("tile size must be positive"));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::config(format!(
                "radius must be finite and positive, got {radius}"
            )));
        }
        if !(cutoff > 0.0 && cutoff < 1.0) {
            return Err(Error::config(format!(
                "cutoff must lie strictly between 0 and 1, got {cutoff}"
            )));
        }
        Ok(Self {
            size,
            radius,
            cutoff,
            grid_outer: vec![0.0; size * size],
            grid_inner: vec![0.0; size * size],
            scratch: Scratch::new(size),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn build(&mut self, alpha: &AlphaGrid) -> Result<SdfTile, Error> {
        self.distance_grids(alpha)?;
        let data = self
            .grid_outer
            .iter()
            .zip(&self.grid_inner)
            .map(|(&outer, &inner)| encode(outer.sqrt() - inner.sqrt(), self.radius, self.cutoff))
            .collect();
        Ok(SdfTile {
            size: self.size,
            data,
        })
    }

    /// Squared distances to the nearest outside (first) and inside
    /// (second) cell, before encoding.
    pub fn distance_grids(&mut self, alpha: &AlphaGrid) -> Result<(&[f64], &[f64]), Error> {
        if alpha.size() != self.size {
            return Err(Error::config(format!(
                "alpha grid is {}px, expected {}px",
                alpha.size(),
                self.size
            )));
        }
        for ((outer, inner), &coverage) in self
            .grid_outer
            .iter_mut()
            .zip(self.grid_inner.iter_mut())
            .zip(alpha.data())
        {
            (*outer, *inner) = potentials(coverage);
        }
        edt(&mut self.grid_outer, self.size, self.size, &mut self.scratch);
        edt(&mut self.grid_inner, self.size, self.size, &mut self.scratch);
        Ok((&self.grid_outer, &self.grid_inner))
    }
}

/// The outer and inner seed values for one cell of coverage.
fn potentials(coverage: u8) -> (f64, f64) {
    match coverage {
        u8::MAX => (0.0, INF),
        0 => (INF, 0.0),
        _ => {
            let a = f64::from(coverage) / 255.0;
            ((0.5 - a).max(0.0).powi(2), (a - 0.5).max(0.0).powi(2))
        }
    }
}

fn encode(distance: f64, radius: f64, cutoff: f64) -> u8 {
    (255.0 - 255.0 * (distance / radius + cutoff))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Squared Euclidean distance transform of a `width` x `height` grid, in
/// place. Cells holding `0.0` are the seeds, cells holding [`INF`] have no
/// seed of their own.
///
/// Panics if `grid` is not `width * height` long.
pub fn squared_distance_transform(grid: &mut [f64], width: usize, height: usize) {
    assert_eq!(grid.len(), width * height);
    let mut scratch = Scratch::new(width.max(height));
    edt(grid, width, height, &mut scratch);
}

#[derive(Clone, Debug)]
struct Scratch {
    /// values along the line being transformed
    f: Vec<f64>,
    /// breakpoints between neighbouring parabolas
    z: Vec<f64>,
    /// parabola owners, in increasing order
    v: Vec<usize>,
}

impl Scratch {
    fn new(len: usize) -> Self {
        Self {
            f: vec![0.0; len],
            z: vec![0.0; len + 1],
            v: vec![0; len],
        }
    }
}

fn edt(grid: &mut [f64], width: usize, height: usize, scratch: &mut Scratch) {
    for x in 0..width {
        edt1d(grid, x, width, height, scratch);
    }
    for y in 0..height {
        edt1d(grid, y * width, 1, width, scratch);
    }
}

fn edt1d(grid: &mut [f64], offset: usize, stride: usize, length: usize, scratch: &mut Scratch) {
    if length == 0 {
        return;
    }
    let Scratch { f, z, v } = scratch;
    for q in 0..length {
        f[q] = grid[offset + q * stride];
    }
    v[0] = 0;
    z[0] = f64::NEG_INFINITY;
    z[1] = f64::INFINITY;

    // lower envelope
    let mut k = 0;
    for q in 1..length {
        let qf = q as f64;
        let mut s;
        loop {
            let r = v[k];
            let rf = r as f64;
            s = ((f[q] - f[r]) + (qf * qf - rf * rf)) / (2.0 * (qf - rf));
            // z[0] is -inf, so this stops at k == 0 at the latest
            if s <= z[k] {
                k -= 1;
            } else {
                break;
            }
        }
        k += 1;
        v[k] = q;
        z[k] = s;
        z[k + 1] = f64::INFINITY;
    }

    k = 0;
    for q in 0..length {
        let qf = q as f64;
        while z[k + 1] < qf {
            k += 1;
        }
        let r = v[k];
        let d = qf - r as f64;
        grid[offset + q * stride] = f[r] + d * d;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn disc(size: usize, radius: f64) -> AlphaGrid {
        let centre = size as f64 / 2.0;
        let data = (0..size * size)
            .map(|i| {
                let x = (i % size) as f64 + 0.5 - centre;
                let y = (i / size) as f64 + 0.5 - centre;
                if (x * x + y * y).sqrt() <= radius {
                    255
                } else {
                    0
                }
            })
            .collect();
        AlphaGrid::new(size, data).unwrap()
    }

    #[test]
    fn test_single_covered_pixel_row() {
        let alpha = [0.0_f64, 0.0, 1.0, 0.0, 0.0];
        let mut outer: Vec<f64> = alpha.iter().map(|&a| if a == 1.0 { 0.0 } else { INF }).collect();
        let mut inner: Vec<f64> = alpha.iter().map(|&a| if a == 1.0 { INF } else { 0.0 }).collect();
        squared_distance_transform(&mut outer, 5, 1);
        squared_distance_transform(&mut inner, 5, 1);
        for (got, want) in outer.iter().zip([4.0, 1.0, 0.0, 1.0, 4.0]) {
            assert!((got - want).abs() < EPSILON, "{outer:?}");
        }
        for (got, want) in inner.iter().zip([0.0, 0.0, 1.0, 0.0, 0.0]) {
            assert!((got - want).abs() < EPSILON, "{inner:?}");
        }
    }

    #[test]
    fn test_column_transform_matches_row_transform() {
        let mut row = vec![INF, INF, 0.0, INF, INF, INF, INF];
        let mut column = row.clone();
        squared_distance_transform(&mut row, 7, 1);
        squared_distance_transform(&mut column, 1, 7);
        assert_eq!(row, column);
        assert_eq!(row, vec![4.0, 1.0, 0.0, 1.0, 4.0, 9.0, 16.0]);
    }

    #[test]
    fn test_two_dimensional_distances_are_euclidean() {
        let size = 9;
        let mut grid = vec![INF; size * size];
        grid[4 * size + 4] = 0.0;
        squared_distance_transform(&mut grid, size, size);
        for y in 0..size {
            for x in 0..size {
                let dx = x as f64 - 4.0;
                let dy = y as f64 - 4.0;
                assert!((grid[y * size + x] - (dx * dx + dy * dy)).abs() < EPSILON);
            }
        }
    }

    #[test]
    fn test_seeds_stay_at_zero() {
        let size = 12;
        let data = (0..size * size).map(|i| ((i * 37) % 256) as u8).collect();
        let alpha = AlphaGrid::new(size, data).unwrap();
        let mut builder = DistanceFieldBuilder::new(size, 3.0, 0.25).unwrap();
        let (outer, inner) = builder.distance_grids(&alpha).unwrap();
        for (i, &a) in alpha.data().iter().enumerate() {
            if a == 255 {
                assert_eq!(outer[i], 0.0);
            }
            if a == 0 {
                assert_eq!(inner[i], 0.0);
            }
        }
    }

    #[test]
    fn test_disc_is_brighter_in_the_middle() {
        let size = 24;
        let mut builder = DistanceFieldBuilder::new(size, 6.0, 0.25).unwrap();
        let tile = builder.build(&disc(size, 6.0)).unwrap();
        assert_eq!(tile.size(), size);
        assert_eq!(tile.data().len(), size * size);
        let centre = tile.get(size / 2, size / 2);
        assert!(centre > tile.get(0, 0));
        assert!(centre > tile.get(size - 1, size / 2));
        assert!(centre > 191, "edge sits at 191, centre was {centre}");
        assert_eq!(tile.get(0, 0), 0);
    }

    #[test]
    fn test_blank_grid_encodes_as_far_outside() {
        let mut builder = DistanceFieldBuilder::new(8, 2.0, 0.25).unwrap();
        let tile = builder.build(&AlphaGrid::blank(8)).unwrap();
        assert!(tile.data().iter().all(|&d| d == 0));
    }

    #[test]
    fn test_encode_edge_value() {
        assert_eq!(encode(0.0, 8.0, 0.25), 191);
        assert_eq!(encode(-100.0, 8.0, 0.25), 255);
        assert_eq!(encode(100.0, 8.0, 0.25), 0);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(DistanceFieldBuilder::new(0, 8.0, 0.25).is_err());
        assert!(DistanceFieldBuilder::new(8, 0.0, 0.25).is_err());
        assert!(DistanceFieldBuilder::new(8, f64::NAN, 0.25).is_err());
        assert!(DistanceFieldBuilder::new(8, 8.0, 0.0).is_err());
        assert!(DistanceFieldBuilder::new(8, 8.0, 1.0).is_err());
    }

    #[test]
    fn test_rejects_mismatched_grid() {
        let mut builder = DistanceFieldBuilder::new(8, 2.0, 0.25).unwrap();
        assert!(builder.build(&AlphaGrid::blank(4)).is_err());
    }
}
