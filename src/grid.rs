use crate::{bisect::MAX_TEXTURE_SIDE, pack::Placement, Error};

/// A fixed number of equally sized cells, filled row by row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    pub cell: u32,
}

impl GridLayout {
    /// The smallest square grid with room for `count` cells.
    pub fn square_for(count: usize, cell: u32) -> Self {
        let mut side = (count as f64).sqrt().ceil() as u32;
        // guard against the float estimate landing one short
        while (side as usize) * (side as usize) < count {
            side += 1;
        }
        Self {
            columns: side.max(1),
            rows: side.max(1),
            cell,
        }
    }

    pub fn capacity(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn width(&self) -> u32 {
        self.columns.saturating_mul(self.cell)
    }

    pub fn height(&self) -> u32 {
        self.rows.saturating_mul(self.cell)
    }

    /// Placements for `count` cells in row-major order.
    pub fn place(&self, count: usize) -> Result<Vec<Placement>, Error> {
        if self.columns == 0 || self.rows == 0 || self.cell == 0 {
            return Err(Error::config("grid dimensions must be positive"));
        }
        let side = |cells: u32| cells.checked_mul(self.cell).filter(|&px| px <= MAX_TEXTURE_SIDE);
        if side(self.columns).is_none() || side(self.rows).is_none() {
            return Err(Error::config(format!(
                "a {}x{} grid of {}px cells exceeds {}px",
                self.columns, self.rows, self.cell, MAX_TEXTURE_SIDE
            )));
        }
        if count > self.capacity() {
            return Err(Error::AtlasOverflow {
                requested: count,
                capacity: self.capacity(),
            });
        }
        let columns = self.columns as usize;
        Ok((0..count)
            .map(|i| Placement {
                x: (i % columns) as u32 * self.cell,
                y: (i / columns) as u32 * self.cell,
            })
            .collect())
    }
}
