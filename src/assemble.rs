use crate::{pack::Placement, sdf::SdfTile, Error};

/// Value of atlas pixels no tile covers.
pub const FILL_VALUE: u8 = 0;

/// The finished single-channel atlas image, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AtlasBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl AtlasBuffer {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Copies out the `width` x `height` block whose top-left corner is
    /// `(x, y)`, or `None` if it reaches past the atlas edge.
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> Option<Vec<u8>> {
        if x + width > self.width || y + height > self.height {
            return None;
        }
        let stride = self.width as usize;
        let (x, width) = (x as usize, width as usize);
        let mut out = Vec::with_capacity(width * height as usize);
        for row in y as usize..(y + height) as usize {
            let start = row * stride + x;
            out.extend_from_slice(&self.data[start..start + width]);
        }
        Some(out)
    }
}

struct Buffer<'a> {
    data: &'a mut [u8],
    width: usize,
}

impl Buffer<'_> {
    fn blit(&mut self, tile: &SdfTile, at: Placement) {
        let (x, y) = (at.x as usize, at.y as usize);
        for local_row in 0..tile.size() {
            let start = (y + local_row) * self.width + x;
            self.data[start..start + tile.size()].copy_from_slice(tile.row(local_row));
        }
    }
}

/// Composes `tiles` into one buffer, tile `i` going to `placements[i]`.
pub fn assemble(
    tiles: &[SdfTile],
    placements: &[Placement],
    width: u32,
    height: u32,
) -> Result<AtlasBuffer, Error> {
    if tiles.len() != placements.len() {
        return Err(Error::config(format!(
            "{} tiles but {} placements",
            tiles.len(),
            placements.len()
        )));
    }
    let mut data = vec![FILL_VALUE; width as usize * height as usize];
    let mut buffer = Buffer {
        data: &mut data,
        width: width as usize,
    };
    for (index, (tile, &at)) in tiles.iter().zip(placements).enumerate() {
        let size = tile.size() as u64;
        if u64::from(at.x) + size > u64::from(width) || u64::from(at.y) + size > u64::from(height) {
            return Err(Error::TileOutOfBounds { index });
        }
        buffer.blit(tile, at);
    }
    Ok(AtlasBuffer {
        width,
        height,
        data,
    })
}
