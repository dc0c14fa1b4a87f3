/* SPDX-License-Identifier: (Apache-2.0 OR MIT OR Zlib) */
/* Copyright © 2023 Violet Leonard */

//! Uniform tile layouts backed by `crunch`, for atlases that must fit a
//! given texture size or be as small a square as possible.

use crate::{pack::Placement, Error};

/// Largest texture side this module will try.
pub const MAX_TEXTURE_SIDE: u32 = u16::MAX as u32;

/// Packs `count` square tiles of side `tile` into a `width` x `height`
/// texture.
pub fn pack_into(tile: u32, count: usize, width: u32, height: u32) -> Result<Vec<Placement>, Error> {
    if width == 0 || height == 0 {
        return Err(Error::config("texture size must be positive"));
    }
    if width > MAX_TEXTURE_SIDE || height > MAX_TEXTURE_SIDE {
        return Err(Error::config(format!(
            "texture size {width}x{height} exceeds {MAX_TEXTURE_SIDE}px"
        )));
    }
    let items = (0..count).map(|index| crunch::Item {
        data: index,
        w: tile as usize,
        h: tile as usize,
        rot: crunch::Rotation::None,
    });
    let packed = crunch::Packer::with_items(items)
        .pack(crunch::Rect {
            x: 0,
            y: 0,
            w: width as usize,
            h: height as usize,
        })
        .map_err(|_| Error::PackingAtlasFailed)?;
    let mut placements = vec![Placement::default(); count];
    for item in packed {
        placements[item.data] = Placement {
            x: item.rect.x as u32,
            y: item.rect.y as u32,
        };
    }
    Ok(placements)
}

/// Searches for the smallest square texture `crunch` can fit the tiles
/// into, returning its side and the placements.
pub fn bisect_square(tile: u32, count: usize) -> Result<(u32, Vec<Placement>), Error> {
    if count == 0 {
        return Ok((0, Vec::new()));
    }
    // anything below this has less area than the tiles themselves
    let mut too_small = ((count as f64).sqrt() * f64::from(tile)).ceil() as u32 - 1;
    let mut upper_bound = MAX_TEXTURE_SIDE;
    let mut result = pack_into(tile, count, upper_bound, upper_bound)?;
    while (too_small + 1) < upper_bound {
        let check_size = too_small + ((upper_bound - too_small) / 2);
        match pack_into(tile, count, check_size, check_size) {
            Ok(placements) => {
                result = placements;
                upper_bound = check_size;
            }
            Err(Error::PackingAtlasFailed) => too_small = check_size,
            Err(err) => return Err(err),
        }
    }
    tracing::debug!("smallest square texture for {} tiles is {}px", count, upper_bound);
    Ok((upper_bound, result))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_disjoint(tile: u32, placements: &[Placement]) {
        for (i, a) in placements.iter().enumerate() {
            for b in &placements[i + 1..] {
                let apart = a.x + tile <= b.x || b.x + tile <= a.x || a.y + tile <= b.y || b.y + tile <= a.y;
                assert!(apart, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_fits_exact_texture() {
        let placements = pack_into(10, 4, 20, 20).unwrap();
        assert_eq!(placements.len(), 4);
        assert_disjoint(10, &placements);
        assert!(placements.iter().all(|p| p.x + 10 <= 20 && p.y + 10 <= 20));
    }

    #[test]
    fn test_texture_too_small() {
        assert_eq!(pack_into(10, 5, 20, 20), Err(Error::PackingAtlasFailed));
    }

    #[test]
    fn test_bisect_finds_a_square_that_fits() {
        let (side, placements) = bisect_square(8, 5).unwrap();
        // two rows of tiles can't hold five
        assert!(side >= 24);
        assert!(side < 40);
        assert_disjoint(8, &placements);
        assert!(placements.iter().all(|p| p.x + 8 <= side && p.y + 8 <= side));
    }

    #[test]
    fn test_texture_too_large() {
        assert!(matches!(
            pack_into(10, 1, MAX_TEXTURE_SIDE + 1, 20),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_bisect_nothing() {
        assert_eq!(bisect_square(8, 0), Ok((0, Vec::new())));
    }
}
