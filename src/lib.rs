/* SPDX-License-Identifier: (Apache-2.0 OR MIT OR Zlib) */
/* Copyright © 2023 Violet Leonard */

//! Signed distance field glyph atlases.
//!
//! An [`AtlasBuilder`] asks a [`GlyphSource`] to draw each character as a
//! coverage grid, turns every grid into a distance field tile, lays the
//! tiles out and copies them into one single-channel buffer. The result is
//! an [`SdfAtlas`]: that buffer plus a [`GlyphMetricsTable`] telling a
//! renderer where each glyph is and how far to advance after it.

pub extern crate ttf_parser;

mod assemble;
mod bisect;
mod edge;
mod error;
mod grid;
mod math;
mod metrics;
mod pack;
mod raster;
mod sdf;
mod source;

use indexmap::IndexSet;

pub use crate::{
    assemble::{assemble, AtlasBuffer, FILL_VALUE},
    error::Error,
    grid::GridLayout,
    metrics::{advance, bearing_y, GlyphMetricsTable, MetricsRecord, CJK_UNIFIED_IDEOGRAPHS},
    pack::{pack, Packing, Placement, Rect},
    raster::OutlineRasterizer,
    sdf::{squared_distance_transform, DistanceFieldBuilder, SdfTile, INF},
    source::{AlphaGrid, GlyphSource, RasterParams},
};

/// How tiles are arranged in the atlas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Layout {
    /// Shelf packing into a near-square container sized to fit.
    #[default]
    Shelf,
    /// A fixed grid of cells; too many glyphs is an error.
    Grid { columns: u32, rows: u32 },
    /// The smallest square grid that holds every glyph.
    SquareGrid,
    /// Whatever fits into a texture of exactly this size.
    Texture { width: u32, height: u32 },
    /// The smallest square texture found by bisection.
    SmallestTexture,
}

#[derive(Clone, Copy, Debug)]
pub struct AtlasBuilder {
    font_size: u32,
    buffer: u32,
    radius: f64,
    cutoff: f64,
    advance_scale: f32,
    layout: Layout,
    strict: bool,
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self::with_font_size(24)
    }
}

/// A finished atlas. Immutable; share it freely.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub struct SdfAtlas {
    pub buffer: AtlasBuffer,
    pub metrics: GlyphMetricsTable,
    /// Share of the atlas covered by tiles.
    pub fill_ratio: f64,
}

impl SdfAtlas {
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// The distance field bytes of `ch`'s tile, read back out of the atlas.
    pub fn tile(&self, ch: char) -> Option<Vec<u8>> {
        let record = self.metrics.get(ch)?;
        self.buffer
            .region(record.x, record.y, record.width, record.height)
    }
}

impl AtlasBuilder {
    /// A builder for glyphs drawn at `font_size` pixels, with a 3px buffer,
    /// radius 8 and cutoff 0.25.
    pub fn with_font_size(font_size: u32) -> Self {
        Self {
            font_size,
            buffer: 3,
            radius: 8.0,
            cutoff: 0.25,
            advance_scale: 1.0,
            layout: Layout::Shelf,
            strict: false,
        }
    }

    /// Empty pixels kept around each glyph for the field to fall off in.
    pub fn with_buffer(self, buffer: u32) -> Self {
        Self { buffer, ..self }
    }

    /// Distance, in pixels, covered by the full byte range.
    pub fn with_radius(self, radius: f64) -> Self {
        Self { radius, ..self }
    }

    /// Where the glyph edge sits in the byte range, from 0 to 1.
    pub fn with_cutoff(self, cutoff: f64) -> Self {
        Self { cutoff, ..self }
    }

    /// Factor applied to measured glyph widths to get their advance.
    pub fn with_advance_scale(self, advance_scale: f32) -> Self {
        Self {
            advance_scale,
            ..self
        }
    }

    pub fn with_layout(self, layout: Layout) -> Self {
        Self { layout, ..self }
    }

    /// Fail with [`Error::MissingGlyph`] instead of using a blank tile when
    /// the source can't draw a character.
    pub fn strict_glyphs(self) -> Self {
        Self {
            strict: true,
            ..self
        }
    }

    pub fn raster_params(&self) -> RasterParams {
        RasterParams {
            font_size: self.font_size,
            buffer: self.buffer,
        }
    }

    /// Side length of every tile, saturating at `u32::MAX`.
    pub fn tile_size(&self) -> u32 {
        self.font_size.saturating_add(self.buffer.saturating_mul(2))
    }

    /// The tile side, if it fits a texture.
    fn checked_tile_size(&self) -> Result<u32, Error> {
        self.buffer
            .checked_mul(2)
            .and_then(|padding| padding.checked_add(self.font_size))
            .filter(|&side| side <= bisect::MAX_TEXTURE_SIDE)
            .ok_or_else(|| {
                Error::config(format!(
                    "font size {} with a {}px buffer exceeds {}px tiles",
                    self.font_size,
                    self.buffer,
                    bisect::MAX_TEXTURE_SIDE
                ))
            })
    }

    /// Builds an atlas for `chars`, in order; repeated characters are built
    /// once.
    pub fn build<S, I>(&self, source: &mut S, chars: I) -> Result<SdfAtlas, Error>
    where
        S: GlyphSource + ?Sized,
        I: IntoIterator<Item = char>,
    {
        if self.font_size == 0 {
            return Err(Error::config("font size must be positive"));
        }
        if !(self.advance_scale.is_finite() && self.advance_scale >= 0.0) {
            return Err(Error::config(format!(
                "advance scale must be finite and non-negative, got {}",
                self.advance_scale
            )));
        }
        let tile_size = self.checked_tile_size()?;
        let params = self.raster_params();
        let mut sdf = DistanceFieldBuilder::new(params.size(), self.radius, self.cutoff)?;

        let chars: IndexSet<char> = chars.into_iter().collect();
        tracing::info!(
            "building SDF atlas for {} glyphs at {}px (tile {}px)",
            chars.len(),
            self.font_size,
            tile_size
        );

        let mut tiles = Vec::with_capacity(chars.len());
        let mut advances = Vec::with_capacity(chars.len());
        for &ch in &chars {
            let alpha = match source.rasterize(ch, &params) {
                Some(alpha) if alpha.size() == params.size() => alpha,
                _ if self.strict => return Err(Error::MissingGlyph(ch)),
                _ => {
                    tracing::warn!("glyph {:?} could not be rasterized, using a blank tile", ch);
                    AlphaGrid::blank(params.size())
                }
            };
            tiles.push(sdf.build(&alpha)?);
            let measured = source.measure(ch, self.font_size);
            advances.push(advance(
                u32::from(ch),
                measured,
                self.font_size,
                self.advance_scale,
            ));
        }

        let (placements, width, height) = self.layout_tiles(tile_size, tiles.len())?;
        let buffer = assemble(&tiles, &placements, width, height)?;

        let y_offset = bearing_y(self.font_size, self.buffer);
        let mut metrics = GlyphMetricsTable::new();
        for ((&ch, placement), advance) in chars.iter().zip(&placements).zip(advances) {
            metrics.insert(MetricsRecord {
                codepoint: u32::from(ch),
                x: placement.x,
                y: placement.y,
                width: tile_size,
                height: tile_size,
                advance,
                x_offset: 0.0,
                y_offset,
            });
        }

        let atlas_area = u64::from(width) * u64::from(height);
        let fill_ratio = if atlas_area == 0 {
            0.0
        } else {
            (tiles.len() as u64 * u64::from(tile_size).pow(2)) as f64 / atlas_area as f64
        };
        tracing::info!(
            "built {}x{} atlas, {:.1}% filled",
            width,
            height,
            fill_ratio * 100.0
        );
        Ok(SdfAtlas {
            buffer,
            metrics,
            fill_ratio,
        })
    }

    fn layout_tiles(&self, tile: u32, count: usize) -> Result<(Vec<Placement>, u32, u32), Error> {
        tracing::debug!("laying out {} tiles with {:?}", count, self.layout);
        match self.layout {
            Layout::Shelf => {
                let packing = pack(&vec![Rect::square(tile); count])?;
                Ok((packing.placements, packing.width, packing.height))
            }
            Layout::Grid { columns, rows } => {
                let grid = GridLayout {
                    columns,
                    rows,
                    cell: tile,
                };
                Ok((grid.place(count)?, grid.width(), grid.height()))
            }
            Layout::SquareGrid => {
                let grid = GridLayout::square_for(count, tile);
                Ok((grid.place(count)?, grid.width(), grid.height()))
            }
            Layout::Texture { width, height } => {
                Ok((bisect::pack_into(tile, count, width, height)?, width, height))
            }
            Layout::SmallestTexture => {
                let (side, placements) = bisect::bisect_square(tile, count)?;
                Ok((placements, side, side))
            }
        }
    }
}

pub fn hexdigits() -> impl Clone + Iterator<Item = char> {
    b"0123456789abcdefABCDEFxX".iter().copied().map(char::from)
}

pub fn ascii() -> impl Clone + Iterator<Item = char> {
    (b'!'..=b'~').map(char::from)
}

pub fn latin1() -> impl Clone + Iterator<Item = char> {
    ascii().chain((0xa1..=0xff).map(char::from))
}

pub fn latin1_french() -> impl Clone + Iterator<Item = char> {
    latin1().chain(['\u{0152}', '\u{0153}', '\u{0178}'])
}

/// Every CJK unified ideograph, the range whose advance is a full em.
pub fn cjk_unified() -> impl Clone + Iterator<Item = char> {
    CJK_UNIFIED_IDEOGRAPHS.filter_map(char::from_u32)
}
