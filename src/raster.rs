/* SPDX-License-Identifier: (Apache-2.0 OR MIT OR Zlib) */
/* Copyright © 2023 Violet Leonard */

use ttf_parser::{Face, GlyphId};

use crate::{
    edge::{CubicCurve, Edge, Line, QuadCurve},
    source::{AlphaGrid, GlyphSource, RasterParams},
};

/// Longest line piece, in pixels, used when flattening curves.
const FLATTEN_STEP: f32 = 0.5;

/// A [`GlyphSource`] drawing TrueType/OpenType outlines with `ttf-parser`.
///
/// Each pixel centre is classified inside or outside with the nonzero
/// winding rule, and its distance to the outline turns that into an
/// anti-aliased coverage value.
#[derive(Clone, Copy)]
pub struct OutlineRasterizer<'a> {
    face: &'a Face<'a>,
}

impl<'a> OutlineRasterizer<'a> {
    pub fn new(face: &'a Face<'a>) -> Self {
        Self { face }
    }

    fn scale(&self, font_size: u32) -> f32 {
        font_size as f32 / f32::from(self.face.units_per_em())
    }

    fn outline(&self, glyph_id: GlyphId, params: &RasterParams) -> Segments {
        let scale = self.scale(params.font_size);
        let em_middle = (f32::from(self.face.ascender()) + f32::from(self.face.descender())) / 2.0;
        let mut segments = Segments::new(Transform {
            scale,
            origin_x: params.buffer as f32,
            middle_y: params.size() as f32 / 2.0,
            em_middle,
        });
        self.face.outline_glyph(glyph_id, &mut segments);
        segments
    }
}

impl GlyphSource for OutlineRasterizer<'_> {
    fn rasterize(&mut self, ch: char, params: &RasterParams) -> Option<AlphaGrid> {
        let glyph_id = self.face.glyph_index(ch)?;
        let segments = self.outline(glyph_id, params);
        let size = params.size();
        if segments.lines.is_empty() {
            // whitespace and friends
            return Some(AlphaGrid::blank(size));
        }
        let mut data = vec![0; size * size];
        let mut buffer = Buffer {
            data: &mut data,
            width: size,
        };
        for y in 0..size {
            for x in 0..size {
                let centre = (x as f32 + 0.5, y as f32 + 0.5);
                buffer.set_pixel((x, y), segments.coverage(centre));
            }
        }
        AlphaGrid::new(size, data)
    }

    fn measure(&mut self, ch: char, font_size: u32) -> Option<f32> {
        let glyph_id = self.face.glyph_index(ch)?;
        let advance = self.face.glyph_hor_advance(glyph_id)?;
        Some(f32::from(advance) * self.scale(font_size))
    }
}

/// Font units to tile pixels, y pointing down.
#[derive(Clone, Copy, Debug)]
struct Transform {
    scale: f32,
    origin_x: f32,
    middle_y: f32,
    em_middle: f32,
}

impl Transform {
    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.origin_x + x * self.scale,
            self.middle_y - (y - self.em_middle) * self.scale,
        )
    }
}

struct Segments {
    transform: Transform,
    lines: Vec<Line>,
    cursor: (f32, f32),
    contour_start: (f32, f32),
}

impl Segments {
    fn new(transform: Transform) -> Self {
        Self {
            transform,
            lines: Vec::new(),
            cursor: (0.0, 0.0),
            contour_start: (0.0, 0.0),
        }
    }

    fn push(&mut self, edge: impl Edge, end: (f32, f32)) {
        edge.flatten_into(FLATTEN_STEP, &mut self.lines);
        self.cursor = end;
    }

    fn coverage(&self, point: (f32, f32)) -> u8 {
        let mut winding = 0;
        let mut nearest_dist2 = f32::INFINITY;
        for line in &self.lines {
            winding += line.winding(point);
            nearest_dist2 = nearest_dist2.min(line.distance_sq(point));
        }
        let dist = nearest_dist2.sqrt();
        let signed = if winding != 0 { 0.5 + dist } else { 0.5 - dist };
        (f32::from(u8::MAX) * signed.clamp(0.0, 1.0)).round() as u8
    }
}

impl ttf_parser::OutlineBuilder for Segments {
    fn move_to(&mut self, x: f32, y: f32) {
        self.cursor = self.transform.apply(x, y);
        self.contour_start = self.cursor;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let end = self.transform.apply(x, y);
        self.push(Line::new(self.cursor, end), end);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let control = self.transform.apply(x1, y1);
        let end = self.transform.apply(x, y);
        self.push(QuadCurve::new(self.cursor, control, end), end);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let control_s = self.transform.apply(x1, y1);
        let control_e = self.transform.apply(x2, y2);
        let end = self.transform.apply(x, y);
        self.push(CubicCurve::new(self.cursor, control_s, control_e, end), end);
    }

    fn close(&mut self) {
        if self.cursor != self.contour_start {
            let start = self.contour_start;
            self.push(Line::new(self.cursor, start), start);
        }
    }
}

struct Buffer<'a> {
    data: &'a mut [u8],
    width: usize,
}

impl Buffer<'_> {
    fn set_pixel(&mut self, (x, y): (usize, usize), value: u8) {
        self.data[y * self.width + x] = value;
    }
}
