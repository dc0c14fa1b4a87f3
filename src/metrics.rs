use indexmap::IndexMap;

/// Ideographs in this range always advance by the full font size.
pub const CJK_UNIFIED_IDEOGRAPHS: std::ops::RangeInclusive<u32> = 0x4E00..=0x9FFF;

/// Where one glyph lives in the atlas and how to place it on a line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricsRecord {
    pub codepoint: u32,
    /// Left edge of the tile in the atlas, in pixels
    pub x: u32,
    /// Top edge of the tile in the atlas, in pixels
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// How far the pen moves after this glyph
    pub advance: f32,
    pub x_offset: f32,
    /// Distance from the pen's baseline up to the top of the tile
    pub y_offset: f32,
}

impl MetricsRecord {
    pub fn character(&self) -> Option<char> {
        char::from_u32(self.codepoint)
    }

    /// The tile's `[left, top, right, bottom]` edges as fractions of the
    /// atlas size.
    pub fn tex_coords(&self, atlas_width: u32, atlas_height: u32) -> [f32; 4] {
        let w = atlas_width as f32;
        let h = atlas_height as f32;
        [
            self.x as f32 / w,
            self.y as f32 / h,
            (self.x + self.width) as f32 / w,
            (self.y + self.height) as f32 / h,
        ]
    }
}

/// Pen advance for a glyph.
///
/// CJK ideographs take the whole em. Anything else uses its measured width
/// times `scale`, but never less than half the font size so that narrow
/// glyphs don't collide.
pub fn advance(codepoint: u32, measured: Option<f32>, font_size: u32, scale: f32) -> f32 {
    let font_size = font_size as f32;
    if CJK_UNIFIED_IDEOGRAPHS.contains(&codepoint) {
        return font_size;
    }
    let floor = font_size / 2.0;
    match measured {
        Some(width) if width.is_finite() => (width * scale).max(floor),
        _ => floor,
    }
}

/// Baseline offset matching the source's vertically centred drawing.
pub fn bearing_y(font_size: u32, buffer: u32) -> f32 {
    font_size as f32 / 2.0 + buffer as f32
}

/// Per-character records of one atlas, in the order they were built.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GlyphMetricsTable {
    records: IndexMap<u32, MetricsRecord>,
}

impl GlyphMetricsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record`, returning the record it replaced for the same
    /// codepoint.
    pub(crate) fn insert(&mut self, record: MetricsRecord) -> Option<MetricsRecord> {
        self.records.insert(record.codepoint, record)
    }

    pub fn get(&self, ch: char) -> Option<&MetricsRecord> {
        self.get_codepoint(u32::from(ch))
    }

    pub fn get_codepoint(&self, codepoint: u32) -> Option<&MetricsRecord> {
        self.records.get(&codepoint)
    }

    pub fn contains(&self, ch: char) -> bool {
        self.records.contains_key(&u32::from(ch))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MetricsRecord> + '_ {
        self.records.values()
    }
}

impl<'a> IntoIterator for &'a GlyphMetricsTable {
    type Item = &'a MetricsRecord;
    type IntoIter = indexmap::map::Values<'a, u32, MetricsRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.values()
    }
}
