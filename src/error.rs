/// Everything that can stop an atlas build.
///
/// All of these are reported while the atlas is being built; a finished
/// [`SdfAtlas`](crate::SdfAtlas) is read-only and has no failure modes.
#[derive(thiserror::Error, Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A builder parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A rectangle handed to the packer has a zero side.
    #[error("rectangle {index} has an empty side ({width}x{height})")]
    InvalidRect {
        index: usize,
        width: u32,
        height: u32,
    },

    /// No free space in the packer could hold this rectangle.
    #[error("rectangle {index} ({width}px wide) does not fit a {container_width}px wide container")]
    PackingCapacity {
        index: usize,
        width: u32,
        container_width: u32,
    },

    /// More tiles were requested than a fixed grid has cells.
    #[error("atlas overflow: {requested} tiles requested, grid holds {capacity}")]
    AtlasOverflow { requested: usize, capacity: usize },

    /// The tiles could not be fitted into the requested texture size.
    #[error("failed to pack the glyphs into the requested texture size")]
    PackingAtlasFailed,

    /// A placement would write outside of the atlas buffer.
    #[error("tile {index} lies outside of the atlas bounds")]
    TileOutOfBounds { index: usize },

    /// The glyph source could not render this character (strict mode only).
    #[error("glyph {0:?} could not be rasterized")]
    MissingGlyph(char),
}

impl Error {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
