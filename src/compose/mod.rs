//! Tile compositing
//!
//! Assembles the ordered tile images of one capture run into a single
//! composite raster. A run either produces a complete, geometrically
//! consistent composite or a typed error; missing tiles and mismatched
//! tile dimensions are never silently patched over.

use crate::geo::GeoPoint;
use crate::grid::GridIndex;
use image::RgbaImage;
use thiserror::Error;
use tracing::debug;

/// One fetched tile image, keyed by its grid position.
///
/// Owned transiently by a single capture run; persistence of parts is a
/// collaborator concern.
#[derive(Debug, Clone)]
pub struct TileImage {
    /// Grid position this tile occupies
    pub index: GridIndex,
    /// Sample point the tile is centered on
    pub point: GeoPoint,
    /// Raw encoded image bytes as returned by the provider
    pub data: Vec<u8>,
}

/// Errors from composite assembly.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComposeError {
    /// Tile count does not match the grid dimensions
    #[error("incomplete grid: expected {expected} tiles, got {actual}")]
    IncompleteGrid { expected: usize, actual: usize },

    /// A tile's pixel dimensions differ from the agreed tile size
    #[error(
        "inconsistent tile size at index {index}: expected {expected_width}x{expected_height}, \
         got {actual_width}x{actual_height}"
    )]
    InconsistentTileSize {
        index: usize,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    /// A tile's bytes could not be decoded as an image
    #[error("tile decode failed at index {index}: {message}")]
    Decode { index: usize, message: String },

    /// Composite encoding failed
    #[error("composite encode failed: {0}")]
    Encode(String),
}

/// Assembles ordered tiles into one composite raster.
///
/// Tiles must be in canonical row-major order: the tile at sequence index
/// `i` is placed at grid position `(i / cols, i % cols)`, pixel offset
/// `(col * tile_width, row * tile_height)`. Tiles are non-overlapping, so
/// placement is an exact blit with no blending.
///
/// # Arguments
///
/// * `tiles` - Tile images in row-major grid order
/// * `rows` / `cols` - Grid dimensions
/// * `tile_width` / `tile_height` - Agreed per-tile pixel dimensions
///
/// # Errors
///
/// * [`ComposeError::IncompleteGrid`] if `tiles.len() != rows * cols`
/// * [`ComposeError::Decode`] if any tile's bytes fail to decode
/// * [`ComposeError::InconsistentTileSize`] if any decoded tile is not
///   exactly `tile_width x tile_height` (no best-effort scaling)
pub fn compose(
    tiles: &[TileImage],
    rows: u32,
    cols: u32,
    tile_width: u32,
    tile_height: u32,
) -> Result<RgbaImage, ComposeError> {
    let expected = rows as usize * cols as usize;
    if tiles.len() != expected {
        return Err(ComposeError::IncompleteGrid {
            expected,
            actual: tiles.len(),
        });
    }

    let mut canvas = RgbaImage::new(cols * tile_width, rows * tile_height);

    for (i, tile) in tiles.iter().enumerate() {
        let decoded = image::load_from_memory(&tile.data)
            .map_err(|e| ComposeError::Decode {
                index: i,
                message: e.to_string(),
            })?
            .to_rgba8();

        if decoded.width() != tile_width || decoded.height() != tile_height {
            return Err(ComposeError::InconsistentTileSize {
                index: i,
                expected_width: tile_width,
                expected_height: tile_height,
                actual_width: decoded.width(),
                actual_height: decoded.height(),
            });
        }

        let row = i as u32 / cols;
        let col = i as u32 % cols;
        let x = col * tile_width;
        let y = row * tile_height;
        image::imageops::replace(&mut canvas, &decoded, x.into(), y.into());
    }

    debug!(
        rows,
        cols,
        width = canvas.width(),
        height = canvas.height(),
        "composite assembled"
    );

    Ok(canvas)
}

/// Encodes a composite to PNG.
///
/// PNG is lossless, so the geographic alignment of sub-tiles stays
/// pixel-exact when the stored composite is decoded again.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ComposeError> {
    let mut buffer = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageFormat::Png)
        .map_err(|e| ComposeError::Encode(e.to_string()))?;
    Ok(buffer.into_inner())
}
