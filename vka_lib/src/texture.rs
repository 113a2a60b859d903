//! Paged and compressed textures in
//! [AssetType::Texture](crate::asset::AssetType::Texture) containers.
//!
//! # Overview
//! A texture is split into one or more pages like the levels of a mipmap chain.
//! Each page is compressed independently with the texture's [CompressionMode]
//! and the compressed pages are concatenated in page order to form the container's binary blob.
//! This allows unpacking a single page without decompressing the other pages.
//!
//! The metadata describing the pages is stored as JSON and can be read with [read_texture_info].
//! Offsets for each page are not stored and are calculated from the sizes of the previous pages.
//!
//! ```rust no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use vka_lib::{asset::AssetFile, texture::{read_texture_info, unpack_texture}};
//!
//! let file = AssetFile::from_file("texture.vka")?;
//! let info = read_texture_info(&file)?;
//!
//! // Decompress all pages into a buffer like a mapped staging buffer.
//! let mut pixels = vec![0u8; info.texture_size as usize];
//! unpack_texture(&info, &file.binary_blob, &mut pixels)?;
//! # Ok(())
//! # }
//! ```
use std::ops::Range;

use strum::{Display, EnumString};

use crate::compression::CompressionMode;

mod metadata;
mod pack;
mod unpack;

pub use metadata::{read_texture_info, write_texture_info};
pub use pack::{mip_count, pack_texture, Paging};
pub use unpack::{unpack_texture, unpack_texture_page, unpack_texture_to_vec};
pub(crate) use unpack::zeroed_buffer;

/// The layout of the uncompressed pixel data for all pages.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
pub enum TextureFormat {
    /// An unrecognized format that can't be unpacked.
    Unknown,
    /// 8-bit unsigned normalized RGBA.
    #[strum(serialize = "RGBA8")]
    Rgba8,
}

impl TextureFormat {
    /// The size of a single pixel in bytes or `None` for [TextureFormat::Unknown].
    pub fn bytes_per_pixel(&self) -> Option<u32> {
        match self {
            TextureFormat::Unknown => None,
            TextureFormat::Rgba8 => Some(4),
        }
    }

    /// Parse a metadata format name.
    /// Unrecognized names fall back to [TextureFormat::Unknown].
    pub fn from_name(name: &str) -> Self {
        name.parse().unwrap_or(TextureFormat::Unknown)
    }
}

/// A description of a texture and its pages.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureInfo {
    /// The uncompressed size in bytes of all pages.
    pub texture_size: u64,
    pub texture_format: TextureFormat,
    /// The compression applied to every page.
    pub compression_mode: CompressionMode,
    /// The path of the source image for reference.
    pub original_file: String,
    /// The pages in the order they appear in the binary blob.
    pub pages: Vec<PageInfo>,
}

/// A single independently compressed mip level or tile.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub width: u32,
    pub height: u32,
    /// The size in bytes of this page in the binary blob.
    pub compressed_size: u32,
    /// The size in bytes of this page after decompression.
    pub original_size: u32,
}

/// The locations of a page in the compressed binary blob and the unpacked pixel data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRange {
    /// The byte range in the binary blob.
    pub compressed: Range<u64>,
    /// The byte range in the output of [unpack_texture].
    pub original: Range<u64>,
}

impl TextureInfo {
    /// Calculate the byte ranges for each page from the sizes of the previous pages.
    /// Pages are tightly packed with no padding.
    ///
    /// This can be used to create the copy regions for each mip level
    /// when uploading the output of [unpack_texture].
    pub fn page_ranges(&self) -> Vec<PageRange> {
        let mut compressed_offset = 0u64;
        let mut original_offset = 0u64;
        self.pages
            .iter()
            .map(|page| {
                let compressed_end = compressed_offset + page.compressed_size as u64;
                let original_end = original_offset + page.original_size as u64;
                let range = PageRange {
                    compressed: compressed_offset..compressed_end,
                    original: original_offset..original_end,
                };
                compressed_offset = compressed_end;
                original_offset = original_end;
                range
            })
            .collect()
    }

    /// The sum of [PageInfo::original_size] for all pages.
    pub fn pages_original_size(&self) -> u64 {
        self.pages.iter().map(|p| p.original_size as u64).sum()
    }

    /// The sum of [PageInfo::compressed_size] for all pages.
    pub fn pages_compressed_size(&self) -> u64 {
        self.pages.iter().map(|p| p.compressed_size as u64).sum()
    }
}
