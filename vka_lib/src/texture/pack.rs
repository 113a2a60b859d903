use log::{debug, trace};

use crate::{
    asset::AssetFile,
    compression::CompressionMode,
    error::{FormatError, PackTextureError},
};

use super::{PageInfo, TextureFormat, TextureInfo};

/// How the pixel data passed to [pack_texture] is split into pages.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Paging {
    /// A single page with the full texture dimensions.
    #[default]
    Single,
    /// A page for each level of a full mipmap chain starting from the full texture dimensions.
    /// Each level halves the dimensions of the previous level down to 1x1.
    MipChain,
    /// Pages with the given `[width, height]` in order.
    Explicit(Vec<[u32; 2]>),
}

impl Paging {
    /// The `[width, height]` for each page of a `width` x `height` texture.
    pub fn page_dimensions(&self, width: u32, height: u32) -> Vec<[u32; 2]> {
        match self {
            Paging::Single => vec![[width, height]],
            Paging::MipChain => (0..mip_count(width, height))
                .map(|level| [(width >> level).max(1), (height >> level).max(1)])
                .collect(),
            Paging::Explicit(pages) => pages.clone(),
        }
    }
}

/// The number of levels in a full mipmap chain or 0 if either dimension is 0.
pub fn mip_count(width: u32, height: u32) -> u32 {
    if width == 0 || height == 0 {
        0
    } else {
        u32::BITS - width.max(height).leading_zeros()
    }
}

/// Split `pixel_data` into pages and compress each page independently.
///
/// The length of `pixel_data` must match the combined size of all pages.
/// The returned [AssetFile] contains the [TextureInfo] metadata and the compressed pages.
pub fn pack_texture(
    format: TextureFormat,
    compression_mode: CompressionMode,
    width: u32,
    height: u32,
    pixel_data: &[u8],
    paging: &Paging,
    original_file: &str,
) -> Result<AssetFile, PackTextureError> {
    let bytes_per_pixel = format
        .bytes_per_pixel()
        .ok_or(FormatError::UnknownTextureFormat)?;

    let dimensions = paging.page_dimensions(width, height);
    let page_sizes = dimensions
        .iter()
        .enumerate()
        .map(|(page, [w, h])| {
            w.checked_mul(*h)
                .and_then(|p| p.checked_mul(bytes_per_pixel))
                .ok_or(PackTextureError::PageTooLarge {
                    page,
                    width: *w,
                    height: *h,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expected: u64 = page_sizes.iter().map(|s| *s as u64).sum();
    if expected != pixel_data.len() as u64 {
        return Err(PackTextureError::PixelDataSize {
            expected,
            actual: pixel_data.len(),
        });
    }

    let codec = compression_mode.codec();

    let mut pages = Vec::new();
    let mut binary_blob = Vec::new();
    let mut offset = 0;
    for (i, ([page_width, page_height], original_size)) in
        dimensions.into_iter().zip(page_sizes).enumerate()
    {
        let data = &pixel_data[offset..offset + original_size as usize];
        offset += original_size as usize;

        let compressed = codec
            .compress(data)
            .map_err(|source| PackTextureError::Compress { page: i, source })?;
        let compressed_size =
            u32::try_from(compressed.len()).map_err(|_| PackTextureError::PageTooLarge {
                page: i,
                width: page_width,
                height: page_height,
            })?;
        trace!(
            "page {i}: {page_width}x{page_height}, {original_size} -> {compressed_size} bytes"
        );

        binary_blob.extend_from_slice(&compressed);
        pages.push(PageInfo {
            width: page_width,
            height: page_height,
            compressed_size,
            original_size,
        });
    }

    let info = TextureInfo {
        texture_size: expected,
        texture_format: format,
        compression_mode,
        original_file: original_file.to_string(),
        pages,
    };
    debug!(
        "Packed {:?} with {} pages: {} -> {} bytes",
        original_file,
        info.pages.len(),
        info.texture_size,
        binary_blob.len()
    );

    info.to_asset_file(binary_blob).map_err(Into::into)
}
