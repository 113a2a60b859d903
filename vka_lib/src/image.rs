//! Conversions between texture assets and [RgbaImage].
use image::{imageops::FilterType, RgbaImage};

use crate::{
    asset::AssetFile,
    compression::CompressionMode,
    error::{DecodeError, PackTextureError, UnpackTextureError},
    texture::{
        mip_count, pack_texture, unpack_texture_page, zeroed_buffer, Paging, TextureFormat,
        TextureInfo,
    },
};

/// Create the RGBA8 data for a full mipmap chain starting with `image`.
///
/// Each level is downsampled from the previous level.
pub fn mipmaps_rgba8(image: &RgbaImage) -> Vec<u8> {
    let mut data = image.as_raw().clone();

    let mut level = image.clone();
    for _ in 1..mip_count(image.width(), image.height()) {
        level = image::imageops::resize(
            &level,
            (level.width() / 2).max(1),
            (level.height() / 2).max(1),
            FilterType::Triangle,
        );
        data.extend_from_slice(level.as_raw());
    }

    data
}

/// Pack `image` as an RGBA8 texture with a page for the image
/// or a page for each mip level if `mipmaps` is `true`.
pub fn pack_image(
    image: &RgbaImage,
    compression_mode: CompressionMode,
    mipmaps: bool,
    original_file: &str,
) -> Result<AssetFile, PackTextureError> {
    let (data, paging) = if mipmaps {
        (mipmaps_rgba8(image), Paging::MipChain)
    } else {
        (image.as_raw().clone(), Paging::Single)
    };

    pack_texture(
        TextureFormat::Rgba8,
        compression_mode,
        image.width(),
        image.height(),
        &data,
        &paging,
        original_file,
    )
}

/// Unpack the page at `page_index` to an image with the page's dimensions.
pub fn page_image(
    info: &TextureInfo,
    page_index: usize,
    source: &[u8],
) -> Result<RgbaImage, UnpackTextureError> {
    let page = info
        .pages
        .get(page_index)
        .ok_or(crate::error::RangeError {
            index: page_index,
            count: info.pages.len(),
        })?;

    // Check the dimensions before allocating the page size from the metadata.
    let expected = page.width as u64 * page.height as u64 * 4;
    if expected != page.original_size as u64 {
        return Err(DecodeError::PageSizeMismatch {
            page: page_index,
            expected: expected as usize,
            actual: page.original_size as usize,
        }
        .into());
    }

    let mut data = zeroed_buffer(expected)?;
    unpack_texture_page(info, page_index, source, &mut data)?;

    let actual = data.len();
    RgbaImage::from_raw(page.width, page.height, data).ok_or(
        DecodeError::PageSizeMismatch {
            page: page_index,
            expected: expected as usize,
            actual,
        }
        .into(),
    )
}
