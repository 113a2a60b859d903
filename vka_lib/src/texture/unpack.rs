use log::{debug, trace};

use crate::{
    compression::Codec,
    error::{DecodeError, FormatError, RangeError, UnpackTextureError},
};

use super::{PageInfo, TextureFormat, TextureInfo};

/// Decompress all pages in `source` into `destination` in page order.
///
/// Each page is written directly after the previous page starting at offset 0.
/// The `destination` must have at least [TextureInfo::texture_size] bytes.
/// The `source` is usually the binary blob of the texture's [AssetFile](crate::asset::AssetFile).
pub fn unpack_texture(
    info: &TextureInfo,
    source: &[u8],
    destination: &mut [u8],
) -> Result<(), UnpackTextureError> {
    check_format(info)?;

    let pages_size = checked_texture_size(info)?;
    if (destination.len() as u64) < pages_size {
        return Err(DecodeError::DestinationTooSmall {
            required: pages_size,
            actual: destination.len(),
        }
        .into());
    }

    let codec = info.compression_mode.codec();

    let mut source_offset = 0usize;
    let mut destination_offset = 0usize;
    for (i, page) in info.pages.iter().enumerate() {
        let page_source = page_source(i, page, source, source_offset)?;
        let page_destination =
            &mut destination[destination_offset..destination_offset + page.original_size as usize];

        trace!("page {i}: source {source_offset}, destination {destination_offset}");
        decompress_page(&codec, i, page, page_source, page_destination)?;

        source_offset += page.compressed_size as usize;
        destination_offset += page.original_size as usize;
    }

    if source_offset < source.len() {
        debug!(
            "Ignored {} bytes after the last page",
            source.len() - source_offset
        );
    }

    Ok(())
}

/// Decompress only the page at `page_index` into the start of `destination`.
///
/// The `destination` must have at least [PageInfo::original_size] bytes.
/// Offset `destination` by the page's range from [TextureInfo::page_ranges]
/// to reassemble pages into a larger buffer.
pub fn unpack_texture_page(
    info: &TextureInfo,
    page_index: usize,
    source: &[u8],
    destination: &mut [u8],
) -> Result<(), UnpackTextureError> {
    check_format(info)?;

    let page = info.pages.get(page_index).ok_or(RangeError {
        index: page_index,
        count: info.pages.len(),
    })?;

    let source_offset: u64 = info.pages[..page_index]
        .iter()
        .map(|p| p.compressed_size as u64)
        .sum();
    let source_offset = usize::try_from(source_offset).map_err(|_| DecodeError::SourceUnderrun {
        page: page_index,
        end: source_offset,
        source_len: source.len(),
    })?;
    let page_source = page_source(page_index, page, source, source_offset)?;

    let destination_len = destination.len();
    let page_destination = destination
        .get_mut(..page.original_size as usize)
        .ok_or(DecodeError::DestinationTooSmall {
            required: page.original_size as u64,
            actual: destination_len,
        })?;

    let codec = info.compression_mode.codec();
    decompress_page(&codec, page_index, page, page_source, page_destination)?;
    Ok(())
}

/// Decompress all pages into a new buffer with [TextureInfo::texture_size] bytes.
pub fn unpack_texture_to_vec(
    info: &TextureInfo,
    source: &[u8],
) -> Result<Vec<u8>, UnpackTextureError> {
    check_format(info)?;
    let size = checked_texture_size(info)?;

    let mut destination = zeroed_buffer(size)?;
    unpack_texture(info, source, &mut destination)?;
    Ok(destination)
}

/// Allocate `size` bytes without aborting on sizes from untrusted metadata.
pub(crate) fn zeroed_buffer(size: u64) -> Result<Vec<u8>, DecodeError> {
    let len = usize::try_from(size).map_err(|_| DecodeError::Allocation { size })?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| DecodeError::Allocation { size })?;
    buffer.resize(len, 0u8);
    Ok(buffer)
}

fn checked_texture_size(info: &TextureInfo) -> Result<u64, DecodeError> {
    let pages_size = info.pages_original_size();
    if info.texture_size != pages_size {
        Err(DecodeError::TextureSizeMismatch {
            declared: info.texture_size,
            pages: pages_size,
        })
    } else {
        Ok(pages_size)
    }
}

fn check_format(info: &TextureInfo) -> Result<(), FormatError> {
    // Unpacking doesn't depend on the format, but the caller can't interpret the data.
    if info.texture_format == TextureFormat::Unknown {
        Err(FormatError::UnknownTextureFormat)
    } else {
        Ok(())
    }
}

fn page_source<'a>(
    page_index: usize,
    page: &PageInfo,
    source: &'a [u8],
    offset: usize,
) -> Result<&'a [u8], DecodeError> {
    let end = offset as u64 + page.compressed_size as u64;
    source
        .get(offset..offset + page.compressed_size as usize)
        .ok_or(DecodeError::SourceUnderrun {
            page: page_index,
            end,
            source_len: source.len(),
        })
}

fn decompress_page(
    codec: &Codec,
    page_index: usize,
    page: &PageInfo,
    source: &[u8],
    destination: &mut [u8],
) -> Result<(), DecodeError> {
    let size = codec
        .decompress_into(source, destination)
        .map_err(|source| DecodeError::Decompress {
            page: page_index,
            source,
        })?;

    if size != page.original_size as usize {
        return Err(DecodeError::PageSizeMismatch {
            page: page_index,
            expected: page.original_size as usize,
            actual: size,
        });
    }
    Ok(())
}
