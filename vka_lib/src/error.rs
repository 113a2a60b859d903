use std::path::PathBuf;

use thiserror::Error;
use zune_inflate::errors::InflateDecodeErrors;

use crate::asset::AssetType;

#[derive(Debug, Error)]
pub enum FileError {
    #[error("asset file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("error reading or writing asset file")]
    Io(#[from] std::io::Error),

    #[error("asset container is corrupt")]
    Corrupt(#[from] CorruptContainerError),

    #[error("error writing container header")]
    Header(#[from] binrw::Error),

    #[error("metadata with {0} bytes is too large")]
    MetadataTooLarge(usize),
}

#[derive(Debug, Error)]
pub enum CorruptContainerError {
    #[error("error reading container header")]
    Header(#[source] binrw::Error),

    #[error("container version {0} is not supported")]
    UnsupportedVersion(u32),

    #[error("header declares {declared} payload bytes but {actual} bytes remain")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("metadata is not valid UTF-8")]
    MetadataUtf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("texture format is unknown or unsupported")]
    UnknownTextureFormat,

    #[error("compression mode {0:?} is not recognized")]
    UnknownCompressionMode(String),

    #[error("expected a texture asset but found {0:?}")]
    UnexpectedAssetType(AssetType),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("page {page} ends at byte {end} but the source buffer has {source_len} bytes")]
    SourceUnderrun {
        page: usize,
        end: u64,
        source_len: usize,
    },

    #[error("destination has {actual} bytes but {required} bytes are required")]
    DestinationTooSmall { required: u64, actual: usize },

    #[error("texture size {declared} does not match the page total {pages}")]
    TextureSizeMismatch { declared: u64, pages: u64 },

    #[error("failed to allocate {size} bytes for the unpacked texture")]
    Allocation { size: u64 },

    #[error("page {page} decompressed to {actual} bytes instead of {expected} bytes")]
    PageSizeMismatch {
        page: usize,
        expected: usize,
        actual: usize,
    },

    #[error("error decompressing page {page}")]
    Decompress {
        page: usize,
        #[source]
        source: DecompressError,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("page index {index} is out of range for {count} pages")]
pub struct RangeError {
    pub index: usize,
    pub count: usize,
}

#[derive(Debug, Error)]
pub enum CompressError {
    #[error("error encoding zlib stream")]
    Zlib(#[source] std::io::Error),

    #[error("error encoding zstd frame")]
    Zstd(#[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum DecompressError {
    #[error("error decoding LZ4 block: {0}")]
    Lz4(#[from] lz4_flex::block::DecompressError),

    #[error("error decoding zlib stream: {0}")]
    Zlib(#[from] InflateDecodeErrors),

    #[error("error decoding zstd frame")]
    Zstd(#[source] std::io::Error),

    #[error("decoded {actual} bytes but the output buffer holds {capacity} bytes")]
    OutputOverflow { actual: usize, capacity: usize },
}

#[derive(Debug, Error)]
pub enum ReadTextureInfoError {
    #[error("error parsing texture metadata")]
    Json(#[from] serde_json::Error),

    #[error("texture metadata is not supported")]
    Format(#[from] FormatError),

    #[error("binary blob has {actual} bytes but the pages declare {declared} bytes")]
    BinarySizeMismatch { declared: u64, actual: usize },
}

#[derive(Debug, Error)]
pub enum PackTextureError {
    #[error("texture cannot be packed")]
    Format(#[from] FormatError),

    #[error("pixel data has {actual} bytes but the pages require {expected} bytes")]
    PixelDataSize { expected: u64, actual: usize },

    #[error("page {page} with size {width}x{height} is too large")]
    PageTooLarge { page: usize, width: u32, height: u32 },

    #[error("error compressing page {page}")]
    Compress {
        page: usize,
        #[source]
        source: CompressError,
    },

    #[error("error serializing texture metadata")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum UnpackTextureError {
    #[error("texture cannot be unpacked")]
    Format(#[from] FormatError),

    #[error("error decoding texture pages")]
    Decode(#[from] DecodeError),

    #[error("invalid page index")]
    Range(#[from] RangeError),
}
