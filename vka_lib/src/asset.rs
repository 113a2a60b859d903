//! Asset containers in `.vka` files.
//!
//! # Overview
//! An [AssetFile] bundles a JSON metadata section describing the asset
//! with a binary blob containing the asset data.
//! The layout is a fixed size [AssetHeader] followed by the metadata and then the blob.
//! Neither section is padded or aligned.
//!
//! | Offset | Size | Field |
//! | --- | --- | --- |
//! | 0 | 4 | [AssetType] tag like `TEXI` |
//! | 4 | 4 | version |
//! | 8 | 4 | metadata size |
//! | 12 | 8 | binary blob size |
//! | 20 | metadata size | UTF-8 JSON metadata |
//! | 20 + metadata size | binary blob size | binary blob |
//!
//! The contents of the metadata and binary blob depend on the [AssetType].
//! Textures are described by [TextureInfo](crate::texture::TextureInfo).
use std::{
    io::{Cursor, Write},
    path::Path,
};

use binrw::{binrw, BinRead, BinWrite};
use log::trace;

use crate::error::{CorruptContainerError, FileError};

/// The only container version this library reads and writes.
pub const ASSET_VERSION: u32 = 1;

/// The size in bytes of [AssetHeader].
pub const ASSET_HEADER_SIZE: u64 = 20;

/// The 4 byte tag at the start of every container.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(BinRead, BinWrite, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetType {
    #[brw(magic(b"TEXI"))]
    Texture,
    #[brw(magic(b"MESH"))]
    Mesh,
}

#[binrw]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AssetHeader {
    pub asset_type: AssetType,
    pub version: u32,
    /// The size of the JSON metadata in bytes.
    pub metadata_size: u32,
    /// The size of the binary blob in bytes.
    pub binary_size: u64,
}

/// A metadata and binary blob pair loaded from or saved to a single file.
#[cfg_attr(feature = "arbitrary", derive(arbitrary::Arbitrary))]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct AssetFile {
    pub asset_type: AssetType,
    pub version: u32,
    /// JSON text describing the asset.
    pub metadata: String,
    /// The asset data described by [metadata](#structfield.metadata).
    /// For textures, this is the compressed data of all pages in page order.
    pub binary_blob: Vec<u8>,
}

impl AssetFile {
    /// Create a container with the current [ASSET_VERSION].
    pub fn new(asset_type: AssetType, metadata: String, binary_blob: Vec<u8>) -> Self {
        Self {
            asset_type,
            version: ASSET_VERSION,
            metadata,
            binary_blob,
        }
    }

    /// Read from `path` using a fully buffered reader for performance.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FileError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => FileError::NotFound(path.to_owned()),
            _ => FileError::Io(e),
        })?;
        Self::from_bytes(bytes)
    }

    /// Read from `bytes` and check the header sizes against the remaining data.
    pub fn from_bytes<T: AsRef<[u8]>>(bytes: T) -> Result<Self, FileError> {
        let bytes = bytes.as_ref();
        let mut reader = Cursor::new(bytes);
        let header = AssetHeader::read_le(&mut reader).map_err(CorruptContainerError::Header)?;
        trace!("{header:?}");

        if header.version != ASSET_VERSION {
            return Err(CorruptContainerError::UnsupportedVersion(header.version).into());
        }

        // Check the declared sizes before allocating anything.
        let remaining = bytes.len() as u64 - ASSET_HEADER_SIZE;
        let declared = (header.metadata_size as u64).checked_add(header.binary_size);
        if declared != Some(remaining) {
            return Err(CorruptContainerError::SizeMismatch {
                declared: declared.unwrap_or(u64::MAX),
                actual: remaining,
            }
            .into());
        }

        let (metadata, binary_blob) =
            bytes[ASSET_HEADER_SIZE as usize..].split_at(header.metadata_size as usize);
        let metadata =
            String::from_utf8(metadata.to_vec()).map_err(CorruptContainerError::MetadataUtf8)?;

        Ok(Self {
            asset_type: header.asset_type,
            version: header.version,
            metadata,
            binary_blob: binary_blob.to_vec(),
        })
    }

    /// The header describing this container.
    pub fn header(&self) -> Result<AssetHeader, FileError> {
        let metadata_size = u32::try_from(self.metadata.len())
            .map_err(|_| FileError::MetadataTooLarge(self.metadata.len()))?;
        Ok(AssetHeader {
            asset_type: self.asset_type,
            version: self.version,
            metadata_size,
            binary_size: self.binary_blob.len() as u64,
        })
    }

    /// Serialize the full container including the header.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FileError> {
        let header = self.header()?;

        let mut writer = Cursor::new(Vec::new());
        header.write_le(&mut writer)?;
        writer.write_all(self.metadata.as_bytes())?;
        writer.write_all(&self.binary_blob)?;
        Ok(writer.into_inner())
    }

    /// Write to `path` in a single step.
    ///
    /// The container is written to a temporary file next to `path` first
    /// and then renamed so that a failed write never leaves a partial file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), FileError> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        let result = std::fs::File::create(&tmp_path).and_then(|mut f| {
            f.write_all(&bytes)?;
            f.sync_all()
        });
        if let Err(e) = result {
            let _ = std::fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        #[cfg(windows)]
        {
            // Windows rename fails if destination exists.
            if path.exists() {
                std::fs::remove_file(path)?;
            }
        }

        std::fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
