use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    asset::{AssetFile, AssetType},
    compression::CompressionMode,
    error::{FormatError, ReadTextureInfoError},
};

use super::{PageInfo, TextureFormat, TextureInfo};

// Enums are stored as strings to handle unrecognized values after parsing.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextureMetadata {
    texture_size: u64,
    texture_format: String,
    compression_mode: String,
    original_file: String,
    pages: Vec<PageInfo>,
}

/// Parse the JSON metadata of a texture asset.
///
/// Unrecognized texture formats are returned as [TextureFormat::Unknown]
/// so the caller can decide how to handle the texture.
/// Unpacking a texture with an unknown format always fails.
pub fn read_texture_info(file: &AssetFile) -> Result<TextureInfo, ReadTextureInfoError> {
    if file.asset_type != AssetType::Texture {
        return Err(FormatError::UnexpectedAssetType(file.asset_type).into());
    }

    let metadata: TextureMetadata = serde_json::from_str(&file.metadata)?;

    let texture_format = TextureFormat::from_name(&metadata.texture_format);
    if texture_format == TextureFormat::Unknown && metadata.texture_format != "Unknown" {
        warn!(
            "Unrecognized texture format {:?} for {:?}",
            metadata.texture_format, metadata.original_file
        );
    }

    let compression_mode: CompressionMode = metadata
        .compression_mode
        .parse()
        .map_err(|_| FormatError::UnknownCompressionMode(metadata.compression_mode.clone()))?;

    let info = TextureInfo {
        texture_size: metadata.texture_size,
        texture_format,
        compression_mode,
        original_file: metadata.original_file,
        pages: metadata.pages,
    };

    let declared = info.pages_compressed_size();
    if declared != file.binary_blob.len() as u64 {
        return Err(ReadTextureInfoError::BinarySizeMismatch {
            declared,
            actual: file.binary_blob.len(),
        });
    }

    Ok(info)
}

/// Convert `info` to the JSON metadata stored in texture assets.
pub fn write_texture_info(info: &TextureInfo) -> Result<String, serde_json::Error> {
    let metadata = TextureMetadata {
        texture_size: info.texture_size,
        texture_format: info.texture_format.to_string(),
        compression_mode: info.compression_mode.to_string(),
        original_file: info.original_file.clone(),
        pages: info.pages.clone(),
    };
    serde_json::to_string(&metadata)
}

impl TextureInfo {
    /// Create a texture asset from this metadata and the compressed page data.
    pub fn to_asset_file(&self, binary_blob: Vec<u8>) -> Result<AssetFile, serde_json::Error> {
        let metadata = write_texture_info(self)?;
        Ok(AssetFile::new(AssetType::Texture, metadata, binary_blob))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn page(width: u32, height: u32, compressed_size: u32) -> PageInfo {
        PageInfo {
            width,
            height,
            compressed_size,
            original_size: width * height * 4,
        }
    }

    fn texture_info(pages: Vec<PageInfo>) -> TextureInfo {
        TextureInfo {
            texture_size: pages.iter().map(|p| p.original_size as u64).sum(),
            texture_format: TextureFormat::Rgba8,
            compression_mode: CompressionMode::Lz4,
            original_file: "textures/brick.png".to_string(),
            pages,
        }
    }

    fn round_trip(info: TextureInfo) {
        let blob = vec![0u8; info.pages_compressed_size() as usize];
        let file = info.to_asset_file(blob).unwrap();
        assert_eq!(info, read_texture_info(&file).unwrap());
    }

    #[test]
    fn round_trip_zero_pages() {
        round_trip(texture_info(Vec::new()));
    }

    #[test]
    fn round_trip_one_page() {
        round_trip(texture_info(vec![page(2, 2, 16)]));
    }

    #[test]
    fn round_trip_five_pages() {
        round_trip(texture_info(vec![
            page(16, 16, 300),
            page(8, 8, 120),
            page(4, 4, 70),
            page(2, 2, 17),
            page(1, 1, 5),
        ]));
    }

    #[test]
    fn round_trip_unknown_format() {
        round_trip(TextureInfo {
            texture_format: TextureFormat::Unknown,
            compression_mode: CompressionMode::Zstd,
            ..texture_info(vec![page(1, 1, 4)])
        });
    }

    #[test]
    fn write_metadata_keys() {
        let json = write_texture_info(&texture_info(vec![page(2, 2, 9)])).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            serde_json::json!({
                "textureSize": 16,
                "textureFormat": "RGBA8",
                "compressionMode": "LZ4",
                "originalFile": "textures/brick.png",
                "pages": [
                    {
                        "width": 2,
                        "height": 2,
                        "compressedSize": 9,
                        "originalSize": 16
                    }
                ]
            }),
            value
        );
    }

    #[test]
    fn read_metadata_text() {
        let metadata = indoc! {r#"
            {
                "textureSize": 20,
                "textureFormat": "RGBA8",
                "compressionMode": "None",
                "originalFile": "a.png",
                "pages": [
                    { "width": 2, "height": 2, "compressedSize": 16, "originalSize": 16 },
                    { "width": 1, "height": 1, "compressedSize": 4, "originalSize": 4 }
                ]
            }
        "#};
        let file = AssetFile::new(AssetType::Texture, metadata.to_string(), vec![0u8; 20]);
        assert_eq!(
            TextureInfo {
                texture_size: 20,
                texture_format: TextureFormat::Rgba8,
                compression_mode: CompressionMode::None,
                original_file: "a.png".to_string(),
                pages: vec![page(2, 2, 16), page(1, 1, 4)],
            },
            read_texture_info(&file).unwrap()
        );
    }

    #[test]
    fn read_unrecognized_format() {
        let metadata = indoc! {r#"
            {
                "textureSize": 0,
                "textureFormat": "BC7",
                "compressionMode": "LZ4",
                "originalFile": "",
                "pages": []
            }
        "#};
        let file = AssetFile::new(AssetType::Texture, metadata.to_string(), Vec::new());
        assert_eq!(
            TextureFormat::Unknown,
            read_texture_info(&file).unwrap().texture_format
        );
    }

    #[test]
    fn read_unrecognized_compression_mode() {
        let metadata = indoc! {r#"
            {
                "textureSize": 0,
                "textureFormat": "RGBA8",
                "compressionMode": "LZMA",
                "originalFile": "",
                "pages": []
            }
        "#};
        let file = AssetFile::new(AssetType::Texture, metadata.to_string(), Vec::new());
        assert!(matches!(
            read_texture_info(&file),
            Err(ReadTextureInfoError::Format(FormatError::UnknownCompressionMode(m))) if m == "LZMA"
        ));
    }

    #[test]
    fn read_missing_field() {
        let metadata = indoc! {r#"
            {
                "textureSize": 0,
                "compressionMode": "LZ4",
                "originalFile": "",
                "pages": []
            }
        "#};
        let file = AssetFile::new(AssetType::Texture, metadata.to_string(), Vec::new());
        assert!(matches!(
            read_texture_info(&file),
            Err(ReadTextureInfoError::Json(_))
        ));
    }

    #[test]
    fn read_mesh_asset() {
        let file = AssetFile::new(AssetType::Mesh, "{}".to_string(), Vec::new());
        assert!(matches!(
            read_texture_info(&file),
            Err(ReadTextureInfoError::Format(
                FormatError::UnexpectedAssetType(AssetType::Mesh)
            ))
        ));
    }

    #[test]
    fn read_binary_size_mismatch() {
        let file = texture_info(vec![page(2, 2, 9)])
            .to_asset_file(vec![0u8; 8])
            .unwrap();
        assert!(matches!(
            read_texture_info(&file),
            Err(ReadTextureInfoError::BinarySizeMismatch {
                declared: 9,
                actual: 8
            })
        ));
    }
}
