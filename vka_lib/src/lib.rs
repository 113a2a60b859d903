//! A library for reading and writing paged and compressed GPU texture assets.
//!
//! # Getting Started
//! Assets are stored in [AssetFile](asset::AssetFile) containers
//! with JSON metadata and a binary blob.
//! Texture metadata is parsed with [read_texture_info](texture::read_texture_info)
//! and the pages are decompressed with [unpack_texture](texture::unpack_texture).
//!
//! ```rust no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use vka_lib::{
//!     asset::AssetFile,
//!     compression::CompressionMode,
//!     texture::{pack_texture, read_texture_info, unpack_texture_page, Paging, TextureFormat},
//! };
//!
//! // Pack a 2x2 RGBA8 texture with a separate page for the 1x1 mipmap.
//! let pixels = vec![255u8; 16 + 4];
//! let file = pack_texture(
//!     TextureFormat::Rgba8,
//!     CompressionMode::Lz4,
//!     2,
//!     2,
//!     &pixels,
//!     &Paging::MipChain,
//!     "white.png",
//! )?;
//! file.save("white.vka")?;
//!
//! // Load only the second mipmap.
//! let file = AssetFile::from_file("white.vka")?;
//! let info = read_texture_info(&file)?;
//! let mut mip1 = vec![0u8; info.pages[1].original_size as usize];
//! unpack_texture_page(&info, 1, &file.binary_blob, &mut mip1)?;
//! # Ok(())
//! # }
//! ```
//!
//! # Design
//! Packing and unpacking are synchronous transformations on caller owned buffers.
//! The library never uploads data to a GPU and has no shared state,
//! so independent files can be processed from multiple threads.
//!
//! Each page is compressed independently with the same
//! [CompressionMode](compression::CompressionMode)
//! to support unpacking a single page like a specific mip level.
//! All sizes and offsets are checked before reading or writing page data,
//! and corrupt or truncated data is always returned as an error.
pub mod asset;
pub mod compression;
pub mod error;
#[cfg(feature = "image")]
pub mod image;
pub mod texture;
