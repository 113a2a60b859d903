use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use vka_lib::{
    asset::AssetFile,
    compression::CompressionMode,
    image::{pack_image, page_image},
    texture::read_texture_info,
};

pub fn pack_file(
    input: &Path,
    output: &Path,
    compression: CompressionMode,
    mipmaps: bool,
) -> Result<()> {
    let image = image::open(input)
        .with_context(|| format!("failed to open image {input:?}"))?
        .to_rgba8();

    let file = pack_image(
        &image,
        compression,
        mipmaps,
        &input.to_string_lossy().replace('\\', "/"),
    )?;
    file.save(output)
        .with_context(|| format!("failed to save {output:?}"))?;

    info!(
        "Packed {}x{} image to {:?} with {} metadata bytes and {} compressed bytes",
        image.width(),
        image.height(),
        output,
        file.metadata.len(),
        file.binary_blob.len()
    );
    Ok(())
}

pub fn unpack_file(input: &Path, output: &Path, page: usize) -> Result<()> {
    let file =
        AssetFile::from_file(input).with_context(|| format!("failed to load {input:?}"))?;
    let info = read_texture_info(&file)?;

    let image = page_image(&info, page, &file.binary_blob)
        .with_context(|| format!("failed to unpack page {page} of {input:?}"))?;
    image
        .save(output)
        .with_context(|| format!("failed to save {output:?}"))?;

    info!(
        "Unpacked page {page} with size {}x{} to {output:?}",
        image.width(),
        image.height()
    );
    Ok(())
}

pub fn metadata_pretty<P: AsRef<Path>>(input: P) -> Result<String> {
    let file = AssetFile::from_file(input)?;
    // Validate the metadata before printing it.
    read_texture_info(&file)?;

    let value: serde_json::Value = serde_json::from_str(&file.metadata)?;
    serde_json::to_string_pretty(&value).map_err(Into::into)
}

/// The default image path for a page.
/// Pages other than the base level include the page index like `file.1.png`.
pub fn page_output_path(input: &Path, page: usize) -> PathBuf {
    if page == 0 {
        input.with_extension("png")
    } else {
        input.with_extension(format!("{page}.png"))
    }
}
