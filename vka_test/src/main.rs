use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use clap::Parser;
use log::{error, info};
use rayon::prelude::*;
use thiserror::Error;
use vka_lib::{
    asset::AssetFile,
    error::{FileError, PackTextureError, ReadTextureInfoError, UnpackTextureError},
    texture::{
        pack_texture, read_texture_info, unpack_texture_page, unpack_texture_to_vec, Paging,
    },
};

#[derive(Parser)]
#[command(author, version, about)]
#[command(propagate_version = true)]
struct Cli {
    /// The folder to search recursively for .vka files.
    root_folder: String,

    /// Check that packing the unpacked pages again produces identical files.
    #[arg(long)]
    repack: bool,
}

#[derive(Debug, Error)]
enum CheckFileError {
    #[error("error loading file")]
    File(#[from] FileError),

    #[error("error reading texture metadata")]
    Metadata(#[from] ReadTextureInfoError),

    #[error("error unpacking texture")]
    Unpack(#[from] UnpackTextureError),

    #[error("error packing texture")]
    Pack(#[from] PackTextureError),

    #[error("page {0} does not match the unpacked texture")]
    PageMismatch(usize),

    #[error("repacked file does not match the original file")]
    RepackMismatch,
}

fn main() {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .with_module_level("vka_lib", log::LevelFilter::Warn)
        .init()
        .unwrap();

    let start = std::time::Instant::now();

    let paths: Vec<PathBuf> =
        globwalk::GlobWalkerBuilder::from_patterns(&cli.root_folder, &["**/*.vka"])
            .build()
            .unwrap()
            .filter_map(|entry| entry.ok().map(|e| e.path().to_owned()))
            .collect();

    let failed = AtomicUsize::new(0);
    paths.par_iter().for_each(|path| {
        if let Err(e) = check_file(path, cli.repack) {
            error!("Error checking {path:?}: {}", error_chain(&e));
            failed.fetch_add(1, Ordering::Relaxed);
        }
    });

    info!(
        "Checked {} files with {} errors in {:?}",
        paths.len(),
        failed.load(Ordering::Relaxed),
        start.elapsed()
    );
}

fn check_file(path: &Path, repack: bool) -> Result<(), CheckFileError> {
    let file = AssetFile::from_file(path)?;
    let info = read_texture_info(&file)?;

    let pixels = unpack_texture_to_vec(&info, &file.binary_blob)?;

    // Each page should match the corresponding range of the full texture.
    for (i, range) in info.page_ranges().into_iter().enumerate() {
        let mut page = vec![0u8; info.pages[i].original_size as usize];
        unpack_texture_page(&info, i, &file.binary_blob, &mut page)?;
        if page[..] != pixels[range.original.start as usize..range.original.end as usize] {
            return Err(CheckFileError::PageMismatch(i));
        }
    }

    if repack {
        let dimensions = info.pages.iter().map(|p| [p.width, p.height]).collect();
        let (width, height) = info
            .pages
            .first()
            .map(|p| (p.width, p.height))
            .unwrap_or_default();
        let new_file = pack_texture(
            info.texture_format,
            info.compression_mode,
            width,
            height,
            &pixels,
            &Paging::Explicit(dimensions),
            &info.original_file,
        )?;
        if new_file != file {
            return Err(CheckFileError::RepackMismatch);
        }
    }

    Ok(())
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut message = e.to_string();
    let mut source = e.source();
    while let Some(e) = source {
        message.push_str(": ");
        message.push_str(&e.to_string());
        source = e.source();
    }
    message
}
