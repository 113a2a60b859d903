use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use vka_lib::compression::CompressionMode;

mod convert;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print debug logs for each page.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an image like PNG to a texture asset.
    Pack {
        /// The input image.
        input: String,
        /// The output texture asset. Defaults to the input with the .vka extension.
        output: Option<String>,
        /// The compression applied to each page.
        #[arg(long, default_value_t = CompressionMode::Lz4)]
        compression: CompressionMode,
        /// Store a page for each level of a generated mipmap chain.
        #[arg(long)]
        mipmaps: bool,
    },
    /// Convert a page of a texture asset to an image like PNG.
    Unpack {
        /// The input texture asset.
        input: String,
        /// The output image. Defaults to the input with the .png extension.
        output: Option<String>,
        /// The page to convert. Defaults to 0 for the base mip level.
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Print the metadata of a texture asset.
    Info {
        /// The input texture asset.
        input: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    simple_logger::SimpleLogger::new()
        .with_level(if cli.verbose {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Info
        })
        .init()?;

    let start = std::time::Instant::now();

    match cli.command {
        Commands::Pack {
            input,
            output,
            compression,
            mipmaps,
        } => {
            let input = PathBuf::from(input);
            let output = output
                .map(PathBuf::from)
                .unwrap_or_else(|| input.with_extension("vka"));
            convert::pack_file(&input, &output, compression, mipmaps)?;
        }
        Commands::Unpack {
            input,
            output,
            page,
        } => {
            let input = PathBuf::from(input);
            let output = output
                .map(PathBuf::from)
                .unwrap_or_else(|| convert::page_output_path(&input, page));
            convert::unpack_file(&input, &output, page)?;
        }
        Commands::Info { input } => {
            println!("{}", convert::metadata_pretty(input)?);
        }
    }

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
