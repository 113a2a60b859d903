use pretty_assertions::assert_eq;
use strum::IntoEnumIterator;
use vka_lib::{
    asset::AssetFile,
    compression::CompressionMode,
    error::{DecodeError, FileError, FormatError, UnpackTextureError},
    texture::{
        pack_texture, read_texture_info, unpack_texture, unpack_texture_page, Paging,
        TextureFormat,
    },
};

// Deterministic pixels with some repetition so compression has an effect.
fn test_pixels(len: usize) -> Vec<u8> {
    (0..len).map(|i| ((i / 3) % 17 * 13) as u8).collect()
}

fn mip_chain_len(width: u32, height: u32) -> usize {
    Paging::MipChain
        .page_dimensions(width, height)
        .iter()
        .map(|[w, h]| (w * h * 4) as usize)
        .sum()
}

#[test]
fn pack_unpack_identity_all_modes() {
    for mode in CompressionMode::iter() {
        for (width, height) in [(1, 1), (2, 2), (7, 3), (64, 32)] {
            let pixels = test_pixels(mip_chain_len(width, height));
            let file = pack_texture(
                TextureFormat::Rgba8,
                mode,
                width,
                height,
                &pixels,
                &Paging::MipChain,
                "test.png",
            )
            .unwrap();

            // Unpack from the serialized file to include the container.
            let file = AssetFile::from_bytes(file.to_bytes().unwrap()).unwrap();
            let info = read_texture_info(&file).unwrap();
            assert_eq!(mode, info.compression_mode);

            let mut output = vec![0u8; info.texture_size as usize];
            unpack_texture(&info, &file.binary_blob, &mut output).unwrap();
            assert_eq!(pixels, output, "{mode} {width}x{height}");
        }
    }
}

#[test]
fn single_page_matches_full_unpack() {
    for mode in CompressionMode::iter() {
        let pixels = test_pixels(mip_chain_len(32, 16));
        let file = pack_texture(
            TextureFormat::Rgba8,
            mode,
            32,
            16,
            &pixels,
            &Paging::MipChain,
            "",
        )
        .unwrap();
        let info = read_texture_info(&file).unwrap();

        let mut full = vec![0u8; info.texture_size as usize];
        unpack_texture(&info, &file.binary_blob, &mut full).unwrap();

        for (i, range) in info.page_ranges().into_iter().enumerate() {
            let mut page = vec![0u8; info.pages[i].original_size as usize];
            unpack_texture_page(&info, i, &file.binary_blob, &mut page).unwrap();
            assert_eq!(
                &full[range.original.start as usize..range.original.end as usize],
                &page[..]
            );
        }
    }
}

#[test]
fn truncated_blob_fails() {
    for mode in CompressionMode::iter() {
        let pixels = test_pixels(mip_chain_len(8, 8));
        let file = pack_texture(
            TextureFormat::Rgba8,
            mode,
            8,
            8,
            &pixels,
            &Paging::MipChain,
            "",
        )
        .unwrap();
        let info = read_texture_info(&file).unwrap();

        for truncated in 1..=file.binary_blob.len() {
            let source = &file.binary_blob[..file.binary_blob.len() - truncated];
            let mut output = vec![0u8; info.texture_size as usize];
            let result = unpack_texture(&info, source, &mut output);
            assert!(
                matches!(
                    result,
                    Err(UnpackTextureError::Decode(DecodeError::SourceUnderrun { .. }))
                ),
                "{mode} {truncated}"
            );
        }
    }
}

#[test]
fn truncated_file_fails() {
    let file = pack_texture(
        TextureFormat::Rgba8,
        CompressionMode::Lz4,
        4,
        4,
        &test_pixels(64),
        &Paging::Single,
        "",
    )
    .unwrap();
    let bytes = file.to_bytes().unwrap();

    for len in 0..bytes.len() {
        assert!(matches!(
            AssetFile::from_bytes(&bytes[..len]),
            Err(FileError::Corrupt(_))
        ));
    }
}

#[test]
fn unknown_format_is_refused() {
    let file = pack_texture(
        TextureFormat::Rgba8,
        CompressionMode::None,
        1,
        1,
        &[1, 2, 3, 4],
        &Paging::Single,
        "",
    )
    .unwrap();
    let file = AssetFile {
        metadata: file.metadata.replace("\"RGBA8\"", "\"R32G32B32A32_SFLOAT\""),
        ..file
    };

    let info = read_texture_info(&file).unwrap();
    assert_eq!(TextureFormat::Unknown, info.texture_format);

    let mut output = [0u8; 4];
    assert!(matches!(
        unpack_texture(&info, &file.binary_blob, &mut output),
        Err(UnpackTextureError::Format(FormatError::UnknownTextureFormat))
    ));
    assert_eq!([0u8; 4], output);
}

#[test]
fn pack_white_2x2() {
    let file = pack_texture(
        TextureFormat::Rgba8,
        CompressionMode::None,
        2,
        2,
        &[0xFF; 16],
        &Paging::Single,
        "white.png",
    )
    .unwrap();

    let info = read_texture_info(&file).unwrap();
    assert_eq!(16, info.texture_size);
    assert_eq!(1, info.pages.len());
    assert_eq!(16, info.pages[0].original_size);
    assert_eq!(2, info.pages[0].width);
    assert_eq!(2, info.pages[0].height);

    let mut output = [0u8; 16];
    unpack_texture(&info, &file.binary_blob, &mut output).unwrap();
    assert_eq!([0xFF; 16], output);
}

#[test]
fn pack_two_pages_destination_offsets() {
    let mut pixels = vec![0xAA; 16];
    pixels.extend_from_slice(&[0x11, 0x22, 0x33, 0x44]);

    for mode in CompressionMode::iter() {
        let file = pack_texture(
            TextureFormat::Rgba8,
            mode,
            2,
            2,
            &pixels,
            &Paging::Explicit(vec![[2, 2], [1, 1]]),
            "",
        )
        .unwrap();
        let info = read_texture_info(&file).unwrap();
        assert_eq!(20, info.texture_size);

        let mut output = vec![0u8; 20];
        unpack_texture(&info, &file.binary_blob, &mut output).unwrap();
        assert_eq!(&[0xAA; 16], &output[..16]);
        assert_eq!(&[0x11, 0x22, 0x33, 0x44], &output[16..]);
    }
}

#[test]
fn save_load_unpack() {
    let path = std::env::temp_dir().join(format!("vka_lib_texture_{}.vka", std::process::id()));

    let pixels = test_pixels(mip_chain_len(16, 16));
    let file = pack_texture(
        TextureFormat::Rgba8,
        CompressionMode::Zstd,
        16,
        16,
        &pixels,
        &Paging::MipChain,
        "source.png",
    )
    .unwrap();
    file.save(&path).unwrap();

    let loaded = AssetFile::from_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(file, loaded);

    let info = read_texture_info(&loaded).unwrap();
    assert_eq!("source.png", info.original_file);

    let mut output = vec![0u8; info.texture_size as usize];
    unpack_texture(&info, &loaded.binary_blob, &mut output).unwrap();
    assert_eq!(pixels, output);
}
