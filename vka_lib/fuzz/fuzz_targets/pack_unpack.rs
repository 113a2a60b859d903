#![no_main]

use libfuzzer_sys::fuzz_target;
use vka_lib::{
    compression::CompressionMode,
    texture::{pack_texture, read_texture_info, unpack_texture_to_vec, Paging, TextureFormat},
};

#[derive(Debug, arbitrary::Arbitrary)]
struct Input {
    compression_mode: CompressionMode,
    width: u8,
    height: u8,
    mipmaps: bool,
    seed: u8,
}

fuzz_target!(|input: Input| {
    let width = input.width as u32;
    let height = input.height as u32;
    let paging = if input.mipmaps {
        Paging::MipChain
    } else {
        Paging::Single
    };
    let len: usize = paging
        .page_dimensions(width, height)
        .iter()
        .map(|[w, h]| (w * h * 4) as usize)
        .sum();
    let pixels: Vec<u8> = (0..len).map(|i| (i as u8).wrapping_mul(input.seed)).collect();

    let file = pack_texture(
        TextureFormat::Rgba8,
        input.compression_mode,
        width,
        height,
        &pixels,
        &paging,
        "",
    )
    .unwrap();
    let info = read_texture_info(&file).unwrap();
    assert_eq!(pixels, unpack_texture_to_vec(&info, &file.binary_blob).unwrap());
});
