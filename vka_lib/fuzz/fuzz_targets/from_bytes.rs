#![no_main]

use libfuzzer_sys::fuzz_target;
use vka_lib::{asset::AssetFile, texture::read_texture_info};

fuzz_target!(|data: &[u8]| {
    if let Ok(file) = AssetFile::from_bytes(data) {
        if let Ok(info) = read_texture_info(&file) {
            // Avoid allocating huge buffers for pages with bogus sizes.
            for (i, page) in info.pages.iter().enumerate().take(16) {
                if page.original_size <= 1 << 20 {
                    let mut output = vec![0u8; page.original_size as usize];
                    let _ = vka_lib::texture::unpack_texture_page(
                        &info,
                        i,
                        &file.binary_blob,
                        &mut output,
                    );
                }
            }
        }
    }
});
