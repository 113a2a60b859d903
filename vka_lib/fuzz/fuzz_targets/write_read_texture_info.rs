#![no_main]

use libfuzzer_sys::fuzz_target;
use vka_lib::texture::{read_texture_info, TextureInfo};

fuzz_target!(|info: TextureInfo| {
    let blob = vec![0u8; info.pages_compressed_size().min(1 << 20) as usize];
    if blob.len() as u64 == info.pages_compressed_size() {
        let file = info.to_asset_file(blob).unwrap();
        assert_eq!(info, read_texture_info(&file).unwrap());
    }
});
