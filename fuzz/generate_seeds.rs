#!/usr/bin/env -S cargo +nightly -Zscript
//! Generate seed corpus files for fuzzing.
//! Run: cargo +nightly -Zscript fuzz/generate_seeds.rs

fn bmp(width: i32, height: i32, bpp: u16, dib_size: u32, pixels: &[u8]) -> Vec<u8> {
    let offset = 14 + dib_size;
    let mut f = vec![0u8; offset as usize];
    f[0] = b'B'; f[1] = b'M';
    f[2..6].copy_from_slice(&(offset + pixels.len() as u32).to_le_bytes()); // file size
    f[10..14].copy_from_slice(&offset.to_le_bytes()); // data offset
    f[14..18].copy_from_slice(&dib_size.to_le_bytes()); // DIB header size
    f[18..22].copy_from_slice(&width.to_le_bytes());
    f[22..26].copy_from_slice(&height.to_le_bytes());
    f[26..28].copy_from_slice(&1u16.to_le_bytes()); // planes
    f[28..30].copy_from_slice(&bpp.to_le_bytes());
    f.extend_from_slice(pixels);
    f
}

fn main() {
    use std::fs;
    let dir = "fuzz/corpus/fuzz_decode";
    fs::create_dir_all(dir).unwrap();

    // 1x1 24-bit, padded to 4 bytes
    fs::write(format!("{dir}/bmp24_1x1.bmp"), bmp(1, 1, 24, 40, &[0xff, 0, 0, 0])).unwrap();

    // 2x2 24-bit, packed rows
    let packed = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
    fs::write(format!("{dir}/bmp24_2x2_packed.bmp"), bmp(2, 2, 24, 40, &packed)).unwrap();

    // 2x2 32-bit top-down
    let rgba: Vec<u8> = (0..16).collect();
    fs::write(format!("{dir}/bmp32_2x2_topdown.bmp"), bmp(2, -2, 32, 40, &rgba)).unwrap();

    // 1x1 32-bit with a V5 header
    fs::write(format!("{dir}/bmp32_v5.bmp"), bmp(1, 1, 32, 124, &[1, 2, 3, 4])).unwrap();

    // Rejected inputs for edge coverage
    fs::write(format!("{dir}/bmp8_palette.bmp"), bmp(1, 1, 8, 40, &[0, 0, 0, 0])).unwrap();
    fs::write(format!("{dir}/bmp_core_header.bmp"), bmp(1, 1, 24, 12, &[0, 0, 0, 0])).unwrap();
    fs::write(format!("{dir}/bmp24_truncated.bmp"), bmp(4, 4, 24, 40, &[0; 10])).unwrap();
    fs::write(format!("{dir}/empty.bin"), b"").unwrap();
    fs::write(format!("{dir}/bm_short.bin"), b"BM\x00\x00").unwrap();

    println!("Generated seed corpus in {dir}/");
}
