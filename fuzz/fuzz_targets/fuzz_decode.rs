#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Must never panic
    let _ = zenbmp::probe_bytes(data);

    let limits = zenbmp::Limits::default().with_max_pixels(1 << 24);
    if let Ok(image) = zenbmp::DecodeRequest::new()
        .with_limits(&limits)
        .decode_bytes(data, enough::Unstoppable)
    {
        let expected = image.width() as usize * image.height() as usize * 4;
        assert_eq!(image.pixels().len(), expected);
    }
});
