#![no_main]
use libfuzzer_sys::fuzz_target;
use zenrle8::*;

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 * 1024 * 1024),
        ..Default::default()
    };
    let Ok(out) = CompressRequest::new(data)
        .with_limits(&limits)
        .compress(enough::Unstoppable)
    else {
        return;
    };

    // Size fields must match what was written
    let view = HeaderView::new(out.bytes());
    assert_eq!(view.file_size() as usize, out.len());
    assert_eq!(view.image_size() as usize, out.image_size());
    assert_eq!(view.compression(), zenrle8::bmp::header::BI_RLE8);
    assert_eq!(out.pixel_data().last_chunk::<2>(), Some(&[0, 1]));

    // Both scan strategies must agree byte for byte
    let lanes = CompressRequest::new(data)
        .with_limits(&limits)
        .with_strategy(Rle8Strategy::Lanes)
        .compress(enough::Unstoppable)
        .expect("scalar succeeded, lanes must too");
    assert_eq!(out.bytes(), lanes.bytes());
});
