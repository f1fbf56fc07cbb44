//! End-to-end tests of the host entry point against real files.

use std::path::{Path, PathBuf};
use std::time::Duration;

use avif_bridge::{decode, Avif, DecoderConfig, FrozenBytes, HostError, Value};
use avif_bridge_core::testing::ScriptedCodec;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn path_value(path: &Path) -> Value {
    Value::from(path.to_str().unwrap())
}

fn write_png(dir: &TempDir, name: &str, width: u32, height: u32) -> (PathBuf, Vec<u8>) {
    let path = dir.path().join(name);
    let img = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7) as u8, (y * 13) as u8, (x + y) as u8, 255 - x as u8])
    });
    img.save(&path).unwrap();
    (path, img.into_raw())
}

fn unpack(value: &Value) -> (i64, i64, FrozenBytes) {
    let tuple = value.as_tuple().expect("decode returns a tuple");
    assert_eq!(tuple.len(), 3);
    (
        tuple.get(0).and_then(Value::as_integer).unwrap(),
        tuple.get(1).and_then(Value::as_integer).unwrap(),
        tuple.get(2).and_then(Value::as_bytes).cloned().unwrap(),
    )
}

#[tokio::test]
async fn test_decode_returns_dimensions_and_rgba() {
    init_tracing();
    let dir = TempDir::new().unwrap();
    let (path, expected) = write_png(&dir, "tile.png", 17, 5);

    let value = decode(&path_value(&path)).await.unwrap();
    let (width, height, pixels) = unpack(&value);

    assert_eq!((width, height), (17, 5));
    assert_eq!(pixels.len(), 17 * 5 * 4);
    assert_eq!(pixels.as_slice(), expected.as_slice());
}

#[tokio::test]
async fn test_single_row_and_column() {
    let dir = TempDir::new().unwrap();

    for (w, h) in [(1u32, 1u32), (1, 9), (9, 1)] {
        let (path, _) = write_png(&dir, &format!("strip_{w}x{h}.png"), w, h);
        let value = decode(&path_value(&path)).await.unwrap();
        let (width, height, pixels) = unpack(&value);

        assert_eq!((width, height), (i64::from(w), i64::from(h)));
        assert_eq!(pixels.len() as u32, 4 * w.max(h));
    }
}

#[tokio::test]
async fn test_type_error_fires_before_filesystem() {
    let missing = "/definitely/not/here.avif";
    let err = decode(&Value::Bytes(FrozenBytes::copy_from_slice(missing.as_bytes())))
        .await
        .unwrap_err();
    assert_eq!(err.class_name(), "TypeError");

    let err = decode(&Value::Integer(42)).await.unwrap_err();
    assert_eq!(
        err,
        HostError::TypeError("wrong argument type Integer (expected String)".into())
    );
}

#[tokio::test]
async fn test_missing_file_is_open_failure() {
    let dir = TempDir::new().unwrap();
    let err = decode(&path_value(&dir.path().join("missing.avif")))
        .await
        .unwrap_err();

    assert_eq!(err.class_name(), "RuntimeError");
    assert_eq!(err.message(), "AVIF decoding failed: IO Error");
}

#[tokio::test]
async fn test_invalid_bitstream_is_parse_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("garbage.bin");
    std::fs::write(&path, [0x42u8; 256]).unwrap();

    let err = decode(&path_value(&path)).await.unwrap_err();
    assert_eq!(err.class_name(), "RuntimeError");
    assert_eq!(err.message(), "AVIF decoding failed: Invalid ftyp");
}

#[tokio::test]
async fn test_corrupt_file_with_image_extension_is_parse_failure() {
    let dir = TempDir::new().unwrap();

    for name in ["corrupt.avif", "corrupt.png"] {
        let path = dir.path().join(name);
        std::fs::write(&path, [0x42u8; 256]).unwrap();

        let err = decode(&path_value(&path)).await.unwrap_err();
        assert_eq!(err.class_name(), "RuntimeError", "{name}");
        assert!(
            [
                "AVIF decoding failed: Invalid ftyp",
                "AVIF decoding failed: BMFF parsing failed",
            ]
            .contains(&err.message()),
            "{name}: {}",
            err.message()
        );
    }
}

#[tokio::test]
async fn test_repeated_decode_is_identical() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_png(&dir, "same.png", 12, 12);
    let arg = path_value(&path);

    let first = decode(&arg).await.unwrap();
    let second = decode(&arg).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_pixel_byte_limit_is_allocation_failure() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_png(&dir, "big.png", 32, 32);

    let mut config = DecoderConfig::default();
    config.max_pixel_bytes = Some(1024);
    let avif = Avif::new(config).unwrap();

    let err = avif.decode(&path_value(&path)).await.unwrap_err();
    assert_eq!(
        err.message(),
        "AVIF decoding failed: Failed to allocate pixel buffer (out of memory)"
    );
}

#[tokio::test]
async fn test_config_from_json() {
    let dir = TempDir::new().unwrap();
    let (path, _) = write_png(&dir, "wide.png", 64, 2);

    let config: DecoderConfig =
        serde_json::from_str(r#"{"image_dimension_limit": 32}"#).unwrap();
    let avif = Avif::new(config).unwrap();

    let err = avif.decode(&path_value(&path)).await.unwrap_err();
    assert_eq!(err.message(), "AVIF decoding failed: BMFF parsing failed");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_decodes_do_not_cross_contaminate() {
    init_tracing();
    let dir = TempDir::new().unwrap();

    let mut args = Vec::new();
    for i in 0..8u32 {
        let (path, _) = write_png(&dir, &format!("img_{i}.png"), 3 + i, 2 + i * 2);
        args.push(path_value(&path));
        args.push(path_value(&dir.path().join(format!("missing_{i}.avif"))));
    }
    let garbage = dir.path().join("garbage.bin");
    std::fs::write(&garbage, b"not an image").unwrap();
    args.push(path_value(&garbage));
    args.push(Value::Nil);

    let mut serial = Vec::new();
    for arg in &args {
        serial.push(decode(arg).await);
    }

    let handles: Vec<_> = args
        .iter()
        .cloned()
        .map(|arg| tokio::spawn(async move { decode(&arg).await }))
        .collect();

    for (handle, expected) in handles.into_iter().zip(serial) {
        assert_eq!(handle.await.unwrap(), expected);
    }
}

#[tokio::test]
async fn test_dropped_call_still_releases_decoder() {
    let avif = Avif::with_codec(ScriptedCodec::new(8, 8).with_delay(Duration::from_millis(100)));
    let call = avif.clone();

    let timed_out = tokio::time::timeout(Duration::from_millis(5), async move {
        call.decode(&Value::from("slow.avif")).await
    })
    .await;
    assert!(timed_out.is_err());

    // The worker keeps running after the caller gave up, then cleans up.
    for _ in 0..100 {
        if avif.codec().created() == 1 && avif.codec().live_decoders() == 0 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(avif.codec().created(), 1);
    assert_eq!(avif.codec().live_decoders(), 0);
}

#[tokio::test]
async fn test_avif_file() {
    use image::codecs::avif::AvifEncoder;
    use image::ImageEncoder;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("photo.avif");
    let img = RgbaImage::from_pixel(20, 10, Rgba([200, 100, 50, 255]));
    AvifEncoder::new_with_speed_quality(std::fs::File::create(&path).unwrap(), 10, 90)
        .write_image(img.as_raw(), 20, 10, image::ExtendedColorType::Rgba8)
        .unwrap();

    let value = decode(&path_value(&path)).await.unwrap();
    let (width, height, pixels) = unpack(&value);
    assert_eq!((width, height), (20, 10));
    assert_eq!(pixels.len(), 20 * 10 * 4);
    assert_eq!(decode(&path_value(&path)).await.unwrap(), value);

    let truncated = dir.path().join("truncated.avif");
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&truncated, &bytes[..bytes.len() / 3]).unwrap();
    let err = decode(&path_value(&truncated)).await.unwrap_err();
    assert_eq!(err.class_name(), "RuntimeError");
}
