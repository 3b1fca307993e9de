//! End-to-end thumbnail behaviour through the public API.

mod common;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use common::{dimensions_of, encoded_image, init_tracing, png};
use image::ImageFormat;
use image_thumb::{
    ErrorKind, ImageSource, PngOptions, ResponseType, ThumbOptions, ThumbOutput, Thumbnailer,
    thumb,
};
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, AsyncReadExt, ReadBuf};

fn bytes(output: ThumbOutput) -> Vec<u8> {
    output.into_bytes().unwrap()
}

/// A stream that fails on the first read.
struct BrokenStream;

impl AsyncRead for BrokenStream {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed")))
    }
}

#[tokio::test]
async fn same_bytes_from_every_source_give_same_thumbnail() {
    init_tracing();
    let source = png(200, 100);
    let options = ThumbOptions::default().with_percentage(50.0);

    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("source.png");
    std::fs::write(&path, &source).unwrap();
    let path_text = path.to_str().unwrap().to_string();

    let from_buffer = bytes(thumb(source.clone(), &options).await.unwrap());
    let from_base64 = bytes(thumb(STANDARD.encode(&source), &options).await.unwrap());
    let from_path = bytes(thumb(path_text, &options).await.unwrap());
    let file = tokio::fs::File::open(&path).await.unwrap();
    let from_stream = bytes(thumb(file, &options).await.unwrap());

    assert_eq!(from_buffer, from_base64);
    assert_eq!(from_buffer, from_path);
    assert_eq!(from_buffer, from_stream);
    assert_eq!(dimensions_of(&from_buffer), (100, 50));
}

#[tokio::test]
async fn chunked_stream_matches_buffer() {
    let source = png(64, 64);
    let (head, tail) = source.split_at(source.len() / 2);
    let stream = std::io::Cursor::new(head.to_vec()).chain(std::io::Cursor::new(tail.to_vec()));
    let options = ThumbOptions::default();

    let from_stream = bytes(thumb(ImageSource::stream(stream), &options).await.unwrap());
    let from_buffer = bytes(thumb(source, &options).await.unwrap());
    assert_eq!(from_stream, from_buffer);
}

#[tokio::test]
async fn default_percentage_is_ten() {
    let out = bytes(thumb(png(1000, 1000), &ThumbOptions::default()).await.unwrap());
    assert_eq!(dimensions_of(&out), (100, 100));
}

#[tokio::test]
async fn width_only_keeps_raw_original_height() {
    // Height is copied from the original (100), not scaled to 25.
    let options = ThumbOptions::default().with_width(50);
    let out = bytes(thumb(png(200, 100), &options).await.unwrap());
    assert_eq!(dimensions_of(&out), (50, 100));
}

#[tokio::test]
async fn both_dimensions_used_exactly() {
    let options = ThumbOptions::default().with_width(30).with_height(70);
    let out = bytes(thumb(png(200, 100), &options).await.unwrap());
    assert_eq!(dimensions_of(&out), (30, 70));
}

#[tokio::test]
async fn never_enlarges_beyond_original() {
    let options = ThumbOptions::default().with_width(400).with_height(300);
    let out = bytes(thumb(png(200, 100), &options).await.unwrap());
    assert_eq!(dimensions_of(&out), (200, 100));

    let options = ThumbOptions::default().with_percentage(300.0);
    let out = bytes(thumb(png(40, 20), &options).await.unwrap());
    assert_eq!(dimensions_of(&out), (40, 20));
}

#[tokio::test]
async fn base64_response_decodes_to_buffer_response() {
    let source = png(120, 80);
    let options = ThumbOptions::default().with_percentage(50.0);

    let raw = thumb(source.clone(), &options).await.unwrap();
    let text = thumb(source, &options.with_response_type(ResponseType::Base64))
        .await
        .unwrap();

    let decoded = STANDARD.decode(text.as_base64().unwrap()).unwrap();
    assert_eq!(raw.as_bytes().unwrap(), decoded.as_slice());
}

#[tokio::test]
async fn jpeg_input_stays_jpeg_unless_forced() {
    let source = encoded_image(100, 100, ImageFormat::Jpeg);

    let kept = bytes(thumb(source.clone(), &ThumbOptions::default()).await.unwrap());
    assert_eq!(image::guess_format(&kept).unwrap(), ImageFormat::Jpeg);

    let options = ThumbOptions::default().with_png_options(PngOptions::forced());
    let forced = bytes(thumb(source, &options).await.unwrap());
    assert_eq!(image::guess_format(&forced).unwrap(), ImageFormat::Png);
    assert_eq!(dimensions_of(&forced), (10, 10));
}

#[tokio::test]
async fn tiff_path_is_probed_and_resized() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("scan.tif");
    std::fs::write(&path, encoded_image(80, 40, ImageFormat::Tiff)).unwrap();

    let options = ThumbOptions::default().with_percentage(50.0);
    let out = bytes(thumb(path.as_path(), &options).await.unwrap());
    assert_eq!(dimensions_of(&out), (40, 20));
}

#[tokio::test]
async fn options_parsed_from_json_drive_the_call() {
    let options =
        ThumbOptions::from_json(r#"{"height": 10, "responseType": "base64"}"#).unwrap();
    let out = thumb(png(60, 30), &options).await.unwrap();

    let decoded = out.into_bytes().unwrap();
    assert_eq!(dimensions_of(&decoded), (60, 10));
}

#[tokio::test]
async fn unsupported_source_type_fails() {
    let err = Thumbnailer::new()
        .thumb_value(serde_json::json!(42), &ThumbOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedSource);
    assert!(err.to_string().contains("unsupported source type"));
}

#[tokio::test]
async fn serialized_buffer_value_is_accepted() {
    let source = png(20, 20);
    let value = serde_json::json!({ "type": "Buffer", "data": source });

    let out = Thumbnailer::new()
        .thumb_value(value, &ThumbOptions::default().with_percentage(50.0))
        .await
        .unwrap();
    assert_eq!(dimensions_of(&bytes(out)), (10, 10));
}

#[tokio::test]
async fn missing_file_is_filesystem_error() {
    let err = thumb("/nonexistent/dir/photo.png", &ThumbOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Filesystem);
    assert!(err.to_string().contains("/nonexistent/dir/photo.png"));
}

#[tokio::test]
async fn failing_stream_is_stream_error() {
    let err = thumb(ImageSource::stream(BrokenStream), &ThumbOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Stream);
    assert!(err.to_string().contains("stream closed"));
}

#[tokio::test]
async fn corrupt_bytes_are_codec_error() {
    let err = thumb(b"not an image at all".to_vec(), &ThumbOptions::default())
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Codec);
}

#[tokio::test]
async fn concurrent_calls_are_independent() {
    let thumbnailer = Thumbnailer::new();
    let opts_a = ThumbOptions::default();
    let opts_b = ThumbOptions::default();
    let (a, b) = tokio::join!(
        thumbnailer.thumb(png(100, 100), &opts_a),
        thumbnailer.thumb(png(300, 200), &opts_b),
    );
    assert_eq!(dimensions_of(&bytes(a.unwrap())), (10, 10));
    assert_eq!(dimensions_of(&bytes(b.unwrap())), (30, 20));
}
