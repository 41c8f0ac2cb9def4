// tests/vectorizer.rs

mod common;

use std::error::Error;
use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayAlphaImage, LumaA, Rgb, RgbImage};

use common::with_timeout;
use storyboard::config::VectorizeSection;
use storyboard::errors::CollaboratorError;
use storyboard::vectorize::potrace::intermediate_path;
use storyboard::vectorize::{PotraceVectorizer, Vectorize, to_two_tone, write_two_tone_bmp};
use storyboard_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn gradient_png(dir: &Path) -> PathBuf {
    let img = RgbImage::from_fn(16, 4, |x, _| {
        let v = (x * 16) as u8;
        Rgb([v, v, v])
    });
    let path = dir.join("scene_01.png");
    img.save(&path).unwrap();
    path
}

fn section(tracer: &str) -> VectorizeSection {
    VectorizeSection {
        tracer: tracer.to_string(),
        ..VectorizeSection::default()
    }
}

#[test]
fn two_tone_is_strictly_black_or_white() {
    let img = DynamicImage::ImageRgb8(RgbImage::from_fn(16, 1, |x, _| {
        let v = (x * 16) as u8;
        Rgb([v, v, v])
    }));
    let bw = to_two_tone(&img, 128);

    for (x, _, px) in bw.enumerate_pixels() {
        let expected = if x * 16 < 128 { 0 } else { 255 };
        assert_eq!(px.0[0], expected, "pixel {x}");
    }
}

#[test]
fn transparent_pixels_become_white() {
    let img = DynamicImage::ImageLumaA8(GrayAlphaImage::from_fn(2, 1, |x, _| {
        if x == 0 { LumaA([0, 0]) } else { LumaA([0, 255]) }
    }));
    let bw = to_two_tone(&img, 128);
    assert_eq!(bw.get_pixel(0, 0).0[0], 255);
    assert_eq!(bw.get_pixel(1, 0).0[0], 0);
}

#[test]
fn bmp_written_next_to_raster_decodes() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let raster = gradient_png(tmp.path());
    let bmp = intermediate_path(&raster);
    assert_eq!(bmp, tmp.path().join("scene_01.bmp"));

    write_two_tone_bmp(&raster, &bmp, 128)?;
    let decoded = image::open(&bmp)?.to_luma8();
    assert!(decoded.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    Ok(())
}

#[test]
fn undecodable_raster_is_parse_error() -> TestResult {
    let tmp = tempfile::tempdir()?;
    let raster = tmp.path().join("scene_01.png");
    std::fs::write(&raster, b"not an image")?;

    match write_two_tone_bmp(&raster, &intermediate_path(&raster), 128) {
        Err(CollaboratorError::Parse(_)) => Ok(()),
        other => panic!("Expected Parse error, got: {:?}", other),
    }
}

#[tokio::test]
async fn missing_tracer_is_probed_as_unavailable() {
    init_tracing();
    let v = with_timeout(PotraceVectorizer::probe(&section("storyboard-no-such-tracer"))).await;
    assert!(!v.is_available());
}

#[tokio::test]
async fn unavailable_tracer_writes_nothing() -> TestResult {
    init_tracing();
    let tmp = tempfile::tempdir()?;
    let raster = gradient_png(tmp.path());
    let svg = tmp.path().join("scene_01.svg");

    let v = PotraceVectorizer::with_availability(&section("potrace"), false);
    let result = with_timeout(v.vectorize(&raster, &svg)).await;

    assert!(matches!(result, Err(CollaboratorError::ToolMissing(_))), "got {result:?}");
    assert!(!svg.exists());
    assert!(!intermediate_path(&raster).exists());
    Ok(())
}

#[cfg(unix)]
fn script(dir: &Path, name: &str, body: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path.to_string_lossy().into_owned()
}

#[cfg(unix)]
#[tokio::test]
async fn tracer_writes_svg_and_bitmap_is_removed() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let tmp = tempfile::tempdir()?;
    let raster = gradient_png(tmp.path());
    let svg = tmp.path().join("scene_01.svg");

    // Arguments arrive as: <bmp> -s -o <svg>.
    let tracer = script(
        tools.path(),
        "fake-potrace",
        r#"[ "$2" = "-s" ] && [ "$3" = "-o" ] && [ -f "$1" ] || exit 2
echo '<svg xmlns="http://www.w3.org/2000/svg"/>' > "$4""#,
    );

    let v = PotraceVectorizer::with_availability(&section(&tracer), true);
    with_timeout(v.vectorize(&raster, &svg)).await?;

    assert!(std::fs::read_to_string(&svg)?.contains("<svg"));
    assert!(!intermediate_path(&raster).exists());
    assert!(raster.exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn failing_tracer_cleans_up_partial_output() -> TestResult {
    init_tracing();
    let tools = tempfile::tempdir()?;
    let tmp = tempfile::tempdir()?;
    let raster = gradient_png(tmp.path());
    let svg = tmp.path().join("scene_01.svg");

    let tracer = script(
        tools.path(),
        "broken-potrace",
        r#"echo partial > "$4"
echo "boom" >&2
exit 3"#,
    );

    let v = PotraceVectorizer::with_availability(&section(&tracer), true);
    match with_timeout(v.vectorize(&raster, &svg)).await {
        Err(CollaboratorError::Tool { status, .. }) => assert_eq!(status, 3),
        other => panic!("Expected Tool error, got: {:?}", other),
    }
    assert!(!svg.exists());
    assert!(!intermediate_path(&raster).exists());
    Ok(())
}
