//! Integration tests for the motion regressor figure.

mod common;

use std::fs;
use std::path::Path;

use image::GenericImageView;
use neuroprep::*;
use tempfile::TempDir;

use common::{files_in, write_text};

const TWO_SAMPLES: &str = "1 2 3 0.1 0.2 0.3\n2 3 4 0.2 0.3 0.4\n";

/// A small raster keeps the tests fast; the CLI uses the 600 dpi default.
fn small() -> PlotParams {
    PlotParams {
        dpi: 40,
        ..PlotParams::default()
    }
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

#[test]
fn two_panels_with_titles_labels_and_legends() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.svg");
    write_text(&input, TWO_SAMPLES);

    let motion = plot_motion_regressors(&input, &output, &PlotParams::default()).unwrap();
    assert_eq!(motion.samples(), 2);

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains("Estimated translation\n</text>"));
    assert!(svg.contains("Estimated translation (mm)\n</text>"));
    assert!(svg.contains("Estimated rotation\n</text>"));
    assert!(svg.contains("Estimated rotation (deg)\n</text>"));
    for label in ["x", "y", "z"] {
        assert_eq!(count(&svg, &format!(">\n{}\n</text>", label)), 2, "legend entry {label}");
    }
    assert!(svg.contains("width=\"576\""));
}

fn font_sizes(svg: &str) -> Vec<f64> {
    svg.split("font-size=\"")
        .skip(1)
        .map(|rest| rest.split('"').next().unwrap().parse().unwrap())
        .collect()
}

#[test]
fn svg_text_is_sized_in_points() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.svg");
    write_text(&input, TWO_SAMPLES);

    plot_motion_regressors(&input, &output, &PlotParams::default()).unwrap();

    let sizes = font_sizes(&fs::read_to_string(&output).unwrap());
    let largest = sizes.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let smallest = sizes.iter().cloned().fold(f64::INFINITY, f64::min);
    assert!((largest - 12.0).abs() < 0.5, "title is {largest}pt");
    assert!((smallest - 10.0).abs() < 0.5, "labels are {smallest}pt");
}

#[test]
fn failed_render_keeps_what_was_already_there() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    write_text(&input, TWO_SAMPLES);

    // A directory where the image should go cannot be replaced by the figure.
    let output = dir.path().join("rp.png");
    fs::create_dir(&output).unwrap();
    fs::write(output.join("keep.txt"), "earlier run").unwrap();

    assert!(plot_motion_regressors(&input, &output, &small()).is_err());
    assert_eq!(fs::read_to_string(output.join("keep.txt")).unwrap(), "earlier run");
    assert_eq!(files_in(dir.path()), vec!["rp.png", "rp.txt"]);
}

#[test]
fn rerender_replaces_the_previous_image() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.png");
    write_text(&input, TWO_SAMPLES);
    fs::write(&output, b"stale").unwrap();

    plot_motion_regressors(&input, &output, &small()).unwrap();

    let img = image::open(&output).unwrap();
    assert_eq!(img.width(), 320);
    assert_eq!(files_in(dir.path()), vec!["rp.png", "rp.txt"]);
}

#[test]
fn png_output_has_the_requested_size() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.png");
    write_text(&input, TWO_SAMPLES);

    plot_motion_regressors(&input, &output, &small()).unwrap();

    let img = image::open(&output).unwrap();
    assert_eq!((img.width(), img.height()), (320, 320));
}

#[test]
fn jpeg_and_bmp_are_supported() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    write_text(&input, TWO_SAMPLES);

    for name in ["rp.jpg", "rp.bmp"] {
        let output = dir.path().join(name);
        plot_motion_regressors(&input, &output, &small()).unwrap();
        assert!(fs::metadata(&output).unwrap().len() > 0, "{name} is empty");
    }
}

#[test]
fn fewer_than_six_columns_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.png");
    write_text(&input, "1 2 3 4 5\n6 7 8 9 10\n");

    let err = plot_motion_regressors(&input, &output, &small()).unwrap_err();
    assert!(matches!(err, Error::Shape { expected: 6, found: 5 }));
    assert!(!output.exists());
    assert_eq!(files_in(dir.path()), vec!["rp.txt"]);
}

#[test]
fn extra_columns_are_ignored() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.png");
    write_text(&input, "1 2 3 0.1 0.2 0.3 42 43\n2 3 4 0.2 0.3 0.4 44 45\n");

    let motion = plot_motion_regressors(&input, &output, &small()).unwrap();
    assert_eq!(motion.rotation().row(1).to_vec(), vec![0.2, 0.3, 0.4]);
    assert!(output.is_file());
}

#[test]
fn malformed_matrix_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.png");
    write_text(&input, "1 2 3 4 5 6\n1 2 3 four 5 6\n");

    let err = plot_motion_regressors(&input, &output, &small()).unwrap_err();
    assert!(matches!(err, Error::Parse { line: 2, .. }));
    assert!(!output.exists());
}

#[test]
fn missing_input_is_not_found() {
    let dir = TempDir::new().unwrap();
    let err = plot_motion_regressors(
        &dir.path().join("nope.txt"),
        &dir.path().join("rp.png"),
        &small(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NotFound { .. }));
}

#[test]
fn unsupported_extension_is_rejected_before_writing() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.pdf");
    write_text(&input, TWO_SAMPLES);

    let err = plot_motion_regressors(&input, &output, &small()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat(_)));
    assert!(!output.exists());
}

#[test]
fn unwritable_destination_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    write_text(&input, TWO_SAMPLES);

    let output = dir.path().join("missing-dir").join("rp.png");
    assert!(plot_motion_regressors(&input, &output, &small()).is_err());
    assert!(!output.exists());
}

#[test]
fn repeated_runs_produce_valid_images_of_the_same_format() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("rp.txt");
    let output = dir.path().join("rp.png");
    write_text(&input, TWO_SAMPLES);

    let mut formats = Vec::new();
    for _ in 0..2 {
        plot_motion_regressors(&input, &output, &small()).unwrap();
        assert!(fs::metadata(&output).unwrap().len() > 0);
        formats.push(image::ImageFormat::from_path(&output).unwrap());
        image::open(&output).unwrap();
    }
    assert_eq!(formats[0], formats[1]);
}

#[test]
fn single_sample_and_missing_values_still_render() {
    let dir = TempDir::new().unwrap();

    let single = dir.path().join("single.txt");
    write_text(&single, "0.5 -0.5 0 0.01 0.02 0.03\n");
    plot_motion_regressors(&single, &dir.path().join("single.svg"), &small()).unwrap();

    let gappy = dir.path().join("gappy.txt");
    write_text(
        &gappy,
        "# fsl mcflirt\n0 0 0 0 0 0\nnan 0.1 0.1 0 0 0\n0.2 0.2 0.2 0 0 nan\n",
    );
    plot_motion_regressors(&gappy, &dir.path().join("gappy.png"), &small()).unwrap();
    assert!(Path::new(&dir.path().join("gappy.png")).is_file());
}
