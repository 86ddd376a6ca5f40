use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};
use std::rc::Rc;

use image::{Rgb, RgbImage};

use posekit_batch::{BatchProcessor, ImageOutcome};
use posekit_common::progress::ProgressReport;
use posekit_estimator::{EstimateRequest, EstimatorError, PoseEstimator};
use posekit_pose_model::{parse_landmarks, Landmark, PoseDetection, SegmentationMask};

/// Finds a two-point "pose" on bright images, nothing on dark ones, and
/// fails on any file whose name starts with `boom`.
struct BrightnessEstimator {
    calls: Rc<RefCell<Vec<String>>>,
    drops: Rc<Cell<usize>>,
    with_mask: bool,
}

impl BrightnessEstimator {
    fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
            drops: Rc::new(Cell::new(0)),
            with_mask: false,
        }
    }
}

impl PoseEstimator for BrightnessEstimator {
    fn estimate(
        &mut self,
        request: &EstimateRequest<'_>,
    ) -> Result<Option<PoseDetection>, EstimatorError> {
        let name = request
            .path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .into_owned();
        self.calls.borrow_mut().push(name.clone());

        if name.starts_with("boom") {
            return Err(EstimatorError::Inference {
                path: name,
                message: "synthetic failure".to_string(),
            });
        }

        let bright = request.image.get_pixel(0, 0).0[0] > 128;
        if !bright {
            return Ok(None);
        }

        let segmentation = self.with_mask.then(|| {
            let len = (request.width() * request.height()) as usize;
            SegmentationMask::new(request.width(), request.height(), vec![1.0; len]).unwrap()
        });

        Ok(Some(PoseDetection {
            landmarks: vec![
                Landmark {
                    index: 0,
                    x: 0.25,
                    y: 0.5,
                    z: -0.123456,
                    visibility: 0.99991,
                },
                Landmark {
                    index: 1,
                    x: 0.75,
                    y: 0.5,
                    z: 0.0,
                    visibility: 0.3,
                },
            ],
            segmentation,
        }))
    }

    fn name(&self) -> &str {
        "brightness"
    }
}

impl Drop for BrightnessEstimator {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

fn fresh_dirs(name: &str) -> (PathBuf, PathBuf) {
    let root = std::env::temp_dir().join(format!("posekit_it_{name}"));
    let _ = std::fs::remove_dir_all(&root);
    let input = root.join("frames");
    std::fs::create_dir_all(&input).unwrap();
    (input, root.join("out"))
}

fn write_png(path: &Path, value: u8) {
    RgbImage::from_pixel(40, 30, Rgb([value, value, value]))
        .save(path)
        .unwrap();
}

#[test]
fn mixed_batch_isolates_failures_and_names_outputs() {
    posekit_common::logging::init_default_logging();
    let (input, output) = fresh_dirs("mixed");
    write_png(&input.join("bright.png"), 220);
    write_png(&input.join("dark.png"), 10);
    write_png(&input.join("boom.png"), 220);
    std::fs::write(input.join("corrupt.jpg"), b"\xff\xd8 truncated").unwrap();
    std::fs::write(input.join("readme.md"), b"ignored").unwrap();

    let estimator = BrightnessEstimator::new();
    let calls = estimator.calls.clone();
    let mut processor = BatchProcessor::new(estimator);
    let summary = processor.run(&input, &output, None).unwrap();

    assert_eq!(summary.discovered, 4);
    assert_eq!(summary.images_written, 2);
    assert_eq!(summary.landmark_files, 1);
    assert_eq!(summary.no_pose, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.failed, 1);
    assert!(!summary.is_clean());
    assert_eq!(summary.failures.len(), 2);

    // Sorted order, and the undecodable file never reaches the estimator
    assert_eq!(*calls.borrow(), vec!["boom.png", "bright.png", "dark.png"]);

    assert!(output.join("pose_bright.png").exists());
    assert!(output.join("landmarks_bright.txt").exists());
    assert!(output.join("pose_dark.png").exists());
    assert!(!output.join("landmarks_dark.txt").exists());
    assert!(!output.join("pose_boom.png").exists());
    assert!(!output.join("landmarks_boom.txt").exists());
    assert!(!output.join("pose_corrupt.jpg").exists());

    let leftovers: Vec<_> = std::fs::read_dir(&output)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".partial"))
        .collect();
    assert!(leftovers.is_empty(), "staging files left: {leftovers:?}");

    std::fs::remove_dir_all(input.parent().unwrap()).ok();
}

#[test]
fn no_pose_output_is_byte_identical_copy() {
    let (input, output) = fresh_dirs("no_pose_copy");
    let source = input.join("frame.png");
    write_png(&source, 5);

    let mut processor = BatchProcessor::new(BrightnessEstimator::new());
    std::fs::create_dir_all(&output).unwrap();
    let outcome = processor.process_image(&source, &output).unwrap();

    assert_eq!(outcome, ImageOutcome::NoPose);
    assert_eq!(
        std::fs::read(&source).unwrap(),
        std::fs::read(output.join("pose_frame.png")).unwrap()
    );
    assert!(!output.join("landmarks_frame.txt").exists());

    std::fs::remove_dir_all(input.parent().unwrap()).ok();
}

#[test]
fn landmark_dump_matches_detection() {
    let (input, output) = fresh_dirs("dump");
    write_png(&input.join("pose.png"), 200);

    let mut processor = BatchProcessor::new(BrightnessEstimator::new());
    processor.run(&input, &output, None).unwrap();

    let text = std::fs::read_to_string(output.join("landmarks_pose.txt")).unwrap();
    assert!(text.starts_with("Image size: {'width': 40, 'height': 30}\n"));
    assert!(text.contains("Position: x=0.2500, y=0.5000, z=-0.1235\n"));
    assert!(text.contains("Visibility: 0.9999\n"));
    assert!(text.contains("Visibility: 0.3000\n"));

    let parsed = parse_landmarks(&text).unwrap();
    assert_eq!(parsed.image_size.width, 40);
    assert_eq!(parsed.image_size.height, 30);
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed.landmarks[1].x, 0.75);

    let rendered = image::open(output.join("pose_pose.png")).unwrap().to_rgb8();
    // Landmark 0 at (10, 15) is drawn as rings; landmark 1 is below the visibility threshold
    assert_eq!(*rendered.get_pixel(10, 15), Rgb([200, 200, 200]));
    assert_eq!(*rendered.get_pixel(12, 15), Rgb([0, 255, 0]));
    assert_eq!(*rendered.get_pixel(14, 15), Rgb([255, 255, 255]));
    assert_eq!(*rendered.get_pixel(32, 15), Rgb([200, 200, 200]));

    std::fs::remove_dir_all(input.parent().unwrap()).ok();
}

#[test]
fn segmentation_mask_is_blended_into_rendered_image() {
    let (input, output) = fresh_dirs("mask");
    write_png(&input.join("pose.png"), 200);

    let mut estimator = BrightnessEstimator::new();
    estimator.with_mask = true;
    let mut processor = BatchProcessor::new(estimator);
    processor.run(&input, &output, None).unwrap();

    let rendered = image::open(output.join("pose_pose.png")).unwrap().to_rgb8();
    // 0.9 * 200 + 0.1 * 255 = 205.5, rounded up
    assert_eq!(*rendered.get_pixel(35, 2), Rgb([206, 206, 206]));

    std::fs::remove_dir_all(input.parent().unwrap()).ok();
}

#[test]
fn estimator_released_once_after_batch_with_failures() {
    let (input, output) = fresh_dirs("lifecycle");
    write_png(&input.join("boom_1.png"), 200);
    write_png(&input.join("boom_2.png"), 200);
    write_png(&input.join("ok.png"), 200);

    let estimator = BrightnessEstimator::new();
    let drops = estimator.drops.clone();
    let calls = estimator.calls.clone();
    {
        let mut processor = BatchProcessor::new(estimator);
        let summary = processor.run(&input, &output, None).unwrap();
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.images_written, 1);
        assert_eq!(drops.get(), 0);
    }
    assert_eq!(drops.get(), 1);
    assert_eq!(calls.borrow().len(), 3);

    std::fs::remove_dir_all(input.parent().unwrap()).ok();
}

#[test]
fn progress_reported_once_per_image() {
    let (input, output) = fresh_dirs("progress");
    for i in 0..3 {
        write_png(&input.join(format!("f{i}.png")), 10);
    }

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let mut processor = BatchProcessor::new(BrightnessEstimator::new());
    processor
        .run(
            &input,
            &output,
            Some(Box::new(move |path: &Path, report: ProgressReport| {
                sink.borrow_mut()
                    .push((path.to_path_buf(), report.done, report.fraction));
            })),
        )
        .unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0].1, 1);
    assert!((seen[2].2 - 1.0).abs() < 1e-9);
    assert!(seen[2].0.ends_with("f2.png"));

    std::fs::remove_dir_all(input.parent().unwrap()).ok();
}
