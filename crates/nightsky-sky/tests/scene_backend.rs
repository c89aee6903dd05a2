use std::fmt;

use nightsky_sky::*;

#[derive(Debug)]
struct DeviceLost;

impl fmt::Display for DeviceLost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("device lost")
    }
}

impl std::error::Error for DeviceLost {}

/// Records what a GPU backend would have uploaded.
#[derive(Default)]
struct RecordingBackend {
    static_uploads: usize,
    star_instances: usize,
    line_vertices: usize,
    frames: Vec<RecordedFrame>,
    fail_next: bool,
}

#[derive(Clone, Debug, PartialEq)]
struct RecordedFrame {
    clock: f32,
    state: MotionState,
    star_alphas: Vec<f32>,
    shooting_sprites: usize,
    mote_alphas: Vec<f32>,
    band_time: f32,
}

impl SkyBackend for RecordingBackend {
    type Error = DeviceLost;

    fn upload_static(&mut self, view: &StaticView<'_>) {
        self.static_uploads += 1;
        self.star_instances = view.star_instances.len();
        self.line_vertices = view.line_vertices.len();
    }

    fn submit(&mut self, frame: &FrameView<'_>) -> Result<(), DeviceLost> {
        if std::mem::take(&mut self.fail_next) {
            return Err(DeviceLost);
        }
        assert_eq!(frame.shooting_instances.len(), frame.shooting_alphas.len());
        assert_eq!(frame.mote_instances.len(), frame.mote_alphas.len());
        self.frames.push(RecordedFrame {
            clock: frame.clock,
            state: frame.state,
            star_alphas: frame.star_alphas.to_vec(),
            shooting_sprites: frame.shooting_instances.len(),
            mote_alphas: frame.mote_alphas.to_vec(),
            band_time: frame.band.elapsed_time,
        });
        Ok(())
    }
}

fn config() -> SceneConfig {
    SceneConfig {
        star_count: 500,
        ..SceneConfig::default()
    }
}

#[test]
fn test_static_upload_matches_scene() {
    let scene = Scene::init(42, config());
    let mut backend = RecordingBackend::default();
    backend.upload_static(&scene.static_view());
    assert_eq!(backend.static_uploads, 1);
    assert_eq!(backend.star_instances, 500);
    // Twelve zodiac templates, two vertices per segment.
    let segments: usize = ZODIAC.iter().map(|t| t.edges.len()).sum();
    assert_eq!(backend.line_vertices, 2 * segments);
}

#[test]
fn test_frames_follow_clock() {
    let mut scene = Scene::init(42, config());
    let mut backend = RecordingBackend::default();
    for _ in 0..120 {
        scene.tick(1.0 / 60.0, false);
        scene.submit(&mut backend).expect("recording never fails");
    }
    assert_eq!(backend.frames.len(), 120);
    assert!(backend.frames.windows(2).all(|w| w[1].clock > w[0].clock));
    for frame in &backend.frames {
        assert_eq!(frame.band_time, frame.clock);
        assert!(frame.star_alphas.iter().all(|a| (0.3..=1.0).contains(a)));
        assert!(frame.shooting_sprites <= 3 * 13);
    }
}

#[test]
fn test_reduced_motion_freezes_submissions() {
    let mut scene = Scene::init(8, config());
    let mut backend = RecordingBackend::default();
    for _ in 0..30 {
        scene.tick(0.1, false);
    }
    for _ in 0..5 {
        scene.tick(0.1, true);
        scene.submit(&mut backend).expect("recording never fails");
    }
    let first = backend.frames[0].clone();
    assert_eq!(first.state, MotionState::Frozen);
    assert!(backend.frames.iter().all(|f| *f == first));

    scene.tick(0.1, false);
    scene.submit(&mut backend).expect("recording never fails");
    let resumed = backend.frames.last().expect("frame recorded");
    assert_eq!(resumed.state, MotionState::Active);
    assert!(resumed.clock > first.clock);
}

#[test]
fn test_backend_errors_propagate() {
    let scene = Scene::init(1, config());
    let mut backend = RecordingBackend {
        fail_next: true,
        ..RecordingBackend::default()
    };
    assert!(scene.submit(&mut backend).is_err());
    assert!(scene.submit(&mut backend).is_ok());
}

#[test]
fn test_reset_then_reupload() {
    let mut scene = Scene::init(42, config());
    let mut backend = RecordingBackend::default();
    backend.upload_static(&scene.static_view());
    scene.tick(2.0, false);
    scene.reset(Viewport::new(1080, 1920));
    backend.upload_static(&scene.static_view());
    assert_eq!(backend.static_uploads, 2);
    assert_eq!(backend.star_instances, 500);
    scene.submit(&mut backend).expect("recording never fails");
    assert_eq!(backend.frames[0].clock, 2.0);
}

#[test]
fn test_reference_trio_layout() {
    let trio: Vec<ConstellationTemplate> = ["Aries", "Taurus", "Gemini"]
        .iter()
        .map(|name| constellation::find(name).cloned().expect("catalog entry"))
        .collect();
    let params = LayoutParams {
        min_spacing: 8.0,
        ..LayoutParams::default()
    };
    let field = layout(&trio, &params, 42);
    assert!(!field.used_fallback());
    assert_eq!(field.segments.len(), 9);
    assert_eq!(field, layout(&trio, &params, 42));
}
