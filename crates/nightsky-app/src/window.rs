//! Window creation and event handling via winit.
//!
//! [`App`] implements winit's [`ApplicationHandler`]: it owns the [`Scene`]
//! and, once the window exists, the [`SkyRenderer`] that draws it.

use std::path::PathBuf;
use std::sync::Arc;

use nightsky_config::{CliArgs, Config};
use nightsky_render::{RenderContextError, SkyRenderer, init_render_context_blocking};
use nightsky_sky::{MotionState, Scene, SceneConfig, SkyBackend, Viewport};
use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::frame_clock::FrameClock;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attributes = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attributes.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attributes
    }
}

/// Map the persisted sky settings onto the scene's generation parameters.
pub fn scene_config_from(config: &Config) -> SceneConfig {
    let mut scene = SceneConfig {
        star_count: config.sky.star_count,
        drift_amplitude: config.motion.drift_amplitude,
        ..SceneConfig::default()
    };
    scene.layout.min_spacing = config.sky.constellation_min_spacing;
    scene.layout.max_attempts = config.sky.constellation_max_attempts;
    scene.shooting_stars.pool_size = config.sky.shooting_star_count as usize;
    scene.motes.count = config.sky.mote_count;
    scene
}

/// What a key press asks the viewer to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    ToggleReducedMotion,
    ReloadConfig,
    Exit,
}

fn key_action(event: &KeyEvent) -> Option<KeyAction> {
    if event.state != ElementState::Pressed || event.repeat {
        return None;
    }
    match event.physical_key {
        PhysicalKey::Code(KeyCode::KeyM) => Some(KeyAction::ToggleReducedMotion),
        PhysicalKey::Code(KeyCode::KeyR) => Some(KeyAction::ReloadConfig),
        PhysicalKey::Code(KeyCode::Escape) => Some(KeyAction::Exit),
        _ => None,
    }
}

/// The on-disk config the viewer was started from, kept for hot-reload.
pub struct ConfigSource {
    pub dir: PathBuf,
    /// `config.ron` as last read, before CLI overrides.
    pub on_disk: Config,
    pub overrides: CliArgs,
}

/// Viewer state across the lifetime of the event loop.
pub struct App {
    config: Config,
    source: Option<ConfigSource>,
    scene: Scene,
    reduced_motion: bool,
    clock: FrameClock,
    window: Option<Arc<Window>>,
    renderer: Option<SkyRenderer>,
    failure: Option<RenderContextError>,
}

impl App {
    pub fn new(config: Config, source: Option<ConfigSource>) -> Self {
        let scene = Scene::init(config.sky.seed, scene_config_from(&config));
        Self {
            reduced_motion: config.motion.reduced_motion,
            scene,
            config,
            source,
            clock: FrameClock::new(),
            window: None,
            renderer: None,
            failure: None,
        }
    }

    /// The GPU initialisation error that stopped the event loop, if any.
    pub fn into_failure(self) -> Option<RenderContextError> {
        self.failure
    }

    fn toggle_reduced_motion(&mut self) {
        self.reduced_motion = !self.reduced_motion;
        info!(
            "Reduced motion {}",
            if self.reduced_motion { "on" } else { "off" }
        );
        if !self.reduced_motion {
            // Time spent frozen is not replayed.
            self.clock.restart();
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Re-read `config.ron` and apply any change. Returns whether it changed.
    ///
    /// CLI overrides still win over the file. A file that fails to parse or
    /// validate leaves the running config untouched.
    fn reload_config(&mut self) -> bool {
        let Some(source) = &mut self.source else {
            return false;
        };
        let fresh = match source.on_disk.reload(&source.dir) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => return false,
            Err(e) => {
                warn!("Config reload failed: {e}");
                return false;
            }
        };
        let mut config = fresh.clone();
        config.apply_cli_overrides(&source.overrides);
        if let Err(e) = config.validate() {
            warn!("Ignoring reloaded config: {e}");
            return false;
        }
        source.on_disk = fresh;
        self.apply_config(config);
        true
    }

    fn apply_config(&mut self, config: Config) {
        if config.motion.reduced_motion != self.config.motion.reduced_motion {
            self.reduced_motion = config.motion.reduced_motion;
        }
        let rebuild = config.sky.seed != self.config.sky.seed
            || scene_config_from(&config) != scene_config_from(&self.config);
        self.config = config;
        if rebuild {
            info!("Regenerating sky (seed {})", self.config.sky.seed);
            self.scene = Scene::init(self.config.sky.seed, scene_config_from(&self.config));
            if let Some(window) = self.window.clone() {
                let size = window.inner_size();
                self.apply_viewport(size.width, size.height);
                window.request_redraw();
            }
        }
    }

    /// Rebuild the scene for a new surface size and push its static data.
    fn apply_viewport(&mut self, width: u32, height: u32) {
        let viewport = Viewport::new(width, height);
        if viewport.aspect().is_none() {
            debug!("Window minimised, keeping current scene");
            return;
        }
        if let Some(renderer) = &mut self.renderer {
            renderer.resize(width, height);
            self.scene.reset(viewport);
            renderer.upload_static(&self.scene.static_view());
        }
    }

    fn redraw(&mut self) {
        let dt = self.clock.tick();
        let state = self.scene.tick(dt, self.reduced_motion);

        if let Some(renderer) = &mut self.renderer
            && let Err(e) = self.scene.submit(renderer)
        {
            warn!("Frame dropped: {e}");
        }

        if self.config.debug.show_fps
            && let Some(fps) = self.clock.take_fps()
        {
            info!("{fps:.1} fps ({} frames total)", self.clock.frame_count());
        }

        // A frozen sky is redrawn only when the window asks for it.
        if state == MotionState::Active
            && let Some(window) = &self.window
        {
            window.request_redraw();
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match event_loop.create_window(window_attributes_from_config(&self.config)) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };
        let size = window.inner_size();
        info!(
            "Window created: {}x{} (scale {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(context) => {
                info!(
                    "GPU initialised: {} ({:?})",
                    context.adapter.get_info().name,
                    context.surface_format
                );
                self.renderer = Some(SkyRenderer::new(context));
            }
            Err(e) => {
                error!("Failed to initialise GPU: {e}");
                self.failure = Some(e);
                event_loop.exit();
                return;
            }
        }

        self.window = Some(window.clone());
        if Viewport::new(size.width, size.height).aspect().is_some() {
            self.apply_viewport(size.width, size.height);
        } else if let Some(renderer) = &mut self.renderer {
            // Minimised at creation: upload the default-aspect scene.
            renderer.upload_static(&self.scene.static_view());
        }
        self.clock.restart();
        window.request_redraw();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                self.renderer = None;
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                self.apply_viewport(size.width, size.height);
                info!("Window resized to {}x{}", size.width, size.height);
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = self.window.clone() {
                    let size = window.inner_size();
                    self.apply_viewport(size.width, size.height);
                    info!(
                        "Scale factor changed to {:.2}, resized to {}x{}",
                        scale_factor, size.width, size.height
                    );
                }
            }
            WindowEvent::Focused(true) => {
                self.reload_config();
            }
            WindowEvent::KeyboardInput { event, .. } => match key_action(&event) {
                Some(KeyAction::ToggleReducedMotion) => self.toggle_reduced_motion(),
                Some(KeyAction::ReloadConfig) => {
                    if !self.reload_config() {
                        debug!("Config unchanged");
                    }
                }
                Some(KeyAction::Exit) => {
                    info!("Escape pressed, shutting down");
                    self.renderer = None;
                    event_loop.exit();
                }
                None => {}
            },
            WindowEvent::RedrawRequested => self.redraw(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.title = "Test Sky".to_string();
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Test Sky");
        assert!(attrs.fullscreen.is_none());

        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert!(attrs.fullscreen.is_some());
    }

    #[test]
    fn test_scene_config_from_defaults_matches_scene_defaults() {
        let scene = scene_config_from(&Config::default());
        let defaults = SceneConfig::default();
        assert_eq!(scene.star_count, defaults.star_count);
        assert_eq!(scene.shooting_stars.pool_size, defaults.shooting_stars.pool_size);
        assert_eq!(scene.motes.count, defaults.motes.count);
        assert!((scene.drift_amplitude - defaults.drift_amplitude).abs() < 1e-6);
    }

    #[test]
    fn test_scene_config_from_overrides() {
        let mut config = Config::default();
        config.sky.star_count = 123;
        config.sky.constellation_min_spacing = 4.0;
        config.sky.constellation_max_attempts = 7;
        config.sky.shooting_star_count = 5;
        config.sky.mote_count = 2;
        config.motion.drift_amplitude = 0.5;

        let scene = scene_config_from(&config);
        assert_eq!(scene.star_count, 123);
        assert!((scene.layout.min_spacing - 4.0).abs() < 1e-6);
        assert_eq!(scene.layout.max_attempts, 7);
        assert_eq!(scene.shooting_stars.pool_size, 5);
        assert_eq!(scene.motes.count, 2);
        assert!((scene.drift_amplitude - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_app_starts_with_configured_motion() {
        let mut config = Config::default();
        config.sky.star_count = 50;
        config.motion.reduced_motion = true;
        let app = App::new(config, None);
        assert!(app.reduced_motion);
        assert_eq!(app.scene.stars().len(), 50);
        assert!(app.window.is_none());
        assert!(app.renderer.is_none());
    }

    #[test]
    fn test_toggle_reduced_motion_without_window() {
        let mut config = Config::default();
        config.sky.star_count = 10;
        let mut app = App::new(config, None);
        app.toggle_reduced_motion();
        assert!(app.reduced_motion);
        app.toggle_reduced_motion();
        assert!(!app.reduced_motion);
    }

    fn app_with_source(dir: &std::path::Path, overrides: CliArgs) -> App {
        let mut on_disk = Config::default();
        on_disk.sky.star_count = 40;
        on_disk.save(dir).unwrap();
        let mut config = on_disk.clone();
        config.apply_cli_overrides(&overrides);
        App::new(
            config,
            Some(ConfigSource {
                dir: dir.to_path_buf(),
                on_disk,
                overrides,
            }),
        )
    }

    #[test]
    fn test_reload_regenerates_sky_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_source(dir.path(), CliArgs::default());
        assert_eq!(app.scene.stars().len(), 40);
        assert!(!app.reload_config());

        let mut edited = Config::default();
        edited.sky.star_count = 25;
        edited.motion.reduced_motion = true;
        edited.save(dir.path()).unwrap();

        assert!(app.reload_config());
        assert_eq!(app.scene.stars().len(), 25);
        assert!(app.reduced_motion);
        assert!(!app.reload_config());
    }

    #[test]
    fn test_reload_keeps_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = CliArgs {
            seed: Some(99),
            ..CliArgs::default()
        };
        let mut app = app_with_source(dir.path(), overrides);

        let mut edited = Config::default();
        edited.sky.star_count = 30;
        edited.sky.seed = 1;
        edited.save(dir.path()).unwrap();

        assert!(app.reload_config());
        assert_eq!(app.config.sky.seed, 99);
        assert_eq!(app.scene.seed(), 99);
        assert_eq!(app.scene.stars().len(), 30);
    }

    #[test]
    fn test_reload_rejects_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with_source(dir.path(), CliArgs::default());

        let mut edited = Config::default();
        edited.window.width = 0;
        edited.save(dir.path()).unwrap();
        assert!(!app.reload_config());
        assert_eq!(app.config.window.width, Config::default().window.width);

        std::fs::write(dir.path().join("config.ron"), "not ron").unwrap();
        assert!(!app.reload_config());
        assert_eq!(app.scene.stars().len(), 40);
    }

    #[test]
    fn test_redraw_without_renderer_advances_scene() {
        let mut config = Config::default();
        config.sky.star_count = 10;
        let mut app = App::new(config, None);
        std::thread::sleep(std::time::Duration::from_millis(2));
        app.redraw();
        assert!(app.scene.clock() > 0.0);

        app.reduced_motion = true;
        let frozen_at = app.scene.clock();
        std::thread::sleep(std::time::Duration::from_millis(2));
        app.redraw();
        assert_eq!(app.scene.clock(), frozen_at);
        assert_eq!(app.scene.state(), MotionState::Frozen);
    }
}
