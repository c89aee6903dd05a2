//! wgpu backend for the night sky: surface management, camera, sprite/line/band
//! pipelines, and the [`SkyRenderer`] that implements [`nightsky_sky::SkyBackend`].

pub mod buffer;
pub mod camera;
pub mod gpu;
pub mod pass;
pub mod pipeline;
pub mod renderer;

pub use buffer::DynamicBuffer;
pub use camera::{CameraUniform, SkyCamera};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use pass::{FrameEncoder, NIGHT_BLUE, RenderPassBuilder};
pub use pipeline::{ADDITIVE_BLEND, BandPipeline, CameraBinding, LinePipeline, SpritePipeline};
pub use renderer::{RenderError, SkyRenderer};
