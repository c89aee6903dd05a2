//! Seam between the scene and a rendering API.

use crate::scene::{FrameView, StaticView};

/// A renderer that can draw a [`Scene`](crate::Scene).
///
/// Backends own every GPU resource they create; dropping the backend releases
/// them. Within a frame, each layer's buffers must be written before that
/// layer is drawn.
pub trait SkyBackend {
    type Error: std::error::Error;

    /// Replace the buffers that only change on init or reset.
    fn upload_static(&mut self, view: &StaticView<'_>);

    /// Write the per-frame buffers and draw one frame.
    fn submit(&mut self, frame: &FrameView<'_>) -> Result<(), Self::Error>;
}
