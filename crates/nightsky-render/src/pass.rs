//! Per-frame command encoding and the sky's clear pass.

/// Deep night blue the sky is cleared to before the band is drawn.
pub const NIGHT_BLUE: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.006,
    b: 0.022,
    a: 1.0,
};

/// Builder for the single colour-only render pass of a frame.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    pub fn new() -> Self {
        Self {
            clear_color: NIGHT_BLUE,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn create_render_pass<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Encodes one frame against an acquired surface texture.
///
/// [`FrameEncoder::submit`] finishes the commands and presents the texture.
pub struct FrameEncoder<'q> {
    encoder: wgpu::CommandEncoder,
    queue: &'q wgpu::Queue,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl<'q> FrameEncoder<'q> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'q wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            encoder,
            queue,
            surface_texture,
            surface_view,
        }
    }

    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> wgpu::RenderPass<'a> {
        builder.create_render_pass(&mut self.encoder, &self.surface_view)
    }

    /// Submit the command buffer and present. Consumes self to prevent double submission.
    pub fn submit(self) {
        let Self {
            encoder,
            queue,
            surface_texture,
            ..
        } = self;
        queue.submit([encoder.finish()]);
        surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_clear_color() {
        let builder = RenderPassBuilder::new().clear_color(wgpu::Color::RED);
        assert_eq!(builder.clear_color.r, 1.0);
        assert_eq!(builder.clear_color.g, 0.0);
        assert_eq!(builder.clear_color.a, 1.0);
    }

    #[test]
    fn test_default_clear_color_is_night_blue() {
        let builder = RenderPassBuilder::default();
        assert_eq!(builder.clear_color, NIGHT_BLUE);
        assert!(NIGHT_BLUE.b > NIGHT_BLUE.r && NIGHT_BLUE.b > NIGHT_BLUE.g);
        assert!(NIGHT_BLUE.b < 0.05);
    }

    #[test]
    fn test_label_is_stored() {
        let builder = RenderPassBuilder::new().label("sky-pass");
        assert_eq!(builder.label, Some("sky-pass"));
    }
}
