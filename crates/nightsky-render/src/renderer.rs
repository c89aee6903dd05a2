//! [`SkyRenderer`]: the wgpu implementation of [`SkyBackend`].

use nightsky_sky::{
    BandVertex, FrameView, LineVertex, SkyBackend, SpriteInstance, StaticView,
};

use crate::buffer::DynamicBuffer;
use crate::camera::SkyCamera;
use crate::gpu::{RenderContext, SurfaceError};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{BandPipeline, CameraBinding, LinePipeline, SpritePipeline};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface acquisition failed: {0}")]
    Surface(#[from] SurfaceError),
}

/// Instance and alpha streams for one sprite layer.
struct SpriteLayer {
    instances: DynamicBuffer<SpriteInstance>,
    alphas: DynamicBuffer<f32>,
}

impl SpriteLayer {
    fn new(device: &wgpu::Device, name: &'static str, alpha_name: &'static str) -> Self {
        Self {
            instances: DynamicBuffer::new(device, name, 64),
            alphas: DynamicBuffer::new(device, alpha_name, 64),
        }
    }

    fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[SpriteInstance],
        alphas: &[f32],
    ) {
        self.instances.write(device, queue, instances);
        self.alphas.write(device, queue, alphas);
    }

    fn draw<'a>(
        &'a self,
        pass: &mut wgpu::RenderPass<'a>,
        pipeline: &'a SpritePipeline,
        camera: &'a CameraBinding,
    ) {
        let count = self.instances.len().min(self.alphas.len());
        if let (Some(instances), Some(alphas)) = (self.instances.slice(), self.alphas.slice()) {
            pipeline.draw(pass, camera, instances, alphas, count as u32);
        }
    }
}

/// Draws a [`nightsky_sky::Scene`] into a window surface.
///
/// Owns the GPU context and every buffer and pipeline; dropping it releases them.
pub struct SkyRenderer {
    context: RenderContext,
    camera: CameraBinding,
    sprite_pipeline: SpritePipeline,
    line_pipeline: LinePipeline,
    band_pipeline: BandPipeline,
    band_quad: DynamicBuffer<BandVertex>,
    lines: DynamicBuffer<LineVertex>,
    stars: SpriteLayer,
    constellation_stars: SpriteLayer,
    motes: SpriteLayer,
    shooting_stars: SpriteLayer,
    pass_builder: RenderPassBuilder,
}

impl SkyRenderer {
    pub fn new(context: RenderContext) -> Self {
        let device = &context.device;
        let format = context.surface_format;
        let camera = CameraBinding::new(device);
        Self {
            sprite_pipeline: SpritePipeline::new(device, &camera, format),
            line_pipeline: LinePipeline::new(device, &camera, format),
            band_pipeline: BandPipeline::new(device, &camera, format),
            band_quad: DynamicBuffer::new(device, "band-quad", 6),
            lines: DynamicBuffer::new(device, "constellation-lines", 128),
            stars: SpriteLayer::new(device, "star-instances", "star-alphas"),
            constellation_stars: SpriteLayer::new(
                device,
                "constellation-star-instances",
                "constellation-star-alphas",
            ),
            motes: SpriteLayer::new(device, "mote-instances", "mote-alphas"),
            shooting_stars: SpriteLayer::new(
                device,
                "shooting-star-instances",
                "shooting-star-alphas",
            ),
            pass_builder: RenderPassBuilder::new().label("sky-pass"),
            camera,
            context,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }
}

impl SkyBackend for SkyRenderer {
    type Error = RenderError;

    fn upload_static(&mut self, view: &StaticView<'_>) {
        let device = &self.context.device;
        let queue = &self.context.queue;
        // Star alphas are rewritten every frame; only the instances are static.
        self.stars.instances.write(device, queue, view.star_instances);
        self.constellation_stars.write(
            device,
            queue,
            view.constellation_instances,
            view.constellation_alphas,
        );
        self.lines.write(device, queue, view.line_vertices);
        self.band_quad.write(device, queue, view.band_quad);
        log::debug!(
            "Uploaded static sky data: {} stars, {} constellation stars, {} line vertices",
            view.star_instances.len(),
            view.constellation_instances.len(),
            view.line_vertices.len()
        );
    }

    fn submit(&mut self, frame: &FrameView<'_>) -> Result<(), RenderError> {
        let device = &self.context.device;
        let queue = &self.context.queue;

        self.camera
            .update(queue, &SkyCamera::from_pose(&frame.camera).to_uniform());
        self.band_pipeline.update(queue, &frame.band);
        self.stars.alphas.write(device, queue, frame.star_alphas);
        self.motes
            .write(device, queue, frame.mote_instances, frame.mote_alphas);
        self.shooting_stars.write(
            device,
            queue,
            frame.shooting_instances,
            frame.shooting_alphas,
        );

        let texture = match self.context.get_current_texture() {
            Ok(texture) => texture,
            Err(SurfaceError::Timeout) => {
                log::debug!("Surface acquisition timed out, skipping frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let mut encoder = FrameEncoder::new(device, queue, texture);
        {
            let mut pass = encoder.begin_render_pass(&self.pass_builder);
            if let Some(quad) = self.band_quad.slice() {
                self.band_pipeline
                    .draw(&mut pass, &self.camera, quad, self.band_quad.len() as u32);
            }
            self.stars
                .draw(&mut pass, &self.sprite_pipeline, &self.camera);
            if let Some(lines) = self.lines.slice() {
                self.line_pipeline
                    .draw(&mut pass, &self.camera, lines, self.lines.len() as u32);
            }
            self.constellation_stars
                .draw(&mut pass, &self.sprite_pipeline, &self.camera);
            self.motes
                .draw(&mut pass, &self.sprite_pipeline, &self.camera);
            self.shooting_stars
                .draw(&mut pass, &self.sprite_pipeline, &self.camera);
        }
        encoder.submit();
        Ok(())
    }
}
