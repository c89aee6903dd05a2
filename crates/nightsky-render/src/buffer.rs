//! Growable GPU buffers and the vertex layouts of the sky primitives.

use bytemuck::Pod;
use nightsky_sky::{BandVertex, LineVertex, SpriteInstance};
use std::marker::PhantomData;

/// A vertex buffer that is rewritten in place and reallocated only when
/// the data outgrows it.
pub struct DynamicBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
    label: &'static str,
    _marker: PhantomData<T>,
}

/// Capacity in elements after growing `current` to hold `needed`.
pub fn grown_capacity(current: usize, needed: usize) -> usize {
    if needed <= current {
        current
    } else {
        needed.next_power_of_two().max(1)
    }
}

impl<T: Pod> DynamicBuffer<T> {
    pub fn new(device: &wgpu::Device, label: &'static str, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buffer: Self::allocate(device, label, capacity),
            capacity,
            len: 0,
            label,
            _marker: PhantomData,
        }
    }

    fn allocate(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: (capacity * std::mem::size_of::<T>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    /// Replace the contents with `data`, growing the allocation if needed.
    pub fn write(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[T]) {
        let capacity = grown_capacity(self.capacity, data.len());
        if capacity != self.capacity {
            log::debug!(
                "Growing {} from {} to {} elements",
                self.label,
                self.capacity,
                capacity
            );
            self.buffer = Self::allocate(device, self.label, capacity);
            self.capacity = capacity;
        }
        if !data.is_empty() {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(data));
        }
        self.len = data.len();
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slice covering the written elements, or `None` when nothing is written.
    pub fn slice(&self) -> Option<wgpu::BufferSlice<'_>> {
        if self.len == 0 {
            return None;
        }
        let bytes = (self.len * std::mem::size_of::<T>()) as wgpu::BufferAddress;
        Some(self.buffer.slice(..bytes))
    }
}

const SPRITE_INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32, 2 => Float32x3];
const ALPHA_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![3 => Float32];
const LINE_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];
const BAND_VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];

/// Per-instance sprite records (slot 0 of the sprite pipeline).
pub fn sprite_instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<SpriteInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &SPRITE_INSTANCE_ATTRIBUTES,
    }
}

/// Per-instance alpha stream (slot 1 of the sprite pipeline).
pub fn alpha_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<f32>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ALPHA_ATTRIBUTES,
    }
}

pub fn line_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_VERTEX_ATTRIBUTES,
    }
}

pub fn band_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<BandVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &BAND_VERTEX_ATTRIBUTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grown_capacity() {
        assert_eq!(grown_capacity(16, 10), 16);
        assert_eq!(grown_capacity(16, 16), 16);
        assert_eq!(grown_capacity(16, 17), 32);
        assert_eq!(grown_capacity(1, 5000), 8192);
        assert_eq!(grown_capacity(1, 0), 1);
    }

    #[test]
    fn test_sprite_instance_layout() {
        let layout = sprite_instance_layout();
        // position (f32×3) + size (f32) + color (f32×3) = 28 bytes
        assert_eq!(layout.array_stride, 28);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        let offsets: Vec<u64> = layout.attributes.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, [0, 12, 16]);
    }

    #[test]
    fn test_alpha_layout_follows_sprite_locations() {
        let layout = alpha_layout();
        assert_eq!(layout.array_stride, 4);
        assert_eq!(layout.attributes[0].shader_location, 3);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
    }

    #[test]
    fn test_line_vertex_layout() {
        let layout = line_vertex_layout();
        // position (f32×3) + color (f32×4) = 28 bytes
        assert_eq!(layout.array_stride, 28);
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x4);
    }

    #[test]
    fn test_band_vertex_layout() {
        let layout = band_vertex_layout();
        assert_eq!(layout.array_stride, 20);
        assert_eq!(layout.attributes[1].format, wgpu::VertexFormat::Float32x2);
    }
}
