//! Mesh data structures: strip batching and GPU buffers.

use crate::error::RenderError;
use crate::vertex::Vertex;
use procgen::Strip;
use wgpu::util::DeviceExt;

/// A GPU mesh with vertex and index buffers.
pub struct Mesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_vertices: u32,
    pub num_indices: u32,
}

impl Mesh {
    /// Create a static mesh from vertex and index data.
    pub fn new(device: &wgpu::Device, vertices: &[Vertex], indices: &[u32], label: &str) -> Self {
        Self::with_usage(device, vertices, indices, wgpu::BufferUsages::VERTEX, label)
    }

    /// Create a mesh whose vertices are rewritten every frame. The index buffer
    /// is fixed, so later uploads must keep the same vertex count.
    pub fn dynamic(device: &wgpu::Device, data: &MeshData, label: &str) -> Self {
        Self::with_usage(
            device,
            &data.vertices,
            &data.indices,
            wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            label,
        )
    }

    fn with_usage(
        device: &wgpu::Device,
        vertices: &[Vertex],
        indices: &[u32],
        vertex_usage: wgpu::BufferUsages,
        label: &str,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            contents: bytemuck::cast_slice(vertices),
            usage: vertex_usage,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            contents: bytemuck::cast_slice(indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_vertices: vertices.len() as u32,
            num_indices: indices.len() as u32,
        }
    }

    /// Overwrite the vertices of a dynamic mesh.
    pub fn write_vertices(&self, queue: &wgpu::Queue, vertices: &[Vertex]) -> Result<(), RenderError> {
        if vertices.len() != self.num_vertices as usize {
            return Err(RenderError::VertexCountMismatch {
                expected: self.num_vertices as usize,
                actual: vertices.len(),
            });
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        Ok(())
    }

    /// Bind and draw the whole mesh in an open render pass.
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.num_indices == 0 {
            return;
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.num_indices, 0, 0..1);
    }
}

/// Mesh data before GPU upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Batch strips into one indexed triangle list. Each strip keeps its own
    /// vertex run; triangles alternate winding the way a hardware strip does.
    pub fn from_strips(strips: &[Strip]) -> Self {
        let mut data = Self::new();
        for strip in strips {
            let base = data.vertices.len() as u32;
            data.vertices.extend(strip.vertices.iter().map(Vertex::from));
            data.indices.extend(strip_indices(base, strip.len() as u32));
        }
        data
    }

    /// Vertices only, in the same order `from_strips` lays them out.
    pub fn strip_vertices(strips: &[Strip]) -> Vec<Vertex> {
        strips.iter().flat_map(|s| s.vertices.iter().map(Vertex::from)).collect()
    }

    /// Flat square in the z = `z` plane, facing +Z.
    pub fn floor(half_extent: f32, z: f32) -> Self {
        let h = half_extent;
        let n = [0.0, 0.0, 1.0];
        Self {
            vertices: vec![
                Vertex::new([-h, -h, z], n, [0.0, 0.0]),
                Vertex::new([h, -h, z], n, [1.0, 0.0]),
                Vertex::new([h, h, z], n, [1.0, 1.0]),
                Vertex::new([-h, h, z], n, [0.0, 1.0]),
            ],
            indices: vec![0, 1, 2, 2, 3, 0],
        }
    }

    pub fn upload(&self, device: &wgpu::Device, label: &str) -> Mesh {
        Mesh::new(device, &self.vertices, &self.indices, label)
    }
}

/// Triangle-list indices equivalent to a strip of `len` vertices at `base`.
fn strip_indices(base: u32, len: u32) -> impl Iterator<Item = u32> {
    (0..len.saturating_sub(2)).flat_map(move |k| {
        let i = base + k;
        if k % 2 == 0 {
            [i, i + 1, i + 2]
        } else {
            [i + 1, i, i + 2]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat4;
    use procgen::{tessellate, Resolution, SurfacePatch, SurfaceProfile};

    #[test]
    fn strip_becomes_alternating_triangles() {
        let indices: Vec<u32> = strip_indices(10, 5).collect();
        assert_eq!(indices, vec![10, 11, 12, 12, 11, 13, 12, 13, 14]);
    }

    #[test]
    fn short_strip_has_no_triangles() {
        assert_eq!(strip_indices(0, 2).count(), 0);
        assert_eq!(strip_indices(0, 0).count(), 0);
    }

    #[test]
    fn strips_keep_separate_vertex_runs() {
        let profile = SurfaceProfile::default();
        let strips = tessellate(SurfacePatch::Cap, &profile, Resolution::new(8, 4).unwrap(), &Mat4::IDENTITY);
        let data = MeshData::from_strips(&strips);
        assert_eq!(data.vertices.len(), 8 * 10);
        assert_eq!(data.indices.len(), 8 * 8 * 3);
        assert!(data.indices.iter().all(|&i| (i as usize) < data.vertices.len()));
        // The second strip's first triangle starts at its own base.
        assert_eq!(&data.indices[24..27], &[10, 11, 12]);
        assert_eq!(data.vertices[10], Vertex::from(&strips[1].vertices[0]));
        assert_eq!(MeshData::strip_vertices(&strips), data.vertices);
    }

    #[test]
    fn floor_sits_at_requested_height() {
        let floor = MeshData::floor(20.0, -9.51);
        assert!(floor.vertices.iter().all(|v| v.position[2] == -9.51));
        assert_eq!(floor.indices.len(), 6);
    }
}
