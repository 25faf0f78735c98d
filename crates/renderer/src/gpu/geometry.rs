#![allow(unsafe_code)]

use std::sync::Arc;

use glow::HasContext as _;

use crate::gpu::{OwnedBuffer, OwnedVertexArray};

/// Floats per vertex position.
pub const COMPONENTS_PER_VERTEX: usize = 3;
const VERTICES_PER_TRIANGLE: usize = 3;

/// Two triangles covering the whole viewport in clip space.
pub const FULLSCREEN_QUAD: [f32; 18] = [
    -1.0, 1.0, 0.0, //
    -1.0, -1.0, 0.0, //
    1.0, -1.0, 0.0, //
    -1.0, 1.0, 0.0, //
    1.0, 1.0, 0.0, //
    1.0, -1.0, 0.0,
];

/// A single centred triangle, handy for smoke tests.
pub const TRIANGLE: [f32; 9] = [
    -0.5, 0.5, 0.0, //
    -0.5, -0.5, 0.0, //
    0.5, -0.5, 0.0,
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GeometryError {
    #[error("vertex data is empty")]
    Empty,
    #[error("vertex data holds {len} floats, which is not a whole number of xyz positions")]
    Misaligned { len: usize },
    #[error("failed to allocate {what}: {reason}")]
    Allocation { what: &'static str, reason: String },
}

/// Checks that `points` is a non-empty run of packed positions and returns
/// the number of vertices it describes.
pub fn vertex_count(points: &[f32]) -> Result<usize, GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::Empty);
    }
    if points.len() % COMPONENTS_PER_VERTEX != 0 {
        return Err(GeometryError::Misaligned { len: points.len() });
    }
    Ok(points.len() / COMPONENTS_PER_VERTEX)
}

/// Static vertex data resident on the GPU plus the VAO describing it.
#[derive(Debug)]
pub struct Geometry {
    vertex_array: OwnedVertexArray,
    _buffer: OwnedBuffer,
    vertex_count: usize,
}

impl Geometry {
    /// Uploads tightly packed positions as `STATIC_DRAW` data and binds them
    /// to attribute slot 0 as three floats per vertex.
    pub fn upload(gl: &Arc<glow::Context>, points: &[f32]) -> Result<Self, GeometryError> {
        let vertex_count = vertex_count(points)?;

        let buffer = unsafe { gl.create_buffer() }.map_err(|reason| GeometryError::Allocation {
            what: "vertex buffer",
            reason,
        })?;
        let buffer = OwnedBuffer::new(gl.clone(), buffer);

        let vertex_array =
            unsafe { gl.create_vertex_array() }.map_err(|reason| GeometryError::Allocation {
                what: "vertex array",
                reason,
            })?;
        let vertex_array = OwnedVertexArray::new(gl.clone(), vertex_array);

        unsafe {
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer.raw()));
            gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(points),
                glow::STATIC_DRAW,
            );

            gl.bind_vertex_array(Some(vertex_array.raw()));
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(
                0,
                COMPONENTS_PER_VERTEX as i32,
                glow::FLOAT,
                false,
                0,
                0,
            );
            gl.bind_vertex_array(None);
        }

        tracing::debug!(
            vertices = vertex_count,
            bytes = std::mem::size_of_val(points),
            "uploaded static geometry"
        );

        Ok(Self {
            vertex_array,
            _buffer: buffer,
            vertex_count,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    pub fn triangle_count(&self) -> usize {
        self.vertex_count / VERTICES_PER_TRIANGLE
    }

    pub(crate) fn bind(&self, gl: &glow::Context) {
        unsafe { gl.bind_vertex_array(Some(self.vertex_array.raw())) };
    }
}
