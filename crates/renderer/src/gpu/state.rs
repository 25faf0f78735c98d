#![allow(unsafe_code)]

use std::sync::Arc;

use anyhow::{Context as _, Result};
use glow::HasContext as _;

use crate::compile::link_program;
use crate::gpu::geometry::{Geometry, FULLSCREEN_QUAD};
use crate::gpu::uniforms::ResolutionUniform;
use crate::gpu::OwnedProgram;
use crate::source::ShaderSources;
use crate::types::RendererConfig;

/// Everything a frame needs: the linked program, the quad, and the
/// resolution uniform. Built once; nothing here is recreated per frame.
#[derive(Debug)]
pub struct Scene {
    gl: Arc<glow::Context>,
    program: OwnedProgram,
    geometry: Geometry,
    resolution: ResolutionUniform,
}

impl Scene {
    /// Links the program and uploads the full-screen quad.
    pub fn build(
        gl: &Arc<glow::Context>,
        sources: &ShaderSources,
        config: &RendererConfig,
    ) -> Result<Self> {
        let program = link_program(gl, &sources.vertex, &sources.fragment)
            .context("failed to build shader program")?;
        let geometry =
            Geometry::upload(gl, &FULLSCREEN_QUAD).context("failed to upload quad geometry")?;
        Ok(Self::new(
            gl.clone(),
            program,
            geometry,
            ResolutionUniform::new(config.resolution_uniform.clone(), config.resolution()),
        ))
    }

    pub(crate) fn new(
        gl: Arc<glow::Context>,
        program: OwnedProgram,
        geometry: Geometry,
        resolution: ResolutionUniform,
    ) -> Self {
        Self {
            gl,
            program,
            geometry,
            resolution,
        }
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn program(&self) -> &OwnedProgram {
        &self.program
    }

    /// Issues one frame into the current draw framebuffer.
    ///
    /// Clears color and depth, binds the program, writes the resolution
    /// uniform, and draws every vertex of the quad as triangles. Presenting
    /// the frame is left to the caller.
    pub fn draw(&mut self) {
        let gl = self.gl.as_ref();
        let program = self.program.raw();
        unsafe {
            gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
            gl.use_program(Some(program));
        }
        self.resolution.apply(gl, program);
        self.geometry.bind(gl);
        unsafe {
            gl.draw_arrays(glow::TRIANGLES, 0, self.geometry.vertex_count() as i32);
        }
    }

    /// Tears the scene down while the context is still current.
    pub fn close(self) {
        let Self {
            gl,
            program,
            geometry,
            resolution,
        } = self;
        unsafe {
            gl.use_program(None);
            gl.bind_vertex_array(None);
        }
        program.close();
        drop(geometry);
        tracing::debug!(uniform = resolution.name(), "released scene resources");
    }
}
