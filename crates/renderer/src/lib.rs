//! OpenGL renderer for the Mandelbrot viewer.
//!
//! The crate opens a fixed-size window with a core-profile context, links the
//! user's vertex/fragment shader pair, uploads a full-screen quad, and redraws
//! it at a fixed rate. All fractal math lives in the fragment shader; the host
//! only feeds it the surface resolution.
//!
//! ```text
//!   mandelgl CLI
//!        │ RendererConfig
//!        ▼
//!   Renderer::run ──▶ ShaderSources::load
//!        │
//!        ▼
//!   run_frame_loop ──▶ GlWindow::new ──▶ Scene::build (link_program + Geometry::upload)
//!        │
//!        └─▶ loop { Scene::draw ─▶ pump events ─▶ present ─▶ FramePacer::wait }
//! ```
//!
//! Everything runs on the calling thread, which must be the main thread on
//! platforms where the windowing system requires it.

mod compile;
mod gpu;
mod runtime;
mod source;
mod types;
mod window;

use anyhow::{Context, Result};

pub use compile::{
    compile_shader, link_program, validate_program, CompileError, LinkError, ShaderStage,
};
pub use gpu::{
    vertex_count, BufferObject, ContextError, Geometry, GeometryError, GlHandle, GlResource,
    GlWindow, OwnedBuffer, OwnedProgram, OwnedShader, OwnedVertexArray, ProgramObject, Scene,
    ShaderObject, VertexArrayObject, COMPONENTS_PER_VERTEX, FULLSCREEN_QUAD, TRIANGLE,
};
pub use runtime::{FramePacer, InvalidFrameRate, LoopState};
pub use source::{ShaderSources, SourceError};
pub use types::{GlVersion, RendererConfig};

/// Entry point that owns the configuration for one rendering session.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Reads both shader files, then renders until the window is closed.
    ///
    /// Returns an error if the sources cannot be read or if the window,
    /// context, program, or geometry cannot be created. No frame is drawn in
    /// any of those cases.
    pub fn run(&mut self) -> Result<()> {
        let sources = ShaderSources::load(&self.config.vertex_shader, &self.config.fragment_shader)
            .context("failed to load shader sources")?;
        tracing::info!(
            width = self.config.surface_size.0,
            height = self.config.surface_size.1,
            title = %self.config.window_title,
            "starting renderer"
        );
        self.run_with_sources(&sources)
    }

    /// Same as [`Renderer::run`] with sources that are already in memory.
    pub fn run_with_sources(&mut self, sources: &ShaderSources) -> Result<()> {
        window::run_frame_loop(&self.config, sources)
    }
}
