//! OpenGL resources behind the frame loop.
//!
//! - `context` opens the window and makes a core-profile GL context current
//!   through glutin, then loads function pointers into a `glow::Context`.
//! - `handles` wraps raw GL object names in owning types that delete the
//!   object on drop.
//! - `geometry` validates and uploads the static vertex positions and
//!   describes their layout to a VAO.
//! - `uniforms` writes the resolution `vec2` and reports lookup misses once.
//! - `state` glues program, geometry, and uniform into the `Scene` drawn each
//!   frame.

mod context;
mod geometry;
mod handles;
mod state;
mod uniforms;

pub use context::{ContextError, GlWindow};
pub use geometry::{
    vertex_count, Geometry, GeometryError, COMPONENTS_PER_VERTEX, FULLSCREEN_QUAD, TRIANGLE,
};
pub use handles::{
    BufferObject, GlHandle, GlResource, OwnedBuffer, OwnedProgram, OwnedShader, OwnedVertexArray,
    ProgramObject, ShaderObject, VertexArrayObject,
};
pub use state::Scene;
