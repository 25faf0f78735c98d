#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use glow::HasContext as _;

/// A kind of GL object that can be released through the context.
pub trait GlResource {
    type Raw: Copy + fmt::Debug;
    const KIND: &'static str;

    /// # Safety
    /// `raw` must have been created by `gl` and not deleted yet.
    unsafe fn delete(gl: &glow::Context, raw: Self::Raw);
}

pub enum ShaderObject {}
pub enum ProgramObject {}
pub enum BufferObject {}
pub enum VertexArrayObject {}

impl GlResource for ShaderObject {
    type Raw = glow::Shader;
    const KIND: &'static str = "shader";

    unsafe fn delete(gl: &glow::Context, raw: Self::Raw) {
        gl.delete_shader(raw);
    }
}

impl GlResource for ProgramObject {
    type Raw = glow::Program;
    const KIND: &'static str = "program";

    unsafe fn delete(gl: &glow::Context, raw: Self::Raw) {
        gl.delete_program(raw);
    }
}

impl GlResource for BufferObject {
    type Raw = glow::Buffer;
    const KIND: &'static str = "buffer";

    unsafe fn delete(gl: &glow::Context, raw: Self::Raw) {
        gl.delete_buffer(raw);
    }
}

impl GlResource for VertexArrayObject {
    type Raw = glow::VertexArray;
    const KIND: &'static str = "vertex array";

    unsafe fn delete(gl: &glow::Context, raw: Self::Raw) {
        gl.delete_vertex_array(raw);
    }
}

/// Owning wrapper that deletes the GL object when dropped.
///
/// The context must still be current on the calling thread when the handle
/// drops; every handle lives on the render thread next to its window.
pub struct GlHandle<R: GlResource> {
    gl: Arc<glow::Context>,
    raw: R::Raw,
    _kind: PhantomData<R>,
}

pub type OwnedShader = GlHandle<ShaderObject>;
pub type OwnedProgram = GlHandle<ProgramObject>;
pub type OwnedBuffer = GlHandle<BufferObject>;
pub type OwnedVertexArray = GlHandle<VertexArrayObject>;

impl<R: GlResource> GlHandle<R> {
    pub(crate) fn new(gl: Arc<glow::Context>, raw: R::Raw) -> Self {
        Self {
            gl,
            raw,
            _kind: PhantomData,
        }
    }

    pub fn raw(&self) -> R::Raw {
        self.raw
    }

    /// Releases the object now instead of at scope exit.
    pub fn close(self) {
        drop(self);
    }
}

impl<R: GlResource> Drop for GlHandle<R> {
    fn drop(&mut self) {
        tracing::trace!(kind = R::KIND, raw = ?self.raw, "deleting GL object");
        unsafe { R::delete(&self.gl, self.raw) };
    }
}

impl<R: GlResource> fmt::Debug for GlHandle<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlHandle")
            .field("kind", &R::KIND)
            .field("raw", &self.raw)
            .finish()
    }
}
