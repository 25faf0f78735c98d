#![allow(unsafe_code)]

use std::fmt;
use std::sync::Arc;

use glow::HasContext as _;

use crate::gpu::{OwnedProgram, OwnedShader};

/// Programmable pipeline stage a shader object is compiled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("failed to create {stage} shader object: {reason}")]
    Create { stage: ShaderStage, reason: String },
    /// The driver rejected the source; the message carries the full listing.
    #[error("failed to compile {stage} shader: {log}\n--- {stage} shader source ---\n{source_text}")]
    Rejected {
        stage: ShaderStage,
        source_text: String,
        log: String,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error("failed to create program object: {0}")]
    Create(String),
    #[error("failed to link shader program: {log}")]
    Link { log: String },
}

/// Compiles a single stage.
///
/// On failure the half-built shader object is released before returning.
pub fn compile_shader(
    gl: &Arc<glow::Context>,
    stage: ShaderStage,
    source: &str,
) -> Result<OwnedShader, CompileError> {
    let raw = unsafe { gl.create_shader(stage.gl_enum()) }
        .map_err(|reason| CompileError::Create { stage, reason })?;
    let shader = OwnedShader::new(gl.clone(), raw);

    unsafe {
        gl.shader_source(raw, source);
        gl.compile_shader(raw);
    }

    if unsafe { gl.get_shader_compile_status(raw) } {
        tracing::debug!(%stage, "compiled shader");
        Ok(shader)
    } else {
        let log = normalise_info_log(unsafe { gl.get_shader_info_log(raw) });
        Err(CompileError::Rejected {
            stage,
            source_text: source.to_string(),
            log,
        })
    }
}

/// Compiles both stages and links them into a program.
///
/// Shader objects are detached and released once linking has been attempted;
/// only the program outlives this call. A linked program is also validated,
/// which can only produce a warning.
pub fn link_program(
    gl: &Arc<glow::Context>,
    vertex_source: &str,
    fragment_source: &str,
) -> Result<OwnedProgram, LinkError> {
    let vertex = compile_shader(gl, ShaderStage::Vertex, vertex_source)?;
    let fragment = compile_shader(gl, ShaderStage::Fragment, fragment_source)?;

    let raw = unsafe { gl.create_program() }.map_err(LinkError::Create)?;
    let program = OwnedProgram::new(gl.clone(), raw);
    let stages = [vertex, fragment];

    unsafe {
        for shader in &stages {
            gl.attach_shader(raw, shader.raw());
        }
        gl.link_program(raw);
        for shader in &stages {
            gl.detach_shader(raw, shader.raw());
        }
    }
    drop(stages);

    if !unsafe { gl.get_program_link_status(raw) } {
        let log = normalise_info_log(unsafe { gl.get_program_info_log(raw) });
        return Err(LinkError::Link { log });
    }
    tracing::debug!("linked shader program");
    validate_program(gl, &program);
    Ok(program)
}

/// Asks the driver whether `program` can run against the current GL state.
///
/// Only diagnostic: a failed validation is logged and the program is kept.
pub fn validate_program(gl: &glow::Context, program: &OwnedProgram) -> bool {
    let raw = program.raw();
    let valid = unsafe {
        gl.validate_program(raw);
        gl.get_program_validate_status(raw)
    };
    if !valid {
        let log = normalise_info_log(unsafe { gl.get_program_info_log(raw) });
        tracing::warn!(%log, "shader program failed validation; continuing");
    }
    valid
}

/// Strips the trailing NULs and whitespace some drivers leave in info logs.
///
/// An empty log is replaced with a placeholder so failures always carry text.
pub(crate) fn normalise_info_log(raw: String) -> String {
    let trimmed = raw.trim_end_matches(|ch: char| ch == '\0' || ch.is_whitespace());
    if trimmed.trim().is_empty() {
        "(driver returned an empty info log)".to_string()
    } else {
        trimmed.to_string()
    }
}
