use std::path::PathBuf;

/// OpenGL context version requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}

impl GlVersion {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }
}

impl Default for GlVersion {
    /// 4.1 core is the newest profile macOS still exposes.
    fn default() -> Self {
        Self::new(4, 1)
    }
}

impl std::fmt::Display for GlVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{} core", self.major, self.minor)
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` replaces what used to be process-wide constants: window
/// geometry, pacing, shader locations, and the name of the `vec2` uniform the
/// fragment shader reads the surface resolution from.
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Fixed window size; also the value written to the resolution uniform.
    pub surface_size: (u32, u32),
    /// Frames per second the loop is paced to.
    pub target_fps: f32,
    /// Title shown in the window decoration.
    pub window_title: String,
    /// Vertex stage source file.
    pub vertex_shader: PathBuf,
    /// Fragment stage source file.
    pub fragment_shader: PathBuf,
    /// Name of the `uniform vec2` receiving `surface_size`.
    pub resolution_uniform: String,
    /// Context version requested from the windowing system.
    pub gl_version: GlVersion,
    /// Show the window as soon as it is created.
    pub visible: bool,
}

impl RendererConfig {
    /// Resolution as written into the shader uniform.
    pub fn resolution(&self) -> (f32, f32) {
        (self.surface_size.0 as f32, self.surface_size.1 as f32)
    }
}

impl Default for RendererConfig {
    /// The stock 1080p Mandelbrot window paced at 4 FPS.
    fn default() -> Self {
        Self {
            surface_size: (1920, 1080),
            target_fps: 4.0,
            window_title: "Wisward's Mandelbrot Set".to_string(),
            vertex_shader: PathBuf::from("shaders/vertexShaderSource.glsl"),
            fragment_shader: PathBuf::from("shaders/fragmentShaderSource.glsl"),
            resolution_uniform: "res".to_string(),
            gl_version: GlVersion::default(),
            visible: true,
        }
    }
}
