#![allow(unsafe_code)]

use std::ffi::CString;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use glow::HasContext as _;
use glutin::config::{Config, ConfigTemplateBuilder, GlConfig};
use glutin::context::{
    ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext, PossiblyCurrentContext,
    Version,
};
use glutin::display::{GetGlDisplay, GlDisplay};
use glutin::surface::{GlSurface, Surface, WindowSurface};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use winit::dpi::PhysicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::raw_window_handle::{HandleError, HasWindowHandle};
use winit::window::{Window, WindowId};

use crate::types::RendererConfig;

#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("failed to create window or pick a GL config: {0}")]
    Display(String),
    #[error("no OpenGL config with the requested attributes is available")]
    NoMatchingConfig,
    #[error("windowing system returned no window")]
    MissingWindow,
    #[error("failed to acquire window handle: {0}")]
    WindowHandle(#[from] HandleError),
    #[error("OpenGL error: {0}")]
    Glutin(#[from] glutin::error::Error),
}

/// Window, surface, and current GL context bundled together.
///
/// Field order is drop order: the loader goes first, then the surface and
/// context, and the window itself last.
pub struct GlWindow {
    gl: Arc<glow::Context>,
    gl_surface: Surface<WindowSurface>,
    gl_context: PossiblyCurrentContext,
    window: Window,
}

impl GlWindow {
    /// Opens the fixed-size, non-resizable window and makes a core-profile
    /// context current on the calling thread.
    ///
    /// The size is in physical pixels so the framebuffer matches
    /// `surface_size` on scaled outputs too.
    pub fn new(event_loop: &ActiveEventLoop, config: &RendererConfig) -> Result<Self, ContextError> {
        let (width, height) = config.surface_size;
        let attributes = Window::default_attributes()
            .with_title(config.window_title.as_str())
            .with_inner_size(PhysicalSize::new(width, height))
            .with_resizable(false)
            .with_visible(config.visible);

        let template = ConfigTemplateBuilder::new().with_depth_size(24);
        let (window, gl_config) = catch_empty_config(|| {
            DisplayBuilder::new()
                .with_window_attributes(Some(attributes))
                .build(event_loop, template, pick_config)
        })?
        .map_err(|err| ContextError::Display(err.to_string()))?;
        let window = window.ok_or(ContextError::MissingWindow)?;

        let raw_window_handle = window.window_handle()?.as_raw();
        let version = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                version.major,
                version.minor,
            ))))
            .build(Some(raw_window_handle));

        let gl_display = gl_config.display();
        let not_current = unsafe { gl_display.create_context(&gl_config, &context_attributes)? };

        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let gl_surface = unsafe { gl_display.create_window_surface(&gl_config, &surface_attributes)? };
        let gl_context = not_current.make_current(&gl_surface)?;

        let gl = unsafe {
            glow::Context::from_loader_function(|symbol| match CString::new(symbol) {
                Ok(symbol) => gl_display.get_proc_address(&symbol),
                Err(_) => std::ptr::null(),
            })
        };

        let gl_version = unsafe { gl.get_parameter_string(glow::VERSION) };
        tracing::info!(
            requested = %version,
            version = %gl_version,
            samples = gl_config.num_samples(),
            "OpenGL context ready"
        );

        Ok(Self {
            gl: Arc::new(gl),
            gl_surface,
            gl_context,
            window,
        })
    }

    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    pub fn id(&self) -> WindowId {
        self.window.id()
    }

    /// Swaps the back buffer onto the window.
    pub fn present(&self) -> Result<(), ContextError> {
        self.gl_surface.swap_buffers(&self.gl_context)?;
        Ok(())
    }
}

/// Unwind payload used to leave [`pick_config`], whose signature cannot
/// report an empty config list.
struct NoMatchingConfig;

/// Prefers configs with a depth buffer, then fewer samples.
///
/// EGL may hand over an empty list; that unwinds to [`catch_empty_config`].
fn pick_config(configs: Box<dyn Iterator<Item = Config> + '_>) -> Config {
    configs
        .reduce(|best, candidate| {
            let better_depth = candidate.depth_size() > best.depth_size();
            let same_depth_fewer_samples = candidate.depth_size() == best.depth_size()
                && candidate.num_samples() < best.num_samples();
            if better_depth || same_depth_fewer_samples {
                candidate
            } else {
                best
            }
        })
        .unwrap_or_else(|| no_matching_config())
}

/// `resume_unwind` skips the panic hook, so nothing is printed.
fn no_matching_config() -> ! {
    panic::resume_unwind(Box::new(NoMatchingConfig))
}

/// Runs `build` and maps an unwind from [`no_matching_config`] to
/// [`ContextError::NoMatchingConfig`]. Any other panic keeps unwinding.
fn catch_empty_config<T>(build: impl FnOnce() -> T) -> Result<T, ContextError> {
    panic::catch_unwind(AssertUnwindSafe(build)).map_err(|payload| {
        if payload.is::<NoMatchingConfig>() {
            ContextError::NoMatchingConfig
        } else {
            panic::resume_unwind(payload)
        }
    })
}
