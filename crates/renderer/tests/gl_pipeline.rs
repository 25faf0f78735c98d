//! End-to-end checks against a real OpenGL 4.1 core context.
//!
//! Winit allows one event loop per process, so every scenario runs inside a
//! single test. Run with `cargo test -p renderer -- --ignored` on a machine
//! with a display.

#![allow(unsafe_code)]

use anyhow::{bail, ensure, Context as _, Result};
use glow::HasContext as _;
use renderer::{
    link_program, validate_program, CompileError, GlWindow, LinkError, RendererConfig, Scene,
    ShaderSources, ShaderStage,
};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::WindowId;

const WIDTH: i32 = 64;
const HEIGHT: i32 = 48;

const VERTEX: &str = "#version 410 core
layout(location = 0) in vec3 vp;
void main() {
    gl_Position = vec4(vp, 1.0);
}
";

const VERTEX_MISSING_SEMICOLON: &str = "#version 410 core
layout(location = 0) in vec3 vp;
void main() {
    gl_Position = vec4(vp, 1.0)
}
";

// Compiles on its own; linking fails because the stage has no entry point.
const VERTEX_WITHOUT_MAIN: &str = "#version 410 core
layout(location = 0) in vec3 vp;
vec4 place(vec3 p) {
    return vec4(p, 1.0);
}
";

const CONSTANT_MAGENTA: &str = "#version 410 core
out vec4 frag_colour;
void main() {
    frag_colour = vec4(1.0, 0.0, 1.0, 1.0);
}
";

const RESOLUTION_AS_COLOUR: &str = "#version 410 core
uniform vec2 res;
out vec4 frag_colour;
void main() {
    frag_colour = vec4(res.x / 255.0, res.y / 255.0, 0.0, 1.0);
}
";

struct Harness {
    config: RendererConfig,
    outcome: Option<Result<()>>,
}

impl ApplicationHandler for Harness {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.outcome.is_none() {
            self.outcome = Some(run_scenarios(event_loop, &self.config));
        }
        event_loop.exit();
    }

    fn window_event(&mut self, _: &ActiveEventLoop, _: WindowId, _: WindowEvent) {}
}

fn run_scenarios(event_loop: &ActiveEventLoop, config: &RendererConfig) -> Result<()> {
    let window = GlWindow::new(event_loop, config)?;
    let gl = window.gl();
    let target = unsafe { Offscreen::new(gl) }?;

    malformed_vertex_shader_fails_to_link(gl)?;
    stage_without_main_is_a_link_error(gl)?;

    let mut constant = Scene::build(gl, &ShaderSources::new(VERTEX, CONSTANT_MAGENTA), config)?;
    ensure!(constant.geometry().triangle_count() == 2, "quad should be two triangles");
    constant.draw();
    let first = unsafe { target.read(gl) };
    ensure!(
        first.chunks_exact(4).all(|px| px == [255, 0, 255, 255]),
        "constant shader left pixels that are not magenta"
    );
    constant.draw();
    let second = unsafe { target.read(gl) };
    ensure!(first == second, "redrawing unchanged state changed the framebuffer");
    ensure!(
        validate_program(gl, constant.program()),
        "linked program failed validation with its quad bound"
    );
    constant.close();

    let mut resolution =
        Scene::build(gl, &ShaderSources::new(VERTEX, RESOLUTION_AS_COLOUR), config)?;
    resolution.draw();
    let pixels = unsafe { target.read(gl) };
    ensure!(
        pixels.chunks_exact(4).all(|px| px == [64, 48, 0, 255]),
        "resolution uniform did not reach the fragment shader: {:?}",
        &pixels[..4]
    );
    resolution.close();

    unsafe { target.release(gl) };
    Ok(())
}

fn malformed_vertex_shader_fails_to_link(gl: &std::sync::Arc<glow::Context>) -> Result<()> {
    match link_program(gl, VERTEX_MISSING_SEMICOLON, CONSTANT_MAGENTA) {
        Ok(_) => bail!("malformed vertex shader linked"),
        Err(LinkError::Compile(CompileError::Rejected {
            stage,
            source_text,
            log,
        })) => {
            ensure!(stage == ShaderStage::Vertex, "wrong stage blamed: {stage}");
            ensure!(source_text == VERTEX_MISSING_SEMICOLON, "source not preserved");
            ensure!(!log.is_empty(), "empty compile log");
            Ok(())
        }
        Err(other) => Err(other).context("unexpected link failure"),
    }
}

fn stage_without_main_is_a_link_error(gl: &std::sync::Arc<glow::Context>) -> Result<()> {
    match link_program(gl, VERTEX_WITHOUT_MAIN, CONSTANT_MAGENTA) {
        Ok(_) => bail!("vertex stage without main linked"),
        Err(LinkError::Link { log }) => {
            ensure!(!log.trim().is_empty(), "empty link log");
            Ok(())
        }
        Err(other) => Err(other).context("expected a link failure"),
    }
}

/// Colour renderbuffer bound as the draw target so results do not depend on
/// the visibility of the window.
struct Offscreen {
    framebuffer: glow::Framebuffer,
    renderbuffer: glow::Renderbuffer,
}

impl Offscreen {
    unsafe fn new(gl: &glow::Context) -> Result<Self> {
        let renderbuffer = gl.create_renderbuffer().map_err(anyhow::Error::msg)?;
        gl.bind_renderbuffer(glow::RENDERBUFFER, Some(renderbuffer));
        gl.renderbuffer_storage(glow::RENDERBUFFER, glow::RGBA8, WIDTH, HEIGHT);

        let framebuffer = gl.create_framebuffer().map_err(anyhow::Error::msg)?;
        gl.bind_framebuffer(glow::FRAMEBUFFER, Some(framebuffer));
        gl.framebuffer_renderbuffer(
            glow::FRAMEBUFFER,
            glow::COLOR_ATTACHMENT0,
            glow::RENDERBUFFER,
            Some(renderbuffer),
        );
        ensure!(
            gl.check_framebuffer_status(glow::FRAMEBUFFER) == glow::FRAMEBUFFER_COMPLETE,
            "offscreen framebuffer incomplete"
        );
        gl.viewport(0, 0, WIDTH, HEIGHT);
        Ok(Self {
            framebuffer,
            renderbuffer,
        })
    }

    unsafe fn read(&self, gl: &glow::Context) -> Vec<u8> {
        let mut pixels = vec![0u8; (WIDTH * HEIGHT * 4) as usize];
        gl.read_pixels(
            0,
            0,
            WIDTH,
            HEIGHT,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            glow::PixelPackData::Slice(Some(&mut pixels)),
        );
        pixels
    }

    unsafe fn release(self, gl: &glow::Context) {
        gl.bind_framebuffer(glow::FRAMEBUFFER, None);
        gl.delete_framebuffer(self.framebuffer);
        gl.delete_renderbuffer(self.renderbuffer);
    }
}

fn build_event_loop() -> Result<EventLoop<()>> {
    let mut builder = EventLoop::builder();
    #[cfg(target_os = "linux")]
    {
        use winit::platform::wayland::EventLoopBuilderExtWayland;
        use winit::platform::x11::EventLoopBuilderExtX11;
        EventLoopBuilderExtWayland::with_any_thread(&mut builder, true);
        EventLoopBuilderExtX11::with_any_thread(&mut builder, true);
    }
    Ok(builder.build()?)
}

#[test]
#[ignore = "needs a display and an OpenGL 4.1 core driver"]
fn shader_pipeline_renders_into_a_real_context() {
    let mut harness = Harness {
        config: RendererConfig {
            surface_size: (WIDTH as u32, HEIGHT as u32),
            window_title: "mandelgl test".to_string(),
            visible: false,
            ..RendererConfig::default()
        },
        outcome: None,
    };

    let event_loop = build_event_loop().expect("event loop");
    event_loop.run_app(&mut harness).expect("event loop run");

    match harness.outcome {
        Some(Ok(())) => {}
        Some(Err(err)) => panic!("{err:#}"),
        None => panic!("event loop exited before the window was created"),
    }
}
