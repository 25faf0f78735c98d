use std::time::{Duration, Instant};

use anyhow::{anyhow, Context as _, Result};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::WindowId;

use tracing::{debug, info};

use crate::gpu::{GlWindow, Scene};
use crate::runtime::{FramePacer, LoopState};
use crate::source::ShaderSources;
use crate::types::RendererConfig;

/// Window plus the scene drawn into it.
///
/// The scene is declared first so its GL objects are released while the
/// context is still alive.
struct Session {
    scene: Scene,
    window: GlWindow,
}

impl Session {
    fn bootstrap(
        event_loop: &ActiveEventLoop,
        config: &RendererConfig,
        sources: &ShaderSources,
    ) -> Result<Self> {
        let window =
            GlWindow::new(event_loop, config).context("failed to initialise OpenGL window")?;
        let scene = Scene::build(window.gl(), sources, config)?;
        info!(
            vertices = scene.geometry().vertex_count(),
            triangles = scene.geometry().triangle_count(),
            uniform = %config.resolution_uniform,
            "scene ready"
        );
        Ok(Self { scene, window })
    }

    fn close(self) {
        let Self { scene, window } = self;
        scene.close();
        drop(window);
    }
}

/// Winit-facing half of the frame loop.
///
/// Events only flip state here; drawing, presenting, and pacing happen in
/// [`run_frame_loop`] between pumps so the loop keeps a fixed cadence.
struct FrameLoop<'a> {
    config: &'a RendererConfig,
    sources: &'a ShaderSources,
    session: Option<Session>,
    state: LoopState,
    failure: Option<anyhow::Error>,
}

impl<'a> FrameLoop<'a> {
    fn new(config: &'a RendererConfig, sources: &'a ShaderSources) -> Self {
        Self {
            config,
            sources,
            session: None,
            state: LoopState::Running,
            failure: None,
        }
    }

    fn is_our_window(&self, window_id: WindowId) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.window.id() == window_id)
    }
}

impl ApplicationHandler for FrameLoop<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() || self.state == LoopState::Shutdown {
            return;
        }
        match Session::bootstrap(event_loop, self.config, self.sources) {
            Ok(session) => self.session = Some(session),
            Err(err) => {
                debug!("renderer bootstrap failed before the first frame");
                self.failure = Some(err);
                self.state = LoopState::Shutdown;
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        if !self.is_our_window(window_id) {
            return;
        }
        if matches!(event, WindowEvent::CloseRequested | WindowEvent::Destroyed) {
            info!("close requested; shutting down frame loop");
            self.state = LoopState::Shutdown;
            event_loop.exit();
        }
    }
}

/// Runs bootstrap and the paced render loop on the calling thread until the
/// window closes.
///
/// Each iteration: draw the scene, pump pending window events without
/// blocking, present, then sleep out the rest of the frame budget.
pub(crate) fn run_frame_loop(config: &RendererConfig, sources: &ShaderSources) -> Result<()> {
    let pacer = FramePacer::from_fps(config.target_fps)?;
    let mut event_loop =
        EventLoop::new().map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = FrameLoop::new(config, sources);
    let mut frames: u64 = 0;
    info!(
        fps = config.target_fps,
        interval_ms = pacer.interval().as_millis(),
        "entering frame loop"
    );

    while app.state == LoopState::Running {
        let started = Instant::now();

        let drew = match app.session.as_mut() {
            Some(session) => {
                session.scene.draw();
                true
            }
            None => false,
        };

        // Block briefly while waiting for the window; never block once drawing.
        let timeout = if drew {
            Duration::ZERO
        } else {
            pacer.interval()
        };
        let status = event_loop.pump_app_events(Some(timeout), &mut app);
        if let Some(err) = app.failure.take() {
            return Err(err);
        }
        if let PumpStatus::Exit(code) = status {
            debug!(code, "event loop exited");
            app.state = LoopState::Shutdown;
        }
        if app.state == LoopState::Shutdown {
            break;
        }

        if drew {
            if let Some(session) = app.session.as_ref() {
                session
                    .window
                    .present()
                    .context("failed to present frame")?;
                frames += 1;
            }
            pacer.wait(started);
        }
    }

    if let Some(session) = app.session.take() {
        session.close();
    }
    info!(frames, "frame loop finished");
    Ok(())
}
