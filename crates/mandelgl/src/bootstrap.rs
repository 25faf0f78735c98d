use anyhow::{Context, Result};
use renderer::RendererConfig;
use viewconfig::ViewConfig;

use crate::cli::RunArgs;

/// Loads the optional config file and layers command-line overrides on top.
pub fn resolve_view_config(args: &RunArgs) -> Result<ViewConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => ViewConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ViewConfig::default(),
    };

    if let Some((width, height)) = args.size {
        config.window.width = width;
        config.window.height = height;
    }
    if let Some(fps) = args.fps {
        config.render.fps = Some(fps);
        config.render.frame_interval = None;
    }
    if let Some(title) = &args.title {
        config.window.title = title.clone();
    }
    if let Some(vertex) = &args.vertex {
        config.shaders.vertex = vertex.clone();
    }
    if let Some(fragment) = &args.fragment {
        config.shaders.fragment = fragment.clone();
    }
    if let Some(uniform) = &args.uniform {
        config.render.resolution_uniform = uniform.clone();
    }

    config
        .validate()
        .context("invalid configuration after applying command-line overrides")?;
    Ok(config)
}

pub fn renderer_config(view: &ViewConfig) -> RendererConfig {
    RendererConfig {
        surface_size: view.surface_size(),
        target_fps: view.target_fps(),
        window_title: view.window.title.clone(),
        vertex_shader: view.shaders.vertex.clone(),
        fragment_shader: view.shaders.fragment.clone(),
        resolution_uniform: view.render.resolution_uniform.clone(),
        ..RendererConfig::default()
    }
}
