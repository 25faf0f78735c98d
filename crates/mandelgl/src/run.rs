use anyhow::Result;
use renderer::Renderer;
use tracing_subscriber::EnvFilter;

use crate::bootstrap::{renderer_config, resolve_view_config};
use crate::cli::RunArgs;

pub fn run(args: RunArgs) -> Result<()> {
    let view = resolve_view_config(&args)?;

    if args.print_config {
        print!("{}", view.to_toml_string()?);
        return Ok(());
    }

    let config = renderer_config(&view);
    tracing::debug!(
        vertex = %config.vertex_shader.display(),
        fragment = %config.fragment_shader.display(),
        uniform = %config.resolution_uniform,
        fps = config.target_fps,
        "resolved renderer configuration"
    );

    let mut renderer = Renderer::new(config);
    renderer.run()
}

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
