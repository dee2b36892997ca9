//! Rally Viewer - native entry point
//!
//! Loads a catalog directory and the explorer config, then opens the viewer.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    native::main()
}

// The web build starts from the library's wasm entry point
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use anyhow::{Context, Result};
    use clap::Parser;
    use rally_core::{BikeCatalog, ExplorerConfig};
    use rally_viewer::ViewerOptions;
    use std::path::PathBuf;
    use tracing::{info, Level};
    use tracing_subscriber::FmtSubscriber;

    #[derive(Parser, Debug)]
    #[command(name = "rally-viewer")]
    #[command(about = "Exploded-diagram parts explorer")]
    #[command(version)]
    struct Args {
        /// Catalog directory holding diagram.json and optional bike/parts/mappings files
        #[arg(short, long)]
        data: PathBuf,

        /// Path to configuration file
        #[arg(short, long, default_value = "rally.toml")]
        config: PathBuf,

        /// Root directory that model urls resolve against
        #[arg(short, long, default_value = "public")]
        assets: String,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info")]
        log_level: String,
    }

    pub fn main() -> Result<()> {
        let args = Args::parse();

        let level = match args.log_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .with_target(true)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        info!("Rally Viewer v{}", env!("CARGO_PKG_VERSION"));

        let config = ExplorerConfig::load_or_default(&args.config)
            .with_context(|| format!("loading {}", args.config.display()))?;
        let catalog = BikeCatalog::load_dir(&args.data)
            .with_context(|| format!("loading catalog from {}", args.data.display()))?;

        info!(
            bike = %catalog.bike.title(),
            diagram = %catalog.diagram.label,
            parts = catalog.parts.len(),
            "Starting viewer"
        );

        rally_viewer::run(ViewerOptions {
            config,
            catalog: Some(catalog),
            asset_root: args.assets,
        });
        Ok(())
    }
}
