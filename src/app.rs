//! Application struct that encapsulates server assembly and serving logic.

use std::sync::Arc;

use chattrace_core::config::Config;
use chattrace_core::lifecycle::signal::SignalHandler;
use chattrace_server::middleware::request_context::default_plugins;
use chattrace_server::{AppState, build_router};

use crate::cli::Cli;

pub struct Application {
    config: Arc<Config>,
    app_router: axum::Router,
}

impl Application {
    /// Build the application from CLI args: load config, apply overrides,
    /// assemble the middleware pipeline.
    pub fn build(args: &Cli) -> anyhow::Result<Self> {
        let mut config = Config::load(&args.config).unwrap_or_else(|e| {
            tracing::warn!(
                "Failed to load config from '{}': {e}, using defaults",
                args.config
            );
            Config::default()
        });

        // CLI overrides
        if let Some(ref host) = args.host {
            config.host = host.clone();
        }
        if let Some(port) = args.port {
            config.port = port;
        }

        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            plugins: Arc::new(default_plugins()),
        };
        let app_router = build_router(state);

        Ok(Self { config, app_router })
    }

    /// Bind, serve, and drain gracefully on SIGINT/SIGTERM.
    pub async fn serve(self) -> anyhow::Result<()> {
        let (signal_handler, mut shutdown_rx) = SignalHandler::new();
        tokio::spawn(signal_handler.run());

        let addr = format!("{}:{}", self.config.host, self.config.port);
        tracing::info!("Starting HTTP server on {addr}");
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        let shutdown = async move {
            let _ = shutdown_rx.wait_for(|v| *v).await;
        };

        axum::serve(listener, self.app_router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Server shut down.");
        Ok(())
    }
}
