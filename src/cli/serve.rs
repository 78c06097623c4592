//! HTTP API server command.

use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use webvirt::api::state::ApiState;
use webvirt::devices::DeviceTemplates;
use webvirt::Result;

/// Serve the HTTP API.
#[derive(Args, Debug)]
#[command(after_long_help = "\
The server keeps one hypervisor connection open for its whole lifetime.
Domains are not touched when the server stops.

API ENDPOINTS:
  GET /api/0/state/:domain                    Domain state
  GET /api/0/start/:domain                    Start domain
  GET /api/0/shutdown/:domain                 Shut down domain
  GET /api/0/attach/:domain/:template?k=v     Attach host device
  GET /api/0/detach/:domain/:template?k=v     Detach host device
  GET /api/0/version                          API version
  GET /openapi.json                           OpenAPI document

EXAMPLES:
  webvirt                                     Listen on 0.0.0.0:5000 (default)
  webvirt --address 127.0.0.1 --port 8080     Local-only access on port 8080
  webvirt --connect qemu:///system            Use the system QEMU/KVM driver")]
pub struct ServeCmd {
    /// Address the webserver should bind to
    #[arg(long, default_value = "0.0.0.0", value_name = "ADDR")]
    pub address: String,

    /// Port the webserver should bind to
    #[arg(long, default_value_t = 5000, value_name = "PORT")]
    pub port: u16,

    /// Hypervisor connection URI (defaults to the library's default)
    #[arg(long, value_name = "URI")]
    pub connect: Option<String>,

    /// Device templates directory (defaults to devices/ next to the program,
    /// falling back to the source checkout)
    #[arg(long, value_name = "DIR")]
    pub devices: Option<PathBuf>,

    /// Enable debug logging (or set RUST_LOG=webvirt=debug)
    #[arg(short, long)]
    pub verbose: bool,
}

impl ServeCmd {
    /// Run the serve command.
    pub fn run(self) -> Result<()> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(webvirt::Error::Io)?;

        runtime.block_on(async move { self.run_server().await })
    }

    async fn run_server(self) -> Result<()> {
        let templates = match self.devices {
            Some(dir) => DeviceTemplates::new(dir),
            None => DeviceTemplates::locate()?,
        };
        if !templates.dir().is_dir() {
            tracing::warn!(dir = %templates.dir().display(), "device templates directory does not exist");
        }

        // Opened once, shared by every request.
        let hypervisor = webvirt::hypervisor::default_hypervisor(self.connect.as_deref())?;
        tracing::info!(backend = hypervisor.name(), "hypervisor session open");

        let state = Arc::new(ApiState::new(Arc::from(hypervisor), templates));
        let app = webvirt::api::create_router(state);

        let listener = tokio::net::TcpListener::bind((self.address.as_str(), self.port))
            .await
            .map_err(|e| {
                webvirt::Error::config(format!(
                    "cannot bind {}:{}: {}",
                    self.address, self.port, e
                ))
            })?;
        let addr = listener.local_addr()?;

        // Security warning if binding to all interfaces
        if addr.ip().is_unspecified() {
            eprintln!(
                "WARNING: Server is listening on all interfaces ({}).",
                addr.ip()
            );
            eprintln!("         The API has no authentication - any network client can control these domains.");
            eprintln!("         Consider using --address 127.0.0.1 for local-only access.");
        }

        tracing::info!(address = %addr, "starting HTTP API server");
        println!("webvirt API server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(webvirt::Error::Io)?;

        Ok(())
    }
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
    eprintln!("\nShutting down server...");
}
