use std::{future::IntoFuture, process, sync::Arc};

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{dispatcher, error, info};

use quire_core::impls::{PdfLatexRenderer, TempDirProvisioner};
use quire_core::{OrchestratorBuilder, UptimeWatchdog};
use quire_server::{
    config::{self, CliArgs, Settings},
    error::ServerError,
    http, telemetry,
};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        if dispatcher::has_been_set() {
            error!(error = %error, "server error");
        } else {
            eprintln!("quire-server: {error}");
        }
        process::exit(1);
    }
}

async fn run() -> Result<(), ServerError> {
    let cli = CliArgs::parse();
    let settings = config::load(&cli)?;
    telemetry::init(&settings.logging)?;

    serve(settings).await
}

async fn serve(settings: Settings) -> Result<(), ServerError> {
    let renderer = PdfLatexRenderer::new(&settings.render.pdflatex_path)
        .with_passes(settings.render.passes.get())
        .with_timeout(settings.render.timeout);
    let orchestrator = OrchestratorBuilder::new()
        .renderer(renderer)
        .provisioner(TempDirProvisioner::new(&settings.jobs.scratch_dir))
        .retention(settings.jobs.retention)
        .build()?;

    let router = http::build_router(
        Arc::new(orchestrator),
        settings.server.max_request_bytes.get(),
    );

    let addr = settings.server.addr;
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { addr, source })?;

    info!(
        target = "quire::server",
        op = "server::start",
        %addr,
        retention_secs = settings.jobs.retention.as_secs(),
        scratch_dir = %settings.jobs.scratch_dir.display(),
        pdflatex = %settings.render.pdflatex_path.display(),
        "Listening"
    );

    let watchdog = UptimeWatchdog::new(settings.jobs.max_uptime);
    tokio::select! {
        served = axum::serve(listener, router).into_future() => served.map_err(ServerError::Serve),
        () = watchdog.expired() => {
            // No drain: in-flight jobs and stored documents are dropped.
            error!(
                target = "quire::watchdog",
                op = "watchdog::fire",
                max_uptime_secs = settings.jobs.max_uptime.as_secs(),
                "Timed out; exiting"
            );
            process::exit(1);
        }
    }
}
