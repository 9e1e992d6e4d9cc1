use std::sync::Arc;

use anyhow::{Context, Result};
use hello_broker::{
    app::build_router,
    application::{binding_service::BindingService, instance_service::InstanceService},
    config::AppConfig,
    infrastructure::{
        hello_service::HelloService, in_memory_binding_repository::InMemoryBindingRepository,
        in_memory_instance_repository::InMemoryInstanceRepository,
    },
    state::AppState,
};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;

    let instances = Arc::new(InMemoryInstanceRepository::new());
    let bindings = Arc::new(InMemoryBindingRepository::new());
    let backend = Arc::new(HelloService::new(config.async_backend));

    let instance_service = Arc::new(InstanceService::new(instances.clone(), backend));
    let binding_service = Arc::new(BindingService::new(instances, bindings));
    let state = AppState::new(instance_service, binding_service);

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    info!(
        bind_addr = %config.bind_addr,
        async_backend = config.async_backend,
        "hello broker started"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hello_broker=debug,tower_http=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "unable to install ctrl+c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "unable to install sigterm handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
