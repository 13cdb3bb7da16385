use std::{env, fs, net::SocketAddr, path::PathBuf, str::FromStr};
use tokio::net::TcpListener;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

pub struct TracingGuards {
    _file_guard: Option<WorkerGuard>,
}

pub fn init_tracing(service_name: &str) -> TracingGuards {
    // Initialize tracing with environment overrides if present.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_layer = fmt::layer().with_writer(std::io::stdout);

    // Optional daily rolling file output when LOG_DIR is set.
    let mut file_guard: Option<WorkerGuard> = None;
    let mut file_layer = None;
    if let Ok(log_dir) = env::var("LOG_DIR") {
        let log_root = PathBuf::from(log_dir).join(service_name);
        if fs::create_dir_all(&log_root).is_ok() {
            let appender = tracing_appender::rolling::daily(&log_root, format!("{service_name}.log"));
            let (writer, guard) = tracing_appender::non_blocking(appender);
            file_layer = Some(fmt::layer().with_writer(writer));
            file_guard = Some(guard);
        }
    }

    if let Some(layer) = file_layer {
        let subscriber = Registry::default()
            .with(filter)
            .with(stdout_layer)
            .with(layer);
        let _ = tracing::subscriber::set_global_default(subscriber);
    } else {
        let subscriber = Registry::default().with(filter).with(stdout_layer);
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    TracingGuards {
        _file_guard: file_guard,
    }
}

pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    // Parse typed environment values with a fallback.
    env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
        .unwrap_or(default)
}

pub async fn bind_listener(port: u16) -> TcpListener {
    // Bind on all interfaces for container compatibility.
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr).await.expect("bind listener")
}

pub async fn shutdown_signal() {
    // Handle ctrl-c and SIGTERM to allow graceful shutdown.
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("sigterm handler");
        tokio::select! {
            _ = ctrl_c => {},
            _ = sigterm.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = ctrl_c.await;
    }
}

#[cfg(test)]
mod tests {
    use super::env_or;

    #[test]
    fn env_or_falls_back_on_missing_key() {
        assert_eq!(env_or("TRACKER_TEST_MISSING_KEY", 8080u16), 8080);
    }
}
