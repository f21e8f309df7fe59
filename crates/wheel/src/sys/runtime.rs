use crate::events::AppEvent;
use async_channel::Sender;
use padlink::SocketPath;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the command socket and the config watcher on their own thread so the
/// frame loop never blocks on them.
pub fn start_background_services(
    tx: Sender<AppEvent>,
    socket_path: SocketPath,
    config_path: Option<PathBuf>,
) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(socket_path, tx).await;
                });
            }

            if let Some(config_path) = config_path {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(config_path, tx).await;
                });
            }

            std::future::pending::<()>().await;
        });
    });
}
