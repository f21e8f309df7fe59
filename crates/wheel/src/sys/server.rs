use crate::events::AppEvent;
use async_channel::Sender;
use padlink::{SocketPath, ipc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(path: SocketPath, tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(path.as_str()).is_ok() {
        let _ = fs_err::remove_file(path.as_str());
    }

    let listener = match UnixListener::bind(path.as_str()) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket {}: {}", path, e);
            return;
        }
    };
    log::info!("Listening for commands on {}", path);

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        match ipc::parse_line(&line) {
                            Some(cmd) => {
                                if tx.send(AppEvent::Command(cmd)).await.is_err() {
                                    break;
                                }
                            }
                            None if line.trim().is_empty() => {}
                            None => log::warn!("Ignoring unknown command '{}'", line.trim()),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
