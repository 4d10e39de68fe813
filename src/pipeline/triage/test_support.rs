//! Loopback HTTP stubs for adapter tests.
//!
//! The adapters use the blocking client, so the stub runs on its own thread
//! with a dedicated runtime and the test body stays synchronous.

use std::net::SocketAddr;
use std::sync::mpsc;

use axum::Router;
use tokio::sync::oneshot;

pub struct StubServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Serve `router` on an ephemeral loopback port until the handle is dropped.
pub fn spawn_stub(router: Router) -> StubServer {
    let (addr_tx, addr_rx) = mpsc::channel::<SocketAddr>();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            addr_tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .unwrap();
        });
    });

    let addr = addr_rx.recv().unwrap();
    StubServer {
        base_url: format!("http://{addr}"),
        shutdown: Some(shutdown_tx),
    }
}

/// A loopback URL with nothing listening on it.
pub fn unused_local_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}
