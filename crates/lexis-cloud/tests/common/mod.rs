//! Local stand-in for the Google REST endpoints.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::Router;
use lexis_cloud::{GcpHttpClient, HttpClientConfig, TokenSource};

/// `METHOD path?query` of every request the stub received, in order.
#[derive(Clone, Default)]
pub struct RequestLog(Arc<Mutex<Vec<String>>>);

impl RequestLog {
    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Serve `app` on an ephemeral port from a background runtime and return
/// its base URL.
pub fn serve(app: Router, log: &RequestLog) -> String {
    let log = log.clone();
    let app = app.layer(middleware::from_fn(move |req: Request, next: Next| {
        let log = log.clone();
        async move {
            log.0
                .lock()
                .unwrap()
                .push(format!("{} {}", req.method(), req.uri()));
            next.run(req).await
        }
    }));

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).unwrap();
            axum::serve(listener, app).await.unwrap();
        });
    });
    format!("http://{addr}")
}

/// A client with a fixed token and near-zero backoff.
pub fn client() -> GcpHttpClient {
    let config = HttpClientConfig {
        timeout: Duration::from_secs(5),
        max_retries: 2,
        initial_backoff: Duration::from_millis(1),
        max_backoff: Duration::from_millis(2),
    };
    GcpHttpClient::new(config, TokenSource::fixed("test-token")).unwrap()
}
