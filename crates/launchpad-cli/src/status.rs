//! Liveness page for external monitors.
//!
//! Shares nothing with the pipeline except the process start time.

use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use tokio::net::TcpListener;

#[derive(Clone)]
struct StatusState {
    started: Instant,
}

pub fn router(started: Instant) -> Router {
    Router::new()
        .route("/", get(index))
        .with_state(StatusState { started })
}

async fn index(State(state): State<StatusState>) -> Html<String> {
    Html(render_page(&format_uptime(state.started.elapsed())))
}

/// Bind the status listener on all interfaces.
pub async fn bind(port: u16) -> std::io::Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port))).await
}

/// Serve the status page until `shutdown` resolves.
pub async fn serve(
    listener: TcpListener,
    started: Instant,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    axum::serve(listener, router(started))
        .with_graceful_shutdown(shutdown)
        .await
}

/// `HHh MMm SSs`, each field zero-padded to two digits. Hours keep
/// counting past 99.
pub fn format_uptime(uptime: Duration) -> String {
    let total = uptime.as_secs();
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{hours:02}h {minutes:02}m {seconds:02}s")
}

fn render_page(uptime: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>Bot Status</title>
</head>
<body>
  <h1>Bot Status</h1>
  <div class="status-card uptime">
    <div class="label">Uptime</div>
    <div class="value">{uptime}</div>
  </div>
  <div class="status-card status">
    <div class="label">Status</div>
    <div class="value">Online</div>
  </div>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_zero() {
        assert_eq!(format_uptime(Duration::ZERO), "00h 00m 00s");
    }

    #[test]
    fn formats_mixed_fields() {
        assert_eq!(
            format_uptime(Duration::from_secs(3600 + 2 * 60 + 3)),
            "01h 02m 03s"
        );
    }

    #[test]
    fn drops_subsecond_part() {
        assert_eq!(format_uptime(Duration::from_millis(59_999)), "00h 00m 59s");
    }

    #[test]
    fn hours_exceed_two_digits() {
        assert_eq!(
            format_uptime(Duration::from_secs(123 * 3600 + 59 * 60 + 59)),
            "123h 59m 59s"
        );
    }

    #[test]
    fn page_shows_uptime_and_online() {
        let page = render_page("00h 00m 07s");
        assert!(page.contains("00h 00m 07s"));
        assert!(page.contains("Online"));
    }

    #[tokio::test]
    async fn serves_status_page() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        let server = tokio::spawn(serve(listener, Instant::now(), async {
            let _ = stop_rx.await;
        }));

        let response = reqwest::get(format!("http://{addr}/")).await.unwrap();
        assert_eq!(response.status().as_u16(), 200);
        assert!(
            response
                .headers()
                .get("content-type")
                .unwrap()
                .to_str()
                .unwrap()
                .starts_with("text/html")
        );
        let body = response.text().await.unwrap();
        assert!(body.contains("00h 00m 0"));
        assert!(body.contains("Online"));

        stop_tx.send(()).unwrap();
        server.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(serve(listener, Instant::now(), std::future::pending::<()>()));

        let response = reqwest::get(format!("http://{addr}/missing")).await.unwrap();
        assert_eq!(response.status().as_u16(), 404);
    }
}
