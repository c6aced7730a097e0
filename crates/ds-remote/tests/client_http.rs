//! `ZeplinClient` against a local canned-response HTTP server.
//!
//! The server answers one request per connection (`Connection: close`) and
//! records every request line and `Authorization` header it sees.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use ds_config::ApiConfig;
use ds_remote::{DesignSource, ErrorCategory, RetryConfig, ZeplinClient};
use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

type Routes = Arc<dyn Fn(&str) -> (u16, String) + Send + Sync>;

#[derive(Default)]
struct Seen {
    paths: Vec<String>,
    auth: Vec<Option<String>>,
}

async fn serve(routes: Routes) -> (String, Arc<Mutex<Seen>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let seen = Arc::new(Mutex::new(Seen::default()));
    let log = Arc::clone(&seen);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            let routes = Arc::clone(&routes);
            let log = Arc::clone(&log);
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                    let Ok(n) = socket.read(&mut chunk).await else {
                        return;
                    };
                    if n == 0 {
                        return;
                    }
                    buf.extend_from_slice(&chunk[..n]);
                }
                let head = String::from_utf8_lossy(&buf).to_string();
                let path = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                let auth = head
                    .lines()
                    .find(|line| line.to_ascii_lowercase().starts_with("authorization:"))
                    .map(|line| line["authorization:".len()..].trim().to_string());
                {
                    let mut seen = log.lock().unwrap();
                    seen.paths.push(path.clone());
                    seen.auth.push(auth);
                }

                let (status, body) = routes(&path);
                let response = format!(
                    "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    (format!("http://{addr}/v1"), seen)
}

fn client(base_url: &str) -> ZeplinClient {
    ZeplinClient::from_config(&ApiConfig {
        token: "secret-token".into(),
        base_url: base_url.into(),
        timeout_secs: 5,
        ..Default::default()
    })
    .unwrap()
    .with_retry(RetryConfig {
        max_attempts: 2,
        base_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(2),
    })
}

#[tokio::test]
async fn collection_endpoints_follow_pages() {
    let routes: Routes = Arc::new(|path: &str| {
        if path.starts_with("/v1/projects/p1/colors?limit=100&offset=0") {
            let page: Vec<String> = (0..100)
                .map(|i| format!(r#"{{"id":"c{i}","r":0,"g":0,"b":0,"a":1}}"#))
                .collect();
            (200, format!("[{}]", page.join(",")))
        } else if path.starts_with("/v1/projects/p1/colors?limit=100&offset=100") {
            (200, r#"[{"id":"c100","name":"Last","r":1,"g":1,"b":1}]"#.into())
        } else {
            (404, r#"{"message":"Not found"}"#.into())
        }
    });
    let (base, seen) = serve(routes).await;

    let colors = client(&base).get_colors("p1").await.unwrap();

    assert_eq!(colors.len(), 101);
    assert_eq!(colors[100].display_name(), "Last");
    let seen = seen.lock().unwrap();
    assert_eq!(seen.paths.len(), 2);
    assert!(
        seen.auth
            .iter()
            .all(|a| a.as_deref() == Some("Bearer secret-token"))
    );
}

#[tokio::test]
async fn sections_merge_component_and_screen_sections() {
    let routes: Routes = Arc::new(|path: &str| {
        if path.starts_with("/v1/projects/p1/component_sections") {
            (200, r#"[{"id":"s1","name":"Inputs"}]"#.into())
        } else if path.starts_with("/v1/projects/p1/screen_sections") {
            (200, r#"[{"id":"s2","name":"Onboarding"}]"#.into())
        } else {
            (404, String::new())
        }
    });
    let (base, _) = serve(routes).await;

    let sections = client(&base).get_sections("p1").await.unwrap();
    let names: Vec<&str> = sections.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Inputs", "Onboarding"]);
}

#[tokio::test]
async fn item_ids_are_url_encoded() {
    let routes: Routes = Arc::new(|path: &str| {
        if path == "/v1/projects/p%201/components/c%2F1" {
            (200, r#"{"id":"c/1","name":"Odd"}"#.into())
        } else {
            (404, String::new())
        }
    });
    let (base, _) = serve(routes).await;

    let component = client(&base).get_component("p 1", "c/1").await.unwrap();
    assert_eq!(component.name, "Odd");
}

#[tokio::test]
async fn statuses_surface_as_categories() {
    let routes: Routes = Arc::new(|path: &str| match path {
        "/v1/users/me" => (401, r#"{"message":"Invalid token"}"#.into()),
        "/v1/projects/gone" => (404, r#"{"message":"Project not found"}"#.into()),
        "/v1/projects/locked" => (403, String::new()),
        _ => (500, "boom".into()),
    });
    let (base, _) = serve(routes).await;
    let client = client(&base);

    let err = client.test_connection().await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Unauthorized);
    assert!(err.message().contains("Invalid token"));

    let err = client.get_project("gone").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::NotFound);

    let err = client.get_project("locked").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Forbidden);

    let err = client.get_project("other").await.unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Other);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn rate_limits_are_retried() {
    let calls = Arc::new(Mutex::new(0u32));
    let counter = Arc::clone(&calls);
    let routes: Routes = Arc::new(move |_path: &str| {
        let mut n = counter.lock().unwrap();
        *n += 1;
        if *n == 1 {
            (429, String::new())
        } else {
            (200, r#"{"id":"p1","name":"Atlas"}"#.into())
        }
    });
    let (base, _) = serve(routes).await;

    let project = client(&base).get_project("p1").await.unwrap();
    assert_eq!(project.name, "Atlas");
    assert_eq!(*calls.lock().unwrap(), 2);
}

#[tokio::test]
async fn asset_downloads_do_not_send_the_token() {
    let routes: Routes = Arc::new(|_path: &str| (200, "PNGDATA".into()));
    let (base, seen) = serve(routes).await;
    let url = format!("{}/../img/button.png", base.trim_end_matches("/v1"));

    let bytes = client(&base)
        .fetch_bytes(&url, Duration::from_secs(2))
        .await
        .unwrap();

    assert_eq!(bytes, b"PNGDATA");
    assert_eq!(seen.lock().unwrap().auth, vec![None]);
}

#[tokio::test]
async fn refused_connection_is_unreachable() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{addr}/v1"))
        .test_connection()
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Unreachable);
}
