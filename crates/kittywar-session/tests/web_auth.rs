//! Integration tests for `WebAuthenticator` against a scripted HTTP
//! server on a loopback port.

use kittywar_session::{Authenticator, SessionError, WebAuthenticator, WebConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Serves exactly one request with `body` and returns the raw request
/// text the client sent.
async fn serve_once(http_status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;

        let response = format!(
            "HTTP/1.1 {http_status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request
    });

    (base_url, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(split) = text.find("\r\n\r\n") {
            let content_length = text[..split]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= split + 4 + content_length {
                break;
            }
        }
    }
    String::from_utf8(buf).unwrap()
}

fn authenticator(base_url: String) -> WebAuthenticator {
    WebAuthenticator::new(WebConfig { base_url })
}

#[tokio::test]
async fn test_login_success_returns_credentials() {
    let (url, server) = serve_once(
        "200 OK",
        r#"{"status": "200", "token": "abcdefghijklmnopqrstuvwx"}"#,
    )
    .await;

    let credentials = authenticator(url).login("whiskers", "hunter2").await.unwrap();

    assert_eq!(credentials.username, "whiskers");
    assert_eq!(credentials.token.as_str(), "abcdefghijklmnopqrstuvwx");

    let request = server.await.unwrap();
    assert!(request.starts_with("POST /kittywar/login/mobile/ "));
    assert!(request.contains(r#""username":"whiskers""#));
    assert!(request.contains(r#""password":"hunter2""#));
}

#[tokio::test]
async fn test_login_status_400_is_rejected() {
    let (url, _server) = serve_once("200 OK", r#"{"status": "400"}"#).await;
    let err = authenticator(url).login("whiskers", "wrong").await.unwrap_err();
    assert!(matches!(err, SessionError::LoginRejected));
}

#[tokio::test]
async fn test_login_without_token_is_malformed() {
    let (url, _server) = serve_once("200 OK", r#"{"status": 200}"#).await;
    let err = authenticator(url).login("whiskers", "pw").await.unwrap_err();
    assert!(matches!(err, SessionError::MalformedResponse(_)));
}

#[tokio::test]
async fn test_login_short_token_is_protocol_error() {
    let (url, _server) = serve_once("200 OK", r#"{"status": 200, "token": "abc"}"#).await;
    let err = authenticator(url).login("whiskers", "pw").await.unwrap_err();
    assert!(matches!(err, SessionError::Protocol(_)));
}

#[tokio::test]
async fn test_register_created_and_taken() {
    let (url, server) = serve_once("201 Created", r#"{"status": "201"}"#).await;
    authenticator(url)
        .register("tom", "tom@example.test", "pw")
        .await
        .unwrap();
    let request = server.await.unwrap();
    assert!(request.starts_with("POST /kittywar/register/mobile/ "));
    assert!(request.contains(r#""email":"tom@example.test""#));

    let (url, _server) = serve_once("200 OK", r#"{"status": 409}"#).await;
    let err = authenticator(url)
        .register("tom", "tom@example.test", "pw")
        .await
        .unwrap_err();
    assert!(matches!(err, SessionError::UsernameTaken(name) if name == "tom"));
}

#[tokio::test]
async fn test_non_json_error_page_reports_http_status() {
    let (url, _server) = serve_once("502 Bad Gateway", "<html>oops</html>").await;
    let err = authenticator(url).login("tom", "pw").await.unwrap_err();
    assert!(matches!(err, SessionError::UnexpectedStatus(502)));
}

#[tokio::test]
async fn test_unreachable_server_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/", listener.local_addr().unwrap());
    drop(listener);

    let err = authenticator(url).login("tom", "pw").await.unwrap_err();
    assert!(matches!(err, SessionError::Http(_)));
}
