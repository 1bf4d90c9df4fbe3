//! Integration tests for the TCP transport.
//!
//! These bind a real listener on an OS-assigned port and talk to it
//! through `connect`, so partial writes and socket closes behave the way
//! they do in production.

use std::time::Duration;

use kittywar_protocol::{decode_request, AuthToken, Body, Flag, Frame, REQUEST_HEADER_LEN};
use kittywar_transport::{connect, FrameReader, TransportError};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const TIMEOUT: Duration = Duration::from_secs(2);

fn token() -> AuthToken {
    AuthToken::new("kittywarkittywarkittywar").unwrap()
}

#[tokio::test]
async fn test_connect_exchange_request_and_frame() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    let server = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = vec![0u8; REQUEST_HEADER_LEN + 5];
        socket.read_exact(&mut buf).await.unwrap();
        let request = decode_request(&buf).unwrap();
        assert_eq!(request.flag, Flag::Login);
        assert_eq!(request.body, Body::Text("felix".into()));

        socket.write_all(&[0, 0, 0, 1, 1]).await.unwrap();
    });

    let (mut reader, mut writer) = connect(&addr, TIMEOUT).await.unwrap();
    writer
        .write_request(&kittywar_protocol::Request::login(token(), "felix"))
        .await
        .unwrap();

    let frame = reader.read_frame().await.unwrap().unwrap();
    assert_eq!(frame, Frame::int(Flag::Login, 1));
    server.await.unwrap();
}

#[tokio::test]
async fn test_reader_reassembles_split_writes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        // Header split across two writes, body in a third.
        socket.write_all(&[57, 0]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        socket.write_all(&[0, 3]).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        socket.write_all(&[1, 4, 6]).await.unwrap();
    });

    let (mut reader, _writer) = connect(&addr, TIMEOUT).await.unwrap();
    let frame = reader.read_frame().await.unwrap().unwrap();
    assert_eq!(frame.body, Body::Ints(vec![1, 4, 6]));
}

#[tokio::test]
async fn test_reader_peer_close_mid_body_is_fault() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut bytes = vec![3u8, 0, 0, 200];
        bytes.extend([b'x'; 50]);
        socket.write_all(&bytes).await.unwrap();
        // socket dropped here
    });

    let (mut reader, _writer) = connect(&addr, TIMEOUT).await.unwrap();
    let err = reader.read_raw().await.unwrap_err();
    assert!(err.frame_fault().is_some());
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_reader_peer_close_between_frames_is_clean() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        socket.write_all(&[98, 0, 0, 0]).await.unwrap();
    });

    let (read, _write) = tokio::net::TcpStream::connect(&addr)
        .await
        .unwrap()
        .into_split();
    let mut reader = FrameReader::new(read);
    assert_eq!(
        reader.read_frame().await.unwrap(),
        Some(Frame::empty(Flag::AdvancePhase))
    );
    assert_eq!(reader.read_frame().await.unwrap(), None);
}

#[tokio::test]
async fn test_connect_refused_reports_address() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    drop(listener);

    let err = match connect(&addr, TIMEOUT).await {
        Ok(_) => panic!("connect should fail"),
        Err(e) => e,
    };
    match err {
        TransportError::ConnectFailed { addr: reported, .. } => assert_eq!(reported, addr),
        other => panic!("unexpected error: {other}"),
    }
}
