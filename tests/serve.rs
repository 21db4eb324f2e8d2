//! End-to-end requests over a real socket.

use random_server::{
    decider::ErrorRate,
    logging::{RequestLogEntry, RequestLogLayer},
    responder::Responder,
    server,
};
use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

async fn start(rate: ErrorRate) -> (SocketAddr, Arc<Mutex<Vec<RequestLogEntry>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let entries = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let entries = Arc::clone(&entries);
        move |entry: &RequestLogEntry| entries.lock().unwrap().push(entry.clone())
    };
    let app = server::app(Responder::new(rate), RequestLogLayer::with_sink(sink));

    tokio::spawn(server::serve(listener, app));
    (addr, entries)
}

async fn raw_request(addr: SocketAddr, request: &str) -> (SocketAddr, String) {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let local = stream.local_addr().unwrap();

    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    tokio::time::timeout(Duration::from_secs(5), stream.read_to_string(&mut response))
        .await
        .unwrap()
        .unwrap();

    (local, response)
}

#[tokio::test]
async fn serves_success_over_tcp() {
    let (addr, entries) = start(ErrorRate::NEVER).await;

    let (client, response) = raw_request(
        addr,
        "GET /anything?x=1 HTTP/1.1\r\nHost: localhost\r\nUser-Agent: e2e/0.1\r\nConnection: close\r\n\r\n",
    )
    .await;

    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"), "{response}");
    assert!(response
        .to_ascii_lowercase()
        .contains("content-type: application/json\r\n"));
    assert!(response.ends_with(r#"{"message":"request processed successfully"}"#));

    let entries = entries.lock().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].path, "/anything");
    assert_eq!(entries[0].query, "x=1");
    assert_eq!(entries[0].user_agent, "e2e/0.1");
    assert_eq!(entries[0].remote_addr, client.to_string());
}

#[tokio::test]
async fn serves_errors_over_tcp() {
    let (addr, entries) = start(ErrorRate::ALWAYS).await;

    let (_, response) = raw_request(
        addr,
        "POST /foo HTTP/1.1\r\nHost: localhost\r\nContent-Length: 2\r\nConnection: close\r\n\r\n{}",
    )
    .await;

    let status: u16 = response[9..12].parse().unwrap();
    assert!([400, 500, 502, 503, 504].contains(&status), "{response}");

    let entries = entries.lock().unwrap();
    assert_eq!(entries[0].status.as_u16(), status);
}
