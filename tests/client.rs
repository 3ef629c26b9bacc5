//! Integration tests for the request pipeline, run against a local stub HTTP
//! server so transport behavior is covered without touching the real service.

use flate2::write::GzEncoder;
use flate2::Compression;
use onionoo::schema::Details;
use onionoo::{Client, Error, QueryParameters};
use std::io::{ErrorKind, Read, Write};
use std::net::TcpListener;
use std::thread;

const LAST_MODIFIED: &str = "Fri, 28 Aug 2026 09:00:00 GMT";

const DETAILS_BODY: &str = r#"{
    "version": "2.6",
    "relays_published": "2026-08-29 08:00:00",
    "relays": [{
        "nickname": "che",
        "fingerprint": "ABC123",
        "or_addresses": ["198.51.100.7:9001"],
        "running": true,
        "flags": ["Fast", "Running", "Stable"],
        "consensus_weight": 20000
    }],
    "bridges_published": "2026-08-29 08:00:00",
    "bridges": []
}"#;

/// Serves exactly one connection with a pre-baked raw HTTP response and hands
/// back the (lowercased) request the client sent.
fn serve_once(raw_response: Vec<u8>) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = stream.read(&mut buf).unwrap();
            request.extend_from_slice(&buf[..n]);
            if n == 0 || request.windows(4).any(|w| w == b"\r\n\r\n") {
                break;
            }
        }
        stream.write_all(&raw_response).unwrap();
        stream.flush().unwrap();
        String::from_utf8_lossy(&request).to_lowercase()
    });

    (base_url, handle)
}

fn http_response(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut head = format!("HTTP/1.1 {}\r\n", status_line);
    for (name, value) in headers {
        head.push_str(&format!("{}: {}\r\n", name, value));
    }
    head.push_str(&format!(
        "Content-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    ));

    let mut response = head.into_bytes();
    response.extend_from_slice(body);
    response
}

fn gzip(body: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(body).unwrap();
    encoder.finish().unwrap()
}

fn fingerprint_query() -> QueryParameters {
    QueryParameters::from([("fingerprint".to_string(), "ABC123".to_string())])
}

#[test]
fn test_details_with_fingerprint_filter() {
    let response = http_response(
        "200 OK",
        &[
            ("Content-Type", "application/json"),
            ("Last-Modified", LAST_MODIFIED),
        ],
        DETAILS_BODY.as_bytes(),
    );
    let (base_url, server) = serve_once(response);

    let client = Client::with_base_url(base_url);
    let fetched = client.details(Some(&fingerprint_query()), "").unwrap();

    let details = fetched.data.unwrap();
    assert!(!details.relays.is_empty());
    assert_eq!(details.relays[0].fingerprint, "ABC123");
    assert_eq!(fetched.last_modified, LAST_MODIFIED);

    let request = server.join().unwrap();
    assert!(request.starts_with("get /details?fingerprint=abc123 http/1.1"));
    assert!(request.contains("accept-encoding: gzip"));
    // Empty conditional token means no conditional header on the wire.
    assert!(!request.contains("if-modified-since"));
}

#[test]
fn test_gzip_encoded_body_is_decompressed() {
    let response = http_response(
        "200 OK",
        &[
            ("Content-Type", "application/json"),
            ("Content-Encoding", "gzip"),
            ("Last-Modified", LAST_MODIFIED),
        ],
        &gzip(DETAILS_BODY.as_bytes()),
    );
    let (base_url, server) = serve_once(response);

    let client = Client::with_base_url(base_url);
    let fetched = client.details(Some(&fingerprint_query()), "").unwrap();

    let details = fetched.data.unwrap();
    assert_eq!(details.relays[0].fingerprint, "ABC123");
    server.join().unwrap();
}

#[test]
fn test_large_body_is_read_in_full() {
    // Unfiltered details documents exceed 10 MiB; the executor must read
    // them whole rather than capping the body.
    let contact = "x".repeat(11 * 1024 * 1024);
    let body = format!(
        r#"{{
            "version": "2.6",
            "relays_published": "2026-08-29 08:00:00",
            "relays": [{{
                "nickname": "che",
                "fingerprint": "ABC123",
                "running": true,
                "contact": "{}"
            }}],
            "bridges_published": "2026-08-29 08:00:00",
            "bridges": []
        }}"#,
        contact
    );
    let response = http_response(
        "200 OK",
        &[("Content-Type", "application/json")],
        body.as_bytes(),
    );
    let (base_url, server) = serve_once(response);

    let client = Client::with_base_url(base_url);
    let fetched = client.details(None, "").unwrap();

    let details = fetched.data.unwrap();
    assert_eq!(details.relays[0].fingerprint, "ABC123");
    assert_eq!(details.relays[0].contact.as_deref(), Some(contact.as_str()));
    server.join().unwrap();
}

#[test]
fn test_malformed_gzip_stream_is_decode_error() {
    let response = http_response(
        "200 OK",
        &[("Content-Encoding", "gzip")],
        b"this is not a gzip stream",
    );
    let (base_url, server) = serve_once(response);

    let client = Client::with_base_url(base_url);
    let err = client.details(None, "").unwrap_err();

    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    server.join().unwrap();
}

#[test]
fn test_malformed_json_is_decode_error() {
    let response = http_response(
        "200 OK",
        &[("Content-Type", "application/json")],
        b"{\"version\": \"2.6\", \"relays\": [",
    );
    let (base_url, server) = serve_once(response);

    let client = Client::with_base_url(base_url);
    let err = client.summary(None, "").unwrap_err();

    assert!(matches!(err, Error::Decode(_)), "got {:?}", err);
    server.join().unwrap();
}

#[test]
fn test_not_modified_returns_no_data_and_server_token() {
    let response = http_response("304 Not Modified", &[("Last-Modified", LAST_MODIFIED)], b"");
    let (base_url, server) = serve_once(response);

    let client = Client::with_base_url(base_url);
    let fetched = client
        .details(None, "Thu, 27 Aug 2026 09:00:00 GMT")
        .unwrap();

    assert!(fetched.is_not_modified());
    assert!(fetched.data.is_none());
    // The server-returned token is surfaced, not the caller-supplied one.
    assert_eq!(fetched.last_modified, LAST_MODIFIED);

    let request = server.join().unwrap();
    assert!(request.contains("if-modified-since: thu, 27 aug 2026 09:00:00 gmt"));
}

#[test]
fn test_invalid_parameter_fails_before_any_network_call() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let client = Client::with_base_url(format!("http://{}", listener.local_addr().unwrap()));

    let query = QueryParameters::from([("bogus".to_string(), "x".to_string())]);
    let err = client.details(Some(&query), "").unwrap_err();

    match err {
        Error::InvalidParameter(key) => assert_eq!(key, "bogus"),
        other => panic!("expected InvalidParameter, got {:?}", other),
    }
    // Nothing ever connected to the listener.
    assert_eq!(listener.accept().unwrap_err().kind(), ErrorKind::WouldBlock);
}

#[test]
fn test_unknown_method_fails_before_any_network_call() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let client = Client::with_base_url(format!("http://{}", listener.local_addr().unwrap()));

    let err = client
        .execute::<Details>("unknown-method", None, "")
        .unwrap_err();

    match err {
        Error::UnknownMethod(name) => assert_eq!(name, "unknown-method"),
        other => panic!("expected UnknownMethod, got {:?}", other),
    }
    assert_eq!(listener.accept().unwrap_err().kind(), ErrorKind::WouldBlock);
}

#[test]
fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = Client::with_base_url(format!("http://{}", addr));
    let err = client.summary(None, "").unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
}

#[test]
fn test_http_error_status_is_transport_error() {
    let response = http_response("500 Internal Server Error", &[], b"boom");
    let (base_url, server) = serve_once(response);

    let client = Client::with_base_url(base_url);
    let err = client.details(None, "").unwrap_err();

    assert!(matches!(err, Error::Transport(_)), "got {:?}", err);
    server.join().unwrap();
}
