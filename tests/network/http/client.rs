use crate::MockNetwork;
use dotenvy::dotenv;
use libhttp1::network::Scheme;
use libhttp1::network::application::http::{Client, ClientConfig, Error, HeaderMap, Method};
use std::env;

fn client(network: MockNetwork) -> Client<MockNetwork> {
    Client::with_connector(network, ClientConfig::default())
}

#[test]
fn test_get_end_to_end() {
    let mut client = client(MockNetwork::with_response(
        b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi",
    ));
    let expected_request = client
        .build_request("GET", "http://example.com/", b"", &HeaderMap::new())
        .unwrap();

    let response = client.get("http://example.com/", &HeaderMap::new()).unwrap();
    assert_eq!(response.status_code, 200);
    assert_eq!(response.status, "OK");
    assert_eq!(response.body, b"hi");

    let records = client.connector().records.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].scheme, Some(Scheme::Http));
    assert_eq!(records[0].host, "example.com");
    assert_eq!(records[0].written, expected_request);
    assert_eq!(records[0].write_calls, 1);
    assert!(records[0].closed);
}

#[test]
fn test_post_over_https_with_port() {
    let mut network = MockNetwork::with_response(
        b"HTTP/1.1 201 Created\r\nLocation: /items/7\r\nContent-Length: 0\r\n\r\n",
    );
    network.read_step = Some(5);
    let mut client = client(network);

    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", "application/json");
    let body = br#"{"name":"valve"}"#;

    let response = client
        .post("https://api.example.com:8443/items", body, &headers)
        .unwrap();
    assert_eq!(response.status_code, 201);
    assert_eq!(response.header("location"), Some("/items/7"));
    assert!(response.body.is_empty());

    let records = client.connector().records.borrow();
    assert_eq!(records[0].scheme, Some(Scheme::Https));
    assert_eq!(records[0].host, "api.example.com:8443");

    let written = String::from_utf8(records[0].written.clone()).unwrap();
    assert!(written.starts_with("POST /items HTTP/1.1\r\n"));
    assert!(written.contains("\r\nHost: api.example.com:8443\r\n"));
    assert!(written.contains("\r\nContent-Type: application/json\r\n"));
    assert!(written.ends_with("\r\nContent-Length: 16\r\n\r\n{\"name\":\"valve\"}"));
}

#[test]
fn test_options_chunked_response() {
    let mut network = MockNetwork::with_response(
        b"HTTP/1.1 200 OK\r\nAllow: GET, POST, OPTIONS\r\nTransfer-Encoding: chunked\r\n\r\n\
          4\r\nWiki\r\n5\r\npedia\r\n0\r\n\r\n",
    );
    network.read_step = Some(3);
    let mut client = client(network);

    let response = client
        .options("http://example.com/resource", &HeaderMap::new())
        .unwrap();
    assert_eq!(response.header("Allow"), Some("GET, POST, OPTIONS"));
    assert_eq!(response.text(), "Wikipedia");

    let records = client.connector().records.borrow();
    assert!(records[0].written.starts_with(b"OPTIONS /resource HTTP/1.1\r\n"));
    assert!(records[0].closed);
}

#[test]
fn test_read_until_close() {
    let mut client = client(MockNetwork::with_response(
        b"HTTP/1.0 200 OK\r\nServer: legacy\r\n\r\nstreamed until the end",
    ));
    let response = client.get("http://legacy.example/", &HeaderMap::new()).unwrap();
    assert_eq!(response.protocol, "HTTP/1.0");
    assert_eq!(response.body, b"streamed until the end");
}

#[test]
fn test_head_has_no_body() {
    let mut client = client(MockNetwork::with_response(
        b"HTTP/1.1 200 OK\r\nContent-Length: 512\r\n\r\n",
    ));
    let response = client
        .request(Method::Head, "http://example.com/big", b"", &HeaderMap::new())
        .unwrap();
    assert_eq!(response.header("Content-Length"), Some("512"));
    assert!(response.body.is_empty());
}

#[test]
fn test_custom_method() {
    let mut client = client(MockNetwork::with_response(
        b"HTTP/1.1 207 Multi-Status\r\nContent-Length: 0\r\n\r\n",
    ));
    let response = client
        .send("PROPFIND", "http://dav.example/files/", b"", &HeaderMap::new())
        .unwrap();
    assert_eq!(response.status_code, 207);
    assert!(
        client.connector().records.borrow()[0]
            .written
            .starts_with(b"PROPFIND /files/ HTTP/1.1\r\n")
    );
}

#[test]
fn test_header_tiers() {
    let mut config = ClientConfig::default();
    config.user_agent = "probe/1.0".to_string();
    config.default_headers.insert("Accept", "application/json");
    config.default_headers.insert("X-Tier", "client");
    let mut client = Client::with_connector(
        MockNetwork::with_response(b"HTTP/1.1 204 No Content\r\n\r\n"),
        config,
    );

    let mut headers = HeaderMap::new();
    headers.insert("x-tier", "call");
    client.get("http://example.com/", &headers).unwrap();

    let records = client.connector().records.borrow();
    let written = String::from_utf8(records[0].written.clone()).unwrap();
    assert!(written.contains("\r\nUser-Agent: probe/1.0\r\n"));
    assert!(written.contains("\r\nAccept: application/json\r\n"));
    assert!(written.contains("\r\nx-tier: call\r\n"));
    assert!(!written.contains("client"));
}

#[test]
fn test_parse_failure_closes_connection() {
    let mut client = client(MockNetwork::with_response(b"HTTP/1.1 200 OK\n\r\n"));
    let err = client.get("http://example.com/", &HeaderMap::new()).unwrap_err();
    assert!(matches!(err, Error::MalformedStatusLine(_)));
    assert!(client.connector().records.borrow()[0].closed);
}

#[test]
fn test_truncated_body_closes_connection() {
    let mut client = client(MockNetwork::with_response(
        b"HTTP/1.1 200 OK\r\nContent-Length: 5\r\n\r\nabc",
    ));
    let err = client.get("http://example.com/", &HeaderMap::new()).unwrap_err();
    assert_eq!(
        err,
        Error::TruncatedBody {
            expected: 5,
            received: 3
        }
    );
    assert!(client.connector().records.borrow()[0].closed);
}

#[test]
fn test_short_write_is_send_error() {
    let mut network = MockNetwork::with_response(b"HTTP/1.1 200 OK\r\n\r\n");
    network.write_limit = Some(10);
    let mut client = client(network);

    let err = client.get("http://example.com/", &HeaderMap::new()).unwrap_err();
    assert!(matches!(err, Error::SendError(_)));

    let records = client.connector().records.borrow();
    assert_eq!(records[0].write_calls, 1);
    assert!(records[0].closed);
}

#[test]
fn test_dial_error() {
    let network = MockNetwork {
        refuse: true,
        ..Default::default()
    };
    let mut client = client(network);

    let err = client.get("http://example.com/", &HeaderMap::new()).unwrap_err();
    assert!(matches!(err, Error::DialError(_)));
    assert!(client.connector().records.borrow().is_empty());
}

#[test]
fn test_invalid_requests_never_dial() {
    let mut client = client(MockNetwork::default());
    assert!(matches!(
        client.get("", &HeaderMap::new()),
        Err(Error::InvalidRequest(_))
    ));
    assert!(matches!(
        client.get("not a url", &HeaderMap::new()),
        Err(Error::UrlParseError { .. })
    ));
    assert!(client.connector().records.borrow().is_empty());
}

#[test]
#[ignore = "requires network access"]
fn test_http_get_live() {
    dotenv().ok();
    let _ = env_logger::builder().is_test(true).try_init();
    let address = env::var("TEST_HTTP_ADDRESS").unwrap_or("httpbin.org".to_string());

    let mut client = Client::new();
    let response = client
        .get(&format!("http://{address}/get"), &HeaderMap::new())
        .unwrap();
    assert_eq!(response.status_code, 200);
}

#[test]
#[ignore = "requires network access"]
fn test_https_post_live() {
    dotenv().ok();
    let _ = env_logger::builder().is_test(true).try_init();
    let address = env::var("TEST_HTTP_ADDRESS").unwrap_or("httpbin.org".to_string());

    let mut client = Client::new();
    let mut headers = HeaderMap::new();
    headers.insert("Content-Type", "application/json");
    let response = client
        .post(
            &format!("https://{address}/post"),
            br#"{"hello":"world"}"#,
            &headers,
        )
        .unwrap();
    assert_eq!(response.status_code, 200);
    assert!(response.text().contains("hello"));
}
