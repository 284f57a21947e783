use crate::MockNetwork;
use libhttp1::network::application::http::{Error, parse_response};
use libhttp1::network::{Connect, Scheme};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn parse_with_step(data: &[u8], step: usize) -> Result<libhttp1::network::application::http::Response, Error> {
    let mut network = MockNetwork::with_response(data);
    network.read_step = Some(step);
    let mut conn = network.connect(Scheme::Http, "mock.server").unwrap();
    parse_response(&mut conn, "GET")
}

/// Encodes `body` as chunks of random sizes.
fn encode_chunked(rng: &mut StdRng, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut rest = body;
    while !rest.is_empty() {
        let size = rng.gen_range(1..=rest.len().min(700));
        let (chunk, tail) = rest.split_at(size);
        if rng.gen_bool(0.5) {
            out.extend_from_slice(format!("{size:X}\r\n").as_bytes());
        } else {
            out.extend_from_slice(format!("{size:x};seq=1\r\n").as_bytes());
        }
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
        rest = tail;
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}

#[test]
fn test_chunked_random_splits() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..50 {
        let len = rng.gen_range(0..5000);
        let mut body = vec![0u8; len];
        rng.fill(&mut body[..]);

        let mut response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
        response.extend_from_slice(&encode_chunked(&mut rng, &body));

        let step = rng.gen_range(1..4096);
        let parsed = parse_with_step(&response, step).unwrap();
        assert_eq!(parsed.body, body, "body of {len} bytes read {step} at a time");
    }
}

#[test]
fn test_content_length_random_reads() {
    let mut rng = StdRng::seed_from_u64(42);

    for _ in 0..50 {
        let len = rng.gen_range(0..6000);
        let mut body = vec![0u8; len];
        rng.fill(&mut body[..]);

        let mut response = format!("HTTP/1.1 200 OK\r\nContent-Length: {len}\r\n\r\n").into_bytes();
        response.extend_from_slice(&body);
        // Bytes past the declared length are not part of this response.
        response.extend_from_slice(b"HTTP/1.1 200 OK\r\n");

        let step = rng.gen_range(1..4096);
        let parsed = parse_with_step(&response, step).unwrap();
        assert_eq!(parsed.body, body);
    }
}

#[test]
fn test_status_line_split_across_reads() {
    let parsed = parse_with_step(b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi", 1).unwrap();
    assert_eq!(parsed.status_code, 200);
    assert_eq!(parsed.status, "OK");
    assert_eq!(parsed.body, b"hi");
}

#[test]
fn test_chunked_case_insensitive_header() {
    let parsed = parse_with_step(
        b"HTTP/1.1 200 OK\r\ntransfer-encoding: Chunked\r\n\r\n3\r\nabc\r\n0\r\n\r\n",
        7,
    )
    .unwrap();
    assert_eq!(parsed.body, b"abc");
}

#[test]
fn test_invalid_chunk_size_in_response() {
    assert_eq!(
        parse_with_step(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\nxyz\r\n",
            64
        ),
        Err(Error::InvalidChunkSize("xyz".to_string()))
    );
}

#[test]
fn test_invalid_content_length_in_response() {
    assert_eq!(
        parse_with_step(b"HTTP/1.1 200 OK\r\nContent-Length: ten\r\n\r\n0123456789", 64),
        Err(Error::InvalidContentLength("ten".to_string()))
    );
}

#[test]
fn test_chunk_overrun_in_response() {
    assert_eq!(
        parse_with_step(
            b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWikipedia\r\n0\r\n\r\n",
            5
        ),
        Err(Error::InvalidChunkSize("pe".to_string()))
    );
}
