use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    network::application::http::client::bench_build_request,
    network::application::http::client::bench_parse_content_length,
    network::application::http::client::bench_parse_chunked
);
criterion_main!(benches);
