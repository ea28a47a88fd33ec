//! Performance benchmarks for SSE framing and parsing
//!
//! Measures block aggregation + parsing throughput, and full decoding.
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pushstream::sse::{parse_block, LineAggregator};
use pushstream::EventDecoder;

const ISSUE_CHANGED: &str = r#"{"projectKey":"projectKey1","issues":[{"issueKey":"key1","branchName":"master"}],"resolved":"true"}"#;

/// Generate wire lines for `events` blocks, each with its data split over
/// `data_lines` lines.
fn generate_lines(events: usize, data_lines: usize) -> Vec<String> {
    let chunk = ISSUE_CHANGED.len().div_ceil(data_lines);
    let mut lines = Vec::new();
    for i in 0..events {
        if i % 10 == 0 {
            lines.push(": keep-alive".to_string());
        }
        lines.push("event: IssueChanged".to_string());
        for part in ISSUE_CHANGED.as_bytes().chunks(chunk) {
            lines.push(format!("data: {}", String::from_utf8_lossy(part)));
        }
        lines.push(String::new());
    }
    lines
}

/// Benchmark blank-line framing plus block parsing
fn bench_frame_and_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_and_parse");

    for data_lines in [1, 4, 16].iter() {
        let lines = generate_lines(1000, *data_lines);
        let bytes: usize = lines.iter().map(|l| l.len() + 1).sum();
        group.throughput(Throughput::Bytes(bytes as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_data_lines", data_lines)),
            &lines,
            |b, lines| {
                b.iter(|| {
                    let mut aggregator = LineAggregator::new();
                    let mut count = 0usize;
                    for line in lines {
                        if let Some(block) = aggregator.push(line.as_str()) {
                            if parse_block(&block).is_some() {
                                count += 1;
                            }
                        }
                    }
                    black_box(count)
                });
            },
        );
    }

    group.finish();
}

/// Benchmark framing, parsing and payload decoding together
fn bench_full_decode(c: &mut Criterion) {
    let lines = generate_lines(1000, 1);
    let decoder = EventDecoder::new();

    c.bench_function("full_decode_1000_events", |b| {
        b.iter(|| {
            let mut aggregator = LineAggregator::new();
            let decoded = lines
                .iter()
                .filter_map(|line| aggregator.push(line.as_str()))
                .filter_map(|block| parse_block(&block))
                .filter_map(|raw| decoder.decode(&raw))
                .count();
            black_box(decoded)
        });
    });
}

criterion_group!(benches, bench_frame_and_parse, bench_full_decode);
criterion_main!(benches);
