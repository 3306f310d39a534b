//! # Codec Benchmarks
//!
//! Hot paths on every client call:
//!
//! | Path | Runs on |
//! |------|---------|
//! | `rlp_encode_transaction` | every submitted batch |
//! | `decode_log` | every receipt log and every polled log |
//! | `to_query_result` | every query page |

use ak_02_tx_encoding::rlp_encode_transaction;
use ak_03_event_decoding::{decode_log, topic_for};
use ak_05_query_paging::to_query_result;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use primitive_types::{H256, U256};
use serde_json::{json, Value};
use shared_types::{Attributes, Bytes, CreateOp, EntityKey, EventKind, Fields, Operations, RpcLog};

// ============================================================================
// TRANSACTION ENCODING
// ============================================================================

fn batch(size: usize) -> Operations {
    (0..size)
        .fold(Operations::builder(), |b, i| {
            b.create(CreateOp {
                payload: vec![0xab; 256],
                content_type: "application/json".into(),
                attributes: Attributes::new()
                    .with("type", "note")
                    .with("owner", "bench")
                    .with("seq", i as u64)
                    .with("priority", 3u64),
                btl: 1_000,
            })
        })
        .build()
        .expect("non-empty batch")
}

fn bench_rlp_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("tx-encoding");

    for size in [1, 10, 100] {
        let ops = batch(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("rlp_encode_creates", size), &ops, |b, ops| {
            b.iter(|| black_box(rlp_encode_transaction(ops).map(|bytes| bytes.len())))
        });
    }

    group.finish();
}

// ============================================================================
// EVENT DECODING
// ============================================================================

fn updated_log() -> RpcLog {
    let mut owner = [0u8; 32];
    owner[12..].copy_from_slice(&[0x0a; 20]);
    let data = [100u64, 200, 7]
        .iter()
        .flat_map(|w| {
            let mut word = [0u8; 32];
            U256::from(*w).to_big_endian(&mut word);
            word
        })
        .collect();
    RpcLog {
        topics: vec![
            topic_for(EventKind::Updated),
            H256(EntityKey::from(1u64).to_bytes()),
            H256(owner),
        ],
        data: Bytes(data),
        ..Default::default()
    }
}

fn bench_decode_log(c: &mut Criterion) {
    let mut group = c.benchmark_group("event-decoding");
    let log = updated_log();
    let unknown = RpcLog {
        topics: vec![H256::repeat_byte(0xee)],
        ..Default::default()
    };

    group.bench_function("decode_updated", |b| b.iter(|| black_box(decode_log(&log))));
    group.bench_function("skip_unknown_topic", |b| {
        b.iter(|| black_box(decode_log(&unknown)))
    });

    group.finish();
}

// ============================================================================
// QUERY RESULTS
// ============================================================================

fn page(size: usize) -> Value {
    let data: Vec<Value> = (0..size as u64)
        .map(|i| {
            json!({
                "key": EntityKey::from(i + 1).to_string(),
                "owner": format!("0x{}", "0a".repeat(20)),
                "expiresAt": 1_000 + i,
                "value": "0x7b7d",
                "contentType": "application/json",
                "stringAnnotations": [{ "key": "type", "value": "note" }],
                "numericAnnotations": [{ "key": "seq", "value": i }],
            })
        })
        .collect();
    json!({ "data": data, "blockNumber": "0x2a", "cursor": "next" })
}

fn bench_query_result(c: &mut Criterion) {
    let mut group = c.benchmark_group("query-paging");

    for size in [10, 100] {
        let response = page(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(
            BenchmarkId::new("to_query_result_all_fields", size),
            &response,
            |b, response| b.iter(|| black_box(to_query_result(Fields::ALL, response))),
        );
        group.bench_with_input(
            BenchmarkId::new("to_query_result_keys_only", size),
            &response,
            |b, response| b.iter(|| black_box(to_query_result(Fields::KEY, response))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_rlp_encode, bench_decode_log, bench_query_result);
criterion_main!(benches);
