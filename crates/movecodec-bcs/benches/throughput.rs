//! Argument decode throughput benchmarks.
//!
//! # Running
//! ```bash
//! cargo bench --package movecodec-bcs
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use movecodec_bcs::{
    chunked_decode_calls, parallel_format_arguments, CallJob, ScriptFunctionDecoder,
    TypeTagValueDecoder,
};
use movecodec_core::{
    call::{FunctionId, ParameterDescriptor, ResolvedFunction, ScriptFunctionCall},
    types::{PrimitiveKind, StructTag, TypeTag},
};

// ─── Call factory ─────────────────────────────────────────────────────────────

fn param(name: &str, type_tag: TypeTag) -> ParameterDescriptor {
    ParameterDescriptor {
        name: name.into(),
        type_tag,
        doc: String::new(),
    }
}

fn peer_to_peer() -> ResolvedFunction {
    ResolvedFunction {
        name: "peer_to_peer_v2".into(),
        doc: String::new(),
        args: vec![
            param("account", PrimitiveKind::Signer.into()),
            param("payee", PrimitiveKind::Address.into()),
            param("amount", PrimitiveKind::U128.into()),
        ],
    }
}

fn make_transfer(i: u64) -> CallJob {
    let mut payee = [0u8; 16];
    payee[8..].copy_from_slice(&i.to_be_bytes());
    let amount = u128::from(i) * 1_000_000_000;

    let call = ScriptFunctionCall {
        func: FunctionId::new("0x1", "TransferScripts", "peer_to_peer_v2"),
        ty_args: vec![TypeTag::struct_tag(StructTag::new("0x1", "STC", "STC", vec![]))],
        args: vec![
            format!("0x{}", hex::encode(payee)),
            format!("0x{}", hex::encode(amount.to_le_bytes())),
        ],
    };
    CallJob::new(call, Some(peer_to_peer()))
}

fn make_batch(n: usize) -> Vec<CallJob> {
    (0..n).map(|i| make_transfer(i as u64)).collect()
}

/// `vector<vector<u8>>` arguments with `n` inner vectors of 32 bytes each.
fn make_nested_args(count: usize, n: usize) -> Vec<(String, TypeTag)> {
    let tag = TypeTag::vector(TypeTag::vector(PrimitiveKind::U8.into()));
    let mut bytes = vec![n as u8];
    for i in 0..n {
        bytes.push(32);
        bytes.extend(std::iter::repeat(i as u8).take(32));
    }
    let arg = format!("0x{}", hex::encode(&bytes));
    (0..count).map(|_| (arg.clone(), tag.clone())).collect()
}

// ─── Benchmarks ───────────────────────────────────────────────────────────────

fn bench_sequential_decode(c: &mut Criterion) {
    let decoder = ScriptFunctionDecoder::new();

    let mut group = c.benchmark_group("sequential_decode");
    for batch_size in [100, 1_000, 10_000] {
        let batch = make_batch(batch_size);
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &batch, |b, batch| {
            b.iter(|| {
                for job in batch {
                    let _ = decoder.decode_call(&job.call, job.resolved.as_ref());
                }
            });
        });
    }
    group.finish();
}

fn bench_chunked_decode(c: &mut Criterion) {
    let decoder = ScriptFunctionDecoder::new();

    let mut group = c.benchmark_group("chunked_decode_rayon");
    for batch_size in [1_000, 10_000, 100_000] {
        let batch = make_batch(batch_size);
        group.throughput(Throughput::Elements(batch_size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(batch_size), &batch, |b, batch| {
            b.iter(|| chunked_decode_calls(&decoder, batch, 4_096));
        });
    }
    group.finish();
}

fn bench_format_nested(c: &mut Criterion) {
    let decoder = TypeTagValueDecoder::new();
    let args = make_nested_args(10_000, 8);

    let mut group = c.benchmark_group("format_nested_vectors");
    group.throughput(Throughput::Elements(args.len() as u64));
    group.bench_function("parallel", |b| {
        b.iter(|| parallel_format_arguments(&decoder, &args));
    });
    group.finish();
}

fn bench_type_tag_parse(c: &mut Criterion) {
    let input = "0x1::Token::Token<vector<0x1::Account::Balance<0x1::STC::STC, u128>>>";

    c.bench_function("type_tag_parse", |b| {
        b.iter(|| input.parse::<TypeTag>());
    });
}

criterion_group!(
    benches,
    bench_sequential_decode,
    bench_chunked_decode,
    bench_format_nested,
    bench_type_tag_parse,
);
criterion_main!(benches);
