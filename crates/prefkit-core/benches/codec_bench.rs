//! Criterion benchmarks for the schema-validated object codec.
//!
//! Measures decode and encode latency for a flat record with a growing number
//! of properties, and the cost of skipping unknown properties.
//!
//! Run with:
//! ```bash
//! cargo bench --package prefkit-core --bench codec_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use prefkit_core::{
    BoxError, JsonTokenReader, JsonTokenWriter, ObjectCodec, ObjectCodecExt, ObjectReaderSession,
    PropertyDefinition, PropertySchema, RawValue, TokenKinds,
};
use serde_json::{json, Map, Value};

// ── Codec fixture ─────────────────────────────────────────────────────────────

/// A record of `n` numeric fields named `field_0` … `field_{n-1}`.
struct WideRecordCodec {
    schema: PropertySchema,
    strict: bool,
}

impl WideRecordCodec {
    fn new(n: usize, strict: bool) -> Self {
        let mut builder = PropertySchema::builder();
        for i in 0..n {
            builder = builder.property(
                format!("field_{i}"),
                PropertyDefinition::new(TokenKinds::NUMBER),
            );
        }
        Self {
            schema: builder.build().expect("field names are unique"),
            strict,
        }
    }
}

impl ObjectCodec for WideRecordCodec {
    type Value = Vec<(String, i64)>;

    fn type_name(&self) -> &str {
        "WideRecord"
    }

    fn schema(&self) -> &PropertySchema {
        &self.schema
    }

    fn error_on_unknown_property(&self) -> bool {
        self.strict
    }

    fn read_property(
        &self,
        reader: &mut JsonTokenReader,
        _session: &mut ObjectReaderSession<'_>,
        _property: &str,
    ) -> Result<RawValue, BoxError> {
        Ok(RawValue::new(reader.get_i64()?))
    }

    fn create(&self, mut session: ObjectReaderSession<'_>) -> Result<Self::Value, BoxError> {
        let names: Vec<String> = session.names().map(str::to_string).collect();
        let mut fields = Vec::with_capacity(names.len());
        for name in names {
            let value = session.take_required::<i64>(&name)?;
            fields.push((name, value));
        }
        Ok(fields)
    }

    fn write_properties(
        &self,
        writer: &mut JsonTokenWriter,
        fields: &Self::Value,
    ) -> Result<(), BoxError> {
        for (name, value) in fields {
            writer.write_i64_property(name, *value)?;
        }
        Ok(())
    }
}

fn make_document(n: usize) -> Value {
    let mut map = Map::new();
    for i in 0..n {
        map.insert(format!("field_{i}"), json!(i));
    }
    Value::Object(map)
}

// ── Benchmarks ────────────────────────────────────────────────────────────────

/// Benchmarks decoding records of increasing width from a parsed document.
fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_object");
    for n in [4usize, 16, 64] {
        let codec = WideRecordCodec::new(n, true);
        let doc = make_document(n);
        group.bench_with_input(BenchmarkId::new("fields", n), &doc, |b, doc| {
            b.iter(|| codec.decode_value(black_box(doc)).expect("decode must succeed"))
        });
    }
    group.finish();
}

/// Benchmarks encoding records of increasing width.
fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_object");
    for n in [4usize, 16, 64] {
        let codec = WideRecordCodec::new(n, true);
        let record = codec
            .decode_value(&make_document(n))
            .expect("decode must succeed for benchmark setup");
        group.bench_with_input(BenchmarkId::new("fields", n), &record, |b, record| {
            b.iter(|| codec.encode_to_value(black_box(record)).expect("encode must succeed"))
        });
    }
    group.finish();
}

/// Benchmarks a lenient codec that knows only a quarter of the properties.
fn bench_skip_unknown(c: &mut Criterion) {
    let codec = WideRecordCodec::new(16, false);
    let doc = make_document(64);
    c.bench_function("decode_object/skip_unknown_48_of_64", |b| {
        b.iter(|| codec.decode_value(black_box(&doc)).expect("decode must succeed"))
    });
}

/// Benchmarks the text round-trip including JSON parsing.
fn bench_text_roundtrip(c: &mut Criterion) {
    let codec = WideRecordCodec::new(16, true);
    let text = make_document(16).to_string();
    c.bench_function("text_roundtrip/16_fields", |b| {
        b.iter(|| {
            let record = codec.decode_str(black_box(&text)).unwrap();
            codec.encode_to_string(&record).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_decode,
    bench_encode,
    bench_skip_unknown,
    bench_text_roundtrip
);
criterion_main!(benches);
