use codable::{
    from_str, to_string, Decode, DecodeResult, Decoder, Encode, EncodeResult, Encoder,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
struct Product {
    sku: String,
    name: String,
    price: f64,
    quantity: u32,
}

impl Decode for Product {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let keyed = decoder.keyed()?;
        Ok(Product {
            sku: keyed.get_required("sku")?,
            name: keyed.get_required("name")?,
            price: keyed.get_required("price")?,
            quantity: keyed.get_required("quantity")?,
        })
    }
}

impl Encode for Product {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let mut keyed = encoder.keyed();
        keyed.set_value("sku", &self.sku)?;
        keyed.set_value("name", &self.name)?;
        keyed.set_value("price", &self.price)?;
        keyed.set_value("quantity", &self.quantity)
    }
}

/// Scores nested under `meta`, read through a sequential cursor.
#[derive(Clone)]
struct Graded {
    name: String,
    gross_score: u32,
    scores: Vec<f64>,
}

impl Decode for Graded {
    fn decode(decoder: &Decoder<'_>) -> DecodeResult<Self> {
        let keyed = decoder.keyed()?;
        let meta = keyed.nested_keyed("meta")?;
        let gross_score: u32 = meta.get_required("gross_score")?;
        let mut seq = meta.nested_sequential("scores")?;
        let mut scores = Vec::with_capacity(seq.len());
        while seq.has_next() {
            scores.push(seq.decode_next::<f64>()? * f64::from(gross_score));
        }
        Ok(Graded {
            name: keyed.get_required("name")?,
            gross_score,
            scores,
        })
    }
}

impl Encode for Graded {
    fn encode(&self, encoder: Encoder<'_>) -> EncodeResult<()> {
        let mut keyed = encoder.keyed();
        keyed.set_value("name", &self.name)?;
        let mut meta = keyed.nested_keyed("meta")?;
        meta.set_value("gross_score", &self.gross_score)?;
        let mut seq = meta.nested_sequential("scores")?;
        for score in &self.scores {
            seq.append_value(&(score / f64::from(self.gross_score)))?;
        }
        Ok(())
    }
}

fn products(size: u32) -> Vec<Product> {
    (0..size)
        .map(|i| Product {
            sku: format!("SKU{}", i),
            name: format!("Product {}", i),
            price: 9.99 + f64::from(i),
            quantity: i,
        })
        .collect()
}

fn benchmark_encode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_array");

    for size in [10, 50, 100, 500].iter() {
        let products = products(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| to_string(black_box(&products)))
        });
    }
    group.finish();
}

fn benchmark_decode_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode_array");

    for size in [10, 50, 100, 500].iter() {
        let json = to_string(&products(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &json, |b, json| {
            b.iter(|| from_str::<Vec<Product>>(black_box(json)))
        });
    }
    group.finish();
}

fn benchmark_nested_accessors(c: &mut Criterion) {
    let graded = Graded {
        name: "Jone".to_string(),
        gross_score: 120,
        scores: (0..50).map(f64::from).collect(),
    };
    let json = to_string(&graded).unwrap();

    c.bench_function("encode_nested", |b| b.iter(|| to_string(black_box(&graded))));
    c.bench_function("decode_nested", |b| {
        b.iter(|| from_str::<Graded>(black_box(&json)))
    });
}

fn benchmark_primitive_array(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitive_array");

    let numbers: Vec<i32> = (0..100).collect();
    let floats: Vec<f64> = (0..100).map(|i| i as f64 * 1.5).collect();

    group.bench_function("encode_integers", |b| {
        b.iter(|| to_string(black_box(&numbers)))
    });

    group.bench_function("encode_floats", |b| {
        b.iter(|| to_string(black_box(&floats)))
    });

    let numbers_json = to_string(&numbers).unwrap();
    let floats_json = to_string(&floats).unwrap();

    group.bench_function("decode_integers", |b| {
        b.iter(|| from_str::<Vec<i32>>(black_box(&numbers_json)))
    });

    group.bench_function("decode_floats", |b| {
        b.iter(|| from_str::<Vec<f64>>(black_box(&floats_json)))
    });

    group.finish();
}

/// The tree model against serde's direct path over the same documents.
fn benchmark_comparison_with_serde(c: &mut Criterion) {
    let products = products(100);
    let json = serde_json::to_string(&products).unwrap();

    let mut group = c.benchmark_group("comparison");

    group.bench_function("codable_encode", |b| {
        b.iter(|| codable::to_string(black_box(&products)))
    });

    group.bench_function("serde_json_encode", |b| {
        b.iter(|| serde_json::to_string(black_box(&products)))
    });

    group.bench_function("codable_decode", |b| {
        b.iter(|| codable::from_str::<Vec<Product>>(black_box(&json)))
    });

    group.bench_function("serde_json_decode", |b| {
        b.iter(|| serde_json::from_str::<Vec<Product>>(black_box(&json)))
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_encode_array,
    benchmark_decode_array,
    benchmark_nested_accessors,
    benchmark_primitive_array,
    benchmark_comparison_with_serde
);
criterion_main!(benches);
