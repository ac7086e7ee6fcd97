use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sumvar::{Variant, Visit, Visitor};

type Inline = Variant![u64, String, Vec<u8>];
type Backed = Variant![u64, #[backup] String, Vec<u8>];

#[derive(Clone)]
enum Native {
    Int(u64),
    Text(String),
    Bytes(Vec<u8>),
}

struct Len;

impl Visitor for Len {
    type Output = usize;
}

impl Visit<u64> for Len {
    fn visit(&mut self, _: &u64) -> usize {
        8
    }
}

impl Visit<String> for Len {
    fn visit(&mut self, value: &String) -> usize {
        value.len()
    }
}

impl Visit<Vec<u8>> for Len {
    fn visit(&mut self, value: &Vec<u8>) -> usize {
        value.len()
    }
}

fn bench_assign(c: &mut Criterion) {
    let mut group = c.benchmark_group("variant_assign");
    let text = String::from("a moderately sized payload");

    group.bench_function("inline_alternating", |b| {
        let mut v = Inline::new(0u64);
        b.iter(|| {
            v.assign(black_box(&text));
            v.set(black_box(7u64));
        });
    });

    group.bench_function("backup_alternating", |b| {
        let mut v = Backed::new(0u64);
        b.iter(|| {
            v.assign(black_box(&text));
            v.set(black_box(7u64));
        });
    });

    group.bench_function("backup_same_alternative", |b| {
        let mut v = Backed::new(text.clone());
        b.iter(|| {
            v.assign(black_box(&text));
        });
    });

    // Comparison with a native enum
    group.bench_function("native_enum_alternating", |b| {
        let mut v = Native::Int(0);
        b.iter(|| {
            v = Native::Text(black_box(&text).clone());
            v = Native::Int(black_box(7));
        });
        black_box(v);
    });

    group.finish();
}

fn bench_visit(c: &mut Criterion) {
    let mut group = c.benchmark_group("variant_visit");

    let values: Vec<Inline> = (0..1024u64)
        .map(|i| match i % 3 {
            0 => Inline::new(i),
            1 => Inline::new(i.to_string()),
            _ => Inline::new(vec![0u8; (i % 17) as usize]),
        })
        .collect();

    group.bench_function("visitor_dispatch", |b| {
        b.iter(|| values.iter().map(|v| v.visit(Len)).sum::<usize>());
    });

    let natives: Vec<Native> = (0..1024u64)
        .map(|i| match i % 3 {
            0 => Native::Int(i),
            1 => Native::Text(i.to_string()),
            _ => Native::Bytes(vec![0u8; (i % 17) as usize]),
        })
        .collect();

    group.bench_function("native_match", |b| {
        b.iter(|| {
            natives
                .iter()
                .map(|v| match v {
                    Native::Int(_) => 8,
                    Native::Text(s) => s.len(),
                    Native::Bytes(bytes) => bytes.len(),
                })
                .sum::<usize>()
        });
    });

    group.finish();
}

fn bench_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("variant_swap");

    group.bench_function("different_alternatives", |b| {
        let mut left = Backed::new(1u64);
        let mut right = Backed::new(String::from("right"));
        b.iter(|| {
            left.swap(black_box(&mut right));
        });
    });

    group.bench_function("same_alternative", |b| {
        let mut left = Backed::new(String::from("left"));
        let mut right = Backed::new(String::from("right"));
        b.iter(|| {
            left.swap(black_box(&mut right));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_assign, bench_visit, bench_swap);
criterion_main!(benches);
