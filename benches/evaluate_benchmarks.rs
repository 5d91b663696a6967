//! Performance benchmarks for invoking parsed functions.
//!
//! Parsing happens once outside the measured loop; only argument
//! narrowing, interpretation and result conversion are timed.

use criterion::{Criterion, criterion_group, criterion_main};
use fnspec::{FunctionParser, Value};
use std::hint::black_box;
use std::sync::Arc;
use std::thread;

fn doubles(values: &[f64]) -> Vec<Value> {
    values.iter().copied().map(Value::Double).collect()
}

/// One evaluation per primitive entry point.
fn entry_point_benchmarks(c: &mut Criterion) {
    let parser = FunctionParser::new();
    let mut group = c.benchmark_group("evaluate/entry_points");

    let double = parser.parse("double(Double x)->x * 2").unwrap();
    let args = doubles(&[21.0]);
    group.bench_function("double", |b| {
        b.iter(|| black_box(double.evaluate_to_double(black_box(&args)).unwrap()));
    });

    let int = parser.parse("int(Integer a, Integer b)->a * b + 1").unwrap();
    let int_args = vec![Value::Int(6), Value::Int(7)];
    group.bench_function("int", |b| {
        b.iter(|| black_box(int.evaluate_to_int(black_box(&int_args)).unwrap()));
    });

    let boolean = parser.parse("boolean(Double x, Double y)->x > y && y > 0").unwrap();
    let bool_args = doubles(&[2.0, 1.0]);
    group.bench_function("boolean", |b| {
        b.iter(|| black_box(boolean.evaluate_to_boolean(black_box(&bool_args)).unwrap()));
    });

    let object = parser
        .parse("Double(Double x,y,z,f)->Double.valueOf(x*y + y + z*z + x*f)")
        .unwrap();
    let object_args = doubles(&[1.0, 2.0, 3.0, 4.0]);
    group.bench_function("boxed_object", |b| {
        b.iter(|| black_box(object.evaluate_to_object(black_box(&object_args)).unwrap()));
    });

    group.finish();
}

/// Bodies with loops, where interpreter dispatch dominates.
fn loop_benchmarks(c: &mut Criterion) {
    let parser = FunctionParser::new();
    let mut group = c.benchmark_group("evaluate/loops");

    let sum = parser
        .parse("long(Integer n)->{ long total = 0; for (int i = 0; i < n; i++) { total += i; } return total; }")
        .unwrap();
    for n in [10, 1_000] {
        let args = vec![Value::Int(n)];
        group.bench_function(format!("sum_to_{n}"), |b| {
            b.iter(|| black_box(sum.evaluate_to_long(black_box(&args)).unwrap()));
        });
    }

    let product = parser
        .parse("double(List xs)->{ double p = 1; for (int i = 0; i < xs.size(); i++) { p *= ((Double) xs.get(i)).doubleValue(); } return p; }")
        .unwrap();
    let list = vec![Value::list((1..=64).map(|i| 1.0 + 1.0 / f64::from(i)))];
    group.bench_function("list_product_64", |b| {
        b.iter(|| black_box(product.evaluate_to_double(black_box(&list)).unwrap()));
    });

    group.finish();
}

/// A single parsed function shared by several threads.
fn concurrent_benchmarks(c: &mut Criterion) {
    let function = Arc::new(
        FunctionParser::new()
            .parse("double(Double x, Double y)->x * y + x / y")
            .unwrap(),
    );

    let mut group = c.benchmark_group("evaluate/concurrent");
    group.bench_function("four_threads_x_256", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let function = Arc::clone(&function);
                    thread::spawn(move || {
                        let mut acc = 0.0;
                        for i in 0..256 {
                            let args = doubles(&[f64::from(i), f64::from(t + 1)]);
                            acc += function.evaluate_to_double(&args).unwrap();
                        }
                        acc
                    })
                })
                .collect();
            let total: f64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
            black_box(total)
        });
    });
    group.finish();
}

criterion_group!(benches, entry_point_benchmarks, loop_benchmarks, concurrent_benchmarks);
criterion_main!(benches);
