//! Performance benchmarks for turning function strings into callables.
//!
//! Each iteration runs the full pipeline: signature splitting, parameter
//! resolution, substitution, body parsing and lowering.
//!
//! Run with the `profile-with-puffin` feature to see where parse time goes:
//!
//! ```bash
//! cargo bench --bench parse_benchmarks --features profile-with-puffin
//! ```

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use fnspec::FunctionParser;
use std::hint::black_box;

#[cfg(feature = "profile-with-puffin")]
use std::collections::HashMap;

#[cfg(feature = "profile-with-puffin")]
static FRAME_VIEW: std::sync::OnceLock<puffin::GlobalFrameView> = std::sync::OnceLock::new();

#[cfg(feature = "profile-with-puffin")]
fn setup_profiler() {
    puffin::set_scopes_on(true);
    FRAME_VIEW.get_or_init(puffin::GlobalFrameView::default);
}

#[cfg(not(feature = "profile-with-puffin"))]
fn setup_profiler() {}

#[cfg(feature = "profile-with-puffin")]
fn end_profiling_frame() {
    puffin::GlobalProfiler::lock().new_frame();
}

#[cfg(not(feature = "profile-with-puffin"))]
fn end_profiling_frame() {}

/// Sum the duration of every scope below `scope`, keyed by scope name.
#[cfg(feature = "profile-with-puffin")]
fn collect_scopes_recursive(
    stream: &puffin::Stream,
    scope: &puffin::Scope,
    scope_collection: &puffin::ScopeCollection,
    scope_timings: &mut HashMap<String, i64>,
) {
    use puffin::Reader;

    if let Some(details) = scope_collection.fetch_by_id(&scope.id) {
        let name = details.name().to_string();
        *scope_timings.entry(name).or_insert(0) += scope.record.duration_ns;
    }

    if scope.child_begin_position < scope.child_end_position
        && let Ok(reader) = Reader::with_offset(stream, scope.child_begin_position)
        && let Ok(children) = reader.read_top_scopes()
    {
        for child in children {
            collect_scopes_recursive(stream, &child, scope_collection, scope_timings);
        }
    }
}

#[cfg(feature = "profile-with-puffin")]
fn print_profiling_stats() {
    use puffin::Reader;

    let Some(frame_view) = FRAME_VIEW.get() else {
        println!("Profiler not initialized");
        return;
    };

    let view = frame_view.lock();
    let scope_collection = view.scope_collection();

    let mut scope_timings: HashMap<String, i64> = HashMap::new();
    let mut frame_count = 0i64;

    for frame in view.recent_frames() {
        frame_count += 1;
        let Ok(unpacked) = frame.unpacked() else {
            continue;
        };
        for (_thread_info, stream_info) in unpacked.thread_streams.iter() {
            let reader = Reader::from_start(&stream_info.stream);
            if let Ok(scopes) = reader.read_top_scopes() {
                for scope in scopes {
                    collect_scopes_recursive(
                        &stream_info.stream,
                        &scope,
                        scope_collection,
                        &mut scope_timings,
                    );
                }
            }
        }
    }

    println!("\n=== Profiling Summary ({} frames) ===", frame_count);
    if scope_timings.is_empty() {
        println!("  No scopes recorded.");
    } else {
        let mut entries: Vec<_> = scope_timings.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(a.1));
        let total_ns: i64 = entries.iter().map(|(_, ns)| **ns).sum();

        for (name, ns) in &entries {
            let avg_ns = **ns / frame_count.max(1);
            let pct = if total_ns > 0 {
                **ns as f64 / total_ns as f64 * 100.0
            } else {
                0.0
            };
            println!(
                "  {:30} {:>10.2?} avg ({:>5.1}%)",
                name,
                std::time::Duration::from_nanos(avg_ns as u64),
                pct
            );
        }
    }
    println!("=====================================\n");
}

#[cfg(not(feature = "profile-with-puffin"))]
fn print_profiling_stats() {}

const SIMPLE: &str = "double(Double x)->x * 2";
const MULTI: &str = "Double(Double x,y,z,f)->Double.valueOf(x*y + y + z*z + x*f)";
const TERNARY: &str = "double(Double x, Double y)->x > y ? x - y : y - x";
const STATEMENTS: &str = "int(Integer n)->{ int total = 0; for (int i = 1; i <= n; i++) { if (i % 3 == 0) continue; total += i; } return total; }";
const DUPLICATES: &str = "double(Double a, Double a, Double b)->a + a * b";

/// Parse cost across signature shapes.
fn signature_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let parser = FunctionParser::new();

    let mut group = c.benchmark_group("parse/signatures");
    for (name, spec) in [
        ("single_variable", SIMPLE),
        ("four_variables", MULTI),
        ("ternary", TERNARY),
        ("statement_body", STATEMENTS),
        ("duplicate_names", DUPLICATES),
    ] {
        group.throughput(Throughput::Bytes(spec.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let function = parser.parse(black_box(spec)).unwrap();
                end_profiling_frame();
                black_box(function.bindings().len())
            });
        });
    }
    group.finish();

    print_profiling_stats();
}

/// Long bodies: substitution rescans once per variable.
fn scaling_benchmarks(c: &mut Criterion) {
    let parser = FunctionParser::new();
    let mut group = c.benchmark_group("parse/scaling");

    for terms in [4usize, 32, 128] {
        let body = (0..terms)
            .map(|i| if i % 2 == 0 { "x * y" } else { "z / 2" })
            .collect::<Vec<_>>()
            .join(" + ");
        let spec = format!("double(Double x,y,z)->{body}");

        group.throughput(Throughput::Bytes(spec.len() as u64));
        group.bench_function(format!("terms_{terms}"), |b| {
            b.iter(|| black_box(parser.parse(black_box(&spec)).unwrap()));
        });
    }
    group.finish();
}

criterion_group!(benches, signature_benchmarks, scaling_benchmarks);
criterion_main!(benches);
