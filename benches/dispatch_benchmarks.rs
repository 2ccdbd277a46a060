//! Performance benchmarks for marshalling dispatch.
//!
//! - Registry: sealing the `fx` module into a frozen registry
//! - Conversion: passthrough, wrapping, and image decoding
//! - Wrappers: construction, property access, and overload resolution
//!
//! ## Profiling with Puffin
//!
//! ```bash
//! cargo bench --features profile-with-puffin -- --profile-time 5
//! ```

use std::hint::black_box;
use std::io::Cursor;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use image::{ImageFormat, Rgba, RgbaImage};
use uxbind::fx::{Image, Node, SplitPane};
use uxbind::prelude::*;

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

fn sealed_context() -> Context {
    let mut ctx = Context::with_default_modules().unwrap();
    ctx.seal().unwrap();
    ctx
}

fn png(side: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(side, side, Rgba([0x20, 0x40, 0x60, 0xff]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

fn registry_benchmarks(c: &mut Criterion) {
    setup_profiler();
    let mut group = c.benchmark_group("registry");

    group.bench_function("seal_fx", |b| {
        b.iter(|| {
            let ctx = sealed_context();
            end_profiling_frame();
            black_box(ctx.registry().map(|r| r.converter_count()))
        });
    });

    let ctx = sealed_context();
    let registry = ctx.registry().unwrap();
    group.bench_function("lookup_inherited", |b| {
        b.iter(|| black_box(registry.lookup(black_box(TypeHash::of::<SplitPane>())).is_ok()));
    });

    group.finish();
}

fn conversion_benchmarks(c: &mut Criterion) {
    let ctx = sealed_context();
    let streams = StreamTable::new();
    let m = ctx.marshaller(&streams).unwrap();
    let trace = TraceInfo::new("bench.ux", 1, 1);
    let mut group = c.benchmark_group("conversion");

    let pane = m.construct("UXSplitPane", &[], &trace).unwrap();
    group.bench_function("passthrough_supertype", |b| {
        b.iter(|| {
            m.to_native(TypeHash::of::<Node>(), black_box(&pane), &trace)
                .unwrap()
        });
    });

    let native = NativeRef::new(SplitPane::new());
    group.bench_function("wrap_most_specific", |b| {
        b.iter(|| {
            m.from_native(TypeHash::of::<Node>(), Some(native.clone()), &trace)
                .unwrap()
        });
    });

    for side in [16u32, 256] {
        let bytes = png(side);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("image_from_stream", side), &bytes, |b, bytes| {
            b.iter(|| {
                let handle = streams.register(bytes.clone());
                let image = m
                    .to_native(TypeHash::of::<Image>(), &Dynamic::Stream(handle), &trace)
                    .unwrap();
                streams.close(handle);
                end_profiling_frame();
                black_box(image)
            });
        });
    }

    group.finish();
}

fn wrapper_benchmarks(c: &mut Criterion) {
    let ctx = sealed_context();
    let streams = StreamTable::new();
    let m = ctx.marshaller(&streams).unwrap();
    let trace = TraceInfo::new("bench.ux", 1, 1);
    let mut group = c.benchmark_group("wrapper");

    for count in [2usize, 32] {
        let items: Vec<Dynamic> = (0..count)
            .map(|_| m.construct("UXNode", &[], &trace).unwrap())
            .collect();
        let args = [Dynamic::List(items)];
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("construct_split_pane", count), &args, |b, args| {
            b.iter(|| m.construct("UXSplitPane", black_box(args), &trace).unwrap());
        });
    }
    group.throughput(Throughput::Elements(1));

    let node = m.construct("UXNode", &[], &trace).unwrap();
    group.bench_function("property_set_get", |b| {
        b.iter(|| {
            m.set(&node, "opacity", Dynamic::Float(0.5), &trace).unwrap();
            black_box(m.get(&node, "opacity", &trace).unwrap())
        });
    });

    let view = m.construct("UXImageView", &[], &trace).unwrap();
    group.bench_function("static_overload", |b| {
        b.iter(|| {
            m.call_static(
                "fx\\UXSplitPane",
                "setResizeWithParent",
                &[view.clone(), Dynamic::Bool(true)],
                &trace,
            )
            .unwrap()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    registry_benchmarks,
    conversion_benchmarks,
    wrapper_benchmarks
);

criterion_main!(benches);
