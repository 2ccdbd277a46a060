//! Shared helpers for the integration tests.

#![allow(dead_code)]

use std::io::Cursor;
use std::path::PathBuf;

use image::{ImageFormat, Rgba, RgbaImage};
use tracing_subscriber::EnvFilter;
use uxbind::prelude::*;

/// Route `tracing` output through the test harness. Set `RUST_LOG` to see it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A sealed context with the `fx` toolkit installed.
pub fn fx_context() -> Context {
    fx_context_with(MarshalConfig::default())
}

pub fn fx_context_with(config: MarshalConfig) -> Context {
    init_tracing();
    let mut ctx = Context::with_config(config);
    ctx.install(uxbind::fx::module())
        .expect("fx module installs");
    ctx.seal().expect("fx module seals");
    ctx
}

/// PNG bytes for a `width` x `height` image with one marked pixel at (0, 0).
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut img = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0xff]));
    img.put_pixel(0, 0, Rgba([0x12, 0x34, 0x56, 0xff]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png)
        .expect("png encodes");
    out.into_inner()
}

/// Write `bytes` to a file unique to `tag` under the system temp directory.
pub fn temp_file(tag: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("uxbind-{}-{tag}.png", std::process::id()));
    std::fs::write(&path, bytes).expect("temp file writes");
    path
}

pub fn trace(line: u32) -> TraceInfo {
    TraceInfo::new("MainForm.ux", line, 1)
}
