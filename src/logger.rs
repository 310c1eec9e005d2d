use std::io::Write;

use chrono::Local;
use env_logger::{Builder, Env};
use log::Level;

fn level_color(level: Level) -> &'static str {
    match level {
        Level::Error => "\x1b[31m\x1b[1m",
        Level::Warn => "\x1b[33m\x1b[1m",
        Level::Info => "\x1b[32m\x1b[1m",
        Level::Debug => "\x1b[36m\x1b[1m",
        Level::Trace => "\x1b[90m\x1b[1m",
    }
}

/// Installs the global logger. `RUST_LOG` overrides the default `info` filter;
/// eframe's and wgpu's chatter stays at `warn` unless asked for.
pub fn init_logger() {
    Builder::from_env(Env::default().default_filter_or("info,eframe=warn,egui_glow=warn,winit=warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {}{:<5}\x1b[0m [{}:{}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                level_color(record.level()),
                record.level(),
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.args(),
            )
        })
        .init();
}
