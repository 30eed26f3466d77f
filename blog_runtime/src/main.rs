//! `blog`: interactive blog on stdin/stdout.

use std::io;

use anyhow::Context;
use blog_engine::engine::BlogEngine;
use blog_runtime::config::RuntimeConfig;
use blog_runtime::logging;
use blog_runtime::shell::Shell;
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = RuntimeConfig::load().context("blog configuration is malformed")?;

    logging::init_or_report(&config, io::stderr());
    info!(version = env!("CARGO_PKG_VERSION"), "starting blog shell");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(BlogEngine::new(), stdin.lock(), stdout.lock(), &config);
    shell.run().context("terminal I/O failed")?;

    let (engine, _) = shell.into_parts();
    info!(
        users = engine.registry().len(),
        posts = engine.list_posts().len(),
        events = engine.journal().len(),
        "blog shell finished"
    );
    Ok(())
}
