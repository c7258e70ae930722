//! Run the configured statement and print its result.
//!
//! Resolves the proxy host, opens a session with the address translator
//! installed, prints the statement and renders the rows as a table on
//! stdout. Rendering is blocking, so it runs on the blocking thread pool.

use anyhow::{Context, Result};
use peerlens_adapter_scylla::ScyllaAdapter;
use peerlens_core::config::PeerlensConfig;
use peerlens_core::proxy::{AddressResolver, AddressRewriteRule};
use peerlens_core::render::{ColumnDescriptor, RenderSummary, RowSource, TabularResultRenderer};
use peerlens_core::RenderError;
use std::io::{self, Write};
use tracing::info;

/// Connect, run the statement and print the table.
pub async fn run(config: PeerlensConfig) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    info!(
        cluster = %config.cluster,
        proxy = %config.proxy.hostname,
        proxy_enabled = config.proxy.enabled,
        consistency = %config.query.consistency,
        "Starting"
    );

    let rewrite = if config.proxy.enabled {
        let endpoint = AddressResolver::system()
            .resolve(&config.proxy.hostname)
            .await;
        Some(AddressRewriteRule::new(endpoint))
    } else {
        None
    };

    let adapter = ScyllaAdapter::connect(&config.cluster, rewrite)
        .await
        .context("Failed to create session")?;

    let statement = config.query.statement.clone();
    let mut source = adapter
        .query(&statement, config.query.consistency)
        .await
        .with_context(|| format!("Failed to execute '{statement}'"))?;

    let summary = tokio::task::spawn_blocking(move || {
        let columns = source.columns().to_vec();
        let stdout = io::stdout();
        let mut out = stdout.lock();
        print_table(&statement, &columns, &mut source, &mut out)
    })
    .await
    .context("Table rendering task failed")?
    .context("Failed to print result table")?;

    info!(rows = summary.rows, bytes = summary.bytes, "Query complete");
    Ok(())
}

/// Write the statement line followed by the result table.
pub fn print_table<R, W>(
    statement: &str,
    columns: &[ColumnDescriptor],
    rows: &mut R,
    out: &mut W,
) -> Result<RenderSummary, RenderError>
where
    R: RowSource + ?Sized,
    W: Write + ?Sized,
{
    writeln!(out, "{statement}")?;
    TabularResultRenderer::new().render(columns, rows, out)
}
