//! # peerlens-adapter-scylla
//!
//! Cassandra/ScyllaDB adapter for peerlens: opens a driver session with the
//! proxy address translator installed and exposes query results as a
//! [`RowSource`](peerlens_core::render::RowSource).

pub mod convert;
pub mod error;
pub mod rows;
pub mod translator;

pub use error::AdapterError;
pub use rows::ScyllaRowSource;
pub use translator::ProxyTranslator;

use peerlens_core::config::{ClusterConfig, Consistency};
use peerlens_core::proxy::AddressRewriteRule;
use scylla::query::Query;
use scylla::{Session, SessionBuilder};
use std::sync::Arc;
use tokio::runtime::Handle;

/// A connected driver session.
pub struct ScyllaAdapter {
    session: Session,
}

impl ScyllaAdapter {
    /// Connect to the cluster.
    ///
    /// With a rewrite rule every discovered node is dialed through the rule's
    /// translation; without one, node addresses are used as advertised.
    pub async fn connect(
        cluster: &ClusterConfig,
        rewrite: Option<AddressRewriteRule>,
    ) -> Result<Self, AdapterError> {
        let mut builder = SessionBuilder::new().known_nodes(&cluster.hosts);

        if let Some(password) = cluster.get_password() {
            builder = builder.user(cluster.username.as_str(), password);
        }

        if let Some(rule) = rewrite {
            tracing::info!(proxy = %rule.endpoint(), "Installing proxy address translator");
            builder = builder.address_translator(Arc::new(ProxyTranslator::new(rule)));
        }

        tracing::info!(hosts = ?cluster.hosts, "Connecting to cluster");
        let session = builder.build().await?;
        tracing::info!("Connected to cluster");

        Ok(Self { session })
    }

    /// Start a paged query.
    ///
    /// Must be called from within the runtime; the returned source pulls rows
    /// through that runtime's handle.
    pub async fn query(
        &self,
        statement: &str,
        consistency: Consistency,
    ) -> Result<ScyllaRowSource, AdapterError> {
        let mut query = Query::new(statement);
        query.set_consistency(convert::driver_consistency(consistency));

        tracing::debug!(statement, consistency = %consistency, "Executing query");
        let rows = self.session.query_iter(query, ()).await?;
        Ok(ScyllaRowSource::new(rows, Handle::current()))
    }
}
