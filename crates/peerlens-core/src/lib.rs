//! # peerlens-core
//!
//! Driver-independent pieces of peerlens:
//!
//! - [`proxy`]: resolve a proxy hostname once and rewrite every node address
//!   the driver discovers to that host, keeping the port.
//! - [`render`]: print column descriptors and a row stream as an aligned
//!   text table.
//! - [`config`]: cluster, proxy and query settings.
//!
//! Database adapters convert driver types into [`render::CellValue`] and
//! plug [`proxy::AddressRewriteRule`] into the driver's address translation
//! hook.

pub mod config;
pub mod error;
pub mod proxy;
pub mod render;

pub use config::{
    ClusterConfig, ConfigError, Consistency, PeerlensConfig, ProxyConfig, QueryConfig,
};
pub use error::RenderError;
pub use proxy::{AddressResolver, AddressRewriteRule, HostLookup, ProxyEndpoint, SystemLookup};
pub use render::{
    CellValue, ColumnDescriptor, IterRows, RenderState, RenderSummary, RowSource, RowValues,
    TabularResultRenderer,
};
