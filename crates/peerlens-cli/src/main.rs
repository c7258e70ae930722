use clap::{ArgAction, Parser};
use peerlens_core::config::{ClusterConfig, Consistency, PeerlensConfig};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "peerlens",
    version,
    about = "Query a Cassandra/ScyllaDB cluster through a proxy host and print the result as a table",
    disable_help_flag = true
)]
struct Cli {
    /// Cassandra proxy every node is dialed through
    #[arg(short = 'x', long, env = "PEERLENS_PROXY")]
    proxy: Option<String>,

    /// Cassandra seeds, comma-separated host:port list
    #[arg(short = 'h', long, env = "PEERLENS_HOSTS")]
    hosts: Option<String>,

    /// Cassandra username
    #[arg(short = 'u', long, env = "PEERLENS_USERNAME")]
    username: Option<String>,

    /// Cassandra password
    #[arg(short = 'p', long, env = "PEERLENS_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Connect to node addresses as advertised, without proxy translation
    #[arg(long, default_value_t = false)]
    no_proxy: bool,

    /// CQL statement to run (default: SELECT * FROM system.peers_v2)
    #[arg(short = 'q', long, env = "PEERLENS_QUERY")]
    query: Option<String>,

    /// Consistency level, e.g. one, quorum, local_quorum (default: one)
    #[arg(short = 'c', long, env = "PEERLENS_CONSISTENCY")]
    consistency: Option<Consistency>,

    /// YAML configuration file; flags override its values
    #[arg(long, env = "PEERLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Log filter, e.g. info or peerlens_core=debug (default: $RUST_LOG, then info)
    #[arg(long)]
    log_level: Option<String>,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Cli {
    /// Load the config file (if any) and apply flag overrides.
    fn load_config(&self) -> anyhow::Result<PeerlensConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!(config = %path.display(), "Loading configuration");
                PeerlensConfig::from_file(path)?
            }
            None => PeerlensConfig::default(),
        };

        if let Some(hosts) = &self.hosts {
            config.cluster.hosts = ClusterConfig::parse_hosts(hosts);
        }
        if let Some(username) = &self.username {
            config.cluster.username = username.clone();
        }
        if let Some(password) = &self.password {
            config.cluster.password = Some(password.clone());
            config.cluster.password_env = None;
        }
        if let Some(proxy) = &self.proxy {
            config.proxy.hostname = proxy.clone();
            config.proxy.enabled = true;
        }
        if self.no_proxy {
            config.proxy.enabled = false;
        }
        if let Some(query) = &self.query {
            config.query.statement = query.clone();
        }
        if let Some(consistency) = self.consistency {
            config.query.consistency = consistency;
        }

        Ok(config)
    }
}

fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    // stdout carries the table; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());

    let config = cli.load_config()?;
    commands::run::run(config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("peerlens").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults_match_builtin_config() {
        let config = parse(&[]).load_config().unwrap();
        assert_eq!(config, PeerlensConfig::default());
    }

    #[test]
    fn test_short_flags() {
        let cli = parse(&[
            "-x",
            "gateway.internal",
            "-h",
            "10.0.0.1:9042,10.0.0.2:9042",
            "-u",
            "reader",
            "-p",
            "hunter2",
        ]);
        let config = cli.load_config().unwrap();

        assert_eq!(config.proxy.hostname, "gateway.internal");
        assert_eq!(
            config.cluster.hosts,
            vec!["10.0.0.1:9042".to_string(), "10.0.0.2:9042".to_string()]
        );
        assert_eq!(config.cluster.username, "reader");
        assert_eq!(config.cluster.get_password().as_deref(), Some("hunter2"));
    }

    #[test]
    fn test_query_and_consistency() {
        let cli = parse(&[
            "--query",
            "SELECT peer FROM system.peers",
            "--consistency",
            "local_quorum",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.query.statement, "SELECT peer FROM system.peers");
        assert_eq!(config.query.consistency, Consistency::LocalQuorum);
    }

    #[test]
    fn test_bad_consistency_is_rejected() {
        let result = Cli::try_parse_from(["peerlens", "--consistency", "most"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_long_help_still_available() {
        let err = Cli::try_parse_from(["peerlens", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "cluster:\n  hosts: [\"10.9.0.1:9042\"]\n  username: ops\nproxy:\n  hostname: file.proxy\nquery:\n  consistency: quorum"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let config = parse(&["--config", &path, "-u", "reader", "--no-proxy"])
            .load_config()
            .unwrap();

        assert_eq!(config.cluster.hosts, vec!["10.9.0.1:9042".to_string()]);
        assert_eq!(config.cluster.username, "reader");
        assert_eq!(config.proxy.hostname, "file.proxy");
        assert!(!config.proxy.enabled);
        assert_eq!(config.query.consistency, Consistency::Quorum);
    }
}
