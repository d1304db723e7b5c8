use std::io;

use clap::Parser;
use kubesweep::{ClusterConnectionConfig, ResourceInventory};

#[derive(Debug, Parser)]
#[command(
    name = "kubesweep-scan",
    about = "List every object the given credentials can see"
)]
struct Cli {
    #[arg(long, env = "KUBESWEEP_CLUSTER_NAME")]
    cluster_name: String,
    /// API server URL, e.g. https://10.0.0.1:6443
    #[arg(long, env = "KUBESWEEP_SERVER")]
    server: String,
    /// Scan only this namespace instead of discovering all of them.
    #[arg(long, short)]
    namespace: Option<String>,
    #[arg(long, env = "KUBESWEEP_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Base64-encoded PEM client certificate.
    #[arg(long, requires = "client_key")]
    client_certificate: Option<String>,
    /// Base64-encoded PEM client key.
    #[arg(long, requires = "client_certificate")]
    client_key: Option<String>,
    /// Base64-encoded PEM CA bundle; TLS verification is skipped without it.
    #[arg(long)]
    ca_certificate: Option<String>,
    /// Print one JSON object per line instead of a summary line per record.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClusterConnectionConfig::new(cli.cluster_name, cli.server)?;
    if let Some(namespace) = cli.namespace {
        config = config.with_namespace(namespace);
    }
    if let Some(token) = cli.token {
        config = config.with_token(token);
    }
    if let (Some(certificate), Some(key)) = (cli.client_certificate, cli.client_key) {
        config = config.with_client_certificate(certificate, key);
    }
    if let Some(ca) = cli.ca_certificate {
        config = config.with_ca_certificate(ca);
    }

    let records = ResourceInventory::new(config).list_all().await?;
    for record in &records {
        if cli.json {
            println!("{}", serde_json::to_string(record)?);
        } else {
            println!("{record}");
        }
    }

    let failures = records.iter().filter(|record| record.is_failure()).count();
    eprintln!("{} objects, {failures} failures", records.len() - failures);
    Ok(())
}
