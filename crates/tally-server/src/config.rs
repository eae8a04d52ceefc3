use anyhow::bail;
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration for the `tally-server` binary.
///
/// All values are parsed from CLI arguments or environment variables, with
/// defaults suitable for local development.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tally-server",
    version,
    about = "An HTTP service for allocating named-sequence identifiers"
)]
pub struct CliArgs {
    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8080"))]
    pub server_addr: String,

    /// Path of the counter snapshot file.
    ///
    /// Created on first allocation if it does not exist. Ignored when
    /// `--in-memory` is set.
    ///
    /// Environment variable: `DATA_PATH`
    #[arg(long, env = "DATA_PATH", default_value_t = String::from("tally.json"))]
    pub data_path: String,

    /// Keep counters in memory only; all sequences restart at 1 when the
    /// process restarts. Intended for tests and throwaway environments.
    ///
    /// Environment variable: `IN_MEMORY`
    #[arg(long, env = "IN_MEMORY", default_value_t = false)]
    pub in_memory: bool,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: SocketAddr,
    pub data_path: PathBuf,
    pub in_memory: bool,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let server_addr: SocketAddr = match args.server_addr.parse() {
            Ok(addr) => addr,
            Err(e) => bail!("SERVER_ADDR `{}` is not a socket address: {e}", args.server_addr),
        };

        if !args.in_memory && args.data_path.is_empty() {
            bail!("DATA_PATH must be non-empty unless --in-memory is set");
        }

        Ok(Self {
            server_addr,
            data_path: PathBuf::from(args.data_path),
            in_memory: args.in_memory,
        })
    }
}
