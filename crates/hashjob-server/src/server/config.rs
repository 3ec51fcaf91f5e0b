use anyhow::{Context, bail};
use clap::Parser;
use core::time::Duration;
use hashjob::{CoordinatorConfig, JobId};
use std::net::SocketAddr;

/// Runtime configuration for the `hashjob-server` binary.
///
/// All values are parsed from CLI arguments or environment variables (a
/// `.env` file is loaded first), with defaults suitable for local use.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "hashjob-server",
    version,
    about = "An HTTP service that hashes passwords after a delay and reports job statistics"
)]
pub struct CliArgs {
    /// Port number for the HTTP listener.
    ///
    /// Environment variable: `PORT`
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Address to bind the HTTP listener to.
    ///
    /// Environment variable: `HOST`
    #[arg(long, env = "HOST", default_value_t = String::from("0.0.0.0"))]
    pub host: String,

    /// Time in seconds to wait before a submitted password is hashed.
    ///
    /// Environment variable: `HASH_WAIT`
    #[arg(long, visible_alias = "hw", alias = "hash_wait", env = "HASH_WAIT", default_value_t = 5)]
    pub hash_wait: u64,

    /// Enable debug output.
    ///
    /// Lowers the default log level to `debug`. An explicit `RUST_LOG` always
    /// wins.
    ///
    /// Environment variable: `DEBUG`
    #[arg(short, long, env = "DEBUG", default_value_t = false)]
    pub debug: bool,

    /// First job ID handed out after startup. Must be at least 1.
    ///
    /// Environment variable: `FIRST_JOB_ID`
    #[arg(long, env = "FIRST_JOB_ID", default_value_t = hashjob::FIRST_JOB_ID)]
    pub first_job_id: JobId,

    /// Capacity of the job store's request queue.
    ///
    /// Callers wait for room once this many requests are queued.
    ///
    /// Environment variable: `QUEUE_CAPACITY`
    #[arg(long, env = "QUEUE_CAPACITY", default_value_t = 1024)]
    pub queue_capacity: usize,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub server_addr: SocketAddr,
    pub hash_wait: Duration,
    pub debug: bool,
    pub first_job_id: JobId,
    pub queue_capacity: usize,
}

impl ServerConfig {
    pub fn coordinator(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            hash_wait: self.hash_wait,
            first_job_id: self.first_job_id,
            queue_capacity: self.queue_capacity,
        }
    }
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if args.port == 0 {
            bail!("PORT must be greater than 0");
        }

        if args.first_job_id < 1 {
            bail!("FIRST_JOB_ID must be greater than 0");
        }

        if args.queue_capacity == 0 {
            bail!("QUEUE_CAPACITY must be greater than 0");
        }

        let server_addr = format!("{}:{}", args.host, args.port)
            .parse::<SocketAddr>()
            .with_context(|| format!("invalid listen address {}:{}", args.host, args.port))?;

        Ok(Self {
            server_addr,
            hash_wait: Duration::from_secs(args.hash_wait),
            debug: args.debug,
            first_job_id: args.first_job_id,
            queue_capacity: args.queue_capacity,
        })
    }
}
