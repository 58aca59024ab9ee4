//! Runtime configuration for the `imgsink-server` binary.
//!
//! All values are parsed from CLI arguments or environment variables, with
//! defaults suitable for production. [`CliArgs`] is the raw input;
//! [`ServerConfig`] is the validated form the rest of the server consumes.

use anyhow::bail;
use clap::Parser;
use core::time::Duration;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "imgsink-server",
    version,
    about = "An HTTP service that ingests, rescales, and stores JPEG uploads"
)]
pub struct CliArgs {
    /// Directory where processed images are written.
    ///
    /// Must already exist; the server refuses to start otherwise.
    ///
    /// Environment variable: `BASE_PATH`
    #[arg(long, env = "BASE_PATH")]
    pub base_path: PathBuf,

    /// Number of worker tasks processing uploads concurrently.
    ///
    /// Unset, zero, or unparsable values fall back to one worker per
    /// available CPU.
    ///
    /// Environment variable: `WORKERS`
    #[arg(long, env = "WORKERS")]
    pub workers: Option<String>,

    /// Address to listen on.
    ///
    /// Environment variable: `SERVER_ADDR`
    #[arg(long, env = "SERVER_ADDR", default_value_t = String::from("0.0.0.0:8888"))]
    pub server_addr: String,

    /// Seconds to wait for in-flight image processing to drain after the
    /// listener stops.
    ///
    /// Environment variable: `SHUTDOWN_TIMEOUT`
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 3)]
    pub shutdown_timeout: u64,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_path: PathBuf,
    pub num_workers: usize,
    pub server_addr: String,
    pub shutdown_timeout: Duration,
}

impl TryFrom<CliArgs> for ServerConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        if !args.base_path.is_dir() {
            bail!(
                "the path in `BASE_PATH` {} does not exist",
                args.base_path.display()
            );
        }

        let num_workers = args
            .workers
            .as_deref()
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or_else(num_cpus::get);

        Ok(Self {
            base_path: args.base_path,
            num_workers,
            server_addr: args.server_addr,
            shutdown_timeout: Duration::from_secs(args.shutdown_timeout),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(base_path: PathBuf, workers: Option<&str>) -> CliArgs {
        CliArgs {
            base_path,
            workers: workers.map(str::to_owned),
            server_addr: "127.0.0.1:0".into(),
            shutdown_timeout: 3,
        }
    }

    #[test]
    fn rejects_missing_base_path() {
        let missing = PathBuf::from("/definitely/not/a/real/dir");
        assert!(ServerConfig::try_from(args(missing, None)).is_err());
    }

    #[test]
    fn worker_count_falls_back_to_available_parallelism() {
        let dir = tempfile::tempdir().expect("tempdir");
        for raw in [None, Some("0"), Some("not-a-number"), Some("-3")] {
            let config = ServerConfig::try_from(args(dir.path().into(), raw))
                .expect("valid base path");
            assert_eq!(config.num_workers, num_cpus::get());
        }
    }

    #[test]
    fn explicit_worker_count_is_honored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ServerConfig::try_from(args(dir.path().into(), Some("4")))
            .expect("valid base path");
        assert_eq!(config.num_workers, 4);
    }
}
