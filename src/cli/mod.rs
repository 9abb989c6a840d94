//! Command-line interface for the bulk loader.
//!
//! The clap flag table and the boundary adapter live here. The adapter is
//! the only code that prints errors or decides exit codes; the resolution
//! engine below it only returns typed values.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod plan;

use crate::error::LoaderError;
use crate::hosts::DnsResolver;
use crate::options;

const LONG_ABOUT: &str = "Bulk load the data files found in <DIR_PATH> to the configured \
cluster. The parent directories of <DIR_PATH> are used as the target keyspace and table name, \
so files for Keyspace1/Standard1 are expected under /path/to/Keyspace1/Standard1/.\n\n\
A cluster config file given with -f supplies streaming throughput and client/server \
encryption settings; corresponding command-line flags override values read from it.";

/// Bulk load pre-built data files into a running cluster
#[derive(Debug, Parser)]
#[command(name = "bulkloader")]
#[command(author, version, about, long_about = LONG_ABOUT)]
pub struct LoaderArgs {
    /// Directory of data files to stream
    #[arg(value_name = "DIR_PATH")]
    pub dir: Vec<PathBuf>,

    /// Verbose output
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Debug logging and backtraces
    #[arg(long)]
    pub debug: bool,

    /// Don't display progress
    #[arg(long)]
    pub no_progress: bool,

    /// Required. Try to connect to these hosts (comma separated) initially for ring information
    #[arg(short = 'd', long, value_name = "NODES")]
    pub nodes: Option<String>,

    /// Don't stream to this (comma separated) list of nodes
    #[arg(short = 'i', long, value_name = "NODES")]
    pub ignore: Option<String>,

    /// Port used for native connection (default 9042)
    #[arg(short = 'p', long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Username for cluster authentication
    #[arg(short = 'u', long, value_name = "USERNAME")]
    pub username: Option<String>,

    /// Password for cluster authentication
    #[arg(long, visible_alias = "pw", value_name = "PASSWORD")]
    pub password: Option<String>,

    /// Number of concurrent connections per host
    #[arg(long, visible_alias = "cph", value_name = "N")]
    pub connections_per_host: Option<u32>,

    /// Throttle speed in Mbit/s (default unlimited)
    #[arg(short = 't', long, value_name = "MBITS")]
    pub throttle: Option<u32>,

    /// Cluster config file path for streaming throughput and client/server SSL
    #[arg(short = 'f', long, value_name = "FILE")]
    pub conf_path: Option<PathBuf>,

    /// Client SSL: full path to truststore
    #[arg(long, visible_alias = "ts", value_name = "TRUSTSTORE")]
    pub truststore: Option<String>,

    /// Client SSL: password of the truststore
    #[arg(long, visible_alias = "tspw", value_name = "PASSWORD")]
    pub truststore_password: Option<String>,

    /// Client SSL: full path to keystore; implies client authentication
    #[arg(long, visible_alias = "ks", value_name = "KEYSTORE")]
    pub keystore: Option<String>,

    /// Client SSL: password of the keystore
    #[arg(long, visible_alias = "kspw", value_name = "PASSWORD")]
    pub keystore_password: Option<String>,

    /// Client SSL: connections protocol to use (default: TLS)
    #[arg(long, visible_alias = "prtcl", value_name = "PROTOCOL")]
    pub ssl_protocol: Option<String>,

    /// Client SSL: algorithm (default: SunX509)
    #[arg(long, visible_alias = "alg", value_name = "ALGORITHM")]
    pub ssl_alg: Option<String>,

    /// Client SSL: type of store
    #[arg(long, visible_alias = "st", value_name = "STORE-TYPE")]
    pub store_type: Option<String>,

    /// Client SSL: comma-separated list of encryption suites to use
    #[arg(long, visible_alias = "ciphers", value_name = "CIPHER-SUITES")]
    pub ssl_ciphers: Option<String>,
}

pub fn run() -> ExitCode {
    let args = match LoaderArgs::try_parse() {
        Ok(args) => args,
        // Help and version are success terminations that bypass resolution
        // entirely; every other parse failure is a usage error.
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = err.print();
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            let _ = err.print();
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&args);

    match options::resolve(&args, &DnsResolver) {
        Ok(options) => {
            plan::print_plan(&options);
            ExitCode::SUCCESS
        }
        Err(err) => fail(&err),
    }
}

/// Wire the verbosity flags to the tracing log level.
/// RUST_LOG in the environment always takes precedence.
fn init_tracing(args: &LoaderArgs) {
    let level = if args.debug {
        Level::DEBUG
    } else if args.verbose {
        Level::INFO
    } else {
        Level::WARN
    };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

fn fail(err: &LoaderError) -> ExitCode {
    eprintln!("{err}");
    eprintln!();
    eprintln!("{}", LoaderArgs::command().render_usage());
    eprintln!("For the full flag table, run with --help.");
    ExitCode::FAILURE
}
