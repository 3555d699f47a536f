//! Argument structures and helpers shared by the `snmp-get` and `snmp-agent`
//! binaries.

use clap::{ArgAction, Parser, ValueEnum};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use crate::client::{DEFAULT_PORT, Session};
use crate::error::Error;
use crate::response::{Response, Status};
use crate::snmp::Version;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SnmpVersion {
    #[value(name = "1")]
    V1,
    #[default]
    #[value(name = "2c")]
    V2c,
}

impl From<SnmpVersion> for Version {
    fn from(v: SnmpVersion) -> Self {
        match v {
            SnmpVersion::V1 => Version::V1,
            SnmpVersion::V2c => Version::V2c,
        }
    }
}

/// Retrieve one or more values from an SNMP agent.
#[derive(Debug, Parser)]
// `--version` is the protocol version, not clap's program version flag.
#[command(name = "snmp-get", about)]
pub struct GetArgs {
    /// Agent host name or address.
    #[arg(long)]
    pub host: String,

    #[arg(long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Community string.
    #[arg(long, default_value = "public")]
    pub community: String,

    /// SNMP version: 1 or 2c.
    #[arg(long = "version", default_value = "2c")]
    pub snmp_version: SnmpVersion,

    /// OID in dotted-decimal form. May be given more than once.
    #[arg(long = "oid", required = true, value_name = "OID")]
    pub oids: Vec<String>,

    /// Seconds to wait for the reply.
    #[arg(long, default_value = "5", allow_negative_numbers = true)]
    pub timeout: f64,

    /// More logging on stderr (-v debug, -vv trace).
    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

impl GetArgs {
    pub fn session(&self) -> Session {
        Session::new(self.host.as_str(), &self.community)
            .port(self.port)
            .version(self.snmp_version.into())
    }

    /// The wait as a `Duration`; `None` unless it is positive and a deadline
    /// that far ahead can be represented.
    pub fn timeout(&self) -> Option<Duration> {
        Duration::try_from_secs_f64(self.timeout)
            .ok()
            .filter(|d| !d.is_zero() && Instant::now().checked_add(*d).is_some())
    }
}

/// Serve a small fixed MIB over UDP.
#[derive(Debug, Parser)]
#[command(name = "snmp-agent", version, about)]
pub struct AgentArgs {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:16100")]
    pub listen: String,

    /// Accepted community string. May be given more than once.
    #[arg(long = "community", default_value = "public")]
    pub communities: Vec<String>,

    #[arg(short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// Installs the stderr subscriber. `RUST_LOG` wins over the `-v` count.
pub fn init_tracing(verbosity: u8) {
    use tracing_subscriber::EnvFilter;

    let fallback = match verbosity {
        0 => "snmp_query=warn",
        1 => "snmp_query=debug",
        _ => "snmp_query=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn status_exit_code(status: Status) -> u8 {
    match status {
        Status::Success => 0,
        Status::Timeout => 4,
        Status::ErrorInPacket => 5,
        Status::TransportError => 6,
    }
}

pub fn error_exit_code(err: &Error) -> u8 {
    match err {
        Error::Connection { .. } => 3,
        _ => 1,
    }
}

/// Prints a finished GET the way `snmp-get` reports it and picks the exit
/// code.
pub fn report(response: &Response, peer: &str) -> ExitCode {
    match response {
        Response::Success(values) => {
            for (oid, value) in values {
                println!("OID: {}", oid);
                match value {
                    Ok(value) => println!("Value: {}", value),
                    Err(exception) => println!("Value: {}", exception),
                }
            }
        }
        Response::ErrorInPacket(err) => {
            eprintln!("Error in packet");
            eprintln!("Reason: {}", err.reason());
            if let Some(oid) = &err.oid {
                eprintln!("Failed object: {}", oid);
            }
        }
        Response::Timeout(_) => eprintln!("Timeout: No response from {}.", peer),
        Response::TransportError(e) => eprintln!("Error: {}", e),
    }
    ExitCode::from(status_exit_code(response.status()))
}
