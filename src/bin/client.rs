//! snmp-get: fetch OID values from an agent and print them.

use clap::Parser;
use snmp_query::cli::{self, GetArgs};
use snmp_query::{SnmpClient, library};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = GetArgs::parse();
    cli::init_tracing(args.verbose);

    let Some(timeout) = args.timeout() else {
        eprintln!("Error: timeout must be a positive number of seconds");
        return ExitCode::from(1);
    };

    library::init("snmp-get");

    let mut client = match SnmpClient::open(args.session()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(cli::error_exit_code(&e));
        }
    };

    let code = match client.get(&args.oids, timeout) {
        Ok(response) => cli::report(&response, &args.host),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(cli::error_exit_code(&e))
        }
    };

    client.close();
    library::shutdown();
    code
}
