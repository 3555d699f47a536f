use anyhow::Result;
use clap::Parser;
use snmp_query::cli::{self, AgentArgs};
use snmp_query::snmp::SnmpValue;
use snmp_query::{ObjectIdentifier, SnmpAgent};

fn oid(s: &str) -> Result<ObjectIdentifier> {
    Ok(ObjectIdentifier::parse(s)?)
}

fn main() -> Result<()> {
    let args = AgentArgs::parse();
    cli::init_tracing(args.verbose.max(1));

    let agent = SnmpAgent::new(&args.listen, &args.communities)?;

    // System description (1.3.6.1.2.1.1.1.0)
    agent.register_oid(oid("1.3.6.1.2.1.1.1.0")?, "Rust SNMP Agent v1.0".into())?;

    // System uptime (1.3.6.1.2.1.1.3.0)
    agent.register_oid(oid("1.3.6.1.2.1.1.3.0")?, SnmpValue::TimeTicks(0))?;

    // System contact (1.3.6.1.2.1.1.4.0)
    agent.register_oid(oid("1.3.6.1.2.1.1.4.0")?, "admin@example.com".into())?;

    // System name (1.3.6.1.2.1.1.5.0)
    agent.register_oid(oid("1.3.6.1.2.1.1.5.0")?, "snmp-agent".into())?;

    agent.serve_forever()
}
