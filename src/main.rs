use std::net::Ipv4Addr;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use dnwalk::resolver::{
    UdpTransport, DEFAULT_BUFFER_SIZE, DEFAULT_MAX_DEPTH, DEFAULT_MAX_HOPS, DEFAULT_TIMEOUT,
    DNS_PORT,
};
use dnwalk::{Name, Resolver, ResolverConfig};
use tracing_subscriber::EnvFilter;

mod report;

#[derive(Parser)]
#[command(name = "dnwalk", version)]
#[command(about = "Resolve a domain name by walking the DNS delegation chain")]
struct Cli {
    /// Domain name to resolve
    domain: String,

    /// IPv4 address of the root (or any) nameserver to start from
    server: String,

    /// Port nameservers listen on
    #[arg(short, long, default_value_t = DNS_PORT)]
    port: u16,

    /// Seconds to wait for each reply
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Queries allowed for the whole lookup, nested nameserver lookups included
    #[arg(long, default_value_t = DEFAULT_MAX_HOPS)]
    max_hops: usize,

    /// Nameserver lookups allowed to nest inside each other
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Receive buffer size in bytes
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    buffer_size: usize,

    /// Print only the resolved address
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            // usage errors exit 1, --help and --version exit 0
            return Ok(if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            });
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let server: Ipv4Addr = cli
        .server
        .parse()
        .with_context(|| format!("invalid IPv4 address `{}`", cli.server))?;
    let name = Name::new(&cli.domain).with_context(|| format!("invalid domain `{}`", cli.domain))?;

    let transport = UdpTransport::new(
        cli.port,
        Duration::from_secs(cli.timeout),
        cli.buffer_size,
    );
    let config = ResolverConfig {
        max_hops: cli.max_hops,
        max_depth: cli.max_depth,
    };
    let resolver = Resolver::with_config(transport, config);

    let lookup = resolver
        .lookup(&name, server)
        .await
        .with_context(|| format!("could not resolve {name}"))?;

    if !cli.quiet {
        for hop in &lookup.hops {
            print!("{}", report::HopReport(hop));
        }
        println!("\n{}\n", report::RULE);
        println!("{name} resolved to:");
    }
    println!("{}", lookup.address);

    Ok(ExitCode::SUCCESS)
}
