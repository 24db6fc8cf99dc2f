//! traceparse - turn traceroute output into JSON with origin ASNs.
//!
//! This is the command-line interface for the traceparse library.

#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};
use traceparse::{AsnLookup, ParseConfig, TracerouteProcessor, TracerouteResult};

/// Command-line arguments for the parser.
#[derive(Parser, Debug)]
#[clap(author, version, about = "Parse traceroute output into JSON with origin ASN lookup", long_about = None)]
struct Args {
    /// File containing traceroute output (reads standard input if omitted)
    input: Option<PathBuf>,

    /// Disable origin ASN lookups
    #[clap(long)]
    no_asn: bool,

    /// Wrap the result in a record with timestamps and raw output
    #[clap(long)]
    record: bool,

    /// Print human-readable text instead of JSON
    #[clap(long, conflicts_with = "record")]
    text: bool,

    /// Pretty-print JSON output
    #[clap(long)]
    pretty: bool,

    /// Upper bound for parsing including ASN lookups, in milliseconds
    #[clap(long)]
    timeout_ms: Option<u64>,

    /// Look up the origin ASN of a single IP address and exit
    #[clap(long, value_name = "IP", conflicts_with_all = ["input", "record", "text"])]
    asn: Option<String>,

    /// Enable verbose output (use -vv for debug, -vvv for trace)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    // Lookups run one at a time, a single-threaded runtime is enough
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Error: Failed to create Tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(async_main(args)) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .init();
}

async fn async_main(args: Args) -> Result<()> {
    if let Some(ip) = &args.asn {
        let asn = AsnLookup::new()
            .lookup(ip)
            .await
            .with_context(|| format!("no origin ASN for {}", ip))?;
        println!("{}", asn);
        return Ok(());
    }

    let mut builder = ParseConfig::builder().enable_asn_lookup(!args.no_asn);
    if let Some(ms) = args.timeout_ms {
        builder = builder.overall_timeout(Duration::from_millis(ms));
    }
    let config = builder.build()?;
    let processor = TracerouteProcessor::new(config);

    let time_start = SystemTime::now();
    let raw = read_input(args.input.as_ref())?;
    let time_end = SystemTime::now();
    log::debug!("read {} bytes of traceroute output", raw.len());

    if args.record {
        let record = processor.record(&raw, time_start, time_end).await;
        return print_json(&record, args.pretty);
    }

    let data = String::from_utf8_lossy(&raw);
    let result = processor.parse(&data).await.with_context(|| {
        if data.trim().is_empty() {
            "no traceroute output"
        } else {
            "could not parse traceroute"
        }
    })?;

    if args.text {
        display_text_results(&result);
        Ok(())
    } else {
        print_json(&result, args.pretty)
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<Vec<u8>> {
    match path {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buf)
                .context("failed to read standard input")?;
            Ok(buf)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", json);
    Ok(())
}

/// Display a result the way traceroute prints it, one probe per line
fn display_text_results(result: &TracerouteResult) {
    println!(
        "traceroute to {}{}, {} hops max, {} byte packets",
        result.target,
        result
            .target_ip
            .as_ref()
            .map_or(String::new(), |ip| format!(" ({})", ip)),
        result.hops_max,
        result.pkt_size
    );

    for hop in &result.hops {
        if hop.probes.is_empty() {
            println!("{:2}", hop.hop);
        }
        for probe in &hop.probes {
            let Some(rtt) = &probe.rtt else {
                println!("{:2}  *", hop.hop);
                continue;
            };
            let host = match (&probe.name, &probe.ip) {
                (Some(name), Some(ip)) if name != ip => format!("{} ({})", name, ip),
                (_, Some(ip)) => ip.clone(),
                (Some(name), None) => name.clone(),
                (None, None) => "?".to_string(),
            };
            let asn = probe
                .asn
                .as_ref()
                .map_or(String::new(), |asn| format!(" [{}]", asn));
            let annotation = probe
                .annotation
                .as_ref()
                .map_or(String::new(), |a| format!(" {}", a));
            println!("{:2}  {}{}  {}{}", hop.hop, host, asn, rtt, annotation);
        }
    }
}
