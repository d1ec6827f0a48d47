//! NUMA-to-NUMA memory transfer benchmark.
//!
//! Allocates a source and a destination buffer interleaved across the
//! requested node sets, faults every page, then times a fixed number of
//! parallel chunked copies and reports mean latency and bandwidth.

use std::process;

use clap::Parser;

use xferbench::mem::numa::{NumaBuf, numa_available};
use xferbench::stats::{MIB, Summary};
use xferbench::{BenchError, NodeSet, copy};

#[derive(Parser, Debug)]
#[command(name = "numa-xfer-bench", about = "NUMA-to-NUMA memory transfer benchmark")]
struct Cli {
    /// Nodes the source buffer is interleaved across, e.g. "0,2" or "0-3"
    #[arg(long = "src_nodes")]
    src_nodes: String,

    /// Nodes the destination buffer is interleaved across
    #[arg(long = "dst_nodes")]
    dst_nodes: String,

    /// Bytes copied per iteration
    #[arg(long = "benchmark_bytes", value_parser = clap::value_parser!(u64).range(1..))]
    benchmark_bytes: u64,

    /// Number of timed copy iterations
    #[arg(long = "iterations_per_bench", value_parser = clap::value_parser!(u32).range(1..))]
    iterations_per_bench: u32,

    /// Worker threads the copy is split across
    #[arg(long = "num_threads", value_parser = clap::value_parser!(u32).range(1..))]
    num_threads: u32,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            let code = match err.kind() {
                clap::error::ErrorKind::DisplayHelp => 0,
                _ => 1,
            };
            process::exit(code);
        }
    };

    if let Err(err) = run(&cli) {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

fn run(cli: &Cli) -> xferbench::Result<()> {
    if !numa_available() {
        return Err(BenchError::NumaUnavailable.into());
    }

    let src_nodes = NodeSet::parse(&cli.src_nodes)
        .map_err(|err| format!("invalid source node list {:?}: {err}", cli.src_nodes))?;
    let dst_nodes = NodeSet::parse(&cli.dst_nodes)
        .map_err(|err| format!("invalid destination node list {:?}: {err}", cli.dst_nodes))?;

    let bytes = cli.benchmark_bytes as usize;
    let threads = cli.num_threads as usize;

    println!("--- Configuration ---");
    println!("Source Nodes: {}", cli.src_nodes);
    println!("Destination Nodes: {}", cli.dst_nodes);
    println!("Buffer Size: {:.3} MiB", bytes as f64 / MIB);
    println!("Iterations: {}", cli.iterations_per_bench);
    println!("Worker Threads: {threads}");
    println!("---------------------");

    let mut src = NumaBuf::interleaved(bytes, &src_nodes)
        .map_err(|err| format!("failed to allocate {bytes} bytes on nodes {src_nodes:?}: {err}"))?;
    let mut dst = NumaBuf::interleaved(bytes, &dst_nodes)
        .map_err(|err| format!("failed to allocate {bytes} bytes on nodes {dst_nodes:?}: {err}"))?;

    // Fault the pages before timing so the interleave policy is applied and
    // no copy iteration pays for first-touch page faults.
    copy::fill_chunked(src.as_mut_slice(), 0, threads);
    copy::fill_chunked(dst.as_mut_slice(), 1, threads);

    let samples_ms = copy::time_copies(
        src.as_slice(),
        dst.as_mut_slice(),
        threads,
        cli.iterations_per_bench,
    );
    let summary = Summary::from_mean_latency(bytes, &samples_ms);

    println!("--- Results ---");
    println!("Average Latency: {:.3} ms", summary.avg_latency_ms);
    println!("Average Bandwidth: {:.3} GiB/s", summary.avg_bandwidth_gib_s);
    println!("---------------");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["numa-xfer-bench"].iter().copied().chain(extra.iter().copied()))
    }

    const VALID: &[&str] = &[
        "--src_nodes", "0",
        "--dst_nodes", "1",
        "--benchmark_bytes", "1048576",
        "--iterations_per_bench", "10",
        "--num_threads", "4",
    ];

    #[test]
    fn accepts_complete_flags() {
        let cli = parse(VALID).unwrap();
        assert_eq!(cli.benchmark_bytes, 1048576);
        assert_eq!(cli.iterations_per_bench, 10);
        assert_eq!(cli.num_threads, 4);
    }

    #[test]
    fn rejects_missing_flags() {
        assert!(parse(&[]).is_err());
        assert!(parse(&VALID[..VALID.len() - 2]).is_err());
    }

    #[test]
    fn rejects_zero_and_negative_numbers() {
        let mut args: Vec<&str> = VALID.to_vec();
        args[5] = "0"; // --benchmark_bytes
        assert!(parse(&args).is_err());

        let mut args: Vec<&str> = VALID.to_vec();
        args[9] = "-1"; // --num_threads
        assert!(parse(&args).is_err());
    }

    #[test]
    fn rejects_unknown_flags() {
        let mut args: Vec<&str> = VALID.to_vec();
        args.push("--warmup");
        args.push("3");
        assert!(parse(&args).is_err());
    }

    #[test]
    fn rejects_missing_value() {
        assert!(parse(&["--src_nodes"]).is_err());
    }
}
