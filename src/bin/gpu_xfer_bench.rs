//! CPU-to-GPU memory transfer benchmark.
//!
//! For every requested direction, allocates per-device transfer lanes,
//! times asynchronous copies with device-side events, and reports mean
//! latency and mean per-sample bandwidth.

use std::process;

use clap::Parser;

use xferbench::cuda::{self, api};
use xferbench::mem::{DMA_ALIGNMENT, align_up};
use xferbench::stats::Summary;
use xferbench::parse_operation_types;

#[derive(Parser, Debug)]
#[command(name = "gpu-xfer-bench", about = "CPU-to-GPU memory transfer benchmark")]
struct Cli {
    /// Number of devices to benchmark, ordinals 0..ngpus
    #[arg(long = "ngpus")]
    ngpus: u32,

    /// Bytes transferred per copy; rounded up to the DMA alignment
    #[arg(long = "benchmark_bytes", value_parser = clap::value_parser!(u64).range(1..))]
    benchmark_bytes: u64,

    /// Number of timed iterations per direction
    #[arg(long = "iterations_per_bench", value_parser = clap::value_parser!(u32).range(1..))]
    iterations_per_bench: u32,

    /// Comma-separated subset of {R,W}: R = host-to-device, W = device-to-host
    #[arg(long = "operation_type")]
    operation_type: String,

    /// Page-lock the host buffers (1) or leave them pageable (0)
    #[arg(long = "pin_memory", value_parser = clap::value_parser!(u8).range(0..=1))]
    pin_memory: u8,
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
    let directions = parse_operation_types(&cli.operation_type)
        .map_err(|err| format!("invalid operation type {:?}: {err}", cli.operation_type))?;

    let bytes = align_up(cli.benchmark_bytes as usize, DMA_ALIGNMENT);
    let pin = cli.pin_memory != 0;

    api::init()?;

    for direction in directions {
        let samples_ms =
            cuda::run_direction(cli.ngpus, bytes, cli.iterations_per_bench, pin, direction)?;
        let summary = Summary::from_mean_bandwidth(bytes, &samples_ms);

        println!(
            "Average {} latency: {:.3} ms",
            direction.label(),
            summary.avg_latency_ms
        );
        println!(
            "Average {} bandwidth: {:.3} GiB/s",
            direction.label(),
            summary.avg_bandwidth_gib_s
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::Parser;

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["gpu-xfer-bench"].iter().copied().chain(extra.iter().copied()))
    }

    const VALID: &[&str] = &[
        "--ngpus", "2",
        "--benchmark_bytes", "1048576",
        "--iterations_per_bench", "10",
        "--operation_type", "R,W",
        "--pin_memory", "1",
    ];

    #[test]
    fn accepts_complete_flags() {
        let cli = parse(VALID).unwrap();
        assert_eq!(cli.ngpus, 2);
        assert_eq!(cli.pin_memory, 1);
        assert_eq!(cli.operation_type, "R,W");
    }

    #[test]
    fn accepts_zero_gpus() {
        let mut args: Vec<&str> = VALID.to_vec();
        args[1] = "0";
        assert!(parse(&args).is_ok());
    }

    #[test]
    fn rejects_missing_flags() {
        assert!(parse(&[]).is_err());
        assert!(parse(&VALID[..VALID.len() - 2]).is_err());
    }

    #[test]
    fn rejects_negative_ngpus_and_bad_pin_flag() {
        let mut args: Vec<&str> = VALID.to_vec();
        args[1] = "-1";
        assert!(parse(&args).is_err());

        let mut args: Vec<&str> = VALID.to_vec();
        args[9] = "2"; // --pin_memory
        assert!(parse(&args).is_err());
    }

    #[test]
    fn rejects_zero_bytes_and_iterations() {
        let mut args: Vec<&str> = VALID.to_vec();
        args[3] = "0";
        assert!(parse(&args).is_err());

        let mut args: Vec<&str> = VALID.to_vec();
        args[5] = "0";
        assert!(parse(&args).is_err());
    }
}
