mod report;
mod trace;

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use log::info;
use thiserror::Error;
use vm::{
    mmu::Mmu,
    page_replacer::{FIFOPageReplacer, NruPageReplacer, PageReplacer},
    VmConfig, VmError, DEFAULT_PHYSICAL_MEMORY_SIZE,
};

use crate::trace::TraceReader;

#[derive(Error, Debug)]
enum SimError {
    #[error("{0}")]
    Vm(#[from] VmError),

    #[error("{}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Policy {
    Nru,
    Fifo,
}

/// Replays a memory access trace through a paged MMU and reports page faults.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Trace file, one `<hex address> <0|1>` pair per line
    input_file: PathBuf,

    /// Page size in bytes (32, 64 or 128)
    page_size: usize,

    /// Clear every R bit after this many accesses
    clear_r_every: usize,

    /// Physical memory size in bytes
    #[arg(long, default_value_t = DEFAULT_PHYSICAL_MEMORY_SIZE)]
    phys_mem: usize,

    /// Page replacement policy
    #[arg(long, value_enum, default_value_t = Policy::Nru)]
    policy: Policy,
}

fn run<REPLACER, W>(
    cli: &Cli,
    config: VmConfig,
    replacer: REPLACER,
    out: &mut W,
) -> Result<(), SimError>
where
    REPLACER: PageReplacer,
    W: Write,
{
    let mut mmu = Mmu::new(config, replacer)?;

    info!(
        "page_size={} clear_r_every={} phys_mem={} frames={} policy={:?}",
        config.page_size,
        config.clear_r_every,
        config.physical_memory_size,
        config.frame_count(),
        cli.policy
    );

    let file = File::open(&cli.input_file).map_err(|source| SimError::Open {
        path: cli.input_file.clone(),
        source,
    })?;

    for access in TraceReader::new(BufReader::new(file)) {
        let access = access?;
        mmu.access(access.address, access.op)?;
    }

    let stats = mmu.stats();
    info!(
        "done: {} accesses, {} faults, {} of {} frames in use",
        stats.accesses,
        stats.faults,
        mmu.frames().capacity() - mmu.frames().free_frame_count(),
        mmu.frames().capacity()
    );

    report::write_report(&mut *out, stats, mmu.frames())?;
    out.flush()?;

    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = VmConfig::new(cli.page_size, cli.clear_r_every)
        .with_physical_memory_size(cli.phys_mem);

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let result = match cli.policy {
        Policy::Nru => run(&cli, config, NruPageReplacer::new(), &mut out),
        Policy::Fifo => run(&cli, config, FIFOPageReplacer::new(), &mut out),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn cli(input_file: PathBuf, page_size: usize, phys_mem: usize) -> Cli {
        Cli {
            input_file,
            page_size,
            clear_r_every: 100,
            phys_mem,
            policy: Policy::Nru,
        }
    }

    fn config(cli: &Cli) -> VmConfig {
        VmConfig::new(cli.page_size, cli.clear_r_every).with_physical_memory_size(cli.phys_mem)
    }

    fn missing_file() -> PathBuf {
        std::env::temp_dir().join("vmsim-no-such-trace.txt")
    }

    #[test]
    fn missing_trace_prints_nothing() {
        let cli = cli(missing_file(), 32, 64);
        let mut out = Vec::new();

        let result = run(&cli, config(&cli), NruPageReplacer::new(), &mut out);

        assert!(matches!(result, Err(SimError::Open { .. })));
        assert!(out.is_empty());
    }

    #[test]
    fn config_is_checked_before_the_trace_is_opened() {
        let cli = cli(missing_file(), 48, 64);
        let mut out = Vec::new();

        let result = run(&cli, config(&cli), NruPageReplacer::new(), &mut out);

        assert!(matches!(
            result,
            Err(SimError::Vm(VmError::UnsupportedPageSize(48)))
        ));
        assert!(out.is_empty());
    }

    #[test]
    fn replays_a_trace_file() {
        let path = std::env::temp_dir()
            .join(format!("vmsim-trace-{}.txt", std::process::id()));
        fs::write(&path, "0 0\n20 1\n40 0\n").unwrap();

        let cli = cli(path.clone(), 32, 64);
        let mut out = Vec::new();
        let result = run(&cli, config(&cli), NruPageReplacer::new(), &mut out);
        fs::remove_file(&path).unwrap();

        assert!(result.is_ok());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "num reads = 2\n\
             num writes = 1\n\
             percentage of page faults = 1.00\n\
             mem[0]: 2\n\
             mem[1]: 1\n"
        );
    }
}
