//! Demo: compute the Swarm BMT address of a payload and round-trip one
//! inclusion proof.
//!
//! Build & run:
//!   cargo run --release --example file_address -- --help
//!   cargo run --release --example file_address -- path/to/file
//!   cargo run --release --example file_address -- --size=1048576 --prove=1000
//!
//! With no path, a deterministic synthetic payload of `--size` bytes is
//! generated, which is useful for sanity and perf smoke tests.

use std::env;
use std::fs;
use std::time::Instant;

use anyhow::{bail, Context, Result};

use swarm_bmt::{
    file_address_from_inclusion_proof, file_inclusion_proof_bottom_up, ChunkedFile, SEGMENT_SIZE,
};

#[derive(Debug, Clone)]
struct Opts {
    path: Option<String>, // read payload from this file
    size: usize,          // synthetic payload size when no path is given
    prove: usize,         // segment index to round-trip
}

fn print_help_and_exit() -> ! {
    eprintln!(
        r#"file_address — Swarm BMT address and inclusion-proof demo

USAGE:
  file_address [PATH] [--size=BYTES] [--prove=SEGMENT_INDEX]

With PATH, the payload is the file's contents; otherwise a synthetic
payload of --size bytes (default 1 MiB) is generated."#
    );
    std::process::exit(2)
}

fn parse_opts() -> Result<Opts> {
    let mut opts = Opts { path: None, size: 1024 * 1024, prove: 0 };
    for arg in env::args().skip(1) {
        if arg == "--help" || arg == "-h" {
            print_help_and_exit();
        } else if let Some(v) = arg.strip_prefix("--size=") {
            opts.size = v.parse().context("--size expects a byte count")?;
        } else if let Some(v) = arg.strip_prefix("--prove=") {
            opts.prove = v.parse().context("--prove expects a segment index")?;
        } else if arg.starts_with("--") {
            bail!("unknown flag {arg} (try --help)");
        } else {
            opts.path = Some(arg);
        }
    }
    Ok(opts)
}

fn make_data(len: usize) -> Vec<u8> {
    let mut v = vec![0u8; len];
    let mut x: u32 = 0x9E37_79B9 ^ (len as u32);
    for chunk in v.chunks_mut(4) {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        for (d, s) in chunk.iter_mut().zip(x.to_le_bytes().iter()) {
            *d = *s;
        }
    }
    v
}

fn main() -> Result<()> {
    let opts = parse_opts()?;

    let payload = match &opts.path {
        Some(path) => fs::read(path).with_context(|| format!("reading {path}"))?,
        None => make_data(opts.size),
    };
    let len = payload.len();

    let t0 = Instant::now();
    let file = ChunkedFile::new(payload).context("chunking payload")?;
    let address = file.address();
    let elapsed = t0.elapsed();

    println!("payload:     {len} bytes, {} leaf chunks", file.leaf_chunks().len());
    println!("address:     {}", hex::encode(address));
    println!(
        "tree:        {} levels, widths {:?}",
        file.bmt().depth(),
        file.bmt().levels().iter().map(Vec::len).collect::<Vec<_>>(),
    );
    println!(
        "hashed in:   {elapsed:.2?} ({:.1} MiB/s)",
        len as f64 / (1 << 20) as f64 / elapsed.as_secs_f64(),
    );

    // Round-trip one proof so the demo exercises the full pipeline.
    let proof = file_inclusion_proof_bottom_up(&file, opts.prove)?;
    let mut segment = [0u8; SEGMENT_SIZE];
    let start = opts.prove * SEGMENT_SIZE;
    let end = len.min(start + SEGMENT_SIZE);
    segment[..end - start].copy_from_slice(&file.payload()[start..end]);
    let recovered = file_address_from_inclusion_proof(&proof, &segment, opts.prove)?;

    println!(
        "proof:       segment {} -> {} steps, recovered address {}",
        opts.prove,
        proof.len(),
        if recovered == address { "matches" } else { "MISMATCH" },
    );

    Ok(())
}
