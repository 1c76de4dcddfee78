//! SweepBench Examples
//!
//! Runnable demonstrations of SweepBench. This crate is not published; it
//! hosts the examples and the small workloads they share.
//!
//! Run any example with:
//! ```sh
//! cargo run --example <name> -p sweepbench-demos --release
//! ```
//!
//! | Example | Feature |
//! |---------|---------|
//! | `feature_grid` | `multi_range!` sweeps over two and three dimensions |
//! | `feature_single` | Parameter-less functions and output monitoring |
//! | `feature_memory` | `TrackingAllocator` and peak heap profiling |
//! | `library_sweep` | Engine and output API without the CLI harness |

use std::hint::black_box;

/// Sum `0..n`, touching no heap memory
pub fn sum_to(n: u64) -> i32 {
    let mut acc = 0u64;
    for i in 0..n {
        acc = acc.wrapping_add(black_box(i));
    }
    (acc % 1_000) as i32
}

/// Allocate `kib` KiB, fill it, and return a checksum
pub fn fill_buffer(kib: usize) -> i32 {
    let mut buf = vec![0u8; kib * 1024];
    for (i, b) in buf.iter_mut().enumerate() {
        *b = (i & 0xFF) as u8;
    }
    black_box(&buf);
    buf.iter().take(255).map(|&b| b as i32).sum()
}

/// Sort `n` pseudo-random values generated from `seed`
pub fn sort_pseudo_random(n: usize, seed: u64) -> i32 {
    let mut state = seed | 1;
    let mut values: Vec<u64> = (0..n)
        .map(|_| {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        })
        .collect();
    values.sort_unstable();
    black_box(values.first().copied().unwrap_or(0) % 100) as i32
}
