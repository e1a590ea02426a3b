//! Wavetable inspection, validation and capacity planning commands.

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use log::debug;
use std::fs;
use std::path::Path;
use wavetable_store::layout::{INTERPOLATION_WINDOW, MAX_ARENA_SAMPLES};
use wavetable_store::validation::validate_payload;
use wavetable_store::{checked_required_size, split_wavetable, ByteOrder, WavetableStore};

/// Largest file accepted: a full arena of float samples plus the header.
const MAX_FILE_SIZE_BYTES: u64 = (MAX_ARENA_SAMPLES * 4 + 8) as u64;

/// Byte order selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ByteOrderArg {
    Little,
    Big,
}

impl From<ByteOrderArg> for ByteOrder {
    fn from(arg: ByteOrderArg) -> Self {
        match arg {
            ByteOrderArg::Little => ByteOrder::Little,
            ByteOrderArg::Big => ByteOrder::Big,
        }
    }
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    let file_size = fs::metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?
        .len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File size ({:.1} MB) exceeds maximum of {:.1} MB",
            file_size as f64 / (1024.0 * 1024.0),
            MAX_FILE_SIZE_BYTES as f64 / (1024.0 * 1024.0)
        );
    }
    debug!("reading {} bytes from {}", file_size, path.display());
    fs::read(path).with_context(|| format!("Failed to read wavetable: {}", path.display()))
}

/// Build a wavetable file into a fresh store and print its layout.
pub fn inspect(path: &Path, order: ByteOrder, append_silence: bool) -> Result<()> {
    let data = read_file(path)?;
    let (header, payload) =
        split_wavetable(&data, order).context("Failed to parse wavetable header")?;

    let mut store = WavetableStore::new();
    store
        .build_with_order(&header, payload, append_silence, order)
        .with_context(|| format!("Failed to build wavetable: {}", path.display()))?;

    let filename = path.file_name().unwrap_or_default().to_string_lossy();
    println!("Wavetable: {}", filename);
    println!("{}", "─".repeat(filename.len() + 11));
    println!();
    println!("Format: {:?}", store.flags());
    println!(
        "Table Length: {} samples (2^{})",
        store.table_length(),
        store.table_length_log2()
    );
    println!("Sample Step: {}", store.sample_step());
    println!(
        "Tables: {} ({} with silence)",
        store.table_count(),
        store.effective_table_count()
    );
    println!("Mip Levels: {}", store.mip_levels());
    println!(
        "Arena: {} samples ({} float + {} fixed)",
        group_digits(store.capacity()),
        arena_bytes(store.capacity(), 4),
        arena_bytes(store.capacity(), 2)
    );

    println!();
    println!("Tables:");
    for table in 0..store.table_count() {
        let (peak, rms) = store
            .float_table(table, 0)
            .map(table_stats)
            .unwrap_or_default();
        println!("  {:>4}: peak {:.4}  rms {:.4}", table, peak, rms);
    }

    Ok(())
}

/// Validate a wavetable file and report the result.
pub fn validate(path: &Path, order: ByteOrder) -> Result<()> {
    let data = read_file(path)?;
    let result = split_wavetable(&data, order)
        .and_then(|(header, payload)| validate_payload(&header, payload, order));

    match result {
        Ok(()) => {
            println!("✓ Valid wavetable: {}", path.display());
            Ok(())
        }
        Err(e) => {
            println!("✗ Invalid wavetable: {}", path.display());
            println!();
            println!("{}", e.detailed_message());
            Err(e.into())
        }
    }
}

/// Print the arena size needed for `count` tables of `length` samples.
pub fn plan(length: usize, count: usize) -> Result<()> {
    if length == 0 {
        bail!("Table length must be positive");
    }
    if !length.is_power_of_two() {
        bail!("Table length {} is not a power of two", length);
    }

    let Some(samples) = checked_required_size(length, count) else {
        bail!(
            "Arena for {} tables of {} samples overflows the addressable size",
            count,
            length
        );
    };
    println!("Table Length: {} samples", length);
    println!("Tables: {}", count);
    println!("Padding: {} samples per fixed-point table", INTERPOLATION_WINDOW);
    println!("Required Arena: {} samples", group_digits(samples));
    println!("  Float: {}", arena_bytes(samples, 4));
    println!("  Fixed: {}", arena_bytes(samples, 2));
    if samples > MAX_ARENA_SAMPLES {
        println!(
            "Warning: exceeds arena limit of {} samples",
            group_digits(MAX_ARENA_SAMPLES)
        );
    }

    Ok(())
}

/// Peak and RMS of one table.
fn table_stats(samples: &[f32]) -> (f32, f32) {
    let peak = samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    let rms = if samples.is_empty() {
        0.0
    } else {
        (sum_squares / samples.len() as f64).sqrt() as f32
    };
    (peak, rms)
}

/// Sample counts are printed with thousands separators: `35,000`.
fn group_digits(n: usize) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Memory taken by `samples` arena slots of `sample_bytes` each.
fn arena_bytes(samples: usize, sample_bytes: usize) -> String {
    const KIB: f64 = 1024.0;
    let bytes = samples as u128 * sample_bytes as u128;

    match bytes {
        0..=1023 => format!("{} B", bytes),
        1024..=1_048_575 => format!("{:.1} KB", bytes as f64 / KIB),
        _ => format!("{:.1} MB", bytes as f64 / (KIB * KIB)),
    }
}
