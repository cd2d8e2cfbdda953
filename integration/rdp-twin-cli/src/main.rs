use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use log::info;
use rdp_commands::DisplayList;
use rdp_twin::{load_display_list, Rdp, RdpConfig};

#[derive(Parser)]
#[command(name = "rdp-twin")]
#[command(about = "Run and disassemble N64 RDP display lists on the digital twin", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress progress output (only show errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a raw display list and save the colour image as PNG
    Run {
        /// Big-endian display list file
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        out: PathBuf,

        /// RDRAM address the list is loaded at
        #[arg(long, default_value = "0x1000", value_parser = parse_address)]
        at: u32,

        /// Rows of the colour image to save
        #[arg(long, default_value = "240")]
        height: u32,

        /// Log every command as it executes
        #[arg(long)]
        trace: bool,
    },
    /// Print the display list in assembler syntax
    Disasm {
        /// Big-endian display list file
        input: PathBuf,
    },
}

fn parse_address(s: &str) -> Result<u32, String> {
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid address '{s}': {e}"))
}

/// End address of a `len`-byte list loaded at `at`.
fn list_end(at: u32, len: usize) -> anyhow::Result<u32> {
    u32::try_from(len)
        .ok()
        .and_then(|len| at.checked_add(len))
        .with_context(|| format!("{len} bytes at {at:#x} run past the address space"))
}

fn run(input: PathBuf, out: PathBuf, at: u32, height: u32, trace: bool) -> anyhow::Result<()> {
    let bytes = load_display_list(&input)
        .with_context(|| format!("reading display list {}", input.display()))?;
    if bytes.is_empty() {
        bail!("{} is empty", input.display());
    }

    let mut rdp = Rdp::new(RdpConfig {
        trace_commands: trace,
        ..RdpConfig::default()
    });
    rdp.init();
    rdp.rdram
        .load(at, &bytes)
        .with_context(|| format!("loading {} bytes at {at:#x}", bytes.len()))?;

    let end = list_end(at, bytes.len())?;
    rdp.submit(at, end)
        .with_context(|| format!("display list stopped at {:#x}", rdp.regs().current))?;

    if rdp.pipeline_crashed() {
        log::warn!("pipeline crashed; later primitives were skipped");
    }
    if rdp.take_interrupt() {
        info!("Sync_Full reached");
    }

    let image: image::RgbaImage = rdp.snapshot(height);
    image
        .save(&out)
        .with_context(|| format!("writing {}", out.display()))?;
    info!(
        "saved {}x{} colour image to {}",
        image.width(),
        image.height(),
        out.display()
    );
    Ok(())
}

fn disasm(input: PathBuf) -> anyhow::Result<()> {
    let bytes = load_display_list(&input)
        .with_context(|| format!("reading display list {}", input.display()))?;
    for item in DisplayList::new(&bytes) {
        let (offset, cmd) = item?;
        println!("{offset:06x}: {cmd}");
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (suppressed if --quiet)
    if !cli.quiet {
        let traced = matches!(cli.command, Commands::Run { trace: true, .. });
        let level = match cli.verbose {
            0 if traced => log::LevelFilter::Debug,
            0 => log::LevelFilter::Info,
            1 => log::LevelFilter::Debug,
            _ => log::LevelFilter::Trace,
        };
        env_logger::Builder::from_default_env()
            .filter_level(level)
            .init();
    }

    match cli.command {
        Commands::Run {
            input,
            out,
            at,
            height,
            trace,
        } => run(input, out, at, height, trace),
        Commands::Disasm { input } => disasm(input),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x1000"), Ok(0x1000));
        assert_eq!(parse_address("0X2A"), Ok(0x2A));
        assert_eq!(parse_address("4096"), Ok(4096));
        assert!(parse_address("0xZZ").is_err());
    }

    #[test]
    fn test_list_end() {
        assert_eq!(list_end(0x1000, 0x40).ok(), Some(0x1040));
        assert_eq!(list_end(u32::MAX - 7, 8).ok(), None);
        assert_eq!(list_end(0xFFFF_FFF8, 16).ok(), None);
    }
}
