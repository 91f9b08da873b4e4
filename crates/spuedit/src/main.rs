//! spuedit - replay pad scripts against the SPU envelope editor
//!
//! Usage: spuedit [OPTIONS] [SCRIPT]...

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use psx_spu::editor::Event;
use psx_spu::session::{Session, SessionConfig};
use psx_spu::sim::SimBus;
use psx_spu::wait::{Bounded, Spin, Wait};
use psx_spu::waveform;
use spuedit::{report, script};
use std::fs;
use std::path::PathBuf;
use std::process;
use tracing::Level;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(ClapParser, Debug)]
#[command(name = "spuedit")]
#[command(author = "PSX-SPU Tools Team")]
#[command(version = "0.1.0")]
#[command(about = "Replay pad scripts against the PlayStation SPU envelope editor", long_about = None)]
struct Args {
    /// Script steps, e.g. `down right*3 cross release:cross circle`
    script: Vec<String>,

    /// Read additional script steps from a file
    #[arg(short = 'f', long)]
    script_file: Option<PathBuf>,

    /// ADPCM sample to upload (up to two; replaces the built-in waveforms)
    #[arg(short, long = "sample")]
    samples: Vec<PathBuf>,

    /// Master volume, 16.16 fixed point
    #[arg(long, default_value_t = SessionConfig::default().master_volume)]
    master_volume: u32,

    /// Voice volume before master scaling
    #[arg(long, default_value_t = SessionConfig::default().voice_volume)]
    voice_volume: u32,

    /// Voice pitch word (0x1000 = 44.1 kHz)
    #[arg(long, value_parser = parse_number::<u16>, default_value = "0x800")]
    sample_rate: u16,

    /// Sound RAM address of the first sample
    #[arg(long, value_parser = parse_number::<u32>, default_value = "0x1010")]
    sample_address: u32,

    /// Loop address (defaults to the first sample)
    #[arg(long, value_parser = parse_number::<u32>)]
    repeat_address: Option<u32>,

    /// Give up on SPU handshakes after this many polls
    #[arg(long)]
    poll_limit: Option<u32>,

    /// Print the parameter table after every event
    #[arg(long)]
    every_frame: bool,

    /// Print the voice and global registers at the end
    #[arg(long)]
    dump_registers: bool,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Decimal or `0x`-prefixed hexadecimal
fn parse_number<T>(text: &str) -> Result<T, String>
where
    T: TryFrom<u64>,
{
    let value = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => text.parse::<u64>(),
    }
    .map_err(|e| e.to_string())?;
    T::try_from(value).map_err(|_| format!("{text} is out of range"))
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .compact()
        .finish()
        .init();
}

fn main() {
    let args = Args::parse();
    setup_logging(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut events = script::parse_steps(args.script.iter().map(String::as_str))?;
    if let Some(path) = &args.script_file {
        let source = fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        events.extend(script::parse_source(&source)?);
    }

    if args.samples.len() > 2 {
        bail!("at most two samples can be uploaded, got {}", args.samples.len());
    }
    let samples = args
        .samples
        .iter()
        .map(|path| fs::read(path).with_context(|| format!("reading sample {}", path.display())))
        .collect::<Result<Vec<_>>>()?;
    let waveforms: Vec<&[u8]> = if samples.is_empty() {
        waveform::BUILTIN.to_vec()
    } else {
        samples.iter().map(Vec::as_slice).collect()
    };

    let config = SessionConfig {
        master_volume: args.master_volume,
        voice_volume: args.voice_volume,
        sample_rate: args.sample_rate,
        sample_address: args.sample_address,
        repeat_address: args.repeat_address,
        ..Default::default()
    };

    match args.poll_limit {
        Some(limit) => replay(args, Bounded::new(limit), config, &waveforms, &events),
        None => replay(args, Spin, config, &waveforms, &events),
    }
}

fn replay<W: Wait>(
    args: &Args,
    wait: W,
    config: SessionConfig,
    waveforms: &[&[u8]],
    events: &[Event],
) -> Result<()> {
    let mut session = Session::boot(SimBus::new(), wait, config, waveforms)
        .context("booting the SPU")?;

    for (step, event) in events.iter().enumerate() {
        let action = session
            .handle(*event)
            .with_context(|| format!("handling event {}", step + 1))?;
        tracing::info!(step = step + 1, ?event, ?action, "handled");

        if args.every_frame {
            println!("-- frame {} --", step + 1);
            print!("{}", report::render_frame(&session.frame()));
        }
    }

    if !args.every_frame || events.is_empty() {
        print!("{}", report::render_frame(&session.frame()));
    }
    println!();
    print!("{}", report::summary(&session));

    if args.dump_registers {
        println!();
        print!("{}", report::register_dump(session.spu().bus(), session.editor().voice()));
    }

    Ok(())
}
