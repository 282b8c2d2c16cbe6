//! famicore command-line runner.
//!
//! Usage:
//!   famicore <rom.nes> [--ticks N] [--trace] [--vector] [--paused]
//!                      [--per-tick N] [--dump-ram FILE] [--dump-rom FILE] [--window]
//!
//! Headless by default: boots the ROM, runs N host ticks (default 1000) and
//! prints the final CPU state. `--paused` boots paused and single-steps
//! instead of ticking.

use std::env;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result, bail};
use famicore::{Console, ConsoleConfig, ConsoleLog, EntryPoint, RunState};

const DEFAULT_TICKS: u64 = 1000;

#[derive(Debug, Default)]
struct Args {
    rom: PathBuf,
    ticks: Option<u64>,
    trace: bool,
    vector: bool,
    paused: bool,
    per_tick: Option<u32>,
    dump_ram: Option<PathBuf>,
    dump_rom: Option<PathBuf>,
    window: bool,
}

fn usage() -> &'static str {
    "usage: famicore <rom.nes> [--ticks N] [--trace] [--vector] [--paused] \
     [--per-tick N] [--dump-ram FILE] [--dump-rom FILE] [--window]"
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut rom = None;
    let mut it = env::args().skip(1);

    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--ticks" => {
                let v = it.next().context("--ticks needs a value")?;
                args.ticks = Some(v.parse().with_context(|| format!("bad --ticks value {v:?}"))?);
            }
            "--per-tick" => {
                let v = it.next().context("--per-tick needs a value")?;
                args.per_tick =
                    Some(v.parse().with_context(|| format!("bad --per-tick value {v:?}"))?);
            }
            "--dump-ram" => args.dump_ram = Some(it.next().context("--dump-ram needs a path")?.into()),
            "--dump-rom" => args.dump_rom = Some(it.next().context("--dump-rom needs a path")?.into()),
            "--trace" => args.trace = true,
            "--vector" => args.vector = true,
            "--paused" => args.paused = true,
            "--window" => args.window = true,
            "-h" | "--help" => {
                println!("{}", usage());
                std::process::exit(0);
            }
            other if other.starts_with("--") => bail!("unknown option {other}\n{}", usage()),
            other => {
                if rom.replace(PathBuf::from(other)).is_some() {
                    bail!("more than one ROM given\n{}", usage());
                }
            }
        }
    }

    args.rom = rom.with_context(|| format!("missing ROM path\n{}", usage()))?;
    Ok(args)
}

fn flush_log(log: &ConsoleLog) {
    for entry in log.drain() {
        eprintln!("{entry}");
    }
}

fn main() -> Result<()> {
    let args = parse_args()?;

    let mut config = ConsoleConfig {
        start_paused: args.paused,
        ..ConsoleConfig::default()
    };
    if args.vector {
        config.entry_point = EntryPoint::ResetVector;
    }
    if let Some(n) = args.per_tick {
        config.instructions_per_tick = n;
    }

    let log = Rc::new(ConsoleLog::new(config.log_capacity));
    let mut console = Console::with_logger(log.clone(), config);

    let started = console.start(&args.rom);
    flush_log(&log);
    started.with_context(|| format!("booting {}", args.rom.display()))?;

    if args.window {
        return run_window(console, log);
    }

    let ticks = args.ticks.unwrap_or(DEFAULT_TICKS);
    for _ in 0..ticks {
        if console.should_exit() {
            break;
        }
        match console.state() {
            RunState::Running => {
                console.tick();
            }
            _ => {
                console.step();
            }
        }
        if args.trace {
            println!("{}", console.snapshot());
        }
    }
    flush_log(&log);

    let snap = console.snapshot();
    println!("state:        {}", console.state_name());
    println!("instructions: {}", console.instructions());
    println!("cycles:       {}", console.cycles());
    println!("last:         {snap}");
    println!("PC: ${:04X}  flags: {}", snap.pc, snap.flags_string());

    dump_memory(&console, args.dump_ram.as_deref(), args.dump_rom.as_deref())
}

#[cfg(feature = "display")]
fn run_window(console: Console, log: Rc<ConsoleLog>) -> Result<()> {
    famicore::display::run(console, log)
}

#[cfg(not(feature = "display"))]
fn run_window(_console: Console, _log: Rc<ConsoleLog>) -> Result<()> {
    bail!("--window requires building with the `display` feature")
}

#[cfg(feature = "screenshot")]
fn dump_memory(
    console: &Console,
    ram: Option<&std::path::Path>,
    rom: Option<&std::path::Path>,
) -> Result<()> {
    if let Some(path) = ram {
        famicore::inspect::dump_ram_png(console.bus(), path)
            .with_context(|| format!("writing RAM dump {}", path.display()))?;
    }
    if let Some(path) = rom {
        famicore::inspect::dump_rom_png(console.bus(), path)
            .with_context(|| format!("writing ROM dump {}", path.display()))?;
    }
    Ok(())
}

#[cfg(not(feature = "screenshot"))]
fn dump_memory(
    _console: &Console,
    ram: Option<&std::path::Path>,
    rom: Option<&std::path::Path>,
) -> Result<()> {
    if ram.is_some() || rom.is_some() {
        bail!("--dump-ram/--dump-rom require building with the `screenshot` feature");
    }
    Ok(())
}
