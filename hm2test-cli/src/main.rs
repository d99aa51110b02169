//! hm2test CLI - Bring up synthetic HostMot2 boards from the command line.
//!
//! Usage:
//!   hm2test --list                     # Show the pattern catalog
//!   hm2test --pattern 9                # Bring up one board with pattern 9
//!   hm2test --pattern 12 --dump        # Dump the decoded register image
//!   hm2test --manifest rig.json        # Bring up a multi-board rig

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hm2test_core::layout::{addr, field};
use hm2test_core::{
    load_manifest, start, stop, HeadlessRegistry, LowLevelIo, TestPattern, TestRig,
};

/// Synthetic HostMot2 board CLI
#[derive(Parser, Debug)]
#[command(name = "hm2test")]
#[command(about = "Bring up synthetic HostMot2 boards")]
struct Args {
    /// Test pattern ordinal (0-12)
    #[arg(short, long, default_value_t = 0)]
    pattern: u8,

    /// Configuration string passed through at registration
    #[arg(short, long, default_value = "")]
    config: String,

    /// Rig manifest (JSON); overrides --pattern and --config
    #[arg(short, long)]
    manifest: Option<PathBuf>,

    /// List the pattern catalog and exit
    #[arg(short, long)]
    list: bool,

    /// Dump the decoded register image before tearing down
    #[arg(short, long)]
    dump: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    if args.list {
        for pattern in TestPattern::ALL {
            println!("{:2}  {:<20} {}", pattern as u8, format!("{:?}", pattern), pattern.summary());
        }
        return Ok(());
    }

    let mut registry = HeadlessRegistry::new();

    if let Some(path) = &args.manifest {
        let manifest = match load_manifest(path) {
            Ok(manifest) => manifest,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                return Err(e.into());
            }
        };
        if let Some(name) = &manifest.name {
            eprintln!("Loaded manifest: {} ({} boards)", name, manifest.boards.len());
        }

        let mut rig = TestRig::from_manifest(&manifest)?;
        rig.register_all(&mut registry)?;
        eprintln!("Rig up: {} board(s) registered", registry.registered_names().len());

        if args.dump {
            for slot in rig.occupied_slots() {
                dump_board(rig.board(slot)?.as_ref());
            }
        }
        rig.shutdown(&mut registry);
        return Ok(());
    }

    let pattern = TestPattern::try_from(args.pattern)?;
    tracing::debug!(pattern = args.pattern, config = %args.config, "bringing up single-board rig");
    let rig = start(pattern, &args.config, &mut registry)?;
    eprintln!(
        "Board hm2_test.0 up with pattern {} ({})",
        args.pattern,
        pattern.summary()
    );

    if args.dump {
        dump_board(rig.board(0)?.as_ref());
    }
    stop(rig, &mut registry);
    Ok(())
}

/// Print the detection-relevant registers the way the consumer reads them.
fn dump_board(board: &dyn LowLevelIo) {
    let descriptor = board.descriptor();
    println!(
        "{} (connectors {:?}, fpga part {:?})",
        descriptor.name, descriptor.connector_names, descriptor.fpga_part_number
    );
    println!("  cookie        0x{:08X}", read_u32(board, addr::COOKIE));

    let mut name = [0u8; 8];
    if board.read(addr::CONFIG_NAME, &mut name).is_ok() {
        println!("  config name   {:?}", String::from_utf8_lossy(&name));
    }

    let idrom = read_u32(board, addr::IDROM_OFFSET);
    println!("  idrom offset  0x{:08X}", idrom);
    if idrom == 0 {
        return;
    }
    println!("  idrom type    {}", read_u32(board, idrom + field::IDROM_TYPE));
    println!("  io ports      {}", read_u32(board, idrom + field::IO_PORTS));
    println!("  io width      {}", read_u32(board, idrom + field::IO_WIDTH));
    println!("  port width    {}", read_u32(board, idrom + field::PORT_WIDTH));
    println!("  clock low     {}", read_u32(board, idrom + field::CLOCK_LOW));
    println!("  clock high    {}", read_u32(board, idrom + field::CLOCK_HIGH));
}

/// Read a 32-bit register, treating unreadable addresses as zero.
fn read_u32(board: &dyn LowLevelIo, addr: u32) -> u32 {
    let mut buf = [0u8; 4];
    match board.read(addr, &mut buf) {
        Ok(()) => u32::from_le_bytes(buf),
        Err(_) => 0,
    }
}
