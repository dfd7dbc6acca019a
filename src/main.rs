//! blockctl - retrieve information about block devices.
//!
//! Prints a device's size and, where the platform can decode it, its model,
//! serial number and firmware revision. Optionally dumps SMART attributes.

use anyhow::{bail, Context, Result};
use blockdev::smart::{attribute_name, checksum_valid};
use blockdev::{AccessMode, BlockDevice, Error, Identity, OpenFlags, SmartData, SmartHealth};
use clap::{ArgAction, Parser};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "blockctl")]
#[command(author, version, long_about = None)]
#[command(about = "Retrieve information about block devices")]
struct Cli {
    /// Block device to query (e.g. /dev/sda)
    device: PathBuf,

    /// Also read and print SMART attributes
    #[arg(long)]
    smart: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Open the device with O_DIRECT
    #[arg(long)]
    direct: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Everything gathered about one device.
#[derive(Serialize)]
struct Report {
    path: PathBuf,
    size: u64,
    identity: Option<Identity>,
    smart: Option<SmartReport>,
}

#[derive(Serialize)]
struct SmartReport {
    checksum_valid: bool,
    health: SmartHealth,
    data: SmartData,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let flags = OpenFlags::new(AccessMode::Read).direct(cli.direct);
    let mut dev = open_device(&cli.device, &flags)?;

    let report = collect(&dev, &cli);
    let closed = dev.close().context("failed to close device");
    let report = report?;
    closed?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    Ok(())
}

fn open_device(path: &Path, flags: &OpenFlags) -> Result<blockdev::Device> {
    match blockdev::open(path, flags) {
        Ok(dev) => Ok(dev),
        Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::PermissionDenied => bail!(
            "cannot open block device {}: {}. Try running with sudo.",
            path.display(),
            e
        ),
        Err(e) => {
            Err(e).with_context(|| format!("failed to open block device {:?}", path.display()))
        }
    }
}

fn collect(dev: &blockdev::Device, cli: &Cli) -> Result<Report> {
    let size = dev.size().context("failed to get device size")?;

    // Identification can only be decoded on some platforms.
    let caps = dev.capabilities();
    let identity = if caps.identify_decode {
        let raw = dev.identify().context("failed to identify device")?;
        caps.parse_id(&raw)
    } else {
        None
    };

    let smart = if cli.smart {
        let data = dev.read_smart().context("failed to read SMART data")?;
        Some(SmartReport {
            checksum_valid: checksum_valid(&data.to_bytes()),
            health: data.health(),
            data,
        })
    } else {
        None
    };

    Ok(Report {
        path: cli.device.clone(),
        size,
        identity,
        smart,
    })
}

fn print_report(report: &Report) {
    match &report.identity {
        Some(id) => println!(
            "{}: {}, model: {:?}, serial: {:?}, firmware: {:?}",
            report.path.display(),
            human_bytes(report.size),
            id.model,
            id.serial,
            id.firmware
        ),
        None => println!("{}: {}", report.path.display(), human_bytes(report.size)),
    }

    if let Some(smart) = &report.smart {
        print_smart(smart);
    }
}

fn print_smart(smart: &SmartReport) {
    let data = &smart.data;
    println!();
    println!(
        "SMART revision {}, checksum {}",
        data.revision,
        if smart.checksum_valid { "ok" } else { "BAD" }
    );
    println!(
        "{:>3} {:<24} {:<6} {:>5} {:>5} {:>12}  {}",
        "ID", "ATTRIBUTE_NAME", "FLAGS", "VALUE", "WORST", "RAW_VALUE", "VENDOR"
    );
    for attr in data.attributes() {
        println!(
            "{:>3} {:<24} {:#06x} {:>5} {:>5} {:>12}  {}",
            attr.id,
            attribute_name(attr.id).unwrap_or("Unknown_Attribute"),
            attr.status,
            attr.value,
            attr.worst(),
            attr.raw(),
            hex::encode(attr.vendor)
        );
    }

    let health = &smart.health;
    let print_opt = |name: &str, val: Option<u64>| {
        let val = val.map_or("N/A".to_string(), |v| v.to_string());
        println!("  {:<22}: {}", name, val);
    };

    println!();
    println!("Health summary:");
    print_opt("Temperature (Celsius)", health.temperature_celsius);
    print_opt("Power On Hours", health.power_on_hours);
    print_opt("Power Cycles", health.power_cycles);
    print_opt("Reallocated Sectors", health.reallocated_sectors);
}

/// Format a byte count with SI units, e.g. `83 MB`.
fn human_bytes(size: u64) -> String {
    const UNITS: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

    if size < 10 {
        return format!("{} B", size);
    }

    let mut exp = 0;
    let mut div = 1u64;
    while exp + 1 < UNITS.len() && size / div >= 1000 {
        div *= 1000;
        exp += 1;
    }

    let val = (size as f64 / div as f64 * 10.0 + 0.5).floor() / 10.0;
    if val < 10.0 {
        format!("{:.1} {}", val, UNITS[exp])
    } else {
        format!("{:.0} {}", val, UNITS[exp])
    }
}

/// Minimal logger writing to stderr.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_human_bytes() {
        assert_eq!(human_bytes(0), "0 B");
        assert_eq!(human_bytes(9), "9 B");
        assert_eq!(human_bytes(999), "999 B");
        assert_eq!(human_bytes(1000), "1.0 kB");
        assert_eq!(human_bytes(82_854_982), "83 MB");
        assert_eq!(human_bytes(500_107_862_016), "500 GB");
        assert_eq!(human_bytes(u64::MAX), "18 EB");
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["blockctl", "--smart", "-vv", "/dev/sda"]).unwrap();
        assert_eq!(cli.device, PathBuf::from("/dev/sda"));
        assert!(cli.smart);
        assert!(!cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_requires_device() {
        assert!(Cli::try_parse_from(["blockctl"]).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = Report {
            path: PathBuf::from("/dev/sda"),
            size: 1024,
            identity: Some(Identity {
                model: "foo".to_string(),
                ..Default::default()
            }),
            smart: None,
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"model\":\"foo\""));
        assert!(json.contains("\"smart\":null"));
    }
}
