//! Call the hardware services directly, without the service manager.
//!
//! Services are built with the same configuration the host runtime uses.
use anyhow::Result;
use clap::{Parser, Subcommand};
use hal_services::{
    health::{ChargingControl, ChargingLimitInfo, IChargingControl},
    ir::{self, ConsumerIr, IConsumerIr, Lirc},
    powershare::{IPowerShare, PowerShare},
};
use log::debug;
use std::{io, path::PathBuf};

#[derive(Debug, Parser)]
#[command(name = "halctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Query and control sysfs-backed hardware services")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Battery charging control
    Charging {
        #[command(subcommand)]
        action: ChargingAction,
    },
    /// Consumer infrared
    Ir {
        /// LIRC device to transmit through
        #[arg(long, default_value = "/dev/lirc0")]
        device: PathBuf,

        /// Comma separated min,max pairs of supported carrier frequencies
        #[arg(long, default_value = "")]
        carrier_freqs: String,

        #[command(subcommand)]
        action: IrAction,
    },
    /// Power share
    Powershare {
        #[command(subcommand)]
        action: PowerShareAction,
    },
}

#[derive(Debug, Subcommand)]
enum ChargingAction {
    /// Whether charging is enabled
    Enabled,
    /// Enable or disable charging
    SetEnabled {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
    /// Charging deadline, in seconds
    Deadline,
    /// Set the charging deadline, in seconds
    SetDeadline {
        #[arg(allow_negative_numbers = true)]
        deadline: i64,
    },
    /// Charging limit
    Limit,
    /// Set the charging limit
    SetLimit { min: i32, max: i32 },
    /// Supported modes, as flags
    Mode,
    /// Diagnostics
    Dump,
}

#[derive(Debug, Subcommand)]
enum IrAction {
    /// Supported carrier frequency ranges
    Freqs,
    /// Transmit a pattern of alternating on and off microseconds
    Transmit {
        carrier_hz: i32,
        #[arg(value_delimiter = ',')]
        pattern: Vec<i32>,
    },
}

#[derive(Debug, Subcommand)]
enum PowerShareAction {
    /// Whether power share is enabled
    Enabled,
    /// Enable or disable power share
    SetEnabled {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

fn charging(action: ChargingAction) -> Result<()> {
    let control = ChargingControl::default();
    match action {
        ChargingAction::Enabled => println!("{}", control.get_charging_enabled()?),
        ChargingAction::SetEnabled { enabled } => control.set_charging_enabled(enabled)?,
        ChargingAction::Deadline => println!("{}", control.get_charging_deadline()?),
        ChargingAction::SetDeadline { deadline } => control.set_charging_deadline(deadline)?,
        ChargingAction::Limit => {
            let ChargingLimitInfo { min, max } = control.get_charging_limit()?;
            println!("{} {}", min, max);
        }
        ChargingAction::SetLimit { min, max } => {
            control.set_charging_limit(&ChargingLimitInfo { min, max })?
        }
        ChargingAction::Mode => println!("{}", control.get_supported_mode()?),
        ChargingAction::Dump => control.dump(&mut io::stdout().lock())?,
    }
    Ok(())
}

fn consumer_ir(device: PathBuf, carrier_freqs: &str, action: IrAction) -> Result<()> {
    let freqs = ir::parse_carrier_freqs(carrier_freqs);
    debug!("Carrier frequencies {:?}", freqs);
    let service = ConsumerIr::new(&freqs, Lirc::new(device));
    match action {
        IrAction::Freqs => {
            for range in service.get_carrier_freqs()? {
                println!("{} {}", range.min_hz, range.max_hz);
            }
        }
        IrAction::Transmit {
            carrier_hz,
            pattern,
        } => service.transmit(carrier_hz, &pattern)?,
    }
    Ok(())
}

fn powershare(action: PowerShareAction) -> Result<()> {
    let share = PowerShare::default();
    match action {
        PowerShareAction::Enabled => println!("{}", share.is_enabled()?),
        PowerShareAction::SetEnabled { enabled } => share.set_enabled(enabled)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Charging { action } => charging(action),
        Command::Ir {
            device,
            carrier_freqs,
            action,
        } => consumer_ir(device, &carrier_freqs, action),
        Command::Powershare { action } => powershare(action),
    }
}
