use std::process::ExitCode;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use robstride::command::{execute, Request};
use robstride::params::ParameterTable;
use robstride::{ClientBuilder, MotorModel, SocketCanTransport};

/// Talk to RobStride motor controllers over SocketCAN
#[derive(Debug, Parser)]
#[command(name = "robstride", version)]
struct Cli {
    /// CAN interface to use
    #[arg(long, env = "ROBSTRIDE_CHANNEL", default_value = "can0")]
    channel: String,

    /// Identifier the host uses on the bus
    #[arg(long, env = "ROBSTRIDE_HOST_ID", default_value_t = 0xAA)]
    host_id: u8,

    /// Response timeout in milliseconds
    #[arg(long, env = "ROBSTRIDE_TIMEOUT_MS", default_value_t = 2000)]
    timeout_ms: u64,

    /// Motor model, selects feedback scaling
    #[arg(long, env = "ROBSTRIDE_MOTOR_MODEL", value_enum, default_value_t = Model::Standard)]
    motor_model: Model,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Model {
    Standard,
    HighTorque,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Enable a motor
    Enable { id: i64 },
    /// Disable a motor
    Disable { id: i64 },
    /// Request a feedback frame
    Feedback { id: i64 },
    /// Set the current position as mechanical zero
    Zero { id: i64 },
    /// Read a parameter
    Read {
        id: i64,
        /// Parameter name or hex address such as 0x7019
        param: String,
    },
    /// Write a parameter
    Write {
        id: i64,
        /// Parameter name or hex address such as 0x7005
        param: String,
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },
    /// Change a motor's identifier
    UpdateId { old: i64, new: i64 },
    /// List known parameters
    Params,
}

impl Cmd {
    fn request(&self) -> Option<Request> {
        let request = match self {
            Cmd::Enable { id } => Request::Enable { id: *id },
            Cmd::Disable { id } => Request::Disable { id: *id },
            Cmd::Feedback { id } => Request::Feedback { id: *id },
            Cmd::Zero { id } => Request::Zero { id: *id },
            Cmd::Read { id, param } => Request::Read {
                id: *id,
                param: param.clone(),
            },
            Cmd::Write { id, param, value } => Request::Write {
                id: *id,
                param: param.clone(),
                value: *value,
            },
            Cmd::UpdateId { old, new } => Request::UpdateId {
                old: *old,
                new: *new,
            },
            Cmd::Params => return None,
        };
        Some(request)
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Some(request) = cli.command.request() else {
        for spec in ParameterTable::robstride().iter() {
            println!("{}", spec);
        }
        return Ok(ExitCode::SUCCESS);
    };

    let motor_model = match cli.motor_model {
        Model::Standard => MotorModel::STANDARD,
        Model::HighTorque => MotorModel::HIGH_TORQUE,
    };
    let transport = SocketCanTransport::open(&cli.channel)
        .with_context(|| format!("failed to open CAN interface {}", cli.channel))?;
    let mut client = ClientBuilder::new()
        .with_host_id(cli.host_id)?
        .with_timeout(Duration::from_millis(cli.timeout_ms))
        .with_motor_model(motor_model)
        .build(transport);

    match execute(&mut client, &request) {
        Ok(outcome) => {
            println!("{}", outcome);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("error[{}]: {}", err.kind(), err);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("robstride=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
