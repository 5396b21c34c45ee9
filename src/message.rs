//! Frame and message types exchanged with RobStride controllers

use std::f64::consts::PI;

use crate::core::{FaultFlags, MotorId, MotorMode, Opcode};
use crate::error::{Error, Result};

/// Maximum CAN payload length
pub const MAX_PAYLOAD: usize = 8;

/// A raw CAN frame as handed to and received from the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CanFrame {
    id: u32,
    extended: bool,
    len: u8,
    data: [u8; MAX_PAYLOAD],
}

impl CanFrame {
    /// Create a frame with a 29-bit identifier
    pub fn new_extended(id: u32, data: &[u8]) -> Result<Self> {
        if id > 0x1FFF_FFFF {
            return Err(Error::unrecognized(format!(
                "Identifier 0x{:X} exceeds 29 bits",
                id
            )));
        }
        Self::build(id, true, data)
    }

    /// Create a frame with an 11-bit identifier
    pub fn new_standard(id: u16, data: &[u8]) -> Result<Self> {
        if id > 0x7FF {
            return Err(Error::unrecognized(format!(
                "Identifier 0x{:X} exceeds 11 bits",
                id
            )));
        }
        Self::build(id as u32, false, data)
    }

    fn build(id: u32, extended: bool, data: &[u8]) -> Result<Self> {
        if data.len() > MAX_PAYLOAD {
            return Err(Error::PayloadTooLarge {
                len: data.len(),
                max: MAX_PAYLOAD,
            });
        }
        let mut buf = [0u8; MAX_PAYLOAD];
        buf[..data.len()].copy_from_slice(data);
        Ok(CanFrame {
            id,
            extended,
            len: data.len() as u8,
            data: buf,
        })
    }

    /// Raw identifier (11 or 29 bits)
    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    /// Payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data[..self.len as usize]
    }
}

impl std::fmt::Display for CanFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.extended {
            write!(f, "{:08X} [{}]", self.id, self.len)?;
        } else {
            write!(f, "{:03X} [{}]", self.id, self.len)?;
        }
        for byte in self.data() {
            write!(f, " {:02X}", byte)?;
        }
        Ok(())
    }
}

/// Logical command sent from the host to one motor
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    Enable,
    Disable,
    /// Ask for a feedback frame without changing state
    RequestFeedback,
    /// Make the current shaft position the mechanical zero
    SetZeroPosition,
    SetIdentifier { new_id: MotorId },
    ReadParam { address: u16 },
    /// `value` holds the little-endian wire bytes (at most 4)
    WriteParam { address: u16, value: Vec<u8> },
}

impl Command {
    /// Communication type the command is sent with
    pub fn opcode(&self) -> Opcode {
        match self {
            Command::Enable => Opcode::Enable,
            Command::Disable => Opcode::Disable,
            Command::RequestFeedback => Opcode::Feedback,
            Command::SetZeroPosition => Opcode::SetZeroPosition,
            Command::SetIdentifier { .. } => Opcode::SetIdentifier,
            Command::ReadParam { .. } => Opcode::ReadParam,
            Command::WriteParam { .. } => Opcode::WriteParam,
        }
    }

    /// Parameter address carried by ReadParam/WriteParam
    pub fn address(&self) -> Option<u16> {
        match self {
            Command::ReadParam { address } | Command::WriteParam { address, .. } => Some(*address),
            _ => None,
        }
    }
}

/// A command addressed from `host` to `target`
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CommandFrame {
    pub target: MotorId,
    pub host: MotorId,
    pub command: Command,
}

impl CommandFrame {
    /// Address `command` from `host` to `target`
    pub fn new(target: MotorId, host: MotorId, command: Command) -> Self {
        CommandFrame {
            target,
            host,
            command,
        }
    }

    /// Communication type of the wrapped command
    pub fn opcode(&self) -> Opcode {
        self.command.opcode()
    }
}

/// Velocity and torque ranges used to scale feedback frames.
///
/// Feedback carries each quantity as an unsigned 16-bit value spanning
/// `[-range / 2, range / 2]`; the span depends on the motor model.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorModel {
    /// Full velocity span in rad/s
    pub velocity_range: f64,
    /// Full torque span in N·m
    pub torque_range: f64,
}

impl MotorModel {
    /// ±44 rad/s, ±17 N·m
    pub const STANDARD: MotorModel = MotorModel {
        velocity_range: 88.0,
        torque_range: 34.0,
    };
    /// ±15 rad/s, ±120 N·m
    pub const HIGH_TORQUE: MotorModel = MotorModel {
        velocity_range: 30.0,
        torque_range: 240.0,
    };

    pub fn new(velocity_range: f64, torque_range: f64) -> Self {
        MotorModel {
            velocity_range,
            torque_range,
        }
    }
}

impl Default for MotorModel {
    fn default() -> Self {
        MotorModel::STANDARD
    }
}

/// Full angle span in feedback frames (±4π rad)
pub const ANGLE_RANGE: f64 = 8.0 * PI;
/// Temperature resolution in feedback frames (°C per unit)
pub const TEMPERATURE_SCALE: f64 = 0.1;

const U16_SPAN: f64 = u16::MAX as f64;

/// Map a raw 16-bit feedback field onto `[-range / 2, range / 2]`
pub(crate) fn from_span(raw: u16, range: f64) -> f64 {
    raw as f64 / U16_SPAN * range - range / 2.0
}

/// Inverse of [`from_span`], saturating at the ends of the span
pub(crate) fn to_span(value: f64, range: f64) -> u16 {
    ((value + range / 2.0) / range * U16_SPAN)
        .round()
        .clamp(0.0, U16_SPAN) as u16
}

/// Status snapshot reported by a motor
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeedbackFrame {
    pub source: MotorId,
    pub mode: MotorMode,
    /// Mechanical angle in rad
    pub angle: f64,
    /// Angular velocity in rad/s
    pub velocity: f64,
    /// Torque in N·m
    pub torque: f64,
    /// Winding temperature in °C
    pub temperature: f64,
    pub fault_flags: FaultFlags,
}

impl std::fmt::Display for FeedbackFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "motor {}: mode={} angle={:.4} rad velocity={:.4} rad/s torque={:.4} Nm temp={:.1} C faults={}",
            self.source,
            self.mode,
            self.angle,
            self.velocity,
            self.torque,
            self.temperature,
            self.fault_flags
        )
    }
}

/// Receiver field of unique-id frames answering an identifier change
pub const INFO_RECEIVER: u8 = 0xFE;

/// Fault and warning words from a fault report frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FaultReport {
    pub faults: u32,
    pub warnings: u32,
}

/// Which kind of response a frame carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseKind {
    Feedback,
    ParameterValue,
    DeviceInfo,
    FaultReport,
}

/// Payload of a decoded response
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ResponseBody {
    Feedback(FeedbackFrame),
    /// Echo of a parameter read; `raw` holds the four value bytes
    ParameterValue { address: u16, raw: [u8; 4] },
    /// MCU unique identifier, sent after an identifier change
    DeviceInfo { unique_id: [u8; 8] },
    FaultReport(FaultReport),
}

/// A frame received from a motor, decoded
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecodedResponse {
    /// Motor that sent the frame
    pub source: MotorId,
    /// Raw receiver field; normally the host id
    pub receiver: u8,
    pub body: ResponseBody,
}

impl DecodedResponse {
    pub fn kind(&self) -> ResponseKind {
        match self.body {
            ResponseBody::Feedback(_) => ResponseKind::Feedback,
            ResponseBody::ParameterValue { .. } => ResponseKind::ParameterValue,
            ResponseBody::DeviceInfo { .. } => ResponseKind::DeviceInfo,
            ResponseBody::FaultReport(_) => ResponseKind::FaultReport,
        }
    }

    pub fn feedback(&self) -> Option<&FeedbackFrame> {
        match &self.body {
            ResponseBody::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }
}
