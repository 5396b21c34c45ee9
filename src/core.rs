//! Core identifier and status types for the RobStride CAN protocol

use bitfield::bitfield;
use bitflags::bitflags;

use crate::error::{Error, Result};

/// Bus-level identifier of a motor controller or of the host (1-254)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MotorId(u8);

impl MotorId {
    /// Minimum identifier value (1)
    pub const MIN: u8 = 1;
    /// Maximum identifier value (254)
    pub const MAX: u8 = 254;
    /// Host identifier used when none is configured
    pub const DEFAULT_HOST: MotorId = MotorId(0xAA);

    /// Create a new identifier, validating it's within range [1, 254]
    pub fn new(id: u8) -> Result<Self> {
        if !(Self::MIN..=Self::MAX).contains(&id) {
            return Err(Error::InvalidIdentifier(id as i64));
        }
        Ok(MotorId(id))
    }

    /// Get the raw identifier value
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MotorId {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        let id = u8::try_from(value).map_err(|_| Error::InvalidIdentifier(value))?;
        MotorId::new(id)
    }
}

impl std::fmt::Display for MotorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Communication type carried in bits 28-24 of the extended identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Opcode {
    /// Device info / unique id (response to SetIdentifier)
    Info = 0,
    /// Status feedback; sent by the host it requests a feedback frame
    Feedback = 2,
    /// Enable the motor
    Enable = 3,
    /// Disable (stop) the motor
    Disable = 4,
    /// Set the current position as mechanical zero
    SetZeroPosition = 6,
    /// Change the motor's bus identifier
    SetIdentifier = 7,
    /// Read a single parameter
    ReadParam = 17,
    /// Write a single parameter
    WriteParam = 18,
    /// Fault and warning report
    FaultReport = 21,
}

impl Opcode {
    /// Raw 5-bit communication type
    pub fn as_u8(&self) -> u8 {
        *self as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Opcode::Info),
            2 => Ok(Opcode::Feedback),
            3 => Ok(Opcode::Enable),
            4 => Ok(Opcode::Disable),
            6 => Ok(Opcode::SetZeroPosition),
            7 => Ok(Opcode::SetIdentifier),
            17 => Ok(Opcode::ReadParam),
            18 => Ok(Opcode::WriteParam),
            21 => Ok(Opcode::FaultReport),
            _ => Err(Error::unrecognized(format!(
                "Unknown communication type: {}",
                value
            ))),
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opcode::Info => write!(f, "Info"),
            Opcode::Feedback => write!(f, "Feedback"),
            Opcode::Enable => write!(f, "Enable"),
            Opcode::Disable => write!(f, "Disable"),
            Opcode::SetZeroPosition => write!(f, "SetZeroPosition"),
            Opcode::SetIdentifier => write!(f, "SetIdentifier"),
            Opcode::ReadParam => write!(f, "ReadParam"),
            Opcode::WriteParam => write!(f, "WriteParam"),
            Opcode::FaultReport => write!(f, "FaultReport"),
        }
    }
}

bitfield! {
    /// 29-bit extended CAN identifier as laid out by the controller
    ///
    /// - Bits 28-24: communication type
    /// - Bits 23-16: data area (new id, or fault bits and mode in feedback)
    /// - Bits 15-8: sender (host on commands, motor on responses)
    /// - Bits 7-0: receiver (motor on commands, host on responses)
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct FrameId(u32);
    impl Debug;
    pub u8, opcode, set_opcode: 28, 24;
    pub u8, data_area, set_data_area: 23, 16;
    pub u8, fault_bits, set_fault_bits: 21, 16;
    pub u8, mode_bits, set_mode_bits: 23, 22;
    pub u8, sender, set_sender: 15, 8;
    pub u8, receiver, set_receiver: 7, 0;
}

impl FrameId {
    /// Largest value an extended identifier can hold
    pub const MAX_RAW: u32 = 0x1FFF_FFFF;

    /// Wrap a raw identifier, masking it to 29 bits
    pub fn from_raw(raw: u32) -> Self {
        FrameId(raw & Self::MAX_RAW)
    }

    /// Raw 29-bit identifier
    pub fn raw(&self) -> u32 {
        self.0
    }
}

/// Controller state reported in bits 23-22 of a feedback identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotorMode {
    Reset = 0,
    Calibration = 1,
    Run = 2,
}

impl TryFrom<u8> for MotorMode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(MotorMode::Reset),
            1 => Ok(MotorMode::Calibration),
            2 => Ok(MotorMode::Run),
            _ => Err(Error::unrecognized(format!("Unknown motor mode: {}", value))),
        }
    }
}

impl std::fmt::Display for MotorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MotorMode::Reset => write!(f, "reset"),
            MotorMode::Calibration => write!(f, "calibration"),
            MotorMode::Run => write!(f, "run"),
        }
    }
}

/// Value of the `run_mode` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RunMode {
    Operation = 0,
    Position = 1,
    Speed = 2,
    Current = 3,
}

impl TryFrom<i64> for RunMode {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(RunMode::Operation),
            1 => Ok(RunMode::Position),
            2 => Ok(RunMode::Speed),
            3 => Ok(RunMode::Current),
            _ => Err(Error::out_of_range(format!("Unknown run mode: {}", value))),
        }
    }
}

bitflags! {
    /// Fault bits reported in a feedback frame (bits 21-16 of its identifier)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct FaultFlags: u8 {
        const UNDERVOLTAGE = 1;
        const OVERCURRENT = 1 << 1;
        const OVERTEMPERATURE = 1 << 2;
        const MAGNETIC_ENCODER = 1 << 3;
        const HALL_ENCODER = 1 << 4;
        const UNCALIBRATED = 1 << 5;
    }
}

impl FaultFlags {
    /// Names of the set flags in kebab case, lowest bit first
    pub fn names(&self) -> Vec<String> {
        self.iter_names()
            .map(|(name, _)| name.to_ascii_lowercase().replace('_', "-"))
            .collect()
    }
}

impl std::fmt::Display for FaultFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return write!(f, "none");
        }
        write!(f, "{} (0x{:02X})", self.names().join(", "), self.bits())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motor_id_creation() {
        assert!(MotorId::new(1).is_ok());
        assert!(MotorId::new(254).is_ok());
        assert_eq!(MotorId::new(0), Err(Error::InvalidIdentifier(0)));
        assert_eq!(MotorId::new(255), Err(Error::InvalidIdentifier(255)));
    }

    #[test]
    fn test_motor_id_from_wide_integer() {
        assert_eq!(MotorId::try_from(127i64).map(|id| id.value()), Ok(127));
        assert_eq!(MotorId::try_from(300i64), Err(Error::InvalidIdentifier(300)));
        assert_eq!(MotorId::try_from(-1i64), Err(Error::InvalidIdentifier(-1)));
    }

    #[test]
    fn test_opcode_conversion() {
        let op: Opcode = 17u8.try_into().unwrap();
        assert_eq!(op, Opcode::ReadParam);
        assert_eq!(Opcode::WriteParam.as_u8(), 18);

        let result: Result<Opcode> = 9u8.try_into();
        assert!(matches!(result, Err(Error::UnrecognizedFrame(_))));
    }

    #[test]
    fn test_frame_id_layout() {
        let mut id = FrameId::from_raw(0);
        id.set_opcode(Opcode::SetIdentifier.as_u8());
        id.set_data_area(0x01);
        id.set_sender(0xAA);
        id.set_receiver(0x7F);
        assert_eq!(id.raw(), 0x0701_AA7F);

        let fb = FrameId::from_raw(0x0285_7FAA);
        assert_eq!(fb.opcode(), 2);
        assert_eq!(fb.mode_bits(), 2);
        assert_eq!(fb.fault_bits(), 0x05);
        assert_eq!(fb.sender(), 0x7F);
        assert_eq!(fb.receiver(), 0xAA);
    }

    #[test]
    fn test_fault_flags() {
        let flags = FaultFlags::from_bits_truncate(0xFF);
        assert_eq!(flags.bits(), 0x3F);
        assert_eq!(flags, FaultFlags::all());
        assert_eq!(flags.names().len(), 6);
        assert!(flags.contains(FaultFlags::HALL_ENCODER));
        assert_eq!(FaultFlags::empty().to_string(), "none");

        let flags = FaultFlags::UNDERVOLTAGE | FaultFlags::OVERCURRENT;
        assert_eq!(flags.names(), vec!["undervoltage", "overcurrent"]);
        assert_eq!(flags.to_string(), "undervoltage, overcurrent (0x03)");
    }

    #[test]
    fn test_run_mode_conversion() {
        assert_eq!(RunMode::try_from(2), Ok(RunMode::Speed));
        assert!(RunMode::try_from(4).is_err());
    }
}
