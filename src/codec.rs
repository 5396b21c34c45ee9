//! Frame codec: the wire layout of every command and response
//!
//! All frames use a 29-bit extended identifier (see [`FrameId`]) and an
//! 8-byte payload:
//!
//! | opcode | direction | data area | payload |
//! |---|---|---|---|
//! | Enable (3), Disable (4) | host -> motor | 0 | zero |
//! | Feedback (2) | host -> motor | 0 | zero |
//! | SetZeroPosition (6) | host -> motor | 0 | `01 00 00 00 00 00 00 00` |
//! | SetIdentifier (7) | host -> motor | new id | zero |
//! | ReadParam (17) | host -> motor | 0 | `addr_lo addr_hi 00 00 00 00 00 00` |
//! | WriteParam (18) | host -> motor | 0 | `addr_lo addr_hi 00 00 v0 v1 v2 v3` |
//! | Feedback (2) | motor -> host | mode, faults | angle, velocity, torque, temp (u16 BE) |
//! | ReadParam (17) | motor -> host | 0 | `addr_lo addr_hi 00 00 v0 v1 v2 v3` |
//! | Info (0) | motor -> any | 0 | 8-byte unique id |
//! | FaultReport (21) | motor -> host | 0 | faults (u32 LE), warnings (u32 LE) |

use crate::core::{FaultFlags, FrameId, MotorId, MotorMode, Opcode};
use crate::error::{Error, Result};
use crate::message::{
    from_span, to_span, CanFrame, Command, CommandFrame, DecodedResponse, FaultReport,
    FeedbackFrame, MotorModel, ResponseBody, ANGLE_RANGE, MAX_PAYLOAD, TEMPERATURE_SCALE,
};

/// Bytes ahead of a parameter value: address (2) and reserved (2)
pub const PARAM_PREFIX: usize = 4;
/// Largest parameter value that fits one frame
pub const MAX_PARAM_VALUE: usize = MAX_PAYLOAD - PARAM_PREFIX;

/// Encoder/decoder for RobStride frames
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    /// Feedback scaling
    pub motor_model: MotorModel,
}

impl Codec {
    /// Create a new codec for the given motor model
    pub fn new(motor_model: MotorModel) -> Self {
        Codec { motor_model }
    }

    /// Encode a host command into a CAN frame
    pub fn encode(&self, frame: &CommandFrame) -> Result<CanFrame> {
        let target = MotorId::new(frame.target.value())?;
        let host = MotorId::new(frame.host.value())?;

        let mut id = FrameId::from_raw(0);
        id.set_opcode(frame.opcode().as_u8());
        id.set_sender(host.value());
        id.set_receiver(target.value());

        let mut data = [0u8; MAX_PAYLOAD];
        match &frame.command {
            Command::Enable | Command::Disable | Command::RequestFeedback => {}
            Command::SetZeroPosition => data[0] = 1,
            Command::SetIdentifier { new_id } => {
                id.set_data_area(MotorId::new(new_id.value())?.value());
            }
            Command::ReadParam { address } => {
                data[..2].copy_from_slice(&address.to_le_bytes());
            }
            Command::WriteParam { address, value } => {
                if value.len() > MAX_PARAM_VALUE {
                    return Err(Error::PayloadTooLarge {
                        len: value.len(),
                        max: MAX_PARAM_VALUE,
                    });
                }
                data[..2].copy_from_slice(&address.to_le_bytes());
                data[PARAM_PREFIX..PARAM_PREFIX + value.len()].copy_from_slice(value);
            }
        }

        CanFrame::new_extended(id.raw(), &data)
    }

    /// Decode a host command frame; the inverse of [`Codec::encode`]
    ///
    /// WriteParam values come back as the full four value bytes.
    pub fn decode_command(&self, frame: &CanFrame) -> Result<CommandFrame> {
        let id = extended_id(frame)?;
        let data = full_payload(frame)?;
        let target = identifier(id.receiver(), "target")?;
        let host = identifier(id.sender(), "host")?;

        let command = match Opcode::try_from(id.opcode())? {
            Opcode::Enable => Command::Enable,
            Opcode::Disable => Command::Disable,
            Opcode::Feedback => Command::RequestFeedback,
            Opcode::SetZeroPosition => Command::SetZeroPosition,
            Opcode::SetIdentifier => Command::SetIdentifier {
                new_id: identifier(id.data_area(), "new")?,
            },
            Opcode::ReadParam => Command::ReadParam {
                address: u16::from_le_bytes([data[0], data[1]]),
            },
            Opcode::WriteParam => Command::WriteParam {
                address: u16::from_le_bytes([data[0], data[1]]),
                value: data[PARAM_PREFIX..].to_vec(),
            },
            other => {
                return Err(Error::unrecognized(format!(
                    "{} is not a host command",
                    other
                )))
            }
        };

        Ok(CommandFrame {
            target,
            host,
            command,
        })
    }

    /// Decode a frame sent by a motor
    pub fn decode(&self, frame: &CanFrame) -> Result<DecodedResponse> {
        let id = extended_id(frame)?;
        let opcode = Opcode::try_from(id.opcode())?;
        let source = identifier(id.sender(), "source")?;
        let data = full_payload(frame)?;

        let body = match opcode {
            Opcode::Feedback => {
                let word = |i: usize| u16::from_be_bytes([data[i], data[i + 1]]);
                ResponseBody::Feedback(FeedbackFrame {
                    source,
                    mode: MotorMode::try_from(id.mode_bits())?,
                    angle: from_span(word(0), ANGLE_RANGE),
                    velocity: from_span(word(2), self.motor_model.velocity_range),
                    torque: from_span(word(4), self.motor_model.torque_range),
                    temperature: word(6) as f64 * TEMPERATURE_SCALE,
                    fault_flags: FaultFlags::from_bits_truncate(id.fault_bits()),
                })
            }
            Opcode::ReadParam => ResponseBody::ParameterValue {
                address: u16::from_le_bytes([data[0], data[1]]),
                raw: [data[4], data[5], data[6], data[7]],
            },
            Opcode::Info => ResponseBody::DeviceInfo { unique_id: data },
            Opcode::FaultReport => ResponseBody::FaultReport(FaultReport {
                faults: u32::from_le_bytes([data[0], data[1], data[2], data[3]]),
                warnings: u32::from_le_bytes([data[4], data[5], data[6], data[7]]),
            }),
            other => {
                return Err(Error::unrecognized(format!(
                    "{} frame from {} is not a response",
                    other, source
                )))
            }
        };

        Ok(DecodedResponse {
            source,
            receiver: id.receiver(),
            body,
        })
    }

    /// Encode a motor response; used to emulate controllers
    pub fn encode_response(&self, response: &DecodedResponse) -> Result<CanFrame> {
        let mut id = FrameId::from_raw(0);
        id.set_sender(MotorId::new(response.source.value())?.value());
        id.set_receiver(response.receiver);

        let mut data = [0u8; MAX_PAYLOAD];
        match &response.body {
            ResponseBody::Feedback(feedback) => {
                id.set_opcode(Opcode::Feedback.as_u8());
                id.set_fault_bits(feedback.fault_flags.bits());
                id.set_mode_bits(feedback.mode as u8);
                let words = [
                    to_span(feedback.angle, ANGLE_RANGE),
                    to_span(feedback.velocity, self.motor_model.velocity_range),
                    to_span(feedback.torque, self.motor_model.torque_range),
                    (feedback.temperature / TEMPERATURE_SCALE)
                        .round()
                        .clamp(0.0, u16::MAX as f64) as u16,
                ];
                for (chunk, word) in data.chunks_exact_mut(2).zip(words) {
                    chunk.copy_from_slice(&word.to_be_bytes());
                }
            }
            ResponseBody::ParameterValue { address, raw } => {
                id.set_opcode(Opcode::ReadParam.as_u8());
                data[..2].copy_from_slice(&address.to_le_bytes());
                data[PARAM_PREFIX..].copy_from_slice(raw);
            }
            ResponseBody::DeviceInfo { unique_id } => {
                id.set_opcode(Opcode::Info.as_u8());
                data = *unique_id;
            }
            ResponseBody::FaultReport(report) => {
                id.set_opcode(Opcode::FaultReport.as_u8());
                data[..4].copy_from_slice(&report.faults.to_le_bytes());
                data[4..].copy_from_slice(&report.warnings.to_le_bytes());
            }
        }

        CanFrame::new_extended(id.raw(), &data)
    }
}

fn extended_id(frame: &CanFrame) -> Result<FrameId> {
    if !frame.is_extended() {
        return Err(Error::unrecognized(format!(
            "standard identifier 0x{:03X}",
            frame.id()
        )));
    }
    Ok(FrameId::from_raw(frame.id()))
}

fn full_payload(frame: &CanFrame) -> Result<[u8; MAX_PAYLOAD]> {
    frame.data().try_into().map_err(|_| {
        Error::unrecognized(format!(
            "expected {} payload bytes, got {}",
            MAX_PAYLOAD,
            frame.data().len()
        ))
    })
}

fn identifier(raw: u8, role: &str) -> Result<MotorId> {
    MotorId::new(raw)
        .map_err(|_| Error::unrecognized(format!("{} identifier {} out of range", role, raw)))
}
