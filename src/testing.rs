//! Simulated controllers for exercising the client without hardware

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use crate::codec::Codec;
use crate::core::{FaultFlags, MotorId, MotorMode};
use crate::message::{
    CanFrame, Command, CommandFrame, DecodedResponse, FeedbackFrame, ResponseBody,
    INFO_RECEIVER,
};
use crate::transport::{Transport, TransportError};

#[derive(Debug, Clone)]
struct SimMotor {
    id: MotorId,
    mode: MotorMode,
    angle: f64,
    faults: FaultFlags,
    params: HashMap<u16, [u8; 4]>,
}

impl SimMotor {
    fn new(id: MotorId) -> Self {
        SimMotor {
            id,
            mode: MotorMode::Reset,
            angle: 0.25,
            faults: FaultFlags::empty(),
            params: HashMap::new(),
        }
    }

    fn feedback(&self, host: MotorId) -> DecodedResponse {
        DecodedResponse {
            source: self.id,
            receiver: host.value(),
            body: ResponseBody::Feedback(FeedbackFrame {
                source: self.id,
                mode: self.mode,
                angle: self.angle,
                velocity: 0.0,
                torque: 0.0,
                temperature: 28.5,
                fault_flags: self.faults,
            }),
        }
    }
}

/// In-memory bus: records every frame sent and answers like real controllers
pub(crate) struct SimBus {
    codec: Codec,
    motors: HashMap<MotorId, SimMotor>,
    inbox: VecDeque<CanFrame>,
    send_error: Option<String>,
    pub sent: Vec<CanFrame>,
}

impl SimBus {
    pub fn new() -> Self {
        SimBus {
            codec: Codec::default(),
            motors: HashMap::new(),
            inbox: VecDeque::new(),
            send_error: None,
            sent: Vec::new(),
        }
    }

    /// Attach a controller answering to `id`
    pub fn with_motor(mut self, id: u8) -> Self {
        let id = MotorId::new(id).unwrap();
        self.motors.insert(id, SimMotor::new(id));
        self
    }

    pub fn set_param(&mut self, id: u8, address: u16, raw: [u8; 4]) {
        self.motor_mut(id).params.insert(address, raw);
    }

    pub fn set_faults(&mut self, id: u8, faults: FaultFlags) {
        self.motor_mut(id).faults = faults;
    }

    /// Make every send fail
    pub fn fail_sends(&mut self, msg: &str) {
        self.send_error = Some(msg.to_string());
    }

    /// Queue a raw inbound frame
    pub fn inject(&mut self, frame: CanFrame) {
        self.inbox.push_back(frame);
    }

    /// Queue a feedback frame the motor sends on its own
    pub fn broadcast_feedback(&mut self, id: u8) {
        let response = self.motor_mut(id).feedback(MotorId::DEFAULT_HOST);
        self.respond(&response);
    }

    fn motor_mut(&mut self, id: u8) -> &mut SimMotor {
        let id = MotorId::new(id).unwrap();
        self.motors.get_mut(&id).expect("no simulated motor with this id")
    }

    fn respond(&mut self, response: &DecodedResponse) {
        let frame = self.codec.encode_response(response).unwrap();
        self.inbox.push_back(frame);
    }

    fn handle(&mut self, frame: CommandFrame) {
        let CommandFrame {
            target,
            host,
            command,
        } = frame;
        let Some(motor) = self.motors.get_mut(&target) else {
            return;
        };

        let response = match command {
            Command::Enable => {
                motor.mode = MotorMode::Run;
                motor.feedback(host)
            }
            Command::Disable => {
                motor.mode = MotorMode::Reset;
                motor.feedback(host)
            }
            Command::RequestFeedback => motor.feedback(host),
            Command::SetZeroPosition => {
                motor.angle = 0.0;
                motor.feedback(host)
            }
            Command::ReadParam { address } => DecodedResponse {
                source: motor.id,
                receiver: host.value(),
                body: ResponseBody::ParameterValue {
                    address,
                    raw: motor.params.get(&address).copied().unwrap_or_default(),
                },
            },
            Command::WriteParam { address, value } => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&value);
                motor.params.insert(address, raw);
                motor.feedback(host)
            }
            Command::SetIdentifier { new_id } => {
                let mut moved = self.motors.remove(&target).unwrap();
                moved.id = new_id;
                self.motors.insert(new_id, moved);
                DecodedResponse {
                    source: new_id,
                    receiver: INFO_RECEIVER,
                    body: ResponseBody::DeviceInfo {
                        unique_id: [0x5A; 8],
                    },
                }
            }
        };
        self.respond(&response);
    }
}

impl Transport for SimBus {
    fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError> {
        if let Some(msg) = &self.send_error {
            return Err(TransportError::Failed(msg.clone()));
        }
        self.sent.push(*frame);
        if let Ok(command) = self.codec.decode_command(frame) {
            self.handle(command);
        }
        Ok(())
    }

    fn receive(&mut self, _timeout: Duration) -> Result<CanFrame, TransportError> {
        self.inbox.pop_front().ok_or(TransportError::Timeout)
    }
}
