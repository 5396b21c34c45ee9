//! High-level client for RobStride controllers sharing one CAN bus

use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::codec::Codec;
use crate::core::{MotorId, RunMode};
use crate::error::{Error, Result};
use crate::message::{
    Command, CommandFrame, DecodedResponse, FeedbackFrame, MotorModel, ResponseBody,
    INFO_RECEIVER,
};
use crate::params::{decode_value, encode_value, ParameterSpec, ParameterTable};
use crate::session::{MotorSession, SessionTable};
use crate::transport::{Transport, TransportError};

/// Client settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClientConfig {
    /// Identifier the host uses on the bus
    pub host_id: MotorId,
    /// How long each call waits for its response
    pub response_timeout: Duration,
    /// Feedback scaling of the attached motors
    pub motor_model: MotorModel,
}

impl ClientConfig {
    /// Default response timeout (2 s)
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            host_id: MotorId::DEFAULT_HOST,
            response_timeout: Self::DEFAULT_TIMEOUT,
            motor_model: MotorModel::default(),
        }
    }
}

/// Protocol client over an injected transport
///
/// Every call sends exactly one request and blocks until the matching
/// response arrives or the response timeout passes. Frames from other motors
/// received meanwhile update their sessions and do not end the wait.
pub struct Client<T: Transport> {
    transport: T,
    config: ClientConfig,
    codec: Codec,
    params: ParameterTable,
    sessions: SessionTable,
    unrecognized_frames: u64,
    foreign_frames: u64,
}

impl<T: Transport> Client<T> {
    /// Create a client with default settings
    pub fn new(transport: T) -> Self {
        ClientBuilder::new().build(transport)
    }

    /// Create a client with the given settings and the built-in parameter table
    pub fn with_config(transport: T, config: ClientConfig) -> Self {
        ClientBuilder::new().with_config(config).build(transport)
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn parameters(&self) -> &ParameterTable {
        &self.params
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Tear down the client, dropping all sessions
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Session of a motor this client has talked to
    pub fn session(&self, id: u8) -> Option<&MotorSession> {
        MotorId::new(id).ok().and_then(|id| self.sessions.get(id))
    }

    /// All sessions, in identifier order
    pub fn sessions(&self) -> Vec<&MotorSession> {
        self.sessions.list()
    }

    /// Inbound frames that could not be decoded and were dropped
    pub fn unrecognized_frames(&self) -> u64 {
        self.unrecognized_frames
    }

    /// Inbound frames addressed to another host, which were dropped
    pub fn foreign_frames(&self) -> u64 {
        self.foreign_frames
    }

    /// Inbound frames from motors this client has no session for
    pub fn orphan_frames(&self) -> u64 {
        self.sessions.orphan_frames()
    }

    /// Fraction of requests across all motors that timed out
    pub fn error_rate(&self) -> f32 {
        let (ok, timeouts) = self.sessions.list().iter().fold((0u32, 0u32), |acc, s| {
            (acc.0 + s.stats().success_count, acc.1 + s.stats().timeout_count)
        });
        if ok + timeouts == 0 {
            0.0
        } else {
            timeouts as f32 / (ok + timeouts) as f32
        }
    }

    /// Enable a motor; returns its feedback snapshot
    ///
    /// Fails with [`Error::DeviceFault`] if the snapshot carries fault bits.
    pub fn enable(&mut self, id: u8) -> Result<FeedbackFrame> {
        let id = MotorId::new(id)?;
        let feedback = self.feedback_transaction(id, Command::Enable)?;
        fault_check(feedback)
    }

    /// Disable a motor; returns its feedback snapshot
    ///
    /// Fails with [`Error::DeviceFault`] if the snapshot carries fault bits.
    pub fn disable(&mut self, id: u8) -> Result<FeedbackFrame> {
        let id = MotorId::new(id)?;
        let feedback = self.feedback_transaction(id, Command::Disable)?;
        fault_check(feedback)
    }

    /// Ask a motor for a feedback snapshot without changing its state
    pub fn request_feedback(&mut self, id: u8) -> Result<FeedbackFrame> {
        let id = MotorId::new(id)?;
        self.feedback_transaction(id, Command::RequestFeedback)
    }

    /// Set the current shaft position as mechanical zero; returns the feedback snapshot
    pub fn set_zero_position(&mut self, id: u8) -> Result<FeedbackFrame> {
        let id = MotorId::new(id)?;
        self.feedback_transaction(id, Command::SetZeroPosition)
    }

    /// Write a parameter; returns the feedback snapshot sent after the write
    ///
    /// `param` is a parameter name or a hex address such as `0x7005`.
    pub fn write(&mut self, id: u8, param: &str, value: f64) -> Result<FeedbackFrame> {
        let id = MotorId::new(id)?;
        let spec = *self.params.resolve(param)?;
        self.write_spec(id, spec, value)
    }

    /// Write a parameter by wire address
    pub fn write_address(&mut self, id: u8, address: u16, value: f64) -> Result<FeedbackFrame> {
        let id = MotorId::new(id)?;
        let spec = self.spec_at(address)?;
        self.write_spec(id, spec, value)
    }

    /// Read a parameter in physical units
    ///
    /// `param` is a parameter name or a hex address such as `0x7019`.
    pub fn read(&mut self, id: u8, param: &str) -> Result<f64> {
        let id = MotorId::new(id)?;
        let spec = *self.params.resolve(param)?;
        self.read_spec(id, spec)
    }

    /// Read a parameter by wire address
    pub fn read_address(&mut self, id: u8, address: u16) -> Result<f64> {
        let id = MotorId::new(id)?;
        let spec = self.spec_at(address)?;
        self.read_spec(id, spec)
    }

    fn spec_at(&self, address: u16) -> Result<ParameterSpec> {
        self.params
            .lookup_address(address)
            .copied()
            .ok_or_else(|| Error::unknown_parameter(format!("0x{:04X}", address)))
    }

    fn write_spec(
        &mut self,
        id: MotorId,
        spec: ParameterSpec,
        value: f64,
    ) -> Result<FeedbackFrame> {
        if !spec.access.is_writable() {
            return Err(Error::not_writable(spec.name));
        }
        let bytes = encode_value(&spec, value)?;
        debug!("Writing {} = {} on motor {}", spec.name, value, id);
        self.feedback_transaction(
            id,
            Command::WriteParam {
                address: spec.address,
                value: bytes,
            },
        )
    }

    fn read_spec(&mut self, id: MotorId, spec: ParameterSpec) -> Result<f64> {
        if !spec.access.is_readable() {
            return Err(Error::not_readable(spec.name));
        }
        let response = self.transact(
            id,
            id,
            Command::ReadParam {
                address: spec.address,
            },
        )?;
        match response.body {
            ResponseBody::ParameterValue { raw, .. } => decode_value(&spec, &raw),
            _ => Err(Error::unrecognized("read answered with a non-parameter frame")),
        }
    }

    /// Read `run_mode` as a typed value
    pub fn read_run_mode(&mut self, id: u8) -> Result<RunMode> {
        let value = self.read(id, "run_mode")?;
        RunMode::try_from(value as i64)
    }

    /// Write `run_mode` from a typed value
    pub fn set_run_mode(&mut self, id: u8, mode: RunMode) -> Result<FeedbackFrame> {
        self.write(id, "run_mode", mode as i64 as f64)
    }

    /// Give a motor a new bus identifier
    ///
    /// Nothing here can tell whether another device already answers to
    /// `new_id`; the caller must know the bus.
    pub fn update_identifier(&mut self, old_id: u8, new_id: u8) -> Result<()> {
        let old = MotorId::new(old_id)?;
        let new = MotorId::new(new_id)?;
        self.transact(old, new, Command::SetIdentifier { new_id: new })?;
        self.sessions.rekey(old, new);
        info!("Motor {} now answers to identifier {}", old, new);
        Ok(())
    }

    fn feedback_transaction(&mut self, id: MotorId, command: Command) -> Result<FeedbackFrame> {
        let response = self.transact(id, id, command)?;
        response
            .feedback()
            .copied()
            .ok_or_else(|| Error::unrecognized("expected a feedback frame"))
    }

    /// Send one command to `target` and wait for the answer from `expected_source`
    fn transact(
        &mut self,
        target: MotorId,
        expected_source: MotorId,
        command: Command,
    ) -> Result<DecodedResponse> {
        let host = self.config.host_id;
        let opcode = command.opcode();
        let address = command.address();
        let frame = self
            .codec
            .encode(&CommandFrame::new(target, host, command))?;

        self.sessions
            .get_or_create(target)
            .begin(opcode, address, expected_source, host)?;

        debug!("Sending {} to motor {}: {}", opcode, target, frame);
        if let Err(err) = self.transport.send(&frame) {
            self.abort(target);
            return Err(err.into());
        }

        let timeout = self.config.response_timeout;
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(self.expire(target, timeout));
            }

            let inbound = match self.transport.receive(remaining) {
                Ok(frame) => frame,
                Err(TransportError::Timeout) => return Err(self.expire(target, timeout)),
                Err(err) => {
                    self.abort(target);
                    return Err(err.into());
                }
            };
            trace!("Received {}", inbound);

            let response = match self.codec.decode(&inbound) {
                Ok(response) => response,
                Err(err) => {
                    self.unrecognized_frames += 1;
                    debug!("Dropping frame {}: {}", inbound, err);
                    continue;
                }
            };

            if response.receiver != host.value() && response.receiver != INFO_RECEIVER {
                self.foreign_frames += 1;
                trace!(
                    "Ignoring frame {} addressed to 0x{:02X}",
                    inbound,
                    response.receiver
                );
                continue;
            }

            if self.sessions.route(target, &response) {
                return Ok(response);
            }
            trace!(
                "Frame from motor {} does not answer {} to motor {}",
                response.source,
                opcode,
                target
            );
        }
    }

    fn expire(&mut self, target: MotorId, timeout: Duration) -> Error {
        if let Some(session) = self.sessions.get_mut(target) {
            session.expire();
        }
        warn!("Motor {} did not respond within {:?}", target, timeout);
        Error::ResponseTimeout {
            id: target.value(),
            timeout,
        }
    }

    fn abort(&mut self, target: MotorId) {
        if let Some(session) = self.sessions.get_mut(target) {
            session.abort();
        }
    }
}

fn fault_check(feedback: FeedbackFrame) -> Result<FeedbackFrame> {
    if feedback.fault_flags.is_empty() {
        Ok(feedback)
    } else {
        Err(Error::DeviceFault(feedback.fault_flags))
    }
}

/// Builder for configuring a [`Client`]
pub struct ClientBuilder {
    config: ClientConfig,
    params: ParameterTable,
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        ClientBuilder {
            config: ClientConfig::default(),
            params: ParameterTable::robstride(),
        }
    }

    /// Replace all settings
    pub fn with_config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the host identifier
    pub fn with_host_id(mut self, host_id: u8) -> Result<Self> {
        self.config.host_id = MotorId::new(host_id)?;
        Ok(self)
    }

    /// Set the response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.response_timeout = timeout;
        self
    }

    /// Set the motor model used to scale feedback
    pub fn with_motor_model(mut self, motor_model: MotorModel) -> Self {
        self.config.motor_model = motor_model;
        self
    }

    /// Use a custom parameter table
    pub fn with_parameters(mut self, params: ParameterTable) -> Self {
        self.params = params;
        self
    }

    /// Build the client
    pub fn build<T: Transport>(self, transport: T) -> Client<T> {
        Client {
            transport,
            codec: Codec::new(self.config.motor_model),
            config: self.config,
            params: self.params,
            sessions: SessionTable::new(),
            unrecognized_frames: 0,
            foreign_frames: 0,
        }
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FaultFlags, MotorMode, Opcode};
    use crate::message::CanFrame;
    use crate::params::{Access, WireType};
    use crate::session::SessionState;
    use crate::testing::SimBus;

    fn client(bus: SimBus) -> Client<SimBus> {
        ClientBuilder::new()
            .with_timeout(Duration::from_millis(50))
            .build(bus)
    }

    #[test]
    fn test_builder() -> Result<()> {
        let client = ClientBuilder::new()
            .with_host_id(0x10)?
            .with_timeout(Duration::from_millis(5))
            .with_motor_model(MotorModel::HIGH_TORQUE)
            .build(SimBus::new());
        assert_eq!(client.config().host_id.value(), 0x10);
        assert_eq!(client.config().response_timeout, Duration::from_millis(5));
        assert_eq!(client.config().motor_model, MotorModel::HIGH_TORQUE);
        assert!(ClientBuilder::new().with_host_id(0).is_err());
        Ok(())
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_serde_round_trip() {
        let config = ClientConfig {
            host_id: MotorId::new(0x33).unwrap(),
            response_timeout: Duration::from_millis(250),
            motor_model: MotorModel::HIGH_TORQUE,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: ClientConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_enable_returns_feedback() -> Result<()> {
        let mut client = client(SimBus::new().with_motor(1));
        let feedback = client.enable(1)?;
        assert_eq!(feedback.source.value(), 1);
        assert_eq!(feedback.mode, MotorMode::Run);
        assert!(feedback.fault_flags.is_empty());

        let sent = &client.transport().sent;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].id(), 0x0300_AA01);

        let session = client.session(1).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.last_feedback(), Some(&feedback));

        let feedback = client.disable(1)?;
        assert_eq!(feedback.mode, MotorMode::Reset);
        Ok(())
    }

    #[test]
    fn test_write_run_mode_scenario() -> Result<()> {
        let mut client = client(SimBus::new().with_motor(1));
        let feedback = client.write(1, "run_mode", 1.0)?;

        let sent = client.transport().sent[0];
        assert_eq!(sent.id(), 0x1200_AA01);
        assert_eq!(sent.data(), &[0x05, 0x70, 0, 0, 1, 0, 0, 0]);

        assert_eq!(feedback.source.value(), 1);
        assert_eq!(feedback.fault_flags, FaultFlags::empty());
        assert_eq!(client.read_run_mode(1)?, RunMode::Position);
        Ok(())
    }

    #[test]
    fn test_read_float_parameter() -> Result<()> {
        let mut bus = SimBus::new().with_motor(3);
        bus.set_param(3, 0x7019, 1.25f32.to_le_bytes());
        let mut client = client(bus);

        assert_eq!(client.read(3, "mech_pos")?, 1.25);
        let sent = client.transport().sent[0];
        assert_eq!(sent.data(), &[0x19, 0x70, 0, 0, 0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_write_then_read_back() -> Result<()> {
        let mut client = client(SimBus::new().with_motor(2));
        client.write(2, "limit_spd", 12.5)?;
        assert_eq!(client.read(2, "limit_spd")?, 12.5);
        client.set_run_mode(2, RunMode::Speed)?;
        assert_eq!(client.read_run_mode(2)?, RunMode::Speed);
        Ok(())
    }

    #[test]
    fn test_invalid_identifiers_send_nothing() {
        let mut client = client(SimBus::new().with_motor(1));
        for id in [0u8, 255] {
            assert_eq!(client.enable(id), Err(Error::InvalidIdentifier(id as i64)));
            assert_eq!(client.disable(id), Err(Error::InvalidIdentifier(id as i64)));
            assert_eq!(client.read(id, "mech_pos"), Err(Error::InvalidIdentifier(id as i64)));
            assert_eq!(
                client.write(id, "loc_ref", 0.0),
                Err(Error::InvalidIdentifier(id as i64))
            );
            assert_eq!(
                client.update_identifier(id, 2),
                Err(Error::InvalidIdentifier(id as i64))
            );
            assert_eq!(
                client.update_identifier(1, id),
                Err(Error::InvalidIdentifier(id as i64))
            );
        }
        assert!(client.transport().sent.is_empty());
        assert!(client.sessions().is_empty());
    }

    #[test]
    fn test_access_violations_send_nothing() {
        let table = ParameterTable::new(&[
            ParameterSpec::new("mech_pos", 0x7019, WireType::Float32, Access::ReadOnly),
            ParameterSpec::new("save_flash", 0x7030, WireType::Int8, Access::WriteOnly),
        ])
        .unwrap();
        let mut client = ClientBuilder::new()
            .with_parameters(table)
            .with_timeout(Duration::from_millis(50))
            .build(SimBus::new().with_motor(1));

        assert_eq!(
            client.write(1, "mech_pos", 1.0),
            Err(Error::ParameterNotWritable("mech_pos".to_string()))
        );
        assert_eq!(
            client.read(1, "save_flash"),
            Err(Error::ParameterNotReadable("save_flash".to_string()))
        );
        assert_eq!(
            client.read(1, "nope"),
            Err(Error::UnknownParameter("nope".to_string()))
        );
        assert!(matches!(
            client.write(1, "save_flash", 1000.0),
            Err(Error::ValueOutOfRange(_))
        ));
        assert!(client.transport().sent.is_empty());
    }

    #[test]
    fn test_wide_value_rejected_before_sending() {
        let table = ParameterTable::new(&[ParameterSpec::new(
            "odometer",
            0x3000,
            WireType::Fixed {
                bits: 40,
                scale: 0.001,
                offset: 0.0,
            },
            Access::ReadWrite,
        )])
        .unwrap();
        let mut client = ClientBuilder::new()
            .with_parameters(table)
            .build(SimBus::new().with_motor(1));

        assert_eq!(
            client.write(1, "odometer", 12.0),
            Err(Error::PayloadTooLarge { len: 5, max: 4 })
        );
        assert!(client.transport().sent.is_empty());
        assert!(client.session(1).is_none());
    }

    #[test]
    fn test_timeout_returns_session_to_idle() {
        let mut client = client(SimBus::new());
        let err = client.enable(5).unwrap_err();
        assert_eq!(
            err,
            Error::ResponseTimeout {
                id: 5,
                timeout: Duration::from_millis(50)
            }
        );

        let session = client.session(5).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.stats().timeout_count, 1);
        assert_eq!(client.error_rate(), 1.0);
        assert_eq!(client.transport().sent.len(), 1);
    }

    #[test]
    fn test_device_fault_carries_flags() {
        let flags = FaultFlags::OVERCURRENT | FaultFlags::MAGNETIC_ENCODER;
        let mut bus = SimBus::new().with_motor(4);
        bus.set_faults(4, flags);
        let mut client = client(bus);

        assert_eq!(client.enable(4), Err(Error::DeviceFault(flags)));
        assert_eq!(client.disable(4), Err(Error::DeviceFault(flags)));

        let session = client.session(4).unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.last_feedback().map(|fb| fb.fault_flags), Some(flags));

        // other operations report the snapshot instead of failing
        assert_eq!(client.request_feedback(4).map(|fb| fb.fault_flags), Ok(flags));
    }

    #[test]
    fn test_unsolicited_frames_do_not_resolve() -> Result<()> {
        let mut client = client(SimBus::new().with_motor(1).with_motor(2));
        client.request_feedback(2)?;

        // garbage, a foreign host command and a broadcast from motor 2
        // arrive before motor 1 answers
        client.transport_mut().inject(CanFrame::new_standard(0x123, &[1, 2, 3])?);
        client.transport_mut().inject(CanFrame::new_extended(0x0300_AB01, &[0; 8])?);
        client.transport_mut().broadcast_feedback(2);

        let feedback = client.enable(1)?;
        assert_eq!(feedback.source.value(), 1);
        assert_eq!(client.unrecognized_frames(), 2);

        let other = client.session(2).unwrap();
        assert_eq!(other.stats().unsolicited_count, 1);
        assert_eq!(other.stats().success_count, 1);
        Ok(())
    }

    #[test]
    fn test_frames_for_other_hosts_keep_snapshot() -> Result<()> {
        let mut client = client(SimBus::new().with_motor(1).with_motor(5));
        let before = client.enable(5)?;

        // host 5 asking motor 1 for feedback looks like feedback from motor 5
        client.transport_mut().inject(CanFrame::new_extended(0x0200_0501, &[0; 8])?);
        client.request_feedback(1)?;

        assert_eq!(client.foreign_frames(), 1);
        let session = client.session(5).unwrap();
        assert_eq!(session.last_feedback(), Some(&before));
        assert_eq!(session.stats().unsolicited_count, 0);
        Ok(())
    }

    #[test]
    fn test_frames_from_unknown_motors_are_counted() -> Result<()> {
        let mut client = client(SimBus::new().with_motor(1).with_motor(9));
        client.transport_mut().broadcast_feedback(9);
        client.enable(1)?;

        assert_eq!(client.orphan_frames(), 1);
        assert!(client.session(9).is_none());
        Ok(())
    }

    #[test]
    fn test_parameters_by_address() -> Result<()> {
        let mut bus = SimBus::new().with_motor(3);
        bus.set_param(3, 0x701C, 24.5f32.to_le_bytes());
        let mut client = client(bus);

        assert_eq!(client.read_address(3, 0x701C)?, 24.5);
        assert_eq!(client.read(3, "0x701C")?, 24.5);

        client.write_address(3, 0x700A, -3.0)?;
        assert_eq!(client.read(3, "spd_ref")?, -3.0);

        let err = client.write_address(3, 0x7019, 1.0).unwrap_err();
        assert_eq!(err, Error::ParameterNotWritable("mech_pos".to_string()));
        let err = client.read_address(3, 0x6000).unwrap_err();
        assert_eq!(err, Error::UnknownParameter("0x6000".to_string()));
        assert_eq!(client.transport().sent.len(), 4);
        Ok(())
    }

    #[test]
    fn test_update_identifier_scenario() -> Result<()> {
        let mut bus = SimBus::new().with_motor(127);
        bus.set_param(127, 0x7019, 0.5f32.to_le_bytes());
        let mut client = client(bus);

        client.enable(127)?;
        client.update_identifier(127, 1)?;

        let sent = client.transport().sent[1];
        assert_eq!(sent.id(), 0x0701_AA7F);

        assert!(client.session(127).is_none());
        assert_eq!(client.session(1).map(|s| s.identifier().value()), Some(1));

        assert_eq!(client.read(1, "mech_pos")?, 0.5);
        assert!(matches!(
            client.read(127, "mech_pos"),
            Err(Error::ResponseTimeout { id: 127, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_transport_failure_propagates() {
        let mut bus = SimBus::new().with_motor(1);
        bus.fail_sends("bus off");
        let mut client = client(bus);
        assert_eq!(
            client.enable(1),
            Err(Error::TransportError("bus off".to_string()))
        );
        assert_eq!(client.session(1).map(|s| s.state()), Some(SessionState::Idle));
        assert_eq!(client.session(1).map(|s| s.stats().timeout_count), Some(0));
    }

    #[test]
    fn test_pending_request_blocks_second_call() -> Result<()> {
        let mut client = client(SimBus::new().with_motor(1));
        client
            .sessions
            .get_or_create(MotorId::new(1)?)
            .begin(Opcode::Enable, None, MotorId::new(1)?, MotorId::DEFAULT_HOST)?;
        assert_eq!(client.disable(1), Err(Error::RequestPending(1)));
        assert!(client.transport().sent.is_empty());
        Ok(())
    }
}
