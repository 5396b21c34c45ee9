//! Per-motor request/response correlation and state tracking

use std::collections::HashMap;
use std::time::Instant;

use crate::core::{MotorId, Opcode};
use crate::error::{Error, Result};
use crate::message::{DecodedResponse, FaultReport, FeedbackFrame, ResponseBody, ResponseKind};

/// Correlation state of a motor session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SessionState {
    /// No request in flight
    Idle,
    /// A request was sent and its response has not arrived
    AwaitingResponse,
}

/// The request a session is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub opcode: Opcode,
    /// Parameter address for ReadParam/WriteParam
    pub address: Option<u16>,
    /// Motor expected to answer; differs from the session id after SetIdentifier
    pub expected_source: MotorId,
    /// Host the answer must be addressed to
    pub host: MotorId,
    pub issued_at: Instant,
}

impl PendingRequest {
    /// Response kind that resolves this request
    pub fn expected_kind(&self) -> ResponseKind {
        match self.opcode {
            Opcode::ReadParam => ResponseKind::ParameterValue,
            Opcode::SetIdentifier => ResponseKind::DeviceInfo,
            _ => ResponseKind::Feedback,
        }
    }

    /// Check whether `response` answers this request
    pub fn is_answered_by(&self, response: &DecodedResponse) -> bool {
        if response.source != self.expected_source || response.kind() != self.expected_kind() {
            return false;
        }
        match response.body {
            // unique-id frames are not addressed to a host
            ResponseBody::DeviceInfo { .. } => true,
            ResponseBody::ParameterValue { address, .. } => {
                response.receiver == self.host.value() && Some(address) == self.address
            }
            _ => response.receiver == self.host.value(),
        }
    }
}

/// Per-motor counters
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionStats {
    /// Requests answered
    pub success_count: u32,
    /// Requests that timed out
    pub timeout_count: u32,
    /// Frames from this motor that did not answer a request
    pub unsolicited_count: u32,
    /// Last time any frame from this motor was seen
    pub last_seen: Option<Instant>,
}

impl SessionStats {
    /// Fraction of requests that timed out (0.0 to 1.0)
    pub fn error_rate(&self) -> f32 {
        let total = self.success_count + self.timeout_count;
        if total == 0 {
            0.0
        } else {
            self.timeout_count as f32 / total as f32
        }
    }
}

/// State kept for one motor identifier
#[derive(Debug, Clone)]
pub struct MotorSession {
    identifier: MotorId,
    last_feedback: Option<FeedbackFrame>,
    last_fault_report: Option<FaultReport>,
    pending: Option<PendingRequest>,
    stats: SessionStats,
}

impl MotorSession {
    /// Create an idle session
    pub fn new(identifier: MotorId) -> Self {
        MotorSession {
            identifier,
            last_feedback: None,
            last_fault_report: None,
            pending: None,
            stats: SessionStats::default(),
        }
    }

    /// Identifier the motor currently answers to
    pub fn identifier(&self) -> MotorId {
        self.identifier
    }

    /// Idle unless a request is in flight
    pub fn state(&self) -> SessionState {
        if self.pending.is_some() {
            SessionState::AwaitingResponse
        } else {
            SessionState::Idle
        }
    }

    /// Most recent feedback snapshot
    pub fn last_feedback(&self) -> Option<&FeedbackFrame> {
        self.last_feedback.as_ref()
    }

    /// Most recent fault report
    pub fn last_fault_report(&self) -> Option<&FaultReport> {
        self.last_fault_report.as_ref()
    }

    /// Request awaiting its response, if any
    pub fn pending(&self) -> Option<&PendingRequest> {
        self.pending.as_ref()
    }

    /// Request counters for this motor
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Idle -> AwaitingResponse
    pub fn begin(
        &mut self,
        opcode: Opcode,
        address: Option<u16>,
        expected_source: MotorId,
        host: MotorId,
    ) -> Result<()> {
        if self.pending.is_some() {
            return Err(Error::RequestPending(self.identifier.value()));
        }
        self.pending = Some(PendingRequest {
            opcode,
            address,
            expected_source,
            host,
            issued_at: Instant::now(),
        });
        Ok(())
    }

    /// Record the contents of a frame from this motor
    pub fn observe(&mut self, response: &DecodedResponse) {
        self.stats.last_seen = Some(Instant::now());
        match response.body {
            ResponseBody::Feedback(feedback) => self.last_feedback = Some(feedback),
            ResponseBody::FaultReport(report) => self.last_fault_report = Some(report),
            _ => {}
        }
    }

    /// Offer a response; returns true if it resolved the pending request
    ///
    /// The response is observed either way.
    pub fn offer(&mut self, response: &DecodedResponse) -> bool {
        self.observe(response);
        match self.pending {
            Some(pending) if pending.is_answered_by(response) => {
                self.pending = None;
                self.stats.success_count += 1;
                true
            }
            _ => {
                self.stats.unsolicited_count += 1;
                false
            }
        }
    }

    /// AwaitingResponse -> Idle after the deadline passed
    pub fn expire(&mut self) {
        if self.pending.take().is_some() {
            self.stats.timeout_count += 1;
        }
    }

    /// AwaitingResponse -> Idle without counting a timeout (send failed)
    pub fn abort(&mut self) {
        self.pending = None;
    }
}

/// All sessions of one client, keyed by motor identifier
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<MotorId, MotorSession>,
    orphan_frames: u64,
}

impl SessionTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a session, creating it on first use
    pub fn get_or_create(&mut self, id: MotorId) -> &mut MotorSession {
        self.sessions
            .entry(id)
            .or_insert_with(|| MotorSession::new(id))
    }

    /// Session of `id`, if one exists
    pub fn get(&self, id: MotorId) -> Option<&MotorSession> {
        self.sessions.get(&id)
    }

    pub fn get_mut(&mut self, id: MotorId) -> Option<&mut MotorSession> {
        self.sessions.get_mut(&id)
    }

    /// Sessions in identifier order
    pub fn list(&self) -> Vec<&MotorSession> {
        let mut sessions: Vec<_> = self.sessions.values().collect();
        sessions.sort_by_key(|session| session.identifier);
        sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Frames from motors without a session, which were dropped
    pub fn orphan_frames(&self) -> u64 {
        self.orphan_frames
    }

    /// Route an inbound response while `waiting_on` awaits its answer
    ///
    /// Returns true if the response resolved the waiting session. Responses
    /// from other known motors update those sessions; responses from unknown
    /// motors are counted and dropped.
    pub fn route(&mut self, waiting_on: MotorId, response: &DecodedResponse) -> bool {
        let resolves = self
            .sessions
            .get(&waiting_on)
            .and_then(|session| session.pending)
            .is_some_and(|pending| pending.is_answered_by(response));

        if resolves {
            if let Some(session) = self.sessions.get_mut(&waiting_on) {
                session.offer(response);
            }
            if response.source != waiting_on {
                if let Some(other) = self.sessions.get_mut(&response.source) {
                    other.observe(response);
                }
            }
            return true;
        }

        match self.sessions.get_mut(&response.source) {
            Some(session) => {
                session.offer(response);
            }
            None => self.orphan_frames += 1,
        }
        false
    }

    /// Move a session to a new identifier, replacing any session already there
    pub fn rekey(&mut self, old: MotorId, new: MotorId) {
        let mut session = self
            .sessions
            .remove(&old)
            .unwrap_or_else(|| MotorSession::new(old));
        session.identifier = new;
        if let Some(feedback) = session.last_feedback.as_mut() {
            feedback.source = new;
        }
        self.sessions.insert(new, session);
    }
}
