//! Linux SocketCAN transport

use std::io;
use std::time::{Duration, Instant};

use ::socketcan::{
    CanFrame as SocketFrame, CanSocket, EmbeddedFrame, ExtendedId, Id, Socket,
};
use tracing::{debug, warn};

use super::{Transport, TransportError};
use crate::message::CanFrame;

/// Blocking transport over a SocketCAN interface such as `can0`
pub struct SocketCanTransport {
    socket: CanSocket,
    channel: String,
}

impl SocketCanTransport {
    /// Open a CAN interface
    pub fn open(channel: &str) -> Result<Self, TransportError> {
        let socket = CanSocket::open(channel).map_err(|e| {
            TransportError::Failed(format!("failed to open CAN interface {}: {}", channel, e))
        })?;
        debug!("Opened CAN interface {}", channel);
        Ok(SocketCanTransport {
            socket,
            channel: channel.to_string(),
        })
    }

    /// Interface name
    pub fn channel(&self) -> &str {
        &self.channel
    }
}

impl Transport for SocketCanTransport {
    fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError> {
        let id = ExtendedId::new(frame.id()).ok_or_else(|| {
            TransportError::Failed(format!("invalid extended id 0x{:X}", frame.id()))
        })?;
        let out = SocketFrame::new(id, frame.data())
            .ok_or_else(|| TransportError::Failed("failed to build CAN frame".to_string()))?;
        self.socket
            .write_frame(&out)
            .map_err(|e| TransportError::Failed(format!("{}: send failed: {}", self.channel, e)))
    }

    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, TransportError> {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(TransportError::Timeout);
            }
            self.socket
                .set_read_timeout(remaining)
                .map_err(|e| TransportError::Failed(e.to_string()))?;

            match self.socket.read_frame() {
                Ok(SocketFrame::Data(data)) => {
                    let converted = match data.id() {
                        Id::Extended(id) => CanFrame::new_extended(id.as_raw(), data.data()),
                        Id::Standard(id) => CanFrame::new_standard(id.as_raw(), data.data()),
                    };
                    return converted.map_err(|e| TransportError::Failed(e.to_string()));
                }
                Ok(SocketFrame::Remote(_)) => continue,
                Ok(SocketFrame::Error(err)) => {
                    warn!("{}: error frame received: {:?}", self.channel, err);
                    continue;
                }
                Err(e)
                    if matches!(
                        e.kind(),
                        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
                    ) =>
                {
                    return Err(TransportError::Timeout);
                }
                Err(e) => {
                    return Err(TransportError::Failed(format!(
                        "{}: receive failed: {}",
                        self.channel, e
                    )))
                }
            }
        }
    }
}
