//! Transport boundary: the only place frames enter or leave the client

use std::time::Duration;

use thiserror::Error;

use crate::error::Error;
use crate::message::CanFrame;

#[cfg(feature = "socketcan")]
mod socketcan;

#[cfg(feature = "socketcan")]
pub use self::socketcan::SocketCanTransport;

/// Failures reported by a transport
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Nothing was received within the requested timeout
    #[error("receive timed out")]
    Timeout,

    /// The bus or socket failed
    #[error("{0}")]
    Failed(String),
}

impl From<TransportError> for Error {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Timeout => Error::TransportTimeout,
            TransportError::Failed(msg) => Error::TransportError(msg),
        }
    }
}

/// Serialized access to one CAN bus
///
/// Implementations own bus locking; the client issues one `send` followed by
/// `receive` calls until its response arrives or its deadline passes.
pub trait Transport {
    /// Put one frame on the bus
    fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError>;

    /// Wait up to `timeout` for the next frame
    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError> {
        (**self).send(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, TransportError> {
        (**self).receive(timeout)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn send(&mut self, frame: &CanFrame) -> Result<(), TransportError> {
        (**self).send(frame)
    }

    fn receive(&mut self, timeout: Duration) -> Result<CanFrame, TransportError> {
        (**self).receive(timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_mapping() {
        assert_eq!(Error::from(TransportError::Timeout), Error::TransportTimeout);
        assert_eq!(
            Error::from(TransportError::Failed("bus off".to_string())),
            Error::TransportError("bus off".to_string())
        );
    }
}
