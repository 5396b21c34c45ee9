//! # RobStride CAN protocol client
//!
//! A host-side client for RobStride servo-motor controllers sharing a CAN bus.
//! This library provides:
//!
//! - A static table of named controller parameters and their wire encodings
//! - Encoding/decoding of command, feedback, parameter and fault frames
//! - Per-motor request/response correlation with timeouts
//! - A blocking client over any [`Transport`]
//!
//! ## Features
//!
//! - `serde`: Enable serialization/deserialization support
//! - `socketcan`: Linux SocketCAN transport
//! - `cli`: the `robstride` command-line tool
//!
//! ## Example
//!
//! ```no_run
//! # #[cfg(feature = "socketcan")]
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use robstride::{Client, SocketCanTransport};
//!
//! let mut client = Client::new(SocketCanTransport::open("can0")?);
//! let feedback = client.enable(127)?;
//! println!("{}", feedback);
//! println!("mech_pos = {}", client.read(127, "mech_pos")?);
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "socketcan"))]
//! # fn main() {}
//! ```

pub mod client;
pub mod codec;
pub mod command;
pub mod core;
pub mod error;
pub mod message;
pub mod params;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{Client, ClientBuilder, ClientConfig};
pub use codec::Codec;
pub use crate::core::{FaultFlags, MotorId, MotorMode, Opcode, RunMode};
pub use error::{Error, Result};
pub use message::{CanFrame, CommandFrame, DecodedResponse, FeedbackFrame, MotorModel};
pub use params::{ParameterSpec, ParameterTable};
pub use session::{MotorSession, SessionState};
pub use transport::{Transport, TransportError};

#[cfg(feature = "socketcan")]
pub use transport::SocketCanTransport;
