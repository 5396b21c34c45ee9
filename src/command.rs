//! One-shot requests as issued from the command line

use crate::client::Client;
use crate::core::RunMode;
use crate::error::{Error, Result};
use crate::message::FeedbackFrame;
use crate::transport::Transport;

/// A single client operation with unvalidated identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    Enable { id: i64 },
    Disable { id: i64 },
    Feedback { id: i64 },
    Zero { id: i64 },
    Read { id: i64, param: String },
    Write { id: i64, param: String, value: f64 },
    UpdateId { old: i64, new: i64 },
}

/// Result of a [`Request`]
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Feedback(FeedbackFrame),
    Value { param: String, value: f64 },
    IdentifierChanged { old: u8, new: u8 },
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Feedback(feedback) => write!(f, "{}", feedback),
            Outcome::Value { param, value } if param == "run_mode" => {
                match RunMode::try_from(*value as i64) {
                    Ok(mode) => write!(f, "value: {} ({:?})", value, mode),
                    Err(_) => write!(f, "value: {}", value),
                }
            }
            Outcome::Value { value, .. } => write!(f, "value: {}", value),
            Outcome::IdentifierChanged { old, new } => {
                write!(f, "motor {} now answers to {}", old, new)
            }
        }
    }
}

/// Narrow a command-line identifier to a byte; range checks happen in the client
fn narrow(id: i64) -> Result<u8> {
    u8::try_from(id).map_err(|_| Error::InvalidIdentifier(id))
}

/// Run one request against a client
pub fn execute<T: Transport>(client: &mut Client<T>, request: &Request) -> Result<Outcome> {
    let outcome = match request {
        Request::Enable { id } => Outcome::Feedback(client.enable(narrow(*id)?)?),
        Request::Disable { id } => Outcome::Feedback(client.disable(narrow(*id)?)?),
        Request::Feedback { id } => Outcome::Feedback(client.request_feedback(narrow(*id)?)?),
        Request::Zero { id } => Outcome::Feedback(client.set_zero_position(narrow(*id)?)?),
        Request::Read { id, param } => {
            let id = narrow(*id)?;
            let name = client.parameters().resolve(param)?.name;
            Outcome::Value {
                param: name.to_string(),
                value: client.read(id, param)?,
            }
        }
        Request::Write { id, param, value } => {
            Outcome::Feedback(client.write(narrow(*id)?, param, *value)?)
        }
        Request::UpdateId { old, new } => {
            let (old, new) = (narrow(*old)?, narrow(*new)?);
            client.update_identifier(old, new)?;
            Outcome::IdentifierChanged { old, new }
        }
    };
    Ok(outcome)
}
