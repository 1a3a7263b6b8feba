//! Gateway protocol definitions
//!
//! Defines the WebSocket protocol including op codes, frame format,
//! operation names, payloads, and close codes.

mod close_codes;
mod messages;
mod opcodes;
mod operations;
mod payloads;

pub use close_codes::CloseCode;
pub use messages::GatewayMessage;
pub use opcodes::OpCode;
pub use operations::Operation;
pub use payloads::{
    ErrorAck, HelloPayload, JoinAck, MessageAck, ParticipantAck, RegisterConnectionPayload,
    RoomLeavePayload, RoomPresencePayload, SendMessagePayload, SuccessAck,
};
