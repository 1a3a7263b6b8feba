//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions from database rows to domain objects.

mod message;
mod participant;
mod room;
mod user;
