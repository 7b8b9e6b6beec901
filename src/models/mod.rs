//! Data models for Dimora entities

pub mod appointment;
pub mod session;
