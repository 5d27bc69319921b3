//! CLI Commands

pub mod invite;
pub mod status;
