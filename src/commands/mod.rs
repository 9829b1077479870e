//! Non-resource commands.

pub mod doctor;
