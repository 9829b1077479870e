//! Client library for the agent platform API.
//!
//! The CLI binary is a thin layer over these modules: a typed HTTP gateway
//! (`client`), chat event decoding and rendering (`events`, `render`),
//! transcript assembly (`transcript`), task polling (`poller`), form
//! controllers for entity creation (`forms`), and the presigned source
//! upload flow (`upload`).

pub mod client;
pub mod commands;
pub mod config;
pub mod events;
pub mod forms;
pub mod logging;
pub mod models;
pub mod modules;
pub mod palette;
pub mod poller;
pub mod render;
pub mod transcript;
pub mod ui;
pub mod upload;
pub mod utils;
