//! HTTP route handlers

pub mod board;
pub mod control;
pub mod generate;
pub mod input;
pub mod scene;
pub mod status;
