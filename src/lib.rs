//! officepdf - queue office documents and convert them to PDF with LibreOffice.
//!
//! This library crate exposes the foreground pieces for integration testing.

pub mod config;
pub mod controller;
pub mod display;
pub mod prompt;
pub mod session;
