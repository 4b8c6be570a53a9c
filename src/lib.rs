//! Terminal client for the zhibi essay-material library.
//!
//! The server owns every document and all heavy operations (OCR, link
//! scraping, chat completion, search); this crate is a fetch client,
//! a message-driven reducer, and a ratatui front-end over it.

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod models;
pub mod ui;
