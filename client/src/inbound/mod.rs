//! Inbound adapters translating external input into domain calls.

pub mod cli;
