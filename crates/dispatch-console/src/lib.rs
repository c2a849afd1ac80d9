//! Terminal admin console for AI voice agent dispatch scenarios
//!
//! The console is a [`Shell`] of four screens over the voice agent service:
//! the dashboard, agent configuration management, the call trigger and the
//! call results. Screens talk to the service only through
//! [`dispatch_client::ConsoleApi`] and report outcomes as notifications on a
//! shared [`Toaster`]. The binary drives them either one command at a time
//! ([`commands`]) or as an interactive session ([`interactive`]).

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

pub mod app;
pub mod commands;
pub mod components;
pub mod confirm;
pub mod handoff;
pub mod interactive;
pub mod notify;
pub mod pages;

// Re-export commonly used types
pub use app::{Shell, Tab};
pub use confirm::{AssumeYes, Confirm, TerminalConfirm};
pub use handoff::TerminalHandoff;
pub use notify::{Notice, NoticeLevel, Toaster};
