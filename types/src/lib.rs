//! Core domain types for piwalk.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! Everything here can be used from any layer of the interpreter: the tokenizer
//! produces [`Token`]s, the cursor moves in [`Direction`]s over [`Position`]s clamped
//! to [`Bounds`], and errors point at source cells through [`GridCoord`].

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory

mod digit;
mod geometry;
mod token;

pub use digit::Digit;
pub use geometry::{Bounds, Direction, DirectionParseError, GridCoord, Position};
pub use token::{EMPTY_TOKEN, Token, TokenKind};
