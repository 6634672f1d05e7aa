//! Interpreter core for piwalk, a grid language steered by the digits of π.
//!
//! # Architecture
//!
//! ```text
//! source ──> Grid ─────────────┐
//!                              v
//! PiIndex ──> Navigator::tick ──> Program::execute ──> VariableStore
//!               (move 1 cell)     (opcode below)        │   ^
//!                                                       v   │
//!                                                  SysChannels (SYS_T / SYS_AT)
//!                                                       │   ^
//!                                             output ch │   │ input ch
//!                                                       v   │
//!                                                      driver
//! ```
//!
//! A run is a loop of [`Program::step`]: one navigation [`Tick`] followed by
//! the instruction under the new cell. It ends when an `E` opcode executes
//! ([`RunOutcome::Exited`]), when navigation dead-ends ([`RunOutcome::Crashed`]),
//! or with a [`RunError`].

mod cursor;
mod entropy;
mod errors;
mod exec;
mod grid;
mod io;
mod navigate;
mod pi;
mod program;
mod store;


pub use cursor::{Cursor, CursorObserver, FacingTracker};
pub use entropy::{Entropy, ScriptedEntropy, ThreadEntropy};
pub use errors::{Expected, RunError};
pub use grid::{Grid, OPERATORS};
pub use io::{
    CharRequest, InputReceiver, InputSender, OutputReceiver, OutputSender, RESERVED_PREFIX,
    Reserved, SysChannels, input_channel, output_channel,
};
pub use navigate::{
    BranchOverride, DeadEnd, Navigator, PriorityBranches, Reversal, Tick, tie_break_index,
};
pub use pi::{PiDigits, PiDigitsError, PiIndex, PiVelocity};
pub use program::{Program, RunOutcome, Step};
pub use store::{
    GetSignal, PendingRead, REGISTER_COUNT, ReadAbandoned, StoreObserver, VarRead, VariableStore,
};

pub use piwalk_types::{Bounds, Digit, Direction, GridCoord, Position, Token, TokenKind};
