//! Channels between a running program and its driver, and the reserved
//! `SYS_` variables that bridge them.
//!
//! | name      | write                         | read                               |
//! |-----------|-------------------------------|------------------------------------|
//! | `SYS_T`   | prints the integer in decimal | one char: its digit value, else -1 |
//! | `SYS_AT`  | prints the character          | one char: its code point           |

use tokio::sync::{mpsc, oneshot};

use crate::store::{GetSignal, StoreObserver};

pub const RESERVED_PREFIX: &str = "SYS_";

/// Text fragments emitted by reserved-name writes.
pub type OutputSender = mpsc::UnboundedSender<String>;
pub type OutputReceiver = mpsc::UnboundedReceiver<String>;

/// Requests for one character of input.
pub type InputSender = mpsc::Sender<CharRequest>;
pub type InputReceiver = mpsc::Receiver<CharRequest>;

/// One pending character request. The driver answers with a string whose
/// first character is used; an empty answer reads as a space.
#[derive(Debug)]
pub struct CharRequest {
    reply: oneshot::Sender<String>,
}

impl CharRequest {
    pub(crate) fn new() -> (Self, oneshot::Receiver<String>) {
        let (reply, rx) = oneshot::channel();
        (Self { reply }, rx)
    }

    /// Answer the request. Returns the text back if the program stopped waiting.
    pub fn respond(self, text: impl Into<String>) -> Result<(), String> {
        self.reply.send(text.into())
    }
}

#[must_use]
pub fn output_channel() -> (OutputSender, OutputReceiver) {
    mpsc::unbounded_channel()
}

#[must_use]
pub fn input_channel(capacity: usize) -> (InputSender, InputReceiver) {
    mpsc::channel(capacity.max(1))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reserved {
    /// `SYS_T`: decimal terminal.
    Terminal,
    /// `SYS_AT`: ASCII terminal.
    AsciiTerminal,
}

impl Reserved {
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key.strip_prefix(RESERVED_PREFIX)? {
            "T" => Some(Reserved::Terminal),
            "AT" => Some(Reserved::AsciiTerminal),
            _ => None,
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Reserved::Terminal => "SYS_T",
            Reserved::AsciiTerminal => "SYS_AT",
        }
    }

    /// Text printed when `value` is written.
    #[must_use]
    pub fn render(self, value: i64) -> String {
        match self {
            Reserved::Terminal => value.to_string(),
            Reserved::AsciiTerminal => render_ascii(value),
        }
    }

    /// Value stored after reading `input` from the driver.
    #[must_use]
    pub fn decode(self, input: &str) -> i64 {
        let ch = input.chars().next().unwrap_or(' ');
        match self {
            Reserved::Terminal => ch.to_digit(10).map_or(-1, i64::from),
            Reserved::AsciiTerminal => i64::from(u32::from(ch)),
        }
    }
}

fn render_ascii(value: i64) -> String {
    let ch = u32::try_from(value).ok().and_then(char::from_u32);
    match ch {
        Some(ch) if ch.is_ascii_graphic() || ch == ' ' || ch == '\n' => ch.to_string(),
        _ if value < 0 => format!("\\x-{:x}", value.unsigned_abs()),
        _ => format!("\\x{value:x}"),
    }
}

/// Store observer owning the reserved names.
///
/// Writes are rendered onto the output channel unless suppressed; reads of a
/// reserved name halt the store until the program has fetched input.
#[derive(Debug, Default)]
pub struct SysChannels {
    output: Option<OutputSender>,
    suppress_output: bool,
}

impl SysChannels {
    #[must_use]
    pub fn new(output: Option<OutputSender>) -> Self {
        Self {
            output,
            suppress_output: false,
        }
    }

    pub fn set_output(&mut self, output: Option<OutputSender>) {
        self.output = output;
    }

    pub(crate) fn set_suppressed(&mut self, suppressed: bool) {
        self.suppress_output = suppressed;
    }

    fn emit(&self, fragment: String) {
        let Some(output) = &self.output else {
            tracing::trace!(%fragment, "output dropped: no sink");
            return;
        };
        if output.send(fragment).is_err() {
            tracing::debug!("output sink closed");
        }
    }
}

impl StoreObserver for SysChannels {
    fn on_set(&mut self, key: &str, value: i64) {
        if self.suppress_output {
            return;
        }
        if let Some(reserved) = Reserved::from_key(key) {
            self.emit(reserved.render(value));
        }
    }

    fn on_get(&mut self, key: &str) -> GetSignal {
        if Reserved::from_key(key).is_some() {
            GetSignal::Halt
        } else {
            GetSignal::Proceed
        }
    }
}
