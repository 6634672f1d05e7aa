//! A loaded program: grid, navigator and store wired together.

use std::fmt;

use piwalk_types::{Direction, Position};

use crate::entropy::Entropy;
use crate::errors::RunError;
use crate::grid::Grid;
use crate::io::{CharRequest, InputSender, OutputSender, Reserved, SysChannels};
use crate::navigate::{BranchOverride, DeadEnd, Navigator, Tick};
use crate::pi::PiDigits;
use crate::store::{REGISTER_COUNT, VarRead, VariableStore};

/// Result of one [`Program::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Exited,
    Crashed(DeadEnd),
}

/// How a completed run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// An `E` opcode executed.
    Exited,
    /// Navigation found no legal next cell.
    Crashed(DeadEnd),
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Exited => f.write_str("Exited"),
            RunOutcome::Crashed(end) => end.fmt(f),
        }
    }
}

#[derive(Debug)]
pub struct Program {
    pub(crate) grid: Grid,
    pub(crate) navigator: Navigator,
    pub(crate) store: VariableStore<SysChannels>,
    input: Option<InputSender>,
    ticks: u64,
}

impl Program {
    #[must_use]
    pub fn new(digits: PiDigits, source: &str) -> Self {
        let grid = Grid::parse(source);
        tracing::debug!(
            width = grid.width(),
            height = grid.height(),
            "program loaded"
        );
        Self {
            grid,
            navigator: Navigator::new(digits),
            store: VariableStore::new(SysChannels::default()),
            input: None,
            ticks: 0,
        }
    }

    #[must_use]
    pub fn with_output(mut self, output: OutputSender) -> Self {
        self.store.observer_mut().set_output(Some(output));
        self
    }

    #[must_use]
    pub fn with_input(mut self, input: InputSender) -> Self {
        self.input = Some(input);
        self
    }

    #[must_use]
    pub fn with_entropy(mut self, entropy: Box<dyn Entropy>) -> Self {
        self.store.set_entropy(entropy);
        self
    }

    #[must_use]
    pub fn with_branch_override(mut self, hook: Box<dyn BranchOverride>) -> Self {
        self.navigator.set_branch_override(Some(hook));
        self
    }

    #[must_use]
    pub fn with_bounds(mut self, a: Position, b: Position) -> Self {
        self.navigator.cursor_mut().set_bounds(a, b);
        self
    }

    // ------------------------------------------------------------------------
    // Execution
    // ------------------------------------------------------------------------

    /// Move the cursor one cell without executing anything.
    pub fn tick(&mut self) -> Tick {
        let tick = self.navigator.tick(&self.grid, &mut self.store);
        if matches!(tick, Tick::Moved { .. }) {
            self.ticks += 1;
        }
        tick
    }

    /// One tick followed by the instruction under the new cell.
    pub async fn step(&mut self) -> Result<Step, RunError> {
        match self.tick() {
            Tick::DeadEnd(end) => Ok(Step::Crashed(end)),
            Tick::Moved { digit, .. } => {
                if self.execute(digit).await?.is_exit() {
                    Ok(Step::Exited)
                } else {
                    Ok(Step::Continue)
                }
            }
        }
    }

    /// Step until an `E` opcode, a dead end, or an error.
    pub async fn run(&mut self) -> Result<RunOutcome, RunError> {
        loop {
            match self.step().await {
                Ok(Step::Continue) => {}
                Ok(Step::Exited) => {
                    tracing::info!(ticks = self.ticks, "program exited");
                    return Ok(RunOutcome::Exited);
                }
                Ok(Step::Crashed(end)) => {
                    tracing::info!(ticks = self.ticks, %end, "program crashed");
                    return Ok(RunOutcome::Crashed(end));
                }
                Err(err) => {
                    tracing::warn!(ticks = self.ticks, %err, "program aborted");
                    return Err(err);
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Read a variable, fetching driver input when the read parks on a
    /// reserved name.
    pub(crate) async fn read_var(
        &mut self,
        key: &str,
        fallback: Option<i64>,
    ) -> Result<Option<i64>, RunError> {
        let pending = match self.store.get(key, fallback) {
            VarRead::Ready(value) => return Ok(value),
            VarRead::Pending(pending) => pending,
        };

        if let Some(reserved) = Reserved::from_key(pending.key()) {
            let input = match self.request_char().await {
                Ok(input) => input,
                Err(err) => {
                    self.store.unhalt();
                    return Err(err);
                }
            };
            let value = reserved.decode(&input);
            tracing::debug!(key = reserved.key(), value, "input received");

            self.store.observer_mut().set_suppressed(true);
            self.store.set(reserved.key(), value);
            self.store.observer_mut().set_suppressed(false);
        }

        self.store.unhalt();
        Ok(pending.wait().await?)
    }

    async fn request_char(&mut self) -> Result<String, RunError> {
        let input = self.input.as_ref().ok_or(RunError::InputUnavailable)?;
        let (request, reply) = CharRequest::new();
        input
            .send(request)
            .await
            .map_err(|_| RunError::InputUnavailable)?;
        reply.await.map_err(|_| RunError::InputUnavailable)
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.navigator.cursor().position()
    }

    #[must_use]
    pub fn facing(&self) -> Direction {
        self.navigator.cursor().facing()
    }

    #[must_use]
    pub fn registers(&self) -> [Option<i64>; REGISTER_COUNT] {
        self.store.registers()
    }

    #[must_use]
    pub fn pi_index(&self) -> i64 {
        self.navigator.pi().index()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    #[must_use]
    pub fn store(&self) -> &VariableStore<SysChannels> {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut VariableStore<SysChannels> {
        &mut self.store
    }
}
