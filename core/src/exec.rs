//! Instruction executor.
//!
//! After each successful tick the cell one row below the cursor is read. An
//! operator there starts an instruction: a chain of prefix operators running
//! downwards, ended by one terminal opcode whose operands sit in the rows
//! below it.
//!
//! ```text
//!  1      <- cursor, digit 1 (the instruction's register)
//!  @      <- prefix: value = register[value]
//!  .      <- prefix: ground floating reads to 0
//!  v      <- opcode: store value
//!  total  <- operand
//! ```

use std::sync::Arc;

use piwalk_types::{Digit, Token};

use crate::errors::{Expected, RunError};
use crate::navigate::Reversal;
use crate::pi::PiVelocity;
use crate::program::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Flow {
    Continue,
    Exit,
}

impl Flow {
    pub(crate) fn is_exit(self) -> bool {
        self == Flow::Exit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Prefix {
    /// `@`
    Deref,
    /// `|`
    Pass,
    /// `.`
    Ground,
    /// `:`
    Reverse,
    /// `<`
    ReverseIfEastward,
    /// `>`
    ReverseIfWestward,
}

impl Prefix {
    fn from_char(op: char) -> Option<Self> {
        match op {
            '@' => Some(Prefix::Deref),
            '|' => Some(Prefix::Pass),
            '.' => Some(Prefix::Ground),
            ':' => Some(Prefix::Reverse),
            '<' => Some(Prefix::ReverseIfEastward),
            '>' => Some(Prefix::ReverseIfWestward),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opcode {
    /// `v`: store the value into a variable.
    Store,
    /// `^`: load a variable (or threshold comparison) into the register.
    Load,
    /// `-`
    Sub,
    /// `+`
    Add,
    /// `p`: value-indexed tie-break for a branch key.
    ValueBranch,
    /// `P`: first-candidate tie-break for a branch key.
    PriorityBranch,
    /// `E`
    Exit,
}

impl Opcode {
    fn from_char(op: char) -> Option<Self> {
        match op {
            'v' => Some(Opcode::Store),
            '^' => Some(Opcode::Load),
            '-' => Some(Opcode::Sub),
            '+' => Some(Opcode::Add),
            'p' => Some(Opcode::ValueBranch),
            'P' => Some(Opcode::PriorityBranch),
            'E' => Some(Opcode::Exit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Threshold {
    Less,
    Greater,
    Equal,
}

impl Threshold {
    fn from_char(op: char) -> Option<Self> {
        match op {
            '<' => Some(Threshold::Less),
            '>' => Some(Threshold::Greater),
            '=' => Some(Threshold::Equal),
            _ => None,
        }
    }

    fn holds(self, value: i64, other: i64) -> bool {
        match self {
            Threshold::Less => value < other,
            Threshold::Greater => value > other,
            Threshold::Equal => value == other,
        }
    }
}

/// Operand cell: empty means "the instruction's own register".
enum Operand {
    Register,
    Variable(Arc<str>),
}

/// State accumulated by the prefix chain.
struct Instruction {
    register: Digit,
    value: i64,
    grounded: bool,
    /// Row offset (from the cursor) of the first operand cell.
    offset: i64,
}

impl Instruction {
    fn fallback(&self) -> Option<i64> {
        self.grounded.then_some(0)
    }
}

impl Program {
    fn token_below(&self, offset: i64) -> Token {
        self.navigator.lookup(&self.grid, 0, offset).clone()
    }

    fn syntax_error(&self, expected: Expected, found: Token, offset: i64) -> RunError {
        let (pos, _) = self.navigator.cursor().at(0, offset);
        RunError::Syntax {
            expected,
            found,
            at: pos.to_grid_coord(),
        }
    }

    fn operand(&self, offset: i64) -> Result<Operand, RunError> {
        match self.token_below(offset) {
            Token::Empty => Ok(Operand::Register),
            Token::Name(name) => Ok(Operand::Variable(name)),
            other => Err(self.syntax_error(Expected::NameOrEmpty, other, offset)),
        }
    }

    /// Run the instruction hanging below the cursor, if any. `register` is the
    /// digit matched by the tick that just completed.
    pub(crate) async fn execute(&mut self, register: Digit) -> Result<Flow, RunError> {
        let Some(mut op) = self.token_below(1).operator() else {
            return Ok(Flow::Continue);
        };

        let mut value = i64::from(register);
        let mut grounded = false;
        let mut offset = 2;

        while let Some(prefix) = Prefix::from_char(op) {
            match prefix {
                Prefix::Deref => value = self.store.register(value, grounded.then_some(0)),
                Prefix::Pass => {}
                Prefix::Ground => grounded = true,
                Prefix::Reverse => self.navigator.request_reversal(Reversal::Toggle),
                Prefix::ReverseIfEastward => {
                    if self.navigator.cursor().velocity().0 > 0 {
                        self.navigator
                            .request_reversal(Reversal::Set(PiVelocity::Backward));
                    }
                }
                Prefix::ReverseIfWestward => {
                    if self.navigator.cursor().velocity().0 < 0 {
                        self.navigator
                            .request_reversal(Reversal::Set(PiVelocity::Forward));
                    }
                }
            }

            let Some(next) = self.token_below(offset).operator() else {
                tracing::trace!(offset, "prefix chain ended without an opcode");
                return Ok(Flow::Continue);
            };
            op = next;
            offset += 1;
        }

        let Some(opcode) = Opcode::from_char(op) else {
            tracing::trace!(%op, "operator is not an opcode");
            return Ok(Flow::Continue);
        };
        tracing::trace!(?opcode, %register, value, grounded, "execute");

        let inst = Instruction {
            register,
            value,
            grounded,
            offset,
        };
        match opcode {
            Opcode::Store => self.store_value(&inst)?,
            Opcode::Load => self.load(&inst).await?,
            Opcode::Sub => self.accumulate(&inst, i64::saturating_sub).await?,
            Opcode::Add => self.accumulate(&inst, i64::saturating_add).await?,
            Opcode::ValueBranch | Opcode::PriorityBranch => {
                let Some(key) = Digit::from_value(inst.value) else {
                    tracing::debug!(value = inst.value, "branch key out of range; ignored");
                    return Ok(Flow::Continue);
                };
                if opcode == Opcode::PriorityBranch {
                    self.navigator.priority_mut().insert(key);
                } else {
                    self.navigator.priority_mut().remove(key);
                }
            }
            Opcode::Exit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn store_value(&mut self, inst: &Instruction) -> Result<(), RunError> {
        match self.token_below(inst.offset) {
            Token::Name(name) => {
                self.store.set(&name, inst.value);
                Ok(())
            }
            other => Err(self.syntax_error(Expected::Name, other, inst.offset)),
        }
    }

    async fn load(&mut self, inst: &Instruction) -> Result<(), RunError> {
        let first = self.token_below(inst.offset);
        let (threshold, operand_offset) = match first {
            Token::Operator(op) => match Threshold::from_char(op) {
                Some(threshold) => (Some(threshold), inst.offset + 1),
                None => {
                    return Err(self.syntax_error(
                        Expected::ThresholdOperator,
                        Token::Operator(op),
                        inst.offset,
                    ));
                }
            },
            Token::Name(_) | Token::Empty => (None, inst.offset),
            other => {
                return Err(self.syntax_error(
                    Expected::NameEmptyOrOperator,
                    other,
                    inst.offset,
                ));
            }
        };

        let resolved = match self.operand(operand_offset)? {
            Operand::Register => self
                .store
                .register_value(i64::from(inst.register))
                .or(inst.fallback()),
            Operand::Variable(name) => self.read_var(&name, inst.fallback()).await?,
        };

        let result = match threshold {
            None => resolved,
            Some(threshold) => Some(match resolved {
                Some(other) => i64::from(threshold.holds(inst.value, other)),
                None => i64::from(self.store.entropy_mut().below(2)),
            }),
        };
        self.store.set_register(inst.register, result);
        Ok(())
    }

    async fn accumulate(
        &mut self,
        inst: &Instruction,
        combine: fn(i64, i64) -> i64,
    ) -> Result<(), RunError> {
        let other = match self.operand(inst.offset)? {
            Operand::Register => self
                .store
                .register(i64::from(inst.register), inst.fallback()),
            Operand::Variable(name) => match self.read_var(&name, inst.fallback()).await? {
                Some(value) => value,
                None => self.store.entropy_mut().digit(),
            },
        };
        self.store
            .set_register(inst.register, Some(combine(inst.value, other)));
        Ok(())
    }
}
