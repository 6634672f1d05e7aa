//! Register file and variable store.
//!
//! # Registers
//!
//! Ten numeric registers keyed `0..=9`. An unset register is *floating*: reads
//! yield the caller's fallback, or a uniform random digit when there is none.
//!
//! # Variables
//!
//! String-keyed integers. A key may carry one level of indirection, `name@r`,
//! which resolves to the concrete key `name[<value of register r>]`.
//!
//! # Suspension
//!
//! The observer may answer a read with [`GetSignal::Halt`]. The store then
//! parks that read, and every read issued while halted, until [`VariableStore::unhalt`];
//! parked reads resolve in arrival order against the values present at that
//! moment.

use std::collections::{HashMap, VecDeque};
use std::fmt;

use piwalk_types::Digit;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::entropy::{Entropy, ThreadEntropy};

pub const REGISTER_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetSignal {
    Proceed,
    Halt,
}

/// Hooks fired with the resolved key on every variable write and read.
pub trait StoreObserver {
    fn on_set(&mut self, _key: &str, _value: i64) {}

    fn on_get(&mut self, _key: &str) -> GetSignal {
        GetSignal::Proceed
    }
}

impl StoreObserver for () {}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("pending read of `{key}` was dropped before the store resumed")]
pub struct ReadAbandoned {
    pub key: String,
}

/// Outcome of [`VariableStore::get`].
#[derive(Debug)]
pub enum VarRead {
    /// Stored value, else the fallback (`None` = floating).
    Ready(Option<i64>),
    Pending(PendingRead),
}

/// A read parked while the store is halted.
#[derive(Debug)]
pub struct PendingRead {
    key: String,
    rx: oneshot::Receiver<Option<i64>>,
}

impl PendingRead {
    /// Resolved key the read is waiting on.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    pub async fn wait(self) -> Result<Option<i64>, ReadAbandoned> {
        self.rx.await.map_err(|_| ReadAbandoned { key: self.key })
    }
}

struct Waiter {
    key: String,
    fallback: Option<i64>,
    reply: oneshot::Sender<Option<i64>>,
}

pub struct VariableStore<O = ()> {
    vars: HashMap<String, i64>,
    registers: [Option<i64>; REGISTER_COUNT],
    halted: bool,
    waiters: VecDeque<Waiter>,
    entropy: Box<dyn Entropy>,
    observer: O,
}

impl<O: StoreObserver + Default> Default for VariableStore<O> {
    fn default() -> Self {
        Self::new(O::default())
    }
}

impl<O> fmt::Debug for VariableStore<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariableStore")
            .field("vars", &self.vars)
            .field("registers", &self.registers)
            .field("halted", &self.halted)
            .field("waiters", &self.waiters.len())
            .finish_non_exhaustive()
    }
}

impl<O: StoreObserver> VariableStore<O> {
    pub fn new(observer: O) -> Self {
        Self {
            vars: HashMap::new(),
            registers: [None; REGISTER_COUNT],
            halted: false,
            waiters: VecDeque::new(),
            entropy: Box::new(ThreadEntropy),
            observer,
        }
    }

    #[must_use]
    pub fn with_entropy(mut self, entropy: Box<dyn Entropy>) -> Self {
        self.entropy = entropy;
        self
    }

    pub fn set_entropy(&mut self, entropy: Box<dyn Entropy>) {
        self.entropy = entropy;
    }

    pub fn entropy_mut(&mut self) -> &mut dyn Entropy {
        self.entropy.as_mut()
    }

    // ------------------------------------------------------------------------
    // Registers
    // ------------------------------------------------------------------------

    /// Store a value, or return the register to floating with `None`.
    pub fn set_register(&mut self, key: Digit, value: Option<i64>) {
        self.registers[key.index()] = value;
    }

    /// Stored value of register `key`. Keys outside `0..=9` are always floating.
    #[must_use]
    pub fn register_value(&self, key: i64) -> Option<i64> {
        Digit::from_value(key).and_then(|digit| self.registers[digit.index()])
    }

    /// Read a register, falling back to `fallback`, then to a random digit.
    pub fn register(&mut self, key: i64, fallback: Option<i64>) -> i64 {
        self.register_value(key)
            .or(fallback)
            .unwrap_or_else(|| self.entropy.digit())
    }

    #[must_use]
    pub fn registers(&self) -> [Option<i64>; REGISTER_COUNT] {
        self.registers
    }

    // ------------------------------------------------------------------------
    // Variables
    // ------------------------------------------------------------------------

    /// Resolve `name@r` indirection into a concrete key.
    pub fn resolve_key(&mut self, key: &str) -> String {
        let Some((name, register)) = key.split_once('@') else {
            return key.to_string();
        };
        let index = match register.parse::<i64>() {
            Ok(register) => self.register(register, None),
            Err(_) => self.entropy.digit(),
        };
        format!("{name}[{index}]")
    }

    pub fn set(&mut self, key: &str, value: i64) {
        let key = self.resolve_key(key);
        self.observer.on_set(&key, value);
        tracing::trace!(key = %key, value, "variable set");
        self.vars.insert(key, value);
    }

    /// Read a variable; `fallback` is returned when it was never written.
    pub fn get(&mut self, key: &str, fallback: Option<i64>) -> VarRead {
        let key = self.resolve_key(key);
        if self.observer.on_get(&key) == GetSignal::Halt {
            self.halted = true;
        }

        if self.halted {
            let (reply, rx) = oneshot::channel();
            tracing::debug!(key = %key, queued = self.waiters.len() + 1, "read parked");
            self.waiters.push_back(Waiter {
                key: key.clone(),
                fallback,
                reply,
            });
            return VarRead::Pending(PendingRead { key, rx });
        }

        VarRead::Ready(self.vars.get(&key).copied().or(fallback))
    }

    #[must_use]
    pub fn contains(&mut self, key: &str) -> bool {
        let key = self.resolve_key(key);
        self.vars.contains_key(&key)
    }

    pub fn halt(&mut self) {
        self.halted = true;
    }

    /// Resume and resolve every parked read, oldest first.
    pub fn unhalt(&mut self) {
        if !self.halted {
            return;
        }
        self.halted = false;

        for waiter in self.waiters.drain(..) {
            let value = self.vars.get(&waiter.key).copied().or(waiter.fallback);
            if waiter.reply.send(value).is_err() {
                tracing::debug!(key = %waiter.key, "parked read dropped before resume");
            }
        }
    }

    #[must_use]
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    #[must_use]
    pub fn pending_reads(&self) -> usize {
        self.waiters.len()
    }

    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }
}
