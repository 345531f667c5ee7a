//! Evaluation environments.

use std::rc::Rc;

use ast::{Idx, Lvl};

use crate::normalizer::val::Val;
use crate::result::{TcResult, TypeError};

/// One slot of an environment.
///
/// A `Skipped` slot stands for a binder that is present in the context but
/// has no value in the current evaluation; looking it up yields the neutral
/// variable at the slot's level. Ordering matters, so this is a list rather
/// than a map.
#[derive(Debug, Clone)]
pub enum EnvEntry {
    Defined(Rc<Val>),
    Skipped,
}

#[derive(Debug, Clone, Default)]
pub struct Env {
    entries: Vec<EnvEntry>,
}

impl Env {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, idx: Idx) -> TcResult<Rc<Val>> {
        let pos = self
            .entries
            .len()
            .checked_sub(idx.0 + 1)
            .ok_or_else(|| TypeError::impossible(format!("variable {idx} out of range")))?;
        match &self.entries[pos] {
            EnvEntry::Defined(v) => Ok(v.clone()),
            EnvEntry::Skipped => Ok(Val::var(Lvl(pos))),
        }
    }

    /// The environment extended by a defined value.
    pub fn defined(&self, v: Rc<Val>) -> Env {
        let mut entries = self.entries.clone();
        entries.push(EnvEntry::Defined(v));
        Env { entries }
    }

    /// The environment extended by a skipped slot.
    pub fn skipped(&self) -> Env {
        let mut entries = self.entries.clone();
        entries.push(EnvEntry::Skipped);
        Env { entries }
    }
}
