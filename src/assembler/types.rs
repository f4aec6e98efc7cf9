use std::slice;

use crate::types::Instruction;

/// Assembled code. The index of an instruction is its step number.
pub type Program = Vec<Instruction>;

/// Label -> step mapping, kept in declaration order for listings.
///
/// Jumps only store the label they were written with and look it up here
/// when they execute, so editing the table redirects them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JumpTable {
    entries: Vec<(String, usize)>,
}

impl JumpTable {
    pub fn new() -> JumpTable {
        JumpTable::default()
    }

    /// Redefining a label keeps its position and returns the old step.
    pub fn insert(&mut self, label: &str, step: usize) -> Option<usize> {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.0 == label) {
            let old = entry.1;
            entry.1 = step;
            return Some(old);
        }
        self.entries.push((label.into(), step));
        None
    }

    pub fn remove(&mut self, label: &str) -> Option<usize> {
        let pos = self.entries.iter().position(|e| e.0 == label)?;
        Some(self.entries.remove(pos).1)
    }

    pub fn get(&self, label: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|e| e.0 == label)
            .map(|e| e.1)
    }

    pub fn labels_at(&self, step: usize) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.1 == step)
            .map(|e| e.0.as_str())
            .collect()
    }

    pub fn iter(&self) -> slice::Iter<(String, usize)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
