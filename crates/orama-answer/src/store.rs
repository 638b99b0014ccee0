//! Ordered interaction history.
//!
//! Append-only: new interactions go to the back and only the last one may
//! be mutated, and only while it is non-terminal. An auxiliary index gives
//! O(1) lookup by id. `reset` is the only destructive operation.

use std::collections::HashMap;

use crate::interaction::Interaction;
use crate::AnswerError;

#[derive(Debug, Clone, Default)]
pub struct InteractionStore {
    items: Vec<Interaction>,
    index: HashMap<String, usize>,
}

impl InteractionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new interaction.
    ///
    /// Fails if the current last interaction is still in flight or if the
    /// id is already present.
    pub fn push(&mut self, interaction: Interaction) -> Result<(), AnswerError> {
        if let Some(last) = self.items.last() {
            if !last.is_terminal() {
                return Err(AnswerError::InvalidState(format!(
                    "interaction {} is still {:?}",
                    last.id, last.state
                )));
            }
        }
        if self.index.contains_key(&interaction.id) {
            return Err(AnswerError::InvalidState(format!(
                "duplicate interaction id {}",
                interaction.id
            )));
        }
        self.index.insert(interaction.id.clone(), self.items.len());
        self.items.push(interaction);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Interaction> {
        self.index.get(id).map(|&i| &self.items[i])
    }

    pub fn last(&self) -> Option<&Interaction> {
        self.items.last()
    }

    /// Mutable access to interaction `id`, granted only while it is the
    /// last element and not yet terminal.
    pub fn active_mut(&mut self, id: &str) -> Option<&mut Interaction> {
        match self.items.last_mut() {
            Some(last) if last.id == id && !last.is_terminal() => Some(last),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Interaction> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Owned copy of the whole history in insertion order.
    pub fn snapshot(&self) -> Vec<Interaction> {
        self.items.clone()
    }

    pub fn reset(&mut self) {
        self.items.clear();
        self.index.clear();
    }
}
