//! Interning of string tokens into dense ids.
use std::hash::Hash;

use hashbrown::HashMap;

use crate::token_set::TokenSet;

/// Dictionary assigning a dense `u32` id to each distinct token.
#[derive(Clone, Debug, Default)]
pub struct Vocabulary<T> {
    ids: HashMap<T, u32>,
}

impl<T> Vocabulary<T>
where
    T: Hash + Eq,
{
    /// Creates an empty vocabulary.
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
        }
    }

    /// Gets the id of a token, assigning the next free id if unseen.
    pub fn intern(&mut self, token: T) -> u32 {
        let next = self.ids.len() as u32;
        *self.ids.entry(token).or_insert(next)
    }

    /// Interns all tokens and returns their id set.
    pub fn intern_set<I>(&mut self, tokens: I) -> TokenSet
    where
        I: IntoIterator<Item = T>,
    {
        tokens.into_iter().map(|t| self.intern(t)).collect()
    }

    /// Gets the number of distinct tokens.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Checks if no token has been interned.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
