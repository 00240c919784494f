//! Generational string rewriting.

use crate::control::{Checkpoint, Uninterrupted};
use crate::error::RenderError;
use crate::interpreter::Walk;
use crate::rules::{RuleTable, is_letter};
use std::ops::ControlFlow;

/// Removes the editor's separator commas from a starting sequence.
pub fn strip_commas(sequence: &str) -> String {
    sequence.chars().filter(|&c| c != ',').collect()
}

/// Rewrites `start_sequence` for `generations` generations with no size limit.
///
/// Generation 0 is the starting sequence without commas. In every later generation each letter
/// is replaced by its rule body (or kept when it has none), `+ - [ ]` are copied and anything else
/// is dropped. Growth is exponential in `generations`; use [`Expander::with_symbol_limit`] when the
/// inputs are not trusted.
pub fn expand(start_sequence: &str, table: &RuleTable, generations: u32) -> String {
    let mut current = strip_commas(start_sequence);
    for _ in 0..generations {
        let mut next = String::with_capacity(next_len(&current, table));
        let _ = rewrite_into(&current, table, &mut next, &mut Uninterrupted);
        current = next;
    }
    current
}

/// Exact length of the generation following `current`.
fn next_len(current: &str, table: &RuleTable) -> usize {
    current
        .chars()
        .map(|c| match c {
            c if is_letter(c) => table.get(c).map_or(1, str::len),
            '+' | '-' | '[' | ']' => 1,
            _ => 0,
        })
        .fold(0usize, usize::saturating_add)
}

/// Symbols rewritten between two checkpoints.
const CHECKPOINT_INTERVAL: usize = 4096;

fn rewrite_into<C: Checkpoint + ?Sized>(
    current: &str,
    table: &RuleTable,
    next: &mut String,
    checkpoint: &mut C,
) -> ControlFlow<()> {
    for (i, c) in current.chars().enumerate() {
        if i % CHECKPOINT_INTERVAL == 0 {
            checkpoint.checkpoint()?;
        }
        match c {
            c if is_letter(c) => match table.get(c) {
                Some(body) => next.push_str(body),
                None => next.push(c),
            },
            '+' | '-' | '[' | ']' => next.push(c),
            _ => {}
        }
    }
    ControlFlow::Continue(())
}

/// Expansion with a resource guard.
///
/// Before each generation is built its exact length is computed; exceeding the symbol limit, or an
/// allocation the system refuses, ends the expansion with [`RenderError::OutOfMemory`] instead of
/// aborting the process.
#[derive(Clone, Debug)]
pub struct Expander<'a> {
    table: &'a RuleTable,
    symbol_limit: usize,
}

impl<'a> Expander<'a> {
    pub fn new(table: &'a RuleTable) -> Self {
        Self {
            table,
            symbol_limit: usize::MAX,
        }
    }

    /// Caps the length of any generation at `limit` symbols.
    pub fn with_symbol_limit(mut self, limit: usize) -> Self {
        self.symbol_limit = limit;
        self
    }

    /// Expands without interruption.
    pub fn expand(&self, start_sequence: &str, generations: u32) -> Result<String, RenderError> {
        let walk = self.expand_with(start_sequence, generations, &mut Uninterrupted)?;
        Ok(walk.complete().unwrap_or_default())
    }

    /// Expands, consulting `checkpoint` at the start of every generation and every few thousand
    /// rewritten symbols. A `Break` abandons the expansion with [`Walk::Interrupted`].
    pub fn expand_with<C: Checkpoint + ?Sized>(
        &self,
        start_sequence: &str,
        generations: u32,
        checkpoint: &mut C,
    ) -> Result<Walk<String>, RenderError> {
        let mut current = strip_commas(start_sequence);
        if current.len() > self.symbol_limit {
            return Err(RenderError::OutOfMemory {
                requested: current.len(),
            });
        }

        for generation in 1..=generations {
            if checkpoint.checkpoint().is_break() {
                return Ok(Walk::Interrupted);
            }

            let len = next_len(&current, self.table);
            if len > self.symbol_limit {
                tracing::warn!(
                    generation,
                    len,
                    limit = self.symbol_limit,
                    "expansion exceeds symbol limit"
                );
                return Err(RenderError::OutOfMemory { requested: len });
            }

            let mut next = String::new();
            next.try_reserve_exact(len)
                .map_err(|_| RenderError::OutOfMemory { requested: len })?;
            if rewrite_into(&current, self.table, &mut next, checkpoint).is_break() {
                return Ok(Walk::Interrupted);
            }
            tracing::trace!(generation, len, "expanded generation");
            current = next;
        }

        Ok(Walk::Complete(current))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_len_matches_rewrite() {
        let table = RuleTable::build("(A,A+[B]),(B,)", "AB").unwrap();
        let current = "A-B]x";
        let mut next = String::new();
        let _ = rewrite_into(current, &table, &mut next, &mut Uninterrupted);
        assert_eq!(next, "A+[B]-]");
        assert_eq!(next_len(current, &table), next.len());
    }

    /// Lets a fixed number of checkpoints pass, then breaks.
    struct Budget(usize);

    impl Checkpoint for Budget {
        fn checkpoint(&mut self) -> ControlFlow<()> {
            if self.0 == 0 {
                return ControlFlow::Break(());
            }
            self.0 -= 1;
            ControlFlow::Continue(())
        }
    }

    #[test]
    fn test_length_preserving_expansion_is_interruptible() {
        let table = RuleTable::build("(A,B),(B,A)", "A").unwrap();
        let mut budget = Budget(100);
        let walk = Expander::new(&table)
            .expand_with("A", u32::MAX, &mut budget)
            .unwrap();
        assert!(walk.is_interrupted());
        assert_eq!(budget.0, 0);
    }

    #[test]
    fn test_long_generation_checks_within_rewrite() {
        let start = "A".repeat(CHECKPOINT_INTERVAL * 3);
        let table = RuleTable::build("(A,A)", &start).unwrap();
        // One check before the generation, then one per interval inside it.
        let walk = Expander::new(&table)
            .expand_with(&start, 1, &mut Budget(3))
            .unwrap();
        assert!(walk.is_interrupted());
        let walk = Expander::new(&table)
            .expand_with(&start, 1, &mut Budget(4))
            .unwrap();
        assert_eq!(walk.complete().map(|s| s.len()), Some(start.len()));
    }

    #[test]
    fn test_strip_commas() {
        assert_eq!(strip_commas("A,B,,+"), "AB+");
    }
}
