//! Local scope management for body compilation.
//!
//! Tracks the locals a body declares, assigns each one a frame slot, and
//! forgets them again when their block ends. Slots of locals that went out
//! of scope are handed out again, so the frame only needs to be as large as
//! the deepest nesting of simultaneously live locals.
//!
//! Shadowing is not allowed: a body may not declare a local whose name is
//! still visible, even from an enclosing block.

use fnspec_core::{BackendError, Span};
use rustc_hash::FxHashMap;

use super::program::LocalType;

// ============================================================================
// Types
// ============================================================================

/// A declared local.
#[derive(Debug, Clone)]
pub struct LocalVar {
    pub ty: LocalType,
    pub slot: usize,
    /// Block depth of the declaration (0 = body level).
    pub depth: u32,
    pub span: Span,
}

// ============================================================================
// LocalScope
// ============================================================================

#[derive(Debug, Default)]
pub struct LocalScope {
    variables: FxHashMap<String, LocalVar>,
    scope_depth: u32,
    next_slot: usize,
    max_slot: usize,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    // ==========================================================================
    // Scope Management
    // ==========================================================================

    /// Enter a block, loop body or `for` header.
    pub fn push_scope(&mut self) {
        self.scope_depth += 1;
    }

    /// Leave the current block, releasing its locals and their slots.
    pub fn pop_scope(&mut self) {
        let depth = self.scope_depth;
        let mut lowest_released = None;
        self.variables.retain(|_, var| {
            let keep = var.depth < depth;
            if !keep {
                lowest_released = Some(lowest_released.map_or(var.slot, |s: usize| s.min(var.slot)));
            }
            keep
        });
        if let Some(slot) = lowest_released {
            self.next_slot = slot;
        }
        self.scope_depth = depth.saturating_sub(1);
    }

    pub fn depth(&self) -> u32 {
        self.scope_depth
    }

    // ==========================================================================
    // Variables
    // ==========================================================================

    /// Declare a local in the current block and return its slot.
    pub fn declare(&mut self, name: &str, ty: LocalType, span: Span) -> Result<usize, BackendError> {
        if self.variables.contains_key(name) {
            return Err(BackendError::at(
                span,
                format!("variable {name} is already defined in this body"),
            ));
        }

        let slot = self.next_slot;
        self.next_slot += 1;
        self.max_slot = self.max_slot.max(self.next_slot);
        self.variables.insert(
            name.to_string(),
            LocalVar {
                ty,
                slot,
                depth: self.scope_depth,
                span,
            },
        );
        Ok(slot)
    }

    pub fn lookup(&self, name: &str) -> Option<&LocalVar> {
        self.variables.get(name)
    }

    /// Number of slots a frame needs.
    pub fn frame_size(&self) -> usize {
        self.max_slot
    }
}
