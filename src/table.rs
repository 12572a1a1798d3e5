// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Client-held mirror of the rows shown in the current view.
//!
//! Rows are kept newest first in the order they arrived, never sorted by a
//! field. The table holds at most one row per id.

use crate::models::{Budget, BudgetExpense, Category, LedgerEntry, RowId, Transaction};
use std::collections::HashSet;

pub trait Row {
    fn id(&self) -> RowId;
}

impl Row for Transaction {
    fn id(&self) -> RowId {
        self.id
    }
}

impl Row for Category {
    fn id(&self) -> RowId {
        self.id
    }
}

impl Row for Budget {
    fn id(&self) -> RowId {
        self.id
    }
}

impl Row for BudgetExpense {
    fn id(&self) -> RowId {
        self.id
    }
}

impl Row for LedgerEntry {
    fn id(&self) -> RowId {
        self.id
    }
}

#[derive(Debug, Clone)]
pub struct LocalTable<R> {
    rows: Vec<R>,
}

impl<R> Default for LocalTable<R> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<R: Row> LocalTable<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly created row as the most recent one.
    ///
    /// The id is not checked: callers only insert ids taken from a create
    /// response.
    pub fn insert_at_head(&mut self, row: R) {
        self.rows.insert(0, row);
    }

    /// Apply `patch` to the row with `id`. Returns `false`, leaving the table
    /// untouched, when no such row is present.
    pub fn replace<F>(&mut self, id: RowId, patch: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        match self.rows.iter_mut().find(|r| r.id() == id) {
            Some(row) => {
                patch(row);
                true
            }
            None => {
                tracing::warn!(id, "replace on a row that is not in the table; ignoring");
                false
            }
        }
    }

    /// Remove the row with `id`. Removing an absent id is a no-op.
    pub fn remove(&mut self, id: RowId) -> Option<R> {
        let pos = self.rows.iter().position(|r| r.id() == id)?;
        Some(self.rows.remove(pos))
    }

    /// Replace the whole table with a fresh result set, keeping its order.
    /// Repeated ids keep their first occurrence only.
    pub fn reset(&mut self, rows: Vec<R>) {
        let mut seen = HashSet::with_capacity(rows.len());
        let before = rows.len();
        self.rows = rows.into_iter().filter(|r| seen.insert(r.id())).collect();
        if self.rows.len() != before {
            tracing::warn!(
                dropped = before - self.rows.len(),
                "result set contained repeated ids"
            );
        }
    }

    pub fn get(&self, id: RowId) -> Option<&R> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.get(id).is_some()
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
