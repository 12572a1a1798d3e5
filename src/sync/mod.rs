// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The sync controller: runs one user action at a time per action slot
//! against the API and folds the result into the local table.
//!
//! Every action has two halves. `begin_*` checks the slot, validates the
//! form, locates the target row and claims the slot; nothing touches the
//! network before it succeeds. `complete_*` takes the server's answer,
//! applies it (or not) and releases the slot. `dispatch_*` sits in between
//! and is the only part that talks to the API, so a front end that needs to
//! stay responsive can run it elsewhere and complete later.

pub mod kinds;

use crate::api::{ApiError, FinanceApi};
use crate::error::{Action, SyncError};
use crate::models::RowId;
use crate::notify::{Level, Notices};
use crate::projector::Projection;
use crate::table::{LocalTable, Row};
use crate::validate::{Clock, SystemClock};
use kinds::{Deletable, Editable, EntityKind, Searchable};
use std::collections::HashMap;

pub use kinds::{
    BudgetCriteria, BudgetExpenseView, BudgetQuery, BudgetView, CategoryView, LedgerView,
    TransactionCriteria, TransactionQuery, TransactionView,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Idle,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Failed,
}

#[derive(Debug, Clone, Copy)]
struct Slot {
    state: SlotState,
    last: Option<Outcome>,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            state: SlotState::Idle,
            last: None,
        }
    }
}

/// An action that has claimed its slot and awaits the server.
#[derive(Debug)]
#[must_use = "a pending action holds its slot until completed"]
pub struct Pending<T> {
    action: Action,
    payload: T,
}

impl<T> Pending<T> {
    pub fn action(&self) -> Action {
        self.action
    }

    pub fn payload(&self) -> &T {
        &self.payload
    }
}

pub struct SyncController<K: EntityKind, A> {
    kind: K,
    api: A,
    table: LocalTable<K::Row>,
    projection: Projection,
    slots: HashMap<Action, Slot>,
    notices: Notices,
    clock: Box<dyn Clock>,
}

impl<K: EntityKind, A: FinanceApi> SyncController<K, A> {
    pub fn new(kind: K, api: A) -> Self {
        Self {
            kind,
            api,
            table: LocalTable::new(),
            projection: Projection::default(),
            slots: HashMap::new(),
            notices: Notices::default(),
            clock: Box::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn kind(&self) -> &K {
        &self.kind
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn table(&self) -> &LocalTable<K::Row> {
        &self.table
    }

    pub fn rows(&self) -> &[K::Row] {
        self.table.rows()
    }

    pub fn get(&self, id: RowId) -> Option<&K::Row> {
        self.table.get(id)
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn notices(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub fn state(&self, action: Action) -> SlotState {
        self.slots.get(&action).map_or(SlotState::Idle, |s| s.state)
    }

    pub fn last_outcome(&self, action: Action) -> Option<Outcome> {
        self.slots.get(&action).and_then(|s| s.last)
    }

    fn ensure_idle(&self, action: Action) -> Result<(), SyncError> {
        if self.state(action) == SlotState::Submitting {
            tracing::debug!(%action, "slot busy; refusing");
            return Err(SyncError::Busy(action));
        }
        Ok(())
    }

    fn claim<T>(&mut self, action: Action, payload: T) -> Pending<T> {
        self.slots.entry(action).or_default().state = SlotState::Submitting;
        tracing::debug!(%action, kind = self.kind.label(), "submitting");
        Pending { action, payload }
    }

    fn release(&mut self, action: Action, outcome: Outcome) {
        let slot = self.slots.entry(action).or_default();
        slot.state = SlotState::Idle;
        slot.last = Some(outcome);
    }

    fn reproject(&mut self) {
        self.projection = self.kind.project(self.table.rows());
    }

    fn fail<T>(&mut self, action: Action, err: SyncError) -> Result<T, SyncError> {
        tracing::error!(%action, kind = self.kind.label(), error = %err, "action failed");
        self.notices.push(Level::Error, err.user_message());
        self.release(action, Outcome::Failed);
        Err(err)
    }

    fn succeed(&mut self, action: Action, message: String) {
        tracing::info!(%action, kind = self.kind.label(), "applied");
        self.reproject();
        self.notices.push(Level::Success, message);
        self.release(action, Outcome::Applied);
    }

    pub fn begin_create(&mut self, form: &K::Form) -> Result<Pending<K::Request>, SyncError> {
        self.ensure_idle(Action::Create)?;
        let req = self.kind.validate(form, self.clock.today())?;
        Ok(self.claim(Action::Create, req))
    }

    pub fn dispatch_create(&self, pending: &Pending<K::Request>) -> Result<K::Created, ApiError> {
        self.kind.send_create(&self.api, &pending.payload)
    }

    pub fn complete_create(
        &mut self,
        pending: Pending<K::Request>,
        result: Result<K::Created, ApiError>,
    ) -> Result<RowId, SyncError> {
        let created = match result {
            Ok(c) => c,
            Err(e) => {
                let err = self.kind.map_error(e);
                return self.fail(Action::Create, err);
            }
        };
        let notice = self.kind.create_notice(&created);
        let row = match self.kind.row_from_created(&pending.payload, created) {
            Ok(r) => r,
            Err(e) => return self.fail(Action::Create, e),
        };

        let id = row.id();
        if self.table.contains(id) {
            tracing::warn!(id, "create returned an id already in view; replacing that row");
            self.table.replace(id, move |r| *r = row);
        } else {
            self.table.insert_at_head(row);
        }
        let message = notice.unwrap_or_else(|| format!("Created {} {}", self.kind.label(), id));
        self.succeed(Action::Create, message);
        Ok(id)
    }

    pub fn create(&mut self, form: &K::Form) -> Result<RowId, SyncError> {
        let pending = self.begin_create(form)?;
        let result = self.dispatch_create(&pending);
        self.complete_create(pending, result)
    }

    /// Run a search and reset the table to its result set.
    pub fn begin_search(&mut self, query: &K::Query) -> Result<Pending<K::Criteria>, SyncError>
    where
        K: Searchable,
    {
        self.ensure_idle(Action::Search)?;
        let criteria = self.kind.validate_query(query, self.clock.today())?;
        Ok(self.claim(Action::Search, criteria))
    }

    pub fn dispatch_search(&self, pending: &Pending<K::Criteria>) -> Result<K::Found, ApiError>
    where
        K: Searchable,
    {
        self.kind.send_search(&self.api, &pending.payload)
    }

    pub fn complete_search(
        &mut self,
        _pending: Pending<K::Criteria>,
        result: Result<K::Found, ApiError>,
    ) -> Result<K::Found, SyncError>
    where
        K: Searchable,
    {
        let found = match result {
            Ok(f) => f,
            Err(e) => {
                let err = self.kind.map_error(e);
                return self.fail(Action::Search, err);
            }
        };
        let rows = self.kind.rows_from_found(&found);
        self.table.reset(rows);
        self.reproject();
        if self.table.is_empty() {
            if let Some(message) = self.kind.empty_notice() {
                self.notices.push(Level::Info, message);
            }
        }
        tracing::info!(kind = self.kind.label(), rows = self.table.len(), "search applied");
        self.release(Action::Search, Outcome::Applied);
        Ok(found)
    }

    pub fn search(&mut self, query: &K::Query) -> Result<K::Found, SyncError>
    where
        K: Searchable,
    {
        let pending = self.begin_search(query)?;
        let result = self.dispatch_search(&pending);
        self.complete_search(pending, result)
    }

    pub fn begin_edit(
        &mut self,
        id: RowId,
        patch: &K::Patch,
    ) -> Result<Pending<(K::Row, K::PatchRequest)>, SyncError>
    where
        K: Editable,
    {
        self.ensure_idle(Action::Edit)?;
        let row = self.table.get(id).cloned().ok_or(SyncError::NotInView {
            kind: self.kind.label(),
            id,
        })?;
        let req = self.kind.validate_patch(&row, patch, self.clock.today())?;
        Ok(self.claim(Action::Edit, (row, req)))
    }

    pub fn dispatch_edit(
        &self,
        pending: &Pending<(K::Row, K::PatchRequest)>,
    ) -> Result<K::Edited, ApiError>
    where
        K: Editable,
    {
        let (row, req) = &pending.payload;
        self.kind.send_edit(&self.api, row, req)
    }

    pub fn complete_edit(
        &mut self,
        pending: Pending<(K::Row, K::PatchRequest)>,
        result: Result<K::Edited, ApiError>,
    ) -> Result<RowId, SyncError>
    where
        K: Editable,
    {
        let (row, req) = pending.payload;
        let id = row.id();
        let edited = match result {
            Ok(e) => e,
            Err(e) => {
                let err = self.kind.map_error(e);
                return self.fail(Action::Edit, err);
            }
        };

        let kind = &self.kind;
        let applied = self
            .table
            .replace(id, |r| kind.apply_edit(r, &req, &edited));
        if !applied {
            let label = self.kind.label();
            tracing::warn!(id, kind = label, "edit answered after the row left the view");
            self.notices.push(
                Level::Info,
                format!("The {} was saved but is no longer in view", label),
            );
            self.reproject();
            self.release(Action::Edit, Outcome::Failed);
            return Err(SyncError::Stale { kind: label, id });
        }

        let message = self
            .kind
            .edit_notice(&edited)
            .unwrap_or_else(|| format!("Updated {} {}", self.kind.label(), id));
        self.succeed(Action::Edit, message);
        Ok(id)
    }

    pub fn edit(&mut self, id: RowId, patch: &K::Patch) -> Result<RowId, SyncError>
    where
        K: Editable,
    {
        let pending = self.begin_edit(id, patch)?;
        let result = self.dispatch_edit(&pending);
        self.complete_edit(pending, result)
    }

    pub fn begin_delete(&mut self, id: RowId) -> Result<Pending<K::Row>, SyncError>
    where
        K: Deletable,
    {
        self.ensure_idle(Action::Delete)?;
        let row = self.table.get(id).cloned().ok_or(SyncError::NotInView {
            kind: self.kind.label(),
            id,
        })?;
        Ok(self.claim(Action::Delete, row))
    }

    pub fn dispatch_delete(&self, pending: &Pending<K::Row>) -> Result<(), ApiError>
    where
        K: Deletable,
    {
        self.kind.send_delete(&self.api, &pending.payload)
    }

    pub fn complete_delete(
        &mut self,
        pending: Pending<K::Row>,
        result: Result<(), ApiError>,
    ) -> Result<RowId, SyncError>
    where
        K: Deletable,
    {
        let id = pending.payload.id();
        if let Err(e) = result {
            let err = self.kind.map_error(e);
            return self.fail(Action::Delete, err);
        }
        if self.table.remove(id).is_none() {
            tracing::debug!(id, "deleted row had already left the view");
        }
        let message = format!("Deleted {} {}", self.kind.label(), id);
        self.succeed(Action::Delete, message);
        Ok(id)
    }

    pub fn delete(&mut self, id: RowId) -> Result<RowId, SyncError>
    where
        K: Deletable,
    {
        let pending = self.begin_delete(id)?;
        let result = self.dispatch_delete(&pending);
        self.complete_delete(pending, result)
    }
}
