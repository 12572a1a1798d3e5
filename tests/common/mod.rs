// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use chrono::NaiveDate;
use finsync::api::wire;
use finsync::api::{
    ApiError, BudgetMonth, BudgetSearch, CategoryTransactions, ChartData, CreatedBudget,
    CreatedBudgetExpense, CreatedCategory, CreatedTransaction, DateRange, EditBudgetExpenseBody,
    EditTransactionBody, EditedBudgetExpense, FinanceApi, LedgerRecord, ManageTransactionBody,
    NewBudgetExpense, NewCategory, NewLedgerEntry, NewTransaction, RouteStyle, Settlement,
    SettlementResult, TransactionEdit, TransactionPatch, TransactionSearch,
};
use finsync::commands::Session;
use finsync::config::Config;
use finsync::models::{Ledger, RowId, TransactionKind};
use finsync::validate::FixedClock;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()
}

pub fn clock() -> FixedClock {
    FixedClock(today())
}

pub fn session(api: &FakeApi) -> Session<FakeApi> {
    let config = Config {
        transaction_routes: api.routes,
        ..Config::default()
    };
    Session::with_clock(api.clone(), config, clock())
}

#[derive(Debug, Clone)]
pub struct Call {
    pub endpoint: String,
    pub body: Value,
}

enum Reply {
    Body(Value),
    Status(u16, String),
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    replies: HashMap<String, VecDeque<Reply>>,
}

/// In-memory stand-in for the tracker server. Replies are scripted per
/// endpoint path and decoded exactly like real responses.
#[derive(Clone, Default)]
pub struct FakeApi {
    inner: Rc<RefCell<Inner>>,
    routes: RouteStyle,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Server that edits and deletes transactions through the manage routes.
    pub fn manage() -> Self {
        Self {
            routes: RouteStyle::Manage,
            ..Self::default()
        }
    }

    pub fn reply(&self, endpoint: &str, body: Value) -> &Self {
        self.inner
            .borrow_mut()
            .replies
            .entry(endpoint.to_string())
            .or_default()
            .push_back(Reply::Body(body));
        self
    }

    pub fn fail(&self, endpoint: &str, status: u16, message: &str) -> &Self {
        self.inner
            .borrow_mut()
            .replies
            .entry(endpoint.to_string())
            .or_default()
            .push_back(Reply::Status(status, message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.borrow().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls.len()
    }

    pub fn bodies(&self, endpoint: &str) -> Vec<Value> {
        self.inner
            .borrow()
            .calls
            .iter()
            .filter(|c| c.endpoint == endpoint)
            .map(|c| c.body.clone())
            .collect()
    }

    fn exchange(&self, endpoint: &str, body: Value) -> Result<Value, ApiError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(Call {
            endpoint: endpoint.to_string(),
            body,
        });
        let reply = inner
            .replies
            .get_mut(endpoint)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no scripted reply for {}", endpoint));
        match reply {
            Reply::Body(v) => Ok(v),
            Reply::Status(status, message) => Err(ApiError::Status { status, message }),
        }
    }

    fn answer<T: DeserializeOwned>(&self, endpoint: &str, body: Value) -> Result<T, ApiError> {
        wire::decode(self.exchange(endpoint, body)?)
    }

    fn ack(&self, endpoint: &str, body: Value) -> Result<(), ApiError> {
        wire::check_ack(&self.exchange(endpoint, body)?)
    }
}

fn fields(pairs: Vec<(&'static str, String)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::String(v)))
        .collect();
    Value::Object(map)
}

fn to_json<T: serde::Serialize>(v: &T) -> Value {
    serde_json::to_value(v).unwrap()
}

impl FinanceApi for FakeApi {
    fn create_transaction(&self, req: &NewTransaction) -> Result<CreatedTransaction, ApiError> {
        let path = format!("/create_{}_transaction", req.kind.slug());
        self.answer(&path, fields(req.form_fields()))
    }

    fn edit_transaction(
        &self,
        kind: TransactionKind,
        id: RowId,
        patch: &TransactionPatch,
    ) -> Result<TransactionEdit, ApiError> {
        match self.routes {
            RouteStyle::Classic => {
                let body = EditTransactionBody {
                    transaction_id: id,
                    new_date: patch.date,
                    new_amount: patch.amount,
                    new_description: &patch.description,
                    new_category_id: patch.category_id,
                };
                self.answer(&format!("/edit_{}_transaction", kind.slug()), to_json(&body))
            }
            RouteStyle::Manage => {
                let body = ManageTransactionBody {
                    description: &patch.description,
                    amount: patch.amount,
                    date: patch.date,
                };
                let path = format!("/manage_{}_transaction/{}?action=edit", kind.slug(), id);
                self.answer(&path, to_json(&body))
            }
        }
    }

    fn delete_transaction(&self, kind: TransactionKind, id: RowId) -> Result<(), ApiError> {
        match self.routes {
            RouteStyle::Classic => self.ack(
                &format!("/delete_{}_transaction", kind.slug()),
                json!({ "transaction_id": id }),
            ),
            RouteStyle::Manage => self.ack(
                &format!("/manage_{}_transaction/{}?action=delete", kind.slug(), id),
                Value::Null,
            ),
        }
    }

    fn search_transactions(
        &self,
        kind: TransactionKind,
        range: &DateRange,
    ) -> Result<TransactionSearch, ApiError> {
        self.answer(
            &format!("/search_{}_transactions", kind.slug()),
            json!({ "from": range.from.to_string(), "to": range.to.to_string() }),
        )
    }

    fn transactions_by_category(
        &self,
        kind: TransactionKind,
        category_name: &str,
    ) -> Result<CategoryTransactions, ApiError> {
        self.answer(
            &format!("/{}", kind.slug()),
            json!({ "category_name": category_name }),
        )
    }

    fn create_category(&self, req: &NewCategory) -> Result<CreatedCategory, ApiError> {
        let body = match req.income_type {
            Some(t) => json!({ "categoryName": req.name, "incomeType": t.to_string() }),
            None => json!({ "categoryName": req.name }),
        };
        self.answer(&format!("/create_{}_category", req.kind.slug()), body)
    }

    fn create_budget(&self) -> Result<CreatedBudget, ApiError> {
        self.answer("/budget", Value::Null)
    }

    fn search_budget(&self, month: &BudgetMonth) -> Result<BudgetSearch, ApiError> {
        self.answer("/search_budget_by_year_month", to_json(month))
    }

    fn budget_expenses(&self, budget_id: RowId) -> Result<BudgetSearch, ApiError> {
        self.answer(&format!("/search_budget_expenses/{}", budget_id), Value::Null)
    }

    fn create_budget_expense(
        &self,
        req: &NewBudgetExpense,
    ) -> Result<CreatedBudgetExpense, ApiError> {
        self.answer("/create_budget_expense", to_json(req))
    }

    fn edit_budget_expense(
        &self,
        body: &EditBudgetExpenseBody,
    ) -> Result<EditedBudgetExpense, ApiError> {
        self.answer("/edit_budget_expense", to_json(body))
    }

    fn delete_budget_expense(&self, id: RowId) -> Result<(), ApiError> {
        self.ack("/delete_budget_expense", json!({ "budget_expense_id": id }))
    }

    fn create_ledger_entry(
        &self,
        ledger: Ledger,
        req: &NewLedgerEntry,
    ) -> Result<LedgerRecord, ApiError> {
        self.answer(&format!("/{}", ledger.slug()), to_json(req))
    }

    fn settle(&self, ledger: Ledger, req: &Settlement) -> Result<SettlementResult, ApiError> {
        self.answer(&format!("/{}/settle", ledger.slug()), to_json(req))
    }

    fn chart_data(&self) -> Result<ChartData, ApiError> {
        self.answer("/chart_data", Value::Null)
    }
}

/// Reply body of `POST /create_expense_transaction`.
pub fn created_expense(id: RowId, category: &str, amount: &str, date: &str) -> Value {
    json!({
        "message": "Transaction created successfully",
        "transaction_id": id,
        "expense_category_name": category,
        "amount": amount,
        "description": "",
        "date": date
    })
}

/// Reply body of a date-range search with the given `(id, category, amount, date)` rows.
pub fn expense_search(rows: &[(RowId, &str, f64, &str)]) -> Value {
    let items: Vec<Value> = rows
        .iter()
        .map(|(id, name, amount, date)| {
            json!({"id": id, "name": name, "amount": amount, "date": date, "description": ""})
        })
        .collect();
    let total: f64 = rows.iter().map(|r| r.2).sum();
    json!({
        "total_expense": total.to_string(),
        "individual_expenses": items,
        "expense_totals": {}
    })
}
