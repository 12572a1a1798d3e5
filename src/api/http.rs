// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use super::wire::{self, error_message};
use super::{
    ApiError, BudgetMonth, BudgetSearch, CategoryTransactions, ChartData, CreatedBudget,
    CreatedBudgetExpense, CreatedCategory, CreatedTransaction, DateRange, EditBudgetExpenseBody,
    EditTransactionBody, EditedBudgetExpense, FinanceApi, LedgerRecord, ManageTransactionBody,
    NewBudgetExpense, NewCategory, NewLedgerEntry, NewTransaction, RouteStyle, Settlement,
    SettlementResult, TransactionEdit, TransactionPatch, TransactionSearch,
};
use crate::config::Config;
use crate::models::{Ledger, RowId, TransactionKind};
use crate::utils::http_client;
use anyhow::Result;
use reqwest::blocking::multipart::Form;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::{Value, json};

/// Blocking client for the tracker's HTTP API.
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
    routes: RouteStyle,
}

impl HttpApi {
    pub fn new(cfg: &Config) -> Result<Self> {
        Ok(Self {
            client: http_client(cfg.timeout_secs)?,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            routes: cfg.transaction_routes,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn send(&self, rb: RequestBuilder, method: &str, path: &str) -> Result<Value, ApiError> {
        tracing::debug!(method, path, "sending request");
        let resp = rb.send()?;
        let status = resp.status();
        let text = resp.text()?;
        let body = if text.trim().is_empty() {
            Some(Value::Null)
        } else {
            serde_json::from_str::<Value>(&text).ok()
        };
        tracing::debug!(method, path, status = status.as_u16(), "response received");

        if !status.is_success() {
            let message = body
                .as_ref()
                .and_then(error_message)
                .unwrap_or_else(|| text.trim().chars().take(200).collect());
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }
        body.ok_or_else(|| ApiError::Decode(format!("{} {} did not return JSON", method, path)))
    }

    fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value, ApiError> {
        self.send(self.client.post(self.url(path)).json(body), "POST", path)
    }

    fn post_empty(&self, path: &str) -> Result<Value, ApiError> {
        self.send(self.client.post(self.url(path)), "POST", path)
    }

    fn post_form(
        &self,
        path: &str,
        fields: Vec<(&'static str, String)>,
    ) -> Result<Value, ApiError> {
        let form = fields
            .into_iter()
            .fold(Form::new(), |form, (k, v)| form.text(k, v));
        self.send(self.client.post(self.url(path)).multipart(form), "POST", path)
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ApiError> {
        self.send(self.client.get(self.url(path)).query(query), "GET", path)
    }
}

impl FinanceApi for HttpApi {
    fn create_transaction(&self, req: &NewTransaction) -> Result<CreatedTransaction, ApiError> {
        let path = format!("/create_{}_transaction", req.kind.slug());
        wire::decode(self.post_form(&path, req.form_fields())?)
    }

    fn edit_transaction(
        &self,
        kind: TransactionKind,
        id: RowId,
        patch: &TransactionPatch,
    ) -> Result<TransactionEdit, ApiError> {
        let body = match self.routes {
            RouteStyle::Classic => {
                let path = format!("/edit_{}_transaction", kind.slug());
                let body = EditTransactionBody {
                    transaction_id: id,
                    new_date: patch.date,
                    new_amount: patch.amount,
                    new_description: &patch.description,
                    new_category_id: patch.category_id,
                };
                self.post_json(&path, &body)?
            }
            RouteStyle::Manage => {
                let path = format!("/manage_{}_transaction/{}?action=edit", kind.slug(), id);
                let body = ManageTransactionBody {
                    description: &patch.description,
                    amount: patch.amount,
                    date: patch.date,
                };
                self.send(self.client.put(self.url(&path)).json(&body), "PUT", &path)?
            }
        };
        wire::decode(body)
    }

    fn delete_transaction(&self, kind: TransactionKind, id: RowId) -> Result<(), ApiError> {
        let body = match self.routes {
            RouteStyle::Classic => {
                let path = format!("/delete_{}_transaction", kind.slug());
                self.post_json(&path, &json!({ "transaction_id": id }))?
            }
            RouteStyle::Manage => {
                let path = format!("/manage_{}_transaction/{}?action=delete", kind.slug(), id);
                self.send(self.client.delete(self.url(&path)), "DELETE", &path)?
            }
        };
        wire::check_ack(&body)
    }

    fn search_transactions(
        &self,
        kind: TransactionKind,
        range: &DateRange,
    ) -> Result<TransactionSearch, ApiError> {
        let path = format!("/search_{}_transactions", kind.slug());
        let query = [
            ("from", range.from.format("%Y-%m-%d").to_string()),
            ("to", range.to.format("%Y-%m-%d").to_string()),
        ];
        wire::decode(self.get(&path, &query)?)
    }

    fn transactions_by_category(
        &self,
        kind: TransactionKind,
        category_name: &str,
    ) -> Result<CategoryTransactions, ApiError> {
        let path = format!("/{}", kind.slug());
        wire::decode(self.post_json(&path, &json!({ "category_name": category_name }))?)
    }

    fn create_category(&self, req: &NewCategory) -> Result<CreatedCategory, ApiError> {
        let path = format!("/create_{}_category", req.kind.slug());
        let body = match req.kind {
            TransactionKind::Expense => {
                self.post_json(&path, &json!({ "categoryName": req.name }))?
            }
            TransactionKind::Income => {
                let income_type = req.income_type.map(|t| t.to_string()).unwrap_or_default();
                self.post_form(
                    &path,
                    vec![("categoryName", req.name.clone()), ("incomeType", income_type)],
                )?
            }
        };
        wire::decode(body)
    }

    fn create_budget(&self) -> Result<CreatedBudget, ApiError> {
        wire::decode(self.post_empty("/budget")?)
    }

    fn search_budget(&self, month: &BudgetMonth) -> Result<BudgetSearch, ApiError> {
        wire::decode(self.post_json("/search_budget_by_year_month", month)?)
    }

    fn budget_expenses(&self, budget_id: RowId) -> Result<BudgetSearch, ApiError> {
        let path = format!("/search_budget_expenses/{}", budget_id);
        wire::decode(self.get(&path, &[])?)
    }

    fn create_budget_expense(
        &self,
        req: &NewBudgetExpense,
    ) -> Result<CreatedBudgetExpense, ApiError> {
        wire::decode(self.post_json("/create_budget_expense", req)?)
    }

    fn edit_budget_expense(
        &self,
        body: &EditBudgetExpenseBody,
    ) -> Result<EditedBudgetExpense, ApiError> {
        wire::decode(self.post_json("/edit_budget_expense", body)?)
    }

    fn delete_budget_expense(&self, id: RowId) -> Result<(), ApiError> {
        let body = self.post_json("/delete_budget_expense", &json!({ "budget_expense_id": id }))?;
        wire::check_ack(&body)
    }

    fn create_ledger_entry(
        &self,
        ledger: Ledger,
        req: &NewLedgerEntry,
    ) -> Result<LedgerRecord, ApiError> {
        wire::decode(self.post_json(&format!("/{}", ledger.slug()), req)?)
    }

    fn settle(&self, ledger: Ledger, req: &Settlement) -> Result<SettlementResult, ApiError> {
        wire::decode(self.post_json(&format!("/{}/settle", ledger.slug()), req)?)
    }

    fn chart_data(&self) -> Result<ChartData, ApiError> {
        wire::decode(self.post_empty("/chart_data")?)
    }
}
