// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Per-entity descriptors for [`SyncController`](super::SyncController).
//!
//! Each view says how a form is validated, which endpoint it goes to, and how
//! the response becomes (or changes) a row. Capabilities a view lacks are
//! simply not implemented, so e.g. editing a category does not compile.

use crate::api::{
    ApiError, BudgetMonth, BudgetSearch, CreatedBudget, CreatedBudgetExpense, CreatedCategory,
    CreatedTransaction, DateRange, EditBudgetExpenseBody, EditedBudgetExpense, FinanceApi,
    LedgerRecord, NewBudgetExpense, NewCategory, NewLedgerEntry, NewTransaction, RouteStyle,
    Settlement, SettlementResult, TransactionEdit, TransactionPatch, TransactionSearch,
};
use crate::error::SyncError;
use crate::models::{
    Budget, BudgetExpense, Category, Ledger, LedgerEntry, RowId, Transaction, TransactionKind,
};
use crate::projector::{self, Projection, percentage};
use crate::table::Row;
use crate::validate::{
    self, BudgetExpenseEditForm, BudgetExpenseForm, CategoryForm, DateRangeForm, LedgerForm,
    PaymentForm, TransactionEditForm, TransactionForm, ValidationError,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

pub const DUPLICATE_CATEGORY: &str = "Category names must be unique";
pub const EMPTY_SEARCH: &str = "No existing transactions in that date period";

pub trait EntityKind {
    type Row: Row + Clone;
    type Form;
    type Request;
    type Created;

    /// Singular noun used in messages.
    fn label(&self) -> &'static str;

    fn validate(&self, form: &Self::Form, today: NaiveDate)
    -> Result<Self::Request, ValidationError>;

    fn send_create<A: FinanceApi>(
        &self,
        api: &A,
        req: &Self::Request,
    ) -> Result<Self::Created, ApiError>;

    fn row_from_created(
        &self,
        req: &Self::Request,
        created: Self::Created,
    ) -> Result<Self::Row, SyncError>;

    fn create_notice(&self, _created: &Self::Created) -> Option<String> {
        None
    }

    fn map_error(&self, err: ApiError) -> SyncError {
        SyncError::Api(err)
    }

    fn project(&self, _rows: &[Self::Row]) -> Projection {
        Projection::default()
    }
}

pub trait Editable: EntityKind {
    type Patch;
    type PatchRequest;
    type Edited;

    fn validate_patch(
        &self,
        row: &Self::Row,
        patch: &Self::Patch,
        today: NaiveDate,
    ) -> Result<Self::PatchRequest, ValidationError>;

    fn send_edit<A: FinanceApi>(
        &self,
        api: &A,
        row: &Self::Row,
        req: &Self::PatchRequest,
    ) -> Result<Self::Edited, ApiError>;

    fn apply_edit(&self, row: &mut Self::Row, req: &Self::PatchRequest, edited: &Self::Edited);

    fn edit_notice(&self, _edited: &Self::Edited) -> Option<String> {
        None
    }
}

pub trait Deletable: EntityKind {
    fn send_delete<A: FinanceApi>(&self, api: &A, row: &Self::Row) -> Result<(), ApiError>;
}

pub trait Searchable: EntityKind {
    type Query;
    type Criteria;
    type Found;

    fn validate_query(
        &self,
        query: &Self::Query,
        today: NaiveDate,
    ) -> Result<Self::Criteria, ValidationError>;

    fn send_search<A: FinanceApi>(
        &self,
        api: &A,
        criteria: &Self::Criteria,
    ) -> Result<Self::Found, ApiError>;

    fn rows_from_found(&self, found: &Self::Found) -> Vec<Self::Row>;

    /// Banner raised when a search comes back empty.
    fn empty_notice(&self) -> Option<&'static str> {
        None
    }
}

fn non_empty(message: &str) -> Option<String> {
    (!message.trim().is_empty()).then(|| message.to_string())
}

// ---------------------------------------------------------------------------
// Income / expense transactions

#[derive(Debug, Clone, Copy)]
pub struct TransactionView {
    pub kind: TransactionKind,
    /// Income category that stands for borrowed money.
    pub debt_income_category_id: i64,
    /// Route family the API client edits through.
    pub routes: RouteStyle,
}

impl TransactionView {
    pub fn new(kind: TransactionKind, debt_income_category_id: i64) -> Self {
        Self {
            kind,
            debt_income_category_id,
            routes: RouteStyle::Classic,
        }
    }

    pub fn with_routes(mut self, routes: RouteStyle) -> Self {
        self.routes = routes;
        self
    }
}

#[derive(Debug, Clone)]
pub enum TransactionQuery {
    Range(DateRangeForm),
    Category(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransactionCriteria {
    Range(DateRange),
    Category(String),
}

impl EntityKind for TransactionView {
    type Row = Transaction;
    type Form = TransactionForm;
    type Request = NewTransaction;
    type Created = CreatedTransaction;

    fn label(&self) -> &'static str {
        match self.kind {
            TransactionKind::Income => "income transaction",
            TransactionKind::Expense => "expense transaction",
        }
    }

    fn validate(
        &self,
        form: &TransactionForm,
        today: NaiveDate,
    ) -> Result<NewTransaction, ValidationError> {
        validate::transaction(form, self.kind, self.debt_income_category_id, today)
    }

    fn send_create<A: FinanceApi>(
        &self,
        api: &A,
        req: &NewTransaction,
    ) -> Result<CreatedTransaction, ApiError> {
        api.create_transaction(req)
    }

    fn row_from_created(
        &self,
        req: &NewTransaction,
        created: CreatedTransaction,
    ) -> Result<Transaction, SyncError> {
        Ok(Transaction {
            id: created.transaction_id,
            kind: self.kind,
            category_id: Some(req.category_id),
            category_name: created.category_name,
            description: created.description,
            amount: created.amount,
            date: created.date,
        })
    }

    fn create_notice(&self, created: &CreatedTransaction) -> Option<String> {
        non_empty(&created.message)
    }

    fn project(&self, rows: &[Transaction]) -> Projection {
        projector::project(rows)
    }
}

impl Editable for TransactionView {
    type Patch = TransactionEditForm;
    type PatchRequest = TransactionPatch;
    type Edited = TransactionEdit;

    fn validate_patch(
        &self,
        _row: &Transaction,
        patch: &TransactionEditForm,
        today: NaiveDate,
    ) -> Result<TransactionPatch, ValidationError> {
        validate::transaction_edit(patch, self.routes, today)
    }

    fn send_edit<A: FinanceApi>(
        &self,
        api: &A,
        row: &Transaction,
        req: &TransactionPatch,
    ) -> Result<TransactionEdit, ApiError> {
        api.edit_transaction(self.kind, row.id, req)
    }

    fn apply_edit(&self, row: &mut Transaction, req: &TransactionPatch, edited: &TransactionEdit) {
        let e = &edited.edited_transaction;
        row.amount = e.amount.unwrap_or(req.amount);
        row.date = e.date.unwrap_or(req.date);
        row.description = e.description.clone().unwrap_or_else(|| req.description.clone());
        // The manage body carries no category, so only the echo can move it.
        let category_id = match self.routes {
            RouteStyle::Classic => e.category_id.or(req.category_id),
            RouteStyle::Manage => e.category_id,
        };
        if category_id.is_some() {
            row.category_id = category_id;
        }
        if let Some(name) = &e.category_name {
            row.category_name = name.clone();
        }
    }

    fn edit_notice(&self, edited: &TransactionEdit) -> Option<String> {
        non_empty(&edited.message)
    }
}

impl Deletable for TransactionView {
    fn send_delete<A: FinanceApi>(&self, api: &A, row: &Transaction) -> Result<(), ApiError> {
        api.delete_transaction(self.kind, row.id)
    }
}

impl Searchable for TransactionView {
    type Query = TransactionQuery;
    type Criteria = TransactionCriteria;
    type Found = TransactionSearch;

    fn validate_query(
        &self,
        query: &TransactionQuery,
        today: NaiveDate,
    ) -> Result<TransactionCriteria, ValidationError> {
        match query {
            TransactionQuery::Range(form) => {
                validate::date_range(form, today).map(TransactionCriteria::Range)
            }
            TransactionQuery::Category(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ValidationError::EmptyCategoryName);
                }
                Ok(TransactionCriteria::Category(name.to_string()))
            }
        }
    }

    fn send_search<A: FinanceApi>(
        &self,
        api: &A,
        criteria: &TransactionCriteria,
    ) -> Result<TransactionSearch, ApiError> {
        match criteria {
            TransactionCriteria::Range(range) => api.search_transactions(self.kind, range),
            TransactionCriteria::Category(name) => {
                let found = api.transactions_by_category(self.kind, name)?;
                Ok(TransactionSearch {
                    total: found.total,
                    rows: found.transactions,
                    totals: Default::default(),
                })
            }
        }
    }

    fn rows_from_found(&self, found: &TransactionSearch) -> Vec<Transaction> {
        found
            .rows
            .iter()
            .map(|f| Transaction {
                id: f.id,
                kind: self.kind,
                category_id: None,
                category_name: f.name.clone(),
                description: f.description.clone(),
                amount: f.amount,
                date: f.date,
            })
            .collect()
    }

    fn empty_notice(&self) -> Option<&'static str> {
        Some(EMPTY_SEARCH)
    }
}

// ---------------------------------------------------------------------------
// Categories

#[derive(Debug, Clone, Copy)]
pub struct CategoryView {
    pub kind: TransactionKind,
}

impl EntityKind for CategoryView {
    type Row = Category;
    type Form = CategoryForm;
    type Request = NewCategory;
    type Created = CreatedCategory;

    fn label(&self) -> &'static str {
        match self.kind {
            TransactionKind::Income => "income category",
            TransactionKind::Expense => "expense category",
        }
    }

    fn validate(
        &self,
        form: &CategoryForm,
        _today: NaiveDate,
    ) -> Result<NewCategory, ValidationError> {
        validate::category(form, self.kind)
    }

    fn send_create<A: FinanceApi>(
        &self,
        api: &A,
        req: &NewCategory,
    ) -> Result<CreatedCategory, ApiError> {
        api.create_category(req)
    }

    fn row_from_created(
        &self,
        req: &NewCategory,
        created: CreatedCategory,
    ) -> Result<Category, SyncError> {
        match (created.success, created.id) {
            (true, Some(id)) => Ok(Category {
                id,
                name: created.name.unwrap_or_else(|| req.name.clone()),
                kind: self.kind,
            }),
            _ => {
                tracing::warn!(
                    name = %req.name,
                    server_message = created.message.as_deref().unwrap_or(""),
                    "category creation refused"
                );
                Err(SyncError::Rejected(DUPLICATE_CATEGORY.to_string()))
            }
        }
    }

    fn map_error(&self, err: ApiError) -> SyncError {
        match err {
            ApiError::Rejected(_) | ApiError::Status { .. } => {
                tracing::warn!(error = %err, "category creation refused");
                SyncError::Rejected(DUPLICATE_CATEGORY.to_string())
            }
            other => SyncError::Api(other),
        }
    }
}

// ---------------------------------------------------------------------------
// Budgets and budget lines

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetView;

impl EntityKind for BudgetView {
    type Row = Budget;
    type Form = ();
    type Request = ();
    type Created = CreatedBudget;

    fn label(&self) -> &'static str {
        "budget"
    }

    fn validate(&self, _form: &(), _today: NaiveDate) -> Result<(), ValidationError> {
        Ok(())
    }

    fn send_create<A: FinanceApi>(&self, api: &A, _req: &()) -> Result<CreatedBudget, ApiError> {
        api.create_budget()
    }

    fn row_from_created(&self, _req: &(), created: CreatedBudget) -> Result<Budget, SyncError> {
        let month = created.month.number().ok_or_else(|| {
            SyncError::Api(ApiError::Decode(format!(
                "budget {} has an unreadable month {:?}",
                created.id, created.month
            )))
        })?;
        Ok(Budget {
            id: created.id,
            year: created.year,
            month,
            expected_amount: created.expected_amount,
            spent_amount: created.spent_amount,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BudgetExpenseView;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetQuery {
    ById(RowId),
    ByMonth { year: i32, month: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetCriteria {
    ById(RowId),
    ByMonth(BudgetMonth),
}

impl EntityKind for BudgetExpenseView {
    type Row = BudgetExpense;
    type Form = BudgetExpenseForm;
    type Request = NewBudgetExpense;
    type Created = CreatedBudgetExpense;

    fn label(&self) -> &'static str {
        "budget expense"
    }

    fn validate(
        &self,
        form: &BudgetExpenseForm,
        _today: NaiveDate,
    ) -> Result<NewBudgetExpense, ValidationError> {
        validate::budget_expense(form)
    }

    fn send_create<A: FinanceApi>(
        &self,
        api: &A,
        req: &NewBudgetExpense,
    ) -> Result<CreatedBudgetExpense, ApiError> {
        api.create_budget_expense(req)
    }

    fn row_from_created(
        &self,
        _req: &NewBudgetExpense,
        created: CreatedBudgetExpense,
    ) -> Result<BudgetExpense, SyncError> {
        Ok(BudgetExpense {
            id: created.budget_expense_id,
            budget_id: created.budget_id,
            expense_id: created.expense_id,
            expense_name: created.expense_name,
            expected_amount: created.expected_amount,
            spent_amount: created.actual_amount,
        })
    }

    fn create_notice(&self, created: &CreatedBudgetExpense) -> Option<String> {
        non_empty(&created.message)
    }

    fn project(&self, rows: &[BudgetExpense]) -> Projection {
        projector::project(rows)
    }
}

impl Editable for BudgetExpenseView {
    type Patch = BudgetExpenseEditForm;
    type PatchRequest = Decimal;
    type Edited = EditedBudgetExpense;

    fn validate_patch(
        &self,
        _row: &BudgetExpense,
        patch: &BudgetExpenseEditForm,
        _today: NaiveDate,
    ) -> Result<Decimal, ValidationError> {
        validate::budget_expense_edit(patch)
    }

    fn send_edit<A: FinanceApi>(
        &self,
        api: &A,
        row: &BudgetExpense,
        req: &Decimal,
    ) -> Result<EditedBudgetExpense, ApiError> {
        api.edit_budget_expense(&EditBudgetExpenseBody::new(row, *req))
    }

    fn apply_edit(&self, row: &mut BudgetExpense, req: &Decimal, edited: &EditedBudgetExpense) {
        row.expected_amount = edited.updated_expected_amount.unwrap_or(*req);
    }

    fn edit_notice(&self, edited: &EditedBudgetExpense) -> Option<String> {
        non_empty(&edited.message)
    }
}

impl Deletable for BudgetExpenseView {
    fn send_delete<A: FinanceApi>(&self, api: &A, row: &BudgetExpense) -> Result<(), ApiError> {
        api.delete_budget_expense(row.id)
    }
}

impl Searchable for BudgetExpenseView {
    type Query = BudgetQuery;
    type Criteria = BudgetCriteria;
    type Found = BudgetSearch;

    fn validate_query(
        &self,
        query: &BudgetQuery,
        _today: NaiveDate,
    ) -> Result<BudgetCriteria, ValidationError> {
        match *query {
            BudgetQuery::ById(id) => Ok(BudgetCriteria::ById(id)),
            BudgetQuery::ByMonth { year, month } => {
                validate::budget_month(year, month).map(BudgetCriteria::ByMonth)
            }
        }
    }

    fn send_search<A: FinanceApi>(
        &self,
        api: &A,
        criteria: &BudgetCriteria,
    ) -> Result<BudgetSearch, ApiError> {
        match criteria {
            BudgetCriteria::ById(id) => {
                let mut found = api.budget_expenses(*id)?;
                found.budget_id.get_or_insert(*id);
                Ok(found)
            }
            BudgetCriteria::ByMonth(month) => api.search_budget(month),
        }
    }

    fn rows_from_found(&self, found: &BudgetSearch) -> Vec<BudgetExpense> {
        found
            .budget_expenses
            .iter()
            .map(|f| BudgetExpense {
                id: f.id,
                budget_id: f.budget_id,
                expense_id: f.expense_id,
                expense_name: f.expense_name.clone(),
                expected_amount: f.expected_amount,
                spent_amount: f.spent_amount,
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Debt and credit ledgers

#[derive(Debug, Clone, Copy)]
pub struct LedgerView {
    pub ledger: Ledger,
}

impl EntityKind for LedgerView {
    type Row = LedgerEntry;
    type Form = LedgerForm;
    type Request = NewLedgerEntry;
    type Created = LedgerRecord;

    fn label(&self) -> &'static str {
        match self.ledger {
            Ledger::Debt => "debt",
            Ledger::Credit => "credit",
        }
    }

    fn validate(
        &self,
        form: &LedgerForm,
        today: NaiveDate,
    ) -> Result<NewLedgerEntry, ValidationError> {
        validate::ledger_entry(form, today)
    }

    fn send_create<A: FinanceApi>(
        &self,
        api: &A,
        req: &NewLedgerEntry,
    ) -> Result<LedgerRecord, ApiError> {
        api.create_ledger_entry(self.ledger, req)
    }

    fn row_from_created(
        &self,
        _req: &NewLedgerEntry,
        created: LedgerRecord,
    ) -> Result<LedgerEntry, SyncError> {
        Ok(LedgerEntry {
            id: created.id,
            ledger: self.ledger,
            progress: percentage(created.amount_paid, created.amount),
            debtor: created.debtor,
            amount: created.amount,
            amount_paid: created.amount_paid,
            date_taken: created.date_taken,
            date_due: created.date_due,
            description: created.description,
        })
    }

    fn project(&self, rows: &[LedgerEntry]) -> Projection {
        projector::project(rows)
    }
}

/// Settling a loan is the only change a ledger row accepts.
impl Editable for LedgerView {
    type Patch = PaymentForm;
    type PatchRequest = Settlement;
    type Edited = SettlementResult;

    fn validate_patch(
        &self,
        row: &LedgerEntry,
        patch: &PaymentForm,
        today: NaiveDate,
    ) -> Result<Settlement, ValidationError> {
        validate::payment(patch, row, today)
    }

    fn send_edit<A: FinanceApi>(
        &self,
        api: &A,
        _row: &LedgerEntry,
        req: &Settlement,
    ) -> Result<SettlementResult, ApiError> {
        api.settle(self.ledger, req)
    }

    fn apply_edit(&self, row: &mut LedgerEntry, _req: &Settlement, edited: &SettlementResult) {
        row.amount_paid = edited.amount_paid;
        row.progress = edited.progress;
    }

    fn edit_notice(&self, edited: &SettlementResult) -> Option<String> {
        Some(format!(
            "Payment recorded, {}% settled",
            edited.progress.normalize()
        ))
    }
}
