//! Income and expense records.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the database functions for storing and listing them
//! - The form for recording a transaction and its endpoint
//! - The transactions page and the spreadsheet report

mod core;
mod create_endpoint;
mod create_page;
mod export;
mod form;
mod transactions_page;

pub use core::{
    NewTransaction, Transaction, TransactionType, create_transaction, create_transaction_table,
    get_transactions_for_user,
};
pub use create_endpoint::create_transaction_endpoint;
pub use create_page::get_create_transaction_page;
pub use export::get_transactions_report;
pub use transactions_page::{get_transactions_page, transaction_table};
