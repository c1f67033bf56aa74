//! Transaction management for the finance tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the input types for creating and editing transactions
//! - Database functions for storing, querying, and managing transactions
//! - Route handlers for the transaction JSON API

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;

pub use self::core::{
    NewTransaction, Transaction, TransactionInput, TransactionPatch, create_transaction,
    create_transaction_table, delete_transaction, get_all_transactions, update_transaction,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{DeletedMessage, delete_transaction_endpoint};
pub use edit_endpoint::edit_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;

#[cfg(test)]
pub use self::core::{count_transactions, get_transaction};
