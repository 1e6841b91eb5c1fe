//! Transaction aggregation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::transaction::Transaction;

/// Transactions collected from one or more statements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    /// Transactions in encounter order.
    pub transactions: Vec<Transaction>,
    /// Sum of all amounts.
    pub total: Decimal,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, transaction: Transaction) {
        self.total += transaction.amount;
        self.transactions.push(transaction);
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Transactions by transaction date, newest first. Equal dates keep their
    /// encounter order.
    pub fn into_sorted(self) -> Vec<Transaction> {
        let mut transactions = self.transactions;
        transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        transactions
    }
}

impl Extend<Transaction> for Ledger {
    fn extend<I: IntoIterator<Item = Transaction>>(&mut self, iter: I) {
        for transaction in iter {
            self.push(transaction);
        }
    }
}

impl FromIterator<Transaction> for Ledger {
    fn from_iter<I: IntoIterator<Item = Transaction>>(iter: I) -> Self {
        let mut ledger = Ledger::new();
        ledger.extend(iter);
        ledger
    }
}
