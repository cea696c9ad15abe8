use crate::month::Month;
use crate::transaction_repo::TransactionRepoError::TransactionNotFound;
use crate::transaction_repo::{
    CategoryTotal, MonthTotals, NewTransaction, Transaction, TransactionKind, TransactionRepo,
    TransactionRepoError,
};
use crate::user_repo::UserId;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

struct State {
    transactions: HashMap<i64, Transaction>,
    user_transactions: HashMap<UserId, HashSet<i64>>,
    next_id: i64,
}

pub struct MemTransactionRepo {
    state: RwLock<State>,
}

impl MemTransactionRepo {
    pub fn new() -> MemTransactionRepo {
        let state = State {
            transactions: HashMap::new(),
            user_transactions: HashMap::new(),
            next_id: 1,
        };
        MemTransactionRepo {
            state: RwLock::new(state),
        }
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<State>, anyhow::Error> {
        self.state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

fn user_transactions(state: &State, user: UserId) -> Vec<Transaction> {
    let Some(transaction_ids) = state.user_transactions.get(&user) else {
        return Vec::new();
    };
    transaction_ids
        .iter()
        .map(|id| {
            state
                .transactions
                .get(id)
                .expect("transactions should have all the ids from user_transactions")
        })
        .cloned()
        .collect()
}

#[async_trait]
impl TransactionRepo for MemTransactionRepo {
    async fn get_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
    ) -> Result<Transaction, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let Some(transaction_ids) = read_guard.user_transactions.get(&user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = read_guard
            .transactions
            .get(&transaction_id)
            .expect("transactions should contain same ids as user_transactions")
            .clone();
        Ok(transaction)
    }

    async fn get_all_transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<Transaction>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let mut transactions = user_transactions(&read_guard, user);
        transactions.sort_by(|a, b| {
            (b.date, b.created_at, b.id).cmp(&(a.date, a.created_at, a.id))
        });
        Ok(transactions)
    }

    async fn create_new_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let id = write_guard.next_id;
        write_guard.next_id += 1;

        let transaction = new_transaction.into_transaction(id, Utc::now());

        write_guard.transactions.insert(id, transaction.clone());
        write_guard
            .user_transactions
            .entry(user)
            .or_insert_with(HashSet::new)
            .insert(id);

        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
        updated_transaction: NewTransaction,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let Some(transaction_ids) = write_guard.user_transactions.get(&user) else {
            return Err(TransactionNotFound(transaction_id));
        };
        if !transaction_ids.contains(&transaction_id) {
            return Err(TransactionNotFound(transaction_id));
        }

        let Some(existing) = write_guard.transactions.get_mut(&transaction_id) else {
            return Err(TransactionNotFound(transaction_id));
        };
        // creation time survives updates
        let transaction = updated_transaction.into_transaction(transaction_id, existing.created_at);
        *existing = transaction.clone();
        Ok(transaction)
    }

    async fn delete_transaction(
        &self,
        user: UserId,
        transaction_id: i64,
    ) -> Result<Transaction, TransactionRepoError> {
        let mut write_guard = self.write_lock()?;

        let owned = write_guard
            .user_transactions
            .get(&user)
            .map_or(false, |ids| ids.contains(&transaction_id));
        if !owned {
            return Err(TransactionNotFound(transaction_id));
        }

        let transaction = write_guard
            .transactions
            .remove(&transaction_id)
            .expect("ids in user_transactions should be present in transactions");
        write_guard
            .user_transactions
            .get_mut(&user)
            .expect("owner index checked above")
            .remove(&transaction_id);
        Ok(transaction)
    }

    async fn month_totals(
        &self,
        user: UserId,
        month: Month,
    ) -> Result<MonthTotals, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let mut totals = MonthTotals::default();
        for transaction in user_transactions(&read_guard, user) {
            if !month.contains(transaction.date) {
                continue;
            }
            match transaction.kind {
                TransactionKind::Income => totals.income += transaction.amount,
                TransactionKind::Expense => totals.expense += transaction.amount,
            }
        }
        Ok(totals)
    }

    async fn expense_breakdown(
        &self,
        user: UserId,
        month: Month,
    ) -> Result<Vec<CategoryTotal>, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let mut totals: HashMap<String, Decimal> = HashMap::new();
        for transaction in user_transactions(&read_guard, user) {
            if transaction.kind != TransactionKind::Expense || !month.contains(transaction.date) {
                continue;
            }
            *totals.entry(transaction.category).or_default() += transaction.amount;
        }

        let mut breakdown: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|(category, amount)| CategoryTotal { category, amount })
            .collect();
        breakdown.sort_by(|a, b| b.amount.cmp(&a.amount).then(a.category.cmp(&b.category)));
        Ok(breakdown)
    }

    async fn balance(&self, user: UserId) -> Result<Decimal, TransactionRepoError> {
        let read_guard = self.read_lock()?;

        let balance = user_transactions(&read_guard, user)
            .into_iter()
            .map(|t| match t.kind {
                TransactionKind::Income => t.amount,
                TransactionKind::Expense => -t.amount,
            })
            .sum();
        Ok(balance)
    }
}
