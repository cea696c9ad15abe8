use crate::budget_repo::{Budget, BudgetRepo, BudgetRepoError, NewBudget};
use crate::month::Month;
use crate::user_repo::UserId;
use anyhow::anyhow;
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockWriteGuard};

struct StoredBudget {
    user_id: UserId,
    category: String,
    amount: Decimal,
    month: Month,
}

struct State {
    budgets: HashMap<i64, StoredBudget>,
    next_id: i64,
}

pub struct MemBudgetRepo {
    state: RwLock<State>,
}

impl MemBudgetRepo {
    pub fn new() -> MemBudgetRepo {
        let state = State {
            budgets: HashMap::new(),
            next_id: 1,
        };
        MemBudgetRepo {
            state: RwLock::new(state),
        }
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<State>, anyhow::Error> {
        self.state
            .write()
            .map_err(|_| anyhow!("Unable to acquire lock"))
    }
}

fn month_budgets(state: &State, user: UserId, month: Month) -> Vec<Budget> {
    let mut budgets: Vec<Budget> = state
        .budgets
        .iter()
        .filter(|(_, b)| b.user_id == user && b.month == month)
        .map(|(id, b)| Budget {
            id: *id,
            category: b.category.clone(),
            amount: b.amount,
            month: b.month,
        })
        .collect();
    budgets.sort_by(|a, b| a.category.cmp(&b.category));
    budgets
}

#[async_trait]
impl BudgetRepo for MemBudgetRepo {
    async fn get_budgets(&self, user: UserId, month: Month) -> Result<Vec<Budget>, BudgetRepoError> {
        let read_guard = self
            .state
            .read()
            .map_err(|_| anyhow!("Unable to acquire lock"))?;
        Ok(month_budgets(&read_guard, user, month))
    }

    async fn set_budget(
        &self,
        user: UserId,
        new_budget: NewBudget,
    ) -> Result<Vec<Budget>, BudgetRepoError> {
        let mut write_guard = self.write_lock()?;

        let existing_id = write_guard
            .budgets
            .iter()
            .find(|(_, b)| {
                b.user_id == user
                    && b.category == new_budget.category
                    && b.month == new_budget.month
            })
            .map(|(id, _)| *id);
        match existing_id {
            Some(id) => {
                write_guard
                    .budgets
                    .get_mut(&id)
                    .expect("budget id was just found")
                    .amount = new_budget.amount;
            }
            None => {
                let id = write_guard.next_id;
                write_guard.next_id += 1;
                write_guard.budgets.insert(
                    id,
                    StoredBudget {
                        user_id: user,
                        category: new_budget.category,
                        amount: new_budget.amount,
                        month: new_budget.month,
                    },
                );
            }
        }

        Ok(month_budgets(&write_guard, user, new_budget.month))
    }
}
