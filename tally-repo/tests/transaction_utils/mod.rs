use chrono::NaiveDate;
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use rand::seq::SliceRandom;
use rust_decimal::Decimal;
use tally_repo::transaction_repo::{NewTransaction, TransactionKind};

const CATEGORIES: [&str; 6] = [
    "Groceries",
    "Rent",
    "Eating Out",
    "Transport",
    "Utilities",
    "Misc",
];

#[allow(dead_code)]
pub fn generate_new_transaction(kind: TransactionKind, date: NaiveDate) -> NewTransaction {
    generate_with_category(random_category(), kind, date)
}

#[allow(dead_code)]
pub fn generate_with_category(
    category: &str,
    kind: TransactionKind,
    date: NaiveDate,
) -> NewTransaction {
    NewTransaction {
        amount: fake_amount(),
        category: category.to_owned(),
        description: Sentence(1..3).fake(),
        kind,
        date,
    }
}

#[allow(dead_code)]
pub fn random_category() -> &'static str {
    CATEGORIES.choose(&mut rand::thread_rng()).unwrap()
}

/// Random amount with exactly two decimal places.
#[allow(dead_code)]
pub fn fake_amount() -> Decimal {
    Decimal::new((100..50_000).fake::<i64>(), 2)
}
