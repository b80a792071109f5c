use crate::{
    Error,
    transaction::{AccountRegistry, BankName, Category},
};

/// Classify a transaction as income or expense.
///
/// A transaction is income when the money went to the owner's own account at
/// `bank`, otherwise it is an expense.
///
/// # Errors
///
/// Returns [Error::UnknownBank] if `bank` has no self account in `registry`.
pub fn classify(
    to_account: &str,
    bank: &BankName,
    registry: &AccountRegistry,
) -> Result<Category, Error> {
    let self_account = registry.self_account(bank)?;

    if to_account == self_account {
        Ok(Category::Income)
    } else {
        Ok(Category::Expense)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        transaction::{AccountRegistry, BankName, Category},
    };

    use super::classify;

    fn get_test_registry() -> AccountRegistry {
        AccountRegistry::new([(BankName::new_unchecked("CommBank"), "111-0".to_owned())])
    }

    #[test]
    fn transfer_to_self_account_is_income() {
        let registry = get_test_registry();
        let bank = BankName::new_unchecked("CommBank");

        assert_eq!(classify("111-0", &bank, &registry), Ok(Category::Income));
    }

    #[test]
    fn transfer_to_other_account_is_expense() {
        let registry = get_test_registry();
        let bank = BankName::new_unchecked("CommBank");

        assert_eq!(classify("999-9", &bank, &registry), Ok(Category::Expense));
    }

    #[test]
    fn self_account_at_another_bank_is_expense() {
        let registry = AccountRegistry::new([
            (BankName::new_unchecked("CommBank"), "111-0".to_owned()),
            (BankName::new_unchecked("ANZ"), "222-0".to_owned()),
        ]);
        let bank = BankName::new_unchecked("ANZ");

        assert_eq!(classify("111-0", &bank, &registry), Ok(Category::Expense));
    }

    #[test]
    fn unknown_bank_is_an_error() {
        let registry = get_test_registry();
        let bank = BankName::new_unchecked("BOC");

        assert_eq!(
            classify("111-0", &bank, &registry),
            Err(Error::UnknownBank("BOC".to_owned()))
        );
    }

    #[test]
    fn classification_is_deterministic() {
        let registry = get_test_registry();
        let bank = BankName::new_unchecked("CommBank");

        for account in ["111-0", "999-9", "", "111-00"] {
            assert_eq!(
                classify(account, &bank, &registry),
                classify(account, &bank, &registry)
            );
        }
    }
}
