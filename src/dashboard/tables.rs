//! Summary cards and tables for the bank dashboard.

use maud::{Markup, html};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    dashboard::aggregation::Summary,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
    transaction::{Category, Transaction},
};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

const CARD_STYLE: &str = "p-4 rounded-lg shadow bg-white dark:bg-gray-800";
const TABLE_CELL_GREEN_STYLE: &str = "text-green-600 dark:text-green-400";
const TABLE_CELL_RED_STYLE: &str = "text-red-600 dark:text-red-400";

/// Renders the balance, total income and total expense as cards.
pub(super) fn summary_cards(summary: &Summary) -> Markup {
    let cards = [
        ("balance", "Balance", summary.balance),
        ("total-income", "Total Income", summary.total_income),
        ("total-expense", "Total Expense", summary.total_expense),
    ];

    html! {
        section id="summary" class="grid grid-cols-1 md:grid-cols-3 gap-4 w-full mb-4"
        {
            @for (id, label, amount) in cards {
                div id=(id) class=(CARD_STYLE)
                {
                    h3 class="text-sm font-medium text-gray-500 dark:text-gray-400" { (label) }
                    p class="text-2xl font-bold" data-amount { (format_currency(amount)) }
                }
            }
        }
    }
}

/// Renders a table of `transactions`, which should already be sorted newest first.
pub(super) fn recent_transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        section id="recent-transactions" class="w-full mb-4"
        {
            h3 class="text-xl font-semibold mb-4" { "Recent Transactions" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Time" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Bank" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Type" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "From" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "To" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        }
                    }

                    tbody
                    {
                        @for transaction in transactions {
                            (transaction_row(transaction))
                        }

                        @if transactions.is_empty() {
                            tr class=(TABLE_ROW_STYLE)
                            {
                                td colspan="6" class={(TABLE_CELL_STYLE) " text-center"}
                                {
                                    "No transactions in the selected range."
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let timestamp = transaction
        .timestamp
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| transaction.timestamp.to_string());
    let (amount, amount_style) = match transaction.category {
        Category::Income => (transaction.amount, TABLE_CELL_GREEN_STYLE),
        Category::Expense => (-transaction.amount, TABLE_CELL_RED_STYLE),
    };

    html! {
        tr class=(TABLE_ROW_STYLE) data-category=(transaction.category)
        {
            td class={(TABLE_CELL_STYLE) " whitespace-nowrap"} { (timestamp) }
            td class=(TABLE_CELL_STYLE) { (transaction.bank) }
            td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
            td class=(TABLE_CELL_STYLE) { (transaction.from_account) }
            td class=(TABLE_CELL_STYLE) { (transaction.to_account) }
            td class={(TABLE_CELL_STYLE) " text-right " (amount_style)} { (format_currency(amount)) }
        }
    }
}
