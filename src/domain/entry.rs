use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::account::LedgerAccountId;
use super::amount::{WalletAmount, WalletCurrency};
use super::metadata::TxMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Debit,
    Credit,
}

/// One line of an accounting transaction
#[derive(Debug, Clone, PartialEq)]
pub struct EntryLine {
    pub side: Side,
    pub account_id: LedgerAccountId,
    pub amount: WalletAmount,
    pub metadata: TxMetadata,
}

/// Append-only draft of one accounting transaction, owned by a book.
///
/// Both methods return the same entry so calls can be chained.
pub trait Entry {
    fn debit(
        &mut self,
        account_id: &LedgerAccountId,
        amount: WalletAmount,
        metadata: TxMetadata,
    ) -> &mut Self;

    fn credit(
        &mut self,
        account_id: &LedgerAccountId,
        amount: WalletAmount,
        metadata: TxMetadata,
    ) -> &mut Self;
}

/// Debit and credit sums of one currency
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrencyTotals {
    pub debits: u128,
    pub credits: u128,
}

impl CurrencyTotals {
    pub fn is_balanced(&self) -> bool {
        self.debits == self.credits
    }
}

/// In-memory entry handed to a [`Book`](crate::storage::Book) for commit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JournalEntry {
    description: String,
    lines: Vec<EntryLine>,
}

impl JournalEntry {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            lines: Vec::new(),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Lines in the order they were appended
    pub fn lines(&self) -> &[EntryLine] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<EntryLine> {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn debits(&self) -> impl Iterator<Item = &EntryLine> {
        self.lines.iter().filter(|line| line.side == Side::Debit)
    }

    pub fn credits(&self) -> impl Iterator<Item = &EntryLine> {
        self.lines.iter().filter(|line| line.side == Side::Credit)
    }

    /// Lines touching `account_id` on `side`
    pub fn lines_for(&self, account_id: &LedgerAccountId, side: Side) -> Vec<&EntryLine> {
        self.lines
            .iter()
            .filter(|line| line.side == side && &line.account_id == account_id)
            .collect()
    }

    /// Debit and credit sums per currency touched
    pub fn totals(&self) -> BTreeMap<WalletCurrency, CurrencyTotals> {
        let mut totals: BTreeMap<WalletCurrency, CurrencyTotals> = BTreeMap::new();
        for line in &self.lines {
            let slot = totals.entry(line.amount.currency).or_default();
            match line.side {
                Side::Debit => slot.debits += u128::from(line.amount.amount),
                Side::Credit => slot.credits += u128::from(line.amount.amount),
            }
        }
        totals
    }

    /// True when every currency's debits equal its credits
    pub fn is_balanced(&self) -> bool {
        self.totals().values().all(CurrencyTotals::is_balanced)
    }

    fn push(
        &mut self,
        side: Side,
        account_id: &LedgerAccountId,
        amount: WalletAmount,
        metadata: TxMetadata,
    ) -> &mut Self {
        self.lines.push(EntryLine {
            side,
            account_id: account_id.clone(),
            amount,
            metadata,
        });
        self
    }
}

impl Entry for JournalEntry {
    fn debit(
        &mut self,
        account_id: &LedgerAccountId,
        amount: WalletAmount,
        metadata: TxMetadata,
    ) -> &mut Self {
        self.push(Side::Debit, account_id, amount, metadata)
    }

    fn credit(
        &mut self,
        account_id: &LedgerAccountId,
        amount: WalletAmount,
        metadata: TxMetadata,
    ) -> &mut Self {
        self.push(Side::Credit, account_id, amount, metadata)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn btc(amount: u64) -> WalletAmount {
        WalletAmount::new(WalletCurrency::Btc, amount)
    }

    fn usd(amount: u64) -> WalletAmount {
        WalletAmount::new(WalletCurrency::Usd, amount)
    }

    #[test]
    fn new_entry_is_empty_and_balanced() {
        let entry = JournalEntry::new("Payment");
        assert!(entry.is_empty());
        assert!(entry.is_balanced());
        assert_eq!(entry.description(), "Payment");
    }

    #[test]
    fn lines_keep_append_order() {
        let a = LedgerAccountId::new("Liabilities:a");
        let b = LedgerAccountId::new("Liabilities:b");
        let mut entry = JournalEntry::new("");

        entry
            .debit(&a, btc(10), TxMetadata::new())
            .credit(&b, btc(10), TxMetadata::new());

        let sides: Vec<_> = entry.lines().iter().map(|l| l.side).collect();
        assert_eq!(sides, vec![Side::Debit, Side::Credit]);
        assert_eq!(entry.debits().count(), 1);
        assert_eq!(entry.credits().count(), 1);
        assert_eq!(entry.lines_for(&b, Side::Credit).len(), 1);
        assert!(entry.lines_for(&b, Side::Debit).is_empty());
    }

    #[test]
    fn balance_is_checked_per_currency() {
        let a = LedgerAccountId::new("a");
        let b = LedgerAccountId::new("b");
        let mut entry = JournalEntry::new("");

        // 2000 sats out, 20 cents in: equal line count, still unbalanced
        entry
            .debit(&a, btc(2000), TxMetadata::new())
            .credit(&b, usd(20), TxMetadata::new());
        assert!(!entry.is_balanced());

        entry
            .credit(&b, btc(2000), TxMetadata::new())
            .debit(&a, usd(20), TxMetadata::new());
        assert!(entry.is_balanced());

        let totals = entry.totals();
        assert_eq!(totals[&WalletCurrency::Btc].debits, 2000);
        assert_eq!(totals[&WalletCurrency::Usd].credits, 20);
    }
}
