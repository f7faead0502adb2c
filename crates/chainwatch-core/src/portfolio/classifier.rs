//! Transaction direction classification and filtering.
//!
//! Classification is per field: a transaction is outgoing iff `from` equals the
//! account address and incoming iff `to` does; both or neither may hold.
//!
//! The `in` filter keeps every transaction that is not outgoing, so a
//! transaction between two other parties is listed under `in` as well.

use chainwatch_types::{AccountState, TxDirection, TxFilter, TxInfo};

pub fn is_outgoing(tx: &TxInfo, address: &str) -> bool {
    tx.from == address
}

pub fn is_incoming(tx: &TxInfo, address: &str) -> bool {
    tx.to == address
}

pub fn classify(tx: &TxInfo, address: &str) -> TxDirection {
    TxDirection::from_flags(is_outgoing(tx, address), is_incoming(tx, address))
}

/// Transactions of `account` matching `filter`, in their original order.
pub fn filter_transactions(account: &AccountState, filter: TxFilter) -> Vec<&TxInfo> {
    let address = account.address.as_str();
    account
        .transactions
        .iter()
        .filter(|tx| match filter {
            TxFilter::All => true,
            TxFilter::Out => is_outgoing(tx, address),
            TxFilter::In => !is_outgoing(tx, address),
        })
        .collect()
}
