//! Transaction records and direction filters.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A transaction touching a monitored account. Immutable once recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TxInfo {
    pub hash: String,
    pub from: String,
    pub to: String,
    /// Chain the transaction was observed on
    #[serde(default)]
    pub chain: String,
    /// Transferred native amount, when the node reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_number: Option<u64>,
}

impl TxInfo {
    pub fn new(hash: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            hash: hash.into(),
            from: from.into(),
            to: to.into(),
            chain: String::new(),
            value: None,
            block_number: None,
        }
    }

    pub fn on_chain(mut self, chain: impl Into<String>) -> Self {
        self.chain = chain.into();
        self
    }
}

/// How a transaction relates to an address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxDirection {
    /// Sent by the address
    Outgoing,
    /// Received by the address
    Incoming,
    /// Sent by and to the address
    SelfTransfer,
    /// Neither sender nor recipient
    Unrelated,
}

impl TxDirection {
    pub fn from_flags(outgoing: bool, incoming: bool) -> Self {
        match (outgoing, incoming) {
            (true, true) => Self::SelfTransfer,
            (true, false) => Self::Outgoing,
            (false, true) => Self::Incoming,
            (false, false) => Self::Unrelated,
        }
    }
}

impl fmt::Display for TxDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Outgoing => write!(f, "OUT"),
            Self::Incoming => write!(f, "IN"),
            Self::SelfTransfer => write!(f, "SELF"),
            Self::Unrelated => write!(f, "-"),
        }
    }
}

/// Transaction list filter selected in the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxFilter {
    #[default]
    All,
    In,
    Out,
}

impl TxFilter {
    /// Next filter in the all → in → out cycle.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::In,
            Self::In => Self::Out,
            Self::Out => Self::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for TxFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "in" => Ok(Self::In),
            "out" => Ok(Self::Out),
            other => Err(format!("Unknown transaction filter '{}'", other)),
        }
    }
}
