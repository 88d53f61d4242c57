//! Wallet classification policy
//!
//! An ordered list of `(label, predicate)` rules. Evaluation walks the list
//! and returns the label of the first rule whose predicate holds; if none
//! does, the wallet is a [`Classification::CasualUser`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Behavioural label assigned to a wallet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// No transactions at all
    EmptyWallet,
    /// Swap-dominated with machine-regular spacing
    BotTrader,
    /// Swap-dominated
    ActiveTrader,
    /// Mostly plain transfers
    TransferHeavy,
    /// Mostly active between 00:00 and 06:00 UTC
    NightOperator,
    /// Active on more than 30 distinct days
    LongTermUser,
    /// Nothing stands out
    CasualUser,
}

impl Classification {
    /// Wire name of the label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmptyWallet => "empty_wallet",
            Self::BotTrader => "bot_trader",
            Self::ActiveTrader => "active_trader",
            Self::TransferHeavy => "transfer_heavy",
            Self::NightOperator => "night_operator",
            Self::LongTermUser => "long_term_user",
            Self::CasualUser => "casual_user",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived inputs the rules look at
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActivitySignals {
    /// Swaps over total transactions
    pub swap_ratio: f64,
    /// Transfers over total transactions
    pub transfer_ratio: f64,
    /// Night-time transactions over total transactions
    pub night_ratio: f64,
    /// Distinct UTC days with activity
    pub active_days: usize,
    /// Population standard deviation of gaps between transactions, seconds
    pub interval_stddev: f64,
}

/// One classification rule
#[derive(Clone, Copy)]
pub struct Rule {
    /// Label produced when the rule matches
    pub label: Classification,
    /// Match condition
    pub predicate: fn(&ActivitySignals) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("label", &self.label).finish_non_exhaustive()
    }
}

/// Default rules, in evaluation order
pub const DEFAULT_RULES: [Rule; 5] = [
    Rule {
        label: Classification::BotTrader,
        predicate: |s| s.swap_ratio > 0.7 && s.interval_stddev < 60.0,
    },
    Rule {
        label: Classification::ActiveTrader,
        predicate: |s| s.swap_ratio > 0.5,
    },
    Rule {
        label: Classification::TransferHeavy,
        predicate: |s| s.transfer_ratio > 0.7,
    },
    Rule {
        label: Classification::NightOperator,
        predicate: |s| s.night_ratio > 0.5,
    },
    Rule {
        label: Classification::LongTermUser,
        predicate: |s| s.active_days > 30,
    },
];

/// Ordered, first-match-wins rule list
#[derive(Debug, Clone)]
pub struct ClassificationPolicy {
    rules: Vec<Rule>,
    fallback: Classification,
}

impl ClassificationPolicy {
    /// Policy with no rules; everything falls back to `fallback`
    #[must_use]
    pub fn empty(fallback: Classification) -> Self {
        Self {
            rules: Vec::new(),
            fallback,
        }
    }

    /// Append a rule after the existing ones
    #[must_use]
    pub fn with_rule(mut self, label: Classification, predicate: fn(&ActivitySignals) -> bool) -> Self {
        self.rules.push(Rule { label, predicate });
        self
    }

    /// Rules in evaluation order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Label of the first matching rule, or the fallback
    pub fn classify(&self, signals: &ActivitySignals) -> Classification {
        self.rules
            .iter()
            .find(|rule| (rule.predicate)(signals))
            .map_or(self.fallback, |rule| rule.label)
    }
}

impl Default for ClassificationPolicy {
    fn default() -> Self {
        Self {
            rules: DEFAULT_RULES.to_vec(),
            fallback: Classification::CasualUser,
        }
    }
}
