//! Wallet activity summarizer
//!
//! Turns one wallet's transaction records into counters, timing statistics
//! and a behavioural label. Pure: no I/O, no shared state.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, Datelike, NaiveDate, SecondsFormat, Timelike, Utc};
use serde::{Deserialize, Serialize};

use super::classify::{ActivitySignals, Classification, ClassificationPolicy};
use super::record::TransactionRecord;
use super::volume::outgoing_usd;
use crate::config::AnalysisConfig;

/// Number of sources listed in `programs.top_sources`
pub const TOP_SOURCES: usize = 5;

/// Note attached to results produced from the signature-only fallback
pub const LIMITED_NOTE: &str = "Limited analysis (Enhanced API unavailable)";

/// Outcome of analysing one wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Analysis {
    /// Full summary over enriched records
    Full(Box<WalletSummary>),
    /// The wallet has no transactions
    Empty {
        /// Always [`Classification::EmptyWallet`]
        classification: Classification,
        /// Always 0
        total_txs: u64,
    },
    /// Only a signature count was available
    Limited {
        /// Why the result is degraded
        note: String,
        /// Number of signatures returned by the fallback
        total_txs: u64,
    },
}

impl Analysis {
    /// Result for a wallet without history
    pub fn empty() -> Self {
        Self::Empty {
            classification: Classification::EmptyWallet,
            total_txs: 0,
        }
    }

    /// Degraded result from the signature-only fallback
    pub fn limited(total_txs: u64) -> Self {
        Self::Limited {
            note: LIMITED_NOTE.to_string(),
            total_txs,
        }
    }

    /// Label, when one was computed
    pub fn classification(&self) -> Option<Classification> {
        match self {
            Self::Full(summary) => Some(summary.classification),
            Self::Empty { classification, .. } => Some(*classification),
            Self::Limited { .. } => None,
        }
    }
}

/// Aggregate statistics for a wallet with at least one transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletSummary {
    /// Behavioural label
    pub classification: Classification,
    /// Headline numbers
    pub summary: Overview,
    /// Transaction type counts
    pub breakdown: Breakdown,
    /// Timing statistics
    pub temporal: Temporal,
    /// Program usage
    pub programs: Programs,
}

/// Headline numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview {
    /// Records analysed
    pub total_txs: u64,
    /// Successful over total, 4 decimals
    pub success_rate: f64,
    /// Distinct UTC days with activity
    pub active_days: usize,
    /// Approximate outgoing USD volume, 2 decimals
    pub estimated_volume_usd: f64,
}

/// Transaction type counts
///
/// `other` is `total - swaps - transfers - failed` and goes negative when
/// failed records are also typed as swaps or transfers, so the four fields
/// always add up to the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breakdown {
    /// Records typed `SWAP`
    pub swaps: u64,
    /// Records typed `TRANSFER`
    pub transfers: u64,
    /// Remainder
    pub other: i64,
    /// Records carrying an error marker
    pub failed: u64,
}

/// Timing statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Temporal {
    /// Earliest timestamp, ISO-8601 with milliseconds
    pub first_tx: Option<String>,
    /// Latest timestamp, ISO-8601 with milliseconds
    pub last_tx: Option<String>,
    /// Total over active days, 2 decimals
    pub avg_txs_per_day: f64,
    /// Busiest single UTC day
    pub max_txs_in_day: u64,
    /// Busiest day over average day, 2 decimals
    pub burst_score: f64,
    /// Share of records before 06:00 UTC, 4 decimals
    pub night_ratio: f64,
    /// Share of records on Saturday or Sunday (UTC), 4 decimals
    pub weekend_ratio: f64,
    /// Population stddev of gaps between consecutive records, 2 decimals
    pub tx_frequency_stddev_seconds: f64,
}

/// Program usage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Programs {
    /// Distinct program ids invoked
    pub unique_count: usize,
    /// Most frequent sources with their counts
    pub top_sources: Vec<(String, u64)>,
}

/// Summarize a wallet's records with the default classification policy
pub fn summarize(wallet: &str, records: &[TransactionRecord], config: &AnalysisConfig) -> Analysis {
    summarize_with(wallet, records, config, &ClassificationPolicy::default())
}

/// Summarize a wallet's records with an explicit classification policy
#[allow(clippy::cast_precision_loss)]
pub fn summarize_with(
    wallet: &str,
    records: &[TransactionRecord],
    config: &AnalysisConfig,
    policy: &ClassificationPolicy,
) -> Analysis {
    if records.is_empty() {
        return Analysis::empty();
    }

    let total = records.len() as u64;
    let mut swaps = 0u64;
    let mut transfers = 0u64;
    let mut failed = 0u64;
    let mut night = 0u64;
    let mut weekend = 0u64;
    let mut volume_usd = 0.0;
    let mut programs: HashSet<&str> = HashSet::new();
    let mut sources = SourceCounter::default();
    let mut timestamps: Vec<i64> = Vec::with_capacity(records.len());
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for record in records {
        if let Some(at) = record
            .timestamp
            .filter(|&ts| ts != 0)
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
        {
            timestamps.push(at.timestamp());
            *per_day.entry(at.date_naive()).or_default() += 1;
            if at.hour() < 6 {
                night += 1;
            }
            if at.weekday().num_days_from_sunday() % 6 == 0 {
                weekend += 1;
            }
        }

        if record.is_failed() {
            failed += 1;
        }

        match record.tx_type() {
            "SWAP" => swaps += 1,
            "TRANSFER" => transfers += 1,
            _ => {}
        }

        sources.add(record.source());

        programs.extend(
            record
                .instructions
                .iter()
                .filter_map(|ix| ix.program_id.as_deref()),
        );

        volume_usd += outgoing_usd(record, wallet, config);
    }

    timestamps.sort_unstable();

    let total_f = total as f64;
    let active_days = per_day.len();
    let max_in_day = per_day.values().copied().max().unwrap_or(0);
    let avg_per_day = if active_days > 0 {
        total_f / active_days as f64
    } else {
        0.0
    };
    let stddev = interval_stddev(&timestamps);
    let ratio = |count: u64| count as f64 / total_f.max(1.0);

    let signals = ActivitySignals {
        swap_ratio: ratio(swaps),
        transfer_ratio: ratio(transfers),
        night_ratio: ratio(night),
        active_days,
        interval_stddev: stddev,
    };
    let classification = policy.classify(&signals);

    #[allow(clippy::cast_possible_wrap)]
    let other = total as i64 - swaps as i64 - transfers as i64 - failed as i64;

    Analysis::Full(Box::new(WalletSummary {
        classification,
        summary: Overview {
            total_txs: total,
            success_rate: round_to(ratio(total - failed), 4),
            active_days,
            estimated_volume_usd: round_to(volume_usd, 2),
        },
        breakdown: Breakdown {
            swaps,
            transfers,
            other,
            failed,
        },
        temporal: Temporal {
            first_tx: timestamps.first().and_then(|ts| iso_millis(*ts)),
            last_tx: timestamps.last().and_then(|ts| iso_millis(*ts)),
            avg_txs_per_day: round_to(avg_per_day, 2),
            max_txs_in_day: max_in_day,
            burst_score: round_to(max_in_day as f64 / avg_per_day.max(1.0), 2),
            night_ratio: round_to(signals.night_ratio, 4),
            weekend_ratio: round_to(ratio(weekend), 4),
            tx_frequency_stddev_seconds: round_to(stddev, 2),
        },
        programs: Programs {
            unique_count: programs.len(),
            top_sources: sources.top(TOP_SOURCES),
        },
    }))
}

/// Population standard deviation of gaps between sorted timestamps
#[allow(clippy::cast_precision_loss)]
pub fn interval_stddev(sorted: &[i64]) -> f64 {
    if sorted.len() < 2 {
        return 0.0;
    }
    let gaps: Vec<f64> = sorted.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
    let n = gaps.len() as f64;
    let mean = gaps.iter().sum::<f64>() / n;
    let variance = gaps.iter().map(|g| (g - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn iso_millis(ts: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Frequency counter that remembers first-seen order for stable ties
#[derive(Default)]
struct SourceCounter {
    index: HashMap<String, usize>,
    counts: Vec<(String, u64)>,
}

impl SourceCounter {
    fn add(&mut self, source: &str) {
        if let Some(&i) = self.index.get(source) {
            self.counts[i].1 += 1;
        } else {
            self.index.insert(source.to_string(), self.counts.len());
            self.counts.push((source.to_string(), 1));
        }
    }

    fn top(mut self, n: usize) -> Vec<(String, u64)> {
        // stable sort keeps first-seen order among equal counts
        self.counts.sort_by(|a, b| b.1.cmp(&a.1));
        self.counts.truncate(n);
        self.counts
    }
}
