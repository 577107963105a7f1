//! # Scan Session
//!
//! Connects an external text producer (the OCR pipeline) to the matcher.
//!
//! Recognized text arrives on an mpsc channel at whatever pace the producer
//! likes. The session scans at most once per `scan_interval`; text arriving in
//! between replaces any text still waiting, so only the newest reading is
//! scanned. Each scan takes a fresh snapshot of the registry and publishes a
//! [`ScanReport`] on a watch channel, where a newer report supersedes the
//! previous one. Consumers that need every report rather than the latest one
//! take a [`ScanSession::report_stream`].

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info};

use crate::allergen::MatchResult;
use crate::errors::{AppError, AppResult};
use crate::matcher::AllergenMatcher;
use crate::observability::record_skipped_scan;
use crate::registry::SharedRegistry;

/// Configuration options for a scan session
#[derive(Debug, Clone, PartialEq)]
pub struct ScanConfig {
    /// Minimum time between two scans
    pub scan_interval: Duration,
    /// Skip text identical to the previously scanned text
    pub deduplicate: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_interval: Duration::from_millis(500),
            deduplicate: true,
        }
    }
}

impl ScanConfig {
    /// Validate scan configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.scan_interval > Duration::from_secs(60) {
            return Err(AppError::Config(
                "scan_interval cannot be greater than 60 seconds".to_string(),
            ));
        }
        Ok(())
    }
}

/// Result of one scan, as published to subscribers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// 1-based scan counter within the session
    pub sequence: u64,
    pub scanned_at: DateTime<Utc>,
    pub matches: Vec<MatchResult>,
}

/// Counters describing a finished session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Texts received from the producer
    pub received: u64,
    /// Texts actually scanned
    pub scanned: u64,
    /// Texts skipped because they repeated the last scanned text
    pub duplicates: u64,
    /// Texts replaced by a newer one before their turn came
    pub superseded: u64,
}

/// Throttled scanning of a stream of recognized text
#[derive(Debug)]
pub struct ScanSession {
    matcher: AllergenMatcher,
    registry: SharedRegistry,
    config: ScanConfig,
    reports: watch::Sender<Option<ScanReport>>,
    report_log: Option<mpsc::UnboundedSender<ScanReport>>,
}

impl ScanSession {
    pub fn new(matcher: AllergenMatcher, registry: SharedRegistry, config: ScanConfig) -> Self {
        let (reports, _) = watch::channel(None);
        Self {
            matcher,
            registry,
            config,
            reports,
            report_log: None,
        }
    }

    /// Receiver for the latest report; `None` until the first scan
    pub fn subscribe(&self) -> watch::Receiver<Option<ScanReport>> {
        self.reports.subscribe()
    }

    /// Receiver for every published report, in order
    ///
    /// The stream ends once the session has finished. Calling this again
    /// replaces the previous stream.
    pub fn report_stream(&mut self) -> mpsc::UnboundedReceiver<ScanReport> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.report_log = Some(tx);
        rx
    }

    /// Scan a single text against the current allergen list
    pub fn scan_once(&self, text: &str) -> Vec<MatchResult> {
        let allergens = self.registry.snapshot();
        self.matcher.find_allergens(text, &allergens)
    }

    /// Consume texts until the producer closes its end of the channel
    ///
    /// Text still waiting for its turn when the channel closes is scanned
    /// right away.
    pub async fn run(self, mut texts: mpsc::Receiver<String>) -> ScanStats {
        let mut stats = ScanStats::default();
        let mut pending: Option<String> = None;
        let mut last_scanned: Option<String> = None;
        let mut next_allowed = Instant::now();

        info!(
            interval_ms = self.config.scan_interval.as_millis() as u64,
            deduplicate = self.config.deduplicate,
            "Scan session started"
        );

        loop {
            if pending.is_some() && Instant::now() >= next_allowed {
                if let Some(text) = pending.take() {
                    self.process(text, &mut last_scanned, &mut stats);
                    next_allowed = Instant::now() + self.config.scan_interval;
                }
                continue;
            }

            tokio::select! {
                biased;

                // Wakes the loop once the waiting text may be scanned
                _ = sleep_until(next_allowed), if pending.is_some() => {}
                received = texts.recv() => match received {
                    Some(text) => {
                        stats.received += 1;
                        if pending.replace(text).is_some() {
                            stats.superseded += 1;
                            record_skipped_scan("superseded");
                        }
                    }
                    None => break,
                },
            }
        }

        if let Some(text) = pending.take() {
            self.process(text, &mut last_scanned, &mut stats);
        }

        info!(
            received = stats.received,
            scanned = stats.scanned,
            duplicates = stats.duplicates,
            superseded = stats.superseded,
            "Scan session finished"
        );
        stats
    }

    fn process(&self, text: String, last_scanned: &mut Option<String>, stats: &mut ScanStats) {
        if self.config.deduplicate && last_scanned.as_deref() == Some(text.as_str()) {
            debug!("Skipping text identical to the previous scan");
            stats.duplicates += 1;
            record_skipped_scan("duplicate");
            return;
        }

        let matches = self.scan_once(&text);
        stats.scanned += 1;

        let report = ScanReport {
            sequence: stats.scanned,
            scanned_at: Utc::now(),
            matches,
        };
        debug!(
            sequence = report.sequence,
            match_count = report.matches.len(),
            "Publishing scan report"
        );
        if let Some(log) = &self.report_log {
            if log.send(report.clone()).is_err() {
                debug!("Report stream receiver dropped");
            }
        }
        self.reports.send_replace(Some(report));
        *last_scanned = Some(text);
    }
}
