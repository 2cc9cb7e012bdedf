//! Prometheus counters for ranking writes.
//!
//! Exported as text on `GET /metrics`.

use prometheus::{opts, CounterVec, Registry, TextEncoder};

/// Result label of a write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The write was committed
    Accepted,
    /// The write was refused or failed
    Rejected,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
        }
    }
}

/// Daemon metrics on a private registry.
pub struct Metrics {
    registry: Registry,

    /// Labels: `outcome`
    votes: CounterVec,

    /// Labels: `outcome`
    slot_purchases: CounterVec,
}

impl Metrics {
    /// Create and register all counters.
    ///
    /// # Errors
    ///
    /// Returns error if metric registration fails (e.g., duplicate names)
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let votes = CounterVec::new(
            opts!("rslist_votes_total", "Vote requests by outcome"),
            &["outcome"],
        )?;
        let slot_purchases = CounterVec::new(
            opts!("rslist_slot_purchases_total", "Slot purchase requests by outcome"),
            &["outcome"],
        )?;

        registry.register(Box::new(votes.clone()))?;
        registry.register(Box::new(slot_purchases.clone()))?;

        Ok(Self {
            registry,
            votes,
            slot_purchases,
        })
    }

    /// Count one vote request.
    pub fn record_vote(&self, outcome: Outcome) {
        self.votes.with_label_values(&[outcome.as_str()]).inc();
    }

    /// Count one slot purchase request.
    pub fn record_slot_purchase(&self, outcome: Outcome) {
        self.slot_purchases.with_label_values(&[outcome.as_str()]).inc();
    }

    /// Export metrics in Prometheus text format.
    ///
    /// # Errors
    ///
    /// Returns error if encoding fails
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    #[cfg(test)]
    fn votes(&self, outcome: Outcome) -> f64 {
        self.votes.with_label_values(&[outcome.as_str()]).get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_by_outcome() {
        let metrics = Metrics::new().unwrap();

        metrics.record_vote(Outcome::Accepted);
        metrics.record_vote(Outcome::Accepted);
        metrics.record_vote(Outcome::Rejected);

        assert_eq!(metrics.votes(Outcome::Accepted), 2.0);
        assert_eq!(metrics.votes(Outcome::Rejected), 1.0);
    }

    #[test]
    fn test_export_text_format() {
        let metrics = Metrics::new().unwrap();
        metrics.record_slot_purchase(Outcome::Rejected);

        let text = metrics.export().unwrap();

        assert!(text.contains("# TYPE rslist_slot_purchases_total counter"));
        assert!(text.contains("rslist_slot_purchases_total{outcome=\"rejected\"} 1"));
    }

    #[test]
    fn test_independent_registries() {
        // Each daemon owns its registry, so two can coexist in one process.
        assert!(Metrics::new().is_ok());
        assert!(Metrics::new().is_ok());
    }
}
