use crate::types::{DashboardPayload, Transaction};
use std::cmp::Ordering;

/// Where a dashboard load currently stands.
///
/// `Unauthenticated` and `Failed` are terminal for the cycle; a new
/// activation starts a fresh cycle from `Loading`.
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardPhase {
    Idle,
    Loading,
    Success(DashboardPayload),
    Unauthenticated,
    Failed,
}

/// Tracks one load cycle per screen activation.
///
/// Each `begin` bumps a generation. A completion carrying an older
/// generation is ignored, so a response that resolves after the screen was
/// re-activated (or torn down) cannot clobber newer state.
#[derive(Debug)]
pub struct DashboardFlow {
    phase: DashboardPhase,
    generation: u64,
}

impl DashboardFlow {
    pub fn new() -> Self {
        Self {
            phase: DashboardPhase::Idle,
            generation: 0,
        }
    }

    pub fn phase(&self) -> &DashboardPhase {
        &self.phase
    }

    /// Start a new load cycle. Returns the generation the eventual
    /// completion must present.
    pub(crate) fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.phase = DashboardPhase::Loading;
        self.generation
    }

    fn complete(&mut self, generation: u64, phase: DashboardPhase) -> bool {
        if generation != self.generation {
            return false;
        }
        self.phase = phase;
        true
    }

    pub(crate) fn finish_unauthenticated(&mut self, generation: u64) -> bool {
        self.complete(generation, DashboardPhase::Unauthenticated)
    }

    pub(crate) fn finish_success(&mut self, generation: u64, payload: DashboardPayload) -> bool {
        self.complete(generation, DashboardPhase::Success(payload))
    }

    pub(crate) fn finish_failed(&mut self, generation: u64) -> bool {
        self.complete(generation, DashboardPhase::Failed)
    }
}

impl Default for DashboardFlow {
    fn default() -> Self {
        Self::new()
    }
}

/// Re-sort fetched transactions into descending timestamp order.
///
/// The sort is stable: entries with equal timestamps keep their relative
/// server order. Entries whose timestamp cannot be parsed sort last.
/// Server-provided order is never trusted.
pub fn sort_transactions(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| match (a.timestamp_instant(), b.timestamp_instant()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TransactionKind;

    fn tx(id: u64, timestamp: &str) -> Transaction {
        Transaction {
            id,
            from_account: None,
            to_account: None,
            amount: "1.00".to_string(),
            external_source: None,
            kind: TransactionKind::Deposit,
            timestamp: timestamp.to_string(),
        }
    }

    #[test]
    fn test_sort_descending_by_timestamp() {
        let mut txs = vec![tx(1, "2024-01-01"), tx(2, "2024-01-02")];
        sort_transactions(&mut txs);

        let ids: Vec<u64> = txs.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_sort_is_non_increasing() {
        let mut txs = vec![
            tx(1, "2024-03-05T08:00:00Z"),
            tx(2, "2024-01-01"),
            tx(3, "2024-12-31T23:59:59Z"),
            tx(4, "2024-03-05T07:59:59Z"),
        ];
        sort_transactions(&mut txs);

        let instants: Vec<_> = txs.iter().map(|t| t.timestamp_instant().unwrap()).collect();
        for pair in instants.windows(2) {
            assert!(pair[0] >= pair[1]);
        }
    }

    #[test]
    fn test_sort_ties_keep_server_order() {
        let mut txs = vec![
            tx(10, "2024-06-01"),
            tx(11, "2024-06-01"),
            tx(12, "2024-06-01"),
            tx(13, "2024-07-01"),
        ];
        sort_transactions(&mut txs);

        let ids: Vec<u64> = txs.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![13, 10, 11, 12]);
    }

    #[test]
    fn test_sort_unparseable_timestamps_last() {
        let mut txs = vec![tx(1, "garbage"), tx(2, "2024-01-02"), tx(3, "2024-01-01")];
        sort_transactions(&mut txs);

        let ids: Vec<u64> = txs.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[test]
    fn test_flow_transitions() {
        let mut flow = DashboardFlow::new();
        assert_eq!(*flow.phase(), DashboardPhase::Idle);

        let generation = flow.begin();
        assert_eq!(*flow.phase(), DashboardPhase::Loading);

        assert!(flow.finish_failed(generation));
        assert_eq!(*flow.phase(), DashboardPhase::Failed);
    }

    #[test]
    fn test_flow_unauthenticated_is_terminal_for_cycle() {
        let mut flow = DashboardFlow::new();
        let generation = flow.begin();
        assert!(flow.finish_unauthenticated(generation));
        assert_eq!(*flow.phase(), DashboardPhase::Unauthenticated);

        // Stale completion for the finished cycle is a no-op
        assert!(!flow.finish_failed(generation + 1));
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut flow = DashboardFlow::new();
        let first = flow.begin();
        let second = flow.begin();

        // The first response resolves after a re-activation; it must not win
        assert!(!flow.finish_failed(first));
        assert_eq!(*flow.phase(), DashboardPhase::Loading);

        assert!(flow.finish_failed(second));
        assert_eq!(*flow.phase(), DashboardPhase::Failed);
    }
}
