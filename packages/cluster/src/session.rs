//! Per-city clustering state.
//!
//! A [`ClusterSession`] owns one city's filtered segments and caches one
//! [`ClusterOutput`] per [`GroupingMode`]. Any change to the segments or
//! the configuration invalidates the cache and starts a new generation;
//! results computed for an older generation are rejected so the latest
//! request always wins.

use std::collections::BTreeMap;

use street_names_street_models::{ClusterOutput, GroupingMode, NameCount, RoadSegment};

use crate::{ClusterConfig, cluster};

/// Identifies one requested clustering pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterTicket {
    generation: u64,
    mode: GroupingMode,
}

impl ClusterTicket {
    /// The grouping mode the pass was requested for.
    #[must_use]
    pub const fn mode(&self) -> GroupingMode {
        self.mode
    }
}

/// Segments, configuration and cached results for one city.
#[derive(Debug, Clone, Default)]
pub struct ClusterSession {
    segments: Vec<RoadSegment>,
    config: ClusterConfig,
    cache: BTreeMap<GroupingMode, ClusterOutput>,
    generation: u64,
}

impl ClusterSession {
    /// Creates a session over already-preprocessed segments.
    #[must_use]
    pub fn new(segments: Vec<RoadSegment>, config: ClusterConfig) -> Self {
        Self {
            segments,
            config,
            cache: BTreeMap::new(),
            generation: 0,
        }
    }

    /// The segments every pass clusters.
    #[must_use]
    pub fn segments(&self) -> &[RoadSegment] {
        &self.segments
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &ClusterConfig {
        &self.config
    }

    /// Current generation; bumped on every invalidation.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Replaces the segment set.
    pub fn replace_segments(&mut self, segments: Vec<RoadSegment>) {
        self.segments = segments;
        self.invalidate();
    }

    /// Appends newly arrived segments (e.g. the next page of a paginated
    /// load).
    pub fn extend_segments(&mut self, segments: impl IntoIterator<Item = RoadSegment>) {
        let before = self.segments.len();
        self.segments.extend(segments);
        if self.segments.len() != before {
            self.invalidate();
        }
    }

    /// Changes the configuration. A no-op when nothing changed.
    pub fn set_config(&mut self, config: ClusterConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    fn invalidate(&mut self) {
        self.cache.clear();
        self.generation += 1;
        log::debug!("Cluster cache invalidated (generation {})", self.generation);
    }

    /// Returns the cached result for `mode`, if any.
    #[must_use]
    pub fn cached(&self, mode: GroupingMode) -> Option<&ClusterOutput> {
        self.cache.get(&mode)
    }

    /// Returns the result for `mode`, clustering on a cache miss.
    pub fn output(&mut self, mode: GroupingMode) -> &ClusterOutput {
        self.cache
            .entry(mode)
            .or_insert_with(|| cluster(&self.segments, mode, &self.config))
    }

    /// Returns the counts for `mode`, clustering on a cache miss.
    pub fn counts(&mut self, mode: GroupingMode) -> &NameCount {
        &self.output(mode).counts
    }

    /// Starts a pass that the caller runs elsewhere (e.g. on a worker
    /// thread over a clone of [`Self::segments`]).
    #[must_use]
    pub const fn begin(&self, mode: GroupingMode) -> ClusterTicket {
        ClusterTicket {
            generation: self.generation,
            mode,
        }
    }

    /// Returns `true` if a result for `ticket` would still be accepted.
    #[must_use]
    pub const fn is_current(&self, ticket: ClusterTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Stores a result computed for `ticket`.
    ///
    /// Returns `false` and discards the result when the session has moved
    /// on since the ticket was issued, or when the result was computed for
    /// a different mode than the ticket names.
    #[must_use]
    pub fn complete(&mut self, ticket: ClusterTicket, output: ClusterOutput) -> bool {
        if !self.is_current(ticket) {
            log::debug!(
                "Discarding superseded {} result (generation {} < {})",
                ticket.mode,
                ticket.generation,
                self.generation
            );
            return false;
        }

        if output.mode != ticket.mode {
            log::warn!(
                "Discarding {} result submitted for a {} ticket",
                output.mode,
                ticket.mode
            );
            return false;
        }

        self.cache.insert(ticket.mode, output);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn victoria() -> Vec<RoadSegment> {
        vec![
            RoadSegment::from_line("Victoria Street", "residential", &[(151.2, -33.87)]),
            RoadSegment::from_line("Victoria Road", "residential", &[(151.2005, -33.87)]),
            RoadSegment::from_line("Victoria Street", "residential", &[(151.3, -33.87)]),
        ]
    }

    #[test]
    fn caches_per_mode() {
        let mut session = ClusterSession::new(victoria(), ClusterConfig::default());
        assert!(session.cached(GroupingMode::NameType).is_none());

        assert_eq!(session.counts(GroupingMode::NameType).get("Victoria Street"), Some(&2));
        assert_eq!(session.counts(GroupingMode::NameOnly).get("Victoria"), Some(&2));

        assert!(session.cached(GroupingMode::NameType).is_some());
        assert!(session.cached(GroupingMode::NameOnly).is_some());
        assert!(session.cached(GroupingMode::Type).is_none());
    }

    #[test]
    fn new_segments_invalidate_cache() {
        let mut session = ClusterSession::new(victoria(), ClusterConfig::default());
        let _ = session.output(GroupingMode::NameType);
        let generation = session.generation();

        session.extend_segments([RoadSegment::from_line(
            "Victoria Street",
            "residential",
            &[(151.4, -33.87)],
        )]);

        assert!(session.cached(GroupingMode::NameType).is_none());
        assert_eq!(session.generation(), generation + 1);
        assert_eq!(session.counts(GroupingMode::NameType).get("Victoria Street"), Some(&3));
    }

    #[test]
    fn empty_extend_keeps_cache() {
        let mut session = ClusterSession::new(victoria(), ClusterConfig::default());
        let _ = session.output(GroupingMode::NameType);

        session.extend_segments(Vec::new());
        session.set_config(ClusterConfig::default());

        assert!(session.cached(GroupingMode::NameType).is_some());
        assert_eq!(session.generation(), 0);
    }

    #[test]
    fn config_change_invalidates_cache() {
        let mut session = ClusterSession::new(victoria(), ClusterConfig::default());
        let _ = session.output(GroupingMode::NameOnly);

        session.set_config(ClusterConfig::with_cell_size(0.0001));

        assert!(session.cached(GroupingMode::NameOnly).is_none());
        assert_eq!(session.counts(GroupingMode::NameOnly).get("Victoria"), Some(&3));
    }

    #[test]
    fn superseded_results_are_discarded() {
        let mut session = ClusterSession::new(victoria(), ClusterConfig::default());

        let stale = session.begin(GroupingMode::NameType);
        let stale_output = cluster(session.segments(), stale.mode(), session.config());

        session.replace_segments(victoria()[..1].to_vec());
        let fresh = session.begin(GroupingMode::NameType);
        let fresh_output = cluster(session.segments(), fresh.mode(), session.config());

        assert!(session.complete(fresh, fresh_output));
        assert!(!session.complete(stale, stale_output));
        assert_eq!(
            session.cached(GroupingMode::NameType).unwrap().count("Victoria Street"),
            1
        );
    }

    #[test]
    fn mismatched_mode_is_rejected() {
        let mut session = ClusterSession::new(victoria(), ClusterConfig::default());
        let ticket = session.begin(GroupingMode::Type);
        let output = cluster(session.segments(), GroupingMode::NameType, session.config());

        assert!(!session.complete(ticket, output));
        assert!(session.cached(GroupingMode::Type).is_none());
    }

    #[test]
    fn stale_completion_leaves_mode_uncached() {
        let mut session = ClusterSession::new(victoria(), ClusterConfig::default());
        let ticket = session.begin(GroupingMode::NameOnly);
        let output = cluster(session.segments(), ticket.mode(), session.config());

        session.set_config(ClusterConfig::with_cell_size(0.0001));

        assert!(!session.is_current(ticket));
        assert!(!session.complete(ticket, output));
        assert!(session.cached(GroupingMode::NameOnly).is_none());
    }
}
