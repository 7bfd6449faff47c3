//! Step-by-step DBSCAN
//!
//! The classic DBSCAN loop rewritten as an explicit state machine so it can
//! be suspended after every visible mutation. The sequencer owns the point
//! store for the whole run; seed lists and events hold [`PointId`]s only.
//!
//! # Phases
//! - **Scanning**: walk the dataset in creation order, skipping labelled points
//! - **Classifying**: query the neighborhood of the inspected point and
//!   mark it noise or open a new cluster
//! - **Expanding**: walk the append-only seed list of the open cluster,
//!   promoting dense seeds to core and claiming their unlabelled neighbors
//! - **Complete**: the scan passed the last point
//!
//! Noise is not final. A point marked noise early can still be claimed as a
//! border point when a later cluster reaches it.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::iter::FusedIterator;
use std::mem;

use log::{debug, info, trace};

use crate::algorithm::state::{RunSummary, StepEvent, StepPhase};
use crate::algorithm::traits::{
    AlgorithmComplexity, AlgorithmDescriptor, AlgorithmId, StepSequence,
};
use crate::config::ClusteringParams;
use crate::data_structures::{ClusterId, Point, PointId, PointStore};

/// Position of the sequencer between two steps
#[derive(Debug, Clone, PartialEq)]
enum Cursor {
    Scanning {
        next: usize,
    },
    Classifying {
        point: PointId,
    },
    Expanding {
        cluster: ClusterId,
        seeds: Vec<PointId>,
        cursor: usize,
        resume: usize,
    },
    Complete,
}

/// Pull-based DBSCAN over an owned [`PointStore`]
#[derive(Debug, Clone)]
pub struct DbscanSequencer {
    store: PointStore,
    params: ClusteringParams,
    cursor: Cursor,

    /// Last allocated cluster id, `ClusterId::NOISE` before the first one
    last_cluster: ClusterId,

    steps: usize,
}

impl DbscanSequencer {
    /// Binds a sequencer to a dataset with a fixed parameter snapshot
    pub fn new(store: PointStore, params: ClusteringParams) -> Self {
        Self {
            store,
            params,
            cursor: Cursor::Scanning { next: 0 },
            last_cluster: ClusterId::NOISE,
            steps: 0,
        }
    }

    pub fn store(&self) -> &PointStore {
        &self.store
    }

    /// Gives the labelled dataset back
    pub fn into_store(self) -> PointStore {
        self.store
    }

    pub fn params(&self) -> ClusteringParams {
        self.params
    }

    /// Clusters opened so far
    pub fn cluster_count(&self) -> usize {
        self.last_cluster.as_usize()
    }

    /// Events emitted so far
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// Length of the seed list while a cluster is expanding
    pub fn pending_seeds(&self) -> usize {
        match &self.cursor {
            Cursor::Expanding { seeds, cursor, .. } => seeds.len() - cursor,
            _ => 0,
        }
    }

    /// Runs until the next suspension point. Returns `None` once every
    /// point has been visited.
    pub fn advance(&mut self) -> Option<StepEvent> {
        loop {
            match mem::replace(&mut self.cursor, Cursor::Complete) {
                Cursor::Scanning { next } => match self.store.first_unvisited_from(next) {
                    Some(point) => {
                        self.cursor = Cursor::Classifying { point };
                        return Some(self.emit(point, self.params.eps, StepPhase::Inspecting));
                    }
                    None => {
                        info!(
                            "DBSCAN completed after {} steps: {} clusters over {} points",
                            self.steps,
                            self.cluster_count(),
                            self.store.len()
                        );
                        return None;
                    }
                },
                Cursor::Classifying { point } => return Some(self.classify(point)),
                Cursor::Expanding {
                    cluster,
                    seeds,
                    cursor,
                    resume,
                } => {
                    if let Some(event) = self.expand(cluster, seeds, cursor, resume) {
                        return Some(event);
                    }
                }
                Cursor::Complete => return None,
            }
        }
    }

    /// Noise test for a freshly inspected point, opening a cluster when it
    /// passes.
    fn classify(&mut self, point: PointId) -> StepEvent {
        let eps = self.params.eps;
        let neighbors = self.store.neighbors(point, eps);
        let resume = point.as_usize() + 1;

        if neighbors.len() + 1 < self.params.min_pts {
            self.store.point_mut(point).mark_noise();
            self.cursor = Cursor::Scanning { next: resume };
            return self.emit(point, 0.0, StepPhase::MarkedNoise);
        }

        let cluster = self.last_cluster.next();
        self.last_cluster = cluster;
        self.store.point_mut(point).mark_core(cluster);

        // Border points of earlier clusters stay where they are; the
        // expansion loop skips them.
        for &seed in &neighbors {
            let seed = self.store.point_mut(seed);
            if seed.is_claimable() {
                seed.assign(cluster);
            }
        }

        debug!(
            "Point {} opens cluster {} with {} seeds",
            point,
            cluster,
            neighbors.len()
        );

        self.cursor = Cursor::Expanding {
            cluster,
            seeds: neighbors,
            cursor: 0,
            resume,
        };
        self.emit(point, eps, StepPhase::CoreFound { cluster })
    }

    /// Walks the seed list until a seed claims new points. Leaves the cursor
    /// on the next scan position when the list is exhausted.
    fn expand(
        &mut self,
        cluster: ClusterId,
        mut seeds: Vec<PointId>,
        mut cursor: usize,
        resume: usize,
    ) -> Option<StepEvent> {
        let eps = self.params.eps;

        while cursor < seeds.len() {
            let current = seeds[cursor];
            cursor += 1;

            if self.store[current].cluster_id != Some(cluster) {
                trace!("Seed {} belongs to another cluster, skipping", current);
                continue;
            }

            let neighbors = self.store.neighbors(current, eps);
            if neighbors.len() + 1 < self.params.min_pts {
                self.store.point_mut(current).settle_border();
                continue;
            }

            self.store.point_mut(current).promote_core();

            let mut discovered = 0;
            for neighbor in neighbors {
                let point = self.store.point_mut(neighbor);
                if point.is_claimable() {
                    point.claim_border(cluster);
                    seeds.push(neighbor);
                    discovered += 1;
                }
            }

            if discovered > 0 {
                self.cursor = Cursor::Expanding {
                    cluster,
                    seeds,
                    cursor,
                    resume,
                };
                return Some(self.emit(
                    current,
                    eps,
                    StepPhase::Expanding {
                        cluster,
                        discovered,
                    },
                ));
            }
        }

        debug!("Cluster {} fully expanded", cluster);
        self.cursor = Cursor::Scanning { next: resume };
        None
    }

    fn emit(&mut self, point: PointId, radius: f64, phase: StepPhase) -> StepEvent {
        self.steps += 1;
        debug!("Step {}: point {} {}", self.steps, point, phase);
        StepEvent {
            step: self.steps,
            active_point: Some(point),
            radius,
            phase,
        }
    }
}

impl StepSequence for DbscanSequencer {
    fn advance(&mut self) -> Option<StepEvent> {
        DbscanSequencer::advance(self)
    }

    fn points(&self) -> &[Point] {
        self.store.points()
    }

    fn is_complete(&self) -> bool {
        self.cursor == Cursor::Complete
    }

    fn summary(&self) -> RunSummary {
        RunSummary::from_counts(self.cluster_count(), self.store.label_counts(), self.steps)
    }

    fn descriptor(&self) -> AlgorithmDescriptor {
        AlgorithmDescriptor {
            id: AlgorithmId::new("dbscan"),
            name: "DBSCAN",
            category: "clustering",
            description: "Density-based clustering: dense points seed clusters that grow \
                          through their eps-neighborhoods; sparse points are noise",
            complexity: AlgorithmComplexity {
                time_complexity: "O(n²)".to_owned(),
                space_complexity: "O(n)".to_owned(),
            },
        }
    }
}

impl Iterator for DbscanSequencer {
    type Item = StepEvent;

    fn next(&mut self) -> Option<StepEvent> {
        self.advance()
    }
}

impl FusedIterator for DbscanSequencer {}

/// Clusters a store in one go and returns the labelled store with its summary
pub fn dbscan_labels(store: PointStore, params: ClusteringParams) -> (PointStore, RunSummary) {
    let mut sequencer = DbscanSequencer::new(store, params);
    let summary = sequencer.run_to_completion();
    (sequencer.into_store(), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::PointRole;
    use proptest::prelude::*;

    /// Five points packed within 1 unit plus one far outlier
    fn tight_group_with_outlier() -> PointStore {
        PointStore::from_positions([
            (0.0, 0.0),
            (0.5, 0.0),
            (0.0, 0.5),
            (0.5, 0.5),
            (0.25, 0.25),
            (200.0, 200.0),
        ])
    }

    #[test]
    fn test_tight_group_and_outlier() {
        let (store, summary) = dbscan_labels(tight_group_with_outlier(), ClusteringParams::new(2.0, 3));

        assert_eq!(summary.clusters, 1);
        for i in 0..5 {
            assert_eq!(store[PointId(i)].cluster_id, Some(ClusterId(1)));
            assert!(matches!(
                store[PointId(i)].role,
                PointRole::Core | PointRole::Border
            ));
        }
        assert_eq!(store[PointId(5)].cluster_id, Some(ClusterId::NOISE));
        assert_eq!(store[PointId(5)].role, PointRole::Noise);
        assert_eq!(summary.noise, 1);
    }

    #[test]
    fn test_step_sequence_for_tight_group() {
        let mut sequencer =
            DbscanSequencer::new(tight_group_with_outlier(), ClusteringParams::new(2.0, 3));
        let events: Vec<StepEvent> = sequencer.by_ref().collect();
        let phases: Vec<StepPhase> = events.iter().map(|e| e.phase).collect();

        // Every group member is a seed of point 0, so expansion never
        // discovers anything new and emits no event.
        assert_eq!(
            phases,
            vec![
                StepPhase::Inspecting,
                StepPhase::CoreFound {
                    cluster: ClusterId(1)
                },
                StepPhase::Inspecting,
                StepPhase::MarkedNoise,
            ]
        );
        assert_eq!(events[0].active_point, Some(PointId(0)));
        assert_eq!(events[0].radius, 2.0);
        assert_eq!(events[2].active_point, Some(PointId(5)));
        assert_eq!(events[3].radius, 0.0);
        assert_eq!(events.iter().map(|e| e.step).collect::<Vec<_>>(), vec![1, 2, 3, 4]);

        assert!(sequencer.is_complete());
        assert_eq!(sequencer.advance(), None);
        assert_eq!(sequencer.summary().steps, 4);
    }

    #[test]
    fn test_chain_expands_through_seeds() {
        // A line of points 1 apart: only a chain of expansions can reach the
        // end. The first point has a single neighbor and starts as noise.
        let store = PointStore::from_positions((0..6).map(|i| (f64::from(i), 0.0)));
        let mut sequencer = DbscanSequencer::new(store, ClusteringParams::new(1.0, 3));

        let events: Vec<StepEvent> = sequencer.by_ref().collect();
        assert_eq!(events[1].phase, StepPhase::MarkedNoise);
        assert_eq!(
            events[3].phase,
            StepPhase::CoreFound {
                cluster: ClusterId(1)
            }
        );
        assert_eq!(events[3].active_point, Some(PointId(1)));

        let expansions: Vec<(Option<PointId>, StepPhase)> = events
            .iter()
            .filter(|e| matches!(e.phase, StepPhase::Expanding { .. }))
            .map(|e| (e.active_point, e.phase))
            .collect();

        assert_eq!(
            expansions,
            vec![
                (
                    Some(PointId(2)),
                    StepPhase::Expanding {
                        cluster: ClusterId(1),
                        discovered: 1
                    }
                ),
                (
                    Some(PointId(3)),
                    StepPhase::Expanding {
                        cluster: ClusterId(1),
                        discovered: 1
                    }
                ),
                (
                    Some(PointId(4)),
                    StepPhase::Expanding {
                        cluster: ClusterId(1),
                        discovered: 1
                    }
                ),
            ]
        );

        let store = sequencer.into_store();
        assert_eq!(store[PointId(0)].role, PointRole::Border);
        assert_eq!(store[PointId(5)].role, PointRole::Border);
        for i in 1..5 {
            assert_eq!(store[PointId(i)].role, PointRole::Core);
        }
    }

    #[test]
    fn test_noise_is_reclaimed_as_border() {
        // Point 0 is inspected first and has a single neighbor, so it is
        // noise until the dense group to its right reaches it.
        let store = PointStore::from_positions([
            (0.0, 0.0),
            (1.0, 0.0),
            (1.5, 0.5),
            (1.5, -0.5),
            (2.0, 0.0),
        ]);
        let mut sequencer = DbscanSequencer::new(store, ClusteringParams::new(1.0, 4));

        assert_eq!(sequencer.advance().map(|e| e.phase), Some(StepPhase::Inspecting));
        assert_eq!(sequencer.advance().map(|e| e.phase), Some(StepPhase::MarkedNoise));
        assert_eq!(sequencer.store()[PointId(0)].role, PointRole::Noise);

        let summary = sequencer.run_to_completion();
        let store = sequencer.into_store();
        assert_eq!(summary.clusters, 1);
        assert_eq!(store[PointId(0)].cluster_id, Some(ClusterId(1)));
        assert_eq!(store[PointId(0)].role, PointRole::Border);
        assert_eq!(summary.noise, 0);
    }

    #[test]
    fn test_border_point_is_not_stolen_by_later_cluster() {
        // Point 2 borders both groups; cluster 1 reaches it first.
        let store = PointStore::from_positions([
            (0.0, 0.0),
            (0.0, 1.0),
            (1.0, 0.0),
            (-1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (2.0, 1.0),
            (2.0, -1.0),
        ]);
        let (store, summary) = dbscan_labels(store, ClusteringParams::new(1.0, 4));

        assert_eq!(summary.clusters, 2);
        assert_eq!(store[PointId(2)].cluster_id, Some(ClusterId(1)));
        assert_eq!(store[PointId(2)].role, PointRole::Border);
        assert_eq!(store[PointId(4)].cluster_id, Some(ClusterId(2)));
        assert_eq!(store[PointId(4)].role, PointRole::Core);
    }

    #[test]
    fn test_min_pts_one_never_yields_noise() {
        let store = PointStore::from_positions([(0.0, 0.0), (50.0, 0.0), (0.5, 0.0), (100.0, 100.0)]);
        let mut sequencer = DbscanSequencer::new(store, ClusteringParams::new(1.0, 1));
        let events: Vec<StepEvent> = sequencer.by_ref().collect();

        assert!(events.iter().all(|e| e.phase != StepPhase::MarkedNoise));
        let summary = sequencer.summary();
        assert_eq!(summary.noise, 0);
        assert_eq!(summary.clusters, 3);
        assert_eq!(summary.core, 4);
    }

    #[test]
    fn test_zero_min_pts_is_accepted() {
        let store = PointStore::from_positions([(0.0, 0.0), (10.0, 10.0)]);
        let (store, summary) = dbscan_labels(store, ClusteringParams::new(1.0, 0));
        assert_eq!(summary.clusters, 2);
        assert!(store.points().iter().all(Point::is_core));
    }

    #[test]
    fn test_empty_store_completes_immediately() {
        let mut sequencer = DbscanSequencer::new(PointStore::new(), ClusteringParams::default());
        assert_eq!(sequencer.advance(), None);
        assert!(sequencer.is_complete());
        assert_eq!(sequencer.summary().clusters, 0);
    }

    #[test]
    fn test_descriptor() {
        let sequencer = DbscanSequencer::new(PointStore::new(), ClusteringParams::default());
        let descriptor = sequencer.descriptor();
        assert_eq!(descriptor.id, AlgorithmId::new("dbscan"));
        assert_eq!(descriptor.complexity.time_complexity, "O(n²)");
    }

    fn points_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((0.0f64..100.0, 0.0f64..100.0), 0..80)
    }

    proptest! {
        #[test]
        fn test_full_run_labels_every_point(
            positions in points_strategy(),
            eps in 1.0f64..25.0,
            min_pts in 1usize..8,
        ) {
            let params = ClusteringParams::new(eps, min_pts);
            let original = PointStore::from_positions(positions);
            let (store, summary) = dbscan_labels(original.clone(), params);

            for (id, p) in store.iter() {
                prop_assert!(p.cluster_id.is_some());
                prop_assert!(p.role != PointRole::Unvisited);

                let degree = original.neighbors(id, eps).len();
                match p.role {
                    PointRole::Core => prop_assert!(degree + 1 >= min_pts),
                    PointRole::Noise => {
                        prop_assert_eq!(p.cluster_id, Some(ClusterId::NOISE));
                        prop_assert!(degree + 1 < min_pts);
                    }
                    PointRole::Border => prop_assert!(!p.cluster_id.unwrap().is_noise()),
                    PointRole::Unvisited => unreachable!(),
                }
            }

            // Cluster ids are contiguous 1..=K
            let mut seen = vec![false; summary.clusters + 1];
            for label in store.labels().into_iter().flatten() {
                prop_assert!(label.as_usize() <= summary.clusters);
                seen[label.as_usize()] = true;
            }
            prop_assert!(seen.iter().skip(1).all(|&s| s));
        }

        #[test]
        fn test_same_input_same_partition(
            positions in points_strategy(),
            eps in 1.0f64..25.0,
            min_pts in 1usize..8,
        ) {
            let params = ClusteringParams::new(eps, min_pts);
            let store = PointStore::from_positions(positions);
            let (a, _) = dbscan_labels(store.clone(), params);
            let (b, _) = dbscan_labels(store, params);
            prop_assert_eq!(a.labels(), b.labels());
        }

        #[test]
        fn test_core_points_never_regress(
            positions in points_strategy(),
            eps in 1.0f64..25.0,
            min_pts in 1usize..8,
        ) {
            let mut sequencer =
                DbscanSequencer::new(PointStore::from_positions(positions), ClusteringParams::new(eps, min_pts));
            let mut cores = vec![false; sequencer.store().len()];
            let mut clusters: Vec<Option<ClusterId>> = vec![None; sequencer.store().len()];

            while sequencer.advance().is_some() {
                for (id, p) in sequencer.store().iter() {
                    let i = id.as_usize();
                    if cores[i] {
                        prop_assert!(p.is_core());
                    }
                    cores[i] = p.is_core();

                    if let Some(previous) = clusters[i].filter(|c| !c.is_noise()) {
                        prop_assert_eq!(p.cluster_id, Some(previous));
                    }
                    clusters[i] = p.cluster_id;
                }
            }
        }
    }
}
