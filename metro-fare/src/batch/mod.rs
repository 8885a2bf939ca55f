//! Precomputing fares from every origin.
//!
//! The batch driver runs the single-origin search once per station and
//! hands each origin's table to a [`ReachabilitySink`]. A sink failure for
//! one origin is logged and the batch moves on to the next.

mod sink;

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::domain::StationId;
use crate::network::{MetroNetwork, Station};
use crate::planner::{PATH_SEPARATOR, Reachability, search_all};

pub use sink::{JsonDirSink, MemorySink, MemoryTable, ReachabilitySink, SinkError, table_name};

/// One destination row of an origin's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FareRow {
    pub destination: String,
    pub fare: u32,
    pub distance: u64,
    pub path: String,
}

/// Outcome counts of a batch export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Origins searched.
    pub origins: usize,
    /// Origins whose table was written.
    pub written: usize,
    /// Origins whose search or write failed.
    pub failed: usize,
}

/// Search from every station, dropping each origin's own entry.
pub fn export_all(network: &MetroNetwork) -> Vec<(StationId, Reachability)> {
    network
        .stations()
        .map(|station| (station.id, reachability_without_self(network, station.id)))
        .collect()
}

/// Render an origin's reachability as table rows, nearest first.
///
/// The origin's own entry is skipped.
pub fn fare_rows(
    network: &MetroNetwork,
    origin: StationId,
    reachability: &Reachability,
) -> Vec<FareRow> {
    let mut rows: Vec<FareRow> = reachability
        .iter()
        .filter(|(id, _)| **id != origin)
        .map(|(id, result)| FareRow {
            destination: network.station_name(id).into_owned(),
            fare: result.fare,
            distance: result.distance,
            path: result
                .path
                .iter()
                .map(|step| network.station_name(step))
                .collect::<Vec<_>>()
                .join(PATH_SEPARATOR),
        })
        .collect();

    rows.sort_by(|a, b| {
        a.distance
            .cmp(&b.distance)
            .then_with(|| a.destination.cmp(&b.destination))
    });
    rows
}

/// Search from every station and write each table to `sink`.
pub fn export_to_sink<S: ReachabilitySink>(network: &MetroNetwork, sink: &mut S) -> ExportSummary {
    let mut summary = ExportSummary::default();

    for station in network.stations() {
        summary.origins += 1;
        let reachability = reachability_without_self(network, station.id);
        write_origin(network, station, &reachability, sink, &mut summary);
    }

    finish(sink, &summary);
    summary
}

/// Like [`export_to_sink`], but runs up to `workers` searches at a time on
/// blocking worker threads.
///
/// Each search owns its own frontier; the network is only read. Tables are
/// written to the sink one at a time as each batch completes.
pub async fn export_to_sink_parallel<S: ReachabilitySink>(
    network: Arc<MetroNetwork>,
    sink: &mut S,
    workers: usize,
) -> ExportSummary {
    let mut summary = ExportSummary::default();
    let origins: Vec<StationId> = network.stations().map(|s| s.id).collect();

    for batch in origins.chunks(workers.max(1)) {
        let searches: Vec<_> = batch
            .iter()
            .map(|&origin| {
                let network = Arc::clone(&network);
                tokio::task::spawn_blocking(move || {
                    (origin, reachability_without_self(&network, origin))
                })
            })
            .collect();

        for joined in join_all(searches).await {
            summary.origins += 1;
            match joined {
                Ok((origin, reachability)) => {
                    let Some(station) = network.station(&origin) else {
                        summary.failed += 1;
                        continue;
                    };
                    write_origin(&network, station, &reachability, sink, &mut summary);
                }
                Err(e) => {
                    warn!(error = %e, "Search worker failed, skipping origin");
                    summary.failed += 1;
                }
            }
        }

        debug!(done = summary.origins, total = origins.len(), "Export progress");
    }

    finish(sink, &summary);
    summary
}

fn reachability_without_self(network: &MetroNetwork, origin: StationId) -> Reachability {
    let mut reachability = search_all(network, origin, network.free_distance());
    reachability.remove(&origin);
    reachability
}

fn write_origin<S: ReachabilitySink>(
    network: &MetroNetwork,
    station: &Station,
    reachability: &Reachability,
    sink: &mut S,
    summary: &mut ExportSummary,
) {
    let rows = fare_rows(network, station.id, reachability);
    let count = rows.len();

    match sink.write_origin(station, rows) {
        Ok(()) => {
            summary.written += 1;
            debug!(origin = %station.name, rows = count, "Exported origin");
        }
        Err(e) => {
            summary.failed += 1;
            warn!(origin = %station.name, error = %e, "Failed to export origin, continuing");
        }
    }
}

fn finish<S: ReachabilitySink>(sink: &mut S, summary: &ExportSummary) {
    if let Err(e) = sink.finish() {
        warn!(error = %e, "Failed to finalize export");
    }
    info!(
        origins = summary.origins,
        written = summary.written,
        failed = summary.failed,
        "Export complete"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::NetworkBuilder;

    fn complete_triangle() -> MetroNetwork {
        NetworkBuilder::new()
            .station(1, "A")
            .station(2, "B")
            .station(3, "C")
            .link(1, 2, 1_000)
            .link(2, 3, 1_500)
            .link(1, 3, 7_000)
            .build()
    }

    /// Sink that fails for one named origin.
    struct FlakySink {
        fail_on: &'static str,
        inner: MemorySink,
    }

    impl ReachabilitySink for FlakySink {
        fn write_origin(&mut self, origin: &Station, rows: Vec<FareRow>) -> Result<(), SinkError> {
            if origin.name == self.fail_on {
                return Err(SinkError::Rejected {
                    origin: origin.name.clone(),
                    message: "disk full".to_string(),
                });
            }
            self.inner.write_origin(origin, rows)
        }
    }

    #[test]
    fn export_all_covers_every_origin_without_self() {
        let network = complete_triangle();
        let tables = export_all(&network);

        assert_eq!(tables.len(), 3);
        for (origin, reachability) in &tables {
            assert_eq!(reachability.len(), 2);
            assert!(!reachability.contains_key(origin));
        }
    }

    #[test]
    fn rows_are_resolved_and_sorted() {
        let network = complete_triangle();
        let origin = StationId::new(1);
        let reachability = search_all(&network, origin, 0);
        let rows = fare_rows(&network, origin, &reachability);

        assert_eq!(
            rows,
            vec![
                FareRow {
                    destination: "B".to_string(),
                    fare: 3,
                    distance: 1_000,
                    path: "A -> B".to_string(),
                },
                FareRow {
                    destination: "C".to_string(),
                    fare: 3,
                    distance: 2_500,
                    path: "A -> B -> C".to_string(),
                },
            ]
        );
    }

    #[test]
    fn export_to_memory_sink() {
        let network = complete_triangle();
        let mut sink = MemorySink::new();
        let summary = export_to_sink(&network, &mut sink);

        assert_eq!(
            summary,
            ExportSummary {
                origins: 3,
                written: 3,
                failed: 0
            }
        );
        assert_eq!(sink.tables().len(), 3);
        assert!(sink.tables().values().all(|t| t.rows.len() == 2));
    }

    #[test]
    fn sink_failure_does_not_abort_batch() {
        let network = complete_triangle();
        let mut sink = FlakySink {
            fail_on: "B",
            inner: MemorySink::new(),
        };
        let summary = export_to_sink(&network, &mut sink);

        assert_eq!(summary.origins, 3);
        assert_eq!(summary.written, 2);
        assert_eq!(summary.failed, 1);
        assert!(sink.inner.rows(StationId::new(1)).is_some());
        assert!(sink.inner.rows(StationId::new(3)).is_some());
        assert!(sink.inner.rows(StationId::new(2)).is_none());
    }

    #[test]
    fn isolated_station_gets_empty_table() {
        let network = NetworkBuilder::new()
            .station(1, "A")
            .station(2, "Lonely")
            .build();
        let mut sink = MemorySink::new();
        export_to_sink(&network, &mut sink);

        assert_eq!(sink.rows(StationId::new(2)), Some(&[][..]));
        assert_eq!(sink.rows(StationId::new(1)), Some(&[][..]));
    }

    #[tokio::test]
    async fn parallel_export_matches_sequential() {
        let network = Arc::new(complete_triangle());

        let mut sequential = MemorySink::new();
        export_to_sink(&network, &mut sequential);

        let mut parallel = MemorySink::new();
        let summary = export_to_sink_parallel(Arc::clone(&network), &mut parallel, 2).await;

        assert_eq!(summary.origins, 3);
        assert_eq!(summary.written, 3);
        for (origin, table) in sequential.tables() {
            let other = parallel.rows(*origin).unwrap();
            let a: Vec<(&str, u64)> = table.rows.iter().map(|r| (r.destination.as_str(), r.distance)).collect();
            let b: Vec<(&str, u64)> = other.iter().map(|r| (r.destination.as_str(), r.distance)).collect();
            assert_eq!(a, b);
        }
    }

    #[tokio::test]
    async fn parallel_export_with_zero_workers_still_runs() {
        let network = Arc::new(complete_triangle());
        let mut sink = MemorySink::new();
        let summary = export_to_sink_parallel(network, &mut sink, 0).await;
        assert_eq!(summary.written, 3);
    }
}
