use crate::client::Transport;
use crate::error::ApiError;
use crate::model::{ServiceStatus, StatisticsSnapshot};
use serde::Serialize;

/// Statistics and status taken together for one report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub status: ServiceStatus,
    pub statistics: StatisticsSnapshot,
}

/// Fetches statistics and status concurrently. Either failure aborts the
/// report; when both fail the statistics error wins.
pub fn get_snapshot<T: Transport + Sync>(transport: &T) -> Result<Snapshot, ApiError> {
    let (statistics, status) = rayon::join(|| transport.summary(), || transport.status());

    Ok(Snapshot {
        statistics: statistics?,
        status: status?,
    })
}
