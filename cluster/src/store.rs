use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;

use crate::error::ClusterError;
use crate::types::Cluster;

/// ClusterStore persists one JSON snapshot file per cluster under a
/// root directory, named `cluster<num>.json` by the cluster key.
///
/// A save fully replaces the previous snapshot for the same key; there
/// is no append log and no versioning. The store never creates the
/// root directory; the caller must ensure it exists before the first
/// save.
pub struct ClusterStore {
    root: PathBuf,
}

impl ClusterStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Snapshot file path for cluster key `num`.
    pub fn path(&self, num: u32) -> PathBuf {
        self.root.join(format!("cluster{num}.json"))
    }

    /// Write the cluster's current state, replacing any prior snapshot.
    pub fn save(&self, cluster: &Cluster) -> Result<(), ClusterError> {
        let file = File::create(self.path(cluster.centre.num))?;
        let mut w = BufWriter::new(file);
        serde_json::to_writer(&mut w, cluster)?;
        w.flush()?;
        Ok(())
    }

    /// Read back the snapshot for cluster key `num`.
    pub fn load(&self, num: u32) -> Result<Cluster, ClusterError> {
        let file = File::open(self.path(num))?;
        let cluster = serde_json::from_reader(BufReader::new(file))?;
        Ok(cluster)
    }
}
