use std::sync::Mutex;

use crate::error::ClusterError;
use crate::store::ClusterStore;
use crate::tokens::{jaccard, token_set};
use crate::types::{Centre, Cluster, Comic};

/// Minimum jaccard score on title or transcript for a comic to join an
/// existing cluster.
pub const SIMILARITY_THRESHOLD: f64 = 0.2;

/// Outcome of one `ingest` call.
#[derive(Debug)]
pub struct IngestOutcome {
    /// Key of the cluster the comic landed in.
    pub cluster: u32,

    /// True if the comic founded a new cluster.
    pub created: bool,

    /// Snapshot writes that failed during this call. The in-memory
    /// mutation is kept either way; disk catches up on the next
    /// successful save of the affected cluster.
    pub save_failures: Vec<SaveFailure>,
}

/// One failed snapshot write, reported per cluster.
#[derive(Debug)]
pub struct SaveFailure {
    pub cluster: u32,
    pub error: ClusterError,
}

struct Inner {
    clusters: Vec<Cluster>,
    ingested: usize,
}

/// Registry is the growing set of all clusters discovered so far, plus
/// the count of comics that completed ingest.
///
/// All state sits behind one mutex. An `ingest` call runs assignment,
/// registry mutation, and the full persistence pass as a single
/// critical section, so concurrent producers never observe a partial
/// update and snapshot files are never written concurrently. Share
/// across tasks or threads behind an `Arc`.
pub struct Registry {
    store: ClusterStore,
    inner: Mutex<Inner>,
}

impl Registry {
    pub fn new(store: ClusterStore) -> Self {
        Self {
            store,
            inner: Mutex::new(Inner {
                clusters: Vec::new(),
                ingested: 0,
            }),
        }
    }

    /// Assign one comic to a cluster and refresh every cluster
    /// snapshot on disk.
    ///
    /// Assignment is first-fit in cluster creation order: the comic
    /// joins the first cluster whose centre scores at least
    /// `SIMILARITY_THRESHOLD` on title or transcript, even if a later
    /// cluster would score higher. With no match it founds a new
    /// cluster keyed by its own number. The centre of an existing
    /// cluster is never recomputed.
    pub fn ingest(&self, comic: Comic) -> IngestOutcome {
        let mut inner = self.inner.lock().unwrap();
        inner.ingested += 1;

        let title_set = token_set(&comic.title);
        let transcript_set = token_set(&comic.transcript);

        let matched = inner.clusters.iter().position(|c| {
            jaccard(&title_set, &c.centre.title_set) >= SIMILARITY_THRESHOLD
                || jaccard(&transcript_set, &c.centre.transcript_set) >= SIMILARITY_THRESHOLD
        });

        let (cluster, created) = match matched {
            Some(i) => {
                let cluster = &mut inner.clusters[i];
                cluster.members.push(comic);
                (cluster.centre.num, false)
            }
            None => {
                let num = comic.num;
                inner.clusters.push(Cluster {
                    centre: Centre {
                        title_set,
                        transcript_set,
                        num,
                    },
                    members: vec![comic],
                });
                (num, true)
            }
        };

        // Rewrite every snapshot, not just the touched cluster: a save
        // that failed on an earlier ingest gets retried here, so disk
        // converges back to the in-memory state.
        let mut save_failures = Vec::new();
        for cluster in &inner.clusters {
            if let Err(error) = self.store.save(cluster) {
                save_failures.push(SaveFailure {
                    cluster: cluster.centre.num,
                    error,
                });
            }
        }

        IngestOutcome {
            cluster,
            created,
            save_failures,
        }
    }

    /// Number of comics that completed ingest.
    pub fn ingested(&self) -> usize {
        self.inner.lock().unwrap().ingested
    }

    /// Number of clusters created so far.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().clusters.len()
    }

    /// True if no comic has been ingested yet.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clone of the current cluster list, in creation order.
    pub fn snapshot(&self) -> Vec<Cluster> {
        self.inner.lock().unwrap().clusters.clone()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    fn comic(num: u32, title: &str, transcript: &str) -> Comic {
        Comic {
            num,
            day: "1".to_string(),
            month: "1".to_string(),
            year: "2024".to_string(),
            title: title.to_string(),
            transcript: transcript.to_string(),
        }
    }

    fn registry(dir: &tempfile::TempDir) -> Registry {
        Registry::new(ClusterStore::new(dir.path()))
    }

    #[test]
    fn test_similar_titles_share_a_cluster() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir);

        // {a,b,c} vs {a,b,d} scores 0.5 on title, above threshold.
        let o1 = reg.ingest(comic(1, "a b c", "x y"));
        let o2 = reg.ingest(comic(2, "a b d", "x y"));
        let o3 = reg.ingest(comic(3, "z q", "m n"));

        assert!(o1.created);
        assert_eq!(o1.cluster, 1);
        assert!(!o2.created);
        assert_eq!(o2.cluster, 1);
        assert!(o3.created);
        assert_eq!(o3.cluster, 3);

        let clusters = reg.snapshot();
        assert_eq!(clusters.len(), 2);
        let members: Vec<u32> = clusters[0].members.iter().map(|m| m.num).collect();
        assert_eq!(members, vec![1, 2]);
        assert_eq!(clusters[1].members[0].num, 3);
    }

    #[test]
    fn test_first_fit_beats_best_fit() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir);

        reg.ingest(comic(1, "a b c d e", "m n"));
        reg.ingest(comic(2, "p q r", "u v"));

        // Scores 0.25 against cluster 1 and 0.6 against cluster 2; the
        // scan must stop at cluster 1 anyway.
        let o = reg.ingest(comic(3, "a b p q r", "k l"));
        assert!(!o.created);
        assert_eq!(o.cluster, 1);

        let clusters = reg.snapshot();
        assert_eq!(clusters[0].members.len(), 2);
        assert_eq!(clusters[1].members.len(), 1);
    }

    #[test]
    fn test_transcript_alone_can_match() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir);

        reg.ingest(comic(1, "alpha beta", "shared transcript words here"));
        let o = reg.ingest(comic(2, "gamma delta", "shared transcript words there"));

        assert!(!o.created);
        assert_eq!(o.cluster, 1);
    }

    #[test]
    fn test_centre_never_changes_after_creation() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir);

        reg.ingest(comic(1, "a b c", "x y"));
        let before = reg.snapshot()[0].centre.clone();

        reg.ingest(comic(2, "a b zz ww", "x y"));
        reg.ingest(comic(3, "a qq rr ss tt", "x y z w"));

        let after = &reg.snapshot()[0];
        assert_eq!(after.members.len(), 3);
        assert_eq!(after.centre.num, before.num);
        assert_eq!(after.centre.title_set, before.title_set);
        assert_eq!(after.centre.transcript_set, before.transcript_set);
    }

    #[test]
    fn test_empty_text_never_matches() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir);

        // Empty-vs-empty similarity is 0, so each blank record founds
        // its own cluster instead of erroring or matching everything.
        let o1 = reg.ingest(comic(1, "", ""));
        let o2 = reg.ingest(comic(2, "", ""));

        assert!(o1.created);
        assert!(o2.created);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_ingested_counts_every_call() {
        let dir = tempfile::tempdir().unwrap();
        let reg = registry(&dir);

        assert!(reg.is_empty());
        reg.ingest(comic(1, "a b", "x"));
        reg.ingest(comic(2, "a b", "x"));
        reg.ingest(comic(3, "c d", "y"));
        assert_eq!(reg.ingested(), 3);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn test_every_snapshot_refreshed_after_each_ingest() {
        let dir = tempfile::tempdir().unwrap();
        let store = ClusterStore::new(dir.path());
        let reg = registry(&dir);

        let records = [
            comic(1, "a b c", "x y"),
            comic(2, "a b d", "x y"),
            comic(3, "z q", "m n"),
            comic(4, "z q extra", "far apart"),
        ];

        for record in records {
            reg.ingest(record);

            // Disk must mirror memory for every cluster, including the
            // ones this record did not touch.
            for cluster in reg.snapshot() {
                let on_disk = store.load(cluster.centre.num).unwrap();
                assert_eq!(
                    serde_json::to_value(&on_disk).unwrap(),
                    serde_json::to_value(&cluster).unwrap(),
                );
            }
        }
    }

    #[test]
    fn test_deterministic_under_fixed_order() {
        let records = [
            comic(10, "one two three", "aa bb"),
            comic(11, "one two four", "cc dd"),
            comic(12, "five six", "aa bb cc"),
            comic(13, "seven eight", "ee ff"),
            comic(14, "one nine", "ee ff gg"),
        ];

        let run = || {
            let dir = tempfile::tempdir().unwrap();
            let reg = registry(&dir);
            for record in records.clone() {
                reg.ingest(record);
            }
            serde_json::to_string(&reg.snapshot()).unwrap()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_concurrent_ingest_keeps_membership_complete() {
        let dir = tempfile::tempdir().unwrap();
        let reg = Arc::new(registry(&dir));

        let threads = 4;
        let per_thread = 25u32;
        let mut handles = Vec::new();
        for t in 0..threads {
            let reg = reg.clone();
            handles.push(thread::spawn(move || {
                for i in 0..per_thread {
                    let num = t * per_thread + i + 1;
                    let title = format!("title {num} group{}", num % 5);
                    let transcript = format!("body {num}");
                    reg.ingest(comic(num, &title, &transcript));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let total = (threads * per_thread) as usize;
        assert_eq!(reg.ingested(), total);

        let clusters = reg.snapshot();
        let member_count: usize = clusters.iter().map(|c| c.members.len()).sum();
        assert_eq!(member_count, total);

        // Every comic number appears in exactly one member list.
        let mut seen: Vec<u32> = clusters
            .iter()
            .flat_map(|c| c.members.iter().map(|m| m.num))
            .collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), total);
    }
}
