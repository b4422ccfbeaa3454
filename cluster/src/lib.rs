pub mod error;
pub mod registry;
pub mod store;
pub mod tokens;
pub mod types;

pub use error::ClusterError;
pub use registry::{IngestOutcome, Registry, SaveFailure, SIMILARITY_THRESHOLD};
pub use store::ClusterStore;
pub use tokens::{jaccard, token_set};
pub use types::{Centre, Cluster, Comic, TokenSet};
