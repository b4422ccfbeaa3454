use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error("cluster: io error: {0}")]
    Io(String),

    #[error("cluster: serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ClusterError {
    fn from(e: std::io::Error) -> Self {
        ClusterError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for ClusterError {
    fn from(e: serde_json::Error) -> Self {
        ClusterError::Serialization(e.to_string())
    }
}
