use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// TokenSet is the set of distinct whitespace-delimited tokens of a
/// text field. Ordered so serialized snapshots are byte-deterministic.
pub type TokenSet = BTreeSet<String>;

/// Comic is one downloaded comic metadata record.
///
/// Field names match the upstream JSON; upstream fields the clusterer
/// does not use (alt text, image URLs, ...) are ignored on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comic {
    /// Unique comic number. Doubles as the key of any cluster this
    /// comic founds.
    #[serde(rename = "num")]
    pub num: u32,

    /// Publication day of month.
    #[serde(rename = "day", default)]
    pub day: String,

    /// Publication month.
    #[serde(rename = "month", default)]
    pub month: String,

    /// Publication year.
    #[serde(rename = "year", default)]
    pub year: String,

    /// Comic title.
    #[serde(rename = "title", default)]
    pub title: String,

    /// Full transcript text.
    #[serde(rename = "transcript", default)]
    pub transcript: String,
}

/// Centre is the fixed signature of a cluster: the title and transcript
/// token sets of the first comic assigned to it, plus that comic's
/// number as the cluster's stable key. Set once at cluster creation,
/// never recomputed as members accrue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Centre {
    /// Title tokens of the founding member.
    #[serde(rename = "title-set")]
    pub title_set: TokenSet,

    /// Transcript tokens of the founding member.
    #[serde(rename = "transcript-set")]
    pub transcript_set: TokenSet,

    /// Founding member's comic number; the cluster key.
    #[serde(rename = "num")]
    pub num: u32,
}

/// Cluster is a centre plus its members in arrival order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    #[serde(rename = "centre")]
    pub centre: Centre,

    #[serde(rename = "members")]
    pub members: Vec<Comic>,
}
