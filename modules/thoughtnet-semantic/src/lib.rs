pub mod cluster;
pub mod decompose;
pub mod embed;
pub mod label;
pub mod traits;

pub use cluster::KMeansEngine;
pub use decompose::analyze_query;
pub use embed::ApiEmbedder;
pub use label::KeywordLabeler;
pub use traits::{ClusterEngine, ClusterLabeler, TextEmbedder};
