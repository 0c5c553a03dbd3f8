pub mod ddg;
pub mod hackernews;
pub mod news;
pub mod reddit;
pub mod registry;
pub mod traits;

pub use registry::{build_registry, select_fetchers};
pub use traits::SourceFetcher;
