pub mod aggregator;
pub mod cache;
pub mod corpus;
pub mod error;
pub mod grouping;
pub mod link;
pub mod link_parser;
pub mod planner;
pub mod query;
pub mod ranking;
pub mod session;
pub mod template;
pub mod vault_index;

pub use aggregator::{scan, LinkAggregator, ScanResult, ScanStats};
pub use cache::ScanCache;
pub use corpus::CorpusSource;
pub use error::ScanError;
pub use grouping::{group_by_folder, FolderGroup, FolderGroups, FolderKey};
pub use link::{LinkReference, UnresolvedLinkInfo};
pub use query::{filter_links, LinkView, ViewOptions};
pub use ranking::{sort_links, SortPolicy};
pub use session::Curator;
