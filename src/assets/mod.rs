//! Asset Loading
//!
//! Models and audio are read by an [`AssetReaderVariant`] (local files or HTTP),
//! decoded off the stage thread by [`fetch_all`], and delivered back through a
//! `flume` channel as [`LoadResult`]s. The [`LoadingManager`] aggregates progress
//! across every registered item; objects track their own [`AssetState`].

pub mod fetch;
pub mod graph;
pub mod io;
pub mod loaders;
pub mod manager;
pub mod state;

pub use fetch::{AssetKind, LoadRequest, LoadResult, LoadTicket, Payload, fetch, fetch_all};
pub use graph::{AssetGraph, AssetNode};
pub use io::{AssetReader, AssetReaderVariant, FileAssetReader};
#[cfg(feature = "http")]
pub use io::HttpAssetReader;
pub use manager::{LoadEvent, LoadingManager};
pub use state::AssetState;
