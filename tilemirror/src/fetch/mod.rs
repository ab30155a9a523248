//! The concurrent fetch-and-persist engine.
//!
//! Given a tile bounding box, an output root, and a cache policy, the engine
//! partitions the coordinate space into contiguous shards, fans each shard
//! out to a bounded pool of concurrent fetch tasks, and translates every
//! HTTP outcome into an on-disk tile record:
//!
//! ```text
//! <root>/<zoom>/<x>/<y>/200.png   # fetched image
//! <root>/<zoom>/<x>/<y>/404.txt   # confirmed absent upstream
//! ```
//!
//! Tiles are independent units of work: a failure is local to its tile, is
//! reported in the final [`FetchSummary`], and never disturbs another tile's
//! state or an in-flight sibling.

mod engine;
pub use engine::*;

mod outcome;
pub use outcome::*;

mod shard;
pub use shard::*;

mod store;
pub use store::*;
