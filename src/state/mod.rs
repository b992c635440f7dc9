//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `BranchState`: the lifecycle of one crawl branch
//!   (pending, fetching, parsing, skipped, done, failed)
//! - `VisitedSet`: the URLs already claimed within one sitemap run

mod branch_state;
mod visited;

// Re-export main types
pub use branch_state::BranchState;
pub use visited::VisitedSet;
