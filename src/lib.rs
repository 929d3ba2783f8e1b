pub mod error;
pub mod grid;
pub mod io;
pub mod parallel;
pub mod search;

pub use error::{Result, SearchError};
pub use grid::{generate_grid, Grid};
pub use search::{
    merge, search, search_with_baseline, DivideAndConquerSearch, IndexSum, Match,
    MatchPredicate, PartitionedPoolSearch, SearchResult, Strategy,
};
