/// CSV export of recommendation lists.
pub mod export;
