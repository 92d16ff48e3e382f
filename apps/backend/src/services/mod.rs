pub mod backfill;
pub mod completion;
pub mod orchestrator;
pub mod speech;
pub mod storage;
