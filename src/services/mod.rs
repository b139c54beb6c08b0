pub mod correction;
pub mod ingestion;
pub mod ledger;
pub mod report;
pub mod tracker;

#[cfg(test)]
pub(crate) mod testing;
