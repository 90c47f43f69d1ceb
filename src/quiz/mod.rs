pub mod catalog;
pub mod ledger;
pub mod persistence;
pub mod result;
pub mod sampler;
pub mod score;
pub mod test_session;
