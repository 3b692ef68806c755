pub mod fare;
pub mod ledger;
pub mod pricing;
