pub mod ledger;
pub mod user_repository;

// Re-export all repositories for convenient access
pub use ledger::BalanceLedger;
pub use user_repository::UserRepository;
