// Application layer - owned ledgers that pair in-memory state with a store.
// Clients (the CLI, tests) hold a ledger and call its operations directly;
// every mutation saves through the repository.

pub mod error;
pub mod expenses;
pub mod ledger;

pub use error::*;
pub use expenses::*;
pub use ledger::*;
