mod expense;
mod loan;
mod money;

pub use expense::*;
pub use loan::*;
pub use money::*;
