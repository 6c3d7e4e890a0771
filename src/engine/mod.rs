pub mod executor;
pub mod outcome;

pub use executor::{execute, execute_multiple};
pub use outcome::{Outcome, OutcomeProvider, SimulatedOutcomes};
