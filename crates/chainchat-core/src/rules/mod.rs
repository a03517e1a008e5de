//! Account-state rules checked after every transition

pub mod invariants;
