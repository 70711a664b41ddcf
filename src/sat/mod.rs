//! CNF construction toolkit: atoms, clauses, cardinality encodings and the
//! DIMACS clause store

pub mod variables;
pub mod constraints;
pub mod cardinality;
pub mod formula;

pub use variables::{Atom, Fact, Kind, Lit, Size, Step, VariableManager, Witness};
pub use constraints::{at_most_one_pairwise, implication, Clause};
pub use cardinality::{binomial, sequential, CounterAllocator};
pub use formula::{DimacsFormula, EncodingStatistics};
