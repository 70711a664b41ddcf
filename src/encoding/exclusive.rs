//! Clause families of the exclusive action model, shared by both puzzles

use super::literals::{action, actor};
use super::{for_each_step, Context};
use crate::grid::Direction;
use crate::sat::{at_most_one_pairwise, binomial, Clause, Lit};

/// Exactly one global direction at every transition step
pub fn action_selection_constraints(ctx: &Context) -> Vec<Clause> {
    for_each_step(ctx.transitions(), |t| {
        let directions: Vec<Lit> = Direction::ALL.iter().map(|&d| action(d, t)).collect();
        let mut clauses = binomial::at_least(1, &directions);
        clauses.extend(binomial::at_most(1, &directions));
        clauses
    })
}

/// The actor stands on at most one cell at steps 1..=N
pub fn single_actor_constraints(ctx: &Context) -> Vec<Clause> {
    for_each_step(1..ctx.steps + 1, |t| {
        let actors: Vec<Lit> = ctx.locations().iter().map(|&loc| actor(loc, t)).collect();
        at_most_one_pairwise(&actors)
    })
}
