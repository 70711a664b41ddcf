//! Reachability as a path of marked cells
//!
//! A set of path atoms describes a simple route when every endpoint has
//! exactly one marked neighbour and every other marked cell exactly two.
//! Neighbour lists hold at most four cells, so the binomial encodings are used
//! for them.

use super::literals::{actor, located};
use super::{for_each_location, Context, PuzzleEncoding};
use crate::sat::{binomial, sequential, Clause, CounterAllocator, Kind, Lit, Witness};

/// Clauses `prefix | s` for every `s` in `succedents`
fn guarded(prefix: &[Lit], succedents: &[Clause]) -> Vec<Clause> {
    succedents.iter().map(|succedent| succedent.with(prefix)).collect()
}

/// Exclusive model: the actor walks from its cell at `t` to its cell at `t+1`
/// along the path atoms of step `t+1`, which must avoid balls present at `t`.
pub fn walk_constraints(encoding: &dyn PuzzleEncoding, ctx: &Context) -> Vec<Clause> {
    for_each_location(ctx, |loc| {
        let neighbours = ctx.topology.neighbours(loc);
        let mut clauses = Vec::new();

        for t in ctx.transitions() {
            let t1 = t + 1;
            let path = |l| located(Kind::Path(Witness::Walk), l, t1);
            clauses.push(Clause::binary(!encoding.walk_blocker(loc, t), !path(loc)));
            clauses.push(Clause::binary(!actor(loc, t), path(loc)));
            clauses.push(Clause::binary(!actor(loc, t1), path(loc)));

            let marked: Vec<Lit> = neighbours.iter().map(|&n| path(n)).collect();

            // Endpoints: the actor leaves or reaches the cell
            let leaves = [!actor(loc, t), actor(loc, t1)];
            let reaches = [actor(loc, t), !actor(loc, t1)];
            let mut one = binomial::at_least(1, &marked);
            one.extend(binomial::at_most(1, &marked));
            for succedent in &one {
                clauses.push(succedent.with(&leaves));
                clauses.push(succedent.with(&reaches));
            }

            // Interior cells of the walk
            let interior = [actor(loc, t), actor(loc, t1), !path(loc)];
            let mut two = binomial::at_least(2, &marked);
            two.extend(binomial::at_most(2, &marked));
            clauses.extend(guarded(&interior, &two));
        }
        clauses
    })
}

/// Parallel model: one witness licensing actor jumps, then one per ball that
/// may be acted on within a step.
pub fn witness_constraints(ctx: &Context, balls: usize, counters: &mut CounterAllocator) -> Vec<Clause> {
    let mut clauses = witness(ctx, Witness::Jump, counters);
    for n in 1..=balls as u32 {
        clauses.extend(witness(ctx, Witness::BallAction(n), counters));
    }
    clauses
}

/// A path from the actor's cell to a single target cell, at every step.
///
/// The jump witness avoids current balls; ball-action witnesses also avoid
/// cells a ball is about to roll onto.
fn witness(ctx: &Context, witness: Witness, counters: &mut CounterAllocator) -> Vec<Clause> {
    let blocked = match witness {
        Witness::BallAction(_) => Kind::OccupiedAhead,
        _ => Kind::Occupied,
    };
    let target = |l, t| located(Kind::Target(witness), l, t);
    let path = |l, t| located(Kind::Path(witness), l, t);

    let mut clauses = Vec::new();
    for t in ctx.transitions() {
        let targets: Vec<Lit> = ctx.locations().iter().map(|&l| target(l, t)).collect();
        clauses.extend(sequential::exactly(1, &targets, t, counters));
    }

    clauses.extend(for_each_location(ctx, |loc| {
        let neighbours = ctx.topology.neighbours(loc);
        let mut clauses = Vec::new();

        for t in ctx.transitions() {
            clauses.push(Clause::binary(!located(blocked, loc, t), !path(loc, t)));
            clauses.push(Clause::binary(!actor(loc, t), path(loc, t)));
            clauses.push(Clause::binary(!target(loc, t), path(loc, t)));

            let marked: Vec<Lit> = neighbours.iter().map(|&n| path(n, t)).collect();
            for succedent in &binomial::exactly(1, &marked) {
                clauses.push(succedent.with(&[!actor(loc, t), target(loc, t)]));
                clauses.push(succedent.with(&[actor(loc, t), !target(loc, t)]));
            }

            let interior = [actor(loc, t), target(loc, t), !path(loc, t)];
            clauses.extend(guarded(&interior, &binomial::exactly(2, &marked)));
        }
        clauses
    }));
    clauses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::EncodingPolicy;
    use crate::grid::{parse_board_from_string, Topology};
    use crate::puzzle::{PuzzleKind, SokobanInstance};

    fn corridor() -> SokobanInstance {
        let board = parse_board_from_string("#####\n#@$.#\n#####\n", PuzzleKind::Sokoban).unwrap();
        SokobanInstance::from_board(board).unwrap()
    }

    #[test]
    fn test_walk_around_a_dead_end() {
        let sokoban = corridor();
        let ctx = Context { topology: &sokoban.topology, policy: EncodingPolicy::sequential(), steps: 1 };
        let clauses = walk_constraints(&sokoban, &ctx);

        // Cell 7 has the single neighbour 8
        let first: Vec<String> = clauses.iter().take(8).map(ToString::to_string).collect();
        assert_eq!(
            first,
            vec![
                "(!#b_7_0 | !p_7_1)",
                "(!#c_7_0 | p_7_1)",
                "(!#c_7_1 | p_7_1)",
                "(!#c_7_0 | #c_7_1 | p_8_1)",
                "(#c_7_0 | !#c_7_1 | p_8_1)",
                // No second neighbour: a walk cannot pass through
                "(#c_7_0 | #c_7_1 | !p_7_1)",
                "(!#b_8_0 | !p_8_1)",
                "(!#c_8_0 | p_8_1)",
            ]
        );
    }

    #[test]
    fn test_walk_through_a_corridor_cell() {
        let sokoban = corridor();
        let ctx = Context { topology: &sokoban.topology, policy: EncodingPolicy::sequential(), steps: 1 };
        let clauses = walk_constraints(&sokoban, &ctx);
        let rendered: Vec<String> = clauses.iter().map(ToString::to_string).collect();

        // Cell 8 has neighbours 7 and 9: at least one and at most one when an endpoint
        assert!(rendered.contains(&"(!#c_8_0 | #c_8_1 | p_9_1 | p_7_1)".to_string()));
        assert!(rendered.contains(&"(#c_8_0 | !#c_8_1 | !p_9_1 | !p_7_1)".to_string()));
        // Both when interior
        assert!(rendered.contains(&"(#c_8_0 | #c_8_1 | !p_8_1 | p_9_1)".to_string()));
        assert!(rendered.contains(&"(#c_8_0 | #c_8_1 | !p_8_1 | p_7_1)".to_string()));
    }

    #[test]
    fn test_witness_families() {
        let topology = Topology::new(1, 3, |_| false);
        let ctx = Context { topology: &topology, policy: EncodingPolicy::parallel(), steps: 2 };
        let mut counters = CounterAllocator::new();
        let clauses = witness_constraints(&ctx, 2, &mut counters);

        // Exactly-one targets issue two counters per witness and step
        assert_eq!(counters.issued(), 3 * 2 * 2);

        let rendered: Vec<String> = clauses.iter().map(ToString::to_string).collect();
        assert!(rendered.contains(&"(!ball_1_0 | !p_1_0)".to_string()));
        assert!(rendered.contains(&"(!ballbis_2_1 | !pbis_2_2_1)".to_string()));
        assert!(rendered.contains(&"(!baction_pos_1_3_0 | pbis_1_3_0)".to_string()));
        assert!(rendered.contains(&"(jump_pos_1_0 | jump_pos_2_0 | jump_pos_3_0)".to_string()));
    }
}
