//! Clause families of the parallel action model, shared by both puzzles
//!
//! Direction atoms are located: `d_j_t` means the actor, standing on `j`,
//! acts on a ball in direction `d` during step `t`. Several such actions may
//! happen in one step; the actor relocates between them through `jump`
//! atoms, each licensed by a path witness.

use super::literals::{action_at, actor, global, located};
use super::{for_each_location, for_each_step, Context, PuzzleEncoding};
use crate::grid::{Direction, Topology};
use crate::sat::{implication, Clause, Kind, Lit, Witness};

/// Actions at distance `distance` from `loc` heading towards it
pub fn approaching_actions(topology: &Topology, loc: usize, time: usize, distance: usize) -> Vec<Lit> {
    Direction::ALL
        .iter()
        .filter_map(|&d| {
            let origin = match distance {
                1 => topology.valid_next(d, loc),
                _ => topology.valid_next2(d, loc),
            };
            origin.map(|origin| action_at(d.opposite(), origin, time))
        })
        .collect()
}

/// Mutexes between an action in the first direction of `d.compass()` and the
/// actions that would touch the same ball cells
pub fn incompatibility_constraints(ctx: &Context, d: Direction) -> Vec<Clause> {
    let [ahead, back, right, left] = d.compass();
    let topology = ctx.topology;

    for_each_location(ctx, |loc| {
        let Some(ball) = topology.valid_next(ahead, loc) else {
            return Vec::new();
        };
        let Some(beyond) = topology.valid_next(ahead, ball) else {
            return Vec::new();
        };

        let reach = |d: Direction, from: usize| {
            [topology.valid_next(d, from), topology.valid_next2(d, from)]
        };
        let facing: Vec<usize> = std::iter::once(Some(beyond))
            .chain(reach(ahead, beyond))
            .flatten()
            .collect();
        let on_left: Vec<usize> = reach(left, ball).into_iter().chain(reach(left, beyond)).flatten().collect();
        let on_right: Vec<usize> = reach(right, ball).into_iter().chain(reach(right, beyond)).flatten().collect();

        let mut clauses = Vec::new();
        for t in ctx.transitions() {
            let own = action_at(ahead, loc, t);
            let mutexes = facing
                .iter()
                .map(|&p| (back, p))
                .chain(on_left.iter().map(|&p| (right, p)))
                .chain(on_right.iter().map(|&p| (left, p)));
            for (other, p) in mutexes {
                clauses.push(Clause::binary(!own, !action_at(other, p, t)));
            }
        }
        clauses
    })
}

/// Occupancy atoms: `ball` for steps 0..=N, or the look-ahead `ballbis` for
/// steps 0..N that also holds when a ball is about to roll onto the cell
pub fn occupancy_constraints(encoding: &dyn PuzzleEncoding, ctx: &Context, ahead: bool) -> Vec<Clause> {
    let (kind, last) = if ahead {
        (Kind::OccupiedAhead, ctx.steps)
    } else {
        (Kind::Occupied, ctx.steps + 1)
    };

    for_each_location(ctx, |loc| {
        let mut clauses = Vec::new();
        for t in 0..last {
            let mut reasons = encoding.ball_facts(loc, t);
            if ahead {
                reasons.extend(approaching_actions(ctx.topology, loc, t, 2));
            }
            let occupancy = located(kind, loc, t);
            clauses.extend(implication(&reasons, &[occupancy]));
            reasons.push(!occupancy);
            clauses.push(Clause::new(reasons));
        }
        clauses
    })
}

/// Global jump and ball-action atoms, and the witness each located one needs
pub fn jump_constraints(ctx: &Context, balls: usize) -> Vec<Clause> {
    let mut clauses: Vec<Clause> = ctx
        .transitions()
        .map(|t| Clause::binary(!global(Kind::BallAction, t), !global(Kind::Jump, t)))
        .collect();

    clauses.extend(for_each_location(ctx, |loc| {
        let mut clauses = Vec::new();
        for t in ctx.transitions() {
            let jump = located(Kind::Jump, loc, t);
            clauses.push(Clause::binary(located(Kind::Target(Witness::Jump), loc, t), !jump));

            let mut licensed = vec![!located(Kind::BallAction, loc, t)];
            licensed.extend((1..=balls as u32).map(|n| located(Kind::Target(Witness::BallAction(n)), loc, t)));
            clauses.push(Clause::new(licensed));

            clauses.push(Clause::binary(!jump, global(Kind::Jump, t)));
        }
        clauses
    }));
    clauses
}

/// No action towards a wall one or two cells ahead
pub fn blocked_action_constraints(ctx: &Context, d: Direction) -> Vec<Clause> {
    let topology = ctx.topology;
    let wall_one = ctx.locations().iter().filter(|&&loc| topology.wall_ahead(d, loc));
    let wall_two = ctx
        .locations()
        .iter()
        .filter(|&&loc| !topology.wall_ahead(d, loc) && topology.wall_two_ahead(d, loc));

    wall_one
        .chain(wall_two)
        .flat_map(|&loc| ctx.transitions().map(move |t| Clause::unit(!action_at(d, loc, t))))
        .collect()
}

/// Selection of a located action through its sub-actions, which counts as a
/// ball action both at the cell and globally
pub fn ball_action_selection(d: Direction, loc: usize, t: usize, sub_actions: &[Lit]) -> Vec<Clause> {
    let selected = action_at(d, loc, t);
    let mut clauses = implication(sub_actions, &[selected]);

    let mut some = sub_actions.to_vec();
    some.push(!selected);
    clauses.push(Clause::new(some));

    clauses.push(Clause::binary(!selected, located(Kind::BallAction, loc, t)));
    clauses.push(Clause::binary(!selected, global(Kind::BallAction, t)));
    clauses
}

/// Jumps are pointless from a cell boxed in on every side, and otherwise need
/// a ball next to the destination
pub fn useless_jump_constraints(encoding: &dyn PuzzleEncoding, ctx: &Context) -> Vec<Clause> {
    let topology = ctx.topology;
    for_each_location(ctx, |loc| {
        let boxed_in = !Direction::ALL.iter().any(|&d| topology.is_interior(d, loc));

        ctx.transitions()
            .map(|t| {
                let jump = located(Kind::Jump, loc, t);
                if boxed_in {
                    return Clause::unit(!jump);
                }
                let mut nearby: Vec<Lit> = topology
                    .neighbours(loc)
                    .iter()
                    .flat_map(|&n| encoding.ball_facts(n, t))
                    .collect();
                nearby.push(!jump);
                Clause::new(nearby)
            })
            .collect()
    })
}

/// The actor is on at most one cell, and changes cell only by jumping
pub fn actor_frame_constraints(ctx: &Context) -> Vec<Clause> {
    let locations = ctx.locations();
    for_each_step(1..ctx.steps + 1, |t| {
        let mut clauses = Vec::new();
        for (index, &j) in locations.iter().enumerate() {
            for &k in &locations[index + 1..] {
                clauses.push(Clause::binary(!actor(j, t), !actor(k, t)));
            }
            clauses.push(Clause::new(vec![!actor(j, t), located(Kind::Jump, j, t - 1), actor(j, t - 1)]));
        }
        clauses
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::EncodingPolicy;

    fn open(rows: usize, cols: usize) -> Topology {
        Topology::new(rows, cols, |_| false)
    }

    fn rendered(clauses: &[Clause]) -> Vec<String> {
        clauses.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_approaching_actions() {
        let topology = open(5, 5);
        // Centre cell 13: from north the action heads south, and so on
        let near: Vec<String> = approaching_actions(&topology, 13, 0, 1).iter().map(ToString::to_string).collect();
        assert_eq!(near, vec!["s_8_0", "n_18_0", "w_14_0", "e_12_0"]);

        let far: Vec<String> = approaching_actions(&topology, 13, 0, 2).iter().map(ToString::to_string).collect();
        assert_eq!(far, vec!["s_3_0", "n_23_0", "w_15_0", "e_11_0"]);

        // Corner cell 1 only has southern and eastern cells
        assert_eq!(approaching_actions(&topology, 1, 0, 2).len(), 2);
    }

    #[test]
    fn test_incompatibilities_in_a_corridor() {
        let topology = open(1, 5);
        let ctx = Context { topology: &topology, policy: EncodingPolicy::parallel(), steps: 1 };
        let clauses = rendered(&incompatibility_constraints(&ctx, Direction::East));

        // Pushing east from 1 moves the ball on 2 towards 3
        assert_eq!(
            clauses,
            vec![
                "(!e_1_0 | !w_3_0)",
                "(!e_1_0 | !w_4_0)",
                "(!e_1_0 | !w_5_0)",
                "(!e_2_0 | !w_4_0)",
                "(!e_2_0 | !w_5_0)",
                "(!e_3_0 | !w_5_0)",
            ]
        );
    }

    #[test]
    fn test_blocked_actions() {
        let topology = open(1, 4);
        let ctx = Context { topology: &topology, policy: EncodingPolicy::parallel(), steps: 2 };
        let clauses = rendered(&blocked_action_constraints(&ctx, Direction::East));

        // Cell 4 faces the border, cell 3 has it two cells ahead
        assert_eq!(clauses, vec!["(!e_4_0)", "(!e_4_1)", "(!e_3_0)", "(!e_3_1)"]);
    }

    #[test]
    fn test_jump_bookkeeping() {
        let topology = open(1, 2);
        let ctx = Context { topology: &topology, policy: EncodingPolicy::parallel(), steps: 1 };
        let clauses = rendered(&jump_constraints(&ctx, 2));

        assert_eq!(
            clauses,
            vec![
                "(!baction_0 | !jump_0)",
                "(jump_pos_1_0 | !jump_1_0)",
                "(!baction_1_0 | baction_pos_1_1_0 | baction_pos_2_1_0)",
                "(!jump_1_0 | jump_0)",
                "(jump_pos_2_0 | !jump_2_0)",
                "(!baction_2_0 | baction_pos_1_2_0 | baction_pos_2_2_0)",
                "(!jump_2_0 | jump_0)",
            ]
        );
    }

    #[test]
    fn test_ball_action_selection() {
        let roll = crate::encoding::literals::step(crate::sat::Step::Roll, Direction::North, 9, 0);
        let clauses = rendered(&ball_action_selection(Direction::North, 9, 0, &[roll]));
        assert_eq!(
            clauses,
            vec![
                "(!roll_n_9_0 | n_9_0)",
                "(roll_n_9_0 | !n_9_0)",
                "(!n_9_0 | baction_9_0)",
                "(!n_9_0 | baction_0)",
            ]
        );
    }

    #[test]
    fn test_useless_jumps() {
        let grid = "#####\n#@$.#\n#####\n";
        let board = crate::grid::parse_board_from_string(grid, crate::PuzzleKind::Sokoban).unwrap();
        let sokoban = crate::puzzle::SokobanInstance::from_board(board).unwrap();
        let ctx = Context { topology: &sokoban.topology, policy: EncodingPolicy::parallel(), steps: 1 };
        let clauses = rendered(&useless_jump_constraints(&sokoban, &ctx));

        // Cell 8 has a wall two cells ahead in both open directions
        assert_eq!(
            clauses,
            vec!["(#b_8_0 | !jump_7_0)", "(!jump_8_0)", "(#b_8_0 | !jump_9_0)"]
        );
    }

    #[test]
    fn test_actor_frame() {
        let topology = open(1, 2);
        let ctx = Context { topology: &topology, policy: EncodingPolicy::parallel(), steps: 1 };
        let clauses = rendered(&actor_frame_constraints(&ctx));
        assert_eq!(
            clauses,
            vec![
                "(!#c_1_1 | !#c_2_1)",
                "(!#c_1_1 | jump_1_0 | #c_1_0)",
                "(!#c_2_1 | jump_2_0 | #c_2_0)",
            ]
        );
    }
}
