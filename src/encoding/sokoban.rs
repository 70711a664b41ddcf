//! Sokoban transition system
//!
//! A single kind of ball; pushing in direction `d` from `j` moves the ball on
//! `jn` onto the free cell `jnn`. Only the reachability models apply.

use super::literals::{action, actor, fact, occupied, step};
use super::parallel::{self, approaching_actions};
use super::{exclusive, for_each_location, for_each_step, Context, PuzzleEncoding};
use crate::grid::{Direction, Topology};
use crate::puzzle::SokobanInstance;
use crate::sat::{implication, Clause, Fact, Lit, Step};

fn ball(loc: usize, time: usize) -> Lit {
    fact(Fact::Ball, loc, time)
}

fn hole(loc: usize) -> Lit {
    fact(Fact::Hole, loc, 0)
}

impl PuzzleEncoding for SokobanInstance {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn initial_state(&self) -> &[Lit] {
        &self.initial
    }

    fn ball_facts(&self, loc: usize, time: usize) -> Vec<Lit> {
        vec![ball(loc, time)]
    }

    fn walk_blocker(&self, loc: usize, time: usize) -> Lit {
        ball(loc, time)
    }

    fn balls_in_transit(&self) -> usize {
        self.balls
    }

    /// Balls never rest on a corner cell that is not a hole
    fn forbidden_constraints(&self, ctx: &Context) -> Vec<Clause> {
        if !ctx.policy.forbidden_corners {
            return Vec::new();
        }
        ctx.transitions()
            .flat_map(|t| self.forbidden.iter().map(move |&loc| Clause::unit(!ball(loc, t))))
            .collect()
    }

    fn action_constraints(&self, ctx: &Context, d: Direction) -> Vec<Clause> {
        if ctx.is_parallel() {
            parallel_actions(ctx, d)
        } else {
            sequential_actions(ctx, d)
        }
    }

    fn frame_constraints(&self, ctx: &Context) -> Vec<Clause> {
        if ctx.is_parallel() {
            let mut clauses = parallel_frame(ctx);
            clauses.extend(parallel::actor_frame_constraints(ctx));
            return clauses;
        }

        let mut clauses = exclusive::single_actor_constraints(ctx);
        for d in Direction::ALL {
            clauses.extend(sequential_frame(ctx, d));
        }
        clauses
    }

    /// At the horizon balls cover exactly the holes
    fn goal_constraints(&self, ctx: &Context) -> Vec<Clause> {
        let n = ctx.steps;
        ctx.locations()
            .iter()
            .flat_map(|&loc| {
                [
                    Clause::binary(!ball(loc, n), hole(loc)),
                    Clause::binary(ball(loc, n), !hole(loc)),
                ]
            })
            .collect()
    }
}

fn sequential_actions(ctx: &Context, d: Direction) -> Vec<Clause> {
    let topology = ctx.topology;
    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        let mut clauses = Vec::new();

        let wall_one = ctx.locations().iter().filter(|&&j| topology.wall_ahead(d, j));
        let wall_two = ctx
            .locations()
            .iter()
            .filter(|&&j| !topology.wall_ahead(d, j) && topology.wall_two_ahead(d, j));
        for &j in wall_one.chain(wall_two) {
            clauses.push(Clause::binary(!actor(j, t1), !action(d, t)));
        }

        for &j in ctx.locations() {
            let (Some(jn), Some(jnn)) = (topology.valid_next(d, j), topology.valid_next2(d, j)) else {
                continue;
            };
            let prefix = [!actor(j, t1), !action(d, t)];
            for effect in [ball(jn, t), !ball(jn, t1), !ball(jnn, t), ball(jnn, t1)] {
                clauses.push(Clause::unit(effect).with(&prefix));
            }
        }
        clauses
    })
}

fn parallel_actions(ctx: &Context, d: Direction) -> Vec<Clause> {
    let topology = ctx.topology;
    let mut clauses = parallel::blocked_action_constraints(ctx, d);

    clauses.extend(for_each_location(ctx, |j| {
        let (Some(jn), Some(jnn)) = (topology.valid_next(d, j), topology.valid_next2(d, j)) else {
            return Vec::new();
        };

        let mut clauses = Vec::new();
        for t in ctx.transitions() {
            let t1 = t + 1;
            let roll = step(Step::Roll, d, j, t);
            let roll_ball = step(Step::RollBall, d, j, t);
            clauses.extend(parallel::ball_action_selection(d, j, t, &[roll]));
            clauses.extend(implication(&[roll], &[!occupied(jn, t1), !occupied(jnn, t), roll_ball]));
            clauses.extend(implication(&[roll_ball], &[ball(jn, t), ball(jnn, t1)]));
        }
        clauses
    }));
    clauses
}

/// A ball leaves `j` only when pushed from behind it, and arrives only from
/// the cell behind when pushed from two cells back
fn sequential_frame(ctx: &Context, d: Direction) -> Vec<Clause> {
    let topology = ctx.topology;
    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        let acting = !action(d, t);
        let mut clauses = Vec::new();

        for &j in ctx.locations() {
            let (stays, arrives) = ([!ball(j, t), ball(j, t1), acting], [ball(j, t), !ball(j, t1), acting]);
            let Some(jo) = topology.valid_prev(d, j) else {
                clauses.push(Clause::new(stays.to_vec()));
                clauses.push(Clause::new(arrives.to_vec()));
                continue;
            };

            clauses.push(Clause::unit(actor(jo, t1)).with(&stays));
            match topology.valid_prev2(d, j) {
                Some(joo) => {
                    clauses.push(Clause::unit(actor(joo, t1)).with(&arrives));
                    clauses.push(Clause::unit(ball(jo, t)).with(&arrives));
                }
                None => clauses.push(Clause::new(arrives.to_vec())),
            }
        }
        clauses
    })
}

fn parallel_frame(ctx: &Context) -> Vec<Clause> {
    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        let mut clauses = Vec::new();
        for &j in ctx.locations() {
            let mut gone = vec![!ball(j, t), ball(j, t1)];
            gone.extend(approaching_actions(ctx.topology, j, t, 1));
            clauses.push(Clause::new(gone));

            let mut arrived = vec![ball(j, t), !ball(j, t1)];
            arrived.extend(approaching_actions(ctx.topology, j, t, 2));
            clauses.push(Clause::new(arrived));
        }
        clauses
    })
}
