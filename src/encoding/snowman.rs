//! Snowman transition system
//!
//! Balls come in three sizes and stack on a cell. An action in direction `d`
//! from `j` involves the cell `jn` next to the actor and the cell `jnn`
//! beyond it:
//! - push: the small (or medium) ball on `jn` is stacked onto a larger one on `jnn`
//! - roll: the single ball on `jn` rolls to an empty `jnn`, growing on snow
//! - pop: the top ball of the stack on `jn` drops onto an empty `jnn`
//!
//! In the exclusive model the step that moves a ball also fixes the actor's
//! cell at `t+1`; stepwise translations additionally have a plain `move`.

use super::literals::{action, actor, ball, located, occupied, snow, step};
use super::parallel::{self, approaching_actions};
use super::{exclusive, for_each_location, for_each_step, Context, PuzzleEncoding};
use crate::grid::{Direction, Topology};
use crate::puzzle::SnowmanInstance;
use crate::sat::{implication, sequential, Clause, CounterAllocator, Kind, Lit, Size, Step};

fn small(loc: usize, time: usize) -> Lit {
    ball(Size::Small, loc, time)
}

fn medium(loc: usize, time: usize) -> Lit {
    ball(Size::Medium, loc, time)
}

fn large(loc: usize, time: usize) -> Lit {
    ball(Size::Large, loc, time)
}

fn medium_or_large(loc: usize, time: usize) -> Lit {
    located(Kind::MediumOrLarge, loc, time)
}

fn grow(size: Size, loc: usize, time: usize) -> Lit {
    located(Kind::Grow(size), loc, time)
}

fn stay(size: Size, loc: usize, time: usize) -> Lit {
    located(Kind::Stay(size), loc, time)
}

fn emerge(size: Size, d: Direction, loc: usize, time: usize) -> Lit {
    located(Kind::Emerge(size, d), loc, time)
}

fn clause<const N: usize>(literals: [Lit; N]) -> Clause {
    Clause::new(literals.to_vec())
}

impl PuzzleEncoding for SnowmanInstance {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn initial_state(&self) -> &[Lit] {
        &self.initial
    }

    fn ball_facts(&self, loc: usize, time: usize) -> Vec<Lit> {
        vec![small(loc, time), medium(loc, time), large(loc, time)]
    }

    fn walk_blocker(&self, loc: usize, time: usize) -> Lit {
        occupied(loc, time)
    }

    fn balls_in_transit(&self) -> usize {
        self.balls
    }

    fn auxiliary_constraints(&self, ctx: &Context) -> Vec<Clause> {
        if ctx.is_parallel() {
            parallel_auxiliary(ctx)
        } else {
            exclusive_auxiliary(ctx)
        }
    }

    fn action_constraints(&self, ctx: &Context, d: Direction) -> Vec<Clause> {
        if ctx.is_parallel() {
            parallel_actions(ctx, d)
        } else {
            exclusive_actions(ctx, d)
        }
    }

    fn frame_constraints(&self, ctx: &Context) -> Vec<Clause> {
        if ctx.is_parallel() {
            let mut clauses = parallel_frame(ctx);
            clauses.extend(parallel::actor_frame_constraints(ctx));
            return clauses;
        }

        let mut clauses = terrain_frame(ctx);
        if !ctx.is_stepwise() {
            clauses.extend(exclusive::single_actor_constraints(ctx));
        }
        for d in Direction::ALL {
            clauses.extend(directional_frame(ctx, d));
        }
        clauses
    }

    /// Ball counts at the intermediate steps: enough small balls and not too
    /// many large ones left for the snowmen still to build
    fn invariant_constraints(&self, ctx: &Context, counters: &mut CounterAllocator) -> Vec<Clause> {
        let snowmen = self.snowmen;
        let family = |size: Size, t: usize| -> Vec<Lit> {
            ctx.locations().iter().map(|&loc| ball(size, loc, t)).collect()
        };

        let mut clauses = Vec::new();
        for t in 1..ctx.steps {
            clauses.extend(sequential::at_most(snowmen, &family(Size::Large, t), t, counters));
            if ctx.policy.helper_clauses {
                clauses.extend(sequential::at_most(2 * snowmen, &family(Size::Medium, t), t, counters));
            }
            clauses.extend(sequential::at_least(snowmen, &family(Size::Small, t), t, counters));
        }
        clauses
    }

    /// Every cell ends with a complete snowman or no ball at all
    fn goal_constraints(&self, ctx: &Context) -> Vec<Clause> {
        let n = ctx.steps;
        ctx.locations()
            .iter()
            .flat_map(|&loc| {
                [
                    Clause::binary(!small(loc, n), medium(loc, n)),
                    Clause::binary(small(loc, n), !medium(loc, n)),
                    Clause::binary(!medium(loc, n), large(loc, n)),
                    Clause::binary(medium(loc, n), !large(loc, n)),
                ]
            })
            .collect()
    }
}

/// `ball`, `ball_m_l` and growth of a rolled ball, exclusive model
fn exclusive_auxiliary(ctx: &Context) -> Vec<Clause> {
    let helpers = ctx.policy.helper_clauses;
    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        let mut clauses = Vec::new();
        for &j in ctx.locations() {
            let sizes = [small(j, t), medium(j, t), large(j, t)];
            clauses.push(clause([!occupied(j, t), sizes[0], sizes[1], sizes[2]]));
            clauses.extend(implication(&sizes, &[occupied(j, t)]));

            let bml = medium_or_large(j, t);
            clauses.push(clause([!bml, medium(j, t), large(j, t)]));
            if helpers {
                clauses.extend(implication(&[medium(j, t), large(j, t)], &[bml]));
            }

            let (gs, gm, s) = (grow(Size::Small, j, t), grow(Size::Medium, j, t), snow(j, t));
            clauses.push(clause([!gs, s, small(j, t1)]));
            clauses.push(clause([!gs, !s, medium(j, t1)]));
            clauses.push(clause([!gm, s, medium(j, t1)]));
            clauses.push(clause([!gm, !s, large(j, t1)]));
        }
        clauses
    })
}

/// `ball_m_l`, sizes that stay put and growth of a rolled ball, parallel model
///
/// Growth also pins the sizes not involved, since several balls may change
/// within one step.
fn parallel_auxiliary(ctx: &Context) -> Vec<Clause> {
    let helpers = ctx.policy.helper_clauses;
    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        let mut clauses = Vec::new();
        for &j in ctx.locations() {
            let bml = medium_or_large(j, t);
            if helpers {
                clauses.extend(implication(&[medium(j, t), large(j, t)], &[bml]));
            }
            clauses.push(clause([medium(j, t), large(j, t), !bml]));

            for size in [Size::Medium, Size::Large] {
                let kept = stay(size, j, t);
                clauses.push(clause([!kept, !ball(size, j, t), ball(size, j, t1)]));
                clauses.push(clause([!kept, !ball(size, j, t1), ball(size, j, t)]));
            }

            let s = snow(j, t);
            let (bs1, bm1, bl1) = (small(j, t1), medium(j, t1), large(j, t1));
            let gs = grow(Size::Small, j, t);
            clauses.push(clause([!gs, s, bs1]));
            clauses.push(clause([!gs, s, !bm1]));
            clauses.push(clause([!gs, s, !bl1]));
            clauses.push(clause([!gs, !s, !bs1]));
            clauses.push(clause([!gs, !s, bm1]));
            clauses.push(clause([!gs, !s, !bl1]));

            let gm = grow(Size::Medium, j, t);
            clauses.push(clause([!gm, s, !bs1]));
            clauses.push(clause([!gm, s, bm1]));
            clauses.push(clause([!gm, s, !bl1]));
            clauses.push(clause([!gm, !s, !bs1]));
            clauses.push(clause([!gm, !s, !bm1]));
            clauses.push(clause([!gm, !s, bl1]));
        }
        clauses
    })
}

fn exclusive_actions(ctx: &Context, d: Direction) -> Vec<Clause> {
    let topology = ctx.topology;
    let stepwise = ctx.is_stepwise();

    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        // Stepwise rules constrain the actor's cell before the step, the
        // others the cell it acts from, reached at t+1
        let from = if stepwise { t } else { t1 };
        let mut clauses = Vec::new();

        if stepwise {
            for &j in ctx.locations() {
                let Some(jn) = topology.valid_next(d, j) else {
                    continue;
                };
                let moved = step(Step::MoveActor, d, j, t);
                clauses.extend(implication(&[moved], &[!actor(j, t1), actor(jn, t1)]));
                if ctx.policy.helper_clauses {
                    clauses.push(clause([actor(j, t1), !actor(jn, t1), moved]));
                }
            }
        }

        for &j in ctx.locations() {
            if topology.wall_ahead(d, j) {
                clauses.push(Clause::binary(!actor(j, from), !action(d, t)));
            }
        }
        for &j in ctx.locations() {
            if topology.wall_ahead(d, j) || !topology.wall_two_ahead(d, j) {
                continue;
            }
            match (stepwise, topology.valid_next(d, j)) {
                (true, Some(jn)) => {
                    let prefix = [!actor(j, t), !action(d, t)];
                    for lit in [!actor(j, t1), actor(jn, t1), !small(jn, t), !medium(jn, t), !large(jn, t)] {
                        clauses.push(Clause::unit(lit).with(&prefix));
                    }
                }
                _ => clauses.push(Clause::binary(!actor(j, from), !action(d, t))),
            }
        }

        for &j in ctx.locations() {
            let (Some(jn), Some(jnn)) = (topology.valid_next(d, j), topology.valid_next2(d, j)) else {
                continue;
            };
            clauses.extend(exclusive_ball_moves(d, j, jn, jnn, t, stepwise));
        }
        clauses
    })
}

/// Sub-actions of an exclusive step from the interior cell `j`
fn exclusive_ball_moves(d: Direction, j: usize, jn: usize, jnn: usize, t: usize, stepwise: bool) -> Vec<Clause> {
    let t1 = t + 1;
    let sub = |s: Step| step(s, d, j, t);
    let (push, roll, pop) = (sub(Step::Push), sub(Step::Roll), sub(Step::Pop));
    let moved = sub(Step::MoveActor);
    let mut clauses = Vec::new();

    if stepwise {
        let walk = sub(Step::Move);
        clauses.push(clause([!actor(j, t), !action(d, t), walk, push, roll, pop]));
        clauses.extend(implication(&[walk], &[moved, !occupied(jn, t)]));
        clauses.push(Clause::binary(!push, moved));
    } else {
        clauses.push(clause([!actor(j, t1), !action(d, t), push, roll, pop]));
    }

    let (push_s, push_m) = (sub(Step::PushSmall), sub(Step::PushMedium));
    clauses.push(clause([!push, push_s, push_m]));
    clauses.extend(implication(
        &[push_s],
        &[
            small(jn, t),
            !medium(jn, t),
            !large(jn, t),
            !small(jnn, t),
            medium_or_large(jnn, t),
            !small(jn, t1),
            small(jnn, t1),
        ],
    ));
    clauses.extend(implication(
        &[push_m],
        &[
            !small(jn, t),
            medium(jn, t),
            !large(jn, t),
            !small(jnn, t),
            !medium(jnn, t),
            large(jnn, t),
            !medium(jn, t1),
            medium(jnn, t1),
        ],
    ));

    let roll_ball = sub(Step::RollBall);
    let mut rolled = if stepwise { vec![moved] } else { Vec::new() };
    rolled.extend([!occupied(jnn, t), !snow(jnn, t1), roll_ball]);
    clauses.extend(implication(&[roll], &rolled));
    let (roll_s, roll_m, roll_l) = (sub(Step::RollSmall), sub(Step::RollMedium), sub(Step::RollLarge));
    clauses.push(clause([!roll_ball, roll_s, roll_m, roll_l]));
    clauses.extend(implication(
        &[roll_s],
        &[small(jn, t), !medium(jn, t), !large(jn, t), !small(jn, t1), grow(Size::Small, jnn, t)],
    ));
    clauses.extend(implication(
        &[roll_m],
        &[!small(jn, t), medium(jn, t), !large(jn, t), !medium(jn, t1), grow(Size::Medium, jnn, t)],
    ));
    clauses.extend(implication(
        &[roll_l],
        &[!small(jn, t), !medium(jn, t), large(jn, t), !large(jn, t1), large(jnn, t1)],
    ));

    let pop_ball = sub(Step::PopBall);
    let mut popped = if stepwise { vec![actor(j, t1)] } else { Vec::new() };
    popped.extend([!occupied(jnn, t), !snow(jnn, t1), pop_ball]);
    clauses.extend(implication(&[pop], &popped));
    let (pop_s, pop_m) = (sub(Step::PopSmall), sub(Step::PopMedium));
    clauses.push(clause([!pop_ball, pop_s, pop_m]));
    clauses.extend(implication(
        &[pop_s],
        &[small(jn, t), medium_or_large(jn, t), !small(jn, t1), grow(Size::Small, jnn, t)],
    ));
    clauses.extend(implication(
        &[pop_m],
        &[!small(jn, t), medium(jn, t), large(jn, t), !medium(jn, t1), grow(Size::Medium, jnn, t)],
    ));
    clauses
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
            let sub = |s: Step| step(s, d, j, t);
            let (push, roll, pop) = (sub(Step::Push), sub(Step::Roll), sub(Step::Pop));
            clauses.extend(parallel::ball_action_selection(d, j, t, &[push, roll, pop]));

            let push_ball = sub(Step::PushBall);
            clauses.extend(implication(&[push], &[!occupied(jn, t1), push_ball]));
            let (push_s, push_m) = (sub(Step::PushSmall), sub(Step::PushMedium));
            clauses.push(clause([!push_ball, push_s, push_m]));
            clauses.extend(implication(
                &[push_s],
                &[
                    small(jn, t),
                    !medium(jn, t),
                    !large(jn, t),
                    !small(jnn, t),
                    medium_or_large(jnn, t),
                    small(jnn, t1),
                    stay(Size::Medium, jnn, t),
                    stay(Size::Large, jnn, t),
                ],
            ));
            clauses.extend(implication(
                &[push_m],
                &[
                    !small(jn, t),
                    medium(jn, t),
                    !large(jn, t),
                    !small(jnn, t),
                    !medium(jnn, t),
                    large(jnn, t),
                    !small(jnn, t1),
                    medium(jnn, t1),
                    large(jnn, t1),
                ],
            ));

            let roll_ball = sub(Step::RollBall);
            clauses.extend(implication(
                &[roll],
                &[!occupied(jn, t1), !occupied(jnn, t), !snow(jnn, t1), roll_ball],
            ));
            let (roll_s, roll_m, roll_l) = (sub(Step::RollSmall), sub(Step::RollMedium), sub(Step::RollLarge));
            clauses.push(clause([!roll_ball, roll_s, roll_m, roll_l]));
            clauses.extend(implication(
                &[roll_s],
                &[small(jn, t), !medium(jn, t), !large(jn, t), grow(Size::Small, jnn, t)],
            ));
            clauses.extend(implication(
                &[roll_m],
                &[!small(jn, t), medium(jn, t), !large(jn, t), grow(Size::Medium, jnn, t)],
            ));
            clauses.extend(implication(
                &[roll_l],
                &[
                    !small(jn, t),
                    !medium(jn, t),
                    large(jn, t),
                    !small(jnn, t1),
                    !medium(jnn, t1),
                    large(jnn, t1),
                ],
            ));

            let pop_ball = sub(Step::PopBall);
            clauses.extend(implication(&[pop], &[!occupied(jnn, t), !snow(jnn, t1), pop_ball]));
            let (pop_s, pop_m) = (sub(Step::PopSmall), sub(Step::PopMedium));
            clauses.push(clause([!pop_ball, pop_s, pop_m]));
            clauses.extend(implication(
                &[pop_s],
                &[
                    small(jn, t),
                    medium_or_large(jn, t),
                    stay(Size::Medium, jn, t),
                    stay(Size::Large, jn, t),
                    !small(jn, t1),
                    grow(Size::Small, jnn, t),
                ],
            ));
            clauses.extend(implication(
                &[pop_m],
                &[
                    !small(jn, t),
                    medium(jn, t),
                    large(jn, t),
                    !small(jn, t1),
                    !medium(jn, t1),
                    large(jn, t1),
                    grow(Size::Medium, jnn, t),
                ],
            ));
        }
        clauses
    }));
    clauses
}

/// Snow only melts under a ball, and a stack changes at most one size at a time
fn terrain_frame(ctx: &Context) -> Vec<Clause> {
    for_each_step(ctx.transitions(), |t| {
        let mut clauses = Vec::new();
        for &j in ctx.locations() {
            clauses.extend(snow_frame(j, t));
            clauses.extend(single_change(j, t));
        }
        clauses
    })
}

fn snow_frame(j: usize, t: usize) -> [Clause; 2] {
    let t1 = t + 1;
    [
        Clause::binary(snow(j, t), !snow(j, t1)),
        clause([!snow(j, t), snow(j, t1), small(j, t1), medium(j, t1), large(j, t1)]),
    ]
}

/// No two sizes appear on a cell within one step
fn single_change(j: usize, t: usize) -> [Clause; 3] {
    let t1 = t + 1;
    let appears = |size: Size| [ball(size, j, t), !ball(size, j, t1)];
    let [s, m, l] = [appears(Size::Small), appears(Size::Medium), appears(Size::Large)];
    [
        clause([s[0], s[1], m[0], m[1]]),
        clause([s[0], s[1], l[0], l[1]]),
        clause([m[0], m[1], l[0], l[1]]),
    ]
}

/// Changes explained by the global action in direction `d`
fn directional_frame(ctx: &Context, d: Direction) -> Vec<Clause> {
    let topology = ctx.topology;
    let stepwise = ctx.is_stepwise();

    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        let from = if stepwise { t } else { t1 };
        let acting = !action(d, t);
        let mut clauses = Vec::new();

        for &j in ctx.locations() {
            let behind = topology.valid_prev(d, j);
            let (em, el) = (emerge(Size::Medium, d, j, t), emerge(Size::Large, d, j, t));

            // A medium or large ball can only appear on `j` by being pushed
            // or by growing from the smaller one rolled in from `behind`
            if let Some(jo) = behind {
                clauses.push(clause([!em, small(jo, t), medium(jo, t)]));
                clauses.push(clause([!em, small(jo, t), !snow(j, t)]));
                clauses.push(clause([!em, !small(jo, t), snow(j, t)]));
                clauses.push(clause([!el, medium(jo, t), !small(jo, t)]));
                clauses.push(clause([!el, medium(jo, t), large(jo, t)]));
                clauses.push(clause([!el, !medium(jo, t), !small(jo, t)]));
                clauses.push(clause([!el, !medium(jo, t), snow(j, t)]));
            }

            if stepwise {
                let left = match topology.valid_next(d, j) {
                    Some(jn) => clause([!actor(j, t), actor(j, t1), acting, actor(jn, t1)]),
                    None => clause([!actor(j, t), actor(j, t1), acting]),
                };
                clauses.push(left);
            }

            let disappears = |size: Size| [!ball(size, j, t), ball(size, j, t1)];
            let appears = |size: Size| [ball(size, j, t), !ball(size, j, t1)];
            let [ds, dm, dl] = [disappears(Size::Small), disappears(Size::Medium), disappears(Size::Large)];
            let [as_, am, al] = [appears(Size::Small), appears(Size::Medium), appears(Size::Large)];

            let Some(jo) = behind else {
                if stepwise {
                    clauses.push(clause([actor(j, t), !actor(j, t1), acting]));
                }
                for [a, b] in [ds, dm, dl, as_, am, al] {
                    clauses.push(clause([a, b, acting]));
                }
                continue;
            };

            if stepwise {
                clauses.push(clause([actor(j, t), !actor(j, t1), acting, actor(jo, t)]));
            }
            let pusher = actor(jo, from);
            clauses.push(clause([ds[0], ds[1], acting, pusher]));
            clauses.push(clause([dm[0], dm[1], acting, pusher]));
            clauses.push(clause([dm[0], dm[1], acting, !small(j, t)]));
            clauses.push(clause([dl[0], dl[1], acting, pusher]));
            clauses.push(clause([dl[0], dl[1], acting, !small(j, t)]));
            clauses.push(clause([dl[0], dl[1], acting, !medium(j, t)]));

            match topology.valid_prev2(d, j) {
                Some(joo) => {
                    let pusher = actor(joo, from);
                    clauses.push(clause([as_[0], as_[1], acting, pusher]));
                    clauses.push(clause([as_[0], as_[1], acting, small(jo, t)]));
                    clauses.push(clause([am[0], am[1], acting, pusher]));
                    clauses.push(clause([am[0], am[1], acting, em]));
                    clauses.push(clause([al[0], al[1], acting, pusher]));
                    clauses.push(clause([al[0], al[1], acting, el]));
                }
                None => {
                    for [a, b] in [as_, am, al] {
                        clauses.push(clause([a, b, acting]));
                    }
                }
            }
        }
        clauses
    })
}

/// A ball size changes only with an action towards the cell: disappearing
/// needs an actor next to it, appearing one two cells away
fn parallel_frame(ctx: &Context) -> Vec<Clause> {
    for_each_step(ctx.transitions(), |t| {
        let t1 = t + 1;
        let mut clauses = Vec::new();
        for &j in ctx.locations() {
            clauses.extend(snow_frame(j, t));

            let near = approaching_actions(ctx.topology, j, t, 1);
            let far = approaching_actions(ctx.topology, j, t, 2);
            for size in Size::ALL {
                let mut gone = vec![!ball(size, j, t), ball(size, j, t1)];
                gone.extend_from_slice(&near);
                clauses.push(Clause::new(gone));
            }
            for size in Size::ALL {
                let mut arrived = vec![ball(size, j, t), !ball(size, j, t1)];
                arrived.extend_from_slice(&far);
                clauses.push(Clause::new(arrived));
            }

            clauses.extend(single_change(j, t));
        }
        clauses
    })
}
