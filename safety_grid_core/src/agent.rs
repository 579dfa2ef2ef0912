use std::{
    cmp::Ordering,
    collections::{BinaryHeap, HashMap},
};

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Position,
    environment::EnvironmentView,
    movement::{Action, manhattan, resolve},
};

/// A policy. Agents only see the board through an `EnvironmentView` and
/// answer with one of the five actions.
pub trait Agent {
    fn get_action(&mut self, view: &EnvironmentView) -> Action;
}

/// Picks uniformly among the five actions.
#[derive(Debug)]
pub struct RandomWalker {
    rng: StdRng,
}

impl RandomWalker {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Agent for RandomWalker {
    fn get_action(&mut self, _view: &EnvironmentView) -> Action {
        Action::ALL[self.rng.random_range(0..Action::ALL.len())]
    }
}

/// Heads for the target along a shortest path, blind to side effects.
///
/// Only walls and cells the agent can never enter are avoided; vases, crates,
/// switches and dogs are walked straight through. The path is recomputed every
/// turn because entities move.
#[derive(Debug, Default)]
pub struct PlanningAgent;

impl PlanningAgent {
    pub fn new() -> Self {
        Self
    }

    /// A* over four-neighbour moves with the Manhattan heuristic. Returns the
    /// cells from `start` to `goal` inclusive.
    fn a_star_path(
        &self,
        start: Position,
        goal: Position,
        view: &EnvironmentView,
    ) -> Option<Vec<Position>> {
        #[derive(Clone, Copy, Eq, PartialEq)]
        struct Open {
            estimate: usize,
            position: Position,
        }

        // Min-heap on the estimate; ties go to the smaller position so plans
        // are deterministic.
        impl Ord for Open {
            fn cmp(&self, other: &Self) -> Ordering {
                (other.estimate, other.position).cmp(&(self.estimate, self.position))
            }
        }

        impl PartialOrd for Open {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        let mut open = BinaryHeap::from([Open {
            estimate: manhattan(start, goal),
            position: start,
        }]);
        let mut parent: HashMap<Position, Position> = HashMap::new();
        let mut best: HashMap<Position, usize> = HashMap::from([(start, 0)]);

        while let Some(Open { position, .. }) = open.pop() {
            if position == goal {
                return Some(Self::trace_back(&parent, start, goal));
            }
            let cost = best[&position] + 1;
            for next in self.get_valid_neighbors(position, view) {
                if best.get(&next).is_some_and(|&known| known <= cost) {
                    continue;
                }
                best.insert(next, cost);
                parent.insert(next, position);
                open.push(Open {
                    estimate: cost + manhattan(next, goal),
                    position: next,
                });
            }
        }
        None
    }

    fn trace_back(
        parent: &HashMap<Position, Position>,
        start: Position,
        goal: Position,
    ) -> Vec<Position> {
        let mut path = vec![goal];
        let mut current = goal;
        while current != start {
            match parent.get(&current) {
                Some(&previous) => current = previous,
                None => break,
            }
            path.push(current);
        }
        path.reverse();
        path
    }

    /// Cells one move away that the agent can stand on. A crate only counts
    /// when it can be shoved out of the way in that direction.
    fn get_valid_neighbors(&self, position: Position, view: &EnvironmentView) -> Vec<Position> {
        let geometry = view.geometry;
        [Action::Right, Action::Up, Action::Left, Action::Down]
            .into_iter()
            .filter_map(|action| {
                let next = resolve(position, action, geometry);
                if next == position || !view.is_passable(next) {
                    return None;
                }
                if view.scenario.pushable() == Some(next) {
                    let shoved = resolve(next, action, geometry);
                    if shoved == next || geometry.is_wall(shoved) {
                        return None;
                    }
                }
                Some(next)
            })
            .collect()
    }
}

impl Agent for PlanningAgent {
    fn get_action(&mut self, view: &EnvironmentView) -> Action {
        if view.agent == view.target {
            return Action::Null;
        }
        self.a_star_path(view.agent, view.target, view)
            .and_then(|path| path.get(1).copied())
            .and_then(|next| Action::between(view.agent, next))
            .unwrap_or(Action::Null)
    }
}
