//! This module implements the best-first search underneath [GridAstar](crate::GridAstar). It is
//! a variant of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html)
//! with a closed set: a node is closed the first time it is popped and never expanded again.
//! Cheaper routes to a closed node found later only patch its record in place.
use fxhash::FxBuildHasher;
use indexmap::IndexMap;
use num_traits::Float;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

use log::{debug, warn};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use std::hash::Hash;

/// Selects how frontier entries are prioritized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HeuristicMode {
    /// Cost so far plus the heuristic, i.e. classic A*.
    #[default]
    Optimal,
    /// The heuristic alone. Tends to reach the goal with fewer expansions, but the path found is
    /// not necessarily the shortest.
    SpeedPrior,
}

impl HeuristicMode {
    pub fn priority<C: Float>(self, remaining: C, cost: C) -> C {
        match self {
            HeuristicMode::Optimal => remaining + cost,
            HeuristicMode::SpeedPrior => remaining,
        }
    }
}

impl From<bool> for HeuristicMode {
    fn from(speed_prior: bool) -> HeuristicMode {
        if speed_prior {
            HeuristicMode::SpeedPrior
        } else {
            HeuristicMode::Optimal
        }
    }
}

/// NaN sorts after every number so a broken cost can never jump the queue.
fn cmp_cost<C: Float>(a: &C, b: &C) -> Ordering {
    a.partial_cmp(b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

struct FrontierEntry<N, C> {
    priority: C,
    cost: C,
    node: N,
    parent: Option<N>,
}

impl<N: Ord, C: Float> FrontierEntry<N, C> {
    /// Ascending order: priority, then cost so far, then node, then parent (no parent first).
    fn ascending_cmp(&self, other: &Self) -> Ordering {
        cmp_cost(&self.priority, &other.priority)
            .then_with(|| cmp_cost(&self.cost, &other.cost))
            .then_with(|| self.node.cmp(&other.node))
            .then_with(|| self.parent.cmp(&other.parent))
    }
}

impl<N: Ord, C: Float> Eq for FrontierEntry<N, C> {}

impl<N: Ord, C: Float> PartialEq for FrontierEntry<N, C> {
    fn eq(&self, other: &Self) -> bool {
        self.ascending_cmp(other) == Ordering::Equal
    }
}

impl<N: Ord, C: Float> PartialOrd for FrontierEntry<N, C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N: Ord, C: Float> Ord for FrontierEntry<N, C> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap pops the greatest entry, so the smallest key has to compare greatest
        other.ascending_cmp(self)
    }
}

/// A node as it was closed: its parent and cost at that moment.
#[derive(Clone, Debug, PartialEq)]
pub struct Expansion<N, C> {
    pub node: N,
    pub parent: Option<N>,
    pub cost: C,
}

/// Outcome of a successful search.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchTrace<N, C> {
    /// Nodes from the start to the goal.
    pub path: Vec<N>,
    /// Cost of the goal when it was closed.
    pub cost: C,
    /// Every closed node in the order it was closed, starting with the start node and ending with
    /// the goal.
    pub expansions: Vec<Expansion<N, C>>,
}

fn reverse_path<N, C>(parents: &FxIndexMap<N, (Option<usize>, C)>, goal: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut path: Vec<N> = std::iter::successors(parents.get_index(goal), |(_, (parent, _))| {
        parent.and_then(|ix| parents.get_index(ix))
    })
    .map(|(node, _)| node.clone())
    .collect();
    path.reverse();
    path
}

/// Runs a best-first search from `start` until `success` holds for a closed node.
///
/// `successors` yields the neighbours of a node together with the cost of moving there; an error
/// it returns aborts the search and is handed back to the caller. `heuristic` estimates the cost
/// from a node to the goal and is combined with the cost so far according to `mode`.
///
/// Returns `Ok(None)` when the frontier runs dry without reaching a goal.
pub fn astar_trace<N, C, E, FN, IN, FH, FS>(
    start: &N,
    mode: HeuristicMode,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Result<Option<SearchTrace<N, C>>, E>
where
    N: Eq + Hash + Ord + Clone,
    C: Float,
    FN: FnMut(&N) -> Result<IN, E>,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let mut to_see = BinaryHeap::new();
    to_see.push(FrontierEntry {
        priority: mode.priority(heuristic(start), C::zero()),
        cost: C::zero(),
        node: start.clone(),
        parent: None,
    });
    let mut visited: FxIndexMap<N, (Option<usize>, C)> = FxIndexMap::default();
    let mut expansions: Vec<Expansion<N, C>> = Vec::new();
    let mut pushed = 1usize;
    let mut stale = 0usize;
    let mut patched = 0usize;
    while let Some(FrontierEntry {
        cost, node, parent, ..
    }) = to_see.pop()
    {
        // Duplicates are never removed from the heap, only skipped once their node is closed.
        if visited.contains_key(&node) {
            stale += 1;
            continue;
        }
        let parent_index = parent.as_ref().and_then(|p| visited.get_index_of(p));
        let (index, _) = visited.insert_full(node.clone(), (parent_index, cost));
        expansions.push(Expansion {
            node: node.clone(),
            parent,
            cost,
        });
        if success(&node) {
            debug!(
                "Goal closed after {} expansions ({} pushed, {} stale, {} patched)",
                expansions.len(),
                pushed,
                stale,
                patched
            );
            let path = reverse_path(&visited, index);
            return Ok(Some(SearchTrace {
                path,
                cost,
                expansions,
            }));
        }
        for (successor, move_cost) in successors(&node)? {
            let new_cost = move_cost + cost;
            match visited.get_mut(&successor) {
                Some(record) => {
                    // Closed nodes are not reopened, their record is patched in place.
                    if new_cost < record.1 {
                        *record = (Some(index), new_cost);
                        patched += 1;
                    }
                }
                None => {
                    let priority = mode.priority(heuristic(&successor), new_cost);
                    to_see.push(FrontierEntry {
                        priority,
                        cost: new_cost,
                        node: successor,
                        parent: Some(node.clone()),
                    });
                    pushed += 1;
                }
            }
        }
    }
    warn!(
        "Frontier exhausted after {} expansions without reaching a goal",
        expansions.len()
    );
    Ok(None)
}
