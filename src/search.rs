use std::cmp::Ordering;
use std::collections::BinaryHeap;

use log::debug;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::board::{Board, PieceId, Point};
use crate::heuristic::{self, manhattan, GoalMap};
use crate::moves::legal_moves;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// Best-first on `f = cost + heuristic`.
    AStar,
    /// Unguided depth-first; finds some path, not necessarily the shortest.
    Dfs,
}

#[derive(Clone, Copy, Default, Debug)]
pub struct Stats {
    /// States popped unvisited and expanded (each distinct grid at most once).
    pub expanded: u64,
    /// Successor states built and pushed onto the frontier.
    pub generated: u64,
}

pub struct SearchResult {
    /// Root-to-goal boards, or `None` when the frontier emptied first.
    pub path: Option<Vec<Board>>,
    pub stats: Stats,
}

// Search-tree node. Nodes live in an arena and point to their parent by
// index, so the solution walk is iterative and the whole tree is reclaimed
// in one drop after the path has been copied out.
struct Node {
    board: Board,
    heuristic: i32,
    cost: i32,
    f: i32,
    parent: Option<usize>,
}

// Reversed ordering turns std's max-heap into a min-heap on (f, seq). The
// insertion sequence number breaks f ties, earliest first, which keeps the
// expansion order reproducible run to run.
struct HeapEntry {
    f: i32,
    seq: u64,
    node: usize,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for HeapEntry {}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.cmp(&self.f).then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn solve(initial: &Board, goal: &Board, goals: &GoalMap, strategy: Strategy) -> SearchResult {
    match strategy {
        Strategy::AStar => best_first(initial, goal, goals),
        Strategy::Dfs => depth_first(initial, goal, goals),
    }
}

fn best_first(initial: &Board, goal: &Board, goals: &GoalMap) -> SearchResult {
    let h = heuristic::evaluate(initial, goals);
    let mut arena = vec![Node {
        board: initial.clone(),
        heuristic: h,
        cost: 0,
        f: h,
        parent: None,
    }];

    let mut open = BinaryHeap::with_capacity(1024);
    let mut seq: u64 = 0;
    open.push(HeapEntry { f: h, seq, node: 0 });

    let mut visited: FxHashSet<Vec<u8>> = FxHashSet::default();
    let mut stats = Stats::default();
    let mut children: SmallVec<[usize; 16]> = SmallVec::new();

    while let Some(entry) = open.pop() {
        let idx = entry.node;
        // Visited is keyed on the rendered grid and marked on pop; a grid
        // may sit in the heap several times, later pops land here.
        if !visited.insert(arena[idx].board.grid_key().to_vec()) {
            continue;
        }
        stats.expanded += 1;

        if arena[idx].board == *goal {
            debug!(
                "best-first: solved at cost {}, {} expanded, {} generated",
                arena[idx].cost, stats.expanded, stats.generated
            );
            return SearchResult {
                path: Some(extract_path(&arena, idx)),
                stats,
            };
        }

        expand(&mut arena, idx, goals, &visited, &mut children);
        stats.generated += children.len() as u64;
        for &child in children.iter() {
            seq += 1;
            open.push(HeapEntry {
                f: arena[child].f,
                seq,
                node: child,
            });
        }
    }

    debug!(
        "best-first: exhausted, {} expanded, {} generated",
        stats.expanded, stats.generated
    );
    SearchResult { path: None, stats }
}

fn depth_first(initial: &Board, goal: &Board, goals: &GoalMap) -> SearchResult {
    let h = heuristic::evaluate(initial, goals);
    let mut arena = vec![Node {
        board: initial.clone(),
        heuristic: h,
        cost: 0,
        f: h,
        parent: None,
    }];

    let mut stack: Vec<usize> = vec![0];
    let mut visited: FxHashSet<Vec<u8>> = FxHashSet::default();
    let mut stats = Stats::default();
    let mut children: SmallVec<[usize; 16]> = SmallVec::new();

    while let Some(idx) = stack.pop() {
        if !visited.insert(arena[idx].board.grid_key().to_vec()) {
            continue;
        }
        stats.expanded += 1;

        if arena[idx].board == *goal {
            debug!(
                "depth-first: solved at depth {}, {} expanded, {} generated",
                arena[idx].cost, stats.expanded, stats.generated
            );
            return SearchResult {
                path: Some(extract_path(&arena, idx)),
                stats,
            };
        }

        expand(&mut arena, idx, goals, &visited, &mut children);
        stats.generated += children.len() as u64;
        stack.extend(children.iter().copied());
    }

    debug!(
        "depth-first: exhausted, {} expanded, {} generated",
        stats.expanded, stats.generated
    );
    SearchResult { path: None, stats }
}

// Successors of `arena[idx]`: every piece, every legal slide, skipping grids
// already visited. The heuristic is updated incrementally from the parent,
// O(1) per successor against an O(pieces) recomputation.
fn expand(
    arena: &mut Vec<Node>,
    idx: usize,
    goals: &GoalMap,
    visited: &FxHashSet<Vec<u8>>,
    children: &mut SmallVec<[usize; 16]>,
) {
    children.clear();

    let mut slides: SmallVec<[(PieceId, Point, Point); 16]> = SmallVec::new();
    for piece in arena[idx].board.pieces() {
        for dest in legal_moves(&arena[idx].board, piece) {
            slides.push((piece.id, piece.pos, dest));
        }
    }

    for (id, from, to) in slides {
        let board = arena[idx].board.clone_with_move(from, to);
        if visited.contains(board.grid_key()) {
            continue;
        }
        let goal_pos = goals[id as usize];
        let h = arena[idx].heuristic - manhattan(from, goal_pos) + manhattan(to, goal_pos);
        let cost = arena[idx].cost + 1;
        arena.push(Node {
            board,
            heuristic: h,
            cost,
            f: cost + h,
            parent: Some(idx),
        });
        children.push(arena.len() - 1);
    }
}

fn extract_path(arena: &[Node], terminal: usize) -> Vec<Board> {
    let mut path = Vec::new();
    let mut idx = Some(terminal);
    while let Some(i) = idx {
        path.push(arena[i].board.clone());
        idx = arena[i].parent;
    }
    path.reverse();
    path
}
