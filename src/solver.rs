use std::{
    cmp::{Ordering, Reverse},
    collections::BinaryHeap,
    str::FromStr,
};

use log::{debug, trace};
use thiserror::Error;

use crate::board::Board;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SolverError {
    #[error("the initial board must be given")]
    MissingBoard,

    #[error("unknown priority function `{0}`, expected manhattan, hamming or linear-conflict")]
    UnknownPriority(String),
}

/// Estimate of the remaining moves added to the moves taken so far.
///
/// All variants are admissible, so every one of them yields a minimum-move
/// solution. They differ in how many nodes get expanded on the way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    #[default]
    Manhattan,
    Hamming,
    LinearConflict,
}

impl Priority {
    fn estimate(&self, board: &Board) -> usize {
        match self {
            Priority::Manhattan => board.manhattan(),
            Priority::Hamming => board.hamming(),
            Priority::LinearConflict => board.manhattan() + 2 * board.linear_conflicts(),
        }
    }
}

impl FromStr for Priority {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "manhattan" => Ok(Priority::Manhattan),
            "hamming" => Ok(Priority::Hamming),
            "linear-conflict" => Ok(Priority::LinearConflict),
            other => Err(SolverError::UnknownPriority(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    pub priority: Priority,
}

/// Work done by one of the two searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Nodes removed from the frontier and expanded.
    pub expanded: usize,
    /// Nodes inserted into the frontier, the root included.
    pub generated: usize,
}

struct SearchNode {
    board: Board,
    moves: usize,
    // Index into the owning search's arena. Always smaller than this node's own index.
    parent: Option<usize>,
}

// Ordered by priority alone; ties come out of the heap in no particular order.
struct FrontierEntry {
    priority: usize,
    node: usize,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}
impl Eq for FrontierEntry {}
impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

enum Step {
    Solved(usize),
    Expanded,
    Exhausted,
}

/// A* over board states, with nodes kept in an arena so parents can be
/// shared by index.
struct Search {
    nodes: Vec<SearchNode>,
    frontier: BinaryHeap<Reverse<FrontierEntry>>,
    priority: Priority,
    stats: SearchStats,
}

impl Search {
    fn new(root: Board, priority: Priority) -> Self {
        let mut search = Self {
            nodes: Vec::new(),
            frontier: BinaryHeap::new(),
            priority,
            stats: SearchStats::default(),
        };
        search.push(root, 0, None);
        search
    }

    fn push(&mut self, board: Board, moves: usize, parent: Option<usize>) {
        let priority = moves + self.priority.estimate(&board);
        let node = self.nodes.len();
        self.nodes.push(SearchNode {
            board,
            moves,
            parent,
        });
        self.frontier.push(Reverse(FrontierEntry { priority, node }));
        self.stats.generated += 1;
    }

    fn step(&mut self) -> Step {
        let Some(Reverse(entry)) = self.frontier.pop() else {
            return Step::Exhausted;
        };
        let current = &self.nodes[entry.node];
        trace!(
            "dequeued node {} at {} moves, priority {}",
            entry.node,
            current.moves,
            entry.priority
        );
        if current.board.is_goal() {
            return Step::Solved(entry.node);
        }

        // Only the board we just came from is skipped; deeper revisits are left to the heuristic.
        let parent_board = current.parent.map(|parent| &self.nodes[parent].board);
        let successors: Vec<Board> = current
            .board
            .neighbors()
            .into_iter()
            .filter(|neighbor| Some(neighbor) != parent_board)
            .collect();
        let moves = current.moves + 1;

        self.stats.expanded += 1;
        for successor in successors {
            self.push(successor, moves, Some(entry.node));
        }
        Step::Expanded
    }

    /// Boards from the root to `node`, inclusive.
    fn path(&self, node: usize) -> Vec<Board> {
        let mut path = Vec::with_capacity(self.nodes[node].moves + 1);
        let mut current = Some(node);
        while let Some(index) = current {
            let node = &self.nodes[index];
            path.push(node.board.clone());
            current = node.parent;
        }
        path.reverse();
        path
    }
}

/// Decides whether a board can reach the goal and, if so, finds a
/// minimum-move solution.
///
/// Two searches run in strict alternation: one from the initial board and
/// one from its twin. Exactly one of them can reach the goal, so whichever
/// gets there first settles solvability.
#[derive(Debug, Clone)]
pub struct Solver {
    solution: Option<Vec<Board>>,
    primary_stats: SearchStats,
    twin_stats: SearchStats,
}

impl Solver {
    pub fn new(initial: Board) -> Self {
        Self::with_config(initial, SolverConfig::default())
    }

    /// Like [`Solver::new`], for callers whose board may be absent.
    pub fn try_new(initial: Option<Board>) -> Result<Self, SolverError> {
        let initial = initial.ok_or(SolverError::MissingBoard)?;
        Ok(Self::new(initial))
    }

    pub fn with_config(initial: Board, config: SolverConfig) -> Self {
        let twin = initial.twin();
        let mut primary = Search::new(initial, config.priority);
        let mut control = Search::new(twin, config.priority);
        let mut control_live = true;

        let solution = loop {
            match primary.step() {
                Step::Solved(node) => break Some(primary.path(node)),
                Step::Exhausted => break None,
                Step::Expanded => {}
            }
            if control_live {
                match control.step() {
                    Step::Solved(_) => break None,
                    Step::Exhausted => control_live = false,
                    Step::Expanded => {}
                }
            }
        };

        match &solution {
            Some(path) => debug!(
                "solved in {} moves, expanded {} nodes ({} by the twin search)",
                path.len() - 1,
                primary.stats.expanded,
                control.stats.expanded
            ),
            None => debug!(
                "twin reached the goal first, board is unsolvable; expanded {} nodes ({} by the twin search)",
                primary.stats.expanded,
                control.stats.expanded
            ),
        }

        Self {
            solution,
            primary_stats: primary.stats,
            twin_stats: control.stats,
        }
    }

    pub fn is_solvable(&self) -> bool {
        self.solution.is_some()
    }

    /// Minimum number of moves to the goal, or -1 if the board is unsolvable.
    pub fn moves(&self) -> i32 {
        match &self.solution {
            Some(path) => (path.len() - 1) as i32,
            None => -1,
        }
    }

    /// Boards from the initial one to the goal, both included.
    pub fn solution(&self) -> Option<&[Board]> {
        self.solution.as_deref()
    }

    pub fn primary_stats(&self) -> SearchStats {
        self.primary_stats
    }

    pub fn twin_stats(&self) -> SearchStats {
        self.twin_stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Move;

    fn board(rows: &[&[u32]]) -> Board {
        Board::new(rows.iter().map(|row| row.to_vec()).collect())
    }

    #[test]
    fn frontier_pops_lowest_priority_first() {
        let mut heap = BinaryHeap::new();
        for (node, priority) in [7, 3, 9, 3, 1].into_iter().enumerate() {
            heap.push(Reverse(FrontierEntry { priority, node }));
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|Reverse(e)| e.priority)).collect();
        assert_eq!(order, vec![1, 3, 3, 7, 9]);
    }

    #[test]
    fn priority_estimates() {
        let b = board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]);
        assert_eq!(Priority::Manhattan.estimate(&b), 2);
        assert_eq!(Priority::Hamming.estimate(&b), 2);
        assert_eq!(Priority::LinearConflict.estimate(&b), 4);
    }

    #[test]
    fn priority_from_str() {
        assert_eq!("manhattan".parse::<Priority>(), Ok(Priority::Manhattan));
        assert_eq!("hamming".parse::<Priority>(), Ok(Priority::Hamming));
        assert_eq!(
            "linear-conflict".parse::<Priority>(),
            Ok(Priority::LinearConflict)
        );
        assert_eq!(
            "euclid".parse::<Priority>(),
            Err(SolverError::UnknownPriority("euclid".to_string()))
        );
    }

    #[test]
    fn root_expansion_keeps_every_neighbor() {
        let root = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        let mut search = Search::new(root, Priority::Manhattan);
        assert!(matches!(search.step(), Step::Expanded));
        assert_eq!(search.nodes.len(), 5);
        assert!(search.nodes[1..].iter().all(|n| n.parent == Some(0) && n.moves == 1));
        assert_eq!(search.stats, SearchStats { expanded: 1, generated: 5 });
    }

    #[test]
    fn expansion_skips_parent_board() {
        let root = board(&[&[1, 2, 3], &[4, 0, 5], &[7, 8, 6]]);
        let mut search = Search::new(root.clone(), Priority::Manhattan);
        search.step();
        // Blank moves right: the one child at manhattan distance 1, so it is dequeued next.
        search.step();
        let children: Vec<&SearchNode> = search.nodes.iter().filter(|n| n.moves == 2).collect();
        assert!(!children.is_empty());
        assert!(children.iter().all(|n| n.board != root));
    }

    #[test]
    fn path_follows_parents() {
        let root = board(&[&[1, 2, 3], &[4, 5, 6], &[0, 7, 8]]);
        let mut search = Search::new(root.clone(), Priority::Manhattan);
        let goal_node = loop {
            match search.step() {
                Step::Solved(node) => break node,
                Step::Expanded => {}
                Step::Exhausted => panic!("search ran out of nodes"),
            }
        };
        let path = search.path(goal_node);
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], root);
        assert!(path[2].is_goal());
        for pair in path.windows(2) {
            assert!(Move::between(&pair[0], &pair[1]).is_some());
        }
    }

    #[test]
    fn parents_precede_children() {
        let root = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        let mut search = Search::new(root, Priority::Manhattan);
        for _ in 0..200 {
            search.step();
        }
        for (index, node) in search.nodes.iter().enumerate() {
            if let Some(parent) = node.parent {
                assert!(parent < index);
                assert_eq!(search.nodes[parent].moves + 1, node.moves);
            }
        }
    }

    #[test]
    fn missing_board_is_rejected() {
        assert_eq!(Solver::try_new(None).unwrap_err(), SolverError::MissingBoard);
        assert!(Solver::try_new(Some(Board::goal(3))).unwrap().is_solvable());
    }

    #[test]
    fn stats_are_recorded() {
        let solver = Solver::new(board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]));
        assert_eq!(solver.moves(), 4);
        assert!(solver.primary_stats().expanded >= 4);
        assert!(solver.primary_stats().generated > solver.primary_stats().expanded);
        assert!(solver.twin_stats().expanded >= solver.primary_stats().expanded - 1);
    }
}
