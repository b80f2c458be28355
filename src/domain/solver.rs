/// A* path solver over the implicit movement graph.
///
/// ## Architecture
///
/// The graph is never materialized: each expansion asks the movement model
/// "what can I do from here?". Search nodes live in a per-call arena
/// (`Vec<SearchNode>`, parents as indices), so nothing is shared or pooled
/// between searches.
///
/// ## Behavior notes
///
///   - Heuristic: Manhattan distance. Not strictly admissible once jump
///     costs exceed the Manhattan lower bound, but lateral movement
///     dominates in practice and the paths it finds are what the fitness
///     scoring was calibrated against.
///   - Ties in f are broken by insertion order (a sequence counter on the
///     heap entry), not by deepest node.
///   - An explicit iteration cap bounds every search; hitting it is a
///     normal "no path" result, never an error.

use std::collections::{BinaryHeap, HashMap, HashSet};

use super::grid::{Grid, Position};
use super::movement::{Movement, MovementModel, MovementRules, MoveKind};

pub const DEFAULT_MAX_ITERATIONS: u32 = 10_000;

// ── Path ──

/// An ordered traversal from start to goal. `positions` includes the start;
/// `movements` has one entry fewer. Empty means "no path found".
#[derive(Clone, Debug, Default)]
pub struct Path {
    pub positions: Vec<Position>,
    pub movements: Vec<Movement>,
}

impl Path {
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of positions visited (start inclusive).
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn jump_count(&self) -> usize {
        self.movements
            .iter()
            .filter(|m| m.kind == MoveKind::Jump)
            .count()
    }
}

/// Difficulty statistics for the most recent search, consumed by fitness
/// scoring.
#[derive(Clone, Copy, Debug)]
pub struct PathStats {
    pub solvable: bool,
    pub path_length: usize,
    pub jump_count: usize,
    pub nodes_evaluated: u32,
}

// ── Search bookkeeping ──

/// A candidate state in the search tree. Parent links are arena indices;
/// relaxation pushes a fresh node rather than rewiring, so chains are
/// acyclic by construction.
struct SearchNode {
    position: Position,
    g: u32,
    parent: Option<usize>,
    movement: Option<Movement>,
}

/// Heap entry: min-f first, FIFO among equal f via the sequence number.
#[derive(PartialEq, Eq)]
struct OpenEntry {
    f: u32,
    seq: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reversed: BinaryHeap is a max-heap, we want the smallest f out first.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

// ── Solver ──

pub struct PathSolver<'a> {
    grid: &'a Grid,
    model: MovementModel<'a>,
    max_iterations: u32,
    nodes_evaluated: u32,
    last_path: Option<Path>,
}

impl<'a> PathSolver<'a> {
    pub fn new(grid: &'a Grid, rules: MovementRules) -> Self {
        PathSolver {
            grid,
            model: MovementModel::new(grid, rules),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            nodes_evaluated: 0,
            last_path: None,
        }
    }

    pub fn with_iteration_cap(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Is the grid's own start-to-goal route solvable? Convenience for
    /// fitness scoring: resolves the markers, then searches. Missing
    /// markers mean unsolvable.
    pub fn level_solvable(&mut self) -> bool {
        match (self.grid.start(), self.grid.goal()) {
            (Some(start), Some(goal)) => self.is_solvable(start, goal),
            _ => false,
        }
    }

    /// Thin wrapper: does any path exist?
    pub fn is_solvable(&mut self, start: Position, goal: Position) -> bool {
        !self.find_path(start, goal).is_empty()
    }

    /// Minimum-cost path from start to goal, or an empty path if none
    /// exists (or the iteration budget runs out first).
    pub fn find_path(&mut self, start: Position, goal: Position) -> Path {
        self.nodes_evaluated = 0;

        // Degenerate input; callers should filter this out at validation.
        if start == goal {
            let path = Path {
                positions: vec![start],
                movements: vec![],
            };
            self.last_path = Some(path.clone());
            return path;
        }

        let mut arena: Vec<SearchNode> = Vec::with_capacity(64);
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::with_capacity(64);
        let mut closed: HashSet<Position> = HashSet::new();
        let mut best_g: HashMap<Position, u32> = HashMap::new();
        let mut seq: u64 = 0;

        arena.push(SearchNode {
            position: start,
            g: 0,
            parent: None,
            movement: None,
        });
        best_g.insert(start, 0);
        open.push(OpenEntry {
            f: start.manhattan_distance(goal),
            seq,
            node: 0,
        });

        let mut iterations = 0;
        while let Some(entry) = open.pop() {
            if iterations >= self.max_iterations {
                break;
            }
            iterations += 1;
            self.nodes_evaluated += 1;

            let current = entry.node;
            let current_pos = arena[current].position;

            // Stale heap entry for an already finalized position.
            if closed.contains(&current_pos) {
                continue;
            }

            if current_pos == goal {
                let path = reconstruct(&arena, current);
                self.last_path = Some(path.clone());
                return path;
            }

            closed.insert(current_pos);

            let current_g = arena[current].g;
            for movement in self.model.enumerate_movements(current_pos) {
                if closed.contains(&movement.to) {
                    continue;
                }

                let g = current_g + movement.cost;
                let known = best_g.get(&movement.to).copied();
                if known.map_or(true, |k| g < k) {
                    best_g.insert(movement.to, g);
                    arena.push(SearchNode {
                        position: movement.to,
                        g,
                        parent: Some(current),
                        movement: Some(movement),
                    });
                    seq += 1;
                    open.push(OpenEntry {
                        f: g + movement.to.manhattan_distance(goal),
                        seq,
                        node: arena.len() - 1,
                    });
                }
            }
        }

        let path = Path::default();
        self.last_path = Some(path.clone());
        path
    }

    /// Most recent path, retained so callers can inspect it (jump counts
    /// etc.) without re-running the search.
    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_ref()
    }

    /// Statistics for a path; defaults to the most recent one.
    pub fn path_stats(&self, path: Option<&Path>) -> PathStats {
        let path = path.or(self.last_path.as_ref());
        match path {
            Some(p) if !p.is_empty() => PathStats {
                solvable: true,
                path_length: p.len(),
                jump_count: p.jump_count(),
                nodes_evaluated: self.nodes_evaluated,
            },
            _ => PathStats {
                solvable: false,
                path_length: 0,
                jump_count: 0,
                nodes_evaluated: self.nodes_evaluated,
            },
        }
    }
}

/// Walk parent links from the goal node back to the root, then reverse.
fn reconstruct(arena: &[SearchNode], goal_node: usize) -> Path {
    let mut positions = Vec::new();
    let mut movements = Vec::new();

    let mut current = Some(goal_node);
    while let Some(idx) = current {
        let node = &arena[idx];
        positions.push(node.position);
        if let Some(movement) = node.movement {
            movements.push(movement);
        }
        current = node.parent;
    }

    positions.reverse();
    movements.reverse();

    Path { positions, movements }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn solver(grid: &Grid) -> PathSolver<'_> {
        PathSolver::new(grid, MovementRules::default())
    }

    /// 20x10 grid with a full ground floor, matching the generator's
    /// default dimensions.
    fn open_floor() -> Grid {
        Grid::new(20, 10)
    }

    #[test]
    fn start_equals_goal_is_trivial() {
        let g = open_floor();
        let mut s = solver(&g);
        let p = Position::new(1, 8);
        let path = s.find_path(p, p);
        assert_eq!(path.positions, vec![p]);
        assert!(path.movements.is_empty());
        assert!(!path.is_empty());
    }

    #[test]
    fn straight_corridor_is_runs_only() {
        let g = open_floor();
        let mut s = solver(&g);
        let path = s.find_path(Position::new(1, 8), Position::new(18, 8));
        assert_eq!(path.len(), 18);
        assert_eq!(path.jump_count(), 0);
        assert!(path.movements.iter().all(|m| m.kind == MoveKind::Run));
        assert_eq!(path.positions.first(), Some(&Position::new(1, 8)));
        assert_eq!(path.positions.last(), Some(&Position::new(18, 8)));
    }

    #[test]
    fn enclosed_goal_is_unsolvable() {
        let g = Grid::from_rows(&[
            "                    ",
            "                 #  ",
            "                #G# ",
            "                 #  ",
            "                    ",
            "                    ",
            "                    ",
            "                    ",
            " S                  ",
            "####################",
        ]);
        let mut s = solver(&g);
        assert!(!s.level_solvable());
        let path = s.find_path(g.start().unwrap(), g.goal().unwrap());
        assert!(path.is_empty());
        assert!(!s.path_stats(None).solvable);
    }

    #[test]
    fn staircase_requires_jumps() {
        let g = Grid::from_rows(&[
            "                    ",
            "                  G ",
            "                ====",
            "            ===     ",
            "                    ",
            "        ===         ",
            "                    ",
            "    ===             ",
            " S                  ",
            "####################",
        ]);
        let mut s = solver(&g);
        let path = s.find_path(g.start().unwrap(), g.goal().unwrap());
        assert!(!path.is_empty());
        assert!(path.jump_count() > 0);
        let stats = s.path_stats(None);
        assert!(stats.solvable);
        assert_eq!(stats.path_length, path.len());
        assert_eq!(stats.jump_count, path.jump_count());
        assert!(stats.nodes_evaluated > 0);
    }

    #[test]
    fn wall_crossing_needs_exactly_two_jumps() {
        // The only supported tile on the upper row is the wall top, so the
        // route is: jump onto the wall, jump back down, runs elsewhere.
        let g = Grid::from_rows(&[
            "           ",
            "S    #    G",
            "###########",
        ]);
        let mut s = solver(&g);
        let path = s.find_path(g.start().unwrap(), g.goal().unwrap());
        assert!(!path.is_empty());
        assert_eq!(path.jump_count(), 2);
        assert!(path.positions.contains(&Position::new(5, 0)));
    }

    #[test]
    fn iteration_cap_terminates_search() {
        let g = open_floor();
        // Goal floats mid-air with nothing beneath: unreachable, so the
        // frontier churns until the cap or exhaustion ends it.
        let mut s = solver(&g).with_iteration_cap(25);
        let path = s.find_path(Position::new(1, 8), Position::new(10, 2));
        assert!(path.is_empty());
        assert!(s.path_stats(None).nodes_evaluated <= 25);
    }

    #[test]
    fn unreachable_goal_exhausts_frontier_without_cap() {
        let g = Grid::from_rows(&[
            "S  G",
            "##  ",
        ]);
        // Goal column has no support anywhere; frontier drains normally.
        let mut s = solver(&g);
        let path = s.find_path(Position::new(0, 0), Position::new(3, 0));
        assert!(path.is_empty());
    }

    #[test]
    fn last_path_is_retained() {
        let g = open_floor();
        let mut s = solver(&g);
        let path = s.find_path(Position::new(1, 8), Position::new(5, 8));
        assert_eq!(s.last_path().map(|p| p.len()), Some(path.len()));
        let stats = s.path_stats(None);
        assert!(stats.solvable);
        assert_eq!(stats.path_length, 5);
    }

    #[test]
    fn reconstruction_starts_at_start_and_ends_at_goal() {
        let g = Grid::from_rows(&[
            "                    ",
            "                    ",
            "                    ",
            "                    ",
            "          ==        ",
            "                    ",
            "   ==               ",
            "                    ",
            " S                G ",
            "####################",
        ]);
        let mut s = solver(&g);
        let start = g.start().unwrap();
        let goal = g.goal().unwrap();
        let path = s.find_path(start, goal);
        assert!(!path.is_empty());
        assert_eq!(path.positions.first(), Some(&start));
        assert_eq!(path.positions.last(), Some(&goal));
        assert_eq!(path.movements.len(), path.len() - 1);
        // Each movement links consecutive positions.
        for (i, m) in path.movements.iter().enumerate() {
            assert_eq!(m.from, path.positions[i]);
            assert_eq!(m.to, path.positions[i + 1]);
        }
    }
}
