/// Level authoring: demo levels, random generation, file loading,
/// structural validation.
///
/// ## Level file format (`.txt`)
///
///   Line 1 (optional): `# Level Name`
///   Remaining lines:   map rows
///
/// A name line starts with `#` and contains a lowercase letter; map rows
/// only ever contain legend characters, so the two never collide. Rows are
/// right-padded to the widest row.
///
/// ## Tile legend:
///   '#' = Ground     '=' = Platform
///   'S' = Start      'G' = Goal       ' ' = Empty

use std::path::Path;

use rand::Rng;

use crate::config::GenerationConfig;
use crate::domain::grid::Grid;
use crate::domain::tile::Tile;

/// A named level, loaded from file or built in.
pub struct LevelDef {
    pub name: String,
    pub grid: Grid,
}

// ══════════════════════════════════════════════════════════════
// Built-in demo levels
// ══════════════════════════════════════════════════════════════

/// Flat ground floor only, no markers. A blank canvas.
pub fn empty_level() -> Grid {
    Grid::new(20, 10)
}

/// Start bottom-left, goal top-right, platform staircase between.
pub fn staircase_level() -> Grid {
    Grid::from_rows(&[
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
    ])
}

/// The staircase with floor gaps: the agent must clear them with jumps.
pub fn gap_level() -> Grid {
    Grid::from_rows(&[
        "                    ",
        "                    ",
        "                    ",
        "                  G ",
        "             === ===",
        "                    ",
        "          ==        ",
        "     ==             ",
        " S                  ",
        "###  ##   ##########",
    ])
}

/// Stacked platforms with the goal tucked beneath an overhang. Exercises
/// the jump line-of-sight check: a naive arc would pass straight through
/// the upper platform.
pub fn overhang_level() -> Grid {
    Grid::from_rows(&[
        "                    ",
        "                    ",
        "                    ",
        "                    ",
        "             ===    ",
        "                    ",
        "          ==     ===",
        "     ==           G ",
        " S               ===",
        "###  ##   ##########",
    ])
}

/// All built-in levels, in difficulty order.
pub fn demo_levels() -> Vec<LevelDef> {
    vec![
        LevelDef { name: "Staircase".to_string(), grid: staircase_level() },
        LevelDef { name: "Gap Run".to_string(), grid: gap_level() },
        LevelDef { name: "Overhang".to_string(), grid: overhang_level() },
    ]
}

// ══════════════════════════════════════════════════════════════
// Random generation
// ══════════════════════════════════════════════════════════════

/// A random candidate level. Start is always bottom-left; the goal sits in
/// the second-to-last column at a random height, standing on a platform
/// placed beneath it. Floor gaps spare the start and goal columns.
pub fn random_level<R: Rng>(cfg: &GenerationConfig, rng: &mut R) -> Grid {
    let (w, h) = (cfg.width, cfg.height);
    let mut grid = Grid::new(w, h);

    // Interior platforms
    for y in 1..h - 2 {
        for x in 1..w - 1 {
            if rng.gen_bool(cfg.platform_chance) {
                grid.set(x, y, Tile::Platform);
            }
        }
    }

    // Gaps in the floor, away from the start and goal columns
    for x in 2..w - 2 {
        if rng.gen_bool(cfg.gap_chance) {
            grid.set(x, h - 1, Tile::Empty);
        }
    }

    grid.set(1, h - 2, Tile::Start);

    let goal_y = rng.gen_range(1..h - 2);
    grid.set(w - 2, goal_y, Tile::Goal);
    grid.set(w - 2, goal_y + 1, Tile::Platform);

    grid
}

// ══════════════════════════════════════════════════════════════
// Validation
// ══════════════════════════════════════════════════════════════

/// Structural minimum for a level to be worth handing to the solver.
/// Returns all problems found, not just the first.
pub fn validate(grid: &Grid) -> Result<(), Vec<String>> {
    let mut problems = vec![];

    let start = grid.start();
    let goal = grid.goal();

    if start.is_none() {
        problems.push("no start marker".to_string());
    }
    if goal.is_none() {
        problems.push("no goal marker".to_string());
    }
    if let (Some(s), Some(g)) = (start, goal) {
        if s == g {
            problems.push("start equals goal".to_string());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(problems)
    }
}

// ══════════════════════════════════════════════════════════════
// File loading
// ══════════════════════════════════════════════════════════════

pub fn load_level_file(path: &Path) -> Result<LevelDef, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    parse_level_text(&content).ok_or_else(|| format!("{}: no map rows", path.display()).into())
}

/// Parse a single level from text content. None if there are no map rows.
pub fn parse_level_text(content: &str) -> Option<LevelDef> {
    let mut name = String::new();
    let mut rows = vec![];

    for line in content.lines() {
        if line.starts_with('#') && name.is_empty() && is_name_line(line) {
            name = line[1..].trim().to_string();
        } else {
            rows.push(line);
        }
    }

    while rows.last().map_or(false, |r| r.trim().is_empty()) {
        rows.pop();
    }

    if rows.is_empty() {
        return None;
    }

    if name.is_empty() {
        name = "Unnamed Level".to_string();
    }

    Some(LevelDef {
        name,
        grid: Grid::from_rows(&rows),
    })
}

/// Distinguish `# Level Name` from `####....` (a ground row).
/// Map rows only contain legend characters, never lowercase letters.
fn is_name_line(line: &str) -> bool {
    line[1..].chars().any(|c| c.is_lowercase())
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::movement::MovementRules;
    use crate::domain::solver::PathSolver;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn solvable(grid: &Grid) -> bool {
        PathSolver::new(grid, MovementRules::default()).level_solvable()
    }

    // ── Built-ins ──

    #[test]
    fn empty_level_has_floor_and_no_markers() {
        let g = empty_level();
        assert_eq!(g.count(Tile::Ground), 20);
        assert!(validate(&g).is_err());
    }

    #[test]
    fn demo_levels_validate_and_solve() {
        for def in demo_levels() {
            assert!(validate(&def.grid).is_ok(), "{} invalid", def.name);
            assert!(solvable(&def.grid), "{} unsolvable", def.name);
        }
    }

    #[test]
    fn gap_level_really_has_gaps() {
        let g = gap_level();
        assert!(!g.is_solid(3, 9));
        assert!(!g.is_solid(8, 9));
        assert!(g.is_solid(0, 9));
    }

    // ── Random generation ──

    #[test]
    fn random_levels_have_exactly_one_start_and_goal() {
        let cfg = crate::config::AppConfig::default().generation;
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..50 {
            let g = random_level(&cfg, &mut rng);
            assert_eq!(g.count(Tile::Start), 1);
            assert_eq!(g.count(Tile::Goal), 1);
            assert!(validate(&g).is_ok());
            // Goal always stands on the platform placed beneath it.
            let goal = g.goal().unwrap();
            assert!(g.has_support_below(goal.x, goal.y));
        }
    }

    #[test]
    fn random_level_keeps_floor_under_start() {
        let cfg = crate::config::GenerationConfig {
            width: 20,
            height: 10,
            platform_chance: 0.0,
            gap_chance: 1.0, // every eligible floor tile removed
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let g = random_level(&cfg, &mut rng);
        let start = g.start().unwrap();
        assert!(g.has_support_below(start.x, start.y));
    }

    // ── Validation ──

    #[test]
    fn validate_reports_all_problems() {
        let g = Grid::new(5, 5);
        let problems = validate(&g).unwrap_err();
        assert_eq!(problems.len(), 2);
    }

    #[test]
    fn validate_requires_both_markers() {
        let mut g = Grid::new(5, 5);
        g.set(1, 3, Tile::Start);
        assert!(validate(&g).is_err());
        g.set(3, 3, Tile::Goal);
        assert!(validate(&g).is_ok());
    }

    // ── Parsing ──

    #[test]
    fn parse_with_name_line() {
        let def = parse_level_text("# First Steps\nS  G\n####\n").unwrap();
        assert_eq!(def.name, "First Steps");
        assert_eq!(def.grid.width(), 4);
        assert!(def.grid.start().is_some());
    }

    #[test]
    fn ground_row_is_not_a_name() {
        let def = parse_level_text("####\nS  G\n####\n").unwrap();
        assert_eq!(def.name, "Unnamed Level");
        assert_eq!(def.grid.height(), 3);
    }

    #[test]
    fn trailing_blank_lines_are_dropped() {
        let def = parse_level_text("S G\n###\n\n\n").unwrap();
        assert_eq!(def.grid.height(), 2);
    }

    #[test]
    fn empty_content_is_none() {
        assert!(parse_level_text("").is_none());
        assert!(parse_level_text("# Just a name\n").is_none());
    }
}
