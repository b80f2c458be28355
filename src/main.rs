/// Entry point and command dispatch.
///
/// Commands:
///   demo           solve the built-in levels and print a report (default)
///   solve <file>   load a level file, solve it, print the result
///   gen <count>    generate random levels and report fitness statistics
///   view           interactive terminal viewer

mod config;
mod domain;
mod sim;
mod ui;

use std::path::Path;

use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use config::AppConfig;
use domain::grid::Grid;
use domain::movement::MoveKind;
use domain::solver::{Path as SolvedPath, PathSolver, PathStats};
use sim::fitness::FitnessScorer;
use sim::level;
use ui::renderer::Renderer;

fn main() {
    let config = AppConfig::load();
    let args: Vec<String> = std::env::args().skip(1).collect();

    let result = match args.first().map(String::as_str) {
        None | Some("demo") => run_demo(&config),
        Some("solve") => match args.get(1) {
            Some(file) => run_solve(&config, Path::new(file)),
            None => {
                eprintln!("Usage: leapgen solve <file>");
                return;
            }
        },
        Some("gen") => {
            let count = args
                .get(1)
                .and_then(|s| s.parse().ok())
                .unwrap_or(100);
            run_gen(&config, count)
        }
        Some("view") => run_viewer(&config),
        Some(other) => {
            eprintln!("Unknown command: {other}");
            eprintln!("Usage: leapgen [demo | solve <file> | gen <count> | view]");
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
    }
}

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ── demo ──

fn run_demo(config: &AppConfig) -> CmdResult {
    for def in level::demo_levels() {
        report_level(config, &def.name, &def.grid);
    }

    // An intentionally walled-in goal, to show the negative case.
    let walled = Grid::from_rows(&[
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
    report_level(config, "Walled Goal", &walled);
    Ok(())
}

fn report_level(config: &AppConfig, name: &str, grid: &Grid) {
    println!("== {name} ==");
    print!("{}", grid.render_text());

    let mut solver =
        PathSolver::new(grid, config.movement).with_iteration_cap(config.solver.max_iterations);
    let solvable = solver.level_solvable();
    let stats = solver.path_stats(None);
    print_stats(&stats);

    if solvable {
        if let Some(path) = solver.last_path() {
            let count = |kind| path.movements.iter().filter(|m| m.kind == kind).count();
            println!(
                "  route: {} runs, {} jumps, {} falls",
                count(MoveKind::Run),
                count(MoveKind::Jump),
                count(MoveKind::Fall),
            );
        }
    } else {
        println!("  (no path found)");
    }
    println!();
}

fn print_stats(stats: &PathStats) {
    println!(
        "  solvable: {}  path length: {}  jumps: {}  nodes evaluated: {}",
        stats.solvable, stats.path_length, stats.jump_count, stats.nodes_evaluated,
    );
}

// ── solve ──

fn run_solve(config: &AppConfig, path: &Path) -> CmdResult {
    let def = level::load_level_file(path)?;

    if let Err(problems) = level::validate(&def.grid) {
        println!("{}: invalid level: {}", def.name, problems.join(", "));
        return Ok(());
    }

    report_level(config, &def.name, &def.grid);
    Ok(())
}

// ── gen ──

fn run_gen(config: &AppConfig, count: usize) -> CmdResult {
    let mut rng = SmallRng::from_entropy();
    let mut scorer = FitnessScorer::new(config.movement, config.solver);

    let mut best_fitness = 0.0f64;
    let mut best: Option<Grid> = None;

    for _ in 0..count {
        let grid = level::random_level(&config.generation, &mut rng);
        let (fitness, _) = scorer.score(&grid);
        if fitness > best_fitness || best.is_none() {
            best_fitness = fitness;
            best = Some(grid);
        }
    }

    let summary = scorer.summary();
    println!(
        "generated {} levels: {} solvable ({:.1}%)",
        summary.levels_scored,
        summary.levels_solvable,
        summary.solvable_rate * 100.0,
    );

    if let Some(grid) = best {
        println!("best fitness: {best_fitness:.0}");
        report_level(config, "Best Level", &grid);
    }
    Ok(())
}

// ── view ──

fn run_viewer(config: &AppConfig) -> CmdResult {
    let mut renderer = Renderer::new();
    renderer.init()?;

    let result = viewer_loop(&mut renderer, config);

    // Always restore the terminal, even when the loop errored.
    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    result
}

fn viewer_loop(renderer: &mut Renderer, config: &AppConfig) -> CmdResult {
    let mut rng = SmallRng::from_entropy();
    let mut name = String::from("Staircase");
    let mut grid = level::staircase_level();

    loop {
        let (path, stats) = solve_for_display(config, &grid);
        renderer.draw(&grid, &path, &stats, &name)?;

        match event::read()? {
            Event::Key(key) => {
                let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c');
                if ctrl_c {
                    break;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('1') => {
                        name = String::from("Staircase");
                        grid = level::staircase_level();
                    }
                    KeyCode::Char('2') => {
                        name = String::from("Gap Run");
                        grid = level::gap_level();
                    }
                    KeyCode::Char('3') => {
                        name = String::from("Overhang");
                        grid = level::overhang_level();
                    }
                    KeyCode::Char('0') => {
                        name = String::from("Empty Canvas");
                        grid = level::empty_level();
                    }
                    KeyCode::Char('r') => {
                        name = String::from("Random");
                        grid = level::random_level(&config.generation, &mut rng);
                    }
                    _ => {}
                }
            }
            Event::Resize(_, _) => {} // next draw clears and refits
            _ => {}
        }
    }
    Ok(())
}

fn solve_for_display(config: &AppConfig, grid: &Grid) -> (SolvedPath, PathStats) {
    let mut solver =
        PathSolver::new(grid, config.movement).with_iteration_cap(config.solver.max_iterations);
    let path = match (grid.start(), grid.goal()) {
        (Some(start), Some(goal)) => solver.find_path(start, goal),
        _ => SolvedPath::default(),
    };
    let stats = solver.path_stats(None);
    (path, stats)
}
