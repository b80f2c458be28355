/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::movement::MovementRules;
use crate::domain::solver::DEFAULT_MAX_ITERATIONS;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub movement: MovementRules,
    pub solver: SolverConfig,
    pub generation: GenerationConfig,
}

#[derive(Clone, Copy, Debug)]
pub struct SolverConfig {
    pub max_iterations: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct GenerationConfig {
    pub width: i32,
    pub height: i32,
    /// Probability of a platform tile appearing in an interior cell.
    pub platform_chance: f64,
    /// Probability of a floor tile being removed (a gap).
    pub gap_chance: f64,
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    movement: TomlMovement,
    #[serde(default)]
    solver: TomlSolver,
    #[serde(default)]
    generation: TomlGeneration,
}

#[derive(Deserialize, Debug)]
struct TomlMovement {
    #[serde(default = "default_run_cost")]
    run_cost: u32,
    #[serde(default = "default_jump_cost")]
    jump_cost: u32,
    #[serde(default = "default_fall_cost")]
    fall_cost: u32,
    #[serde(default = "default_jump_height")]
    jump_height: i32,
    #[serde(default = "default_jump_distance")]
    jump_distance: i32,
    #[serde(default = "default_max_fall")]
    max_fall: i32,
}

#[derive(Deserialize, Debug)]
struct TomlSolver {
    #[serde(default = "default_max_iterations")]
    max_iterations: u32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneration {
    #[serde(default = "default_width")]
    width: i32,
    #[serde(default = "default_height")]
    height: i32,
    #[serde(default = "default_platform_chance")]
    platform_chance: f64,
    #[serde(default = "default_gap_chance")]
    gap_chance: f64,
}

// ── Defaults ──
//
// Movement defaults mirror MovementRules::default(); changing them shifts
// the cost model the fitness scores are calibrated against.

fn default_run_cost() -> u32 { 1 }
fn default_jump_cost() -> u32 { 5 }
fn default_fall_cost() -> u32 { 1 }
fn default_jump_height() -> i32 { 3 }
fn default_jump_distance() -> i32 { 4 }
fn default_max_fall() -> i32 { 10 }

fn default_max_iterations() -> u32 { DEFAULT_MAX_ITERATIONS }

fn default_width() -> i32 { 20 }
fn default_height() -> i32 { 10 }
fn default_platform_chance() -> f64 { 0.15 }
fn default_gap_chance() -> f64 { 0.15 }

impl Default for TomlMovement {
    fn default() -> Self {
        TomlMovement {
            run_cost: default_run_cost(),
            jump_cost: default_jump_cost(),
            fall_cost: default_fall_cost(),
            jump_height: default_jump_height(),
            jump_distance: default_jump_distance(),
            max_fall: default_max_fall(),
        }
    }
}

impl Default for TomlSolver {
    fn default() -> Self {
        TomlSolver {
            max_iterations: default_max_iterations(),
        }
    }
}

impl Default for TomlGeneration {
    fn default() -> Self {
        TomlGeneration {
            width: default_width(),
            height: default_height(),
            platform_chance: default_platform_chance(),
            gap_chance: default_gap_chance(),
        }
    }
}

// ── Loading ──

impl AppConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        Self::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        AppConfig {
            movement: MovementRules {
                run_cost: toml_cfg.movement.run_cost,
                jump_cost: toml_cfg.movement.jump_cost,
                fall_cost: toml_cfg.movement.fall_cost,
                jump_height: toml_cfg.movement.jump_height,
                jump_distance: toml_cfg.movement.jump_distance,
                max_fall: toml_cfg.movement.max_fall,
            },
            solver: SolverConfig {
                max_iterations: toml_cfg.solver.max_iterations,
            },
            generation: GenerationConfig {
                width: toml_cfg.generation.width,
                height: toml_cfg.generation.height,
                platform_chance: toml_cfg.generation.platform_chance,
                gap_chance: toml_cfg.generation.gap_chance,
            },
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default())
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (resolve symlinks)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_parameters() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.movement.run_cost, 1);
        assert_eq!(cfg.movement.jump_cost, 5);
        assert_eq!(cfg.movement.fall_cost, 1);
        assert_eq!(cfg.movement.jump_height, 3);
        assert_eq!(cfg.movement.jump_distance, 4);
        assert_eq!(cfg.movement.max_fall, 10);
        assert_eq!(cfg.solver.max_iterations, 10_000);
        assert_eq!(cfg.generation.width, 20);
        assert_eq!(cfg.generation.height, 10);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: TomlConfig = toml::from_str(
            r#"
            [movement]
            jump_cost = 7

            [generation]
            width = 30
            "#,
        )
        .unwrap();
        let cfg = AppConfig::from_toml(cfg);
        assert_eq!(cfg.movement.jump_cost, 7);
        assert_eq!(cfg.movement.run_cost, 1);
        assert_eq!(cfg.generation.width, 30);
        assert_eq!(cfg.generation.height, 10);
        assert_eq!(cfg.solver.max_iterations, 10_000);
    }
}
