/// Presentation layer: terminal grid renderer.
///
/// Draws one level per frame: each tile is two terminal columns wide (a
/// terminal cell is roughly twice as tall as it is wide, so doubled columns
/// give square-ish tiles), with the solved path overlaid on top and an info
/// bar underneath. The viewer is event-driven — a frame is only redrawn
/// after a keypress — so a full clear-and-redraw per frame is plenty; all
/// commands are batched with `queue!` and flushed once.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::grid::{Grid, Position};
use crate::domain::movement::MoveKind;
use crate::domain::solver::{Path, PathStats};

// ── Palette ──

const SKY: Color = Color::Rgb { r: 25, g: 30, b: 40 };
const GROUND: Color = Color::Rgb { r: 101, g: 67, b: 33 };
const PLATFORM: Color = Color::Rgb { r: 140, g: 140, b: 150 };
const START: Color = Color::Rgb { r: 255, g: 220, b: 0 };
const GOAL: Color = Color::Rgb { r: 50, g: 205, b: 50 };

const PATH_RUN: Color = Color::Rgb { r: 230, g: 230, b: 230 };
const PATH_JUMP: Color = Color::Rgb { r: 255, g: 200, b: 80 };
const PATH_FALL: Color = Color::Rgb { r: 90, g: 200, b: 250 };

const TEXT: Color = Color::Rgb { r: 240, g: 240, b: 240 };
const TEXT_DIM: Color = Color::Rgb { r: 160, g: 160, b: 170 };

// Grid offset inside the terminal
const OX: u16 = 1;
const OY: u16 = 1;

pub struct Renderer {
    out: BufWriter<Stdout>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::new(io::stdout()),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        queue!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            Clear(ClearType::All),
        )?;
        self.out.flush()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()
    }

    /// Draw a level, its solved path, and the stats bar.
    pub fn draw(
        &mut self,
        grid: &Grid,
        path: &Path,
        stats: &PathStats,
        name: &str,
    ) -> io::Result<()> {
        queue!(self.out, Clear(ClearType::All))?;

        for y in 0..grid.height() {
            queue!(self.out, MoveTo(OX, OY + y as u16))?;
            for x in 0..grid.width() {
                let (text, fg, bg) = tile_cell(grid, x, y);
                queue!(
                    self.out,
                    SetForegroundColor(fg),
                    SetBackgroundColor(bg),
                    Print(text),
                )?;
            }
        }

        self.draw_path(path)?;
        self.draw_info(grid, stats, name)?;

        queue!(self.out, ResetColor)?;
        self.out.flush()
    }

    /// Waypoint markers, colored by the movement that arrives there.
    /// Endpoints are skipped so the S and G tiles stay visible.
    fn draw_path(&mut self, path: &Path) -> io::Result<()> {
        if path.positions.len() < 3 {
            return Ok(());
        }
        for i in 1..path.positions.len() - 1 {
            let color = match path.movements[i - 1].kind {
                MoveKind::Jump => PATH_JUMP,
                MoveKind::Fall => PATH_FALL,
                MoveKind::Run => PATH_RUN,
            };
            self.draw_marker(path.positions[i], color)?;
        }
        Ok(())
    }

    fn draw_marker(&mut self, pos: Position, color: Color) -> io::Result<()> {
        if pos.x < 0 || pos.y < 0 {
            return Ok(());
        }
        queue!(
            self.out,
            MoveTo(OX + (pos.x as u16) * 2, OY + pos.y as u16),
            SetForegroundColor(color),
            SetBackgroundColor(SKY),
            Print("><"),
        )
    }

    fn draw_info(&mut self, grid: &Grid, stats: &PathStats, name: &str) -> io::Result<()> {
        let base = OY + grid.height() as u16 + 1;

        let line1 = format!(
            "{}  |  {}x{}  |  {} platforms  |  start {:?}  goal {:?}",
            name,
            grid.width(),
            grid.height(),
            grid.count(crate::domain::tile::Tile::Platform),
            grid.start().map(|p| (p.x, p.y)),
            grid.goal().map(|p| (p.x, p.y)),
        );
        let line2 = if stats.solvable {
            format!(
                "solvable  |  path {} tiles  |  {} jumps  |  {} nodes evaluated",
                stats.path_length, stats.jump_count, stats.nodes_evaluated,
            )
        } else {
            format!("UNSOLVABLE  |  {} nodes evaluated", stats.nodes_evaluated)
        };
        let line3 = "[1] staircase  [2] gaps  [3] overhang  [0] empty  [r] random  [q] quit";

        queue!(
            self.out,
            ResetColor,
            MoveTo(OX, base),
            SetForegroundColor(TEXT),
            Print(line1),
            MoveTo(OX, base + 1),
            Print(line2),
            MoveTo(OX, base + 2),
            SetForegroundColor(TEXT_DIM),
            Print(line3),
        )
    }
}

/// Two-column cell text and colors for a tile.
fn tile_cell(grid: &Grid, x: i32, y: i32) -> (&'static str, Color, Color) {
    use crate::domain::tile::Tile;
    match grid.tile(x, y) {
        Tile::Empty => ("  ", TEXT, SKY),
        Tile::Ground => ("  ", TEXT, GROUND),
        Tile::Platform => ("  ", TEXT, PLATFORM),
        Tile::Start => ("S ", Color::Black, START),
        Tile::Goal => ("G ", Color::Black, GOAL),
    }
}
