/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tile {
    Empty,
    Ground,   // Solid terrain (level floor)
    Platform, // Solid, placed by authoring/generation
    Start,    // Marker: where the agent begins
    Goal,     // Marker: where the agent must reach
}

impl Tile {
    /// Does this tile block movement and support standing on top of it?
    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Ground | Tile::Platform)
    }

    /// Is this tile passable (an agent can occupy this cell)?
    pub fn is_passable(self) -> bool {
        !self.is_solid()
    }

    /// Is this a start marker?
    pub fn is_start(self) -> bool {
        matches!(self, Tile::Start)
    }

    /// Is this a goal marker?
    pub fn is_goal(self) -> bool {
        matches!(self, Tile::Goal)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Tile::Empty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solidity_table() {
        assert!(Tile::Ground.is_solid());
        assert!(Tile::Platform.is_solid());
        assert!(!Tile::Empty.is_solid());
        assert!(!Tile::Start.is_solid());
        assert!(!Tile::Goal.is_solid());
    }

    #[test]
    fn markers_are_passable() {
        assert!(Tile::Start.is_passable());
        assert!(Tile::Goal.is_passable());
        assert!(!Tile::Ground.is_passable());
    }
}
