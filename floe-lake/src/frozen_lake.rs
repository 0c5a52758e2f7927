//! The frozen-lake grid world.
use crate::{DiscreteEnv, DiscreteEnvConfig, Outcome};
use anyhow::Result;
use floe_core::{
    error::FloeError,
    record::Record,
    Action, Env, State, Step,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// The reference 4x4 map.
const MAP_4X4: [&str; 4] = ["SFFF", "FFFH", "FHFF", "HFFG"];

/// A cell of the lake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    /// Starting cell, `S`.
    Start,
    /// Frozen surface, `F`.
    Frozen,
    /// Hole, `H`. Terminal.
    Hole,
    /// Goal, `G`. Terminal.
    Goal,
}

impl Tile {
    fn from_char(c: char) -> Result<Self, FloeError> {
        match c {
            'S' => Ok(Tile::Start),
            'F' => Ok(Tile::Frozen),
            'H' => Ok(Tile::Hole),
            'G' => Ok(Tile::Goal),
            _ => Err(FloeError::InvalidModel(format!("unknown tile {:?}", c))),
        }
    }

    /// Character of the tile in a map.
    pub fn as_char(&self) -> char {
        match self {
            Tile::Start => 'S',
            Tile::Frozen => 'F',
            Tile::Hole => 'H',
            Tile::Goal => 'G',
        }
    }

    /// Holes and goals end the episode.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Tile::Hole | Tile::Goal)
    }
}

/// Actions of the agent on the lake.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LakeAction {
    /// 0
    Left,
    /// 1
    Down,
    /// 2
    Right,
    /// 3
    Up,
}

impl LakeAction {
    /// All actions in index order.
    pub const ALL: [LakeAction; 4] = [
        LakeAction::Left,
        LakeAction::Down,
        LakeAction::Right,
        LakeAction::Up,
    ];

    /// Action of the given index.
    pub fn from_index(a: Action) -> Result<Self, FloeError> {
        Self::ALL
            .get(a)
            .copied()
            .ok_or(FloeError::ActionOutOfRange {
                action: a,
                n_actions: 4,
            })
    }

    /// Index of the action.
    pub fn index(self) -> Action {
        self as Action
    }

    /// Name used when rendering.
    pub fn name(self) -> &'static str {
        match self {
            LakeAction::Left => "Left",
            LakeAction::Down => "Down",
            LakeAction::Right => "Right",
            LakeAction::Up => "Up",
        }
    }

    /// Arrow used in policy maps.
    pub fn arrow(self) -> &'static str {
        match self {
            LakeAction::Left => "<",
            LakeAction::Down => "v",
            LakeAction::Right => ">",
            LakeAction::Up => "^",
        }
    }

    /// The intended direction and its two perpendicular directions.
    fn slips(self) -> [LakeAction; 3] {
        let a = self.index();
        [
            Self::ALL[(a + 3) % 4],
            self,
            Self::ALL[(a + 1) % 4],
        ]
    }
}

/// Configuration of [`FrozenLake`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct FrozenLakeConfig {
    /// Rows of the map, made of `S`, `F`, `H` and `G`.
    pub desc: Vec<String>,

    /// On a slippery lake, the agent moves in the intended direction or in
    /// either perpendicular direction, each with probability 1/3.
    pub is_slippery: bool,

    /// If given, episodes are truncated after this number of steps.
    pub max_steps: Option<usize>,
}

impl Default for FrozenLakeConfig {
    fn default() -> Self {
        Self::stochastic_4x4()
    }
}

impl FrozenLakeConfig {
    /// The reference 4x4 lake without slipping.
    pub fn deterministic_4x4() -> Self {
        Self {
            desc: MAP_4X4.iter().map(|row| row.to_string()).collect(),
            is_slippery: false,
            max_steps: None,
        }
    }

    /// The reference 4x4 slippery lake.
    pub fn stochastic_4x4() -> Self {
        Self::deterministic_4x4().is_slippery(true)
    }

    /// Sets the map.
    pub fn desc(mut self, v: Vec<String>) -> Self {
        self.desc = v;
        self
    }

    /// Sets whether the lake is slippery.
    pub fn is_slippery(mut self, v: bool) -> Self {
        self.is_slippery = v;
        self
    }

    /// Sets the number of steps after which episodes are truncated.
    pub fn max_steps(mut self, v: Option<usize>) -> Self {
        self.max_steps = v;
        self
    }

    /// Parses the map into rows of tiles.
    pub fn tiles(&self) -> Result<Vec<Vec<Tile>>, FloeError> {
        let tiles = self
            .desc
            .iter()
            .map(|row| row.chars().map(Tile::from_char).collect::<Result<Vec<_>, _>>())
            .collect::<Result<Vec<_>, _>>()?;

        let ncol = tiles.first().map_or(0, |row| row.len());
        if ncol == 0 {
            return Err(FloeError::InvalidModel("the map is empty".to_string()));
        }
        if let Some(row) = tiles.iter().find(|row| row.len() != ncol) {
            return Err(FloeError::ShapeMismatch {
                expected: vec![ncol],
                actual: vec![row.len()],
            });
        }
        if !tiles.iter().flatten().any(|t| *t == Tile::Start) {
            return Err(FloeError::InvalidModel(
                "the map has no starting cell".to_string(),
            ));
        }
        Ok(tiles)
    }

    /// Builds the transition model of the lake.
    pub fn to_discrete(&self) -> Result<DiscreteEnvConfig> {
        let tiles = self.tiles()?;
        let nrow = tiles.len();
        let ncol = tiles[0].len();
        let tiles: Vec<Tile> = tiles.into_iter().flatten().collect();

        let moved = |s: State, a: LakeAction| -> State {
            let (row, col) = (s / ncol, s % ncol);
            let (row, col) = match a {
                LakeAction::Left => (row, col.saturating_sub(1)),
                LakeAction::Down => ((row + 1).min(nrow - 1), col),
                LakeAction::Right => (row, (col + 1).min(ncol - 1)),
                LakeAction::Up => (row.saturating_sub(1), col),
            };
            row * ncol + col
        };
        let outcome = |prob: f64, s: State| {
            let tile = tiles[s];
            let reward = if tile == Tile::Goal { 1.0 } else { 0.0 };
            Outcome::new(prob, s, reward, tile.is_terminal())
        };

        let transitions = (0..tiles.len())
            .map(|s| {
                LakeAction::ALL
                    .iter()
                    .map(|&a| {
                        if tiles[s].is_terminal() {
                            vec![Outcome::new(1.0, s, 0.0, true)]
                        } else if self.is_slippery {
                            a.slips()
                                .iter()
                                .map(|&b| outcome(1.0 / 3.0, moved(s, b)))
                                .collect()
                        } else {
                            vec![outcome(1.0, moved(s, a))]
                        }
                    })
                    .collect()
            })
            .collect();

        let n_starts = tiles.iter().filter(|t| **t == Tile::Start).count();
        let isd = tiles
            .iter()
            .map(|t| {
                if *t == Tile::Start {
                    1.0 / n_starts as f64
                } else {
                    0.0
                }
            })
            .collect();

        Ok(DiscreteEnvConfig::new(transitions, isd).max_steps(self.max_steps))
    }

    /// Constructs [`FrozenLakeConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`FrozenLakeConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

/// The frozen-lake grid world.
///
/// The agent starts on `S` and walks on the frozen surface `F` towards the
/// goal `G`. Falling into a hole `H` or reaching the goal ends the episode;
/// the reward is 1 on reaching the goal and 0 otherwise. Moving into a wall
/// keeps the agent in place.
pub struct FrozenLake {
    nrow: usize,
    ncol: usize,
    tiles: Vec<Tile>,
    env: DiscreteEnv,
}

impl FrozenLake {
    /// The number of rows.
    pub fn nrow(&self) -> usize {
        self.nrow
    }

    /// The number of columns.
    pub fn ncol(&self) -> usize {
        self.ncol
    }

    /// Tile of the given state.
    pub fn tile(&self, s: State) -> Tile {
        self.tiles[s]
    }

    /// States with a hole.
    pub fn hole_states(&self) -> Vec<State> {
        self.tiles.iter().positions(|t| *t == Tile::Hole).collect()
    }

    /// States with a goal.
    pub fn goal_states(&self) -> Vec<State> {
        self.tiles.iter().positions(|t| *t == Tile::Goal).collect()
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.env.state()
    }

    /// The underlying discrete environment.
    pub fn discrete(&self) -> &DiscreteEnv {
        &self.env
    }
}

impl Env for FrozenLake {
    type Config = FrozenLakeConfig;

    fn build(config: &Self::Config, seed: i64) -> Result<Self> {
        let tiles = config.tiles()?;
        let nrow = tiles.len();
        let ncol = tiles[0].len();
        let env = DiscreteEnv::build(&config.to_discrete()?, seed)?;

        Ok(Self {
            nrow,
            ncol,
            tiles: tiles.into_iter().flatten().collect(),
            env,
        })
    }

    fn n_states(&self) -> usize {
        self.env.n_states()
    }

    fn n_actions(&self) -> usize {
        self.env.n_actions()
    }

    fn reset(&mut self) -> Result<State> {
        self.env.reset()
    }

    fn step(&mut self, a: Action) -> Result<(Step, Record)> {
        self.env.step(a)
    }

    /// Draws the map with the agent's cell highlighted, preceded by the
    /// latest action in parentheses.
    fn render(&self) -> Option<String> {
        let header = match self.env.last_action().and_then(|a| LakeAction::from_index(a).ok()) {
            Some(a) => format!("  ({})", a.name()),
            None => String::new(),
        };
        let state = self.state();
        let grid = self
            .tiles
            .chunks(self.ncol)
            .enumerate()
            .map(|(row, tiles)| {
                tiles
                    .iter()
                    .enumerate()
                    .map(|(col, t)| {
                        if row * self.ncol + col == state {
                            format!("\x1b[41m{}\x1b[0m", t.as_char())
                        } else {
                            t.as_char().to_string()
                        }
                    })
                    .join("")
            })
            .join("\n");

        Some(format!("{}\n{}\n", header, grid))
    }
}
