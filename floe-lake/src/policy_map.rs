use crate::{FrozenLake, LakeAction, Tile};
use anyhow::Result;
use floe_core::{error::FloeError, DeterministicPolicy};
use itertools::Itertools;

/// Draws a deterministic policy on the lake.
///
/// Each cell holds the arrow of the action taken there (`<`, `v`, `>`, `^`),
/// or `HOLE` and `GOAL` on the terminal cells.
pub fn draw_policy_map(policy: &DeterministicPolicy, lake: &FrozenLake) -> Result<Vec<Vec<String>>> {
    let n_states = lake.nrow() * lake.ncol();
    if policy.n_states() != n_states {
        return Err(FloeError::ShapeMismatch {
            expected: vec![n_states],
            actual: vec![policy.n_states()],
        }
        .into());
    }

    let cells = policy
        .actions()
        .iter()
        .enumerate()
        .map(|(s, &a)| {
            Ok(match lake.tile(s) {
                Tile::Hole => "HOLE".to_string(),
                Tile::Goal => "GOAL".to_string(),
                _ => LakeAction::from_index(a)?.arrow().to_string(),
            })
        })
        .collect::<Result<Vec<_>, FloeError>>()?;

    Ok(cells.chunks(lake.ncol()).map(|row| row.to_vec()).collect())
}

/// Formats a policy map with one line per row of the lake.
pub fn format_policy_map(map: &[Vec<String>]) -> String {
    map.iter()
        .map(|row| row.iter().map(|cell| format!("{:>4}", cell)).join(" "))
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FrozenLakeConfig;
    use floe_core::Env;

    #[test]
    fn test_draw_policy_map() -> Result<()> {
        let lake = FrozenLake::build(&FrozenLakeConfig::default(), 0)?;
        let policy = DeterministicPolicy::new(
            vec![2, 2, 1, 0, 1, 3, 1, 0, 0, 0, 1, 0, 0, 2, 2, 0],
            4,
        )?;
        let map = draw_policy_map(&policy, &lake)?;
        assert_eq!(map[0], vec![">", ">", "v", "<"]);
        assert_eq!(map[1], vec!["v", "^", "v", "HOLE"]);
        assert_eq!(map[2], vec!["<", "HOLE", "v", "<"]);
        assert_eq!(map[3], vec!["HOLE", ">", ">", "GOAL"]);

        let text = format_policy_map(&map);
        assert_eq!(text.lines().count(), 4);
        assert_eq!(text.lines().last(), Some("HOLE    >    > GOAL"));
        Ok(())
    }

    #[test]
    fn test_size_mismatch() -> Result<()> {
        let lake = FrozenLake::build(&FrozenLakeConfig::default(), 0)?;
        let policy = DeterministicPolicy::new(vec![0; 4], 4)?;
        assert!(draw_policy_map(&policy, &lake).is_err());
        Ok(())
    }
}
