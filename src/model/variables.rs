//! Binary decision variables.

use crate::catalog::{PlayerCatalog, PlayerId};
use crate::error::LineupError;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Dense index of a decision variable within its model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VarId(pub usize);

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// A 0/1 variable: "is this player in the lineup".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionVariable {
    /// Index within the model.
    pub id: VarId,
    /// Player the variable selects.
    pub player: PlayerId,
    /// Player name, for display only.
    pub name: String,
}

/// One binary variable per catalog entry.
///
/// Variables are keyed by [`PlayerId`]; their [`VarId`]s follow catalog
/// order, so `VarId(i)` selects the i-th player.
#[derive(Debug, Clone, Default)]
pub struct DecisionVariableSet {
    vars: Vec<DecisionVariable>,
    by_player: HashMap<PlayerId, VarId>,
}

impl DecisionVariableSet {
    /// Creates one variable per player.
    ///
    /// Fails on a repeated [`PlayerId`]. When `unique_names` is set, a
    /// repeated player name is rejected too.
    pub fn from_catalog(catalog: &PlayerCatalog, unique_names: bool) -> Result<Self, LineupError> {
        let mut vars = Vec::with_capacity(catalog.len());
        let mut by_player = HashMap::with_capacity(catalog.len());
        let mut names: HashSet<&str> = HashSet::with_capacity(catalog.len());

        for (i, player) in catalog.iter().enumerate() {
            let id = VarId(i);
            if by_player.insert(player.id, id).is_some() {
                return Err(LineupError::DuplicateVariable {
                    key: player.id.to_string(),
                });
            }
            if unique_names && !names.insert(player.name.as_str()) {
                return Err(LineupError::DuplicateVariable {
                    key: player.name.clone(),
                });
            }
            vars.push(DecisionVariable {
                id,
                player: player.id,
                name: player.name.clone(),
            });
        }

        Ok(Self { vars, by_player })
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DecisionVariable> {
        self.vars.iter()
    }

    pub fn get(&self, id: VarId) -> Option<&DecisionVariable> {
        self.vars.get(id.0)
    }

    /// The variable selecting `player`, if any.
    pub fn by_player(&self, player: PlayerId) -> Option<VarId> {
        self.by_player.get(&player).copied()
    }
}
