use crate::env::{BoardState, OracleError};
use crate::types::{BuildingId, Coords};

/// Building absorption for one group of damage requests.
///
/// The budget is `ceil(CF / 10)` measured once when the pass opens; each
/// request then absorbs `min(remaining budget, amount, current CF)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbsorptionPass {
    hex: Coords,
    building: Option<BuildingId>,
    budget: u32,
}

/// Damage taken by the building from one request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Absorption {
    pub absorbed: u32,
    pub building: Option<BuildingId>,
    /// The building reached CF 0 on this request.
    pub collapsed: bool,
}

impl AbsorptionPass {
    pub fn open(hex: Coords, board: &dyn BoardState) -> Self {
        match board.building_at(hex) {
            Some(info) => Self {
                hex,
                building: Some(info.id),
                budget: info.cf.div_ceil(10),
            },
            None => Self::none(hex),
        }
    }

    /// A pass with nothing to absorb.
    pub fn none(hex: Coords) -> Self {
        Self {
            hex,
            building: None,
            budget: 0,
        }
    }

    pub fn hex(&self) -> Coords {
        self.hex
    }

    pub fn remaining_budget(&self) -> u32 {
        self.budget
    }

    pub fn absorb(
        &mut self,
        amount: u32,
        board: &mut dyn BoardState,
    ) -> Result<Absorption, OracleError> {
        let Some(building) = self.building else {
            return Ok(Absorption::default());
        };
        // A collapsed building no longer reports a CF for the hex.
        let cf = board.building_at(self.hex).map_or(0, |info| info.cf);
        let absorbed = self.budget.min(amount).min(cf);
        if absorbed == 0 {
            return Ok(Absorption::default());
        }

        self.budget -= absorbed;
        let remaining_cf = board.damage_building(building, absorbed)?;
        Ok(Absorption {
            absorbed,
            building: Some(building),
            collapsed: remaining_cf == 0,
        })
    }
}
