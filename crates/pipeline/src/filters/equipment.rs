//! Filter on required equipment.

use crate::error::Result;
use crate::traits::Filter;
use catalog::Workout;

/// Keeps workouts using at least one of the requested pieces of equipment.
pub struct EquipmentFilter {
    equipment: Vec<String>,
}

impl EquipmentFilter {
    /// Returns `None` for an empty list, which means no restriction.
    pub fn new(equipment: &[String]) -> Option<Self> {
        if equipment.is_empty() {
            return None;
        }
        Some(Self {
            equipment: equipment.to_vec(),
        })
    }
}

impl Filter for EquipmentFilter {
    fn name(&self) -> &str {
        "EquipmentFilter"
    }

    fn apply(&self, workouts: Vec<Workout>) -> Result<Vec<Workout>> {
        Ok(workouts
            .into_iter()
            .filter(|w| w.equipment.iter().any(|e| self.equipment.contains(e)))
            .collect())
    }
}
