//! Selectable vehicles. Entries pick the visual model only; every vehicle
//! shares the same tuning.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub id: String,
    pub name: String,
    /// Model asset path, relative to the asset root.
    pub model: String,
    /// Display-only figure for the selection screen.
    #[serde(default)]
    pub top_speed_kmh: u32,
}

impl VehicleSpec {
    pub fn new(id: &str, name: &str, model: &str, top_speed_kmh: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            model: model.to_string(),
            top_speed_kmh,
        }
    }
}

/// Vehicle list plus the current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleCatalog {
    pub vehicles: Vec<VehicleSpec>,
    pub selected: String,
}

impl Default for VehicleCatalog {
    fn default() -> Self {
        Self {
            vehicles: vec![
                VehicleSpec::new("car1", "BMW I8", "models/car.glb", 400),
                VehicleSpec::new("car2", "Racing Car", "models/car_1223.glb", 300),
            ],
            selected: "car1".to_string(),
        }
    }
}

impl VehicleCatalog {
    pub fn get(&self, id: &str) -> Option<&VehicleSpec> {
        self.vehicles.iter().find(|v| v.id == id)
    }

    /// The selected vehicle, or the first entry when the selection is unknown.
    pub fn selected(&self) -> Option<&VehicleSpec> {
        self.get(&self.selected).or_else(|| self.vehicles.first())
    }

    /// Select `id`. Returns `false` and keeps the old selection if unknown.
    pub fn select(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            return false;
        }
        self.selected = id.to_string();
        true
    }
}
