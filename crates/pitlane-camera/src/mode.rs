//! Camera modes and their cycling order.

use serde::{Deserialize, Serialize};

/// Viewpoint relative to the vehicle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CameraMode {
    /// Trailing, behind and above.
    #[default]
    Follow,
    /// Ahead of the vehicle, looking back at it.
    Front,
    /// Straight above.
    Overhead,
    /// Beside the vehicle, perpendicular to its heading.
    Side,
    /// Driver's seat, looking down the heading.
    Cockpit,
}

impl CameraMode {
    /// Cycling order.
    pub const ORDER: [CameraMode; 5] = [
        CameraMode::Follow,
        CameraMode::Front,
        CameraMode::Overhead,
        CameraMode::Side,
        CameraMode::Cockpit,
    ];

    pub fn index(self) -> usize {
        match self {
            CameraMode::Follow => 0,
            CameraMode::Front => 1,
            CameraMode::Overhead => 2,
            CameraMode::Side => 3,
            CameraMode::Cockpit => 4,
        }
    }

    /// The mode after this one, wrapping around.
    #[must_use]
    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    /// Display label for HUDs and buttons.
    pub fn label(self) -> &'static str {
        match self {
            CameraMode::Follow => "Third Person",
            CameraMode::Front => "Front View",
            CameraMode::Overhead => "Top Down",
            CameraMode::Side => "Side View",
            CameraMode::Cockpit => "Cockpit",
        }
    }

    /// Parse a mode from its lowercase name (`"follow"`, `"front"`, `"overhead"`
    /// or `"top"`, `"side"`, `"cockpit"`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "follow" => Some(CameraMode::Follow),
            "front" => Some(CameraMode::Front),
            "overhead" | "top" => Some(CameraMode::Overhead),
            "side" => Some(CameraMode::Side),
            "cockpit" => Some(CameraMode::Cockpit),
            _ => None,
        }
    }
}

impl std::fmt::Display for CameraMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
