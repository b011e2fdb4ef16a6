//! Driving controls and their physical key bindings.
//!
//! [`ControlMap`] decides which keys drive which [`Control`]. It is
//! serializable to RON so players can edit `controls.ron`, and supports
//! name-based overrides coming from the main config file.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::warn;
use winit::keyboard::KeyCode;

/// Serde helper module for [`KeyCode`], which has no serde support without
/// winit's `serde` feature.
mod keycode_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use winit::keyboard::KeyCode;

    /// Serialize a [`KeyCode`] as its debug string (e.g., `"KeyW"`).
    pub fn serialize<S: Serializer>(code: &KeyCode, s: S) -> Result<S::Ok, S::Error> {
        format!("{code:?}").serialize(s)
    }

    /// Deserialize a [`KeyCode`] from its debug string.
    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<KeyCode, D::Error> {
        let name = String::deserialize(d)?;
        super::key_from_name(&name)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown key: {name}")))
    }
}

/// Look up a [`KeyCode`] by its debug name (`"KeyW"`, `"ShiftLeft"`, `"Space"`).
#[must_use]
pub fn key_from_name(s: &str) -> Option<KeyCode> {
    Some(match s {
        "KeyA" => KeyCode::KeyA,
        "KeyB" => KeyCode::KeyB,
        "KeyC" => KeyCode::KeyC,
        "KeyD" => KeyCode::KeyD,
        "KeyE" => KeyCode::KeyE,
        "KeyF" => KeyCode::KeyF,
        "KeyG" => KeyCode::KeyG,
        "KeyH" => KeyCode::KeyH,
        "KeyI" => KeyCode::KeyI,
        "KeyJ" => KeyCode::KeyJ,
        "KeyK" => KeyCode::KeyK,
        "KeyL" => KeyCode::KeyL,
        "KeyM" => KeyCode::KeyM,
        "KeyN" => KeyCode::KeyN,
        "KeyO" => KeyCode::KeyO,
        "KeyP" => KeyCode::KeyP,
        "KeyQ" => KeyCode::KeyQ,
        "KeyR" => KeyCode::KeyR,
        "KeyS" => KeyCode::KeyS,
        "KeyT" => KeyCode::KeyT,
        "KeyU" => KeyCode::KeyU,
        "KeyV" => KeyCode::KeyV,
        "KeyW" => KeyCode::KeyW,
        "KeyX" => KeyCode::KeyX,
        "KeyY" => KeyCode::KeyY,
        "KeyZ" => KeyCode::KeyZ,
        "Digit0" => KeyCode::Digit0,
        "Digit1" => KeyCode::Digit1,
        "Digit2" => KeyCode::Digit2,
        "Digit3" => KeyCode::Digit3,
        "Digit4" => KeyCode::Digit4,
        "Digit5" => KeyCode::Digit5,
        "Digit6" => KeyCode::Digit6,
        "Digit7" => KeyCode::Digit7,
        "Digit8" => KeyCode::Digit8,
        "Digit9" => KeyCode::Digit9,
        "Space" => KeyCode::Space,
        "Enter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        "ShiftLeft" => KeyCode::ShiftLeft,
        "ShiftRight" => KeyCode::ShiftRight,
        "ControlLeft" => KeyCode::ControlLeft,
        "ControlRight" => KeyCode::ControlRight,
        "AltLeft" => KeyCode::AltLeft,
        "AltRight" => KeyCode::AltRight,
        "ArrowUp" => KeyCode::ArrowUp,
        "ArrowDown" => KeyCode::ArrowDown,
        "ArrowLeft" => KeyCode::ArrowLeft,
        "ArrowRight" => KeyCode::ArrowRight,
        _ => return None,
    })
}

/// Errors from writing a control file.
#[derive(Debug, thiserror::Error)]
pub enum ControlsError {
    #[error("failed to serialize controls: {0}")]
    Serialize(#[from] ron::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
}

/// The fixed set of driving controls.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Control {
    /// Throttle.
    Forward,
    /// Reverse.
    Backward,
    /// Steer left.
    Left,
    /// Steer right.
    Right,
    /// Raise the speed cap and acceleration.
    Boost,
    /// Handbrake.
    Brake,
    /// Advance to the next camera mode. Edge-triggered.
    CameraCycle,
}

impl Control {
    /// Every control, in declaration order.
    pub const ALL: [Control; 7] = [
        Control::Forward,
        Control::Backward,
        Control::Left,
        Control::Right,
        Control::Boost,
        Control::Brake,
        Control::CameraCycle,
    ];

    /// Controls that fire once per physical press rather than every tick.
    #[must_use]
    pub fn is_edge_triggered(self) -> bool {
        matches!(self, Control::CameraCycle)
    }

    /// Config-file name of the control.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Control::Forward => "forward",
            Control::Backward => "backward",
            Control::Left => "left",
            Control::Right => "right",
            Control::Boost => "boost",
            Control::Brake => "brake",
            Control::CameraCycle => "camera_cycle",
        }
    }

    /// Inverse of [`name`](Self::name).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

/// A single key bound to a control.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBinding(#[serde(with = "keycode_serde")] pub KeyCode);

/// A key shared by more than one control.
#[derive(Debug, Clone)]
pub struct Conflict {
    /// The duplicated key.
    pub key: KeyCode,
    /// Controls that share it.
    pub controls: Vec<Control>,
}

/// Maps [`Control`]s to lists of keys. Any bound key holds the control.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlMap {
    /// The binding table.
    pub bindings: HashMap<Control, Vec<KeyBinding>>,
}

impl Default for ControlMap {
    fn default() -> Self {
        Self::default_driving()
    }
}

impl ControlMap {
    /// Create an empty map with no bindings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// WASD + arrows, Shift boost, Space handbrake, C camera.
    #[must_use]
    pub fn default_driving() -> Self {
        let mut map = Self::new();
        map.set_keys(Control::Forward, &[KeyCode::KeyW, KeyCode::ArrowUp]);
        map.set_keys(Control::Backward, &[KeyCode::KeyS, KeyCode::ArrowDown]);
        map.set_keys(Control::Left, &[KeyCode::KeyA, KeyCode::ArrowLeft]);
        map.set_keys(Control::Right, &[KeyCode::KeyD, KeyCode::ArrowRight]);
        map.set_keys(Control::Boost, &[KeyCode::ShiftLeft, KeyCode::ShiftRight]);
        map.set_keys(Control::Brake, &[KeyCode::Space]);
        map.set_keys(Control::CameraCycle, &[KeyCode::KeyC]);
        map
    }

    /// Replace the keys bound to `control`.
    pub fn set_keys(&mut self, control: Control, keys: &[KeyCode]) {
        self.bindings
            .insert(control, keys.iter().copied().map(KeyBinding).collect());
    }

    /// Keys bound to `control`.
    #[must_use]
    pub fn keys(&self, control: Control) -> &[KeyBinding] {
        self.bindings.get(&control).map_or(&[], |v| v.as_slice())
    }

    /// Controls that `key` drives. Usually zero or one.
    pub fn controls_for(&self, key: KeyCode) -> impl Iterator<Item = Control> + '_ {
        self.bindings
            .iter()
            .filter(move |(_, keys)| keys.contains(&KeyBinding(key)))
            .map(|(control, _)| *control)
    }

    /// Whether `key` is bound to any control.
    #[must_use]
    pub fn is_bound(&self, key: KeyCode) -> bool {
        self.controls_for(key).next().is_some()
    }

    /// Apply `control name -> key name` overrides from the config file.
    ///
    /// Each override replaces the control's keys with the single named key.
    /// Unknown control or key names are skipped with a warning. Returns the
    /// number of overrides applied.
    pub fn apply_overrides(&mut self, overrides: &HashMap<String, String>) -> usize {
        let mut applied = 0;
        for (control_name, key_name) in overrides {
            let Some(control) = Control::from_name(control_name) else {
                warn!("Unknown control '{control_name}' in keybinding overrides");
                continue;
            };
            let Some(key) = key_from_name(key_name) else {
                warn!("Unknown key '{key_name}' for control '{control_name}'");
                continue;
            };
            self.set_keys(control, &[key]);
            applied += 1;
        }
        applied
    }

    /// Every key used by more than one control.
    #[must_use]
    pub fn detect_conflicts(&self) -> Vec<Conflict> {
        let mut seen: HashMap<KeyCode, Vec<Control>> = HashMap::new();
        for (control, keys) in &self.bindings {
            for binding in keys {
                let controls = seen.entry(binding.0).or_default();
                if !controls.contains(control) {
                    controls.push(*control);
                }
            }
        }
        seen.into_iter()
            .filter(|(_, controls)| controls.len() > 1)
            .map(|(key, controls)| Conflict { key, controls })
            .collect()
    }

    /// Serialize to RON string.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Deserialize from RON string.
    ///
    /// # Errors
    /// Returns an error if the RON string is malformed.
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Save the map to a RON file at `path`.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save(&self, path: &Path) -> Result<(), ControlsError> {
        let contents = self.to_ron()?;
        let write_err = |source| ControlsError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(path, contents).map_err(write_err)?;
        Ok(())
    }

    /// Load a map from a RON file at `path`.
    ///
    /// Falls back to [`ControlMap::default`] if the file is missing or
    /// malformed, logging a warning in either case.
    #[must_use]
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_ron(&contents) {
                Ok(map) => map,
                Err(e) => {
                    warn!(
                        "Malformed control file {}: {e}; using defaults",
                        path.display()
                    );
                    Self::default()
                }
            },
            Err(e) => {
                warn!(
                    "Could not read control file {}: {e}; using defaults",
                    path.display()
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_map_binds_every_control() {
        let map = ControlMap::default();
        for control in Control::ALL {
            assert!(!map.keys(control).is_empty(), "{control:?} unbound");
        }
    }

    #[test]
    fn test_default_map_has_no_conflicts() {
        assert!(ControlMap::default().detect_conflicts().is_empty());
    }

    #[test]
    fn test_only_camera_cycle_is_edge_triggered() {
        let edge: Vec<_> = Control::ALL
            .into_iter()
            .filter(|c| c.is_edge_triggered())
            .collect();
        assert_eq!(edge, vec![Control::CameraCycle]);
    }

    #[test]
    fn test_name_round_trip() {
        for control in Control::ALL {
            assert_eq!(Control::from_name(control.name()), Some(control));
        }
        assert_eq!(Control::from_name("jump"), None);
    }

    #[test]
    fn test_controls_for_key() {
        let map = ControlMap::default();
        let controls: Vec<_> = map.controls_for(KeyCode::Space).collect();
        assert_eq!(controls, vec![Control::Brake]);
        assert!(!map.is_bound(KeyCode::KeyQ));
    }

    #[test]
    fn test_ron_round_trip_preserves_bindings() {
        let original = ControlMap::default();
        let ron_str = original.to_ron().expect("serialize");
        assert!(ron_str.contains("KeyW"));
        let restored = ControlMap::from_ron(&ron_str).expect("deserialize");
        for control in Control::ALL {
            assert_eq!(original.keys(control), restored.keys(control));
        }
    }

    #[test]
    fn test_unknown_key_name_fails_to_parse() {
        let result = ControlMap::from_ron(r#"(bindings: {Brake: ["Hyper"]})"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_overrides_replace_keys() {
        let mut map = ControlMap::default();
        let mut overrides = HashMap::new();
        overrides.insert("boost".to_string(), "ControlLeft".to_string());
        overrides.insert("warp".to_string(), "KeyX".to_string());
        overrides.insert("brake".to_string(), "NotAKey".to_string());

        assert_eq!(map.apply_overrides(&overrides), 1);
        assert_eq!(map.keys(Control::Boost), &[KeyBinding(KeyCode::ControlLeft)]);
        assert_eq!(map.keys(Control::Brake), &[KeyBinding(KeyCode::Space)]);
    }

    #[test]
    fn test_conflict_detection_flags_shared_key() {
        let mut map = ControlMap::new();
        map.set_keys(Control::Brake, &[KeyCode::Space]);
        map.set_keys(Control::Boost, &[KeyCode::Space]);
        let conflicts = map.detect_conflicts();
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].key, KeyCode::Space);
        assert_eq!(conflicts[0].controls.len(), 2);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("controls.ron");
        let mut map = ControlMap::default();
        map.set_keys(Control::CameraCycle, &[KeyCode::KeyV]);
        map.save(&path).unwrap();

        let loaded = ControlMap::load(&path);
        assert_eq!(loaded.keys(Control::CameraCycle), &[KeyBinding(KeyCode::KeyV)]);
    }

    #[test]
    fn test_save_into_file_parent_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let err = ControlMap::default()
            .save(&blocker.join("controls.ron"))
            .unwrap_err();
        assert!(matches!(err, ControlsError::Write { .. }));
    }

    #[test]
    fn test_load_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ControlMap::load(&dir.path().join("absent.ron"));
        assert_eq!(
            loaded.keys(Control::Forward),
            ControlMap::default().keys(Control::Forward)
        );
    }

    #[test]
    fn test_load_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controls.ron");
        std::fs::write(&path, "{{ nope").unwrap();
        let loaded = ControlMap::load(&path);
        assert!(!loaded.keys(Control::Brake).is_empty());
    }
}
