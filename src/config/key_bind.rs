//! Key binding map for the cabinet's logical inputs
//!
//! Each JVS-facing role (test/service switches, directions, panel buttons)
//! is bound to a Linux input-event code or left unbound. Bindings are
//! written to disk as evdev names (`"KEY_F1"`, `"BTN_SOUTH"`). Integer codes
//! are also accepted on load; they are Linux input-event codes, not Windows
//! virtual-key codes.

use evdev::KeyCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::constants::defaults::keys;
use crate::constants::input::{UNBOUND, UNBOUND_NAME};
use crate::error::ConfigError;

/// Logical input roles, in cabinet panel order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputRole {
    Test,
    Start,
    Service,
    Up,
    Left,
    Down,
    Right,
    Button1,
    Button2,
    Button3,
    Button4,
    ArcadeButton1,
    ArcadeButton2,
    ArcadeButton3,
    ArcadeButton4,
    ArcadeStartButton,
}

impl InputRole {
    pub const ALL: [InputRole; 16] = [
        InputRole::Test,
        InputRole::Start,
        InputRole::Service,
        InputRole::Up,
        InputRole::Left,
        InputRole::Down,
        InputRole::Right,
        InputRole::Button1,
        InputRole::Button2,
        InputRole::Button3,
        InputRole::Button4,
        InputRole::ArcadeButton1,
        InputRole::ArcadeButton2,
        InputRole::ArcadeButton3,
        InputRole::ArcadeButton4,
        InputRole::ArcadeStartButton,
    ];

    /// Key of this role inside the `key_bind` object
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Start => "start",
            Self::Service => "service",
            Self::Up => "up",
            Self::Left => "left",
            Self::Down => "down",
            Self::Right => "right",
            Self::Button1 => "button1",
            Self::Button2 => "button2",
            Self::Button3 => "button3",
            Self::Button4 => "button4",
            Self::ArcadeButton1 => "arcade_button1",
            Self::ArcadeButton2 => "arcade_button2",
            Self::ArcadeButton3 => "arcade_button3",
            Self::ArcadeButton4 => "arcade_button4",
            Self::ArcadeStartButton => "arcade_start_button",
        }
    }

    /// Human-readable name (for CLI output)
    pub fn label(self) -> &'static str {
        match self {
            Self::Test => "Test",
            Self::Start => "Start",
            Self::Service => "Service",
            Self::Up => "Up",
            Self::Left => "Left",
            Self::Down => "Down",
            Self::Right => "Right",
            Self::Button1 => "Button 1",
            Self::Button2 => "Button 2",
            Self::Button3 => "Button 3",
            Self::Button4 => "Button 4",
            Self::ArcadeButton1 => "Arcade Button 1",
            Self::ArcadeButton2 => "Arcade Button 2",
            Self::ArcadeButton3 => "Arcade Button 3",
            Self::ArcadeButton4 => "Arcade Button 4",
            Self::ArcadeStartButton => "Arcade Start",
        }
    }

    /// Binding used when the role is absent from the document
    pub fn default_code(self) -> InputCode {
        let code = match self {
            Self::Test => keys::TEST,
            Self::Start => keys::START,
            Self::Service => keys::SERVICE,
            Self::Up => keys::UP,
            Self::Left => keys::LEFT,
            Self::Down => keys::DOWN,
            Self::Right => keys::RIGHT,
            Self::Button1 => keys::BUTTON1,
            Self::Button2 => keys::BUTTON2,
            Self::Button3 => keys::BUTTON3,
            Self::Button4 => keys::BUTTON4,
            Self::ArcadeButton1 => keys::ARCADE_BUTTON1,
            Self::ArcadeButton2 => keys::ARCADE_BUTTON2,
            Self::ArcadeButton3 => keys::ARCADE_BUTTON3,
            Self::ArcadeButton4 => keys::ARCADE_BUTTON4,
            Self::ArcadeStartButton => keys::ARCADE_START_BUTTON,
        };
        InputCode::from_code(code).unwrap_or_default()
    }
}

/// A physical input assigned to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputCode {
    /// No key assigned (KEY_RESERVED / code 0)
    #[default]
    Unbound,
    /// An evdev key or button code known to the kernel headers
    Key(KeyCode),
}

impl InputCode {
    /// Build from a raw event code. Returns `None` for codes evdev does not name.
    pub fn from_code(code: u16) -> Option<Self> {
        if code == UNBOUND {
            return Some(Self::Unbound);
        }
        let key = KeyCode(code);
        is_known(key).then_some(Self::Key(key))
    }

    /// Build from an evdev name (`KEY_*` / `BTN_*`), or `""` / `UNBOUND` for no key
    pub fn from_name(name: &str) -> Option<Self> {
        if name.is_empty() || name.eq_ignore_ascii_case(UNBOUND_NAME) {
            return Some(Self::Unbound);
        }
        KeyCode::from_str(name)
            .ok()
            .and_then(|key| Self::from_code(key.code()))
    }

    /// Raw event code (0 when unbound)
    pub fn code(self) -> u16 {
        match self {
            Self::Unbound => UNBOUND,
            Self::Key(key) => key.code(),
        }
    }

    pub fn is_bound(self) -> bool {
        matches!(self, Self::Key(_))
    }

    /// evdev name, e.g. `KEY_F1`
    pub fn evdev_name(self) -> Option<String> {
        match self {
            Self::Unbound => None,
            Self::Key(key) => Some(format!("{:?}", key)),
        }
    }

    /// Get human-readable display name for this binding (for CLI output)
    pub fn display_name(self) -> String {
        match self {
            Self::Unbound => "Unbound".to_string(),
            Self::Key(key) => key_code_to_name(key.code()),
        }
    }
}

impl Serialize for InputCode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.evdev_name() {
            Some(name) => serializer.serialize_str(&name),
            None => serializer.serialize_none(),
        }
    }
}

/// Check one on-disk key value against evdev
///
/// Accepts `null`, an integer event code, or a key name. Anything else,
/// including negative, fractional or out-of-range numbers, is reported
/// against the role.
fn resolve(role: InputRole, value: &Value) -> Result<InputCode, ConfigError> {
    let resolved = match value {
        Value::Null => Some(InputCode::Unbound),
        Value::Number(number) => number
            .as_u64()
            .and_then(|code| u16::try_from(code).ok())
            .and_then(InputCode::from_code),
        Value::String(name) => InputCode::from_name(name),
        _ => None,
    };

    resolved.ok_or_else(|| ConfigError::InvalidKeyBind {
        role: role.field_name(),
        value: value.to_string(),
    })
}

/// Wraps a present value in `Some` so that `null` is kept apart from an absent field
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// On-disk form of [`KeyBind`]. Absent roles fall back to their defaults;
/// unknown role names are rejected so a misspelt role is not silently ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct RawKeyBind {
    #[serde(default, deserialize_with = "present", alias = "Test")]
    test: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Start")]
    start: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Service")]
    service: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Up")]
    up: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Left")]
    left: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Down")]
    down: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Right")]
    right: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Button1")]
    button1: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Button2")]
    button2: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Button3")]
    button3: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "Button4")]
    button4: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "ArcadeButton1")]
    arcade_button1: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "ArcadeButton2")]
    arcade_button2: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "ArcadeButton3")]
    arcade_button3: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "ArcadeButton4")]
    arcade_button4: Option<Value>,
    #[serde(default, deserialize_with = "present", alias = "ArcadeStartButton")]
    arcade_start_button: Option<Value>,
}

/// Physical binding for every logical role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyBind {
    pub test: InputCode,
    pub start: InputCode,
    pub service: InputCode,
    pub up: InputCode,
    pub left: InputCode,
    pub down: InputCode,
    pub right: InputCode,
    pub button1: InputCode,
    pub button2: InputCode,
    pub button3: InputCode,
    pub button4: InputCode,
    pub arcade_button1: InputCode,
    pub arcade_button2: InputCode,
    pub arcade_button3: InputCode,
    pub arcade_button4: InputCode,
    pub arcade_start_button: InputCode,
}

impl TryFrom<RawKeyBind> for KeyBind {
    type Error = ConfigError;

    fn try_from(raw: RawKeyBind) -> Result<Self, Self::Error> {
        let bind = |role: InputRole, value: Option<Value>| match value {
            Some(value) => resolve(role, &value),
            None => Ok(role.default_code()),
        };

        Ok(Self {
            test: bind(InputRole::Test, raw.test)?,
            start: bind(InputRole::Start, raw.start)?,
            service: bind(InputRole::Service, raw.service)?,
            up: bind(InputRole::Up, raw.up)?,
            left: bind(InputRole::Left, raw.left)?,
            down: bind(InputRole::Down, raw.down)?,
            right: bind(InputRole::Right, raw.right)?,
            button1: bind(InputRole::Button1, raw.button1)?,
            button2: bind(InputRole::Button2, raw.button2)?,
            button3: bind(InputRole::Button3, raw.button3)?,
            button4: bind(InputRole::Button4, raw.button4)?,
            arcade_button1: bind(InputRole::ArcadeButton1, raw.arcade_button1)?,
            arcade_button2: bind(InputRole::ArcadeButton2, raw.arcade_button2)?,
            arcade_button3: bind(InputRole::ArcadeButton3, raw.arcade_button3)?,
            arcade_button4: bind(InputRole::ArcadeButton4, raw.arcade_button4)?,
            arcade_start_button: bind(InputRole::ArcadeStartButton, raw.arcade_start_button)?,
        })
    }
}

impl Default for KeyBind {
    fn default() -> Self {
        Self {
            test: InputRole::Test.default_code(),
            start: InputRole::Start.default_code(),
            service: InputRole::Service.default_code(),
            up: InputRole::Up.default_code(),
            left: InputRole::Left.default_code(),
            down: InputRole::Down.default_code(),
            right: InputRole::Right.default_code(),
            button1: InputRole::Button1.default_code(),
            button2: InputRole::Button2.default_code(),
            button3: InputRole::Button3.default_code(),
            button4: InputRole::Button4.default_code(),
            arcade_button1: InputRole::ArcadeButton1.default_code(),
            arcade_button2: InputRole::ArcadeButton2.default_code(),
            arcade_button3: InputRole::ArcadeButton3.default_code(),
            arcade_button4: InputRole::ArcadeButton4.default_code(),
            arcade_start_button: InputRole::ArcadeStartButton.default_code(),
        }
    }
}

impl KeyBind {
    /// Binding for a single role
    pub fn get(&self, role: InputRole) -> InputCode {
        match role {
            InputRole::Test => self.test,
            InputRole::Start => self.start,
            InputRole::Service => self.service,
            InputRole::Up => self.up,
            InputRole::Left => self.left,
            InputRole::Down => self.down,
            InputRole::Right => self.right,
            InputRole::Button1 => self.button1,
            InputRole::Button2 => self.button2,
            InputRole::Button3 => self.button3,
            InputRole::Button4 => self.button4,
            InputRole::ArcadeButton1 => self.arcade_button1,
            InputRole::ArcadeButton2 => self.arcade_button2,
            InputRole::ArcadeButton3 => self.arcade_button3,
            InputRole::ArcadeButton4 => self.arcade_button4,
            InputRole::ArcadeStartButton => self.arcade_start_button,
        }
    }

    /// All roles with their bindings, in panel order
    pub fn iter(&self) -> impl Iterator<Item = (InputRole, InputCode)> + '_ {
        InputRole::ALL.into_iter().map(|role| (role, self.get(role)))
    }

    /// Bound codes shared by more than one role, ordered by key code.
    /// Unbound roles never count as duplicates.
    pub fn duplicates(&self) -> Vec<(InputCode, Vec<InputRole>)> {
        let mut by_code: BTreeMap<u16, (InputCode, Vec<InputRole>)> = BTreeMap::new();
        for (role, code) in self.iter().filter(|(_, code)| code.is_bound()) {
            by_code
                .entry(code.code())
                .or_insert_with(|| (code, Vec::new()))
                .1
                .push(role);
        }

        by_code
            .into_values()
            .filter(|(_, roles)| roles.len() > 1)
            .collect()
    }
}

fn is_known(key: KeyCode) -> bool {
    // evdev's Debug output is the kernel name for known codes and
    // "unknown key: N" otherwise, which never parses back
    KeyCode::from_str(&format!("{:?}", key)).is_ok()
}

/// Convert evdev key code to human-readable name (for CLI output)
pub fn key_code_to_name(code: u16) -> String {
    let linux_name = format!("{:?}", KeyCode(code));

    if let Some(button) = linux_name.strip_prefix("BTN_") {
        return format!("Button {}", title_case(button));
    }

    let name = linux_name.strip_prefix("KEY_").unwrap_or(&linux_name);
    match name {
        "LEFTCTRL" => "Left Ctrl".to_string(),
        "RIGHTCTRL" => "Right Ctrl".to_string(),
        "LEFTSHIFT" => "Left Shift".to_string(),
        "RIGHTSHIFT" => "Right Shift".to_string(),
        "LEFTALT" => "Left Alt".to_string(),
        "RIGHTALT" => "Right Alt".to_string(),
        "ESC" => "Esc".to_string(),
        "ENTER" => "Enter".to_string(),
        "SPACE" => "Space".to_string(),
        "PAGEUP" => "Page Up".to_string(),
        "PAGEDOWN" => "Page Down".to_string(),
        s if s.starts_with("KP") => format!("Numpad {}", title_case(&s[2..])),
        s if s.len() == 1 => s.to_string(),
        s if s.starts_with('F') && s.len() <= 3 => s.to_string(),
        s => title_case(s),
    }
}

fn title_case(s: &str) -> String {
    s.replace('_', " ")
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.as_str().to_lowercase().chars())
                    .collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(code: u16) -> InputCode {
        InputCode::from_code(code).unwrap()
    }

    #[test]
    fn test_zero_is_unbound() {
        assert_eq!(InputCode::from_code(0), Some(InputCode::Unbound));
        assert_eq!(InputCode::Unbound.code(), 0);
        assert!(!InputCode::Unbound.is_bound());
    }

    #[test]
    fn test_from_code_rejects_unknown() {
        assert!(InputCode::from_code(9999).is_none());
        assert_eq!(key(59).code(), 59);
        assert!(key(59).is_bound());
    }

    #[test]
    fn test_from_name() {
        assert_eq!(InputCode::from_name("KEY_F1"), Some(key(59)));
        assert_eq!(InputCode::from_name("KEY_TAB"), Some(key(15)));
        assert_eq!(InputCode::from_name("UNBOUND"), Some(InputCode::Unbound));
        assert_eq!(InputCode::from_name("unbound"), Some(InputCode::Unbound));
        assert_eq!(InputCode::from_name(""), Some(InputCode::Unbound));
        assert_eq!(InputCode::from_name("KEY_RESERVED"), Some(InputCode::Unbound));
        assert_eq!(InputCode::from_name("NOT_A_KEY"), None);
    }

    #[test]
    fn test_gamepad_button_names_roundtrip() {
        let south = InputCode::from_name("BTN_SOUTH").unwrap();
        assert!(south.is_bound());
        let name = south.evdev_name().unwrap();
        assert_eq!(InputCode::from_name(&name), Some(south));
        assert!(south.display_name().starts_with("Button "));
    }

    #[test]
    fn test_display_names() {
        assert_eq!(key_code_to_name(15), "Tab");
        assert_eq!(key_code_to_name(59), "F1");
        assert_eq!(key_code_to_name(57), "Space");
        assert_eq!(key_code_to_name(30), "A");
        assert_eq!(key_code_to_name(42), "Left Shift");
        assert_eq!(key_code_to_name(79), "Numpad 1");
        assert_eq!(key_code_to_name(103), "Up");
        assert_eq!(InputCode::Unbound.display_name(), "Unbound");
    }

    #[test]
    fn test_default_bindings() {
        let binds = KeyBind::default();
        assert_eq!(binds.test, key(keys::TEST));
        assert_eq!(binds.start, key(keys::START));
        assert_eq!(binds.up, key(keys::UP));
        assert_eq!(binds.arcade_start_button, InputCode::Unbound);
        assert!(binds.duplicates().is_empty());
    }

    #[test]
    fn test_serializes_as_evdev_names() {
        let value = serde_json::to_value(KeyBind::default()).unwrap();
        assert_eq!(value["test"], json!("KEY_F1"));
        assert_eq!(value["start"], json!("KEY_ENTER"));
        assert_eq!(value["arcade_button1"], json!(null));
        assert_eq!(value.as_object().unwrap().len(), InputRole::ALL.len());
    }

    #[test]
    fn test_mixed_formats_and_aliases() {
        let raw: RawKeyBind = serde_json::from_value(json!({
            "Test": 2,
            "start": "KEY_SPACE",
            "Service": null,
            "up": 0,
            "Left": "UNBOUND",
            "ArcadeStartButton": "KEY_ENTER"
        }))
        .unwrap();
        let binds = KeyBind::try_from(raw).unwrap();

        assert_eq!(binds.test, key(2));
        assert_eq!(binds.start, key(57));
        assert_eq!(binds.service, InputCode::Unbound);
        assert_eq!(binds.up, InputCode::Unbound);
        assert_eq!(binds.left, InputCode::Unbound);
        assert_eq!(binds.arcade_start_button, key(28));
        // absent roles keep their defaults
        assert_eq!(binds.down, InputRole::Down.default_code());
        assert_eq!(binds.button1, InputRole::Button1.default_code());
    }

    #[test]
    fn test_negative_code_rejected() {
        let raw: RawKeyBind = serde_json::from_value(json!({ "button2": -1 })).unwrap();
        match KeyBind::try_from(raw) {
            Err(ConfigError::InvalidKeyBind { role, value }) => {
                assert_eq!(role, "button2");
                assert_eq!(value, "-1");
            }
            other => panic!("expected InvalidKeyBind, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_name_rejected() {
        let raw: RawKeyBind =
            serde_json::from_value(json!({ "arcade_button3": "KEY_BOGUS" })).unwrap();
        let err = KeyBind::try_from(raw).unwrap_err();
        assert_eq!(err.field(), Some("arcade_button3"));
    }

    #[test]
    fn test_duplicates_reported() {
        let mut binds = KeyBind::default();
        binds.button1 = key(44);
        binds.arcade_button1 = key(44);
        binds.arcade_button2 = key(44);
        binds.arcade_button3 = InputCode::Unbound;
        binds.arcade_button4 = InputCode::Unbound;

        let dupes = binds.duplicates();
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].0, key(44));
        assert_eq!(
            dupes[0].1,
            vec![
                InputRole::Button1,
                InputRole::ArcadeButton1,
                InputRole::ArcadeButton2
            ]
        );
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut binds = KeyBind::default();
        binds.arcade_button4 = key(304);
        let json = serde_json::to_string(&binds).unwrap();
        let raw: RawKeyBind = serde_json::from_str(&json).unwrap();
        assert_eq!(KeyBind::try_from(raw).unwrap(), binds);
    }

    #[test]
    fn test_out_of_range_codes_name_the_role() {
        for value in [json!(70000), json!(18446744073709551615u64), json!(1.5), json!(true)] {
            let raw: RawKeyBind = serde_json::from_value(json!({ "button1": value.clone() })).unwrap();
            match KeyBind::try_from(raw) {
                Err(ConfigError::InvalidKeyBind { role, value: shown }) => {
                    assert_eq!(role, "button1");
                    assert_eq!(shown, value.to_string());
                }
                other => panic!("{}: expected InvalidKeyBind, got {:?}", value, other),
            }
        }
    }

    #[test]
    fn test_misspelt_role_rejected() {
        let err = serde_json::from_value::<RawKeyBind>(json!({ "Buton1": 5 })).unwrap_err();
        assert!(err.to_string().contains("Buton1"));
    }

    #[test]
    fn test_role_field_names_unique() {
        let mut names: Vec<_> = InputRole::ALL.iter().map(|r| r.field_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), InputRole::ALL.len());
    }
}
