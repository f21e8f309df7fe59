use derive_more::{AsRef, Deref, Display, From, Into};
use gilrs::{Axis, Button, EventType, GamepadId, Gilrs};
use serde::{Deserialize, Serialize};
use strum::{Display as StrumDisplay, EnumIter, EnumString};
use thiserror::Error;

/// Right-stick deflection for one frame. `x` grows to the right and `y` grows
/// downward, matching screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StickVector {
    pub x: f64,
    pub y: f64,
}

impl StickVector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Commands the wheel understands, whether they come from a button press or
/// from a line on the command socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, StrumDisplay)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum PadCommand {
    NextCategory,
    PreviousCategory,
    NextOption,
    PreviousOption,
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum PadButton {
    LeftBumper,
    RightBumper,
    LeftTrigger,
    RightTrigger,
    South,
    East,
    North,
    West,
    Select,
    Start,
}

impl PadButton {
    pub fn from_gilrs(button: Button) -> Option<Self> {
        Some(match button {
            Button::LeftTrigger => Self::LeftBumper,
            Button::RightTrigger => Self::RightBumper,
            Button::LeftTrigger2 => Self::LeftTrigger,
            Button::RightTrigger2 => Self::RightTrigger,
            Button::South => Self::South,
            Button::East => Self::East,
            Button::North => Self::North,
            Button::West => Self::West,
            Button::Select => Self::Select,
            Button::Start => Self::Start,
            _ => return None,
        })
    }
}

/// Which physical button issues which command. Bumpers switch category tabs
/// and triggers cycle the options of the highlighted segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonMap {
    pub next_category: PadButton,
    pub previous_category: PadButton,
    pub next_option: PadButton,
    pub previous_option: PadButton,
}

impl Default for ButtonMap {
    fn default() -> Self {
        Self {
            next_category: PadButton::RightBumper,
            previous_category: PadButton::LeftBumper,
            next_option: PadButton::RightTrigger,
            previous_option: PadButton::LeftTrigger,
        }
    }
}

impl ButtonMap {
    pub fn command_for(&self, button: PadButton) -> Option<PadCommand> {
        [
            (self.next_category, PadCommand::NextCategory),
            (self.previous_category, PadCommand::PreviousCategory),
            (self.next_option, PadCommand::NextOption),
            (self.previous_option, PadCommand::PreviousOption),
        ]
        .into_iter()
        .find_map(|(b, cmd)| (b == button).then_some(cmd))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct GamepadName(String);

crate::impl_string_newtype!(GamepadName);

#[derive(Debug, Error)]
pub enum PadError {
    #[error("Gamepad support unavailable: {0}")]
    Init(String),
}

/// Everything read from the active gamepad during one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PadFrame {
    pub stick: StickVector,
    pub commands: Vec<PadCommand>,
}

/// Polls the first connected gamepad. Without gamepad support (no backend,
/// missing permissions) every poll returns a centered stick.
pub struct Gamepad {
    gilrs: Option<Gilrs>,
    active: Option<GamepadId>,
    buttons: ButtonMap,
}

impl Gamepad {
    pub fn new(buttons: ButtonMap) -> Self {
        let gilrs = match Gilrs::new() {
            Ok(g) => Some(g),
            Err(e) => {
                log::warn!(
                    "{}. Stick input will stay centered.",
                    PadError::Init(e.to_string())
                );
                None
            }
        };

        let active = gilrs
            .as_ref()
            .and_then(|g| g.gamepads().find(|(_, pad)| pad.is_connected()))
            .map(|(id, _)| id);

        Self {
            gilrs,
            active,
            buttons,
        }
    }

    pub fn set_buttons(&mut self, buttons: ButtonMap) {
        self.buttons = buttons;
    }

    pub fn is_connected(&self) -> bool {
        self.active.is_some()
    }

    /// Drains pending events and samples the right stick. Button presses are
    /// edge-triggered: each press yields exactly one command.
    pub fn poll(&mut self) -> PadFrame {
        let Some(gilrs) = self.gilrs.as_mut() else {
            return PadFrame::default();
        };

        let mut commands = Vec::new();
        while let Some(event) = gilrs.next_event() {
            match event.event {
                EventType::Connected => {
                    if self.active.is_none() {
                        log::info!("Gamepad {} connected", gilrs.gamepad(event.id).name());
                        self.active = Some(event.id);
                    }
                }
                EventType::Disconnected => {
                    if self.active == Some(event.id) {
                        log::info!("Gamepad {} disconnected", event.id);
                        self.active = gilrs
                            .gamepads()
                            .find(|(id, pad)| *id != event.id && pad.is_connected())
                            .map(|(id, _)| id);
                    }
                }
                EventType::ButtonPressed(button, _) if self.active == Some(event.id) => {
                    if let Some(cmd) =
                        PadButton::from_gilrs(button).and_then(|b| self.buttons.command_for(b))
                    {
                        commands.push(cmd);
                    }
                }
                _ => {}
            }
        }

        let stick = self
            .active
            .map(|id| {
                let pad = gilrs.gamepad(id);
                // gilrs reports up as positive
                StickVector::new(
                    pad.value(Axis::RightStickX) as f64,
                    -(pad.value(Axis::RightStickY) as f64),
                )
            })
            .unwrap_or_default();

        PadFrame { stick, commands }
    }
}

pub fn connected_gamepads() -> Result<Vec<GamepadName>, PadError> {
    let gilrs = Gilrs::new().map_err(|e| PadError::Init(e.to_string()))?;
    Ok(gilrs
        .gamepads()
        .filter(|(_, pad)| pad.is_connected())
        .map(|(_, pad)| GamepadName::from(pad.name()))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_backend_reads_centered() {
        let mut pad = Gamepad {
            gilrs: None,
            active: None,
            buttons: ButtonMap::default(),
        };
        assert!(!pad.is_connected());
        assert_eq!(pad.poll(), PadFrame::default());
    }

    #[test]
    fn test_command_names() {
        let cases = vec![
            ("next-category", PadCommand::NextCategory),
            ("Previous-Category", PadCommand::PreviousCategory),
            ("next-option", PadCommand::NextOption),
            ("PREVIOUS-OPTION", PadCommand::PreviousOption),
        ];

        for (name, expected) in cases {
            assert_eq!(name.parse::<PadCommand>().unwrap(), expected);
        }
        assert_eq!(PadCommand::NextOption.to_string(), "next-option");
        assert!("jump".parse::<PadCommand>().is_err());
    }

    #[test]
    fn test_default_button_map() {
        let map = ButtonMap::default();
        assert_eq!(
            map.command_for(PadButton::RightBumper),
            Some(PadCommand::NextCategory)
        );
        assert_eq!(
            map.command_for(PadButton::LeftTrigger),
            Some(PadCommand::PreviousOption)
        );
        assert_eq!(map.command_for(PadButton::South), None);
    }

    #[test]
    fn test_button_map_deserialization() {
        let json = r#"{ "next_option": "east", "previous_option": "west" }"#;
        let map: ButtonMap = serde_json::from_str(json).unwrap();
        assert_eq!(map.command_for(PadButton::East), Some(PadCommand::NextOption));
        assert_eq!(map.command_for(PadButton::West), Some(PadCommand::PreviousOption));
        assert_eq!(map.next_category, PadButton::RightBumper);
    }

    #[test]
    fn test_gilrs_button_translation() {
        assert_eq!(
            PadButton::from_gilrs(Button::LeftTrigger2),
            Some(PadButton::LeftTrigger)
        );
        assert_eq!(
            PadButton::from_gilrs(Button::RightTrigger),
            Some(PadButton::RightBumper)
        );
        assert_eq!(PadButton::from_gilrs(Button::DPadUp), None);
    }

    #[test]
    fn test_stick_magnitude() {
        assert_eq!(StickVector::new(3.0, -4.0).magnitude(), 5.0);
        assert_eq!(StickVector::default().magnitude(), 0.0);
    }
}
