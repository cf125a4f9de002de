//! Typed user-input events delivered by the VT server.

use crate::error::DecodeError;

/// Activation codes shared by key, button, and pointing events.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum KeyActivation {
    /// Released, or unlatched for latching buttons.
    Released = 0,
    /// Pressed, or latched.
    Pressed = 1,
    /// Still held; repeated cyclically by the server.
    Held = 2,
    /// The press was aborted without a release over the object.
    Aborted = 3,
}

impl TryFrom<u8> for KeyActivation {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Released),
            1 => Ok(Self::Pressed),
            2 => Ok(Self::Held),
            3 => Ok(Self::Aborted),
            other => Err(DecodeError::InvalidField {
                field: "key activation code",
                value: other,
            }),
        }
    }
}

/// A softkey or button activation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyEvent {
    /// What happened to the key.
    pub activation: KeyActivation,
    /// The key number within its mask.
    pub key_number: u8,
    /// Object id of the key or button.
    pub object_id: u16,
    /// Object id of the enclosing mask or parent object.
    pub parent_object_id: u16,
}

/// A touch or pointing-device event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PointingEvent {
    /// What happened at the coordinates.
    pub activation: KeyActivation,
    /// X position in data mask pixels.
    pub x: u16,
    /// Y position in data mask pixels.
    pub y: u16,
}

/// An input object selection change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelectInputObjectEvent {
    /// The input object concerned.
    pub object_id: u16,
    /// Whether the object is now selected.
    pub selected: bool,
    /// Whether the object is open for data input.
    pub open_for_input: bool,
}

/// The operator pressed ESC while an input object was open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EscEvent {
    /// Object id where input was aborted.
    pub object_id: u16,
    /// Server error code qualifying the abort.
    pub error_code: u8,
}

/// The server confirmed (or performed) a numeric value change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeNumericValueEvent {
    /// The changed object.
    pub object_id: u16,
    /// The new value.
    pub value: u32,
}

/// The server switched the active mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeActiveMaskEvent {
    /// Object id of the newly active mask.
    pub mask_object_id: u16,
}

/// The server switched a softkey mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChangeSoftKeyMaskEvent {
    /// The data or alarm mask whose softkey mask changed.
    pub mask_object_id: u16,
    /// Object id of the new softkey mask.
    pub softkey_mask_object_id: u16,
}

/// The server reported a string value change from operator input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChangeStringValueEvent {
    /// The changed object.
    pub object_id: u16,
    /// The entered string bytes.
    pub value: Vec<u8>,
}

/// A user-layout object was hidden or shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserLayoutHideShowEvent {
    /// The object concerned.
    pub object_id: u16,
    /// Whether the object is now shown.
    pub shown: bool,
}

/// An audio signal the client commanded has terminated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioSignalTerminationEvent {
    /// Whether the termination was premature.
    pub terminated_early: bool,
}

/// The server rejected a command it does not implement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnsupportedFunctionEvent {
    /// The rejected function code.
    pub function_code: u8,
}
