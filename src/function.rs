//! The VT function multiplexor taxonomy.
//!
//! Byte 0 of every VT payload identifies its function. The enum below is
//! the exhaustive set the client recognises, including the auxiliary
//! control codes whose dialogue is outside this crate's scope but whose
//! frames must still be identified when they arrive.

use crate::error::DecodeError;

/// Function multiplexor values carried in byte 0 of a VT payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Function {
    SoftKeyActivation = 0x00,
    ButtonActivation = 0x01,
    PointingEvent = 0x02,
    VtSelectInputObject = 0x03,
    Esc = 0x04,
    VtChangeNumericValue = 0x05,
    VtChangeActiveMask = 0x06,
    VtChangeSoftKeyMask = 0x07,
    VtChangeStringValue = 0x08,
    VtOnUserLayoutHideShow = 0x09,
    VtControlAudioSignalTermination = 0x0A,
    ObjectPoolTransfer = 0x11,
    EndOfObjectPool = 0x12,
    AuxiliaryAssignmentTypeOne = 0x20,
    AuxiliaryInputTypeOneStatus = 0x21,
    PreferredAssignment = 0x22,
    AuxiliaryInputTypeTwoMaintenance = 0x23,
    AuxiliaryAssignmentTypeTwo = 0x24,
    AuxiliaryInputStatusTypeTwoEnable = 0x25,
    AuxiliaryInputTypeTwoStatus = 0x26,
    AuxiliaryCapabilities = 0x27,
    SelectActiveWorkingSet = 0x90,
    HideShowObject = 0xA0,
    EnableDisableObject = 0xA1,
    SelectInputObject = 0xA2,
    ControlAudioSignal = 0xA3,
    SetAudioVolume = 0xA4,
    ChangeChildLocation = 0xA5,
    ChangeSize = 0xA6,
    ChangeBackgroundColour = 0xA7,
    ChangeNumericValue = 0xA8,
    ChangeEndPoint = 0xA9,
    ChangeFontAttributes = 0xAA,
    ChangeLineAttributes = 0xAB,
    ChangeFillAttributes = 0xAC,
    ChangeActiveMask = 0xAD,
    ChangeSoftKeyMask = 0xAE,
    ChangeAttribute = 0xAF,
    ChangePriority = 0xB0,
    ChangeListItem = 0xB1,
    DeleteObjectPool = 0xB2,
    ChangeStringValue = 0xB3,
    ChangeChildPosition = 0xB4,
    ChangeObjectLabel = 0xB5,
    ChangePolygonPoint = 0xB6,
    ChangePolygonScale = 0xB7,
    GraphicsContext = 0xB8,
    GetAttributeValue = 0xB9,
    SelectColourMap = 0xBA,
    IdentifyVt = 0xBB,
    ExecuteExtendedMacro = 0xBC,
    LockUnlockMask = 0xBD,
    ExecuteMacro = 0xBE,
    GetMemory = 0xC0,
    GetSupportedWidechars = 0xC1,
    GetNumberOfSoftKeys = 0xC2,
    GetTextFontData = 0xC3,
    GetWindowMaskData = 0xC4,
    GetSupportedObjects = 0xC5,
    GetHardware = 0xC7,
    StoreVersion = 0xD0,
    LoadVersion = 0xD1,
    DeleteVersion = 0xD2,
    ExtendedGetVersions = 0xD3,
    ExtendedStoreVersion = 0xD4,
    ExtendedLoadVersion = 0xD5,
    ExtendedDeleteVersion = 0xD6,
    GetVersions = 0xDF,
    GetVersionsResponse = 0xE0,
    UnsupportedVtFunction = 0xFD,
    VtStatus = 0xFE,
    WorkingSetMaintenance = 0xFF,
}

impl Function {
    /// Return the multiplexor byte for this function.
    #[must_use]
    pub const fn code(self) -> u8 { self as u8 }

    /// Whether this code belongs to the auxiliary control dialogue.
    #[must_use]
    pub const fn is_auxiliary(self) -> bool { (self as u8) >= 0x20 && (self as u8) <= 0x27 }
}

impl From<Function> for u8 {
    fn from(value: Function) -> Self { value.code() }
}

impl TryFrom<u8> for Function {
    type Error = DecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let function = match value {
            0x00 => Self::SoftKeyActivation,
            0x01 => Self::ButtonActivation,
            0x02 => Self::PointingEvent,
            0x03 => Self::VtSelectInputObject,
            0x04 => Self::Esc,
            0x05 => Self::VtChangeNumericValue,
            0x06 => Self::VtChangeActiveMask,
            0x07 => Self::VtChangeSoftKeyMask,
            0x08 => Self::VtChangeStringValue,
            0x09 => Self::VtOnUserLayoutHideShow,
            0x0A => Self::VtControlAudioSignalTermination,
            0x11 => Self::ObjectPoolTransfer,
            0x12 => Self::EndOfObjectPool,
            0x20 => Self::AuxiliaryAssignmentTypeOne,
            0x21 => Self::AuxiliaryInputTypeOneStatus,
            0x22 => Self::PreferredAssignment,
            0x23 => Self::AuxiliaryInputTypeTwoMaintenance,
            0x24 => Self::AuxiliaryAssignmentTypeTwo,
            0x25 => Self::AuxiliaryInputStatusTypeTwoEnable,
            0x26 => Self::AuxiliaryInputTypeTwoStatus,
            0x27 => Self::AuxiliaryCapabilities,
            0x90 => Self::SelectActiveWorkingSet,
            0xA0 => Self::HideShowObject,
            0xA1 => Self::EnableDisableObject,
            0xA2 => Self::SelectInputObject,
            0xA3 => Self::ControlAudioSignal,
            0xA4 => Self::SetAudioVolume,
            0xA5 => Self::ChangeChildLocation,
            0xA6 => Self::ChangeSize,
            0xA7 => Self::ChangeBackgroundColour,
            0xA8 => Self::ChangeNumericValue,
            0xA9 => Self::ChangeEndPoint,
            0xAA => Self::ChangeFontAttributes,
            0xAB => Self::ChangeLineAttributes,
            0xAC => Self::ChangeFillAttributes,
            0xAD => Self::ChangeActiveMask,
            0xAE => Self::ChangeSoftKeyMask,
            0xAF => Self::ChangeAttribute,
            0xB0 => Self::ChangePriority,
            0xB1 => Self::ChangeListItem,
            0xB2 => Self::DeleteObjectPool,
            0xB3 => Self::ChangeStringValue,
            0xB4 => Self::ChangeChildPosition,
            0xB5 => Self::ChangeObjectLabel,
            0xB6 => Self::ChangePolygonPoint,
            0xB7 => Self::ChangePolygonScale,
            0xB8 => Self::GraphicsContext,
            0xB9 => Self::GetAttributeValue,
            0xBA => Self::SelectColourMap,
            0xBB => Self::IdentifyVt,
            0xBC => Self::ExecuteExtendedMacro,
            0xBD => Self::LockUnlockMask,
            0xBE => Self::ExecuteMacro,
            0xC0 => Self::GetMemory,
            0xC1 => Self::GetSupportedWidechars,
            0xC2 => Self::GetNumberOfSoftKeys,
            0xC3 => Self::GetTextFontData,
            0xC4 => Self::GetWindowMaskData,
            0xC5 => Self::GetSupportedObjects,
            0xC7 => Self::GetHardware,
            0xD0 => Self::StoreVersion,
            0xD1 => Self::LoadVersion,
            0xD2 => Self::DeleteVersion,
            0xD3 => Self::ExtendedGetVersions,
            0xD4 => Self::ExtendedStoreVersion,
            0xD5 => Self::ExtendedLoadVersion,
            0xD6 => Self::ExtendedDeleteVersion,
            0xDF => Self::GetVersions,
            0xE0 => Self::GetVersionsResponse,
            0xFD => Self::UnsupportedVtFunction,
            0xFE => Self::VtStatus,
            0xFF => Self::WorkingSetMaintenance,
            other => return Err(DecodeError::UnknownFunction { code: other }),
        };
        Ok(function)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(0x00, Function::SoftKeyActivation)]
    #[case(0x12, Function::EndOfObjectPool)]
    #[case(0x90, Function::SelectActiveWorkingSet)]
    #[case(0xB8, Function::GraphicsContext)]
    #[case(0xC7, Function::GetHardware)]
    #[case(0xDF, Function::GetVersions)]
    #[case(0xFE, Function::VtStatus)]
    fn codes_round_trip(#[case] code: u8, #[case] expected: Function) {
        assert_eq!(Function::try_from(code), Ok(expected));
        assert_eq!(expected.code(), code);
    }

    #[rstest]
    #[case(0x13)]
    #[case(0x8F)]
    #[case(0xC6)]
    #[case(0xE1)]
    fn unknown_codes_are_rejected(#[case] code: u8) {
        assert!(matches!(
            Function::try_from(code),
            Err(DecodeError::UnknownFunction { code: c }) if c == code
        ));
    }

    #[test]
    fn auxiliary_range_is_flagged() {
        assert!(Function::PreferredAssignment.is_auxiliary());
        assert!(!Function::HideShowObject.is_auxiliary());
    }
}
