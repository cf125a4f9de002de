//! Outbound command encoders.
//!
//! Every encoder is a pure function of its inputs: it packs the ISO
//! 11783-6 layout for one command and returns the payload ready for the
//! wire, with byte 0 carrying the function multiplexor, integer fields in
//! little-endian order, and unused tail bytes reserved-filled. Commands
//! that exceed a single CAN frame come back as [`Encoded::Extended`] and
//! must travel through the transport sublayer.
//!
//! Encoders never consult connection state; gating commands on the
//! `Connected` state is the client's job.

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    capability::{FontSize, VtVersion},
    error::SendError,
    frame::{FrameData, CAN_DATA_LENGTH, RESERVED},
    function::Function,
};

pub mod graphics;

#[cfg(test)]
mod tests;

/// An encoded command payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Encoded {
    /// Fits one CAN frame.
    Fixed([u8; CAN_DATA_LENGTH]),
    /// Needs the transport sublayer.
    Extended(Bytes),
}

impl Encoded {
    /// The function multiplexor in byte 0.
    #[must_use]
    pub fn function_code(&self) -> u8 { self.as_slice()[0] }

    /// The full payload bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        match self {
            Self::Fixed(body) => body,
            Self::Extended(bytes) => bytes,
        }
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize { self.as_slice().len() }

    /// Whether the payload is empty. Never true for encoder output.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.as_slice().is_empty() }
}

/// Wrap a short variable-length payload into a frame, or hand it to the
/// transport when it exceeds one frame.
fn seal(payload: BytesMut) -> Encoded {
    if payload.len() <= CAN_DATA_LENGTH {
        let mut body = [RESERVED; CAN_DATA_LENGTH];
        body[..payload.len()].copy_from_slice(&payload);
        Encoded::Fixed(body)
    } else {
        Encoded::Extended(payload.freeze())
    }
}

/// Hide/show states for container objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum HideShowState {
    /// Hide the object.
    Hide = 0,
    /// Show the object.
    Show = 1,
}

/// Enable/disable states for input and button objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EnableDisableState {
    /// Disable the object.
    Disable = 0,
    /// Enable the object.
    Enable = 1,
}

/// How a select-input-object command selects its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum SelectInputOption {
    /// Activate the object for data input.
    ActivateForDataInput = 0x00,
    /// Only move focus to the object.
    SetFocus = 0xFF,
}

/// Line directions for the change-endpoint command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum LineDirection {
    /// Top left to bottom right of the enclosing rectangle.
    TopLeftToBottomRight = 0,
    /// Bottom left to top right of the enclosing rectangle.
    BottomLeftToTopRight = 1,
}

/// Fill types for fill attribute objects.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum FillType {
    /// No fill.
    NoFill = 0,
    /// Fill with the outline colour.
    LineColour = 1,
    /// Fill with the fill colour attribute.
    FillColour = 2,
    /// Fill with the pattern attribute.
    Pattern = 3,
}

/// Mask kinds addressed by the change-softkey-mask command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MaskType {
    /// A data mask.
    Data = 1,
    /// An alarm mask.
    Alarm = 2,
}

/// Priorities of an alarm mask.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AlarmMaskPriority {
    /// Overrides lower priority alarm masks.
    High = 0,
    /// Overrides low priority alarm masks.
    Medium = 1,
    /// Overrides data masks only.
    Low = 2,
}

/// Lock state for the lock/unlock-mask command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MaskLockState {
    /// Resume rendering of the mask.
    Unlock = 0,
    /// Freeze rendering of the mask.
    Lock = 1,
}

/// Hide or show a container object.
#[must_use]
pub fn hide_show_object(object_id: u16, state: HideShowState) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::HideShowObject.code())
            .put_u16_le(object_id)
            .put_u8(state as u8)
            .finish(),
    )
}

/// Enable or disable an input, button, or animation object.
#[must_use]
pub fn enable_disable_object(object_id: u16, state: EnableDisableState) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::EnableDisableObject.code())
            .put_u16_le(object_id)
            .put_u8(state as u8)
            .finish(),
    )
}

/// Force selection of an input field, button, or key object.
#[must_use]
pub fn select_input_object(object_id: u16, option: SelectInputOption) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::SelectInputObject.code())
            .put_u16_le(object_id)
            .put_u8(option as u8)
            .finish(),
    )
}

/// The ESC message, aborting the open input operation.
#[must_use]
pub fn esc() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::Esc.code()).finish())
}

/// Command an audio signal.
#[must_use]
pub fn control_audio_signal(
    activations: u8,
    frequency_hz: u16,
    duration_ms: u16,
    off_time_ms: u16,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ControlAudioSignal.code())
            .put_u8(activations)
            .put_u16_le(frequency_hz)
            .put_u16_le(duration_ms)
            .put_u16_le(off_time_ms)
            .finish(),
    )
}

/// Set the audio volume for subsequent audio signal commands.
#[must_use]
pub fn set_audio_volume(volume_percent: u8) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::SetAudioVolume.code())
            .put_u8(volume_percent)
            .finish(),
    )
}

/// Move a child object relative to its current position.
///
/// The wire offsets carry a bias of −127: a byte value of 255 moves the
/// object +128 pixels.
#[must_use]
pub fn change_child_location(
    object_id: u16,
    parent_object_id: u16,
    relative_x: u8,
    relative_y: u8,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeChildLocation.code())
            .put_u16_le(parent_object_id)
            .put_u16_le(object_id)
            .put_u8(relative_x)
            .put_u8(relative_y)
            .finish(),
    )
}

/// Place a child object at an absolute position within its parent.
#[must_use]
pub fn change_child_position(
    object_id: u16,
    parent_object_id: u16,
    x: u16,
    y: u16,
) -> Encoded {
    let mut payload = BytesMut::with_capacity(9);
    payload.put_u8(Function::ChangeChildPosition.code());
    payload.put_u16_le(parent_object_id);
    payload.put_u16_le(object_id);
    payload.put_u16_le(x);
    payload.put_u16_le(y);
    seal(payload)
}

/// Resize an object. A zero width or height hides the object.
#[must_use]
pub fn change_size(object_id: u16, width: u16, height: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeSize.code())
            .put_u16_le(object_id)
            .put_u16_le(width)
            .put_u16_le(height)
            .finish(),
    )
}

/// Change an object's background colour.
#[must_use]
pub fn change_background_colour(object_id: u16, colour: u8) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeBackgroundColour.code())
            .put_u16_le(object_id)
            .put_u8(colour)
            .finish(),
    )
}

/// Change the numeric value of an object.
#[must_use]
pub fn change_numeric_value(object_id: u16, value: u32) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeNumericValue.code())
            .put_u16_le(object_id)
            .skip(1)
            .put_u32_le(value)
            .finish(),
    )
}

/// Change the string value of an output string or input string object.
///
/// # Errors
///
/// Returns [`SendError::FieldTooLong`] if `value` exceeds the 16-bit
/// length field.
pub fn change_string_value(object_id: u16, value: &[u8]) -> Result<Encoded, SendError> {
    let len = u16::try_from(value.len()).map_err(|_| SendError::FieldTooLong {
        len: value.len(),
        max: usize::from(u16::MAX),
    })?;
    let mut payload = BytesMut::with_capacity(5 + value.len());
    payload.put_u8(Function::ChangeStringValue.code());
    payload.put_u16_le(object_id);
    payload.put_u16_le(len);
    payload.put_slice(value);
    Ok(seal(payload))
}

/// Change the endpoint of an output line object.
#[must_use]
pub fn change_endpoint(
    object_id: u16,
    width: u16,
    height: u16,
    direction: LineDirection,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeEndPoint.code())
            .put_u16_le(object_id)
            .put_u16_le(width)
            .put_u16_le(height)
            .put_u8(direction as u8)
            .finish(),
    )
}

/// Rewrite a font attributes object.
#[must_use]
pub fn change_font_attributes(
    object_id: u16,
    colour: u8,
    size: FontSize,
    font_type: u8,
    style_bits: u8,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeFontAttributes.code())
            .put_u16_le(object_id)
            .put_u8(colour)
            .put_u8(size.code())
            .put_u8(font_type)
            .put_u8(style_bits)
            .finish(),
    )
}

/// Rewrite a line attributes object.
#[must_use]
pub fn change_line_attributes(
    object_id: u16,
    colour: u8,
    width: u8,
    line_art: u16,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeLineAttributes.code())
            .put_u16_le(object_id)
            .put_u8(colour)
            .put_u8(width)
            .put_u16_le(line_art)
            .finish(),
    )
}

/// Rewrite a fill attributes object.
#[must_use]
pub fn change_fill_attributes(
    object_id: u16,
    fill_type: FillType,
    colour: u8,
    pattern_object_id: u16,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeFillAttributes.code())
            .put_u16_le(object_id)
            .put_u8(fill_type as u8)
            .put_u8(colour)
            .put_u16_le(pattern_object_id)
            .finish(),
    )
}

/// Switch the active mask of a working set.
#[must_use]
pub fn change_active_mask(working_set_object_id: u16, new_mask_object_id: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeActiveMask.code())
            .put_u16_le(working_set_object_id)
            .put_u16_le(new_mask_object_id)
            .finish(),
    )
}

/// Attach a different softkey mask to a data or alarm mask.
#[must_use]
pub fn change_softkey_mask(
    mask_type: MaskType,
    mask_object_id: u16,
    softkey_mask_object_id: u16,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeSoftKeyMask.code())
            .put_u8(mask_type as u8)
            .put_u16_le(mask_object_id)
            .put_u16_le(softkey_mask_object_id)
            .finish(),
    )
}

/// Change any attribute with an assigned attribute id.
#[must_use]
pub fn change_attribute(object_id: u16, attribute_id: u8, value: u32) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeAttribute.code())
            .put_u16_le(object_id)
            .put_u8(attribute_id)
            .put_u32_le(value)
            .finish(),
    )
}

/// Change the priority of an alarm mask.
#[must_use]
pub fn change_priority(alarm_mask_object_id: u16, priority: AlarmMaskPriority) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangePriority.code())
            .put_u16_le(alarm_mask_object_id)
            .put_u8(priority as u8)
            .finish(),
    )
}

/// Replace a list item; [`NULL_OBJECT_ID`](crate::frame::NULL_OBJECT_ID)
/// removes the item without reindexing.
#[must_use]
pub fn change_list_item(list_object_id: u16, index: u8, new_object_id: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeListItem.code())
            .put_u16_le(list_object_id)
            .put_u8(index)
            .put_u16_le(new_object_id)
            .finish(),
    )
}

/// Delete the working set's object pool from volatile memory.
#[must_use]
pub fn delete_object_pool() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::DeleteObjectPool.code()).finish())
}

/// Change the label of an object.
#[must_use]
pub fn change_object_label(
    object_id: u16,
    label_object_id: u16,
    font_type: u8,
    graphic_object_id: u16,
) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangeObjectLabel.code())
            .put_u16_le(object_id)
            .put_u16_le(label_object_id)
            .put_u8(font_type)
            .put_u16_le(graphic_object_id)
            .finish(),
    )
}

/// Move one point of an output polygon object.
#[must_use]
pub fn change_polygon_point(object_id: u16, point_index: u8, x: u16, y: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangePolygonPoint.code())
            .put_u16_le(object_id)
            .put_u8(point_index)
            .put_u16_le(x)
            .put_u16_le(y)
            .finish(),
    )
}

/// Rescale a complete output polygon object.
#[must_use]
pub fn change_polygon_scale(object_id: u16, width: u16, height: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ChangePolygonScale.code())
            .put_u16_le(object_id)
            .put_u16_le(width)
            .put_u16_le(height)
            .finish(),
    )
}

/// Select a colour map or palette object.
#[must_use]
pub fn select_colour_map(object_id: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::SelectColourMap.code())
            .put_u16_le(object_id)
            .finish(),
    )
}

/// Ask the server to display its identity.
#[must_use]
pub fn identify_vt() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::IdentifyVt.code()).finish())
}

/// Execute a macro by its 8-bit object id.
#[must_use]
pub fn execute_macro(macro_id: u8) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ExecuteMacro.code())
            .put_u8(macro_id)
            .finish(),
    )
}

/// Execute an extended macro by its 16-bit object id.
#[must_use]
pub fn execute_extended_macro(macro_object_id: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::ExecuteExtendedMacro.code())
            .put_u16_le(macro_object_id)
            .finish(),
    )
}

/// Freeze or resume rendering of the visible mask.
///
/// `timeout_ms` bounds the lock; it is ignored for unlock commands.
#[must_use]
pub fn lock_unlock_mask(state: MaskLockState, object_id: u16, timeout_ms: u16) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::LockUnlockMask.code())
            .put_u8(state as u8)
            .put_u16_le(object_id)
            .put_u16_le(timeout_ms)
            .finish(),
    )
}

/// Hand the active working set role to another working set master NAME.
#[must_use]
pub fn select_active_working_set(name: u64) -> Encoded {
    let mut payload = BytesMut::with_capacity(9);
    payload.put_u8(Function::SelectActiveWorkingSet.code());
    payload.put_u64_le(name);
    seal(payload)
}

/// Query one attribute value of an object.
#[must_use]
pub fn get_attribute_value(object_id: u16, attribute_id: u8) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::GetAttributeValue.code())
            .put_u16_le(object_id)
            .put_u8(attribute_id)
            .finish(),
    )
}

// --- Bring-up and management messages, driven by the state machine ---

/// The working set master announcement body (its own parameter group).
#[must_use]
pub fn working_set_master(member_count: u8) -> [u8; CAN_DATA_LENGTH] {
    let mut body = [RESERVED; CAN_DATA_LENGTH];
    body[0] = member_count;
    body
}

/// The working set maintenance heartbeat.
#[must_use]
pub fn working_set_maintenance(initializing: bool, version: VtVersion) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::WorkingSetMaintenance.code())
            .put_u8(u8::from(initializing))
            .put_u8(version.to_byte())
            .finish(),
    )
}

/// Ask whether the server has `required_bytes` of pool memory available.
#[must_use]
pub fn get_memory(required_bytes: u32) -> Encoded {
    Encoded::Fixed(
        FrameData::for_function(Function::GetMemory.code())
            .skip(1)
            .put_u32_le(required_bytes)
            .finish(),
    )
}

/// Query the softkey geometry.
#[must_use]
pub fn get_number_of_softkeys() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::GetNumberOfSoftKeys.code()).finish())
}

/// Query font support.
#[must_use]
pub fn get_text_font_data() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::GetTextFontData.code()).finish())
}

/// Query hardware capabilities.
#[must_use]
pub fn get_hardware() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::GetHardware.code()).finish())
}

/// Query supported wide characters.
#[must_use]
pub fn get_supported_widechars() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::GetSupportedWidechars.code()).finish())
}

/// Query window mask data.
#[must_use]
pub fn get_window_mask_data() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::GetWindowMaskData.code()).finish())
}

/// Query the object types the server supports.
#[must_use]
pub fn get_supported_objects() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::GetSupportedObjects.code()).finish())
}

/// Query stored pool versions.
#[must_use]
pub fn get_versions() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::GetVersions.code()).finish())
}

/// Query stored pool versions with 32-byte labels.
#[must_use]
pub fn extended_get_versions() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::ExtendedGetVersions.code()).finish())
}

fn version_label_command(function: Function, label: [u8; 7]) -> Encoded {
    let mut body = FrameData::for_function(function.code());
    for byte in label {
        body.put_u8(byte);
    }
    Encoded::Fixed(body.finish())
}

/// Store the uploaded pool under a 7-byte version label.
#[must_use]
pub fn store_version(label: [u8; 7]) -> Encoded {
    version_label_command(Function::StoreVersion, label)
}

/// Load a stored pool by its 7-byte version label.
#[must_use]
pub fn load_version(label: [u8; 7]) -> Encoded {
    version_label_command(Function::LoadVersion, label)
}

/// Delete a stored pool by its 7-byte version label.
#[must_use]
pub fn delete_version(label: [u8; 7]) -> Encoded {
    version_label_command(Function::DeleteVersion, label)
}

fn extended_version_label_command(function: Function, label: [u8; 32]) -> Encoded {
    let mut payload = BytesMut::with_capacity(33);
    payload.put_u8(function.code());
    payload.put_slice(&label);
    seal(payload)
}

/// Store the uploaded pool under a 32-byte version label.
#[must_use]
pub fn extended_store_version(label: [u8; 32]) -> Encoded {
    extended_version_label_command(Function::ExtendedStoreVersion, label)
}

/// Load a stored pool by its 32-byte version label.
#[must_use]
pub fn extended_load_version(label: [u8; 32]) -> Encoded {
    extended_version_label_command(Function::ExtendedLoadVersion, label)
}

/// Delete a stored pool by its 32-byte version label.
#[must_use]
pub fn extended_delete_version(label: [u8; 32]) -> Encoded {
    extended_version_label_command(Function::ExtendedDeleteVersion, label)
}

/// The end-of-object-pool sentinel.
#[must_use]
pub fn end_of_object_pool() -> Encoded {
    Encoded::Fixed(FrameData::for_function(Function::EndOfObjectPool.code()).finish())
}
