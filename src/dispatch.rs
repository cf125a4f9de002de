//! Inbound message decoding.
//!
//! Byte 0 of every inbound payload selects the decoder. The result is a
//! typed [`Inbound`] message the client folds into its state: bring-up
//! responses advance the state machine, event messages fan out to
//! subscribers, and status broadcasts refresh the liveness tracker.

use crate::{
    capability::{GraphicMode, SoftkeyGeometry},
    error::DecodeError,
    event::{
        AudioSignalTerminationEvent,
        ChangeActiveMaskEvent,
        ChangeNumericValueEvent,
        ChangeSoftKeyMaskEvent,
        ChangeStringValueEvent,
        EscEvent,
        KeyActivation,
        KeyEvent,
        PointingEvent,
        SelectInputObjectEvent,
        UnsupportedFunctionEvent,
        UserLayoutHideShowEvent,
    },
    function::Function,
    status::VtStatus,
};

/// A decoded inbound message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inbound {
    /// A softkey was pressed, held, released, or aborted.
    SoftKey(KeyEvent),
    /// A button was pressed, held, released, or aborted.
    Button(KeyEvent),
    /// A pointing event occurred on the data mask.
    Pointing(PointingEvent),
    /// An input object's selection state changed.
    SelectInputObject(SelectInputObjectEvent),
    /// The operator pressed ESC.
    Esc(EscEvent),
    /// The server changed a numeric value from operator input.
    ChangeNumericValue(ChangeNumericValueEvent),
    /// The server switched the active mask.
    ChangeActiveMask(ChangeActiveMaskEvent),
    /// The server switched a softkey mask.
    ChangeSoftKeyMask(ChangeSoftKeyMaskEvent),
    /// The server changed a string value from operator input.
    ChangeStringValue(ChangeStringValueEvent),
    /// A user-layout object was hidden or shown.
    UserLayoutHideShow(UserLayoutHideShowEvent),
    /// An audio signal terminated.
    AudioSignalTermination(AudioSignalTerminationEvent),
    /// Response to the get-memory query.
    GetMemoryResponse {
        /// VT version byte the server reported.
        version: u8,
        /// Whether the server can hold the declared pool size.
        enough_memory: bool,
    },
    /// Response to the get-number-of-softkeys query.
    GetNumberSoftkeysResponse(SoftkeyGeometry),
    /// Response to the get-text-font-data query.
    GetTextFontDataResponse {
        /// Small font sizes bitfield.
        small_sizes: u8,
        /// Large font sizes bitfield.
        large_sizes: u8,
        /// Font styles bitfield.
        styles: u8,
    },
    /// Response to the get-hardware query.
    GetHardwareResponse {
        /// Hardware features bitfield.
        features: u8,
        /// The server's graphics mode.
        graphic_mode: GraphicMode,
        /// Data mask width in pixels.
        x_pixels: u16,
        /// Data mask height in pixels.
        y_pixels: u16,
    },
    /// Response to the end-of-object-pool sentinel.
    EndOfObjectPoolResponse {
        /// Error bitfield; zero means the pool was accepted.
        error_bits: u8,
        /// Parent of the faulty object, if any.
        parent_object_id: u16,
        /// The faulty object, if any.
        object_id: u16,
        /// Pool-level error bitfield.
        pool_error_bits: u8,
    },
    /// Response to a get-versions query.
    GetVersionsResponse {
        /// The stored 7-byte version labels.
        labels: Vec<[u8; 7]>,
    },
    /// The server rejected a function it does not implement.
    UnsupportedFunction(UnsupportedFunctionEvent),
    /// The periodic VT status broadcast.
    VtStatus(VtStatus),
    /// Another working set's maintenance message.
    WorkingSetMaintenance {
        /// The maintenance bitfield; bit 0 is the initializing bit.
        bitfield: u8,
        /// The sender's VT version byte.
        version: u8,
    },
    /// A recognised function this client does not act on.
    Unhandled(Function),
}

fn need(payload: &[u8], count: usize) -> Result<(), DecodeError> {
    if payload.len() < count {
        return Err(DecodeError::Truncated {
            have: payload.len(),
            need: count,
        });
    }
    Ok(())
}

fn u16_at(payload: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([payload[offset], payload[offset + 1]])
}

fn key_event(payload: &[u8]) -> Result<KeyEvent, DecodeError> {
    need(payload, 7)?;
    Ok(KeyEvent {
        activation: KeyActivation::try_from(payload[1])?,
        object_id: u16_at(payload, 2),
        parent_object_id: u16_at(payload, 4),
        key_number: payload[6],
    })
}

/// Decode one inbound payload.
///
/// # Errors
///
/// Returns a [`DecodeError`] for unknown multiplexors, truncated
/// payloads, or out-of-range field values.
#[allow(clippy::too_many_lines)]
pub fn decode(payload: &[u8]) -> Result<Inbound, DecodeError> {
    need(payload, 1)?;
    let function = Function::try_from(payload[0])?;

    let inbound = match function {
        Function::SoftKeyActivation => Inbound::SoftKey(key_event(payload)?),
        Function::ButtonActivation => Inbound::Button(key_event(payload)?),
        Function::PointingEvent => {
            need(payload, 6)?;
            Inbound::Pointing(PointingEvent {
                x: u16_at(payload, 1),
                y: u16_at(payload, 3),
                // Servers older than VT version 4 leave this reserved.
                activation: KeyActivation::try_from(payload[5])
                    .unwrap_or(KeyActivation::Pressed),
            })
        }
        Function::VtSelectInputObject => {
            need(payload, 5)?;
            Inbound::SelectInputObject(SelectInputObjectEvent {
                object_id: u16_at(payload, 1),
                selected: payload[3] != 0,
                open_for_input: payload[4] & 0x01 != 0,
            })
        }
        Function::Esc => {
            need(payload, 4)?;
            Inbound::Esc(EscEvent {
                object_id: u16_at(payload, 1),
                error_code: payload[3],
            })
        }
        Function::VtChangeNumericValue => {
            need(payload, 8)?;
            Inbound::ChangeNumericValue(ChangeNumericValueEvent {
                object_id: u16_at(payload, 1),
                value: u32::from_le_bytes([payload[4], payload[5], payload[6], payload[7]]),
            })
        }
        Function::VtChangeActiveMask => {
            need(payload, 3)?;
            Inbound::ChangeActiveMask(ChangeActiveMaskEvent {
                mask_object_id: u16_at(payload, 1),
            })
        }
        Function::VtChangeSoftKeyMask => {
            need(payload, 5)?;
            Inbound::ChangeSoftKeyMask(ChangeSoftKeyMaskEvent {
                mask_object_id: u16_at(payload, 1),
                softkey_mask_object_id: u16_at(payload, 3),
            })
        }
        Function::VtChangeStringValue => {
            need(payload, 4)?;
            let len = usize::from(payload[3]);
            need(payload, 4 + len)?;
            Inbound::ChangeStringValue(ChangeStringValueEvent {
                object_id: u16_at(payload, 1),
                value: payload[4..4 + len].to_vec(),
            })
        }
        Function::VtOnUserLayoutHideShow => {
            need(payload, 4)?;
            Inbound::UserLayoutHideShow(UserLayoutHideShowEvent {
                object_id: u16_at(payload, 1),
                shown: payload[3] != 0,
            })
        }
        Function::VtControlAudioSignalTermination => {
            need(payload, 2)?;
            Inbound::AudioSignalTermination(AudioSignalTerminationEvent {
                terminated_early: payload[1] & 0x01 != 0,
            })
        }
        Function::EndOfObjectPool => {
            need(payload, 7)?;
            Inbound::EndOfObjectPoolResponse {
                error_bits: payload[1],
                parent_object_id: u16_at(payload, 2),
                object_id: u16_at(payload, 4),
                pool_error_bits: payload[6],
            }
        }
        Function::GetMemory => {
            need(payload, 4)?;
            Inbound::GetMemoryResponse {
                version: payload[2],
                enough_memory: payload[3] == 0,
            }
        }
        Function::GetNumberOfSoftKeys => {
            need(payload, 6)?;
            Inbound::GetNumberSoftkeysResponse(SoftkeyGeometry {
                x_pixels: payload[1],
                y_pixels: payload[2],
                virtual_per_mask: payload[4],
                physical: payload[5],
            })
        }
        Function::GetTextFontData => {
            need(payload, 8)?;
            Inbound::GetTextFontDataResponse {
                small_sizes: payload[5],
                large_sizes: payload[6],
                styles: payload[7],
            }
        }
        Function::GetHardware => {
            need(payload, 8)?;
            Inbound::GetHardwareResponse {
                features: payload[2],
                graphic_mode: GraphicMode::from_byte(payload[3]),
                x_pixels: u16_at(payload, 4),
                y_pixels: u16_at(payload, 6),
            }
        }
        Function::GetVersionsResponse => {
            need(payload, 2)?;
            let count = usize::from(payload[1]);
            need(payload, 2 + count * 7)?;
            let labels = payload[2..]
                .chunks_exact(7)
                .take(count)
                .map(|chunk| {
                    let mut label = [0u8; 7];
                    label.copy_from_slice(chunk);
                    label
                })
                .collect();
            Inbound::GetVersionsResponse { labels }
        }
        Function::UnsupportedVtFunction => {
            need(payload, 2)?;
            Inbound::UnsupportedFunction(UnsupportedFunctionEvent {
                function_code: payload[1],
            })
        }
        Function::VtStatus => {
            need(payload, 8)?;
            let body: [u8; 8] = payload[..8].try_into().expect("length checked");
            Inbound::VtStatus(VtStatus::from_body(&body))
        }
        Function::WorkingSetMaintenance => {
            need(payload, 3)?;
            Inbound::WorkingSetMaintenance {
                bitfield: payload[1],
                version: payload[2],
            }
        }
        other => Inbound::Unhandled(other),
    };
    Ok(inbound)
}
