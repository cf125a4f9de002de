//! Server capability snapshot.
//!
//! Populated from the capability-query responses during bring-up and
//! read-only once the client is connected. Before the snapshot is
//! complete every accessor reports zero, `false`, or the reserved enum
//! value.

/// VT protocol versions a client or server can support.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VtVersion {
    /// Version 2 or lower.
    Version2OrOlder,
    /// Version 3.
    Version3,
    /// Version 4.
    Version4,
    /// Version 5.
    Version5,
    /// Version 6.
    Version6,
    /// Reserved or not yet reported.
    #[default]
    ReservedOrUnknown,
}

impl VtVersion {
    /// Decode the version byte used in the status dialogue.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        match value {
            0..=2 => Self::Version2OrOlder,
            3 => Self::Version3,
            4 => Self::Version4,
            5 => Self::Version5,
            6 => Self::Version6,
            _ => Self::ReservedOrUnknown,
        }
    }

    /// The version byte transmitted in maintenance and pool messages.
    #[must_use]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Version2OrOlder => 2,
            Self::Version3 => 3,
            Self::Version4 => 4,
            Self::Version5 => 5,
            Self::Version6 => 6,
            Self::ReservedOrUnknown => 0xFF,
        }
    }
}

/// Graphics modes a VT server can render.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GraphicMode {
    /// 1-bit monochrome.
    #[default]
    Monochrome,
    /// 4-bit, 16 colours.
    SixteenColour,
    /// 8-bit, 256 colours.
    TwoHundredFiftySixColour,
}

impl GraphicMode {
    /// Decode the graphics mode byte of the hardware response.
    ///
    /// Out-of-range values clamp to the richest mode, matching servers
    /// that report proprietary extensions.
    #[must_use]
    pub const fn from_byte(value: u8) -> Self {
        match value {
            0 => Self::Monochrome,
            1 => Self::SixteenColour,
            _ => Self::TwoHundredFiftySixColour,
        }
    }
}

/// Font sizes of the ISO 11783-6 font matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum FontSize {
    Size6x8 = 0,
    Size8x8 = 1,
    Size8x12 = 2,
    Size12x16 = 3,
    Size16x16 = 4,
    Size16x24 = 5,
    Size24x32 = 6,
    Size32x32 = 7,
    Size32x48 = 8,
    Size48x64 = 9,
    Size64x64 = 10,
    Size64x96 = 11,
    Size96x128 = 12,
    Size128x128 = 13,
    Size128x192 = 14,
}

impl FontSize {
    /// The size's value in the font attribute byte.
    #[must_use]
    pub const fn code(self) -> u8 { self as u8 }
}

/// Font style flags of the style bitfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum FontStyle {
    Bold = 0,
    CrossedOut = 1,
    Underlined = 2,
    Italic = 3,
    Inverted = 4,
    Flashing = 5,
    FlashingHidden = 6,
    ProportionalRendering = 7,
}

/// Hardware feature flags of the hardware-features bitfield.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum HardwareFeature {
    /// Touchscreen that reports pointing messages.
    TouchscreenWithPointing = 0,
    /// Pointing device that reports pointing messages.
    PointingDevice = 1,
    /// Multiple-frequency audio output.
    MultipleFrequencyAudio = 2,
    /// Adjustable audio volume.
    AdjustableVolume = 3,
    /// Simultaneous activation of physical softkeys.
    SimultaneousActivationPhysicalKeys = 4,
    /// Simultaneous activation of buttons and softkeys.
    SimultaneousActivationButtonsAndSoftkeys = 5,
    /// Drag operations.
    DragOperation = 6,
    /// Intermediate coordinates while dragging.
    IntermediateCoordinatesDuringDrag = 7,
}

/// Softkey geometry reported by the get-number-of-softkeys response.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SoftkeyGeometry {
    /// X pixels per softkey.
    pub x_pixels: u8,
    /// Y pixels per softkey.
    pub y_pixels: u8,
    /// Virtual softkeys per softkey mask.
    pub virtual_per_mask: u8,
    /// Physical softkey count.
    pub physical: u8,
}

/// The capability snapshot accumulated during bring-up.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerCapabilities {
    pub(crate) version: VtVersion,
    pub(crate) softkeys: SoftkeyGeometry,
    pub(crate) small_font_sizes: u8,
    pub(crate) large_font_sizes: u8,
    pub(crate) font_styles: u8,
    pub(crate) graphic_mode: GraphicMode,
    pub(crate) hardware_features: u8,
    pub(crate) x_pixels: u16,
    pub(crate) y_pixels: u16,
}

impl ServerCapabilities {
    /// The VT version the server reported.
    #[must_use]
    pub const fn version(&self) -> VtVersion { self.version }

    /// The softkey geometry the server reported.
    #[must_use]
    pub const fn softkeys(&self) -> SoftkeyGeometry { self.softkeys }

    /// Whether the server renders `size`.
    ///
    /// Sizes up to 32x32 live in the small-size bitfield; the remainder
    /// in the large-size bitfield, one bit per size in declaration order.
    #[must_use]
    pub const fn font_size_supported(&self, size: FontSize) -> bool {
        let code = size.code();
        if code <= FontSize::Size32x32.code() {
            self.small_font_sizes & (1 << code) != 0
        } else {
            self.large_font_sizes & (1 << (code - 8)) != 0
        }
    }

    /// Whether the server renders `style`.
    #[must_use]
    pub const fn font_style_supported(&self, style: FontStyle) -> bool {
        self.font_styles & (1 << style as u8) != 0
    }

    /// The graphics mode the server reported.
    #[must_use]
    pub const fn graphic_mode(&self) -> GraphicMode { self.graphic_mode }

    /// Whether the server reported `feature`.
    #[must_use]
    pub const fn hardware_feature(&self, feature: HardwareFeature) -> bool {
        self.hardware_features & (1 << feature as u8) != 0
    }

    /// Data mask width in pixels.
    #[must_use]
    pub const fn x_pixels(&self) -> u16 { self.x_pixels }

    /// Data mask height in pixels.
    #[must_use]
    pub const fn y_pixels(&self) -> u16 { self.y_pixels }
}
