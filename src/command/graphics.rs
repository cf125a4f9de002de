//! Graphics context sub-commands.
//!
//! The graphics context command (`0xB8`) addresses a graphics context
//! object and selects one of 21 sub-commands in byte 3, after the object
//! id in bytes 1–2. Sub-command fields follow from byte 4.

use bytes::{BufMut, BytesMut};

use super::{seal, Encoded};
use crate::{
    error::SendError,
    frame::FrameData,
    function::Function,
};

/// Sub-command selector carried in byte 3 of a graphics context command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum GraphicsSubCommand {
    SetGraphicsCursor = 0x00,
    MoveGraphicsCursor = 0x01,
    SetForegroundColour = 0x02,
    SetBackgroundColour = 0x03,
    SetLineAttributesObject = 0x04,
    SetFillAttributesObject = 0x05,
    SetFontAttributesObject = 0x06,
    EraseRectangle = 0x07,
    DrawPoint = 0x08,
    DrawLine = 0x09,
    DrawRectangle = 0x0A,
    DrawClosedEllipse = 0x0B,
    DrawPolygon = 0x0C,
    DrawText = 0x0D,
    PanViewport = 0x0E,
    ZoomViewport = 0x0F,
    PanAndZoomViewport = 0x10,
    ChangeViewportSize = 0x11,
    DrawVtObject = 0x12,
    CopyCanvasToPictureGraphic = 0x13,
    CopyViewportToPictureGraphic = 0x14,
}

fn header(gc_object_id: u16, sub: GraphicsSubCommand) -> FrameData {
    let mut body = FrameData::for_function(Function::GraphicsContext.code());
    body.put_u16_le(gc_object_id).put_u8(sub as u8);
    body
}

/// Place the graphics cursor at an absolute position.
#[must_use]
pub fn set_graphics_cursor(gc_object_id: u16, x: i16, y: i16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::SetGraphicsCursor)
            .put_i16_le(x)
            .put_i16_le(y)
            .finish(),
    )
}

/// Move the graphics cursor relative to its current position.
#[must_use]
pub fn move_graphics_cursor(gc_object_id: u16, dx: i16, dy: i16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::MoveGraphicsCursor)
            .put_i16_le(dx)
            .put_i16_le(dy)
            .finish(),
    )
}

/// Set the foreground colour attribute.
#[must_use]
pub fn set_foreground_colour(gc_object_id: u16, colour: u8) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::SetForegroundColour)
            .put_u8(colour)
            .finish(),
    )
}

/// Set the background colour attribute.
#[must_use]
pub fn set_background_colour(gc_object_id: u16, colour: u8) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::SetBackgroundColour)
            .put_u8(colour)
            .finish(),
    )
}

/// Select the line attributes object used by following draw commands.
#[must_use]
pub fn set_line_attributes_object(gc_object_id: u16, line_attributes_id: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::SetLineAttributesObject)
            .put_u16_le(line_attributes_id)
            .finish(),
    )
}

/// Select the fill attributes object used by following draw commands.
#[must_use]
pub fn set_fill_attributes_object(gc_object_id: u16, fill_attributes_id: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::SetFillAttributesObject)
            .put_u16_le(fill_attributes_id)
            .finish(),
    )
}

/// Select the font attributes object used by following text commands.
#[must_use]
pub fn set_font_attributes_object(gc_object_id: u16, font_attributes_id: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::SetFontAttributesObject)
            .put_u16_le(font_attributes_id)
            .finish(),
    )
}

/// Fill a rectangle at the cursor with the background colour.
#[must_use]
pub fn erase_rectangle(gc_object_id: u16, width: u16, height: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::EraseRectangle)
            .put_u16_le(width)
            .put_u16_le(height)
            .finish(),
    )
}

/// Set one pixel and move the cursor there.
#[must_use]
pub fn draw_point(gc_object_id: u16, x_offset: i16, y_offset: i16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::DrawPoint)
            .put_i16_le(x_offset)
            .put_i16_le(y_offset)
            .finish(),
    )
}

/// Draw a line from the cursor to the given end pixel.
#[must_use]
pub fn draw_line(gc_object_id: u16, x_offset: i16, y_offset: i16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::DrawLine)
            .put_i16_le(x_offset)
            .put_i16_le(y_offset)
            .finish(),
    )
}

/// Draw a rectangle at the cursor.
#[must_use]
pub fn draw_rectangle(gc_object_id: u16, width: u16, height: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::DrawRectangle)
            .put_u16_le(width)
            .put_u16_le(height)
            .finish(),
    )
}

/// Draw a closed ellipse bounded by the cursor and the given extent.
#[must_use]
pub fn draw_closed_ellipse(gc_object_id: u16, width: u16, height: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::DrawClosedEllipse)
            .put_u16_le(width)
            .put_u16_le(height)
            .finish(),
    )
}

/// Draw a polygon from the cursor through the given offsets.
///
/// The polygon closes only if the last point is offset (0, 0).
///
/// # Errors
///
/// Returns [`SendError::FieldTooLong`] if more than 255 points are given.
pub fn draw_polygon(gc_object_id: u16, points: &[(i16, i16)]) -> Result<Encoded, SendError> {
    let count = u8::try_from(points.len()).map_err(|_| SendError::FieldTooLong {
        len: points.len(),
        max: usize::from(u8::MAX),
    })?;
    let mut payload = BytesMut::with_capacity(5 + points.len() * 4);
    payload.put_u8(Function::GraphicsContext.code());
    payload.put_u16_le(gc_object_id);
    payload.put_u8(GraphicsSubCommand::DrawPolygon as u8);
    payload.put_u8(count);
    for &(x, y) in points {
        payload.put_i16_le(x);
        payload.put_i16_le(y);
    }
    Ok(seal(payload))
}

/// Draw text at the cursor using the current font attributes.
///
/// # Errors
///
/// Returns [`SendError::FieldTooLong`] if `text` exceeds the 8-bit
/// length field.
pub fn draw_text(gc_object_id: u16, transparent: bool, text: &[u8]) -> Result<Encoded, SendError> {
    let len = u8::try_from(text.len()).map_err(|_| SendError::FieldTooLong {
        len: text.len(),
        max: usize::from(u8::MAX),
    })?;
    let mut payload = BytesMut::with_capacity(6 + text.len());
    payload.put_u8(Function::GraphicsContext.code());
    payload.put_u16_le(gc_object_id);
    payload.put_u8(GraphicsSubCommand::DrawText as u8);
    payload.put_u8(u8::from(transparent));
    payload.put_u8(len);
    payload.put_slice(text);
    Ok(seal(payload))
}

/// Pan the viewport over the underlying canvas.
#[must_use]
pub fn pan_viewport(gc_object_id: u16, x: i16, y: i16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::PanViewport)
            .put_i16_le(x)
            .put_i16_le(y)
            .finish(),
    )
}

/// Zoom the viewport. `zoom` spans −32.0 to 32.0.
#[must_use]
pub fn zoom_viewport(gc_object_id: u16, zoom: f32) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::ZoomViewport)
            .put_f32_le(zoom)
            .finish(),
    )
}

/// Pan and zoom the viewport in one command.
#[must_use]
pub fn pan_and_zoom_viewport(gc_object_id: u16, x: i16, y: i16, zoom: f32) -> Encoded {
    let mut payload = BytesMut::with_capacity(12);
    payload.put_u8(Function::GraphicsContext.code());
    payload.put_u16_le(gc_object_id);
    payload.put_u8(GraphicsSubCommand::PanAndZoomViewport as u8);
    payload.put_i16_le(x);
    payload.put_i16_le(y);
    payload.put_f32_le(zoom);
    seal(payload)
}

/// Resize the viewport.
#[must_use]
pub fn change_viewport_size(gc_object_id: u16, width: u16, height: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::ChangeViewportSize)
            .put_u16_le(width)
            .put_u16_le(height)
            .finish(),
    )
}

/// Draw another VT object at the cursor.
#[must_use]
pub fn draw_vt_object(gc_object_id: u16, object_id: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::DrawVtObject)
            .put_u16_le(object_id)
            .finish(),
    )
}

/// Copy the canvas into a picture graphic object.
#[must_use]
pub fn copy_canvas_to_picture_graphic(gc_object_id: u16, picture_object_id: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::CopyCanvasToPictureGraphic)
            .put_u16_le(picture_object_id)
            .finish(),
    )
}

/// Copy the viewport into a picture graphic object.
#[must_use]
pub fn copy_viewport_to_picture_graphic(gc_object_id: u16, picture_object_id: u16) -> Encoded {
    Encoded::Fixed(
        header(gc_object_id, GraphicsSubCommand::CopyViewportToPictureGraphic)
            .put_u16_le(picture_object_id)
            .finish(),
    )
}
