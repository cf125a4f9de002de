//! The guarded runtime command surface.
//!
//! Every method encodes its command with the pure encoders in
//! [`crate::command`] and submits the payload towards the partner. All
//! of them are rejected with [`SendError::NotConnected`] until the state
//! machine reaches `Connected`; the bring-up dialogue is driven by the
//! state machine itself, never through this surface.

use super::VirtualTerminalClient;
use crate::{
    capability::FontSize,
    command::{
        self,
        graphics,
        AlarmMaskPriority,
        Encoded,
        EnableDisableState,
        FillType,
        HideShowState,
        LineDirection,
        MaskLockState,
        MaskType,
        SelectInputOption,
    },
    error::SendError,
    metrics,
    state::ConnectionState,
};

impl VirtualTerminalClient {
    /// Gate on `Connected`, then put the payload on the wire.
    ///
    /// The state check holds the client lock; submission to the network
    /// stack happens after it is released.
    fn send_command(&self, encoded: &Encoded) -> Result<(), SendError> {
        {
            let core = self.shared.core();
            if core.state != ConnectionState::Connected {
                metrics::inc_commands_rejected("not_connected");
                return Err(SendError::NotConnected);
            }
        }
        if self.shared.transmit(encoded) {
            metrics::inc_commands_sent();
            Ok(())
        } else {
            metrics::inc_commands_rejected("queue_full");
            Err(SendError::Rejected)
        }
    }

    /// Hide or show a container object.
    ///
    /// # Errors
    ///
    /// Returns a [`SendError`] if the client is not connected or the
    /// stack refuses the frame; the same applies to every `send_*`
    /// method below.
    pub fn send_hide_show_object(
        &self,
        object_id: u16,
        state: HideShowState,
    ) -> Result<(), SendError> {
        self.send_command(&command::hide_show_object(object_id, state))
    }

    /// Enable or disable an input, button, or animation object.
    pub fn send_enable_disable_object(
        &self,
        object_id: u16,
        state: EnableDisableState,
    ) -> Result<(), SendError> {
        self.send_command(&command::enable_disable_object(object_id, state))
    }

    /// Force selection of an input field, button, or key object.
    pub fn send_select_input_object(
        &self,
        object_id: u16,
        option: SelectInputOption,
    ) -> Result<(), SendError> {
        self.send_command(&command::select_input_object(object_id, option))
    }

    /// Abort the open input operation.
    pub fn send_esc(&self) -> Result<(), SendError> { self.send_command(&command::esc()) }

    /// Command an audio signal.
    pub fn send_control_audio_signal(
        &self,
        activations: u8,
        frequency_hz: u16,
        duration_ms: u16,
        off_time_ms: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::control_audio_signal(
            activations,
            frequency_hz,
            duration_ms,
            off_time_ms,
        ))
    }

    /// Set the audio volume for subsequent audio signals.
    pub fn send_set_audio_volume(&self, volume_percent: u8) -> Result<(), SendError> {
        self.send_command(&command::set_audio_volume(volume_percent))
    }

    /// Move a child object relative to its current position.
    pub fn send_change_child_location(
        &self,
        object_id: u16,
        parent_object_id: u16,
        relative_x: u8,
        relative_y: u8,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_child_location(
            object_id,
            parent_object_id,
            relative_x,
            relative_y,
        ))
    }

    /// Place a child object at an absolute position within its parent.
    pub fn send_change_child_position(
        &self,
        object_id: u16,
        parent_object_id: u16,
        x: u16,
        y: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_child_position(
            object_id,
            parent_object_id,
            x,
            y,
        ))
    }

    /// Resize an object.
    pub fn send_change_size(
        &self,
        object_id: u16,
        width: u16,
        height: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_size(object_id, width, height))
    }

    /// Change an object's background colour.
    pub fn send_change_background_colour(
        &self,
        object_id: u16,
        colour: u8,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_background_colour(object_id, colour))
    }

    /// Change the numeric value of an object.
    pub fn send_change_numeric_value(&self, object_id: u16, value: u32) -> Result<(), SendError> {
        self.send_command(&command::change_numeric_value(object_id, value))
    }

    /// Change the string value of an output or input string object.
    pub fn send_change_string_value(
        &self,
        object_id: u16,
        value: &[u8],
    ) -> Result<(), SendError> {
        self.send_command(&command::change_string_value(object_id, value)?)
    }

    /// Change the endpoint of an output line object.
    pub fn send_change_endpoint(
        &self,
        object_id: u16,
        width: u16,
        height: u16,
        direction: LineDirection,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_endpoint(object_id, width, height, direction))
    }

    /// Rewrite a font attributes object.
    pub fn send_change_font_attributes(
        &self,
        object_id: u16,
        colour: u8,
        size: FontSize,
        font_type: u8,
        style_bits: u8,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_font_attributes(
            object_id, colour, size, font_type, style_bits,
        ))
    }

    /// Rewrite a line attributes object.
    pub fn send_change_line_attributes(
        &self,
        object_id: u16,
        colour: u8,
        width: u8,
        line_art: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_line_attributes(
            object_id, colour, width, line_art,
        ))
    }

    /// Rewrite a fill attributes object.
    pub fn send_change_fill_attributes(
        &self,
        object_id: u16,
        fill_type: FillType,
        colour: u8,
        pattern_object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_fill_attributes(
            object_id,
            fill_type,
            colour,
            pattern_object_id,
        ))
    }

    /// Switch the active mask of a working set.
    pub fn send_change_active_mask(
        &self,
        working_set_object_id: u16,
        new_mask_object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_active_mask(
            working_set_object_id,
            new_mask_object_id,
        ))
    }

    /// Attach a different softkey mask to a data or alarm mask.
    pub fn send_change_softkey_mask(
        &self,
        mask_type: MaskType,
        mask_object_id: u16,
        softkey_mask_object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_softkey_mask(
            mask_type,
            mask_object_id,
            softkey_mask_object_id,
        ))
    }

    /// Change any attribute with an assigned attribute id.
    pub fn send_change_attribute(
        &self,
        object_id: u16,
        attribute_id: u8,
        value: u32,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_attribute(object_id, attribute_id, value))
    }

    /// Change the priority of an alarm mask.
    pub fn send_change_priority(
        &self,
        alarm_mask_object_id: u16,
        priority: AlarmMaskPriority,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_priority(alarm_mask_object_id, priority))
    }

    /// Replace a list item.
    pub fn send_change_list_item(
        &self,
        list_object_id: u16,
        index: u8,
        new_object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_list_item(list_object_id, index, new_object_id))
    }

    /// Delete the working set's pool from the server's volatile memory.
    pub fn send_delete_object_pool(&self) -> Result<(), SendError> {
        self.send_command(&command::delete_object_pool())
    }

    /// Change the label of an object.
    pub fn send_change_object_label(
        &self,
        object_id: u16,
        label_object_id: u16,
        font_type: u8,
        graphic_object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_object_label(
            object_id,
            label_object_id,
            font_type,
            graphic_object_id,
        ))
    }

    /// Move one point of an output polygon object.
    pub fn send_change_polygon_point(
        &self,
        object_id: u16,
        point_index: u8,
        x: u16,
        y: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_polygon_point(object_id, point_index, x, y))
    }

    /// Rescale a complete output polygon object.
    pub fn send_change_polygon_scale(
        &self,
        object_id: u16,
        width: u16,
        height: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::change_polygon_scale(object_id, width, height))
    }

    /// Select a colour map or palette object.
    pub fn send_select_colour_map(&self, object_id: u16) -> Result<(), SendError> {
        self.send_command(&command::select_colour_map(object_id))
    }

    /// Ask the server to display its identity.
    pub fn send_identify_vt(&self) -> Result<(), SendError> {
        self.send_command(&command::identify_vt())
    }

    /// Execute a macro by its 8-bit object id.
    pub fn send_execute_macro(&self, macro_id: u8) -> Result<(), SendError> {
        self.send_command(&command::execute_macro(macro_id))
    }

    /// Execute an extended macro by its 16-bit object id.
    pub fn send_execute_extended_macro(&self, macro_object_id: u16) -> Result<(), SendError> {
        self.send_command(&command::execute_extended_macro(macro_object_id))
    }

    /// Freeze or resume rendering of the visible mask.
    pub fn send_lock_unlock_mask(
        &self,
        state: MaskLockState,
        object_id: u16,
        timeout_ms: u16,
    ) -> Result<(), SendError> {
        self.send_command(&command::lock_unlock_mask(state, object_id, timeout_ms))
    }

    /// Hand the active working set role to another working set master.
    pub fn send_select_active_working_set(&self, name: u64) -> Result<(), SendError> {
        self.send_command(&command::select_active_working_set(name))
    }

    /// Query one attribute value of an object.
    pub fn send_get_attribute_value(
        &self,
        object_id: u16,
        attribute_id: u8,
    ) -> Result<(), SendError> {
        self.send_command(&command::get_attribute_value(object_id, attribute_id))
    }

    /// Query supported wide characters.
    pub fn send_get_supported_widechars(&self) -> Result<(), SendError> {
        self.send_command(&command::get_supported_widechars())
    }

    /// Query window mask data.
    pub fn send_get_window_mask_data(&self) -> Result<(), SendError> {
        self.send_command(&command::get_window_mask_data())
    }

    /// Query the object types the server supports.
    pub fn send_get_supported_objects(&self) -> Result<(), SendError> {
        self.send_command(&command::get_supported_objects())
    }

    /// Query stored pool versions.
    pub fn send_get_versions(&self) -> Result<(), SendError> {
        self.send_command(&command::get_versions())
    }

    /// Query stored pool versions with 32-byte labels.
    pub fn send_extended_get_versions(&self) -> Result<(), SendError> {
        self.send_command(&command::extended_get_versions())
    }

    /// Store the uploaded pool under a 7-byte version label.
    pub fn send_store_version(&self, label: [u8; 7]) -> Result<(), SendError> {
        self.send_command(&command::store_version(label))
    }

    /// Load a stored pool by its 7-byte version label.
    pub fn send_load_version(&self, label: [u8; 7]) -> Result<(), SendError> {
        self.send_command(&command::load_version(label))
    }

    /// Delete a stored pool by its 7-byte version label.
    pub fn send_delete_version(&self, label: [u8; 7]) -> Result<(), SendError> {
        self.send_command(&command::delete_version(label))
    }

    /// Store the uploaded pool under a 32-byte version label.
    pub fn send_extended_store_version(&self, label: [u8; 32]) -> Result<(), SendError> {
        self.send_command(&command::extended_store_version(label))
    }

    /// Load a stored pool by its 32-byte version label.
    pub fn send_extended_load_version(&self, label: [u8; 32]) -> Result<(), SendError> {
        self.send_command(&command::extended_load_version(label))
    }

    /// Delete a stored pool by its 32-byte version label.
    pub fn send_extended_delete_version(&self, label: [u8; 32]) -> Result<(), SendError> {
        self.send_command(&command::extended_delete_version(label))
    }

    // --- Graphics context commands ---

    /// Place the graphics cursor at an absolute position.
    pub fn send_set_graphics_cursor(
        &self,
        gc_object_id: u16,
        x: i16,
        y: i16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::set_graphics_cursor(gc_object_id, x, y))
    }

    /// Move the graphics cursor relative to its current position.
    pub fn send_move_graphics_cursor(
        &self,
        gc_object_id: u16,
        dx: i16,
        dy: i16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::move_graphics_cursor(gc_object_id, dx, dy))
    }

    /// Set the foreground colour attribute.
    pub fn send_set_foreground_colour(
        &self,
        gc_object_id: u16,
        colour: u8,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::set_foreground_colour(gc_object_id, colour))
    }

    /// Set the background colour attribute.
    pub fn send_set_background_colour(
        &self,
        gc_object_id: u16,
        colour: u8,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::set_background_colour(gc_object_id, colour))
    }

    /// Select the line attributes object for following draw commands.
    pub fn send_set_line_attributes_object(
        &self,
        gc_object_id: u16,
        line_attributes_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::set_line_attributes_object(
            gc_object_id,
            line_attributes_id,
        ))
    }

    /// Select the fill attributes object for following draw commands.
    pub fn send_set_fill_attributes_object(
        &self,
        gc_object_id: u16,
        fill_attributes_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::set_fill_attributes_object(
            gc_object_id,
            fill_attributes_id,
        ))
    }

    /// Select the font attributes object for following text commands.
    pub fn send_set_font_attributes_object(
        &self,
        gc_object_id: u16,
        font_attributes_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::set_font_attributes_object(
            gc_object_id,
            font_attributes_id,
        ))
    }

    /// Fill a rectangle at the cursor with the background colour.
    pub fn send_erase_rectangle(
        &self,
        gc_object_id: u16,
        width: u16,
        height: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::erase_rectangle(gc_object_id, width, height))
    }

    /// Set one pixel and move the cursor there.
    pub fn send_draw_point(
        &self,
        gc_object_id: u16,
        x_offset: i16,
        y_offset: i16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::draw_point(gc_object_id, x_offset, y_offset))
    }

    /// Draw a line from the cursor to the given end pixel.
    pub fn send_draw_line(
        &self,
        gc_object_id: u16,
        x_offset: i16,
        y_offset: i16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::draw_line(gc_object_id, x_offset, y_offset))
    }

    /// Draw a rectangle at the cursor.
    pub fn send_draw_rectangle(
        &self,
        gc_object_id: u16,
        width: u16,
        height: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::draw_rectangle(gc_object_id, width, height))
    }

    /// Draw a closed ellipse bounded by the cursor and the given extent.
    pub fn send_draw_closed_ellipse(
        &self,
        gc_object_id: u16,
        width: u16,
        height: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::draw_closed_ellipse(gc_object_id, width, height))
    }

    /// Draw a polygon from the cursor through the given offsets.
    pub fn send_draw_polygon(
        &self,
        gc_object_id: u16,
        points: &[(i16, i16)],
    ) -> Result<(), SendError> {
        self.send_command(&graphics::draw_polygon(gc_object_id, points)?)
    }

    /// Draw text at the cursor using the current font attributes.
    pub fn send_draw_text(
        &self,
        gc_object_id: u16,
        transparent: bool,
        text: &[u8],
    ) -> Result<(), SendError> {
        self.send_command(&graphics::draw_text(gc_object_id, transparent, text)?)
    }

    /// Pan the viewport over the underlying canvas.
    pub fn send_pan_viewport(&self, gc_object_id: u16, x: i16, y: i16) -> Result<(), SendError> {
        self.send_command(&graphics::pan_viewport(gc_object_id, x, y))
    }

    /// Zoom the viewport.
    pub fn send_zoom_viewport(&self, gc_object_id: u16, zoom: f32) -> Result<(), SendError> {
        self.send_command(&graphics::zoom_viewport(gc_object_id, zoom))
    }

    /// Pan and zoom the viewport in one command.
    pub fn send_pan_and_zoom_viewport(
        &self,
        gc_object_id: u16,
        x: i16,
        y: i16,
        zoom: f32,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::pan_and_zoom_viewport(gc_object_id, x, y, zoom))
    }

    /// Resize the viewport.
    pub fn send_change_viewport_size(
        &self,
        gc_object_id: u16,
        width: u16,
        height: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::change_viewport_size(gc_object_id, width, height))
    }

    /// Draw another VT object at the cursor.
    pub fn send_draw_vt_object(
        &self,
        gc_object_id: u16,
        object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::draw_vt_object(gc_object_id, object_id))
    }

    /// Copy the canvas into a picture graphic object.
    pub fn send_copy_canvas_to_picture_graphic(
        &self,
        gc_object_id: u16,
        picture_object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::copy_canvas_to_picture_graphic(
            gc_object_id,
            picture_object_id,
        ))
    }

    /// Copy the viewport into a picture graphic object.
    pub fn send_copy_viewport_to_picture_graphic(
        &self,
        gc_object_id: u16,
        picture_object_id: u16,
    ) -> Result<(), SendError> {
        self.send_command(&graphics::copy_viewport_to_picture_graphic(
            gc_object_id,
            picture_object_id,
        ))
    }
}
