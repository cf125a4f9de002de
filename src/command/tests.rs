use proptest::prelude::*;
use rstest::rstest;

use super::{graphics, *};
use crate::frame::NULL_OBJECT_ID;

#[rstest]
#[case(hide_show_object(0x1234, HideShowState::Show), [0xA0, 0x34, 0x12, 0x01, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(hide_show_object(0x0001, HideShowState::Hide), [0xA0, 0x01, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(enable_disable_object(0xBEEF, EnableDisableState::Enable), [0xA1, 0xEF, 0xBE, 0x01, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(select_input_object(0x0042, SelectInputOption::SetFocus), [0xA2, 0x42, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(esc(), [0x04, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(control_audio_signal(3, 440, 500, 250), [0xA3, 0x03, 0xB8, 0x01, 0xF4, 0x01, 0xFA, 0x00])]
#[case(set_audio_volume(75), [0xA4, 0x4B, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(change_child_location(0x2222, 0x1111, 130, 124), [0xA5, 0x11, 0x11, 0x22, 0x22, 0x82, 0x7C, 0xFF])]
#[case(change_size(0x0100, 640, 240), [0xA6, 0x00, 0x01, 0x80, 0x02, 0xF0, 0x00, 0xFF])]
#[case(change_background_colour(0x0A0A, 13), [0xA7, 0x0A, 0x0A, 0x0D, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(change_numeric_value(0x5005, 0xDEAD_BEEF), [0xA8, 0x05, 0x50, 0xFF, 0xEF, 0xBE, 0xAD, 0xDE])]
#[case(change_endpoint(0x0007, 100, 50, LineDirection::BottomLeftToTopRight), [0xA9, 0x07, 0x00, 0x64, 0x00, 0x32, 0x00, 0x01])]
#[case(change_font_attributes(0x0031, 1, crate::capability::FontSize::Size16x16, 0, 0x0C), [0xAA, 0x31, 0x00, 0x01, 0x04, 0x00, 0x0C, 0xFF])]
#[case(change_line_attributes(0x0032, 9, 2, 0xF0F0), [0xAB, 0x32, 0x00, 0x09, 0x02, 0xF0, 0xF0, 0xFF])]
#[case(change_fill_attributes(0x0033, FillType::Pattern, 7, 0x0044), [0xAC, 0x33, 0x00, 0x03, 0x07, 0x44, 0x00, 0xFF])]
#[case(change_active_mask(0x0000, 0x03E8), [0xAD, 0x00, 0x00, 0xE8, 0x03, 0xFF, 0xFF, 0xFF])]
#[case(change_softkey_mask(MaskType::Alarm, 0x03E8, 0x07D0), [0xAE, 0x02, 0xE8, 0x03, 0xD0, 0x07, 0xFF, 0xFF])]
#[case(change_attribute(0x0101, 5, 1_000_000), [0xAF, 0x01, 0x01, 0x05, 0x40, 0x42, 0x0F, 0x00])]
#[case(change_priority(0x0BAD, AlarmMaskPriority::Medium), [0xB0, 0xAD, 0x0B, 0x01, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(change_list_item(0x0055, 4, NULL_OBJECT_ID), [0xB1, 0x55, 0x00, 0x04, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(delete_object_pool(), [0xB2, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(change_object_label(0x0060, 0x0061, 0, 0x0062), [0xB5, 0x60, 0x00, 0x61, 0x00, 0x00, 0x62, 0x00])]
#[case(change_polygon_point(0x0070, 2, 33, 44), [0xB6, 0x70, 0x00, 0x02, 0x21, 0x00, 0x2C, 0x00])]
#[case(change_polygon_scale(0x0071, 320, 200), [0xB7, 0x71, 0x00, 0x40, 0x01, 0xC8, 0x00, 0xFF])]
#[case(select_colour_map(0x0080), [0xBA, 0x80, 0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(identify_vt(), [0xBB, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(execute_macro(9), [0xBE, 0x09, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(execute_extended_macro(0x1001), [0xBC, 0x01, 0x10, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(lock_unlock_mask(MaskLockState::Lock, 0x03E8, 2000), [0xBD, 0x01, 0xE8, 0x03, 0xD0, 0x07, 0xFF, 0xFF])]
#[case(get_attribute_value(0x0099, 3), [0xB9, 0x99, 0x00, 0x03, 0xFF, 0xFF, 0xFF, 0xFF])]
fn fixed_commands_match_their_wire_layout(#[case] encoded: Encoded, #[case] expected: [u8; 8]) {
    assert_eq!(encoded, Encoded::Fixed(expected));
}

#[rstest]
#[case(working_set_maintenance(true, VtVersion::Version3), [0xFF, 0x01, 0x03, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(working_set_maintenance(false, VtVersion::Version4), [0xFF, 0x00, 0x04, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(get_memory(0x0001_E240), [0xC0, 0xFF, 0x40, 0xE2, 0x01, 0x00, 0xFF, 0xFF])]
#[case(get_number_of_softkeys(), [0xC2, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(get_text_font_data(), [0xC3, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(get_hardware(), [0xC7, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(get_supported_widechars(), [0xC1, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(get_window_mask_data(), [0xC4, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(get_supported_objects(), [0xC5, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(get_versions(), [0xDF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(extended_get_versions(), [0xD3, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(store_version(*b"POOLV01"), [0xD0, 0x50, 0x4F, 0x4F, 0x4C, 0x56, 0x30, 0x31])]
#[case(load_version(*b"POOLV01"), [0xD1, 0x50, 0x4F, 0x4F, 0x4C, 0x56, 0x30, 0x31])]
#[case(delete_version(*b"POOLV01"), [0xD2, 0x50, 0x4F, 0x4F, 0x4C, 0x56, 0x30, 0x31])]
#[case(end_of_object_pool(), [0x12, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF])]
fn management_messages_match_their_wire_layout(
    #[case] encoded: Encoded,
    #[case] expected: [u8; 8],
) {
    assert_eq!(encoded, Encoded::Fixed(expected));
}

#[test]
fn working_set_master_announces_member_count() {
    assert_eq!(
        working_set_master(1),
        [0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]
    );
}

#[test]
fn draw_rectangle_matches_the_reference_frame() {
    let encoded = graphics::draw_rectangle(0x0100, 40, 20);
    assert_eq!(
        encoded,
        Encoded::Fixed([0xB8, 0x00, 0x01, 0x0A, 0x28, 0x00, 0x14, 0x00])
    );
}

#[rstest]
#[case(graphics::set_graphics_cursor(0x0100, -1, 2), [0xB8, 0x00, 0x01, 0x00, 0xFF, 0xFF, 0x02, 0x00])]
#[case(graphics::move_graphics_cursor(0x0100, -300, 300), [0xB8, 0x00, 0x01, 0x01, 0xD4, 0xFE, 0x2C, 0x01])]
#[case(graphics::set_foreground_colour(0x0100, 9), [0xB8, 0x00, 0x01, 0x02, 0x09, 0xFF, 0xFF, 0xFF])]
#[case(graphics::set_background_colour(0x0100, 1), [0xB8, 0x00, 0x01, 0x03, 0x01, 0xFF, 0xFF, 0xFF])]
#[case(graphics::set_line_attributes_object(0x0100, NULL_OBJECT_ID), [0xB8, 0x00, 0x01, 0x04, 0xFF, 0xFF, 0xFF, 0xFF])]
#[case(graphics::set_fill_attributes_object(0x0100, 0x0200), [0xB8, 0x00, 0x01, 0x05, 0x00, 0x02, 0xFF, 0xFF])]
#[case(graphics::set_font_attributes_object(0x0100, 0x0201), [0xB8, 0x00, 0x01, 0x06, 0x01, 0x02, 0xFF, 0xFF])]
#[case(graphics::erase_rectangle(0x0100, 16, 8), [0xB8, 0x00, 0x01, 0x07, 0x10, 0x00, 0x08, 0x00])]
#[case(graphics::draw_point(0x0100, 5, -5), [0xB8, 0x00, 0x01, 0x08, 0x05, 0x00, 0xFB, 0xFF])]
#[case(graphics::draw_line(0x0100, 100, 100), [0xB8, 0x00, 0x01, 0x09, 0x64, 0x00, 0x64, 0x00])]
#[case(graphics::draw_closed_ellipse(0x0100, 30, 40), [0xB8, 0x00, 0x01, 0x0B, 0x1E, 0x00, 0x28, 0x00])]
#[case(graphics::pan_viewport(0x0100, -10, 10), [0xB8, 0x00, 0x01, 0x0E, 0xF6, 0xFF, 0x0A, 0x00])]
#[case(graphics::change_viewport_size(0x0100, 200, 100), [0xB8, 0x00, 0x01, 0x11, 0xC8, 0x00, 0x64, 0x00])]
#[case(graphics::draw_vt_object(0x0100, 0x0300), [0xB8, 0x00, 0x01, 0x12, 0x00, 0x03, 0xFF, 0xFF])]
#[case(graphics::copy_canvas_to_picture_graphic(0x0100, 0x0301), [0xB8, 0x00, 0x01, 0x13, 0x01, 0x03, 0xFF, 0xFF])]
#[case(graphics::copy_viewport_to_picture_graphic(0x0100, 0x0302), [0xB8, 0x00, 0x01, 0x14, 0x02, 0x03, 0xFF, 0xFF])]
fn graphics_sub_commands_match_their_wire_layout(
    #[case] encoded: Encoded,
    #[case] expected: [u8; 8],
) {
    assert_eq!(encoded, Encoded::Fixed(expected));
}

#[test]
fn zoom_viewport_packs_an_le_float() {
    let encoded = graphics::zoom_viewport(0x0100, 2.0);
    let expected_bits = 2.0_f32.to_bits().to_le_bytes();
    let Encoded::Fixed(body) = encoded else {
        panic!("zoom viewport fits one frame");
    };
    assert_eq!(&body[4..8], &expected_bits);
}

#[test]
fn pan_and_zoom_exceeds_one_frame() {
    let encoded = graphics::pan_and_zoom_viewport(0x0100, 1, -1, 0.5);
    let Encoded::Extended(payload) = encoded else {
        panic!("pan and zoom needs the transport layer");
    };
    assert_eq!(payload.len(), 12);
    assert_eq!(payload[0], 0xB8);
    assert_eq!(payload[3], 0x10);
    assert_eq!(&payload[4..6], &[0x01, 0x00]);
    assert_eq!(&payload[6..8], &[0xFF, 0xFF]);
    assert_eq!(&payload[8..12], &0.5_f32.to_bits().to_le_bytes());
}

#[test]
fn short_string_values_pad_to_one_frame() {
    let encoded = change_string_value(0x0042, b"ok").expect("short string encodes");
    assert_eq!(
        encoded,
        Encoded::Fixed([0xB3, 0x42, 0x00, 0x02, 0x00, b'o', b'k', 0xFF])
    );
}

#[test]
fn long_string_values_go_through_the_transport() {
    let text = b"HECTARES PER HOUR";
    let encoded = change_string_value(0x0042, text).expect("string encodes");
    let Encoded::Extended(payload) = encoded else {
        panic!("long string needs the transport layer");
    };
    assert_eq!(payload.len(), 5 + text.len());
    assert_eq!(payload[0], 0xB3);
    assert_eq!(&payload[3..5], &[text.len() as u8, 0x00]);
    assert_eq!(&payload[5..], text);
}

#[test]
fn oversized_string_is_rejected() {
    let text = vec![b'x'; usize::from(u16::MAX) + 1];
    assert_eq!(
        change_string_value(1, &text),
        Err(SendError::FieldTooLong {
            len: text.len(),
            max: usize::from(u16::MAX),
        })
    );
}

#[test]
fn child_position_spans_nine_bytes() {
    let encoded = change_child_position(0x2222, 0x1111, 40, 60);
    let Encoded::Extended(payload) = encoded else {
        panic!("change child position needs the transport layer");
    };
    assert_eq!(
        payload.as_ref(),
        &[0xB4, 0x11, 0x11, 0x22, 0x22, 0x28, 0x00, 0x3C, 0x00]
    );
}

#[test]
fn select_active_working_set_carries_the_name() {
    let encoded = select_active_working_set(0x0011_2233_4455_6677);
    let Encoded::Extended(payload) = encoded else {
        panic!("select active working set needs the transport layer");
    };
    assert_eq!(payload[0], 0x90);
    assert_eq!(
        &payload[1..],
        &[0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11, 0x00]
    );
}

#[test]
fn extended_version_labels_span_33_bytes() {
    let label = [0x41u8; 32];
    for (encoded, function) in [
        (extended_store_version(label), 0xD4),
        (extended_load_version(label), 0xD5),
        (extended_delete_version(label), 0xD6),
    ] {
        let Encoded::Extended(payload) = encoded else {
            panic!("extended labels need the transport layer");
        };
        assert_eq!(payload.len(), 33);
        assert_eq!(payload[0], function);
        assert_eq!(&payload[1..], &label);
    }
}

#[test]
fn draw_polygon_packs_offset_pairs() {
    let encoded =
        graphics::draw_polygon(0x0100, &[(10, 0), (0, 10), (0, 0)]).expect("polygon encodes");
    let Encoded::Extended(payload) = encoded else {
        panic!("polygons need the transport layer");
    };
    assert_eq!(payload.len(), 5 + 3 * 4);
    assert_eq!(&payload[..5], &[0xB8, 0x00, 0x01, 0x0C, 0x03]);
    assert_eq!(&payload[5..9], &[0x0A, 0x00, 0x00, 0x00]);
}

#[test]
fn draw_text_short_and_long_forms() {
    let short = graphics::draw_text(0x0100, true, b"Hi").expect("short text encodes");
    assert_eq!(
        short,
        Encoded::Fixed([0xB8, 0x00, 0x01, 0x0D, 0x01, 0x02, b'H', b'i'])
    );

    let long = graphics::draw_text(0x0100, false, b"FIELD 12").expect("text encodes");
    let Encoded::Extended(payload) = long else {
        panic!("long text needs the transport layer");
    };
    assert_eq!(payload.len(), 6 + 8);
    assert_eq!(payload[4], 0x00);
    assert_eq!(payload[5], 8);
}

#[test]
fn too_many_polygon_points_are_rejected() {
    let points = vec![(0i16, 0i16); 256];
    assert!(matches!(
        graphics::draw_polygon(1, &points),
        Err(SendError::FieldTooLong { len: 256, max: 255 })
    ));
}

// Null-object passthrough: the sentinel must be encoded verbatim wherever
// an object id is accepted.
#[rstest]
#[case(hide_show_object(NULL_OBJECT_ID, HideShowState::Hide), 1)]
#[case(change_numeric_value(NULL_OBJECT_ID, 0), 1)]
#[case(change_active_mask(NULL_OBJECT_ID, NULL_OBJECT_ID), 1)]
#[case(get_attribute_value(NULL_OBJECT_ID, 0), 1)]
#[case(graphics::draw_vt_object(NULL_OBJECT_ID, NULL_OBJECT_ID), 1)]
fn null_object_id_encodes_verbatim(#[case] encoded: Encoded, #[case] offset: usize) {
    let bytes = encoded.as_slice();
    assert_eq!(&bytes[offset..offset + 2], &[0xFF, 0xFF]);
}

proptest! {
    #[test]
    fn change_numeric_value_round_trips(object_id: u16, value: u32) {
        let Encoded::Fixed(body) = change_numeric_value(object_id, value) else {
            panic!("fixed layout");
        };
        prop_assert_eq!(u16::from_le_bytes([body[1], body[2]]), object_id);
        prop_assert_eq!(
            u32::from_le_bytes([body[4], body[5], body[6], body[7]]),
            value
        );
    }

    #[test]
    fn change_size_round_trips(object_id: u16, width: u16, height: u16) {
        let Encoded::Fixed(body) = change_size(object_id, width, height) else {
            panic!("fixed layout");
        };
        prop_assert_eq!(u16::from_le_bytes([body[1], body[2]]), object_id);
        prop_assert_eq!(u16::from_le_bytes([body[3], body[4]]), width);
        prop_assert_eq!(u16::from_le_bytes([body[5], body[6]]), height);
    }

    #[test]
    fn set_graphics_cursor_round_trips(gc_id: u16, x: i16, y: i16) {
        let Encoded::Fixed(body) = graphics::set_graphics_cursor(gc_id, x, y) else {
            panic!("fixed layout");
        };
        prop_assert_eq!(u16::from_le_bytes([body[1], body[2]]), gc_id);
        prop_assert_eq!(i16::from_le_bytes([body[4], body[5]]), x);
        prop_assert_eq!(i16::from_le_bytes([body[6], body[7]]), y);
    }

    #[test]
    fn string_values_round_trip(object_id: u16, value in proptest::collection::vec(any::<u8>(), 0..64)) {
        let encoded = change_string_value(object_id, &value).expect("string encodes");
        let bytes = encoded.as_slice();
        prop_assert_eq!(bytes[0], 0xB3);
        prop_assert_eq!(u16::from_le_bytes([bytes[1], bytes[2]]), object_id);
        let len = usize::from(u16::from_le_bytes([bytes[3], bytes[4]]));
        prop_assert_eq!(len, value.len());
        prop_assert_eq!(&bytes[5..5 + len], value.as_slice());
    }
}
