//! Object pool upload pipeline: paged sources, multiplexor prepending,
//! ascending pool order, and failure handling.

mod common;

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use common::{TestRig, LOCAL_ADDRESS, SERVER_ADDRESS};
use vtlink::{
    test_helpers::end_of_pool_response_body,
    ConnectionState,
    PoolData,
    SendConfirmation,
    VtVersion,
    PGN_ECU_TO_VT,
};

fn drive_to_upload(rig: &mut TestRig) {
    rig.client.initialize(false);
    rig.inject_status();
    rig.pump(4);
    rig.answer_capability_queries();
    assert_eq!(rig.client.state(), ConnectionState::UploadObjectPool);
}

#[test]
fn paged_pool_streams_every_offset_once_with_the_multiplexor() {
    const POOL_SIZE: u32 = 20_000;
    const CHUNK: usize = 256;

    let mut rig = TestRig::new();
    let requests: Arc<Mutex<Vec<(u32, u32)>>> = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    rig.client
        .register_pool_data_chunk_callback(0, VtVersion::Version3, POOL_SIZE, move |_, offset, buf| {
            recorded
                .lock()
                .expect("request log")
                .push((offset, buf.len() as u32));
            for (i, byte) in buf.iter_mut().enumerate() {
                *byte = ((offset as usize + i) % 251) as u8;
            }
            true
        })
        .expect("paged pool registers");

    drive_to_upload(&mut rig);

    let transfer = rig.link.take_segmented().expect("transfer submitted");
    assert_eq!(transfer.pgn, PGN_ECU_TO_VT);
    assert_eq!(transfer.source, LOCAL_ADDRESS);
    assert_eq!(transfer.destination, SERVER_ADDRESS);
    assert_eq!(transfer.total_len(), POOL_SIZE + 1);

    let payload = transfer.drain(CHUNK).expect("transfer drains");
    assert_eq!(payload.len(), POOL_SIZE as usize + 1);
    assert_eq!(payload[0], 0x11);
    for (k, &byte) in payload[1..].iter().enumerate() {
        assert_eq!(byte, (k % 251) as u8, "pool byte {k}");
    }

    // The provider saw ascending offsets tiling [0, POOL_SIZE) exactly
    // once each.
    let requests = requests.lock().expect("request log");
    let mut expected_offset = 0u32;
    for &(offset, len) in requests.iter() {
        assert_eq!(offset, expected_offset);
        expected_offset += len;
    }
    assert_eq!(expected_offset, POOL_SIZE);

    assert!(rig.delivery.confirm(SendConfirmation {
        pgn: PGN_ECU_TO_VT,
        success: true,
    }));
    rig.pump(2);
    assert!(rig.client.pool_uploaded(0));
    assert_eq!(
        rig.client.state(),
        ConnectionState::WaitEndOfObjectPoolResponse
    );
}

#[test]
fn pools_upload_in_ascending_index_order() {
    let mut rig = TestRig::new();
    rig.client
        .set_object_pool(
            7,
            VtVersion::Version3,
            PoolData::Contiguous(Bytes::from(vec![0xB7; 700])),
        )
        .expect("pool registers");
    rig.client
        .set_object_pool(
            2,
            VtVersion::Version3,
            PoolData::Dynamic(vec![0xB2; 200]),
        )
        .expect("pool registers");

    drive_to_upload(&mut rig);

    let first = rig.link.take_segmented().expect("first transfer");
    assert_eq!(first.total_len(), 201);
    let first_payload = first.drain(7).expect("first drains");
    assert_eq!(first_payload[0], 0x11);
    assert_eq!(first_payload[1], 0xB2);
    rig.delivery.confirm(SendConfirmation {
        pgn: PGN_ECU_TO_VT,
        success: true,
    });
    rig.pump(2);
    assert!(rig.client.pool_uploaded(2));
    assert!(!rig.client.pool_uploaded(7));

    let second = rig.link.take_segmented().expect("second transfer");
    assert_eq!(second.total_len(), 701);
    let second_payload = second.drain(7).expect("second drains");
    assert_eq!(second_payload[1], 0xB7);
    rig.delivery.confirm(SendConfirmation {
        pgn: PGN_ECU_TO_VT,
        success: true,
    });
    rig.pump(2);
    assert!(rig.client.pool_uploaded(7));
    assert_eq!(
        rig.client.state(),
        ConnectionState::WaitEndOfObjectPoolResponse
    );
}

#[test]
fn transport_failure_fails_the_connection_and_keeps_the_flag_clear() {
    let mut rig = TestRig::new();
    rig.client
        .set_object_pool(
            0,
            VtVersion::Version3,
            PoolData::Dynamic(vec![0x11; 64]),
        )
        .expect("pool registers");

    drive_to_upload(&mut rig);
    let _transfer = rig.link.take_segmented().expect("transfer submitted");

    rig.delivery.confirm(SendConfirmation {
        pgn: PGN_ECU_TO_VT,
        success: false,
    });
    rig.pump(2);

    assert_eq!(rig.client.state(), ConnectionState::Failed);
    assert!(!rig.client.pool_uploaded(0));
}

#[test]
fn failed_pool_source_aborts_the_drain() {
    let mut rig = TestRig::new();
    rig.client
        .register_pool_data_chunk_callback(0, VtVersion::Version3, 1000, |_, offset, buf| {
            if offset >= 500 {
                return false;
            }
            buf.fill(0xEE);
            true
        })
        .expect("paged pool registers");

    drive_to_upload(&mut rig);
    let transfer = rig.link.take_segmented().expect("transfer submitted");
    let failed_at = transfer.drain(256).expect_err("source fails mid-pool");
    assert!(failed_at > 500);

    // The transport reports the abort; the connection fails.
    rig.delivery.confirm(SendConfirmation {
        pgn: PGN_ECU_TO_VT,
        success: false,
    });
    rig.pump(2);
    assert_eq!(rig.client.state(), ConnectionState::Failed);
}

#[test]
fn end_of_pool_error_response_fails_the_connection() {
    let mut rig = TestRig::new();
    rig.client
        .set_object_pool(
            0,
            VtVersion::Version3,
            PoolData::Dynamic(vec![0x22; 32]),
        )
        .expect("pool registers");

    drive_to_upload(&mut rig);
    rig.pump(1);
    rig.confirm_pending_transfers();
    assert_eq!(
        rig.client.state(),
        ConnectionState::WaitEndOfObjectPoolResponse
    );

    rig.inject(end_of_pool_response_body(0x01));
    rig.pump(1);
    assert_eq!(rig.client.state(), ConnectionState::Failed);
}
