//! Shared rig for driving a client against a mock link and manual clock.
#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use vtlink::{
    clock::Clock,
    test_helpers::{
        end_of_pool_response_body,
        font_data_response_body,
        get_memory_response_body,
        hardware_response_body,
        server_frame,
        softkeys_response_body,
        vt_status_body,
        ManualClock,
        MockLink,
    },
    ClientConfig,
    ConnectionState,
    DeliveryHandle,
    NetworkLink,
    SendConfirmation,
    VirtualTerminalClient,
    PGN_ECU_TO_VT,
};

pub const LOCAL_ADDRESS: u8 = 0x81;
pub const SERVER_ADDRESS: u8 = 0x26;

pub struct TestRig {
    pub link: Arc<MockLink>,
    pub clock: Arc<ManualClock>,
    pub client: VirtualTerminalClient,
    pub delivery: DeliveryHandle,
}

impl TestRig {
    pub fn new() -> Self {
        let link = Arc::new(MockLink::new());
        let clock = Arc::new(ManualClock::new());
        let (client, delivery) = VirtualTerminalClient::with_parts(
            Arc::clone(&link) as Arc<dyn NetworkLink>,
            LOCAL_ADDRESS,
            SERVER_ADDRESS,
            ClientConfig::default(),
            Arc::clone(&clock) as Arc<dyn Clock>,
        );
        Self {
            link,
            clock,
            client,
            delivery,
        }
    }

    /// Run `ticks` scheduler updates.
    pub fn pump(&self, ticks: usize) {
        for _ in 0..ticks {
            self.client.update();
        }
    }

    /// Inject one frame from the VT server.
    pub fn inject(&self, body: [u8; 8]) {
        assert!(self
            .delivery
            .deliver_frame(server_frame(SERVER_ADDRESS, LOCAL_ADDRESS, body)));
    }

    /// Inject a fresh status broadcast.
    pub fn inject_status(&self) { self.inject(vt_status_body(SERVER_ADDRESS)); }

    /// Advance the clock while keeping the server's status fresh.
    pub fn advance_keeping_alive(&self, total: Duration) {
        let step = Duration::from_millis(1000);
        let mut remaining = total;
        while remaining > Duration::ZERO {
            let chunk = step.min(remaining);
            self.clock.advance(chunk);
            self.inject_status();
            self.pump(1);
            remaining -= chunk;
        }
    }

    /// Feed the standard capability dialogue of scenario S1 up to and
    /// including the hardware response.
    pub fn answer_capability_queries(&self) {
        self.inject(get_memory_response_body(3, true));
        self.pump(2);
        self.inject(softkeys_response_body(60, 32, 6, 6));
        self.pump(2);
        self.inject(font_data_response_body(0x1F, 0x07, 0x0F));
        self.pump(2);
        self.inject(hardware_response_body(0x03, 1, 800, 480));
        self.pump(2);
    }

    /// Complete every pending pool transfer successfully.
    pub fn confirm_pending_transfers(&self) {
        while let Some(transfer) = self.link.take_segmented() {
            let total = transfer.total_len() as usize;
            let payload = transfer.drain(7).expect("transfer drains");
            assert_eq!(payload.len(), total);
            assert!(self.delivery.confirm(SendConfirmation {
                pgn: PGN_ECU_TO_VT,
                success: true,
            }));
            self.pump(2);
        }
    }

    /// Drive a freshly initialized client with registered pools all the
    /// way to `Connected`.
    pub fn bring_up(&mut self) {
        self.client.initialize(false);
        self.inject_status();
        self.pump(4);
        assert_eq!(self.client.state(), ConnectionState::WaitGetMemoryResponse);

        self.answer_capability_queries();
        assert_eq!(self.client.state(), ConnectionState::UploadObjectPool);

        self.pump(1);
        self.confirm_pending_transfers();
        self.pump(2);
        assert_eq!(
            self.client.state(),
            ConnectionState::WaitEndOfObjectPoolResponse
        );

        self.inject(end_of_pool_response_body(0));
        self.pump(1);
        assert_eq!(self.client.state(), ConnectionState::Connected);
    }
}
