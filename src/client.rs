//! The virtual terminal client.
//!
//! [`VirtualTerminalClient`] owns the connection state machine, the
//! object pool upload pipeline, the live status and capability models,
//! and the observer registries. Construct it with the network link and
//! addressing, register at least one object pool, then call
//! [`initialize`](VirtualTerminalClient::initialize). The client brings
//! the connection up on its own; once `Connected`, the `send_*` surface
//! is open for runtime commands.
//!
//! All state lives behind one lock. The
//! [`update`](VirtualTerminalClient::update) tick drains inbound
//! deliveries, advances timers and the state machine, and emits the
//! maintenance heartbeat; run it from the spawned worker or call it at
//! least every 50 ms from your own loop.

use std::{
    collections::BTreeMap,
    sync::{
        mpsc::{Receiver, TryRecvError},
        Arc,
        Mutex,
        MutexGuard,
        PoisonError,
    },
    thread,
    time::Instant,
};

use log::{debug, warn};
use tokio_util::sync::CancellationToken;

use crate::{
    callback::{CallbackHandle, CallbackList},
    capability::{
        FontSize,
        FontStyle,
        GraphicMode,
        HardwareFeature,
        ServerCapabilities,
        SoftkeyGeometry,
        VtVersion,
    },
    clock::{Clock, MonotonicClock},
    command::{self, Encoded},
    config::ClientConfig,
    dispatch::{self, Inbound},
    error::PoolError,
    event::{
        KeyEvent,
        PointingEvent,
        SelectInputObjectEvent,
        UnsupportedFunctionEvent,
    },
    frame::{Frame, PGN_ECU_TO_VT, PGN_VT_TO_ECU, PGN_WORKING_SET_MASTER},
    metrics,
    network::{self, Delivery, DeliveryHandle, NetworkLink, SendConfirmation},
    pool::{PoolData, PoolSlot, PoolTransfer, UploadPipeline, UploadState},
    retry::{RetryFlags, TransmitFlag},
    state::ConnectionState,
    status::StatusTracker,
};

mod commands;

/// Destination address of broadcast frames.
const GLOBAL_ADDRESS: u8 = 0xFF;

/// An ISO 11783-6 working set driving a remote VT server.
pub struct VirtualTerminalClient {
    shared: Arc<Shared>,
    shutdown: CancellationToken,
    worker: Option<thread::JoinHandle<()>>,
}

struct Shared {
    link: Arc<dyn NetworkLink>,
    clock: Arc<dyn Clock>,
    config: ClientConfig,
    local_address: u8,
    partner_address: u8,
    core: Mutex<Core>,
}

struct Core {
    initialized: bool,
    state: ConnectionState,
    state_entered: Instant,
    response_retries: u8,
    status: StatusTracker,
    capabilities: ServerCapabilities,
    pools: BTreeMap<u8, PoolSlot>,
    upload: UploadPipeline,
    retry_flags: RetryFlags,
    last_maintenance: Option<Instant>,
    first_maintenance_pending: bool,
    softkey_callbacks: CallbackList<KeyEvent>,
    button_callbacks: CallbackList<KeyEvent>,
    pointing_callbacks: CallbackList<PointingEvent>,
    select_input_callbacks: CallbackList<SelectInputObjectEvent>,
    unsupported_callbacks: CallbackList<UnsupportedFunctionEvent>,
    inbox: Receiver<Delivery>,
}

/// Event fanout work collected under the lock and run after release, so
/// subscribers may call back into the client.
enum Fanout {
    SoftKey(KeyEvent, Vec<Arc<dyn Fn(&KeyEvent) + Send + Sync>>),
    Button(KeyEvent, Vec<Arc<dyn Fn(&KeyEvent) + Send + Sync>>),
    Pointing(
        PointingEvent,
        Vec<Arc<dyn Fn(&PointingEvent) + Send + Sync>>,
    ),
    SelectInput(
        SelectInputObjectEvent,
        Vec<Arc<dyn Fn(&SelectInputObjectEvent) + Send + Sync>>,
    ),
    Unsupported(
        UnsupportedFunctionEvent,
        Vec<Arc<dyn Fn(&UnsupportedFunctionEvent) + Send + Sync>>,
    ),
}

impl Fanout {
    fn run(self) {
        match self {
            Self::SoftKey(event, subscribers) => {
                metrics::inc_events_dispatched(subscribers.len() as u64);
                for callback in subscribers {
                    callback(&event);
                }
            }
            Self::Button(event, subscribers) => {
                metrics::inc_events_dispatched(subscribers.len() as u64);
                for callback in subscribers {
                    callback(&event);
                }
            }
            Self::Pointing(event, subscribers) => {
                metrics::inc_events_dispatched(subscribers.len() as u64);
                for callback in subscribers {
                    callback(&event);
                }
            }
            Self::SelectInput(event, subscribers) => {
                metrics::inc_events_dispatched(subscribers.len() as u64);
                for callback in subscribers {
                    callback(&event);
                }
            }
            Self::Unsupported(event, subscribers) => {
                metrics::inc_events_dispatched(subscribers.len() as u64);
                for callback in subscribers {
                    callback(&event);
                }
            }
        }
    }
}

impl VirtualTerminalClient {
    /// Create a client for `partner_address`, sending from
    /// `local_address`.
    ///
    /// Returns the client and the [`DeliveryHandle`] the application's
    /// network glue uses to feed inbound frames, transfer confirmations,
    /// and address-claim changes.
    #[must_use]
    pub fn new(
        link: Arc<dyn NetworkLink>,
        local_address: u8,
        partner_address: u8,
    ) -> (Self, DeliveryHandle) {
        Self::with_parts(
            link,
            local_address,
            partner_address,
            ClientConfig::default(),
            Arc::new(MonotonicClock),
        )
    }

    /// Create a client with explicit configuration and clock.
    #[must_use]
    pub fn with_parts(
        link: Arc<dyn NetworkLink>,
        local_address: u8,
        partner_address: u8,
        config: ClientConfig,
        clock: Arc<dyn Clock>,
    ) -> (Self, DeliveryHandle) {
        let (handle, inbox) = network::delivery_channel();
        let now = clock.now();
        let shared = Shared {
            link,
            clock,
            config,
            local_address,
            partner_address,
            core: Mutex::new(Core {
                initialized: false,
                state: ConnectionState::Disconnected,
                state_entered: now,
                response_retries: 0,
                status: StatusTracker::new(),
                capabilities: ServerCapabilities::default(),
                pools: BTreeMap::new(),
                upload: UploadPipeline::default(),
                retry_flags: RetryFlags::default(),
                last_maintenance: None,
                first_maintenance_pending: false,
                softkey_callbacks: CallbackList::new(),
                button_callbacks: CallbackList::new(),
                pointing_callbacks: CallbackList::new(),
                select_input_callbacks: CallbackList::new(),
                unsupported_callbacks: CallbackList::new(),
                inbox,
            }),
        };
        let client = Self {
            shared: Arc::new(shared),
            shutdown: CancellationToken::new(),
            worker: None,
        };
        (client, handle)
    }

    /// Start the state machine.
    ///
    /// With `spawn_worker`, the client runs its own update loop on a
    /// background thread at the configured tick. Without it, call
    /// [`update`](Self::update) at least every 50 ms.
    ///
    /// Calling `initialize` again restarts bring-up from
    /// `WaitForPartnerVtStatus` without dropping pool registrations.
    pub fn initialize(&mut self, spawn_worker: bool) {
        {
            let mut core = self.shared.core();
            let now = self.shared.clock.now();
            core.initialized = true;
            core.restart_bring_up(now);
        }
        if spawn_worker && self.worker.is_none() {
            if self.shutdown.is_cancelled() {
                self.shutdown = CancellationToken::new();
            }
            let shared = Arc::clone(&self.shared);
            let token = self.shutdown.clone();
            let tick = self.shared.config.worker_tick;
            self.worker = Some(thread::spawn(move || {
                while !token.is_cancelled() {
                    shared.update();
                    thread::sleep(tick);
                }
            }));
        }
    }

    /// Whether [`initialize`](Self::initialize) has been called.
    #[must_use]
    pub fn get_is_initialized(&self) -> bool { self.shared.core().initialized }

    /// Stop the client and join the worker thread if one was spawned.
    ///
    /// Any in-flight upload is abandoned; pool registrations and their
    /// `uploaded` flags are left as they are. Idempotent.
    pub fn terminate(&mut self) {
        self.shutdown.cancel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("vt client worker thread panicked");
            }
        }
        let mut core = self.shared.core();
        let now = self.shared.clock.now();
        core.initialized = false;
        core.retry_flags.clear_all();
        core.set_state(ConnectionState::Disconnected, now);
    }

    /// One scheduler tick: drain inbound deliveries, advance timers and
    /// the state machine, and emit the maintenance heartbeat.
    pub fn update(&self) { self.shared.update(); }

    /// The current state machine state.
    #[must_use]
    pub fn state(&self) -> ConnectionState { self.shared.core().state }

    /// Whether the client is connected and the command surface is open.
    #[must_use]
    pub fn is_connected(&self) -> bool { self.state() == ConnectionState::Connected }

    /// The latest VT status broadcast, if the server is online.
    #[must_use]
    pub fn status(&self) -> Option<crate::status::VtStatus> { self.shared.core().status.latest() }

    // --- Object pools ---

    /// Register an object pool under `index`.
    ///
    /// The declared `version` must match every other pool registered to
    /// this client. Pool data must stay valid until the client reaches
    /// `Connected`; the shared ownership of [`PoolData`] enforces this.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::VersionMismatch`] on a conflicting version
    /// and [`PoolError::Empty`] for a zero-sized pool.
    pub fn set_object_pool(
        &self,
        index: u8,
        version: VtVersion,
        data: PoolData,
    ) -> Result<(), PoolError> {
        if data.is_empty() {
            return Err(PoolError::Empty);
        }
        let mut core = self.shared.core();
        if core
            .pools
            .values()
            .any(|slot| slot.version != version)
        {
            return Err(PoolError::VersionMismatch);
        }
        core.pools.insert(
            index,
            PoolSlot {
                data: Arc::new(data),
                version,
                uploaded: false,
            },
        );
        Ok(())
    }

    /// Register a callback-backed pool that is pulled in pages during
    /// upload.
    ///
    /// # Errors
    ///
    /// Returns the same errors as [`set_object_pool`](Self::set_object_pool).
    pub fn register_pool_data_chunk_callback(
        &self,
        index: u8,
        version: VtVersion,
        total_size: u32,
        provider: impl FnMut(u32, u32, &mut [u8]) -> bool + Send + 'static,
    ) -> Result<(), PoolError> {
        self.set_object_pool(
            index,
            version,
            PoolData::Paged {
                total_size,
                provider: Mutex::new(Box::new(provider)),
            },
        )
    }

    /// Whether the pool at `index` has been uploaded and confirmed.
    #[must_use]
    pub fn pool_uploaded(&self, index: u8) -> bool {
        self.shared
            .core()
            .pools
            .get(&index)
            .is_some_and(|slot| slot.uploaded)
    }

    // --- Event subscription ---

    /// Subscribe to softkey activation events.
    pub fn register_softkey_event_callback(
        &self,
        callback: impl Fn(&KeyEvent) + Send + Sync + 'static,
    ) -> CallbackHandle {
        self.shared.core().softkey_callbacks.register(Arc::new(callback))
    }

    /// Remove a softkey subscription. Returns whether it existed.
    pub fn remove_softkey_event_callback(&self, handle: CallbackHandle) -> bool {
        self.shared.core().softkey_callbacks.remove(handle)
    }

    /// Subscribe to button activation events.
    pub fn register_button_event_callback(
        &self,
        callback: impl Fn(&KeyEvent) + Send + Sync + 'static,
    ) -> CallbackHandle {
        self.shared.core().button_callbacks.register(Arc::new(callback))
    }

    /// Remove a button subscription. Returns whether it existed.
    pub fn remove_button_event_callback(&self, handle: CallbackHandle) -> bool {
        self.shared.core().button_callbacks.remove(handle)
    }

    /// Subscribe to pointing events.
    pub fn register_pointing_event_callback(
        &self,
        callback: impl Fn(&PointingEvent) + Send + Sync + 'static,
    ) -> CallbackHandle {
        self.shared.core().pointing_callbacks.register(Arc::new(callback))
    }

    /// Remove a pointing subscription. Returns whether it existed.
    pub fn remove_pointing_event_callback(&self, handle: CallbackHandle) -> bool {
        self.shared.core().pointing_callbacks.remove(handle)
    }

    /// Subscribe to input object selection events.
    pub fn register_select_input_object_event_callback(
        &self,
        callback: impl Fn(&SelectInputObjectEvent) + Send + Sync + 'static,
    ) -> CallbackHandle {
        self.shared
            .core()
            .select_input_callbacks
            .register(Arc::new(callback))
    }

    /// Remove a selection subscription. Returns whether it existed.
    pub fn remove_select_input_object_event_callback(&self, handle: CallbackHandle) -> bool {
        self.shared.core().select_input_callbacks.remove(handle)
    }

    /// Subscribe to unsupported-function reports from the server.
    pub fn register_unsupported_function_callback(
        &self,
        callback: impl Fn(&UnsupportedFunctionEvent) + Send + Sync + 'static,
    ) -> CallbackHandle {
        self.shared
            .core()
            .unsupported_callbacks
            .register(Arc::new(callback))
    }

    /// Remove an unsupported-function subscription.
    pub fn remove_unsupported_function_callback(&self, handle: CallbackHandle) -> bool {
        self.shared.core().unsupported_callbacks.remove(handle)
    }

    // --- Capability accessors (defaults until `Connected`) ---

    fn connected_capabilities(&self) -> ServerCapabilities {
        let core = self.shared.core();
        if core.state == ConnectionState::Connected {
            core.capabilities
        } else {
            ServerCapabilities::default()
        }
    }

    /// The VT version the connected server reported.
    #[must_use]
    pub fn get_connected_vt_version(&self) -> VtVersion {
        self.connected_capabilities().version()
    }

    /// Softkey geometry reported by the server.
    #[must_use]
    pub fn get_softkey_geometry(&self) -> SoftkeyGeometry {
        self.connected_capabilities().softkeys()
    }

    /// X pixels per softkey.
    #[must_use]
    pub fn get_softkey_x_axis_pixels(&self) -> u8 { self.get_softkey_geometry().x_pixels }

    /// Y pixels per softkey.
    #[must_use]
    pub fn get_softkey_y_axis_pixels(&self) -> u8 { self.get_softkey_geometry().y_pixels }

    /// Virtual softkeys per softkey mask.
    #[must_use]
    pub fn get_number_virtual_softkeys(&self) -> u8 {
        self.get_softkey_geometry().virtual_per_mask
    }

    /// Physical softkey count.
    #[must_use]
    pub fn get_number_physical_softkeys(&self) -> u8 { self.get_softkey_geometry().physical }

    /// Whether the server renders `size`.
    #[must_use]
    pub fn get_font_size_supported(&self, size: FontSize) -> bool {
        self.connected_capabilities().font_size_supported(size)
    }

    /// Whether the server renders `style`.
    #[must_use]
    pub fn get_font_style_supported(&self, style: FontStyle) -> bool {
        self.connected_capabilities().font_style_supported(style)
    }

    /// The server's graphics mode.
    #[must_use]
    pub fn get_graphic_mode(&self) -> GraphicMode { self.connected_capabilities().graphic_mode() }

    /// Whether the server reported `feature`.
    #[must_use]
    pub fn get_hardware_feature(&self, feature: HardwareFeature) -> bool {
        self.connected_capabilities().hardware_feature(feature)
    }

    /// Data mask width in pixels.
    #[must_use]
    pub fn get_number_x_pixels(&self) -> u16 { self.connected_capabilities().x_pixels() }

    /// Data mask height in pixels.
    #[must_use]
    pub fn get_number_y_pixels(&self) -> u16 { self.connected_capabilities().y_pixels() }
}

impl Drop for VirtualTerminalClient {
    fn drop(&mut self) { self.terminate(); }
}

impl Shared {
    fn core(&self) -> MutexGuard<'_, Core> {
        self.core.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One scheduler tick; see the module docs for the ordering.
    fn update(&self) {
        let mut fanout = Vec::new();
        {
            let mut core = self.core();
            if !core.initialized {
                return;
            }
            let now = self.clock.now();
            self.drain_inbox(&mut core, now, &mut fanout);
            self.check_status_timeout(&mut core, now);
            self.step_state_machine(&mut core, now);
            self.check_heartbeat(&mut core, now);
            self.flush_retry_flags(&mut core, now);
        }
        for work in fanout {
            work.run();
        }
    }

    fn drain_inbox(&self, core: &mut Core, now: Instant, fanout: &mut Vec<Fanout>) {
        loop {
            let delivery = match core.inbox.try_recv() {
                Ok(delivery) => delivery,
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            };
            match delivery {
                Delivery::Frame(frame) => self.handle_frame(core, now, &frame, fanout),
                Delivery::Confirmation(confirmation) => {
                    self.handle_confirmation(core, now, confirmation);
                }
                Delivery::PartnerOffline => {
                    debug!("partner address claim lost, disconnecting");
                    core.status.clear();
                    core.set_state(ConnectionState::Disconnected, now);
                }
            }
        }
    }

    fn handle_frame(&self, core: &mut Core, now: Instant, frame: &Frame, fanout: &mut Vec<Fanout>) {
        if frame.pgn != PGN_VT_TO_ECU || frame.source != self.partner_address {
            debug!(
                "ignoring frame on pgn {:#06x} from {:#04x}",
                frame.pgn, frame.source
            );
            return;
        }
        metrics::inc_frames();
        let inbound = match dispatch::decode(&frame.data) {
            Ok(inbound) => inbound,
            Err(error) => {
                warn!("undecodable VT frame: {error}");
                return;
            }
        };
        self.handle_inbound(core, now, inbound, fanout);
    }

    #[allow(clippy::too_many_lines)]
    fn handle_inbound(
        &self,
        core: &mut Core,
        now: Instant,
        inbound: Inbound,
        fanout: &mut Vec<Fanout>,
    ) {
        match inbound {
            Inbound::VtStatus(status) => {
                core.status.record(status, now);
            }
            Inbound::GetMemoryResponse {
                version,
                enough_memory,
            } => {
                if core.state != ConnectionState::WaitGetMemoryResponse {
                    debug!("discarding get-memory response in state {}", core.state);
                    return;
                }
                core.capabilities.version = VtVersion::from_byte(version);
                if enough_memory {
                    core.response_retries = 0;
                    core.set_state(ConnectionState::SendGetNumberSoftkeys, now);
                } else {
                    warn!("server reports insufficient object pool memory");
                    core.set_state(ConnectionState::Failed, now);
                }
            }
            Inbound::GetNumberSoftkeysResponse(geometry) => {
                if core.state != ConnectionState::WaitGetNumberSoftkeysResponse {
                    debug!("discarding softkey response in state {}", core.state);
                    return;
                }
                core.capabilities.softkeys = geometry;
                core.response_retries = 0;
                core.set_state(ConnectionState::SendGetTextFontData, now);
            }
            Inbound::GetTextFontDataResponse {
                small_sizes,
                large_sizes,
                styles,
            } => {
                if core.state != ConnectionState::WaitGetTextFontDataResponse {
                    debug!("discarding font response in state {}", core.state);
                    return;
                }
                core.capabilities.small_font_sizes = small_sizes;
                core.capabilities.large_font_sizes = large_sizes;
                core.capabilities.font_styles = styles;
                core.response_retries = 0;
                core.set_state(ConnectionState::SendGetHardware, now);
            }
            Inbound::GetHardwareResponse {
                features,
                graphic_mode,
                x_pixels,
                y_pixels,
            } => {
                if core.state != ConnectionState::WaitGetHardwareResponse {
                    debug!("discarding hardware response in state {}", core.state);
                    return;
                }
                core.capabilities.hardware_features = features;
                core.capabilities.graphic_mode = graphic_mode;
                core.capabilities.x_pixels = x_pixels;
                core.capabilities.y_pixels = y_pixels;
                core.response_retries = 0;
                core.upload.reset();
                core.set_state(ConnectionState::UploadObjectPool, now);
            }
            Inbound::EndOfObjectPoolResponse { error_bits, .. } => {
                if core.state != ConnectionState::WaitEndOfObjectPoolResponse {
                    debug!("discarding end-of-pool response in state {}", core.state);
                    return;
                }
                core.response_retries = 0;
                if error_bits == 0 {
                    core.first_maintenance_pending = true;
                    core.last_maintenance = None;
                    core.set_state(ConnectionState::Connected, now);
                } else {
                    warn!("server rejected the object pool: error bits {error_bits:#04x}");
                    core.set_state(ConnectionState::Failed, now);
                }
            }
            Inbound::SoftKey(event) => {
                fanout.push(Fanout::SoftKey(event, core.softkey_callbacks.snapshot()));
            }
            Inbound::Button(event) => {
                fanout.push(Fanout::Button(event, core.button_callbacks.snapshot()));
            }
            Inbound::Pointing(event) => {
                fanout.push(Fanout::Pointing(event, core.pointing_callbacks.snapshot()));
            }
            Inbound::SelectInputObject(event) => {
                fanout.push(Fanout::SelectInput(
                    event,
                    core.select_input_callbacks.snapshot(),
                ));
            }
            Inbound::UnsupportedFunction(event) => {
                warn!(
                    "server does not support function {:#04x}",
                    event.function_code
                );
                if !core.unsupported_callbacks.is_empty() {
                    fanout.push(Fanout::Unsupported(
                        event,
                        core.unsupported_callbacks.snapshot(),
                    ));
                }
            }
            Inbound::Esc(event) => {
                debug!("operator ESC on object {:#06x}", event.object_id);
            }
            Inbound::ChangeNumericValue(_)
            | Inbound::ChangeActiveMask(_)
            | Inbound::ChangeSoftKeyMask(_)
            | Inbound::ChangeStringValue(_)
            | Inbound::UserLayoutHideShow(_)
            | Inbound::AudioSignalTermination(_)
            | Inbound::GetVersionsResponse { .. }
            | Inbound::WorkingSetMaintenance { .. } => {}
            Inbound::Unhandled(function) => {
                debug!("no handler for inbound function {:#04x}", function.code());
            }
        }
    }

    fn handle_confirmation(&self, core: &mut Core, now: Instant, confirmation: SendConfirmation) {
        if core.state != ConnectionState::UploadObjectPool
            || core.upload.state != UploadState::InProgress
            || confirmation.pgn != PGN_ECU_TO_VT
        {
            debug!("discarding transfer confirmation in state {}", core.state);
            return;
        }
        if confirmation.success {
            if let Some(index) = core.upload.current_index {
                if let Some(slot) = core.pools.get_mut(&index) {
                    slot.uploaded = true;
                    core.upload.bytes_sent += u64::from(slot.data.len()) + 1;
                }
            }
            core.upload.state = UploadState::Success;
        } else {
            warn!("object pool transfer failed");
            core.upload.state = UploadState::Failed;
            core.set_state(ConnectionState::Failed, now);
        }
    }

    fn check_status_timeout(&self, core: &mut Core, now: Instant) {
        let watches_status = !matches!(
            core.state,
            ConnectionState::Disconnected
                | ConnectionState::Failed
                | ConnectionState::WaitForPartnerVtStatus
        );
        if watches_status && core.status.is_stale(now, self.config.status_timeout) {
            warn!("VT status timed out, server presumed offline");
            core.restart_bring_up(now);
        }
    }

    fn step_state_machine(&self, core: &mut Core, now: Instant) {
        match core.state {
            ConnectionState::WaitForPartnerVtStatus => {
                if core.status.is_online() {
                    core.set_state(ConnectionState::SendWorkingSetMaster, now);
                }
            }
            ConnectionState::SendWorkingSetMaster => {
                let frame = Frame::new(
                    PGN_WORKING_SET_MASTER,
                    self.local_address,
                    GLOBAL_ADDRESS,
                    command::working_set_master(1),
                );
                if self.link.send_frame(&frame) {
                    core.set_state(ConnectionState::ReadyForObjectPool, now);
                }
            }
            ConnectionState::ReadyForObjectPool => {
                if !core.pools.is_empty() {
                    core.set_state(ConnectionState::SendGetMemory, now);
                }
            }
            ConnectionState::SendGetMemory => {
                let required = core
                    .pools
                    .values()
                    .map(|slot| slot.data.len())
                    .fold(0u32, u32::saturating_add);
                if self.transmit(&command::get_memory(required)) {
                    core.set_state(ConnectionState::WaitGetMemoryResponse, now);
                }
            }
            ConnectionState::SendGetNumberSoftkeys => {
                if self.transmit(&command::get_number_of_softkeys()) {
                    core.set_state(ConnectionState::WaitGetNumberSoftkeysResponse, now);
                }
            }
            ConnectionState::SendGetTextFontData => {
                if self.transmit(&command::get_text_font_data()) {
                    core.set_state(ConnectionState::WaitGetTextFontDataResponse, now);
                }
            }
            ConnectionState::SendGetHardware => {
                if self.transmit(&command::get_hardware()) {
                    core.set_state(ConnectionState::WaitGetHardwareResponse, now);
                }
            }
            ConnectionState::UploadObjectPool => self.step_upload(core, now),
            ConnectionState::SendEndOfObjectPool => {
                if self.transmit(&command::end_of_object_pool()) {
                    core.set_state(ConnectionState::WaitEndOfObjectPoolResponse, now);
                }
            }
            state if state.awaits_response() => {
                let waited = now.saturating_duration_since(core.state_entered);
                if waited > self.config.response_timeout {
                    self.handle_response_timeout(core, now);
                }
            }
            _ => {}
        }
    }

    fn handle_response_timeout(&self, core: &mut Core, now: Instant) {
        let Some(retry_target) = core.state.retry_target() else {
            return;
        };
        if core.response_retries == 0 {
            core.response_retries = 1;
            debug!("response timeout in {}, retrying", core.state);
            core.set_state(retry_target, now);
        } else {
            warn!("second response timeout in {}, giving up", core.state);
            core.set_state(ConnectionState::Failed, now);
        }
    }

    fn step_upload(&self, core: &mut Core, now: Instant) {
        match core.upload.state {
            UploadState::Uninitialized | UploadState::Success => {
                let next = core
                    .pools
                    .iter()
                    .find(|(_, slot)| !slot.uploaded)
                    .map(|(&index, slot)| (index, Arc::clone(&slot.data)));
                match next {
                    Some((index, data)) => {
                        let transfer = PoolTransfer::new(data);
                        if self.link.send_segmented(
                            PGN_ECU_TO_VT,
                            self.local_address,
                            self.partner_address,
                            Box::new(transfer),
                        ) {
                            core.upload.current_index = Some(index);
                            core.upload.state = UploadState::InProgress;
                        }
                    }
                    None => core.set_state(ConnectionState::SendEndOfObjectPool, now),
                }
            }
            UploadState::InProgress => {}
            UploadState::Failed => core.set_state(ConnectionState::Failed, now),
        }
    }

    fn check_heartbeat(&self, core: &mut Core, now: Instant) {
        if core.state != ConnectionState::Connected {
            return;
        }
        let due = match core.last_maintenance {
            Some(last) => {
                now.saturating_duration_since(last) >= self.config.maintenance_interval
            }
            None => true,
        };
        if due {
            core.retry_flags.set(TransmitFlag::SendWorkingSetMaintenance);
        }
    }

    fn flush_retry_flags(&self, core: &mut Core, now: Instant) {
        if core.retry_flags.is_set(TransmitFlag::SendWorkingSetMaintenance) {
            let version = core.pool_version();
            let encoded = command::working_set_maintenance(core.first_maintenance_pending, version);
            if self.transmit(&encoded) {
                core.retry_flags.clear(TransmitFlag::SendWorkingSetMaintenance);
                core.last_maintenance = Some(now);
                core.first_maintenance_pending = false;
            }
        }
    }

    /// Put an encoded payload on the wire towards the partner.
    fn transmit(&self, encoded: &Encoded) -> bool {
        match encoded {
            Encoded::Fixed(body) => self.link.send_frame(&Frame::new(
                PGN_ECU_TO_VT,
                self.local_address,
                self.partner_address,
                *body,
            )),
            Encoded::Extended(payload) => self.link.send_segmented(
                PGN_ECU_TO_VT,
                self.local_address,
                self.partner_address,
                Box::new(payload.clone()),
            ),
        }
    }
}

impl Core {
    fn set_state(&mut self, state: ConnectionState, now: Instant) {
        if self.state != state {
            debug!("state {} -> {}", self.state, state);
        }
        self.state = state;
        self.state_entered = now;
    }

    /// Reset to the start of bring-up, keeping pool registrations but
    /// clearing everything a fresh connection re-establishes.
    fn restart_bring_up(&mut self, now: Instant) {
        self.status.clear();
        self.capabilities = ServerCapabilities::default();
        self.upload.reset();
        self.response_retries = 0;
        self.retry_flags.clear_all();
        self.last_maintenance = None;
        self.first_maintenance_pending = false;
        for slot in self.pools.values_mut() {
            slot.uploaded = false;
        }
        self.set_state(ConnectionState::WaitForPartnerVtStatus, now);
    }

    /// The version shared by all registered pools.
    fn pool_version(&self) -> VtVersion {
        self.pools
            .values()
            .next()
            .map_or(VtVersion::Version2OrOlder, |slot| slot.version)
    }
}
