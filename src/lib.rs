#![doc(html_root_url = "https://docs.rs/vtlink/latest")]
//! Public API for the `vtlink` library.
//!
//! `vtlink` is an ISO 11783-6 (ISOBUS) virtual terminal client: it
//! negotiates the connection to a VT server, uploads object pools
//! through the transport sublayer, encodes the runtime command set, and
//! dispatches operator input events to subscribers. The CAN network
//! stack itself is an external collaborator reached through the
//! [`NetworkLink`] trait.

pub mod callback;
pub mod capability;
pub mod clock;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod frame;
pub mod function;
pub mod metrics;
pub mod network;
pub mod pool;
pub mod state;
pub mod status;
mod retry;

pub mod client;

#[doc(hidden)]
pub mod test_helpers;

pub use callback::CallbackHandle;
pub use capability::{
    FontSize,
    FontStyle,
    GraphicMode,
    HardwareFeature,
    ServerCapabilities,
    SoftkeyGeometry,
    VtVersion,
};
pub use client::VirtualTerminalClient;
pub use config::ClientConfig;
pub use error::{DecodeError, PoolError, SendError};
pub use event::{KeyActivation, KeyEvent, PointingEvent, SelectInputObjectEvent};
pub use frame::{Frame, NULL_OBJECT_ID, PGN_ECU_TO_VT, PGN_VT_TO_ECU};
pub use function::Function;
pub use network::{ChunkSource, DeliveryHandle, NetworkLink, SendConfirmation};
pub use pool::PoolData;
pub use state::ConnectionState;
pub use status::VtStatus;
