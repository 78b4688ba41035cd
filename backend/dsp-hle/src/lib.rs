//! High-level emulation of the GameCube DSP's CARD ucode, the firmware that
//! answers the memory card unlock challenge/response.
//!
//! The ucode is driven entirely over the mailbox. The emulator integrating
//! this crate provides the memory bridge and dispatch framework through the
//! [`DspBus`] and [`UcodeDispatch`] traits and feeds CPU-to-DSP mails to
//! [`CardUcode::handle_mail`] in arrival order.
//!
//! The unlock hash reproduces the DSP ROM's streaming algorithm bit-for-bit,
//! including its boundary quirks: inputs of 0 or 1 bytes produce results that
//! look wrong relative to the algorithm's intent but match real hardware.

mod accelerator;
#[cfg(any(test, feature = "testbus"))]
pub mod bus;
mod card;
mod mailbox;
mod num;
pub mod traits;

pub use card::{CARD_UCODE_CRC, CardUcode, ConsoleVariant};
pub use traits::{DspBus, UcodeDispatch};

/// DSP-to-CPU mail queued when the ucode finishes initializing.
pub const DSP_INIT: u32 = 0xDCD1_0000;

/// DSP-to-CPU mail queued when an unlock computation completes.
pub const DSP_DONE: u32 = 0xDCD1_0003;

/// CPU-to-DSP mail starting the upload of a replacement ucode.
pub const MAIL_NEW_UCODE: u32 = 0xCDD1_0001;

/// CPU-to-DSP mail requesting a switch back to the default ROM ucode.
pub const MAIL_RESET: u32 = 0xCDD1_0002;
