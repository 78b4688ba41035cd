//! HLE implementation of the CARD ucode, the short-lived DSP firmware that the
//! IPL loads to answer the memory card unlock challenge.
//!
//! The host drives it over the mailbox: an unlock request mail, then a mail
//! carrying the address of a 14-byte parameter record. The ucode DMAs the
//! input buffer described by that record into ARAM, runs it through the DSP
//! ROM's streaming hash, writes the 32-bit response where the record says to,
//! and replies with a DONE mail. Afterwards it waits to either hand the DSP
//! over to a newly uploaded ucode or to drop back to the ROM ucode.

mod hash;

use crate::mailbox::MailQueue;
use crate::traits::{DspBus, UcodeDispatch};
use crate::{DSP_DONE, DSP_INIT, MAIL_NEW_UCODE, MAIL_RESET};
use bincode::{Decode, Encode};

/// CRC of the retail GameCube CARD ucode image.
pub const CARD_UCODE_CRC: u32 = 0x65D6_CC6F;

const MAIL_CARD_UNLOCK: u32 = 0xFF00_0000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
pub enum ConsoleVariant {
    GameCube,
    Wii,
}

impl ConsoleVariant {
    fn from_ucode_crc(crc: u32) -> Self {
        if crc == CARD_UCODE_CRC { Self::GameCube } else { Self::Wii }
    }

    // Physical address bits of mails carrying a main RAM address
    const fn address_mask(self) -> u32 {
        match self {
            Self::GameCube => 0x0FFF_FFFF,
            Self::Wii => 0x3FFF_FFFF,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Encode, Decode)]
enum State {
    WaitingForRequest,
    WaitingForAddress,
    WaitingForNextTask,
}

/// Parameter record written by the CPU-side card driver, fetched fresh for
/// every unlock request.
#[derive(Debug, Clone, Copy)]
struct UnlockParameters {
    input_addr: u32,
    unused: u16,
    input_size: u16,
    work_addr: u32,
    output_addr: u32,
}

impl UnlockParameters {
    fn fetch<B: DspBus>(bus: &mut B, address: u32) -> Self {
        let params = Self {
            input_addr: bus.read_u32(address),
            unused: bus.read_u16(address.wrapping_add(4)),
            input_size: bus.read_u16(address.wrapping_add(6)),
            work_addr: bus.read_u32(address.wrapping_add(8)),
            output_addr: bus.read_u32(address.wrapping_add(12)),
        };

        log::debug!("Input address: {:08X}", params.input_addr);
        log::debug!("Unused: {:04X}", params.unused);
        log::debug!("Input size: {:04X}", params.input_size);
        log::debug!("ARAM work address: {:08X}", params.work_addr);
        log::debug!("Output address: {:08X}", params.output_addr);

        params
    }
}

#[derive(Debug, Clone, Encode, Decode)]
pub struct CardUcode {
    state: State,
    upload_in_progress: bool,
    variant: ConsoleVariant,
    mail_queue: MailQueue,
}

impl CardUcode {
    #[must_use]
    pub fn new(crc: u32) -> Self {
        let variant = ConsoleVariant::from_ucode_crc(crc);
        log::info!("CARD ucode initialized (crc {crc:08X}, {variant:?})");

        Self {
            state: State::WaitingForRequest,
            upload_in_progress: false,
            variant,
            mail_queue: MailQueue::new(),
        }
    }

    pub fn initialize(&mut self) {
        self.mail_queue.push(DSP_INIT);
        self.state = State::WaitingForRequest;
    }

    /// Process one CPU-to-DSP mail. Mails arrive strictly in order and each
    /// one is handled to completion before the next.
    pub fn handle_mail<B: DspBus, D: UcodeDispatch>(
        &mut self,
        mail: u32,
        bus: &mut B,
        dispatch: &mut D,
    ) {
        if self.upload_in_progress {
            // The bootloader owns every mail of the upload handshake,
            // whatever state the protocol was in
            dispatch.boot_upload_mail(mail);
            return;
        }

        match self.state {
            State::WaitingForRequest => {
                if mail == MAIL_CARD_UNLOCK {
                    log::info!("CARD: received unlock command");
                    self.state = State::WaitingForAddress;
                } else {
                    log::warn!("CARD: expected unlock command but got {mail:08X}");
                }
            }
            State::WaitingForAddress => {
                let address = mail & self.variant.address_mask();
                log::info!("CARD: reading unlock parameters from {address:08X} ({mail:08X})");

                let params = UnlockParameters::fetch(bus, address);
                let response = hash::compute_hash(bus, &params);
                bus.write_u32(params.output_addr, response);
                log::info!(
                    "CARD: unlock response {response:08X} written to {:08X}",
                    params.output_addr
                );

                self.mail_queue.push(DSP_DONE);
                self.state = State::WaitingForNextTask;
            }
            State::WaitingForNextTask => {
                // The ucode only checks that the high word is CDD1, but the
                // well-known full mail values are compared unmasked
                match mail {
                    MAIL_NEW_UCODE => {
                        log::info!("CARD: setting up new ucode upload");
                        self.upload_in_progress = true;
                    }
                    MAIL_RESET => {
                        log::info!("CARD: switching back to ROM ucode");
                        dispatch.switch_to_rom_ucode();
                    }
                    _ => {
                        log::warn!("CARD: expected new-ucode or reset mail but got {mail:08X}");
                    }
                }
            }
        }
    }

    /// Called once per scheduler tick; raises the DSP interrupt once for each
    /// reply mail that has not been announced to the host yet.
    pub fn update<D: UcodeDispatch>(&mut self, dispatch: &mut D) {
        if self.mail_queue.take_announcement() {
            dispatch.raise_dsp_interrupt();
        }
    }

    #[must_use]
    pub fn has_pending_mail(&self) -> bool {
        self.mail_queue.has_pending()
    }

    /// Host-side read of the oldest pending DSP-to-CPU mail.
    pub fn read_mail(&mut self) -> Option<u32> {
        self.mail_queue.pop()
    }
}
