//! DSP-to-CPU mail queue. Mails are queued by the ucode as it completes work
//! and read out by the host once the DSP interrupt fires.

use bincode::{Decode, Encode};
use std::collections::VecDeque;

#[derive(Debug, Clone, Default, Encode, Decode)]
pub struct MailQueue {
    pending: VecDeque<u32>,
    unannounced: u32,
}

impl MailQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mail: u32) {
        log::trace!("Queueing DSP mail {mail:08X}");

        self.pending.push_back(mail);
        self.unannounced += 1;
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Host-side read of the oldest pending mail.
    pub fn pop(&mut self) -> Option<u32> {
        self.pending.pop_front()
    }

    /// Returns true at most once per queued mail; the caller raises the DSP
    /// interrupt when it does.
    pub fn take_announcement(&mut self) -> bool {
        if self.unannounced != 0 {
            self.unannounced -= 1;
            true
        } else {
            false
        }
    }
}
