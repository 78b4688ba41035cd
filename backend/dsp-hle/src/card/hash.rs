//! The memory card unlock hash, as computed by the DSP ROM.
//!
//! The algorithm was recovered by black-box analysis against DSP LLE and is
//! reproduced bit-for-bit, boundary quirks included. The input buffer is
//! streamed into ARAM through the accelerator as 16-bit words, then read back
//! one nibble at a time while four working registers are mixed per nibble
//! pair. Inputs of 0 or 1 bytes produce degenerate results (a 0xFFFF-step
//! sweep over ARAM and the unmodified initial hash value respectively); the
//! real ucode behaves the same way, so neither is treated as an error.

use crate::accelerator::{AcceleratorCursor, AcceleratorMode};
use crate::card::UnlockParameters;
use crate::num::GetBit;
use crate::traits::DspBus;

// Initial register values set up by the DSP ROM before the nibble loop
const HASH_INIT: u32 = 0x05EFE0AA;
const A_INIT_BIAS: u32 = 0x170A7489;
const D0_INIT: u32 = 0xDAF4B157;
const D1_INIT: u32 = 0x6BBEC3B6;
const B_INIT_BIAS: u16 = 8;

#[derive(Debug, Clone)]
struct HashState {
    a: u32,
    hash: u32,
    d0: u32,
    d1: u32,
    b: u16,
    counter: u16,
}

impl HashState {
    fn new(byte_sum: u32) -> Self {
        Self {
            a: byte_sum.wrapping_add(A_INIT_BIAS),
            hash: HASH_INIT,
            d0: D0_INIT,
            d1: D1_INIT,
            b: (byte_sum as u16).wrapping_add(B_INIT_BIAS),
            counter: 0,
        }
    }

    // One mixing round per nibble pair. d0/d1 feed forward into the next
    // round, so no operation here can be reordered.
    fn step(&mut self, prev1: u16, prev2: u16, new1: u16, new2: u16) {
        let mut t1 = (new2 << 4) | prev2;
        if t1.bit(7) {
            // The ROM treats the low byte as signed and sign-extends it
            t1 |= 0xFF00;
        }
        t1 ^= prev1 << 8;
        t1 ^= new1 << 12;

        self.a = self.a.wrapping_add(t1.into());

        let t2 = (self.d0 ^ self.d1).wrapping_add(self.a);

        self.counter = self.counter.wrapping_add(1);
        let rotate = u32::from(self.b.wrapping_add(self.counter)) & 0x1F;

        // 32-bit rotate right, written the way the ROM does it (shift, then
        // add back the bits that fell off)
        let mut t3 = t2 >> rotate;
        if rotate != 0 {
            t3 = t3.wrapping_add(t2 << (32 - rotate));
        }

        self.hash = self.hash.wrapping_add(t3);

        self.d0 = (!self.a & self.hash) | (self.a & self.d1);
        self.d1 = self.a ^ self.hash ^ self.d0;
    }
}

/// Stream the input buffer through ARAM and compute the 32-bit unlock
/// response. Does not write the result back; the caller owns that.
pub fn compute_hash<B: DspBus>(bus: &mut B, params: &UnlockParameters) -> u32 {
    let input_size = usize::from(params.input_size);

    // The DMA engine copies in 4-byte units, so the copy may read a little
    // past input_size but never past the rounded-up size
    let rounded_size = (input_size + 3) & !3;
    let buffer: Vec<u8> = (0..rounded_size)
        .map(|i| bus.read_u8(params.input_addr.wrapping_add(i as u32)))
        .collect();

    let aram_words = bus.aram_len() >> 1;
    let mut cursor =
        AcceleratorCursor::new(params.work_addr, aram_words, AcceleratorMode::WriteWord16);

    let mut byte_sum: u32 = 0;
    let mut i = 0;
    while i + 1 < input_size {
        cursor.write_word(bus, u16::from_be_bytes([buffer[i], buffer[i + 1]]));
        byte_sum += u32::from(buffer[i]) + u32::from(buffer[i + 1]);
        i += 2;
    }
    if input_size % 2 == 1 {
        // An odd-length input pairs its last byte with the over-copied byte
        // that follows it, but only the real byte counts towards the sum
        cursor.write_word(bus, u16::from_be_bytes([buffer[input_size - 1], buffer[input_size]]));
        byte_sum += u32::from(buffer[input_size - 1]);
    }

    let mut state = HashState::new(byte_sum);

    let aram_nibbles = bus.aram_len() << 1;
    cursor.reset(params.work_addr, aram_nibbles, AcceleratorMode::ReadNibble4);

    let mut prev1 = cursor.read_nibble(bus);
    let mut prev2 = cursor.read_nibble(bus);

    // The ROM keeps the round count in a 16-bit register; a zero-byte request
    // underflows it to 0xFFFF rounds and hashes 128 KB of ARAM. Preserved
    // as-is for hardware fidelity.
    let rounds = params.input_size.wrapping_sub(1);
    for _ in 0..rounds {
        let new1 = cursor.read_nibble(bus);
        let new2 = cursor.read_nibble(bus);
        state.step(prev1, prev2, new1, new2);
        prev1 = new1;
        prev2 = new2;
    }

    state.hash
}
