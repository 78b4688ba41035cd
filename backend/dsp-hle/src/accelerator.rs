//! The DSP's ARAM accelerator, modeled as an auto-incrementing address cursor.
//!
//! The cursor's position is interpreted in units of the configured sample
//! format: 16-bit words when writing, 4-bit nibbles when reading. Resetting
//! the cursor changes the unit but not the numeric position, which is why the
//! CARD ucode's write and read passes only line up at ARAM address 0.

use crate::num::U16Ext;
use crate::traits::DspBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceleratorMode {
    WriteWord16,
    ReadNibble4,
}

#[derive(Debug, Clone)]
pub struct AcceleratorCursor {
    position: u32,
    end_address: u32,
    mode: AcceleratorMode,
}

impl AcceleratorCursor {
    pub fn new(start_address: u32, end_address: u32, mode: AcceleratorMode) -> Self {
        Self { position: start_address, end_address, mode }
    }

    pub fn reset(&mut self, start_address: u32, end_address: u32, mode: AcceleratorMode) {
        log::trace!("Accelerator reset: start {start_address:08X} end {end_address:08X} {mode:?}");

        self.position = start_address;
        self.end_address = end_address;
        self.mode = mode;
    }

    /// Write a word big-endian at byte offset `2 * position` and advance.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has reached its end address. No request the host
    /// can legitimately issue gets anywhere near the end of ARAM, so this
    /// always indicates a caller bug.
    pub fn write_word<B: DspBus>(&mut self, bus: &mut B, value: u16) {
        debug_assert_eq!(self.mode, AcceleratorMode::WriteWord16);
        assert!(
            self.position < self.end_address,
            "Accelerator write past end of ARAM range at word address {:08X}",
            self.position
        );

        let byte_addr = self.position << 1;
        bus.write_aram_u8(byte_addr, value.msb());
        bus.write_aram_u8(byte_addr + 1, value.lsb());

        self.position += 1;
    }

    /// Read the nibble at the current position and advance. Even positions
    /// read the high nibble of byte `position / 2`, odd positions the low
    /// nibble.
    ///
    /// # Panics
    ///
    /// Panics if the cursor has reached its end address, as for `write_word`.
    pub fn read_nibble<B: DspBus>(&mut self, bus: &mut B) -> u16 {
        debug_assert_eq!(self.mode, AcceleratorMode::ReadNibble4);
        assert!(
            self.position < self.end_address,
            "Accelerator read past end of ARAM range at nibble address {:08X}",
            self.position
        );

        let byte = bus.read_aram_u8(self.position >> 1);
        let nibble = if self.position & 1 == 0 { byte >> 4 } else { byte & 0x0F };

        self.position += 1;

        nibble.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::InMemoryBus;

    #[test]
    fn write_words_then_read_nibbles() {
        let mut bus = InMemoryBus::new(0, 64);

        let mut cursor = AcceleratorCursor::new(0, 32, AcceleratorMode::WriteWord16);
        cursor.write_word(&mut bus, 0x0123);
        cursor.write_word(&mut bus, 0x4567);
        assert_eq!(&bus.aram[..4], &[0x01, 0x23, 0x45, 0x67]);

        cursor.reset(0, 128, AcceleratorMode::ReadNibble4);
        let nibbles: Vec<u16> = (0..8).map(|_| cursor.read_nibble(&mut bus)).collect();
        assert_eq!(nibbles, vec![0x0, 0x1, 0x2, 0x3, 0x4, 0x5, 0x6, 0x7]);
    }

    #[test]
    fn write_and_read_units_differ() {
        let mut bus = InMemoryBus::new(0, 64);

        // Word position 1 writes to bytes 2-3...
        let mut cursor = AcceleratorCursor::new(1, 32, AcceleratorMode::WriteWord16);
        cursor.write_word(&mut bus, 0xABCD);
        assert_eq!(&bus.aram[..4], &[0x00, 0x00, 0xAB, 0xCD]);

        // ...but nibble position 1 reads the low nibble of byte 0, so only
        // three zero nibbles remain before the written word comes back
        cursor.reset(1, 128, AcceleratorMode::ReadNibble4);
        assert_eq!(cursor.read_nibble(&mut bus), 0x0);
        assert_eq!(cursor.read_nibble(&mut bus), 0x0);
        assert_eq!(cursor.read_nibble(&mut bus), 0x0);
        assert_eq!(cursor.read_nibble(&mut bus), 0xA);
        assert_eq!(cursor.read_nibble(&mut bus), 0xB);
        assert_eq!(cursor.read_nibble(&mut bus), 0xC);
    }

    #[test]
    #[should_panic(expected = "past end of ARAM range")]
    fn end_of_range_is_fatal() {
        let mut bus = InMemoryBus::new(0, 4);

        let mut cursor = AcceleratorCursor::new(0, 2, AcceleratorMode::WriteWord16);
        cursor.write_word(&mut bus, 0x1111);
        cursor.write_word(&mut bus, 0x2222);
        cursor.write_word(&mut bus, 0x3333);
    }
}
