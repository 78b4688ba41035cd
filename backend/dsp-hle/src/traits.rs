//! Traits through which the ucode reaches the rest of the emulator: the memory
//! bridge (main RAM + ARAM) and the ucode dispatch framework.

/// Memory access as seen from the DSP: big-endian main RAM reads/writes plus
/// byte-granular ARAM access for the accelerator.
pub trait DspBus {
    fn read_u8(&mut self, address: u32) -> u8;

    fn write_u8(&mut self, address: u32, value: u8);

    fn read_u16(&mut self, address: u32) -> u16 {
        let msb = self.read_u8(address);
        let lsb = self.read_u8(address.wrapping_add(1));

        u16::from_be_bytes([msb, lsb])
    }

    fn read_u32(&mut self, address: u32) -> u32 {
        let high_word = self.read_u16(address);
        let low_word = self.read_u16(address.wrapping_add(2));

        (u32::from(high_word) << 16) | u32::from(low_word)
    }

    fn write_u32(&mut self, address: u32, value: u32) {
        for (i, byte) in value.to_be_bytes().into_iter().enumerate() {
            self.write_u8(address.wrapping_add(i as u32), byte);
        }
    }

    fn read_aram_u8(&mut self, address: u32) -> u8;

    fn write_aram_u8(&mut self, address: u32, value: u8);

    /// ARAM size in bytes; the accelerator treats running past it as a fatal
    /// invariant violation.
    fn aram_len(&self) -> u32;
}

/// Callbacks into the ucode dispatch framework.
pub trait UcodeDispatch {
    /// Forward one mail of the new-ucode upload sub-protocol to the bootloader.
    /// The bootloader owns the upload handshake from here on: it discards the
    /// three header words, collects the code payload, and swaps in the new
    /// ucode when the transfer completes.
    fn boot_upload_mail(&mut self, mail: u32);

    /// Request that the dispatch framework reinstall the default ROM ucode,
    /// discarding this instance.
    fn switch_to_rom_ucode(&mut self);

    /// Signal the DSP interrupt to the host CPU.
    fn raise_dsp_interrupt(&mut self);
}
