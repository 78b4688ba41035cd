//! Simple in-memory implementations of the bus and dispatch traits, intended
//! for tests.

use crate::traits::{DspBus, UcodeDispatch};

pub struct InMemoryBus {
    pub main_ram: Vec<u8>,
    pub aram: Vec<u8>,
}

impl InMemoryBus {
    #[must_use]
    pub fn new(main_ram_len: usize, aram_len: usize) -> Self {
        Self { main_ram: vec![0; main_ram_len], aram: vec![0; aram_len] }
    }

    pub fn load_main_ram(&mut self, address: u32, bytes: &[u8]) {
        let address = address as usize;
        self.main_ram[address..address + bytes.len()].copy_from_slice(bytes);
    }
}

impl DspBus for InMemoryBus {
    fn read_u8(&mut self, address: u32) -> u8 {
        self.main_ram[address as usize]
    }

    fn write_u8(&mut self, address: u32, value: u8) {
        self.main_ram[address as usize] = value;
    }

    fn read_aram_u8(&mut self, address: u32) -> u8 {
        self.aram[address as usize]
    }

    fn write_aram_u8(&mut self, address: u32, value: u8) {
        self.aram[address as usize] = value;
    }

    fn aram_len(&self) -> u32 {
        self.aram.len() as u32
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingDispatch {
    pub boot_mails: Vec<u32>,
    pub rom_switch_requests: u32,
    pub interrupts: u32,
}

impl RecordingDispatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UcodeDispatch for RecordingDispatch {
    fn boot_upload_mail(&mut self, mail: u32) {
        self.boot_mails.push(mail);
    }

    fn switch_to_rom_ucode(&mut self) {
        self.rom_switch_requests += 1;
    }

    fn raise_dsp_interrupt(&mut self) {
        self.interrupts += 1;
    }
}
