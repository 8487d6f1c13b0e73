use std::path::{Path, PathBuf};

/// Builds synthetic pod files.
pub struct PodFile {
    header: Vec<u8>,
    data: Vec<u8>,
}

impl PodFile {
    pub fn new(header_len: usize) -> Self {
        PodFile {
            header: vec![0u8; header_len],
            data: Vec::new(),
        }
    }

    pub fn header_bytes(mut self, offset: usize, dat: &[u8]) -> Self {
        self.header[offset..offset + dat.len()].copy_from_slice(dat);
        self
    }

    pub fn chunk(mut self, dat: &[u8]) -> Self {
        self.data.extend_from_slice(dat);
        self
    }

    pub fn bytes(&self) -> Vec<u8> {
        let mut buf = self.header.clone();
        buf.extend_from_slice(&self.data);
        buf
    }

    pub fn write(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.bytes()).expect("failed to write fixture");
        path
    }
}

pub fn fpod_click(ticks: u32, ipi: u8, amp: u8) -> [u8; 16] {
    let t = ticks.to_be_bytes();
    let mut buf = [0u8; 16];
    buf[..3].copy_from_slice(&t[1..]);
    buf[3] = 15;
    buf[4] = 0x29;
    buf[5] = ipi;
    buf[6] = ipi;
    buf[10] = amp;
    buf[13] = 0x12;
    buf[14] = 0x34;
    buf
}

pub fn fpod_train(train_id: u8, species_code: u8, quality: u8) -> [u8; 16] {
    let mut buf = [0u8; 16];
    buf[0] = 249;
    buf[14] = (species_code << 2) | quality | 0x20;
    buf[15] = train_id;
    buf
}

pub fn fpod_wav(value: u8) -> [u8; 16] {
    let mut buf = [value; 16];
    buf[0] = 250;
    buf
}

pub fn fpod_minute(temp: u8, bat1: u8, bat2: u8) -> [u8; 16] {
    let mut buf = [0u8; 16];
    buf[0] = 254;
    buf[7] = temp;
    buf[11] = bat1;
    buf[12] = bat2;
    buf
}

pub fn cpod_click(len: usize, ncyc: u8, khz: u8) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    buf[2] = 0xc8;
    buf[3] = ncyc;
    buf[5] = khz;
    buf
}

pub fn cpod_minute(len: usize) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    buf[len - 1] = 254;
    buf
}

pub fn cpod_fill(len: usize) -> Vec<u8> {
    vec![0xffu8; len]
}
