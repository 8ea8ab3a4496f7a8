//! Byte transports carrying command and data packets to the panel.

use crate::Result;
use tracing::debug;

/// A sink that accepts whole packets.
///
/// `write` returns how many bytes the device accepted. Anything short of the
/// packet length is a failed transfer; the driver never retries.
pub trait Transport {
    /// Writes one packet, returning the number of bytes accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        (**self).write(bytes)
    }
}

#[cfg(target_os = "linux")]
mod i2c {
    use super::Transport;
    use crate::Result;
    use std::fs::{File, OpenOptions};
    use std::io::Write;
    use std::os::unix::io::AsRawFd;
    use tracing::{debug, info};

    /// `I2C_SLAVE` request from `linux/i2c-dev.h`.
    const I2C_SLAVE: libc::c_ulong = 0x0703;

    /// Linux i2c-dev transport bound to one slave address.
    #[derive(Debug)]
    pub struct I2cTransport {
        file: File,
        address: u16,
    }

    impl I2cTransport {
        /// Opens an i2c-dev node (e.g. `/dev/i2c-1`) and binds the slave address.
        pub fn open(path: &str, address: u16) -> Result<Self> {
            let file = OpenOptions::new().read(true).write(true).open(path).map_err(|e| {
                debug!("Failed to open {}: {}", path, e);
                e
            })?;

            // SAFETY: the fd is owned by `file` and stays open for the call;
            // I2C_SLAVE takes the address by value.
            let rc = unsafe {
                libc::ioctl(
                    file.as_raw_fd(),
                    I2C_SLAVE as _,
                    libc::c_ulong::from(address),
                )
            };
            if rc < 0 {
                let err = std::io::Error::last_os_error();
                debug!("Failed to set I2C slave address {:#04X}: {}", address, err);
                return Err(err.into());
            }

            info!("I2C bus opened at {} (address {:#04X})", path, address);
            Ok(Self { file, address })
        }

        /// Returns the bound slave address.
        pub fn address(&self) -> u16 {
            self.address
        }
    }

    impl Transport for I2cTransport {
        fn write(&mut self, bytes: &[u8]) -> Result<usize> {
            Ok(self.file.write(bytes)?)
        }
    }
}

#[cfg(target_os = "linux")]
pub use i2c::I2cTransport;

/// In-memory transport that records each packet.
///
/// Can be told to start short-writing after a number of packets, which is how
/// transport failures are exercised without hardware.
#[derive(Debug, Default, Clone)]
pub struct RecordingTransport {
    packets: Vec<Vec<u8>>,
    fail_from: Option<usize>,
}

impl RecordingTransport {
    /// Creates an empty recorder that accepts every write.
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes packet number `index` (0-based) and every later one short-write.
    pub fn fail_from(mut self, index: usize) -> Self {
        self.fail_from = Some(index);
        self
    }

    /// Returns every packet accepted so far, in order.
    pub fn packets(&self) -> &[Vec<u8>] {
        &self.packets
    }

    /// Forgets recorded packets.
    pub fn clear(&mut self) {
        self.packets.clear();
    }
}

impl Transport for RecordingTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<usize> {
        let index = self.packets.len();
        if self.fail_from.is_some_and(|from| index >= from) {
            debug!("Dropping packet {} ({} bytes)", index, bytes.len());
            // Record a placeholder so later indices keep counting.
            self.packets.push(Vec::new());
            return Ok(0);
        }
        debug!("Packet {}: {:02X?}", index, bytes);
        self.packets.push(bytes.to_vec());
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording() {
        let mut transport = RecordingTransport::new();
        assert_eq!(transport.write(&[0x00, 0xAF]).unwrap(), 2);
        assert_eq!(transport.write(&[0x40, 1, 2, 3]).unwrap(), 4);
        assert_eq!(transport.packets(), &[vec![0x00, 0xAF], vec![0x40, 1, 2, 3]]);

        transport.clear();
        assert!(transport.packets().is_empty());
    }

    #[test]
    fn test_fail_from() {
        let mut transport = RecordingTransport::new().fail_from(1);
        assert_eq!(transport.write(&[0x00, 0xAF]).unwrap(), 2);
        assert_eq!(transport.write(&[0x00, 0xAE]).unwrap(), 0);
        assert_eq!(transport.write(&[0x00, 0xA6]).unwrap(), 0);
    }

    #[test]
    fn test_boxed() {
        let mut transport: Box<dyn Transport> = Box::new(RecordingTransport::new());
        assert_eq!(transport.write(&[1, 2, 3]).unwrap(), 3);
    }

    // Hardware tests are skipped by default
    #[cfg(target_os = "linux")]
    #[test]
    #[ignore]
    fn test_i2c_open() {
        let transport = I2cTransport::open(crate::DEFAULT_BUS, crate::DEFAULT_ADDRESS);
        assert!(transport.is_ok());
    }
}
