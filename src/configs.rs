//! Configuration structs for register functions
//!
//! This module houses the datastructures that control how the module discovers
//! devices and raises interrupts. The configs are passed to the functions that
//! use them.

use crate::types::DeviceType;


/// The largest number of devices the module keeps in its device list
pub const MAX_DEVICES: u8 = 20;

/// The largest number of anchors the module reports
pub const MAX_ANCHORS: usize = 16;


/// Device discovery configuration
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DiscoverConfig {
    /// The kind of devices to look for
    pub device_type: DeviceType,
    /// The number of devices to discover, between 1 and [`MAX_DEVICES`]
    pub max_devices: u8,
    /// How long to listen for devices, in seconds
    pub wait_time: u8,
}

impl Default for DiscoverConfig {
    fn default() -> Self {
        DiscoverConfig {
            device_type: Default::default(),
            max_devices: 10,
            wait_time: 10,
        }
    }
}

impl DiscoverConfig {
    /// Whether the configuration can be sent to the module
    pub fn is_valid(&self) -> bool {
        (1..=MAX_DEVICES).contains(&self.max_devices)
    }
}


/// Interrupt configuration
///
/// Every flag enables the interrupt for one kind of event. `pin` selects the
/// interrupt pin, valid values are `0` and `1`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InterruptConfig {
    /// Interrupt whenever an error occurs
    pub error: bool,
    /// Interrupt whenever a new position update is available
    pub position: bool,
    /// Interrupt whenever a new IMU update is available
    pub imu: bool,
    /// Interrupt whenever data is received over the UWB network
    pub rx_data: bool,
    /// Interrupt whenever a register function call has completed
    pub function: bool,
    /// The interrupt pin
    pub pin: u8,
}

impl InterruptConfig {
    /// Bit of the error interrupt
    pub const ERROR: u8 = 0x01;
    /// Bit of the position interrupt
    pub const POSITION: u8 = 0x02;
    /// Bit of the IMU interrupt
    pub const IMU: u8 = 0x04;
    /// Bit of the RX data interrupt
    pub const RX_DATA: u8 = 0x08;
    /// Bit of the function interrupt
    pub const FUNCTION: u8 = 0x10;
    /// Bit that selects interrupt pin 1
    pub const PIN: u8 = 0x80;

    /// Build the interrupt mask register value
    ///
    /// Returns `None` if `pin` is neither `0` nor `1`.
    pub fn mask(&self) -> Option<u8> {
        let mut mask = 0;

        if self.error {
            mask |= Self::ERROR;
        }
        if self.position {
            mask |= Self::POSITION;
        }
        if self.imu {
            mask |= Self::IMU;
        }
        if self.rx_data {
            mask |= Self::RX_DATA;
        }
        if self.function {
            mask |= Self::FUNCTION;
        }

        match self.pin {
            0 => {}
            1 => mask |= Self::PIN,
            _ => return None,
        }

        Some(mask)
    }
}


/// Shortest positioning interval the module accepts, in milliseconds
pub const MIN_POSITIONING_INTERVAL: u16 = 100;

/// Longest positioning interval the module accepts, in milliseconds
pub const MAX_POSITIONING_INTERVAL: u16 = 60_000;


/// The highest CIR offset that can be requested
pub const MAX_CIR_OFFSET: u16 = 1015;

/// The largest number of CIR coefficients returned by a single request
pub const MAX_CIR_COEFFICIENTS: usize = 49;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_sets_bits_additively() {
        let config = InterruptConfig {
            error: true,
            imu: true,
            function: true,
            pin: 1,
            ..Default::default()
        };

        assert_eq!(config.mask(), Some(0b1001_0101));
    }

    #[test]
    fn empty_mask() {
        assert_eq!(InterruptConfig::default().mask(), Some(0));
    }

    #[test]
    fn invalid_pin_has_no_mask() {
        let config = InterruptConfig {
            error: true,
            pin: 2,
            ..Default::default()
        };

        assert_eq!(config.mask(), None);
    }

    #[test]
    fn discover_defaults() {
        let config = DiscoverConfig::default();

        assert_eq!(config.device_type, DeviceType::Anchors);
        assert_eq!(config.max_devices, 10);
        assert_eq!(config.wait_time, 10);
        assert!(config.is_valid());
        assert!(!DiscoverConfig { max_devices: 0, ..config }.is_valid());
        assert!(!DiscoverConfig { max_devices: 21, ..config }.is_valid());
    }
}
