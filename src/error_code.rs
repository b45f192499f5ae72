//! Error conditions reported by the module itself


use core::fmt;

use num_enum::{IntoPrimitive, TryFromPrimitive};


/// The content of the error code register
///
/// The module latches the last error that occured. [`ErrorCode::None`] means
/// no error has been recorded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, IntoPrimitive, TryFromPrimitive)]
#[repr(u8)]
pub enum ErrorCode {
    /// No error
    None = 0x00,
    /// Error while writing over I2C
    I2cWrite = 0x01,
    /// The I2C command queue is full
    I2cCmdFull = 0x02,
    /// Adding an anchor failed
    AnchorAdd = 0x03,
    /// The communication queue is full
    CommQueueFull = 0x04,
    /// Error while reading over I2C
    I2cRead = 0x05,
    /// The UWB configuration could not be applied
    UwbConfig = 0x06,
    /// The operation queue is full
    OperationQueueFull = 0x07,
    /// TDMA scheduling error
    Tdma = 0x08,
    /// Bus fault during startup
    StartupBusFault = 0x09,
    /// The flash content is invalid
    FlashInvalid = 0x0A,
    /// Not enough anchors for positioning
    NotEnoughAnchors = 0x0B,
    /// Device discovery failed
    Discovery = 0x0C,
    /// Anchor calibration failed
    Calibration = 0x0D,
    /// Invalid function parameters
    FuncParam = 0x0E,
    /// The anchor is not in the device list
    AnchorNotFound = 0x0F,
    /// Flash access failed
    Flash = 0x10,
    /// Out of memory
    Memory = 0x11,
    /// Ranging failed
    Ranging = 0x12,
    /// First ranging timeout
    RangingTimeout1 = 0x13,
    /// Second ranging timeout
    RangingTimeout2 = 0x14,
    /// Delayed transmission was too late
    TxLate = 0x15,
    /// The UWB transceiver is busy
    UwbBusy = 0x16,
    /// The positioning algorithm failed
    PositioningAlgorithm = 0x17,
    /// No acknowledgement received
    NoAck = 0x18,
    /// Sniffer buffer overflow
    SniffOverflow = 0x19,
    /// No pulse-per-second signal
    NoPps = 0x1A,
    /// A new task interrupted the running one
    NewTask = 0x1B,
    /// The device was not recognized
    UnrecognizedDevice = 0x55,
    /// General failure
    General = 0xFF,
}

impl ErrorCode {
    /// Whether the module has no error recorded
    pub fn is_none(&self) -> bool {
        *self == ErrorCode::None
    }

    /// The symbolic name, as used in the module's documentation
    pub fn name(&self) -> &'static str {
        match self {
            ErrorCode::None => "POZYX_ERROR_NONE",
            ErrorCode::I2cWrite => "POZYX_ERROR_I2C_WRITE",
            ErrorCode::I2cCmdFull => "POZYX_ERROR_I2C_CMDFULL",
            ErrorCode::AnchorAdd => "POZYX_ERROR_ANCHOR_ADD",
            ErrorCode::CommQueueFull => "POZYX_ERROR_COMM_QUEUE_FULL",
            ErrorCode::I2cRead => "POZYX_ERROR_I2C_READ",
            ErrorCode::UwbConfig => "POZYX_ERROR_UWB_CONFIG",
            ErrorCode::OperationQueueFull => "POZYX_ERROR_OPERATION_QUEUE_FULL",
            ErrorCode::Tdma => "POZYX_ERROR_TDMA",
            ErrorCode::StartupBusFault => "POZYX_ERROR_STARTUP_BUSFAULT",
            ErrorCode::FlashInvalid => "POZYX_ERROR_FLASH_INVALID",
            ErrorCode::NotEnoughAnchors => "POZYX_ERROR_NOT_ENOUGH_ANCHORS",
            ErrorCode::Discovery => "POZYX_ERROR_DISCOVERY",
            ErrorCode::Calibration => "POZYX_ERROR_CALIBRATION",
            ErrorCode::FuncParam => "POZYX_ERROR_FUNC_PARAM",
            ErrorCode::AnchorNotFound => "POZYX_ERROR_ANCHOR_NOT_FOUND",
            ErrorCode::Flash => "POZYX_ERROR_FLASH",
            ErrorCode::Memory => "POZYX_ERROR_MEMORY",
            ErrorCode::Ranging => "POZYX_ERROR_RANGING",
            ErrorCode::RangingTimeout1 => "POZYX_ERROR_RTIMEOUT1",
            ErrorCode::RangingTimeout2 => "POZYX_ERROR_RTIMEOUT2",
            ErrorCode::TxLate => "POZYX_ERROR_TXLATE",
            ErrorCode::UwbBusy => "POZYX_ERROR_UWB_BUSY",
            ErrorCode::PositioningAlgorithm => "POZYX_ERROR_POSALG",
            ErrorCode::NoAck => "POZYX_ERROR_NOACK",
            ErrorCode::SniffOverflow => "POZYX_ERROR_SNIFF_OVERFLOW",
            ErrorCode::NoPps => "POZYX_ERROR_NO_PPS",
            ErrorCode::NewTask => "POZYX_ERROR_NEW_TASK",
            ErrorCode::UnrecognizedDevice => "POZYX_ERROR_UNRDEV",
            ErrorCode::General => "POZYX_ERROR_GENERAL",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_none() {
            return write!(f, "no error");
        }

        write!(f, "{} (0x{:02X})", self.name(), u8::from(*self))
    }
}
