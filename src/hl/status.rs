use core::convert::TryFrom;

use crate::{
    configs::InterruptConfig,
    error_code::ErrorCode,
    flags::{CalibrationStatus, InterruptStatus, SelfTest},
    ll::Transport,
    types::FirmwareVersion,
};

use super::{Error, Pozyx};

impl<T> Pozyx<T>
where
    T: Transport,
{
    /// Read the firmware version of the module
    pub fn firmware_version(&mut self) -> Result<FirmwareVersion, Error<T>> {
        Ok(FirmwareVersion::from_bits(self.ll.firmware_ver().read()?.value()))
    }

    /// Read the result of the module's self-test
    ///
    /// A set bit means the subsystem is healthy.
    pub fn self_test(&mut self) -> Result<SelfTest, Error<T>> {
        Ok(SelfTest(self.ll.st_result().read()?.value()))
    }

    /// Read the error code register
    ///
    /// Returns [`ErrorCode::None`] if the module has no error recorded.
    pub fn error_code(&mut self) -> Result<ErrorCode, Error<T>> {
        let raw = self.ll.errorcode().read()?.value();

        ErrorCode::try_from(raw).map_err(|_| Error::UnknownErrorCode(raw))
    }

    /// Read the interrupt status register
    ///
    /// A set bit means the event is present.
    pub fn interrupt_status(&mut self) -> Result<InterruptStatus, Error<T>> {
        Ok(InterruptStatus(self.ll.int_status().read()?.value()))
    }

    /// Read the calibration status of the IMU sensors
    pub fn calibration_status(&mut self) -> Result<CalibrationStatus, Error<T>> {
        Ok(CalibrationStatus(self.ll.calib_status().read()?.value()))
    }

    /// Configure which events raise an interrupt, and on which pin
    ///
    /// Fails with [`Error::InvalidInterruptPin`] without touching the bus, if
    /// the pin is neither `0` nor `1`.
    pub fn set_interrupt_mask(&mut self, config: &InterruptConfig) -> Result<(), Error<T>> {
        let mask = config
            .mask()
            .ok_or(Error::InvalidInterruptPin(config.pin))?;

        self.ll.int_mask().write(|w| w.value(mask))?;

        Ok(())
    }

    /// Read the interrupt mask register
    pub fn interrupt_mask(&mut self) -> Result<u8, Error<T>> {
        Ok(self.ll.int_mask().read()?.value())
    }
}
