//! Bit-packed status registers
//!
//! The Pozyx reports its interrupt status, self-test result and calibration
//! state as single bytes. Note that the polarity differs: a set bit in the
//! interrupt status means an event is present, while a set bit in the
//! self-test result means the subsystem is healthy.


use core::fmt;


/// Events reported through the interrupt status register
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InterruptEvent {
    /// An error has occured
    Error,
    /// A new position estimate is available
    Position,
    /// A new IMU measurement is available
    Imu,
    /// Data was received over the UWB link
    RxData,
    /// A register function call has finished (excluding positioning)
    Function,
}

impl InterruptEvent {
    /// All events, in bit order
    pub const ALL: [InterruptEvent; 5] = [
        InterruptEvent::Error,
        InterruptEvent::Position,
        InterruptEvent::Imu,
        InterruptEvent::RxData,
        InterruptEvent::Function,
    ];

    /// The bit position of the event
    pub fn bit(self) -> u8 {
        match self {
            InterruptEvent::Error => 0,
            InterruptEvent::Position => 1,
            InterruptEvent::Imu => 2,
            InterruptEvent::RxData => 3,
            InterruptEvent::Function => 4,
        }
    }

    /// Human-readable description
    pub fn label(self) -> &'static str {
        match self {
            InterruptEvent::Error => "ERR: An error has occured",
            InterruptEvent::Position => "POS: A new position estimate is available",
            InterruptEvent::Imu => "IMU: A new IMU measurement is available",
            InterruptEvent::RxData => {
                "RX_DATA: The pozyx device has received some data over its wireless uwb link"
            }
            InterruptEvent::Function => {
                "FUNC: A register function call has finished (excluding positioning)"
            }
        }
    }
}

impl fmt::Display for InterruptEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}


/// Content of the interrupt status register
///
/// A set bit means the event is present.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct InterruptStatus(pub u8);

impl InterruptStatus {
    /// Whether the given event is present
    pub fn contains(&self, event: InterruptEvent) -> bool {
        (self.0 >> event.bit()) & 0x1 == 0x1
    }

    /// Iterate over the present events, in bit order
    pub fn events(self) -> impl Iterator<Item = InterruptEvent> {
        InterruptEvent::ALL
            .iter()
            .copied()
            .filter(move |&event| self.contains(event))
    }
}


/// Subsystems checked by the self-test
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Subsystem {
    /// Accelerometer
    Accelerometer,
    /// Magnetometer
    Magnetometer,
    /// Gyroscope
    Gyroscope,
    /// Inertial measurement unit
    Imu,
    /// Pressure sensor
    Pressure,
    /// UWB transceiver
    Uwb,
}

impl Subsystem {
    /// All subsystems, in bit order
    pub const ALL: [Subsystem; 6] = [
        Subsystem::Accelerometer,
        Subsystem::Magnetometer,
        Subsystem::Gyroscope,
        Subsystem::Imu,
        Subsystem::Pressure,
        Subsystem::Uwb,
    ];

    /// The bit position of the subsystem
    pub fn bit(self) -> u8 {
        match self {
            Subsystem::Accelerometer => 0,
            Subsystem::Magnetometer => 1,
            Subsystem::Gyroscope => 2,
            Subsystem::Imu => 3,
            Subsystem::Pressure => 4,
            Subsystem::Uwb => 5,
        }
    }

    /// Short label
    pub fn label(self) -> &'static str {
        match self {
            Subsystem::Accelerometer => "ACC",
            Subsystem::Magnetometer => "MAGN",
            Subsystem::Gyroscope => "GYRO",
            Subsystem::Imu => "IMU",
            Subsystem::Pressure => "PRESS",
            Subsystem::Uwb => "UWB",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}


/// Content of the self-test result register
///
/// A set bit means the subsystem passed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SelfTest(pub u8);

impl SelfTest {
    /// Whether the given subsystem passed the self-test
    pub fn is_healthy(&self, subsystem: Subsystem) -> bool {
        (self.0 >> subsystem.bit()) & 0x1 == 0x1
    }

    /// Iterate over the subsystems that failed, in bit order
    pub fn failures(self) -> impl Iterator<Item = Subsystem> {
        Subsystem::ALL
            .iter()
            .copied()
            .filter(move |&subsystem| !self.is_healthy(subsystem))
    }

    /// Whether all subsystems passed
    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }
}


/// Sensors with a calibration state
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Sensor {
    /// Overall system
    System,
    /// Gyroscope
    Gyroscope,
    /// Accelerometer
    Accelerometer,
    /// Magnetometer
    Magnetometer,
}

impl Sensor {
    /// All sensors, in the order they are reported
    pub const ALL: [Sensor; 4] = [
        Sensor::System,
        Sensor::Gyroscope,
        Sensor::Accelerometer,
        Sensor::Magnetometer,
    ];

    /// The position of the sensor's lowest bit in the calibration register
    pub fn shift(self) -> u8 {
        match self {
            Sensor::Magnetometer => 0,
            Sensor::Accelerometer => 2,
            Sensor::Gyroscope => 4,
            Sensor::System => 6,
        }
    }

    /// Short label
    pub fn label(self) -> &'static str {
        match self {
            Sensor::System => "SYS",
            Sensor::Gyroscope => "GYR",
            Sensor::Accelerometer => "ACC",
            Sensor::Magnetometer => "MAG",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}


/// Content of the calibration status register
///
/// Every sensor has a 2-bit field, `0b11` means fully calibrated.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CalibrationStatus(pub u8);

impl CalibrationStatus {
    /// Field value that means "fully calibrated"
    pub const CALIBRATED: u8 = 0b11;

    /// The 2-bit calibration level of a sensor
    pub fn level(&self, sensor: Sensor) -> u8 {
        (self.0 >> sensor.shift()) & 0b11
    }

    /// Whether the sensor is fully calibrated
    pub fn is_calibrated(&self, sensor: Sensor) -> bool {
        self.level(sensor) == Self::CALIBRATED
    }

    /// Iterate over the fully calibrated sensors
    pub fn calibrated(self) -> impl Iterator<Item = Sensor> {
        Sensor::ALL
            .iter()
            .copied()
            .filter(move |&sensor| self.is_calibrated(sensor))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interrupt_status_reports_set_bits() {
        let status = InterruptStatus(0x05);
        let events: Vec<_> = status.events().collect();

        assert_eq!(events, [InterruptEvent::Error, InterruptEvent::Imu]);
        assert!(!status.contains(InterruptEvent::Position));
    }

    #[test]
    fn interrupt_status_ignores_reserved_bits() {
        assert_eq!(InterruptStatus(0b1110_0000).events().count(), 0);
    }

    #[test]
    fn self_test_all_healthy() {
        let result = SelfTest(0b0011_1111);

        assert!(result.passed());
        assert_eq!(result.failures().count(), 0);
    }

    #[test]
    fn self_test_reports_clear_bits_as_failing() {
        let failures: Vec<_> = SelfTest(0x00).failures().collect();
        assert_eq!(failures, Subsystem::ALL);

        let failures: Vec<_> = SelfTest(0b0010_1110).failures().collect();
        assert_eq!(failures, [Subsystem::Accelerometer, Subsystem::Pressure]);
    }

    #[test]
    fn calibration_upper_fields() {
        let status = CalibrationStatus(0b1111_0000);
        let calibrated: Vec<_> = status.calibrated().collect();

        assert_eq!(calibrated, [Sensor::System, Sensor::Gyroscope]);
        assert!(!status.is_calibrated(Sensor::Accelerometer));
        assert!(!status.is_calibrated(Sensor::Magnetometer));
    }

    #[test]
    fn calibration_partial_levels_are_not_calibrated() {
        let status = CalibrationStatus(0b0110_1011);

        assert_eq!(status.level(Sensor::Magnetometer), 0b11);
        assert_eq!(status.level(Sensor::Accelerometer), 0b10);
        assert_eq!(status.level(Sensor::Gyroscope), 0b10);
        assert_eq!(status.level(Sensor::System), 0b01);
        assert_eq!(status.calibrated().collect::<Vec<_>>(), [Sensor::Magnetometer]);
    }

    #[test]
    fn labels() {
        assert_eq!(Subsystem::Magnetometer.to_string(), "MAGN");
        assert_eq!(Sensor::System.to_string(), "SYS");
        assert!(InterruptEvent::Position.to_string().starts_with("POS"));
    }
}
