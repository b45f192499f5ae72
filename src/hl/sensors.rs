use crate::{
    ll::Transport,
    types::{EulerAngles, NetworkId, Quaternion, Vector3},
};

use super::{Error, Pozyx};

impl_register_reads! {
    /// Read the acceleration along the x-axis (1 mg = 16)
    accel_x -> i16;
    /// Read the acceleration along the y-axis (1 mg = 16)
    accel_y -> i16;
    /// Read the acceleration along the z-axis (1 mg = 16)
    accel_z -> i16;
    /// Read the magnetic field strength along the x-axis (1 µT = 16)
    magn_x -> i16;
    /// Read the magnetic field strength along the y-axis (1 µT = 16)
    magn_y -> i16;
    /// Read the magnetic field strength along the z-axis (1 µT = 16)
    magn_z -> i16;
    /// Read the angular velocity around the x-axis (1 degree/s = 16)
    gyro_x -> i16;
    /// Read the angular velocity around the y-axis (1 degree/s = 16)
    gyro_y -> i16;
    /// Read the angular velocity around the z-axis (1 degree/s = 16)
    gyro_z -> i16;
    /// Read the heading (1 degree = 16)
    eul_heading -> i16;
    /// Read the roll (1 degree = 16)
    eul_roll -> i16;
    /// Read the pitch (1 degree = 16)
    eul_pitch -> i16;
    /// Read the weight of the orientation quaternion (1.0 = 2^14)
    quat_w -> i16;
    /// Read the x component of the orientation quaternion (1.0 = 2^14)
    quat_x -> i16;
    /// Read the y component of the orientation quaternion (1.0 = 2^14)
    quat_y -> i16;
    /// Read the z component of the orientation quaternion (1.0 = 2^14)
    quat_z -> i16;
    /// Read the linear acceleration along the x-axis (1 mg = 16)
    lia_x -> i16;
    /// Read the linear acceleration along the y-axis (1 mg = 16)
    lia_y -> i16;
    /// Read the linear acceleration along the z-axis (1 mg = 16)
    lia_z -> i16;
    /// Read the gravity vector along the x-axis (1 mg = 16)
    grav_x -> i16;
    /// Read the gravity vector along the y-axis (1 mg = 16)
    grav_y -> i16;
    /// Read the gravity vector along the z-axis (1 mg = 16)
    grav_z -> i16;
    /// Read the maximum linear acceleration since the last read, in mg
    max_lin_acc -> u16;
    /// Read the pressure in mPa
    pressure -> u32;
    /// Read the chip temperature in degrees Celsius
    temperature -> i8;
    /// Read the length of the latest message received over UWB
    rx_data_len -> u8;
}

impl<T> Pozyx<T>
where
    T: Transport,
{
    /// Read all three acceleration axes
    pub fn acceleration(&mut self) -> Result<Vector3, Error<T>> {
        Ok(Vector3 {
            x: self.accel_x()?,
            y: self.accel_y()?,
            z: self.accel_z()?,
        })
    }

    /// Read all three magnetometer axes
    pub fn magnetic(&mut self) -> Result<Vector3, Error<T>> {
        Ok(Vector3 {
            x: self.magn_x()?,
            y: self.magn_y()?,
            z: self.magn_z()?,
        })
    }

    /// Read all three gyroscope axes
    pub fn angular_velocity(&mut self) -> Result<Vector3, Error<T>> {
        Ok(Vector3 {
            x: self.gyro_x()?,
            y: self.gyro_y()?,
            z: self.gyro_z()?,
        })
    }

    /// Read the orientation as Euler angles
    pub fn euler_angles(&mut self) -> Result<EulerAngles, Error<T>> {
        let heading = self.eul_heading()?;
        let roll = self.eul_roll()?;
        let pitch = self.eul_pitch()?;

        Ok(EulerAngles::from_raw(heading, roll, pitch))
    }

    /// Read the orientation as a quaternion
    pub fn quaternion(&mut self) -> Result<Quaternion, Error<T>> {
        let w = self.quat_w()?;
        let x = self.quat_x()?;
        let y = self.quat_y()?;
        let z = self.quat_z()?;

        Ok(Quaternion::from_raw(w, x, y, z))
    }

    /// Read the linear acceleration, gravity removed
    pub fn linear_acceleration(&mut self) -> Result<Vector3, Error<T>> {
        Ok(Vector3 {
            x: self.lia_x()?,
            y: self.lia_y()?,
            z: self.lia_z()?,
        })
    }

    /// Read the gravity vector
    pub fn gravity(&mut self) -> Result<Vector3, Error<T>> {
        Ok(Vector3 {
            x: self.grav_x()?,
            y: self.grav_y()?,
            z: self.grav_z()?,
        })
    }

    /// Read the digital state of a GPIO pin
    ///
    /// Valid pins are `1` to `4`.
    pub fn gpio(&mut self, pin: u8) -> Result<u8, Error<T>> {
        let value = match pin {
            1 => self.ll.gpio1().read()?.value(),
            2 => self.ll.gpio2().read()?.value(),
            3 => self.ll.gpio3().read()?.value(),
            4 => self.ll.gpio4().read()?.value(),
            _ => return Err(Error::InvalidParameter("pin")),
        };

        Ok(value)
    }

    /// Read the network id of the sender of the latest UWB message
    pub fn rx_network_id(&mut self) -> Result<NetworkId, Error<T>> {
        Ok(NetworkId(self.ll.rx_network_id().read()?.value()))
    }
}

#[cfg(test)]
mod tests {
    use fixed::types::{I12F4, I2F14};

    use crate::{
        hl::{mock::ScriptedTransport, Error, ErrorKind, Pozyx},
        types::{NetworkId, Vector3},
    };

    #[test]
    fn acceleration_reads_three_axes() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x54], &[0x10, 0x00])
                .expect(&[0x56], &[0xf0, 0xff])
                .expect(&[0x58], &[0x00, 0x40]),
        );

        assert_eq!(
            pozyx.acceleration().unwrap(),
            Vector3 {
                x: 16,
                y: -16,
                z: 16384
            }
        );

        pozyx.free().done();
    }

    #[test]
    fn grouped_read_stops_at_first_fault() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x5A], &[0x01, 0x00])
                .fail(&[0x5C]),
        );

        assert_eq!(pozyx.magnetic().unwrap_err().kind(), ErrorKind::Transport);

        pozyx.free().done();
    }

    #[test]
    fn orientation() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x66], &(16i16 * 90).to_le_bytes())
                .expect(&[0x68], &(-8i16).to_le_bytes())
                .expect(&[0x6A], &[0x00, 0x00])
                .expect(&[0x6C], &16384i16.to_le_bytes())
                .expect(&[0x6E], &[0x00, 0x00])
                .expect(&[0x70], &(-8192i16).to_le_bytes())
                .expect(&[0x72], &[0x00, 0x00]),
        );

        let angles = pozyx.euler_angles().unwrap();
        assert_eq!(angles.heading, I12F4::from_num(90));
        assert_eq!(angles.roll, I12F4::from_num(-0.5));
        assert_eq!(angles.pitch, I12F4::from_num(0));

        let q = pozyx.quaternion().unwrap();
        assert_eq!(q.w, I2F14::from_num(1));
        assert_eq!(q.y, I2F14::from_num(-0.5));

        pozyx.free().done();
    }

    #[test]
    fn scalar_sensors() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x50], &101_325_000u32.to_le_bytes())
                .expect(&[0x80], &[0xfb])
                .expect(&[0x4E], &[0xe8, 0x03])
                .expect(&[0x82], &[0x34, 0x12])
                .expect(&[0x84], &[0x05]),
        );

        assert_eq!(pozyx.pressure().unwrap(), 101_325_000);
        assert_eq!(pozyx.temperature().unwrap(), -5);
        assert_eq!(pozyx.max_lin_acc().unwrap(), 1000);
        assert_eq!(pozyx.rx_network_id().unwrap(), NetworkId(0x1234));
        assert_eq!(pozyx.rx_data_len().unwrap(), 5);

        pozyx.free().done();
    }

    #[test]
    fn gpio_pins() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x85], &[0x01])
                .expect(&[0x88], &[0x00]),
        );

        assert_eq!(pozyx.gpio(1).unwrap(), 1);
        assert_eq!(pozyx.gpio(4).unwrap(), 0);

        for &pin in &[0, 5] {
            match pozyx.gpio(pin) {
                Err(Error::InvalidParameter("pin")) => {}
                other => panic!("unexpected result: {:?}", other),
            }
        }

        pozyx.free().done();
    }
}
