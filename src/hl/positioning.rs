use crate::{
    configs::{MAX_POSITIONING_INTERVAL, MIN_POSITIONING_INTERVAL},
    frame::Request,
    ll::Transport,
    types::{NetworkId, Position, PositionError, RangeInfo},
};

use super::{Error, Pozyx};

/// Opcodes of the positioning register functions
mod opcode {
    pub const RESET: u8 = 0xB0;
    pub const DO_RANGING: u8 = 0xB5;
    pub const DO_POSITIONING: u8 = 0xB6;
    pub const CALIBRATE_DEVICES: u8 = 0xC2;
    pub const GET_RANGE_INFO: u8 = 0xC7;
}

impl_register_reads! {
    /// Read the x-coordinate of the latest position estimate, in mm
    pos_x -> i32;
    /// Read the y-coordinate of the latest position estimate, in mm
    pos_y -> i32;
    /// Read the z-coordinate of the latest position estimate, in mm
    pos_z -> i32;
    /// Read the covariance of x
    pos_err_x -> i16;
    /// Read the covariance of y
    pos_err_y -> i16;
    /// Read the covariance of z
    pos_err_z -> i16;
    /// Read the covariance of xy
    pos_err_xy -> i16;
    /// Read the covariance of xz
    pos_err_xz -> i16;
    /// Read the covariance of yz
    pos_err_yz -> i16;
}

impl<T> Pozyx<T>
where
    T: Transport,
{
    /// Read the latest position estimate
    pub fn position(&mut self) -> Result<Position, Error<T>> {
        Ok(Position {
            x: self.pos_x()?,
            y: self.pos_y()?,
            z: self.pos_z()?,
        })
    }

    /// Read the error covariances of the latest position estimate
    pub fn position_error(&mut self) -> Result<PositionError, Error<T>> {
        Ok(PositionError {
            x: self.pos_err_x()?,
            y: self.pos_err_y()?,
            z: self.pos_err_z()?,
            xy: self.pos_err_xy()?,
            xz: self.pos_err_xz()?,
            yz: self.pos_err_yz()?,
        })
    }

    /// Trigger a single positioning round
    ///
    /// The result can be read with [`Pozyx::position`], once the module
    /// reports a new position through the interrupt status.
    pub fn start_positioning(&mut self) -> Result<(), Error<T>> {
        self.call_flag(&Request::new(opcode::DO_POSITIONING))
    }

    /// Configure continuous positioning
    ///
    /// The interval is given in milliseconds and must be between
    /// [`MIN_POSITIONING_INTERVAL`] and [`MAX_POSITIONING_INTERVAL`].
    pub fn set_positioning_interval(&mut self, interval_ms: u16) -> Result<(), Error<T>> {
        if !(MIN_POSITIONING_INTERVAL..=MAX_POSITIONING_INTERVAL).contains(&interval_ms) {
            return Err(Error::InvalidParameter("interval_ms"));
        }

        self.ll.pos_interval().write(|w| w.value(interval_ms))?;

        Ok(())
    }

    /// Read the continuous positioning interval, in milliseconds
    ///
    /// `0` means continuous positioning is disabled.
    pub fn positioning_interval(&mut self) -> Result<u16, Error<T>> {
        Ok(self.ll.pos_interval().read()?.value())
    }

    /// Reset the module
    ///
    /// This clears the device list and the configuration of the module.
    pub fn reset(&mut self) -> Result<(), Error<T>> {
        self.call_flag(&Request::new(opcode::RESET))
    }

    /// Calibrate the positions of the anchors in the device list
    pub fn calibrate_devices(&mut self) -> Result<(), Error<T>> {
        self.call_flag(&Request::new(opcode::CALIBRATE_DEVICES))
    }

    /// Start a range measurement to the given device
    ///
    /// Sends the same frame as [`Pozyx::do_ranging`].
    pub fn start_ranging(&mut self, id: NetworkId) -> Result<(), Error<T>> {
        self.do_ranging(id)
    }

    /// Trigger a range measurement to the given device
    ///
    /// Only the success flag is checked. The measurement completes on the
    /// module; read it with [`Pozyx::range_info`] once the interrupt status
    /// reports [`InterruptEvent::Function`].
    ///
    /// [`InterruptEvent::Function`]: crate::flags::InterruptEvent::Function
    pub fn do_ranging(&mut self, id: NetworkId) -> Result<(), Error<T>> {
        let request = Request::new(opcode::DO_RANGING).push(id.0)?;

        self.call_flag(&request)
    }

    /// Read the result of the latest range measurement to the given device
    pub fn range_info(&mut self, id: NetworkId) -> Result<RangeInfo, Error<T>> {
        let request = Request::new(opcode::GET_RANGE_INFO).push(id.0)?;

        let mut response = [0; 11];
        let mut frame = self.call(&request, &mut response)?;

        Ok(RangeInfo {
            timestamp: frame.read()?,
            last_measurement: frame.read()?,
            signal_strength: frame.read()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        flags::InterruptEvent,
        hl::{mock::ScriptedTransport, Error, ErrorKind, Pozyx},
        types::{NetworkId, Position, PositionError, RangeInfo},
    };

    #[test]
    fn position() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x30], &1500i32.to_le_bytes())
                .expect(&[0x34], &(-200i32).to_le_bytes())
                .expect(&[0x38], &0i32.to_le_bytes()),
        );

        assert_eq!(pozyx.position().unwrap(), Position::new(1500, -200, 0));

        pozyx.free().done();
    }

    #[test]
    fn origin_is_a_real_reading() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x30], &[0; 4])
                .expect(&[0x34], &[0; 4])
                .expect(&[0x38], &[0; 4])
                .expect(&[0x30], &[0; 4])
                .fail(&[0x34]),
        );

        assert_eq!(pozyx.position().unwrap(), Position::default());
        assert!(pozyx.position().is_err());

        pozyx.free().done();
    }

    #[test]
    fn position_error() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x3C], &[0x01, 0x00])
                .expect(&[0x3E], &[0x02, 0x00])
                .expect(&[0x40], &[0x03, 0x00])
                .expect(&[0x42], &[0xff, 0xff])
                .expect(&[0x44], &[0x00, 0x00])
                .expect(&[0x46], &[0x00, 0x80]),
        );

        assert_eq!(
            pozyx.position_error().unwrap(),
            PositionError {
                x: 1,
                y: 2,
                z: 3,
                xy: -1,
                xz: 0,
                yz: i16::MIN,
            }
        );

        pozyx.free().done();
    }

    #[test]
    fn function_calls_check_the_flag() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0xB6], &[0x01])
                .expect(&[0xC2], &[0x01])
                .expect(&[0xB0], &[0x00]),
        );

        pozyx.start_positioning().unwrap();
        pozyx.calibrate_devices().unwrap();
        match pozyx.reset() {
            Err(Error::Rejected { opcode: 0xB0, flag: 0 }) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        pozyx.free().done();
    }

    #[test]
    fn positioning_interval() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0x18, 0xf4, 0x01], &[0x01])
                .expect(&[0x18], &[0xf4, 0x01]),
        );

        pozyx.set_positioning_interval(500).unwrap();
        assert_eq!(pozyx.positioning_interval().unwrap(), 500);

        for &interval in &[0, 99, 60_001] {
            let err = pozyx.set_positioning_interval(interval).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }

        pozyx.free().done();
    }

    #[test]
    fn do_ranging_sends_only_the_ranging_frame() {
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0xB5, 0x05, 0x00], &[0x01])
                .expect(&[0xB5, 0x05, 0x00], &[0x01]),
        );

        pozyx.do_ranging(NetworkId(5)).unwrap();
        pozyx.start_ranging(NetworkId(5)).unwrap();

        pozyx.free().done();
    }

    #[test]
    fn range_info_after_function_interrupt() {
        let mut response = vec![0x01];
        response.extend_from_slice(&1000i32.to_le_bytes());
        response.extend_from_slice(&2500i32.to_le_bytes());
        response.extend_from_slice(&(-79i16).to_le_bytes());

        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0xB5, 0x05, 0x60], &[0x01])
                .expect(&[0x05], &[0x00])
                .expect(&[0x05], &[0x10])
                .expect(&[0xC7, 0x05, 0x60], &response),
        );

        pozyx.do_ranging(NetworkId(0x6005)).unwrap();
        while !pozyx
            .interrupt_status()
            .unwrap()
            .contains(InterruptEvent::Function)
        {}

        assert_eq!(
            pozyx.range_info(NetworkId(0x6005)).unwrap(),
            RangeInfo {
                timestamp: 1000,
                last_measurement: 2500,
                signal_strength: -79,
            }
        );

        pozyx.free().done();
    }

    #[test]
    fn do_ranging_stops_when_refused() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0xB5, 0x05, 0x60], &[0x00]));

        let err = pozyx.do_ranging(NetworkId(0x6005)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);

        pozyx.free().done();
    }

    #[test]
    fn range_info_checks_the_flag() {
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0xC7, 0x01, 0x00], &[0; 11]));

        match pozyx.range_info(NetworkId(1)) {
            Err(Error::Rejected { opcode: 0xC7, .. }) => {}
            other => panic!("unexpected result: {:?}", other),
        }

        pozyx.free().done();
    }
}
