use heapless::Vec;

use crate::{
    configs::{DiscoverConfig, MAX_ANCHORS, MAX_DEVICES},
    frame::{FrameError, Request, Response},
    ll::Transport,
    types::{Device, NetworkId, Position},
};

use super::{Error, Pozyx};

mod opcode {
    pub const GET_ANCHOR_IDS: u8 = 0xB8;
    pub const GET_DEVICE_IDS: u8 = 0xC0;
    pub const DISCOVER: u8 = 0xC1;
    pub const CLEAR: u8 = 0xC3;
    pub const ADD: u8 = 0xC4;
    pub const GET_DEVICE_INFO: u8 = 0xC5;
    pub const GET_ANCHOR_POSITION: u8 = 0xC6;
}

impl_register_reads! {
    /// Read the number of devices in the device list
    device_list_size -> u8;
}

impl<T> Pozyx<T>
where
    T: Transport,
{
    /// Discover devices and add them to the device list
    ///
    /// Fails with [`Error::InvalidParameter`] without touching the bus, if
    /// `max_devices` is not between `1` and [`MAX_DEVICES`].
    pub fn discover(&mut self, config: &DiscoverConfig) -> Result<(), Error<T>> {
        if !config.is_valid() {
            return Err(Error::InvalidParameter("max_devices"));
        }

        let request = Request::new(opcode::DISCOVER)
            .push(config.device_type as u8)?
            .push(config.max_devices)?
            .push(config.wait_time)?;

        self.call_flag(&request)
    }

    /// Read network ids from the device list
    ///
    /// Returns `size` ids, starting with the entry at `offset`. If `size` is
    /// `None`, all entries from `offset` up to [`MAX_DEVICES`] are read.
    /// Ranges that do not fit into the device list are refused with
    /// [`Error::InvalidParameter`] without touching the bus.
    pub fn device_ids(
        &mut self,
        offset: u8,
        size: Option<u8>,
    ) -> Result<Vec<NetworkId, { MAX_DEVICES as usize }>, Error<T>> {
        if offset >= MAX_DEVICES {
            return Err(Error::InvalidParameter("offset"));
        }
        let size = size.unwrap_or(MAX_DEVICES - offset);
        if size == 0 || size > MAX_DEVICES - offset {
            return Err(Error::InvalidParameter("size"));
        }

        let request = Request::new(opcode::GET_DEVICE_IDS)
            .push(offset)?
            .push(size)?;

        let mut response = [0; 1 + 2 * MAX_DEVICES as usize];
        let len = 1 + 2 * size as usize;
        let mut frame = self.call(&request, &mut response[..len])?;

        let mut ids = Vec::new();
        for _ in 0..size {
            let id = NetworkId(frame.read()?);
            if ids.push(id).is_err() {
                break;
            }
        }

        Ok(ids)
    }

    /// Remove all devices from the device list
    pub fn clear_devices(&mut self) -> Result<(), Error<T>> {
        self.call_flag(&Request::new(opcode::CLEAR))
    }

    /// Add a device to the device list
    pub fn add_device(&mut self, device: &Device) -> Result<(), Error<T>> {
        let request = Request::new(opcode::ADD)
            .push(device.id.0)?
            .push(device.flag)?
            .push(device.position.x)?
            .push(device.position.y)?
            .push(device.position.z)?;

        self.call_flag(&request)
    }

    /// Read a device list entry
    pub fn device_info(&mut self, id: NetworkId) -> Result<Device, Error<T>> {
        let request = Request::new(opcode::GET_DEVICE_INFO).push(id.0)?;

        let mut response = [0; 16];
        let mut frame = self.call(&request, &mut response)?;

        Ok(Device {
            id: NetworkId(frame.read()?),
            flag: frame.read()?,
            position: read_position(&mut frame)?,
        })
    }

    /// Read the coordinates of a device in the device list
    pub fn device_coords(&mut self, id: NetworkId) -> Result<Position, Error<T>> {
        let request = Request::new(opcode::GET_DEVICE_INFO).push(id.0)?;

        let mut response = [0; 13];
        let mut frame = self.call(&request, &mut response)?;

        Ok(read_position(&mut frame)?)
    }

    /// Read the network ids of the anchors used for positioning
    ///
    /// The module reports up to [`MAX_ANCHORS`] ids, the list ends at the
    /// first id that is `0`.
    pub fn anchor_ids(&mut self) -> Result<Vec<NetworkId, MAX_ANCHORS>, Error<T>> {
        let mut response = [0; 1 + 2 * MAX_ANCHORS];
        let mut frame = self.call(&Request::new(opcode::GET_ANCHOR_IDS), &mut response)?;

        let mut ids = Vec::new();
        while frame.remaining() >= 2 {
            let id = NetworkId(frame.read()?);
            if id == NetworkId::TERMINATOR {
                break;
            }
            if ids.push(id).is_err() {
                break;
            }
        }

        Ok(ids)
    }

    /// Read the position of an anchor
    pub fn anchor_position(&mut self, id: NetworkId) -> Result<Position, Error<T>> {
        let request = Request::new(opcode::GET_ANCHOR_POSITION).push(id.0)?;

        let mut response = [0; 13];
        let mut frame = self.call(&request, &mut response)?;

        Ok(read_position(&mut frame)?)
    }
}

fn read_position(frame: &mut Response) -> Result<Position, FrameError> {
    Ok(Position {
        x: frame.read()?,
        y: frame.read()?,
        z: frame.read()?,
    })
}
