use heapless::Vec;

use crate::{
    configs::{MAX_CIR_COEFFICIENTS, MAX_CIR_OFFSET},
    frame::Request,
    ll::Transport,
    types::CirCoefficient,
};

use super::{Error, Pozyx};

const GET_CIR_DATA: u8 = 0xC8;

impl<T> Pozyx<T>
where
    T: Transport,
{
    /// Read coefficients of the channel impulse response of the latest UWB
    /// message
    ///
    /// `offset` is clamped to [`MAX_CIR_OFFSET`]. A `size` that is `0` or
    /// larger than [`MAX_CIR_COEFFICIENTS`] reads the maximum number of
    /// coefficients.
    pub fn cir(
        &mut self,
        offset: u16,
        size: u8,
    ) -> Result<Vec<CirCoefficient, MAX_CIR_COEFFICIENTS>, Error<T>> {
        let offset = offset.min(MAX_CIR_OFFSET);
        let size = match size as usize {
            1..=MAX_CIR_COEFFICIENTS => size as usize,
            _ => MAX_CIR_COEFFICIENTS,
        };

        let request = Request::new(GET_CIR_DATA).push(offset)?.push(size as u8)?;

        let mut response = [0; 1 + 4 * MAX_CIR_COEFFICIENTS];
        let mut frame = self.call(&request, &mut response[..1 + 4 * size])?;

        let mut coefficients = Vec::new();
        for _ in 0..size {
            let coefficient = CirCoefficient {
                real: frame.read()?,
                imaginary: frame.read()?,
            };
            if coefficients.push(coefficient).is_err() {
                break;
            }
        }

        Ok(coefficients)
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        hl::{mock::ScriptedTransport, ErrorKind, Pozyx},
        types::CirCoefficient,
    };

    fn cir_response(coefficients: &[(i16, i16)]) -> Vec<u8> {
        let mut bytes = vec![0x01];
        for &(real, imaginary) in coefficients {
            bytes.extend_from_slice(&real.to_le_bytes());
            bytes.extend_from_slice(&imaginary.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn reads_coefficients() {
        let response = cir_response(&[(100, -100), (-1, 32767)]);
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0xC8, 0x0a, 0x00, 2], &response));

        let cir = pozyx.cir(10, 2).unwrap();
        assert_eq!(
            cir,
            [
                CirCoefficient {
                    real: 100,
                    imaginary: -100
                },
                CirCoefficient {
                    real: -1,
                    imaginary: 32767
                },
            ]
        );

        pozyx.free().done();
    }

    #[test]
    fn clamps_offset_and_size() {
        let response = cir_response(&[(0, 0); 49]);
        let mut pozyx = Pozyx::new(
            ScriptedTransport::new()
                .expect(&[0xC8, 0xf7, 0x03, 49], &response)
                .expect(&[0xC8, 0x00, 0x00, 49], &response),
        );

        assert_eq!(pozyx.cir(2000, 60).unwrap().len(), 49);
        assert_eq!(pozyx.cir(0, 0).unwrap().len(), 49);

        pozyx.free().done();
    }

    #[test]
    fn short_response_is_a_decode_fault() {
        let response = cir_response(&[(1, 1)]);
        let mut pozyx = Pozyx::new(ScriptedTransport::new().expect(&[0xC8, 0x00, 0x00, 2], &response));

        assert_eq!(pozyx.cir(0, 2).unwrap_err().kind(), ErrorKind::Decode);

        pozyx.free().done();
    }
}
