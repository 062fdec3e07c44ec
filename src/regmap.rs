//! Register access over a 16-bit address, 8-bit value bus (SPMI-style regmap).

use crate::error::Error;

/// Longest span accepted by [`Regmap::coherent_read`].
pub const MAX_COHERENT_LEN: usize = 16;
/// Read pairs attempted before a coherent read gives up and returns what it has.
pub const COHERENT_CHECK_RETRY: usize = 5;

/// Synchronous register bus. Errors are passed through untouched; no layer
/// above retries plain reads or writes.
pub trait RegisterBus {
    type Error;

    /// Read a single register.
    fn read(&mut self, reg: u16) -> Result<u8, Self::Error>;

    /// Write a single register.
    fn write(&mut self, reg: u16, value: u8) -> Result<(), Self::Error>;

    /// Read consecutive registers starting at `reg`.
    fn bulk_read(&mut self, reg: u16, data: &mut [u8]) -> Result<(), Self::Error>;

    /// Update masked bits in a register (read-modify-write).
    fn update_bits(&mut self, reg: u16, mask: u8, value: u8) -> Result<(), Self::Error> {
        let cur = self.read(reg)?;
        let new = (cur & !mask) | (value & mask);
        self.write(reg, new)
    }
}

impl<T: RegisterBus + ?Sized> RegisterBus for &mut T {
    type Error = T::Error;

    fn read(&mut self, reg: u16) -> Result<u8, Self::Error> {
        T::read(self, reg)
    }

    fn write(&mut self, reg: u16, value: u8) -> Result<(), Self::Error> {
        T::write(self, reg, value)
    }

    fn bulk_read(&mut self, reg: u16, data: &mut [u8]) -> Result<(), Self::Error> {
        T::bulk_read(self, reg, data)
    }

    fn update_bits(&mut self, reg: u16, mask: u8, value: u8) -> Result<(), Self::Error> {
        T::update_bits(self, reg, mask, value)
    }
}

/// I2C transport for the register bus: big-endian 16-bit register address
/// followed by data, one value byte per register.
pub struct I2cBus<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cBus<I2C> {
    /// Create a bus talking to the 7-bit device `address`.
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Return the 7-bit I2C address configured for this instance.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the underlying I2C peripheral.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

impl<I2C> RegisterBus for I2cBus<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    type Error = I2C::Error;

    fn read(&mut self, reg: u16) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.i2c.write_read(self.address, &reg.to_be_bytes(), &mut buf)?;
        Ok(buf[0])
    }

    fn write(&mut self, reg: u16, value: u8) -> Result<(), Self::Error> {
        let [hi, lo] = reg.to_be_bytes();
        self.i2c.write(self.address, &[hi, lo, value])
    }

    fn bulk_read(&mut self, reg: u16, data: &mut [u8]) -> Result<(), Self::Error> {
        self.i2c.write_read(self.address, &reg.to_be_bytes(), data)
    }
}

/// Outcome of a coherent read. Both variants carry valid (last-read) data.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coherency {
    /// Two back-to-back reads agreed.
    Coherent,
    /// Every read pair disagreed; the data is the last read and may be torn.
    RetriesExceeded,
}

/// Base-relative view of a [`RegisterBus`], one per peripheral block.
pub struct Regmap<B> {
    bus: B,
    base: u16,
}

impl<B> Regmap<B> {
    pub fn new(bus: B, base: u16) -> Self {
        Self { bus, base }
    }

    /// Peripheral base address.
    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn free(self) -> B {
        self.bus
    }
}

impl<B: RegisterBus> Regmap<B> {
    /// Absolute address of `offset`; offsets that run past the 16-bit space are rejected.
    pub fn absolute(&self, offset: u16) -> Result<u16, Error<B::Error>> {
        self.base.checked_add(offset).ok_or(Error::InvalidArgument)
    }

    pub fn read(&mut self, offset: u16) -> Result<u8, Error<B::Error>> {
        let reg = self.absolute(offset)?;
        self.bus.read(reg).map_err(Error::Bus)
    }

    pub fn write(&mut self, offset: u16, value: u8) -> Result<(), Error<B::Error>> {
        let reg = self.absolute(offset)?;
        self.bus.write(reg, value).map_err(Error::Bus)
    }

    pub fn update_bits(&mut self, offset: u16, mask: u8, value: u8) -> Result<(), Error<B::Error>> {
        let reg = self.absolute(offset)?;
        self.bus.update_bits(reg, mask, value).map_err(|e| {
            error!("register update failed: addr={=u16:#x}", reg);
            Error::Bus(e)
        })
    }

    pub fn bulk_read(&mut self, offset: u16, data: &mut [u8]) -> Result<(), Error<B::Error>> {
        let reg = self.absolute(offset)?;
        self.bus.bulk_read(reg, data).map_err(Error::Bus)
    }

    /// Read `data.len()` registers, re-reading until two consecutive reads agree.
    ///
    /// After [`COHERENT_CHECK_RETRY`] disagreeing pairs the most recent read is left
    /// in `data` and [`Coherency::RetriesExceeded`] is returned instead of an error.
    pub fn coherent_read(&mut self, offset: u16, data: &mut [u8]) -> Result<Coherency, Error<B::Error>> {
        let len = data.len();
        if len > MAX_COHERENT_LEN {
            error!("coherent read of {=usize} bytes exceeds buffer", len);
            return Err(Error::InvalidArgument);
        }

        let mut check = [0u8; MAX_COHERENT_LEN];
        for retry in 0..COHERENT_CHECK_RETRY {
            self.bulk_read(offset, data)?;
            self.bulk_read(offset, &mut check[..len])?;
            if data[..] == check[..len] {
                return Ok(Coherency::Coherent);
            }
            debug!("coherent read mismatch at {=u16:#x}, retry {=usize}", offset, retry + 1);
        }

        data.copy_from_slice(&check[..len]);
        error!("retry exceeded for coherency check at {=u16:#x}", offset);
        Ok(Coherency::RetriesExceeded)
    }
}
