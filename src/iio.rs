//! IIO-facing view of the ADC: channel specs and consumer lookup.

use bitflags::bitflags;
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;

use crate::channel::{descriptors, Channel, ChannelType};
use crate::error::Error;
use crate::regmap::RegisterBus;
use crate::rradc::Rradc;
use crate::shared::Shared;

/// Which value an IIO read asks for.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChanInfo {
    Raw,
    Processed,
}

bitflags! {
    /// Values a channel supports.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InfoMask: u8 {
        const RAW = 1 << 0;
        const PROCESSED = 1 << 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InfoMask {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "InfoMask({=u8:#x})", self.bits())
    }
}

impl InfoMask {
    pub fn supports(self, info: ChanInfo) -> bool {
        match info {
            ChanInfo::Raw => self.contains(InfoMask::RAW),
            ChanInfo::Processed => self.contains(InfoMask::PROCESSED),
        }
    }
}

/// Channel as advertised to IIO consumers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChannelSpec {
    pub datasheet_name: &'static str,
    pub kind: ChannelType,
    pub address: usize,
    pub info_mask: InfoMask,
}

/// Iterate over the advertised channels in address order.
pub fn channel_specs() -> impl Iterator<Item = ChannelSpec> {
    descriptors().iter().map(|d| ChannelSpec {
        datasheet_name: d.name,
        kind: d.kind,
        address: d.channel.index(),
        info_mask: InfoMask::RAW | InfoMask::PROCESSED,
    })
}

/// Provider of named ADC channels to a consumer driver.
pub trait ChannelSource<E> {
    type Channel: Copy;

    /// Resolve a channel by datasheet name.
    ///
    /// `Deferred` means the provider is not up yet; `NoDevice` means it has no such channel.
    fn lookup(&mut self, name: &str) -> Result<Self::Channel, Error<E>>;

    /// Converted value of a resolved channel.
    fn read_processed(&mut self, channel: Self::Channel) -> Result<i32, Error<E>>;
}

fn lookup_channel<E>(name: &str) -> Result<Channel, Error<E>> {
    Channel::from_name(name).ok_or_else(|| {
        warn!("no ADC channel named {=str}", name);
        Error::NoDevice
    })
}

impl<R, D> ChannelSource<R::Error> for Rradc<R, D>
where
    R: RegisterBus,
    D: DelayNs,
{
    type Channel = Channel;

    fn lookup(&mut self, name: &str) -> Result<Channel, Error<R::Error>> {
        lookup_channel(name)
    }

    fn read_processed(&mut self, channel: Channel) -> Result<i32, Error<R::Error>> {
        Rradc::read_processed(self, channel)
    }
}

impl<M, R, D> ChannelSource<R::Error> for &Shared<M, Rradc<R, D>>
where
    M: RawMutex,
    R: RegisterBus,
    D: DelayNs,
{
    type Channel = Channel;

    fn lookup(&mut self, name: &str) -> Result<Channel, Error<R::Error>> {
        lookup_channel(name)
    }

    fn read_processed(&mut self, channel: Channel) -> Result<i32, Error<R::Error>> {
        self.lock(|adc| adc.read_processed(channel))
    }
}

/// A provider that has not been registered yet defers every lookup.
impl<E, S> ChannelSource<E> for Option<S>
where
    S: ChannelSource<E>,
{
    type Channel = S::Channel;

    fn lookup(&mut self, name: &str) -> Result<S::Channel, Error<E>> {
        match self {
            Some(source) => source.lookup(name),
            None => Err(Error::Deferred),
        }
    }

    fn read_processed(&mut self, channel: S::Channel) -> Result<i32, Error<E>> {
        match self {
            Some(source) => source.read_processed(channel),
            None => Err(Error::Deferred),
        }
    }
}
