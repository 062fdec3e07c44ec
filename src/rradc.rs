//! Round-robin ADC (RRADC) conversion engine.
//!
//! The RRADC samples its inputs continuously in the background. Most channels
//! only need a status check before their data registers are read; a few must be
//! kicked into a short burst of continuous conversions first, and the battery-ID
//! channel runs a dedicated measurement sequence at three reference currents.

use embedded_hal::delay::DelayNs;

use crate::channel::{Channel, ChannelDescriptor, ConversionMode, Scale};
use crate::data_types::{BattIdCurrent, BattIdDelay};
use crate::error::Error;
use crate::iio::ChanInfo;
use crate::pmic::{FabCoefficients, PmicInfo};
use crate::regmap::{Coherency, RegisterBus, Regmap};
use crate::registers::{rradc as reg, DEFAULT_RRADC_BASE};
use crate::scale;

/// Status polls before a continuous conversion is declared not ready.
pub const CONV_MAX_RETRY: usize = 5;
/// Sleep between status polls.
pub const CONV_RETRY_DELAY_MS: u32 = 50;
/// Highest battery-ID code accepted at a given reference current.
pub const BATT_ID_RANGE: u16 = 820;

/// Construction-time settings for [`Rradc`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RradcConfig {
    /// Peripheral base address.
    pub base: u16,
    /// Battery-ID settling delay in ms; only 0, 1, 4, 12, 20, 40, 60 and 80 are valid.
    pub batt_id_delay_ms: Option<u32>,
}

impl Default for RradcConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_RRADC_BASE,
            batt_id_delay_ms: None,
        }
    }
}

/// Raw result of one conversion.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Reading {
    pub code: u16,
    /// Reference current the code was measured at (battery-ID channel only).
    pub batt_id_current: Option<BattIdCurrent>,
}

/// Pick the battery-ID reading that stayed in range, preferring the highest drive current.
///
/// Returns `None` when all three readings are zero.
pub fn select_batt_id(batt_id_5: u16, batt_id_15: u16, batt_id_150: u16) -> Option<(u16, BattIdCurrent)> {
    if batt_id_5 == 0 && batt_id_15 == 0 && batt_id_150 == 0 {
        return None;
    }
    let selected = if batt_id_150 <= BATT_ID_RANGE {
        (batt_id_150, BattIdCurrent::Ua150)
    } else if batt_id_15 <= BATT_ID_RANGE {
        (batt_id_15, BattIdCurrent::Ua15)
    } else {
        (batt_id_5, BattIdCurrent::Ua5)
    };
    Some(selected)
}

/// RRADC driver. One conversion at a time; wrap in [`crate::Shared`] to share it.
pub struct Rradc<R, D> {
    regmap: Regmap<R>,
    delay: D,
    pmic: PmicInfo,
    batt_id_delay: Option<BattIdDelay>,
}

impl<R, D> Rradc<R, D> {
    pub fn pmic(&self) -> &PmicInfo {
        &self.pmic
    }

    /// Configured battery-ID settling delay, if a valid one was given.
    pub fn batt_id_delay(&self) -> Option<BattIdDelay> {
        self.batt_id_delay
    }

    /// Release the register bus and delay provider.
    pub fn free(self) -> (R, D) {
        (self.regmap.free(), self.delay)
    }
}

impl<R, D> Rradc<R, D>
where
    R: RegisterBus,
    D: DelayNs,
{
    /// Create a driver on `bus` for the PMIC described by `pmic`.
    pub fn new(bus: R, delay: D, pmic: PmicInfo, config: RradcConfig) -> Self {
        let batt_id_delay = config.batt_id_delay_ms.and_then(|ms| {
            let step = BattIdDelay::from_ms(ms);
            if step.is_none() {
                error!("invalid batt_id delay {=u32} ms, ignored", ms);
            }
            step
        });

        Self {
            regmap: Regmap::new(bus, config.base),
            delay,
            pmic,
            batt_id_delay,
        }
    }

    /// Take one raw reading of `channel`.
    pub fn convert(&mut self, channel: Channel) -> Result<Reading, Error<R::Error>> {
        let desc = channel.descriptor();

        match desc.mode {
            ConversionMode::BattId => {
                if let Err(e) = self.batt_id_sequence(desc) {
                    error!("battery ID conversion failed");
                    return Err(e);
                }
            }
            ConversionMode::Continuous => {
                if let Err(e) = self.continuous_handshake(desc) {
                    error!("error reading {=str} in continuous mode", desc.name);
                    return Err(e);
                }
            }
            ConversionMode::Threshold => {}
            ConversionMode::Polled => {
                let status = self.regmap.read(desc.status)?;
                if !is_ready(desc, status) {
                    debug!("{=str} not ready, status {=u8:#x}", desc.name, status);
                    return Err(Error::NoData);
                }
            }
        }

        let mut buf = [0u8; 6];
        let data = &mut buf[..desc.size];
        if self.regmap.coherent_read(desc.lsb, data)? == Coherency::RetriesExceeded {
            warn!("{=str} data may be inconsistent", desc.name);
        }

        if desc.mode == ConversionMode::BattId {
            let batt_id_5 = u16::from_le_bytes([buf[0], buf[1]]);
            let batt_id_15 = u16::from_le_bytes([buf[2], buf[3]]);
            let batt_id_150 = u16::from_le_bytes([buf[4], buf[5]]);
            return match select_batt_id(batt_id_5, batt_id_15, batt_id_150) {
                Some((code, current)) => Ok(Reading {
                    code,
                    batt_id_current: Some(current),
                }),
                None => {
                    error!("invalid batt_id values with all zeros");
                    Err(Error::InvalidData)
                }
            };
        }

        // Single-byte channels leave the high byte zero.
        Ok(Reading {
            code: u16::from_le_bytes([buf[0], buf[1]]),
            batt_id_current: None,
        })
    }

    /// Raw code of `channel`.
    pub fn read_raw(&mut self, channel: Channel) -> Result<i32, Error<R::Error>> {
        Ok(self.convert(channel)?.code as i32)
    }

    /// Converted value of `channel` in the channel's physical unit.
    pub fn read_processed(&mut self, channel: Channel) -> Result<i32, Error<R::Error>> {
        let reading = self.convert(channel)?;
        let value = self.scale(channel, reading)?;
        trace!("{=str} processed {=i32}", channel.name(), value);
        Ok(value)
    }

    /// IIO-style read: `address` indexes the channel table.
    pub fn read(&mut self, address: usize, info: ChanInfo) -> Result<i32, Error<R::Error>> {
        let Some(channel) = Channel::from_index(address) else {
            error!("invalid channel index {=usize}", address);
            return Err(Error::InvalidArgument);
        };
        match info {
            ChanInfo::Raw => self.read_raw(channel),
            ChanInfo::Processed => self.read_processed(channel),
        }
    }

    /// Apply the scaling of `channel` to a reading.
    pub fn scale(&self, channel: Channel, reading: Reading) -> Result<i32, Error<R::Error>> {
        let code = reading.code;
        let value = match channel.descriptor().scale {
            Scale::BattId => {
                let current = reading.batt_id_current.ok_or(Error::InvalidData)?;
                scale::batt_id_ohms(code, current)
            }
            Scale::Therm => scale::therm_millidegc(code),
            Scale::Volt => scale::volt_uv(code),
            Scale::UsbinCurrent => scale::usbin_current_ua(code),
            Scale::DcinCurrent => scale::dcin_current_ua(code),
            Scale::DieTemp => scale::die_temp_millidegc(code),
            Scale::ChgTemp => scale::chg_temp_millidegc(code, self.fab_coefficients()?),
            Scale::ChgThreshold => scale::chg_threshold_millidegc(code, self.fab_coefficients()?),
            Scale::SkinThreshold => scale::skin_threshold_millidegc(code),
            Scale::Gpio => scale::gpio_mv(code),
        };
        Ok(value)
    }

    fn fab_coefficients(&self) -> Result<FabCoefficients, Error<R::Error>> {
        FabCoefficients::for_pmic(&self.pmic).ok_or_else(|| {
            error!(
                "no charger temperature coefficients for subtype {=u8:#x}, fab {=u8:#x}",
                self.pmic.subtype.0,
                self.pmic.fab_id.unwrap_or(0xFF)
            );
            Error::InvalidArgument
        })
    }

    /// Trigger the channel, run the converter continuously until the channel
    /// reports ready, then put everything back.
    fn continuous_handshake(&mut self, desc: &ChannelDescriptor) -> Result<(), Error<R::Error>> {
        let trigger = desc.trigger.ok_or(Error::InvalidArgument)?;

        self.regmap.update_bits(trigger.reg, trigger.mask, trigger.mask)?;

        let result = self.enable_continuous().and_then(|()| self.wait_ready(desc));

        // Always leave continuous mode and drop the trigger.
        let disable = self.regmap.update_bits(reg::RR_ADC_CTL, reg::CONTINUOUS_SEL, 0);
        if disable.is_err() {
            error!("failed to switch to non-continuous mode");
        }
        let release = self.regmap.update_bits(trigger.reg, trigger.mask, 0);
        if release.is_err() {
            error!("failed to release trigger for {=str}", desc.name);
        }

        result.and(disable).and(release)
    }

    fn enable_continuous(&mut self) -> Result<(), Error<R::Error>> {
        self.regmap.update_bits(reg::ADC_LOG, reg::LOG_CLR_CTRL, reg::LOG_CLR_CTRL)?;
        self.regmap.update_bits(reg::ADC_LOG, reg::LOG_CLR_CTRL, 0)?;
        self.regmap.update_bits(reg::RR_ADC_CTL, reg::CONTINUOUS_SEL, reg::CONTINUOUS_SEL)
    }

    fn wait_ready(&mut self, desc: &ChannelDescriptor) -> Result<(), Error<R::Error>> {
        for _ in 0..CONV_MAX_RETRY {
            let status = self.regmap.read(desc.status)?;
            if is_ready(desc, status) {
                return Ok(());
            }
            self.delay.delay_ms(CONV_RETRY_DELAY_MS);
        }
        warn!("{=str} not ready after {=usize} polls", desc.name, CONV_MAX_RETRY);
        Err(Error::NoData)
    }

    fn batt_id_sequence(&mut self, desc: &ChannelDescriptor) -> Result<(), Error<R::Error>> {
        self.regmap
            .update_bits(reg::BATT_ID_CTRL, reg::BATT_ID_CHANNEL_CONV, reg::BATT_ID_CHANNEL_CONV)?;

        if let Some(delay) = self.batt_id_delay {
            let value = delay.index() << reg::BATT_ID_SETTLE_SHIFT;
            if self
                .regmap
                .update_bits(reg::BATT_ID_CFG, reg::BATT_ID_SETTLE_MASK, value)
                .is_err()
            {
                error!("batt_id settling time config failed");
            }
        }

        let result = self
            .regmap
            .update_bits(reg::BATT_ID_TRIGGER, reg::TRIGGER_CTL, reg::TRIGGER_CTL)
            .and_then(|()| {
                let conversion = self.continuous_handshake(desc);
                let release = self.regmap.update_bits(reg::BATT_ID_TRIGGER, reg::TRIGGER_CTL, 0);
                conversion.and(release)
            });

        let disable = self.regmap.update_bits(reg::BATT_ID_CTRL, reg::BATT_ID_CHANNEL_CONV, 0);
        if disable.is_err() {
            error!("disabling batt_id channel failed");
        }

        result.and(disable)
    }
}

fn is_ready(desc: &ChannelDescriptor, status: u8) -> bool {
    let mask = desc.ready_mask();
    status & mask == mask
}
