//! RRADC channel table.

use crate::registers::rradc as reg;

/// Logical RRADC channels, in IIO address order.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Channel {
    BattId,
    BattTherm,
    SkinTemp,
    UsbinI,
    UsbinV,
    DcinI,
    DcinV,
    DieTemp,
    ChgTemp,
    Gpio,
    ChgHotTemp,
    ChgTooHotTemp,
    SkinHotTemp,
    SkinTooHotTemp,
}

/// IIO channel type.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChannelType {
    Resistance,
    Temp,
    Current,
    Voltage,
}

/// How a channel gets a fresh conversion before its data registers are read.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConversionMode {
    /// Battery-ID sub-block sequence followed by a three-current read.
    BattId,
    /// Trigger plus a temporary switch to continuous sampling.
    Continuous,
    /// Threshold registers; always valid.
    Threshold,
    /// Sampled by the round robin; check the status register first.
    Polled,
}

/// Raw-to-physical conversion applied to a channel.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Scale {
    /// Ohms.
    BattId,
    /// Millidegrees C.
    Therm,
    /// Microvolts.
    Volt,
    /// Microamps.
    UsbinCurrent,
    /// Microamps.
    DcinCurrent,
    /// Millidegrees C.
    DieTemp,
    /// Millidegrees C, fab dependent.
    ChgTemp,
    /// Millidegrees C, fab dependent.
    ChgThreshold,
    /// Millidegrees C.
    SkinThreshold,
    /// Millivolts.
    Gpio,
}

/// Trigger register and the bit that requests a conversion.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Trigger {
    pub reg: u16,
    pub mask: u8,
}

/// Static description of one channel.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChannelDescriptor {
    pub channel: Channel,
    pub name: &'static str,
    pub kind: ChannelType,
    /// Offset of the least significant data byte.
    pub lsb: u16,
    /// Offset of the status register.
    pub status: u16,
    /// Bytes of raw data (1, 2 or 6).
    pub size: usize,
    pub trigger: Option<Trigger>,
    pub mode: ConversionMode,
    pub scale: Scale,
}

impl ChannelDescriptor {
    /// Ready bits to wait for in the status register.
    pub fn ready_mask(&self) -> u8 {
        match self.channel {
            Channel::BattId => reg::STS_CHANNEL_STS,
            _ => reg::STS_CHANNEL_READING_MASK,
        }
    }
}

const fn trig(reg: u16, mask: u8) -> Option<Trigger> {
    Some(Trigger { reg, mask })
}

static CHANNELS: [ChannelDescriptor; Channel::COUNT] = [
    ChannelDescriptor {
        channel: Channel::BattId,
        name: "batt_id",
        kind: ChannelType::Resistance,
        lsb: reg::BATT_ID_5_LSB,
        status: reg::BATT_ID_STS,
        size: 6,
        trigger: trig(reg::BATT_ID_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::BattId,
        scale: Scale::BattId,
    },
    ChannelDescriptor {
        channel: Channel::BattTherm,
        name: "batt_therm",
        kind: ChannelType::Temp,
        lsb: reg::BATT_THERM_LSB,
        status: reg::BATT_THERM_STS,
        size: 2,
        trigger: trig(reg::BATT_THERM_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::Polled,
        scale: Scale::Therm,
    },
    ChannelDescriptor {
        channel: Channel::SkinTemp,
        name: "skin_temp",
        kind: ChannelType::Temp,
        lsb: reg::SKIN_TEMP_LSB,
        status: reg::AUX_THERM_STS,
        size: 2,
        trigger: trig(reg::AUX_THERM_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::Polled,
        scale: Scale::Therm,
    },
    ChannelDescriptor {
        channel: Channel::UsbinI,
        name: "usbin_i",
        kind: ChannelType::Current,
        lsb: reg::USB_IN_I_LSB,
        status: reg::USB_IN_I_STS,
        size: 2,
        trigger: trig(reg::USB_IN_I_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::Polled,
        scale: Scale::UsbinCurrent,
    },
    ChannelDescriptor {
        channel: Channel::UsbinV,
        name: "usbin_v",
        kind: ChannelType::Voltage,
        lsb: reg::USB_IN_V_LSB,
        status: reg::USB_IN_V_STS,
        size: 2,
        trigger: trig(reg::USB_IN_V_TRIGGER, reg::TRIGGER_EVERY_CYCLE),
        mode: ConversionMode::Continuous,
        scale: Scale::Volt,
    },
    ChannelDescriptor {
        channel: Channel::DcinI,
        name: "dcin_i",
        kind: ChannelType::Current,
        lsb: reg::DC_IN_I_LSB,
        status: reg::DC_IN_I_STS,
        size: 2,
        trigger: trig(reg::DC_IN_I_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::Polled,
        scale: Scale::DcinCurrent,
    },
    ChannelDescriptor {
        channel: Channel::DcinV,
        name: "dcin_v",
        kind: ChannelType::Voltage,
        lsb: reg::DC_IN_V_LSB,
        status: reg::DC_IN_V_STS,
        size: 2,
        trigger: trig(reg::DC_IN_V_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::Polled,
        scale: Scale::Volt,
    },
    ChannelDescriptor {
        channel: Channel::DieTemp,
        name: "die_temp",
        kind: ChannelType::Temp,
        lsb: reg::PMI_DIE_TEMP_LSB,
        status: reg::PMI_DIE_TEMP_STS,
        size: 2,
        trigger: trig(reg::PMI_DIE_TEMP_TRIGGER, reg::TRIGGER_EVERY_CYCLE),
        mode: ConversionMode::Continuous,
        scale: Scale::DieTemp,
    },
    ChannelDescriptor {
        channel: Channel::ChgTemp,
        name: "chg_temp",
        kind: ChannelType::Temp,
        lsb: reg::CHARGER_TEMP_LSB,
        status: reg::CHARGER_TEMP_STS,
        size: 2,
        trigger: trig(reg::CHARGER_TEMP_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::Polled,
        scale: Scale::ChgTemp,
    },
    ChannelDescriptor {
        channel: Channel::Gpio,
        name: "gpio",
        kind: ChannelType::Voltage,
        lsb: reg::GPIO_LSB,
        status: reg::GPIO_STS,
        size: 2,
        trigger: trig(reg::GPIO_TRIGGER, reg::TRIGGER_CTL),
        mode: ConversionMode::Polled,
        scale: Scale::Gpio,
    },
    ChannelDescriptor {
        channel: Channel::ChgHotTemp,
        name: "chg_temp_hot",
        kind: ChannelType::Temp,
        lsb: reg::CHARGER_HOT,
        status: reg::CHARGER_TEMP_STS,
        size: 1,
        trigger: None,
        mode: ConversionMode::Threshold,
        scale: Scale::ChgThreshold,
    },
    ChannelDescriptor {
        channel: Channel::ChgTooHotTemp,
        name: "chg_temp_too_hot",
        kind: ChannelType::Temp,
        lsb: reg::CHARGER_TOO_HOT,
        status: reg::CHARGER_TEMP_STS,
        size: 1,
        trigger: None,
        mode: ConversionMode::Threshold,
        scale: Scale::ChgThreshold,
    },
    ChannelDescriptor {
        channel: Channel::SkinHotTemp,
        name: "skin_temp_hot",
        kind: ChannelType::Temp,
        lsb: reg::SKIN_HOT,
        status: reg::AUX_THERM_STS,
        size: 1,
        trigger: None,
        mode: ConversionMode::Threshold,
        scale: Scale::SkinThreshold,
    },
    ChannelDescriptor {
        channel: Channel::SkinTooHotTemp,
        name: "skin_temp_too_hot",
        kind: ChannelType::Temp,
        lsb: reg::SKIN_TOO_HOT,
        status: reg::AUX_THERM_STS,
        size: 1,
        trigger: None,
        mode: ConversionMode::Threshold,
        scale: Scale::SkinThreshold,
    },
];

impl Channel {
    pub const COUNT: usize = 14;

    pub const ALL: [Channel; Channel::COUNT] = [
        Channel::BattId,
        Channel::BattTherm,
        Channel::SkinTemp,
        Channel::UsbinI,
        Channel::UsbinV,
        Channel::DcinI,
        Channel::DcinV,
        Channel::DieTemp,
        Channel::ChgTemp,
        Channel::Gpio,
        Channel::ChgHotTemp,
        Channel::ChgTooHotTemp,
        Channel::SkinHotTemp,
        Channel::SkinTooHotTemp,
    ];

    /// Channel at IIO address `index`.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Channel with datasheet name `name` (e.g. `"usbin_v"`).
    pub fn from_name(name: &str) -> Option<Self> {
        CHANNELS.iter().find(|d| d.name == name).map(|d| d.channel)
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn descriptor(self) -> &'static ChannelDescriptor {
        &CHANNELS[self.index()]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

/// The full channel table, indexed by [`Channel::index`].
pub fn descriptors() -> &'static [ChannelDescriptor] {
    &CHANNELS
}
