//! Data types shared by the ADC and charger drivers.

/// USB charging port type reported by APSD.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UsbType {
    /// Standard downstream port (PC), 500 mA.
    Sdp,
    /// Charging downstream port (PC with high-current mode), 1.5 A.
    Cdp,
    /// Dedicated charging port (wall adapter), 1.5 A.
    Dcp,
}

impl UsbType {
    /// Nominal input current ceiling for this port type.
    pub fn nominal_current_ua(self) -> u32 {
        match self {
            UsbType::Sdp => 500_000,
            UsbType::Cdp => 1_500_000,
            UsbType::Dcp => 1_500_000,
        }
    }
}

/// Cable presence as last reported by the plug-in interrupt.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UsbPresence {
    #[default]
    Absent,
    Present,
}

/// Power-supply class status.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PowerSupplyStatus {
    Unknown,
    Charging,
    Discharging,
    NotCharging,
}

/// Charger state machine phase (BATTERY_CHARGER_STATUS_1[2:0]).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ChargePhase {
    Trickle,
    PreCharge,
    FastCharge,
    FullOn,
    Taper,
    Terminate,
    Inhibit,
    Disabled,
}

impl ChargePhase {
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => ChargePhase::Trickle,
            1 => ChargePhase::PreCharge,
            2 => ChargePhase::FastCharge,
            3 => ChargePhase::FullOn,
            4 => ChargePhase::Taper,
            5 => ChargePhase::Terminate,
            6 => ChargePhase::Inhibit,
            _ => ChargePhase::Disabled,
        }
    }

    /// Power-supply status reported while input power is present.
    pub fn status(self) -> PowerSupplyStatus {
        match self {
            ChargePhase::Disabled => PowerSupplyStatus::NotCharging,
            _ => PowerSupplyStatus::Charging,
        }
    }
}

/// Static battery description from platform firmware.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BatteryInfo {
    /// Maximum design voltage, programmed as the float voltage.
    pub voltage_max_design_uv: u32,
}

impl Default for BatteryInfo {
    fn default() -> Self {
        Self {
            voltage_max_design_uv: 4_400_000,
        }
    }
}

/// Battery-ID reference drive current.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BattIdCurrent {
    Ua5,
    Ua15,
    Ua150,
}

impl BattIdCurrent {
    pub fn microamps(self) -> u32 {
        match self {
            BattIdCurrent::Ua5 => 5,
            BattIdCurrent::Ua15 => 15,
            BattIdCurrent::Ua150 => 150,
        }
    }
}

/// Battery-ID settling delay steps (BATT_ID_CFG[7:5]).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BattIdDelay {
    Ms0,
    Ms1,
    Ms4,
    Ms12,
    Ms20,
    Ms40,
    Ms60,
    Ms80,
}

impl BattIdDelay {
    pub const ALL: [BattIdDelay; 8] = [
        BattIdDelay::Ms0,
        BattIdDelay::Ms1,
        BattIdDelay::Ms4,
        BattIdDelay::Ms12,
        BattIdDelay::Ms20,
        BattIdDelay::Ms40,
        BattIdDelay::Ms60,
        BattIdDelay::Ms80,
    ];

    /// Match a configured delay in milliseconds. Only the exact hardware steps are accepted.
    pub fn from_ms(ms: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.millis() == ms)
    }

    pub fn millis(self) -> u32 {
        match self {
            BattIdDelay::Ms0 => 0,
            BattIdDelay::Ms1 => 1,
            BattIdDelay::Ms4 => 4,
            BattIdDelay::Ms12 => 12,
            BattIdDelay::Ms20 => 20,
            BattIdDelay::Ms40 => 40,
            BattIdDelay::Ms60 => 60,
            BattIdDelay::Ms80 => 80,
        }
    }

    /// Field index written to BATT_ID_CFG[7:5].
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Properties exposed to the power-supply class.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Property {
    Manufacturer,
    ModelName,
    CurrentMax,
    CurrentNow,
    VoltageNow,
    Status,
    Online,
    UsbType,
}

impl Property {
    pub const ALL: [Property; 8] = [
        Property::Manufacturer,
        Property::ModelName,
        Property::CurrentMax,
        Property::CurrentNow,
        Property::VoltageNow,
        Property::Status,
        Property::Online,
        Property::UsbType,
    ];

    /// Only the input current limit may be written.
    pub fn is_writeable(self) -> bool {
        matches!(self, Property::CurrentMax)
    }
}

/// Value carried by a power-supply property.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PropertyValue {
    Int(i32),
    Text(&'static str),
    Bool(bool),
    Status(PowerSupplyStatus),
    UsbType(UsbType),
}
