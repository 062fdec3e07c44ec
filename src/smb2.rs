//! SMB2 switch-mode charger: USB source detection and input current limit policy.
//!
//! The driver reads live status on demand; the only cached state is the cable
//! presence reported by the plug-in interrupt and the resolved ADC channels used
//! for input telemetry.

use embedded_hal::delay::DelayNs;

use crate::data_types::{
    BatteryInfo, ChargePhase, PowerSupplyStatus, Property, PropertyValue, UsbPresence, UsbType,
};
use crate::error::Error;
use crate::iio::ChannelSource;
use crate::regmap::{RegisterBus, Regmap};
use crate::registers::{
    code_to_float_voltage_uv, code_to_icl_ua, float_voltage_uv_to_code, icl_ua_to_code, smb2 as reg,
    ApsdResult, ApsdStatus, ChargingEnableCmd, ChgrCfg2, CmdApsd, FgUpdateCfg2, IntRtStatus, OtgCfg,
    PowerPathStatus, TypeCCfg, TypeCSoftwareCtrl, TypeCStatus5, UsbinAiclOptions, UsbinIclOptions,
    UsbinLoadCfg, UsbinOptions1, DEFAULT_CHARGER_BASE,
};

/// APSD result polls before detection is rerun.
pub const APSD_MAX_RETRY: usize = 10;
/// Sleep between APSD result polls.
pub const APSD_RETRY_DELAY_MS: u32 = 100;
/// Input current limit programmed by [`Smb2::init_hw`].
pub const INITIAL_ICL_UA: u32 = 1_950_000;

pub const MANUFACTURER: &str = "Qualcomm";
pub const MODEL_NAME: &str = "SMB2 Charger";

const USBIN_I: &str = "usbin_i";
const USBIN_V: &str = "usbin_v";

/// Construction-time settings for [`Smb2`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ChargerConfig {
    /// Peripheral base address.
    pub base: u16,
    pub battery: BatteryInfo,
}

impl Default for ChargerConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_CHARGER_BASE,
            battery: BatteryInfo::default(),
        }
    }
}

/// Receiver of "power supply changed" events.
pub trait Notifier {
    fn power_supply_changed(&mut self);
}

impl<F: FnMut()> Notifier for F {
    fn power_supply_changed(&mut self) {
        self()
    }
}

#[derive(Clone, Copy)]
enum Telemetry {
    Current,
    Voltage,
}

/// SMB2 charger driver.
///
/// `S` supplies the `usbin_i` and `usbin_v` ADC channels; pass `Option<S>` when
/// the ADC may come up later.
pub struct Smb2<R, D, S, N>
where
    R: RegisterBus,
    S: ChannelSource<R::Error>,
{
    regmap: Regmap<R>,
    delay: D,
    adc: S,
    notifier: N,
    presence: UsbPresence,
    battery: BatteryInfo,
    usbin_i: Option<S::Channel>,
    usbin_v: Option<S::Channel>,
}

impl<R, D, S, N> Smb2<R, D, S, N>
where
    R: RegisterBus,
    D: DelayNs,
    S: ChannelSource<R::Error>,
    N: Notifier,
{
    pub fn new(bus: R, delay: D, adc: S, notifier: N, config: ChargerConfig) -> Self {
        Self {
            regmap: Regmap::new(bus, config.base),
            delay,
            adc,
            notifier,
            presence: UsbPresence::Absent,
            battery: config.battery,
            usbin_i: None,
            usbin_v: None,
        }
    }

    pub fn battery(&self) -> &BatteryInfo {
        &self.battery
    }

    /// Cable presence as of the last plug-in interrupt.
    pub fn presence(&self) -> UsbPresence {
        self.presence
    }

    pub fn usb_present(&self) -> bool {
        self.presence == UsbPresence::Present
    }

    /// The ADC channel provider, e.g. to attach it once it has probed.
    pub fn adc_mut(&mut self) -> &mut S {
        &mut self.adc
    }

    /// Release the owned resources.
    pub fn free(self) -> (R, D, S, N) {
        (self.regmap.free(), self.delay, self.adc, self.notifier)
    }

    /// Bring the charger into software-controlled UFP charging.
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    pub fn init_hw(&mut self) -> Result<(), Error<R::Error>> {
        self.configure("aicl rerun time", reg::AICL_RERUN_TIME_CFG, reg::AICL_RERUN_TIME_MASK, 0)?;
        // Start AICL from the minimum, without the ADC.
        self.configure(
            "aicl options",
            reg::USBIN_AICL_OPTIONS_CFG,
            (UsbinAiclOptions::USBIN_AICL_START_AT_MAX | UsbinAiclOptions::USBIN_AICL_ADC_EN).bits(),
            0,
        )?;
        self.configure(
            "ufp role",
            reg::TYPE_C_INTRPT_ENB_SOFTWARE_CTRL,
            reg::TYPEC_POWER_ROLE_CMD_MASK,
            TypeCSoftwareCtrl::UFP_EN_CMD.bits(),
        )?;
        self.configure(
            "type-c config",
            reg::TYPE_C_CFG,
            (TypeCCfg::FACTORY_MODE_DETECTION_EN | TypeCCfg::VCONN_OC_CFG).bits(),
            0,
        )?;
        self.configure(
            "vconn software control",
            reg::TYPE_C_INTRPT_ENB_SOFTWARE_CTRL,
            (TypeCSoftwareCtrl::VCONN_EN_SRC | TypeCSoftwareCtrl::VCONN_EN_VALUE).bits(),
            TypeCSoftwareCtrl::VCONN_EN_SRC.bits(),
        )?;
        self.configure("vbus software control", reg::OTG_CFG, OtgCfg::OTG_EN_SRC_CFG.bits(), 0)?;
        self.configure(
            "recharge threshold source",
            reg::FG_UPDATE_CFG_2_SEL,
            (FgUpdateCfg2::SOC_LT_CHG_RECHARGE_THRESH_SEL | FgUpdateCfg2::VBT_LT_CHG_RECHARGE_THRESH_SEL).bits(),
            FgUpdateCfg2::VBT_LT_CHG_RECHARGE_THRESH_SEL.bits(),
        )?;
        self.configure(
            "icl override mode",
            reg::USBIN_ICL_OPTIONS,
            UsbinIclOptions::USBIN_MODE_CHG.bits(),
            UsbinIclOptions::USBIN_MODE_CHG.bits(),
        )?;
        self.set_max_current(INITIAL_ICL_UA)?;
        self.configure(
            "icl override",
            reg::CMD_APSD,
            CmdApsd::ICL_OVERRIDE.bits(),
            CmdApsd::ICL_OVERRIDE.bits(),
        )?;
        self.program_float_voltage()?;
        self.configure("aicl disable", reg::USBIN_AICL_OPTIONS_CFG, UsbinAiclOptions::USBIN_AICL_EN.bits(), 0)?;
        self.configure("hvdcp disable", reg::USBIN_OPTIONS_1_CFG, UsbinOptions1::HVDCP_EN.bits(), 0)?;
        self.configure(
            "charging enable",
            reg::CHARGING_ENABLE_CMD,
            ChargingEnableCmd::CHARGING_ENABLE.bits(),
            ChargingEnableCmd::CHARGING_ENABLE.bits(),
        )?;
        self.configure(
            "icl override after apsd",
            reg::USBIN_LOAD_CFG,
            UsbinLoadCfg::ICL_OVERRIDE_AFTER_APSD.bits(),
            UsbinLoadCfg::ICL_OVERRIDE_AFTER_APSD.bits(),
        )?;
        // Charge enable under software control, active high.
        self.configure(
            "charge enable source",
            reg::CHGR_CFG2,
            (ChgrCfg2::CHG_EN_POLARITY | ChgrCfg2::CHG_EN_SRC).bits(),
            0,
        )?;
        self.configure(
            "upstream facing port",
            reg::TYPE_C_INTRPT_ENB_SOFTWARE_CTRL,
            TypeCSoftwareCtrl::UFP_EN_CMD.bits(),
            TypeCSoftwareCtrl::UFP_EN_CMD.bits(),
        )?;

        info!("smb2 initialized");
        Ok(())
    }

    fn program_float_voltage(&mut self) -> Result<(), Error<R::Error>> {
        let uv = self.battery.voltage_max_design_uv;
        let Some(code) = float_voltage_uv_to_code(uv) else {
            error!("float voltage {=u32} uV out of range", uv);
            return Err(Error::InvalidArgument);
        };
        self.configure("float voltage", reg::FLOAT_VOLTAGE_CFG, reg::FLOAT_VOLTAGE_SETTING_MASK, code)?;

        let readback = self.read(reg::FLOAT_VOLTAGE_CFG)?;
        debug!("float voltage {=u32} uV", code_to_float_voltage_uv(readback));
        Ok(())
    }

    /// Plug-in interrupt: refresh presence from live status and publish a change.
    pub fn handle_usb_plugin(&mut self) -> Result<(), Error<R::Error>> {
        let rt_status = IntRtStatus::from_bits_retain(self.read(reg::INT_RT_STS)?);
        let typec_cfg = TypeCCfg::from_bits_retain(self.read(reg::TYPE_C_CFG)?);

        let presence = if rt_status.contains(IntRtStatus::USBIN_PLUGIN) {
            UsbPresence::Present
        } else {
            UsbPresence::Absent
        };
        if presence != self.presence {
            info!("usb {=str}", if presence == UsbPresence::Present { "attached" } else { "detached" });
        }
        if typec_cfg.contains(TypeCCfg::TYPE_C_OR_U_USB) {
            debug!("port configured for micro-usb");
        }
        self.presence = presence;

        self.notifier.power_supply_changed();
        Ok(())
    }

    /// Input power is flowing through USBIN.
    pub fn usb_online(&mut self) -> Result<bool, Error<R::Error>> {
        let status = PowerPathStatus::from_bits_retain(self.read(reg::POWER_PATH_STATUS)?);
        Ok(status.contains(PowerPathStatus::USE_USBIN | PowerPathStatus::VALID_INPUT_POWER_SOURCE))
    }

    pub fn status(&mut self) -> Result<PowerSupplyStatus, Error<R::Error>> {
        if !self.usb_online()? {
            return Ok(PowerSupplyStatus::Discharging);
        }
        let raw = self.read(reg::BATTERY_CHARGER_STATUS_1)?;
        let phase = ChargePhase::from_bits(raw & reg::BATTERY_CHARGER_STATUS_MASK);
        trace!("charge phase {=u8}", raw & reg::BATTERY_CHARGER_STATUS_MASK);
        Ok(phase.status())
    }

    /// Classify the attached source from the current APSD result.
    ///
    /// `TryAgain` while detection is still running.
    pub fn charger_type(&mut self) -> Result<UsbType, Error<R::Error>> {
        let status = ApsdStatus::from_bits_retain(self.read(reg::APSD_STATUS)?);
        if !status.contains(ApsdStatus::APSD_DTC_STATUS_DONE) {
            debug!("apsd not ready");
            return Err(Error::TryAgain);
        }

        let result = ApsdResult::from_bits_retain(self.read(reg::APSD_RESULT_STATUS)? & reg::APSD_RESULT_STATUS_MASK);
        let usb_type = if result.contains(ApsdResult::CDP_CHARGER) {
            UsbType::Cdp
        } else if result.intersects(ApsdResult::DCP_CHARGER | ApsdResult::OCP_CHARGER | ApsdResult::FLOAT_CHARGER) {
            UsbType::Dcp
        } else {
            UsbType::Sdp
        };
        Ok(usb_type)
    }

    /// [`Self::charger_type`] with retries. Reruns APSD when detection never completes.
    pub fn detect_charger_type(&mut self) -> Result<UsbType, Error<R::Error>> {
        for _ in 0..APSD_MAX_RETRY {
            if let Ok(usb_type) = self.charger_type() {
                return Ok(usb_type);
            }
            self.delay.delay_ms(APSD_RETRY_DELAY_MS);
        }

        error!("failed to read apsd, rerunning detection");
        self.rerun_apsd();
        Err(Error::TryAgain)
    }

    fn rerun_apsd(&mut self) {
        let rerun = CmdApsd::APSD_RERUN.bits();
        if self.update_bits(reg::CMD_APSD, rerun, rerun).is_err() {
            error!("couldn't rerun apsd");
        }
    }

    /// Input current limit the hardware settled on, in uA.
    pub fn current_limit(&mut self) -> Result<u32, Error<R::Error>> {
        Ok(code_to_icl_ua(self.read(reg::ICL_STATUS)?))
    }

    /// Input current the attached source can deliver, in uA.
    pub fn max_current(&mut self) -> Result<u32, Error<R::Error>> {
        if !self.usb_online()? {
            return self.current_limit();
        }

        let usb_type = self.detect_charger_type()?;

        let typec = TypeCStatus5::from_bits_retain(self.read(reg::TYPE_C_STATUS_5)?);
        if typec.contains(TypeCStatus5::NONCOMP_LEGACY_CABLE) {
            info!("charger is non-compliant");
        }

        let settled = self.current_limit()?;
        Ok(usb_type.nominal_current_ua().max(settled))
    }

    /// Program the USB input current limit in 25 mA steps.
    pub fn set_max_current(&mut self, ua: u32) -> Result<(), Error<R::Error>> {
        let Some(code) = icl_ua_to_code(ua) else {
            error!("can't set current limit above 4800000 uA: {=u32}", ua);
            return Err(Error::InvalidArgument);
        };
        self.write(reg::USBIN_CURRENT_LIMIT_CFG, code)
    }

    /// Re-evaluate [`Self::max_current`] and program it.
    pub fn refresh_current_limit(&mut self) -> Result<u32, Error<R::Error>> {
        let ua = self.max_current()?;
        if let Err(e) = self.set_max_current(ua) {
            error!("failed to write max current {=u32}", ua);
            return Err(e);
        }
        Ok(ua)
    }

    /// USB input current in uA; zero unless charging.
    pub fn current_now(&mut self) -> Result<i32, Error<R::Error>> {
        self.read_telemetry(Telemetry::Current)
    }

    /// USB input voltage in uV; zero unless charging.
    pub fn voltage_now(&mut self) -> Result<i32, Error<R::Error>> {
        self.read_telemetry(Telemetry::Voltage)
    }

    fn read_telemetry(&mut self, which: Telemetry) -> Result<i32, Error<R::Error>> {
        match self.status() {
            Ok(PowerSupplyStatus::Charging) => {}
            _ => return Ok(0),
        }

        let (cached, name) = match which {
            Telemetry::Current => (self.usbin_i, USBIN_I),
            Telemetry::Voltage => (self.usbin_v, USBIN_V),
        };
        let channel = match cached {
            Some(channel) => channel,
            None => {
                let channel = self.adc.lookup(name).map_err(|e| {
                    if matches!(e, Error::Deferred) {
                        debug!("{=str} not available yet", name);
                    } else {
                        error!("failed to get {=str}", name);
                    }
                    e
                })?;
                match which {
                    Telemetry::Current => self.usbin_i = Some(channel),
                    Telemetry::Voltage => self.usbin_v = Some(channel),
                }
                channel
            }
        };

        self.adc.read_processed(channel)
    }

    pub fn get_property(&mut self, property: Property) -> Result<PropertyValue, Error<R::Error>> {
        let value = match property {
            Property::Manufacturer => PropertyValue::Text(MANUFACTURER),
            Property::ModelName => PropertyValue::Text(MODEL_NAME),
            Property::CurrentMax => PropertyValue::Int(self.max_current()? as i32),
            Property::CurrentNow => PropertyValue::Int(self.current_now()?),
            Property::VoltageNow => PropertyValue::Int(self.voltage_now()?),
            Property::Online => PropertyValue::Bool(self.usb_online()?),
            Property::Status => PropertyValue::Status(self.status()?),
            Property::UsbType => PropertyValue::UsbType(self.charger_type()?),
        };
        Ok(value)
    }

    pub fn set_property(&mut self, property: Property, value: PropertyValue) -> Result<(), Error<R::Error>> {
        match (property, value) {
            (Property::CurrentMax, PropertyValue::Int(ua)) => {
                let ua = u32::try_from(ua).map_err(|_| Error::InvalidArgument)?;
                self.set_max_current(ua)
            }
            _ => {
                error!("no setter for property");
                Err(Error::InvalidArgument)
            }
        }
    }

    pub fn property_is_writeable(&self, property: Property) -> bool {
        property.is_writeable()
    }

    fn configure(&mut self, what: &'static str, offset: u16, mask: u8, value: u8) -> Result<(), Error<R::Error>> {
        self.update_bits(offset, mask, value).map_err(|e| {
            error!("couldn't configure {=str}", what);
            e
        })
    }

    fn checked_address(&self, offset: u16) -> Result<u16, Error<R::Error>> {
        let addr = self.regmap.absolute(offset)?;
        check_peripheral(addr)?;
        Ok(addr)
    }

    fn unlock(&mut self, addr: u16) -> Result<(), Error<R::Error>> {
        if let Some(sec) = sec_access_address(addr) {
            self.regmap
                .bus_mut()
                .write(sec, reg::SEC_ACCESS_UNLOCK)
                .map_err(Error::Bus)?;
        }
        Ok(())
    }

    fn read(&mut self, offset: u16) -> Result<u8, Error<R::Error>> {
        self.checked_address(offset)?;
        self.regmap.read(offset)
    }

    fn write(&mut self, offset: u16, value: u8) -> Result<(), Error<R::Error>> {
        let addr = self.checked_address(offset)?;
        self.unlock(addr)?;
        self.regmap.write(offset, value)
    }

    fn update_bits(&mut self, offset: u16, mask: u8, value: u8) -> Result<(), Error<R::Error>> {
        let addr = self.checked_address(offset)?;
        self.unlock(addr)?;
        self.regmap.update_bits(offset, mask, value)
    }
}

/// Charger registers always live above the first peripheral page.
fn check_peripheral<E>(addr: u16) -> Result<(), Error<E>> {
    if addr & 0xFF00 == 0 {
        return Err(Error::InvalidArgument);
    }
    Ok(())
}

/// Unlock register to write before touching a protected register at `addr`.
fn sec_access_address(addr: u16) -> Option<u16> {
    let [_, low] = addr.to_be_bytes();
    (low > reg::SEC_ACCESS).then_some((addr & 0xFF00) | reg::SEC_ACCESS as u16)
}
