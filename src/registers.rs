//! Register maps and constants for the PMI8998 RRADC and SMB2 charger peripherals.
//! All offsets are relative to the peripheral base unless noted otherwise.

/// Default RRADC peripheral base on PMI8998.
pub const DEFAULT_RRADC_BASE: u16 = 0x4500;
/// Default SMB2 charger base (CHGR block) on PMI8998.
pub const DEFAULT_CHARGER_BASE: u16 = 0x1000;

/// Round-robin ADC register offsets.
pub mod rradc {
    #![allow(dead_code)]

    pub const SKIN_TEMP_LSB: u16 = 0x50;
    pub const SKIN_TEMP_MSB: u16 = 0x51;
    /// Global control; bit 3 selects continuous conversion.
    pub const RR_ADC_CTL: u16 = 0x52;
    /// Conversion log; bit 0 clears it.
    pub const ADC_LOG: u16 = 0x53;

    pub const BATT_ID_CTRL: u16 = 0x60;
    pub const BATT_ID_TRIGGER: u16 = 0x61;
    pub const BATT_ID_STS: u16 = 0x62;
    /// Bits 7-5: settling delay index.
    pub const BATT_ID_CFG: u16 = 0x63;
    /// Three little-endian words follow: 5 uA, 15 uA, 150 uA readings.
    pub const BATT_ID_5_LSB: u16 = 0x66;
    pub const BATT_ID_15_LSB: u16 = 0x68;
    pub const BATT_ID_150_LSB: u16 = 0x6A;

    pub const BATT_THERM_TRIGGER: u16 = 0x71;
    pub const BATT_THERM_STS: u16 = 0x72;
    pub const BATT_THERM_LSB: u16 = 0x74;

    pub const AUX_THERM_TRIGGER: u16 = 0x81;
    pub const AUX_THERM_STS: u16 = 0x82;
    pub const SKIN_HOT: u16 = 0x86;
    pub const SKIN_TOO_HOT: u16 = 0x87;

    pub const USB_IN_V_TRIGGER: u16 = 0x91;
    pub const USB_IN_V_STS: u16 = 0x92;
    pub const USB_IN_V_LSB: u16 = 0x94;
    pub const USB_IN_I_TRIGGER: u16 = 0x99;
    pub const USB_IN_I_STS: u16 = 0x9A;
    pub const USB_IN_I_LSB: u16 = 0x9C;

    pub const DC_IN_V_TRIGGER: u16 = 0xA1;
    pub const DC_IN_V_STS: u16 = 0xA2;
    pub const DC_IN_V_LSB: u16 = 0xA4;
    pub const DC_IN_I_TRIGGER: u16 = 0xA9;
    pub const DC_IN_I_STS: u16 = 0xAA;
    pub const DC_IN_I_LSB: u16 = 0xAC;

    pub const PMI_DIE_TEMP_TRIGGER: u16 = 0xB1;
    pub const PMI_DIE_TEMP_STS: u16 = 0xB2;
    pub const PMI_DIE_TEMP_LSB: u16 = 0xB4;

    pub const CHARGER_TEMP_TRIGGER: u16 = 0xB9;
    pub const CHARGER_TEMP_STS: u16 = 0xBA;
    pub const CHARGER_TEMP_LSB: u16 = 0xBC;
    pub const CHARGER_HOT: u16 = 0xBE;
    pub const CHARGER_TOO_HOT: u16 = 0xBF;

    pub const GPIO_TRIGGER: u16 = 0xC1;
    pub const GPIO_STS: u16 = 0xC2;
    pub const GPIO_LSB: u16 = 0xC4;

    /// Shift of the settling-delay field in `BATT_ID_CFG`.
    pub const BATT_ID_SETTLE_SHIFT: u8 = 5;
    pub const BATT_ID_SETTLE_MASK: u8 = 0b111 << BATT_ID_SETTLE_SHIFT;

    /// Ready bits in a channel status register.
    pub const STS_CHANNEL_READING_MASK: u8 = 0x3;
    /// The battery-ID status register only ever raises this bit.
    pub const STS_CHANNEL_STS: u8 = 0x2;

    /// Trigger bit for one-shot requests.
    pub const TRIGGER_CTL: u8 = 1 << 0;
    /// Trigger bit requesting a sample on every round-robin cycle.
    pub const TRIGGER_EVERY_CYCLE: u8 = 1 << 7;

    pub const CONTINUOUS_SEL: u8 = 1 << 3;
    pub const LOG_CLR_CTRL: u8 = 1 << 0;
    pub const BATT_ID_CHANNEL_CONV: u8 = 1 << 0;
}

/// SMB2 charger register offsets, relative to the CHGR base (0x1000 on PMI8998).
/// Offsets above 0x300 land in the USBIN/TYPEC/MISC blocks of the same PMIC.
pub mod smb2 {
    pub const BATTERY_CHARGER_STATUS_1: u16 = 0x06;
    pub const CHARGING_ENABLE_CMD: u16 = 0x42;
    pub const CHGR_CFG2: u16 = 0x51;
    pub const FLOAT_VOLTAGE_CFG: u16 = 0x70;
    pub const FG_UPDATE_CFG_2_SEL: u16 = 0x7D;
    pub const OTG_CFG: u16 = 0x153;
    pub const APSD_STATUS: u16 = 0x307;
    pub const APSD_RESULT_STATUS: u16 = 0x308;
    pub const INT_RT_STS: u16 = 0x310;
    pub const TYPE_C_STATUS_5: u16 = 0x30F;
    pub const CMD_APSD: u16 = 0x341;
    pub const TYPE_C_CFG: u16 = 0x358;
    pub const USBIN_OPTIONS_1_CFG: u16 = 0x362;
    pub const USBIN_LOAD_CFG: u16 = 0x365;
    pub const USBIN_ICL_OPTIONS: u16 = 0x366;
    pub const TYPE_C_INTRPT_ENB_SOFTWARE_CTRL: u16 = 0x368;
    pub const USBIN_CURRENT_LIMIT_CFG: u16 = 0x370;
    pub const USBIN_AICL_OPTIONS_CFG: u16 = 0x380;
    /// Settled input current limit, 25 mA per LSB.
    pub const ICL_STATUS: u16 = 0x607;
    pub const POWER_PATH_STATUS: u16 = 0x60B;
    pub const AICL_RERUN_TIME_CFG: u16 = 0x661;

    /// Low address byte of the per-peripheral secure-access unlock register.
    pub const SEC_ACCESS: u8 = 0xD0;
    pub const SEC_ACCESS_UNLOCK: u8 = 0xA5;

    pub const BATTERY_CHARGER_STATUS_MASK: u8 = 0b111;
    pub const AICL_RERUN_TIME_MASK: u8 = 0b11;
    pub const TYPEC_POWER_ROLE_CMD_MASK: u8 = 0b111;
    pub const FLOAT_VOLTAGE_SETTING_MASK: u8 = 0xFF;
    pub const APSD_RESULT_STATUS_MASK: u8 = 0x7F;
}

/// PMIC revision-ID registers, absolute addresses (first USID only).
pub mod revid {
    pub const REV2: u16 = 0x101;
    pub const REV3: u16 = 0x102;
    pub const REV4: u16 = 0x103;
    pub const TYPE: u16 = 0x104;
    pub const SUBTYPE: u16 = 0x105;
    pub const FAB_ID: u16 = 0x1F2;

    /// Value of `TYPE` on every Qualcomm PMIC.
    pub const TYPE_VALUE: u8 = 0x51;
}

/// Input current limit step (25 mA per LSB).
pub const ICL_LSB_UA: u32 = 25_000;
/// Highest input current limit the driver will program.
pub const ICL_MAX_UA: u32 = 4_800_000;

/// Float voltage: 7.5 mV per LSB above 3.4875 V.
pub const FLOAT_VOLTAGE_MIN_UV: u32 = 3_487_500;
pub const FLOAT_VOLTAGE_LSB_UV: u32 = 7_500;
pub const FLOAT_VOLTAGE_MAX_UV: u32 = FLOAT_VOLTAGE_MIN_UV + 255 * FLOAT_VOLTAGE_LSB_UV;

bitflags::bitflags! {
    /// APSD_STATUS register bits (0x307).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApsdStatus: u8 {
        const APSD_STATUS_7           = 1 << 7;
        const HVDCP_CHECK_TIMEOUT     = 1 << 6;
        const SLOW_PLUGIN_TIMEOUT     = 1 << 5;
        const ENUMERATION_DONE        = 1 << 4;
        const VADP_CHANGE_DONE_AFTER_AUTH = 1 << 3;
        const QC_AUTH_DONE_STATUS     = 1 << 2;
        const QC_CHARGER              = 1 << 1;
        /// Data-contact detection finished; the result register is valid.
        const APSD_DTC_STATUS_DONE    = 1 << 0;
    }

    /// APSD_RESULT_STATUS register bits (0x308).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApsdResult: u8 {
        const ICL_OVERRIDE_LATCH = 1 << 7;
        const QC_3P0             = 1 << 6;
        const QC_2P0             = 1 << 5;
        const FLOAT_CHARGER      = 1 << 4;
        const DCP_CHARGER        = 1 << 3;
        const CDP_CHARGER        = 1 << 2;
        const OCP_CHARGER        = 1 << 1;
        const SDP_CHARGER        = 1 << 0;
    }

    /// INT_RT_STS register bits (0x310), live interrupt status.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IntRtStatus: u8 {
        const TYPE_C_CHANGE      = 1 << 7;
        const USBIN_ICL_CHANGE   = 1 << 6;
        const USBIN_SOURCE_CHANGE = 1 << 5;
        const USBIN_PLUGIN       = 1 << 4;
        const USBIN_OV           = 1 << 3;
        const USBIN_UV           = 1 << 2;
        const USBIN_LT_3P6V      = 1 << 1;
        const USBIN_COLLAPSE     = 1 << 0;
    }

    /// TYPE_C_STATUS_5 register bits (0x30F).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeCStatus5: u8 {
        const TRY_SOURCE_FAILED      = 1 << 6;
        const TRY_SINK_FAILED        = 1 << 5;
        const TIMER_STAGE_2          = 1 << 4;
        const LEGACY_CABLE           = 1 << 3;
        const NONCOMP_LEGACY_CABLE   = 1 << 2;
        const TRYSOURCE_DETECT       = 1 << 1;
        const TRYSINK_DETECT         = 1 << 0;
    }

    /// CMD_APSD register bits (0x341).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CmdApsd: u8 {
        const ICL_OVERRIDE = 1 << 1;
        const APSD_RERUN   = 1 << 0;
    }

    /// TYPE_C_CFG register bits (0x358).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeCCfg: u8 {
        const APSD_START_ON_CC          = 1 << 7;
        const WAIT_FOR_APSD             = 1 << 6;
        const FACTORY_MODE_DETECTION_EN = 1 << 5;
        const FACTORY_MODE_ICL_3A_4A    = 1 << 4;
        const FACTORY_MODE_DIS_CHGING   = 1 << 3;
        const SUSPEND_NON_COMPLIANT     = 1 << 2;
        const VCONN_OC_CFG              = 1 << 1;
        /// Set when the port is configured as micro-USB instead of Type-C.
        const TYPE_C_OR_U_USB           = 1 << 0;
    }

    /// TYPE_C_INTRPT_ENB_SOFTWARE_CTRL register bits (0x368).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TypeCSoftwareCtrl: u8 {
        const EXIT_SNK_BASED_ON_CC      = 1 << 7;
        const VCONN_EN_ORIENTATION      = 1 << 6;
        const TYPEC_VCONN_OVERCURR_INT_EN = 1 << 5;
        const VCONN_EN_SRC              = 1 << 4;
        const VCONN_EN_VALUE            = 1 << 3;
        const UFP_EN_CMD                = 1 << 2;
        const DFP_EN_CMD                = 1 << 1;
        const TYPEC_DISABLE_CMD         = 1 << 0;
    }

    /// USBIN_OPTIONS_1_CFG register bits (0x362).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsbinOptions1: u8 {
        const CABLE_R_SEL                = 1 << 7;
        const HVDCP_AUTH_ALG_EN          = 1 << 6;
        const HVDCP_AUTONOMOUS_MODE_EN   = 1 << 5;
        const INPUT_PRIORITY             = 1 << 4;
        const AUTO_SRC_DETECT            = 1 << 3;
        const HVDCP_EN                   = 1 << 2;
        const VADP_INCREMENT_VOLTAGE_LIMIT = 1 << 1;
        const VADP_TAPER_TIMER_EN        = 1 << 0;
    }

    /// USBIN_LOAD_CFG register bits (0x365).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsbinLoadCfg: u8 {
        const USBIN_OV_CH_LOAD_OPTION = 1 << 7;
        const ICL_OVERRIDE_AFTER_APSD = 1 << 4;
    }

    /// USBIN_ICL_OPTIONS register bits (0x366).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsbinIclOptions: u8 {
        const CFG_USB3P0_SEL = 1 << 2;
        const USB51_MODE     = 1 << 1;
        const USBIN_MODE_CHG = 1 << 0;
    }

    /// USBIN_AICL_OPTIONS_CFG register bits (0x380).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct UsbinAiclOptions: u8 {
        const SUSPEND_ON_COLLAPSE_USBIN = 1 << 7;
        const USBIN_AICL_HDC_EN         = 1 << 6;
        const USBIN_AICL_START_AT_MAX   = 1 << 5;
        const USBIN_AICL_RERUN_EN       = 1 << 4;
        const USBIN_AICL_ADC_EN         = 1 << 3;
        const USBIN_AICL_EN             = 1 << 2;
        const USBIN_HV_COLLAPSE_RESPONSE = 1 << 1;
        const USBIN_LV_COLLAPSE_RESPONSE = 1 << 0;
    }

    /// OTG_CFG register bits (0x153).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct OtgCfg: u8 {
        const DIS_OTG_ON_TLIM            = 1 << 5;
        const QUICKSTART_OTG_FASTROLESWAP = 1 << 4;
        const INCREASE_DFP_TIME          = 1 << 3;
        const ENABLE_OTG_IN_DEBUG_MODE   = 1 << 2;
        const OTG_EN_SRC_CFG             = 1 << 1;
        const CONCURRENT_MODE_CFG        = 1 << 0;
    }

    /// FG_UPDATE_CFG_2_SEL register bits (0x7D).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FgUpdateCfg2: u8 {
        const SOC_LT_OTG_THRESH_SEL        = 1 << 3;
        const SOC_LT_CHG_RECHARGE_THRESH_SEL = 1 << 2;
        const VBT_LT_CHG_RECHARGE_THRESH_SEL = 1 << 1;
        const IBT_LT_CHG_TERM_THRESH_SEL   = 1 << 0;
    }

    /// CHGR_CFG2 register bits (0x51).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChgrCfg2: u8 {
        const CHG_EN_SRC              = 1 << 7;
        const CHG_EN_POLARITY         = 1 << 6;
        const PRETOFAST_TRANSITION_CFG = 1 << 5;
        const BAT_OV_ECC              = 1 << 4;
        const I_TERM                  = 1 << 3;
        const AUTO_RECHG              = 1 << 2;
        const EN_ANALOG_DROP_IN_VBATT = 1 << 1;
        const CHARGER_INHIBIT         = 1 << 0;
    }

    /// CHARGING_ENABLE_CMD register bits (0x42).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChargingEnableCmd: u8 {
        const CHARGING_ENABLE = 1 << 0;
    }

    /// POWER_PATH_STATUS register bits (0x60B).
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PowerPathStatus: u8 {
        const INPUT_SS_DONE             = 1 << 7;
        const USBIN_SUSPEND_STS         = 1 << 6;
        const DCIN_SUSPEND_STS          = 1 << 5;
        const USE_USBIN                 = 1 << 4;
        const USE_DCIN                  = 1 << 3;
        const POWER_PATH1               = 1 << 2;
        const POWER_PATH0               = 1 << 1;
        const VALID_INPUT_POWER_SOURCE  = 1 << 0;
    }
}

/// Convert an input current limit (uA) to the 25 mA register code.
/// Returns `None` above [`ICL_MAX_UA`].
pub fn icl_ua_to_code(ua: u32) -> Option<u8> {
    if ua > ICL_MAX_UA {
        return None;
    }
    Some((ua / ICL_LSB_UA) as u8)
}

/// Convert an input current limit register code to microamps.
pub fn code_to_icl_ua(code: u8) -> u32 {
    code as u32 * ICL_LSB_UA
}

/// Convert a float voltage (uV) to the FLOAT_VOLTAGE_CFG code.
/// Returns `None` outside the programmable window.
pub fn float_voltage_uv_to_code(uv: u32) -> Option<u8> {
    if !(FLOAT_VOLTAGE_MIN_UV..=FLOAT_VOLTAGE_MAX_UV).contains(&uv) {
        return None;
    }
    Some(((uv - FLOAT_VOLTAGE_MIN_UV) / FLOAT_VOLTAGE_LSB_UV) as u8)
}

/// Convert a FLOAT_VOLTAGE_CFG code to microvolts.
pub fn code_to_float_voltage_uv(code: u8) -> u32 {
    FLOAT_VOLTAGE_MIN_UV + code as u32 * FLOAT_VOLTAGE_LSB_UV
}
