//! Raw-code to physical-unit conversions for the RRADC channels.
//!
//! Every function is integer-only with `i64` intermediates; results fit `i32`
//! for any 10-bit code.

use crate::data_types::BattIdCurrent;
use crate::pmic::FabCoefficients;

/// 10-bit converter.
pub const ADC_BITS: u32 = 10;
pub const MAX_READINGS: i64 = 1 << ADC_BITS;
/// Converter full scale.
pub const FS_VOLTAGE_MV: i64 = 2500;

const MILLI: i64 = 1000;
const KELVINMIL_CELSIUSMIL: i64 = 273_150;
/// Battery thermistor reports 0.25 K per LSB.
const BATT_THERM_LSB_K: i64 = 4;

const TEMP_FS_VOLTAGE_NUM: i64 = 5_000_000;
const TEMP_FS_VOLTAGE_DEN: i64 = 3;
const DIE_TEMP_OFFSET_UV: i64 = 601_400;
const DIE_TEMP_SLOPE: i64 = 2;
const DIE_TEMP_OFFSET_MILLI_DEGC: i64 = 25_000;
const CHG_TEMP_OFFSET_MILLI_DEGC: i64 = 25_000;
const CHG_THRESHOLD_SCALE: i64 = 4;

const VOLT_INPUT_FACTOR: i64 = 8;
const CURR_INPUT_FACTOR: i64 = 2000;
const CURR_USBIN_INPUT_FACTOR_MIL: i64 = 1886;
const GPIO_FS_RANGE_MV: i64 = 5000;

/// Battery-ID resistance in ohms for a reading taken at `current`.
pub fn batt_id_ohms(code: u16, current: BattIdCurrent) -> i32 {
    let r_id = code as i64 * FS_VOLTAGE_MV;
    let r_id = r_id / (MAX_READINGS * current.microamps() as i64);
    (r_id * MILLI) as i32
}

/// Thermistor channels (battery, skin): millidegrees Celsius.
pub fn therm_millidegc(code: u16) -> i32 {
    let temp = code as i64 * MILLI / BATT_THERM_LSB_K;
    (temp - KELVINMIL_CELSIUSMIL) as i32
}

/// Input voltage channels: microvolts behind an 8x attenuator.
pub fn volt_uv(code: u16) -> i32 {
    let uv = code as i64 * VOLT_INPUT_FACTOR;
    let uv = uv * FS_VOLTAGE_MV * MILLI;
    (uv / MAX_READINGS) as i32
}

/// USB input current in microamps.
pub fn usbin_current_ua(code: u16) -> i32 {
    let ua = code as i64 * CURR_USBIN_INPUT_FACTOR_MIL;
    let ua = ua * FS_VOLTAGE_MV * MILLI;
    (ua / (MAX_READINGS * 10)) as i32
}

/// DC input current in microamps (0.5 V/A sense).
pub fn dcin_current_ua(code: u16) -> i32 {
    let ua = code as i64 * CURR_INPUT_FACTOR;
    let ua = ua * FS_VOLTAGE_MV * MILLI;
    (ua / (MAX_READINGS * 1000)) as i32
}

/// PMIC die temperature in millidegrees Celsius.
pub fn die_temp_millidegc(code: u16) -> i32 {
    let temp = code as i64 * TEMP_FS_VOLTAGE_NUM / (TEMP_FS_VOLTAGE_DEN * MAX_READINGS);
    let temp = (temp - DIE_TEMP_OFFSET_UV) / DIE_TEMP_SLOPE;
    (temp + DIE_TEMP_OFFSET_MILLI_DEGC) as i32
}

/// Charger temperature in millidegrees Celsius.
pub fn chg_temp_millidegc(code: u16, coeff: FabCoefficients) -> i32 {
    let uv = code as i64 * TEMP_FS_VOLTAGE_NUM / (TEMP_FS_VOLTAGE_DEN * MAX_READINGS);
    chg_uv_to_millidegc(uv, coeff)
}

/// Charger hot/too-hot thresholds; the threshold registers hold code / 4.
pub fn chg_threshold_millidegc(code: u16, coeff: FabCoefficients) -> i32 {
    let uv = code as i64 * CHG_THRESHOLD_SCALE * TEMP_FS_VOLTAGE_NUM / (TEMP_FS_VOLTAGE_DEN * MAX_READINGS);
    chg_uv_to_millidegc(uv, coeff)
}

fn chg_uv_to_millidegc(uv: i64, coeff: FabCoefficients) -> i32 {
    let temp = (coeff.offset_uv - uv) * MILLI / coeff.slope_uv_per_c;
    (temp + CHG_TEMP_OFFSET_MILLI_DEGC) as i32
}

/// Skin hot/too-hot thresholds: half-degree steps from -30 C.
pub fn skin_threshold_millidegc(code: u16) -> i32 {
    let temp = code as i64 / 2 - 30;
    (temp * MILLI) as i32
}

/// GPIO input in millivolts, 5 V full scale.
pub fn gpio_mv(code: u16) -> i32 {
    (code as i64 * GPIO_FS_RANGE_MV / MAX_READINGS) as i32
}
