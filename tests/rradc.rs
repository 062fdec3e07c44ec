mod common;

use common::{BusFault, FakeBus, FakeDelay, Op};
use qcom_pmic_charger::channel::ChannelType;
use qcom_pmic_charger::data_types::{BattIdCurrent, BattIdDelay};
use qcom_pmic_charger::iio::{channel_specs, ChanInfo, InfoMask};
use qcom_pmic_charger::pmic::fab_id;
use qcom_pmic_charger::{Channel, ChannelSource, Error, PmicInfo, Reading, Rradc, RradcConfig, Subtype};

const BATT_ID_CTRL: u16 = 0x4560;
const BATT_ID_TRIGGER: u16 = 0x4561;
const BATT_ID_STS: u16 = 0x4562;
const BATT_ID_CFG: u16 = 0x4563;
const BATT_ID_DATA: u16 = 0x4566;
const RR_ADC_CTL: u16 = 0x4552;
const ADC_LOG: u16 = 0x4553;
const USB_IN_V_TRIGGER: u16 = 0x4591;
const USB_IN_V_STS: u16 = 0x4592;
const USB_IN_V_LSB: u16 = 0x4594;

fn pmi8998() -> PmicInfo {
    PmicInfo::new(Subtype::PMI8998, Some(fab_id::PMI8998_GF))
}

fn adc(bus: &FakeBus, delay: &FakeDelay) -> Rradc<FakeBus, FakeDelay> {
    Rradc::new(bus.clone(), delay.clone(), pmi8998(), RradcConfig::default())
}

fn set_word(bus: &FakeBus, addr: u16, value: u16) {
    let [lo, hi] = value.to_le_bytes();
    bus.set(addr, lo);
    bus.set(addr + 1, hi);
}

fn set_batt_id(bus: &FakeBus, ua5: u16, ua15: u16, ua150: u16) {
    set_word(bus, BATT_ID_DATA, ua5);
    set_word(bus, BATT_ID_DATA + 2, ua15);
    set_word(bus, BATT_ID_DATA + 4, ua150);
}

#[test]
fn polled_channel_reads_when_ready() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(0x4572, 0x03);
    set_word(&bus, 0x4574, 1093);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.read_raw(Channel::BattTherm), Ok(1093));
    assert_eq!(adc.read_processed(Channel::BattTherm), Ok(100));
    assert!(bus.writes().is_empty());
}

#[test]
fn polled_channel_not_ready_is_no_data() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(0x4572, 0x01);
    let mut adc = adc(&bus, &delay);

    let err = adc.convert(Channel::BattTherm).unwrap_err();
    assert_eq!(err, Error::NoData);
    assert!(err.is_transient());
    assert_eq!(bus.reads_of(0x4574), 0);
    assert_eq!(delay.total_ms(), 0);
}

#[test]
fn threshold_channel_skips_status() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(0x4586, 110);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.read_processed(Channel::SkinHotTemp), Ok(25_000));
    assert_eq!(bus.log(), vec![Op::Read(0x4586), Op::Read(0x4586)]);
}

#[test]
fn continuous_channel_runs_full_handshake() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(USB_IN_V_STS, 0x03);
    set_word(&bus, USB_IN_V_LSB, 512);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.read_processed(Channel::UsbinV), Ok(10_000_000));
    assert_eq!(
        bus.writes(),
        vec![
            (USB_IN_V_TRIGGER, 0x80),
            (ADC_LOG, 0x01),
            (ADC_LOG, 0x00),
            (RR_ADC_CTL, 0x08),
            (RR_ADC_CTL, 0x00),
            (USB_IN_V_TRIGGER, 0x00),
        ]
    );
    assert_eq!(delay.total_ms(), 0);
}

#[test]
fn continuous_channel_waits_between_polls() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.script(USB_IN_V_STS, &[0x00, 0x01, 0x03]);
    let mut adc = adc(&bus, &delay);

    assert!(adc.convert(Channel::UsbinV).is_ok());
    assert_eq!(bus.reads_of(USB_IN_V_STS), 3);
    assert_eq!(delay.total_ms(), 100);
}

#[test]
fn continuous_timeout_restores_mode_and_trigger() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(USB_IN_V_STS, 0x01);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.convert(Channel::UsbinV), Err(Error::NoData));
    assert_eq!(bus.reads_of(USB_IN_V_STS), 5);
    assert_eq!(delay.total_ms(), 250);
    assert_eq!(bus.reads_of(USB_IN_V_LSB), 0);
    assert_eq!(bus.get(RR_ADC_CTL), 0x00);
    assert_eq!(bus.get(USB_IN_V_TRIGGER), 0x00);
    assert_eq!(
        bus.writes().last().copied(),
        Some((USB_IN_V_TRIGGER, 0x00))
    );
}

#[test]
fn mode_select_failure_still_cleans_up() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(USB_IN_V_STS, 0x03);
    bus.fail_writes(ADC_LOG);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.convert(Channel::DieTemp).map(|_| ()), Err(Error::Bus(BusFault)));
    assert_eq!(bus.writes_to(RR_ADC_CTL), vec![0x00]);
    assert_eq!(bus.writes_to(0x45B1), vec![0x80, 0x00]);
}

#[test]
fn batt_id_selects_in_range_reading() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(BATT_ID_STS, 0x02);
    set_batt_id(&bus, 900, 700, 800);
    let mut adc = adc(&bus, &delay);

    assert_eq!(
        adc.convert(Channel::BattId),
        Ok(Reading {
            code: 800,
            batt_id_current: Some(BattIdCurrent::Ua150),
        })
    );
    assert_eq!(adc.read_processed(Channel::BattId), Ok(13_000));

    assert_eq!(bus.writes_to(BATT_ID_CTRL), vec![0x01, 0x00, 0x01, 0x00]);
    assert_eq!(bus.writes_to(BATT_ID_TRIGGER), vec![0x01, 0x01, 0x00, 0x00, 0x01, 0x01, 0x00, 0x00]);
    assert!(bus.writes_to(BATT_ID_CFG).is_empty());
}

#[test]
fn batt_id_falls_back_to_lower_currents() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(BATT_ID_STS, 0x02);
    set_batt_id(&bus, 600, 1000, 1000);
    let mut adc = adc(&bus, &delay);

    let reading = adc.convert(Channel::BattId).unwrap();
    assert_eq!(reading.code, 600);
    assert_eq!(reading.batt_id_current, Some(BattIdCurrent::Ua5));
    assert_eq!(adc.scale(Channel::BattId, reading), Ok(292_000));
}

#[test]
fn batt_id_all_zero_is_invalid() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(BATT_ID_STS, 0x02);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.convert(Channel::BattId), Err(Error::InvalidData));
    // The sub-block is switched off before the data is judged.
    assert_eq!(bus.get(BATT_ID_CTRL), 0x00);
}

#[test]
fn batt_id_handshake_failure_skips_data_read() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    // The generic reading bits are not enough for the battery-ID channel.
    bus.set(BATT_ID_STS, 0x01);
    set_batt_id(&bus, 100, 100, 100);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.convert(Channel::BattId), Err(Error::NoData));
    assert_eq!(bus.writes_to(BATT_ID_CTRL), vec![0x01, 0x00]);
    assert_eq!(bus.get(BATT_ID_TRIGGER), 0x00);
    assert_eq!(bus.reads_of(BATT_ID_DATA), 0);
}

#[test]
fn batt_id_delay_programs_settle_field() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(BATT_ID_STS, 0x02);
    bus.set(BATT_ID_CFG, 0x1F);
    set_batt_id(&bus, 0, 0, 10);
    let config = RradcConfig {
        batt_id_delay_ms: Some(20),
        ..RradcConfig::default()
    };
    let mut adc = Rradc::new(bus.clone(), delay.clone(), pmi8998(), config);
    assert_eq!(adc.batt_id_delay(), Some(BattIdDelay::Ms20));

    adc.convert(Channel::BattId).unwrap();
    assert_eq!(bus.writes_to(BATT_ID_CFG), vec![0x9F]);
}

#[test]
fn unsupported_batt_id_delay_is_ignored() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(BATT_ID_STS, 0x02);
    set_batt_id(&bus, 0, 0, 10);
    let config = RradcConfig {
        batt_id_delay_ms: Some(25),
        ..RradcConfig::default()
    };
    let mut adc = Rradc::new(bus.clone(), delay.clone(), pmi8998(), config);
    assert_eq!(adc.batt_id_delay(), None);

    adc.convert(Channel::BattId).unwrap();
    assert!(bus.writes_to(BATT_ID_CFG).is_empty());
}

#[test]
fn degraded_coherent_read_still_returns_data() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(0x45C2, 0x03);
    bus.script(0x45C4, &[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.read_raw(Channel::Gpio), Ok(10));
}

#[test]
fn read_dispatches_by_address() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(0x45C2, 0x03);
    set_word(&bus, 0x45C4, 512);
    let mut adc = adc(&bus, &delay);

    assert_eq!(adc.read(Channel::Gpio.index(), ChanInfo::Raw), Ok(512));
    assert_eq!(adc.read(Channel::Gpio.index(), ChanInfo::Processed), Ok(2_500));

    bus.clear_log();
    assert_eq!(adc.read(Channel::COUNT, ChanInfo::Raw), Err(Error::InvalidArgument));
    assert!(bus.log().is_empty());
}

#[test]
fn charger_temperature_needs_fab_coefficients() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    bus.set(0x45BA, 0x03);
    set_word(&bus, 0x45BC, 800);
    let mut adc = Rradc::new(
        bus.clone(),
        delay.clone(),
        PmicInfo::new(Subtype::PMI8998, Some(0x07)),
        RradcConfig::default(),
    );

    assert_eq!(adc.read_raw(Channel::ChgTemp), Ok(800));
    assert_eq!(adc.read_processed(Channel::ChgTemp), Err(Error::InvalidArgument));

    let mut adc = Rradc::new(bus.clone(), delay.clone(), pmi8998(), RradcConfig::default());
    assert_eq!(adc.read_processed(Channel::ChgTemp), Ok(25_286));
}

#[test]
fn channels_resolve_by_datasheet_name() {
    let bus = FakeBus::new();
    let delay = FakeDelay::new();
    let mut adc = adc(&bus, &delay);

    assert_eq!(ChannelSource::lookup(&mut adc, "usbin_v"), Ok(Channel::UsbinV));
    assert_eq!(ChannelSource::lookup(&mut adc, "usbin_i"), Ok(Channel::UsbinI));
    assert_eq!(ChannelSource::lookup(&mut adc, "vbat"), Err(Error::NoDevice));
    assert!(bus.log().is_empty());
}

#[test]
fn channel_table_is_dense_and_unique() {
    let specs: Vec<_> = channel_specs().collect();
    assert_eq!(specs.len(), Channel::COUNT);
    for (i, spec) in specs.iter().enumerate() {
        assert_eq!(spec.address, i);
        assert_eq!(Channel::from_index(i).map(Channel::name), Some(spec.datasheet_name));
        assert_eq!(Channel::from_name(spec.datasheet_name), Channel::from_index(i));
        assert!(spec.info_mask.supports(ChanInfo::Raw));
        assert!(spec.info_mask.contains(InfoMask::PROCESSED));
    }
    assert_eq!(specs[0].datasheet_name, "batt_id");
    assert_eq!(specs[0].kind, ChannelType::Resistance);
    assert_eq!(specs[Channel::UsbinI.index()].kind, ChannelType::Current);
}

#[test]
fn pmic_revision_is_loaded() {
    let mut bus = FakeBus::new();
    bus.set(0x104, 0x51);
    bus.set(0x105, 0x15);
    bus.set(0x101, 0x00);
    bus.set(0x102, 0x01);
    bus.set(0x103, 0x02);
    bus.set(0x1F2, fab_id::PMI8998_SMIC);

    let info = PmicInfo::load(&mut bus).unwrap();
    assert_eq!(info.subtype, Subtype::PMI8998);
    assert_eq!(info.subtype.name(), Some("pmi8998"));
    assert_eq!((info.major, info.minor), (2, 1));
    assert_eq!(info.fab_id, Some(fab_id::PMI8998_SMIC));
}

#[test]
fn early_pm8941_revision_is_bumped() {
    let mut bus = FakeBus::new();
    bus.set(0x104, 0x51);
    bus.set(0x105, 0x01);
    bus.set(0x103, 0x01);
    bus.set(0x1F2, 0x30);

    let info = PmicInfo::load(&mut bus).unwrap();
    assert_eq!(info.subtype, Subtype::PM8941);
    assert_eq!(info.major, 2);
    assert_eq!(info.fab_id, None);
    assert_eq!(bus.reads_of(0x1F2), 0);
}

#[test]
fn non_qualcomm_pmic_is_rejected() {
    let mut bus = FakeBus::new();
    bus.set(0x104, 0x00);

    assert_eq!(PmicInfo::load(&mut bus), Err(Error::NoDevice));
}
