//! PMIC identification: subtype, revision and fabrication source.

use crate::error::Error;
use crate::regmap::RegisterBus;
use crate::registers::revid;

/// PMIC subtype as read from the revision-ID block.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Subtype(pub u8);

impl Subtype {
    pub const PM8941: Subtype = Subtype(0x01);
    pub const PM8841: Subtype = Subtype(0x02);
    pub const PM8019: Subtype = Subtype(0x03);
    pub const PM8226: Subtype = Subtype(0x04);
    pub const PM8110: Subtype = Subtype(0x05);
    pub const PMA8084: Subtype = Subtype(0x06);
    pub const PMI8962: Subtype = Subtype(0x07);
    pub const PMD9635: Subtype = Subtype(0x08);
    pub const PM8994: Subtype = Subtype(0x09);
    pub const PMI8994: Subtype = Subtype(0x0a);
    pub const PM8916: Subtype = Subtype(0x0b);
    pub const PM8004: Subtype = Subtype(0x0c);
    pub const PM8909: Subtype = Subtype(0x0d);
    pub const PM8950: Subtype = Subtype(0x10);
    pub const PMI8950: Subtype = Subtype(0x11);
    pub const PM8998: Subtype = Subtype(0x14);
    pub const PMI8998: Subtype = Subtype(0x15);
    pub const PM8005: Subtype = Subtype(0x18);
    pub const PM660L: Subtype = Subtype(0x1A);
    pub const PM660: Subtype = Subtype(0x1B);

    /// Compatible-style name of a known subtype.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            Subtype::PM8941 => "pm8941",
            Subtype::PM8841 => "pm8841",
            Subtype::PM8019 => "pm8019",
            Subtype::PM8226 => "pm8226",
            Subtype::PM8110 => "pm8110",
            Subtype::PMA8084 => "pma8084",
            Subtype::PMI8962 => "pmi8962",
            Subtype::PMD9635 => "pmd9635",
            Subtype::PM8994 => "pm8994",
            Subtype::PMI8994 => "pmi8994",
            Subtype::PM8916 => "pm8916",
            Subtype::PM8004 => "pm8004",
            Subtype::PM8909 => "pm8909",
            Subtype::PM8950 => "pm8950",
            Subtype::PMI8950 => "pmi8950",
            Subtype::PM8998 => "pm8998",
            Subtype::PMI8998 => "pmi8998",
            Subtype::PM8005 => "pm8005",
            Subtype::PM660L => "pm660l",
            Subtype::PM660 => "pm660",
            _ => return None,
        };
        Some(name)
    }

    /// Only these parts carry a fab-id register.
    pub fn has_fab_id(self) -> bool {
        self == Subtype::PMI8998 || self == Subtype::PM660
    }
}

/// Foundry ids found in the FAB_ID register.
pub mod fab_id {
    pub const PMI8998_SMIC: u8 = 0x11;
    pub const PMI8998_GF: u8 = 0x30;
    pub const PM660_GF: u8 = 0x00;
    pub const PM660_TSMC: u8 = 0x02;
}

/// Identification of the PMIC the peripherals live on.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PmicInfo {
    pub subtype: Subtype,
    pub major: u8,
    pub minor: u8,
    pub rev2: u8,
    pub fab_id: Option<u8>,
}

impl PmicInfo {
    /// Info for a known part, without touching hardware.
    pub fn new(subtype: Subtype, fab_id: Option<u8>) -> Self {
        Self {
            subtype,
            major: 0,
            minor: 0,
            rev2: 0,
            fab_id,
        }
    }

    /// Read the revision-ID block. `bus` must address the PMIC's first slave id
    /// with absolute register addresses.
    pub fn load<B: RegisterBus>(bus: &mut B) -> Result<Self, Error<B::Error>> {
        let pmic_type = bus.read(revid::TYPE).map_err(Error::Bus)?;
        if pmic_type != revid::TYPE_VALUE {
            warn!("unexpected PMIC type {=u8:#x}", pmic_type);
            return Err(Error::NoDevice);
        }

        let subtype = Subtype(bus.read(revid::SUBTYPE).map_err(Error::Bus)?);
        let rev2 = bus.read(revid::REV2).map_err(Error::Bus)?;
        let mut minor = bus.read(revid::REV3).map_err(Error::Bus)?;
        let mut major = bus.read(revid::REV4).map_err(Error::Bus)?;

        let fab_id = if subtype.has_fab_id() {
            Some(bus.read(revid::FAB_ID).map_err(Error::Bus)?)
        } else {
            None
        };

        // Early PM8941/PM8226 count major revisions from zero.
        if (subtype == Subtype::PM8941 || subtype == Subtype::PM8226) && major < 0x02 {
            major += 1;
        }
        if subtype == Subtype::PM8110 {
            minor = rev2;
        }

        let info = Self {
            subtype,
            major,
            minor,
            rev2,
            fab_id,
        };
        info!(
            "{=u8:x}: {=str} v{=u8}.{=u8}",
            subtype.0,
            subtype.name().unwrap_or("unknown"),
            major,
            minor
        );
        Ok(info)
    }
}

/// Offset/slope pair used to turn charger-temperature codes into degrees.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FabCoefficients {
    pub offset_uv: i64,
    pub slope_uv_per_c: i64,
}

impl FabCoefficients {
    /// Look up the charger-temperature coefficients for a PMIC.
    /// `None` for parts and fabs without characterisation data.
    pub fn for_pmic(pmic: &PmicInfo) -> Option<Self> {
        let (offset_uv, slope_uv_per_c) = match (pmic.subtype, pmic.fab_id) {
            (Subtype::PM660, Some(fab_id::PM660_GF)) => (1_309_001, 3_403),
            (Subtype::PM660, Some(fab_id::PM660_TSMC)) => (1_295_898, 3_596),
            (Subtype::PM660, _) => (1_314_779, 3_496),
            (Subtype::PMI8998, Some(fab_id::PMI8998_GF)) => (1_303_168, 3_784),
            (Subtype::PMI8998, Some(fab_id::PMI8998_SMIC)) => (1_338_433, 3_655),
            _ => return None,
        };
        Some(Self {
            offset_uv,
            slope_uv_per_c,
        })
    }
}
