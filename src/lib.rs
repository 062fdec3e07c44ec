//! Qualcomm PMI8998 charger-side drivers
//!
//! Two engines on the PMIC register bus:
//! - [`Rradc`], the round-robin ADC: channel triggering, continuous-mode
//!   handshakes, coherent data reads and integer scaling to physical units.
//! - [`Smb2`], the switch-mode charger: APSD source classification, input
//!   current limit policy, plug-in interrupt handling and power-supply properties.
//!
//! Both are blocking, `no_std`, talk to hardware through [`RegisterBus`] and sleep
//! through `embedded_hal::delay::DelayNs`. Wrap them in [`Shared`] when an
//! interrupt thread and property callers need the same device.

#![no_std]

#[macro_use]
mod fmt;

pub mod channel;
pub mod data_types;
pub mod error;
pub mod iio;
pub mod pmic;
pub mod regmap;
pub mod registers;
pub mod rradc;
pub mod scale;
pub mod shared;
pub mod smb2;

pub use channel::Channel;
pub use error::Error;
pub use iio::{ChanInfo, ChannelSource};
pub use pmic::{PmicInfo, Subtype};
pub use regmap::{Coherency, I2cBus, RegisterBus, Regmap};
pub use registers::{DEFAULT_CHARGER_BASE, DEFAULT_RRADC_BASE};
pub use rradc::{Reading, Rradc, RradcConfig};
pub use shared::Shared;
pub use smb2::{ChargerConfig, Notifier, Smb2};
