//! Error definitions shared by the ADC and charger drivers.

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<BusError> {
    /// Underlying register bus transaction failed.
    Bus(BusError),
    /// Parameter, channel index or register address outside what the hardware supports.
    InvalidArgument,
    /// Channel has no conversion ready (source not attached).
    NoData,
    /// Hardware returned a reading that cannot be interpreted.
    InvalidData,
    /// Detection hardware has not finished; poll again later.
    TryAgain,
    /// A dependent device is not available yet; retry later.
    Deferred,
    /// The requested device or channel does not exist.
    NoDevice,
}

impl<BusError> Error<BusError> {
    /// `true` for conditions a caller is expected to retry or report as "unknown"
    /// rather than treat as a fault.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::NoData | Error::TryAgain | Error::Deferred)
    }
}

impl<BusError: core::fmt::Debug> core::fmt::Display for Error<BusError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Bus(e) => write!(f, "register bus error: {:?}", e),
            Error::InvalidArgument => write!(f, "invalid argument"),
            Error::NoData => write!(f, "no data available"),
            Error::InvalidData => write!(f, "invalid data"),
            Error::TryAgain => write!(f, "resource temporarily unavailable, try again"),
            Error::Deferred => write!(f, "dependency not ready, deferred"),
            Error::NoDevice => write!(f, "no such device"),
        }
    }
}

impl<BusError: core::fmt::Debug> core::error::Error for Error<BusError> {}
