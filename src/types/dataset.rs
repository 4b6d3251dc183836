//! Defines the two NASA POWER datasets this crate downloads for every point.

use std::fmt;

/// One of the point-query datasets requested from the POWER API.
///
/// The hourly dataset only carries relative humidity and is used to derive the
/// RH90 column. The daily dataset is the weather file that column is appended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    /// Hourly relative humidity at 2 m, delivered as CSV.
    Hourly,
    /// Daily agronomy variables, delivered in the ICASA fixed-width format.
    Daily,
}

impl Dataset {
    pub(crate) fn path_segment(&self) -> &'static str {
        match self {
            Dataset::Hourly => "hourly",
            Dataset::Daily => "daily",
        }
    }

    /// Comma separated POWER parameter list.
    pub(crate) fn parameters(&self) -> &'static str {
        match self {
            Dataset::Hourly => "RH2M",
            Dataset::Daily => "T2MDEW,T2M_MIN,T2M_MAX,RH2M,PRECTOTCORR,WS2M,ALLSKY_SFC_SW_DWN",
        }
    }

    pub(crate) fn format(&self) -> &'static str {
        match self {
            Dataset::Hourly => "csv",
            Dataset::Daily => "icasa",
        }
    }
}

/// Allows formatting a `Dataset` variant using its `path_segment`.
///
/// # Examples
///
/// ```
/// use nasa_power_sync::Dataset;
///
/// assert_eq!(Dataset::Hourly.to_string(), "hourly");
/// assert_eq!(format!("{}", Dataset::Daily), "daily");
/// ```
impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path_segment())
    }
}
