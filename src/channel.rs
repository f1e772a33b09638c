//! Monitored engine channels.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One monitored physical quantity.
///
/// The discriminant doubles as the gauge slot index on the dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Engine coolant temperature (°C).
    Coolant,
    /// Engine oil temperature (°C).
    OilTemp,
    /// Fuel rail pressure (bar).
    FuelPressure,
    /// Mass air flow (g/s).
    AirFlow,
}

impl Channel {
    /// Every channel, in sampling order.
    pub const ALL: [Self; 4] = [Self::Coolant, Self::OilTemp, Self::FuelPressure, Self::AirFlow];

    /// Short uppercase label printed on the dial face.
    #[inline]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Coolant => "WATER",
            Self::OilTemp => "OIL",
            Self::FuelPressure => "FUEL",
            Self::AirFlow => "AIR",
        }
    }

    /// Unit suffix for scale labels.
    #[inline]
    pub const fn unit(self) -> &'static str {
        match self {
            Self::Coolant | Self::OilTemp => "C",
            Self::FuelPressure => "bar",
            Self::AirFlow => "g/s",
        }
    }

    /// ELM327 request line (mode + PID) for this channel.
    ///
    /// Oil temperature is not a standard mode 01 PID; `21 01` is the
    /// manufacturer-specific block that carries it.
    #[inline]
    pub const fn command(self) -> &'static str {
        match self {
            Self::Coolant => "01 05",
            Self::OilTemp => "21 01",
            Self::FuelPressure => "01 0A",
            Self::AirFlow => "01 10",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Coolant => "coolant",
            Self::OilTemp => "oil_temp",
            Self::FuelPressure => "fuel_pressure",
            Self::AirFlow => "air_flow",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_commands_are_unique() {
        for (i, a) in Channel::ALL.iter().enumerate() {
            for b in &Channel::ALL[i + 1..] {
                assert_ne!(a.command(), b.command(), "{a} and {b} share a request line");
            }
        }
    }

    #[test]
    fn test_display_matches_serde_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            channel: Channel,
        }
        for channel in Channel::ALL {
            let text = format!("channel = \"{channel}\"");
            let parsed: Wrapper = toml::from_str(&text).unwrap();
            assert_eq!(parsed.channel, channel, "Display name should parse back for {channel}");
        }
    }
}
