//! Static per-country fiscal parameters

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum Country {
    #[default]
    Nigeria,
    Kenya,
    Ghana,
    SouthAfrica,
    Egypt,
    Uganda,
    Rwanda,
    Tanzania,
    Mauritius,
}

/// Fiscal parameters of a country. All rates are percentages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CountryProfile {
    pub flag: &'static str,
    pub currency: &'static str,
    /// Local-currency units per 1 stablecoin unit.
    pub exchange_rate: f64,
    pub vat: f64,
    pub withholding_tax: f64,
    pub capital_gains: f64,
    pub digital_services_tax: f64,
    pub surcharge: f64,
    pub optimized_rate: f64,
}

impl CountryProfile {
    /// Simple additive sum of the five component rates.
    pub fn combined_rate(&self) -> f64 {
        self.vat
            + self.withholding_tax
            + self.capital_gains
            + self.digital_services_tax
            + self.surcharge
    }

    pub fn to_local(&self, usd: f64) -> f64 {
        usd * self.exchange_rate
    }
}

const NIGERIA: CountryProfile = CountryProfile {
    flag: "🇳🇬",
    currency: "NGN",
    exchange_rate: 1650.0,
    vat: 7.5,
    withholding_tax: 10.0,
    capital_gains: 10.0,
    digital_services_tax: 6.0,
    surcharge: 0.0,
    optimized_rate: 2.5,
};

const KENYA: CountryProfile = CountryProfile {
    flag: "🇰🇪",
    currency: "KES",
    exchange_rate: 129.0,
    vat: 16.0,
    withholding_tax: 5.0,
    capital_gains: 5.0,
    digital_services_tax: 1.5,
    surcharge: 0.0,
    optimized_rate: 3.0,
};

const GHANA: CountryProfile = CountryProfile {
    flag: "🇬🇭",
    currency: "GHS",
    exchange_rate: 15.2,
    vat: 15.0,
    withholding_tax: 3.0,
    capital_gains: 0.0,
    digital_services_tax: 0.0,
    surcharge: 0.0,
    optimized_rate: 1.5,
};

const SOUTH_AFRICA: CountryProfile = CountryProfile {
    flag: "🇿🇦",
    currency: "ZAR",
    exchange_rate: 18.5,
    vat: 15.0,
    withholding_tax: 15.0,
    capital_gains: 18.0,
    digital_services_tax: 0.0,
    surcharge: 0.0,
    optimized_rate: 4.5,
};

const EGYPT: CountryProfile = CountryProfile {
    flag: "🇪🇬",
    currency: "EGP",
    exchange_rate: 49.5,
    vat: 14.0,
    withholding_tax: 10.0,
    capital_gains: 10.0,
    digital_services_tax: 0.0,
    surcharge: 0.0,
    optimized_rate: 3.0,
};

const UGANDA: CountryProfile = CountryProfile {
    flag: "🇺🇬",
    currency: "UGX",
    exchange_rate: 3750.0,
    vat: 18.0,
    withholding_tax: 0.0,
    capital_gains: 0.0,
    digital_services_tax: 5.0,
    surcharge: 0.0,
    optimized_rate: 0.5,
};

const RWANDA: CountryProfile = CountryProfile {
    flag: "🇷🇼",
    currency: "RWF",
    exchange_rate: 1350.0,
    vat: 18.0,
    withholding_tax: 15.0,
    capital_gains: 0.0,
    digital_services_tax: 0.0,
    surcharge: 0.0,
    optimized_rate: 2.0,
};

const TANZANIA: CountryProfile = CountryProfile {
    flag: "🇹🇿",
    currency: "TZS",
    exchange_rate: 2550.0,
    vat: 18.0,
    withholding_tax: 15.0,
    capital_gains: 10.0,
    digital_services_tax: 2.0,
    surcharge: 0.0,
    optimized_rate: 3.5,
};

// Mauritius surcharge is the PSC levy.
const MAURITIUS: CountryProfile = CountryProfile {
    flag: "🇲🇺",
    currency: "MUR",
    exchange_rate: 46.5,
    vat: 15.0,
    withholding_tax: 0.0,
    capital_gains: 0.0,
    digital_services_tax: 0.0,
    surcharge: 3.0,
    optimized_rate: 0.8,
};

impl Country {
    pub const ALL: [Country; 9] = [
        Country::Nigeria,
        Country::Kenya,
        Country::Ghana,
        Country::SouthAfrica,
        Country::Egypt,
        Country::Uganda,
        Country::Rwanda,
        Country::Tanzania,
        Country::Mauritius,
    ];

    pub fn profile(&self) -> &'static CountryProfile {
        match self {
            Country::Nigeria => &NIGERIA,
            Country::Kenya => &KENYA,
            Country::Ghana => &GHANA,
            Country::SouthAfrica => &SOUTH_AFRICA,
            Country::Egypt => &EGYPT,
            Country::Uganda => &UGANDA,
            Country::Rwanda => &RWANDA,
            Country::Tanzania => &TANZANIA,
            Country::Mauritius => &MAURITIUS,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Country::Nigeria => "Nigeria",
            Country::Kenya => "Kenya",
            Country::Ghana => "Ghana",
            Country::SouthAfrica => "South Africa",
            Country::Egypt => "Egypt",
            Country::Uganda => "Uganda",
            Country::Rwanda => "Rwanda",
            Country::Tanzania => "Tanzania",
            Country::Mauritius => "Mauritius",
        }
    }
}

impl Display for Country {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Country {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = normalize(s);
        Country::ALL
            .into_iter()
            .find(|c| normalize(c.name()) == key)
            .ok_or_else(|| anyhow!("Unknown country: {}", s))
    }
}

impl TryFrom<String> for Country {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Country> for String {
    fn from(value: Country) -> Self {
        value.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_country_names() {
        assert_eq!("Nigeria".parse::<Country>().unwrap(), Country::Nigeria);
        assert_eq!("kenya".parse::<Country>().unwrap(), Country::Kenya);
        assert_eq!(
            "South Africa".parse::<Country>().unwrap(),
            Country::SouthAfrica
        );
        assert_eq!(
            "south-africa".parse::<Country>().unwrap(),
            Country::SouthAfrica
        );
        assert_eq!(
            " SOUTH_AFRICA ".parse::<Country>().unwrap(),
            Country::SouthAfrica
        );

        let err = "Atlantis".parse::<Country>().unwrap_err();
        assert_eq!(err.to_string(), "Unknown country: Atlantis");
    }

    #[test]
    fn test_display_round_trips_for_every_country() {
        for country in Country::ALL {
            assert_eq!(country.to_string().parse::<Country>().unwrap(), country);
        }
    }

    #[test]
    fn test_profiles_are_well_formed() {
        for country in Country::ALL {
            let p = country.profile();
            assert!(p.exchange_rate > 0.0, "{country} exchange rate");
            for rate in [
                p.vat,
                p.withholding_tax,
                p.capital_gains,
                p.digital_services_tax,
                p.surcharge,
                p.optimized_rate,
            ] {
                assert!((0.0..=100.0).contains(&rate), "{country} rate {rate}");
            }
            assert_eq!(p.currency.len(), 3);
        }
    }

    #[test]
    fn test_combined_rate() {
        assert!((Country::Nigeria.profile().combined_rate() - 33.5).abs() < 1e-9);
        assert!((Country::Mauritius.profile().combined_rate() - 18.0).abs() < 1e-9);
        assert!((Country::SouthAfrica.profile().combined_rate() - 48.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_local() {
        assert_eq!(Country::Nigeria.profile().to_local(2.0), 3300.0);
        assert_eq!(Country::Kenya.profile().to_local(0.0), 0.0);
    }

    #[test]
    fn test_serde_uses_display_name() {
        let yaml = serde_yaml::to_string(&Country::SouthAfrica).unwrap();
        assert_eq!(yaml.trim(), "South Africa");
        let parsed: Country = serde_yaml::from_str("tanzania").unwrap();
        assert_eq!(parsed, Country::Tanzania);
    }
}
