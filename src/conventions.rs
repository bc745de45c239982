use chrono::TimeDelta;

use crate::config::TwilightConvention;

/// Named twilight conventions used by Islamic authorities.
///
/// Each method is nothing more than a Fajr angle, an Isha angle and, for a few,
/// a fixed delay between Maghrib and Isha.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalculationMethod {
    /// 18° for both Fajr and Isha
    AstronomicalTwilight,
    /// Muslim World League, 18° / 17°
    MuslimWorldLeague,
    /// Islamic Society of North America, 15° / 15°
    Isna,
    /// Umm al-Qura University, Makkah: 18.5° and Isha 90 minutes after Maghrib
    UmmAlQura,
    /// Gulf region: 19.5° and Isha 90 minutes after Maghrib
    Gulf,
    /// Algerian Ministry of Religious Affairs, 18° / 17°
    Algerian,
    /// University of Islamic Sciences, Karachi, 18° / 18°
    Karachi,
    /// Diyanet İşleri Başkanlığı, Turkey, 18° / 17°
    Diyanet,
    /// Egyptian General Authority of Survey, 19.5° / 17.5°
    Egypt,
    /// Egyptian General Authority of Survey (alternative), 20° / 18°
    EgyptBis,
    /// Kementerian Agama, Indonesia, 20° / 18°
    Kemenag,
    /// Majlis Ugama Islam Singapura, 20° / 18°
    Muis,
    /// Jabatan Kemajuan Islam Malaysia, 20° / 18°
    Jakim,
    /// Union des Organisations Islamiques de France, 12° / 12°
    Uoif,
    /// France, 15° / 15°
    France15,
    /// France, 18° / 18°
    France18,
    /// Tunisian Ministry of Religious Affairs, 18° / 18°
    Tunisia,
    /// Institute of Geophysics, University of Tehran, 17.7° / 14°
    Tehran,
    /// Shia Ithna Ashari (Jafari), 16° / 14°
    Jafari,
}

impl CalculationMethod {
    /// Every named method.
    pub const ALL: [CalculationMethod; 19] = [
        CalculationMethod::AstronomicalTwilight,
        CalculationMethod::MuslimWorldLeague,
        CalculationMethod::Isna,
        CalculationMethod::UmmAlQura,
        CalculationMethod::Gulf,
        CalculationMethod::Algerian,
        CalculationMethod::Karachi,
        CalculationMethod::Diyanet,
        CalculationMethod::Egypt,
        CalculationMethod::EgyptBis,
        CalculationMethod::Kemenag,
        CalculationMethod::Muis,
        CalculationMethod::Jakim,
        CalculationMethod::Uoif,
        CalculationMethod::France15,
        CalculationMethod::France18,
        CalculationMethod::Tunisia,
        CalculationMethod::Tehran,
        CalculationMethod::Jafari,
    ];

    pub fn twilight(self) -> TwilightConvention {
        use CalculationMethod::*;
        match self {
            AstronomicalTwilight | Karachi | France18 | Tunisia => TwilightConvention::new(18.0, 18.0),
            MuslimWorldLeague | Algerian | Diyanet => TwilightConvention::new(18.0, 17.0),
            Isna | France15 => TwilightConvention::new(15.0, 15.0),
            UmmAlQura => TwilightConvention::new(18.5, 18.5).with_maghrib_duration(TimeDelta::minutes(90)),
            Gulf => TwilightConvention::new(19.5, 19.5).with_maghrib_duration(TimeDelta::minutes(90)),
            Egypt => TwilightConvention::new(19.5, 17.5),
            EgyptBis | Kemenag | Muis | Jakim => TwilightConvention::new(20.0, 18.0),
            Uoif => TwilightConvention::new(12.0, 12.0),
            Tehran => TwilightConvention::new(17.7, 14.0),
            Jafari => TwilightConvention::new(16.0, 14.0),
        }
    }
}

impl From<CalculationMethod> for TwilightConvention {
    fn from(method: CalculationMethod) -> Self {
        method.twilight()
    }
}
