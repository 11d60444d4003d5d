//! Display strings for the supported locales.
//!
//! Lookups are pure: the locale is always passed in, there is no process-wide
//! "current language".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Supported display locales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ur,
}

impl Locale {
    /// Parse a language tag such as `en`, `en-US` or `ur_PK`.
    ///
    /// Unknown languages fall back to English.
    pub fn from_tag(tag: &str) -> Self {
        let lang = tag
            .split(['-', '_'])
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        match lang.as_str() {
            "ur" => Locale::Ur,
            _ => Locale::En,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ur => "ur",
        }
    }

    /// Whether text in this locale reads right to left
    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ur)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Locale::from_tag(s))
    }
}

/// Every translatable label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextKey {
    Dashboard,
    FactoryGuardian,
    Language,
    MachineStatus,
    Alerts,
    LastUpdated,
    Operational,
    Maintenance,
    Offline,
    RiskScore,
    Location,
    LowRisk,
    MediumRisk,
    HighRisk,
    NoAlerts,
    Acknowledge,
    Acknowledged,
    NewAlert,
    AllSystemsOperational,
    AttentionRequired,
    CriticalAlert,
    Refresh,
    ViewDetails,
    JustNow,
    MinutesAgo,
    HoursAgo,
    Total,
    Critical,
    Warning,
    ErrorLoadingData,
    MockDataNotice,
}

impl TextKey {
    pub const ALL: [TextKey; 31] = [
        TextKey::Dashboard,
        TextKey::FactoryGuardian,
        TextKey::Language,
        TextKey::MachineStatus,
        TextKey::Alerts,
        TextKey::LastUpdated,
        TextKey::Operational,
        TextKey::Maintenance,
        TextKey::Offline,
        TextKey::RiskScore,
        TextKey::Location,
        TextKey::LowRisk,
        TextKey::MediumRisk,
        TextKey::HighRisk,
        TextKey::NoAlerts,
        TextKey::Acknowledge,
        TextKey::Acknowledged,
        TextKey::NewAlert,
        TextKey::AllSystemsOperational,
        TextKey::AttentionRequired,
        TextKey::CriticalAlert,
        TextKey::Refresh,
        TextKey::ViewDetails,
        TextKey::JustNow,
        TextKey::MinutesAgo,
        TextKey::HoursAgo,
        TextKey::Total,
        TextKey::Critical,
        TextKey::Warning,
        TextKey::ErrorLoadingData,
        TextKey::MockDataNotice,
    ];
}

/// Look up a display string
pub fn translate(locale: Locale, key: TextKey) -> &'static str {
    match locale {
        Locale::En => english(key),
        Locale::Ur => urdu(key),
    }
}

fn english(key: TextKey) -> &'static str {
    match key {
        TextKey::Dashboard => "Dashboard",
        TextKey::FactoryGuardian => "Factory Guardian",
        TextKey::Language => "Language",
        TextKey::MachineStatus => "Machine Status",
        TextKey::Alerts => "Alerts",
        TextKey::LastUpdated => "Last Updated",
        TextKey::Operational => "Operational",
        TextKey::Maintenance => "Maintenance",
        TextKey::Offline => "Offline",
        TextKey::RiskScore => "Risk Score",
        TextKey::Location => "Location",
        TextKey::LowRisk => "Low Risk",
        TextKey::MediumRisk => "Medium Risk",
        TextKey::HighRisk => "High Risk",
        TextKey::NoAlerts => "No alerts at this time",
        TextKey::Acknowledge => "Acknowledge",
        TextKey::Acknowledged => "Acknowledged",
        TextKey::NewAlert => "New Alert",
        TextKey::AllSystemsOperational => "All Systems Operational",
        TextKey::AttentionRequired => "Attention Required",
        TextKey::CriticalAlert => "Critical Alert",
        TextKey::Refresh => "Refresh",
        TextKey::ViewDetails => "View Details",
        TextKey::JustNow => "Just now",
        TextKey::MinutesAgo => "minutes ago",
        TextKey::HoursAgo => "hours ago",
        TextKey::Total => "Total",
        TextKey::Critical => "critical",
        TextKey::Warning => "warning",
        TextKey::ErrorLoadingData => "Error loading data",
        TextKey::MockDataNotice => "Using mock data for demonstration purposes.",
    }
}

fn urdu(key: TextKey) -> &'static str {
    match key {
        TextKey::Dashboard => "ڈیش بورڈ",
        TextKey::FactoryGuardian => "فیکٹری گارڈین",
        TextKey::Language => "زبان",
        TextKey::MachineStatus => "مشین کی حالت",
        TextKey::Alerts => "الرٹس",
        TextKey::LastUpdated => "آخری اپڈیٹ",
        TextKey::Operational => "فعال",
        TextKey::Maintenance => "دیکھ بھال",
        TextKey::Offline => "آف لائن",
        TextKey::RiskScore => "خطرے کا اسکور",
        TextKey::Location => "مقام",
        TextKey::LowRisk => "کم خطرہ",
        TextKey::MediumRisk => "درمیانی خطرہ",
        TextKey::HighRisk => "زیادہ خطرہ",
        TextKey::NoAlerts => "فی الوقت کوئی الرٹ نہیں",
        TextKey::Acknowledge => "تسلیم کریں",
        TextKey::Acknowledged => "تسلیم شدہ",
        TextKey::NewAlert => "نیا الرٹ",
        TextKey::AllSystemsOperational => "تمام سسٹم فعال ہیں",
        TextKey::AttentionRequired => "توجہ درکار",
        TextKey::CriticalAlert => "اہم الرٹ",
        TextKey::Refresh => "ریفریش",
        TextKey::ViewDetails => "تفصیلات دیکھیں",
        TextKey::JustNow => "ابھی ابھی",
        TextKey::MinutesAgo => "منٹ پہلے",
        TextKey::HoursAgo => "گھنٹے پہلے",
        TextKey::Total => "کل",
        TextKey::Critical => "شدید",
        TextKey::Warning => "انتباہ",
        TextKey::ErrorLoadingData => "ڈیٹا لوڈ کرنے میں خرابی",
        TextKey::MockDataNotice => "نمائشی مقاصد کے لیے فرضی ڈیٹا استعمال ہو رہا ہے۔",
    }
}

/// "Just now", "5 minutes ago", "2 hours ago"
pub fn relative_time(locale: Locale, then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();

    if minutes < 1 {
        translate(locale, TextKey::JustNow).to_string()
    } else if minutes < 60 {
        format!("{} {}", minutes, translate(locale, TextKey::MinutesAgo))
    } else {
        format!("{} {}", elapsed.num_hours(), translate(locale, TextKey::HoursAgo))
    }
}
