/// Weather condition category, selects the icon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Conditions {
    Clear,
    Clouds,
    Rain,
    Mist,
    #[default]
    Unknown,
}

impl Conditions {
    /// Map a companion tag to a category (case-sensitive)
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "Clear" => Conditions::Clear,
            "Clouds" => Conditions::Clouds,
            "Rain" => Conditions::Rain,
            "Mist" => Conditions::Mist,
            _ => Conditions::Unknown,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Conditions::Clear => "Clear",
            Conditions::Clouds => "Clouds",
            Conditions::Rain => "Rain",
            Conditions::Mist => "Mist",
            Conditions::Unknown => "Unknown",
        }
    }

    /// Whether this category has an icon
    pub fn is_known(self) -> bool {
        self != Conditions::Unknown
    }
}
