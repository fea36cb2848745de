// src/services.rs

pub const SERVICE_SEPARATOR: &str = " + ";

pub const DEFAULT_SERVICES: &[&str] = &[
    // Vaccines
    "Flu Vaccination (NHS)",
    "Flu Vaccination (Private)",
    "COVID-19 Vaccination (NHS)",
    "COVID-19 Vaccination (Private)",
    "Travel Vaccines Consultation",
    "MMR Vaccine",
    "DTP Vaccine",
    "Hepatitis A Vaccine",
    "Hepatitis B Vaccine",
    "Typhoid Vaccine",
    "Cholera Vaccine",
    "Yellow Fever Vaccine",
    "Japanese Encephalitis Vaccine",
    "Tick Borne Encephalitis Vaccine",
    "MenACWY Vaccine",
    "MenB Vaccine",
    "Dengue Vaccine",
    // Other services
    "Blood Pressure Check",
    "Earwax Removal",
    "Pharmacy First Consultation",
    "Weight Loss Consultation",
    "Private Prescription",
];

/// Master list of bookable services, in display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    names: Vec<String>,
}

impl ServiceCatalog {
    /// An empty list falls back to the built-in catalogue.
    pub fn new(names: Vec<String>) -> Self {
        let names: Vec<String> = names
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();
        if names.is_empty() {
            Self::default()
        } else {
            Self { names }
        }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Case-insensitive substring match; master order is kept.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let q = query.trim().to_lowercase();
        self.names
            .iter()
            .filter(|n| n.to_lowercase().contains(&q))
            .map(String::as_str)
            .collect()
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self {
            names: DEFAULT_SERVICES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn join_services(services: &[String]) -> String {
    services.join(SERVICE_SEPARATOR)
}

pub fn split_services(joined: &str) -> Vec<String> {
    joined
        .split('+')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
