//! Service-center directory
//!
//! Loaded from YAML when a path is configured, otherwise the built-in
//! directory below is used. Read-only at runtime.

use crate::ConfigError;
use reminder_agent_core::ServiceCenter;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Directory of service centers, as stored in service_centers.yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCentersConfig {
    #[serde(default)]
    pub centers: Vec<ServiceCenter>,
}

impl Default for ServiceCentersConfig {
    fn default() -> Self {
        Self {
            centers: builtin_centers(),
        }
    }
}

impl ServiceCentersConfig {
    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;

        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else the built-in directory
    pub fn load_or_default(path: Option<&str>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    /// Centers that can be matched and booked
    pub fn active_centers(&self) -> Vec<ServiceCenter> {
        self.centers.iter().filter(|c| c.active).cloned().collect()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&ServiceCenter> {
        self.centers.iter().find(|c| c.branch_code == code)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.centers.iter().any(|c| c.active) {
            return Err(ConfigError::InvalidValue {
                field: "centers".to_string(),
                message: "directory has no active service center".to_string(),
            });
        }
        for center in &self.centers {
            if center.city_name.trim().is_empty() || center.branch_code.trim().is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "city_name/branch_code for center {}",
                    center.id
                )));
            }
        }
        Ok(())
    }
}

fn center(id: &str, city: &str, branch: &str, code: &str, address: &str) -> ServiceCenter {
    ServiceCenter {
        id: id.to_string(),
        city_name: city.to_string(),
        branch_name: branch.to_string(),
        branch_code: code.to_string(),
        address: address.to_string(),
        active: true,
    }
}

fn builtin_centers() -> Vec<ServiceCenter> {
    vec![
        center("sc-001", "Jaipur", "Sitapura", "JPR01", "RIICO Industrial Area, Sitapura, Jaipur"),
        center("sc-002", "Jodhpur", "Basni", "JDH01", "Basni Industrial Area Phase II, Jodhpur"),
        center("sc-003", "Udaipur", "Madri", "UDR01", "Madri Industrial Area, Udaipur"),
        center("sc-004", "Kota", "Indraprastha", "KTA01", "Indraprastha Industrial Area, Kota"),
        center("sc-005", "Ajmer", "Parbatpura", "AJM01", "Parbatpura Industrial Area, Ajmer"),
        center("sc-006", "Bikaner", "Karni Nagar", "BKN01", "Karni Industrial Area, Bikaner"),
        center("sc-007", "Delhi", "Okhla", "DEL01", "Okhla Industrial Estate Phase III, New Delhi"),
        center("sc-008", "Ahmedabad", "Naroda", "AMD01", "Naroda GIDC, Ahmedabad"),
        center("sc-009", "Indore", "Sanwer Road", "IDR01", "Sector E, Sanwer Road, Indore"),
        center("sc-010", "Lucknow", "Chinhat", "LKO01", "Chinhat Industrial Area, Lucknow"),
        center("sc-011", "Raipur", "Urla", "RPR01", "Urla Industrial Area, Raipur"),
        center("sc-012", "Gurgaon", "Manesar", "GGN01", "IMT Manesar, Sector 8, Gurgaon"),
    ]
}
