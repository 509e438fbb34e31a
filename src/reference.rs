use std::path::Path;

use csv::Reader;
use serde::Deserialize;

use crate::scheduling::types::{AppointmentType, Chair, ChairStatus, Provider};

/// Practice configuration: chairs, providers and the appointment-type
/// catalog. Static reference data, read-only to the scheduling service.
#[derive(Debug, Clone)]
pub struct ReferenceCatalog {
    pub chairs: Vec<Chair>,
    pub providers: Vec<Provider>,
    pub appointment_types: Vec<AppointmentType>,
}

impl ReferenceCatalog {
    pub fn chair(&self, id: &str) -> Option<&Chair> {
        self.chairs.iter().find(|c| c.id == id)
    }

    pub fn provider(&self, id: &str) -> Option<&Provider> {
        self.providers.iter().find(|p| p.id == id)
    }

    pub fn appointment_type(&self, id: &str) -> Option<&AppointmentType> {
        self.appointment_types.iter().find(|t| t.id == id)
    }

    /// Built-in catalog so the binary runs without any config files.
    pub fn builtin() -> Self {
        ReferenceCatalog {
            chairs: vec![
                chair("chair-1", "Operatory 1", ChairStatus::Available),
                chair("chair-2", "Operatory 2", ChairStatus::Available),
                chair("chair-3", "Operatory 3", ChairStatus::Available),
                chair("chair-4", "Hygiene Bay", ChairStatus::Maintenance),
            ],
            providers: vec![
                provider("dr-chen", "Dr. Sarah Chen"),
                provider("dr-okafor", "Dr. James Okafor"),
                provider("hyg-mills", "RDH Patricia Mills"),
            ],
            appointment_types: vec![
                appt_type("exam", "Routine Exam", 20, &["xray"]),
                appt_type("cleaning", "Cleaning", 45, &["prophy", "suction"]),
                appt_type("filling", "Filling", 60, &["drill", "suction"]),
                appt_type("crown", "Crown Prep", 90, &["drill", "scanner"]),
                appt_type("root-canal", "Root Canal", 120, &["drill", "microscope"]),
            ],
        }
    }

    /// Loads the catalog from `chairs.csv`, `providers.csv` and
    /// `appointment_types.csv` under `config_dir`, falling back to the
    /// built-in catalog for any file that is missing. Malformed rows are
    /// skipped with a warning rather than failing the whole load.
    pub fn load_or_builtin(config_dir: &Path) -> Self {
        let builtin = Self::builtin();
        ReferenceCatalog {
            chairs: load_csv(&config_dir.join("chairs.csv"))
                .map(|rows: Vec<ChairRow>| rows.into_iter().map(Into::into).collect())
                .unwrap_or(builtin.chairs),
            providers: load_csv(&config_dir.join("providers.csv"))
                .map(|rows: Vec<ProviderRow>| rows.into_iter().map(Into::into).collect())
                .unwrap_or(builtin.providers),
            appointment_types: load_csv(&config_dir.join("appointment_types.csv"))
                .map(|rows: Vec<AppointmentTypeRow>| rows.into_iter().map(Into::into).collect())
                .unwrap_or(builtin.appointment_types),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChairRow {
    id: String,
    name: String,
    status: String,
}

impl From<ChairRow> for Chair {
    fn from(row: ChairRow) -> Self {
        let status = match row.status.trim() {
            "occupied" => ChairStatus::Occupied,
            "maintenance" => ChairStatus::Maintenance,
            _ => ChairStatus::Available,
        };
        Chair {
            id: row.id,
            name: row.name,
            status,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProviderRow {
    id: String,
    name: String,
}

impl From<ProviderRow> for Provider {
    fn from(row: ProviderRow) -> Self {
        Provider {
            id: row.id,
            name: row.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AppointmentTypeRow {
    id: String,
    name: String,
    duration_minutes: u16,
    /// semicolon-separated equipment tags, e.g. "drill;suction"
    equipment: String,
}

impl From<AppointmentTypeRow> for AppointmentType {
    fn from(row: AppointmentTypeRow) -> Self {
        let equipment = row
            .equipment
            .split(';')
            .map(|tag| tag.trim().to_string())
            .filter(|tag| !tag.is_empty())
            .collect();
        AppointmentType {
            id: row.id,
            name: row.name,
            duration_minutes: row.duration_minutes,
            equipment,
        }
    }
}

/// Reads every well-formed row of a CSV file. Returns None when the file is
/// missing or unreadable so the caller can fall back to defaults.
fn load_csv<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<Vec<T>> {
    let mut reader = Reader::from_path(path).ok()?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => log::warn!("Skipping malformed row in {}: {}", path.display(), e),
        }
    }
    Some(rows)
}

fn chair(id: &str, name: &str, status: ChairStatus) -> Chair {
    Chair {
        id: id.to_string(),
        name: name.to_string(),
        status,
    }
}

fn provider(id: &str, name: &str) -> Provider {
    Provider {
        id: id.to_string(),
        name: name.to_string(),
    }
}

fn appt_type(id: &str, name: &str, duration_minutes: u16, equipment: &[&str]) -> AppointmentType {
    AppointmentType {
        id: id.to_string(),
        name: name.to_string(),
        duration_minutes,
        equipment: equipment.iter().map(|s| s.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_lookups_work() {
        let catalog = ReferenceCatalog::builtin();
        assert!(catalog.chair("chair-1").is_some());
        assert!(catalog.chair("chair-99").is_none());
        assert!(catalog.provider("dr-chen").is_some());
        assert_eq!(catalog.appointment_type("cleaning").unwrap().duration_minutes, 45);
    }

    #[test]
    fn missing_config_dir_falls_back_to_builtin() {
        let catalog = ReferenceCatalog::load_or_builtin(Path::new("no-such-dir"));
        assert_eq!(catalog.chairs.len(), ReferenceCatalog::builtin().chairs.len());
    }

    #[test]
    fn chair_row_status_parsing_defaults_to_available() {
        let row = ChairRow {
            id: "c".to_string(),
            name: "Chair".to_string(),
            status: "something-else".to_string(),
        };
        assert_eq!(Chair::from(row).status, ChairStatus::Available);
    }
}
