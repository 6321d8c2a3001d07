//! Roster reference data (participants and driver pool)

use serde::{Deserialize, Serialize};

/// A participating team member
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    /// Name, unique within the roster
    pub name: String,
    /// Grade / year level (学年), used only for grouping order
    pub grade: u32,
    /// Designated parent among the driver pool, by driver name
    #[serde(default)]
    pub assigned_parent: Option<String>,
}

/// An available parent-driver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Driver {
    /// Name, unique within the roster
    pub name: String,
    /// Passenger seats, excluding the driver
    pub capacity: u32,
}

/// Roster for one session: attending participants plus available drivers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    pub participants: Vec<Participant>,
    pub drivers: Vec<Driver>,
}

impl Roster {
    /// Keep only the named participants, preserving roster order.
    /// Names with no roster entry are returned separately.
    pub fn select_attending(&self, names: &[String]) -> (Vec<Participant>, Vec<String>) {
        let unknown: Vec<String> = names
            .iter()
            .filter(|n| !self.participants.iter().any(|p| &p.name == *n))
            .cloned()
            .collect();
        let attending = self
            .participants
            .iter()
            .filter(|p| names.contains(&p.name))
            .cloned()
            .collect();
        (attending, unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Roster {
        Roster {
            participants: vec![
                Participant {
                    name: "山田".to_string(),
                    grade: 5,
                    assigned_parent: None,
                },
                Participant {
                    name: "鈴木".to_string(),
                    grade: 6,
                    assigned_parent: Some("鈴木".to_string()),
                },
            ],
            drivers: vec![Driver {
                name: "鈴木".to_string(),
                capacity: 3,
            }],
        }
    }

    #[test]
    fn test_select_attending() {
        let r = roster();
        let (attending, unknown) = r.select_attending(&["鈴木".to_string()]);
        assert_eq!(attending.len(), 1);
        assert_eq!(attending[0].name, "鈴木");
        assert!(unknown.is_empty());
    }

    #[test]
    fn test_select_attending_unknown_name() {
        let r = roster();
        let (attending, unknown) = r.select_attending(&["田中".to_string(), "山田".to_string()]);
        assert_eq!(attending.len(), 1);
        assert_eq!(unknown, vec!["田中".to_string()]);
    }
}
