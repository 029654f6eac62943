//! Emergency contacts shown on the crisis interstitial.

use serde::{Deserialize, Serialize};

const VIETNAM_WARNING: &str = "Mình nhận thấy bạn đang trải qua giai đoạn rất khó khăn. An toàn \
                               của bạn là ưu tiên số 1. Hãy liên hệ ngay với các đường dây nóng \
                               bên dưới.";

/// One hotline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyContact {
    /// Dialable number.
    pub number: String,
    /// Service name.
    pub name: String,
    /// Short description (availability, cost).
    pub description: String,
    /// Display priority; 1 is shown first.
    pub priority: u8,
}

impl EmergencyContact {
    /// Create a contact.
    pub fn new(
        number: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        priority: u8,
    ) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
            description: description.into(),
            priority,
        }
    }
}

/// Static content of the crisis interstitial.
///
/// Deserialization goes through [`CrisisResources::new`], so contacts read
/// from configuration are ordered by priority as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResourcesRepr")]
pub struct CrisisResources {
    /// Message shown above the contacts.
    pub warning: String,
    contacts: Vec<EmergencyContact>,
}

#[derive(Deserialize)]
struct ResourcesRepr {
    warning: String,
    contacts: Vec<EmergencyContact>,
}

impl From<ResourcesRepr> for CrisisResources {
    fn from(repr: ResourcesRepr) -> Self {
        Self::new(repr.warning, repr.contacts)
    }
}

impl CrisisResources {
    /// Create resources; contacts are ordered by priority, ties keep their
    /// given order.
    pub fn new(warning: impl Into<String>, contacts: Vec<EmergencyContact>) -> Self {
        let mut contacts = contacts;
        contacts.sort_by_key(|c| c.priority);
        Self { warning: warning.into(), contacts }
    }

    /// Vietnamese hotlines.
    pub fn vietnam() -> Self {
        Self::new(
            VIETNAM_WARNING,
            vec![
                EmergencyContact::new("111", "Tổng đài Bảo vệ trẻ em", "Miễn phí 24/7", 1),
                EmergencyContact::new("115", "Cấp cứu Y tế", "Khẩn cấp", 1),
                EmergencyContact::new(
                    "1900 636 976",
                    "Đường dây nóng Ngày Mai",
                    "Tư vấn tâm lý",
                    2,
                ),
            ],
        )
    }

    /// Contacts in display order.
    pub fn contacts(&self) -> &[EmergencyContact] {
        &self.contacts
    }
}

impl Default for CrisisResources {
    fn default() -> Self {
        Self::vietnam()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vietnam_hotlines_in_priority_order() {
        let resources = CrisisResources::vietnam();
        let numbers: Vec<_> = resources.contacts().iter().map(|c| c.number.as_str()).collect();

        assert_eq!(numbers, ["111", "115", "1900 636 976"]);
        assert!(resources.warning.starts_with("Mình nhận thấy"));
        assert!(resources.warning.ends_with("bên dưới."));
    }

    #[test]
    fn custom_contacts_are_sorted_stably() {
        let resources = CrisisResources::new(
            "help",
            vec![
                EmergencyContact::new("c", "C", "", 3),
                EmergencyContact::new("a", "A", "", 1),
                EmergencyContact::new("b", "B", "", 1),
            ],
        );
        let numbers: Vec<_> = resources.contacts().iter().map(|c| c.number.as_str()).collect();

        assert_eq!(numbers, ["a", "b", "c"]);
    }

    #[test]
    fn deserialized_contacts_are_sorted() {
        let json = r#"{
            "warning": "help",
            "contacts": [
                {"number": "c", "name": "C", "description": "", "priority": 3},
                {"number": "a", "name": "A", "description": "", "priority": 1}
            ]
        }"#;

        let resources: CrisisResources = serde_json::from_str(json).unwrap();
        let numbers: Vec<_> = resources.contacts().iter().map(|c| c.number.as_str()).collect();

        assert_eq!(numbers, ["a", "c"]);
    }

    #[test]
    fn serde_round_trip_keeps_order() {
        let resources = CrisisResources::vietnam();
        let json = serde_json::to_string(&resources).unwrap();

        assert_eq!(serde_json::from_str::<CrisisResources>(&json).unwrap(), resources);
    }
}
