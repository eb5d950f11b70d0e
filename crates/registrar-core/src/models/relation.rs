//! Guardians and other contacts linked to students.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::individual::{Identified, SimpleIndividual};
use super::person::{Address, DepartureType, Name};
use super::wire::{has_any, present};

pub type BooleanList = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct SimpleRelation {
    #[serde(flatten)]
    pub individual: SimpleIndividual,
    pub reciprocal_relationship: String,
    pub lives_with: bool,
    pub receives_report_cards: bool,
    pub receives_feedback_forms: bool,
}

impl Identified for SimpleRelation {
    fn id(&self) -> &str {
        &self.individual.id
    }
}

/// A relation to a student who has left the school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct DepartedRelation {
    #[serde(flatten)]
    pub relation: SimpleRelation,
    pub departed: bool,
    pub departure_type: DepartureType,
}

impl Identified for DepartedRelation {
    fn id(&self) -> &str {
        &self.relation.individual.id
    }
}

pub type RelationList = BTreeMap<String, SimpleRelation>;

pub type RelationDepartureList = BTreeMap<String, DepartedRelation>;

/// An entry of `Relation::relations`, which holds either a current-relation
/// list or a departure list.
///
/// Entries carrying either departure field decode as `Departed` and must then
/// be a valid departure; all others decode as `Current`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(untagged)]
pub enum RelationEntry {
    Departed(DepartedRelation),
    Current(SimpleRelation),
}

impl RelationEntry {
    pub fn relation(&self) -> &SimpleRelation {
        match self {
            RelationEntry::Departed(departed) => &departed.relation,
            RelationEntry::Current(current) => current,
        }
    }

    pub fn departure(&self) -> Option<&DepartedRelation> {
        match self {
            RelationEntry::Departed(departed) => Some(departed),
            RelationEntry::Current(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for RelationEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if has_any(&value, &["departed", "departureType"]) {
            serde_json::from_value(value).map(RelationEntry::Departed)
        } else {
            serde_json::from_value(value).map(RelationEntry::Current)
        }
        .map_err(D::Error::custom)
    }
}

impl Identified for RelationEntry {
    fn id(&self) -> &str {
        &self.relation().individual.id
    }
}

impl From<SimpleRelation> for RelationEntry {
    fn from(relation: SimpleRelation) -> Self {
        RelationEntry::Current(relation)
    }
}

impl From<DepartedRelation> for RelationEntry {
    fn from(departed: DepartedRelation) -> Self {
        RelationEntry::Departed(departed)
    }
}

/// A family member or contact, with the students they are linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub has_current_student: bool,
    pub email: String,
    pub address: Address,
    pub name_obj: Name,
    pub name: String,
    #[serde(rename = "ID")]
    pub id: String,
    pub relations: BTreeMap<String, RelationEntry>,
    pub relation_classes: BooleanList,
    pub non_student_relations: RelationList,
    pub has_boarder: bool,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub cell_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub home_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub work_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "present")]
    pub affiliation: Option<String>,
    pub is_international_family: bool,
}

impl Relation {
    /// True when `relations` holds departure entries rather than current ones.
    pub fn is_departure_list(&self) -> bool {
        !self.relations.is_empty()
            && self
                .relations
                .values()
                .all(|entry| matches!(entry, RelationEntry::Departed(_)))
    }

    /// Students who receive report cards at this contact's address.
    pub fn report_card_recipients(&self) -> impl Iterator<Item = &SimpleRelation> {
        self.relations
            .values()
            .map(RelationEntry::relation)
            .filter(|r| r.receives_report_cards)
    }

    /// Preferred phone: cell, then home, then work
    pub fn phone(&self) -> Option<&str> {
        [&self.cell_phone, &self.home_phone, &self.work_phone]
            .into_iter()
            .filter_map(|phone| phone.as_deref())
            .find(|phone| !phone.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn relation_json(id: &str) -> serde_json::Value {
        json!({
            "ID": id,
            "name": "Jane Doe",
            "reciprocalRelationship": "Daughter",
            "livesWith": true,
            "receivesReportCards": true,
            "receivesFeedbackForms": false
        })
    }

    #[test]
    fn test_entry_without_departure_is_current() {
        let entry: RelationEntry = serde_json::from_value(relation_json("s1")).unwrap();
        assert!(matches!(entry, RelationEntry::Current(_)));
        assert_eq!(entry.id(), "s1");
        assert!(entry.departure().is_none());
    }

    #[test]
    fn test_entry_with_departure_is_departed() {
        let mut value = relation_json("s2");
        value["departed"] = json!(true);
        value["departureType"] = json!("graduated");
        let entry: RelationEntry = serde_json::from_value(value.clone()).unwrap();
        let departed = entry.departure().unwrap();
        assert!(departed.departed);
        assert_eq!(departed.departure_type, DepartureType::Graduated);
        assert_eq!(entry.relation().reciprocal_relationship, "Daughter");
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);
    }

    #[test]
    fn test_entry_with_bad_departure_type_is_rejected() {
        let mut value = relation_json("s2");
        value["departed"] = json!(true);
        value["departureType"] = json!("expelled");
        let err = serde_json::from_value::<RelationEntry>(value).unwrap_err();
        assert!(err.to_string().contains("expelled"), "{err}");
    }

    #[test]
    fn test_entry_with_partial_departure_is_rejected() {
        let mut value = relation_json("s2");
        value["departed"] = json!(true);
        assert!(serde_json::from_value::<RelationEntry>(value).is_err());

        let mut value = relation_json("s2");
        value["departureType"] = json!("graduated");
        assert!(serde_json::from_value::<RelationEntry>(value).is_err());
    }

    #[test]
    fn test_departed_relation_decodes_as_simple_relation() {
        let mut value = relation_json("s2");
        value["departed"] = json!(true);
        value["departureType"] = json!("dismissed");
        let simple: SimpleRelation = serde_json::from_value(value).unwrap();
        assert_eq!(simple.individual.name, "Jane Doe");
    }

    #[test]
    fn test_relation_queries() {
        let value = json!({
            "hasCurrentStudent": true,
            "email": "parent@example.org",
            "address": {"city": "Barnesville", "country": "USA", "postal": "43713",
                        "state": "OH", "street1": "1 Main St", "type": "home"},
            "nameObj": {"firstName": "Pat", "lastName": "Doe"},
            "name": "Pat Doe",
            "ID": "rel-1",
            "relations": {"s1": relation_json("s1")},
            "relationClasses": {"2026": true},
            "nonStudentRelations": {},
            "hasBoarder": false,
            "homePhone": "740-555-0100",
            "isInternationalFamily": false
        });
        let relation: Relation = serde_json::from_value(value).unwrap();
        assert!(!relation.is_departure_list());
        assert_eq!(relation.report_card_recipients().count(), 1);
        assert_eq!(relation.phone(), Some("740-555-0100"));
        assert_eq!(relation.relation_classes.get("2026"), Some(&true));
    }

    #[test]
    fn test_phone_skips_blank_numbers() {
        let relation = Relation {
            has_current_student: true,
            email: "parent@example.org".to_string(),
            address: serde_json::from_value(json!({
                "city": "Barnesville", "country": "USA", "postal": "43713",
                "state": "OH", "street1": "1 Main St", "type": "home"
            }))
            .unwrap(),
            name_obj: serde_json::from_value(json!({"firstName": "Pat", "lastName": "Doe"})).unwrap(),
            name: "Pat Doe".to_string(),
            id: "rel-1".to_string(),
            relations: BTreeMap::new(),
            relation_classes: BooleanList::new(),
            non_student_relations: RelationList::new(),
            has_boarder: false,
            cell_phone: Some("  ".to_string()),
            home_phone: None,
            work_phone: Some("740-555-0199".to_string()),
            affiliation: None,
            is_international_family: false,
        };
        assert_eq!(relation.phone(), Some("740-555-0199"));

        let relation = Relation {
            work_phone: Some(String::new()),
            ..relation
        };
        assert_eq!(relation.phone(), None);
    }
}
