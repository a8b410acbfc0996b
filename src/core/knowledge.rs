//! Read-only campus knowledge loaded once at startup.
//!
//! Lists are parsed record by record: a malformed facility is skipped with a
//! warning and the other facilities still load. A missing or unreadable
//! document yields an empty store, and every query then falls through to the
//! generalist answerer.

use crate::domain::model::{
    Department, Facility, HolidayInfo, NonTeachingMember, StaffRecord, StaffSection,
    SyllabusEntry, SyllabusLevel, SyllabusSection, TeachingRoster,
};
use crate::domain::ports::Storage;
use crate::utils::error::{AssistantError, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct KnowledgeStore {
    departments: Vec<Department>,
    teaching: Vec<TeachingRoster>,
    non_teaching: Vec<NonTeachingMember>,
    staff_directory: Vec<StaffRecord>,
    ug_syllabus: Vec<SyllabusEntry>,
    pg_syllabus: Vec<SyllabusEntry>,
    facilities: Vec<Facility>,
    holiday: Option<HolidayInfo>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnowledgeSummary {
    pub departments: usize,
    pub staff: usize,
    pub syllabuses: usize,
    pub facilities: usize,
    pub has_holidays: bool,
}

impl KnowledgeStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self> {
        let document: Value =
            serde_json::from_slice(bytes).map_err(|e| AssistantError::DataUnavailable {
                message: format!("knowledge document is not valid JSON: {}", e),
            })?;

        match document {
            Value::Object(sections) => Ok(Self::from_sections(&sections)),
            other => Err(AssistantError::DataUnavailable {
                message: format!(
                    "knowledge document must be a JSON object, found {}",
                    json_kind(&other)
                ),
            }),
        }
    }

    /// Reads `path` through `storage`; any failure degrades to an empty store.
    pub async fn load_or_empty<S: Storage>(storage: &S, path: &str) -> Self {
        let loaded = match storage.read_file(path).await {
            Ok(bytes) => Self::from_json_bytes(&bytes),
            Err(e) => Err(AssistantError::DataUnavailable {
                message: format!("cannot read '{}': {}", path, e),
            }),
        };

        match loaded {
            Ok(store) => {
                let summary = store.summary();
                tracing::info!(
                    "📚 Knowledge base loaded: {} departments, {} staff, {} syllabuses, {} facilities, holidays: {}",
                    summary.departments,
                    summary.staff,
                    summary.syllabuses,
                    summary.facilities,
                    summary.has_holidays
                );
                store
            }
            Err(e) => {
                tracing::warn!("⚠️ {}. Local answers are disabled; every query goes to the AI service.", e);
                Self::empty()
            }
        }
    }

    fn from_sections(sections: &Map<String, Value>) -> Self {
        let mut departments: Vec<Department> = records(sections.get("departments"), "departments");
        let before = departments.len();
        departments.retain(|d| !d.name.trim().is_empty());
        if departments.len() < before {
            tracing::warn!(
                "Skipped {} department(s) without a name",
                before - departments.len()
            );
        }

        let staff = sections.get("staff").and_then(|v| object(v, "staff"));
        let staff = StaffSection {
            teaching: rosters(staff.and_then(|s| s.get("teaching"))),
            non_teaching: records(
                staff.and_then(|s| s.get("non_teaching")),
                "staff.non_teaching",
            ),
        };

        let syllabuses = sections.get("syllabuses").and_then(|v| object(v, "syllabuses"));
        let syllabuses = SyllabusSection {
            ug_syllabus: records(
                syllabuses.and_then(|s| s.get("ug_syllabus")),
                "syllabuses.ug_syllabus",
            ),
            pg_syllabus: records(
                syllabuses.and_then(|s| s.get("pg_syllabus")),
                "syllabuses.pg_syllabus",
            ),
        };

        let holiday: Option<HolidayInfo> = section(sections.get("holiday_list"), "holiday_list");

        Self::new(
            departments,
            staff,
            syllabuses,
            records(sections.get("facilities"), "facilities"),
            holiday,
        )
    }

    pub fn new(
        departments: Vec<Department>,
        staff: StaffSection,
        syllabuses: SyllabusSection,
        facilities: Vec<Facility>,
        holiday: Option<HolidayInfo>,
    ) -> Self {
        let staff_directory = flatten_staff(&staff);
        Self {
            departments,
            teaching: staff.teaching,
            non_teaching: staff.non_teaching,
            staff_directory,
            ug_syllabus: syllabuses.ug_syllabus,
            pg_syllabus: syllabuses.pg_syllabus,
            facilities,
            holiday,
        }
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    /// Teaching staff first (department order), then non-teaching staff.
    pub fn staff_directory(&self) -> &[StaffRecord] {
        &self.staff_directory
    }

    pub fn teaching_rosters(&self) -> &[TeachingRoster] {
        &self.teaching
    }

    pub fn non_teaching_staff(&self) -> &[NonTeachingMember] {
        &self.non_teaching
    }

    pub fn syllabuses(&self, level: SyllabusLevel) -> &[SyllabusEntry] {
        match level {
            SyllabusLevel::Undergraduate => &self.ug_syllabus,
            SyllabusLevel::Postgraduate => &self.pg_syllabus,
        }
    }

    /// Undergraduate entries followed by postgraduate ones.
    pub fn all_syllabuses(&self) -> impl Iterator<Item = &SyllabusEntry> {
        self.ug_syllabus.iter().chain(self.pg_syllabus.iter())
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn holiday(&self) -> Option<&HolidayInfo> {
        self.holiday.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.departments.is_empty()
            && self.staff_directory.is_empty()
            && self.ug_syllabus.is_empty()
            && self.pg_syllabus.is_empty()
            && self.facilities.is_empty()
            && self.holiday.is_none()
    }

    pub fn summary(&self) -> KnowledgeSummary {
        KnowledgeSummary {
            departments: self.departments.len(),
            staff: self.staff_directory.len(),
            syllabuses: self.ug_syllabus.len() + self.pg_syllabus.len(),
            facilities: self.facilities.len(),
            has_holidays: self.holiday.is_some(),
        }
    }
}

fn section<T: DeserializeOwned + Default>(value: Option<&Value>, key: &str) -> T {
    match value {
        None | Some(Value::Null) => T::default(),
        Some(value) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
            tracing::warn!("⚠️ Ignoring malformed '{}' section: {}", key, e);
            T::default()
        }),
    }
}

fn object<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        Value::Null => None,
        other => {
            tracing::warn!(
                "⚠️ Ignoring '{}' section: expected an object, found {}",
                key,
                json_kind(other)
            );
            None
        }
    }
}

fn list<'a>(value: Option<&'a Value>, key: &str) -> &'a [Value] {
    match value {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(other) => {
            tracing::warn!(
                "⚠️ Ignoring '{}': expected a list, found {}",
                key,
                json_kind(other)
            );
            &[]
        }
    }
}

/// Malformed entries are skipped one at a time; their siblings still load.
fn records<T: DeserializeOwned>(value: Option<&Value>, key: &str) -> Vec<T> {
    list(value, key)
        .iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("⚠️ Skipping malformed '{}' entry #{}: {}", key, index, e);
                None
            }
        })
        .collect()
}

/// `staff.teaching` maps department to names, in document order.
fn rosters(value: Option<&Value>) -> Vec<TeachingRoster> {
    let departments = match value {
        Some(Value::Object(departments)) => departments,
        None | Some(Value::Null) => return Vec::new(),
        Some(other) => {
            tracing::warn!(
                "⚠️ Ignoring 'staff.teaching': expected an object, found {}",
                json_kind(other)
            );
            return Vec::new();
        }
    };

    departments
        .iter()
        .map(|(department, names)| {
            let key = format!("staff.teaching.{}", department);
            let names = list(Some(names), &key)
                .iter()
                .filter_map(|name| match name {
                    Value::String(name) => Some(name.clone()),
                    other => {
                        tracing::warn!("⚠️ Skipping {} in '{}'", json_kind(other), key);
                        None
                    }
                })
                .collect();
            TeachingRoster {
                department: department.clone(),
                names,
            }
        })
        .collect()
}

fn flatten_staff(staff: &StaffSection) -> Vec<StaffRecord> {
    let teaching = staff.teaching.iter().flat_map(|roster| {
        roster.names.iter().map(|name| StaffRecord::Teaching {
            name: name.clone(),
            department: roster.department.clone(),
        })
    });

    let non_teaching = staff.non_teaching.iter().filter_map(|member| {
        let name = member.name.as_deref().filter(|n| !n.trim().is_empty())?;
        Some(StaffRecord::NonTeaching {
            name: name.to_string(),
            role: member.role.clone(),
        })
    });

    teaching.chain(non_teaching).collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
