use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Department {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub hod: Option<String>,
    /// Older documents spell the head-of-department field `hod_name`.
    #[serde(default)]
    pub hod_name: Option<String>,
    #[serde(default)]
    pub hod_role: Option<String>,
}

impl Department {
    /// Head of department, preferring `hod` over its `hod_name` alias.
    pub fn head(&self) -> Option<&str> {
        non_blank(self.hod.as_deref()).or_else(|| non_blank(self.hod_name.as_deref()))
    }
}

/// One department's teaching roster, in document order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeachingRoster {
    pub department: String,
    pub names: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NonTeachingMember {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StaffRecord {
    Teaching { name: String, department: String },
    NonTeaching { name: String, role: Option<String> },
}

impl StaffRecord {
    pub fn name(&self) -> &str {
        match self {
            StaffRecord::Teaching { name, .. } | StaffRecord::NonTeaching { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyllabusLevel {
    Undergraduate,
    Postgraduate,
}

impl SyllabusLevel {
    pub fn short_label(&self) -> &'static str {
        match self {
            SyllabusLevel::Undergraduate => "UG",
            SyllabusLevel::Postgraduate => "PG",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyllabusLink {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyllabusEntry {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<SyllabusLink>>,
}

/// How a syllabus entry points at its documents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SyllabusResource<'a> {
    Single(Option<&'a str>),
    Grouped(&'a [SyllabusLink]),
}

impl SyllabusEntry {
    pub fn resource(&self) -> SyllabusResource<'_> {
        match &self.urls {
            Some(links) => SyllabusResource::Grouped(links),
            None => SyllabusResource::Single(non_blank(self.url.as_deref())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Facility {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub timing: Option<String>,
    #[serde(default, alias = "coords")]
    pub coordinates: Option<Coordinates>,
    #[serde(default, alias = "map_iframe")]
    pub map_embed: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HolidayInfo {
    #[serde(default)]
    pub details: Option<String>,
}

/// `null` reads as the field's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `staff.teaching` keeps the document's department order; it decides which
/// staff member wins a tie.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaffSection {
    pub teaching: Vec<TeachingRoster>,
    pub non_teaching: Vec<NonTeachingMember>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SyllabusSection {
    pub ug_syllabus: Vec<SyllabusEntry>,
    pub pg_syllabus: Vec<SyllabusEntry>,
}

/// The six resolution categories plus the two roster renderings of the
/// staff-list resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    StaffMember,
    Department,
    Syllabus,
    Facility,
    Holiday,
    TeachingStaff,
    NonTeachingStaff,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::StaffMember => "staff_member",
            Category::Department => "departments",
            Category::Syllabus => "syllabuses",
            Category::Facility => "facilities",
            Category::Holiday => "holiday_list",
            Category::TeachingStaff => "teaching_staff",
            Category::NonTeachingStaff => "non_teaching_staff",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A local match, borrowing the record from the knowledge store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult<'a> {
    StaffMember(&'a StaffRecord),
    Department(&'a Department),
    Syllabus(&'a SyllabusEntry),
    Facility(&'a Facility),
    Holiday(&'a HolidayInfo),
    TeachingStaff(&'a [TeachingRoster]),
    NonTeachingStaff(&'a [NonTeachingMember]),
}

impl MatchResult<'_> {
    pub fn category(&self) -> Category {
        match self {
            MatchResult::StaffMember(_) => Category::StaffMember,
            MatchResult::Department(_) => Category::Department,
            MatchResult::Syllabus(_) => Category::Syllabus,
            MatchResult::Facility(_) => Category::Facility,
            MatchResult::Holiday(_) => Category::Holiday,
            MatchResult::TeachingStaff(_) => Category::TeachingStaff,
            MatchResult::NonTeachingStaff(_) => Category::NonTeachingStaff,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub map_embed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
}

impl FormattedResponse {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    Greeting,
    Local(Category),
    Generalist,
    /// The generalist failed and the apology text was returned instead.
    GeneralistFallback,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatReply {
    pub source: ReplySource,
    pub response: FormattedResponse,
}

impl ChatReply {
    /// Wire shape: `{"response": {"text": ..., "mapEmbed": ..., "coordinates": ...}}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({ "response": &self.response })
    }
}

pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
