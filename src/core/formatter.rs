//! Renders matched records into chat markup: `**bold**` labels, inline
//! anchors and `<br>` line breaks. Missing optional fields render as a
//! placeholder instead of failing.

use crate::domain::model::{
    non_blank, Department, Facility, FormattedResponse, HolidayInfo, MatchResult,
    NonTeachingMember, StaffRecord, SyllabusEntry, SyllabusLevel, SyllabusLink, SyllabusResource,
    TeachingRoster,
};
use regex::Regex;
use std::sync::OnceLock;

pub const LINE_BREAK: &str = "<br>";
pub const NOT_AVAILABLE: &str = "Not available";
pub const NA: &str = "N/A";

const LINK_STYLE: &str = "color:#3b82f6; text-decoration: underline;";

pub fn format(found: &MatchResult<'_>) -> FormattedResponse {
    match found {
        MatchResult::StaffMember(staff) => FormattedResponse::text(staff_member(staff)),
        MatchResult::Department(department) => FormattedResponse::text(department_text(department)),
        MatchResult::Syllabus(entry) => FormattedResponse::text(syllabus_text(entry)),
        MatchResult::Facility(facility) => FormattedResponse {
            text: facility_text(facility),
            map_embed: facility.map_embed.clone(),
            coordinates: facility.coordinates,
        },
        MatchResult::Holiday(holiday) => FormattedResponse::text(holiday_text(holiday)),
        MatchResult::TeachingStaff(rosters) => FormattedResponse::text(teaching_text(rosters)),
        MatchResult::NonTeachingStaff(members) => {
            FormattedResponse::text(non_teaching_text(members))
        }
    }
}

pub fn anchor(url: &str, label: &str) -> String {
    format!(
        "<a href='{}' target='_blank' style='{}'>{}</a>",
        url, LINK_STYLE, label
    )
}

fn link_markup(link: &SyllabusLink) -> String {
    match non_blank(Some(&link.url)) {
        Some(url) => anchor(url, &link.name),
        None => format!("{}: {}", link.name, NOT_AVAILABLE),
    }
}

fn or_placeholder<'a>(value: Option<&'a str>, placeholder: &'a str) -> &'a str {
    non_blank(value).unwrap_or(placeholder)
}

fn staff_member(staff: &StaffRecord) -> String {
    let mut text = format!(
        "**Staff Member:** {}{}",
        or_placeholder(Some(staff.name()), NA),
        LINE_BREAK
    );
    match staff {
        StaffRecord::Teaching { department, .. } => {
            text.push_str(&format!("Role: Teaching Staff{}", LINE_BREAK));
            text.push_str(&format!("Department: {}", or_placeholder(Some(department.as_str()), NA)));
        }
        StaffRecord::NonTeaching { role, .. } => {
            text.push_str(&format!("Role: {}{}", or_placeholder(role.as_deref(), NA), LINE_BREAK));
        }
    }
    text
}

fn department_text(department: &Department) -> String {
    let mut text = format!(
        "**Department:** {}{}",
        or_placeholder(Some(department.name.as_str()), NA),
        LINE_BREAK
    );
    text.push_str(&format!(
        "Location: {}{}",
        or_placeholder(department.location.as_deref(), NOT_AVAILABLE),
        LINE_BREAK
    ));

    match (department.head(), non_blank(department.hod_role.as_deref())) {
        (Some(head), Some(role)) => text.push_str(&format!("HOD: {} ({})", head, role)),
        (Some(head), None) => text.push_str(&format!("HOD: {}", head)),
        (None, _) => text.push_str(&format!("HOD: {}", NOT_AVAILABLE)),
    }
    text
}

fn syllabus_text(entry: &SyllabusEntry) -> String {
    let mut text = format!("**Syllabus:**{}", LINE_BREAK);
    match entry.resource() {
        SyllabusResource::Grouped(links) => {
            text.push_str(&format!("**{}**{}", entry.name, LINE_BREAK));
            for link in links {
                text.push_str(&link_markup(link));
                text.push_str(LINE_BREAK);
            }
        }
        SyllabusResource::Single(Some(url)) => {
            text.push_str(&format!(
                "**{}**: {}",
                entry.name,
                anchor(url, "Click here for Syllabus")
            ));
        }
        SyllabusResource::Single(None) => {
            text.push_str(&format!("**{}**: {}", entry.name, NOT_AVAILABLE));
        }
    }
    text
}

fn facility_text(facility: &Facility) -> String {
    format!(
        "**Facility:** {name}{br}Location: {location}{br}Timing: {timing}",
        name = or_placeholder(Some(facility.name.as_str()), NA),
        location = or_placeholder(facility.location.as_deref(), NOT_AVAILABLE),
        timing = or_placeholder(facility.timing.as_deref(), NOT_AVAILABLE),
        br = LINE_BREAK,
    )
}

fn holiday_text(holiday: &HolidayInfo) -> String {
    format!(
        "**Holiday Information:**{}{}",
        LINE_BREAK,
        or_placeholder(holiday.details.as_deref(), NOT_AVAILABLE)
    )
}

fn teaching_text(rosters: &[TeachingRoster]) -> String {
    let mut text = format!("**Teaching Staff:**{}", LINE_BREAK);
    for roster in rosters {
        let names = if roster.names.is_empty() {
            "No staff listed".to_string()
        } else {
            roster.names.join(", ")
        };
        text.push_str(&format!("- **{}:** {}{}", roster.department, names, LINE_BREAK));
    }
    text
}

fn non_teaching_text(members: &[NonTeachingMember]) -> String {
    let mut text = format!("**Non-Teaching Staff:**{}", LINE_BREAK);
    for member in members {
        text.push_str(&format!(
            "- {} ({}){}",
            or_placeholder(member.name.as_deref(), NA),
            or_placeholder(member.role.as_deref(), NA),
            LINE_BREAK
        ));
    }
    text
}

/// Every syllabus of one level in a single response.
pub fn render_syllabus_catalogue(level: SyllabusLevel, entries: &[SyllabusEntry]) -> FormattedResponse {
    let mut text = format!("**{} course syllabuses:**{}{}", level.short_label(), LINE_BREAK, LINE_BREAK);
    if entries.is_empty() {
        text.push_str(NOT_AVAILABLE);
        return FormattedResponse::text(text);
    }

    for entry in entries {
        match entry.resource() {
            SyllabusResource::Grouped(links) => {
                text.push_str(&format!("**{}**:{}", entry.name, LINE_BREAK));
                for link in links {
                    text.push_str(&link_markup(link));
                    text.push_str(LINE_BREAK);
                }
                text.push_str(LINE_BREAK);
            }
            SyllabusResource::Single(url) => {
                let target = url
                    .map(|u| anchor(u, "Click here for Syllabus"))
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string());
                text.push_str(&format!("**{}**: {}{}{}", entry.name, target, LINE_BREAK, LINE_BREAK));
            }
        }
    }
    FormattedResponse::text(text)
}

pub fn render_department_index(departments: &[Department]) -> FormattedResponse {
    let mut text = format!("**Departments:**{}", LINE_BREAK);
    if departments.is_empty() {
        text.push_str(NOT_AVAILABLE);
    }
    for (position, department) in departments.iter().enumerate() {
        text.push_str(&format!(
            "{}. {} ({}){}",
            position + 1,
            department.name,
            or_placeholder(department.location.as_deref(), NOT_AVAILABLE),
            LINE_BREAK
        ));
    }
    FormattedResponse::text(text)
}

pub fn render_facility_index(facilities: &[Facility]) -> FormattedResponse {
    let mut text = format!("**Facilities:**{}", LINE_BREAK);
    if facilities.is_empty() {
        text.push_str(NOT_AVAILABLE);
    }
    for facility in facilities {
        text.push_str(&format!(
            "- {}: {}, {}{}",
            or_placeholder(Some(facility.name.as_str()), NA),
            or_placeholder(facility.location.as_deref(), NOT_AVAILABLE),
            or_placeholder(facility.timing.as_deref(), NOT_AVAILABLE),
            LINE_BREAK
        ));
    }
    FormattedResponse::text(text)
}

fn anchor_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"<a\s+href=['"]([^'"]*)['"][^>]*>(.*?)</a>"#).ok())
        .as_ref()
}

/// Terminal rendering: breaks become newlines, anchors become `label (url)`
/// and bold markers are dropped.
pub fn to_plain_text(markup: &str) -> String {
    let linked = match anchor_pattern() {
        Some(pattern) => pattern.replace_all(markup, "$2 ($1)").into_owned(),
        None => markup.to_string(),
    };
    linked
        .replace(LINE_BREAK, "\n")
        .replace("**", "")
        .trim_end()
        .to_string()
}
