//! The six category resolvers.
//!
//! Resolvers overlap (a department query can mention a facility keyword),
//! so they run in the fixed order of [`RESOLUTION_ORDER`] and the first
//! match wins. Every resolver receives the lower-cased query.

use crate::core::fuzzy::contains_close_phrase;
use crate::domain::model::{MatchResult, StaffRecord};
use crate::domain::ports::{ResolveContext, Resolver};

pub const DEPARTMENT_KEYWORDS: &[&str] = &["department", "hod", "head of department", "location"];
pub const SYLLABUS_KEYWORDS: &[&str] = &["syllabus", "course", "curriculum"];
pub const FACILITY_KEYWORDS: &[&str] = &[
    "facility",
    "canteen",
    "health centre",
    "map",
    "kisan college",
];
pub const HOLIDAY_KEYWORDS: &[&str] = &["holiday", "chutti", "vacation", "list of holidays"];
pub const TEACHING_STAFF_KEYWORDS: &[&str] = &["teaching staff", "faculty"];
pub const NON_TEACHING_STAFF_KEYWORDS: &[&str] =
    &["non-teaching staff", "non-faculty", "office staff"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    StaffMember,
    Department,
    Syllabus,
    Facility,
    Holiday,
    StaffList,
}

/// Resolution priority. Staff names carry no keyword signal, so they are
/// tried before every keyword-gated resolver.
pub const RESOLUTION_ORDER: [ResolverKind; 6] = [
    ResolverKind::StaffMember,
    ResolverKind::Department,
    ResolverKind::Syllabus,
    ResolverKind::Facility,
    ResolverKind::Holiday,
    ResolverKind::StaffList,
];

impl ResolverKind {
    pub fn build(self) -> Box<dyn Resolver> {
        match self {
            ResolverKind::StaffMember => Box::new(StaffMemberResolver),
            ResolverKind::Department => Box::new(DepartmentResolver),
            ResolverKind::Syllabus => Box::new(SyllabusResolver),
            ResolverKind::Facility => Box::new(FacilityResolver),
            ResolverKind::Holiday => Box::new(HolidayResolver),
            ResolverKind::StaffList => Box::new(StaffListResolver),
        }
    }
}

pub fn contains_any(query: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| query.contains(keyword))
}

pub struct StaffMemberResolver;

impl Resolver for StaffMemberResolver {
    fn name(&self) -> &'static str {
        "staff_member"
    }

    fn try_resolve<'s>(&self, query: &str, ctx: &ResolveContext<'s, '_>) -> Option<MatchResult<'s>> {
        ctx.store
            .staff_directory()
            .iter()
            .find(|staff: &&StaffRecord| {
                contains_close_phrase(
                    ctx.matcher,
                    query,
                    &staff.name().to_lowercase(),
                    ctx.staff_threshold,
                )
            })
            .map(MatchResult::StaffMember)
    }
}

pub struct DepartmentResolver;

impl DepartmentResolver {
    fn gate_open(query: &str, ctx: &ResolveContext<'_, '_>) -> bool {
        if contains_any(query, DEPARTMENT_KEYWORDS) {
            return true;
        }
        let names: Vec<String> = ctx
            .store
            .departments()
            .iter()
            .map(|d| d.name.to_lowercase())
            .collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        if query
            .split_whitespace()
            .any(|word| ctx.matcher.is_close_match(word, &name_refs, ctx.general_threshold))
        {
            return true;
        }

        // Multi-word names never score against a single token.
        names
            .iter()
            .any(|name| contains_close_phrase(ctx.matcher, query, name, ctx.general_threshold))
    }
}

impl Resolver for DepartmentResolver {
    fn name(&self) -> &'static str {
        "department"
    }

    fn try_resolve<'s>(&self, query: &str, ctx: &ResolveContext<'s, '_>) -> Option<MatchResult<'s>> {
        if !Self::gate_open(query, ctx) {
            return None;
        }

        ctx.store
            .departments()
            .iter()
            .find(|department| {
                [
                    Some(department.name.as_str()),
                    department.hod.as_deref(),
                    department.hod_name.as_deref(),
                ]
                .into_iter()
                .flatten()
                .any(|field| {
                    contains_close_phrase(
                        ctx.matcher,
                        query,
                        &field.to_lowercase(),
                        ctx.general_threshold,
                    )
                })
            })
            .map(MatchResult::Department)
    }
}

pub struct SyllabusResolver;

impl Resolver for SyllabusResolver {
    fn name(&self) -> &'static str {
        "syllabus"
    }

    fn try_resolve<'s>(&self, query: &str, ctx: &ResolveContext<'s, '_>) -> Option<MatchResult<'s>> {
        if !contains_any(query, SYLLABUS_KEYWORDS) {
            return None;
        }

        // Token against token: syllabus names are multi-word and queries partial.
        ctx.store
            .all_syllabuses()
            .filter(|entry| !entry.name.trim().is_empty())
            .find(|entry| {
                let name = entry.name.to_lowercase();
                let name_tokens: Vec<&str> = name.split_whitespace().collect();
                query.split_whitespace().any(|word| {
                    ctx.matcher
                        .is_close_match(word, &name_tokens, ctx.general_threshold)
                })
            })
            .map(MatchResult::Syllabus)
    }
}

pub struct FacilityResolver;

impl Resolver for FacilityResolver {
    fn name(&self) -> &'static str {
        "facility"
    }

    fn try_resolve<'s>(&self, query: &str, ctx: &ResolveContext<'s, '_>) -> Option<MatchResult<'s>> {
        if !contains_any(query, FACILITY_KEYWORDS) {
            return None;
        }

        ctx.store
            .facilities()
            .iter()
            .find(|facility| {
                contains_close_phrase(
                    ctx.matcher,
                    query,
                    &facility.name.to_lowercase(),
                    ctx.general_threshold,
                )
            })
            .map(MatchResult::Facility)
    }
}

pub struct HolidayResolver;

impl Resolver for HolidayResolver {
    fn name(&self) -> &'static str {
        "holiday"
    }

    fn try_resolve<'s>(&self, query: &str, ctx: &ResolveContext<'s, '_>) -> Option<MatchResult<'s>> {
        if !contains_any(query, HOLIDAY_KEYWORDS) {
            return None;
        }
        ctx.store.holiday().map(MatchResult::Holiday)
    }
}

pub struct StaffListResolver;

impl Resolver for StaffListResolver {
    fn name(&self) -> &'static str {
        "staff_list"
    }

    fn try_resolve<'s>(&self, query: &str, ctx: &ResolveContext<'s, '_>) -> Option<MatchResult<'s>> {
        // "non-teaching staff" contains "teaching staff", so the narrower gate goes first.
        let non_teaching = ctx.store.non_teaching_staff();
        if contains_any(query, NON_TEACHING_STAFF_KEYWORDS) && !non_teaching.is_empty() {
            return Some(MatchResult::NonTeachingStaff(non_teaching));
        }

        let teaching = ctx.store.teaching_rosters();
        if contains_any(query, TEACHING_STAFF_KEYWORDS) && !teaching.is_empty() {
            return Some(MatchResult::TeachingStaff(teaching));
        }
        None
    }
}
