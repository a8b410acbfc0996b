use campus_assistant::core::formatter::format;
use campus_assistant::domain::model::{Category, MatchResult};
use campus_assistant::{KnowledgeStore, Orchestrator};

/// Departments, syllabuses and facilities only: no staff, no holiday record.
fn sparse_store() -> KnowledgeStore {
    KnowledgeStore::from_json_bytes(
        br#"{
            "departments": [
                {"name": "Computer Science", "location": "Block A", "hod": "Dr. Rao"},
                {"name": "Commerce", "location": "Block C", "hod_name": "Dr. Meena Sinha"},
                {"name": "Hindi"}
            ],
            "syllabuses": {
                "ug_syllabus": [{"name": "BSc Physics", "url": "http://example.com/physics.pdf"}],
                "pg_syllabus": [{"name": "MA History"}]
            },
            "facilities": [{"name": "Canteen"}, {"name": "Health Centre"}]
        }"#,
    )
    .unwrap()
}

fn full_store() -> KnowledgeStore {
    KnowledgeStore::from_json_bytes(
        br#"{
            "departments": [{"name": "Computer Science", "location": "Block A", "hod": "Dr. Rao"}],
            "staff": {
                "teaching": {"Chemistry": ["Rakesh Verma"]},
                "non_teaching": [{"name": "Mohan Lal", "role": "Clerk"}]
            }
        }"#,
    )
    .unwrap()
}

fn category_of(query: &str, store: &KnowledgeStore) -> Option<Category> {
    Orchestrator::default()
        .resolve(query, store)
        .map(|found| found.category())
}

#[test]
fn test_gating_keyword_without_matching_record_yields_nothing() {
    let store = sparse_store();
    let cases = [
        ("syllabus for mechanical engineering", Category::Syllabus),
        ("course list for law", Category::Syllabus),
        ("where is the swimming pool facility", Category::Facility),
        ("show me the map of the hostel", Category::Facility),
        ("hod of mathematics department", Category::Department),
        ("location of the zoology department", Category::Department),
        ("holiday list", Category::Holiday),
        ("vacation dates", Category::Holiday),
        ("faculty list", Category::TeachingStaff),
        ("office staff", Category::NonTeachingStaff),
        ("non-teaching staff", Category::NonTeachingStaff),
    ];
    for (query, category) in cases {
        let resolved = category_of(query, &store);
        assert_ne!(resolved, Some(category), "{}", query);
        assert_eq!(resolved, None, "{}", query);
    }
}

#[test]
fn test_exact_department_name_resolves_to_that_department() {
    let store = sparse_store();
    let orchestrator = Orchestrator::default();
    for department in store.departments() {
        for query in [department.name.clone(), department.name.to_uppercase()] {
            let found = orchestrator.resolve(&query, &store);
            assert_eq!(found, Some(MatchResult::Department(department)), "{}", query);
        }
    }
}

#[test]
fn test_exact_multi_word_department_name_opens_the_gate() {
    let store = KnowledgeStore::from_json_bytes(
        br#"{
            "departments": [
                {"name": "Computer Science", "hod": "Dr. Rao"},
                {"name": "Commerce", "hod_name": "Dr. Meena Sinha"},
                {"name": "Mathematics and Statistics"},
                {"name": "Physical Education and Sports", "location": "Sports Complex"}
            ]
        }"#,
    )
    .unwrap();
    let orchestrator = Orchestrator::default();
    for department in store.departments() {
        let query = department.name.to_lowercase();
        let found = orchestrator.resolve(&query, &store);
        assert_eq!(found, Some(MatchResult::Department(department)), "{}", query);
    }
}

#[test]
fn test_staff_member_outranks_department_keywords() {
    let store = full_store();
    for query in ["rakesh verma hod", "mohan lal department location"] {
        assert_eq!(category_of(query, &store), Some(Category::StaffMember), "{}", query);
    }
}

#[test]
fn test_first_qualifying_facility_wins() {
    // "centre" scores 0.615 against "canteen", and Canteen is listed first.
    let store = sparse_store();
    let found = Orchestrator::default().resolve("health centre timing", &store);
    assert!(matches!(found, Some(MatchResult::Facility(f)) if f.name == "Canteen"));
}

#[test]
fn test_resolution_is_idempotent() {
    let store = sparse_store();
    let orchestrator = Orchestrator::default();
    for query in [
        "where is the computer science department",
        "syllabus for ma history",
        "canteen",
        "who won the match",
    ] {
        let first = orchestrator.resolve(query, &store);
        let second = orchestrator.resolve(query, &store);
        assert_eq!(first, second, "{}", query);
        assert_eq!(
            first.as_ref().map(format),
            second.as_ref().map(format),
            "{}",
            query
        );
    }
}

#[test]
fn test_empty_store_resolves_nothing() {
    let store = KnowledgeStore::empty();
    for query in ["computer science", "syllabus", "canteen map", "holiday", "faculty"] {
        assert_eq!(category_of(query, &store), None, "{}", query);
    }
}
