use campus_assistant::core::answerer::APOLOGY;
use campus_assistant::domain::model::Category;
use campus_assistant::domain::ports::ConfigProvider;
use campus_assistant::{
    AssistantConfig, AssistantEngine, GeminiModel, KnowledgeStore, LocalStorage, ReplySource,
};
use httpmock::prelude::*;
use tempfile::TempDir;

const GENERATE_PATH: &str = "/v1beta/models/gemini-1.5-flash-latest:generateContent";

const CAMPUS_DATA: &str = r#"{
    "departments": [
        {"name": "Computer Science", "location": "Block A", "hod": "Dr. Rao", "hod_role": "Professor"},
        {"name": "Commerce", "location": "Block C", "hod_name": "Dr. Meena Sinha"}
    ],
    "staff": {
        "teaching": {"Physics": ["Anil Kumar", "Sunita Devi"], "Chemistry": ["Rakesh Verma"]},
        "non_teaching": [{"name": "Mohan Lal", "role": "Head Clerk"}]
    },
    "syllabuses": {
        "ug_syllabus": [{"name": "BSc Physics", "url": "http://example.com/physics.pdf"}],
        "pg_syllabus": [{"name": "MA History", "urls": [
            {"name": "Semester 1", "url": "http://example.com/h1.pdf"},
            {"name": "Semester 2", "url": "http://example.com/h2.pdf"}
        ]}]
    },
    "facilities": [
        {"name": "Canteen", "location": "Near main gate", "timing": "9 AM - 5 PM",
         "coords": {"lat": 25.61, "lng": 85.14}, "map_iframe": "<iframe src='https://maps.example.com/canteen'></iframe>"}
    ],
    "holiday_list": {"details": "Diwali: 1 Nov<br>Chhath: 7 Nov"}
}"#;

fn config(server: &MockServer) -> AssistantConfig {
    let mut config = AssistantConfig::default();
    config.generalist.api_key = Some("integration-key".to_string());
    config.generalist.base_url = server.base_url();
    config.generalist.timeout_seconds = 5;
    config
}

async fn engine_with_data(
    data: Option<&str>,
    config: &AssistantConfig,
) -> (TempDir, AssistantEngine<GeminiModel>) {
    let temp_dir = TempDir::new().unwrap();
    if let Some(data) = data {
        std::fs::write(temp_dir.path().join("data.json"), data).unwrap();
    }

    let storage = LocalStorage::new(temp_dir.path());
    let store = KnowledgeStore::load_or_empty(&storage, config.knowledge_path()).await;

    let generalist = config.generalist();
    let model = GeminiModel::new(generalist.api_key().unwrap(), generalist.model.clone())
        .with_base_url(generalist.base_url.clone());
    (temp_dir, AssistantEngine::from_config(config, store, model))
}

#[tokio::test]
async fn test_local_answers_never_call_the_ai_service() {
    let server = MockServer::start();
    let ai_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "unused"}]}}]
        }));
    });
    let config = config(&server);
    let (_dir, engine) = engine_with_data(Some(CAMPUS_DATA), &config).await;

    let cases = [
        ("where is the computer science department", Category::Department, "Block A"),
        ("syllabus for bsc physics", Category::Syllabus, "http://example.com/physics.pdf"),
        ("where is the canteen", Category::Facility, "9 AM - 5 PM"),
        ("holiday list please", Category::Holiday, "Diwali"),
        ("who are the non-teaching staff", Category::NonTeachingStaff, "Mohan Lal (Head Clerk)"),
        ("show the teaching staff", Category::TeachingStaff, "Anil Kumar, Sunita Devi"),
        ("is anil kumar available", Category::StaffMember, "Department: Physics"),
    ];
    for (query, category, needle) in cases {
        let reply = engine.reply(query).await.unwrap();
        assert_eq!(reply.source, ReplySource::Local(category), "{}", query);
        assert!(reply.response.text.contains(needle), "{}: {}", query, reply.response.text);
    }

    let facility = engine.reply("where is the canteen").await.unwrap().to_json();
    assert_eq!(facility["response"]["coordinates"]["lng"], 85.14);
    assert!(facility["response"]["mapEmbed"]
        .as_str()
        .unwrap()
        .contains("maps.example.com"));

    ai_mock.assert_hits(0);
}

#[tokio::test]
async fn test_unmatched_query_goes_to_ai_service() {
    let server = MockServer::start();
    let ai_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .query_param("key", "integration-key")
            .body_contains("campus assistant for Kisan College")
            .body_contains("User query: Who founded the college?");
        then.status(200).json_body(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "It was founded in 1950."}]}}]
        }));
    });
    let config = config(&server);
    let (_dir, engine) = engine_with_data(Some(CAMPUS_DATA), &config).await;

    let reply = engine.reply("Who founded the college?").await.unwrap();
    ai_mock.assert();
    assert_eq!(reply.source, ReplySource::Generalist);
    assert_eq!(reply.response.text, "It was founded in 1950.");
}

#[tokio::test]
async fn test_ai_service_failure_returns_apology() {
    let server = MockServer::start();
    let ai_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(503).body("overloaded");
    });
    let config = config(&server);
    let (_dir, engine) = engine_with_data(Some(CAMPUS_DATA), &config).await;

    let reply = engine.reply("what is the college ranking").await.unwrap();
    ai_mock.assert();
    assert_eq!(reply.source, ReplySource::GeneralistFallback);
    assert_eq!(reply.response.text, APOLOGY);
}

#[tokio::test]
async fn test_missing_knowledge_file_falls_through_to_ai_service() {
    let server = MockServer::start();
    let ai_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": "General answer"}]}}]
        }));
    });
    let config = config(&server);
    let (_dir, engine) = engine_with_data(None, &config).await;
    assert!(engine.store().is_empty());

    let reply = engine.reply("where is the computer science department").await.unwrap();
    assert_eq!(reply.source, ReplySource::Generalist);
    assert_eq!(reply.response.text, "General answer");
    ai_mock.assert_hits(1);
}

#[tokio::test]
async fn test_malformed_knowledge_file_degrades_to_empty_store() {
    let server = MockServer::start();
    let config = config(&server);
    let (_dir, engine) = engine_with_data(Some("{ not json"), &config).await;
    assert!(engine.store().is_empty());
}

#[tokio::test]
async fn test_greeting_and_empty_query_on_the_wire() {
    let server = MockServer::start();
    let ai_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200);
    });
    let config = config(&server);
    let (_dir, engine) = engine_with_data(Some(CAMPUS_DATA), &config).await;

    let greeting = engine.reply_json(&serde_json::json!({"query": "hey"})).await;
    assert_eq!(
        greeting,
        serde_json::json!({"response": {"text": "Hello! I am your college campus assistant. How can I help you today?"}})
    );

    let rejected = engine.reply_json(&serde_json::json!({"query": "   "})).await;
    assert_eq!(rejected, serde_json::json!({"error": "No query provided.", "status": 400}));

    ai_mock.assert_hits(0);
}
