use std::sync::Arc;

use actix_web::{App, test, web};
use chrono::NaiveDate;
use serde_json::Value;

use rust_brigade_dashboard::client::{DashboardApi, MemoryDashboardApi};
use rust_brigade_dashboard::models::activities::entities::{Activity, SubmissionRequirement};
use rust_brigade_dashboard::routes;
use rust_brigade_dashboard::runtime::clock::{Clock, FixedClock};
use rust_brigade_dashboard::services::day_activities::SnapshotStore;
use rust_brigade_dashboard::utils::{STUDENT_ID_HEADER, json_error_handler, query_error_handler};

fn day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

fn plan(id: &str, time: &str, requirement: SubmissionRequirement) -> Activity {
    Activity {
        id: id.to_string(),
        event_id: Some("camp".to_string()),
        title: format!("Plan {id}"),
        description: format!("Details for {id}"),
        date: day(),
        time: time.parse().unwrap(),
        end_time: None,
        requirement,
    }
}

async fn seeded_api() -> Arc<MemoryDashboardApi> {
    let api = Arc::new(MemoryDashboardApi::new());
    api.seed_student("stu-1", "Asha Rao").await;
    api.seed_activities([
        plan("reflection", "9:00 AM", SubmissionRequirement::Text),
        plan("assembly", "8:00 AM", SubmissionRequirement::None),
        plan("photos", "2:00 PM", SubmissionRequirement::File { size_limit_mb: Some(1) }),
    ])
    .await;
    api
}

macro_rules! init_app {
    ($api:expr, $clock:expr) => {{
        let api: Arc<dyn DashboardApi> = $api;
        let clock: Arc<dyn Clock> = $clock;
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new(api))
                .app_data(web::Data::new(clock))
                .app_data(web::Data::new(SnapshotStore::new()))
                .configure(routes::configure_day_activities_routes)
                .configure(routes::configure_dashboard_routes)
                .configure(routes::configure_submissions_routes)
                .configure(routes::configure_clock_routes)
                .configure(routes::configure_system_routes),
        )
        .await
    }};
}

#[actix_web::test]
async fn test_day_view_then_text_submission() {
    let api = seeded_api().await;
    let clock = Arc::new(FixedClock::at(day().and_hms_opt(10, 30, 0).unwrap()));
    let app = init_app!(api.clone(), clock);

    let req = test::TestRequest::get()
        .uri("/api/v1/day-activities?date=2025-06-10")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["phase"]["phase"], "active");
    let cards = body["data"]["activities"].as_array().unwrap();
    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0]["id"], "assembly");
    assert_eq!(cards[1]["id"], "reflection");
    assert_eq!(cards[1]["status"], "ongoing");
    assert_eq!(cards[1]["can_submit"], true);
    assert_eq!(cards[1]["show_submission_form"], true);
    assert_eq!(cards[2]["status"], "upcoming");

    let req = test::TestRequest::post()
        .uri("/api/v1/day-activities/reflection/submissions")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .set_json(serde_json::json!({ "kind": "text", "content": "  Learned a lot today  " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["content"], "Learned a lot today");
    assert_eq!(body["data"]["student_name"], "Asha Rao");

    // 快照已合并，再次提交被拒绝
    let req = test::TestRequest::post()
        .uri("/api/v1/day-activities/reflection/submissions")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .set_json(serde_json::json!({ "kind": "text", "content": "Again" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
    assert_eq!(api.submission_count().await, 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/day-activities")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let reflection = &body["data"]["activities"][1];
    assert_eq!(reflection["submitted"], true);
    assert_eq!(reflection["can_submit"], false);
    assert_eq!(reflection["submission"]["summary"], "Text: Learned a lot today...");
}

#[actix_web::test]
async fn test_preview_phase_hides_descriptions() {
    let api = seeded_api().await;
    let clock = Arc::new(FixedClock::at(day().and_hms_opt(7, 45, 0).unwrap()));
    let app = init_app!(api, clock);

    let req = test::TestRequest::get()
        .uri("/api/v1/day-activities")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["phase"]["label"], "Preview Mode");
    for card in body["data"]["activities"].as_array().unwrap() {
        assert!(card["description"].is_null());
        assert_eq!(card["show_submission_form"], false);
    }
}

#[actix_web::test]
async fn test_validation_and_identity_errors() {
    let api = seeded_api().await;
    let clock = Arc::new(FixedClock::at(day().and_hms_opt(10, 0, 0).unwrap()));
    let app = init_app!(api.clone(), clock);

    let req = test::TestRequest::post()
        .uri("/api/v1/day-activities/reflection/submissions")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .set_json(serde_json::json!({ "kind": "text", "content": "   " }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let req = test::TestRequest::post()
        .uri("/api/v1/day-activities/reflection/submissions")
        .set_json(serde_json::json!({ "kind": "text", "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let req = test::TestRequest::post()
        .uri("/api/v1/day-activities/reflection/submissions")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .set_json(serde_json::json!({ "kind": "essay", "content": "hello" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    assert_eq!(api.submission_count().await, 0);
}

fn upload_request(plan_id: &str, file_name: &str, content: &[u8]) -> test::TestRequest {
    let boundary = "----brigade-boundary";
    let mut body = format!(
        "--{boundary}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/plain\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    test::TestRequest::post()
        .uri(&format!("/api/v1/day-activities/{plan_id}/submissions/file"))
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        ))
        .set_payload(body)
}

#[actix_web::test]
async fn test_file_upload_submission() {
    let api = seeded_api().await;
    let clock = Arc::new(FixedClock::at(day().and_hms_opt(15, 0, 0).unwrap()));
    let app = init_app!(api.clone(), clock);

    let req = upload_request("photos", "notes.txt", b"hello world").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 201);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["submission_type"], "file");
    assert_eq!(body["data"]["file_name"], "notes.txt");
    assert_eq!(body["data"]["file_size"], 11);

    // 已提交后再次上传在读取文件前就被拒绝
    let req = upload_request("photos", "again.txt", b"second").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 409);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);
    assert_eq!(api.submission_count().await, 1);
}

#[actix_web::test]
async fn test_file_upload_rejected_before_body_when_not_file_plan_or_oversized() {
    let api = seeded_api().await;
    let clock = Arc::new(FixedClock::at(day().and_hms_opt(15, 0, 0).unwrap()));
    let app = init_app!(api.clone(), clock);

    let req = upload_request("reflection", "notes.txt", b"text").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);

    let oversized = vec![b'x'; 1024 * 1024 + 1];
    let req = upload_request("photos", "big.txt", &oversized).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .contains("1 MB size limit")
    );
    assert_eq!(api.submission_count().await, 0);
}

#[actix_web::test]
async fn test_dashboard_admin_list_and_clock() {
    let api = seeded_api().await;
    let clock = Arc::new(FixedClock::at(day().and_hms_opt(11, 0, 0).unwrap()));
    let app = init_app!(api.clone(), clock);

    let req = test::TestRequest::post()
        .uri("/api/v1/day-activities/reflection/submissions")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .set_json(serde_json::json!({ "kind": "text", "content": "Done" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status().as_u16(), 201);

    let req = test::TestRequest::get()
        .uri("/api/v1/dashboard")
        .insert_header((STUDENT_ID_HEADER, "stu-1"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["total_submissions"], 1);
    assert_eq!(body["data"]["required_plans"], 2);
    assert_eq!(body["data"]["completion_percent"], 50);
    assert_eq!(body["data"]["weekly"].as_array().unwrap().len(), 7);

    let req = test::TestRequest::get()
        .uri("/api/v1/submissions?search=asha&status=ALL&event_id=camp")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["matched"], 1);

    let req = test::TestRequest::get()
        .uri("/api/v1/submissions?status=late")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["matched"], 0);

    let req = test::TestRequest::get().uri("/api/v1/clock").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["phase"], "active");
    assert_eq!(body["data"]["now"], "2025-06-10T11:00:00");

    let req = test::TestRequest::get()
        .uri("/api/v1/system/health")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["upstream_backend"], "memory");
}
