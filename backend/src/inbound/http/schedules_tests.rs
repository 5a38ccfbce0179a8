//! Tests for schedule lifecycle handlers.

use super::*;
use crate::domain::ports::GeneratedSchedule;
use crate::domain::{
    DoctorId, ErrorCode, Schedule, ScheduleExport, ScheduleStatus, SchedulingError,
    ShiftAssignment,
};
use crate::inbound::http::test_utils::{
    MockPorts, body_error, login_and_get_cookie, test_app_with,
};
use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::test as actix_test;
use chrono::{NaiveDate, TimeZone, Utc};
use rstest::rstest;
use serde_json::json;

fn march_schedule(status: ScheduleStatus) -> Schedule {
    let now = Utc
        .with_ymd_and_hms(2026, 2, 20, 8, 30, 0)
        .single()
        .expect("valid timestamp");
    let mut schedule = Schedule::draft(ScheduleId::random(), Month::March, 2026, now);
    schedule.transition(status, now);
    schedule
}

#[rstest]
#[case(json!({"month": "mar", "year": 2026}))]
#[case(json!({"month": 3, "year": 2026}))]
#[actix_web::test]
async fn generate_accepts_month_names_and_numbers(#[case] payload: serde_json::Value) {
    let schedule = march_schedule(ScheduleStatus::Generated);
    let day = NaiveDate::from_ymd_opt(2026, 3, 1).expect("valid date");
    let assignment = ShiftAssignment::new(schedule.id(), DoctorId::random(), day);
    let mut ports = MockPorts::default();
    ports
        .schedules
        .expect_generate()
        .withf(|request: &GenerateScheduleRequest| {
            request.month == Month::March && request.year == 2026 && request.bounds.is_none()
        })
        .times(1)
        .return_once(move |_| {
            Ok(GeneratedSchedule {
                schedule,
                assignments: vec![assignment],
            })
        });
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules/generate")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: GeneratedScheduleResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.schedule.status, "generated");
    assert_eq!(body.schedule.month, 3);
    assert_eq!(body.shifts.len(), 1);
    assert_eq!(body.shifts[0].date, "2026-03-01");
}

#[actix_web::test]
async fn generate_forwards_bounds() {
    let mut ports = MockPorts::default();
    ports
        .schedules
        .expect_generate()
        .withf(|request: &GenerateScheduleRequest| {
            request.bounds.as_deref()
                == Some(
                    &[BoundsRequest {
                        day: 4,
                        min_staff: 2,
                        max_staff: 3,
                    }][..],
                )
        })
        .times(1)
        .return_once(|_| Err(SchedulingError::GenerationTimeout.into()));
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules/generate")
            .cookie(cookie)
            .set_json(json!({
                "month": 3,
                "year": 2026,
                "bounds": [{"day": 4, "minStaff": 2, "maxStaff": 3}]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        body_error(response).await.code(),
        ErrorCode::GenerationTimeout
    );
}

#[actix_web::test]
async fn infeasible_generation_lists_the_days() {
    let mut ports = MockPorts::default();
    ports
        .schedules
        .expect_generate()
        .times(1)
        .return_once(|_| {
            Err(SchedulingError::InfeasibleConstraints { days: vec![7, 8] }.into())
        });
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules/generate")
            .cookie(cookie)
            .set_json(json!({"month": "March", "year": 2026}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let error = body_error(response).await;
    assert_eq!(error.details(), Some(&json!({"days": [7, 8]})));
}

#[rstest]
#[case(json!({"year": 2026}), "month")]
#[case(json!({"month": 3}), "year")]
#[case(json!({"month": "Thermidor", "year": 2026}), "month")]
#[actix_web::test]
async fn create_validates_the_period(#[case] payload: serde_json::Value, #[case] field: &str) {
    let mut ports = MockPorts::default();
    ports.schedules.expect_create().times(0);
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules")
            .cookie(cookie)
            .set_json(payload)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_error(response).await;
    assert_eq!(
        error.details().and_then(|d| d.get("field")),
        Some(&json!(field))
    );
}

#[actix_web::test]
async fn create_returns_the_draft() {
    let mut ports = MockPorts::default();
    ports
        .schedules
        .expect_create()
        .withf(|month: &Month, year: &i32| *month == Month::March && *year == 2026)
        .times(1)
        .return_once(|_, _| Ok(march_schedule(ScheduleStatus::Draft)));
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/schedules")
            .cookie(cookie)
            .set_json(json!({"month": "March", "year": 2026}))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: ScheduleResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.status, "draft");
    assert_eq!(body.month_name, "March");
}

#[actix_web::test]
async fn finalize_conflict_is_reported() {
    let mut ports = MockPorts::default();
    ports
        .schedules
        .expect_finalize()
        .times(1)
        .return_once(|_| Err(SchedulingError::conflict("draft schedules stay open").into()));
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let uri = format!("/api/v1/schedules/{}/finalize", ScheduleId::random());
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&uri)
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn export_serves_a_csv_attachment() {
    let mut ports = MockPorts::default();
    ports
        .schedules_query
        .expect_export()
        .times(1)
        .return_once(|_| {
            Ok(ScheduleExport {
                filename: "rota-2026-03.csv".to_owned(),
                csv: "Date,Weekday\r\n".to_owned(),
            })
        });
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/schedules/{}/export", ScheduleId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let header_value = |name| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    assert_eq!(
        header_value(header::CONTENT_TYPE).as_deref(),
        Some("text/csv; charset=utf-8")
    );
    let disposition = header_value(header::CONTENT_DISPOSITION).expect("disposition");
    assert!(disposition.contains("rota-2026-03.csv"), "{disposition}");
    let body = actix_test::read_body(response).await;
    assert_eq!(body, "Date,Weekday\r\n");
}

#[actix_web::test]
async fn list_returns_history() {
    let mut ports = MockPorts::default();
    ports
        .schedules_query
        .expect_list()
        .withf(|filter| *filter == ScheduleFilter::default())
        .times(1)
        .return_once(|_| {
            Ok(vec![
                march_schedule(ScheduleStatus::Finalized),
                march_schedule(ScheduleStatus::Failed),
            ])
        });
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/schedules")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body: Vec<ScheduleResponse> = actix_test::read_body_json(response).await;
    let statuses: Vec<&str> = body.iter().map(|s| s.status.as_str()).collect();
    assert_eq!(statuses, ["finalized", "failed"]);
}

#[actix_web::test]
async fn list_narrows_history_to_the_requested_period() {
    let mut ports = MockPorts::default();
    ports
        .schedules_query
        .expect_list()
        .withf(|filter| filter.month == Some(Month::March) && filter.year == Some(2026))
        .times(1)
        .return_once(|_| Ok(vec![march_schedule(ScheduleStatus::Generated)]));
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/schedules?month=mar&year=2026")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Vec<ScheduleResponse> = actix_test::read_body_json(response).await;
    assert_eq!(body.len(), 1);
}

#[actix_web::test]
async fn list_rejects_an_unknown_month_filter() {
    let mut ports = MockPorts::default();
    ports.schedules_query.expect_list().times(0);
    let app = actix_test::init_service(test_app_with(ports)).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/schedules?month=13")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = body_error(response).await;
    let code = error.details().and_then(|details| details.get("code"));
    assert_eq!(code.and_then(|v| v.as_str()), Some("invalid_month"));
}
