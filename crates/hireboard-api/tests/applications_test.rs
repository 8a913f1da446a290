//! Application API integration tests.
//!
//! Run with: `cargo test -p hireboard-api --test applications_test`

mod helpers;

use hireboard_core::{Application, ApplicationListing, Page, User};
use serde_json::json;
use uuid::Uuid;

use helpers::{setup_test_app, TestApp, PRINCIPAL_HEADER};

async fn apply(app: &TestApp, user: &User, job_id: Uuid) -> Application {
    let response = app
        .client()
        .post("/api/applications")
        .add_header(PRINCIPAL_HEADER, user.id.to_string())
        .json(&json!({
            "job_id": job_id,
            "resume_object_key": format!("{}/{}", user.id, Uuid::now_v7()),
        }))
        .await;
    assert_eq!(response.status_code(), 201);
    response.json()
}

#[tokio::test]
async fn test_candidate_applies_for_themselves() {
    let app = setup_test_app().await;

    let application = apply(&app, &app.candidate, app.jobs[0].id).await;
    assert_eq!(application.user_id, app.candidate.id);
    assert_eq!(application.job_id, app.jobs[0].id);
    assert_eq!(application.status.to_string(), "pending");
    assert_eq!(app.store.application_count(), 1);
}

#[tokio::test]
async fn test_application_ownership_is_enforced() {
    let app = setup_test_app().await;
    let client = app.client();
    let other = app.add_candidate();
    let candidate = app.candidate.id;

    // Naming someone else as owner
    let response = client
        .post("/api/applications")
        .add_header(PRINCIPAL_HEADER, candidate.to_string())
        .json(&json!({
            "job_id": app.jobs[0].id,
            "user_id": other.id,
            "resume_object_key": format!("{}/cv", candidate),
        }))
        .await;
    assert_eq!(response.status_code(), 403);

    // Someone else's resume
    let response = client
        .post("/api/applications")
        .add_header(PRINCIPAL_HEADER, candidate.to_string())
        .json(&json!({
            "job_id": app.jobs[0].id,
            "resume_object_key": format!("{}/cv", other.id),
        }))
        .await;
    assert_eq!(response.status_code(), 403);

    // Staff do not apply
    let response = client
        .post("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.hr.id.to_string())
        .json(&json!({
            "job_id": app.jobs[0].id,
            "resume_object_key": format!("{}/cv", app.hr.id),
        }))
        .await;
    assert_eq!(response.status_code(), 403);

    assert_eq!(app.store.application_count(), 0);
}

#[tokio::test]
async fn test_resume_key_cannot_climb_out_of_own_namespace() {
    let app = setup_test_app().await;
    let other = app.add_candidate();
    let candidate = app.candidate.id;

    let response = app
        .client()
        .post("/api/applications")
        .add_header(PRINCIPAL_HEADER, candidate.to_string())
        .json(&json!({
            "job_id": app.jobs[0].id,
            "resume_object_key": format!("{}/../{}/cv", candidate, other.id),
        }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "BAD_REQUEST");
    assert_eq!(app.store.application_count(), 0);
}

#[tokio::test]
async fn test_application_for_unknown_job_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.candidate.id.to_string())
        .json(&json!({
            "job_id": Uuid::now_v7(),
            "resume_object_key": format!("{}/cv", app.candidate.id),
        }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_candidate_listing_is_narrowed_to_own_applications() {
    let app = setup_test_app().await;
    let other = app.add_candidate();
    apply(&app, &app.candidate, app.jobs[0].id).await;
    apply(&app, &app.candidate, app.jobs[1].id).await;
    apply(&app, &other, app.jobs[0].id).await;

    // Asking for another candidate's applications still yields one's own
    let page: Page<ApplicationListing> = app
        .client()
        .get("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.candidate.id.to_string())
        .add_query_param("user_id", other.id.to_string())
        .await
        .json();
    assert_eq!(page.total, 2);
    assert!(page.items.iter().all(|a| a.user_id == app.candidate.id));

    let page: Page<ApplicationListing> = app
        .client()
        .get("/api/applications")
        .add_header(PRINCIPAL_HEADER, other.id.to_string())
        .await
        .json();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].user_id, other.id);
}

#[tokio::test]
async fn test_staff_see_all_applications_with_filters() {
    let app = setup_test_app().await;
    let other = app.add_candidate();
    apply(&app, &app.candidate, app.jobs[0].id).await;
    apply(&app, &other, app.jobs[0].id).await;
    apply(&app, &other, app.jobs[6].id).await;

    for staff in [&app.hr, &app.interviewer] {
        let page: Page<ApplicationListing> = app
            .client()
            .get("/api/applications")
            .add_header(PRINCIPAL_HEADER, staff.id.to_string())
            .await
            .json();
        assert_eq!(page.total, 3);
    }

    let page: Page<ApplicationListing> = app
        .client()
        .get("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.hr.id.to_string())
        .add_query_param("keyword", "designer")
        .await
        .json();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].job_title, "Designer Manager");

    let page: Page<ApplicationListing> = app
        .client()
        .get("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.hr.id.to_string())
        .add_query_param("user_id", other.id.to_string())
        .add_query_param("status", "pending")
        .await
        .json();
    assert_eq!(page.total, 2);

    let page: Page<ApplicationListing> = app
        .client()
        .get("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.hr.id.to_string())
        .add_query_param("status", "accepted")
        .await
        .json();
    assert_eq!(page.total, 0);
}

#[tokio::test]
async fn test_job_scoped_listing() {
    let app = setup_test_app().await;
    apply(&app, &app.candidate, app.jobs[0].id).await;
    apply(&app, &app.candidate, app.jobs[1].id).await;

    let page: Page<ApplicationListing> = app
        .client()
        .get(&format!("/api/jobs/{}/applications", app.jobs[1].id))
        .add_header(PRINCIPAL_HEADER, app.interviewer.id.to_string())
        .await
        .json();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].job_id, app.jobs[1].id);

    let response = app
        .client()
        .get(&format!("/api/jobs/{}/applications", Uuid::now_v7()))
        .add_header(PRINCIPAL_HEADER, app.interviewer.id.to_string())
        .await;
    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_deleting_a_job_removes_its_applications() {
    let app = setup_test_app().await;
    apply(&app, &app.candidate, app.jobs[2].id).await;
    apply(&app, &app.candidate, app.jobs[3].id).await;

    let response = app
        .client()
        .delete(&format!("/api/jobs/{}", app.jobs[2].id))
        .add_header(PRINCIPAL_HEADER, app.hr.id.to_string())
        .await;
    assert_eq!(response.status_code(), 204);

    let page: Page<ApplicationListing> = app
        .client()
        .get("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.candidate.id.to_string())
        .await
        .json();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].job_id, app.jobs[3].id);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/applications")
        .add_header(PRINCIPAL_HEADER, app.candidate.id.to_string())
        .json(&json!({ "job_id": 7, "resume_object_key": "x" }))
        .await;
    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["code"], "INVALID_INPUT");
}
