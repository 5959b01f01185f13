//! HTTP tests for the employee endpoints.

mod common;

use axum::Router;
use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{delete, get, post, put, test_app};

fn body(name: &str, email: &str, department: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "department": department,
        "position": "Analyst",
        "salary": 52000.0,
        "hireDate": "2024-03-01"
    })
}

async fn create(app: &Router, name: &str, email: &str, department: &str) -> i64 {
    let res = post(app, "/api/employees", body(name, email, department)).await;
    assert_eq!(res.status, StatusCode::CREATED, "{:?}", res.body);
    res.body["id"].as_i64().expect("id missing")
}

#[tokio::test]
async fn test_create_returns_location_and_camel_case() {
    let (app, _) = test_app(true);
    let res = post(&app, "/api/employees", body("Lena", "lena@example.com", "IT")).await;

    assert_eq!(res.status, StatusCode::CREATED);
    let id = res.body["id"].as_i64().expect("id missing");
    assert_eq!(res.location.as_deref(), Some(format!("/api/employees/{id}").as_str()));
    assert_eq!(res.body["hireDate"], json!("2024-03-01"));
    assert_eq!(res.body["isActive"], json!(true));
    assert!(res.body["createdAt"].is_string());
    assert_eq!(res.body["updatedAt"], Value::Null);

    let fetched = get(&app, &format!("/api/employees/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["email"], json!("lena@example.com"));
}

#[tokio::test]
async fn test_create_validation_details() {
    let (app, _) = test_app(true);
    let res = post(&app, "/api/employees", json!({"name": "", "email": "nope"})).await;

    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], json!("VALIDATION_ERROR"));
    let fields: Vec<&str> = res.body["details"]
        .as_array()
        .expect("details missing")
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["name", "email", "department", "hireDate"]);
}

#[tokio::test]
async fn test_create_duplicate_email_conflicts() {
    let (app, _) = test_app(true);
    create(&app, "Mia", "mia@example.com", "IT").await;
    let res = post(&app, "/api/employees", body("Mia Two", "mia@example.com", "IT")).await;
    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(res.body["code"], json!("DUPLICATE_EMAIL"));
}

#[tokio::test]
async fn test_get_missing_employee() {
    let (app, _) = test_app(true);
    let res = get(&app, "/api/employees/321").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
    assert_eq!(res.body["code"], json!("NOT_FOUND"));
}

#[tokio::test]
async fn test_update() {
    let (app, _) = test_app(true);
    let id = create(&app, "Noah", "noah@example.com", "IT").await;

    let mut changed = body("Noah Smith", "noah.smith@example.com", "Finance");
    changed["id"] = json!(id);
    let res = put(&app, &format!("/api/employees/{id}"), changed).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["name"], json!("Noah Smith"));
    assert_eq!(res.body["department"], json!("Finance"));
    assert!(res.body["updatedAt"].is_string());
}

#[tokio::test]
async fn test_update_id_mismatch_and_missing() {
    let (app, _) = test_app(true);
    let id = create(&app, "Olga", "olga@example.com", "IT").await;

    let mut mismatched = body("Olga", "olga@example.com", "IT");
    mismatched["id"] = json!(id + 1);
    let res = put(&app, &format!("/api/employees/{id}"), mismatched).await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.body["code"], json!("ID_MISMATCH"));

    let res = put(&app, "/api/employees/999", body("Ghost", "ghost@example.com", "IT")).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_email_taken_conflicts() {
    let (app, _) = test_app(true);
    create(&app, "Pia", "pia@example.com", "IT").await;
    let id = create(&app, "Quin", "quin@example.com", "IT").await;

    let res = put(
        &app,
        &format!("/api/employees/{id}"),
        body("Quin", "pia@example.com", "IT"),
    )
    .await;
    assert_eq!(res.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_is_soft() {
    let (app, _) = test_app(true);
    let id = create(&app, "Ravi", "ravi@example.com", "Sales").await;
    create(&app, "Sara", "sara@example.com", "IT").await;

    let res = delete(&app, &format!("/api/employees/{id}")).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], json!("Employee Ravi marked as inactive"));

    let list = get(&app, "/api/employees").await;
    let names: Vec<&str> = list
        .body
        .as_array()
        .expect("list is not an array")
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Sara"]);

    let fetched = get(&app, &format!("/api/employees/{id}")).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["isActive"], json!(false));

    let res = delete(&app, "/api/employees/999").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search() {
    let (app, _) = test_app(true);
    create(&app, "Tara Lin", "tara@example.com", "IT").await;
    create(&app, "Uma", "uma@linfield.org", "Sales").await;
    create(&app, "Vic", "vic@example.com", "Sales").await;

    let res = get(&app, "/api/employees/search?keyword=LIN").await;
    assert_eq!(res.status, StatusCode::OK);
    let names: Vec<&str> = res
        .body
        .as_array()
        .expect("results are not an array")
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Tara Lin", "Uma"]);
}

#[tokio::test]
async fn test_search_requires_keyword() {
    let (app, _) = test_app(true);
    for uri in ["/api/employees/search", "/api/employees/search?keyword=%20%20"] {
        let res = get(&app, uri).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(res.body["code"], json!("MISSING_KEYWORD"));
    }
}

#[tokio::test]
async fn test_departments() {
    let (app, _) = test_app(true);
    create(&app, "Wes", "wes@example.com", "Sales").await;
    create(&app, "Xia", "xia@example.com", "IT").await;
    create(&app, "Yan", "yan@example.com", "Sales").await;

    let res = get(&app, "/api/employees/departments").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body, json!(["IT", "Sales"]));
}
