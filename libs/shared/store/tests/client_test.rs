use assert_matches::assert_matches;
use serde_json::{json, Map, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shared_config::AppConfig;
use shared_store::{FetchQuery, HostedRecordStore, RecordStore, StoreError};

fn store_for(server: &MockServer) -> HostedRecordStore {
    HostedRecordStore::new(&AppConfig {
        record_store_url: server.uri(),
        record_store_api_key: "test-api-key".to_string(),
    })
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => panic!("expected object"),
    }
}

#[tokio::test]
async fn fetch_records_unwraps_the_list_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records/patient_c/fetch"))
        .and(body_partial_json(json!({
            "pagingInfo": { "limit": 100, "offset": 0 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [
                { "Id": 2, "first_name_c": "Ada" },
                { "Id": 1, "first_name_c": "Grace" }
            ]
        })))
        .mount(&server)
        .await;

    let records = store_for(&server)
        .fetch_records("patient_c", &FetchQuery::for_fields(&["Id", "first_name_c"]))
        .await
        .unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id(), Some(2));
    assert_eq!(records[0].str_of(&["first_name_c"]), "Ada");
}

#[tokio::test]
async fn fetch_records_surfaces_envelope_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records/patient_c/fetch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "collection unavailable"
        })))
        .mount(&server)
        .await;

    let result = store_for(&server)
        .fetch_records("patient_c", &FetchQuery::for_fields(&["Id"]))
        .await;

    assert_matches!(result, Err(StoreError::Rejected(msg)) if msg == "collection unavailable");
}

#[tokio::test]
async fn fetch_records_maps_http_failure_to_transport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records/doctor_c/fetch"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let result = store_for(&server)
        .fetch_records("doctor_c", &FetchQuery::for_fields(&["Id"]))
        .await;

    assert_matches!(result, Err(StoreError::Transport(_)));
}

#[tokio::test]
async fn get_record_by_id_treats_404_as_absent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/records/patient_c/42"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let record = store_for(&server)
        .get_record_by_id("patient_c", 42, &["Id"])
        .await
        .unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn create_record_submits_a_single_record_envelope() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records/appointment_c"))
        .and(body_partial_json(json!({
            "records": [{ "time_slot_c": "09:00" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{
                "success": true,
                "data": { "Id": 7, "time_slot_c": "09:00" }
            }]
        })))
        .mount(&server)
        .await;

    let created = store_for(&server)
        .create_record(
            "appointment_c",
            object(json!({ "time_slot_c": "09:00" })),
        )
        .await
        .unwrap();

    assert_eq!(created.id(), Some(7));
}

#[tokio::test]
async fn create_record_surfaces_field_errors_individually() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/records/patient_c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{
                "success": false,
                "errors": [
                    { "fieldLabel": "email_c", "message": "Invalid email" },
                    { "fieldLabel": "phone_c", "message": "Required" }
                ]
            }]
        })))
        .mount(&server)
        .await;

    let result = store_for(&server)
        .create_record("patient_c", Map::new())
        .await;

    assert_matches!(result, Err(StoreError::FieldValidation(errors)) => {
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "email_c");
    });
}

#[tokio::test]
async fn update_record_carries_the_immutable_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/api/records/doctor_c"))
        .and(body_partial_json(json!({
            "records": [{ "Id": 3, "name_c": "Sarah Johnson" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{
                "success": true,
                "data": { "Id": 3, "name_c": "Sarah Johnson" }
            }]
        })))
        .mount(&server)
        .await;

    let updated = store_for(&server)
        .update_record("doctor_c", 3, object(json!({ "name_c": "Sarah Johnson" })))
        .await
        .unwrap();
    assert_eq!(updated.id(), Some(3));
}

#[tokio::test]
async fn delete_record_confirms_single_record_deletion() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/records/appointment_c"))
        .and(body_partial_json(json!({ "RecordIds": [5] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{ "success": true }]
        })))
        .mount(&server)
        .await;

    assert!(store_for(&server)
        .delete_record("appointment_c", 5)
        .await
        .unwrap());
}

#[tokio::test]
async fn delete_record_reports_unconfirmed_results_as_false() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/records/appointment_c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "results": [{ "success": false, "message": "not found" }]
        })))
        .mount(&server)
        .await;

    assert!(!store_for(&server)
        .delete_record("appointment_c", 99)
        .await
        .unwrap());
}
