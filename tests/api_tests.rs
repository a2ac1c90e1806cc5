mod common;

use actix_web::http::StatusCode;
use actix_web::http::header;
use actix_web::{App, test, web};
use catalog_api::server;
use serde_json::{Value, json};
use tempfile::TempDir;

#[actix_web::test]
async fn manufacturer_crud_round_trip() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/manufacturers/")
            .set_json(json!({ "name": "Acme Instruments" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_i64().unwrap();
    assert!(id > 0);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/manufacturers/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "Acme Instruments");
    assert_eq!(body["logo_path"], Value::Null);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/manufacturers/{id}"))
            .set_json(json!({ "name": "Acme Labs" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/manufacturers/").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["name"], "Acme Labs");

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/manufacturers/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/manufacturers/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_manufacturer_requires_name() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/manufacturers/")
            .set_json(json!({ "name": "   " }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // nothing was created
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/manufacturers/").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn mutating_missing_manufacturer_is_not_found() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/manufacturers/999")
            .set_json(json!({ "name": "Ghost" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/manufacturers/999")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn equipment_listing_filters_by_manufacturer() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/manufacturers/")
            .set_json(json!({ "name": "Acme" }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let mid = body["id"].as_i64().unwrap();

    for (name, model, owner) in [
        ("Spectrometer", "SPX-900", Some(mid)),
        ("Generator", "GEN-5", None),
    ] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/equipments/")
                .set_json(json!({ "name": name, "model": model, "manufacturer_id": owner }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/equipments/?manufacturer_id={mid}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["model"], "SPX-900");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/equipments/").to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn create_equipment_requires_name_and_model() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/equipments/")
            .set_json(json!({ "name": "Spectrometer", "model": "" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn file_listing_validates_and_filters_kind() {
    let dir = TempDir::new().unwrap();
    let state = common::state(&dir);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/equipments/")
            .set_json(json!({ "name": "Spectrometer", "model": "SPX-900" }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let eid = body["id"].as_i64().unwrap();
    let eid_s = eid.to_string();

    for (kind, filename, owner) in [
        ("firmware", "fw-1.0.bin", Some(eid_s.as_str())),
        ("document", "manual.pdf", None),
    ] {
        let mut parts: Vec<(&str, Option<&str>, &[u8])> = vec![
            ("type", None, kind.as_bytes()),
            ("file", Some(filename), b"payload"),
        ];
        if let Some(owner) = owner {
            parts.insert(0, ("equipment_id", None, owner.as_bytes()));
        }
        let resp =
            test::call_service(&app, common::multipart_request("/files/", &parts).to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/files/?type=firmware")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["type"], "firmware");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/files/?equipment_id={eid}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["equipment_id"].as_i64().unwrap(), eid);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/files/?type=bogus")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn file_download_streams_and_counts_separately() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        common::multipart_request(
            "/files/",
            &[
                ("name", None, b"controller firmware"),
                ("type", None, b"firmware"),
                ("file", Some("fw-2.1.bin"), b"firmware image bytes"),
            ],
        )
        .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_i64().unwrap();

    // GET streams the stored bytes as an attachment
    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/files/{id}/download"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("attachment"));
    let bytes = test::read_body(resp).await;
    assert_eq!(&bytes[..], b"firmware image bytes");

    // GET does not increment; only the explicit POST does
    for expected in 1..=3 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/files/{id}/download"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["download_count"].as_i64().unwrap(), expected);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/files/{id}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["download_count"].as_i64().unwrap(), 3);
    assert_eq!(body["name"], "controller firmware");
}

#[actix_web::test]
async fn deleting_file_removes_row_and_bytes() {
    let dir = TempDir::new().unwrap();
    let state = common::state(&dir);
    let content_dir = state.content_dir.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        common::multipart_request(
            "/files/",
            &[
                ("type", None, b"document"),
                ("file", Some("manual.pdf"), b"pdf bytes"),
            ],
        )
        .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_i64().unwrap();
    let file_path = body["file_path"].as_str().unwrap().to_string();
    assert!(std::path::Path::new(&file_path).exists());

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/files/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/files/{id}"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(!std::path::Path::new(&file_path).exists());
    assert_eq!(common::content_file_count(&content_dir), 0);
}

#[actix_web::test]
async fn file_metadata_update_is_partial_and_validated() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        common::multipart_request(
            "/files/",
            &[
                ("type", None, b"firmware"),
                ("file", Some("fw.bin"), b"bytes"),
            ],
        )
        .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let id = body["id"].as_i64().unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/files/{id}"))
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/files/{id}"))
            .set_json(json!({ "type": "bogus" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/files/{id}"))
            .set_json(json!({ "name": "renamed", "type": "document" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/files/{id}"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["name"], "renamed");
    assert_eq!(body["type"], "document");

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/files/999")
            .set_json(json!({ "name": "ghost" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_returns_per_entity_result_lists() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/manufacturers/")
            .set_json(json!({ "name": "Acme Instruments" }))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    let mid = body["id"].as_i64().unwrap();

    for (name, model) in [("Spectrometer", "SPX-900"), ("Generator", "GEN-5")] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/equipments/")
                .set_json(json!({ "name": name, "model": model, "manufacturer_id": mid }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // a model substring hits exactly one equipment and no manufacturer
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/search/?q=SPX").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["manufacturers"].as_array().unwrap().is_empty());
    let hits = body["equipments"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["model"], "SPX-900");

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/search/manufacturers?q=Acme")
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/search/equipments?q=GEN")
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    // missing or empty term is rejected
    let resp = test::call_service(&app, test::TestRequest::get().uri("/search/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/search/?q=%20").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn stats_reflect_stored_rows() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/manufacturers/")
            .set_json(json!({ "name": "Acme" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/equipments/")
            .set_json(json!({ "name": "Spectrometer", "model": "SPX-900" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let mut file_id = 0;
    for (kind, filename) in [("firmware", "fw.bin"), ("document", "manual.pdf")] {
        let resp = test::call_service(
            &app,
            common::multipart_request(
                "/files/",
                &[
                    ("type", None, kind.as_bytes()),
                    ("file", Some(filename), b"payload"),
                ],
            )
            .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(resp).await;
        file_id = body["id"].as_i64().unwrap();
    }
    for _ in 0..2 {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/files/{file_id}/download"))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/admin/stats").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total_manufacturers"], 1);
    assert_eq!(body["total_equipments"], 1);
    assert_eq!(body["total_files"], 2);
    assert_eq!(body["total_downloads"], 2);
    assert_eq!(body["files_by_type"]["firmware"], 1);
    assert_eq!(body["files_by_type"]["document"], 1);
}

#[actix_web::test]
async fn admin_user_routes_are_unimplemented() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/admin/users").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/admin/users/5")
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
    let resp = test::call_service(
        &app,
        test::TestRequest::delete().uri("/admin/users/5").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_IMPLEMENTED);
}

#[actix_web::test]
async fn generic_upload_and_delete() {
    let dir = TempDir::new().unwrap();
    let state = common::state(&dir);
    let content_dir = state.content_dir.clone();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(
        &app,
        common::multipart_request("/upload", &[("file", Some("notes.txt"), b"free-floating")])
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    let file_path = body["file_path"].as_str().unwrap().to_string();
    assert!(std::path::Path::new(&file_path).exists());
    assert_eq!(common::content_file_count(&content_dir), 1);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/upload/notes.txt")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!std::path::Path::new(&file_path).exists());

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/upload/notes.txt")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // traversal attempts are rejected before touching the filesystem
    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri("/upload/%2E%2E%2Fsecret")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn root_route_responds() {
    let dir = TempDir::new().unwrap();
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(common::state(&dir)))
            .configure(server::configure_app),
    )
    .await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
