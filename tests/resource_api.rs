//! Digital resource endpoints: upload, listing, download, removal.

mod helpers;

use axum::http::{StatusCode, header};

use helpers::{TestApp, TestResponse};

const BOUNDARY: &str = "libhub-test-boundary";

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, mime, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {mime}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &TestApp, token: &str, title: &str, department: &str) -> TestResponse {
    let body = multipart_body(
        &[
            ("title", title),
            ("category", "Notes"),
            ("department", department),
            ("description", "Unit 1 to 5"),
            ("tags", "sql, normalization"),
        ],
        Some(("dbms notes.pdf", "application/pdf", b"%PDF-1.4 test")),
    );
    app.send(
        "POST",
        "/digital-resources",
        &format!("multipart/form-data; boundary={BOUNDARY}"),
        body,
        Some(token),
    )
    .await
}

#[tokio::test]
async fn test_upload_and_download() {
    let app = TestApp::new().await;

    let created = upload(&app, &app.admin_token(), "DBMS Notes", "CSE").await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["title"], "DBMS Notes");
    assert_eq!(created.body["department"], "CSE");
    assert_eq!(created.body["fileName"], "dbms_notes.pdf");
    assert_eq!(created.body["fileSize"], 13);
    assert_eq!(created.body["tags"][1], "normalization");

    let id = created.body["id"].as_str().unwrap();
    let download = app
        .request(
            "GET",
            &format!("/digital-resources/{id}/download"),
            None,
            Some(&app.student_token()),
        )
        .await;
    assert_eq!(download.status, StatusCode::OK);
    assert_eq!(download.bytes, b"%PDF-1.4 test");
    assert_eq!(
        download.headers[header::CONTENT_TYPE].to_str().unwrap(),
        "application/pdf"
    );
    assert!(
        download.headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("dbms_notes.pdf")
    );

    let viewed = app
        .request(
            "GET",
            &format!("/digital-resources/{id}"),
            None,
            Some(&app.student_token()),
        )
        .await;
    assert_eq!(viewed.body["downloads"], 1);
    assert_eq!(viewed.body["views"], 1);
}

#[tokio::test]
async fn test_listing_filters_and_hides_inactive() {
    let app = TestApp::new().await;
    let token = app.admin_token();

    upload(&app, &token, "DBMS Notes", "CSE").await;
    let signals = upload(&app, &token, "Signals Primer", "ECE").await;

    let all = app
        .request("GET", "/digital-resources", None, Some(&app.student_token()))
        .await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["results"], 2);

    let ece = app
        .request(
            "GET",
            "/digital-resources?department=ECE",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(ece.body["results"], 1);
    assert_eq!(ece.body["records"][0]["title"], "Signals Primer");

    let search = app
        .request("GET", "/digital-resources?search=dbms", None, Some(&token))
        .await;
    assert_eq!(search.body["results"], 1);

    let id = signals.body["id"].as_str().unwrap();
    let removed = app
        .request(
            "DELETE",
            &format!("/digital-resources/{id}"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(removed.status, StatusCode::OK);

    let after = app
        .request("GET", "/digital-resources", None, Some(&token))
        .await;
    assert_eq!(after.body["results"], 1);

    let download = app
        .request(
            "GET",
            &format!("/digital-resources/{id}/download"),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(download.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejections() {
    let app = TestApp::new().await;

    let by_student = upload(&app, &app.student_token(), "DBMS Notes", "CSE").await;
    assert_eq!(by_student.status, StatusCode::FORBIDDEN);

    let bad_department = upload(&app, &app.admin_token(), "DBMS Notes", "ASTRO").await;
    assert_eq!(bad_department.status, StatusCode::BAD_REQUEST);

    let no_file = app
        .send(
            "POST",
            "/digital-resources",
            &format!("multipart/form-data; boundary={BOUNDARY}"),
            multipart_body(
                &[
                    ("title", "DBMS Notes"),
                    ("category", "Notes"),
                    ("department", "CSE"),
                    ("description", "Unit 1 to 5"),
                ],
                None,
            ),
            Some(&app.admin_token()),
        )
        .await;
    assert_eq!(no_file.status, StatusCode::BAD_REQUEST);
    assert_eq!(no_file.message(), "File is required");

    let listing = app
        .request("GET", "/digital-resources", None, Some(&app.admin_token()))
        .await;
    assert_eq!(listing.body["results"], 0);
}
