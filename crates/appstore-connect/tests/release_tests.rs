mod common;

use appstore_connect::release::{
    CreateVersionOptions, EnsureVersionOptions, Localization, ReleaseNotes, ReviewDetails,
    SubmitForReviewOptions,
};
use appstore_connect::{ConnectError, PlatformType};
use httpmock::Method::{GET, PATCH, POST};
use httpmock::MockServer;
use serde_json::json;

const STATES: &str = "DEVELOPER_REMOVED_FROM_SALE,DEVELOPER_REJECTED,INVALID_BINARY,\
METADATA_REJECTED,PENDING_CONTRACT,PENDING_DEVELOPER_RELEASE,PREPARE_FOR_SUBMISSION,\
REJECTED,REMOVED_FROM_SALE,WAITING_FOR_EXPORT_COMPLIANCE";

#[tokio::test]
async fn test_get_version_id_cardinality() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[versionString]", "1.0.0")
                .query_param("filter[platform]", "IOS");
            then.status(200)
                .json_body(json!({"data": [{"type": "appStoreVersions", "id": "v-1"}]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[versionString]", "2.0.0");
            then.status(200).json_body(json!({"data": [
                {"type": "appStoreVersions", "id": "v-2"},
                {"type": "appStoreVersions", "id": "v-3"}
            ]}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[versionString]", "3.0.0");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;

    let client = common::client(&server);

    assert_eq!(
        client
            .get_version_id("123", "1.0.0", PlatformType::Ios)
            .await
            .unwrap(),
        "v-1"
    );

    let err = client
        .get_version_id("123", "2.0.0", PlatformType::Ios)
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::Cardinality { found: 2, .. }));

    let err = client
        .get_version_id("123", "3.0.0", PlatformType::Ios)
        .await
        .unwrap_err();
    assert!(matches!(err, ConnectError::Cardinality { found: 0, .. }));
}

#[tokio::test]
async fn test_ensure_version_exists_skips_existing_version() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/apps/123/appStoreVersions");
            then.status(200)
                .json_body(json!({"data": [{"type": "appStoreVersions", "id": "v-1"}]}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/appStoreVersions");
            then.status(201)
                .json_body(json!({"data": {"type": "appStoreVersions", "id": "v-new"}}));
        })
        .await;

    let client = common::client(&server);
    let id = client
        .ensure_version_exists("123", "1.0.0", PlatformType::Ios, &EnsureVersionOptions::default())
        .await
        .unwrap();

    assert_eq!(id, "v-1");
    create.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_ensure_version_exists_creates_missing_version() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/apps/123/appStoreVersions");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreVersions")
                .json_body(json!({"data": {
                    "type": "appStoreVersions",
                    "attributes": {
                        "platform": "IOS",
                        "versionString": "1.1.0",
                        "copyright": "",
                        "releaseType": "MANUAL",
                        "usesIdfa": false
                    },
                    "relationships": {
                        "app": {"data": {"type": "apps", "id": "123"}}
                    }
                }}));
            then.status(201)
                .json_body(json!({"data": {"type": "appStoreVersions", "id": "v-new"}}));
        })
        .await;

    let client = common::client(&server);
    let id = client
        .ensure_version_exists("123", "1.1.0", PlatformType::Ios, &EnsureVersionOptions::default())
        .await
        .unwrap();

    assert_eq!(id, "v-new");
    create.assert_async().await;
}

#[tokio::test]
async fn test_ensure_version_exists_renames_unreleased_version_on_conflict() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[versionString]", "1.1.0");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/appStoreVersions");
            then.status(409).json_body(json!({"errors": [{
                "status": "409",
                "detail": "You cannot create a new version of the App in the current state."
            }]}));
        })
        .await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[platform]", "IOS")
                .query_param("filter[appStoreState]", STATES);
            then.status(200)
                .json_body(json!({"data": [{"type": "appStoreVersions", "id": "v-old"}]}));
        })
        .await;
    let rename = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/v1/appStoreVersions/v-old")
                .json_body(json!({"data": {
                    "type": "appStoreVersions",
                    "id": "v-old",
                    "attributes": {"versionString": "1.1.0"}
                }}));
            then.status(200)
                .json_body(json!({"data": {"type": "appStoreVersions", "id": "v-old"}}));
        })
        .await;

    let client = common::client(&server);

    // Without the flag the conflict propagates
    let err = client
        .ensure_version_exists("123", "1.1.0", PlatformType::Ios, &EnsureVersionOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_conflict());
    assert!(err.to_string().contains("current state"));
    rename.assert_hits_async(0).await;

    let options = EnsureVersionOptions {
        update_version_string_if_unreleased_version_exists: true,
        ..Default::default()
    };
    let id = client
        .ensure_version_exists("123", "1.1.0", PlatformType::Ios, &options)
        .await
        .unwrap();

    assert_eq!(id, "v-old");
    lookup.assert_hits_async(1).await;
    rename.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_set_localizations_creates_missing_and_updates_existing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/appStoreVersions/v-1/appStoreVersionLocalizations");
            then.status(200).json_body(json!({"data": [{
                "type": "appStoreVersionLocalizations",
                "id": "loc-en",
                "attributes": {"locale": "en-US"}
            }]}));
        })
        .await;
    let create_de = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreVersionLocalizations")
                .json_body(json!({"data": {
                    "type": "appStoreVersionLocalizations",
                    "attributes": {"locale": "de-DE", "whatsNew": "Neu"},
                    "relationships": {
                        "appStoreVersion": {"data": {"type": "appStoreVersions", "id": "v-1"}}
                    }
                }}));
            then.status(201).json_body(json!({"data": {
                "type": "appStoreVersionLocalizations",
                "id": "loc-de"
            }}));
        })
        .await;
    let any_create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreVersionLocalizations")
                .body_contains("en-US");
            then.status(201).json_body(json!({"data": {
                "type": "appStoreVersionLocalizations",
                "id": "loc-dup"
            }}));
        })
        .await;
    let update_en = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/v1/appStoreVersionLocalizations/loc-en")
                .json_body(json!({"data": {
                    "type": "appStoreVersionLocalizations",
                    "id": "loc-en",
                    "attributes": {"whatsNew": "New"}
                }}));
            then.status(200).json_body(json!({"data": {
                "type": "appStoreVersionLocalizations",
                "id": "loc-en"
            }}));
        })
        .await;

    let client = common::client(&server);
    let localizations = vec![
        Localization::new("en-US").with_whats_new("New"),
        Localization::new("de-DE").with_whats_new("Neu"),
    ];
    client
        .set_version_localizations_by_version_id("v-1", &localizations)
        .await
        .unwrap();

    create_de.assert_hits_async(1).await;
    update_en.assert_hits_async(1).await;
    any_create.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_review_details_are_created_when_missing() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/appStoreVersions/v-1/appStoreReviewDetail");
            then.status(404).json_body(json!({"errors": [{"status": "404", "detail": "none"}]}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreReviewDetails")
                .json_body(json!({"data": {
                    "type": "appStoreReviewDetails",
                    "attributes": {"contactEmail": "review@example.com"},
                    "relationships": {
                        "appStoreVersion": {"data": {"type": "appStoreVersions", "id": "v-1"}}
                    }
                }}));
            then.status(201)
                .json_body(json!({"data": {"type": "appStoreReviewDetails", "id": "rd-1"}}));
        })
        .await;

    let client = common::client(&server);
    let details = ReviewDetails {
        contact_email: Some("review@example.com".to_string()),
        ..Default::default()
    };
    client
        .set_version_review_detail_attributes_by_version_id("v-1", &details)
        .await
        .unwrap();

    create.assert_async().await;
}

#[tokio::test]
async fn test_review_details_are_updated_when_present() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/appStoreVersions/v-1/appStoreReviewDetail");
            then.status(200)
                .json_body(json!({"data": {"type": "appStoreReviewDetails", "id": "rd-1"}}));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/v1/appStoreReviewDetails/rd-1")
                .body_contains("\"notes\":\"Use the demo account\"");
            then.status(200)
                .json_body(json!({"data": {"type": "appStoreReviewDetails", "id": "rd-1"}}));
        })
        .await;

    let client = common::client(&server);
    let details = ReviewDetails {
        notes: Some("Use the demo account".to_string()),
        ..Default::default()
    };
    client
        .set_version_review_detail_attributes_by_version_id("v-1", &details)
        .await
        .unwrap();

    update.assert_async().await;
}

#[tokio::test]
async fn test_submit_for_review_runs_requested_steps() {
    let server = MockServer::start_async().await;
    let release_type = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/v1/appStoreVersions/v-1")
                .json_body(json!({"data": {
                    "type": "appStoreVersions",
                    "id": "v-1",
                    "attributes": {"releaseType": "MANUAL"}
                }}));
            then.status(200)
                .json_body(json!({"data": {"type": "appStoreVersions", "id": "v-1"}}));
        })
        .await;
    let attach = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/v1/appStoreVersions/v-1/relationships/build")
                .json_body(json!({"data": {"type": "builds", "id": "build-1"}}));
            then.status(204);
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/appStoreVersions/v-1/appStoreVersionLocalizations");
            then.status(200).json_body(json!({"data": [{
                "type": "appStoreVersionLocalizations",
                "id": "loc-en",
                "attributes": {"locale": "en-US"}
            }]}));
        })
        .await;
    let notes = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/v1/appStoreVersionLocalizations/loc-en")
                .body_contains("Bug fixes");
            then.status(200).json_body(json!({"data": {
                "type": "appStoreVersionLocalizations",
                "id": "loc-en"
            }}));
        })
        .await;
    let submission = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreVersionSubmissions")
                .json_body(json!({"data": {
                    "type": "appStoreVersionSubmissions",
                    "relationships": {
                        "appStoreVersion": {"data": {"type": "appStoreVersions", "id": "v-1"}}
                    }
                }}));
            then.status(201).json_body(json!({"data": {
                "type": "appStoreVersionSubmissions",
                "id": "sub-1"
            }}));
        })
        .await;

    let client = common::client(&server);
    let options = SubmitForReviewOptions {
        auto_release_on_approval: Some(false),
        build_id: Some("build-1".to_string()),
        release_notes: Some(ReleaseNotes::from("Bug fixes")),
        ..Default::default()
    };
    client
        .submit_for_review_by_version_id("v-1", &options)
        .await
        .unwrap();

    release_type.assert_async().await;
    attach.assert_async().await;
    notes.assert_async().await;
    submission.assert_async().await;
}

#[tokio::test]
async fn test_submit_for_review_without_options_only_submits() {
    let server = MockServer::start_async().await;
    let patches = server
        .mock_async(|when, then| {
            when.method(PATCH);
            then.status(200);
        })
        .await;
    let submission = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/appStoreVersionSubmissions");
            then.status(201).json_body(json!({"data": {
                "type": "appStoreVersionSubmissions",
                "id": "sub-1"
            }}));
        })
        .await;

    let client = common::client(&server);
    client
        .submit_for_review_by_version_id("v-1", &SubmitForReviewOptions::default())
        .await
        .unwrap();

    patches.assert_hits_async(0).await;
    submission.assert_async().await;
}

#[tokio::test]
async fn test_submit_for_review_creates_missing_version() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[versionString]", "2.0.0")
                .query_param("filter[platform]", "IOS");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreVersions")
                .json_body(json!({"data": {
                    "type": "appStoreVersions",
                    "attributes": {
                        "platform": "IOS",
                        "versionString": "2.0.0",
                        "copyright": "2021 Example Inc.",
                        "releaseType": "AFTER_APPROVAL",
                        "usesIdfa": true
                    },
                    "relationships": {
                        "app": {"data": {"type": "apps", "id": "123"}}
                    }
                }}));
            then.status(201)
                .json_body(json!({"data": {"type": "appStoreVersions", "id": "v-new"}}));
        })
        .await;
    let submission = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreVersionSubmissions")
                .json_body(json!({"data": {
                    "type": "appStoreVersionSubmissions",
                    "relationships": {
                        "appStoreVersion": {"data": {"type": "appStoreVersions", "id": "v-new"}}
                    }
                }}));
            then.status(201).json_body(json!({"data": {
                "type": "appStoreVersionSubmissions",
                "id": "sub-1"
            }}));
        })
        .await;

    let client = common::client(&server);
    let options = SubmitForReviewOptions {
        auto_create_version: true,
        version_create_options: CreateVersionOptions {
            auto_release: true,
            copyright: "2021 Example Inc.".to_string(),
            uses_idfa: true,
        },
        ..Default::default()
    };
    client
        .submit_for_review("123", "2.0.0", PlatformType::Ios, &options)
        .await
        .unwrap();

    lookup.assert_hits_async(1).await;
    create.assert_hits_async(1).await;
    submission.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_submit_for_review_uses_existing_version_without_auto_create() {
    let server = MockServer::start_async().await;
    let lookup = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[versionString]", "2.0.0");
            then.status(200)
                .json_body(json!({"data": [{"type": "appStoreVersions", "id": "v-1"}]}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/appStoreVersions");
            then.status(201)
                .json_body(json!({"data": {"type": "appStoreVersions", "id": "v-new"}}));
        })
        .await;
    let submission = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v1/appStoreVersionSubmissions")
                .body_contains("\"id\":\"v-1\"");
            then.status(201).json_body(json!({"data": {
                "type": "appStoreVersionSubmissions",
                "id": "sub-1"
            }}));
        })
        .await;

    let client = common::client(&server);
    client
        .submit_for_review("123", "2.0.0", PlatformType::Ios, &SubmitForReviewOptions::default())
        .await
        .unwrap();

    lookup.assert_hits_async(1).await;
    create.assert_hits_async(0).await;
    submission.assert_hits_async(1).await;
}

#[tokio::test]
async fn test_submit_for_review_without_auto_create_fails_for_missing_version() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v1/apps/123/appStoreVersions");
            then.status(200).json_body(json!({"data": []}));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/appStoreVersions");
            then.status(201)
                .json_body(json!({"data": {"type": "appStoreVersions", "id": "v-new"}}));
        })
        .await;
    let submission = server
        .mock_async(|when, then| {
            when.method(POST).path("/v1/appStoreVersionSubmissions");
            then.status(201);
        })
        .await;

    let client = common::client(&server);
    let err = client
        .submit_for_review("123", "2.0.0", PlatformType::Ios, &SubmitForReviewOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, ConnectError::Cardinality { found: 0, .. }));
    create.assert_hits_async(0).await;
    submission.assert_hits_async(0).await;
}

#[tokio::test]
async fn test_attach_build_to_version_by_version_string() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v1/apps/123/appStoreVersions")
                .query_param("filter[versionString]", "1.0.0")
                .query_param("filter[platform]", "MAC_OS");
            then.status(200)
                .json_body(json!({"data": [{"type": "appStoreVersions", "id": "v-1"}]}));
        })
        .await;
    let attach = server
        .mock_async(|when, then| {
            when.method(PATCH)
                .path("/v1/appStoreVersions/v-1/relationships/build")
                .json_body(json!({"data": {"type": "builds", "id": "build-1"}}));
            then.status(204);
        })
        .await;

    let client = common::client(&server);
    client
        .attach_build_id_to_version("123", "1.0.0", PlatformType::MacOs, "build-1")
        .await
        .unwrap();

    attach.assert_async().await;
}
