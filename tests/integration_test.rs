//! End-to-end batches through `Notifier` into an in-memory sink.

use vault_notify::{
    BatchError, DecodeErrorKind, NotificationPolicy, Notifier, NotifierConfig, VecSink,
};

const SECRET_GET_OK: &str = r#"{
    "time": "2021-01-05T14:22:31.1234567Z",
    "category": "AuditEvent",
    "operationName": "SecretGet",
    "resultType": "Success",
    "correlationId": "8f1c1a9e-3e4b-4d55-9c1a-0b7e3a6f2d11",
    "callerIpAddress": "203.0.113.7",
    "identity": {"claim": {
        "http://schemas.microsoft.com/identity/claims/objectidentifier": "b2c3d4e5",
        "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/upn": "alice@contoso.com",
        "appid": "04b07795-8ddb-461a-bbee-02f9e1bf7b46"
    }},
    "properties": {
        "id": "https://kv-prod.vault.azure.net/secrets/db-password/0123456789abcdef",
        "clientInfo": "azsdk-net-Security.KeyVault.Secrets/4.1.0",
        "httpStatusCode": 200,
        "requestUri": "https://kv-prod.vault.azure.net/secrets/db-password/?api-version=7.1",
        "isAccessPolicyMatch": true
    },
    "resourceId": "/SUBSCRIPTIONS/0000/RESOURCEGROUPS/RG/PROVIDERS/MICROSOFT.KEYVAULT/VAULTS/KV-PROD",
    "operationVersion": "7.1",
    "resultSignature": "OK",
    "durationMs": 12
}"#;

const SECRET_GET_FAILED: &str = r#"{
    "time": "2021-01-05T14:22:35Z",
    "operationName": "SecretGet",
    "resultType": "Failed",
    "callerIpAddress": "198.51.100.23"
}"#;

const NEAR_EXPIRY: &str = r#"{
    "id": "1d3a9c50-6a3e-4a0e-b0f5-2f8a8d7b1c22",
    "topic": "/subscriptions/0000/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv1",
    "subject": "api-key",
    "eventType": "Microsoft.KeyVault.SecretNearExpiry",
    "data": "{\"Id\":\"https://kv1.vault.azure.net/secrets/api-key/v2\",\"VaultName\":\"kv1\",\"ObjectType\":\"Secret\",\"ObjectName\":\"api-key\",\"Version\":\"v2\",\"NBF\":1600000000,\"EXP\":1700000000}",
    "dataVersion": "1",
    "metadataVersion": "1",
    "eventTime": "2023-11-01T00:00:00Z"
}"#;

const NEW_VERSION: &str = r#"{
    "id": "2e4b0d61-7b4f-4b1f-81a6-3a9b9e8c2d33",
    "topic": "/subscriptions/0000/resourceGroups/rg/providers/Microsoft.KeyVault/vaults/kv1",
    "subject": "x",
    "eventType": "Microsoft.KeyVault.SecretNewVersionCreated",
    "data": "{\"VaultName\":\"kv1\",\"ObjectType\":\"Secret\",\"ObjectName\":\"x\",\"Version\":\"v1\"}",
    "eventTime": "2021-01-05T14:22:31Z"
}"#;

fn audit_payload(records: &[&str]) -> String {
    format!(r#"{{"Records": [{}]}}"#, records.join(","))
}

fn event_payload(events: &[&str]) -> String {
    format!("[{}]", events.join(","))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn mixed_batch_dispatches_audits_then_events() {
    init_tracing();

    let payloads = vec![
        event_payload(&[NEW_VERSION]),
        audit_payload(&[SECRET_GET_OK, SECRET_GET_FAILED]),
        event_payload(&[NEAR_EXPIRY]),
        r#"{"kind": "heartbeat"}"#.to_string(),
    ];
    let notifier = Notifier::new(
        NotifierConfig::new().with_tenant_domain("contoso.onmicrosoft.com"),
    );
    let sink = VecSink::new();

    let report = notifier.run("partition-0/seq-42", &payloads, &sink).unwrap();
    assert_eq!(report.audit_records, 2);
    assert_eq!(report.resource_events, 2);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.delivered, 3);
    assert_eq!(report.sink_failures, 0);

    let messages = sink.into_vec();
    assert_eq!(messages.len(), 3);

    let audit = &messages[0];
    assert_eq!(audit.summary, "A new key vault audit event occurred");
    let header = &audit.header().unwrap().fields[0];
    assert_eq!(
        header.value,
        "<https://portal.azure.com/#@contoso.onmicrosoft.com/resource/SUBSCRIPTIONS/0000/RESOURCEGROUPS/RG/PROVIDERS/MICROSOFT.KEYVAULT/VAULTS/KV-PROD|kv-prod>"
    );
    let body = audit.body().unwrap();
    assert_eq!(body.get("Who"), Some("alice@contoso.com[b2c3d4e5]"));
    assert_eq!(body.get("Time"), Some("2021-01-05 14:22:31 UTC"));
    assert_eq!(body.get("Name"), Some("db-password"));
    assert_eq!(body.get("IP"), Some("203.0.113.7"));

    let first_event = messages[1].body().unwrap();
    assert_eq!(first_event.fields.len(), 5);
    assert_eq!(
        first_event.get("Type"),
        Some("Microsoft.KeyVault.SecretNewVersionCreated")
    );

    let second_event = messages[2].body().unwrap();
    assert_eq!(second_event.fields.len(), 7);
    assert_eq!(
        second_event.get("Name"),
        Some("<https://kv1.vault.azure.net/secrets/api-key/v2|api-key>")
    );
    assert_eq!(second_event.get("Not Before"), Some("2020-09-13 12:26:40 UTC"));
    assert_eq!(second_event.get("Expires"), Some("2023-11-14 22:13:20 UTC"));
}

#[test]
fn one_bad_item_blocks_every_notification() {
    init_tracing();

    let payloads = vec![
        audit_payload(&[SECRET_GET_OK]),
        "{\"records\": [".to_string(),
        event_payload(&[NEW_VERSION, NEAR_EXPIRY]),
    ];
    let sink = VecSink::new();

    let err = Notifier::default().run("b", &payloads, &sink).unwrap_err();

    match &err {
        BatchError::Single(failure) => {
            assert_eq!(failure.item, 1);
            assert_eq!(failure.error.kind(), DecodeErrorKind::MalformedJson);
        }
        other => panic!("expected a single failure, got {:?}", other),
    }
    assert!(sink.is_empty());
}

#[test]
fn every_failure_is_reported() {
    let missing_operation = r#"{"time": "2021-01-05T14:22:31Z", "resultType": "Success"}"#;
    let inline_data = r#"{
        "id": "1d3a9c50-6a3e-4a0e-b0f5-2f8a8d7b1c22",
        "eventType": "Microsoft.KeyVault.SecretExpired",
        "data": {"VaultName": "kv1"},
        "eventTime": "2021-01-05T14:22:31Z"
    }"#;
    let payloads = vec![
        audit_payload(&[SECRET_GET_OK, missing_operation, SECRET_GET_OK]),
        event_payload(&[NEW_VERSION, inline_data]),
        "not json at all".to_string(),
    ];
    let sink = VecSink::new();

    let err = Notifier::default().run("b", &payloads, &sink).unwrap_err();
    let failures = err.failures();
    assert!(matches!(err, BatchError::Aggregate(_)));
    assert_eq!(failures.len(), 3);

    assert_eq!((failures[0].item, failures[0].record), (0, Some(1)));
    assert_eq!(failures[0].error.kind(), DecodeErrorKind::MissingField);
    assert_eq!(failures[0].error.field(), Some("records[1].operationName"));

    assert_eq!((failures[1].item, failures[1].record), (1, Some(1)));
    assert_eq!(failures[1].error.kind(), DecodeErrorKind::ShapeMismatch);
    assert_eq!(failures[1].error.field(), Some("[1].data"));

    assert_eq!((failures[2].item, failures[2].record), (2, None));
    assert_eq!(failures[2].error.kind(), DecodeErrorKind::MalformedJson);

    let message = err.to_string();
    assert!(message.contains("3 errors"));
    assert!(sink.is_empty());
}

#[test]
fn unknown_shapes_alone_produce_nothing() {
    let sink = VecSink::new();
    let payloads = [
        "42",
        "\"text\"",
        "{\"foo\": []}",
        "true",
        "{\"records\": \"nope\"}",
        "{\"Records\": 5}",
    ];

    let report = Notifier::default().run("b", &payloads, &sink).unwrap();
    assert_eq!(report.skipped, 6);
    assert_eq!(report.delivered, 0);
    assert!(sink.is_empty());
}

#[test]
fn string_duration_is_accepted() {
    let record = SECRET_GET_OK.replace("\"durationMs\": 12", "\"durationMs\": \"78\"");
    let sink = VecSink::new();

    let report = Notifier::default()
        .run("b", &[audit_payload(&[&record])], &sink)
        .unwrap();
    assert_eq!(report.audit_records, 1);
    assert_eq!(report.delivered, 1);
}

#[test]
fn configured_policy_selects_other_operations() {
    let config = NotifierConfig::from_json(
        r#"{"policy": {"operationName": "SecretGet", "resultType": "Failed"}}"#,
    )
    .unwrap();
    assert_eq!(config.policy, NotificationPolicy::new("SecretGet", "Failed"));

    let sink = VecSink::new();
    let payloads = [audit_payload(&[SECRET_GET_OK, SECRET_GET_FAILED])];
    Notifier::new(config).run("b", &payloads, &sink).unwrap();

    let messages = sink.into_vec();
    assert_eq!(messages.len(), 1);
    let body = messages[0].body().unwrap();
    assert_eq!(body.get("IP"), Some("198.51.100.23"));
    assert_eq!(body.get("Who"), Some("N/A[N/A]"));
}

#[test]
fn batches_are_independent() {
    let notifier = Notifier::default();
    let sink = VecSink::new();

    assert!(notifier.run("b1", &["{bad"], &sink).is_err());
    let report = notifier
        .run("b2", &[audit_payload(&[SECRET_GET_OK])], &sink)
        .unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(sink.len(), 1);
}
