//! Integration property tests for vault-notify.
//!
//! These tests validate batch-level invariants (ordering, counts,
//! all-or-nothing dispatch) using property-based testing.

use proptest::prelude::*;
use serde_json::{json, Value};
use vault_notify::{decode_audit_record, decode_claims, process_batch, Notifier, VecSink};

// Strategy: Generate an arbitrary well-formed audit record
fn arb_audit_record() -> impl Strategy<Value = Value> {
    (
        prop_oneof![Just("SecretGet"), Just("SecretList"), Just("KeySign"), Just("VaultGet")],
        prop_oneof![Just("Success"), Just("Failed")],
        0u32..86_400,
        prop::string::string_regex("[a-z0-9-]{3,12}").unwrap(),
        prop::string::string_regex("[a-z]{3,8}@contoso\\.com").unwrap(),
        0u64..10_000,
    )
        .prop_map(|(operation, result, offset, name, upn, duration)| {
            let time = format!(
                "2021-01-05T{:02}:{:02}:{:02}Z",
                offset / 3600,
                (offset / 60) % 60,
                offset % 60
            );
            json!({
                "time": time,
                "operationName": operation,
                "resultType": result,
                "callerIpAddress": "203.0.113.7",
                "identity": {"claim": {
                    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/upn": upn
                }},
                "properties": {
                    "id": format!("https://kv1.vault.azure.net/secrets/{}/v1", name)
                },
                "durationMs": duration
            })
        })
}

// Strategy: Generate an arbitrary well-formed resource event
fn arb_resource_event() -> impl Strategy<Value = Value> {
    (
        prop::string::string_regex("[a-z0-9-]{3,12}").unwrap(),
        prop::option::of(0i64..2_000_000_000),
        prop::option::of(0i64..2_000_000_000),
        any::<u128>(),
    )
        .prop_map(|(name, nbf, exp, id)| {
            let mut data = json!({
                "VaultName": "kv1",
                "ObjectType": "Secret",
                "ObjectName": name,
                "Version": "v1"
            });
            if let Some(nbf) = nbf {
                data["NBF"] = json!(nbf);
            }
            if let Some(exp) = exp {
                data["EXP"] = json!(exp);
            }
            json!({
                "id": format!("{:032x}", id),
                "eventType": "Microsoft.KeyVault.SecretNewVersionCreated",
                "data": data.to_string(),
                "eventTime": "2021-01-05T14:22:31Z"
            })
        })
}

proptest! {
    /// Property: decoding the same audit record twice yields the same value
    #[test]
    fn proptest_audit_decoding_is_deterministic(record in arb_audit_record()) {
        let first = decode_audit_record(&record).unwrap();
        let second = decode_audit_record(&record).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Property: an envelope of N records decodes to exactly N records, in order
    #[test]
    fn proptest_audit_envelope_preserves_count_and_order(
        records in prop::collection::vec(arb_audit_record(), 0..12)
    ) {
        let payload = json!({"Records": records}).to_string();
        let decoded = process_batch("b", &[payload]).into_result().unwrap();

        prop_assert_eq!(decoded.audit_records.len(), records.len());
        for (record, source) in decoded.audit_records.iter().zip(&records) {
            prop_assert_eq!(
                record.properties.id.as_ref().map(|u| u.as_str()),
                source["properties"]["id"].as_str()
            );
        }
    }

    /// Property: a bare array of M events decodes to exactly M events, in order
    #[test]
    fn proptest_event_array_preserves_count_and_order(
        events in prop::collection::vec(arb_resource_event(), 0..12)
    ) {
        let payload = Value::Array(events.clone()).to_string();
        let decoded = process_batch("b", &[payload]).into_result().unwrap();

        prop_assert_eq!(decoded.resource_events.len(), events.len());
        for (event, source) in decoded.resource_events.iter().zip(&events) {
            let data: Value = serde_json::from_str(source["data"].as_str().unwrap()).unwrap();
            prop_assert_eq!(Some(event.data.object_name.as_str()), data["ObjectName"].as_str());
            prop_assert_eq!(event.data.nbf.is_some(), data.get("NBF").is_some());
            prop_assert_eq!(event.data.exp.is_some(), data.get("EXP").is_some());
        }
    }

    /// Property: one malformed item anywhere in the batch suppresses all dispatch
    ///
    /// The well-formed items still decode; their failure-free siblings are
    /// simply never sent.
    #[test]
    fn proptest_malformed_item_blocks_dispatch(
        records in prop::collection::vec(arb_audit_record(), 1..6),
        events in prop::collection::vec(arb_resource_event(), 1..6),
        position in 0usize..3
    ) {
        let mut payloads = vec![
            json!({"records": records}).to_string(),
            Value::Array(events).to_string(),
        ];
        payloads.insert(position, "{\"records\": [".to_string());

        let outcome = process_batch("b", &payloads);
        prop_assert_eq!(outcome.failures.len(), 1);
        prop_assert_eq!(outcome.failures[0].item, position);
        prop_assert_eq!(outcome.decoded.audit_records.len(), records.len());

        let sink = VecSink::new();
        let result = Notifier::default().run("b", &payloads, &sink);
        prop_assert!(result.is_err());
        prop_assert!(sink.is_empty());
    }

    /// Property: every resource event is notified, with bound fields only when present
    #[test]
    fn proptest_every_event_is_notified(
        events in prop::collection::vec(arb_resource_event(), 0..8)
    ) {
        let payload = Value::Array(events.clone()).to_string();
        let sink = VecSink::new();

        let report = Notifier::default().run("b", &[payload], &sink).unwrap();
        prop_assert_eq!(report.delivered, events.len());

        let messages = sink.into_vec();
        for (message, source) in messages.iter().zip(&events) {
            let data: Value = serde_json::from_str(source["data"].as_str().unwrap()).unwrap();
            let expected = 5
                + usize::from(data.get("NBF").is_some())
                + usize::from(data.get("EXP").is_some());
            prop_assert_eq!(message.body().unwrap().fields.len(), expected);
        }
    }

    /// Property: claims keep their source key order
    #[test]
    fn proptest_claims_preserve_key_order(
        keys in prop::collection::btree_set("[a-z]{1,10}", 0..10)
    ) {
        // Reverse the sorted keys so source order differs from sorted order.
        let ordered: Vec<String> = keys.into_iter().rev().collect();
        let mut bag = serde_json::Map::new();
        for (i, key) in ordered.iter().enumerate() {
            bag.insert(key.clone(), json!(format!("value-{}", i)));
        }

        let claims = decode_claims(&Value::Object(bag)).unwrap();
        let types: Vec<&str> = claims.iter().map(|c| c.claim_type.as_str()).collect();
        let expected: Vec<&str> = ordered.iter().map(String::as_str).collect();
        prop_assert_eq!(types, expected);
    }
}
