#![allow(clippy::unwrap_used)]
// End-to-end tests for `Gateway` against a wiremock bridge.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use huelink_api::{BridgeClient, TransportConfig};
use huelink_core::{CoreError, Gateway, GatewayConfig, MemoryStore, PairingState};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup(document: &Value) -> (MockServer, Gateway, Arc<MemoryStore>, String) {
    let server = MockServer::start().await;
    let address = server.address().to_string();
    let store = Arc::new(MemoryStore::with_document(document));
    let client = BridgeClient::new(&TransportConfig {
        timeout: Duration::from_secs(2),
        ..TransportConfig::default()
    })
    .unwrap();
    let gateway = Gateway::with_client(GatewayConfig::default(), client, store.clone()).await;
    (server, gateway, store, address)
}

async fn paired() -> (MockServer, Gateway, Arc<MemoryStore>, String) {
    setup(&json!({ "username": "abc", "favoriteRooms": [] })).await
}

async fn mount_get(server: &MockServer, route: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

fn success() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!([{ "success": {} }]))
}

// ── Rooms ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_rooms_loft_scenario() {
    let (server, gateway, _, address) = paired().await;
    mount_get(
        &server,
        "/api/abc/groups",
        json!({ "1": { "type": "Room", "name": "Loft", "lights": ["1", "2"] } }),
    )
    .await;
    mount_get(
        &server,
        "/api/abc/lights",
        json!({
            "1": { "state": { "on": true, "bri": 100 } },
            "2": { "state": { "on": false, "bri": 200 } }
        }),
    )
    .await;

    let rooms = gateway.rooms(&address).await.unwrap();
    assert_eq!(rooms.len(), 1);
    let room = &rooms[0];
    assert_eq!(room.id, "1");
    assert_eq!(room.name, "Loft");
    assert_eq!(room.bri, 150);
    assert_eq!(room.bri_pct, 59);
    assert!(room.any_on);
}

#[tokio::test]
async fn test_rooms_sorted_filtered_and_flagged() {
    let (server, gateway, _, address) = paired().await;
    mount_get(
        &server,
        "/api/abc/groups",
        json!({
            "1": { "type": "Room", "name": "kitchen", "lights": [] },
            "2": { "type": "Zone", "name": "Upstairs", "lights": ["5"] },
            "3": { "type": "LightGroup", "name": "All", "lights": ["5"] },
            "4": { "type": "Room", "name": "Bedroom", "lights": ["5"] },
            "5": "not a group"
        }),
    )
    .await;
    mount_get(&server, "/api/abc/lights", json!({ "5": { "state": { "on": false } } })).await;

    gateway.toggle_favorite("2").await.unwrap();
    let rooms = gateway.rooms(&address).await.unwrap();

    let names: Vec<&str> = rooms.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Bedroom", "Upstairs", "kitchen"]);
    let favorites: Vec<bool> = rooms.iter().map(|r| r.favorite).collect();
    assert_eq!(favorites, vec![false, true, false]);
    assert!(rooms.iter().all(|r| r.bri == 1 && r.bri_pct == 1));
}

#[tokio::test]
async fn test_rooms_invalid_groups_is_upstream_error() {
    let (server, gateway, _, address) = paired().await;
    mount_get(&server, "/api/abc/groups", json!(["unexpected"])).await;

    let err = gateway.rooms(&address).await.unwrap_err();
    assert_eq!(err.code(), "groups_invalid");
    assert_eq!(err.http_status(), 502);
}

#[tokio::test]
async fn test_rooms_unauthorized_user_is_upstream_error() {
    let (server, gateway, _, address) = paired().await;
    mount_get(
        &server,
        "/api/abc/groups",
        json!([{
            "error": { "type": 1, "address": "/groups", "description": "unauthorized user" }
        }]),
    )
    .await;

    match gateway.rooms(&address).await.unwrap_err() {
        CoreError::UpstreamInvalid { kind, code, .. } => {
            assert_eq!(kind, "groups_invalid");
            assert_eq!(code, 1);
        }
        other => panic!("expected UpstreamInvalid, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_rooms_require_pairing_and_address() {
    let (_server, gateway, _, address) = setup(&json!({})).await;

    assert!(matches!(
        gateway.rooms(&address).await,
        Err(CoreError::NotPaired)
    ));
    assert!(matches!(
        gateway.rooms("  ").await,
        Err(CoreError::CallerInput { .. })
    ));
}

#[tokio::test]
async fn test_rooms_unreachable_bridge() {
    let (_server, gateway, _, _) = paired().await;

    let err = gateway.rooms("127.0.0.1:1").await.unwrap_err();
    assert!(matches!(err, CoreError::BridgeUnreachable { .. }), "got: {err:?}");
}

// ── Scenes & lights ─────────────────────────────────────────────────

#[tokio::test]
async fn test_scenes_sorted_and_filtered() {
    let (server, gateway, _, address) = paired().await;
    mount_get(
        &server,
        "/api/abc/scenes",
        json!({
            "s2": { "name": "Relax", "group": "1" },
            "s1": { "name": "Energize", "group": "1" },
            "s3": 42
        }),
    )
    .await;

    let scenes = gateway.scenes(&address).await.unwrap();
    assert_eq!(
        serde_json::to_value(&scenes).unwrap(),
        json!([
            { "id": "s1", "name": "Energize", "group": "1", "type": "scene" },
            { "id": "s2", "name": "Relax", "group": "1", "type": "scene" }
        ])
    );
}

#[tokio::test]
async fn test_equal_names_keep_bridge_order() {
    let (server, gateway, _, address) = paired().await;
    mount_get(
        &server,
        "/api/abc/groups",
        json!({
            "2": { "type": "Room", "name": "Lamp", "lights": [] },
            "10": { "type": "Zone", "name": "Lamp", "lights": [] },
            "1": { "type": "Room", "name": "Attic", "lights": [] }
        }),
    )
    .await;
    mount_get(&server, "/api/abc/lights", json!({})).await;
    mount_get(
        &server,
        "/api/abc/scenes",
        json!({
            "zz": { "name": "Relax" },
            "aa": { "name": "Relax" }
        }),
    )
    .await;

    let rooms = gateway.rooms(&address).await.unwrap();
    let ids: Vec<&str> = rooms.iter().map(|room| room.id.as_str()).collect();
    assert_eq!(ids, ["1", "2", "10"]);

    let scenes = gateway.scenes(&address).await.unwrap();
    let ids: Vec<&str> = scenes.iter().map(|scene| scene.id.as_str()).collect();
    assert_eq!(ids, ["zz", "aa"]);
}

#[tokio::test]
async fn test_room_lights_members_only_sorted() {
    let (server, gateway, _, address) = paired().await;
    mount_get(
        &server,
        "/api/abc/groups/7",
        json!({ "name": "Office", "type": "Room", "lights": ["2", "1", "9"] }),
    )
    .await;
    mount_get(
        &server,
        "/api/abc/lights",
        json!({
            "1": { "name": "Lamp", "state": { "on": true, "bri": 77, "reachable": false } },
            "2": { "name": "Desk", "state": { "on": false, "bri": 12.5 } },
            "3": { "name": "Elsewhere", "state": { "on": true } }
        }),
    )
    .await;

    let result = gateway.room_lights(&address, "7").await.unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({
            "room": { "id": "7", "name": "Office" },
            "lights": [
                { "id": "2", "name": "Desk", "on": false, "bri": null, "reachable": true },
                { "id": "1", "name": "Lamp", "on": true, "bri": 77, "reachable": false }
            ]
        })
    );
}

// ── Writes ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_toggle_light_writes_inverse() {
    let (server, gateway, _, address) = paired().await;
    mount_get(
        &server,
        "/api/abc/lights/4",
        json!({ "name": "Hall", "state": { "on": true } }),
    )
    .await;
    Mock::given(method("PUT"))
        .and(path("/api/abc/lights/4/state"))
        .and(body_json(json!({ "on": false })))
        .respond_with(success())
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway.toggle_light(&address, "4").await.unwrap();
    assert!(!result.on);
    assert_eq!(
        huelink_core::ok_body("", serde_json::to_value(&result).unwrap()),
        json!({ "ok": true, "lightId": "4", "on": false })
    );
}

#[tokio::test]
async fn test_set_brightness_clamps_and_turns_on() {
    let (server, gateway, _, address) = paired().await;
    Mock::given(method("PUT"))
        .and(path("/api/abc/lights/2/state"))
        .and(body_json(json!({ "on": true, "bri": 254 })))
        .respond_with(success())
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway.set_brightness(&address, "2", 999).await.unwrap();
    assert_eq!(result.bri, 254);
}

#[tokio::test]
async fn test_set_brightness_bridge_error_surfaces() {
    let (server, gateway, _, address) = paired().await;
    Mock::given(method("PUT"))
        .and(path("/api/abc/lights/2/state"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "error": { "type": 3, "address": "/lights/2", "description": "resource not available" }
        }])))
        .mount(&server)
        .await;

    let err = gateway.set_brightness(&address, "2", 10).await.unwrap_err();
    assert_eq!(err.http_status(), 502);
}

#[tokio::test]
async fn test_room_brightness_and_power() {
    let (server, gateway, _, address) = paired().await;
    Mock::given(method("PUT"))
        .and(path("/api/abc/groups/3/action"))
        .and(body_json(json!({ "on": true, "bri": 1 })))
        .respond_with(success())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/abc/groups/3/action"))
        .and(body_json(json!({ "on": false })))
        .respond_with(success())
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(gateway.set_room_brightness(&address, "3", -20).await.unwrap().bri, 1);
    assert!(!gateway.set_room_all(&address, "3", "off").await.unwrap().on);
}

#[tokio::test]
async fn test_room_power_rejects_unknown_state() {
    let (server, gateway, _, address) = paired().await;
    Mock::given(method("PUT"))
        .respond_with(success())
        .expect(0)
        .mount(&server)
        .await;

    let err = gateway.set_room_all(&address, "3", "dim").await.unwrap_err();
    assert!(matches!(err, CoreError::CallerInput { .. }));
    assert_eq!(err.http_status(), 400);
}

#[tokio::test]
async fn test_recall_scene() {
    let (server, gateway, _, address) = paired().await;
    Mock::given(method("PUT"))
        .and(path("/api/abc/groups/1/action"))
        .and(body_json(json!({ "scene": "AbCdEf" })))
        .respond_with(success())
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway.recall_scene(&address, "1", "AbCdEf").await.unwrap();
    assert_eq!(result.scene_id, "AbCdEf");
}

// ── Pairing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ensure_paired_keeps_valid_username() {
    let (server, gateway, _, address) = paired().await;
    mount_get(&server, "/api/abc", json!({ "lights": {}, "groups": {} })).await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(success())
        .expect(0)
        .mount(&server)
        .await;

    assert_eq!(gateway.ensure_paired(&address).await.unwrap(), "abc");
    assert_eq!(gateway.pairing().pairing_state(), PairingState::Paired);
}

#[tokio::test]
async fn test_ensure_paired_replaces_rejected_username() {
    let (server, gateway, store, address) = paired().await;
    Mock::given(method("GET"))
        .and(path("/api/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "error": { "type": 1, "address": "/", "description": "unauthorized user" }
        }])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .and(body_json(json!({ "devicetype": huelink_core::DEFAULT_DEVICE_TYPE })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "success": { "username": "fresh" } }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(gateway.ensure_paired(&address).await.unwrap(), "fresh");
    assert_eq!(store.document().unwrap()["username"], json!("fresh"));
    assert_eq!(gateway.health().await.username.as_deref(), Some("fresh"));
}

#[tokio::test]
async fn test_ensure_paired_link_button_not_pressed() {
    let (server, gateway, store, address) = paired().await;
    Mock::given(method("GET"))
        .and(path("/api/abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "error": { "type": 1, "description": "unauthorized user" }
        }])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "error": { "type": 101, "address": "", "description": "link button not pressed" }
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let err = gateway.ensure_paired(&address).await.unwrap_err();
    match &err {
        CoreError::PairingFailed { fault } => assert_eq!(fault.code, 101),
        other => panic!("expected PairingFailed, got: {other:?}"),
    }
    assert_eq!(err.to_body()["error"]["type"], json!(101));
    assert_eq!(store.document().unwrap()["username"], Value::Null);
    assert_eq!(gateway.pairing().pairing_state(), PairingState::Unpaired);
}

#[tokio::test]
async fn test_ensure_paired_from_scratch() {
    let (server, gateway, _, address) = setup(&json!({})).await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{ "success": { "username": "first" } }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(gateway.pairing().pairing_state(), PairingState::Unpaired);
    assert_eq!(gateway.ensure_paired(&address).await.unwrap(), "first");
    assert!(gateway.health().await.paired);
}

#[tokio::test]
async fn test_pairing_subscribers_see_validation_then_paired() {
    let (server, gateway, _, address) = paired().await;
    Mock::given(method("GET"))
        .and(path("/api/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "lights": {}, "groups": {} }))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let mut rx = gateway.subscribe_pairing();
    assert_eq!(*rx.borrow_and_update(), PairingState::Paired);

    let task = {
        let gateway = gateway.clone();
        let address = address.clone();
        tokio::spawn(async move { gateway.ensure_paired(&address).await })
    };

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), PairingState::Validating);
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), PairingState::Paired);
    assert_eq!(task.await.unwrap().unwrap(), "abc");
}

#[tokio::test]
async fn test_pairing_subscribers_see_unpaired_after_rejection() {
    let (server, gateway, _, address) = paired().await;
    Mock::given(method("GET"))
        .and(path("/api/abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{
                    "error": { "type": 1, "description": "unauthorized user" }
                }]))
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "error": { "type": 101, "description": "link button not pressed" }
        }])))
        .mount(&server)
        .await;

    let mut rx = gateway.subscribe_pairing();
    let task = {
        let gateway = gateway.clone();
        let address = address.clone();
        tokio::spawn(async move { gateway.ensure_paired(&address).await })
    };

    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), PairingState::Validating);
    assert!(task.await.unwrap().is_err());
    assert!(rx.has_changed().unwrap());
    assert_eq!(*rx.borrow_and_update(), PairingState::Unpaired);
}

// ── Local state ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_and_clear_username() {
    let (_server, gateway, store, _) = setup(&json!({})).await;

    assert!(matches!(
        gateway.set_username("   ").await,
        Err(CoreError::CallerInput { .. })
    ));
    assert_eq!(gateway.set_username(" xyz ").await.unwrap(), "xyz");
    assert_eq!(store.document().unwrap()["username"], json!("xyz"));

    gateway.clear_username().await.unwrap();
    let health = gateway.health().await;
    assert!(!health.paired);
    assert_eq!(health.pairing_state, PairingState::Unpaired);
    assert!(health.updated_at.is_some());
}

#[tokio::test]
async fn test_concurrent_favorite_toggles_are_not_lost() {
    let (_server, gateway, store, _) = setup(&json!({})).await;

    let mut handles = Vec::new();
    for id in 0..16 {
        let gateway = gateway.clone();
        handles.push(tokio::spawn(async move {
            gateway.toggle_favorite(&id.to_string()).await.unwrap()
        }));
    }
    for handle in handles {
        assert!(handle.await.unwrap().favorite);
    }

    let doc = store.document().unwrap();
    assert_eq!(doc["favoriteRooms"].as_array().unwrap().len(), 16);
}
