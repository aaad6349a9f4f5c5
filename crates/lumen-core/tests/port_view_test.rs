#![allow(clippy::unwrap_used)]
// Integration tests for `PortViewHandler` against the in-memory backend.

use std::collections::BTreeMap;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use lumen_core::backend::{DeviceRecord, PortRecord};
use lumen_core::model::INPUT_PORT_STATUS;
use lumen_core::{
    Backends, ChannelSpacing, Command, CommandResult, ConnectPoint, CoreError, DeviceId,
    DeviceType, Fact, GridType, HandlerConfig, InMemoryBackend, Inventory, OchSignal,
    OpsOperation, PathState, PortNumber, PortType, PortViewHandler, PowerRange,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn path(id: &str, device: &str, port: u64, status: Option<&str>) -> PathState {
    let mut attributes = BTreeMap::new();
    if let Some(status) = status {
        attributes.insert(INPUT_PORT_STATUS.to_owned(), status.to_owned());
    }
    PathState {
        id: id.into(),
        attributes,
        output: ConnectPoint::new(device, port),
    }
}

fn roadm() -> DeviceRecord {
    let mut line = PortRecord::new(1, PortType::Och);
    line.name = Some("line-1".into());
    line.signals = vec![
        OchSignal::new(GridType::Dwdm, ChannelSpacing::Ghz50, -2),
        OchSignal::new(GridType::Dwdm, ChannelSpacing::Ghz50, 4),
        OchSignal::new(GridType::Dwdm, ChannelSpacing::Ghz50, 0),
    ];
    line.target_power_range = Some(PowerRange::new(-10.0, 5.0));
    line.target_power = Some(-3.0);
    line.current_power = Some(-3.25);
    line.modulation = Some(lumen_core::ModulationScheme::DpQpsk);

    let mut rx = PortRecord::new(2, PortType::Oms);
    rx.input_power_range = Some(PowerRange::new(-25.0, 0.0));
    rx.target_power_range = Some(PowerRange::new(-10.0, 5.0));
    rx.current_input_power = Some(-12.0);

    DeviceRecord::new("rdm:1", DeviceType::Roadm)
        .with_port(line)
        .with_port(rx)
}

fn fiber_switch() -> DeviceRecord {
    DeviceRecord::new("fs:1", DeviceType::FiberSwitch)
        .with_port(PortRecord::new(1, PortType::Fiber))
        .with_port(PortRecord::new(2, PortType::Fiber))
        .with_protection_group(
            ConnectPoint::new("fs:1", 0),
            vec![
                path("primary", "fs:1", 1, Some("ACTIVE")),
                path("secondary", "fs:1", 3, Some("STANDBY")),
            ],
        )
}

fn setup(devices: Vec<DeviceRecord>) -> (Arc<InMemoryBackend>, PortViewHandler) {
    let backend = Arc::new(InMemoryBackend::new(Inventory { devices }));
    let handler = PortViewHandler::new(
        Backends::shared(Arc::clone(&backend)),
        HandlerConfig::default(),
    );
    (backend, handler)
}

async fn request(handler: &PortViewHandler, message: Value) -> Value {
    let text = handler
        .handle_json(&message.to_string())
        .await
        .unwrap()
        .unwrap();
    serde_json::from_str(&text).unwrap()
}

// ── Port rows ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_port_rows_follow_enumeration_order() {
    let (_, handler) = setup(vec![roadm()]);
    let data = handler.port_data(&DeviceId::from("rdm:1")).await;

    let ids: Vec<u64> = data.ports.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![1, 2]);
    assert_eq!(data.no_rows_message, None);

    let line = &data.ports[0];
    assert_eq!(line.min_freq, "193.0");
    assert_eq!(line.max_freq, "193.3");
    assert_eq!(line.grid, "50.0");
    assert_eq!(line.curr_freq, "0");
    assert_eq!(line.power_range, "[-10.0..5.0]");
    assert_eq!(line.current_power, "-3.25");
    assert_eq!(line.target_power, "-3.0");
    assert_eq!(line.modulation, "DP_QPSK");
    assert_eq!(line.service_state, "N/A");
    assert!(line.has_target_power);
}

#[tokio::test]
async fn test_power_range_prefers_input_range() {
    let (_, handler) = setup(vec![roadm()]);
    let data = handler.port_data(&DeviceId::from("rdm:1")).await;

    let rx = &data.ports[1];
    assert_eq!(rx.power_range, "[-25.0..0.0]");
    assert_eq!(rx.current_input_power, "-12.0");
    assert_eq!(rx.min_freq, "N/A");
}

#[tokio::test]
async fn test_modulation_not_queried_for_non_och_ports() {
    let (backend, handler) = setup(vec![roadm()]);
    let views = handler.port_views(&DeviceId::from("rdm:1")).await;

    assert_eq!(backend.call_count("modulation"), 1);
    assert_eq!(views[1].modulation, Fact::Unknown);
}

#[tokio::test]
async fn test_unavailable_device_yields_no_rows() {
    let (backend, handler) = setup(vec![roadm()]);
    let id = DeviceId::from("rdm:1");
    backend.set_available(&id, false);

    let data = handler.port_data(&id).await;
    assert!(data.ports.is_empty());
    assert_eq!(data.no_rows_message.as_deref(), Some("No items found"));
    assert_eq!(backend.call_count("ports"), 0);
}

#[tokio::test]
async fn test_backend_failures_degrade_to_sentinels() {
    let mut device = roadm();
    device.ports[0].faulty = true;
    let (_, handler) = setup(vec![device]);

    let data = handler.port_data(&DeviceId::from("rdm:1")).await;
    let row = &data.ports[0];
    assert_eq!(row.min_freq, "N/A");
    assert_eq!(row.power_range, "N/A");
    assert_eq!(row.current_power, "unknown");
    assert_eq!(row.target_power, "N/A");
    assert_eq!(row.modulation, "unknown");
    assert!(!row.has_target_power);
}

#[tokio::test]
async fn test_fiber_switch_service_state() {
    let (_, handler) = setup(vec![fiber_switch()]);
    let data = handler.port_data(&DeviceId::from("fs:1")).await;

    assert_eq!(data.ports[0].service_state, "ACTIVE");
    assert_eq!(data.ports[0].target_power, "N/A");
    assert_eq!(data.ports[1].service_state, "unknown");
}

// ── Show items ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_show_items_for_fiber_switch() {
    let (_, handler) = setup(vec![fiber_switch()]);
    let value = request(
        &handler,
        json!({ "event": "showPortItemsRequest", "payload": { "devId": "fs:1" } }),
    )
    .await;

    assert_eq!(value["event"], "showPortItemsResponse");
    let payload = &value["payload"];
    assert_eq!(payload["showTargetPower"], false);
    assert_eq!(payload["showServiceState"], true);
    assert_eq!(payload["showFlowIcon"], false);
    let names: Vec<&str> = payload["opsOperations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|op| op["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "AUTOMATIC",
            "FORCE PRIMARY",
            "FORCE SECONDARY",
            "MANUAL PRIMARY",
            "MANUAL SECONDARY"
        ]
    );
    assert_eq!(payload["opsOperations"][0]["index"], -1);
    assert_eq!(payload["opsOperations"][0]["group"], "fs:1/0");
}

#[tokio::test]
async fn test_show_items_unknown_device() {
    let (_, handler) = setup(vec![roadm()]);
    let err = handler
        .show_items(&DeviceId::from("nope:9"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::DeviceNotFound { .. }));
}

// ── Target power ────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_target_power_in_range() {
    let (backend, handler) = setup(vec![roadm()]);
    let id = DeviceId::from("rdm:1");
    let port = PortNumber::new(1);

    let value = request(
        &handler,
        json!({
            "event": "setTargetPowerRequest",
            "payload": { "devId": "rdm:1", "id": "1", "targetPower": 2.5 }
        }),
    )
    .await;

    assert_eq!(
        value,
        json!({
            "event": "setTargetPowerResponse",
            "payload": { "id": "1", "valid": true, "message": "Target power range is [-10.0..5.0]." }
        })
    );
    assert_eq!(backend.stored_target_power(&id, port), Some(2.5));
}

#[tokio::test]
async fn test_set_target_power_from_textual_fields() {
    let (backend, handler) = setup(vec![roadm()]);

    let value = request(
        &handler,
        json!({
            "event": "setTargetPowerRequest",
            "payload": { "devId": "rdm:1", "id": "1", "targetPower": "-4.5" }
        }),
    )
    .await;

    assert_eq!(value["payload"]["valid"], true);
    assert_eq!(
        backend.stored_target_power(&DeviceId::from("rdm:1"), PortNumber::new(1)),
        Some(-4.5)
    );
}

#[tokio::test]
async fn test_set_target_power_out_of_range_leaves_power_unchanged() {
    let (backend, handler) = setup(vec![roadm()]);
    let id = DeviceId::from("rdm:1");
    let port = PortNumber::new(1);

    let result = handler
        .execute(Command::SetTargetPower {
            device_id: id.clone(),
            port,
            power: 9.0,
        })
        .await
        .unwrap();

    assert!(matches!(
        result,
        CommandResult::TargetPower { valid: false, .. }
    ));
    assert_eq!(backend.stored_target_power(&id, port), Some(-3.0));
    assert_eq!(backend.call_count("set_target_power"), 0);
}

#[tokio::test]
async fn test_set_target_power_without_range_sends_nothing() {
    let (backend, handler) = setup(vec![fiber_switch()]);
    let reply = handler
        .handle_json(
            &json!({
                "event": "setTargetPowerRequest",
                "payload": { "devId": "fs:1", "id": 1, "targetPower": 0.0 }
            })
            .to_string(),
        )
        .await
        .unwrap();

    assert_eq!(reply, None);
    assert_eq!(backend.call_count("set_target_power"), 0);
}

#[tokio::test]
async fn test_sync_target_power() {
    let (backend, handler) = setup(vec![roadm()]);
    let value = request(
        &handler,
        json!({ "event": "syncTargetPowerRequest", "payload": { "devId": "rdm:1", "id": 1 } }),
    )
    .await;

    assert_eq!(value["payload"]["valid"], true);
    assert_eq!(value["payload"]["message"], "Synced target power is -3.0.");
    assert_eq!(backend.call_count("sync_target_power"), 1);

    let value = request(
        &handler,
        json!({ "event": "syncTargetPowerRequest", "payload": { "devId": "rdm:1", "id": 2 } }),
    )
    .await;
    assert_eq!(value["payload"]["message"], "Synced target power is unknown.");
}

// ── Modulation ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_modulation_echoes_scheme() {
    let (backend, handler) = setup(vec![roadm()]);
    let value = request(
        &handler,
        json!({
            "event": "setModulationRequest",
            "payload": { "devId": "rdm:1", "id": 1, "modulation": "DP_8QAM" }
        }),
    )
    .await;

    assert_eq!(value["payload"]["valid"], "DP_8QAM");
    assert_eq!(value["payload"]["message"], "Target modulation is DP_8QAM.");
    assert_eq!(
        backend.stored_modulation(&DeviceId::from("rdm:1"), PortNumber::new(1)),
        Some(lumen_core::ModulationScheme::Dp8Qam)
    );
}

// ── Frequency ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_frequency_creates_one_connection() {
    let (backend, handler) = setup(vec![roadm()]);
    let id = DeviceId::from("rdm:1");

    let value = request(
        &handler,
        json!({
            "event": "setFrequencyRequest",
            "payload": { "devId": "rdm:1", "id": 1, "currFreq": "193.1" }
        }),
    )
    .await;

    assert_eq!(value["payload"]["valid"], "193.1");
    assert!(value["payload"]["message"].as_str().unwrap().contains("193.1"));

    let connections = backend.connections(&id);
    assert_eq!(connections.len(), 1);
    let conn = connections[0];
    assert_eq!(conn.priority, 100);
    assert!(conn.permanent);
    assert_eq!(conn.timeout_secs, 0);
    assert_eq!(conn.in_port, conn.out_port);
    assert_eq!(conn.signal, OchSignal::dwdm_50ghz());

    let data = handler.port_data(&id).await;
    assert_eq!(data.ports[0].curr_freq, "193.1");
}

#[tokio::test]
async fn test_set_frequency_uses_port_grid() {
    let mut device = roadm();
    device.ports[0].lambda = Some(OchSignal::new(GridType::Flex, ChannelSpacing::Ghz6p25, 0));
    let (backend, handler) = setup(vec![device]);

    handler
        .execute(Command::SetFrequency {
            device_id: DeviceId::from("rdm:1"),
            port: PortNumber::new(1),
            frequency: "193.125".into(),
        })
        .await
        .unwrap();

    let conn = backend.connections(&DeviceId::from("rdm:1"))[0];
    assert_eq!(conn.signal.grid, GridType::Flex);
    assert_eq!(conn.signal.spacing_multiplier, 4);
}

#[tokio::test]
async fn test_set_frequency_rejects_malformed_text() {
    let (backend, handler) = setup(vec![roadm()]);
    let err = handler
        .handle_json(
            &json!({
                "event": "setFrequencyRequest",
                "payload": { "devId": "rdm:1", "id": 1, "currFreq": "abc" }
            })
            .to_string(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidFrequency { .. }));
    assert_eq!(backend.call_count("create_connection"), 0);
}

// ── Protection mode ─────────────────────────────────────────────────

#[tokio::test]
async fn test_ops_mode_on_unavailable_device() {
    let (backend, handler) = setup(vec![fiber_switch()]);
    backend.set_available(&DeviceId::from("fs:1"), false);

    let value = request(
        &handler,
        json!({
            "event": "setOpsModeRequest",
            "payload": { "devId": "fs:1", "operation": "FORCE", "index": 0 }
        }),
    )
    .await;

    assert_eq!(
        value["payload"],
        json!({ "valid": false, "message": "Apply failed: device is offline or unavailable." })
    );
    assert_eq!(backend.call_count("config_protection_switch"), 0);
    assert_eq!(backend.call_count("protection_switch_states"), 0);
}

#[tokio::test]
async fn test_ops_mode_on_wrong_device_type() {
    let (backend, handler) = setup(vec![roadm()]);
    let value = request(
        &handler,
        json!({
            "event": "setOpsModeRequest",
            "payload": { "devId": "rdm:1", "operation": "MANUAL", "index": 0 }
        }),
    )
    .await;

    assert_eq!(value["payload"]["valid"], false);
    assert_eq!(value["payload"]["message"], "Apply failed: invalid device type.");
    assert_eq!(backend.call_count("config_protection_switch"), 0);
}

#[tokio::test]
async fn test_ops_mode_switches_first_group() {
    let (backend, handler) = setup(vec![fiber_switch()]);
    let value = request(
        &handler,
        json!({
            "event": "setOpsModeRequest",
            "payload": { "devId": "fs:1", "operation": "force", "index": 1 }
        }),
    )
    .await;

    assert_eq!(value["payload"], json!({ "valid": true }));
    let switch = backend
        .last_protection_switch(&DeviceId::from("fs:1"))
        .unwrap();
    assert_eq!(switch.operation, OpsOperation::Force);
    assert_eq!(switch.identifier, ConnectPoint::new("fs:1", 0));
    assert_eq!(switch.index, 1);
}

#[tokio::test]
async fn test_ops_mode_explicit_group() {
    let device = fiber_switch().with_protection_group(
        ConnectPoint::new("fs:1", 10),
        vec![path("a", "fs:1", 11, None)],
    );
    let (backend, handler) = setup(vec![device]);
    let id = DeviceId::from("fs:1");

    let result = handler
        .execute(Command::SetProtectionMode {
            device_id: id.clone(),
            operation: "AUTOMATIC".into(),
            index: -1,
            group: Some(ConnectPoint::new("fs:1", 10)),
        })
        .await
        .unwrap();
    assert_eq!(result, CommandResult::ProtectionMode(Ok(())));
    assert_eq!(
        backend.last_protection_switch(&id).unwrap().identifier,
        ConnectPoint::new("fs:1", 10)
    );

    let result = handler
        .execute(Command::SetProtectionMode {
            device_id: id,
            operation: "AUTOMATIC".into(),
            index: -1,
            group: Some(ConnectPoint::new("fs:1", 99)),
        })
        .await
        .unwrap();
    assert_eq!(
        result.message().as_deref(),
        Some("Apply failed: no protection group available.")
    );
}

#[tokio::test]
async fn test_ops_mode_without_groups_is_invalid() {
    let device = DeviceRecord::new("fs:2", DeviceType::FiberSwitch)
        .with_port(PortRecord::new(1, PortType::Fiber));
    let (backend, handler) = setup(vec![device]);

    let result = handler
        .execute(Command::SetProtectionMode {
            device_id: DeviceId::from("fs:2"),
            operation: "MANUAL".into(),
            index: 0,
            group: None,
        })
        .await
        .unwrap();

    assert_eq!(
        result.message().as_deref(),
        Some("Apply failed: no protection group available.")
    );
    assert_eq!(backend.call_count("config_protection_switch"), 0);
}

#[tokio::test]
async fn test_ops_mode_unknown_operation() {
    let (backend, handler) = setup(vec![fiber_switch()]);
    let result = handler
        .execute(Command::SetProtectionMode {
            device_id: DeviceId::from("fs:1"),
            operation: "SOMETIMES".into(),
            index: 0,
            group: None,
        })
        .await
        .unwrap();

    assert_eq!(
        result.message().as_deref(),
        Some("Apply failed: invalid operation.")
    );
    assert_eq!(backend.call_count("config_protection_switch"), 0);
}

// ── Concurrency ─────────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_share_handler() {
    let (_, handler) = setup(vec![roadm(), fiber_switch()]);

    let tasks: Vec<_> = ["rdm:1", "fs:1", "rdm:1", "fs:1"]
        .into_iter()
        .map(|id| {
            let handler = handler.clone();
            tokio::spawn(async move { handler.port_data(&DeviceId::from(id)).await })
        })
        .collect();

    for task in tasks {
        assert_eq!(task.await.unwrap().ports.len(), 2);
    }
}
