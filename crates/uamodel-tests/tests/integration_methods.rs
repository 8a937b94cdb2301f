// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Method Integration Tests
//!
//! Calls routed through `call_method` into typed handlers.
//!
//! ## Test Categories
//!
//! - `test_condition_*`: Enable, Disable, AddComment, Acknowledge and Confirm
//! - `test_arguments_*`: input checks that stop before the handler runs
//! - `test_access_*`: Executable, UserExecutable and call roles
//! - `test_dispatch_*`: request resolution and batches
//! - `test_file_*`: the six `FileType` methods over an in-memory buffer

use std::sync::Arc;

use uamodel_core::{ByteString, LocalizedText, NodeId, StatusCode, UaValue, Variant};
use uamodel_nodes::model::acknowledgeable_condition::AcknowledgeableConditionType;
use uamodel_nodes::model::condition::ConditionType;
use uamodel_nodes::model::file::{open_mode, FileType, FileTypeNode};
use uamodel_nodes::model::limit_alarm::LimitAlarmTypeNode;
use uamodel_nodes::model::variables::TwoStateVariableType;
use uamodel_nodes::{call, call_method, CallMethodRequest, CallMethodResult, ModelSettings, SessionInfo, TypedNode};
use uamodel_tests::prelude::*;

fn comment(text: &str) -> Variant {
    LocalizedText::new("en", text).into_variant()
}

fn alarm_with_logic(settings: ModelSettings) -> (Fixture<LimitAlarmTypeNode>, ConditionLogic<LimitAlarmTypeNode>) {
    let fixture = AlarmFixtures::limit_alarm_with(settings);
    let logic = ConditionLogic::new(fixture.node.clone());
    assert_eq!(logic.install(), 5);
    (fixture, logic)
}

async fn call_on(
    fixture: &Fixture<LimitAlarmTypeNode>,
    method: &str,
    inputs: Vec<Variant>,
    session: Option<&SessionInfo>,
) -> CallMethodResult {
    let object = fixture.node.node_id().clone();
    let method = child(&object, method);
    call_method(&*fixture.space, CallMethodRequest::new(object, method, inputs), session).await
}

// =============================================================================
// Condition methods
// =============================================================================

#[tokio::test]
async fn test_condition_acknowledge_flow() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default());
    let operator = user_session("operator", vec![]);

    let result = call_on(
        &fixture,
        "Acknowledge",
        vec![event_id().into_variant(), comment("seen")],
        Some(&operator),
    )
    .await;
    assert!(result.assert_good().is_empty());

    let alarm = &fixture.node;
    assert_eq!(alarm.acked_state().unwrap().unwrap().text, "True");
    assert_eq!(alarm.comment().unwrap().unwrap().text, "seen");
    assert_eq!(alarm.client_user_id().unwrap().as_deref(), Some("user:operator"));
    assert!(alarm.acked_state_node().unwrap().transition_time().unwrap().is_some());

    let again = call_on(
        &fixture,
        "Acknowledge",
        vec![event_id().into_variant(), comment("again")],
        Some(&operator),
    )
    .await;
    again.assert_status(StatusCode::BAD_CONDITION_BRANCH_ALREADY_ACKED);
    assert_eq!(alarm.comment().unwrap().unwrap().text, "seen");

    let calls = logic.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.method == "Acknowledge"));
    assert_eq!(calls[0].user.as_deref(), Some("user:operator"));
}

#[tokio::test]
async fn test_condition_unknown_event_id() {
    init_test_logging();
    let (fixture, _logic) = alarm_with_logic(ModelSettings::default());

    let stale = ByteString::from(vec![0u8; 4]).into_variant();
    let result = call_on(&fixture, "Confirm", vec![stale, comment("late")], None).await;
    result.assert_status(StatusCode::BAD_EVENT_ID_UNKNOWN);
    assert_eq!(fixture.node.confirmed_state().unwrap().unwrap().text, "False");

    let result = call_on(&fixture, "Confirm", vec![event_id().into_variant(), comment("ok")], None).await;
    result.assert_good();
    assert_eq!(fixture.node.confirmed_state().unwrap().unwrap().text, "True");
    // No session, no user id.
    assert_eq!(fixture.node.client_user_id().unwrap(), None);
}

#[tokio::test]
async fn test_condition_disable_and_enable() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default());
    let alarm = &fixture.node;

    call_on(&fixture, "Enable", vec![], None)
        .await
        .assert_status(StatusCode::BAD_CONDITION_ALREADY_ENABLED);

    call_on(&fixture, "Disable", vec![], None).await.assert_good();
    assert_eq!(alarm.enabled_state().unwrap().unwrap().text, "False");
    assert_eq!(alarm.retain().unwrap(), Some(false));

    call_on(&fixture, "AddComment", vec![event_id().into_variant(), comment("ignored")], None)
        .await
        .assert_status(StatusCode::BAD_CONDITION_DISABLED);
    assert_eq!(alarm.comment().unwrap(), None);

    call_on(&fixture, "Disable", vec![], None)
        .await
        .assert_status(StatusCode::BAD_CONDITION_ALREADY_DISABLED);

    call_on(&fixture, "Enable", vec![], None).await.assert_good();
    assert_eq!(alarm.enabled_state().unwrap().unwrap().text, "True");
    assert_eq!(alarm.retain().unwrap(), Some(true));

    call_on(&fixture, "AddComment", vec![event_id().into_variant(), comment("back")], None)
        .await
        .assert_good();
    assert_eq!(alarm.comment().unwrap().unwrap().text, "back");

    let methods: Vec<_> = logic.calls().into_iter().map(|c| c.method).collect();
    assert_eq!(
        methods,
        vec!["Enable", "Disable", "AddComment", "Disable", "Enable", "AddComment"]
    );
}

// =============================================================================
// Argument checks
// =============================================================================

#[tokio::test]
async fn test_arguments_type_mismatch_per_argument() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default());

    let result = call_on(&fixture, "Acknowledge", vec![Variant::Int32(7), comment("x")], None).await;
    result.assert_invalid_arguments(&[StatusCode::BAD_TYPE_MISMATCH, StatusCode::GOOD]);

    let result = call_on(
        &fixture,
        "Acknowledge",
        vec![Variant::Int32(7), Variant::from("plain string")],
        None,
    )
    .await;
    result.assert_invalid_arguments(&[StatusCode::BAD_TYPE_MISMATCH, StatusCode::BAD_TYPE_MISMATCH]);

    assert!(logic.calls().is_empty());
    assert_eq!(fixture.node.acked_state().unwrap().unwrap().text, "False");
}

#[tokio::test]
async fn test_arguments_count() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default());

    call_on(&fixture, "Acknowledge", vec![event_id().into_variant()], None)
        .await
        .assert_status(StatusCode::BAD_ARGUMENTS_MISSING);

    call_on(
        &fixture,
        "Acknowledge",
        vec![event_id().into_variant(), comment("x"), Variant::Boolean(true)],
        None,
    )
    .await
    .assert_status(StatusCode::BAD_TOO_MANY_ARGUMENTS);

    call_on(&fixture, "Enable", vec![Variant::Boolean(true)], None)
        .await
        .assert_status(StatusCode::BAD_TOO_MANY_ARGUMENTS);

    assert!(logic.calls().is_empty());
}

#[tokio::test]
async fn test_arguments_input_definitions_are_published() {
    init_test_logging();
    let (fixture, _logic) = alarm_with_logic(ModelSettings::default());

    let handler = fixture.node.acknowledge_method_node().unwrap().handler().unwrap();
    let inputs = handler.input_arguments().unwrap();
    let names: Vec<_> = inputs.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["EventId", "Comment"]);
    assert_eq!(inputs[0].data_type, NodeId::numeric(0, 15));
    assert_eq!(inputs[1].data_type, NodeId::numeric(0, 21));
    assert!(handler.output_arguments().unwrap().is_empty());
}

// =============================================================================
// Access checks
// =============================================================================

#[tokio::test]
async fn test_access_call_roles() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default());
    let operator_role = NodeId::numeric(0, 15_680);
    fixture
        .node
        .acknowledge_method_node()
        .unwrap()
        .set_call_roles(Some(vec![operator_role.clone()]));

    let inputs = || vec![event_id().into_variant(), comment("seen")];

    call_on(&fixture, "Acknowledge", inputs(), None)
        .await
        .assert_status(StatusCode::BAD_USER_ACCESS_DENIED);
    let guest = user_session("guest", vec![NodeId::numeric(0, 15_644)]);
    call_on(&fixture, "Acknowledge", inputs(), Some(&guest))
        .await
        .assert_status(StatusCode::BAD_USER_ACCESS_DENIED);
    let no_roles = user_session("nobody", vec![]);
    call_on(&fixture, "Acknowledge", inputs(), Some(&no_roles))
        .await
        .assert_status(StatusCode::BAD_USER_ACCESS_DENIED);
    assert!(logic.calls().is_empty());

    let operator = user_session("operator", vec![operator_role]);
    call_on(&fixture, "Acknowledge", inputs(), Some(&operator)).await.assert_good();
    assert_eq!(logic.calls().len(), 1);
}

#[tokio::test]
async fn test_access_executable_flags() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default());
    let disable = fixture.node.disable_method_node().unwrap();

    disable.set_executable(false);
    call_on(&fixture, "Disable", vec![], None)
        .await
        .assert_status(StatusCode::BAD_NOT_EXECUTABLE);

    disable.set_executable(true);
    disable.set_user_executable(false);
    call_on(&fixture, "Disable", vec![], None)
        .await
        .assert_status(StatusCode::BAD_USER_ACCESS_DENIED);

    disable.set_user_executable(true);
    call_on(&fixture, "Disable", vec![], None).await.assert_good();
    assert_eq!(logic.calls().len(), 1);
}

#[tokio::test]
async fn test_access_checks_can_be_turned_off() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default().with_check_executable(false));
    let disable = fixture.node.disable_method_node().unwrap();
    disable.set_executable(false);
    disable.set_call_roles(Some(vec![NodeId::numeric(0, 15_680)]));

    call_on(&fixture, "Disable", vec![], None).await.assert_good();
    assert_eq!(logic.calls().len(), 1);
}

// =============================================================================
// Dispatch
// =============================================================================

#[tokio::test]
async fn test_dispatch_resolution_failures() {
    init_test_logging();
    let (fixture, _logic) = alarm_with_logic(ModelSettings::default());
    let alarm_id = fixture.node.node_id().clone();
    let shelving_id = child(&alarm_id, "ShelvingState");

    // A method of another object.
    let result = call_method(
        &*fixture.space,
        CallMethodRequest::new(alarm_id.clone(), child(&shelving_id, "Unshelve"), vec![]),
        None,
    )
    .await;
    result.assert_status(StatusCode::BAD_METHOD_INVALID);

    // A variable in the method slot.
    let result = call_method(
        &*fixture.space,
        CallMethodRequest::new(alarm_id.clone(), child(&alarm_id, "Quality"), vec![]),
        None,
    )
    .await;
    result.assert_status(StatusCode::BAD_METHOD_INVALID);

    let result = call_method(
        &*fixture.space,
        CallMethodRequest::new(NodeId::string(1, "Missing"), child(&alarm_id, "Enable"), vec![]),
        None,
    )
    .await;
    result.assert_status(StatusCode::BAD_NODE_ID_UNKNOWN);

    let result = call_method(
        &*fixture.space,
        CallMethodRequest::new(child(&alarm_id, "Quality"), child(&alarm_id, "Enable"), vec![]),
        None,
    )
    .await;
    result.assert_status(StatusCode::BAD_NODE_ID_INVALID);

    // Present but no handler installed.
    let result = call_method(
        &*fixture.space,
        CallMethodRequest::new(shelving_id.clone(), child(&shelving_id, "Unshelve"), vec![]),
        None,
    )
    .await;
    result.assert_status(StatusCode::BAD_NOT_IMPLEMENTED);
}

#[tokio::test]
async fn test_dispatch_batch_keeps_order() {
    init_test_logging();
    let (fixture, logic) = alarm_with_logic(ModelSettings::default());
    let alarm_id = fixture.node.node_id().clone();

    let requests = vec![
        CallMethodRequest::new(alarm_id.clone(), child(&alarm_id, "Disable"), vec![]),
        CallMethodRequest::new(alarm_id.clone(), child(&alarm_id, "Disable"), vec![]),
        CallMethodRequest::new(alarm_id.clone(), child(&alarm_id, "Enable"), vec![Variant::Int32(1)]),
        CallMethodRequest::new(alarm_id.clone(), child(&alarm_id, "Enable"), vec![]),
    ];
    let results = call(&*fixture.space, requests, None).await;

    let statuses: Vec<_> = results.iter().map(|r| r.status_code).collect();
    assert_eq!(
        statuses,
        vec![
            StatusCode::GOOD,
            StatusCode::BAD_CONDITION_ALREADY_DISABLED,
            StatusCode::BAD_TOO_MANY_ARGUMENTS,
            StatusCode::GOOD,
        ]
    );
    assert_eq!(logic.calls().len(), 3);
}

// =============================================================================
// File methods
// =============================================================================

async fn file_call(fixture: &Fixture<FileTypeNode>, method: &str, inputs: Vec<Variant>) -> CallMethodResult {
    let object = fixture.node.node_id().clone();
    let method = child(&object, method);
    call_method(&*fixture.space, CallMethodRequest::new(object, method, inputs), None).await
}

#[tokio::test]
async fn test_file_write_then_read_back() {
    init_test_logging();
    let fixture = FileFixtures::file();
    let file = InMemoryFile::new(fixture.node.clone(), b"old contents".to_vec());
    assert_eq!(file.install().unwrap(), 6);
    assert_eq!(fixture.node.size().unwrap(), Some(12));
    assert_eq!(fixture.node.open_count().unwrap(), Some(0));

    let mode = open_mode::READ | open_mode::WRITE | open_mode::ERASE_EXISTING;
    let outputs = file_call(&fixture, "Open", vec![Variant::Byte(mode)]).await;
    assert_eq!(outputs.assert_good(), &[Variant::UInt32(1)]);
    assert_eq!(fixture.node.open_count().unwrap(), Some(1));
    assert_eq!(fixture.node.size().unwrap(), Some(0));

    let data = ByteString::from(b"a,b\n".to_vec()).into_variant();
    file_call(&fixture, "Write", vec![Variant::UInt32(1), data]).await.assert_good();
    assert_eq!(fixture.node.size().unwrap(), Some(4));

    let position = file_call(&fixture, "GetPosition", vec![Variant::UInt32(1)]).await;
    assert_eq!(position.assert_good(), &[Variant::UInt64(4)]);

    file_call(&fixture, "SetPosition", vec![Variant::UInt32(1), Variant::UInt64(2)])
        .await
        .assert_good();
    let read = file_call(&fixture, "Read", vec![Variant::UInt32(1), Variant::Int32(100)]).await;
    assert_eq!(read.assert_good(), &[Variant::ByteString(ByteString::from(b"b\n".to_vec()))]);

    file_call(&fixture, "Close", vec![Variant::UInt32(1)]).await.assert_good();
    assert_eq!(fixture.node.open_count().unwrap(), Some(0));
    assert_eq!(file.contents(), b"a,b\n".to_vec());

    file_call(&fixture, "Read", vec![Variant::UInt32(1), Variant::Int32(1)])
        .await
        .assert_status(StatusCode::BAD_INVALID_ARGUMENT);
}

#[tokio::test]
async fn test_file_modes_are_enforced() {
    init_test_logging();
    let fixture = FileFixtures::file();
    let file = InMemoryFile::new(fixture.node.clone(), b"0123456789".to_vec());
    file.install().unwrap();

    file_call(&fixture, "Open", vec![Variant::Byte(open_mode::APPEND)])
        .await
        .assert_status(StatusCode::BAD_INVALID_ARGUMENT);

    let reader = file_call(&fixture, "Open", vec![Variant::Byte(open_mode::READ)]).await;
    let handle = reader.assert_good()[0].clone();
    let data = ByteString::from(b"x".to_vec()).into_variant();
    file_call(&fixture, "Write", vec![handle.clone(), data])
        .await
        .assert_status(StatusCode::BAD_INVALID_STATE);

    // A writer needs exclusive access.
    file_call(&fixture, "Open", vec![Variant::Byte(open_mode::WRITE)])
        .await
        .assert_status(StatusCode::BAD_NOT_WRITABLE);
    assert_eq!(file.open_count(), 1);

    // The wire type of Mode is Byte; a UInt32 is rejected before dispatch.
    file_call(&fixture, "Open", vec![Variant::UInt32(1)])
        .await
        .assert_invalid_arguments(&[StatusCode::BAD_TYPE_MISMATCH]);
    assert_eq!(file.open_count(), 1);
}

#[tokio::test]
async fn test_file_concurrent_readers() {
    init_test_logging();
    let fixture = FileFixtures::file();
    let file = InMemoryFile::new(fixture.node.clone(), b"abcdefgh".to_vec());
    file.install().unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let space = Arc::clone(&fixture.space);
        let object = fixture.node.node_id().clone();
        tasks.push(tokio::spawn(async move {
            let open = call_method(
                &*space,
                CallMethodRequest::new(object.clone(), child(&object, "Open"), vec![Variant::Byte(open_mode::READ)]),
                None,
            )
            .await;
            let handle = open.assert_good()[0].clone();
            let read = call_method(
                &*space,
                CallMethodRequest::new(object.clone(), child(&object, "Read"), vec![handle, Variant::Int32(3)]),
                None,
            )
            .await;
            read.assert_good().to_vec()
        }));
    }

    for task in tasks {
        let outputs = task.await.expect("reader task");
        assert_eq!(outputs, vec![Variant::ByteString(ByteString::from(b"abc".to_vec()))]);
    }
    assert_eq!(file.open_count(), 8);
    assert_eq!(fixture.node.open_count().unwrap(), Some(8));
}
