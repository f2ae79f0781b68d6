use std::path::PathBuf;

use kanban::error::{exit_codes, Error};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::InvalidArgument("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::TaskNotFound("list1-card-1".to_string());
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let list = Error::ListNotFound("list9".to_string());
    assert_eq!(list.exit_code(), exit_codes::USER_ERROR);

    let op = Error::OperationFailed("boom".to_string());
    assert_eq!(op.exit_code(), exit_codes::OPERATION_FAILED);

    let lock = Error::LockFailed(PathBuf::from("kanbanData.json.lock"));
    assert_eq!(lock.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn details_name_the_missing_task() {
    let err = Error::TaskNotFound("list2-card-7".to_string());
    assert!(err.to_string().contains("Task not found"));
    assert_eq!(
        err.details(),
        Some(serde_json::json!({ "task_id": "list2-card-7" }))
    );
}

#[test]
fn io_errors_are_operation_failures() {
    let err: Error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope").into();
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    assert!(err.details().is_none());
}
