mod support;

use predicates::str::contains;

use support::TestBoard;

#[test]
fn storage_key_selects_snapshot_file() {
    let board = TestBoard::new();
    board.write_config("[storage]\nkey = \"work\"\n");

    board.cmd().args(["add", "Ticket"]).assert().success();

    assert!(board.path().join("work.json").exists());
    assert!(board.read_snapshot_raw().is_none());
}

#[test]
fn default_list_applies_to_add() {
    let board = TestBoard::new();
    board.write_config("[ui]\ndefault_list = \"list2\"\n");

    board
        .cmd()
        .args(["add", "Straight to work"])
        .assert()
        .success()
        .stdout(contains("List: In Progress"));

    assert_eq!(board.read_snapshot()["list2"][0]["text"], "Straight to work");
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let board = TestBoard::new();
    board.write_config("[ui]\ntoast_ms = 0\n");

    board.cmd().args(["add", "Still works"]).assert().success();
    assert_eq!(board.read_snapshot()["list1"][0]["text"], "Still works");
}
