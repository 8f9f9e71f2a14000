use redis_lite::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_lpush_command() {
    let env = TestEnv::new();

    env.exec_command_ok(
        TestUtils::lpush_command("grape", &["x", "y"]),
        TestUtils::expected_integer(2),
    )
    .await;

    env.exec_command_ok(
        TestUtils::lrange_command("grape", 0, -1),
        TestUtils::expected_array(&["y", "x"]),
    )
    .await;

    env.exec_command_ok(
        TestUtils::lpush_command("grape", &["a", "b", "c"]),
        TestUtils::expected_integer(5),
    )
    .await;

    env.exec_command_ok(
        TestUtils::lrange_command("grape", 0, -1),
        TestUtils::expected_array(&["c", "b", "a", "y", "x"]),
    )
    .await;
}

#[tokio::test]
async fn test_handle_lpush_command_invalid() {
    let env = TestEnv::new();

    env.exec_command_err(
        TestUtils::command(&["LPUSH", "grape"]),
        CommandError::WrongNumberOfArguments("lpush"),
    )
    .await;
}
