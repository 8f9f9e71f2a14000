use redis_lite::commands::CommandError;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_llen_command() {
    let env = TestEnv::new();

    env.exec_command_ok(TestUtils::llen_command("grape"), TestUtils::expected_integer(0))
        .await;

    env.exec_command_ok(
        TestUtils::rpush_command("grape", &["mango", "raspberry", "apple"]),
        TestUtils::expected_integer(3),
    )
    .await;

    env.exec_command_ok(TestUtils::llen_command("grape"), TestUtils::expected_integer(3))
        .await;
}

#[tokio::test]
async fn test_handle_llen_command_invalid() {
    let env = TestEnv::new();

    env.exec_command_ok(
        TestUtils::set_command("fruit", "mango"),
        TestUtils::expected_simple_string("OK"),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::command(&["LLEN"]),
            CommandError::WrongNumberOfArguments("llen"),
        ),
        (TestUtils::llen_command("fruit"), CommandError::WrongType),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_err(command, expected_error).await;
    }
}
