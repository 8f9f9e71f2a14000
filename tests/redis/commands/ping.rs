use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_ping_command() {
    let env = TestEnv::new();

    let test_cases = vec![
        (TestUtils::ping_command(), TestUtils::expected_simple_string("PONG")),
        (
            TestUtils::command(&["ping", "hello world"]),
            TestUtils::expected_bulk_string("hello world"),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, expected_response).await;
    }
}
