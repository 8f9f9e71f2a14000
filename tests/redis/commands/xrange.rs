use redis_lite::{commands::CommandError, resp::RespValue};

use crate::test_utils::{TestEnv, TestUtils};

async fn populated_env() -> TestEnv {
    let env = TestEnv::new();

    for (id, temperature) in [("1-0", "19"), ("1-1", "20"), ("2-0", "21"), ("3-4", "22")] {
        env.exec_command_ok(
            TestUtils::xadd_command("sensor", id, &["temperature", temperature]),
            TestUtils::expected_bulk_string(id),
        )
        .await;
    }

    env
}

fn entries(ids_and_temperatures: &[(&str, &str)]) -> RespValue {
    RespValue::Array(
        ids_and_temperatures
            .iter()
            .map(|&(id, temperature)| TestUtils::expected_stream_entry(id, &["temperature", temperature]))
            .collect(),
    )
}

#[tokio::test]
async fn test_handle_xrange_command() {
    let env = populated_env().await;

    let test_cases = vec![
        (
            TestUtils::xrange_command("sensor", "-", "+"),
            entries(&[("1-0", "19"), ("1-1", "20"), ("2-0", "21"), ("3-4", "22")]),
        ),
        (
            TestUtils::xrange_command("sensor", "1-1", "2-0"),
            entries(&[("1-1", "20"), ("2-0", "21")]),
        ),
        (
            TestUtils::xrange_command("sensor", "1", "1"),
            entries(&[("1-0", "19"), ("1-1", "20")]),
        ),
        (
            TestUtils::xrange_command("sensor", "2", "+"),
            entries(&[("2-0", "21"), ("3-4", "22")]),
        ),
        (
            TestUtils::command(&["XRANGE", "sensor", "-", "+", "COUNT", "2"]),
            entries(&[("1-0", "19"), ("1-1", "20")]),
        ),
        (
            TestUtils::command(&["XRANGE", "sensor", "-", "+", "count", "0"]),
            TestUtils::expected_empty_array(),
        ),
        (
            TestUtils::xrange_command("sensor", "4", "+"),
            TestUtils::expected_empty_array(),
        ),
        (
            TestUtils::xrange_command("sensor", "3", "1"),
            TestUtils::expected_empty_array(),
        ),
        (
            TestUtils::xrange_command("missing", "-", "+"),
            TestUtils::expected_empty_array(),
        ),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, expected_response).await;
    }
}

#[tokio::test]
async fn test_handle_xrange_command_invalid() {
    let env = populated_env().await;

    env.exec_command_ok(
        TestUtils::set_command("fruit", "mango"),
        TestUtils::expected_simple_string("OK"),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::command(&["XRANGE", "sensor", "-"]),
            CommandError::WrongNumberOfArguments("xrange"),
        ),
        (
            TestUtils::xrange_command("sensor", "start", "+"),
            CommandError::InvalidStreamId,
        ),
        (
            TestUtils::xrange_command("sensor", "-", "1-x"),
            CommandError::InvalidStreamId,
        ),
        (
            TestUtils::command(&["XRANGE", "sensor", "-", "+", "COUNT"]),
            CommandError::SyntaxError,
        ),
        (
            TestUtils::command(&["XRANGE", "sensor", "-", "+", "LIMIT", "2"]),
            CommandError::SyntaxError,
        ),
        (
            TestUtils::command(&["XRANGE", "sensor", "-", "+", "COUNT", "many"]),
            CommandError::InvalidInteger,
        ),
        (TestUtils::xrange_command("fruit", "-", "+"), CommandError::WrongType),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_err(command, expected_error).await;
    }
}
