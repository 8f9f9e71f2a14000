use bytes::Bytes;
use redis_lite::{commands::CommandError, resp::RespValue};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_handle_lrange_command() {
    let env = TestEnv::new();

    env.exec_command_ok(
        TestUtils::rpush_command(
            "grape",
            &["mango", "raspberry", "apple", "banana", "kiwi", "pear"],
        ),
        TestUtils::expected_integer(6),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::lrange_command("grape", 0, -4),
            TestUtils::expected_array(&["mango", "raspberry", "apple"]),
        ),
        (
            TestUtils::lrange_command("grape", -4, -1),
            TestUtils::expected_array(&["apple", "banana", "kiwi", "pear"]),
        ),
        (
            TestUtils::lrange_command("grape", 0, -1),
            TestUtils::expected_array(&["mango", "raspberry", "apple", "banana", "kiwi", "pear"]),
        ),
        (
            TestUtils::lrange_command("grape", -100, 1),
            TestUtils::expected_array(&["mango", "raspberry"]),
        ),
        (
            TestUtils::lrange_command("grape", 4, 100),
            TestUtils::expected_array(&["kiwi", "pear"]),
        ),
        (TestUtils::lrange_command("grape", -1, -2), TestUtils::expected_empty_array()),
        (TestUtils::lrange_command("grape", 6, 10), TestUtils::expected_empty_array()),
        (TestUtils::lrange_command("grape", 3, 1), TestUtils::expected_empty_array()),
        (TestUtils::lrange_command("missing", 0, -1), TestUtils::expected_empty_array()),
    ];

    for (command, expected_response) in test_cases {
        env.exec_command_ok(command, expected_response).await;
    }
}

#[tokio::test]
async fn test_handle_lrange_command_invalid() {
    let env = TestEnv::new();

    env.exec_command_ok(
        TestUtils::set_command("fruit", "mango"),
        TestUtils::expected_simple_string("OK"),
    )
    .await;

    let test_cases = vec![
        (
            TestUtils::command(&["LRANGE", "grape", "0"]),
            CommandError::WrongNumberOfArguments("lrange"),
        ),
        (
            TestUtils::command(&["LRANGE", "grape", "first", "-1"]),
            CommandError::InvalidInteger,
        ),
        (
            TestUtils::command(&["LRANGE", "grape", "0", "1.5"]),
            CommandError::InvalidInteger,
        ),
        (TestUtils::lrange_command("fruit", 0, -1), CommandError::WrongType),
    ];

    for (command, expected_error) in test_cases {
        env.exec_command_err(command, expected_error).await;
    }
}

#[tokio::test]
async fn test_handle_lrange_command_binary_elements() {
    let env = TestEnv::new();
    let elements: [&[u8]; 3] = [b"\xff\xfe", b"\r\n", b""];

    env.exec_command_ok(
        TestUtils::binary_command(&[b"RPUSH", b"raw", elements[0], elements[1], elements[2]]),
        TestUtils::expected_integer(3),
    )
    .await;

    env.exec_command_ok(
        TestUtils::lrange_command("raw", 0, -1),
        RespValue::Array(
            elements
                .iter()
                .map(|element| RespValue::BulkString(Bytes::copy_from_slice(element)))
                .collect(),
        ),
    )
    .await;
}

#[tokio::test]
async fn test_repeated_lrange_returns_same_elements() {
    let env = TestEnv::new();

    env.exec_command_ok(
        TestUtils::rpush_command("grape", &["mango", "kiwi", "pear"]),
        TestUtils::expected_integer(3),
    )
    .await;

    let first = env
        .exec_command(TestUtils::lrange_command("grape", -2, -1))
        .await;
    let second = env
        .exec_command(TestUtils::lrange_command("grape", -2, -1))
        .await;

    assert_eq!(first, Ok(TestUtils::expected_array(&["kiwi", "pear"])));
    assert_eq!(first, second);

    env.exec_command_ok(TestUtils::llen_command("grape"), TestUtils::expected_integer(3))
        .await;
}
