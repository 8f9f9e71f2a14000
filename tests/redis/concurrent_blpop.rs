use std::{collections::HashSet, time::Duration};

use redis_lite::resp::RespValue;

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_blpop_concurrent_clients_simple_blocking() {
    let env = TestEnv::new();

    // Client tries to BLPOP from empty list (should block)
    let client_task = TestUtils::spawn_blpop_task(&env, "test_list", "2");

    // Give client time to register as a blocked client
    TestUtils::sleep_ms(100).await;

    env.exec_command_ok(
        TestUtils::rpush_command("test_list", &["item1"]),
        TestUtils::expected_integer(1),
    )
    .await;

    let client_result = TestUtils::wait_for_completion(client_task, Duration::from_secs(3)).await;

    assert_eq!(
        client_result,
        Ok(TestUtils::expected_array(&["test_list", "item1"]))
    );
}

#[tokio::test]
async fn test_blpop_concurrent_clients_first_come_first_served() {
    let env = TestEnv::new();

    let first = TestUtils::spawn_blpop_task(&env, "test_queue", "0");
    TestUtils::sleep_ms(50).await;
    let second = TestUtils::spawn_blpop_task(&env, "test_queue", "0");
    TestUtils::sleep_ms(50).await;

    env.exec_command_ok(
        TestUtils::rpush_command("test_queue", &["first_item"]),
        TestUtils::expected_integer(1),
    )
    .await;

    env.exec_command_ok(
        TestUtils::rpush_command("test_queue", &["second_item"]),
        TestUtils::expected_integer(1),
    )
    .await;

    assert_eq!(
        TestUtils::wait_for_completion(first, Duration::from_secs(2)).await,
        Ok(TestUtils::expected_array(&["test_queue", "first_item"]))
    );
    assert_eq!(
        TestUtils::wait_for_completion(second, Duration::from_secs(2)).await,
        Ok(TestUtils::expected_array(&["test_queue", "second_item"]))
    );
}

#[tokio::test]
async fn test_blpop_single_push_serves_waiters_in_order() {
    let env = TestEnv::new();
    let mut tasks = vec![];

    for _ in 0..3 {
        tasks.push(TestUtils::spawn_blpop_task(&env, "test_queue", "0"));
        TestUtils::sleep_ms(20).await;
    }

    // Two elements for three waiters: the oldest two are served.
    env.exec_command_ok(
        TestUtils::rpush_command("test_queue", &["a", "b"]),
        TestUtils::expected_integer(2),
    )
    .await;

    let mut tasks = tasks.into_iter();
    let first = tasks.next().expect("three tasks");
    let second = tasks.next().expect("three tasks");
    let third = tasks.next().expect("three tasks");

    assert_eq!(
        TestUtils::wait_for_completion(first, Duration::from_secs(2)).await,
        Ok(TestUtils::expected_array(&["test_queue", "a"]))
    );
    assert_eq!(
        TestUtils::wait_for_completion(second, Duration::from_secs(2)).await,
        Ok(TestUtils::expected_array(&["test_queue", "b"]))
    );

    TestUtils::sleep_ms(20).await;
    assert!(!third.is_finished());
    assert_eq!(
        env.get_database().await.state.blocked_client_count(b"test_queue"),
        1
    );

    env.exec_command_ok(
        TestUtils::lpush_command("test_queue", &["c"]),
        TestUtils::expected_integer(1),
    )
    .await;

    assert_eq!(
        TestUtils::wait_for_completion(third, Duration::from_secs(2)).await,
        Ok(TestUtils::expected_array(&["test_queue", "c"]))
    );
    assert!(env.get_database().await.state.blocked_clients.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_blpop_no_element_delivered_twice() {
    let env = TestEnv::new();
    let clients = 20;
    let mut tasks = vec![];

    for _ in 0..clients {
        tasks.push(TestUtils::spawn_blpop_task(&env, "jobs", "5"));
    }

    TestUtils::sleep_ms(100).await;

    let mut pushers = vec![];

    for i in 0..clients {
        let env = env.clone();
        let command = TestUtils::rpush_command("jobs", &[format!("job{}", i).as_str()]);

        pushers.push(tokio::spawn(async move { env.exec_command(command).await }));
    }

    for pusher in pushers {
        assert!(pusher.await.expect("push task panicked").is_ok());
    }

    let mut received = HashSet::new();

    for task in tasks {
        let result = TestUtils::wait_for_completion(task, Duration::from_secs(5)).await;

        let pair = match result {
            Ok(RespValue::Array(pair)) => pair,
            other => panic!("expected [key, element], got {:?}", other),
        };

        assert!(received.insert(pair[1].encode()), "{:?} delivered twice", pair[1]);
    }

    assert_eq!(received.len(), clients);

    env.exec_command_ok(TestUtils::llen_command("jobs"), TestUtils::expected_integer(0))
        .await;
    assert!(env.get_database().await.state.blocked_clients.is_empty());
}

#[tokio::test]
async fn test_blpop_timeout_leaves_other_waiters_in_order() {
    let env = TestEnv::new();

    let impatient = TestUtils::spawn_blpop_task(&env, "test_queue", "0.05");
    TestUtils::sleep_ms(10).await;
    let patient = TestUtils::spawn_blpop_task(&env, "test_queue", "0");
    TestUtils::sleep_ms(10).await;
    let last = TestUtils::spawn_blpop_task(&env, "test_queue", "0");

    assert_eq!(
        TestUtils::wait_for_completion(impatient, Duration::from_secs(2)).await,
        Ok(TestUtils::expected_null_array())
    );
    assert_eq!(
        env.get_database().await.state.blocked_client_count(b"test_queue"),
        2
    );

    env.exec_command_ok(
        TestUtils::rpush_command("test_queue", &["x"]),
        TestUtils::expected_integer(1),
    )
    .await;

    assert_eq!(
        TestUtils::wait_for_completion(patient, Duration::from_secs(2)).await,
        Ok(TestUtils::expected_array(&["test_queue", "x"]))
    );

    last.abort();
}
