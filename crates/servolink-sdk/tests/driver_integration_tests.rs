//! 驱动层集成测试
//!
//! 针对模拟控制器验证命令通道、读取重试和 Active ID 选择。

use proptest::prelude::*;
use servolink_http::MockController;
use servolink_sdk::prelude::*;
use std::time::Duration;

fn driver(mock: &MockController, max_steps: Option<u32>) -> ServoDriver<MockController> {
    ServoDriverBuilder::new()
        .timeout(Duration::from_millis(50))
        .read_retries(3)
        .retry_delay(Duration::from_millis(5))
        .settle_delay(Duration::ZERO)
        .max_select_steps(max_steps)
        .build_with(mock.clone())
}

#[test]
fn test_send_command_to_unreachable_controller_returns_true() {
    let mock = MockController::new(0);
    mock.set_unreachable(true);
    let mut driver = driver(&mock, Some(8));

    assert!(driver.send(ServoOp::Torque));
    assert!(driver.send_raw(1, 4, 0, 0));
    assert_eq!(driver.metrics().commands_unconfirmed, 2);
}

#[test]
fn test_read_exhaustion_spacing() {
    let mock = MockController::new(0);
    mock.set_fail_all_reads(true);
    let mut driver = driver(&mock, Some(8));

    let err = driver.read_status().unwrap_err();
    assert!(matches!(
        err,
        DriverError::ReadExhausted { attempts: 3, .. }
    ));

    let times = mock.request_times("readSTS");
    assert_eq!(times.len(), 3);
    for pair in times.windows(2) {
        assert!(pair[1].duration_since(pair[0]) >= Duration::from_millis(5));
    }
}

#[test]
fn test_garbage_status_fails_selection_without_commands() {
    let mock = MockController::new(0);
    mock.set_status_override(Some("<p><p>no fields here".to_string()));
    let mut driver = driver(&mock, Some(8));

    assert!(matches!(
        driver.select_id(ServoId(4)),
        Err(DriverError::InvalidActiveId { .. })
    ));
    assert!(mock.commands().is_empty());
}

#[test]
fn test_frozen_controller_hits_step_limit() {
    let mock = MockController::new(10);
    mock.set_frozen(true);
    let mut driver = driver(&mock, Some(12));

    let err = driver.select_id(ServoId(0)).unwrap_err();
    assert!(matches!(
        err,
        DriverError::SelectionStepLimit { steps: 12, .. }
    ));
    assert_eq!(mock.id_step_count(), 12);
    assert!(matches!(
        driver.selection_state(),
        SelectionState::Failed { .. }
    ));
}

#[test]
fn test_unbounded_selection_still_converges() {
    let mock = MockController::new(200);
    let mut driver = driver(&mock, None);

    driver.select_id(ServoId(3)).unwrap();
    assert_eq!(mock.id_step_count(), 197);
}

#[test]
fn test_identity_is_verbatim() {
    let mock = MockController::new(0);
    mock.set_identity("ESP32  MAC: AA:BB");
    let mut driver = driver(&mock, Some(8));
    assert_eq!(driver.read_identity().unwrap(), "ESP32  MAC: AA:BB");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_selection_round_trips(start in 0u8..=253, target in 0u8..=253) {
        let mock = MockController::new(start as i64);
        let mut driver = driver(&mock, Some(256));

        prop_assert!(driver.select_id(ServoId(target)).is_ok());
        prop_assert_eq!(mock.id_step_count(), start.abs_diff(target) as usize);
        // 初始读取 + 每步一次回读
        prop_assert_eq!(
            mock.request_times("readSTS").len(),
            start.abs_diff(target) as usize + 1
        );
    }
}
