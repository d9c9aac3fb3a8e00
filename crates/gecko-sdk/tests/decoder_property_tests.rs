//! 解码器与命令表的属性测试
//!
//! 使用 proptest 验证对所有输入都成立的性质。

use gecko_sdk::prelude::*;
use gecko_sdk::protocol::{StatusFlags, raw_bytes_to_f64};
use proptest::prelude::*;

/// 有限取值的遥测槽位
fn slot() -> impl Strategy<Value = f64> {
    prop_oneof![Just(0.0), Just(1.0), -1.0e6..1.0e6f64]
}

fn status_vector() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(slot(), 11..16)
}

fn command_id() -> impl Strategy<Value = CommandId> {
    prop::sample::select(CommandId::ALL.to_vec())
}

fn legacy_vector(word: u16, err: u16, time: u16) -> Vec<f64> {
    let [status_h, status_l] = word.to_be_bytes();
    let [err_l, err_h] = err.to_le_bytes();
    let [time_l, time_h] = time.to_le_bytes();
    let mut values = vec![0.0; 11];
    values[7] = raw_bytes_to_f64([0xFF, 0xFF, 0xFD, 0x00, err_l, err_h, time_l, time_h]);
    values[8] = raw_bytes_to_f64([status_h, status_l, 0, 0, 0, 0, 0, 0]);
    values
}

proptest! {
    /// 短向量总是无效，且不改变已发布状态
    #[test]
    fn short_vector_is_invalid(values in prop::collection::vec(any::<f64>(), 0..11)) {
        let controller = Controller::new();
        let before = controller.on_telemetry(&[0.0, 0.0, 5.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0, 2.0]);

        let state = controller.on_telemetry(&values);
        prop_assert!(!state.validity);
        prop_assert_eq!(controller.snapshot(), before);
    }

    /// 槽位 0 非零（批量数据包）总是无效
    #[test]
    fn bulk_packet_is_invalid(mut values in status_vector(), flag in prop_oneof![-1.0e6..-0.5f64, 0.5..1.0e6f64]) {
        values[0] = flag;
        let controller = Controller::new();
        prop_assert!(!controller.on_telemetry(&values).validity);
    }

    /// 槽位 7 带同步字时，槽位 0 非零仍判为批量数据包
    #[test]
    fn bulk_packet_with_sync_pattern_is_invalid(
        word in any::<u16>(),
        time in any::<u16>(),
        flag in prop_oneof![-1.0e6..-0.5f64, 0.5..1.0e6f64],
    ) {
        let mut values = legacy_vector(word, 0, time);
        values[0] = flag;

        let controller = Controller::new();
        prop_assert!(!controller.on_telemetry(&values).validity);
        prop_assert_eq!(controller.metrics_snapshot().unsupported_packets, 1);

        let forced = Controller::builder()
            .telemetry_format(TelemetryFormat::BitPacked)
            .build()
            .unwrap();
        prop_assert!(!forced.on_telemetry(&values).validity);
    }

    /// 过温位为真时，无论其他槽位如何都无效
    #[test]
    fn overtemperature_is_invalid(mut values in status_vector(), overtemp in prop_oneof![-1.0e6..-0.5f64, 0.5..1.0e6f64]) {
        values[3] = overtemp;
        let controller = Controller::new();
        let state = controller.on_telemetry(&values);
        prop_assert!(!state.validity);
    }

    /// 旧版位打包格式：状态字最高位为真时无效
    #[test]
    fn legacy_overtemperature_is_invalid(word in any::<u16>(), err in any::<u16>(), time in any::<u16>()) {
        let controller = Controller::new();
        let state = controller.on_telemetry(&legacy_vector(word | 0x8000, err, time));
        prop_assert!(!state.validity);
        prop_assert!(state.overtemperature_flag);
    }

    /// 旧版位打包格式：其余状态位按名表逐位映射
    #[test]
    fn legacy_flags_follow_table(word in 0u16..0x8000, time in any::<u16>()) {
        let controller = Controller::new();
        let state = controller.on_telemetry(&legacy_vector(word, 0, time));
        let flags = StatusFlags::from_word(word);

        prop_assert!(state.validity);
        prop_assert_eq!(state.last_status_read_time, i64::from(time));
        prop_assert_eq!(state.experiment_in_progress, flags.experiment_in_progress);
        prop_assert_eq!(state.file_is_open, flags.file_is_open);
        prop_assert_eq!(state.automatic_mode_enable, flags.automatic_mode_enable);
        prop_assert_eq!(state.wrist_lock, flags.wrist_lock);
        prop_assert_eq!(state.adhesive_engage, flags.adhesive_engage);
    }

    /// 有效状态包：整数字段截断、布尔字段按非零判断
    #[test]
    fn status_packet_fields_follow_slots(mut values in status_vector()) {
        values[0] = 0.0;
        values[3] = 0.0;
        let controller = Controller::new();
        let state = controller.on_telemetry(&values);

        prop_assert!(state.validity);
        prop_assert_eq!(state.last_status_read_time, values[2] as i64);
        prop_assert_eq!(state.experiment_in_progress, values[4] != 0.0);
        prop_assert_eq!(state.file_is_open, values[5] != 0.0);
        prop_assert_eq!(state.automatic_mode_enable, values[6] != 0.0);
        prop_assert_eq!(state.wrist_lock, values[7] != 0.0);
        prop_assert_eq!(state.adhesive_engage, values[8] != 0.0);
        prop_assert_eq!(state.delay, values[9] as i32);
        prop_assert_eq!(state.exp_idx, values[10] as i32);
    }

    /// 默认策略下错误码只会被清零，不会写入非零值
    #[test]
    fn error_status_only_cleared(errors in prop::collection::vec(-100i32..100, 1..20)) {
        let controller = Controller::new();
        for err in errors {
            let values = [0.0, f64::from(err), 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
            let state = controller.on_telemetry(&values);
            prop_assert_eq!(state.error_status, 0);
        }
    }

    /// 编码后再反查得到同一命令
    #[test]
    fn command_round_trip(id in command_id(), prefix in "[a-z_]{0,16}", value in -100.0..100.0f64) {
        let table = CommandTable::with_prefix(prefix);
        let params = table.encode(id, Some(value));
        let names: Vec<&str> = params.iter().map(|p| p.name.as_ref()).collect();
        prop_assert_eq!(table.identify(&names), Ok(id));
    }

    /// 只有携带数值的命令使用调用方数值
    #[test]
    fn caller_value_only_for_value_commands(id in command_id(), value in 1.0..100.0f64) {
        let params = CommandTable::new().encode(id, Some(value));
        let expected = if id.takes_value() { value } else { 0.0 };
        prop_assert!(params.iter().all(|p| p.value == expected));
    }

    /// 触发后在重新使能之前不再触发
    #[test]
    fn monitor_fires_once_per_arming(samples in prop::collection::vec(-10.0..10.0f64, 1..50)) {
        let controller = Controller::new();
        controller.arm();
        prop_assert!(controller.on_error(1.0).is_some());

        for sample in samples {
            prop_assert!(controller.on_error(sample).is_none());
        }
        prop_assert_eq!(controller.monitor_state(), MonitorState::Disarmed);
    }

    /// 使能状态下，越过容差的第一个样本恰好触发一次
    #[test]
    fn monitor_triggers_on_first_crossing(samples in prop::collection::vec(-1.0..1.0f64, 1..50)) {
        let controller = Controller::new();
        controller.arm();
        let tolerance = controller.tolerance();

        let first_crossing = samples.iter().position(|e| e.abs() >= tolerance);
        let fired: Vec<usize> = samples
            .iter()
            .enumerate()
            .filter_map(|(i, e)| controller.on_error(*e).map(|_| i))
            .collect();

        prop_assert_eq!(fired, first_crossing.into_iter().collect::<Vec<_>>());
    }
}
