use super::*;
use serial_test::serial;

// ============================================================================
// MESSAGE TRACKER
// ============================================================================

#[test]
fn test_message_tracker_counts_identical_messages() {
    let mut tracker = MessageTracker::default();
    assert_eq!(tracker.track_message("a"), 1);
    assert_eq!(tracker.track_message("b"), 1);
    assert_eq!(tracker.track_message("a"), 2);
    assert_eq!(tracker.track_message("a"), 3);
    assert_eq!(tracker.repeated_count(), 1);
}

#[test]
fn test_message_tracker_is_bounded() {
    let mut tracker = MessageTracker::default();
    for i in 0..MAX_TRACKED_MESSAGES + 10 {
        assert_eq!(tracker.track_message(&format!("message {}", i)), 1);
    }
    assert_eq!(tracker.tracked_count(), MAX_TRACKED_MESSAGES);

    // Known messages still group, untracked ones stay first occurrences
    assert_eq!(tracker.track_message("message 0"), 2);
    let overflow = format!("message {}", MAX_TRACKED_MESSAGES + 5);
    assert_eq!(tracker.track_message(&overflow), 1);
    assert_eq!(tracker.tracked_count(), MAX_TRACKED_MESSAGES);
}

// ============================================================================
// STATISTICS
// ============================================================================

#[test]
fn test_stats_tracker_increments_by_severity() {
    let tracker = ValidationStatsTracker::new();
    tracker.increment(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR);
    tracker.increment(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING);
    tracker.increment(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING);
    tracker.increment(vk::DebugUtilsMessageSeverityFlagsEXT::INFO);
    tracker.increment(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE);

    let stats = tracker.get_stats();
    assert_eq!(
        stats,
        ValidationStats { errors: 1, warnings: 2, info: 1, verbose: 1 }
    );
    assert_eq!(stats.total(), 5);

    tracker.reset();
    assert_eq!(tracker.get_stats(), ValidationStats::default());
}

#[test]
#[serial]
fn test_handle_message_updates_global_stats() {
    init_debug_config(ValidationSeverity::All);
    assert_eq!(get_validation_stats().total(), 0);

    handle_message(
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
        "VUID-test",
        "same message",
    );
    handle_message(
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
        "VUID-test",
        "same message",
    );
    handle_message(
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
        vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        "perf",
        "other message",
    );

    let stats = get_validation_stats();
    assert_eq!(stats.errors, 2);
    assert_eq!(stats.warnings, 1);

    let repeated = MESSAGE_TRACKER
        .lock()
        .unwrap()
        .as_ref()
        .map(MessageTracker::repeated_count);
    assert_eq!(repeated, Some(1));

    // Re-initializing starts from scratch
    init_debug_config(ValidationSeverity::ErrorsOnly);
    assert_eq!(get_validation_stats().total(), 0);
    cleanup_debug_config();
}

// ============================================================================
// CALLBACK
// ============================================================================

#[test]
#[serial]
fn test_callback_ignored_after_cleanup() {
    init_debug_config(ValidationSeverity::All);
    cleanup_debug_config();

    let data = vk::DebugUtilsMessengerCallbackDataEXT::default().message(c"ignored");
    let result = unsafe {
        vulkan_debug_callback(
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            &data,
            std::ptr::null_mut(),
        )
    };

    assert_eq!(result, vk::FALSE);
    assert_eq!(get_validation_stats().total(), 0);
}

#[test]
#[serial]
fn test_callback_counts_and_never_aborts() {
    init_debug_config(ValidationSeverity::All);

    let data = vk::DebugUtilsMessengerCallbackDataEXT::default()
        .message_id_name(c"VUID-vkCreateRenderPass-test")
        .message(c"test message");
    let result = unsafe {
        vulkan_debug_callback(
            vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
            vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            &data,
            std::ptr::null_mut(),
        )
    };
    let null_result = unsafe {
        vulkan_debug_callback(
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL,
            std::ptr::null(),
            std::ptr::null_mut(),
        )
    };

    assert_eq!(result, vk::FALSE);
    assert_eq!(null_result, vk::FALSE);
    assert_eq!(get_validation_stats(), ValidationStats { errors: 0, warnings: 1, info: 0, verbose: 0 });
    cleanup_debug_config();
}

// ============================================================================
// SEVERITY FLAGS
// ============================================================================

#[test]
fn test_severity_flags() {
    assert_eq!(
        severity_flags(ValidationSeverity::ErrorsOnly),
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
    );
    assert!(severity_flags(ValidationSeverity::ErrorsAndWarnings)
        .contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING));
    assert!(!severity_flags(ValidationSeverity::ErrorsAndWarnings)
        .contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO));
    assert!(severity_flags(ValidationSeverity::All)
        .contains(vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE));
}

#[test]
fn test_message_type_name() {
    assert_eq!(message_type_name(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION), "Validation");
    assert_eq!(message_type_name(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE), "Performance");
    assert_eq!(message_type_name(vk::DebugUtilsMessageTypeFlagsEXT::GENERAL), "General");
}
