/// Vulkan Debug Messenger - routes validation layer messages to the forge logger
///
/// Messages are logged through the `forge_*!` macros under the
/// `forge::vulkan::validation` source. Counts per severity are kept in
/// atomics, and identical messages are grouped so repeats show a `[xN]`
/// suffix.

use ash::vk;
use colored::*;
use rustc_hash::FxHashMap;
use std::ffi::CStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use crate::vulkan_context::ValidationSeverity;

const SOURCE: &str = "forge::vulkan::validation";

/// Global debug configuration (shared across callbacks)
static DEBUG_CONFIG: Mutex<Option<ValidationSeverity>> = Mutex::new(None);

/// Global validation statistics
static VALIDATION_STATS: ValidationStatsTracker = ValidationStatsTracker::new();

/// Global message tracker for grouping identical messages
static MESSAGE_TRACKER: Mutex<Option<MessageTracker>> = Mutex::new(None);

/// Validation message counts since the context was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationStats {
    pub errors: u32,
    pub warnings: u32,
    pub info: u32,
    pub verbose: u32,
}

impl ValidationStats {
    pub fn total(&self) -> u32 {
        self.errors + self.warnings + self.info + self.verbose
    }
}

struct ValidationStatsTracker {
    errors: AtomicU32,
    warnings: AtomicU32,
    info: AtomicU32,
    verbose: AtomicU32,
}

impl ValidationStatsTracker {
    const fn new() -> Self {
        Self {
            errors: AtomicU32::new(0),
            warnings: AtomicU32::new(0),
            info: AtomicU32::new(0),
            verbose: AtomicU32::new(0),
        }
    }

    fn increment(&self, severity: vk::DebugUtilsMessageSeverityFlagsEXT) {
        let counter = if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
            &self.errors
        } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
            &self.warnings
        } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
            &self.info
        } else {
            &self.verbose
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> ValidationStats {
        ValidationStats {
            errors: self.errors.load(Ordering::Relaxed),
            warnings: self.warnings.load(Ordering::Relaxed),
            info: self.info.load(Ordering::Relaxed),
            verbose: self.verbose.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.errors.store(0, Ordering::Relaxed);
        self.warnings.store(0, Ordering::Relaxed);
        self.info.store(0, Ordering::Relaxed);
        self.verbose.store(0, Ordering::Relaxed);
    }
}

/// Distinct messages remembered for grouping, later ones are not tracked
const MAX_TRACKED_MESSAGES: usize = 1024;

/// Counts occurrences of identical messages
#[derive(Default)]
struct MessageTracker {
    messages: FxHashMap<String, u32>,
}

impl MessageTracker {
    /// Occurrences of `message` so far, including this one
    ///
    /// Once `MAX_TRACKED_MESSAGES` distinct messages are stored, unknown
    /// messages are reported as first occurrences and not stored.
    fn track_message(&mut self, message: &str) -> u32 {
        if let Some(count) = self.messages.get_mut(message) {
            *count += 1;
            return *count;
        }
        if self.messages.len() < MAX_TRACKED_MESSAGES {
            self.messages.insert(message.to_string(), 1);
        }
        1
    }

    #[cfg(test)]
    fn tracked_count(&self) -> usize {
        self.messages.len()
    }

    fn repeated_count(&self) -> usize {
        self.messages.values().filter(|&&count| count > 1).count()
    }
}

/// Initialize debug configuration, resetting statistics
pub fn init_debug_config(severity: ValidationSeverity) {
    VALIDATION_STATS.reset();
    if let Ok(mut tracker) = MESSAGE_TRACKER.lock() {
        *tracker = Some(MessageTracker::default());
    }
    if let Ok(mut config) = DEBUG_CONFIG.lock() {
        *config = Some(severity);
    }
}

/// Stop handling messages, e.g. right before the messenger is destroyed
pub fn cleanup_debug_config() {
    if let Ok(mut config) = DEBUG_CONFIG.lock() {
        *config = None;
    }
}

/// Current validation statistics
pub fn get_validation_stats() -> ValidationStats {
    VALIDATION_STATS.get_stats()
}

/// Print validation statistics report
pub fn print_validation_stats_report() {
    let stats = get_validation_stats();

    if stats.total() == 0 {
        println!("\n{}", "✓ No validation messages".green().bold());
        return;
    }

    println!("\n{}", "=== Validation Statistics Report ===".bright_blue().bold());
    if stats.errors > 0 {
        println!("  {} {}", "Errors:".red().bold(), stats.errors);
    }
    if stats.warnings > 0 {
        println!("  {} {}", "Warnings:".yellow().bold(), stats.warnings);
    }
    if stats.info > 0 {
        println!("  {} {}", "Info:".cyan(), stats.info);
    }
    if stats.verbose > 0 {
        println!("  {} {}", "Verbose:".bright_black(), stats.verbose);
    }
    println!("  {} {}", "Total:".white().bold(), stats.total());

    if let Ok(tracker) = MESSAGE_TRACKER.lock() {
        let repeated = tracker.as_ref().map_or(0, MessageTracker::repeated_count);
        if repeated > 0 {
            println!("\n  {} {} message(s) appeared multiple times", "ℹ".cyan(), repeated);
        }
    }

    println!("{}\n", "====================================".bright_blue().bold());
}

/// Severities the messenger is created with
pub fn severity_flags(severity: ValidationSeverity) -> vk::DebugUtilsMessageSeverityFlagsEXT {
    match severity {
        ValidationSeverity::ErrorsOnly => vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
        ValidationSeverity::ErrorsAndWarnings => {
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
        }
        ValidationSeverity::All => {
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::INFO
                | vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE
        }
    }
}

fn message_type_name(message_type: vk::DebugUtilsMessageTypeFlagsEXT) -> &'static str {
    if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION) {
        "Validation"
    } else if message_type.contains(vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE) {
        "Performance"
    } else {
        "General"
    }
}

/// Count, group and log one message
fn handle_message(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    message_id_name: &str,
    message: &str,
) {
    VALIDATION_STATS.increment(severity);

    let occurrences = match MESSAGE_TRACKER.lock() {
        Ok(mut tracker) => tracker.get_or_insert_with(MessageTracker::default).track_message(message),
        Err(_) => 1,
    };
    let repeat = if occurrences > 1 {
        format!(" [x{}]", occurrences)
    } else {
        String::new()
    };

    let type_name = message_type_name(message_type);
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        render_forge::forge_error!(SOURCE, "[{}]{} {}: {}", type_name, repeat, message_id_name, message);
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        render_forge::forge_warn!(SOURCE, "[{}]{} {}: {}", type_name, repeat, message_id_name, message);
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        render_forge::forge_info!(SOURCE, "[{}]{} {}: {}", type_name, repeat, message_id_name, message);
    } else {
        render_forge::forge_trace!(SOURCE, "[{}]{} {}: {}", type_name, repeat, message_id_name, message);
    }
}

/// Vulkan debug messenger callback
///
/// Called by the validation layers. Never asks Vulkan to abort the call.
pub unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    let configured = matches!(DEBUG_CONFIG.lock().as_deref(), Ok(Some(_)));
    if !configured || p_callback_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = &*p_callback_data;
    let message_id_name = if callback_data.p_message_id_name.is_null() {
        "Unknown"
    } else {
        CStr::from_ptr(callback_data.p_message_id_name)
            .to_str()
            .unwrap_or("Invalid UTF-8")
    };
    let message = if callback_data.p_message.is_null() {
        "No message"
    } else {
        CStr::from_ptr(callback_data.p_message)
            .to_str()
            .unwrap_or("Invalid UTF-8")
    };

    handle_message(message_severity, message_type, message_id_name, message);

    vk::FALSE
}

#[cfg(test)]
#[path = "debug_tests.rs"]
mod tests;
