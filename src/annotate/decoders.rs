use crate::annotate::LineDecoder;
use once_cell::sync::Lazy;
use regex::Regex;

/// ACPI wake/capability bit names, bit 0 through bit 7.
const ACPI_CAPABILITY_BITS: [&str; 8] = [
    "rtc-alarm-wake",
    "pme-wake",
    "lan-wake",
    "usb-wake",
    "keyboard-wake",
    "mouse-wake",
    "s3-sleep",
    "s4-hibernate",
];

/// Boot-policy bit names, bit 0 through bit 7.
const BOOT_POLICY_BITS: [&str; 8] = [
    "quiet-boot",
    "network-boot",
    "usb-boot",
    "secure-boot",
    "boot-watchdog",
    "diag-mode",
    "pxe-first",
    "fast-boot",
];

/// System protection bit names, bit 0 through bit 4.
const PROTECTION_BITS: [&str; 5] = [
    "write-protect",
    "erase-lock",
    "rollback-guard",
    "debug-lock",
    "recovery-lock",
];

static CAPABILITY_BYTES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)capability\s+bytes\s*[:=]?\s*\b([0-9a-f]{2})\b[\s,;:/-]+\b([0-9a-f]{2})\b")
        .expect("capability bytes pattern is valid")
});

static PROTECTION_POLICY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)system\s+protection\s+policy\s*[:=]?\s*0x([0-9a-f]{1,2})\b.*?protection\s+mask\s*[:=]?\s*0x([0-9a-f]{1,2})\b",
    )
    .expect("protection policy pattern is valid")
});

fn active_names(byte: u8, table: &[&'static str]) -> Vec<&'static str> {
    table
        .iter()
        .enumerate()
        .filter(|(bit, _)| byte & (1 << bit) != 0)
        .map(|(_, name)| *name)
        .collect()
}

fn join_or_none(names: &[&str]) -> String {
    if names.is_empty() {
        "none".to_string()
    } else {
        names.join(", ")
    }
}

/// Decodes `capability bytes XX YY` lines against the ACPI wake/capability
/// and boot-policy bit tables.
pub struct CapabilityBytesDecoder;

impl CapabilityBytesDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CapabilityBytesDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder for CapabilityBytesDecoder {
    fn name(&self) -> &str {
        "capability-bytes"
    }

    fn decode(&self, line: &str) -> Option<String> {
        let captures = CAPABILITY_BYTES_RE.captures(line)?;

        let capability = u8::from_str_radix(&captures[1], 16).ok()?;
        let boot_policy = u8::from_str_radix(&captures[2], 16).ok()?;

        let capabilities = active_names(capability, &ACPI_CAPABILITY_BITS);
        let policies = active_names(boot_policy, &BOOT_POLICY_BITS);

        Some(format!(
            "capabilities=[{}] boot-policy=[{}]",
            join_or_none(&capabilities),
            join_or_none(&policies)
        ))
    }
}

/// Decodes `system protection policy 0xNN … protection mask 0xMM` lines
/// against the 5-bit protection name table.
///
/// A named bit is supported iff the mask bit is set; a supported bit is
/// active iff the policy bit is set.
pub struct ProtectionPolicyDecoder;

impl ProtectionPolicyDecoder {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ProtectionPolicyDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LineDecoder for ProtectionPolicyDecoder {
    fn name(&self) -> &str {
        "protection-policy"
    }

    fn decode(&self, line: &str) -> Option<String> {
        let captures = PROTECTION_POLICY_RE.captures(line)?;

        let policy = u8::from_str_radix(&captures[1], 16).ok()?;
        let mask = u8::from_str_radix(&captures[2], 16).ok()?;

        let mut supported = Vec::new();
        let mut active = Vec::new();
        let mut inactive = Vec::new();
        let mut unsupported = Vec::new();

        for (bit, name) in PROTECTION_BITS.iter().enumerate() {
            if mask & (1 << bit) != 0 {
                supported.push(*name);
                if policy & (1 << bit) != 0 {
                    active.push(*name);
                } else {
                    inactive.push(*name);
                }
            } else {
                unsupported.push(*name);
            }
        }

        Some(format!(
            "supported=[{}] active=[{}] inactive=[{}] unsupported=[{}]",
            join_or_none(&supported),
            join_or_none(&active),
            join_or_none(&inactive),
            join_or_none(&unsupported)
        ))
    }
}
