//! Instruction-set capability table.
//!
//! The original harness selected legal opcode variants per architecture at
//! build time. Here that selection is a runtime table keyed by the device's
//! compute capability, resolved once at startup; drivers consult it to skip
//! variants the device cannot legalize.

use crate::device::DeviceProperties;

/// Known NVRTC target architectures, newest first.
///
/// Payload compilation targets the newest entry the device supports, so a
/// device ahead of this table still gets a valid (if conservative) target.
const NVRTC_ARCHS: &[((u32, u32), &str)] = &[
    ((9, 0), "sm_90"),
    ((8, 9), "sm_89"),
    ((8, 6), "sm_86"),
    ((8, 0), "sm_80"),
    ((7, 5), "sm_75"),
    ((7, 0), "sm_70"),
    ((6, 1), "sm_61"),
    ((6, 0), "sm_60"),
    ((5, 3), "sm_53"),
    ((5, 2), "sm_52"),
];

/// Capability flags resolved from a device's compute capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCaps {
    cc: (u32, u32),
}

impl DeviceCaps {
    /// Resolves the capability table for a device. Called once at startup.
    #[must_use]
    pub fn resolve(props: &DeviceProperties) -> Self {
        Self {
            cc: props.compute_capability,
        }
    }

    /// Builds the table directly from a compute capability.
    #[must_use]
    pub const fn from_compute_capability(major: u32, minor: u32) -> Self {
        Self { cc: (major, minor) }
    }

    /// Returns whether the device meets a minimum compute capability.
    #[must_use]
    pub fn meets(&self, min: (u32, u32)) -> bool {
        self.cc >= min
    }

    /// Packed fp16 (`f16x2`) arithmetic.
    #[must_use]
    pub fn fp16_arithmetic(&self) -> bool {
        self.meets((5, 3))
    }

    /// Global-memory atomic add on `f16x2` and `f64`.
    #[must_use]
    pub fn wide_global_atomics(&self) -> bool {
        self.meets((6, 0))
    }

    /// Four-way byte dot product (`dp4a`).
    #[must_use]
    pub fn dp4a(&self) -> bool {
        self.meets((6, 1))
    }

    /// NVRTC target architecture string for payload compilation.
    #[must_use]
    pub fn nvrtc_arch(&self) -> &'static str {
        NVRTC_ARCHS
            .iter()
            .find(|(min, _)| self.cc >= *min)
            .map(|(_, arch)| *arch)
            .unwrap_or("sm_52")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_maxwell_has_no_packed_ops() {
        let caps = DeviceCaps::from_compute_capability(5, 2);
        assert!(!caps.fp16_arithmetic());
        assert!(!caps.dp4a());
        assert!(!caps.wide_global_atomics());
        assert_eq!(caps.nvrtc_arch(), "sm_52");
    }

    #[test]
    fn test_pascal_gains_dp4a() {
        let caps = DeviceCaps::from_compute_capability(6, 1);
        assert!(caps.fp16_arithmetic());
        assert!(caps.wide_global_atomics());
        assert!(caps.dp4a());
        assert_eq!(caps.nvrtc_arch(), "sm_61");
    }

    #[test]
    fn test_ampere_has_all() {
        let caps = DeviceCaps::from_compute_capability(8, 0);
        assert!(caps.fp16_arithmetic());
        assert!(caps.wide_global_atomics());
        assert!(caps.dp4a());
        assert_eq!(caps.nvrtc_arch(), "sm_80");
    }

    #[test]
    fn test_unknown_future_arch_falls_back() {
        let caps = DeviceCaps::from_compute_capability(12, 0);
        assert!(caps.dp4a());
        assert_eq!(caps.nvrtc_arch(), "sm_90");
    }

    #[test]
    fn test_minor_version_ordering() {
        let caps = DeviceCaps::from_compute_capability(6, 0);
        assert!(caps.meets((5, 3)));
        assert!(caps.meets((6, 0)));
        assert!(!caps.meets((6, 1)));
    }
}
