pub mod alphabet;
pub mod pin_flow;
pub mod policy;
pub mod session;

/// Caller-resolved settings for one enroll or verify run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowConfig {
    /// Whether START may abandon enrollment.
    pub allow_skipping: bool,
    /// PIN length level, see [`policy::PinLength::from_level`].
    pub length_level: u8,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            allow_skipping: true,
            length_level: 1,
        }
    }
}
