use serde::Serialize;
use std::fmt;

pub type Pid = u16;
pub type CpuId = usize;
pub type Ticks = u64;
// 0 is the highest priority
pub type Priority = u8;

pub const MAX_PRIORITY: Priority = 7;

/// Lifecycle state of a process, as recorded in its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    Ready,
    Running,
    Blocked,
    Exit,
    Switching,
}

impl ProcessState {
    pub const ALL: [ProcessState; 5] = [
        Self::Ready,
        Self::Running,
        Self::Blocked,
        Self::Exit,
        Self::Switching,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Running => "running",
            Self::Blocked => "blocked",
            Self::Exit => "exit",
            Self::Switching => "switching",
        }
    }

    /// Ticks in these states advance the burst sequence.
    pub fn consumes_burst(self) -> bool {
        matches!(self, Self::Running | Self::Blocked)
    }
}

/// State of a processing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuState {
    Idle,
    AssignedIdle,
    Processing,
    SwitchingOut,
    SwitchingIn,
}

impl CpuState {
    pub const ALL: [CpuState; 5] = [
        Self::Idle,
        Self::AssignedIdle,
        Self::Processing,
        Self::SwitchingOut,
        Self::SwitchingIn,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AssignedIdle => "assigned_idle",
            Self::Processing => "processing",
            Self::SwitchingOut => "switching_out",
            Self::SwitchingIn => "switching_in",
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for CpuState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
