//! Script execution state
//!
//! The bytecode itself belongs to the script module; a save only carries
//! where each interpreter is and what it is waiting for.

use super::EntityId;

/// Local variable slots per interpreter
pub const MAX_SCRIPT_VARS: usize = 10;
/// Value stack depth per interpreter
pub const SCRIPT_STACK_DEPTH: usize = 32;
/// Map-scoped script variables
pub const MAX_MAP_VARS: usize = 32;
/// World-scoped script variables (persist across maps in a hub)
pub const MAX_WORLD_VARS: usize = 64;
/// Scripts queued to start on other maps
pub const MAX_SCRIPT_STORE: usize = 20;

/// What a suspended interpreter is waiting for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitState {
    #[default]
    None,
    /// Sectors with this tag to finish moving
    Tag(i32),
    /// Polyobject with this number to stop
    Polyobject(i32),
    /// Script with this number to terminate
    Script(i32),
}

impl WaitState {
    pub fn to_parts(self) -> (u8, i32) {
        match self {
            Self::None => (0, 0),
            Self::Tag(v) => (1, v),
            Self::Polyobject(v) => (2, v),
            Self::Script(v) => (3, v),
        }
    }

    pub fn from_parts(kind: u8, value: i32) -> Option<Self> {
        match kind {
            0 => Some(Self::None),
            1 => Some(Self::Tag(value)),
            2 => Some(Self::Polyobject(value)),
            3 => Some(Self::Script(value)),
            _ => None,
        }
    }
}

/// One running script interpreter
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptContext {
    pub number: i32,
    /// Offset of the next instruction within the script module
    pub pc: u32,
    pub delay_count: i32,
    pub locals: [i32; MAX_SCRIPT_VARS],
    pub stack: [i32; SCRIPT_STACK_DEPTH],
    pub stack_ptr: u32,
    pub wait: WaitState,
    /// Entity that triggered the script
    pub activator: Option<EntityId>,
    /// Line that triggered the script
    pub line: Option<usize>,
    pub side: u8,
}

impl ScriptContext {
    pub fn new(number: i32, pc: u32) -> Self {
        Self {
            number,
            pc,
            delay_count: 0,
            locals: [0; MAX_SCRIPT_VARS],
            stack: [0; SCRIPT_STACK_DEPTH],
            stack_ptr: 0,
            wait: WaitState::None,
            activator: None,
            line: None,
            side: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScriptRunState {
    #[default]
    Inactive,
    Running,
    Suspended,
    Terminating,
}

impl ScriptRunState {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Inactive),
            1 => Some(Self::Running),
            2 => Some(Self::Suspended),
            3 => Some(Self::Terminating),
            _ => None,
        }
    }
}

/// Per-script bookkeeping from the module's script directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptInfo {
    pub number: i32,
    pub state: ScriptRunState,
}

/// A script start deferred until its map is entered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeferredScript {
    pub map: i32,
    pub script: i32,
    pub args: [u8; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptState {
    pub interpreters: Vec<ScriptContext>,
    pub infos: Vec<ScriptInfo>,
    pub map_vars: [i32; MAX_MAP_VARS],
    pub world_vars: [i32; MAX_WORLD_VARS],
    pub store: Vec<DeferredScript>,
}

impl Default for ScriptState {
    fn default() -> Self {
        Self {
            interpreters: Vec::new(),
            infos: Vec::new(),
            map_vars: [0; MAX_MAP_VARS],
            world_vars: [0; MAX_WORLD_VARS],
            store: Vec::new(),
        }
    }
}
