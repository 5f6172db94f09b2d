//! Core platform handle

use crate::implementations::native::NativeProcess;
use crate::process::ProcessOperations;

/// Bundles the operations a pipeline run needs from the host
pub struct Platform {
    process_ops: Box<dyn ProcessOperations>,
}

impl Platform {
    pub fn new(process_ops: Box<dyn ProcessOperations>) -> Self {
        Self { process_ops }
    }

    /// The host platform, spawning real processes
    pub fn native() -> Self {
        Self::new(Box::new(NativeProcess::new()))
    }

    pub fn process(&self) -> &dyn ProcessOperations {
        self.process_ops.as_ref()
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::native()
    }
}

impl std::fmt::Debug for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Platform").finish_non_exhaustive()
    }
}
