//! `InterpreterBuilder` for creating Interpreter instances with various configurations.

use rustc_hash::FxHashMap;

use mol_ir::StringInterner;

use super::Interpreter;
use crate::config::InterpreterConfig;
use crate::environment::Environment;
use crate::print_handler::Channels;
use crate::security::SecurityContext;
use crate::stdlib::Registry;

/// Builder for creating Interpreter instances.
///
/// Defaults: program output on stdout, traces on stderr, the standard
/// library, tracing enabled, no colours.
pub struct InterpreterBuilder<'a> {
    interner: &'a StringInterner,
    channels: Option<Channels>,
    config: InterpreterConfig,
    registry: Option<Registry>,
    trace_enabled: bool,
    colors: bool,
}

impl<'a> InterpreterBuilder<'a> {
    pub fn new(interner: &'a StringInterner) -> Self {
        Self {
            interner,
            channels: None,
            config: InterpreterConfig::default(),
            registry: None,
            trace_enabled: true,
            colors: false,
        }
    }

    #[must_use]
    pub fn channels(mut self, channels: Channels) -> Self {
        self.channels = Some(channels);
        self
    }

    #[must_use]
    pub fn config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Host functions to bind into the global scope instead of the standard
    /// library.
    #[must_use]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// `false` suppresses every pipe trace.
    #[must_use]
    pub fn trace_enabled(mut self, enabled: bool) -> Self {
        self.trace_enabled = enabled;
        self
    }

    #[must_use]
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn build(self) -> Interpreter<'a> {
        let mut env = Environment::new();
        let registry = self.registry.unwrap_or_else(Registry::standard);
        registry.install(&mut env, self.interner);

        let security = SecurityContext::new(self.config.allowed_resources.iter().cloned());
        Interpreter {
            interner: self.interner,
            env,
            channels: self.channels.unwrap_or_else(Channels::stdio),
            config: self.config,
            security,
            listeners: FxHashMap::default(),
            stores: FxHashMap::default(),
            next_record_id: 0,
            call_stack: Vec::new(),
            trace_enabled: self.trace_enabled,
            colors: self.colors,
        }
    }
}
