//! The configuration value set read by the GUI core at build time.
//!
//! Values come from cargo features ([`ConfigOptions::from_build`]), optionally
//! layered with an options file by the host binding, and are frozen once the
//! contract is installed.

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, ConfigResult};

/// Formatter symbols that write without a length bound.
const UNBOUNDED_FORMATTERS: &[&str] = &["vsprintf", "sprintf"];

/// Width of the index type used in generated vertex/element buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawIndex {
    #[default]
    U16,
    U32,
}

/// Boolean build switches of the GUI core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flag {
    VertexBufferOutput,
    FontBaking,
    DefaultFont,
    CommandUserdata,
    ButtonTriggerOnRelease,
    ZeroCommandMemory,
    KeystateBasedInput,
}

impl Flag {
    pub const ALL: [Flag; 7] = [
        Flag::VertexBufferOutput,
        Flag::FontBaking,
        Flag::DefaultFont,
        Flag::CommandUserdata,
        Flag::ButtonTriggerOnRelease,
        Flag::ZeroCommandMemory,
        Flag::KeystateBasedInput,
    ];

    /// Preprocessor define emitted when the flag is set.
    pub const fn define(self) -> &'static str {
        match self {
            Flag::VertexBufferOutput => "NK_INCLUDE_VERTEX_BUFFER_OUTPUT",
            Flag::FontBaking => "NK_INCLUDE_FONT_BAKING",
            Flag::DefaultFont => "NK_INCLUDE_DEFAULT_FONT",
            Flag::CommandUserdata => "NK_INCLUDE_COMMAND_USERDATA",
            Flag::ButtonTriggerOnRelease => "NK_BUTTON_TRIGGER_ON_RELEASE",
            Flag::ZeroCommandMemory => "NK_ZERO_COMMAND_MEMORY",
            Flag::KeystateBasedInput => "NK_KEYSTATE_BASED_INPUT",
        }
    }

    /// Cargo feature (and options-file key) controlling the flag.
    pub const fn feature_name(self) -> &'static str {
        match self {
            Flag::VertexBufferOutput => "include-vertex-buffer-output",
            Flag::FontBaking => "include-font-baking",
            Flag::DefaultFont => "include-default-font",
            Flag::CommandUserdata => "include-command-userdata",
            Flag::ButtonTriggerOnRelease => "button-trigger-on-release",
            Flag::ZeroCommandMemory => "zero-command-memory",
            Flag::KeystateBasedInput => "keystate-based-input",
        }
    }

    pub fn from_feature_name(name: &str) -> Option<Flag> {
        Flag::ALL.into_iter().find(|flag| flag.feature_name() == name)
    }

    const fn enabled_in_build(self) -> bool {
        match self {
            Flag::VertexBufferOutput => cfg!(feature = "include-vertex-buffer-output"),
            Flag::FontBaking => cfg!(feature = "include-font-baking"),
            Flag::DefaultFont => cfg!(feature = "include-default-font"),
            Flag::CommandUserdata => cfg!(feature = "include-command-userdata"),
            Flag::ButtonTriggerOnRelease => cfg!(feature = "button-trigger-on-release"),
            Flag::ZeroCommandMemory => cfg!(feature = "zero-command-memory"),
            Flag::KeystateBasedInput => cfg!(feature = "keystate-based-input"),
        }
    }
}

/// Feature name selecting 32-bit draw indices.
pub const UINT_DRAW_INDEX_FEATURE: &str = "uint-draw-index";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigOptions {
    /// Route formatted text through a length-bounded formatter only.
    pub use_safe_formatted_output: bool,
    /// Symbol bound to `NK_VSNPRINTF` when safe output is on.
    pub bounded_formatter: String,

    pub include_vertex_buffer_output: bool,
    pub include_font_baking: bool,
    pub include_default_font: bool,
    pub include_command_userdata: bool,
    pub button_trigger_on_release: bool,
    pub zero_command_memory: bool,
    pub keystate_based_input: bool,

    pub draw_index: DrawIndex,
    /// Maximum number of text input characters buffered per frame.
    pub input_max: u32,
    /// Scratch size for number-to-text conversion.
    pub max_number_buffer: u32,
    pub buffer_default_initial_size: u32,
}

impl Default for ConfigOptions {
    fn default() -> Self {
        Self {
            use_safe_formatted_output: true,
            bounded_formatter: "vsnprintf".to_owned(),
            include_vertex_buffer_output: false,
            include_font_baking: false,
            include_default_font: false,
            include_command_userdata: false,
            button_trigger_on_release: false,
            zero_command_memory: false,
            keystate_based_input: false,
            draw_index: DrawIndex::U16,
            input_max: 16,
            max_number_buffer: 64,
            buffer_default_initial_size: 4 * 1024,
        }
    }
}

impl ConfigOptions {
    /// Defaults with this crate's enabled cargo features applied.
    pub fn from_build() -> Self {
        let mut options = Self::default();
        for flag in Flag::ALL {
            if flag.enabled_in_build() {
                options.set_flag(flag, true);
            }
        }
        if cfg!(feature = "uint-draw-index") {
            options.draw_index = DrawIndex::U32;
        }
        options
    }

    /// Defaults with the named features applied. Unknown names are ignored,
    /// so a build script can pass every enabled feature of its package.
    pub fn from_feature_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = Self::default();
        for name in names {
            let name = name.as_ref();
            if let Some(flag) = Flag::from_feature_name(name) {
                options.set_flag(flag, true);
            } else if name == UINT_DRAW_INDEX_FEATURE {
                options.draw_index = DrawIndex::U32;
            }
        }
        // Same implication the cargo feature graph encodes.
        if options.include_default_font {
            options.include_font_baking = true;
        }
        options
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::VertexBufferOutput => self.include_vertex_buffer_output,
            Flag::FontBaking => self.include_font_baking,
            Flag::DefaultFont => self.include_default_font,
            Flag::CommandUserdata => self.include_command_userdata,
            Flag::ButtonTriggerOnRelease => self.button_trigger_on_release,
            Flag::ZeroCommandMemory => self.zero_command_memory,
            Flag::KeystateBasedInput => self.keystate_based_input,
        }
    }

    pub fn set_flag(&mut self, flag: Flag, value: bool) {
        let slot = match flag {
            Flag::VertexBufferOutput => &mut self.include_vertex_buffer_output,
            Flag::FontBaking => &mut self.include_font_baking,
            Flag::DefaultFont => &mut self.include_default_font,
            Flag::CommandUserdata => &mut self.include_command_userdata,
            Flag::ButtonTriggerOnRelease => &mut self.button_trigger_on_release,
            Flag::ZeroCommandMemory => &mut self.zero_command_memory,
            Flag::KeystateBasedInput => &mut self.keystate_based_input,
        };
        *slot = value;
    }

    pub fn enabled_flags(&self) -> impl Iterator<Item = Flag> + '_ {
        Flag::ALL.into_iter().filter(|flag| self.flag(*flag))
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let sizes = [
            ("input-max", self.input_max),
            ("max-number-buffer", self.max_number_buffer),
            ("buffer-default-initial-size", self.buffer_default_initial_size),
        ];
        if let Some((option, _)) = sizes.into_iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::ZeroSize { option });
        }

        if self.include_default_font && !self.include_font_baking {
            return Err(ConfigError::MissingDependency {
                option: Flag::DefaultFont.feature_name(),
                requires: Flag::FontBaking.feature_name(),
            });
        }

        if self.use_safe_formatted_output {
            let symbol = self.bounded_formatter.as_str();
            if !is_c_identifier(symbol) {
                return Err(ConfigError::InvalidSymbol {
                    symbol: symbol.to_owned(),
                });
            }
            if UNBOUNDED_FORMATTERS.contains(&symbol) {
                return Err(ConfigError::UnboundedFormatter {
                    symbol: symbol.to_owned(),
                });
            }
        }

        Ok(())
    }
}

fn is_c_identifier(symbol: &str) -> bool {
    let mut bytes = symbol.bytes();
    match bytes.next() {
        Some(first) if first == b'_' || first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    bytes.all(|b| b == b'_' || b.is_ascii_alphanumeric())
}
