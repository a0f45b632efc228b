//! Option files layered over the build's feature set.
//!
//! A file names only the options it changes, using the same kebab-case keys
//! `nkhost show` prints:
//!
//! ```toml
//! include-vertex-buffer-output = true
//! draw-index = "u32"
//! input-max = 32
//! ```
//!
//! Unknown keys are rejected, and the layered result is validated before it
//! is handed out.

use std::path::{Path, PathBuf};

use derive_more::{Display, Error, From};
use nkhost_config::{ConfigError, ConfigOptions, DrawIndex, Flag};
use serde::Deserialize;

#[derive(Display, Debug, Error, From)]
pub enum OptionsFileError {
    #[display("cannot read options file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[display("malformed options file: {source}")]
    #[from]
    Parse { source: toml::de::Error },

    #[display("invalid options: {source}")]
    #[from]
    Invalid { source: ConfigError },
}

/// Options set by a file. `None` keeps the underlying value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct OptionsFile {
    pub use_safe_formatted_output: Option<bool>,
    pub bounded_formatter: Option<String>,
    pub include_vertex_buffer_output: Option<bool>,
    pub include_font_baking: Option<bool>,
    pub include_default_font: Option<bool>,
    pub include_command_userdata: Option<bool>,
    pub button_trigger_on_release: Option<bool>,
    pub zero_command_memory: Option<bool>,
    pub keystate_based_input: Option<bool>,
    pub draw_index: Option<DrawIndex>,
    pub input_max: Option<u32>,
    pub max_number_buffer: Option<u32>,
    pub buffer_default_initial_size: Option<u32>,
}

impl OptionsFile {
    pub fn parse(text: &str) -> Result<Self, OptionsFileError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, OptionsFileError> {
        let text = std::fs::read_to_string(path).map_err(|source| OptionsFileError::Read {
            path: path.to_owned(),
            source,
        })?;
        let file = Self::parse(&text)?;
        tracing::debug!(path = %path.display(), ?file, "loaded options file");
        Ok(file)
    }

    fn flag(&self, flag: Flag) -> Option<bool> {
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

    /// `base` with every option this file sets replaced. Not validated.
    pub fn apply(&self, mut base: ConfigOptions) -> ConfigOptions {
        if let Some(value) = self.use_safe_formatted_output {
            base.use_safe_formatted_output = value;
        }
        if let Some(symbol) = &self.bounded_formatter {
            base.bounded_formatter = symbol.clone();
        }
        for flag in Flag::ALL {
            if let Some(value) = self.flag(flag) {
                base.set_flag(flag, value);
            }
        }
        if let Some(draw_index) = self.draw_index {
            base.draw_index = draw_index;
        }
        if let Some(value) = self.input_max {
            base.input_max = value;
        }
        if let Some(value) = self.max_number_buffer {
            base.max_number_buffer = value;
        }
        if let Some(value) = self.buffer_default_initial_size {
            base.buffer_default_initial_size = value;
        }
        base
    }
}

/// The build's options, overlaid with `path` when given, validated.
pub fn resolve(path: Option<&Path>) -> Result<ConfigOptions, OptionsFileError> {
    let mut options = ConfigOptions::from_build();
    if let Some(path) = path {
        options = OptionsFile::load(path)?.apply(options);
    }
    options.validate()?;
    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_changes_nothing() {
        let file = OptionsFile::parse("").unwrap();
        assert_eq!(file, OptionsFile::default());
        assert_eq!(file.apply(ConfigOptions::default()), ConfigOptions::default());
    }

    #[test]
    fn test_overlay_sets_only_named_options() {
        let file = OptionsFile::parse(
            r#"
            include-command-userdata = true
            draw-index = "u32"
            input-max = 32
            "#,
        )
        .unwrap();

        let mut base = ConfigOptions::default();
        base.zero_command_memory = true;
        let options = file.apply(base);

        assert!(options.include_command_userdata);
        assert!(options.zero_command_memory);
        assert_eq!(options.draw_index, DrawIndex::U32);
        assert_eq!(options.input_max, 32);
        assert_eq!(options.max_number_buffer, 64);
    }

    #[test]
    fn test_overlay_can_clear_a_flag() {
        let file = OptionsFile::parse("zero-command-memory = false").unwrap();
        let mut base = ConfigOptions::default();
        base.zero_command_memory = true;
        assert!(!file.apply(base).zero_command_memory);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = OptionsFile::parse("include-everything = true").unwrap_err();
        assert!(matches!(err, OptionsFileError::Parse { .. }));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let err = OptionsFile::parse("input-max = \"many\"").unwrap_err();
        assert!(matches!(err, OptionsFileError::Parse { .. }));
    }

    #[test]
    fn test_shown_options_parse_back() {
        let mut options = ConfigOptions::default();
        options.include_font_baking = true;
        options.draw_index = DrawIndex::U32;
        let text = toml::to_string(&options).unwrap();

        let file = OptionsFile::parse(&text).unwrap();
        assert_eq!(file.apply(ConfigOptions::default()), options);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = OptionsFile::load(Path::new("/nonexistent/nkhost.toml")).unwrap_err();
        assert!(matches!(err, OptionsFileError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/nkhost.toml"));
    }
}
