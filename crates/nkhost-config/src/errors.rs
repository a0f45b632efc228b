//! Error types for contract construction

use derive_more::{Display, Error};

use crate::hooks::HookSlot;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Display, Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[display("hook slot `{slot}` is not bound")]
    UnboundHook { slot: HookSlot },

    #[display("option `{option}` must be non-zero")]
    ZeroSize { option: &'static str },

    #[display("`{symbol}` is an unbounded formatter; use a length-checked one such as `vsnprintf`")]
    UnboundedFormatter { symbol: String },

    #[display("`{symbol}` is not a valid C identifier")]
    InvalidSymbol { symbol: String },

    #[display("option `{option}` requires `{requires}`")]
    MissingDependency {
        option: &'static str,
        requires: &'static str,
    },

    #[display("configuration contract is already installed")]
    AlreadyInstalled,
}
