//! nkhost: host support layer for an immediate-mode GUI core.
//!
//! Ties the configuration contract ([`nkhost_config`]) to the primitives in
//! [`nkhost_runtime`] and exposes:
//! - The C configuration header generated for this build ([`CONFIG_HEADER`])
//! - Option files layered over the build's feature set ([`options_file`])
//! - A safe facade over the installed hook table ([`host::Host`])
//! - A self-test of every bound primitive ([`selftest`])

pub mod host;
pub mod logging;
pub mod options_file;
pub mod selftest;

pub use host::{Host, HostArg, HostError};
pub use nkhost_config::{
    ConfigError, ConfigOptions, ConfigResult, Contract, DrawIndex, Flag, HookSlot, HookTable,
    render_header,
};
pub use options_file::{OptionsFile, OptionsFileError};
pub use selftest::{CheckError, SelfTestReport};

/// Configuration header rendered by the build script from this build's features.
pub const CONFIG_HEADER: &str = include_str!(concat!(env!("OUT_DIR"), "/nkhost_config.h"));

/// Contract binding `options` to the runtime's primitives. Not installed.
pub fn runtime_contract(options: ConfigOptions) -> ConfigResult<Contract> {
    Contract::new(options, nkhost_runtime::hook_table())
}

/// Validate `options`, bind the runtime's primitives and install the result
/// as the process-wide contract.
pub fn install_runtime(options: ConfigOptions) -> ConfigResult<&'static Contract> {
    let contract = runtime_contract(options)?;
    for slot in HookSlot::ALL {
        tracing::debug!(
            %slot,
            address = format_args!("{:#x}", contract.hooks().address(slot)),
            "bound hook"
        );
    }
    nkhost_config::install(contract)
}
