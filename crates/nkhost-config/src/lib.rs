//! Configuration contract between the host and the GUI core.
//!
//! Provides:
//! - The build-time option set ([`ConfigOptions`]) and its cargo features
//! - The hook table binding library slots to host primitives ([`HookTable`])
//! - The C ABI shapes those hooks use ([`abi`])
//! - Rendering of the C configuration header ([`header`])
//! - The install-once [`Contract`] read by the core for the rest of the process

use std::sync::OnceLock;

pub mod abi;
pub mod errors;
pub mod header;
pub mod hooks;
pub mod options;

pub use errors::{ConfigError, ConfigResult};
pub use header::render_header;
pub use hooks::{HookSlot, HookTable, HookTableBuilder, ReservedSlot};
pub use options::{ConfigOptions, DrawIndex, Flag};

/// Validated options together with a fully bound hook table.
#[derive(Clone, Debug)]
pub struct Contract {
    options: ConfigOptions,
    hooks: HookTable,
}

impl Contract {
    pub fn new(options: ConfigOptions, hooks: HookTable) -> ConfigResult<Self> {
        options.validate()?;
        Ok(Self { options, hooks })
    }

    pub fn options(&self) -> &ConfigOptions {
        &self.options
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }
}

// =============================================================================
// Process-wide contract
//
// Written once before the core's first call, read-only afterwards. There is
// no teardown; the contract lives until process exit.
// =============================================================================

static CONTRACT: OnceLock<Contract> = OnceLock::new();

/// Install the process-wide contract. Fails if one is already installed.
pub fn install(contract: Contract) -> ConfigResult<&'static Contract> {
    let mut fresh = false;
    let installed = CONTRACT.get_or_init(|| {
        fresh = true;
        contract
    });
    if !fresh {
        tracing::warn!("configuration contract already installed; keeping the first one");
        return Err(ConfigError::AlreadyInstalled);
    }
    tracing::info!(
        safe_output = installed.options.use_safe_formatted_output,
        flags = installed.options.enabled_flags().count(),
        "installed configuration contract"
    );
    Ok(installed)
}

/// The installed contract, if any.
pub fn installed() -> Option<&'static Contract> {
    CONTRACT.get()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hooks::tests::stub_builder;

    #[test]
    fn contract_rejects_invalid_options() {
        let hooks = stub_builder().build().unwrap();
        let options = ConfigOptions {
            input_max: 0,
            ..ConfigOptions::default()
        };
        assert_eq!(
            Contract::new(options, hooks).unwrap_err(),
            ConfigError::ZeroSize { option: "input-max" }
        );
    }

    // The only test touching the process-wide slot.
    #[test]
    fn install_is_once_only() {
        let hooks = stub_builder().build().unwrap();
        let contract = Contract::new(ConfigOptions::default(), hooks).unwrap();

        let first = install(contract.clone()).expect("first install succeeds");
        assert!(core::ptr::eq(first, installed().unwrap()));
        assert_eq!(install(contract).unwrap_err(), ConfigError::AlreadyInstalled);
        assert_eq!(installed().unwrap().options(), &ConfigOptions::default());
    }
}
