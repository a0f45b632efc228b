//! Hook slots and the table binding them to host implementations.
//!
//! [`HookTable`] has one non-optional function pointer per required slot, so
//! a table with a missing hook does not compile. [`HookTableBuilder`] covers
//! assembly at runtime and refuses to build until every slot is bound.

use derive_more::Display;

use crate::abi::{AssertFn, FormatFn, MemcpyFn, MemsetFn, UnaryFn};
use crate::errors::{ConfigError, ConfigResult};

/// A required hook of the GUI core.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum HookSlot {
    #[display("assert")]
    Assert,
    #[display("memset")]
    Memset,
    #[display("memcpy")]
    Memcpy,
    #[display("inv_sqrt")]
    InvSqrt,
    #[display("sin")]
    Sin,
    #[display("cos")]
    Cos,
    #[display("format")]
    Format,
}

impl HookSlot {
    pub const ALL: [HookSlot; 7] = [
        HookSlot::Assert,
        HookSlot::Memset,
        HookSlot::Memcpy,
        HookSlot::InvSqrt,
        HookSlot::Sin,
        HookSlot::Cos,
        HookSlot::Format,
    ];

    /// Exported symbol implementing the slot.
    pub const fn symbol(self) -> &'static str {
        match self {
            HookSlot::Assert => "nkhost_assert",
            HookSlot::Memset => "nkhost_memset",
            HookSlot::Memcpy => "nkhost_memcpy",
            HookSlot::InvSqrt => "nkhost_inv_sqrt",
            HookSlot::Sin => "nkhost_sin",
            HookSlot::Cos => "nkhost_cos",
            HookSlot::Format => "nkhost_snprintf",
        }
    }

    /// Library macro redirected to [`HookSlot::symbol`], if the library has one.
    ///
    /// The formatter has no macro of its own: the library's `NK_VSNPRINTF`
    /// takes a `va_list`, which is bound to the configured bounded formatter
    /// instead.
    pub const fn redirect_macro(self) -> Option<&'static str> {
        match self {
            HookSlot::Assert => Some("NK_ASSERT"),
            HookSlot::Memset => Some("NK_MEMSET"),
            HookSlot::Memcpy => Some("NK_MEMCPY"),
            HookSlot::InvSqrt => Some("NK_INV_SQRT"),
            HookSlot::Sin => Some("NK_SIN"),
            HookSlot::Cos => Some("NK_COS"),
            HookSlot::Format => None,
        }
    }

    /// C prototype of the exported symbol.
    pub const fn prototype(self) -> &'static str {
        match self {
            HookSlot::Assert => "void nkhost_assert(_Bool x);",
            HookSlot::Memset => "void *nkhost_memset(void *s, int c, size_t n);",
            HookSlot::Memcpy => "void *nkhost_memcpy(void *dest, const void *src, size_t n);",
            HookSlot::InvSqrt => "float nkhost_inv_sqrt(float x);",
            HookSlot::Sin => "float nkhost_sin(float x);",
            HookSlot::Cos => "float nkhost_cos(float x);",
            HookSlot::Format => {
                "int nkhost_snprintf(char *buf, size_t capacity, const char *fmt, const nkhost_format_arg *args, size_t nargs);"
            }
        }
    }
}

/// Slots of the GUI core that are declared but intentionally left unbound.
/// The library's own default implementation is used for them.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash)]
pub enum ReservedSlot {
    #[display("strtod")]
    Strtod,
    #[display("dtoa")]
    Dtoa,
}

impl ReservedSlot {
    pub const ALL: [ReservedSlot; 2] = [ReservedSlot::Strtod, ReservedSlot::Dtoa];

    pub const fn redirect_macro(self) -> &'static str {
        match self {
            ReservedSlot::Strtod => "NK_STRTOD",
            ReservedSlot::Dtoa => "NK_DTOA",
        }
    }
}

/// Fully bound hook table handed to the GUI core.
#[derive(Clone, Copy, Debug)]
pub struct HookTable {
    pub assert: AssertFn,
    pub memset: MemsetFn,
    pub memcpy: MemcpyFn,
    pub inv_sqrt: UnaryFn,
    pub sin: UnaryFn,
    pub cos: UnaryFn,
    pub format: FormatFn,
}

impl HookTable {
    /// Address bound to `slot`.
    ///
    /// Diagnostic only: the binding logs it at startup. Addresses differ
    /// between builds and runs and must not be compared or stored.
    pub fn address(&self, slot: HookSlot) -> usize {
        match slot {
            HookSlot::Assert => self.assert as usize,
            HookSlot::Memset => self.memset as usize,
            HookSlot::Memcpy => self.memcpy as usize,
            HookSlot::InvSqrt => self.inv_sqrt as usize,
            HookSlot::Sin => self.sin as usize,
            HookSlot::Cos => self.cos as usize,
            HookSlot::Format => self.format as usize,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct HookTableBuilder {
    assert: Option<AssertFn>,
    memset: Option<MemsetFn>,
    memcpy: Option<MemcpyFn>,
    inv_sqrt: Option<UnaryFn>,
    sin: Option<UnaryFn>,
    cos: Option<UnaryFn>,
    format: Option<FormatFn>,
}

impl HookTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assert(mut self, hook: AssertFn) -> Self {
        self.assert = Some(hook);
        self
    }

    pub fn memset(mut self, hook: MemsetFn) -> Self {
        self.memset = Some(hook);
        self
    }

    pub fn memcpy(mut self, hook: MemcpyFn) -> Self {
        self.memcpy = Some(hook);
        self
    }

    pub fn inv_sqrt(mut self, hook: UnaryFn) -> Self {
        self.inv_sqrt = Some(hook);
        self
    }

    pub fn sin(mut self, hook: UnaryFn) -> Self {
        self.sin = Some(hook);
        self
    }

    pub fn cos(mut self, hook: UnaryFn) -> Self {
        self.cos = Some(hook);
        self
    }

    pub fn format(mut self, hook: FormatFn) -> Self {
        self.format = Some(hook);
        self
    }

    /// Slots that are still unbound, in declaration order.
    pub fn unbound(&self) -> Vec<HookSlot> {
        HookSlot::ALL
            .into_iter()
            .filter(|slot| !self.is_bound(*slot))
            .collect()
    }

    pub fn is_bound(&self, slot: HookSlot) -> bool {
        match slot {
            HookSlot::Assert => self.assert.is_some(),
            HookSlot::Memset => self.memset.is_some(),
            HookSlot::Memcpy => self.memcpy.is_some(),
            HookSlot::InvSqrt => self.inv_sqrt.is_some(),
            HookSlot::Sin => self.sin.is_some(),
            HookSlot::Cos => self.cos.is_some(),
            HookSlot::Format => self.format.is_some(),
        }
    }

    pub fn build(self) -> ConfigResult<HookTable> {
        let unbound = |slot| ConfigError::UnboundHook { slot };
        Ok(HookTable {
            assert: self.assert.ok_or(unbound(HookSlot::Assert))?,
            memset: self.memset.ok_or(unbound(HookSlot::Memset))?,
            memcpy: self.memcpy.ok_or(unbound(HookSlot::Memcpy))?,
            inv_sqrt: self.inv_sqrt.ok_or(unbound(HookSlot::InvSqrt))?,
            sin: self.sin.ok_or(unbound(HookSlot::Sin))?,
            cos: self.cos.ok_or(unbound(HookSlot::Cos))?,
            format: self.format.ok_or(unbound(HookSlot::Format))?,
        })
    }
}
