//! C configuration header rendering.
//!
//! The GUI core is configured by preprocessor defines read before its
//! header is included. Everything here is derived from [`ConfigOptions`]
//! and the slot tables in [`crate::hooks`], so the header and the Rust
//! binding cannot drift apart.

use crate::abi::FormatArgKind;
use crate::hooks::{HookSlot, ReservedSlot};
use crate::options::{ConfigOptions, DrawIndex};

const GUARD: &str = "NKHOST_CONFIG_H";

/// Render the complete configuration header.
pub fn render_header(options: &ConfigOptions) -> String {
    let mut out = String::new();
    out.push_str("/* Generated by nkhost-config. Do not edit. */\n");
    out.push_str(&format!("#ifndef {GUARD}\n#define {GUARD}\n\n"));
    out.push_str("#include <stddef.h>\n#include <stdint.h>\n\n");

    out.push_str(&render_options(options));
    out.push('\n');
    out.push_str(&render_format_arg());
    out.push('\n');
    out.push_str(&render_redirects());
    out.push('\n');
    out.push_str(&render_formatter(options));
    out.push('\n');
    out.push_str(&render_reserved());

    out.push_str(&format!("\n#endif /* {GUARD} */\n"));
    out
}

/// Feature flags and type/size selections.
pub fn render_options(options: &ConfigOptions) -> String {
    let mut out = String::new();
    for flag in options.enabled_flags() {
        out.push_str(&format!("#define {}\n", flag.define()));
    }
    if options.draw_index == DrawIndex::U32 {
        out.push_str("#define NK_UINT_DRAW_INDEX\n");
    }
    out.push_str(&format!("#define NK_INPUT_MAX {}\n", options.input_max));
    out.push_str(&format!(
        "#define NK_MAX_NUMBER_BUFFER {}\n",
        options.max_number_buffer
    ));
    out.push_str(&format!(
        "#define NK_BUFFER_DEFAULT_INITIAL_SIZE {}\n",
        options.buffer_default_initial_size
    ));
    out
}

/// The tagged argument type taken by the formatting hook.
pub fn render_format_arg() -> String {
    let mut out = String::from(concat!(
        "typedef struct nkhost_format_arg {\n",
        "    uint32_t kind;\n",
        "    union {\n",
        "        int64_t i;\n",
        "        uint64_t u;\n",
        "        double f;\n",
        "        int c;\n",
        "        const char *s;\n",
        "    } value;\n",
        "} nkhost_format_arg;\n",
        "\n",
    ));
    for kind in FormatArgKind::ALL {
        out.push_str(&format!("#define {} {}\n", kind.c_name(), kind as u32));
    }
    out
}

/// Macro redirections and the extern prototypes they resolve to.
///
/// Every prototype is declared without a definition, so an unbound hook
/// surfaces as an unresolved symbol at link time.
pub fn render_redirects() -> String {
    let mut out = String::new();
    for slot in HookSlot::ALL {
        if let Some(name) = slot.redirect_macro() {
            out.push_str(&format!("#define {name} {}\n", slot.symbol()));
        }
    }
    out.push('\n');
    for slot in HookSlot::ALL {
        out.push_str(&format!("extern {}\n", slot.prototype()));
    }
    out
}

pub fn render_formatter(options: &ConfigOptions) -> String {
    if options.use_safe_formatted_output {
        format!("#define NK_VSNPRINTF {}\n", options.bounded_formatter)
    } else {
        "/* NK_VSNPRINTF: not set, library formatter in use */\n".to_owned()
    }
}

pub fn render_reserved() -> String {
    ReservedSlot::ALL
        .into_iter()
        .map(|slot| {
            format!(
                "/* {}: reserved, not bound; library default in use */\n",
                slot.redirect_macro()
            )
        })
        .collect()
}
