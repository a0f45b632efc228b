//! Safe calls into the bound hook table.
//!
//! [`Host`] borrows a [`Contract`] and forwards every call through its hook
//! table, so Rust code reaches exactly the primitives the GUI core reaches.
//! Argument checks that would otherwise be undefined behavior on the C side
//! go through the bound assert hook first.

use core::ffi::{CStr, c_int};

use derive_more::{Display, Error};
use nkhost_config::abi::FormatArg;
use nkhost_config::{Contract, HookTable};
use nkhost_runtime::Formatted;

#[derive(Display, Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    #[display("no configuration contract is installed")]
    NotInstalled,

    #[display("format hook rejected the format string or its arguments")]
    FormatRejected,
}

/// Formatting argument whose string form is guaranteed NUL-terminated.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HostArg<'a> {
    Int(i64),
    Uint(u64),
    Double(f64),
    Char(u8),
    Str(&'a CStr),
}

impl HostArg<'_> {
    fn to_raw(self) -> FormatArg {
        match self {
            HostArg::Int(v) => FormatArg::int(v),
            HostArg::Uint(v) => FormatArg::uint(v),
            HostArg::Double(v) => FormatArg::double(v),
            HostArg::Char(v) => FormatArg::ch(v),
            HostArg::Str(s) => FormatArg::cstr(s.as_ptr()),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Host<'c> {
    contract: &'c Contract,
}

impl<'c> Host<'c> {
    pub fn new(contract: &'c Contract) -> Self {
        Self { contract }
    }

    /// Host over the process-wide contract.
    pub fn installed() -> Result<Host<'static>, HostError> {
        nkhost_config::installed()
            .map(Host::new)
            .ok_or(HostError::NotInstalled)
    }

    pub fn contract(&self) -> &'c Contract {
        self.contract
    }

    fn hooks(&self) -> &'c HookTable {
        self.contract.hooks()
    }

    pub fn assert(&self, condition: bool) {
        (self.hooks().assert)(condition)
    }

    /// A violated precondition must never reach the raw hook, even when the
    /// bound assert hook returns.
    fn require(&self, condition: bool) {
        if !condition {
            (self.hooks().assert)(false);
            std::process::abort();
        }
    }

    /// Fill the first `len` bytes of `region` with `value`.
    pub fn fill<'b>(&self, region: &'b mut [u8], value: u8, len: usize) -> &'b mut [u8] {
        self.require(len <= region.len());
        // SAFETY: `len` is within `region`, which is exclusively borrowed.
        unsafe { (self.hooks().memset)(region.as_mut_ptr().cast(), c_int::from(value), len) };
        region
    }

    /// Copy the first `len` bytes of `src` into `dest`.
    pub fn copy<'b>(&self, dest: &'b mut [u8], src: &[u8], len: usize) -> &'b mut [u8] {
        self.require(len <= dest.len() && len <= src.len());
        // SAFETY: both ranges are in bounds; a `&mut` and a `&` never overlap.
        unsafe { (self.hooks().memcpy)(dest.as_mut_ptr().cast(), src.as_ptr().cast(), len) };
        dest
    }

    pub fn inv_sqrt(&self, x: f32) -> f32 {
        (self.hooks().inv_sqrt)(x)
    }

    pub fn sin(&self, x: f32) -> f32 {
        (self.hooks().sin)(x)
    }

    pub fn cos(&self, x: f32) -> f32 {
        (self.hooks().cos)(x)
    }

    /// Bounded formatted output through the format hook.
    ///
    /// The buffer always ends up NUL-terminated unless it is empty.
    pub fn format(
        &self,
        buf: &mut [u8],
        spec: &CStr,
        args: &[HostArg<'_>],
    ) -> Result<Formatted, HostError> {
        let raw: Vec<FormatArg> = args.iter().map(|arg| arg.to_raw()).collect();
        // SAFETY: `buf` is writable for its full length, `spec` and every
        // string argument are NUL-terminated and outlive the call.
        let n = unsafe {
            (self.hooks().format)(
                buf.as_mut_ptr().cast(),
                buf.len(),
                spec.as_ptr(),
                raw.as_ptr(),
                raw.len(),
            )
        };
        let required = usize::try_from(n).map_err(|_| HostError::FormatRejected)?;
        Ok(Formatted {
            written: required.min(buf.len().saturating_sub(1)),
            required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_contract;
    use nkhost_config::ConfigOptions;
    use std::process::Command;

    const ABORT_CHILD_ENV: &str = "NKHOST_HOST_ABORT_CHILD";

    fn contract() -> Contract {
        runtime_contract(ConfigOptions::default()).unwrap()
    }

    #[test]
    fn test_fill_then_copy() {
        let contract = contract();
        let host = Host::new(&contract);

        let mut region = [1u8; 6];
        host.fill(&mut region, 0xAB, 3);
        assert_eq!(region, [0xAB, 0xAB, 0xAB, 1, 1, 1]);

        let mut dest = [0u8; 4];
        host.copy(&mut dest, &region, 4);
        assert_eq!(dest, [0xAB, 0xAB, 0xAB, 1]);

        // Zero-length calls leave everything untouched.
        host.fill(&mut dest, 0, 0);
        host.copy(&mut dest, &[], 0);
        assert_eq!(dest, [0xAB, 0xAB, 0xAB, 1]);
    }

    #[test]
    fn test_math_hooks() {
        let contract = contract();
        let host = Host::new(&contract);
        assert!((host.inv_sqrt(16.0) - 0.25).abs() < 1e-4);
        assert_eq!(host.sin(0.0), 0.0);
        assert_eq!(host.cos(0.0), 1.0);
    }

    #[test]
    fn test_format_reports_truncation() {
        let contract = contract();
        let host = Host::new(&contract);

        let mut buf = [0u8; 8];
        let out = host
            .format(&mut buf, c"%s #%d", &[HostArg::Str(c"window"), HostArg::Int(12)])
            .unwrap();
        assert_eq!(out, Formatted { written: 7, required: 10 });
        assert!(out.truncated());
        assert_eq!(&buf, b"window \0");
    }

    #[test]
    fn test_format_rejects_missing_argument() {
        let contract = contract();
        let host = Host::new(&contract);

        let mut buf = [0u8; 8];
        assert_eq!(
            host.format(&mut buf, c"%d", &[]),
            Err(HostError::FormatRejected)
        );
    }

    /// Re-run `test_name` in a child process that performs the violation,
    /// and require the child to abort.
    fn assert_aborts(test_name: &str, violate: impl FnOnce()) {
        if std::env::var(ABORT_CHILD_ENV).as_deref() == Ok(test_name) {
            violate();
            std::process::exit(0);
        }

        let exe = std::env::current_exe().expect("test binary path");
        let status = Command::new(exe)
            .args(["--exact", test_name, "--nocapture"])
            .env(ABORT_CHILD_ENV, test_name)
            .status()
            .expect("spawn child test process");
        assert!(!status.success(), "child exited with {status}");
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            assert_eq!(status.signal(), Some(6), "expected SIGABRT, got {status}");
        }
    }

    #[test]
    fn test_fill_past_region_aborts() {
        assert_aborts("host::tests::test_fill_past_region_aborts", || {
            let contract = contract();
            let mut region = [0u8; 4];
            Host::new(&contract).fill(&mut region, 0xFF, 5);
        });
    }

    #[test]
    fn test_copy_past_source_aborts() {
        assert_aborts("host::tests::test_copy_past_source_aborts", || {
            let contract = contract();
            let mut dest = [0u8; 8];
            Host::new(&contract).copy(&mut dest, b"abc", 4);
        });
    }
}
