//! Self-test of every primitive bound in a contract.
//!
//! Each check calls through [`Host`], so it exercises the hook table the GUI
//! core will use rather than the runtime functions directly.

use derive_more::{Display, Error};
use nkhost_config::HookSlot;

use crate::host::{Host, HostArg};

#[derive(Display, Debug, Error, Clone, PartialEq)]
#[display("self-test of `{slot}` failed: {detail}")]
pub struct CheckError {
    pub slot: HookSlot,
    pub detail: String,
}

/// Summary of a passing self-test.
#[derive(Clone, Debug, PartialEq)]
pub struct SelfTestReport {
    /// Slots exercised, in check order.
    pub slots: Vec<HookSlot>,
    /// Worst relative error seen from the inverse square root hook.
    pub inv_sqrt_error: f64,
    /// Worst absolute error seen from the sine and cosine hooks.
    pub trig_error: f64,
}

const INV_SQRT_TOLERANCE: f64 = 1e-3;
const TRIG_TOLERANCE: f64 = 1e-5;

fn check(slot: HookSlot, ok: bool, detail: impl FnOnce() -> String) -> Result<(), CheckError> {
    if ok {
        tracing::debug!(%slot, "self-test passed");
        Ok(())
    } else {
        Err(CheckError {
            slot,
            detail: detail(),
        })
    }
}

pub fn run(host: &Host<'_>) -> Result<SelfTestReport, CheckError> {
    host.assert(true);
    check(HookSlot::Assert, true, String::new)?;

    let mut region = [0x11u8; 16];
    host.fill(&mut region, 0xC3, 12);
    check(
        HookSlot::Memset,
        region[..12].iter().all(|&b| b == 0xC3) && region[12..].iter().all(|&b| b == 0x11),
        || format!("region after fill: {region:02x?}"),
    )?;

    let src: [u8; 16] = core::array::from_fn(|i| i as u8);
    let mut dest = [0u8; 16];
    host.copy(&mut dest, &src, 10);
    check(
        HookSlot::Memcpy,
        dest[..10] == src[..10] && dest[10..].iter().all(|&b| b == 0),
        || format!("region after copy: {dest:02x?}"),
    )?;

    let mut inv_sqrt_error = 0.0f64;
    for x in [1e-6f32, 0.25, 1.0, 2.0, 37.5, 1e6, 3.4e38] {
        let exact = 1.0 / f64::from(x).sqrt();
        let err = ((f64::from(host.inv_sqrt(x)) - exact) / exact).abs();
        inv_sqrt_error = inv_sqrt_error.max(err);
        check(HookSlot::InvSqrt, err <= INV_SQRT_TOLERANCE, || {
            format!("relative error {err:e} at x = {x:e}")
        })?;
    }

    let mut trig_error = 0.0f64;
    for i in -32..=32 {
        let x = i as f32 * 0.4;
        let reference = f64::from(x);
        let sin_err = (f64::from(host.sin(x)) - reference.sin()).abs();
        let cos_err = (f64::from(host.cos(x)) - reference.cos()).abs();
        trig_error = trig_error.max(sin_err).max(cos_err);
        check(HookSlot::Sin, sin_err <= TRIG_TOLERANCE, || {
            format!("error {sin_err:e} at x = {x}")
        })?;
        check(HookSlot::Cos, cos_err <= TRIG_TOLERANCE, || {
            format!("error {cos_err:e} at x = {x}")
        })?;
    }

    let mut buf = [0xFFu8; 8];
    let result = host.format(&mut buf, c"%s=%d", &[HostArg::Str(c"width"), HostArg::Int(1280)]);
    check(
        HookSlot::Format,
        matches!(result, Ok(out) if out.required == 10 && out.written == 7) && &buf == b"width=1\0",
        || format!("got {result:?} with buffer {buf:02x?}"),
    )?;

    let report = SelfTestReport {
        slots: HookSlot::ALL.to_vec(),
        inv_sqrt_error,
        trig_error,
    };
    tracing::info!(
        inv_sqrt_error = report.inv_sqrt_error,
        trig_error = report.trig_error,
        "all hooks passed self-test"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime_contract;
    use nkhost_config::ConfigOptions;

    #[test]
    fn test_runtime_primitives_pass() {
        let contract = runtime_contract(ConfigOptions::default()).unwrap();
        let report = run(&Host::new(&contract)).unwrap();
        assert_eq!(report.slots, HookSlot::ALL.to_vec());
        assert!(report.inv_sqrt_error <= INV_SQRT_TOLERANCE);
        assert!(report.trig_error <= TRIG_TOLERANCE);
    }

    #[test]
    fn test_error_names_the_slot() {
        let err = CheckError {
            slot: HookSlot::Cos,
            detail: "error 1e-2 at x = 3".to_owned(),
        };
        assert_eq!(err.to_string(), "self-test of `cos` failed: error 1e-2 at x = 3");
    }
}
