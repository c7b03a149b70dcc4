//! Codec for the genesis block's `parameters` field.
//!
//! The field is 20 colon-separated values in a fixed order:
//!
//! ```text
//! c:dt:ud0:sigPeriod:sigStock:sigWindow:sigValidity:sigQty:idtyWindow:msWindow:
//! xpercent:msValidity:stepMax:medianTimeBlocks:avgGenTime:dtDiffEval:percentRot:
//! udTime0:udReevalTime0:dtReeval
//! ```
//!
//! [`decode`] reads positionally without checking the field count: a short
//! string leaves trailing fields at `0`, and a string with a missing middle
//! value shifts every later field. Existing genesis blocks were hashed under
//! this behaviour, so it is kept; [`decode_strict`] is available for new
//! input.

use crate::coerce::{parse_float_prefix, parse_int_prefix};
use crate::DocumentError;
use trustmesh_types::CurrencyParams;

/// Positions of the fields decoded as decimals rather than integers.
const FLOAT_FIELDS: [usize; 3] = [0, 10, 16];

fn int_at(fields: &[&str], index: usize) -> u64 {
    fields
        .get(index)
        .and_then(|s| parse_int_prefix(s))
        .and_then(|i| u64::try_from(i).ok())
        .unwrap_or(0)
}

fn float_at(fields: &[&str], index: usize) -> f64 {
    fields
        .get(index)
        .and_then(|s| parse_float_prefix(s))
        .unwrap_or(0.0)
}

/// Decode positionally; never fails.
pub fn decode(parameters: &str) -> CurrencyParams {
    let sp: Vec<&str> = parameters.split(':').collect();
    CurrencyParams {
        c: float_at(&sp, 0),
        dt: int_at(&sp, 1),
        ud0: int_at(&sp, 2),
        sig_period: int_at(&sp, 3),
        sig_stock: int_at(&sp, 4),
        sig_window: int_at(&sp, 5),
        sig_validity: int_at(&sp, 6),
        sig_qty: int_at(&sp, 7),
        idty_window: int_at(&sp, 8),
        ms_window: int_at(&sp, 9),
        xpercent: float_at(&sp, 10),
        ms_validity: int_at(&sp, 11),
        step_max: int_at(&sp, 12),
        median_time_blocks: int_at(&sp, 13),
        avg_gen_time: int_at(&sp, 14),
        dt_diff_eval: int_at(&sp, 15),
        percent_rot: float_at(&sp, 16),
        ud_time0: int_at(&sp, 17),
        ud_reeval_time0: int_at(&sp, 18),
        dt_reeval: int_at(&sp, 19),
    }
}

/// Decode, rejecting a wrong field count or a non-numeric field.
pub fn decode_strict(parameters: &str) -> Result<CurrencyParams, DocumentError> {
    let sp: Vec<&str> = parameters.split(':').collect();
    if sp.len() != CurrencyParams::FIELD_COUNT {
        return Err(DocumentError::ParameterCount {
            expected: CurrencyParams::FIELD_COUNT,
            found: sp.len(),
        });
    }
    for (index, value) in sp.iter().enumerate() {
        let numeric = if FLOAT_FIELDS.contains(&index) {
            value.parse::<f64>().is_ok()
        } else {
            value.parse::<u64>().is_ok()
        };
        if !numeric {
            return Err(DocumentError::InvalidParameter {
                index,
                value: value.to_string(),
            });
        }
    }
    Ok(decode(parameters))
}

/// Encode back to the wire form, in the order [`decode`] reads it.
pub fn encode(params: &CurrencyParams) -> String {
    [
        params.c.to_string(),
        params.dt.to_string(),
        params.ud0.to_string(),
        params.sig_period.to_string(),
        params.sig_stock.to_string(),
        params.sig_window.to_string(),
        params.sig_validity.to_string(),
        params.sig_qty.to_string(),
        params.idty_window.to_string(),
        params.ms_window.to_string(),
        params.xpercent.to_string(),
        params.ms_validity.to_string(),
        params.step_max.to_string(),
        params.median_time_blocks.to_string(),
        params.avg_gen_time.to_string(),
        params.dt_diff_eval.to_string(),
        params.percent_rot.to_string(),
        params.ud_time0.to_string(),
        params.ud_reeval_time0.to_string(),
        params.dt_reeval.to_string(),
    ]
    .join(":")
}
