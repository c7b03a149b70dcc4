//! Currency parameters: the protocol constants fixed by the genesis block.
//!
//! The root block carries them in its `parameters` field as 20
//! colon-separated values; see `trustmesh_documents::parameters` for the
//! codec. Durations are in seconds.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyParams {
    // ── Universal dividend ───────────────────────────────────────────────
    /// Relative growth of the universal dividend per `dt_reeval` period.
    pub c: f64,
    /// Time between two dividends.
    pub dt: u64,
    /// Initial dividend amount.
    pub ud0: u64,
    /// Time of the first dividend.
    pub ud_time0: u64,
    /// Time of the first dividend reevaluation.
    pub ud_reeval_time0: u64,
    /// Time between two dividend reevaluations.
    pub dt_reeval: u64,

    // ── Web of trust ─────────────────────────────────────────────────────
    /// Minimum delay between two certifications from the same issuer.
    pub sig_period: u64,
    /// Maximum number of active certifications per issuer.
    pub sig_stock: u64,
    /// Lifetime of a pending certification.
    pub sig_window: u64,
    /// Lifetime of a written certification.
    pub sig_validity: u64,
    /// Certifications required to become a member.
    pub sig_qty: u64,
    /// Lifetime of a pending identity.
    pub idty_window: u64,
    /// Lifetime of a pending membership.
    pub ms_window: u64,
    /// Share of referent members that must be reachable within `step_max`.
    pub xpercent: f64,
    /// Lifetime of a written membership.
    pub ms_validity: u64,
    /// Maximum distance between a newcomer and the referent members.
    pub step_max: u64,

    // ── Proof of work ────────────────────────────────────────────────────
    /// Number of blocks used for the median time.
    pub median_time_blocks: u64,
    /// Target time between two blocks.
    pub avg_gen_time: u64,
    /// Number of blocks between two difficulty evaluations.
    pub dt_diff_eval: u64,
    /// Share of previous issuers excluded from the next block.
    pub percent_rot: f64,
}

impl CurrencyParams {
    /// Number of values in the encoded parameters string.
    pub const FIELD_COUNT: usize = 20;
}

/// Defaults of a freshly created currency.
impl Default for CurrencyParams {
    fn default() -> Self {
        Self {
            c: 0.007376575,
            dt: 86_400,
            ud0: 1_000,
            ud_time0: 0,
            ud_reeval_time0: 0,
            dt_reeval: 15_778_800, // 6 months

            sig_period: 432_000, // 5 days
            sig_stock: 100,
            sig_window: 5_259_600,    // 2 months
            sig_validity: 63_115_200, // 2 years
            sig_qty: 5,
            idty_window: 5_259_600,
            ms_window: 5_259_600,
            xpercent: 0.8,
            ms_validity: 31_557_600, // 1 year
            step_max: 5,

            median_time_blocks: 24,
            avg_gen_time: 300,
            dt_diff_eval: 12,
            percent_rot: 0.67,
        }
    }
}
