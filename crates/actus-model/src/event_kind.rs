//! Event kinds and the same-timestamp priority ordering that resolves ties.

use std::fmt;

/// The kind of a contract event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EventKind {
    /// Analysis (position mark, no cash flow).
    Ad,
    /// Initial Exchange.
    Ied,
    /// Principal Redemption.
    Pr,
    /// Interest Payment.
    Ip,
    /// Interest Capitalization.
    Ipci,
    /// Rate Reset, market-observed.
    Rr,
    /// Rate Reset, fixed value (`Ipnr <- RRNXT`, no market observation).
    Rrf,
    /// Interest Calculation Base update.
    Ipcb,
    /// Scaling.
    Sc,
    /// Fee Payment.
    Fp,
    /// Prepayment.
    Pp,
    /// Penalty Payment.
    Py,
    /// Purchase.
    Prd,
    /// Termination.
    Td,
    /// Maturity.
    Md,
    /// Settlement.
    Std,
    /// Exercise.
    Xd,
    /// Dividend.
    Dv,
}

impl EventKind {
    /// Priority rank used to order same-timestamp events: lower runs first.
    ///
    /// `AD(1) < IED(2) < PR(3) < IP(4) < IPCI(5) < RR(6) < RRF(7) < IPCB(8)
    /// < SC(9) < FP(10) < PP(11) < PY(12) < PRD(13) < TD(14) < MD(15)
    /// < STD(16) < XD(17) < DV(18)`.
    pub fn priority(self) -> u8 {
        match self {
            EventKind::Ad => 1,
            EventKind::Ied => 2,
            EventKind::Pr => 3,
            EventKind::Ip => 4,
            EventKind::Ipci => 5,
            EventKind::Rr => 6,
            EventKind::Rrf => 7,
            EventKind::Ipcb => 8,
            EventKind::Sc => 9,
            EventKind::Fp => 10,
            EventKind::Pp => 11,
            EventKind::Py => 12,
            EventKind::Prd => 13,
            EventKind::Td => 14,
            EventKind::Md => 15,
            EventKind::Std => 16,
            EventKind::Xd => 17,
            EventKind::Dv => 18,
        }
    }

    /// The ACTUS short code, e.g. `"IED"`.
    pub fn code(self) -> &'static str {
        match self {
            EventKind::Ad => "AD",
            EventKind::Ied => "IED",
            EventKind::Pr => "PR",
            EventKind::Ip => "IP",
            EventKind::Ipci => "IPCI",
            EventKind::Rr => "RR",
            EventKind::Rrf => "RRF",
            EventKind::Ipcb => "IPCB",
            EventKind::Sc => "SC",
            EventKind::Fp => "FP",
            EventKind::Pp => "PP",
            EventKind::Py => "PY",
            EventKind::Prd => "PRD",
            EventKind::Td => "TD",
            EventKind::Md => "MD",
            EventKind::Std => "STD",
            EventKind::Xd => "XD",
            EventKind::Dv => "DV",
        }
    }

    /// Parse an ACTUS short code.
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "AD" => EventKind::Ad,
            "IED" => EventKind::Ied,
            "PR" => EventKind::Pr,
            "IP" => EventKind::Ip,
            "IPCI" => EventKind::Ipci,
            "RR" => EventKind::Rr,
            "RRF" => EventKind::Rrf,
            "IPCB" => EventKind::Ipcb,
            "SC" => EventKind::Sc,
            "FP" => EventKind::Fp,
            "PP" => EventKind::Pp,
            "PY" => EventKind::Py,
            "PRD" => EventKind::Prd,
            "TD" => EventKind::Td,
            "MD" => EventKind::Md,
            "STD" => EventKind::Std,
            "XD" => EventKind::Xd,
            "DV" => EventKind::Dv,
            _ => return None,
        })
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl PartialOrd for EventKind {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EventKind {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.priority().cmp(&other.priority())
    }
}
