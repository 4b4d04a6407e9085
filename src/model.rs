use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub name: String,
    pub credit_rating: String,
    pub industry: String,
    pub parent_company: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_symbol: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub square_footage: u64,
    pub building_class: String,
    pub year_built: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentComponent {
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: f64,
    pub psf: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Escalation {
    pub year: u32,
    /// Percentage as written in the lease, e.g. "3.0%".
    pub rate: String,
    pub amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenewalOption {
    /// Whole years.
    pub term: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub notice: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecoveryTerms {
    pub cam: String,
    pub taxes: String,
    pub insurance: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lease {
    pub start_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub term: u32,
    pub base_rent: f64,
    pub rent_components: Vec<RentComponent>,
    #[serde(default)]
    pub escalations: Vec<Escalation>,
    #[serde(default)]
    pub renewal_options: Vec<RenewalOption>,
    pub recovery_terms: RecoveryTerms,
    #[serde(default)]
    pub security_deposit: String,
    #[serde(default)]
    pub tl_allowance: String,
    #[serde(default)]
    pub special_provisions: Vec<String>,
}

impl Lease {
    /// Sum of all rent component amounts; never stored on the snapshot.
    pub fn total_rent(&self) -> f64 {
        self.rent_components.iter().map(|c| c.amount).sum()
    }

    pub fn annual_rent(&self, square_footage: u64) -> f64 {
        self.base_rent * square_footage as f64
    }

    pub fn total_renewal_years(&self) -> u64 {
        self.renewal_options.iter().map(|o| u64::from(o.term)).sum()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
    /// Anything the source data did not classify as low/medium/high.
    Unknown,
}

impl RiskTier {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => RiskTier::Low,
            "medium" => RiskTier::Medium,
            "high" => RiskTier::High,
            _ => RiskTier::Unknown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    #[serde(rename = "type")]
    pub kind: String,
    /// Kept verbatim for display ("Low", "Medium", ...); see [`RiskFactor::tier`].
    pub risk: String,
    pub description: String,
}

impl RiskFactor {
    pub fn tier(&self) -> RiskTier {
        RiskTier::parse(&self.risk)
    }
}

/// Read-only input for one render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseSnapshot {
    pub tenant: Tenant,
    pub property: Property,
    pub lease: Lease,
    #[serde(default)]
    pub risk_factors: Vec<RiskFactor>,
}
