use serde::{Deserialize, Serialize};

/// The company row is a singleton and always lives under this id.
pub const COMPANY_RECORD_ID: u32 = 1;

/// Wire shape of GET /info. The real payload carries more fields
/// (headquarters, ceo, links, ...) which are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyDto {
    pub name: String,
    pub founder: String,
    pub founded: i32,
    pub employees: i64,
    pub launch_sites: i32,
    pub valuation: i64,
}

impl CompanyDto {
    pub fn to_record(&self) -> CompanyRecord {
        CompanyRecord {
            id: COMPANY_RECORD_ID,
            name: self.name.clone(),
            founder: self.founder.clone(),
            founded: self.founded,
            employees: self.employees,
            launch_sites: self.launch_sites,
            valuation: self.valuation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: u32,
    pub name: String,
    pub founder: String,
    pub founded: i32,
    pub employees: i64,
    pub launch_sites: i32,
    pub valuation: i64,
}

impl CompanyRecord {
    pub fn to_company(&self) -> Company {
        Company {
            name: self.name.clone(),
            founder: self.founder.clone(),
            founded: self.founded,
            employees: self.employees,
            launch_sites: self.launch_sites,
            valuation: self.valuation,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub founder: String,
    pub founded: i32,
    pub employees: i64,
    pub launch_sites: i32,
    /// Valuation in whole US dollars
    pub valuation: i64,
}
