pub const SECURED_TYPE_KEYWORDS: [&str; 4] = ["auto loan", "home loan", "mortgage", "secured"];

const ACTIVE_STATUS_KEYWORD: &str = "active";
const ACTIVE_STATUS_CODE: &str = "11";
const CLOSED_STATUS_KEYWORD: &str = "closed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    Active,
    Closed,
    Other,
}

impl StatusClass {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Closed => "closed",
            Self::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collateral {
    Secured,
    Unsecured,
}

impl Collateral {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Secured => "secured",
            Self::Unsecured => "unsecured",
        }
    }
}

/// Substring match, so "Inactive" also lands in the active bucket.
pub fn classify_status(status: &str) -> StatusClass {
    let lowered = status.to_lowercase();
    if lowered.contains(ACTIVE_STATUS_KEYWORD) || status == ACTIVE_STATUS_CODE {
        return StatusClass::Active;
    }
    if lowered.contains(CLOSED_STATUS_KEYWORD) {
        return StatusClass::Closed;
    }
    StatusClass::Other
}

pub fn classify_collateral(account_type: &str) -> Collateral {
    let lowered = account_type.to_lowercase();
    if SECURED_TYPE_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
    {
        Collateral::Secured
    } else {
        Collateral::Unsecured
    }
}
