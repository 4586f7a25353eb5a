//! Application-wide constants

/// Header carrying the presented secret (master or dynamic tenant key).
pub const HEADER_API_KEY: &str = "X-Api-Key";
/// Header naming the tenant the caller claims to act as.
pub const HEADER_TENANT_ID: &str = "X-Tenant-Id";
/// Header forwarded by the identity gateway with the acting user's linkage id.
///
/// Trusted as asserted. Deployments must strip it at the edge and let only the
/// gateway set it; a tenant key holder can otherwise act as any user of its own
/// tenant. It never widens visibility past the tenant the key belongs to.
pub const HEADER_IDENTITY_PROVIDER_ID: &str = "X-Identity-Provider-Id";

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

pub const TENANT_ADMIN_ROLE: &str = "TenantAdmin";
pub const API_KEY_SECRET_BYTES: usize = 32;
pub const MIN_API_KEY_LENGTH: u64 = 16;
pub const MAX_API_KEY_LENGTH: u64 = 256;
pub const MAX_LABEL_LENGTH: u64 = 100;

/// Feature identifiers known to the subscription catalogue.
pub mod features {
    pub const DASHBOARD: &str = "Dashboard";
    pub const ANALYTICS: &str = "Analytics";
    pub const SETTINGS: &str = "Settings";
    pub const REPORTS: &str = "Reports";
    pub const NOTIFICATIONS: &str = "Notifications";
    pub const USER_MANAGEMENT: &str = "UserManagement";
    pub const INTEGRATION: &str = "Integration";
    pub const ADVANCED_ANALYTICS: &str = "AdvancedAnalytics";
    pub const AUTOMATION: &str = "Automation";
    pub const SECURITY: &str = "Security";
    pub const API_ACCESS: &str = "ApiAccess";
    pub const CUSTOM_WORKFLOWS: &str = "CustomWorkflows";

    pub const ALL: [&str; 12] = [
        DASHBOARD,
        ANALYTICS,
        SETTINGS,
        REPORTS,
        NOTIFICATIONS,
        USER_MANAGEMENT,
        INTEGRATION,
        ADVANCED_ANALYTICS,
        AUTOMATION,
        SECURITY,
        API_ACCESS,
        CUSTOM_WORKFLOWS,
    ];
}
