use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub admin_token: String,
    /// Public identity of the single business this instance serves.
    pub client_id: String,
    pub business_name: String,
    pub resend_api_key: String,
    pub contact_to_email: String,
    pub contact_from_email: String,
    pub demo_mode: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3001),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "slotbook.db".to_string()),
            admin_token: env::var("ADMIN_TOKEN").unwrap_or_else(|_| "changeme".to_string()),
            client_id: env::var("CLIENT_ID").unwrap_or_else(|_| "default".to_string()),
            business_name: env::var("BUSINESS_NAME").unwrap_or_else(|_| "Appointments".to_string()),
            resend_api_key: env::var("RESEND_API_KEY").unwrap_or_default(),
            contact_to_email: env::var("CONTACT_TO_EMAIL").unwrap_or_default(),
            contact_from_email: env::var("CONTACT_FROM_EMAIL")
                .unwrap_or_else(|_| "onboarding@resend.dev".to_string()),
            demo_mode: env::var("DEMO_MODE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3001,
            database_url: ":memory:".to_string(),
            admin_token: "changeme".to_string(),
            client_id: "default".to_string(),
            business_name: "Appointments".to_string(),
            resend_api_key: String::new(),
            contact_to_email: String::new(),
            contact_from_email: "onboarding@resend.dev".to_string(),
            demo_mode: false,
        }
    }
}
