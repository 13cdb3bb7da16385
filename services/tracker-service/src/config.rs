/// Process configuration, read once at startup and shared immutably.
pub struct AppConfig {
    pub api_username: Option<String>,
    pub api_password: Option<String>,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            api_username: std::env::var("API_USERNAME").ok(),
            api_password: std::env::var("API_PASSWORD").ok(),
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL is required"),
        }
    }
}
